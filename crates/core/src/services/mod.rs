//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod category;
pub mod feed;
pub mod legacy_import;
pub mod media;
pub mod nomination;
pub mod review;
pub mod wall;

pub use admin::AdminDirectory;
pub use category::{CategoryDefinition, CategoryMetadata, category_catalog, declared_fields};
pub use feed::{
    ChangeNotifier, LiveFeed, NominationChange, NominationFeed, NominationQuery,
    NominationSource, Snapshot, Subscription,
};
pub use legacy_import::{
    BatchSink, ImportReport, LegacyImporter, LegacyRecord, MAX_BATCH_SIZE, load_legacy_records,
};
pub use media::{ImageDimensions, ImageFormat, MediaConfig, MediaService, ProcessedImage};
pub use nomination::{
    ANONYMOUS_UPLOADER, NominationForm, NominationService, SubmissionOutcome, UploadFile,
    validate_reg_no,
};
pub use review::{
    CategoryCount, NominationDetail, ProofView, ReviewBoard, ReviewService, ReviewSummary,
    YearCount,
};
pub use wall::{Filter, WallCard, WallOfFame, WallService, WallView, initials};
