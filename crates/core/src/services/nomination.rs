//! Nomination submission.

use std::sync::{Arc, LazyLock};

use awards_common::{
    AppError, AppResult, BlobKind, IdGenerator, StorageBackend, UploadedFile, blob_storage_key,
};
use awards_db::entities::nomination::{
    self, AcademicYear, Category, Department, NominationStatus,
};
use awards_db::repositories::NominationRepository;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use sea_orm::Set;
use serde::Serialize;
use validator::Validate;

use super::category::CategoryMetadata;
use super::feed::{ChangeNotifier, NominationChange};
use super::media::MediaService;

/// Uploader recorded when the submitter is not signed in.
pub const ANONYMOUS_UPLOADER: &str = "anonymous";

/// Message shown after a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Nomination submitted successfully.";

#[allow(clippy::unwrap_used)]
static REG_NO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// A file attached to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Draft nomination as the student fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct NominationForm {
    #[validate(length(min = 1, max = 256))]
    pub student_name: String,
    pub reg_no: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub mobile: String,
    pub year: AcademicYear,
    pub department: Department,
    #[validate(length(min = 1, max = 512))]
    pub title: String,
    #[validate(length(min = 1, max = 256))]
    pub issuer: String,
    pub date_of_event: Option<NaiveDate>,
    metadata: CategoryMetadata,
    pub photo: Option<UploadFile>,
    pub proof: Option<UploadFile>,
}

impl NominationForm {
    /// An empty form: year I, CSE, Research, no metadata, no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.metadata.category()
    }

    #[must_use]
    pub const fn metadata(&self) -> &CategoryMetadata {
        &self.metadata
    }

    /// Switch category. The metadata field set follows the category and
    /// values typed for another category are discarded.
    pub fn set_category(&mut self, category: Category) {
        if self.category() != category {
            self.metadata = CategoryMetadata::empty(category);
        }
    }

    /// Field names the current category asks for.
    #[must_use]
    pub const fn requested_fields(&self) -> &'static [&'static str] {
        self.metadata.requested_fields()
    }

    /// Set a metadata field. Keys the current category does not declare are
    /// ignored with a warning.
    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) -> bool {
        let accepted = self.metadata.set(key, value);
        if !accepted {
            tracing::warn!(
                key,
                category = %self.category(),
                "Ignoring metadata field not declared for category"
            );
        }
        accepted
    }

    /// Replace the metadata wholesale.
    pub fn set_metadata_fields(&mut self, metadata: CategoryMetadata) {
        self.metadata = metadata;
    }

    /// Return to the empty defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub nomination: nomination::Model,
    /// Non-fatal problems, such as a photo that could not be processed.
    pub warnings: Vec<String>,
}

impl SubmissionOutcome {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        SUBMITTED_MESSAGE
    }
}

/// Check a registration number. Only ASCII letters and digits are allowed.
pub fn validate_reg_no(reg_no: &str) -> AppResult<()> {
    if REG_NO_RE.is_match(reg_no) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Registration number must be alphanumeric.".to_string(),
        ))
    }
}

/// Service for submitting nominations.
#[derive(Clone)]
pub struct NominationService {
    nomination_repo: NominationRepository,
    storage: Arc<dyn StorageBackend>,
    media: MediaService,
    notifier: ChangeNotifier,
    id_gen: IdGenerator,
}

impl NominationService {
    /// Create a new nomination service.
    #[must_use]
    pub fn new(
        nomination_repo: NominationRepository,
        storage: Arc<dyn StorageBackend>,
        media: MediaService,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            nomination_repo,
            storage,
            media,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate, upload and persist a nomination.
    ///
    /// Nothing is uploaded unless the form passes validation, and nothing is
    /// written unless every upload succeeds.
    pub async fn submit(
        &self,
        uploader_id: Option<&str>,
        form: &NominationForm,
    ) -> AppResult<SubmissionOutcome> {
        validate_reg_no(&form.reg_no)?;

        let Some(proof) = form.proof.as_ref() else {
            return Err(AppError::Validation(
                "Proof upload is required for new entries.".to_string(),
            ));
        };

        form.validate()?;

        let date_of_event = form
            .date_of_event
            .ok_or_else(|| AppError::Validation("Date of event is required.".to_string()))?;

        let uploader = uploader_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_UPLOADER);
        let timestamp = Utc::now().timestamp_millis();
        let mut warnings = Vec::new();

        let photo = match form.photo.as_ref() {
            Some(photo) => match self.media.compress_photo(&photo.data) {
                Ok(processed) => {
                    let key =
                        blob_storage_key(BlobKind::Photo, uploader, timestamp, &photo.file_name);
                    Some(
                        self.upload(&key, &processed.data, processed.format.mime_type())
                            .await?,
                    )
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        file_name = %photo.file_name,
                        "Photo compression failed, submitting without photo"
                    );
                    warnings.push(format!("Photo could not be processed: {e}"));
                    None
                }
            },
            None => None,
        };

        let proof_key = blob_storage_key(BlobKind::Proof, uploader, timestamp, &proof.file_name);
        let proof = match self
            .upload(&proof_key, &proof.data, &proof.content_type)
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => {
                self.discard(photo.as_ref()).await;
                return Err(e);
            }
        };

        let model = nomination::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(uploader.to_string()),
            student_name: Set(form.student_name.trim().to_string()),
            reg_no: Set(form.reg_no.clone()),
            email: Set(form.email.trim().to_string()),
            mobile: Set(form.mobile.trim().to_string()),
            year: Set(form.year),
            department: Set(form.department),
            category: Set(form.category()),
            title: Set(form.title.trim().to_string()),
            issuer: Set(form.issuer.trim().to_string()),
            date_of_event: Set(date_of_event),
            meta_data: Set(form.metadata.to_json()),
            photo_url: Set(photo.as_ref().map(|p| p.url.clone())),
            proof_doc_url: Set(Some(proof.url.clone())),
            status: Set(NominationStatus::Pending),
            created_at: Set(Utc::now().into()),
        };

        let created = match self.nomination_repo.create(model).await {
            Ok(created) => created,
            Err(e) => {
                self.discard(photo.as_ref()).await;
                self.discard(Some(&proof)).await;
                return Err(e);
            }
        };

        tracing::info!(
            id = %created.id,
            uploader,
            category = %created.category,
            has_photo = created.photo_url.is_some(),
            "Nomination submitted"
        );
        self.notifier.notify(NominationChange::Created {
            id: created.id.clone(),
        });

        Ok(SubmissionOutcome {
            nomination: created,
            warnings,
        })
    }

    /// Submit the draft and clear it on success. On failure the draft is
    /// left untouched so the student can correct it.
    pub async fn submit_form(
        &self,
        uploader_id: Option<&str>,
        form: &mut NominationForm,
    ) -> AppResult<SubmissionOutcome> {
        let outcome = self.submit(uploader_id, form).await?;
        form.reset();
        Ok(outcome)
    }

    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        self.storage
            .upload(key, data, content_type)
            .await
            .map_err(|e| match e {
                AppError::Upload(_) => e,
                other => AppError::Upload(other.to_string()),
            })
    }

    async fn discard(&self, file: Option<&UploadedFile>) {
        let Some(file) = file else {
            return;
        };
        if let Err(e) = self.storage.delete(&file.key).await {
            tracing::warn!(error = %e, key = %file.key, "Failed to remove orphaned upload");
        }
    }
}
