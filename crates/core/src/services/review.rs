//! Review workflow for administrators.
//!
//! Access control lives in the HTTP layer; this service assumes the caller
//! is already allowed to review.

use std::collections::BTreeMap;
use std::sync::Arc;

use awards_common::{AppError, AppResult};
use awards_db::entities::nomination::{self, AcademicYear, Category, NominationStatus};
use awards_db::repositories::NominationRepository;
use serde::Serialize;

use super::feed::{
    ChangeNotifier, NominationChange, NominationFeed, NominationQuery, Snapshot, Subscription,
};

/// Shown in place of a proof document when none was uploaded.
pub const NO_PROOF_MESSAGE: &str = "No proof available";

/// How the proof document should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProofView {
    /// Render the document inline from this URL.
    Inline { url: String },
    Unavailable { message: String },
}

impl ProofView {
    #[must_use]
    pub fn for_nomination(nomination: &nomination::Model) -> Self {
        match nomination.proof_doc_url.as_deref() {
            Some(url) if !url.is_empty() => Self::Inline {
                url: url.to_string(),
            },
            _ => Self::Unavailable {
                message: NO_PROOF_MESSAGE.to_string(),
            },
        }
    }
}

/// A nomination together with its proof presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationDetail {
    pub nomination: nomination::Model,
    pub proof: ProofView,
}

impl From<nomination::Model> for NominationDetail {
    fn from(nomination: nomination::Model) -> Self {
        let proof = ProofView::for_nomination(&nomination);
        Self { nomination, proof }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: AcademicYear,
    pub count: usize,
}

/// Counts over a set of nominations. Only values that occur are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total: usize,
    pub by_category: Vec<CategoryCount>,
    pub by_year: Vec<YearCount>,
}

impl ReviewSummary {
    #[must_use]
    pub fn from_records(records: &[nomination::Model]) -> Self {
        let mut categories: BTreeMap<Category, usize> = BTreeMap::new();
        let mut years: BTreeMap<AcademicYear, usize> = BTreeMap::new();

        for record in records {
            *categories.entry(record.category).or_default() += 1;
            *years.entry(record.year).or_default() += 1;
        }

        Self {
            total: records.len(),
            by_category: categories
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
            by_year: years
                .into_iter()
                .map(|(year, count)| YearCount { year, count })
                .collect(),
        }
    }
}

/// In-memory state of the review screen: the latest snapshot plus the
/// record picked for the detail view.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    rows: Snapshot,
    selected: Option<String>,
}

impl ReviewBoard {
    #[must_use]
    pub fn new(rows: Snapshot) -> Self {
        Self {
            rows,
            selected: None,
        }
    }

    /// Replace the rows with a fresh snapshot. The selection is kept by id.
    pub fn apply_snapshot(&mut self, rows: Snapshot) {
        self.rows = rows;
    }

    #[must_use]
    pub fn rows(&self) -> &[nomination::Model] {
        &self.rows
    }

    #[must_use]
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary::from_records(&self.rows)
    }

    /// Pick a record for the detail view.
    pub fn select(&mut self, id: &str) -> Option<NominationDetail> {
        self.selected = Some(id.to_string());
        self.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Detail of the selected record, if it is still in the snapshot.
    #[must_use]
    pub fn selected(&self) -> Option<NominationDetail> {
        let id = self.selected.as_deref()?;
        self.rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .map(NominationDetail::from)
    }
}

/// Service backing the review workflow.
#[derive(Clone)]
pub struct ReviewService {
    nomination_repo: NominationRepository,
    feed: Arc<dyn NominationFeed>,
    notifier: ChangeNotifier,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        nomination_repo: NominationRepository,
        feed: Arc<dyn NominationFeed>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            nomination_repo,
            feed,
            notifier,
        }
    }

    /// All nominations, newest first.
    pub async fn list(&self) -> AppResult<Vec<nomination::Model>> {
        self.nomination_repo.list_recent().await
    }

    /// Live view of all nominations, newest first.
    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.feed.subscribe(NominationQuery::AllByRecent).await
    }

    /// Counts over every nomination.
    pub async fn summary(&self) -> AppResult<ReviewSummary> {
        let rows = self.list().await?;
        Ok(ReviewSummary::from_records(&rows))
    }

    /// Detail view of one nomination.
    pub async fn detail(&self, id: &str) -> AppResult<NominationDetail> {
        let nomination = self.nomination_repo.get_by_id(id).await?;
        Ok(nomination.into())
    }

    pub async fn approve(&self, id: &str) -> AppResult<nomination::Model> {
        self.decide(id, NominationStatus::Approved).await
    }

    pub async fn reject(&self, id: &str) -> AppResult<nomination::Model> {
        self.decide(id, NominationStatus::Rejected).await
    }

    async fn decide(&self, id: &str, status: NominationStatus) -> AppResult<nomination::Model> {
        let existing = self.nomination_repo.get_by_id(id).await?;
        if !existing.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot move a {} nomination to {status}",
                existing.status
            )));
        }

        let updated = self.nomination_repo.set_status(existing, status).await?;

        tracing::info!(id, status = %updated.status, "Nomination reviewed");
        self.notifier.notify(NominationChange::StatusChanged {
            id: updated.id.clone(),
            status,
        });

        Ok(updated)
    }
}
