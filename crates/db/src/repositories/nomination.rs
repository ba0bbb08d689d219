//! Nomination repository.

use std::sync::Arc;

use crate::entities::{
    Nomination,
    nomination::{self, NominationStatus},
};
use awards_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// Nomination repository for database operations.
#[derive(Clone)]
pub struct NominationRepository {
    db: Arc<DatabaseConnection>,
}

impl NominationRepository {
    /// Create a new nomination repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new nomination.
    pub async fn create(&self, model: nomination::ActiveModel) -> AppResult<nomination::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a nomination by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<nomination::Model>> {
        Nomination::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a nomination by ID, failing when it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<nomination::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NominationNotFound(id.to_string()))
    }

    /// All nominations, most recent first.
    pub async fn list_recent(&self) -> AppResult<Vec<nomination::Model>> {
        Nomination::find()
            .order_by_desc(nomination::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Nominations with the given status, most recent first.
    pub async fn list_by_status(
        &self,
        status: NominationStatus,
    ) -> AppResult<Vec<nomination::Model>> {
        Nomination::find()
            .filter(nomination::Column::Status.eq(status))
            .order_by_desc(nomination::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite the status of a nomination. No other column is touched.
    pub async fn update_status(
        &self,
        id: &str,
        status: NominationStatus,
    ) -> AppResult<nomination::Model> {
        let existing = self.get_by_id(id).await?;
        self.set_status(existing, status).await
    }

    /// Write a new status for an already loaded nomination.
    pub async fn set_status(
        &self,
        existing: nomination::Model,
        status: NominationStatus,
    ) -> AppResult<nomination::Model> {
        let mut model: nomination::ActiveModel = existing.into();
        model.status = Set(status);

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a batch of nominations in one transaction.
    ///
    /// Either every row lands or none does.
    pub async fn insert_batch(&self, models: Vec<nomination::ActiveModel>) -> AppResult<u64> {
        if models.is_empty() {
            return Ok(0);
        }

        let count = models.len() as u64;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Nomination::insert_many(models)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }
}
