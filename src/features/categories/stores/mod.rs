//! Record store boundary for categories.
//!
//! The tree manager only relies on single-row atomic reads and writes from
//! here; uniqueness and acyclicity are re-checked by the Postgres store so a
//! check-then-act race in the service cannot persist a violation.

mod pg_category_store;

#[cfg(test)]
pub mod memory_category_store;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

pub use pg_category_store::PgCategoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("parent link would form a cycle")]
    CycleDetected,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>>;

    /// Insert and return the persisted row
    async fn insert(&self, record: NewCategory) -> StoreResult<Category>;

    /// Apply `changes` in one atomic write; `None` when the row no longer exists
    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>>;

    /// All rows ordered by name, optionally filtered by `is_active`
    async fn list(&self, is_active: Option<bool>) -> StoreResult<Vec<Category>>;

    /// Snapshot of every `id -> parent_id` link
    async fn parent_links(&self) -> StoreResult<HashMap<Uuid, Option<Uuid>>>;

    async fn has_children(&self, id: Uuid) -> StoreResult<bool>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
