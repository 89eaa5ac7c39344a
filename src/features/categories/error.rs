use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::categories::stores::StoreError;

/// Outcomes the category tree manager can reject a mutation with
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("A category with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Parent category {0} not found")]
    ParentNotFound(Uuid),

    #[error("Category {0} not found")]
    NotFound(Uuid),

    #[error("A category cannot be its own parent")]
    SelfParent,

    #[error("Parent change would create a circular category reference")]
    CircularReference,

    #[error("Category {0} still has child categories")]
    HasChildren(Uuid),

    #[error("Category store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::DuplicateSlug(_) | CategoryError::HasChildren(_) => {
                AppError::Conflict(err.to_string())
            }
            CategoryError::ParentNotFound(_) | CategoryError::NotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CategoryError::SelfParent | CategoryError::CircularReference => {
                AppError::BadRequest(err.to_string())
            }
            // Message is logged, never returned to the client
            CategoryError::StoreFailure(_) => AppError::Internal(err.to_string()),
        }
    }
}
