use async_trait::async_trait;

use crate::multimedia::application::{
    domain::{
        entities::{MediaItem, ParentRef},
        policies::gallery_policy::CollectionValidationError,
    },
    ports::outgoing::db::MediaCollectionRepositoryError,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SaveCollectionError {
    #[error("Collection is full (max {max_items} items, got {actual})")]
    CapacityExceeded { max_items: usize, actual: usize },

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<CollectionValidationError> for SaveCollectionError {
    fn from(err: CollectionValidationError) -> Self {
        match err {
            CollectionValidationError::TooManyItems { max_items, actual } => {
                Self::CapacityExceeded { max_items, actual }
            }
            other => Self::InvalidCollection(other.to_string()),
        }
    }
}

impl From<MediaCollectionRepositoryError> for SaveCollectionError {
    fn from(err: MediaCollectionRepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SaveCollectionCommand {
    pub parent: ParentRef,
    pub items: Vec<MediaItem>,
}

/// Persists a collection at save time of the parent form.
#[async_trait]
pub trait SaveMediaCollectionUseCase: Send + Sync {
    async fn execute(
        &self,
        command: SaveCollectionCommand,
    ) -> Result<Vec<MediaItem>, SaveCollectionError>;
}
