use async_trait::async_trait;

use crate::multimedia::application::{
    domain::{
        entities::{MediaItem, ParentRef, UploadCandidate},
        policies::gallery_policy::CollectionValidationError,
    },
    gallery::{GalleryError, UploadAffordance},
    orchestrator::{BatchError, BatchReport},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UploadBatchError {
    #[error("Collection is full (max {max_items} items)")]
    CapacityExceeded { max_items: usize },

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Upload batch failed: {0}")]
    Internal(String),
}

impl From<CollectionValidationError> for UploadBatchError {
    fn from(err: CollectionValidationError) -> Self {
        match err {
            CollectionValidationError::TooManyItems { max_items, .. } => {
                Self::CapacityExceeded { max_items }
            }
            other => Self::InvalidCollection(other.to_string()),
        }
    }
}

impl From<GalleryError> for UploadBatchError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::Batch(BatchError::CapacityExceeded { max_items }) => {
                Self::CapacityExceeded { max_items }
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadBatchCommand {
    pub parent: ParentRef,
    /// The collection as the client currently holds it.
    pub items: Vec<MediaItem>,
    pub files: Vec<UploadCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatchResult {
    pub items: Vec<MediaItem>,
    pub report: BatchReport,
    pub affordance: UploadAffordance,
}

#[async_trait]
pub trait UploadMediaBatchUseCase: Send + Sync {
    async fn execute(&self, command: UploadBatchCommand)
        -> Result<UploadBatchResult, UploadBatchError>;
}
