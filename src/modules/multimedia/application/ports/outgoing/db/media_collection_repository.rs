use async_trait::async_trait;

use crate::multimedia::application::domain::entities::{MediaItem, ParentRef};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MediaCollectionRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Port for the database capability backing media collections.
#[async_trait]
pub trait MediaCollectionRepository: Send + Sync {
    /// Stored items of `parent`. Row order is not guaranteed to follow
    /// `order`; callers hydrate through `MediaCollection`.
    async fn load(&self, parent: ParentRef) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError>;

    /// Replaces the whole stored collection of `parent` with `items`
    /// atomically. Items without an id get one; the stored items are returned.
    async fn replace(
        &self,
        parent: ParentRef,
        items: Vec<MediaItem>,
    ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError>;
}
