use async_trait::async_trait;
use serde::Serialize;

use crate::multimedia::application::{
    domain::entities::{MediaItem, ParentRef},
    ports::outgoing::db::MediaCollectionRepositoryError,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LoadCollectionError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<MediaCollectionRepositoryError> for LoadCollectionError {
    fn from(err: MediaCollectionRepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

/// A hydrated collection: sorted, renumbered and within capacity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionView {
    pub parent: ParentRef,
    pub items: Vec<MediaItem>,
    pub max_items: usize,
    pub remaining: usize,
}

#[async_trait]
pub trait LoadMediaCollectionUseCase: Send + Sync {
    async fn execute(&self, parent: ParentRef) -> Result<CollectionView, LoadCollectionError>;
}
