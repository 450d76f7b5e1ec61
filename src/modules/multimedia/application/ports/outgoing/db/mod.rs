mod media_collection_repository;

pub use media_collection_repository::{MediaCollectionRepository, MediaCollectionRepositoryError};
