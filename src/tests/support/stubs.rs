use async_trait::async_trait;

use crate::multimedia::application::{
    domain::entities::{MediaItem, ParentRef},
    ports::incoming::use_cases::{
        CollectionView, LoadCollectionError, LoadMediaCollectionUseCase, SaveCollectionCommand,
        SaveCollectionError, SaveMediaCollectionUseCase, UploadBatchCommand, UploadBatchError,
        UploadBatchResult, UploadMediaBatchUseCase,
    },
};

#[derive(Default, Clone)]
pub struct StubLoadCollectionUseCase;

#[async_trait]
impl LoadMediaCollectionUseCase for StubLoadCollectionUseCase {
    async fn execute(&self, _parent: ParentRef) -> Result<CollectionView, LoadCollectionError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubSaveCollectionUseCase;

#[async_trait]
impl SaveMediaCollectionUseCase for StubSaveCollectionUseCase {
    async fn execute(
        &self,
        _command: SaveCollectionCommand,
    ) -> Result<Vec<MediaItem>, SaveCollectionError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubUploadBatchUseCase;

#[async_trait]
impl UploadMediaBatchUseCase for StubUploadBatchUseCase {
    async fn execute(
        &self,
        _command: UploadBatchCommand,
    ) -> Result<UploadBatchResult, UploadBatchError> {
        unimplemented!("Not used in this test")
    }
}
