use std::sync::Arc;

use crate::multimedia::application::ports::incoming::use_cases::{
    LoadMediaCollectionUseCase, SaveMediaCollectionUseCase, UploadMediaBatchUseCase,
};

#[derive(Clone)]
pub struct MultimediaUseCases {
    pub load_collection: Arc<dyn LoadMediaCollectionUseCase + Send + Sync>,
    pub save_collection: Arc<dyn SaveMediaCollectionUseCase + Send + Sync>,
    pub upload_batch: Arc<dyn UploadMediaBatchUseCase + Send + Sync>,
}
