use crate::multimedia::application::media_use_cases::MultimediaUseCases;
use crate::multimedia::application::ports::incoming::use_cases::{
    LoadMediaCollectionUseCase, SaveMediaCollectionUseCase, UploadMediaBatchUseCase,
};
use crate::tests::support::stubs::*;
use crate::AppState;
use actix_web::web;
use std::sync::Arc;

pub struct TestAppStateBuilder {
    multimedia: MultimediaUseCases,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            multimedia: MultimediaUseCases {
                load_collection: Arc::new(StubLoadCollectionUseCase),
                save_collection: Arc::new(StubSaveCollectionUseCase),
                upload_batch: Arc::new(StubUploadBatchUseCase),
            },
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_load_collection(
        mut self,
        uc: impl LoadMediaCollectionUseCase + Send + Sync + 'static,
    ) -> Self {
        self.multimedia.load_collection = Arc::new(uc);
        self
    }

    pub fn with_save_collection(
        mut self,
        uc: impl SaveMediaCollectionUseCase + Send + Sync + 'static,
    ) -> Self {
        self.multimedia.save_collection = Arc::new(uc);
        self
    }

    pub fn with_upload_batch(
        mut self,
        uc: impl UploadMediaBatchUseCase + Send + Sync + 'static,
    ) -> Self {
        self.multimedia.upload_batch = Arc::new(uc);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            multimedia: self.multimedia,
        })
    }
}
