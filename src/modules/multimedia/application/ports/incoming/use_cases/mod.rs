mod load_media_collection;
mod save_media_collection;
mod upload_media_batch;

pub use load_media_collection::{CollectionView, LoadCollectionError, LoadMediaCollectionUseCase};
pub use save_media_collection::{
    SaveCollectionCommand, SaveCollectionError, SaveMediaCollectionUseCase,
};
pub use upload_media_batch::{
    UploadBatchCommand, UploadBatchError, UploadBatchResult, UploadMediaBatchUseCase,
};
