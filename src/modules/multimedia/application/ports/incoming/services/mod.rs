mod load_media_collection_service;
mod save_media_collection_service;
mod upload_media_batch_service;

pub use load_media_collection_service::LoadMediaCollectionService;
pub use save_media_collection_service::SaveMediaCollectionService;
pub use upload_media_batch_service::UploadMediaBatchService;
