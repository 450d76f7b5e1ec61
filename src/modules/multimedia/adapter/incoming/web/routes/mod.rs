pub mod get_collection;
pub mod media_dto;
pub mod save_collection;
pub mod upload_batch;

pub use get_collection::{get_collection_handler, CollectionResponse};
pub use media_dto::MediaItemDto;
pub use save_collection::{save_collection_handler, SaveCollectionRequest, SaveCollectionResponse};
pub use upload_batch::{
    upload_batch_handler, BatchReportDto, RejectedFileDto, UploadAffordanceDto,
    UploadBatchRequest, UploadBatchResponse, UploadFileDto,
};
