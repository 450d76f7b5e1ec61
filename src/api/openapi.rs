use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::OpenApi;

use crate::multimedia::adapter::incoming::web::routes::{
    BatchReportDto, CollectionResponse, MediaItemDto, RejectedFileDto, SaveCollectionRequest,
    SaveCollectionResponse, UploadAffordanceDto, UploadBatchRequest, UploadBatchResponse,
    UploadFileDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gallery API",
        version = "1.0.0",
        description = "Ordered image collections attached to projects, services and subservices",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        crate::multimedia::adapter::incoming::web::routes::get_collection::get_collection_handler,
        crate::multimedia::adapter::incoming::web::routes::save_collection::save_collection_handler,
        crate::multimedia::adapter::incoming::web::routes::upload_batch::upload_batch_handler,
    ),
    components(
        schemas(
            // Response wrappers
            SuccessResponse<CollectionResponse>,
            ErrorResponse,
            ErrorDetail,

            // Media DTOs
            MediaItemDto,
            CollectionResponse,
            SaveCollectionRequest,
            SaveCollectionResponse,
            UploadFileDto,
            UploadBatchRequest,
            UploadBatchResponse,
            BatchReportDto,
            RejectedFileDto,
            UploadAffordanceDto
        )
    ),
    tags(
        (name = "media", description = "Image collection endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_media_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/media/{target}/{target_id}"));
        assert!(doc
            .paths
            .paths
            .contains_key("/api/media/{target}/{target_id}/uploads"));
    }
}
