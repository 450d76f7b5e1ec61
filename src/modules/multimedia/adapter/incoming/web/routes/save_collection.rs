use actix_web::{put, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use super::media_dto::{from_dtos, parse_parent, to_dtos, MediaItemDto};
use crate::{
    api::schemas::{ErrorResponse, SuccessResponse},
    multimedia::application::ports::incoming::use_cases::{
        SaveCollectionCommand, SaveCollectionError,
    },
    shared::api::ApiResponse,
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCollectionRequest {
    /// The collection in display order
    pub items: Vec<MediaItemDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCollectionResponse {
    /// Stored items with ids assigned and orders renumbered from 0
    pub items: Vec<MediaItemDto>,
}

/// Save a media collection
///
/// Replaces the stored collection of a parent record with the submitted
/// items. Array position wins over any `order` sent by the client.
#[utoipa::path(
    put,
    path = "/api/media/{target}/{target_id}",
    tag = "media",
    params(
        ("target" = String, Path, description = "project | service | subservice"),
        ("target_id" = String, Path, description = "Parent record id (UUID)")
    ),
    request_body = SaveCollectionRequest,
    responses(
        (status = 200, description = "Collection saved", body = inline(SuccessResponse<SaveCollectionResponse>)),
        (status = 400, description = "Invalid target, id or item", body = ErrorResponse),
        (status = 409, description = "Too many items", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[put("/api/media/{target}/{target_id}")]
pub async fn save_collection_handler(
    path: web::Path<(String, String)>,
    req: web::Json<SaveCollectionRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (target, target_id) = path.into_inner();
    let parent = match parse_parent(&target, &target_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let command = SaveCollectionCommand {
        parent,
        items: from_dtos(req.into_inner().items),
    };

    match data.multimedia.save_collection.execute(command).await {
        Ok(items) => ApiResponse::success(SaveCollectionResponse {
            items: to_dtos(items),
        }),
        Err(SaveCollectionError::CapacityExceeded { max_items, actual }) => {
            warn!(parent = %parent, max_items, actual, "Rejected oversized collection");
            ApiResponse::conflict(
                "CAPACITY_EXCEEDED",
                &format!("A collection holds at most {max_items} items"),
            )
        }
        Err(SaveCollectionError::InvalidCollection(msg)) => {
            ApiResponse::bad_request("INVALID_COLLECTION", &msg)
        }
        Err(err @ SaveCollectionError::RepositoryError(_)) => {
            error!(parent = %parent, error = %err, "Failed to save media collection");
            ApiResponse::internal_error()
        }
    }
}
