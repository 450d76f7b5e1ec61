use actix_web::{get, web, Responder};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::media_dto::{parse_parent, to_dtos, MediaItemDto};
use crate::{
    api::schemas::{ErrorResponse, SuccessResponse},
    shared::api::ApiResponse,
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    /// Items sorted by display order, orders renumbered from 0
    pub items: Vec<MediaItemDto>,

    #[schema(example = 10)]
    pub max_items: usize,

    /// Slots left before the collection is full
    #[schema(example = 7)]
    pub remaining: usize,
}

/// Get a media collection
///
/// Returns the stored collection of a parent record, hydrated: sorted by
/// display order and renumbered without gaps.
#[utoipa::path(
    get,
    path = "/api/media/{target}/{target_id}",
    tag = "media",
    params(
        ("target" = String, Path, description = "project | service | subservice"),
        ("target_id" = String, Path, description = "Parent record id (UUID)")
    ),
    responses(
        (status = 200, description = "Collection", body = inline(SuccessResponse<CollectionResponse>)),
        (status = 400, description = "Invalid target or id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[get("/api/media/{target}/{target_id}")]
pub async fn get_collection_handler(
    path: web::Path<(String, String)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (target, target_id) = path.into_inner();
    let parent = match parse_parent(&target, &target_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match data.multimedia.load_collection.execute(parent).await {
        Ok(view) => ApiResponse::success(CollectionResponse {
            items: to_dtos(view.items),
            max_items: view.max_items,
            remaining: view.remaining,
        }),
        Err(err) => {
            error!(parent = %parent, error = %err, "Failed to load media collection");
            ApiResponse::internal_error()
        }
    }
}
