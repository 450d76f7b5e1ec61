use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    multimedia::application::domain::entities::{MediaItem, ParentRef, ParentTarget},
    shared::api::ApiResponse,
};

/// One image of a collection as exchanged with the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemDto {
    /// Present once the item has been saved
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: Option<Uuid>,

    /// Absolute public url of the image
    #[schema(example = "https://cdn.example.com/gallery/project/123/1718000000000-a1b2c3d4.png")]
    pub url: String,

    /// Zero-based display position
    #[schema(example = 0)]
    #[serde(default)]
    pub order: u32,
}

impl From<MediaItem> for MediaItemDto {
    fn from(item: MediaItem) -> Self {
        Self {
            id: item.id,
            url: item.url,
            order: item.order,
        }
    }
}

impl From<MediaItemDto> for MediaItem {
    fn from(dto: MediaItemDto) -> Self {
        Self {
            id: dto.id,
            url: dto.url,
            order: dto.order,
        }
    }
}

pub fn to_dtos(items: Vec<MediaItem>) -> Vec<MediaItemDto> {
    items.into_iter().map(MediaItemDto::from).collect()
}

pub fn from_dtos(items: Vec<MediaItemDto>) -> Vec<MediaItem> {
    items.into_iter().map(MediaItem::from).collect()
}

/// Resolves `/{target}/{target_id}` into a parent reference, or the 400
/// response to send back.
pub fn parse_parent(target: &str, target_id: &str) -> Result<ParentRef, HttpResponse> {
    let target: ParentTarget = target.parse().map_err(|_| {
        ApiResponse::bad_request("INVALID_TARGET", "Target must be project, service or subservice")
    })?;
    let id = Uuid::parse_str(target_id)
        .map_err(|_| ApiResponse::bad_request("INVALID_TARGET_ID", "Target id must be a UUID"))?;

    Ok(ParentRef::new(target, id))
}
