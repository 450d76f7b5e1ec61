// src/api/schemas.rs
use serde::Serialize;
use utoipa::ToSchema;

/// Envelope of every 2xx answer from the media endpoints
#[derive(Serialize, ToSchema)]
#[serde(bound = "T: Serialize")]
pub struct SuccessResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    /// Endpoint payload (collection, saved items or batch result)
    pub data: T,
}

/// Envelope of every 4xx/5xx answer
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    pub error: ErrorDetail,
}

/// Stable error code plus a message for display.
///
/// Codes: `INVALID_TARGET`, `INVALID_TARGET_ID`, `INVALID_COLLECTION`,
/// `INVALID_FILE_DATA`, `VALIDATION_ERROR` (malformed or oversized body),
/// `CAPACITY_EXCEEDED` (409), `INTERNAL_ERROR` (500).
#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "CAPACITY_EXCEEDED")]
    pub code: String,

    #[schema(example = "A collection holds at most 10 items")]
    pub message: String,
}
