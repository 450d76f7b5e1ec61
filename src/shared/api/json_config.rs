// src/shared/api/json_config.rs
use crate::shared::api::ApiResponse;
use actix_web::web::JsonConfig;

/// Json extractor config that answers malformed or oversized bodies with the
/// standard error envelope. `limit` is in bytes.
pub fn custom_json_config(limit: usize) -> JsonConfig {
    JsonConfig::default().limit(limit).error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            ApiResponse::bad_request("VALIDATION_ERROR", &message),
        )
        .into()
    })
}
