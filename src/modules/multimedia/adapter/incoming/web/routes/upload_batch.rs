use actix_web::{post, web, Responder};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::media_dto::{from_dtos, parse_parent, to_dtos, MediaItemDto};
use crate::{
    api::schemas::{ErrorResponse, SuccessResponse},
    multimedia::application::{
        domain::entities::UploadCandidate,
        gallery::{UploadAffordance, UploadDisabledReason},
        orchestrator::{BatchReport, RejectedFile, RejectionReason},
        ports::incoming::use_cases::{UploadBatchCommand, UploadBatchError},
    },
    shared::api::ApiResponse,
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileDto {
    #[schema(example = "cover.png")]
    pub file_name: String,

    #[schema(example = "image/png")]
    pub mime_type: String,

    /// File content, standard base64
    #[schema(example = "iVBORw0KGgo=")]
    pub data_base64: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatchRequest {
    /// The collection as currently shown in the form
    #[serde(default)]
    pub items: Vec<MediaItemDto>,

    /// Files picked in one selection, in selection order
    pub files: Vec<UploadFileDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFileDto {
    pub file_name: String,

    /// `validation` or `transport`
    #[schema(example = "validation")]
    pub kind: String,

    #[schema(example = "Unsupported mime type: image/gif")]
    pub reason: String,
}

impl From<RejectedFile> for RejectedFileDto {
    fn from(rejected: RejectedFile) -> Self {
        let (kind, reason) = match rejected.reason {
            RejectionReason::ValidationFailed(err) => ("validation", err.to_string()),
            RejectionReason::TransportFailed(msg) => ("transport", msg),
        };
        Self {
            file_name: rejected.file_name,
            kind: kind.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchReportDto {
    pub requested: usize,
    pub accepted: usize,
    pub dropped_over_capacity: usize,
    pub validation_failures: usize,
    pub transport_failures: usize,
    pub rejected: Vec<RejectedFileDto>,
}

impl From<BatchReport> for BatchReportDto {
    fn from(report: BatchReport) -> Self {
        Self {
            requested: report.requested,
            accepted: report.accepted,
            dropped_over_capacity: report.dropped_over_capacity,
            validation_failures: report.validation_failures(),
            transport_failures: report.transport_failures(),
            rejected: report.rejected.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadAffordanceDto {
    pub enabled: bool,
    pub remaining: usize,
    pub max_items: usize,

    /// `AT_CAPACITY` or `BATCH_IN_FLIGHT` when disabled
    #[schema(example = "AT_CAPACITY")]
    pub disabled_reason: Option<String>,

    #[schema(example = "Maximum number of images reached")]
    pub message: Option<String>,
}

impl From<UploadAffordance> for UploadAffordanceDto {
    fn from(affordance: UploadAffordance) -> Self {
        let code = |reason: UploadDisabledReason| match reason {
            UploadDisabledReason::AtCapacity => "AT_CAPACITY",
            UploadDisabledReason::BatchInFlight => "BATCH_IN_FLIGHT",
        };
        Self {
            enabled: affordance.enabled,
            remaining: affordance.remaining,
            max_items: affordance.max_items,
            disabled_reason: affordance.disabled_reason.map(|r| code(r).to_string()),
            message: affordance.disabled_reason.map(|r| r.message().to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatchResponse {
    /// Collection after the batch, renumbered from 0
    pub items: Vec<MediaItemDto>,
    pub report: BatchReportDto,
    pub upload: UploadAffordanceDto,
}

fn decode_files(files: Vec<UploadFileDto>) -> Result<Vec<UploadCandidate>, String> {
    files
        .into_iter()
        .map(|f| {
            let bytes = STANDARD
                .decode(f.data_base64.trim())
                .map_err(|_| f.file_name.clone())?;
            Ok(UploadCandidate::new(f.file_name, f.mime_type, bytes))
        })
        .collect()
}

/// Upload a batch of images
///
/// Validates the selected files, uploads the accepted ones concurrently and
/// appends them to the submitted collection in selection order. Files past
/// the remaining capacity are dropped. Per-file failures are reported and do
/// not fail the request.
#[utoipa::path(
    post,
    path = "/api/media/{target}/{target_id}/uploads",
    tag = "media",
    params(
        ("target" = String, Path, description = "project | service | subservice"),
        ("target_id" = String, Path, description = "Parent record id (UUID)")
    ),
    request_body = UploadBatchRequest,
    responses(
        (status = 200, description = "Batch processed", body = inline(SuccessResponse<UploadBatchResponse>)),
        (status = 400, description = "Invalid target, collection or file data", body = ErrorResponse),
        (status = 409, description = "Collection is already full", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/media/{target}/{target_id}/uploads")]
pub async fn upload_batch_handler(
    path: web::Path<(String, String)>,
    req: web::Json<UploadBatchRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (target, target_id) = path.into_inner();
    let parent = match parse_parent(&target, &target_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let UploadBatchRequest { items, files } = req.into_inner();
    let files = match decode_files(files) {
        Ok(files) => files,
        Err(file_name) => {
            return ApiResponse::bad_request(
                "INVALID_FILE_DATA",
                &format!("File data is not valid base64: {file_name}"),
            )
        }
    };

    let command = UploadBatchCommand {
        parent,
        items: from_dtos(items),
        files,
    };

    match data.multimedia.upload_batch.execute(command).await {
        Ok(result) => {
            info!(
                parent = %parent,
                requested = result.report.requested,
                accepted = result.report.accepted,
                "Upload batch finished"
            );
            ApiResponse::success(UploadBatchResponse {
                items: to_dtos(result.items),
                report: result.report.into(),
                upload: result.affordance.into(),
            })
        }
        Err(UploadBatchError::CapacityExceeded { max_items }) => {
            warn!(parent = %parent, max_items, "Upload refused, collection is full");
            ApiResponse::conflict(
                "CAPACITY_EXCEEDED",
                &format!("A collection holds at most {max_items} items"),
            )
        }
        Err(UploadBatchError::InvalidCollection(msg)) => {
            ApiResponse::bad_request("INVALID_COLLECTION", &msg)
        }
        Err(err @ UploadBatchError::Internal(_)) => {
            error!(parent = %parent, error = %err, "Upload batch failed");
            ApiResponse::internal_error()
        }
    }
}
