use futures::future::join_all;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{debug, warn};

use crate::multimedia::application::{
    domain::{
        entities::{MediaItem, ParentRef, UploadCandidate},
        policies::gallery_policy::{
            ext_lower, extensions_for_mime, FileValidationError, GalleryPolicy,
        },
    },
    ports::outgoing::cloud_storage::{ObjectStore, StoreObject},
};

const RANDOM_SUFFIX_LEN: usize = 8;
const FALLBACK_EXTENSION: &str = "bin";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Collection is full (max {max_items} items)")]
    CapacityExceeded { max_items: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    ValidationFailed(FileValidationError),
    TransportFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: RejectionReason,
}

/// Aggregate result of a batch, as reported to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files offered by the caller.
    pub requested: usize,
    /// Files cut off because the collection had no room for them.
    pub dropped_over_capacity: usize,
    /// Files uploaded and added to the collection.
    pub accepted: usize,
    pub rejected: Vec<RejectedFile>,
}

impl BatchReport {
    pub fn validation_failures(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| matches!(r.reason, RejectionReason::ValidationFailed(_)))
            .count()
    }

    pub fn transport_failures(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| matches!(r.reason, RejectionReason::TransportFailed(_)))
            .count()
    }

    pub fn was_truncated(&self) -> bool {
        self.dropped_over_capacity > 0
    }
}

#[derive(Debug, Clone)]
pub struct PendingUpload {
    file_name: String,
    object: StoreObject,
}

impl PendingUpload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn destination_path(&self) -> &str {
        self.object.destination_path()
    }
}

/// A clamped and validated batch, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    requested: usize,
    dropped_over_capacity: usize,
    uploads: Vec<PendingUpload>,
    rejected: Vec<RejectedFile>,
}

impl PreparedBatch {
    pub fn uploads(&self) -> &[PendingUpload] {
        &self.uploads
    }

    pub fn in_flight(&self) -> usize {
        self.uploads.len()
    }

    pub fn dropped_over_capacity(&self) -> usize {
        self.dropped_over_capacity
    }

    pub fn rejected(&self) -> &[RejectedFile] {
        &self.rejected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Uploaded items in offered order, each with a provisional order of 0.
    pub items: Vec<MediaItem>,
    pub report: BatchReport,
}

/// Turns a batch of raw files into uploaded media items.
///
/// Split in two phases so the caller can track the batch state in between:
/// [`prepare`](Self::prepare) clamps and validates without touching the
/// network, [`upload`](Self::upload) sends every accepted file concurrently
/// and waits for all of them to settle.
pub struct UploadOrchestrator<S>
where
    S: ObjectStore,
{
    store: S,
    policy: GalleryPolicy,
}

impl<S> UploadOrchestrator<S>
where
    S: ObjectStore,
{
    pub fn new(store: S, policy: GalleryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &GalleryPolicy {
        &self.policy
    }

    pub fn prepare(
        &self,
        parent: &ParentRef,
        remaining: usize,
        files: Vec<UploadCandidate>,
    ) -> Result<PreparedBatch, BatchError> {
        if remaining == 0 {
            return Err(BatchError::CapacityExceeded {
                max_items: self.policy.max_items,
            });
        }

        let requested = files.len();
        let dropped_over_capacity = requested.saturating_sub(remaining);
        if dropped_over_capacity > 0 {
            debug!(
                "Batch for {} truncated: {} offered, room for {}",
                parent, requested, remaining
            );
        }

        let mut uploads = Vec::new();
        let mut rejected = Vec::new();

        for file in files.into_iter().take(remaining) {
            if let Err(reason) = self.policy.check_file(&file) {
                debug!("Rejected {:?} before upload: {}", file.file_name, reason);
                rejected.push(RejectedFile {
                    file_name: file.file_name,
                    reason: RejectionReason::ValidationFailed(reason),
                });
                continue;
            }

            let content_type = file.mime_type.trim().to_ascii_lowercase();
            let path = make_destination_path(parent, &file.file_name, &content_type);
            match StoreObject::try_new(path, content_type, file.bytes) {
                Ok(object) => uploads.push(PendingUpload {
                    file_name: file.file_name,
                    object,
                }),
                Err(e) => rejected.push(RejectedFile {
                    file_name: file.file_name,
                    reason: RejectionReason::TransportFailed(e.to_string()),
                }),
            }
        }

        Ok(PreparedBatch {
            requested,
            dropped_over_capacity,
            uploads,
            rejected,
        })
    }

    /// Uploads every pending file in parallel. Never fails: a file whose
    /// upload errors is reported as rejected and left out of the items.
    pub async fn upload(&self, batch: PreparedBatch) -> BatchOutcome {
        let PreparedBatch {
            requested,
            dropped_over_capacity,
            uploads,
            mut rejected,
        } = batch;

        // join_all yields results in submission order, whatever the
        // completion order.
        let settled = join_all(uploads.into_iter().map(|pending| async move {
            let PendingUpload { file_name, object } = pending;
            let result = self.store.upload(object).await;
            (file_name, result)
        }))
        .await;

        let mut items = Vec::with_capacity(settled.len());
        for (file_name, result) in settled {
            let accepted = result
                .map_err(|e| e.to_string())
                .and_then(|url| MediaItem::accepted(url).map_err(|e| e.to_string()));

            match accepted {
                Ok(item) => items.push(item),
                Err(message) => {
                    warn!("Upload of {:?} failed: {}", file_name, message);
                    rejected.push(RejectedFile {
                        file_name,
                        reason: RejectionReason::TransportFailed(message),
                    });
                }
            }
        }

        let report = BatchReport {
            requested,
            dropped_over_capacity,
            accepted: items.len(),
            rejected,
        };

        BatchOutcome { items, report }
    }

    /// Both phases in one call.
    pub async fn submit_batch(
        &self,
        parent: &ParentRef,
        remaining: usize,
        files: Vec<UploadCandidate>,
    ) -> Result<BatchOutcome, BatchError> {
        let prepared = self.prepare(parent, remaining, files)?;
        Ok(self.upload(prepared).await)
    }
}

/// `<parent_type>/<parent_id>/<unix_millis>-<random>.<ext>`
pub fn make_destination_path(parent: &ParentRef, file_name: &str, mime_type: &str) -> String {
    let ext = ext_lower(file_name)
        .or_else(|| {
            extensions_for_mime(mime_type)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}/{}/{}-{}.{}",
        parent.target,
        parent.id,
        chrono::Utc::now().timestamp_millis(),
        suffix.to_ascii_lowercase(),
        ext
    )
}
