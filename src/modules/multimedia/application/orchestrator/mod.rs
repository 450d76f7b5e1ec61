pub mod upload_orchestrator;

pub use upload_orchestrator::{
    BatchError, BatchOutcome, BatchReport, PreparedBatch, RejectedFile, RejectionReason,
    UploadOrchestrator,
};
