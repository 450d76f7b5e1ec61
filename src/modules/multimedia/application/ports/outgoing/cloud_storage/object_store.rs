use async_trait::async_trait;

// ============================================================================
// Domain Types
// ============================================================================

/// Validated payload for a single object upload.
///
/// # Construction
/// - Use `try_new()` which validates that path and content type are non-empty
///   and that the path is relative
/// - Fields are private with getters for encapsulation
#[derive(Debug, Clone, PartialEq)]
pub struct StoreObject {
    destination_path: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl StoreObject {
    pub fn try_new(
        destination_path: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<Self, StoreObjectError> {
        if destination_path.trim().is_empty() {
            return Err(StoreObjectError::EmptyField("destination_path"));
        }
        if destination_path.starts_with('/') || destination_path.contains("..") {
            return Err(StoreObjectError::InvalidPath(destination_path));
        }
        if content_type.trim().is_empty() {
            return Err(StoreObjectError::EmptyField("content_type"));
        }

        Ok(Self {
            destination_path,
            content_type,
            bytes,
        })
    }

    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreObjectError {
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Destination path must be relative: {0}")]
    InvalidPath(String),
}

/// Errors that can occur when uploading to the object store.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ObjectStoreError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Object already exists")]
    Conflict,

    #[error("Network problem occurred")]
    NetworkInterrupted,

    #[error("Object store rejected the upload: {0}")]
    Rejected(String),
}

// ============================================================================
// Port Interface
// ============================================================================

/// Port for the object-storage capability.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores the object and returns its public, absolute URL.
    async fn upload(&self, object: StoreObject) -> Result<String, ObjectStoreError>;
}

// ============================================================================
// Tests
// ============================================================================
