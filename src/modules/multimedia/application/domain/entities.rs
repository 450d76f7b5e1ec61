use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParentTarget {
    #[default]
    Project,
    Service,
    Subservice,
}

impl fmt::Display for ParentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParentTarget::Project => "project",
            ParentTarget::Service => "service",
            ParentTarget::Subservice => "subservice",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown parent target: {0}")]
pub struct UnknownParentTarget(pub String);

impl FromStr for ParentTarget {
    type Err = UnknownParentTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(ParentTarget::Project),
            "service" => Ok(ParentTarget::Service),
            "subservice" => Ok(ParentTarget::Subservice),
            other => Err(UnknownParentTarget(other.to_string())),
        }
    }
}

/// The record a media collection belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParentRef {
    pub target: ParentTarget,
    pub id: Uuid,
}

impl ParentRef {
    pub fn new(target: ParentTarget, id: Uuid) -> Self {
        Self { target, id }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.id)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MediaItemError {
    #[error("Media url cannot be empty")]
    EmptyUrl,

    #[error("Media url is not an absolute http(s) url: {0}")]
    InvalidUrl(String),
}

/// One image entry of an ordered collection.
///
/// `order` mirrors the array position inside a collection at rest; it is only
/// rewritten by [`MediaCollection`](super::collection::MediaCollection).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    pub id: Option<Uuid>,
    pub url: String,
    pub order: u32,
}

impl MediaItem {
    /// Builds a not-yet-persisted item with a provisional order of 0.
    pub fn accepted(url: impl Into<String>) -> Result<Self, MediaItemError> {
        let url = url.into();
        validate_media_url(&url)?;
        Ok(Self {
            id: None,
            url,
            order: 0,
        })
    }

    pub fn persisted(id: Uuid, url: impl Into<String>, order: u32) -> Self {
        Self {
            id: Some(id),
            url: url.into(),
            order,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Checks that `raw` is a well-formed absolute http(s) url with a host.
pub fn validate_media_url(raw: &str) -> Result<(), MediaItemError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MediaItemError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|_| MediaItemError::InvalidUrl(raw.to_string()))?;
    let scheme_ok = matches!(parsed.scheme(), "http" | "https");
    if !scheme_ok || parsed.host_str().is_none() || trimmed != raw {
        return Err(MediaItemError::InvalidUrl(raw.to_string()));
    }

    Ok(())
}

/// Identity of an item inside a collection, independent of its `order`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaKey {
    Persisted { id: Uuid },
    Mounted { seq: u64, url: String },
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKey::Persisted { id } => write!(f, "{id}"),
            MediaKey::Mounted { seq, url } => write!(f, "{seq}:{url}"),
        }
    }
}

/// A raw file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}
