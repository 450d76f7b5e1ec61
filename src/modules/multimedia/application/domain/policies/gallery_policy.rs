use std::env;
use std::path::Path;

use std::collections::HashSet;
use uuid::Uuid;

use crate::multimedia::application::domain::entities::{
    validate_media_url, MediaItem, MediaItemError, UploadCandidate,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PolicyConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Why a single file was kept out of a batch before any upload.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FileValidationError {
    #[error("Invalid file name")]
    InvalidFileName,

    #[error("File is empty")]
    EmptyFile,

    #[error("Unsupported mime type: {0}")]
    UnsupportedMimeType(String),

    #[error("Mime type does not match file extension (mime={mime_type}, ext={ext})")]
    MimeExtensionMismatch { mime_type: String, ext: String },

    #[error("File too large (max {max_bytes} bytes, got {actual_bytes} bytes)")]
    FileTooLarge { max_bytes: u64, actual_bytes: u64 },
}

/// Why a client-supplied collection cannot be taken as is.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CollectionValidationError {
    #[error("Collection holds {actual} items, max is {max_items}")]
    TooManyItems { max_items: usize, actual: usize },

    #[error("Item {index}: {reason}")]
    InvalidItem {
        index: usize,
        reason: MediaItemError,
    },

    #[error("Item id {0} appears more than once")]
    DuplicateId(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPolicy {
    pub max_items: usize,
    pub max_file_size_bytes: u64,
    pub max_file_name_len: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for GalleryPolicy {
    fn default() -> Self {
        Self {
            max_items: Self::DEFAULT_MAX_ITEMS,
            max_file_size_bytes: Self::DEFAULT_MAX_FILE_SIZE_BYTES,
            max_file_name_len: Self::DEFAULT_MAX_FILE_NAME_LEN,
            allowed_mime_types: Self::DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl GalleryPolicy {
    pub const DEFAULT_MAX_ITEMS: usize = 10;
    pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024; // 5MB
    pub const DEFAULT_MAX_FILE_NAME_LEN: usize = 255;
    pub const DEFAULT_ALLOWED_MIME_TYPES: &'static [&'static str] =
        &["image/jpeg", "image/png", "image/webp"];

    /// Load policy from `GALLERY_*` env vars, falling back to the defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, PolicyConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup (no env
    /// reads in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PolicyConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_items = match read("GALLERY_MAX_ITEMS") {
            Some(raw) => parse_positive::<usize>("GALLERY_MAX_ITEMS", &raw)?,
            None => defaults.max_items,
        };
        let max_file_size_bytes = match read("GALLERY_MAX_FILE_SIZE_BYTES") {
            Some(raw) => parse_positive::<u64>("GALLERY_MAX_FILE_SIZE_BYTES", &raw)?,
            None => defaults.max_file_size_bytes,
        };
        let max_file_name_len = match read("GALLERY_MAX_FILE_NAME_LEN") {
            Some(raw) => parse_positive::<usize>("GALLERY_MAX_FILE_NAME_LEN", &raw)?,
            None => defaults.max_file_name_len,
        };
        let allowed_mime_types = match read("GALLERY_ALLOWED_MIME_TYPES") {
            Some(raw) => {
                let types: Vec<String> = raw
                    .split(',')
                    .map(|m| m.trim().to_ascii_lowercase())
                    .filter(|m| !m.is_empty())
                    .collect();
                if types.is_empty() {
                    return Err(PolicyConfigError::Empty("GALLERY_ALLOWED_MIME_TYPES"));
                }
                types
            }
            None => defaults.allowed_mime_types,
        };

        Ok(Self {
            max_items,
            max_file_size_bytes,
            max_file_name_len,
            allowed_mime_types,
        })
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }

    /// Largest json body an upload request can legitimately carry: a full
    /// batch base64 encoded, plus room for the collection and field names.
    pub fn request_body_limit(&self) -> usize {
        const ENVELOPE_BYTES: usize = 64 * 1024;
        let per_file = usize::try_from(self.max_file_size_bytes).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.max_items)
            .saturating_mul(4)
            / 3
            + ENVELOPE_BYTES
    }

    /// Checks one file against the policy. Order of checks: name, emptiness,
    /// mime allowlist, mime/extension consistency, size.
    pub fn check_file(&self, file: &UploadCandidate) -> Result<(), FileValidationError> {
        let name = sanitize_basename(&file.file_name, self.max_file_name_len)?;

        if file.bytes.is_empty() {
            return Err(FileValidationError::EmptyFile);
        }

        let mime_type = file.mime_type.trim().to_ascii_lowercase();
        if !self.accepts_mime(&mime_type) {
            return Err(FileValidationError::UnsupportedMimeType(
                file.mime_type.clone(),
            ));
        }

        if let Some(ext) = ext_lower(name) {
            if let Some(expected) = extensions_for_mime(&mime_type) {
                if !expected.contains(&ext.as_str()) {
                    return Err(FileValidationError::MimeExtensionMismatch { mime_type, ext });
                }
            }
        }

        if file.size_bytes() > self.max_file_size_bytes {
            return Err(FileValidationError::FileTooLarge {
                max_bytes: self.max_file_size_bytes,
                actual_bytes: file.size_bytes(),
            });
        }

        Ok(())
    }

    /// Checks a whole collection coming from outside: size, urls and id
    /// uniqueness. Orders are not checked, callers renumber anyway.
    pub fn check_items(&self, items: &[MediaItem]) -> Result<(), CollectionValidationError> {
        if items.len() > self.max_items {
            return Err(CollectionValidationError::TooManyItems {
                max_items: self.max_items,
                actual: items.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            validate_media_url(&item.url)
                .map_err(|reason| CollectionValidationError::InvalidItem { index, reason })?;

            if let Some(id) = item.id {
                if !seen.insert(id) {
                    return Err(CollectionValidationError::DuplicateId(id));
                }
            }
        }

        Ok(())
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, PolicyConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(PolicyConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn sanitize_basename(file_name: &str, max_len: usize) -> Result<&str, FileValidationError> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or(FileValidationError::InvalidFileName)?;

    if base.is_empty() || base.len() > max_len {
        return Err(FileValidationError::InvalidFileName);
    }

    // path-like input
    if base != file_name {
        return Err(FileValidationError::InvalidFileName);
    }

    if base.chars().any(|c| c.is_control()) {
        return Err(FileValidationError::InvalidFileName);
    }

    Ok(base)
}

/// Lowercased extension of `file_name`, if it has one.
pub fn ext_lower(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
}

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
const PNG_EXTENSIONS: &[&str] = &["png"];
const WEBP_EXTENSIONS: &[&str] = &["webp"];
const GIF_EXTENSIONS: &[&str] = &["gif"];
const AVIF_EXTENSIONS: &[&str] = &["avif"];

/// File extensions a known image mime type may carry.
pub fn extensions_for_mime(mime_type: &str) -> Option<&'static [&'static str]> {
    match mime_type {
        "image/jpeg" => Some(JPEG_EXTENSIONS),
        "image/png" => Some(PNG_EXTENSIONS),
        "image/webp" => Some(WEBP_EXTENSIONS),
        "image/gif" => Some(GIF_EXTENSIONS),
        "image/avif" => Some(AVIF_EXTENSIONS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn png(name: &str, size: usize) -> UploadCandidate {
        UploadCandidate::new(name, "image/png", vec![1u8; size])
    }

    #[test]
    fn test_request_body_limit_covers_full_base64_batch() {
        let policy = GalleryPolicy::default();

        let full_batch = policy.max_items * policy.max_file_size_bytes as usize;
        assert!(policy.request_body_limit() > full_batch * 4 / 3);
    }

    #[test]
    fn test_from_lookup_uses_defaults_when_unset() {
        let policy = GalleryPolicy::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(policy, GalleryPolicy::default());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let policy = GalleryPolicy::from_lookup(lookup_from(&[
            ("GALLERY_MAX_ITEMS", "5"),
            ("GALLERY_MAX_FILE_SIZE_BYTES", "1024"),
            ("GALLERY_ALLOWED_MIME_TYPES", "image/png, IMAGE/GIF"),
        ]))
        .unwrap();

        assert_eq!(policy.max_items, 5);
        assert_eq!(policy.max_file_size_bytes, 1024);
        assert_eq!(policy.allowed_mime_types, vec!["image/png", "image/gif"]);
        assert_eq!(
            policy.max_file_name_len,
            GalleryPolicy::DEFAULT_MAX_FILE_NAME_LEN
        );
    }

    #[test]
    fn test_from_lookup_rejects_zero_and_garbage() {
        let err = GalleryPolicy::from_lookup(lookup_from(&[("GALLERY_MAX_ITEMS", "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            PolicyConfigError::InvalidValue {
                key: "GALLERY_MAX_ITEMS",
                value: "0".to_string()
            }
        );

        let err =
            GalleryPolicy::from_lookup(lookup_from(&[("GALLERY_MAX_FILE_SIZE_BYTES", "big")]))
                .unwrap_err();
        assert!(matches!(err, PolicyConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_lookup_rejects_empty_mime_list() {
        let err = GalleryPolicy::from_lookup(lookup_from(&[("GALLERY_ALLOWED_MIME_TYPES", " , ")]))
            .unwrap_err();
        assert_eq!(err, PolicyConfigError::Empty("GALLERY_ALLOWED_MIME_TYPES"));
    }

    #[test]
    fn test_check_file_accepts_valid_png() {
        let policy = GalleryPolicy::default();
        assert_eq!(policy.check_file(&png("cat.png", 10)), Ok(()));
    }

    #[test]
    fn test_check_file_accepts_missing_extension() {
        let policy = GalleryPolicy::default();
        assert_eq!(policy.check_file(&png("clipboard", 10)), Ok(()));
    }

    #[test]
    fn test_check_file_rejects_path_like_names() {
        let policy = GalleryPolicy::default();
        for name in ["../cat.png", "dir/cat.png", "", "ca\u{0007}t.png"] {
            assert_eq!(
                policy.check_file(&png(name, 10)),
                Err(FileValidationError::InvalidFileName),
                "name {name:?}"
            );
        }
    }

    #[test]
    fn test_check_file_rejects_empty_file() {
        let policy = GalleryPolicy::default();
        assert_eq!(
            policy.check_file(&png("cat.png", 0)),
            Err(FileValidationError::EmptyFile)
        );
    }

    #[test]
    fn test_check_file_rejects_unsupported_mime() {
        let policy = GalleryPolicy::default();
        let file = UploadCandidate::new("doc.pdf", "application/pdf", vec![1]);
        assert_eq!(
            policy.check_file(&file),
            Err(FileValidationError::UnsupportedMimeType(
                "application/pdf".to_string()
            ))
        );
    }

    #[test]
    fn test_check_file_rejects_mime_extension_mismatch() {
        let policy = GalleryPolicy::default();
        let file = UploadCandidate::new("cat.jpg", "image/png", vec![1]);
        assert_eq!(
            policy.check_file(&file),
            Err(FileValidationError::MimeExtensionMismatch {
                mime_type: "image/png".to_string(),
                ext: "jpg".to_string()
            })
        );
    }

    #[test]
    fn test_check_file_rejects_oversized() {
        let policy = GalleryPolicy {
            max_file_size_bytes: 4,
            ..GalleryPolicy::default()
        };
        assert_eq!(
            policy.check_file(&png("cat.png", 5)),
            Err(FileValidationError::FileTooLarge {
                max_bytes: 4,
                actual_bytes: 5
            })
        );
    }

    #[test]
    fn test_extensions_for_mime() {
        assert_eq!(extensions_for_mime("image/jpeg"), Some(&["jpg", "jpeg"][..]));
        assert_eq!(extensions_for_mime("image/tiff"), None);
    }
    fn stored(url: &str) -> MediaItem {
        MediaItem::persisted(Uuid::new_v4(), url, 0)
    }

    #[test]
    fn test_check_items_rejects_too_many() {
        let policy = GalleryPolicy::default().with_max_items(1);
        let items = vec![stored("https://cdn.test/a"), stored("https://cdn.test/b")];
        assert_eq!(
            policy.check_items(&items),
            Err(CollectionValidationError::TooManyItems {
                max_items: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_check_items_points_at_bad_url() {
        let policy = GalleryPolicy::default();
        let items = vec![stored("https://cdn.test/a"), stored("ftp://cdn.test/b")];
        assert_eq!(
            policy.check_items(&items),
            Err(CollectionValidationError::InvalidItem {
                index: 1,
                reason: MediaItemError::InvalidUrl("ftp://cdn.test/b".to_string())
            })
        );
    }

    #[test]
    fn test_check_items_rejects_duplicate_ids() {
        let policy = GalleryPolicy::default();
        let id = Uuid::new_v4();
        let items = vec![
            MediaItem::persisted(id, "https://cdn.test/a", 0),
            MediaItem::persisted(id, "https://cdn.test/b", 1),
        ];
        assert_eq!(
            policy.check_items(&items),
            Err(CollectionValidationError::DuplicateId(id))
        );
    }

    #[test]
    fn test_check_items_accepts_unsaved_items() {
        let policy = GalleryPolicy::default();
        let items = vec![
            MediaItem::accepted("https://cdn.test/a").unwrap(),
            MediaItem::accepted("https://cdn.test/a").unwrap(),
        ];
        assert!(policy.check_items(&items).is_ok());
    }
}
