use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::multimedia::application::ports::outgoing::cloud_storage::{
    ObjectStore, ObjectStoreError, StoreObject,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ObjectStoreConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to build http client: {0}")]
    Client(String),
}

/// Where objects are written and how their public url is formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub api_key: String,
    pub public_base_url: Url,
    pub timeout: Duration,
}

impl ObjectStoreConfig {
    pub fn from_env() -> Result<Self, ObjectStoreConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ObjectStoreConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ObjectStoreConfigError::Missing(key))
        };
        let http_url = |key: &'static str, raw: String| match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            _ => Err(ObjectStoreConfigError::Invalid { key, value: raw }),
        };

        let endpoint = http_url("OBJECT_STORE_ENDPOINT", required("OBJECT_STORE_ENDPOINT")?)?;
        let bucket = required("OBJECT_STORE_BUCKET")?;
        if bucket.contains('/') {
            return Err(ObjectStoreConfigError::Invalid {
                key: "OBJECT_STORE_BUCKET",
                value: bucket,
            });
        }
        let api_key = required("OBJECT_STORE_API_KEY")?;
        let public_base_url =
            http_url("OBJECT_STORE_PUBLIC_URL", required("OBJECT_STORE_PUBLIC_URL")?)?;

        let timeout_secs = match lookup("OBJECT_STORE_TIMEOUT_SECS").filter(|v| !v.trim().is_empty())
        {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ObjectStoreConfigError::Invalid {
                        key: "OBJECT_STORE_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            bucket,
            api_key,
            public_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            self.bucket,
            path
        )
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.as_str().trim_end_matches('/'),
            self.bucket,
            path
        )
    }
}

/// Failure as seen by the http client: a status when the server answered,
/// none when the request never completed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TransportError {
    status: Option<u16>,
    message: String,
}

fn map_transport_error(err: TransportError) -> ObjectStoreError {
    match err.status {
        Some(401) | Some(403) => ObjectStoreError::AccessDenied,
        Some(404) => ObjectStoreError::BucketNotFound,
        Some(409) => ObjectStoreError::Conflict,
        Some(status) => ObjectStoreError::Rejected(format!("{}: {}", status, err.message)),
        None => ObjectStoreError::NetworkInterrupted,
    }
}

/// Internal seam so the adapter is testable without a live endpoint.
#[async_trait]
trait ObjectClient: Send + Sync {
    async fn post_object(
        &self,
        url: &str,
        api_key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TransportError>;
}

/// Production adapter: implements the ObjectStore port over plain http.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: Arc<dyn ObjectClient>,
    config: Arc<ObjectStoreConfig>,
}

impl HttpObjectStore {
    pub fn new(config: ObjectStoreConfig) -> Result<Self, ObjectStoreConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ObjectStoreConfigError::Client(e.to_string()))?;

        tracing::info!(
            "Object store client ready (bucket={}, timeout={}s)",
            config.bucket,
            config.timeout.as_secs()
        );

        Ok(Self {
            client: Arc::new(ReqwestObjectClient { http }),
            config: Arc::new(config),
        })
    }

    #[cfg(test)]
    fn with_client(client: Arc<dyn ObjectClient>, config: ObjectStoreConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, object: StoreObject) -> Result<String, ObjectStoreError> {
        let path = object.destination_path().to_string();
        let content_type = object.content_type().to_string();
        let upload_url = self.config.upload_url(&path);

        self.client
            .post_object(
                &upload_url,
                &self.config.api_key,
                &content_type,
                object.into_bytes(),
            )
            .await
            .map_err(|e| {
                tracing::warn!("Object upload to {} failed: {}", upload_url, e.message);
                map_transport_error(e)
            })?;

        Ok(self.config.public_url(&path))
    }
}

// ============================================================================
// Real http client (reqwest)
// ============================================================================

struct ReqwestObjectClient {
    http: reqwest::Client,
}

#[async_trait]
impl ObjectClient for ReqwestObjectClient {
    async fn post_object(
        &self,
        url: &str,
        api_key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), TransportError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| TransportError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(TransportError {
            status: Some(status.as_u16()),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct PostCall {
        url: String,
        api_key: String,
        content_type: String,
        bytes: Vec<u8>,
    }

    struct FakeObjectClient {
        last_call: Mutex<Option<PostCall>>,
        result: Mutex<Result<(), TransportError>>,
    }

    impl FakeObjectClient {
        fn returning(result: Result<(), TransportError>) -> Arc<Self> {
            Arc::new(Self {
                last_call: Mutex::new(None),
                result: Mutex::new(result),
            })
        }
    }

    #[async_trait]
    impl ObjectClient for FakeObjectClient {
        async fn post_object(
            &self,
            url: &str,
            api_key: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> Result<(), TransportError> {
            *self.last_call.lock().unwrap() = Some(PostCall {
                url: url.to_string(),
                api_key: api_key.to_string(),
                content_type: content_type.to_string(),
                bytes,
            });
            self.result.lock().unwrap().clone()
        }
    }

    fn env_pairs() -> HashMap<String, String> {
        hashmap! {
            "OBJECT_STORE_ENDPOINT".to_string() => "https://store.test/storage/v1/".to_string(),
            "OBJECT_STORE_BUCKET".to_string() => "gallery".to_string(),
            "OBJECT_STORE_API_KEY".to_string() => "secret".to_string(),
            "OBJECT_STORE_PUBLIC_URL".to_string() => "https://cdn.test/public".to_string(),
        }
    }

    fn config() -> ObjectStoreConfig {
        let pairs = env_pairs();
        ObjectStoreConfig::from_lookup(|k| pairs.get(k).cloned()).unwrap()
    }

    fn object() -> StoreObject {
        StoreObject::try_new(
            "project/p1/1-abc.png".to_string(),
            "image/png".to_string(),
            vec![1, 2, 3],
        )
        .unwrap()
    }

    fn http_error(status: u16) -> TransportError {
        TransportError {
            status: Some(status),
            message: "nope".to_string(),
        }
    }

    // -----------------------
    // config
    // -----------------------

    #[test]
    fn test_config_from_lookup_with_default_timeout() {
        let config = config();

        assert_eq!(config.bucket, "gallery");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.upload_url("a/b.png"),
            "https://store.test/storage/v1/object/gallery/a/b.png"
        );
        assert_eq!(
            config.public_url("a/b.png"),
            "https://cdn.test/public/gallery/a/b.png"
        );
    }

    #[test]
    fn test_config_missing_key() {
        let mut pairs = env_pairs();
        pairs.remove("OBJECT_STORE_API_KEY");

        let err = ObjectStoreConfig::from_lookup(|k| pairs.get(k).cloned()).unwrap_err();

        assert_eq!(err, ObjectStoreConfigError::Missing("OBJECT_STORE_API_KEY"));
    }

    #[test]
    fn test_config_rejects_non_http_endpoint() {
        let mut pairs = env_pairs();
        pairs.insert("OBJECT_STORE_ENDPOINT".into(), "ftp://store.test".into());

        let err = ObjectStoreConfig::from_lookup(|k| pairs.get(k).cloned()).unwrap_err();

        assert!(matches!(
            err,
            ObjectStoreConfigError::Invalid {
                key: "OBJECT_STORE_ENDPOINT",
                ..
            }
        ));
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let mut pairs = env_pairs();
        pairs.insert("OBJECT_STORE_TIMEOUT_SECS".into(), "0".into());

        let err = ObjectStoreConfig::from_lookup(|k| pairs.get(k).cloned()).unwrap_err();

        assert!(matches!(
            err,
            ObjectStoreConfigError::Invalid {
                key: "OBJECT_STORE_TIMEOUT_SECS",
                ..
            }
        ));
    }

    // -----------------------
    // upload
    // -----------------------

    #[tokio::test]
    async fn test_upload_posts_bytes_and_returns_public_url() {
        let client = FakeObjectClient::returning(Ok(()));
        let store = HttpObjectStore::with_client(client.clone(), config());

        let url = store.upload(object()).await.unwrap();

        assert_eq!(url, "https://cdn.test/public/gallery/project/p1/1-abc.png");
        let call = client.last_call.lock().unwrap().clone().unwrap();
        assert_eq!(
            call,
            PostCall {
                url: "https://store.test/storage/v1/object/gallery/project/p1/1-abc.png"
                    .to_string(),
                api_key: "secret".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            }
        );
    }

    #[tokio::test]
    async fn test_upload_maps_status_codes() {
        let cases = vec![
            (http_error(401), ObjectStoreError::AccessDenied),
            (http_error(403), ObjectStoreError::AccessDenied),
            (http_error(404), ObjectStoreError::BucketNotFound),
            (http_error(409), ObjectStoreError::Conflict),
            (
                http_error(500),
                ObjectStoreError::Rejected("500: nope".to_string()),
            ),
            (
                TransportError {
                    status: None,
                    message: "connection reset".to_string(),
                },
                ObjectStoreError::NetworkInterrupted,
            ),
        ];

        for (transport, expected) in cases {
            let store =
                HttpObjectStore::with_client(FakeObjectClient::returning(Err(transport)), config());
            let err = store.upload(object()).await.unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[test]
    fn test_new_builds_real_client() {
        assert!(HttpObjectStore::new(config()).is_ok());
    }
}
