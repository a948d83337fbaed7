//! Image storage backends.
//!
//! Uploaded practice images go to one of two interchangeable backends chosen
//! by configuration: a local filesystem directory (served back under
//! `/uploads`) or a generic HTTP object store. Callers only ever see the
//! opaque path/URL a store hands back.

use std::path::PathBuf;

use bytes::Bytes;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};

/// Image file extensions accepted for upload.
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];

/// True when the lowercased extension is an accepted image type.
#[must_use]
pub fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
}

/// Extract the extension from an uploaded file name.
#[must_use]
pub fn file_extension(filename: &str) -> Option<&str> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
}

/// Image store abstraction over the configured backends.
#[derive(Debug)]
pub enum ImageStore {
    /// Local filesystem directory.
    Local(LocalStore),
    /// HTTP object storage.
    Remote(RemoteStore),
}

impl ImageStore {
    /// Build the store matching the configuration.
    pub async fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        match config.backend {
            StorageBackend::Local => {
                let store = LocalStore::new(PathBuf::from(&config.upload_dir)).await?;
                Ok(Self::Local(store))
            }
            StorageBackend::Remote => {
                let store = RemoteStore::new(config)?;
                Ok(Self::Remote(store))
            }
        }
    }

    /// Store an image and return its retrievable path/URL.
    pub async fn store(&self, extension: &str, data: Bytes) -> anyhow::Result<String> {
        let name = format!("practice-{}.{}", Uuid::new_v4(), extension.to_ascii_lowercase());
        match self {
            Self::Local(store) => store.store(&name, data).await,
            Self::Remote(store) => store.store(&name, data).await,
        }
    }

    /// Directory served under `/uploads`, when the backend is local.
    #[must_use]
    pub fn local_dir(&self) -> Option<&std::path::Path> {
        match self {
            Self::Local(store) => Some(&store.dir),
            Self::Remote(_) => None,
        }
    }
}

/// Filesystem-backed image store.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Create the store, ensuring the upload directory exists.
    pub async fn new(dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    async fn store(&self, name: &str, data: Bytes) -> anyhow::Result<String> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, &data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Stored image locally");
        Ok(format!("/uploads/{name}"))
    }
}

/// Object-storage-backed image store.
///
/// Writes via `PUT {endpoint}/{bucket}/{name}` with an optional bearer token,
/// which covers the common S3-compatible and hosted-blob front doors without
/// tying the service to one vendor SDK.
#[derive(Debug)]
pub struct RemoteStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    access_token: Option<String>,
}

impl RemoteStore {
    /// Create the store from configuration.
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| anyhow::anyhow!("storage.endpoint is required for the remote backend"))?;
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| anyhow::anyhow!("storage.bucket is required for the remote backend"))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            access_token: config.access_token.clone(),
        })
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, name)
    }

    async fn store(&self, name: &str, data: Bytes) -> anyhow::Result<String> {
        let url = self.object_url(name);
        let mut request = self.client.put(&url).body(data);
        if let Some(ref token) = self.access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("object storage rejected upload ({status}): {url}");
        }

        tracing::debug!(url = %url, "Stored image remotely");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert!(is_allowed_extension("png"));
        assert!(is_allowed_extension("JPG"));
        assert!(is_allowed_extension("jpeg"));
        assert!(!is_allowed_extension("gif"));
        assert!(!is_allowed_extension("svg"));
        assert!(!is_allowed_extension(""));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("sketch.PNG"), Some("PNG"));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(file_extension("no_extension"), None);
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(dir.path().to_path_buf())
            .await
            .expect("create store");

        let path = store
            .store("practice-test.png", Bytes::from_static(b"not a real png"))
            .await
            .expect("store");

        assert_eq!(path, "/uploads/practice-test.png");
        let on_disk = tokio::fs::read(dir.path().join("practice-test.png"))
            .await
            .expect("read back");
        assert_eq!(on_disk, b"not a real png");
    }

    #[test]
    fn test_remote_store_requires_endpoint() {
        let config = StorageConfig {
            backend: StorageBackend::Remote,
            ..StorageConfig::default()
        };
        assert!(RemoteStore::new(&config).is_err());
    }
}
