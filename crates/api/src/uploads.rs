//! File upload storage.

use std::path::PathBuf;

use async_trait::async_trait;
use invito_core::upload::stored_filename;

/// Stores uploaded bytes and returns the URL they are served at.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(&self, bytes: &[u8], filename: &str) -> std::io::Result<String>;
}

/// Writes uploads into a local directory that the server also serves
/// statically under `url_prefix`.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalUploadStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, bytes: &[u8], filename: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = stored_filename(filename, chrono::Utc::now().timestamp_millis());
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        tracing::info!(file = %name, size = bytes.len(), "Stored upload");
        Ok(format!("{}/{name}", self.url_prefix.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_file_and_returns_prefixed_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path(), "/uploads");

        let url = store.store(b"hello", "my photo.png").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-myphoto.png"));

        let name = url.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let store = LocalUploadStore::new(&nested, "/uploads");
        store.store(b"x", "f.txt").await.unwrap();
        assert!(nested.is_dir());
    }
}
