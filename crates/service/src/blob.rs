//! Blob store collaborator: opaque payloads addressed by string key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{config::Region, primitives::ByteStream, Client};
use bytes::Bytes;
use configs::{BlobBackend, BlobConfig};
use thiserror::Error;
use tracing::info;

use crate::store::timed;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError>;
    /// Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// Build the configured backend.
pub async fn from_config(cfg: &BlobConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match cfg.backend {
        BlobBackend::S3 => {
            let store = S3BlobStore::connect(&cfg.bucket, &cfg.region, cfg.endpoint.as_deref()).await;
            info!(bucket = %cfg.bucket, region = %cfg.region, "s3 blob store ready");
            Ok(Arc::new(store))
        }
        BlobBackend::Local => {
            common::env::ensure_blob_root(&cfg.local_root).await?;
            info!(root = %cfg.local_root, "local blob store ready");
            Ok(Arc::new(LocalBlobStore::new(&cfg.local_root)))
        }
    }
}

pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Credentials come from the default AWS provider chain. A custom endpoint switches
    /// to path-style addressing for S3-compatible servers.
    pub async fn connect(bucket: &str, region: &str, endpoint: Option<&str>) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(url) = endpoint {
            builder = builder.endpoint_url(url).force_path_style(true);
        }
        Self { client: Client::from_conf(builder.build()), bucket: bucket.to_string() }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
        let req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send();
        timed("blob.put", req)
            .await
            .map(|_| ())
            .map_err(|e| BlobError::Unavailable(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let req = self.client.delete_object().bucket(&self.bucket).key(key).send();
        timed("blob.delete", req)
            .await
            .map(|_| ())
            .map_err(|e| BlobError::Unavailable(e.to_string()))
    }
}

/// Filesystem backend for development; keys map to paths under `root`.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), BlobError> {
        let path = self.path_for(key);
        timed("blob.put", async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &bytes).await
        })
        .await
        .map_err(|e| BlobError::Unavailable(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key);
        match timed("blob.delete", tokio::fs::remove_file(&path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Unavailable(e.to_string())),
        }
    }
}

/// In-memory store with failure injection for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryBlobStore {
        objects: Mutex<HashMap<String, (Bytes, String)>>, // key -> (payload, content type)
        fail_puts: AtomicBool,
        fail_deletes: AtomicBool,
    }

    impl InMemoryBlobStore {
        pub fn fail_puts(&self, on: bool) { self.fail_puts.store(on, Ordering::SeqCst); }
        pub fn fail_deletes(&self, on: bool) { self.fail_deletes.store(on, Ordering::SeqCst); }
        pub fn contains(&self, key: &str) -> bool { self.objects.lock().unwrap().contains_key(key) }
        pub fn len(&self) -> usize { self.objects.lock().unwrap().len() }
        pub fn is_empty(&self) -> bool { self.len() == 0 }
        pub fn content_type(&self, key: &str) -> Option<String> {
            self.objects.lock().unwrap().get(key).map(|(_, ct)| ct.clone())
        }
    }

    #[async_trait]
    impl BlobStore for InMemoryBlobStore {
        async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(BlobError::Unavailable("injected put failure".into()));
            }
            self.objects.lock().unwrap().insert(key.to_string(), (bytes, content_type.to_string()));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), BlobError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(BlobError::Unavailable("injected delete failure".into()));
            }
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_store_writes_and_deletes_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.put("1/2/abc-cat.png", Bytes::from_static(b"png"), "image/png").await.unwrap();
        let written = tokio::fs::read(dir.path().join("1/2/abc-cat.png")).await.unwrap();
        assert_eq!(written, b"png");

        store.delete("1/2/abc-cat.png").await.unwrap();
        assert!(tokio::fs::metadata(dir.path().join("1/2/abc-cat.png")).await.is_err());
        // second delete is a no-op
        store.delete("1/2/abc-cat.png").await.unwrap();
    }

    #[tokio::test]
    async fn mock_store_injects_failures() {
        let store = mock::InMemoryBlobStore::default();
        store.fail_puts(true);
        assert!(store.put("k", Bytes::new(), "image/png").await.is_err());
        assert!(store.is_empty());
        store.fail_puts(false);
        store.put("k", Bytes::new(), "image/png").await.unwrap();
        store.fail_deletes(true);
        assert!(store.delete("k").await.is_err());
        assert!(store.contains("k"));
    }
}
