//! Transient binary handles
//!
//! Downloaded badge images are registered here and addressed by a
//! `blob:iamc/<n>` URL while someone displays them. The entry lives exactly as
//! long as its [`BlobHandle`]: dropping the handle revokes the URL, on every
//! exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

const URL_PREFIX: &str = "blob:iamc/";

#[derive(Debug, Default)]
struct Registry {
    next_id: AtomicU64,
    blobs: DashMap<u64, Arc<Blob>>,
}

#[derive(Debug)]
pub struct Blob {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    registry: Arc<Registry>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, bytes: Vec<u8>, mime: &'static str) -> BlobHandle {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let blob = Arc::new(Blob { mime, bytes });
        self.registry.blobs.insert(id, blob.clone());
        tracing::trace!(id, size = blob.bytes.len(), "blob registered");
        BlobHandle {
            id,
            blob,
            registry: self.registry.clone(),
        }
    }

    /// Look up a live URL. Revoked URLs resolve to `None`.
    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        let id: u64 = url.strip_prefix(URL_PREFIX)?.parse().ok()?;
        self.registry.blobs.get(&id).map(|b| b.value().clone())
    }

    /// Number of handles not yet released
    pub fn live_count(&self) -> usize {
        self.registry.blobs.len()
    }
}

/// Owner of one registered blob; revokes on drop
#[derive(Debug)]
pub struct BlobHandle {
    id: u64,
    blob: Arc<Blob>,
    registry: Arc<Registry>,
}

impl BlobHandle {
    pub fn url(&self) -> String {
        format!("{URL_PREFIX}{}", self.id)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.blob.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.blob.mime
    }

    /// Explicit release; same as dropping the handle
    pub fn revoke(self) {}
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        self.registry.blobs.remove(&self.id);
        tracing::trace!(id = self.id, "blob revoked");
    }
}
