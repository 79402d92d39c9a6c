//! # Attachment Storage
//!
//! Content-addressed blob store for files attached to compliance records
//! (certificates, signed policies, DPIA exports). The SHA-256 hex digest of
//! the bytes is the object key; record fields reference the digest, so the
//! same file attached to many records is stored once.
//!
//! ## Layout
//!
//! `{root}/{d[0..2]}/{digest}` — a two-character fan-out directory keeps any
//! single directory from growing unboundedly.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::error::StoreError;

/// Filesystem-backed, content-addressed attachment store.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// Open (or lazily create) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store a blob and return its hex digest. Writing an already-stored
    /// blob is a no-op that returns the same digest.
    pub async fn put(&self, bytes: &[u8]) -> Result<String, StoreError> {
        let digest = hex::encode(Sha256::digest(bytes));
        let path = self.blob_path(&digest);
        if fs::try_exists(&path).await? {
            return Ok(digest);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Write to a temp name then rename, so a crash never leaves a
        // half-written blob under its final digest name.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!(digest = %digest, size = bytes.len(), "stored attachment");
        Ok(digest)
    }

    /// Fetch a blob by digest. `None` when the digest is unknown.
    pub async fn get(&self, digest: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if !is_hex_digest(digest) {
            return Ok(None);
        }
        let path = self.blob_path(digest);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn blob_path(&self, digest: &str) -> PathBuf {
        let fanout = &digest[..2.min(digest.len())];
        self.root.join(fanout).join(digest)
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A valid object key is exactly a lowercase SHA-256 hex digest. Anything
/// else (path fragments in particular) never reaches the filesystem.
fn is_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        let digest = store.put(b"policy v2 (signed)").await.unwrap();
        assert_eq!(digest.len(), 64);
        let bytes = store.get(&digest).await.unwrap().unwrap();
        assert_eq!(bytes, b"policy v2 (signed)");
    }

    #[tokio::test]
    async fn identical_content_shares_one_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        let a = store.put(b"same bytes").await.unwrap();
        let b = store.put(b"same bytes").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn unknown_digest_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        let missing = "a".repeat(64);
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_fragments_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        assert!(store.get("../../etc/passwd").await.unwrap().is_none());
    }
}
