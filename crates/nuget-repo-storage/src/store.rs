//! The object-safe key-addressed blob store interface.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

/// A key→bytes abstraction with the operations the ingestion core needs:
/// existence checks, reads, writes, prefix listing, and an atomic rename.
///
/// This trait deliberately does not carry the exclusive-scope mutator from
/// spec.md §6 (`exclusively`) as a method: that operation is generic over an
/// arbitrary closure's return type, which is not object-safe, and every
/// caller needs `Arc<dyn Storage>` for type erasure across the registry and
/// API crates. The exclusive-scope mechanism lives instead in
/// [`crate::lock::KeyedExclusive`], composed alongside a `Storage` trait
/// object rather than being part of it.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Read the full contents at `key`. Fails with `NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Write `value` at `key`, replacing any existing content.
    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError>;

    /// All keys with the given prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Move `src` to `dst`, atomically where the backing store allows it.
    async fn move_key(&self, src: &str, dst: &str) -> Result<(), StorageError>;

    /// Best-effort delete; callers treat failures as non-fatal cleanup.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
