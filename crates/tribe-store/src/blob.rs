use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

/// Durable key-value storage for serialized state blobs.
///
/// Calls are synchronous; implementations are expected to be fast local
/// stores (SQLite file, in-memory map).
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Process-local blob store. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| anyhow::anyhow!("Blob map lock poisoned: {}", e))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| anyhow::anyhow!("Blob map lock poisoned: {}", e))?;
        blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
