/// Tribe synchronization store.
///
/// Holds the authoritative in-memory chat collections and mirrors the
/// durable subset into a key-value blob store after each mutation.

pub mod blob;
pub mod db;
pub mod migrations;
pub mod queries;
pub mod state;
pub mod store;

use thiserror::Error;

pub use blob::{BlobStore, MemoryBlobStore};
pub use db::SqliteBlobStore;
pub use state::{Busy, BusyFlags, ChatState, SyncKind};
pub use store::{ChatStore, STORAGE_KEY};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not encode chat state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("blob store write failed: {0}")]
    Backend(#[from] anyhow::Error),
}
