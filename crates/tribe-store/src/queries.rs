use anyhow::Result;
use rusqlite::OptionalExtension;

use crate::{BlobStore, SqliteBlobStore};

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let db = SqliteBlobStore::open_in_memory().unwrap();
        assert!(db.get("tribe").unwrap().is_none());

        db.set("tribe", b"{\"a\":1}").unwrap();
        assert_eq!(db.get("tribe").unwrap().unwrap(), b"{\"a\":1}");

        db.set("tribe", b"{}").unwrap();
        assert_eq!(db.get("tribe").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn survives_reopen() {
        let dir = std::env::temp_dir().join(format!("tribe_store_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cache.db");

        {
            let db = SqliteBlobStore::open(&path).unwrap();
            db.set("k", b"persisted").unwrap();
        }

        let db = SqliteBlobStore::open(&path).unwrap();
        assert_eq!(db.get("k").unwrap().unwrap(), b"persisted");

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
