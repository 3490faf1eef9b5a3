//! In-memory document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::domain::repo::DocumentStore;

type DocKey = (String, String);

/// In-memory document store keyed by `(collection, id)`.
///
/// Counts successful writes and can be switched to reject writes, which
/// lets tests observe debounce and failure behaviour.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<DocKey, Value>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document without counting it as a write.
    pub fn insert(&self, collection: &str, id: &str, doc: Value) {
        self.docs
            .write()
            .insert((collection.to_owned(), id.to_owned()), doc);
    }

    /// Current content of a document.
    #[must_use]
    pub fn snapshot(&self, collection: &str, id: &str) -> Option<Value> {
        self.docs
            .read()
            .get(&(collection.to_owned(), id.to_owned()))
            .cloned()
    }

    /// Makes every subsequent `set` / `update` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` / `update` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("document store unavailable: {collection}/{id}");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.snapshot(collection, id))
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> anyhow::Result<()> {
        self.check_writable(collection, id)?;
        self.insert(collection, id, doc);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> anyhow::Result<()> {
        self.check_writable(collection, id)?;
        let Value::Object(fields) = patch else {
            anyhow::bail!("update patch for {collection}/{id} must be an object");
        };

        let mut docs = self.docs.write();
        let doc = docs
            .entry((collection.to_owned(), id.to_owned()))
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        match doc {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        drop(docs);

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
