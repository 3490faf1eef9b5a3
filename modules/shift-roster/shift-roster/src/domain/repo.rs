//! Document store abstraction.

use async_trait::async_trait;

/// Generic keyed JSON document store.
///
/// Documents are addressed by `(collection, id)`. Implementations handle
/// the actual storage mechanism (in-memory, remote service, etc.).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document, `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<serde_json::Value>>;

    /// Replaces a document, creating it when absent.
    async fn set(&self, collection: &str, id: &str, doc: serde_json::Value) -> anyhow::Result<()>;

    /// Shallow-merges the top-level fields of `patch` into a document,
    /// creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `patch` is not a JSON object.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: serde_json::Value,
    ) -> anyhow::Result<()>;
}
