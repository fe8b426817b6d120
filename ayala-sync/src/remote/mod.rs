//! Remote key-path store boundary
//!
//! The store is a JSON tree addressed by slash-separated paths
//! (`tables`, `menus`, `users`). Implementations must deliver the current
//! value as the first item of every watch, followed by one item per change.

mod http;
mod memory;
pub mod sse;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::SyncResult;

/// Stream of path values; `None` means the path holds nothing.
pub type RemoteWatch = BoxStream<'static, SyncResult<Option<Value>>>;

/// Hosted realtime key-path store
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Read the current value at `path`.
    async fn read(&self, path: &str) -> SyncResult<Option<Value>>;

    /// Replace the value at `path` (full overwrite, no merge).
    async fn write(&self, path: &str, value: Value) -> SyncResult<()>;

    /// Subscribe to `path`: current value first, then every change.
    async fn watch(&self, path: &str) -> SyncResult<RemoteWatch>;
}

/// Join a root prefix and a collection name into a store path.
pub fn join_path(root: &str, name: &str) -> String {
    let root = root.trim_matches('/');
    let name = name.trim_matches('/');
    if root.is_empty() {
        name.to_string()
    } else {
        format!("{root}/{name}")
    }
}

/// JSON `null` is the remote's "nothing here".
pub(crate) fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "tables"), "tables");
        assert_eq!(join_path("/", "tables"), "tables");
        assert_eq!(join_path("ayala/", "/menus"), "ayala/menus");
    }
}
