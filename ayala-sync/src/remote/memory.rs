//! In-process remote
//!
//! Backs local development and tests. One backend can be shared by several
//! device handles (see [`MemoryRemote::device`]); each handle has its own
//! connectivity switch so a single device can be taken offline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::broadcast;

use super::{RemoteStore, RemoteWatch, non_null};
use crate::{SyncError, SyncResult};

/// Broadcast capacity per path
const NOTIFY_CAPACITY: usize = 256;

struct Node {
    value: Option<Value>,
    tx: broadcast::Sender<Option<Value>>,
}

impl Node {
    fn empty() -> Self {
        let (tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self { value: None, tx }
    }
}

#[derive(Default)]
struct Backend {
    nodes: DashMap<String, Node>,
}

/// In-memory remote with per-device connectivity
#[derive(Clone, Default)]
pub struct MemoryRemote {
    backend: Arc<Backend>,
    offline: Arc<AtomicBool>,
}

impl std::fmt::Debug for MemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRemote")
            .field("paths", &self.backend.nodes.len())
            .field("offline", &self.is_offline())
            .finish()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Another device handle onto the same backend, initially online.
    pub fn device(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Toggle this handle's connectivity.
    ///
    /// While offline, reads and writes fail and watch notifications are dropped.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Stored value at `path`, regardless of connectivity.
    pub fn snapshot(&self, path: &str) -> Option<Value> {
        self.backend.nodes.get(path).and_then(|n| n.value.clone())
    }

    fn ensure_online(&self, path: &str) -> SyncResult<()> {
        if self.is_offline() {
            return Err(SyncError::Unavailable(format!("device offline ({path})")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn read(&self, path: &str) -> SyncResult<Option<Value>> {
        self.ensure_online(path)?;
        Ok(self.snapshot(path))
    }

    async fn write(&self, path: &str, value: Value) -> SyncResult<()> {
        self.ensure_online(path)?;
        let value = non_null(value);
        let mut node = self
            .backend
            .nodes
            .entry(path.to_string())
            .or_insert_with(Node::empty);
        node.value = value.clone();
        // No receivers is fine
        let _ = node.tx.send(value);
        Ok(())
    }

    async fn watch(&self, path: &str) -> SyncResult<RemoteWatch> {
        self.ensure_online(path)?;
        // Subscribe before reading so no write can fall between the two
        let (rx, current) = {
            let node = self
                .backend
                .nodes
                .entry(path.to_string())
                .or_insert_with(Node::empty);
            (node.tx.subscribe(), node.value.clone())
        };

        let offline = self.offline.clone();
        let path = path.to_string();
        let changes = futures::stream::unfold(rx, move |mut rx| {
            let offline = offline.clone();
            let path = path.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(value) if offline.load(Ordering::SeqCst) => {
                            tracing::debug!(path = %path, dropped = value.is_some(), "Offline: notification dropped");
                        }
                        Ok(value) => return Some((Ok(value), rx)),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(path = %path, skipped, "Watcher lagged; skipping to latest");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        });

        Ok(futures::stream::once(async move { Ok(current) })
            .chain(changes)
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_watch_yields_current_then_changes() {
        let remote = MemoryRemote::new();
        remote.write("tables", json!([1])).await.unwrap();

        let mut watch = remote.watch("tables").await.unwrap();
        assert_eq!(watch.next().await.unwrap().unwrap(), Some(json!([1])));

        remote.write("tables", json!([1, 2])).await.unwrap();
        assert_eq!(watch.next().await.unwrap().unwrap(), Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_null_write_clears_path() {
        let remote = MemoryRemote::new();
        remote.write("users", json!({"a": 1})).await.unwrap();
        remote.write("users", Value::Null).await.unwrap();
        assert_eq!(remote.read("users").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_offline_device_is_isolated() {
        let a = MemoryRemote::new();
        let b = a.device();

        b.set_offline(true);
        assert!(matches!(
            b.write("menus", json!([])).await,
            Err(SyncError::Unavailable(_))
        ));
        assert!(a.write("menus", json!(["x"])).await.is_ok());

        b.set_offline(false);
        assert_eq!(b.read("menus").await.unwrap(), Some(json!(["x"])));
    }
}
