// ayala-sync/src/cache.rs
// 本地快照缓存 - 每个集合一个 JSON 文件

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::{SyncResult, SyncedStore, document};

/// 本地快照存储
///
/// Keeps the last known value of a collection on disk so a device that boots
/// offline still shows yesterday's floor instead of the seed data.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// 创建快照存储 (`{dir}/{name}.json`)
    pub fn new(dir: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            path: dir.into().join(format!("{name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 确保目录存在
    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// 读取快照；文件缺失或损坏时返回 None
    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read cache");
                return None;
            }
        };
        let doc = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt cache ignored");
                return None;
            }
        };
        match document::revive(doc) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Stale cache shape ignored");
                None
            }
        }
    }

    /// 保存快照 (写临时文件后重命名)
    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> SyncResult<()> {
        self.ensure_dir()?;
        let doc = document::sanitize(value)?;
        let content = serde_json::to_string_pretty(&doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// 在阻塞线程池中保存快照
    pub async fn save_in_background<T>(&self, value: Arc<T>) -> SyncResult<()>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.save(value.as_ref()))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?
    }

    /// 删除快照
    pub fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Save every change of `store` until it shuts down.
    pub fn mirror<T>(&self, store: &SyncedStore<T>) -> JoinHandle<()>
    where
        T: Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static,
    {
        let cache = self.clone();
        let mut rx = store.subscribe();
        let shutdown = store.shutdown_token();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                let value = rx.borrow_and_update().clone();
                if let Err(e) = cache.save_in_background(value).await {
                    tracing::warn!(path = %cache.path.display(), error = %e, "Failed to write cache");
                }
            }
            // Last state wins on the way out
            let value = rx.borrow().clone();
            if let Err(e) = cache.save_in_background(value).await {
                tracing::warn!(path = %cache.path.display(), error = %e, "Failed to write cache");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"), "tables");

        assert_eq!(cache.load::<Vec<String>>(), None);
        cache.save(&vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(
            cache.load::<Vec<String>>(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        cache.clear().unwrap();
        assert_eq!(cache.load::<Vec<String>>(), None);
    }

    #[tokio::test]
    async fn test_background_save() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("nested"), "users");

        cache
            .save_in_background(Arc::new(vec!["waiter".to_string()]))
            .await
            .unwrap();
        assert_eq!(cache.load::<Vec<String>>(), Some(vec!["waiter".to_string()]));
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path(), "menus");
        fs::write(cache.path(), "{ not json").unwrap();
        assert_eq!(cache.load::<Vec<String>>(), None);
    }
}
