//! 持久化键值存储
//!
//! 替代浏览器 `localStorage` 的最小接口: 字符串键 -> 字符串值。
//! 不提供事务保证,多个实例并发写入时以最后一次写入为准。

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::StorageError;

/// 与既有客户端数据兼容的存储键,名称不可更改
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const ADMIN_TOKEN: &str = "admin_token";
    pub const ADMIN_USER: &str = "admin_user";
    pub const APPLICATION_ID: &str = "application_id";
    pub const LOGS: &str = "app_logs";
    pub const SESSION: &str = "dogrun_session";
}

/// 键值存储抽象
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 内存存储
///
/// 可选的字节配额用于模拟浏览器存储写满的情况。
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有键与值的总字节数不得超过 `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn used_bytes(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if let Some(limit) = self.quota_bytes {
            let current = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let required = used_bytes(&entries) - current + key.len() + value.len();
            if required > limit {
                return Err(StorageError::QuotaExceeded { required, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// 文件存储
///
/// 所有键保存在同一个JSON文件中,每次写入先写临时文件再原子替换。
/// 文件损坏时按空存储处理并告警,不阻止应用启动。
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// 文件名固定为 `storage.json`
    pub const FILE_NAME: &'static str = "storage.json";

    /// 打开(或创建)目录下的存储文件
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::FILE_NAME);

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Storage file is corrupt, starting empty"
                    );
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "File store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    /// 写盘成功后才更新内存,失败时内存与磁盘保持一致
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("ab", "12345678").unwrap();
        let err = store.set("c", "x").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 10, .. }));

        // 覆盖同一个键只计算差值
        store.set("ab", "87654321").unwrap();
        assert_eq!(store.get("ab").unwrap().as_deref(), Some("87654321"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set(keys::ACCESS_TOKEN, "abc").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let store = FileStore::open(&store_dir).unwrap();
        store.set(keys::ACCESS_TOKEN, "abc").unwrap();

        fs::remove_dir_all(&store_dir).unwrap();

        assert!(store.set(keys::ACCESS_TOKEN, "xyz").is_err());
        assert!(store.remove(keys::ACCESS_TOKEN).is_err());
        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FileStore::FILE_NAME), "{not json").unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }
}
