use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::traits::HashStore;
use crate::errors::{BotError, BotResult};

/// SHA-256 hex digest of `content` with CRLF normalized to LF
pub fn content_digest(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash store persisted as a pretty-printed JSON object on disk
pub struct JsonHashStore {
    path: PathBuf,
    hashes: BTreeMap<String, String>,
}

impl JsonHashStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hashes: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    fn io_error(&self, source: std::io::Error) -> BotError {
        BotError::HashStore {
            path: self.path.clone(),
            source,
        }
    }
}

impl HashStore for JsonHashStore {
    fn load(&mut self) -> BotResult<()> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No hash store yet, starting empty");
                self.hashes.clear();
                return Ok(());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        self.hashes = serde_json::from_str(&raw).map_err(|source| BotError::HashStoreFormat {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), entries = self.hashes.len(), "Loaded content hashes");
        Ok(())
    }

    fn has_changed(&self, id: &str, content: &str) -> bool {
        self.hashes
            .get(id)
            .map_or(true, |stored| *stored != content_digest(content))
    }

    fn update_hash(&mut self, id: &str, content: &str) {
        self.hashes.insert(id.to_string(), content_digest(content));
    }

    fn save(&self) -> BotResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(&self.hashes).map_err(|source| {
            BotError::HashStoreFormat {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }

        info!(path = %self.path.display(), entries = self.hashes.len(), "Saved content hashes");
        Ok(())
    }

    fn cleanup(&mut self, active_ids: &HashSet<String>) {
        let before = self.hashes.len();
        self.hashes.retain(|id, _| active_ids.contains(id));

        let removed = before - self.hashes.len();
        if removed > 0 {
            info!(removed, "Removed hashes for articles no longer in the feed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonHashStore {
        JsonHashStore::new(dir.path().join("hashes.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.load().unwrap();
        assert!(store.is_empty());
        assert!(store.has_changed("1", "anything"));
    }

    #[test]
    fn test_change_detection_cycle() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.load().unwrap();

        assert!(store.has_changed("42", "body"));
        store.update_hash("42", "body");
        assert!(!store.has_changed("42", "body"));
        assert!(store.has_changed("42", "bodY"));
    }

    #[test]
    fn test_crlf_and_lf_share_digest() {
        assert_eq!(content_digest("a\r\nb\r\n"), content_digest("a\nb\n"));
        assert_eq!(
            content_digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_save_then_load_in_new_instance() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.update_hash("b", "second");
        store.update_hash("a", "first");
        store.save().unwrap();

        let raw = std::fs::read_to_string(dir.path().join("hashes.json")).unwrap();
        assert!(raw.find("\"a\"").unwrap() < raw.find("\"b\"").unwrap());
        assert!(!dir.path().join("hashes.json.tmp").exists());

        let mut reloaded = store_in(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(!reloaded.has_changed("a", "first"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("nested").join("hashes.json");
        let mut store = JsonHashStore::new(&path);
        store.update_hash("1", "x");

        store.save().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hashes.json"), "[1, 2, 3]").unwrap();

        let err = store_in(&dir).load().unwrap_err();
        assert!(matches!(err, BotError::HashStoreFormat { .. }));
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonHashStore::new(dir.path());

        let err = store.load().unwrap_err();
        assert!(matches!(err, BotError::HashStore { .. }));
    }

    #[test]
    fn test_cleanup_keeps_only_active_ids() {
        let mut store = JsonHashStore::new("unused.json");
        store.update_hash("keep", "1");
        store.update_hash("drop", "2");

        let active: HashSet<String> = ["keep".to_string(), "new".to_string()].into();
        store.cleanup(&active);

        assert_eq!(store.len(), 1);
        assert!(!store.has_changed("keep", "1"));
        assert!(store.has_changed("drop", "2"));
    }
}
