use crate::{CoreError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Key/value persistence port for the workspace store.
///
/// Values are opaque JSON strings; the store owns their schema. Implementors
/// must tolerate concurrent reads but can assume a single writer.
pub trait StatePersistence: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory persistence, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatePersistence for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File-backed persistence: a single JSON object at a fixed path.
///
/// A corrupt or unreadable file is treated as empty so a bad write can never
/// wedge startup; the condition is logged and the next write replaces it.
pub struct JsonFileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStorage {
    pub fn open(path: PathBuf) -> Self {
        let entries = Self::read_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Default location under the user config directory.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Storage("no config directory available".to_string()))?;
        Ok(Self::open(dir.join("gitcanvas").join("state.json")))
    }

    fn read_entries(path: &PathBuf) -> HashMap<String, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("ignoring corrupt state file {}: {}", path.display(), e);
                HashMap::new()
            }
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::Storage(format!("failed to create dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| CoreError::Storage(format!("failed to write: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = std::fs::metadata(&self.path) {
                let mut perms = metadata.permissions();
                perms.set_mode(0o600);
                let _ = std::fs::set_permissions(&self.path, perms);
            }
        }

        Ok(())
    }
}

impl StatePersistence for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.remove(key);
        self.flush(&entries)
    }
}
