use crate::config::StorageConfig;
use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Synchronous string key/value medium backing the consent store.
///
/// Implementations report an unusable medium as [`StoreError::Unavailable`];
/// interpreting the stored text is the store's job.
pub trait KeyValueStorage: Send + Sync {
    /// Backend name for logs and errors
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`. Either the whole value lands or the
    /// previous value remains.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ── File backend ──────────────────────────────────────────────────

/// One file per key under a directory, replaced atomically on write.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    fn unavailable(&self, action: &str, path: &Path, err: &std::io::Error) -> StoreError {
        StoreError::unavailable(
            self.name(),
            format!("failed {action} {}: {err}", path.display()),
        )
    }
}

impl KeyValueStorage for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                // Not UTF-8: let the store treat it as a malformed value.
                Ok(Some(String::from_utf8_lossy(&fs::read(&path)?).into_owned()))
            }
            Err(e) => Err(self.unavailable("reading", &path, &e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.unavailable("creating", &self.dir, &e))?;

        let path = self.path_for(key);
        write_atomic(&path, value).map_err(|e| self.unavailable("replacing", &path, &e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.unavailable("removing", &path, &e)),
        }
    }
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;

    if let Err(rename_error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(rename_error);
    }

    Ok(())
}

// ── In-memory backend ─────────────────────────────────────────────

/// Process-local storage. Nothing survives a restart, so every new process
/// starts in the prompting state.
#[derive(Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::unavailable("memory", "storage lock poisoned"))
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Factory: create the right storage backend from config
pub fn create_storage(config: &StorageConfig, default_dir: &Path) -> Arc<dyn KeyValueStorage> {
    match config.backend.as_str() {
        "file" => {
            let dir = config
                .dir
                .clone()
                .unwrap_or_else(|| default_dir.to_path_buf());
            Arc::new(FileStorage::new(dir))
        }
        "memory" => Arc::new(InMemoryStorage::new()),
        _ => {
            tracing::warn!(
                "Unknown storage backend '{}', falling back to memory",
                config.backend
            );
            Arc::new(InMemoryStorage::new())
        }
    }
}
