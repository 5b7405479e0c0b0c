//! Where the settings blob lives between runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key-value style persistence for the serialized settings blob.
///
/// Implementations swallow their own failures: a failed load looks like a
/// missing blob and a failed save is logged.
pub trait SettingsPersistence: Send + Sync {
    /// Read the stored blob, if any.
    fn load(&self) -> Option<String>;

    /// Replace the stored blob.
    fn save(&self, blob: &str);
}

/// Stores the blob as a JSON file on disk.
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPersistence for JsonFilePersistence {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No saved settings file");
                None
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read settings file");
                None
            }
        }
    }

    fn save(&self, blob: &str) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(path = ?parent, error = %e, "Failed to create settings directory");
                    return;
                }
            }
        }
        if let Err(e) = std::fs::write(&self.path, blob) {
            warn!(path = ?self.path, error = %e, "Failed to write settings file");
        }
    }
}

/// In-process persistence, mostly for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryPersistence {
    blob: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            saves: Mutex::new(0),
        }
    }

    /// The last saved blob.
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|s| *s).unwrap_or(0)
    }
}

impl SettingsPersistence for MemoryPersistence {
    fn load(&self) -> Option<String> {
        self.blob()
    }

    fn save(&self, blob: &str) {
        if let Ok(mut stored) = self.blob.lock() {
            *stored = Some(blob.to_string());
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
    }
}
