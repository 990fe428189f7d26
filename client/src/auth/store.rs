use crate::model::UserRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const APP_DIR: &str = "nimbus";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unable to determine config directory")]
    ConfigDir,
}

/// Durable storage for the session credential and cached profile.
///
/// Only the session manager writes through this trait. Implementations keep
/// the two values under the stable keys `access_token` and `user`.
pub trait SessionStore: Send + Sync {
    fn load_token(&self) -> Result<Option<String>, StorageError>;
    fn load_user(&self) -> Result<Option<UserRecord>, StorageError>;
    fn save_token(&self, token: &str) -> Result<(), StorageError>;
    fn save_user(&self, user: &UserRecord) -> Result<(), StorageError>;
    /// Removes both keys. Purging an empty store succeeds.
    fn purge(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserRecord>,
}

/// Directory holding Nimbus configuration and session state.
///
/// `~/.config/nimbus` on Unix-like systems, the platform config directory elsewhere.
pub fn config_dir() -> Result<PathBuf, StorageError> {
    if cfg!(unix) {
        if let Some(mut home_path) = dirs::home_dir() {
            home_path.push(".config");
            home_path.push(APP_DIR);
            return Ok(home_path);
        }
    }

    dirs::config_dir()
        .map(|mut path| {
            path.push(APP_DIR);
            path
        })
        .ok_or(StorageError::ConfigDir)
}

/// JSON file store. Writes go to a sibling temp file that is then renamed over the target.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<config dir>/nimbus/session.json`.
    pub fn default_location() -> Result<Self, StorageError> {
        Ok(Self::new(config_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<SessionDocument, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(SessionDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionDocument::default()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&self, document: &SessionDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;
        let temp_path = self.path.with_extension("json.tmp");

        let mut file = open_private(&temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.io_error(e))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))
    }

    fn update(&self, apply: impl FnOnce(&mut SessionDocument)) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut document = self.read().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable session file: {e}");
            SessionDocument::default()
        });
        apply(&mut document);
        self.write(&document)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl SessionStore for FileSessionStore {
    fn load_token(&self) -> Result<Option<String>, StorageError> {
        let _guard = self.guard();
        Ok(self.read()?.access_token)
    }

    fn load_user(&self) -> Result<Option<UserRecord>, StorageError> {
        let _guard = self.guard();
        Ok(self.read()?.user)
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.update(|document| document.access_token = Some(token.to_string()))
    }

    fn save_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        self.update(|document| document.user = Some(user.clone()))
    }

    fn purge(&self) -> Result<(), StorageError> {
        let _guard = self.guard();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local store for tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    document: Mutex<SessionDocument>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, as if a previous run had persisted a session.
    pub fn with_session(token: &str, user: Option<UserRecord>) -> Self {
        Self {
            document: Mutex::new(SessionDocument {
                access_token: Some(token.to_string()),
                user,
            }),
        }
    }

    fn document(&self) -> MutexGuard<'_, SessionDocument> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.document().access_token.clone())
    }

    fn load_user(&self) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.document().user.clone())
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.document().access_token = Some(token.to_string());
        Ok(())
    }

    fn save_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        self.document().user = Some(user.clone());
        Ok(())
    }

    fn purge(&self) -> Result<(), StorageError> {
        *self.document() = SessionDocument::default();
        Ok(())
    }
}
