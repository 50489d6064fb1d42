//! Key/value persistence for credentials and the cached profile.
//!
//! Each key holds one JSON document. [`FileStorage`] writes `<dir>/<key>.json`
//! with owner-only permissions on Unix; [`MemoryStorage`] keeps values in a
//! process-local map.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AuthError;

pub trait CredentialStorage: Send + Sync {
    /// Read the raw value for `key`. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` when the backing store fails.
    fn read(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// Replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` when the backing store fails.
    fn write(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` when the backing store fails.
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}

/// One JSON file per key under a directory (default `~/.savetime`).
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under `~/.savetime`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the home directory is unknown.
    pub fn in_home() -> Result<Self, AuthError> {
        dirs::home_dir()
            .map(|home| Self::new(home.join(".savetime")))
            .ok_or_else(|| {
                AuthError::TokenStoreError(
                    "home directory not found, cannot store credentials".into(),
                )
            })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn ensure_dir(&self) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AuthError::TokenStoreError(format!("mkdir {}: {e}", self.dir.display()))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", self.dir.display());
            }
        }
        Ok(())
    }
}

impl CredentialStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AuthError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::TokenStoreError(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::TokenStoreError(format!("chmod {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::TokenStoreError(format!(
                "failed to delete {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AuthError> {
        self.values
            .lock()
            .map_err(|_| AuthError::TokenStoreError("memory storage lock poisoned".into()))
    }
}

impl CredentialStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
