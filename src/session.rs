//! Persistence of the signed-in user and bearer token between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::dto::api::LoginResponse;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("credential file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where the current session is kept.
pub trait CredentialStore: Send + Sync {
    fn save(&self, session: &LoginResponse) -> Result<(), CredentialStoreError>;
    fn load(&self) -> Result<Option<LoginResponse>, CredentialStoreError>;
    fn clear(&self) -> Result<(), CredentialStoreError>;

    /// Bearer token of the stored session, if any.
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.map(|s| s.token),
            Err(err) => {
                log::warn!("Ignoring unreadable credentials: {err}");
                None
            }
        }
    }
}

/// Keeps the session as a JSON file so it survives restarts.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, session: &LoginResponse) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(session)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<LoginResponse>, CredentialStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Session held only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    session: Mutex<Option<LoginResponse>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, session: &LoginResponse) -> Result<(), CredentialStoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<LoginResponse>, CredentialStoreError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::dto::api::User;

    fn session() -> LoginResponse {
        LoginResponse {
            user: User {
                id: "1".to_string(),
                name: "Mecânico Chefe".to_string(),
                email: "admin@mecanica.com".to_string(),
            },
            token: "abc.def.ghi".to_string(),
        }
    }

    #[test]
    fn file_store_survives_new_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileCredentialStore::new(&path);
        assert!(store.load().unwrap().is_none());
        store.save(&session()).unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(session()));
        assert_eq!(reopened.token().as_deref(), Some("abc.def.ghi"));

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_yields_no_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(CredentialStoreError::Serialization(_))
        ));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.token(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
