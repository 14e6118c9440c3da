//! Credential storage.
//!
//! The [`CredentialStore`] trait is the only place access and refresh tokens
//! are persisted. Two implementations ship with the crate:
//!
//! - [`InMemoryCredentialStore`]: process-lifetime storage, used in tests and
//!   by embedders that persist through the platform keystore themselves.
//! - [`FileCredentialStore`]: a TOML file readable only by the owning user.

use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Access and refresh token, always held together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived token attached to every authenticated request.
    pub access_token: String,
    /// Longer-lived token used only to mint a new access token.
    pub refresh_token: String,
}

impl CredentialPair {
    /// Create a credential pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Build a pair from optional halves.
    ///
    /// Returns `None` unless both halves are present and non-blank; a store
    /// holding only one token is a logged-out store.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdesk::CredentialPair;
    ///
    /// assert!(CredentialPair::from_parts(Some("a".into()), Some("r".into())).is_some());
    /// assert!(CredentialPair::from_parts(Some("a".into()), None).is_none());
    /// assert!(CredentialPair::from_parts(Some("  ".into()), Some("r".into())).is_none());
    /// ```
    pub fn from_parts(access_token: Option<String>, refresh_token: Option<String>) -> Option<Self> {
        match (access_token, refresh_token) {
            (Some(access), Some(refresh))
                if !access.trim().is_empty() && !refresh.trim().is_empty() =>
            {
                Some(Self::new(access, refresh))
            },
            _ => None,
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Durable storage for the credential pair.
///
/// Implementations must keep tokens confidential at rest. Calls are
/// synchronous and each is a whole-value overwrite, so no transactional
/// isolation is needed between concurrent readers and writers.
pub trait CredentialStore: Send + Sync {
    /// Overwrite both tokens.
    fn save(&self, credentials: &CredentialPair) -> Result<()>;

    /// The stored access token, if any.
    fn access_token(&self) -> Option<String>;

    /// The stored refresh token, if any.
    fn refresh_token(&self) -> Option<String>;

    /// Remove both tokens.
    fn clear(&self) -> Result<()>;

    /// Both tokens, if the store holds a complete pair.
    fn load(&self) -> Option<CredentialPair> {
        CredentialPair::from_parts(self.access_token(), self.refresh_token())
    }
}

/// Process-lifetime credential store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<Option<CredentialPair>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a pair.
    pub fn with_credentials(credentials: CredentialPair) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn save(&self, credentials: &CredentialPair) -> Result<()> {
        *self.credentials.write() = Some(credentials.clone());
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.credentials
            .read()
            .as_ref()
            .map(|c| c.refresh_token.clone())
    }

    fn clear(&self) -> Result<()> {
        *self.credentials.write() = None;
        Ok(())
    }
}

/// Credential store backed by a TOML file.
///
/// The parent directory is created with mode 0700 and the file written with
/// mode 0600 on unix. Reads go to disk every time so a pair written by one
/// handle is visible through every other handle on the same path.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileCredentialStore {
    /// Create a store at `path`. Nothing is touched until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Create a store at the platform default location,
    /// `<config dir>/taskdesk/credentials.toml`.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Credentials("could not determine config directory".into()))?;
        Ok(Self::new(dir.join("taskdesk").join("credentials.toml")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_pair(&self) -> Option<CredentialPair> {
        let _guard = self.lock.read();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "failed to read credentials: {}", e);
                return None;
            },
        };
        match toml::from_str::<CredentialPair>(&content) {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable credentials file: {}", e);
                None
            },
        }
    }

    fn ensure_parent(&self) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.exists() {
            return Ok(());
        }
        fs::create_dir_all(parent)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, credentials: &CredentialPair) -> Result<()> {
        let _guard = self.lock.write();
        self.ensure_parent()?;

        let content = toml::to_string(credentials)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::Credentials(format!("failed to write credentials: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.read_pair().map(|c| c.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.read_pair().map(|c| c.refresh_token)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.write();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Credentials(format!(
                "failed to remove credentials: {}",
                e
            ))),
        }
    }

    fn load(&self) -> Option<CredentialPair> {
        self.read_pair()
            .and_then(|c| CredentialPair::from_parts(Some(c.access_token), Some(c.refresh_token)))
    }
}
