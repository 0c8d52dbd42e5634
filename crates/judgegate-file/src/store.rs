//! Credential persistence in a JSON file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use judgegate_core::{
    AccessToken, CredentialStore, Error, InvalidInputError, RefreshToken, Result, TokenPair,
    TransportError,
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Default file name for persisted credentials.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

fn map_io(err: io::Error) -> Error {
    Error::Transport(TransportError::Other {
        message: format!("IO error: {}", err),
    })
}

/// On-disk form of the credentials.
#[derive(Serialize, Deserialize)]
struct StoredCredentials {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

impl From<&TokenPair> for StoredCredentials {
    fn from(tokens: &TokenPair) -> Self {
        Self {
            access: tokens.access.as_str().to_string(),
            refresh: tokens.refresh.as_ref().map(|t| t.as_str().to_string()),
        }
    }
}

impl From<StoredCredentials> for TokenPair {
    fn from(stored: StoredCredentials) -> Self {
        TokenPair::new(
            AccessToken::new(stored.access),
            stored.refresh.map(RefreshToken::new),
        )
    }
}

/// A credential store persisted to a JSON file.
///
/// The in-memory copy is authoritative. Every change is written through to
/// disk by replacing the file, so a crash never leaves it half written. A
/// write that fails is logged and otherwise ignored; the process keeps
/// working with the in-memory credentials.
///
/// Readers never wait on disk IO: the in-memory copy is swapped first and
/// the file is written afterwards, with writers serialised so the file ends
/// up matching the last change.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    tokens: RwLock<Option<TokenPair>>,
    writer: Mutex<()>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading any credentials already there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tokens = load(&path)?;
        debug!(path = %path.display(), has_tokens = tokens.is_some(), "Opened credential store");

        Ok(Self {
            path,
            tokens: RwLock::new(tokens),
            writer: Mutex::new(()),
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn persist(&self, tokens: Option<&TokenPair>) {
        let result = match tokens {
            Some(tokens) => self.write(tokens),
            None => self.remove(),
        };
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist credentials");
        }
    }

    fn write(&self, tokens: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;
        lock_file.lock_exclusive().map_err(map_io)?;

        let content = serde_json::to_string_pretty(&StoredCredentials::from(tokens))?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let written = write_private(&temp_path, &content)
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        let unlocked = lock_file.unlock();
        written.map_err(map_io)?;
        unlocked.map_err(map_io)?;

        debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed credentials");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e)),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().clone()
    }

    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) {
        let _writer = self.writer.lock();
        let updated = {
            let mut tokens = self.tokens.write();
            let refresh = refresh.or_else(|| tokens.as_ref().and_then(|t| t.refresh.clone()));
            let updated = TokenPair::new(access, refresh);
            *tokens = Some(updated.clone());
            updated
        };
        self.persist(Some(&updated));
    }

    fn clear(&self) {
        let _writer = self.writer.lock();
        *self.tokens.write() = None;
        self.persist(None);
    }
}

fn load(path: &Path) -> Result<Option<TokenPair>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(map_io(e)),
    };

    let stored: StoredCredentials = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidInput(InvalidInputError::Other {
            message: format!("invalid credentials file {}: {}", path.display(), e),
        })
    })?;

    Ok(Some(stored.into()))
}

fn write_private(path: &Path, content: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create_new(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
