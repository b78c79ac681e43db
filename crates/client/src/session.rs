//! Client-side session state.
//!
//! A [`SessionStore`] holds at most one [`Identity`]. [`SessionContext`] owns a
//! store and is passed explicitly to everything that needs the current user:
//! the auth client initializes it after login or registration and tears it
//! down on logout, the guard and the wishlist client only read it.
//!
//! A store never hands out an expired identity. Reading one clears it and
//! reports the session as absent.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use estore_core::{AccessToken, Identity};

/// Errors from writing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session file could not be written or removed.
    #[error("session file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Identity could not be serialized.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage for the current identity.
///
/// No network calls are made by a store.
pub trait SessionStore: Send + Sync {
    /// The current identity, or `None` when logged out or expired.
    fn get(&self) -> Option<Identity>;

    /// Persist `identity` as the current session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the identity cannot be stored.
    fn set(&self, identity: &Identity) -> Result<(), SessionError>;

    /// Forget the current session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if stored state cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Drop `identity` if it has expired at `now`.
///
/// `clear_stale` must only clear the store while it still holds `identity`,
/// so a session saved after the read survives.
fn unexpired(
    identity: Identity,
    now: DateTime<Utc>,
    clear_stale: impl FnOnce(&Identity) -> Result<(), SessionError>,
) -> Option<Identity> {
    if !identity.is_expired_at(now) {
        return Some(identity);
    }

    tracing::info!(user_id = %identity.id, "Session expired, clearing");
    if let Err(e) = clear_stale(&identity) {
        tracing::warn!(error = %e, "Failed to clear expired session");
    }
    None
}

// =============================================================================
// File store
// =============================================================================

/// Session persisted as JSON in a file; survives process restarts.
///
/// Missing, unreadable or malformed files read as logged out.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by `path`. The file is created on first `set`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Option<Identity> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable session file");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed session file");
                None
            }
        }
    }

    /// Remove the file only if it still holds `stale`.
    fn clear_if_current(&self, stale: &Identity) -> Result<(), SessionError> {
        if self.read().as_ref() == Some(stale) {
            self.clear()
        } else {
            Ok(())
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Identity> {
        unexpired(self.read()?, Utc::now(), |stale| self.clear_if_current(stale))
    }

    fn set(&self, identity: &Identity) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(identity)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// =============================================================================
// Memory store
// =============================================================================

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    identity: RwLock<Option<Identity>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_if_current(&self, stale: &Identity) {
        let mut slot = self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref() == Some(stale) {
            *slot = None;
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Identity> {
        let identity = self
            .identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        unexpired(identity, Utc::now(), |stale| {
            self.clear_if_current(stale);
            Ok(())
        })
    }

    fn set(&self, identity: &Identity) -> Result<(), SessionError> {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// Session context
// =============================================================================

/// Owner of the session store, passed down to everything that needs it.
///
/// Cloning shares the same underlying store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Wrap a session store.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A context over a fresh [`MemorySessionStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Start a session after a successful login or registration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the identity cannot be persisted.
    pub fn init(&self, identity: &Identity) -> Result<(), SessionError> {
        self.store.set(identity)?;
        tracing::debug!(user_id = %identity.id, role = %identity.role, "Session started");
        Ok(())
    }

    /// End the session (logout).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if stored state cannot be removed.
    pub fn teardown(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        tracing::debug!("Session ended");
        Ok(())
    }

    /// The current identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.store.get()
    }

    /// Bearer token of the current identity, if any.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.current().map(|identity| identity.token)
    }

    /// Whether a non-expired identity is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
