//! Session token storage
//!
//! A session token is an opaque bearer credential minted by the backend at
//! login. The store owns the single active token; absence is the valid
//! anonymous state. Token lifetime is owned by the backend, so no expiry is
//! inferred client-side. Privileged callers read the token through `get()`
//! immediately before each call rather than caching it, so a concurrent
//! logout is picked up by the very next request.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::warn;

/// Opaque bearer credential issued at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Storage interface for the active session token
pub trait SessionStore: Send + Sync {
    /// Persist the token for the lifetime of the storage scope
    fn set(&self, token: SessionToken);

    /// Return the current token, or `None` for the anonymous state
    fn get(&self) -> Option<SessionToken>;

    /// Remove the token
    fn clear(&self);
}

/// In-memory store, lives for the lifetime of the process
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<SessionToken>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn set(&self, token: SessionToken) {
        *self.token.write().unwrap() = Some(token);
    }

    fn get(&self) -> Option<SessionToken> {
        self.token.read().unwrap().clone()
    }

    fn clear(&self) {
        *self.token.write().unwrap() = None;
    }
}

/// File-backed store so the CLI keeps its session across invocations
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSession {
    fn set(&self, token: SessionToken) {
        if let Err(e) = fs::write(&self.path, token.as_str()) {
            warn!("Failed to persist session token to {:?}: {}", self.path, e);
        }
    }

    fn get(&self) -> Option<SessionToken> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    None
                } else {
                    Some(SessionToken::new(raw))
                }
            }
            Err(_) => None,
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove session file {:?}: {}", self.path, e);
            }
        }
    }
}
