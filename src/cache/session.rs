//! Session Module
//!
//! Host-facing access to the current request's user identity.

use crate::error::{CacheError, Result};

// == Session Provider ==
/// Resolves the user attached to the current logical request.
///
/// Implementations typically read request-local state owned by the host
/// application; resolution happens at call time on every user-scoped
/// operation and is never cached by this crate.
pub trait SessionProvider: Send + Sync {
    /// Returns the identifier of the current session's user.
    ///
    /// # Errors
    /// `CacheError::Session` when no user is attached to the current
    /// request.
    fn current_user(&self) -> Result<String>;
}

// == Fixed Session ==
/// Session provider that always reports the same user.
///
/// Suitable for single-identity hosts and tests.
#[derive(Debug, Clone)]
pub struct FixedSession {
    user: String,
}

impl FixedSession {
    /// Creates a provider that always resolves to `user`.
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

impl SessionProvider for FixedSession {
    fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }
}

// == No Session ==
/// Session provider for contexts that never carry a user.
///
/// Every resolution attempt fails, so user-scoped operations surface a
/// configuration error instead of silently sharing keys.
#[derive(Debug, Clone, Default)]
pub struct NoSession;

impl SessionProvider for NoSession {
    fn current_user(&self) -> Result<String> {
        Err(CacheError::Session(
            "no user attached to the current request".to_string(),
        ))
    }
}
