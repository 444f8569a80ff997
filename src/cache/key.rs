//! Key Derivation Module
//!
//! Builds fully-qualified remote keys from logical keys, folding in the
//! process namespace and an optional per-user scope.

use std::sync::Arc;

use crate::cache::session::SessionProvider;
use crate::cache::{NAMESPACE_SEPARATOR, USER_KEY_PREFIX};
use crate::error::{CacheError, Result};

// == User Scope ==
/// Identifies whose copy of a logical key an operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserScope {
    /// Resolve the user from the current session at call time
    Current,
    /// An explicit user identifier
    Named(String),
}

impl UserScope {
    /// Creates a named scope from anything string-like.
    pub fn named(user: impl Into<String>) -> Self {
        Self::Named(user.into())
    }
}

// == Key Deriver ==
/// Derives fully-qualified keys of the form `namespace|key`, or
/// `namespace|user:{user}:{key}` when a user scope is present.
///
/// Derivation is deterministic: identical (namespace, scope, key)
/// inputs always produce the same derived key, and distinct triples
/// never collide as long as the inputs avoid the separator character.
#[derive(Clone)]
pub struct KeyDeriver {
    /// Namespace prefixed onto every derived key
    namespace: String,
    /// Resolver for `UserScope::Current`
    session: Arc<dyn SessionProvider>,
}

impl KeyDeriver {
    // == Constructor ==
    /// Creates a deriver for the given namespace.
    ///
    /// # Arguments
    /// * `namespace` - Namespace shared by all keys this process derives
    /// * `session` - Resolver consulted for `UserScope::Current`
    ///
    /// # Errors
    /// `CacheError::InvalidNamespace` if the namespace contains the
    /// separator character.
    pub fn new(namespace: impl Into<String>, session: Arc<dyn SessionProvider>) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.contains(NAMESPACE_SEPARATOR) {
            return Err(CacheError::InvalidNamespace(namespace));
        }
        Ok(Self { namespace, session })
    }

    // == Namespace ==
    /// Returns the namespace this deriver prefixes onto every key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Qualify ==
    /// Prepends the namespace and separator to an unscoped key.
    pub fn qualify(&self, key: &str) -> String {
        format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, key)
    }

    // == Make Key ==
    /// Derives the fully-qualified key for a logical key.
    ///
    /// `UserScope::Current` is resolved through the session provider on
    /// every call, never cached.
    ///
    /// # Arguments
    /// * `key` - The logical cache key
    /// * `scope` - Optional user scope isolating the key per user
    ///
    /// # Errors
    /// Propagates `CacheError::Session` when the current user cannot be
    /// resolved.
    pub fn make_key(&self, key: &str, scope: Option<&UserScope>) -> Result<String> {
        let scoped = match scope {
            Some(UserScope::Current) => {
                let user = self.session.current_user()?;
                format!("{}{}:{}", USER_KEY_PREFIX, user, key)
            }
            Some(UserScope::Named(user)) => format!("{}{}:{}", USER_KEY_PREFIX, user, key),
            None => key.to_string(),
        };
        Ok(self.qualify(&scoped))
    }
}
