//! Auth provider port. The core never verifies credentials itself; it asks
//! the provider to resolve a bearer token and fails closed when no identity
//! comes back.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::Identity;
use crate::error::Result;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an opaque bearer token to an identity, or `None` when the
    /// token is unknown or expired.
    async fn authenticate(&self, token: &str) -> Result<Option<Identity>>;
}

/// In-memory token table for development and tests.
pub struct StaticTokenAuth {
    tokens: Arc<Mutex<HashMap<String, Identity>>>,
}

impl Default for StaticTokenAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn issue(&self, token: &str, username: &str, is_admin: bool) -> Identity {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            is_admin,
        };
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), identity.clone());
        identity
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, token: &str) -> Result<Option<Identity>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.get(token).cloned())
    }
}
