//! Client session persisted between runs, owned by the top-level
//! orchestrator rather than living as ambient global state. Load, store, and
//! clear are the whole lifecycle.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::Identity;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Identity,
}

impl Session {
    pub fn new(token: String, user: Identity) -> Self {
        Self { token, user }
    }

    /// Load a persisted session, if any. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let session = serde_json::from_str(&contents)?;
        Ok(Some(session))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Remove the persisted session. Idempotent.
    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
