use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::category::CategoryIds;
use crate::domain::NewAttraction;
use crate::error::{Result, TravelokiError};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// The single metro area this deployment serves.
    #[serde(default = "default_area")]
    pub area: String,
    /// Storage-schema category identifiers.
    #[serde(default)]
    pub category_ids: CategoryIds,
    #[serde(default = "default_session_path")]
    pub session_path: String,
    /// Attractions loaded into the in-memory directory at startup.
    #[serde(default)]
    pub seed: Vec<NewAttraction>,
    /// Development token table: token -> identity.
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_area() -> String {
    "medan".to_string()
}

fn default_session_path() -> String {
    "session.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            area: default_area(),
            category_ids: CategoryIds::default(),
            session_path: default_session_path(),
            seed: Vec::new(),
            tokens: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TravelokiError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use std::io::Write;

    #[test]
    fn load_parses_seed_and_tokens() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
area = "medan"

[server]
port = 5001

[[seed]]
name = "Warung Enak"
description = "Local favorites"
address = "Jl. Pandu"
lat = 3.59
lng = 98.67
category = "food"

[[tokens]]
token = "admin-token"
username = "admin"
admin = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.area, "medan");
        assert_eq!(config.seed.len(), 1);
        assert_eq!(config.seed[0].category, Category::Food);
        assert!(config.tokens[0].admin);
        assert_eq!(config.category_ids.resolve("hotels"), 3);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, TravelokiError::Config(_)));
    }
}
