//! Application settings
//!
//! Settings are layered, lowest to highest: built-in defaults, an optional
//! TOML file, `MOODTUNES__SECTION__KEY` environment variables, then the
//! well-known credential variables (`GEMINI_API_KEY`, `SPOTIFY_CLIENT_ID`,
//! `SPOTIFY_CLIENT_SECRET`).

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "MOODTUNES";

/// Largest number of songs a recommendation response may carry
pub const MAX_RECOMMENDATIONS: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted image upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Timeout for every outbound call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

/// How the catalog is queried for songs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogMode {
    /// Seed-genre recommendations endpoint
    #[default]
    Recommendations,
    /// Track search by mood phrase and genre
    Search,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,

    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,

    /// Number of tracks to ask the catalog for
    #[serde(default = "default_spotify_limit")]
    pub limit: usize,

    #[serde(default)]
    pub mode: CatalogMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            accounts_url: default_spotify_accounts_url(),
            api_url: default_spotify_api_url(),
            limit: default_spotify_limit(),
            mode: CatalogMode::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from the process environment and an optional file
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, std::env::vars().collect())
    }

    fn load_with_env(file: Option<&Path>, env: Map<String, String>) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to build default settings")?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env.clone())),
            )
            .set_override_option("gemini.api_key", non_empty(&env, "GEMINI_API_KEY"))?
            .set_override_option("spotify.client_id", non_empty(&env, "SPOTIFY_CLIENT_ID"))?
            .set_override_option(
                "spotify.client_secret",
                non_empty(&env, "SPOTIFY_CLIENT_SECRET"),
            )?;

        let mut config: AppConfig = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")?;

        config.spotify.limit = config.spotify.limit.clamp(1, MAX_RECOMMENDATIONS);

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs.max(1))
    }

    /// Names of the credentials that are still unset
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini.api_key.is_empty() {
            missing.push("GEMINI_API_KEY");
        }
        if self.spotify.client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID");
        }
        if self.spotify.client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET");
        }
        missing
    }
}

fn non_empty(env: &Map<String, String>, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.trim().is_empty()).cloned()
}

// Default value functions for serde

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_spotify_limit() -> usize {
    MAX_RECOMMENDATIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_with_env(None, env(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.spotify.limit, 100);
        assert_eq!(config.spotify.mode, CatalogMode::Recommendations);
        assert_eq!(config.missing_credentials().len(), 3);
    }

    #[test]
    fn test_credential_env_vars() {
        let config = AppConfig::load_with_env(
            None,
            env(&[
                ("GEMINI_API_KEY", "gem-key"),
                ("SPOTIFY_CLIENT_ID", "id"),
                ("SPOTIFY_CLIENT_SECRET", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(config.gemini.api_key, "gem-key");
        assert_eq!(config.spotify.client_id, "id");
        assert_eq!(config.spotify.client_secret, "secret");
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn test_file_then_env_layering() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[spotify]\nmode = \"search\"\nlimit = 500\nclient_id = \"from-file\"\n",
        )
        .unwrap();

        let config = AppConfig::load_with_env(
            Some(path.as_path()),
            env(&[
                ("MOODTUNES__SERVER__PORT", "9090"),
                ("SPOTIFY_CLIENT_ID", "from-env"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.spotify.mode, CatalogMode::Search);
        assert_eq!(config.spotify.limit, MAX_RECOMMENDATIONS);
        assert_eq!(config.spotify.client_id, "from-env");
    }

    #[test]
    fn test_blank_credential_ignored() {
        let config =
            AppConfig::load_with_env(None, env(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini.api_key.is_empty());
    }
}
