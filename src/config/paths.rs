//! Path resolution for moodtunes
//!
//! Works out which config file to read and where the web client lives.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Filesystem locations used at startup
#[derive(Debug, Clone, Default)]
pub struct Paths {
    /// Config file to layer over the defaults, if any
    config_file: Option<PathBuf>,
    /// Directory to serve the web client from instead of the embedded one
    client_dir: Option<PathBuf>,
}

impl Paths {
    /// Resolve paths from the command line overrides.
    ///
    /// An explicit config file or client dir must exist. Without one, the
    /// per-user config dir is checked for `config.toml`.
    pub fn resolve(config: Option<PathBuf>, client: Option<PathBuf>) -> Result<Self> {
        let config_file = match config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file {:?} does not exist", path);
                }
                Some(path)
            }
            None => default_config_dir()
                .map(|dir| dir.join(CONFIG_FILE_NAME))
                .filter(|path| path.is_file()),
        };

        let client_dir = match client {
            Some(dir) => {
                if !dir.join("index.html").is_file() {
                    bail!("Client directory {:?} has no index.html", dir);
                }
                Some(dir)
            }
            None => None,
        };

        Ok(Self {
            config_file,
            client_dir,
        })
    }

    /// Get the config file, if one was found
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Get the client directory override
    pub fn client_dir(&self) -> Option<&Path> {
        self.client_dir.as_deref()
    }
}

/// Per-user config directory, e.g. `~/.config/moodtunes`
pub fn default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "moodtunes").map(|dirs| dirs.config_dir().to_path_buf())
}
