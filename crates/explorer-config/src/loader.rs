use std::path::{Path, PathBuf};

use explorer_common::{Error, Result};
use tracing::{debug, info};

use crate::model::AppConfig;

const CONFIG_DIR: &str = ".explorer";
const CONFIG_FILE: &str = "config.yml";

/// Reads `AppConfig` from YAML or TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// `~/.explorer`, or the working directory when no home is available.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR))
    }

    pub fn default_path() -> PathBuf {
        Self::default_dir().join(CONFIG_FILE)
    }

    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(path, &contents)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<AppConfig> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yml" | "yaml" => serde_yaml::from_str(contents)
                .map_err(|e| Error::Config(format!("YAML parse error: {e}"))),
            "toml" => {
                toml::from_str(contents).map_err(|e| Error::Config(format!("TOML parse error: {e}")))
            }
            other => Err(Error::Config(format!("unsupported config extension: {other}"))),
        }
    }
}
