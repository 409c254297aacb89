use std::path::Path;

use anyhow::{Context, Result};
use explorer_config::AppConfig;
use tracing::info;

/// Write `AppConfig::default()` as YAML to `config_path`.
pub fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    if let Some(dir) = config_path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .context(format!("failed to create {}", dir.display()))?;
    }

    let yaml = serde_yaml::to_string(&AppConfig::default()).context("failed to serialize config")?;
    std::fs::write(config_path, &yaml)
        .context(format!("failed to write {}", config_path.display()))?;

    info!("config written to {}", config_path.display());
    println!("Config written to {}", config_path.display());
    println!("Run `explorer-settings migrate` to upgrade stored settings.");

    Ok(())
}
