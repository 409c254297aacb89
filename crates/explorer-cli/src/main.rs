mod init;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use explorer_config::{AppConfig, ConfigLoader};
use explorer_store::{
    FailurePolicy, MemoryStore, MigrationContext, MigrationRunner, SettingsStore, SqliteStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const STORE_FILE: &str = "settings.db";

#[derive(Parser)]
#[command(name = "explorer-settings", version, about = "Upgrade and inspect persisted explorer settings")]
struct Cli {
    /// Config file (YAML or TOML). Defaults to ~/.explorer/config.yml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settings database. Defaults to ~/.explorer/settings.db
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Active network, overriding the config file
    #[arg(long, global = true, env = "EXPLORER_CONFIG")]
    network: Option<String>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every settings migration in order
    Migrate {
        /// Keep running later migrations when one fails
        #[arg(long)]
        keep_going: bool,

        /// Run against an in-memory copy and print the result without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stored value
    Get { key: String },
    /// Store a raw value
    Set { key: String, value: String },
    /// Delete a stored value
    Remove { key: String },
    /// List every stored setting
    List,
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        config,
        store,
        network,
        command,
        ..
    } = cli;
    let config_path = config.unwrap_or_else(ConfigLoader::default_path);
    let store_path = store.unwrap_or_else(|| ConfigLoader::default_dir().join(STORE_FILE));

    match command {
        Command::Init { force } => init::write_default_config(&config_path, force)?,
        Command::Migrate {
            keep_going,
            dry_run,
        } => {
            let config = load_config(&config_path, network)?;
            let store = open_store(&store_path)?;
            let policy = if keep_going {
                FailurePolicy::Isolate
            } else {
                FailurePolicy::FailFast
            };
            if dry_run {
                let copy = MemoryStore::from_entries(
                    store.entries()?.into_iter().map(|r| (r.key, r.value)),
                );
                migrate(&copy, &config, policy)?;
                for (key, value) in copy.snapshot()? {
                    println!("{key}\t{value}");
                }
            } else {
                let report = migrate(&store, &config, policy)?;
                report::print_report(&report, &config, &store_path);
            }
        }
        Command::Get { key } => match open_store(&store_path)?.get(&key)? {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("no value stored for {key}"),
        },
        Command::Set { key, value } => {
            open_store(&store_path)?.set(&key, &value)?;
            info!("stored {key}");
        }
        Command::Remove { key } => {
            open_store(&store_path)?.remove(&key)?;
            info!("removed {key}");
        }
        Command::List => {
            for record in open_store(&store_path)?.entries()? {
                println!(
                    "{}\t{}\t{}",
                    record.key,
                    record.value,
                    record.updated_at.to_rfc3339()
                );
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path, network: Option<String>) -> Result<AppConfig> {
    let mut config = ConfigLoader::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    if let Some(network) = network {
        config.network = network;
    }
    Ok(config)
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).context("failed to open settings store")
}

fn migrate(
    store: &dyn SettingsStore,
    config: &AppConfig,
    policy: FailurePolicy,
) -> Result<explorer_store::MigrationReport> {
    let context = MigrationContext::from_config(config, store)
        .context("failed to resolve migration context")?;
    MigrationRunner::new(store, context)
        .with_policy(policy)
        .execute_migrations()
        .context("settings migration failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_migrate_flags() {
        let cli = Cli::try_parse_from([
            "explorer-settings",
            "--network",
            "devnet",
            "migrate",
            "--keep-going",
        ])
        .unwrap();
        assert_eq!(cli.network.as_deref(), Some("devnet"));
        assert!(matches!(
            cli.command,
            Command::Migrate {
                keep_going: true,
                dry_run: false
            }
        ));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "explorer-settings",
            "get",
            "language",
            "--store",
            "/tmp/s.db",
        ])
        .unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.db")));
        assert!(matches!(cli.command, Command::Get { ref key } if key == "language"));
    }

    #[test]
    fn migrate_helper_respects_policy() {
        let store = MemoryStore::from_entries([("priceChart", "nope"), ("language", "en")]);
        let config = AppConfig::default();

        assert!(migrate(&store, &config, FailurePolicy::FailFast).is_err());

        let report = migrate(&store, &config, FailurePolicy::Isolate).unwrap();
        assert_eq!(report.failed(), 1);
    }
}
