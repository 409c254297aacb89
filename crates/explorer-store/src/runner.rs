use explorer_common::Result;
use tracing::{debug, info, warn};

use crate::migrations::{Migration, MigrationContext, MigrationOutcome};
use crate::store::SettingsStore;

/// What the runner does when a migration returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it; later migrations do not run.
    #[default]
    FailFast,
    /// Log the failure, record it in the report and continue.
    Isolate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    Applied,
    Skipped,
    Failed(String),
}

/// Per-migration results of one run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub entries: Vec<(Migration, MigrationStatus)>,
}

impl MigrationReport {
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, MigrationStatus::Applied))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, MigrationStatus::Failed(_)))
    }

    pub fn status(&self, migration: Migration) -> Option<&MigrationStatus> {
        self.entries
            .iter()
            .find(|(m, _)| *m == migration)
            .map(|(_, s)| s)
    }

    fn count(&self, pred: impl Fn(&MigrationStatus) -> bool) -> usize {
        self.entries.iter().filter(|(_, s)| pred(s)).count()
    }
}

/// Runs the settings migrations against a store, one after another.
pub struct MigrationRunner<'a> {
    store: &'a dyn SettingsStore,
    context: MigrationContext,
    migrations: Vec<Migration>,
    policy: FailurePolicy,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(store: &'a dyn SettingsStore, context: MigrationContext) -> Self {
        Self {
            store,
            context,
            migrations: Migration::ALL.to_vec(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the registry. Order is execution order.
    pub fn with_migrations(mut self, migrations: Vec<Migration>) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn execute_migrations(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for &migration in &self.migrations {
            let name = migration.name();
            let status = match migration.apply(self.store, &self.context) {
                Ok(MigrationOutcome::Applied) => {
                    info!("applied settings migration {name}");
                    MigrationStatus::Applied
                }
                Ok(MigrationOutcome::Skipped) => {
                    debug!("settings migration {name} has nothing to do");
                    MigrationStatus::Skipped
                }
                Err(e) => {
                    warn!("settings migration {name} failed: {e}");
                    if self.policy == FailurePolicy::FailFast {
                        return Err(e);
                    }
                    MigrationStatus::Failed(e.to_string())
                }
            };
            report.entries.push((migration, status));
        }

        Ok(report)
    }
}
