pub mod migrations;
pub mod runner;
pub mod sqlite_store;
pub mod store;
pub mod ui_state;

pub use migrations::{Migration, MigrationContext, MigrationOutcome, normalize_locale};
pub use runner::{FailurePolicy, MigrationReport, MigrationRunner, MigrationStatus};
pub use sqlite_store::{SettingRecord, SqliteStore};
pub use store::{MemoryStore, SettingsStore, keys};
pub use ui_state::UiState;
