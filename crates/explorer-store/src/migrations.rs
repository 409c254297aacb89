use explorer_common::Result;
use explorer_config::{AppConfig, PriceChartOptions};
use serde_json::Value;
use tracing::debug;

use crate::store::{SettingsStore, keys};
use crate::ui_state::UiState;

/// Migration system for upgrading persisted frontend settings.
///
/// Each migration detects a legacy shape in the store, rewrites it to the
/// current one, and is a no-op once the current shape is in place. Migrations
/// run in `Migration::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    LocaleNormalization,
    PriceChartConsolidation,
}

/// Whether a migration changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    Skipped,
}

/// Collaborators resolved once at startup and handed to every migration.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    pub enabled_locales: Vec<String>,
    pub price_chart_defaults: PriceChartOptions,
    pub ui: UiState,
}

impl MigrationContext {
    pub fn new(
        enabled_locales: Vec<String>,
        price_chart_defaults: PriceChartOptions,
        ui: UiState,
    ) -> Self {
        Self {
            enabled_locales,
            price_chart_defaults,
            ui,
        }
    }

    /// Resolve the active network's defaults and hydrate the UI state from `store`.
    pub fn from_config(config: &AppConfig, store: &dyn SettingsStore) -> Result<Self> {
        let defaults = config.network_defaults()?.price_chart_options.clone();
        let ui = UiState::hydrate(store, &defaults)?;
        Ok(Self::new(config.i18n.enabled_locales.clone(), defaults, ui))
    }

    fn is_enabled_locale(&self, locale: &str) -> bool {
        self.enabled_locales.iter().any(|l| l == locale)
    }
}

impl Migration {
    pub const ALL: [Migration; 2] = [
        Migration::LocaleNormalization,
        Migration::PriceChartConsolidation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Migration::LocaleNormalization => "languageKey",
            Migration::PriceChartConsolidation => "priceChart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    pub fn apply(
        self,
        store: &dyn SettingsStore,
        ctx: &MigrationContext,
    ) -> Result<MigrationOutcome> {
        match self {
            Migration::LocaleNormalization => normalize_language(store, ctx),
            Migration::PriceChartConsolidation => consolidate_price_chart(store, ctx),
        }
    }
}

fn normalize_language(store: &dyn SettingsStore, ctx: &MigrationContext) -> Result<MigrationOutcome> {
    let Some(language) = store.get(keys::LANGUAGE)?.filter(|l| !l.is_empty()) else {
        return Ok(MigrationOutcome::Skipped);
    };
    if ctx.is_enabled_locale(&language) {
        return Ok(MigrationOutcome::Skipped);
    }

    let normalized = normalize_locale(&language);
    if normalized == language {
        return Ok(MigrationOutcome::Skipped);
    }
    debug!("normalizing language {language} -> {normalized}");
    store.set(keys::LANGUAGE, &normalized)?;
    Ok(MigrationOutcome::Applied)
}

/// `<language>-<REGION>`; a bare language code doubles as its own region.
pub fn normalize_locale(locale: &str) -> String {
    let mut parts = locale.split('-');
    let language = parts.next().unwrap_or_default();
    let region = parts.next().unwrap_or(language);
    format!("{language}-{}", region.to_uppercase())
}

/// `priceChart` must hold a JSON boolean; any other JSON value is rejected so
/// the stored `enabled` field is always a bool.
fn consolidate_price_chart(
    store: &dyn SettingsStore,
    ctx: &MigrationContext,
) -> Result<MigrationOutcome> {
    let price_chart = store.get(keys::PRICE_CHART)?.filter(|v| !v.is_empty());
    let period = store.get(keys::PRICE_CHART_PERIOD)?.filter(|v| !v.is_empty());

    if price_chart.is_none() && period.is_none() {
        return Ok(MigrationOutcome::Skipped);
    }

    let enabled = match price_chart.as_deref() {
        Some(raw) if raw != "undefined" => serde_json::from_str::<bool>(raw)?,
        _ => ctx.price_chart_defaults.enabled,
    };
    let period = period.unwrap_or_else(|| ctx.price_chart_defaults.period.clone());

    let mut options = ctx.ui.price_chart_options().clone();
    options.insert("enabled".to_string(), Value::Bool(enabled));
    options.insert("period".to_string(), Value::String(period));

    store.set(
        keys::PRICE_CHART_OPTIONS,
        &serde_json::to_string(&Value::Object(options))?,
    )?;
    store.remove(keys::PRICE_CHART)?;
    store.remove(keys::PRICE_CHART_PERIOD)?;

    Ok(MigrationOutcome::Applied)
}
