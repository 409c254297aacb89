use std::collections::BTreeMap;

use explorer_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the explorer frontend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Active deployment identifier, a key into `networks`.
    pub network: String,
    pub i18n: I18nConfig,
    pub networks: BTreeMap<String, NetworkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub enabled_locales: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub defaults: NetworkDefaults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDefaults {
    pub price_chart_options: PriceChartOptions,
}

/// Price chart display options as the frontend persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChartOptions {
    pub enabled: bool,
    pub period: String,
}

impl Default for PriceChartOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            period: "day".to_string(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            enabled_locales: vec!["en-GB".to_string()],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert("mainnet".to_string(), NetworkConfig::default());
        networks.insert("devnet".to_string(), NetworkConfig::default());
        Self {
            network: "mainnet".to_string(),
            i18n: I18nConfig::default(),
            networks,
        }
    }
}

impl AppConfig {
    /// Defaults of the active network.
    pub fn network_defaults(&self) -> Result<&NetworkDefaults> {
        self.networks
            .get(&self.network)
            .map(|n| &n.defaults)
            .ok_or_else(|| Error::Config(format!("unknown network: {}", self.network)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_mainnet() {
        let config = AppConfig::default();
        let defaults = config.network_defaults().unwrap();
        assert!(defaults.price_chart_options.enabled);
        assert_eq!(defaults.price_chart_options.period, "day");
    }

    #[test]
    fn unknown_network_is_config_error() {
        let config = AppConfig {
            network: "nowhere".to_string(),
            ..AppConfig::default()
        };
        let err = config.network_defaults().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "configuration error: unknown network: nowhere");
    }

    #[test]
    fn default_enabled_locales() {
        let config = AppConfig::default();
        assert_eq!(config.i18n.enabled_locales, vec!["en-GB"]);
    }

    #[test]
    fn price_chart_options_serialize_camel_case() {
        let opts = PriceChartOptions {
            enabled: false,
            period: "week".to_string(),
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json, serde_json::json!({"enabled": false, "period": "week"}));
    }
}
