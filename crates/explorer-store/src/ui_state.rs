use explorer_common::Result;
use explorer_config::PriceChartOptions;
use serde_json::{Map, Value};
use tracing::debug;

use crate::store::{SettingsStore, keys};

/// Read-only projection of the frontend UI state consumed by migrations.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    price_chart_options: Map<String, Value>,
}

impl UiState {
    pub fn new(price_chart_options: Map<String, Value>) -> Self {
        Self {
            price_chart_options,
        }
    }

    /// Build the state the way the frontend does on boot: network defaults,
    /// overlaid with any options object already persisted.
    pub fn hydrate(store: &dyn SettingsStore, defaults: &PriceChartOptions) -> Result<Self> {
        let mut options = match serde_json::to_value(defaults)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if let Some(raw) = store.get(keys::PRICE_CHART_OPTIONS)? {
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(stored)) => options.extend(stored),
                _ => debug!("ignoring non-object {}", keys::PRICE_CHART_OPTIONS),
            }
        }

        Ok(Self::new(options))
    }

    pub fn price_chart_options(&self) -> &Map<String, Value> {
        &self.price_chart_options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn defaults() -> PriceChartOptions {
        PriceChartOptions {
            enabled: true,
            period: "day".to_string(),
        }
    }

    #[test]
    fn hydrate_without_stored_options_uses_defaults() {
        let store = MemoryStore::new();
        let state = UiState::hydrate(&store, &defaults()).unwrap();
        assert_eq!(
            Value::Object(state.price_chart_options().clone()),
            json!({"enabled": true, "period": "day"})
        );
    }

    #[test]
    fn hydrate_overlays_stored_object() {
        let store = MemoryStore::from_entries([(
            "priceChartOptions",
            r#"{"period":"week","type":"line"}"#,
        )]);
        let state = UiState::hydrate(&store, &defaults()).unwrap();
        assert_eq!(
            Value::Object(state.price_chart_options().clone()),
            json!({"enabled": true, "period": "week", "type": "line"})
        );
    }

    #[test]
    fn hydrate_ignores_garbage() {
        let store = MemoryStore::from_entries([("priceChartOptions", "not json")]);
        let state = UiState::hydrate(&store, &defaults()).unwrap();
        assert_eq!(state.price_chart_options()["period"], json!("day"));

        let store = MemoryStore::from_entries([("priceChartOptions", "[1,2]")]);
        let state = UiState::hydrate(&store, &defaults()).unwrap();
        assert_eq!(state.price_chart_options().len(), 2);
    }
}
