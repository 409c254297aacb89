pub mod loader;
pub mod model;

pub use loader::ConfigLoader;
pub use model::{AppConfig, I18nConfig, NetworkConfig, NetworkDefaults, PriceChartOptions};
