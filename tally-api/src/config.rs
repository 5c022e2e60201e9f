use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};
use timesheet::domain::CategoryDefinition;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub data: DataSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct DataSettings {
    /// CSV export URL of the source sheet. When unset, the dashboard runs
    /// on uploaded files only.
    pub sheet_url: Option<String>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub refresh_interval_secs: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub cache_ttl_secs: u64,
    /// Debounce window for coalescing refresh triggers, in milliseconds.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub debounce_millis: u64,
    pub org_file: String,
}

/// Static organization tables: rates, categories and the task display
/// order. Loaded once at startup; the core treats them as immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgConfig {
    pub default_rate: f64,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub task_order: Vec<String>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("TALLY")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub fn read_org_config(path: &str) -> Result<OrgConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize::<OrgConfig>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
