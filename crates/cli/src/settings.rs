//! Layered configuration
//!
//! Precedence, lowest first: built-in defaults, `tempora.{toml,yaml,json}` in
//! the working directory (or the file given with `--config`), `TEMPORA_*`
//! environment variables, command-line flags.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DATABASE_URL: &str = "tempora.db";
pub const DEFAULT_PLATFORM: &str = "sqlite";
pub const DEFAULT_LOG_FILTER: &str = "tempora=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    /// Built-in platform name (sqlite, postgresql, mysql, mssql)
    pub platform: String,
    /// Overrides the platform's date-time layout when set
    pub datetime_format: Option<String>,
    pub log_format: LogFormat,
    pub log_filter: String,
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub platform: Option<String>,
    pub datetime_format: Option<String>,
}

impl Settings {
    pub fn load(config_file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("tempora").required(false),
        };

        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("platform", DEFAULT_PLATFORM)?
            .set_default("log_format", "pretty")?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(file)
            .add_source(Environment::with_prefix("TEMPORA"))
            .set_override_option("database_url", overrides.database_url)?
            .set_override_option("platform", overrides.platform)?
            .set_override_option("datetime_format", overrides.datetime_format)?
            .build()?
            .try_deserialize()
    }

    /// Whether the configured layout is the one entry storage uses.
    pub fn uses_sqlite_layout(&self) -> bool {
        self.platform == DEFAULT_PLATFORM && self.datetime_format.is_none()
    }
}
