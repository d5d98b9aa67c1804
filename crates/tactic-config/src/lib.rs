//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ExecutionSettings, LoggingConfig, PoliciesConfig, ReplaySettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed `TACTIC_` override file values, with `__`
/// separating nesting levels, e.g. `TACTIC_EXECUTION__MODE=notify_only`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TACTIC")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
