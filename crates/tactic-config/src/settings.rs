//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tactic_core::error::PolicyError;
use tactic_core::traits::PolicyConfig;
use tactic_core::types::ExecutionMode;
use tactic_policies::{MomentumReversalConfig, RsiThresholdConfig, TrendFollowConfig};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub execution: ExecutionSettings,
    #[serde(default)]
    pub replay: ReplaySettings,
    #[serde(default)]
    pub policies: PoliciesConfig,
}

impl AppConfig {
    /// Validate every configured policy section.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if let Some(config) = &self.policies.rsi_threshold {
            config.validate()?;
        }
        if let Some(config) = &self.policies.momentum_reversal {
            config.validate()?;
        }
        if let Some(config) = &self.policies.trend_follow {
            config.validate()?;
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "tactic".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// How decisions are acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// auto_execute submits orders; notify_only logs them
    pub mode: ExecutionMode,
    /// Quantity per entry order
    pub order_quantity: Decimal,
    /// Optional buying-power limit for the paper gateway
    pub cash: Option<Decimal>,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::AutoExecute,
            order_quantity: Decimal::ONE,
            cash: None,
        }
    }
}

/// Replay harness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySettings {
    /// Bars retained per instrument series
    pub series_capacity: usize,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            series_capacity: 500,
        }
    }
}

/// Per-policy parameter sections; absent sections fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PoliciesConfig {
    pub rsi_threshold: Option<RsiThresholdConfig>,
    pub momentum_reversal: Option<MomentumReversalConfig>,
    pub trend_follow: Option<TrendFollowConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.execution.mode, ExecutionMode::AutoExecute);
        assert_eq!(config.replay.series_capacity, 500);
        assert!(config.policies.rsi_threshold.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = r#"
            [app]
            name = "tactic"
            environment = "test"

            [execution]
            mode = "notify_only"
            order_quantity = "2"

            [policies.rsi_threshold]
            period = 9
            oversold = 25.0
            overbought = 75.0
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.execution.mode, ExecutionMode::NotifyOnly);
        assert_eq!(
            config.policies.rsi_threshold.as_ref().unwrap().period,
            9
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_flags_bad_policy_section() {
        let mut config = AppConfig::default();
        config.policies.rsi_threshold = Some(RsiThresholdConfig {
            period: 14,
            oversold: 80.0,
            overbought: 20.0,
        });
        assert!(config.validate().is_err());
    }
}
