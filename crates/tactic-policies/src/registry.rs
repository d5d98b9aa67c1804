//! Policy registry for configuration-driven construction.

use crate::{
    MomentumReversalConfig, MomentumReversalPolicy, RsiThresholdConfig, RsiThresholdPolicy,
    TrendFollowConfig, TrendFollowPolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tactic_core::{
    error::PolicyError,
    traits::{DecisionPolicy, PolicyConfig},
};

/// Information about a registered policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyInfo {
    /// Policy name
    pub name: String,
    /// Policy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for the available decision policies.
pub struct PolicyRegistry {
    policies: HashMap<String, PolicyInfo>,
}

impl PolicyRegistry {
    /// Create a new registry with all built-in policies.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        policies.insert(
            "rsi_threshold".to_string(),
            PolicyInfo {
                name: "rsi_threshold".to_string(),
                description: "Enters oversold instruments, exits overbought ones".to_string(),
                default_config: serde_json::to_value(RsiThresholdConfig::default()).unwrap(),
            },
        );

        policies.insert(
            "momentum_reversal".to_string(),
            PolicyInfo {
                name: "momentum_reversal".to_string(),
                description: "Buys two-bar declines, exits on a fixed bar count".to_string(),
                default_config: serde_json::to_value(MomentumReversalConfig::default()).unwrap(),
            },
        );

        policies.insert(
            "trend_follow".to_string(),
            PolicyInfo {
                name: "trend_follow".to_string(),
                description: "MACD crossover entries trailed by a ratcheting ATR stop"
                    .to_string(),
                default_config: serde_json::to_value(TrendFollowConfig::default()).unwrap(),
            },
        );

        Self { policies }
    }

    /// List all registered policies.
    pub fn list(&self) -> Vec<&PolicyInfo> {
        let mut infos: Vec<&PolicyInfo> = self.policies.values().collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Get policy info by name.
    pub fn get(&self, name: &str) -> Option<&PolicyInfo> {
        self.policies.get(name)
    }

    /// Check if a policy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Create a policy instance from a JSON configuration.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn DecisionPolicy>, PolicyError> {
        match name {
            "rsi_threshold" => {
                let config: RsiThresholdConfig = serde_json::from_value(config)
                    .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(RsiThresholdPolicy::new(config)))
            }
            "momentum_reversal" => {
                let config: MomentumReversalConfig = serde_json::from_value(config)
                    .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(MomentumReversalPolicy::new(config)))
            }
            "trend_follow" => {
                let config: TrendFollowConfig = serde_json::from_value(config)
                    .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(TrendFollowPolicy::new(config)))
            }
            _ => Err(PolicyError::NotFound(name.to_string())),
        }
    }

    /// Create a policy with its default configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn DecisionPolicy>, PolicyError> {
        let info = self
            .get(name)
            .ok_or_else(|| PolicyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = PolicyRegistry::new();
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn test_registry_get() {
        let registry = PolicyRegistry::new();

        assert!(registry.get("trend_follow").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_create_default() {
        let registry = PolicyRegistry::new();

        let policy = registry.create_default("rsi_threshold").unwrap();
        assert_eq!(policy.name(), "rsi_threshold");
    }

    #[test]
    fn test_create_with_config() {
        let registry = PolicyRegistry::new();

        let config = serde_json::json!({
            "period": 9,
            "oversold": 25.0,
            "overbought": 75.0,
        });

        assert!(registry.create("rsi_threshold", config).is_ok());
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let registry = PolicyRegistry::new();

        let config = serde_json::json!({
            "period": 9,
            "oversold": 75.0,
            "overbought": 25.0,
        });

        assert!(registry.create("rsi_threshold", config).is_err());
    }

    #[test]
    fn test_create_unknown_policy() {
        let registry = PolicyRegistry::new();
        assert!(registry.create_default("unknown").is_err());
    }
}
