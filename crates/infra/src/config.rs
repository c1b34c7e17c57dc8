//! Configuration loading and representation.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file). Every key has a default.

use thiserror::Error;

use tillbook_analytics::RangeSelector;
use tillbook_inventory::DEFAULT_LOW_STOCK_THRESHOLD;

pub const DEFAULT_RANGE_KEY: &str = "TILLBOOK_DEFAULT_RANGE";
pub const LOW_STOCK_THRESHOLD_KEY: &str = "TILLBOOK_LOW_STOCK_THRESHOLD";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Range used by summary reports when the caller names none.
    pub default_range: RangeSelector,
    /// Threshold for inventory rows registered without one.
    pub low_stock_threshold: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_range: RangeSelector::DAYS_30,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Load from environment variables (after reading `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEFAULT_RANGE_KEY).filter(|s| !s.trim().is_empty()) {
            config.default_range = raw.trim().parse::<RangeSelector>().map_err(|e| ConfigError::Invalid {
                key: DEFAULT_RANGE_KEY,
                reason: format!("{e}"),
            })?;
        }

        if let Some(raw) = lookup(LOW_STOCK_THRESHOLD_KEY).filter(|s| !s.trim().is_empty()) {
            let threshold: i64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: LOW_STOCK_THRESHOLD_KEY,
                reason: format!("{e}"),
            })?;
            if threshold < 0 {
                return Err(ConfigError::Invalid {
                    key: LOW_STOCK_THRESHOLD_KEY,
                    reason: "must not be negative".to_string(),
                });
            }
            config.low_stock_threshold = threshold;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tillbook_analytics::Lookback;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (DEFAULT_RANGE_KEY, "90d"),
            (LOW_STOCK_THRESHOLD_KEY, "12"),
        ]))
        .unwrap();
        assert_eq!(config.default_range, RangeSelector::Lookback(Lookback::Days(90)));
        assert_eq!(config.low_stock_threshold, 12);
    }

    #[test]
    fn custom_is_not_a_valid_default_range() {
        let err = AppConfig::from_lookup(lookup(&[(DEFAULT_RANGE_KEY, "custom")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: DEFAULT_RANGE_KEY, .. }));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(LOW_STOCK_THRESHOLD_KEY, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: LOW_STOCK_THRESHOLD_KEY, .. }));
    }
}
