//! Configuration management
//!
//! Handles loading and parsing of the engine's JSON configuration file with
//! environment variable overrides for the values operators tune most often.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::Money;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub impact: ImpactConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub settlement: SettlementConfig,
}

impl EngineConfig {
    /// Load configuration from JSON file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: EngineConfig =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file
    pub fn from_env() -> Result<Self> {
        let mut config = EngineConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fee rates and the step-up threshold from the environment
    ///
    /// `.env` is loaded first if present.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        dotenv::dotenv().ok();

        if let Ok(raw) = std::env::var("ORDER_ENGINE_MAKER_FEE") {
            self.fees.maker_rate = Decimal::from_str(raw.trim())
                .with_context(|| format!("Invalid ORDER_ENGINE_MAKER_FEE: {}", raw))?;
        }
        if let Ok(raw) = std::env::var("ORDER_ENGINE_TAKER_FEE") {
            self.fees.taker_rate = Decimal::from_str(raw.trim())
                .with_context(|| format!("Invalid ORDER_ENGINE_TAKER_FEE: {}", raw))?;
        }
        if let Ok(raw) = std::env::var("ORDER_ENGINE_STEP_UP_THRESHOLD") {
            self.auth.step_up_threshold = Money::from_str(&raw)
                .with_context(|| format!("Invalid ORDER_ENGINE_STEP_UP_THRESHOLD: {}", raw))?;
        }
        Ok(())
    }

    /// Reject values the engine cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.fees.maker_rate.is_sign_negative() || self.fees.taker_rate.is_sign_negative() {
            bail!(
                "fee rates must be non-negative (maker={}, taker={})",
                self.fees.maker_rate,
                self.fees.taker_rate
            );
        }
        if self.fees.fee_asset.trim().is_empty() {
            bail!("fee_asset must not be empty");
        }
        if self.impact.max_impact_pct <= Decimal::ZERO {
            bail!("max_impact_pct must be positive, got {}", self.impact.max_impact_pct);
        }
        if self.impact.recommended_size_fraction.is_sign_negative() {
            bail!(
                "recommended_size_fraction must be non-negative, got {}",
                self.impact.recommended_size_fraction
            );
        }
        if self.auth.code_length == 0 {
            bail!("auth code_length must be at least 1");
        }
        Ok(())
    }
}

/// Maker/taker fee schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub maker_rate: Decimal,
    pub taker_rate: Decimal,
    pub fee_asset: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            maker_rate: dec!(0.001), // 0.10%
            taker_rate: dec!(0.002), // 0.20%
            fee_asset: "USD".to_string(),
        }
    }
}

/// Draft validation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Orders worth less than this get a warning, never an error
    pub min_order_value: Money,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            min_order_value: Money::from_i64(10),
        }
    }
}

/// Linear impact model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Upper bound on reported impact, in percent
    pub max_impact_pct: Decimal,
    /// Share of total liquidity suggested as the largest single order
    pub recommended_size_fraction: Decimal,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        ImpactConfig {
            max_impact_pct: dec!(50),
            recommended_size_fraction: dec!(0.02),
        }
    }
}

/// Step-up authentication policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Notional strictly above this requires a secondary code
    pub step_up_threshold: Money,
    /// Length accepted by the placeholder verifier
    pub code_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            step_up_threshold: Money::from_i64(10_000),
            code_length: 6,
        }
    }
}

/// Simulated settlement backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub paper_fill_delay_ms: u64,
    /// Symbols the paper backend rejects, for exercising the reject path
    #[serde(default)]
    pub reject_symbols: Vec<String>,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig {
            paper_fill_delay_ms: 250,
            reject_symbols: Vec::new(),
        }
    }
}

impl SettlementConfig {
    pub fn fill_delay(&self) -> Duration {
        Duration::from_millis(self.paper_fill_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_published_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.fees.maker_rate, dec!(0.001));
        assert_eq!(config.fees.taker_rate, dec!(0.002));
        assert_eq!(config.fees.fee_asset, "USD");
        assert_eq!(config.validation.min_order_value, Money::from_i64(10));
        assert_eq!(config.impact.max_impact_pct, dec!(50));
        assert_eq!(config.auth.step_up_threshold, Money::from_i64(10_000));
        assert_eq!(config.auth.code_length, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"fees":{"maker_rate":"0.0005","taker_rate":0.001,"fee_asset":"USDC"}}"#)
                .unwrap();
        assert_eq!(config.fees.maker_rate, dec!(0.0005));
        assert_eq!(config.fees.fee_asset, "USDC");
        assert_eq!(config.auth.code_length, 6);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.fees.taker_rate = dec!(-0.1);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.impact.max_impact_pct = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.auth.code_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(EngineConfig::from_file("/nonexistent/engine.json").is_err());
    }
}
