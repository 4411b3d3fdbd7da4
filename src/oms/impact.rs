//! Price impact and slippage estimation
//!
//! Linear scalar-liquidity approximation: impact is the trade's share of
//! total liquidity, in percent, capped at `max_impact_pct`. This is not an
//! order-book walk; [`crate::oms::depth`] holds the ladder if a walk is ever
//! wanted.

use crate::config::ImpactConfig;
use crate::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Advisory risk band for an impact percentage
///
/// Half-open intervals: `[0,1)` low, `[1,3)` moderate, `[3,5)` high,
/// `[5,∞)` extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskBand {
    pub fn classify(impact_pct: Decimal) -> Self {
        if impact_pct < dec!(1) {
            RiskBand::Low
        } else if impact_pct < dec!(3) {
            RiskBand::Moderate
        } else if impact_pct < dec!(5) {
            RiskBand::High
        } else {
            RiskBand::Extreme
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            RiskBand::Low => "Minimal price impact expected",
            RiskBand::Moderate => "Moderate price impact; consider splitting the order",
            RiskBand::High => "High price impact; consider reducing the order size",
            RiskBand::Extreme => "Extreme price impact; order is large relative to available liquidity",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "moderate",
            RiskBand::High => "high",
            RiskBand::Extreme => "extreme",
        };
        f.write_str(s)
    }
}

/// Estimated effect of a trade on price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceImpact {
    /// Percent, in `[0, max_impact_pct]`
    pub impact_pct: Decimal,
    pub expected_price: Money,
    /// Unsigned impact, in percent
    pub slippage_pct: Decimal,
    pub band: RiskBand,
    pub advisory: String,
    /// Size keeping impact under 2% at the default fraction
    pub recommended_max_size: Money,
}

#[derive(Debug, Clone, Default)]
pub struct ImpactEstimator {
    config: ImpactConfig,
}

impl ImpactEstimator {
    pub fn new(config: ImpactConfig) -> Self {
        Self { config }
    }

    /// Impact in percent. Zero for empty trades or empty liquidity.
    pub fn impact_pct(&self, trade_amount: Money, total_liquidity: Money) -> Decimal {
        // Negative inputs are degenerate the same way zero is
        if !trade_amount.is_positive() || !total_liquidity.is_positive() {
            return Decimal::ZERO;
        }
        // Overflow means the trade dwarfs the book; that is the cap
        trade_amount
            .checked_div(total_liquidity)
            .and_then(|share| share.inner().checked_mul(dec!(100)))
            .map_or(self.config.max_impact_pct, |pct| pct.min(self.config.max_impact_pct))
    }

    pub fn estimate(
        &self,
        trade_amount: Money,
        reference_price: Money,
        total_liquidity: Money,
    ) -> PriceImpact {
        let impact_pct = self.impact_pct(trade_amount, total_liquidity);
        let expected_price = reference_price * (Decimal::ONE + impact_pct / dec!(100));
        let band = RiskBand::classify(impact_pct);

        debug!(
            trade_amount = %trade_amount,
            total_liquidity = %total_liquidity,
            impact_pct = %impact_pct,
            band = %band,
            "Estimated price impact"
        );

        PriceImpact {
            impact_pct,
            expected_price,
            slippage_pct: impact_pct.abs(),
            band,
            advisory: band.advisory().to_string(),
            recommended_max_size: total_liquidity.max(Money::ZERO)
                * self.config.recommended_size_fraction,
        }
    }
}
