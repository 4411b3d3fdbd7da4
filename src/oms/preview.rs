//! Read-only order quote composed from validation, fees, and impact

use crate::config::EngineConfig;
use crate::oms::fees::{FeeCalculation, FeeEngine};
use crate::oms::impact::{ImpactEstimator, PriceImpact};
use crate::oms::types::OrderDraft;
use crate::oms::validator::{ValidationResult, Validator};
use crate::{Money, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ephemeral quote for a draft; recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPreview {
    pub order: OrderDraft,
    pub validation: ValidationResult,
    pub fees: FeeCalculation,
    /// `(price ?? reference_price) × quantity`
    pub notional: Money,
    /// Cash out for a buy (notional + fee), cash in for a sell (notional - fee)
    pub estimated_total: Money,
    pub price_impact: PriceImpact,
    /// Percent
    pub slippage: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewBuilder {
    validator: Validator,
    fees: FeeEngine,
    impact: ImpactEstimator,
}

impl PreviewBuilder {
    pub fn new(validator: Validator, fees: FeeEngine, impact: ImpactEstimator) -> Self {
        Self {
            validator,
            fees,
            impact,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Validator::new(config.validation.clone()),
            FeeEngine::new(config.fees.clone()),
            ImpactEstimator::new(config.impact.clone()),
        )
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn fee_engine(&self) -> &FeeEngine {
        &self.fees
    }

    pub fn impact_estimator(&self) -> &ImpactEstimator {
        &self.impact
    }

    /// Quote a draft. Invalid drafts still get a full quote alongside their
    /// errors so the UI can show both.
    pub fn build_preview(
        &self,
        draft: &OrderDraft,
        reference_price: Money,
        total_liquidity: Money,
    ) -> OrderPreview {
        let validation = self.validator.validate(draft);
        let fees = self.fees.compute_fees(draft, reference_price);
        let notional = draft.notional_at(reference_price);
        let price_impact = self.impact.estimate(notional, reference_price, total_liquidity);

        let estimated_total = match draft.side {
            Side::Buy => notional + fees.estimated_fee,
            Side::Sell => notional - fees.estimated_fee,
        };

        OrderPreview {
            order: draft.clone(),
            validation,
            fees,
            notional,
            estimated_total,
            slippage: price_impact.slippage_pct,
            price_impact,
        }
    }
}
