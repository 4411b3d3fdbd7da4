//! Maker/taker fee computation

use crate::config::FeeConfig;
use crate::oms::types::{OrderDraft, OrderType};
use crate::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the liquidity an order is assumed to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liquidity {
    /// Adds resting liquidity
    Maker,
    /// Executes immediately against resting liquidity
    Taker,
}

impl Liquidity {
    /// Limit orders rest; every other type is assumed to cross
    pub fn classify(order_type: OrderType) -> Self {
        match order_type {
            OrderType::Limit => Liquidity::Maker,
            OrderType::Market | OrderType::StopLoss | OrderType::StopLimit => Liquidity::Taker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCalculation {
    pub maker_fee: Money,
    pub taker_fee: Money,
    pub estimated_fee: Money,
    pub fee_asset: String,
    pub liquidity: Liquidity,
}

/// Stateless fee calculator over a fixed schedule
#[derive(Debug, Clone, Default)]
pub struct FeeEngine {
    config: FeeConfig,
}

impl FeeEngine {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    pub fn maker_rate(&self) -> Decimal {
        self.config.maker_rate
    }

    pub fn taker_rate(&self) -> Decimal {
        self.config.taker_rate
    }

    /// Fees on `(price ?? reference_price) × quantity`
    pub fn compute_fees(&self, draft: &OrderDraft, reference_price: Money) -> FeeCalculation {
        let notional = draft.notional_at(reference_price);
        let maker_fee = notional * self.config.maker_rate;
        let taker_fee = notional * self.config.taker_rate;
        let liquidity = Liquidity::classify(draft.order_type);

        FeeCalculation {
            maker_fee,
            taker_fee,
            estimated_fee: match liquidity {
                Liquidity::Maker => maker_fee,
                Liquidity::Taker => taker_fee,
            },
            fee_asset: self.config.fee_asset.clone(),
            liquidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limit_is_maker() {
        let engine = FeeEngine::default();
        let draft = OrderDraft::limit("BTC-YES", Side::Buy, Money::from_i64(100), Money::new(dec!(0.65)));
        let fees = engine.compute_fees(&draft, Money::new(dec!(0.65)));

        assert_eq!(fees.liquidity, Liquidity::Maker);
        assert_eq!(fees.maker_fee, Money::new(dec!(0.065)));
        assert_eq!(fees.taker_fee, Money::new(dec!(0.13)));
        assert_eq!(fees.estimated_fee, fees.maker_fee);
        assert_eq!(fees.fee_asset, "USD");
    }

    #[test]
    fn test_non_limit_types_are_taker() {
        let engine = FeeEngine::default();
        let drafts = [
            OrderDraft::market("A", Side::Buy, Money::from_i64(10)),
            OrderDraft::stop_loss("A", Side::Sell, Money::from_i64(10), Money::from_i64(2)),
            OrderDraft::stop_limit("A", Side::Sell, Money::from_i64(10), Money::from_i64(2), Money::from_i64(2)),
        ];
        for draft in drafts {
            let fees = engine.compute_fees(&draft, Money::from_i64(2));
            assert_eq!(fees.liquidity, Liquidity::Taker);
            assert_eq!(fees.estimated_fee, fees.taker_fee);
        }
    }

    #[test]
    fn test_market_uses_reference_price() {
        let engine = FeeEngine::default();
        let draft = OrderDraft::market("A", Side::Buy, Money::from_i64(1000));
        let fees = engine.compute_fees(&draft, Money::new(dec!(0.5)));
        // 500 notional at 0.20%
        assert_eq!(fees.estimated_fee, Money::from_i64(1));
    }

    #[test]
    fn test_custom_schedule() {
        let engine = FeeEngine::new(FeeConfig {
            maker_rate: Decimal::ZERO,
            taker_rate: dec!(0.01),
            fee_asset: "USDC".to_string(),
        });
        let draft = OrderDraft::limit("A", Side::Sell, Money::from_i64(10), Money::from_i64(10));
        let fees = engine.compute_fees(&draft, Money::ZERO);
        assert_eq!(fees.estimated_fee, Money::ZERO);
        assert_eq!(fees.taker_fee, Money::ONE);
        assert_eq!(fees.fee_asset, "USDC");
    }

    #[test]
    fn test_missing_quantity_costs_nothing() {
        let engine = FeeEngine::default();
        let mut draft = OrderDraft::market("A", Side::Buy, Money::ONE);
        draft.quantity = None;
        assert_eq!(engine.compute_fees(&draft, Money::from_i64(5)).estimated_fee, Money::ZERO);
    }
}
