//! Structural and semantic checks on order drafts
//!
//! Errors block submission; warnings are advisory and never affect `valid`.

use crate::config::ValidationConfig;
use crate::oms::types::{OrderDraft, OrderType};
use crate::{Money, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of validating a draft. `valid == errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Pure draft validator
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, draft: &OrderDraft) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if draft.symbol.is_blank() {
            errors.push("Symbol is required".to_string());
        }

        if !draft.quantity.is_some_and(Money::is_positive) {
            errors.push("Quantity must be greater than 0".to_string());
        }

        if draft.order_type.requires_price() && !draft.price.is_some_and(Money::is_positive) {
            errors.push(format!(
                "Limit price must be greater than 0 for {} orders",
                draft.order_type
            ));
        }

        if draft.order_type.requires_stop_price()
            && !draft.stop_price.is_some_and(Money::is_positive)
        {
            errors.push(format!(
                "Stop price must be greater than 0 for {} orders",
                draft.order_type
            ));
        }

        if draft.order_type == OrderType::StopLimit {
            if let (Some(price), Some(stop)) = (draft.price, draft.stop_price) {
                match draft.side {
                    Side::Buy if price < stop => warnings.push(format!(
                        "Limit price {} is below stop price {} for a buy stop-limit order",
                        price, stop
                    )),
                    Side::Sell if price > stop => warnings.push(format!(
                        "Limit price {} is above stop price {} for a sell stop-limit order",
                        price, stop
                    )),
                    _ => {}
                }
            }
        }

        if let (Some(quantity), Some(price)) = (draft.quantity, draft.price) {
            match quantity.checked_mul(price) {
                Some(value) if value < self.config.min_order_value => warnings.push(format!(
                    "Order value {} is below the minimum order size of {}",
                    value, self.config.min_order_value
                )),
                Some(_) => {}
                None => errors.push(format!(
                    "Order value {} x {} exceeds the supported range",
                    quantity, price
                )),
            }
        }

        debug!(
            symbol = %draft.symbol,
            order_type = %draft.order_type,
            errors = errors.len(),
            warnings = warnings.len(),
            "Validated draft"
        );

        ValidationResult::from_parts(errors, warnings)
    }
}
