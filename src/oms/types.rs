//! Core order types
//!
//! Defines drafts, materialized orders, and the status enumeration.
//! Drafts are immutable value objects built by the caller; orders are created
//! exactly once by the submission pipeline.

use crate::{Money, Side, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Order ID type - u64 for performance
pub type OrderId = u64;

/// Atomic counter for order ID generation
static ORDER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate next order ID (thread-safe, lock-free)
pub fn next_order_id() -> OrderId {
    ORDER_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Order type - determines required prices and fee classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Execute immediately against resting liquidity
    Market,

    /// Rest on the book at `price`
    Limit,

    /// Becomes a market order once `stop_price` trades
    StopLoss,

    /// Becomes a limit order at `price` once `stop_price` trades
    StopLimit,
}

impl OrderType {
    pub fn requires_price(self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    pub fn requires_stop_price(self) -> bool {
        matches!(self, OrderType::StopLoss | OrderType::StopLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::StopLoss => "stop-loss",
            OrderType::StopLimit => "stop-limit",
        };
        f.write_str(s)
    }
}

/// Order status
///
/// `Pending` covers an order that has been handed to settlement and is
/// awaiting its fill. The other three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Filled,
    Canceled,
    Rejected,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Filled => "filled",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Caller-constructed trade intent
///
/// `quantity` is optional and `symbol` may be blank so that incomplete
/// input from the UI can still be validated and reported on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub symbol: Symbol,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Money>,
}

impl OrderDraft {
    pub fn market(symbol: impl AsRef<str>, side: Side, quantity: Money) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            order_type: OrderType::Market,
            side,
            quantity: Some(quantity),
            price: None,
            stop_price: None,
        }
    }

    pub fn limit(symbol: impl AsRef<str>, side: Side, quantity: Money, price: Money) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            order_type: OrderType::Limit,
            side,
            quantity: Some(quantity),
            price: Some(price),
            stop_price: None,
        }
    }

    pub fn stop_loss(symbol: impl AsRef<str>, side: Side, quantity: Money, stop_price: Money) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            order_type: OrderType::StopLoss,
            side,
            quantity: Some(quantity),
            price: None,
            stop_price: Some(stop_price),
        }
    }

    pub fn stop_limit(
        symbol: impl AsRef<str>,
        side: Side,
        quantity: Money,
        price: Money,
        stop_price: Money,
    ) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            order_type: OrderType::StopLimit,
            side,
            quantity: Some(quantity),
            price: Some(price),
            stop_price: Some(stop_price),
        }
    }

    /// Quantity with a missing value read as zero
    pub fn quantity_or_zero(&self) -> Money {
        self.quantity.unwrap_or(Money::ZERO)
    }

    /// `quantity × price`, falling back to `reference_price` when the draft
    /// carries no price of its own. Saturates at `Money::MAX`.
    pub fn notional_at(&self, reference_price: Money) -> Money {
        self.price.unwrap_or(reference_price) * self.quantity_or_zero()
    }
}

/// Materialized order
///
/// Invariant: `filled_at.is_some()` iff `status == Filled`, and
/// `filled_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Money>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_at: Option<DateTime<Utc>>,
    /// Reason reported by settlement when the order ends `Rejected`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

impl Order {
    /// Promote a validated draft. Assigns the id and creation time.
    pub(crate) fn from_draft(draft: &OrderDraft) -> Self {
        Self {
            id: next_order_id(),
            symbol: draft.symbol.clone(),
            order_type: draft.order_type,
            side: draft.side,
            quantity: draft.quantity_or_zero(),
            price: draft.price,
            stop_price: draft.stop_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            filled_at: None,
            reject_reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_generation() {
        let id1 = next_order_id();
        let id2 = next_order_id();
        assert!(id2 > id1);
    }

    #[test]
    fn test_order_from_draft() {
        let draft = OrderDraft::limit("BTC-YES", Side::Buy, Money::from_i64(100), Money::from_f64(0.65));
        let order = Order::from_draft(&draft);

        assert_eq!(order.symbol.as_str(), "BTC-YES");
        assert_eq!(order.quantity, Money::from_i64(100));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.filled_at.is_none());
        assert!(order.is_active());

        let other = Order::from_draft(&draft);
        assert_ne!(order.id, other.id);
    }

    #[test]
    fn test_draft_json_shape() {
        let json = r#"{"symbol":"BTC-YES","type":"stop-limit","side":"sell","quantity":5,"price":"0.40","stop_price":0.45}"#;
        let draft: OrderDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.order_type, OrderType::StopLimit);
        assert_eq!(draft.side, Side::Sell);
        assert_eq!(draft.stop_price, Some(Money::from_f64(0.45)));
    }

    #[test]
    fn test_draft_missing_fields_deserialize() {
        let draft: OrderDraft = serde_json::from_str(r#"{"type":"market","side":"buy"}"#).unwrap();
        assert!(draft.symbol.is_blank());
        assert!(draft.quantity.is_none());
    }

    #[test]
    fn test_notional_falls_back_to_reference() {
        let market = OrderDraft::market("X", Side::Buy, Money::from_i64(10));
        assert_eq!(market.notional_at(Money::from_i64(2)), Money::from_i64(20));

        let limit = OrderDraft::limit("X", Side::Buy, Money::from_i64(10), Money::from_i64(3));
        assert_eq!(limit.notional_at(Money::from_i64(2)), Money::from_i64(30));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }
}
