//! Error types for order placement and cancellation

use crate::oms::types::{OrderId, OrderStatus};
use crate::Money;
use thiserror::Error;

/// Why `place_order` did not produce an order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Draft failed validation; nothing was submitted
    #[error("order validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Notional exceeds the step-up threshold and no code was supplied
    #[error("step-up authentication required for notional {notional} (threshold {threshold})")]
    AuthRequired { notional: Money, threshold: Money },

    #[error("step-up authentication code rejected")]
    InvalidAuthCode,

    /// Settlement refused the order; surfaced verbatim
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
}

/// Why `cancel_order` did not cancel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order {id} is already {status}")]
    AlreadyTerminal { id: OrderId, status: OrderStatus },

    /// Settlement refused the cancellation; the order is unchanged
    #[error("settlement rejected cancel for order {id}: {reason}")]
    Settlement { id: OrderId, reason: String },
}

/// Failure reported by a settlement backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("rejected by settlement: {0}")]
    Rejected(String),

    #[error("settlement unavailable: {0}")]
    Unavailable(String),

    #[error("order {0} unknown to settlement")]
    UnknownOrder(OrderId),
}

pub type OrderResult<T> = Result<T, OrderError>;
