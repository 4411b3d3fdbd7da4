//! Order placement engine
//!
//! Pure quoting path:
//! - [`validator`]: draft checks producing errors and warnings
//! - [`fees`]: maker/taker fee computation
//! - [`impact`]: linear price-impact and slippage estimate with risk bands
//! - [`preview`]: one quote composed from the three above
//!
//! Stateful pieces:
//! - [`depth`]: bid/ask ladder snapshots swapped atomically
//! - [`auth`]: step-up authentication gate for high-notional orders
//! - [`pipeline`]: validate → gate → submit → async fill, plus cancellation
//! - [`settlement`]: boundary to the backend that actually executes orders

pub mod auth;
pub mod depth;
pub mod error;
pub mod fees;
pub mod impact;
pub mod pipeline;
pub mod preview;
pub mod settlement;
pub mod types;
pub mod validator;

// Re-export core types
pub use auth::{CodeVerifier, PlaceholderVerifier, StepUpAuthGate};
pub use depth::{DepthLedger, DepthLevel, DepthSnapshot, DepthUpdate};
pub use error::{CancelError, OrderError, OrderResult, SettlementError};
pub use fees::{FeeCalculation, FeeEngine, Liquidity};
pub use impact::{ImpactEstimator, PriceImpact, RiskBand};
pub use pipeline::SubmissionPipeline;
pub use preview::{OrderPreview, PreviewBuilder};
pub use settlement::{FillOutcome, FillReceiver, PaperSettlement, SettlementBackend};
pub use types::{next_order_id, Order, OrderDraft, OrderId, OrderStatus, OrderType};
pub use validator::{ValidationResult, Validator};
