//! Order Placement Engine
//!
//! Validation, fee computation, price-impact estimation, and step-up gated
//! submission for a prediction-market trading dashboard. The engine produces
//! decisions and quotes; matching, custody, and settlement belong to an
//! external backend reached through [`oms::SettlementBackend`].
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use order_engine::oms::{OrderDraft, PaperSettlement, SubmissionPipeline};
//! use order_engine::{EngineConfig, Money, Side};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::default();
//!     let backend = Arc::new(PaperSettlement::new(Duration::from_millis(100)));
//!     let engine = SubmissionPipeline::from_config(&config, backend);
//!
//!     let draft = OrderDraft::limit("BTC-YES", Side::Buy, Money::from_i64(100), Money::from_f64(0.65));
//!     let preview = engine.build_preview(&draft, Money::from_f64(0.65), Money::from_i64(10_000));
//!     println!("fee {} impact {}%", preview.fees.estimated_fee, preview.price_impact.impact_pct);
//!
//!     let order = engine.place_order(&draft, None).await?;
//!     let filled = engine.wait_for_terminal(order.id).await;
//!     println!("{:?}", filled.map(|o| o.status));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod oms;
pub mod types;

pub use config::EngineConfig;
pub use types::*;
