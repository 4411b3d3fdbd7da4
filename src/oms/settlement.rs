//! Settlement backend boundary
//!
//! The engine never matches or settles orders itself. A backend accepts an
//! order and hands back a single fill future; it is the source of truth for
//! fills and cancellations.

use crate::config::SettlementConfig;
use crate::oms::error::SettlementError;
use crate::oms::types::{Order, OrderId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Final word from settlement on a submitted order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Filled { at: DateTime<Utc> },
    Rejected { reason: String },
}

/// Resolves once, when settlement decides the order's fate
pub type FillReceiver = oneshot::Receiver<FillOutcome>;

#[async_trait]
pub trait SettlementBackend: Send + Sync {
    /// Accept an order for execution. An `Err` means it was never accepted.
    async fn submit(&self, order: &Order) -> Result<FillReceiver, SettlementError>;

    /// Ask settlement to cancel an accepted order
    async fn cancel(&self, order_id: OrderId) -> Result<(), SettlementError>;
}

/// Simulated backend that fills every accepted order after a fixed delay
///
/// Symbols in `reject_symbols` are refused at submission. Cancelling before
/// the delay elapses drops the pending fill.
#[derive(Debug)]
pub struct PaperSettlement {
    fill_delay: Duration,
    reject_symbols: HashSet<String>,
    /// Fill tasks not yet fired; each task removes its own entry
    pending: Arc<Mutex<HashMap<OrderId, tokio::task::JoinHandle<()>>>>,
}

impl PaperSettlement {
    pub fn new(fill_delay: Duration) -> Self {
        Self {
            fill_delay,
            reject_symbols: HashSet::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &SettlementConfig) -> Self {
        Self::new(config.fill_delay()).with_rejected_symbols(config.reject_symbols.iter().cloned())
    }

    pub fn with_rejected_symbols(mut self, symbols: impl IntoIterator<Item = String>) -> Self {
        self.reject_symbols.extend(symbols);
        self
    }

    /// Orders accepted but not yet filled or cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[async_trait]
impl SettlementBackend for PaperSettlement {
    async fn submit(&self, order: &Order) -> Result<FillReceiver, SettlementError> {
        if self.reject_symbols.contains(order.symbol.as_str()) {
            return Err(SettlementError::Rejected(format!(
                "symbol {} is not tradable",
                order.symbol
            )));
        }

        let (tx, rx) = oneshot::channel();
        let delay = self.fill_delay;
        let order_id = order.id;
        let pending = Arc::clone(&self.pending);

        // Hold the lock across spawn so the task cannot remove its entry
        // before it is inserted
        let mut guard = self.pending.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.lock().remove(&order_id);
            debug!(order_id, "Paper fill");
            // Receiver may be gone if the engine shut down
            let _ = tx.send(FillOutcome::Filled { at: Utc::now() });
        });
        guard.insert(order_id, handle);
        drop(guard);

        info!(order_id, symbol = %order.symbol, delay_ms = delay.as_millis() as u64, "Paper order accepted");
        Ok(rx)
    }

    async fn cancel(&self, order_id: OrderId) -> Result<(), SettlementError> {
        match self.pending.lock().remove(&order_id) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                info!(order_id, "Paper order cancelled");
                Ok(())
            }
            _ => Err(SettlementError::UnknownOrder(order_id)),
        }
    }
}
