//! Order submission pipeline
//!
//! `Draft → Validated → (AuthPending) → Submitted → {Filled | Canceled | Rejected}`
//!
//! The order id and `created_at` are assigned once, when the draft has passed
//! validation and the step-up gate. After that the order only moves forward;
//! every transition goes through `watch::Sender::send_if_modified` so the
//! "still pending?" check and the write happen together.

use crate::config::EngineConfig;
use crate::oms::auth::StepUpAuthGate;
use crate::oms::error::{CancelError, OrderError, OrderResult};
use crate::oms::fees::FeeCalculation;
use crate::oms::preview::{OrderPreview, PreviewBuilder};
use crate::oms::settlement::{FillOutcome, FillReceiver, SettlementBackend};
use crate::oms::types::{Order, OrderDraft, OrderId, OrderStatus};
use crate::oms::validator::ValidationResult;
use crate::Money;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

type OrderRegistry = Arc<RwLock<HashMap<OrderId, watch::Sender<Order>>>>;

/// How long a refused cancel waits for an outcome already sent by settlement
const CANCEL_GRACE: Duration = Duration::from_millis(100);

pub struct SubmissionPipeline {
    preview: PreviewBuilder,
    gate: StepUpAuthGate,
    backend: Arc<dyn SettlementBackend>,
    orders: OrderRegistry,
}

impl SubmissionPipeline {
    pub fn new(
        preview: PreviewBuilder,
        gate: StepUpAuthGate,
        backend: Arc<dyn SettlementBackend>,
    ) -> Self {
        Self {
            preview,
            gate,
            backend,
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &EngineConfig, backend: Arc<dyn SettlementBackend>) -> Self {
        Self::new(
            PreviewBuilder::from_config(config),
            StepUpAuthGate::from_config(&config.auth),
            backend,
        )
    }

    pub fn validate_order(&self, draft: &OrderDraft) -> ValidationResult {
        self.preview.validator().validate(draft)
    }

    pub fn compute_fees(&self, draft: &OrderDraft, reference_price: Money) -> FeeCalculation {
        self.preview.fee_engine().compute_fees(draft, reference_price)
    }

    pub fn build_preview(
        &self,
        draft: &OrderDraft,
        reference_price: Money,
        total_liquidity: Money,
    ) -> OrderPreview {
        self.preview.build_preview(draft, reference_price, total_liquidity)
    }

    /// Validate, gate, and hand the order to settlement
    ///
    /// Returns the order in `Pending`; its fill is applied in the background.
    /// Use [`subscribe`](Self::subscribe) or
    /// [`wait_for_terminal`](Self::wait_for_terminal) to observe it.
    pub async fn place_order(
        &self,
        draft: &OrderDraft,
        auth_code: Option<&str>,
    ) -> OrderResult<Order> {
        let validation = self.validate_order(draft);
        if !validation.valid {
            warn!(symbol = %draft.symbol, errors = ?validation.errors, "Order rejected by validation");
            return Err(OrderError::ValidationFailed(validation.errors));
        }
        for warning in &validation.warnings {
            info!(symbol = %draft.symbol, "Order warning: {}", warning);
        }

        self.gate.check(draft, auth_code).await?;

        let order = Order::from_draft(draft);
        let fill = self.backend.submit(&order).await.map_err(|e| {
            warn!(order_id = order.id, error = %e, "Settlement refused order");
            OrderError::SubmissionFailed(e.to_string())
        })?;

        let (tx, _rx) = watch::channel(order.clone());
        self.orders.write().insert(order.id, tx);

        info!(
            order_id = order.id,
            symbol = %order.symbol,
            side = %order.side,
            order_type = %order.order_type,
            quantity = %order.quantity,
            "Order submitted"
        );

        tokio::spawn(await_fill(Arc::clone(&self.orders), order.id, fill));
        Ok(order)
    }

    /// Cancel a pending order
    ///
    /// Settlement is asked first; the local order only moves to `Canceled`
    /// once settlement agrees. A fill that lands while the request is in
    /// flight wins and the call returns `AlreadyTerminal`.
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<(), CancelError> {
        let current = self.get_order(order_id).ok_or(CancelError::NotFound(order_id))?;
        if current.status.is_terminal() {
            return Err(CancelError::AlreadyTerminal {
                id: order_id,
                status: current.status,
            });
        }

        if let Err(e) = self.backend.cancel(order_id).await {
            // Settlement may have resolved the order just before the cancel
            if let Some(order) = self.settle_grace(order_id).await {
                warn!(order_id, status = ?order.status, "Cancel lost race with settlement outcome");
                return Err(CancelError::AlreadyTerminal {
                    id: order_id,
                    status: order.status,
                });
            }
            warn!(order_id, error = %e, "Settlement refused cancel");
            return Err(CancelError::Settlement {
                id: order_id,
                reason: e.to_string(),
            });
        }

        let orders = self.orders.read();
        let tx = orders.get(&order_id).ok_or(CancelError::NotFound(order_id))?;
        let mut result = Ok(());
        tx.send_if_modified(|order| {
            if order.status.is_terminal() {
                result = Err(CancelError::AlreadyTerminal {
                    id: order_id,
                    status: order.status,
                });
                return false;
            }
            order.status = OrderStatus::Canceled;
            true
        });

        match &result {
            Ok(()) => info!(order_id, "Order canceled"),
            Err(e) => warn!(order_id, error = %e, "Cancel lost race with settlement outcome"),
        }
        result
    }

    /// Terminal order if an in-flight outcome lands within `CANCEL_GRACE`
    async fn settle_grace(&self, order_id: OrderId) -> Option<Order> {
        tokio::time::timeout(CANCEL_GRACE, self.wait_for_terminal(order_id))
            .await
            .ok()
            .flatten()
    }

    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.read().get(&order_id).map(|tx| tx.borrow().clone())
    }

    /// Every order this pipeline has created, oldest first
    pub fn orders(&self) -> Vec<Order> {
        let mut all: Vec<Order> = self
            .orders
            .read()
            .values()
            .map(|tx| tx.borrow().clone())
            .collect();
        all.sort_by_key(|o| o.id);
        all
    }

    /// Receiver that observes every status change of `order_id`
    pub fn subscribe(&self, order_id: OrderId) -> Option<watch::Receiver<Order>> {
        self.orders.read().get(&order_id).map(|tx| tx.subscribe())
    }

    /// Resolve once the order reaches a terminal status
    ///
    /// Never resolves for an order whose settlement outcome never arrives;
    /// callers impose their own deadline.
    pub async fn wait_for_terminal(&self, order_id: OrderId) -> Option<Order> {
        let mut rx = self.subscribe(order_id)?;
        let order = rx.wait_for(|o| o.status.is_terminal()).await.ok()?.clone();
        Some(order)
    }
}

async fn await_fill(orders: OrderRegistry, order_id: OrderId, fill: FillReceiver) {
    match fill.await {
        Ok(outcome) => {
            apply_outcome(&orders, order_id, outcome);
        }
        Err(_) => {
            let status = orders
                .read()
                .get(&order_id)
                .map(|tx| tx.borrow().status);
            if status == Some(OrderStatus::Pending) {
                warn!(order_id, "Settlement dropped the fill without an outcome; order stays pending");
            } else {
                debug!(order_id, ?status, "Fill channel closed after terminal status");
            }
        }
    }
}

/// Apply a settlement outcome if the order is still pending
fn apply_outcome(orders: &OrderRegistry, order_id: OrderId, outcome: FillOutcome) -> bool {
    let orders = orders.read();
    let Some(tx) = orders.get(&order_id) else {
        warn!(order_id, "Settlement outcome for unknown order");
        return false;
    };

    let mut previous = None;
    let applied = tx.send_if_modified(|order| {
        if order.status.is_terminal() {
            previous = Some(order.status);
            return false;
        }
        match outcome {
            FillOutcome::Filled { at } => {
                order.status = OrderStatus::Filled;
                order.filled_at = Some(at.max(order.created_at));
            }
            FillOutcome::Rejected { reason } => {
                order.status = OrderStatus::Rejected;
                order.reject_reason = Some(reason);
            }
        }
        true
    });

    if applied {
        let order = tx.borrow();
        match order.status {
            OrderStatus::Filled => info!(order_id, filled_at = ?order.filled_at, "Order filled"),
            _ => warn!(order_id, reason = ?order.reject_reason, "Order rejected by settlement"),
        }
    } else {
        warn!(
            order_id,
            status = ?previous,
            "Settlement outcome arrived for a terminal order; caller must reconcile"
        );
    }
    applied
}
