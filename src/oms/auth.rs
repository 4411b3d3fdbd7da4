//! Step-up authentication for high-notional orders
//!
//! Orders whose `quantity × price` exceeds the configured threshold need a
//! secondary code. Code checking sits behind [`CodeVerifier`];
//! [`PlaceholderVerifier`] only checks the code's length and must be
//! swapped for a real TOTP/WebAuthn verifier before production use.

use crate::config::AuthConfig;
use crate::oms::error::OrderError;
use crate::oms::types::OrderDraft;
use crate::Money;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Checks a secondary authentication code with an identity provider
#[async_trait]
pub trait CodeVerifier: Send + Sync {
    async fn verify(&self, code: &str) -> bool;
}

/// Accepts any code of exactly `code_length` characters
#[derive(Debug, Clone)]
pub struct PlaceholderVerifier {
    code_length: usize,
}

impl PlaceholderVerifier {
    pub fn new(code_length: usize) -> Self {
        warn!(
            code_length,
            "Using placeholder step-up verifier; this is not a security control"
        );
        Self { code_length }
    }
}

#[async_trait]
impl CodeVerifier for PlaceholderVerifier {
    async fn verify(&self, code: &str) -> bool {
        code.chars().count() == self.code_length
    }
}

/// Threshold policy in front of submission
#[derive(Clone)]
pub struct StepUpAuthGate {
    threshold: Money,
    verifier: Arc<dyn CodeVerifier>,
}

impl std::fmt::Debug for StepUpAuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepUpAuthGate")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl StepUpAuthGate {
    pub fn new(threshold: Money, verifier: Arc<dyn CodeVerifier>) -> Self {
        Self { threshold, verifier }
    }

    /// Gate with the placeholder verifier configured by `config`
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.step_up_threshold,
            Arc::new(PlaceholderVerifier::new(config.code_length)),
        )
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }

    /// `quantity × (price ?? 0)`; market orders carry no price and so are
    /// never gated
    pub fn notional(draft: &OrderDraft) -> Money {
        draft.notional_at(Money::ZERO)
    }

    pub fn requires_step_up(&self, draft: &OrderDraft) -> bool {
        Self::notional(draft) > self.threshold
    }

    /// Pass, or fail with `AuthRequired` / `InvalidAuthCode`
    ///
    /// A missing code fails before the verifier is contacted.
    pub async fn check(&self, draft: &OrderDraft, code: Option<&str>) -> Result<(), OrderError> {
        let notional = Self::notional(draft);
        if notional <= self.threshold {
            return Ok(());
        }

        let Some(code) = code else {
            warn!(notional = %notional, threshold = %self.threshold, "Step-up code required but not supplied");
            return Err(OrderError::AuthRequired {
                notional,
                threshold: self.threshold,
            });
        };

        if self.verifier.verify(code).await {
            debug!(notional = %notional, "Step-up code accepted");
            Ok(())
        } else {
            warn!(notional = %notional, "Step-up code rejected");
            Err(OrderError::InvalidAuthCode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CodeVerifier for CountingVerifier {
        async fn verify(&self, _code: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn big_draft() -> OrderDraft {
        OrderDraft::limit("BTC-YES", Side::Buy, Money::from_i64(20_000), Money::ONE)
    }

    #[tokio::test]
    async fn test_placeholder_checks_length_only() {
        let verifier = PlaceholderVerifier::new(6);
        assert!(verifier.verify("123456").await);
        assert!(verifier.verify("abcdef").await);
        assert!(!verifier.verify("12345").await);
        assert!(!verifier.verify("1234567").await);
        assert!(!verifier.verify("").await);
    }

    #[tokio::test]
    async fn test_under_threshold_passes_without_code() {
        let gate = StepUpAuthGate::from_config(&AuthConfig::default());
        let draft = OrderDraft::limit("A", Side::Buy, Money::from_i64(10_000), Money::ONE);
        assert!(!gate.requires_step_up(&draft));
        assert_eq!(gate.check(&draft, None).await, Ok(()));
    }

    #[tokio::test]
    async fn test_over_threshold_requires_code() {
        let gate = StepUpAuthGate::from_config(&AuthConfig::default());
        let err = gate.check(&big_draft(), None).await.unwrap_err();
        assert!(matches!(err, OrderError::AuthRequired { .. }));
    }

    #[tokio::test]
    async fn test_bad_code_rejected() {
        let gate = StepUpAuthGate::from_config(&AuthConfig::default());
        assert_eq!(gate.check(&big_draft(), Some("123")).await, Err(OrderError::InvalidAuthCode));
        assert_eq!(gate.check(&big_draft(), Some("123456")).await, Ok(()));
    }

    #[tokio::test]
    async fn test_missing_code_never_reaches_verifier() {
        let verifier = Arc::new(CountingVerifier {
            calls: AtomicUsize::new(0),
        });
        let gate = StepUpAuthGate::new(Money::from_i64(10_000), verifier.clone());

        let _ = gate.check(&big_draft(), None).await;
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);

        gate.check(&big_draft(), Some("anything")).await.unwrap();
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_market_orders_have_zero_gate_notional() {
        let draft = OrderDraft::market("A", Side::Buy, Money::from_i64(1_000_000));
        assert_eq!(StepUpAuthGate::notional(&draft), Money::ZERO);
    }
}
