//! Bid/ask depth ladder read model
//!
//! The ledger owns one immutable [`DepthSnapshot`] at a time. Feed updates
//! replace both ladders wholesale under a single write lock; readers clone
//! the `Arc` and never see a half-applied update.

use crate::{Money, Side};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// One price level. `cumulative_total` is the running sum of `amount` from
/// the best level of its side outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Money,
    pub amount: Money,
    pub cumulative_total: Money,
}

/// Raw ladder update from a market-data feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepthUpdate {
    pub seq: u64,
    /// `(price, amount)` pairs in any order
    #[serde(default)]
    pub bids: Vec<(Money, Money)>,
    #[serde(default)]
    pub asks: Vec<(Money, Money)>,
}

/// Consistent view of both ladders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub seq: u64,
    /// Descending by price, best bid first
    pub bids: Vec<DepthLevel>,
    /// Ascending by price, best ask first
    pub asks: Vec<DepthLevel>,
    pub updated_at: DateTime<Utc>,
}

impl DepthSnapshot {
    pub fn empty() -> Self {
        Self {
            seq: 0,
            bids: Vec::new(),
            asks: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Build a normalised snapshot from raw levels
    ///
    /// Levels with a non-positive price or amount are dropped.
    pub fn from_levels(seq: u64, bids: &[(Money, Money)], asks: &[(Money, Money)]) -> Self {
        Self {
            seq,
            bids: build_ladder(bids, Side::Buy),
            asks: build_ladder(asks, Side::Sell),
            updated_at: Utc::now(),
        }
    }

    pub fn best_bid(&self) -> Option<&DepthLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&DepthLevel> {
        self.asks.first()
    }

    /// `best_ask - best_bid`, when both sides are quoted
    pub fn spread(&self) -> Option<Money> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    pub fn mid_price(&self) -> Option<Money> {
        let sum = self.best_ask()?.price + self.best_bid()?.price;
        Some(sum / Money::from_i64(2))
    }

    /// Total resting bid amount
    pub fn buy_depth(&self) -> Money {
        self.bids.iter().map(|l| l.amount).sum()
    }

    /// Total resting ask amount
    pub fn sell_depth(&self) -> Money {
        self.asks.iter().map(|l| l.amount).sum()
    }

    /// Liquidity an order on `side` would trade against
    pub fn liquidity_for(&self, side: Side) -> Money {
        match side {
            Side::Buy => self.sell_depth(),
            Side::Sell => self.buy_depth(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

fn build_ladder(levels: &[(Money, Money)], side: Side) -> Vec<DepthLevel> {
    let mut kept: Vec<(Money, Money)> = levels
        .iter()
        .copied()
        .filter(|(price, amount)| price.is_positive() && amount.is_positive())
        .collect();

    if kept.len() != levels.len() {
        warn!(
            side = %side,
            dropped = levels.len() - kept.len(),
            "Dropped non-positive depth levels"
        );
    }

    match side {
        Side::Buy => kept.sort_by(|a, b| b.0.cmp(&a.0)),
        Side::Sell => kept.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    let mut cumulative = Money::ZERO;
    kept.into_iter()
        .map(|(price, amount)| {
            cumulative += amount;
            DepthLevel {
                price,
                amount,
                cumulative_total: cumulative,
            }
        })
        .collect()
}

/// Owner of the current depth snapshot
#[derive(Debug)]
pub struct DepthLedger {
    current: RwLock<Arc<DepthSnapshot>>,
}

impl DepthLedger {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(DepthSnapshot::empty())),
        }
    }

    /// Current snapshot; cheap to clone and safe to hold across updates
    pub fn snapshot(&self) -> Arc<DepthSnapshot> {
        self.current.read().clone()
    }

    pub fn seq(&self) -> u64 {
        self.current.read().seq
    }

    /// Apply a sequenced feed update. Returns `false` for stale updates.
    pub fn apply(&self, update: &DepthUpdate) -> bool {
        let next = Arc::new(DepthSnapshot::from_levels(update.seq, &update.bids, &update.asks));
        let mut current = self.current.write();
        if update.seq <= current.seq {
            debug!(
                update_seq = update.seq,
                current_seq = current.seq,
                "Ignoring stale depth update"
            );
            return false;
        }
        *current = next;
        true
    }

    /// Replace both ladders with the next sequence number
    pub fn replace(&self, bids: &[(Money, Money)], asks: &[(Money, Money)]) -> u64 {
        let mut current = self.current.write();
        let seq = current.seq + 1;
        *current = Arc::new(DepthSnapshot::from_levels(seq, bids, asks));
        seq
    }
}

impl Default for DepthLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn m(v: f64) -> Money {
        Money::from_f64(v)
    }

    fn sample_update(seq: u64) -> DepthUpdate {
        DepthUpdate {
            seq,
            bids: vec![(m(0.62), m(300.0)), (m(0.64), m(100.0)), (m(0.63), m(200.0))],
            asks: vec![(m(0.68), m(250.0)), (m(0.66), m(150.0)), (m(0.67), m(50.0))],
        }
    }

    #[test]
    fn test_ladders_sorted_and_cumulative() {
        let ledger = DepthLedger::new();
        assert!(ledger.apply(&sample_update(1)));
        let snap = ledger.snapshot();

        let bid_prices: Vec<Money> = snap.bids.iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![m(0.64), m(0.63), m(0.62)]);
        let ask_prices: Vec<Money> = snap.asks.iter().map(|l| l.price).collect();
        assert_eq!(ask_prices, vec![m(0.66), m(0.67), m(0.68)]);

        let bid_totals: Vec<Money> = snap.bids.iter().map(|l| l.cumulative_total).collect();
        assert_eq!(bid_totals, vec![m(100.0), m(300.0), m(600.0)]);
        assert_eq!(snap.asks.last().unwrap().cumulative_total, m(450.0));
    }

    #[test]
    fn test_derived_values() {
        let snap = DepthSnapshot::from_levels(1, &sample_update(1).bids, &sample_update(1).asks);
        assert_eq!(snap.spread(), Some(Money::new(dec!(0.02))));
        assert_eq!(snap.mid_price(), Some(Money::new(dec!(0.65))));
        assert_eq!(snap.buy_depth(), m(600.0));
        assert_eq!(snap.sell_depth(), m(450.0));
        assert_eq!(snap.liquidity_for(Side::Buy), m(450.0));
        assert_eq!(snap.liquidity_for(Side::Sell), m(600.0));
    }

    #[test]
    fn test_empty_side_has_no_spread() {
        let snap = DepthSnapshot::from_levels(1, &[(m(1.0), m(1.0))], &[]);
        assert_eq!(snap.spread(), None);
        assert_eq!(snap.mid_price(), None);
        assert_eq!(snap.sell_depth(), Money::ZERO);
        assert!(DepthSnapshot::empty().is_empty());
    }

    #[test]
    fn test_non_positive_levels_dropped() {
        let snap = DepthSnapshot::from_levels(
            1,
            &[(m(0.5), Money::ZERO), (m(0.4), m(10.0)), (m(-1.0), m(5.0))],
            &[],
        );
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.bids[0].price, m(0.4));
    }

    #[test]
    fn test_stale_updates_rejected() {
        let ledger = DepthLedger::new();
        assert!(ledger.apply(&sample_update(5)));
        assert!(!ledger.apply(&sample_update(5)));
        assert!(!ledger.apply(&sample_update(3)));
        assert_eq!(ledger.seq(), 5);
        assert!(ledger.apply(&sample_update(6)));
    }

    #[test]
    fn test_held_snapshot_survives_replacement() {
        let ledger = DepthLedger::new();
        ledger.apply(&sample_update(1));
        let held = ledger.snapshot();

        let seq = ledger.replace(&[(m(0.10), m(1.0))], &[(m(0.20), m(1.0))]);
        assert_eq!(seq, 2);

        assert_eq!(held.bids.len(), 3);
        assert_eq!(ledger.snapshot().bids.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_ladder() {
        let ledger = Arc::new(DepthLedger::new());
        let writer = {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for i in 1..=200i64 {
                    let size = (i % 7 + 1) as usize;
                    let bids: Vec<(Money, Money)> =
                        (0..size).map(|k| (Money::from_i64(100 - k as i64), Money::ONE)).collect();
                    let asks: Vec<(Money, Money)> =
                        (0..size).map(|k| (Money::from_i64(101 + k as i64), Money::ONE)).collect();
                    ledger.replace(&bids, &asks);
                }
            })
        };

        for _ in 0..500 {
            let snap = ledger.snapshot();
            assert_eq!(snap.bids.len(), snap.asks.len());
        }
        writer.join().unwrap();
        assert_eq!(ledger.seq(), 200);
    }
}
