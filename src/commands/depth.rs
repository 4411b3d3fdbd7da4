//! Depth command - summarize a bid/ask ladder

use anyhow::Result;
use serde_json::json;

use super::{load_depth, print_json};

pub fn run(depth_path: String) -> Result<()> {
    let depth = load_depth(&depth_path)?;

    print_json(&json!({
        "seq": depth.seq,
        "best_bid": depth.best_bid().map(|l| l.price),
        "best_ask": depth.best_ask().map(|l| l.price),
        "spread": depth.spread(),
        "mid_price": depth.mid_price(),
        "buy_depth": depth.buy_depth(),
        "sell_depth": depth.sell_depth(),
        "bids": depth.bids,
        "asks": depth.asks,
    }))
}
