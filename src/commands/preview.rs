//! Preview command - quote fees, impact, and totals for a draft

use anyhow::{bail, Result};
use order_engine::oms::PreviewBuilder;
use order_engine::Money;
use tracing::info;

use super::{load_config, load_depth, load_draft, print_json};

pub fn run(
    config_path: Option<String>,
    draft_path: String,
    reference_price: Money,
    liquidity: Option<Money>,
    depth_path: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let draft = load_draft(&draft_path)?;

    let total_liquidity = match (liquidity, depth_path) {
        (Some(liquidity), None) => liquidity,
        (None, Some(path)) => {
            let depth = load_depth(&path)?;
            let liquidity = depth.liquidity_for(draft.side);
            info!("Using {} opposing-side liquidity from {}", liquidity, path);
            liquidity
        }
        (Some(_), Some(_)) => bail!("Specify either --liquidity or --depth, not both"),
        (None, None) => bail!("One of --liquidity or --depth is required"),
    };

    let preview = PreviewBuilder::from_config(&config).build_preview(&draft, reference_price, total_liquidity);
    info!(
        "Preview {} {} {}: fee {} {}, impact {}% ({})",
        draft.side,
        draft.order_type,
        draft.symbol,
        preview.fees.estimated_fee,
        preview.fees.fee_asset,
        preview.price_impact.impact_pct,
        preview.price_impact.band
    );

    print_json(&preview)
}
