//! Place command - submit a draft through the paper settlement backend

use anyhow::{Context, Result};
use order_engine::oms::{PaperSettlement, SubmissionPipeline};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{load_config, load_draft, print_json};

pub fn run(
    config_path: Option<String>,
    draft_path: String,
    auth_code: Option<String>,
    fill_delay_ms: Option<u64>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(delay) = fill_delay_ms {
        config.settlement.paper_fill_delay_ms = delay;
    }
    let draft = load_draft(&draft_path)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let backend = Arc::new(PaperSettlement::from_config(&config.settlement));
        let engine = SubmissionPipeline::from_config(&config, backend);

        let order = engine
            .place_order(&draft, auth_code.as_deref())
            .await
            .context("Order was not placed")?;
        info!("Order {} submitted, waiting for settlement", order.id);

        // Paper fills arrive after the configured delay; allow generous slack
        let deadline = Duration::from_millis(config.settlement.paper_fill_delay_ms) + Duration::from_secs(5);
        let settled = tokio::time::timeout(deadline, engine.wait_for_terminal(order.id))
            .await
            .context("Timed out waiting for settlement")?
            .context("Order disappeared from the registry")?;

        info!("Order {} is {}", settled.id, settled.status);
        print_json(&settled)
    })
}
