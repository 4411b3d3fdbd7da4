//! Validate command - check a draft without quoting or submitting it

use anyhow::Result;
use order_engine::oms::Validator;
use tracing::{info, warn};

use super::{load_config, load_draft, print_json};

pub fn run(config_path: Option<String>, draft_path: String) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let draft = load_draft(&draft_path)?;

    let result = Validator::new(config.validation).validate(&draft);
    if result.valid {
        info!("Draft for {} is valid ({} warnings)", draft.symbol, result.warnings.len());
    } else {
        warn!("Draft for {} is invalid: {:?}", draft.symbol, result.errors);
    }

    print_json(&result)
}
