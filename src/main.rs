//! Order engine - command line entry point
//!
//! Subcommands:
//! - validate: check a draft and print the validation result
//! - preview: quote fees, price impact, and totals for a draft
//! - place: submit a draft through the paper settlement backend
//! - depth: summarize a bid/ask ladder

use anyhow::Result;
use clap::{Parser, Subcommand};
use order_engine::Money;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "order-engine")]
#[command(about = "Order validation, quoting, and step-up gated submission", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to JSON configuration file (defaults used when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an order draft
    Validate {
        /// Draft JSON file, or "-" for stdin
        #[arg(short, long)]
        draft: String,
    },

    /// Quote fees, price impact, and estimated total
    Preview {
        /// Draft JSON file, or "-" for stdin
        #[arg(short, long)]
        draft: String,

        /// Reference market price, used when the draft has no price
        #[arg(short, long)]
        reference_price: Money,

        /// Total available liquidity
        #[arg(short, long)]
        liquidity: Option<Money>,

        /// Depth ladder JSON; liquidity is taken from the opposing side
        #[arg(long)]
        depth: Option<String>,
    },

    /// Submit an order through paper settlement and wait for the outcome
    Place {
        /// Draft JSON file, or "-" for stdin
        #[arg(short, long)]
        draft: String,

        /// Step-up authentication code for high-notional orders
        #[arg(short, long)]
        auth_code: Option<String>,

        /// Paper fill delay in milliseconds (overrides config)
        #[arg(long)]
        fill_delay_ms: Option<u64>,
    },

    /// Print spread, mid price, and depth of a ladder
    Depth {
        /// Depth ladder JSON file, or "-" for stdin
        #[arg(short, long)]
        depth: String,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    // Console goes to stderr so stdout stays clean JSON
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Validate { .. } => "validate",
        Commands::Preview { .. } => "preview",
        Commands::Place { .. } => "place",
        Commands::Depth { .. } => "depth",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::Validate { draft } => commands::validate::run(cli.config, draft),

        Commands::Preview {
            draft,
            reference_price,
            liquidity,
            depth,
        } => commands::preview::run(cli.config, draft, reference_price, liquidity, depth),

        Commands::Place {
            draft,
            auth_code,
            fill_delay_ms,
        } => commands::place::run(cli.config, draft, auth_code, fill_delay_ms),

        Commands::Depth { depth } => commands::depth::run(depth),
    }
}
