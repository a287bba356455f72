//! GE Trader — OSRS Grand Exchange flip finder.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! and runs the prompt→fetch→compute→rank→display loop until the user
//! quits. Nothing is persisted between runs.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use tracing::{error, info};

use ge_trader::api::wiki::WikiClient;
use ge_trader::config::AppConfig;
use ge_trader::display;
use ge_trader::input;
use ge_trader::pipeline;
use ge_trader::profit::ProfitCalculator;
use ge_trader::types::TraderError;

const BANNER: &str = r#"
     _/_/_/  _/_/_/_/      _/_/_/_/_/                            _/
  _/        _/                _/      _/  _/_/    _/_/_/    _/_/_/    _/_/    _/  _/_/
 _/  _/_/  _/_/_/            _/      _/_/      _/    _/  _/    _/  _/_/_/_/  _/_/
_/    _/  _/                _/      _/        _/    _/  _/    _/  _/        _/
 _/_/_/  _/_/_/_/          _/      _/          _/_/_/    _/_/_/    _/_/_/  _/
"#;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cfg = match AppConfig::load_or_default("config.toml") {
        Ok(cfg) => cfg,
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    };

    println!("{BANNER}");
    info!(
        api = %cfg.api.base_url,
        tax_rate = cfg.tax.rate,
        top_n = cfg.display.top_n,
        "GE Trader starting up"
    );

    let source = WikiClient::new(&cfg.api)?;
    let calculator = ProfitCalculator::new(&cfg.tax);

    // -- Prompt loop ------------------------------------------------------

    while let Some(budget) = input::prompt_budget() {
        match pipeline::run_once(&source, &calculator, budget, cfg.display.top_n).await {
            Ok(flips) => display::print_results(&flips, budget),
            Err(e) => report_failure(&e),
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Format any pipeline failure as a human-readable message. No failure
/// kind escapes as an unhandled backtrace.
fn report_failure(err: &TraderError) {
    error!(error = %err, "Scan failed");

    let hint = match err {
        TraderError::Network { .. } => "Could not reach the price API. Check your connection and try again.",
        TraderError::Parse { .. } => "The price API returned something unexpected. Try again in a minute.",
        TraderError::Input(_) => "Use 'k' for thousand, 'm' for million, or 'b' for billion.",
        TraderError::Config(_) => "Check config.toml.",
    };

    eprintln!(
        "{}\n{}",
        err.if_supports_color(Stream::Stderr, |t| t.red()),
        hint.if_supports_color(Stream::Stderr, |t| t.yellow()),
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ge_trader=info"));

    let json_logging = std::env::var("GE_TRADER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
