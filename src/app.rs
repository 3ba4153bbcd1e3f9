//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fits the power law over the built-in epochs
//! - prints the fit summary
//! - renders and saves the chart
//! - writes the optional JSON report
//! - opens the terminal viewer

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::data::EPOCHS;
use crate::error::AppError;
use crate::report::{format_fit_summary, format_saved};

pub mod pipeline;

/// Entry point for the `thermo-money` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.chart_config();
    let output = pipeline::run_analysis(&EPOCHS)?;

    println!("{}", format_fit_summary(&output.fit));

    let font = crate::render::install_fonts(config.font.as_deref())?;
    crate::render::render_chart(&output, &config, &font)?;
    println!("{}", format_saved(config.output()));

    if let Some(path) = &config.export_json {
        crate::io::write_fit_report(path, &output, &config)?;
    }

    if config.show {
        crate::viewer::show(&output, &config.output().display().to_string())?;
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout carries only the three summary lines
/// and the save confirmation. `RUST_LOG` (also read from `.env`) overrides
/// the default level.
fn init_logging() {
    dotenvy::dotenv().ok();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .try_init();
}
