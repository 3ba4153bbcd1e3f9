//! Command-line parsing.
//!
//! Every flag is optional: running the binary with no arguments produces the
//! canonical chart. Keeping parsing here keeps the math and rendering code
//! free of clap types.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{ChartConfig, DEFAULT_OUTPUT};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "thermo-money",
    version,
    about = "The Joule Standard: log-log chart of energy cost vs monetary granularity"
)]
pub struct Cli {
    /// PNG file to write (overwritten if it exists).
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Do not open the terminal viewer after saving.
    #[arg(long)]
    pub no_show: bool,

    /// Also write the fit (dataset, regression outputs, curve grid) as JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// TTF/OTF font for chart text (system fonts are searched otherwise).
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Figure width (inches).
    #[arg(long, default_value_t = 12.0)]
    pub width_in: f64,

    /// Figure height (inches).
    #[arg(long, default_value_t = 8.0)]
    pub height_in: f64,

    /// Output resolution (dots per inch).
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,
}

impl Cli {
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            output: self.output.clone(),
            width_in: self.width_in,
            height_in: self.height_in,
            dpi: self.dpi,
            font: self.font.clone(),
            show: !self.no_show,
            export_json: self.export_json.clone(),
        }
    }
}
