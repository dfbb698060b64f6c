#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for the bins)
pub use app::App;
pub use config::PERSISTENCE;
pub use domain::{Frequency, Instrument, ViewerError};
pub use models::PriceSeries;

// CLI argument parsing
use {clap::Parser, std::path::PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory holding `daily/` and `hourly/` series
    #[arg(long, default_value = PERSISTENCE.data.root)]
    pub data_dir: PathBuf,

    /// Instrument catalog CSV. Defaults to `<data-dir>/instruments.csv`
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}
