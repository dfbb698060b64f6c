use {
    anyhow::{Context, Result},
    candle_viewer::{
        Frequency, Instrument, PERSISTENCE,
        data::{
            MarketDataProvider, StorageFormat, YahooProvider, load, replace_table, write_table,
        },
    },
    clap::{Parser, ValueEnum},
    std::{fs, path::PathBuf},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Parquet,
}

impl From<OutputFormat> for StorageFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => StorageFormat::Csv,
            OutputFormat::Parquet => StorageFormat::Parquet,
        }
    }
}

/// Download the full price history of one instrument into the data directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Provider ticker, e.g. "IBE.MC"
    identifier: String,

    /// Hourly bars instead of daily
    #[arg(long, default_value_t = false)]
    hourly: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Parquet)]
    format: OutputFormat,

    #[arg(long, default_value = PERSISTENCE.data.root)]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let frequency = if args.hourly {
        Frequency::Hourly
    } else {
        Frequency::Daily
    };
    let instrument = Instrument::new(args.identifier.as_str(), frequency);
    let format = StorageFormat::from(args.format);

    let dir = frequency.data_dir(&args.data_dir);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(instrument.file_name(format.extension()));

    log::info!("Fetching {} into {}", instrument, path.display());
    let provider = YahooProvider::new()?;
    let table = provider
        .fetch_history(&instrument.identifier, frequency)
        .await
        .with_context(|| format!("Failed to fetch {}", instrument))?;

    if path.exists() {
        replace_table(&path, &table)?;
    } else {
        write_table(&path, &table)?;
    }

    let (series, field) = load(&path)?;
    match series.date_bounds() {
        Some((first, last)) => log::info!(
            "Stored {} bars ({} .. {}, by {}) in {}",
            series.len(),
            first,
            last,
            field.column_name(),
            path.display()
        ),
        None => log::warn!("Stored an empty series in {}", path.display()),
    }
    Ok(())
}
