use {
    anyhow::{Context, Result, bail},
    candle_viewer::{
        PriceSeries,
        analysis::{common_dates, compare, date_overlap, filter, find_levels},
        config::{DetectionMethod, LEVELS, LevelSettings, PivotOrder},
        data::load,
        domain::PriceLevel,
        ui::{format_price, format_ratio},
    },
    chrono::NaiveDate,
    clap::{Parser, ValueEnum},
    std::path::{Path, PathBuf},
    tabled::{Table, Tabled, settings::Style},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Pivots,
    Extremes,
    Combined,
}

impl From<Method> for DetectionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Pivots => DetectionMethod::Pivots,
            Method::Extremes => DetectionMethod::Extremes,
            Method::Combined => DetectionMethod::Combined,
        }
    }
}

/// Print support/resistance levels for a stored series, or the ratio
/// summary against a second one.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// `.csv` or `.parquet` series file
    path: PathBuf,

    /// Compare against this series instead of detecting levels
    #[arg(long)]
    against: Option<PathBuf>,

    /// First calendar day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last calendar day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    #[arg(long, default_value_t = LEVELS.default_lookback)]
    lookback: usize,

    #[arg(long, default_value_t = LEVELS.default_num_levels)]
    levels: usize,

    #[arg(long, default_value_t = PivotOrder::DEFAULT_VALUE)]
    pivot_order: usize,

    /// Merge distance in percent
    #[arg(long, default_value_t = LEVELS.default_threshold_pct)]
    threshold: f64,

    #[arg(long, value_enum, default_value_t = Method::Combined)]
    method: Method,
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Level")]
    label: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&PriceLevel> for LevelRow {
    fn from(level: &PriceLevel) -> Self {
        Self {
            label: level.label(),
            price: format_price(level.price),
        }
    }
}

#[derive(Tabled)]
struct RatioRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
}

fn load_series(path: &Path) -> Result<PriceSeries> {
    let (series, _) = load(path)?;
    Ok(series)
}

/// The requested window, defaulting each open end to `bounds`.
fn window(args: &Args, bounds: (NaiveDate, NaiveDate)) -> Result<(NaiveDate, NaiveDate)> {
    let start = args.start.unwrap_or(bounds.0);
    let end = args.end.unwrap_or(bounds.1);
    if start > end {
        bail!("--start {} is after --end {}", start, end);
    }
    Ok((start, end))
}

fn print_levels(args: &Args, series: &PriceSeries) -> Result<()> {
    let bounds = series.date_bounds().context("Series has no bars")?;
    let (start, end) = window(args, bounds)?;
    let filtered = filter(series, start, end);

    let settings = LevelSettings {
        enabled: true,
        lookback: args.lookback,
        num_levels: args.levels,
        pivot_order: PivotOrder::new(args.pivot_order),
        threshold_pct: args.threshold,
        method: args.method.into(),
    };
    let levels = find_levels(&filtered, &settings);

    println!(
        "{}: {} bars in {} .. {}, lookback {}",
        args.path.display(),
        filtered.len(),
        start,
        end,
        settings.effective_lookback(filtered.len())
    );
    for (title, side) in [
        ("Resistance", &levels.resistances),
        ("Support", &levels.supports),
    ] {
        let rows: Vec<LevelRow> = side.iter().map(LevelRow::from).collect();
        println!("\n{}", title);
        if rows.is_empty() {
            println!("  none found");
        } else {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }
    Ok(())
}

fn print_ratio(args: &Args, first: &PriceSeries, other_path: &Path) -> Result<()> {
    let second = load_series(other_path)?;
    let overlap = date_overlap(first, &second).context("The two series share no date range")?;
    let (start, end) = window(args, overlap)?;

    let ratio = compare(first, &second, start, end)?;
    let (common_first, _) = common_dates(&filter(first, start, end), &filter(&second, start, end));

    println!(
        "{} / {}: {} ratio bars, {} common dates in {} .. {}",
        args.path.display(),
        other_path.display(),
        ratio.len(),
        common_first.len(),
        start,
        end
    );
    let rows: Vec<RatioRow> = ratio
        .bars()
        .map(|bar| RatioRow {
            date: bar.timestamp.to_string(),
            open: format_ratio(bar.open),
            high: format_ratio(bar.high),
            low: format_ratio(bar.low),
            close: format_ratio(bar.close),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let series = load_series(&args.path)?;
    match &args.against {
        Some(other) => print_ratio(&args, &series, other),
        None => print_levels(&args, &series),
    }
}
