use {
    super::{
        storage::read_table,
        table::{RawColumn, RawTable},
    },
    crate::{
        config::DF,
        domain::{PriceBar, ViewerError},
        models::PriceSeries,
        trace_time,
    },
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    std::path::Path,
};

/// Which timestamp column the source carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampField {
    Date,
    Datetime,
}

impl TimestampField {
    pub fn column_name(&self) -> &'static str {
        match self {
            TimestampField::Date => "Date",
            TimestampField::Datetime => "Datetime",
        }
    }

    /// `Datetime` wins when a table has both.
    pub fn detect(table: &RawTable) -> Option<Self> {
        [TimestampField::Datetime, TimestampField::Date]
            .into_iter()
            .find(|f| table.column(f.column_name()).is_some())
    }
}

pub const VOLUME_COLUMN: &str = "Volume";

/// Builds a clean series from a raw table.
///
/// Rows with an unreadable timestamp or any missing/non-finite price are
/// dropped. Rows are sorted; on duplicate timestamps the last row read wins.
pub fn load_series(table: &RawTable) -> Result<(PriceSeries, TimestampField), ViewerError> {
    let field = TimestampField::detect(table).ok_or_else(|| {
        ViewerError::Format("expected a 'Date' or 'Datetime' column".to_string())
    })?;
    let ts_col = require(table, field.column_name())?;

    let open = require(table, "Open")?;
    let high = require(table, "High")?;
    let low = require(table, "Low")?;
    let close = require(table, "Close")?;
    let volume = table.column(VOLUME_COLUMN);

    let rows = table.num_rows();
    let bars: Vec<PriceBar> = (0..rows)
        .filter_map(|row| {
            let bar = PriceBar::new(
                ts_col.get_timestamp(row)?,
                open.get_f64(row)?,
                high.get_f64(row)?,
                low.get_f64(row)?,
                close.get_f64(row)?,
            )
            .with_volume(volume.and_then(|v| v.get_i64(row)));
            bar.is_finite().then_some(bar)
        })
        .collect();

    if DF.log_loader {
        log::info!(
            "load_series: {} rows, {} kept, timestamp field '{}'",
            rows,
            bars.len(),
            field.column_name()
        );
    }

    if bars.is_empty() {
        return Err(ViewerError::EmptyData);
    }
    Ok((PriceSeries::from_bars(bars), field))
}

fn require<'a>(table: &'a RawTable, name: &str) -> Result<&'a RawColumn, ViewerError> {
    table
        .column(name)
        .ok_or_else(|| ViewerError::Format(format!("missing required column '{}'", name)))
}

/// Reads and cleans the series stored at `path` (`.csv` or `.parquet`).
pub fn load(path: &Path) -> Result<(PriceSeries, TimestampField)> {
    trace_time!("load", 50_000, {
        let table = read_table(path)?;
        let loaded = load_series(&table)
            .with_context(|| format!("Failed to load series from {}", path.display()))?;
        Ok(loaded)
    })
}
