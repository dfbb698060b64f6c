mod cache;
mod catalog;
mod csv_codec;
mod loader;
mod parquet_codec;
mod provider;
mod refresh;
mod storage;
mod table;

pub use {
    cache::{CachedLoader, FileStamp, LoadedSeries, MemorySeriesCache, SeriesCache},
    catalog::{CatalogEntry, InstrumentCatalog},
    csv_codec::{read_csv, write_csv},
    loader::{TimestampField, VOLUME_COLUMN, load, load_series},
    parquet_codec::{read_parquet, write_parquet},
    provider::{ChartResponse, FetchError, MarketDataProvider, YahooProvider, chart_to_table},
    refresh::{RefreshCoordinator, RefreshOutcome},
    storage::{
        StorageFormat, find_series_file, list_series_files, read_table, replace_table,
        staging_path, write_table,
    },
    table::{RawColumn, RawTable, parse_timestamp},
};
