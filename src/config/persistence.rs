//! File persistence configuration

/// Where price series and the instrument catalog live on disk
pub struct DataPersistenceConfig {
    /// Root directory, overridable with `--data-dir`
    pub root: &'static str,
    /// Subdirectory for daily bars
    pub daily_dir: &'static str,
    /// Subdirectory for hourly bars
    pub hourly_dir: &'static str,
    /// File-name suffix marking hourly data (e.g. "IBE.MC_h.parquet")
    pub hourly_suffix: &'static str,
    /// Catalog file name, relative to `root`
    pub catalog_file: &'static str,
    /// Extension of the sibling file a refresh writes before renaming
    pub temp_extension: &'static str,
}

/// Configuration for Application State Persistence
pub struct AppPersistenceConfig {
    /// Path for saving/loading application UI state
    pub state_path: &'static str,
    /// eframe storage key for the persisted settings
    pub storage_key: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub data: DataPersistenceConfig,
    pub app: AppPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    data: DataPersistenceConfig {
        root: "data",
        daily_dir: "daily",
        hourly_dir: "hourly",
        hourly_suffix: "_h",
        catalog_file: "instruments.csv",
        temp_extension: "tmp",
    },
    app: AppPersistenceConfig {
        state_path: ".states.json",
        storage_key: "candle_viewer_state",
    },
};
