//! Debugging feature flags.

pub struct LogFlags {
    /// Column resolution, dropped-row counts and timestamp field per load.
    pub log_loader: bool,

    /// Candidate and clustered levels for each detection run.
    pub log_levels: bool,

    /// Ratio alignment sizes.
    pub log_ratio: bool,

    pub log_refresh: bool,
    pub log_cache: bool,
    pub log_catalog: bool,

    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_loader: false,
    log_levels: false,
    log_ratio: false,

    log_refresh: true,
    log_cache: false,
    log_catalog: false,

    log_performance: false,
};
