use {
    crate::{
        data::FetchError,
        domain::{ViewerError, as_viewer_error},
    },
    std::sync::LazyLock,
};

pub const ICON_CANDLE: &str = "\u{f11c9}";
pub const ICON_CHART: &str = "\u{f1918}";
pub const ICON_REFRESH: &str = "\u{f0450}";
pub const ICON_WARNING: &str = "\u{ea6c}";
pub const ICON_RULER: &str = "\u{e21b}";
pub const ICON_COG: &str = "\u{f013}";
pub const ICON_TWO_HORIZONTAL: &str = "\u{f12f0}";

pub struct UiText {
    pub app_title: String,

    // --- TABS / TOP BAR ---
    pub tab_single: String,
    pub tab_comparison: String,
    pub label_frequency: String,

    // --- Left panel ---
    pub lp_instrument_heading: String,
    pub lp_sector: String,
    pub lp_sector_all: String,
    pub lp_instrument: String,
    pub lp_first_instrument: String,
    pub lp_second_instrument: String,
    pub lp_no_instruments: String,
    pub lp_refresh: String,
    pub lp_refreshing: String,
    pub lp_date_heading: String,
    pub lp_start_date: String,
    pub lp_end_date: String,

    // --- S/R CONTROLS ---
    pub sr_heading: String,
    pub sr_toggle: String,
    pub sr_lookback: String,
    pub sr_num_levels: String,
    pub sr_method: String,
    pub sr_advanced: String,
    pub sr_pivot_order: String,
    pub sr_threshold: String,
    pub sr_details_heading: String,
    pub sr_none_found: String,

    // --- PLOT LABELS ---
    pub plot_x_axis: String,
    pub plot_y_axis: String,
    pub plot_ratio_axis: String,
    pub plot_overlay_heading: String,
    pub plot_ratio_heading: String,

    // --- TABLES ---
    pub table_heading: String,
    pub table_common_heading: String,
    pub col_date: String,
    pub col_open: String,
    pub col_high: String,
    pub col_low: String,
    pub col_close: String,
    pub col_volume: String,

    // --- Center panel ---
    pub cp_select_instrument: String,
    pub cp_select_two: String,
    pub cp_loading: String,
    pub cp_no_data_in_range: String,
    pub cp_inverted_range: String,
    pub cp_overlap_prefix: String,

    // --- Refresh status ---
    pub refresh_success: String,
    pub refresh_failed: String,

    // --- ERRORS ---
    pub error_format: String,
    pub error_empty: String,
    pub error_no_overlap: String,
    pub error_no_ratio: String,
    pub error_refresh: String,
    pub error_rate_limited: String,
    pub error_provider_empty: String,
    pub error_load: String,
}

// THE SINGLETON
pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Candle Viewer".to_string(),

    tab_single: format!("{} Single Chart", ICON_CANDLE),
    tab_comparison: format!("{} Comparison", ICON_TWO_HORIZONTAL),
    label_frequency: "Frequency".to_string(),

    lp_instrument_heading: "Instrument".to_string(),
    lp_sector: "Sector".to_string(),
    lp_sector_all: "All".to_string(),
    lp_instrument: "Ticker".to_string(),
    lp_first_instrument: "First ticker".to_string(),
    lp_second_instrument: "Second ticker".to_string(),
    lp_no_instruments: "No instruments found in the data directory.".to_string(),
    lp_refresh: format!("{} Refresh data", ICON_REFRESH),
    lp_refreshing: format!("{} Refreshing...", ICON_COG),
    lp_date_heading: "Date Range".to_string(),
    lp_start_date: "Start".to_string(),
    lp_end_date: "End".to_string(),

    sr_heading: format!("{} Support / Resistance", ICON_RULER),
    sr_toggle: "Show S/R levels".to_string(),
    sr_lookback: "Lookback (bars)".to_string(),
    sr_num_levels: "Levels per side".to_string(),
    sr_method: "Method".to_string(),
    sr_advanced: "Advanced".to_string(),
    sr_pivot_order: "Pivot order".to_string(),
    sr_threshold: "Merge threshold %".to_string(),
    sr_details_heading: "Level Details".to_string(),
    sr_none_found: "None found".to_string(),

    plot_x_axis: "Time".to_string(),
    plot_y_axis: "Price".to_string(),
    plot_ratio_axis: "Ratio".to_string(),
    plot_overlay_heading: format!("{} Price Comparison", ICON_CHART),
    plot_ratio_heading: format!("{} Price Ratio", ICON_CHART),

    table_heading: "Filtered Data".to_string(),
    table_common_heading: "Common Dates".to_string(),
    col_date: "Date".to_string(),
    col_open: "Open".to_string(),
    col_high: "High".to_string(),
    col_low: "Low".to_string(),
    col_close: "Close".to_string(),
    col_volume: "Volume".to_string(),

    cp_select_instrument: "Select a ticker from the left panel.".to_string(),
    cp_select_two: "Select two tickers to compare.".to_string(),
    cp_loading: "Loading...".to_string(),
    cp_no_data_in_range: "No data in the selected date range.".to_string(),
    cp_inverted_range: "Start date must be on or before the end date.".to_string(),
    cp_overlap_prefix: "Overlapping dates".to_string(),

    refresh_success: "Data refreshed".to_string(),
    refresh_failed: format!("{} Refresh failed", ICON_WARNING),

    error_format: "The data file is missing a required column".to_string(),
    error_empty: "The data file has no valid rows".to_string(),
    error_no_overlap: "The two series share no date range.".to_string(),
    error_no_ratio: "No valid ratio values in the selected range.".to_string(),
    error_refresh: "Could not fetch fresh data".to_string(),
    error_rate_limited: "The data provider is rate-limiting requests; try again later."
        .to_string(),
    error_provider_empty: "The data provider returned no history for this ticker.".to_string(),
    error_load: "Could not load the data file".to_string(),
});

/// User-facing message for any failure surfaced by the data layer or pipeline.
pub(crate) fn describe_error(err: &anyhow::Error) -> String {
    if let Some(fetch) = err.chain().find_map(|e| e.downcast_ref::<FetchError>()) {
        return match fetch {
            FetchError::RateLimited => UI_TEXT.error_rate_limited.clone(),
            FetchError::Empty => UI_TEXT.error_provider_empty.clone(),
            FetchError::Unavailable(detail) => format!("{}: {}", UI_TEXT.error_refresh, detail),
        };
    }
    match as_viewer_error(err) {
        Some(viewer) => describe_viewer_error(viewer),
        None => format!("{}: {:#}", UI_TEXT.error_load, err),
    }
}

pub(crate) fn describe_viewer_error(err: &ViewerError) -> String {
    match err {
        ViewerError::Format(detail) => format!("{}: {}", UI_TEXT.error_format, detail),
        ViewerError::EmptyData => UI_TEXT.error_empty.clone(),
        ViewerError::NoOverlap => UI_TEXT.error_no_overlap.clone(),
        ViewerError::NoRatioData => UI_TEXT.error_no_ratio.clone(),
        ViewerError::RefreshUnavailable(detail) => {
            format!("{}: {}", UI_TEXT.error_refresh, detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_errors_get_specific_messages() {
        let err = anyhow::Error::new(ViewerError::NoRatioData);
        assert_eq!(describe_error(&err), UI_TEXT.error_no_ratio);

        let err = anyhow::Error::new(ViewerError::EmptyData).context("Loading data/daily/X.csv");
        assert_eq!(describe_error(&err), UI_TEXT.error_empty);
    }

    #[test]
    fn test_fetch_error_wins_over_refresh_wrapper() {
        let err = anyhow::Error::new(FetchError::RateLimited).context("Fetching AAPL");
        assert_eq!(describe_error(&err), UI_TEXT.error_rate_limited);
    }

    #[test]
    fn test_untyped_error_keeps_context() {
        let err = anyhow::anyhow!("disk on fire");
        assert!(describe_error(&err).contains("disk on fire"));
    }
}
