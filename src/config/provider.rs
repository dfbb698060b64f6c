//! Market data provider endpoints and transport settings

pub struct ChartEndpoint {
    /// `{host}{chart_path}{symbol}`
    pub primary_host: &'static str,
    /// Used by the alternate transport when the primary is rate-limited
    pub fallback_host: &'static str,
    pub chart_path: &'static str,
    pub events: &'static str,
}

pub struct HistoryRanges {
    pub daily_interval: &'static str,
    pub daily_range: &'static str,
    /// Upstream only serves about two years of hourly bars
    pub hourly_interval: &'static str,
    pub hourly_range: &'static str,
}

pub struct TransportDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
    /// Browser-like identity for the alternate transport
    pub browser_user_agent: &'static str,
    pub browser_accept: &'static str,
    pub browser_accept_language: &'static str,
    pub browser_referer: &'static str,
}

pub struct ProviderConfig {
    pub endpoint: ChartEndpoint,
    pub ranges: HistoryRanges,
    pub transport: TransportDefaults,
}

pub const PROVIDER: ProviderConfig = ProviderConfig {
    endpoint: ChartEndpoint {
        primary_host: "https://query1.finance.yahoo.com",
        fallback_host: "https://query2.finance.yahoo.com",
        chart_path: "/v8/finance/chart/",
        events: "div,splits",
    },
    ranges: HistoryRanges {
        daily_interval: "1d",
        daily_range: "max",
        hourly_interval: "1h",
        hourly_range: "730d",
    },
    transport: TransportDefaults {
        timeout_ms: 30_000,
        user_agent: concat!("candle-viewer/", env!("CARGO_PKG_VERSION")),
        browser_user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        browser_accept: "application/json,text/html;q=0.9,*/*;q=0.8",
        browser_accept_language: "en-US,en;q=0.9",
        browser_referer: "https://finance.yahoo.com/",
    },
};
