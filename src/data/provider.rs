use {
    super::table::{RawColumn, RawTable},
    crate::{config::PROVIDER, domain::Frequency},
    async_trait::async_trait,
    chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime},
    reqwest::{Client, StatusCode, header},
    serde::Deserialize,
    std::{collections::HashMap, error::Error, fmt, time::Duration},
};

/// Why a fetch produced no table. "Nothing there" is kept apart from "couldn't ask".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Both transports were throttled upstream.
    RateLimited,
    /// Network, HTTP or decoding failure.
    Unavailable(String),
    /// Upstream answered but had no bars for the instrument.
    Empty,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::RateLimited => write!(f, "Rate limited by the data provider"),
            FetchError::Unavailable(msg) => write!(f, "Data provider unavailable: {}", msg),
            FetchError::Empty => write!(f, "The data provider returned no data"),
        }
    }
}

impl Error for FetchError {}

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Full available history for `identifier`, in the stored logical schema.
    async fn fetch_history(
        &self,
        identifier: &str,
        frequency: Frequency,
    ) -> Result<RawTable, FetchError>;
}

/// Chart API client with a browser-like alternate transport for when the
/// primary one is rate-limited.
pub struct YahooProvider {
    primary: Client,
    fallback: Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, FetchError> {
        let timeout = Duration::from_millis(PROVIDER.transport.timeout_ms);

        let primary = Client::builder()
            .user_agent(PROVIDER.transport.user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(PROVIDER.transport.browser_accept),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static(PROVIDER.transport.browser_accept_language),
        );
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_static(PROVIDER.transport.browser_referer),
        );
        let fallback = Client::builder()
            .user_agent(PROVIDER.transport.browser_user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        Ok(Self { primary, fallback })
    }

    async fn fetch_chart(
        client: &Client,
        host: &str,
        identifier: &str,
        frequency: Frequency,
    ) -> Result<ChartResponse, FetchError> {
        let (interval, range) = match frequency {
            Frequency::Daily => (PROVIDER.ranges.daily_interval, PROVIDER.ranges.daily_range),
            Frequency::Hourly => (PROVIDER.ranges.hourly_interval, PROVIDER.ranges.hourly_range),
        };
        let url = format!("{}{}{}", host, PROVIDER.endpoint.chart_path, identifier);

        let response = client
            .get(&url)
            .query(&[
                ("interval", interval),
                ("range", range),
                ("events", PROVIDER.endpoint.events),
                ("includeAdjustedClose", "false"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            // A 404 still carries a JSON body saying the symbol has no data
            status if status.is_success() || status == StatusCode::NOT_FOUND => response
                .json::<ChartResponse>()
                .await
                .map_err(|e| FetchError::Unavailable(format!("bad chart payload: {}", e))),
            status => Err(FetchError::Unavailable(format!("HTTP {}", status))),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_history(
        &self,
        identifier: &str,
        frequency: Frequency,
    ) -> Result<RawTable, FetchError> {
        let primary = Self::fetch_chart(
            &self.primary,
            PROVIDER.endpoint.primary_host,
            identifier,
            frequency,
        )
        .await;

        let chart = match primary {
            Err(FetchError::RateLimited) => {
                log::warn!("{}: rate limited, retrying on the alternate transport", identifier);
                Self::fetch_chart(
                    &self.fallback,
                    PROVIDER.endpoint.fallback_host,
                    identifier,
                    frequency,
                )
                .await?
            }
            other => other?,
        };
        chart_to_table(chart, frequency)
    }
}

// ----------------------------------------------------------------------------
// Chart payload
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, Dividend>,
    #[serde(default)]
    splits: HashMap<String, Split>,
}

#[derive(Debug, Deserialize)]
struct Dividend {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct Split {
    date: i64,
    numerator: f64,
    denominator: f64,
}

/// Turns a chart payload into the stored schema.
///
/// Daily bars are stamped at midnight of the exchange-local date under `Date`.
/// Hourly bars keep their UTC instant under both `Datetime` and `Date`.
/// Dividends and splits land on the first bar of their exchange-local date.
pub fn chart_to_table(response: ChartResponse, frequency: Frequency) -> Result<RawTable, FetchError> {
    let body = response.chart;
    if let Some(err) = body.error {
        let code = err.code.unwrap_or_default();
        let description = err.description.unwrap_or_default();
        // Unknown or delisted symbols come back as "Not Found"
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(FetchError::Empty);
        }
        return Err(FetchError::Unavailable(format!("{} {}", code, description)));
    }

    let Some(result) = body.result.and_then(|r| r.into_iter().next()) else {
        return Err(FetchError::Empty);
    };
    if result.timestamp.is_empty() {
        return Err(FetchError::Empty);
    }

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let rows = result.timestamp.len();

    let instants: Vec<Option<NaiveDateTime>> = result
        .timestamp
        .iter()
        .map(|&t| DateTime::from_timestamp(t, 0).map(|d| d.naive_utc()))
        .collect();
    let local_dates: Vec<Option<NaiveDate>> = result
        .timestamp
        .iter()
        .map(|&t| local_date(t, offset))
        .collect();

    let events = result.events.unwrap_or_default();
    let dividends = spread_events(
        &local_dates,
        events.dividends.values().map(|d| (local_date(d.date, offset), d.amount)),
    );
    let splits = spread_events(
        &local_dates,
        events
            .splits
            .values()
            .filter(|s| s.denominator != 0.0)
            .map(|s| (local_date(s.date, offset), s.numerator / s.denominator)),
    );

    let pad_f = |mut v: Vec<Option<f64>>| {
        v.resize(rows, None);
        RawColumn::Float(v)
    };
    let mut volume = quote.volume;
    volume.resize(rows, None);

    let table = match frequency {
        Frequency::Daily => RawTable::new().with_column(
            "Date",
            RawColumn::Timestamp(
                local_dates
                    .iter()
                    .map(|d| d.map(|d| d.and_time(NaiveTime::MIN)))
                    .collect(),
            ),
        ),
        Frequency::Hourly => RawTable::new()
            .with_column("Datetime", RawColumn::Timestamp(instants.clone()))
            .and_then(|t| t.with_column("Date", RawColumn::Timestamp(instants))),
    };

    table
        .and_then(|t| t.with_column("Open", pad_f(quote.open)))
        .and_then(|t| t.with_column("High", pad_f(quote.high)))
        .and_then(|t| t.with_column("Low", pad_f(quote.low)))
        .and_then(|t| t.with_column("Close", pad_f(quote.close)))
        .and_then(|t| t.with_column("Volume", RawColumn::Int(volume)))
        .and_then(|t| t.with_column("Dividends", RawColumn::Float(dividends)))
        .and_then(|t| t.with_column("Stock Splits", RawColumn::Float(splits)))
        .map_err(|e| FetchError::Unavailable(e.to_string()))
}

fn local_date(epoch_secs: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_secs + gmtoffset, 0).map(|d| d.date_naive())
}

/// One value per row: the event amount on the first row of its date, else 0.
fn spread_events(
    row_dates: &[Option<NaiveDate>],
    events: impl Iterator<Item = (Option<NaiveDate>, f64)>,
) -> Vec<Option<f64>> {
    let mut out = vec![Some(0.0); row_dates.len()];
    for (date, amount) in events {
        let Some(date) = date else { continue };
        if let Some(row) = row_dates.iter().position(|d| *d == Some(date)) {
            out[row] = Some(amount);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use {super::*, crate::data::load_series};

    const DAILY: &str = r#"{
      "chart": {
        "result": [{
          "meta": {"currency": "EUR", "symbol": "IBE.MC", "gmtoffset": 3600},
          "timestamp": [1704182400, 1704268800, 1704355200],
          "events": {
            "dividends": {"1704268800": {"amount": 0.2, "date": 1704268800}},
            "splits": {"1704355200": {"date": 1704355200, "numerator": 2, "denominator": 1, "splitRatio": "2:1"}}
          },
          "indicators": {"quote": [{
            "open":   [11.0, 11.2, null],
            "high":   [11.5, 11.6, 11.9],
            "low":    [10.8, 11.0, 11.1],
            "close":  [11.2, 11.4, 11.8],
            "volume": [1000, 2000, null]
          }]}
        }],
        "error": null
      }
    }"#;

    fn parse(json: &str, frequency: Frequency) -> Result<RawTable, FetchError> {
        chart_to_table(serde_json::from_str(json).unwrap(), frequency)
    }

    #[test]
    fn daily_payload_maps_to_stored_schema() {
        let table = parse(DAILY, Frequency::Daily).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Date", "Open", "High", "Low", "Close", "Volume", "Dividends", "Stock Splits"]
        );
        assert_eq!(table.column("Dividends").unwrap().get_f64(1), Some(0.2));
        assert_eq!(table.column("Stock Splits").unwrap().get_f64(2), Some(2.0));
        assert_eq!(table.column("Stock Splits").unwrap().get_f64(0), Some(0.0));

        // Row with a null open is dropped by the loader
        let (series, _) = load_series(&table).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_timestamp().unwrap().to_string(), "2024-01-02 00:00:00");
    }

    #[test]
    fn hourly_payload_carries_datetime() {
        let table = parse(DAILY, Frequency::Hourly).unwrap();
        assert!(table.column("Datetime").is_some());
        let ts = table.column("Datetime").unwrap().get_timestamp(0).unwrap();
        assert_eq!(ts.to_string(), "2024-01-02 08:00:00");
    }

    #[test]
    fn not_found_is_empty_not_unavailable() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(parse(json, Frequency::Daily), Err(FetchError::Empty));

        let json = r#"{"chart":{"result":null,"error":{"code":"Internal","description":"boom"}}}"#;
        assert!(matches!(parse(json, Frequency::Daily), Err(FetchError::Unavailable(_))));

        let json = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert_eq!(parse(json, Frequency::Daily), Err(FetchError::Empty));
    }
}
