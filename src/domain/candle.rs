use chrono::NaiveDateTime;

// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLC bar. Timestamps are naive UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub volume: Option<i64>,
}

impl PriceBar {
    // A constructor for convenience
    pub fn new(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: Option<i64>) -> Self {
        self.volume = volume;
        self
    }

    /// A zero-range bar sitting at `price`. Used where a series had no trade.
    pub fn flat(timestamp: NaiveDateTime, price: f64) -> Self {
        Self::new(timestamp, price, price, price, price)
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }
}
