use {
    crate::domain::PriceBar,
    chrono::{NaiveDate, NaiveDateTime},
};

// ============================================================================
// PriceSeries: chronologically ordered OHLC bars, stored column-wise
// ============================================================================

/// Immutable once built. Timestamps are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    timestamps: Vec<NaiveDateTime>,

    open_prices: Vec<f64>,
    high_prices: Vec<f64>,
    low_prices: Vec<f64>,
    close_prices: Vec<f64>,

    // Empty when the source carried no volume column
    volumes: Vec<Option<i64>>,
}

impl PriceSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts by timestamp. On duplicate timestamps the bar that came last in `bars` wins.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps input order within equal timestamps
        bars.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        let has_volume = deduped.iter().any(|b| b.volume.is_some());
        let mut series = Self {
            timestamps: Vec::with_capacity(deduped.len()),
            open_prices: Vec::with_capacity(deduped.len()),
            high_prices: Vec::with_capacity(deduped.len()),
            low_prices: Vec::with_capacity(deduped.len()),
            close_prices: Vec::with_capacity(deduped.len()),
            volumes: Vec::new(),
        };
        for bar in deduped {
            series.timestamps.push(bar.timestamp);
            series.open_prices.push(bar.open);
            series.high_prices.push(bar.high);
            series.low_prices.push(bar.low);
            series.close_prices.push(bar.close);
            if has_volume {
                series.volumes.push(bar.volume);
            }
        }
        series
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn opens(&self) -> &[f64] {
        &self.open_prices
    }

    pub fn highs(&self) -> &[f64] {
        &self.high_prices
    }

    pub fn lows(&self) -> &[f64] {
        &self.low_prices
    }

    pub fn closes(&self) -> &[f64] {
        &self.close_prices
    }

    pub fn has_volume(&self) -> bool {
        !self.volumes.is_empty()
    }

    pub fn get_bar(&self, idx: usize) -> Option<PriceBar> {
        let timestamp = *self.timestamps.get(idx)?;
        Some(
            PriceBar::new(
                timestamp,
                self.open_prices[idx],
                self.high_prices[idx],
                self.low_prices[idx],
                self.close_prices[idx],
            )
            .with_volume(self.volumes.get(idx).copied().flatten()),
        )
    }

    pub fn bars(&self) -> impl Iterator<Item = PriceBar> + '_ {
        (0..self.len()).filter_map(move |i| self.get_bar(i))
    }

    /// The last `n` bars (all of them when `n >= len`).
    pub fn tail(&self, n: usize) -> PriceSeries {
        let start = self.len().saturating_sub(n);
        self.slice(start, self.len())
    }

    /// Bars in `[start, end)` by position.
    pub fn slice(&self, start: usize, end: usize) -> PriceSeries {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            timestamps: self.timestamps[start..end].to_vec(),
            open_prices: self.open_prices[start..end].to_vec(),
            high_prices: self.high_prices[start..end].to_vec(),
            low_prices: self.low_prices[start..end].to_vec(),
            close_prices: self.close_prices[start..end].to_vec(),
            volumes: if self.has_volume() {
                self.volumes[start..end].to_vec()
            } else {
                Vec::new()
            },
        }
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    /// Calendar dates of the first and last bar.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first_timestamp()?.date(), self.last_timestamp()?.date()))
    }

    /// Lowest low and highest high.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let lo = self.low_prices.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.high_prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::from_bars(vec![
            PriceBar::flat(day(3), 3.0),
            PriceBar::flat(day(1), 1.0),
            PriceBar::flat(day(3), 30.0),
            PriceBar::flat(day(2), 2.0),
        ]);
        assert_eq!(series.timestamps(), &[day(1), day(2), day(3)]);
        assert_eq!(series.closes(), &[1.0, 2.0, 30.0]);
        assert!(!series.has_volume());
    }

    #[test]
    fn tail_and_bounds() {
        let series = PriceSeries::from_bars(
            (1..=5)
                .map(|d| PriceBar::new(day(d), 10.0, 10.0 + d as f64, 9.0 - d as f64, 10.0))
                .collect(),
        );
        let last = series.tail(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last.first_timestamp(), Some(day(4)));
        assert_eq!(series.tail(99).len(), 5);
        assert_eq!(series.price_bounds(), Some((4.0, 15.0)));
        assert_eq!(series.date_bounds(), Some((day(1).date(), day(5).date())));
    }

    #[test]
    fn volume_is_carried_per_bar() {
        let series = PriceSeries::from_bars(vec![
            PriceBar::flat(day(1), 1.0).with_volume(Some(100)),
            PriceBar::flat(day(2), 2.0),
        ]);
        assert!(series.has_volume());
        assert_eq!(series.get_bar(0).unwrap().volume, Some(100));
        assert_eq!(series.get_bar(1).unwrap().volume, None);
        assert!(series.get_bar(2).is_none());
    }
}
