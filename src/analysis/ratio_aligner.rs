use {
    super::date_filter::filter,
    crate::{
        config::DF,
        domain::{PriceBar, ViewerError},
        models::PriceSeries,
    },
    chrono::{NaiveDate, NaiveDateTime},
    itertools::Itertools,
    std::collections::HashSet,
};

/// Calendar overlap of two full series, used as the default comparison range.
pub fn date_overlap(a: &PriceSeries, b: &PriceSeries) -> Option<(NaiveDate, NaiveDate)> {
    let (a_start, a_end) = a.date_bounds()?;
    let (b_start, b_end) = b.date_bounds()?;
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    (start <= end).then_some((start, end))
}

/// Both series restricted to the calendar dates present in each.
pub fn common_dates(a: &PriceSeries, b: &PriceSeries) -> (PriceSeries, PriceSeries) {
    let dates_a: HashSet<NaiveDate> = a.timestamps().iter().map(|t| t.date()).collect();
    let dates_b: HashSet<NaiveDate> = b.timestamps().iter().map(|t| t.date()).collect();

    let keep = |series: &PriceSeries, other: &HashSet<NaiveDate>| {
        PriceSeries::from_bars(
            series
                .bars()
                .filter(|bar| other.contains(&bar.timestamp.date()))
                .collect(),
        )
    };
    (keep(a, &dates_b), keep(b, &dates_a))
}

/// OHLC ratio A/B over the union of both timestamp sets.
///
/// Each side is forward-filled with a flat bar at its last known close, and
/// timestamps before a side's first bar are dropped. High uses A.high / B.low
/// and low uses A.low / B.high so the ratio bar spans every combination.
/// Rows with any non-finite value are dropped.
pub fn align_and_ratio(a: &PriceSeries, b: &PriceSeries) -> Result<PriceSeries, ViewerError> {
    if a.is_empty() || b.is_empty() {
        return Err(ViewerError::NoOverlap);
    }
    if date_overlap(a, b).is_none() {
        return Err(ViewerError::NoOverlap);
    }

    let union: Vec<NaiveDateTime> = a
        .timestamps()
        .iter()
        .merge(b.timestamps().iter())
        .dedup()
        .copied()
        .collect();

    let filled_a = forward_fill(a, &union);
    let filled_b = forward_fill(b, &union);

    let ratios: Vec<PriceBar> = filled_a
        .iter()
        .zip(&filled_b)
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some(ratio_bar(x, y)),
            _ => None,
        })
        .filter(PriceBar::is_finite)
        .collect();

    if DF.log_ratio {
        log::info!(
            "align_and_ratio: {} + {} bars -> union {} -> {} finite ratio bars",
            a.len(),
            b.len(),
            union.len(),
            ratios.len()
        );
    }

    if ratios.is_empty() {
        return Err(ViewerError::NoRatioData);
    }
    Ok(PriceSeries::from_bars(ratios))
}

/// Filter both series to `[start, end]` then align them.
pub fn compare(
    a: &PriceSeries,
    b: &PriceSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, ViewerError> {
    align_and_ratio(&filter(a, start, end), &filter(b, start, end))
}

/// One slot per `union` timestamp. `None` before the series' first bar.
fn forward_fill(series: &PriceSeries, union: &[NaiveDateTime]) -> Vec<Option<PriceBar>> {
    let mut bars = series.bars().peekable();
    let mut last_close: Option<f64> = None;

    union
        .iter()
        .map(|&ts| match bars.next_if(|bar| bar.timestamp == ts) {
            Some(bar) => {
                last_close = Some(bar.close);
                Some(bar)
            }
            None => last_close.map(|close| PriceBar::flat(ts, close)),
        })
        .collect()
}

fn ratio_bar(a: &PriceBar, b: &PriceBar) -> PriceBar {
    PriceBar::new(
        a.timestamp,
        a.open / b.open,
        a.high / b.low,
        a.low / b.high,
        a.close / b.close,
    )
}
