use {
    crate::{models::PriceSeries, utils::{end_of_day, start_of_day}},
    chrono::NaiveDate,
};

/// Bars from the start of `start_date` through 23:59:59 of `end_date`, inclusive.
/// An inverted range yields an empty series.
pub fn filter(series: &PriceSeries, start_date: NaiveDate, end_date: NaiveDate) -> PriceSeries {
    let from = start_of_day(start_date);
    let to = end_of_day(end_date);
    let ts = series.timestamps();

    // Timestamps are sorted, so both bounds are binary searches
    let first = ts.partition_point(|t| *t < from);
    let last = ts.partition_point(|t| *t <= to);

    if first >= last {
        return PriceSeries::empty();
    }
    series.slice(first, last)
}
