use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_H: i64 = 60 * 60;
    pub const S_IN_D: i64 = Self::S_IN_H * 24;
    pub const STANDARD_DATE_FORMAT: &str = "%Y-%m-%d";
    pub const STANDARD_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
}

/// First instant of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last whole second of `date` (23:59:59). Inclusive filter bound.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + chrono::Duration::seconds(TimeUtils::S_IN_D - 1)
}

// Plot x coordinates are epoch seconds.
pub fn to_plot_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

pub fn from_plot_x(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    DateTime::from_timestamp(x.round() as i64, 0).map(|dt| dt.naive_utc())
}

/// Used for display purposes. Midnight timestamps print as a bare date.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format(TimeUtils::STANDARD_DATE_FORMAT).to_string()
    } else {
        ts.format(TimeUtils::STANDARD_DATETIME_FORMAT).to_string()
    }
}

pub fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{}.{:01}s", secs, (ms % 1000) / 100);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_of_day_is_last_second() {
        let end = end_of_day(date(2024, 2, 29));
        assert_eq!(end.to_string(), "2024-02-29 23:59:59");
    }

    #[test]
    fn plot_x_round_trips() {
        let ts = date(2023, 6, 1).and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(from_plot_x(to_plot_x(ts)), Some(ts));
        assert_eq!(from_plot_x(f64::NAN), None);
    }

    #[test]
    fn formats_midnight_as_date() {
        assert_eq!(format_timestamp(start_of_day(date(2020, 1, 2))), "2020-01-02");
        let ts = date(2020, 1, 2).and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2020-01-02 09:30");
    }

    #[test]
    fn duration_buckets() {
        assert_eq!(format_duration(1_500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
        assert_eq!(format_duration(3_720_000), "1h 2m");
    }
}
