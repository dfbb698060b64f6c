use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// One named, nullable column as read from a source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawColumn {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    /// Naive UTC instants
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl RawColumn {
    pub fn len(&self) -> usize {
        match self {
            RawColumn::Text(v) => v.len(),
            RawColumn::Float(v) => v.len(),
            RawColumn::Int(v) => v.len(),
            RawColumn::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of a cell. Text is parsed; anything unparseable is `None`.
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            RawColumn::Float(v) => v.get(row).copied().flatten(),
            RawColumn::Int(v) => v.get(row).copied().flatten().map(|x| x as f64),
            RawColumn::Text(v) => v.get(row)?.as_deref()?.trim().parse().ok(),
            RawColumn::Timestamp(_) => None,
        }
    }

    pub fn get_i64(&self, row: usize) -> Option<i64> {
        match self {
            RawColumn::Int(v) => v.get(row).copied().flatten(),
            RawColumn::Float(_) | RawColumn::Text(_) => {
                self.get_f64(row).filter(|x| x.is_finite()).map(|x| x.round() as i64)
            }
            RawColumn::Timestamp(_) => None,
        }
    }

    pub fn get_timestamp(&self, row: usize) -> Option<NaiveDateTime> {
        match self {
            RawColumn::Timestamp(v) => v.get(row).copied().flatten(),
            RawColumn::Text(v) => parse_timestamp(v.get(row)?.as_deref()?),
            RawColumn::Float(_) | RawColumn::Int(_) => None,
        }
    }
}

/// The logical tabular schema shared by every storage encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<(String, RawColumn)>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push. Columns must all have the same length.
    pub fn with_column(mut self, name: impl Into<String>, column: RawColumn) -> anyhow::Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn push_column(&mut self, name: impl Into<String>, column: RawColumn) -> anyhow::Result<()> {
        let name = name.into();
        if let Some((first, existing)) = self.columns.first() {
            if existing.len() != column.len() {
                anyhow::bail!(
                    "Column '{}' has {} rows but '{}' has {}",
                    name,
                    column.len(),
                    first,
                    existing.len()
                );
            }
        }
        // Later columns replace earlier ones of the same name
        self.columns.retain(|(n, _)| *n != name);
        self.columns.push((name, column));
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &RawColumn)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }
}

/// Parses the timestamp spellings found in stored series. The result is naive UTC;
/// strings without an offset are taken as UTC already.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_supported_timestamp_spellings() {
        assert_eq!(parse_timestamp("2024-03-01"), Some(ts(2024, 3, 1, 0, 0)));
        assert_eq!(parse_timestamp("2024-03-01 09:30:00"), Some(ts(2024, 3, 1, 9, 30)));
        assert_eq!(parse_timestamp("2024-03-01T09:30:00"), Some(ts(2024, 3, 1, 9, 30)));
        assert_eq!(parse_timestamp("2024-03-01T09:30:00Z"), Some(ts(2024, 3, 1, 9, 30)));
        // Offsets are converted to UTC
        assert_eq!(
            parse_timestamp("2024-03-01 09:30:00-05:00"),
            Some(ts(2024, 3, 1, 14, 30))
        );
        assert_eq!(
            parse_timestamp("2024-03-01 09:30:00.250+01:00").map(|t| t.date()),
            Some(ts(2024, 3, 1, 0, 0).date())
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn columns_must_agree_on_length() {
        let table = RawTable::new()
            .with_column("Open", RawColumn::Float(vec![Some(1.0), None]))
            .unwrap();
        assert!(table.clone().with_column("Close", RawColumn::Float(vec![Some(1.0)])).is_err());
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn numeric_views_coerce_between_types() {
        let text = RawColumn::Text(vec![Some(" 1.5 ".into()), Some("n/a".into()), None]);
        assert_eq!(text.get_f64(0), Some(1.5));
        assert_eq!(text.get_f64(1), None);
        assert_eq!(text.get_i64(0), Some(2));
        assert_eq!(RawColumn::Int(vec![Some(7)]).get_f64(0), Some(7.0));
        assert_eq!(RawColumn::Float(vec![Some(f64::NAN)]).get_i64(0), None);
    }
}
