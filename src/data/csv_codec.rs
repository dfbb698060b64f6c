//! Row-oriented text encoding of a `RawTable`.

use {
    super::table::{RawColumn, RawTable},
    anyhow::{Context, Result},
    chrono::{NaiveDateTime, NaiveTime},
    std::io::{Read, Write},
};

// Timestamp columns stay text; the loader owns timestamp parsing
const TIMESTAMP_NAMES: [&str; 2] = ["Date", "Datetime"];

pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV record at data row {}", line + 1))?;
        for (col, column) in cells.iter_mut().enumerate() {
            let value = record.get(col).map(str::trim).filter(|v| !v.is_empty());
            column.push(value.map(str::to_owned));
        }
    }

    let mut table = RawTable::new();
    for (name, values) in headers.iter().zip(cells) {
        let name = name.trim();
        let column = if TIMESTAMP_NAMES.contains(&name) {
            RawColumn::Text(values)
        } else {
            infer_column(values)
        };
        table.push_column(name, column)?;
    }
    Ok(table)
}

/// Int if every present cell is an integer, else Float if every one is numeric, else Text.
fn infer_column(values: Vec<Option<String>>) -> RawColumn {
    let present = || values.iter().flatten();

    if present().all(|v| v.parse::<i64>().is_ok()) && present().next().is_some() {
        return RawColumn::Int(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.parse().ok()))
                .collect(),
        );
    }
    if present().all(|v| v.parse::<f64>().is_ok()) && present().next().is_some() {
        return RawColumn::Float(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.parse().ok()))
                .collect(),
        );
    }
    RawColumn::Text(values)
}

pub fn write_csv<W: Write>(table: &RawTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.column_names())?;

    let date_only: Vec<bool> = table
        .columns()
        .map(|(_, col)| match col {
            RawColumn::Timestamp(v) => v.iter().flatten().all(|t| t.time() == NaiveTime::MIN),
            _ => false,
        })
        .collect();

    for row in 0..table.num_rows() {
        let record: Vec<String> = table
            .columns()
            .zip(&date_only)
            .map(|((_, col), &date_only)| format_cell(col, row, date_only))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

fn format_cell(column: &RawColumn, row: usize, date_only: bool) -> String {
    match column {
        RawColumn::Text(v) => v[row].clone().unwrap_or_default(),
        RawColumn::Float(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        RawColumn::Int(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        RawColumn::Timestamp(v) => v[row]
            .map(|t| format_timestamp_cell(t, date_only))
            .unwrap_or_default(),
    }
}

fn format_timestamp_cell(ts: NaiveDateTime, date_only: bool) -> String {
    if date_only {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S+00:00").to_string()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::NaiveDate};

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Volume,Note
2024-01-02,10.5,11,10,10.75,1200,a
2024-01-03,,11.5,10.2,11.1,,
";

    #[test]
    fn infers_column_types() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert!(matches!(table.column("Date"), Some(RawColumn::Text(_))));
        assert!(matches!(table.column("Open"), Some(RawColumn::Float(_))));
        assert!(matches!(table.column("Volume"), Some(RawColumn::Int(_))));
        assert!(matches!(table.column("Note"), Some(RawColumn::Text(_))));
        assert_eq!(table.column("Open").unwrap().get_f64(1), None);
        assert_eq!(table.column("High").unwrap().get_f64(0), Some(11.0));
    }

    #[test]
    fn writes_dates_without_time_when_all_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let table = RawTable::new()
            .with_column(
                "Date",
                RawColumn::Timestamp(vec![Some(day.and_hms_opt(0, 0, 0).unwrap())]),
            )
            .and_then(|t| t.with_column("Close", RawColumn::Float(vec![Some(1.25)])))
            .unwrap();

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Date,Close\n2024-01-02,1.25\n");
    }

    #[test]
    fn writes_intraday_as_utc() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let table = RawTable::new()
            .with_column("Datetime", RawColumn::Timestamp(vec![Some(ts)]))
            .and_then(|t| t.with_column("Close", RawColumn::Float(vec![None])))
            .unwrap();

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Datetime,Close\n2024-01-02 14:30:00+00:00,\n"
        );
    }
}
