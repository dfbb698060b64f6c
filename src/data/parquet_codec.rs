//! Columnar binary encoding of a `RawTable`.

use {
    super::table::{RawColumn, RawTable},
    anyhow::{Context, Result, bail},
    arrow::{
        array::{
            Array, ArrayRef, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
            LargeStringArray, StringArray, TimestampMillisecondArray,
        },
        compute::cast,
        datatypes::{DataType, Field, Schema, TimeUnit},
        record_batch::RecordBatch,
    },
    chrono::{DateTime, NaiveDate, NaiveDateTime},
    parquet::{
        arrow::{ArrowWriter, arrow_reader::ParquetRecordBatchReaderBuilder},
        basic::Compression,
        file::{properties::WriterProperties, reader::ChunkReader},
    },
    std::{io::Write, sync::Arc},
};

const UTC: &str = "UTC";

pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)
        .context("Failed to open parquet reader")?;
    let schema = builder.schema().clone();

    // Columns we can't represent are skipped, not fatal
    let mut columns: Vec<(usize, String, RawColumn)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(idx, field)| {
            let empty = empty_column(field.data_type());
            if empty.is_none() {
                log::warn!(
                    "Skipping parquet column '{}' of type {}",
                    field.name(),
                    field.data_type()
                );
            }
            Some((idx, field.name().clone(), empty?))
        })
        .collect();

    for batch in builder.build()? {
        let batch = batch.context("Failed to read parquet record batch")?;
        for (idx, name, column) in columns.iter_mut() {
            extend_column(column, batch.column(*idx))
                .with_context(|| format!("Failed to decode parquet column '{}'", name))?;
        }
    }

    let mut table = RawTable::new();
    for (_, name, column) in columns {
        table.push_column(name, column)?;
    }
    Ok(table)
}

fn empty_column(data_type: &DataType) -> Option<RawColumn> {
    match data_type {
        DataType::Float32 | DataType::Float64 => Some(RawColumn::Float(Vec::new())),
        DataType::Int32 | DataType::Int64 => Some(RawColumn::Int(Vec::new())),
        DataType::Utf8 | DataType::LargeUtf8 => Some(RawColumn::Text(Vec::new())),
        DataType::Timestamp(_, _) | DataType::Date32 => Some(RawColumn::Timestamp(Vec::new())),
        _ => None,
    }
}

fn extend_column(column: &mut RawColumn, array: &ArrayRef) -> Result<()> {
    match (column, array.data_type()) {
        (RawColumn::Float(out), DataType::Float64) => out.extend(downcast::<Float64Array>(array)?.iter()),
        (RawColumn::Float(out), DataType::Float32) => out.extend(
            downcast::<Float32Array>(array)?
                .iter()
                .map(|v| v.map(f64::from)),
        ),
        (RawColumn::Int(out), DataType::Int64) => out.extend(downcast::<Int64Array>(array)?.iter()),
        (RawColumn::Int(out), DataType::Int32) => out.extend(
            downcast::<Int32Array>(array)?
                .iter()
                .map(|v| v.map(i64::from)),
        ),
        (RawColumn::Text(out), DataType::Utf8) => out.extend(
            downcast::<StringArray>(array)?
                .iter()
                .map(|v| v.map(str::to_owned)),
        ),
        (RawColumn::Text(out), DataType::LargeUtf8) => out.extend(
            downcast::<LargeStringArray>(array)?
                .iter()
                .map(|v| v.map(str::to_owned)),
        ),
        (RawColumn::Timestamp(out), DataType::Date32) => out.extend(
            downcast::<Date32Array>(array)?
                .iter()
                .map(|v| v.and_then(date32_to_naive)),
        ),
        (RawColumn::Timestamp(out), DataType::Timestamp(unit, _)) => {
            // Raw values are UTC epoch offsets whatever the zone annotation
            let unit = *unit;
            let raw = cast(array, &DataType::Int64)?;
            out.extend(
                downcast::<Int64Array>(&raw)?
                    .iter()
                    .map(|v| v.and_then(|x| epoch_to_naive(x, unit))),
            );
        }
        (_, other) => bail!("Unexpected array type {}", other),
    }
    Ok(())
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("Array is not a {}", std::any::type_name::<T>()))
}

fn epoch_to_naive(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Second => DateTime::from_timestamp(value, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(value),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(value)),
    };
    dt.map(|d| d.naive_utc())
}

fn date32_to_naive(days: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?
        .checked_add_signed(chrono::Duration::days(days as i64))?
        .and_hms_opt(0, 0, 0)
}

/// Writes `table` as one snappy-compressed row group.
/// Prices are narrowed to 32-bit floats, timestamps become UTC milliseconds.
pub fn write_parquet<W: Write + Send>(table: &RawTable, writer: W) -> Result<()> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for (name, column) in table.columns() {
        let (data_type, array): (DataType, ArrayRef) = match column {
            RawColumn::Float(v) => (
                DataType::Float32,
                Arc::new(Float32Array::from(
                    v.iter().map(|x| x.map(|x| x as f32)).collect::<Vec<_>>(),
                )),
            ),
            RawColumn::Int(v) => (DataType::Int64, Arc::new(Int64Array::from(v.clone()))),
            RawColumn::Text(v) => (DataType::Utf8, Arc::new(StringArray::from(v.clone()))),
            RawColumn::Timestamp(v) => (
                DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into())),
                Arc::new(
                    TimestampMillisecondArray::from(
                        v.iter()
                            .map(|t| t.map(|t| t.and_utc().timestamp_millis()))
                            .collect::<Vec<_>>(),
                    )
                    .with_timezone(UTC),
                ),
            ),
        };
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)
        .context("Failed to create record batch")?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(writer, schema, Some(props))
        .context("Failed to create parquet writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_column_kind() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let table = RawTable::new()
            .with_column("Datetime", RawColumn::Timestamp(vec![Some(ts), None]))
            .and_then(|t| t.with_column("Close", RawColumn::Float(vec![Some(10.75), None])))
            .and_then(|t| t.with_column("Volume", RawColumn::Int(vec![Some(5_000_000_000), Some(1)])))
            .and_then(|t| t.with_column("Note", RawColumn::Text(vec![None, Some("x".into())])))
            .unwrap();

        let file = tempfile::tempfile().unwrap();
        write_parquet(&table, file.try_clone().unwrap()).unwrap();
        let back = read_parquet(file).unwrap();

        assert_eq!(back, table);
    }

    #[test]
    fn prices_are_narrowed_to_f32() {
        let table = RawTable::new()
            .with_column("Open", RawColumn::Float(vec![Some(0.1)]))
            .unwrap();
        let file = tempfile::tempfile().unwrap();
        write_parquet(&table, file.try_clone().unwrap()).unwrap();

        let back = read_parquet(file).unwrap();
        let value = back.column("Open").unwrap().get_f64(0).unwrap();
        assert_eq!(value, 0.1_f32 as f64);
    }

    #[test]
    fn date32_days_become_midnight() {
        assert_eq!(
            date32_to_naive(19_723).map(|t| t.to_string()),
            Some("2024-01-01 00:00:00".to_string())
        );
    }
}
