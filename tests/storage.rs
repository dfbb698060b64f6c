use {
    candle_viewer::{
        ViewerError,
        data::{CachedLoader, InstrumentCatalog, TimestampField, load, read_table, write_table},
        domain::{Frequency, as_viewer_error},
    },
    std::fs,
    tempfile::tempdir,
};

const DAILY_CSV: &str = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock Splits
2024-01-03,10.5,11.25,10.0,11.0,1200,0,0
2024-01-02,10.0,10.75,9.5,10.5,1000,0,0
2024-01-04,11.0,,10.5,11.0,900,0,0
2024-01-05,11.0,12.0,10.75,11.75,1500,0,0
";

#[test]
fn csv_load_cleans_and_sorts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IBE.MC.csv");
    fs::write(&path, DAILY_CSV).unwrap();

    let (series, field) = load(&path).unwrap();
    assert_eq!(field, TimestampField::Date);
    // The row with a missing High is dropped
    assert_eq!(series.len(), 3);
    assert_eq!(series.closes(), &[10.5, 11.0, 11.75]);
    assert!(series.timestamps().windows(2).all(|w| w[0] < w[1]));
    assert!(series.has_volume());
}

#[test]
fn parquet_and_csv_round_trip_through_the_loader() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.csv");
    fs::write(&source, DAILY_CSV).unwrap();
    let table = read_table(&source).unwrap();
    let (expected, _) = load(&source).unwrap();

    for name in ["copy.parquet", "copy.csv"] {
        let path = dir.path().join(name);
        write_table(&path, &table).unwrap();
        let (series, field) = load(&path).unwrap();
        assert_eq!(field, TimestampField::Date, "{}", name);
        assert_eq!(series, expected, "{}", name);
    }
}

#[test]
fn hourly_offsets_normalize_to_utc() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IBE.MC_h.csv");
    fs::write(
        &path,
        "Datetime,Open,High,Low,Close\n\
         2024-03-01 09:00:00+01:00,1,2,0.5,1.5\n\
         2024-03-01 10:00:00+01:00,1.5,2.5,1,2\n",
    )
    .unwrap();

    let (series, field) = load(&path).unwrap();
    assert_eq!(field, TimestampField::Datetime);
    assert_eq!(series.timestamps()[0].to_string(), "2024-03-01 08:00:00");
}

#[test]
fn missing_close_column_surfaces_as_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("BAD.csv");
    fs::write(&path, "Date,Open,High,Low\n2024-01-02,1,2,0.5\n").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(as_viewer_error(&err), Some(ViewerError::Format(_))));
}

#[test]
fn cached_loader_reuses_until_the_file_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("SAN.MC.csv");
    fs::write(&path, DAILY_CSV).unwrap();

    let loader = CachedLoader::in_memory();
    let first = loader.load(&path).unwrap();
    let again = loader.load(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &again));

    loader.invalidate(&path);
    let reloaded = loader.load(&path).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &reloaded));
    assert_eq!(first.series, reloaded.series);
}

#[test]
fn catalog_file_lists_valid_instruments_by_sector() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("instruments.csv");
    fs::write(
        &catalog,
        "identifier,sector,valid\n\
         SAN.MC,Banks,true\n\
         IBE.MC,Utilities,true\n\
         BBVA.MC,Banks,yes\n\
         OLD.MC,Banks,false\n",
    )
    .unwrap();

    let found = InstrumentCatalog::discover(&catalog, dir.path(), Frequency::Daily).unwrap();
    assert_eq!(found.sectors(), vec!["Banks", "Utilities"]);
    assert_eq!(found.identifiers(Some("Banks")), vec!["BBVA.MC", "SAN.MC"]);
    assert_eq!(found.identifiers(None).len(), 3);
}

#[test]
fn catalog_falls_back_to_directory_listing() {
    let dir = tempdir().unwrap();
    let daily = Frequency::Daily.data_dir(dir.path());
    fs::create_dir_all(&daily).unwrap();
    fs::write(daily.join("SAN.MC.csv"), DAILY_CSV).unwrap();
    fs::write(daily.join("notes.txt"), "ignored").unwrap();

    let missing = dir.path().join("instruments.csv");
    let found = InstrumentCatalog::discover(&missing, dir.path(), Frequency::Daily).unwrap();
    assert_eq!(found.identifiers(None), vec!["SAN.MC"]);
    assert!(found.sectors().is_empty());
}
