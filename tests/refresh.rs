use {
    async_trait::async_trait,
    candle_viewer::{
        ViewerError,
        data::{
            CachedLoader, FetchError, MarketDataProvider, RawColumn, RawTable,
            RefreshCoordinator, staging_path,
        },
        domain::{Frequency, as_viewer_error},
    },
    std::{
        fs,
        path::PathBuf,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tempfile::{TempDir, tempdir},
};

const STORED: &str = "Date,Open,High,Low,Close\n2024-01-02,1,2,0.5,1.5\n";

fn fresh_table() -> RawTable {
    let dates = ["2024-01-02", "2024-01-03", "2024-01-04"];
    RawTable::new()
        .with_column(
            "Date",
            RawColumn::Text(dates.iter().map(|d| Some(d.to_string())).collect()),
        )
        .and_then(|t| t.with_column("Open", RawColumn::Float(vec![Some(1.0); 3])))
        .and_then(|t| t.with_column("High", RawColumn::Float(vec![Some(2.0); 3])))
        .and_then(|t| t.with_column("Low", RawColumn::Float(vec![Some(0.5); 3])))
        .and_then(|t| t.with_column("Close", RawColumn::Float(vec![Some(1.75); 3])))
        .unwrap()
}

enum Reply {
    Table(RawTable),
    Fail(FetchError),
}

/// Provider that answers every request the same way and records how many
/// requests were in flight at once.
struct StubProvider {
    reply: Reply,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_history(
        &self,
        _identifier: &str,
        _frequency: Frequency,
    ) -> Result<RawTable, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        match &self.reply {
            Reply::Table(table) => Ok(table.clone()),
            Reply::Fail(e) => Err(e.clone()),
        }
    }
}

fn stored_series(dir: &TempDir) -> PathBuf {
    let daily = Frequency::Daily.data_dir(dir.path());
    fs::create_dir_all(&daily).unwrap();
    let path = daily.join("SAN.MC.csv");
    fs::write(&path, STORED).unwrap();
    path
}

#[tokio::test]
async fn failed_refresh_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = stored_series(&dir);
    let before = fs::read(&path).unwrap();

    for failure in [
        FetchError::RateLimited,
        FetchError::Empty,
        FetchError::Unavailable("offline".to_string()),
    ] {
        let provider = Arc::new(StubProvider::new(Reply::Fail(failure)));
        let coordinator = RefreshCoordinator::new(provider, CachedLoader::in_memory());

        let err = coordinator.refresh(&path).await.unwrap_err();
        assert!(matches!(
            as_viewer_error(&err),
            Some(ViewerError::RefreshUnavailable(_))
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!staging_path(&path).exists());
    }
}

#[tokio::test]
async fn invalid_fetched_table_is_rejected() {
    let dir = tempdir().unwrap();
    let path = stored_series(&dir);
    let before = fs::read(&path).unwrap();

    let close_only = RawTable::new()
        .with_column("Date", RawColumn::Text(vec![Some("2024-01-05".to_string())]))
        .and_then(|t| t.with_column("Close", RawColumn::Float(vec![Some(3.0)])))
        .unwrap();
    let provider = Arc::new(StubProvider::new(Reply::Table(close_only)));
    let coordinator = RefreshCoordinator::new(provider, CachedLoader::in_memory());

    assert!(coordinator.refresh(&path).await.is_err());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn successful_refresh_replaces_file_and_cache_entry() {
    let dir = tempdir().unwrap();
    let path = stored_series(&dir);

    let loader = CachedLoader::in_memory();
    let before = loader.load(&path).unwrap();
    assert_eq!(before.series.len(), 1);

    let provider = Arc::new(StubProvider::new(Reply::Table(fresh_table())));
    let coordinator = RefreshCoordinator::new(provider, loader.clone());
    let outcome = coordinator.refresh(&path).await.unwrap();
    assert_eq!(outcome.bars, 3);
    assert_eq!(outcome.instrument.identifier, "SAN.MC");

    let after = loader.load(&path).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.series.len(), 3);
    assert_eq!(after.series.closes(), &[1.75, 1.75, 1.75]);
}

#[tokio::test]
async fn missing_file_is_never_created_by_refresh() {
    let dir = tempdir().unwrap();
    let path = Frequency::Daily.data_dir(dir.path()).join("NEW.MC.csv");

    let provider = Arc::new(StubProvider::new(Reply::Table(fresh_table())));
    let coordinator = RefreshCoordinator::new(provider.clone(), CachedLoader::in_memory());

    assert!(coordinator.refresh(&path).await.is_err());
    assert!(!path.exists());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_refreshes_of_one_source_never_overlap() {
    let dir = tempdir().unwrap();
    let path = stored_series(&dir);

    let provider = Arc::new(
        StubProvider::new(Reply::Table(fresh_table())).slow(Duration::from_millis(50)),
    );
    let coordinator = RefreshCoordinator::new(provider.clone(), CachedLoader::in_memory());

    let (a, b, c) = tokio::join!(
        coordinator.refresh(&path),
        coordinator.refresh(&path),
        coordinator.refresh(&path)
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    assert_eq!(provider.max_active.load(Ordering::SeqCst), 1);
}
