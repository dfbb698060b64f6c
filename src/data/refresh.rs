use {
    super::{
        cache::CachedLoader,
        loader::load_series,
        provider::MarketDataProvider,
        storage::replace_table,
    },
    crate::{
        config::DF,
        domain::{Instrument, ViewerError},
        utils::format_duration,
    },
    anyhow::{Context, Result, bail},
    std::{
        collections::HashMap,
        path::{Path, PathBuf},
        sync::{Arc, Mutex, PoisonError},
        time::Instant,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub instrument: Instrument,
    pub path: PathBuf,
    /// Bars in the stored series after the refresh
    pub bars: usize,
}

/// Replaces stored series with fresh provider history.
///
/// At most one refresh per path is in flight; a second request for the same
/// path waits for the first and then runs. A failed refresh leaves the stored
/// file untouched. A successful one invalidates the cached load.
pub struct RefreshCoordinator {
    provider: Arc<dyn MarketDataProvider>,
    loader: CachedLoader,
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl RefreshCoordinator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, loader: CachedLoader) -> Self {
        Self {
            provider,
            loader,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }

    /// Drops the path's lock once no refresh holds or waits on it.
    fn release(&self, path: &Path) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(path).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(path);
        }
    }

    #[cfg(test)]
    fn tracked_paths(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every failure surfaces as `ViewerError::RefreshUnavailable`.
    pub async fn refresh(&self, path: &Path) -> Result<RefreshOutcome> {
        let start = Instant::now();
        let result = {
            let lock = self.lock_for(path);
            let _guard = lock.lock().await;
            self.refresh_locked(path).await
        };
        self.release(path);

        match result {
            Ok(outcome) => {
                if DF.log_refresh {
                    log::info!(
                        "refresh: {} -> {} bars in {}",
                        outcome.path.display(),
                        outcome.bars,
                        format_duration(start.elapsed().as_millis() as i64)
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                log::warn!("refresh: {} failed: {:#}", path.display(), e);
                Err(ViewerError::RefreshUnavailable(format!("{:#}", e)).into())
            }
        }
    }

    async fn refresh_locked(&self, path: &Path) -> Result<RefreshOutcome> {
        if !path.is_file() {
            bail!("No stored series at {}", path.display());
        }
        let instrument = Instrument::from_path(path)
            .with_context(|| format!("Cannot derive an instrument from {}", path.display()))?;

        let table = self
            .provider
            .fetch_history(&instrument.identifier, instrument.frequency)
            .await
            .with_context(|| format!("Fetching {}", instrument))?;

        // Only a table the loader accepts may replace the stored one
        let (series, _) = load_series(&table).context("Fetched data failed validation")?;

        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || replace_table(&target, &table))
            .await
            .context("Write task panicked")??;

        self.loader.invalidate(path);

        Ok(RefreshOutcome {
            instrument,
            path: path.to_path_buf(),
            bars: series.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            data::{provider::FetchError, table::RawTable},
            domain::Frequency,
        },
        async_trait::async_trait,
    };

    struct Unreachable;

    #[async_trait]
    impl MarketDataProvider for Unreachable {
        async fn fetch_history(
            &self,
            _identifier: &str,
            _frequency: Frequency,
        ) -> Result<RawTable, FetchError> {
            Err(FetchError::Empty)
        }
    }

    #[tokio::test]
    async fn test_locks_are_released_after_refresh() {
        let coordinator =
            RefreshCoordinator::new(Arc::new(Unreachable), CachedLoader::in_memory());
        let dir = tempfile::tempdir().unwrap();

        for name in ["AAA.csv", "BBB.csv", "CCC_h.csv"] {
            assert!(coordinator.refresh(&dir.path().join(name)).await.is_err());
        }
        assert_eq!(coordinator.tracked_paths(), 0);
    }

    #[test]
    fn test_held_lock_is_kept() {
        let coordinator =
            RefreshCoordinator::new(Arc::new(Unreachable), CachedLoader::in_memory());
        let path = Path::new("AAA.csv");
        let held = coordinator.lock_for(path);
        coordinator.release(path);
        assert_eq!(coordinator.tracked_paths(), 1);

        drop(held);
        coordinator.release(path);
        assert_eq!(coordinator.tracked_paths(), 0);
    }
}
