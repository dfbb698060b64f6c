use {
    super::loader::{TimestampField, load},
    crate::{config::DF, models::PriceSeries},
    anyhow::{Context, Result},
    std::{
        collections::HashMap,
        fs,
        path::{Path, PathBuf},
        sync::{Arc, Mutex, PoisonError},
        time::SystemTime,
    },
};

/// A loaded, cleaned series plus the timestamp field it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub field: TimestampField,
}

/// Identity of a file's contents as far as the cache is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let meta =
            fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Memo of loaded series, keyed by path and checked against the file stamp.
pub trait SeriesCache: Send + Sync {
    fn get(&self, path: &Path, stamp: FileStamp) -> Option<Arc<LoadedSeries>>;
    fn insert(&self, path: &Path, stamp: FileStamp, loaded: Arc<LoadedSeries>);
    fn invalidate(&self, path: &Path);
}

#[derive(Default)]
pub struct MemorySeriesCache {
    entries: Mutex<HashMap<PathBuf, (FileStamp, Arc<LoadedSeries>)>>,
}

impl MemorySeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeriesCache for MemorySeriesCache {
    fn get(&self, path: &Path, stamp: FileStamp) -> Option<Arc<LoadedSeries>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(path) {
            Some((cached_stamp, loaded)) if *cached_stamp == stamp => Some(loaded.clone()),
            _ => None,
        }
    }

    fn insert(&self, path: &Path, stamp: FileStamp, loaded: Arc<LoadedSeries>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), (stamp, loaded));
    }

    fn invalidate(&self, path: &Path) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some();
        if DF.log_cache && removed {
            log::info!("cache: invalidated {}", path.display());
        }
    }
}

/// Loads through an injected cache. Cloning shares the cache.
#[derive(Clone)]
pub struct CachedLoader {
    cache: Arc<dyn SeriesCache>,
}

impl CachedLoader {
    pub fn new(cache: Arc<dyn SeriesCache>) -> Self {
        Self { cache }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySeriesCache::new()))
    }

    pub fn load(&self, path: &Path) -> Result<Arc<LoadedSeries>> {
        let stamp = FileStamp::of(path)?;
        if let Some(hit) = self.cache.get(path, stamp) {
            if DF.log_cache {
                log::info!("cache: hit {}", path.display());
            }
            return Ok(hit);
        }

        let (series, field) = load(path)?;
        let loaded = Arc::new(LoadedSeries { series, field });
        self.cache.insert(path, stamp, loaded.clone());
        if DF.log_cache {
            log::info!("cache: loaded {} ({} bars)", path.display(), loaded.series.len());
        }
        Ok(loaded)
    }

    pub fn invalidate(&self, path: &Path) {
        self.cache.invalidate(path);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::domain::PriceBar, chrono::NaiveDate};

    fn loaded(close: f64) -> Arc<LoadedSeries> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Arc::new(LoadedSeries {
            series: PriceSeries::from_bars(vec![PriceBar::flat(ts, close)]),
            field: TimestampField::Date,
        })
    }

    #[test]
    fn stale_stamp_misses() {
        let cache = MemorySeriesCache::new();
        let path = Path::new("data/daily/X.csv");
        let stamp = FileStamp { modified: None, len: 10 };
        cache.insert(path, stamp, loaded(1.0));

        assert!(cache.get(path, stamp).is_some());
        assert!(cache.get(path, FileStamp { modified: None, len: 11 }).is_none());

        cache.invalidate(path);
        assert!(cache.get(path, stamp).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn loader_reuses_until_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X.csv");
        fs::write(&path, "Date,Open,High,Low,Close\n2024-01-01,1,1,1,1\n").unwrap();

        let loader = CachedLoader::in_memory();
        let first = loader.load(&path).unwrap();
        let second = loader.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Different length changes the stamp even within mtime resolution
        fs::write(&path, "Date,Open,High,Low,Close\n2024-01-01,2,2,2,2.5\n").unwrap();
        let third = loader.load(&path).unwrap();
        assert_eq!(third.series.closes(), &[2.5]);
    }
}
