// src/app/state.rs

use {
    crate::{
        analysis::{common_dates, compare, date_overlap, filter, find_levels},
        config::{DF, LevelSettings},
        data::{LoadedSeries, RefreshOutcome},
        domain::{LevelSet, ViewerError},
        models::PriceSeries,
    },
    chrono::NaiveDate,
    poll_promise::Promise,
    serde::{Deserialize, Serialize},
    std::{path::PathBuf, sync::Arc},
    strum_macros::EnumIter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub(crate) enum Tab {
    #[default]
    Single,
    Comparison,
}

pub(crate) type DateRange = (NaiveDate, NaiveDate);

fn same_source(a: &Option<Arc<LoadedSeries>>, b: &Option<Arc<LoadedSeries>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// ============================================================================
// SINGLE CHART
// ============================================================================

/// Pipeline output for the single-chart tab. Recomputed only when the
/// source, the date range or the level settings change.
#[derive(Default)]
pub(crate) struct SingleView {
    source: Option<Arc<LoadedSeries>>,
    pub(crate) date_range: Option<DateRange>,
    pub(crate) filtered: PriceSeries,
    pub(crate) levels: Option<LevelSet>,
    computed_for: Option<(DateRange, LevelSettings)>,
}

impl SingleView {
    /// A new source resets the date range to its full span.
    pub(crate) fn set_source(&mut self, source: Option<Arc<LoadedSeries>>) {
        if same_source(&self.source, &source) {
            return;
        }
        self.date_range = source.as_ref().and_then(|s| s.series.date_bounds());
        self.source = source;
        self.computed_for = None;
        self.filtered = PriceSeries::empty();
        self.levels = None;
    }

    pub(crate) fn source(&self) -> Option<&LoadedSeries> {
        self.source.as_deref()
    }

    pub(crate) fn bounds(&self) -> Option<DateRange> {
        self.source.as_ref()?.series.date_bounds()
    }

    pub(crate) fn range_is_inverted(&self) -> bool {
        self.date_range.is_some_and(|(start, end)| start > end)
    }

    pub(crate) fn recompute(&mut self, settings: &LevelSettings) {
        let (Some(source), Some(range)) = (&self.source, self.date_range) else {
            return;
        };
        let key = (range, settings.clone());
        if self.computed_for.as_ref() == Some(&key) {
            return;
        }

        if range.0 > range.1 {
            self.filtered = PriceSeries::empty();
            self.levels = None;
        } else {
            self.filtered = filter(&source.series, range.0, range.1);
            self.levels = settings
                .enabled
                .then(|| find_levels(&self.filtered, settings));
        }
        self.computed_for = Some(key);
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Pipeline output for the comparison tab.
#[derive(Default)]
pub(crate) struct ComparisonView {
    sources: (Option<Arc<LoadedSeries>>, Option<Arc<LoadedSeries>>),
    /// Calendar overlap of the two full series. `None` when they share no dates.
    pub(crate) overlap: Option<DateRange>,
    pub(crate) date_range: Option<DateRange>,
    pub(crate) common: (PriceSeries, PriceSeries),
    pub(crate) ratio: Option<Result<PriceSeries, ViewerError>>,
    computed_for: Option<DateRange>,
}

impl ComparisonView {
    pub(crate) fn set_sources(
        &mut self,
        first: Option<Arc<LoadedSeries>>,
        second: Option<Arc<LoadedSeries>>,
    ) {
        if same_source(&self.sources.0, &first) && same_source(&self.sources.1, &second) {
            return;
        }
        self.overlap = match (&first, &second) {
            (Some(a), Some(b)) => date_overlap(&a.series, &b.series),
            _ => None,
        };
        self.date_range = self.overlap;
        self.sources = (first, second);
        self.computed_for = None;
        self.common = (PriceSeries::empty(), PriceSeries::empty());
        self.ratio = None;
    }

    pub(crate) fn has_both(&self) -> bool {
        self.sources.0.is_some() && self.sources.1.is_some()
    }

    pub(crate) fn range_is_inverted(&self) -> bool {
        self.date_range.is_some_and(|(start, end)| start > end)
    }

    pub(crate) fn recompute(&mut self) {
        let (Some(a), Some(b)) = (&self.sources.0, &self.sources.1) else {
            return;
        };
        let Some(range) = self.date_range else {
            self.ratio = Some(Err(ViewerError::NoOverlap));
            return;
        };
        if self.computed_for == Some(range) {
            return;
        }

        if range.0 > range.1 {
            self.common = (PriceSeries::empty(), PriceSeries::empty());
            self.ratio = None;
        } else {
            let filtered_a = filter(&a.series, range.0, range.1);
            let filtered_b = filter(&b.series, range.0, range.1);
            self.common = common_dates(&filtered_a, &filtered_b);
            self.ratio = Some(compare(&a.series, &b.series, range.0, range.1));
            if DF.log_ratio {
                if let Some(Ok(ratio)) = &self.ratio {
                    log::info!(
                        "ratio: {} bars over {}..={} ({} common dates)",
                        ratio.len(),
                        range.0,
                        range.1,
                        self.common.0.len()
                    );
                }
            }
        }
        self.computed_for = Some(range);
    }
}

// ============================================================================
// REFRESH
// ============================================================================

#[derive(Default)]
pub(crate) enum RefreshStatus {
    #[default]
    Idle,
    Running {
        path: PathBuf,
        promise: Promise<anyhow::Result<RefreshOutcome>>,
    },
    Finished {
        path: PathBuf,
        result: Result<usize, String>,
    },
}

impl RefreshStatus {
    pub(crate) fn is_running(&self) -> bool {
        matches!(self, RefreshStatus::Running { .. })
    }
}
