//! Support/resistance detection defaults and UI bounds

use {
    super::types::{DetectionMethod, PivotOrder},
    serde::{Deserialize, Serialize},
    std::ops::RangeInclusive,
};

pub struct LevelsConfig {
    /// Bars at the end of the filtered range the detector looks at
    pub default_lookback: usize,
    pub lookback_min: usize,
    pub lookback_step: usize,

    /// Max levels kept per side
    pub default_num_levels: usize,
    pub num_levels_range: RangeInclusive<usize>,

    pub pivot_order_range: RangeInclusive<usize>,

    /// Merge distance, in percent of the previous cluster member
    pub default_threshold_pct: f64,
    pub threshold_pct_range: RangeInclusive<f64>,
    pub threshold_pct_step: f64,

    /// The extremes method keeps `num_levels * extremes_oversample` candidates per side
    pub extremes_oversample: usize,
}

pub const LEVELS: LevelsConfig = LevelsConfig {
    default_lookback: 200,
    lookback_min: 10,
    lookback_step: 10,

    default_num_levels: 5,
    num_levels_range: 1..=20,

    pivot_order_range: 1..=20,

    default_threshold_pct: 1.0,
    threshold_pct_range: 0.1..=5.0,
    threshold_pct_step: 0.1,

    extremes_oversample: 3,
};

/// User-tunable level settings. Persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub enabled: bool,
    pub lookback: usize,
    pub num_levels: usize,
    pub pivot_order: PivotOrder,
    pub threshold_pct: f64,
    pub method: DetectionMethod,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback: LEVELS.default_lookback,
            num_levels: LEVELS.default_num_levels,
            pivot_order: PivotOrder::default(),
            threshold_pct: LEVELS.default_threshold_pct,
            method: DetectionMethod::default(),
        }
    }
}

impl LevelSettings {
    /// Lookback actually used for a series of `len` bars.
    pub fn effective_lookback(&self, len: usize) -> usize {
        self.lookback.clamp(1, len.max(1))
    }
}
