//! Small typed values shared by the analysis settings.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Which candidate generator the level detector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Default)]
pub enum DetectionMethod {
    /// Local extrema within a +/- `pivot_order` neighbourhood.
    Pivots,
    /// The most extreme highs and lows in the window.
    Extremes,
    #[default]
    Combined,
}

impl DetectionMethod {
    pub fn uses_pivots(&self) -> bool {
        matches!(self, Self::Pivots | Self::Combined)
    }

    pub fn uses_extremes(&self) -> bool {
        matches!(self, Self::Extremes | Self::Combined)
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pivots => write!(f, "Pivots"),
            Self::Extremes => write!(f, "Extremes"),
            Self::Combined => write!(f, "Combined"),
        }
    }
}

/// Neighbourhood half-width for pivot detection. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct PivotOrder(usize);

impl PivotOrder {
    pub const DEFAULT_VALUE: usize = 5;
    pub(crate) const DEFAULT: Self = Self(Self::DEFAULT_VALUE);

    pub const fn new(val: usize) -> Self {
        let v = if val < 1 { 1 } else { val };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> usize {
        self.0
    }

    /// Shortest window that can contain a pivot.
    #[inline]
    pub fn min_window(self) -> usize {
        2 * self.0 + 1
    }
}

impl Default for PivotOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<usize> for PivotOrder {
    fn from(val: usize) -> Self {
        Self::new(val)
    }
}

impl From<PivotOrder> for usize {
    fn from(order: PivotOrder) -> Self {
        order.0
    }
}

impl std::fmt::Display for PivotOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_order_clamps_to_one() {
        assert_eq!(PivotOrder::new(0).value(), 1);
        assert_eq!(PivotOrder::new(7).value(), 7);
        assert_eq!(PivotOrder::new(5).min_window(), 11);
    }

    #[test]
    fn pivot_order_deserializes_through_clamp() {
        let order: PivotOrder = serde_json::from_str("0").unwrap();
        assert_eq!(order.value(), 1);
        assert_eq!(serde_json::to_string(&PivotOrder::new(3)).unwrap(), "3");
    }
}
