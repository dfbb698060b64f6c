use {
    crate::{
        config::{DF, DetectionMethod, LEVELS, PivotOrder},
        models::PriceSeries,
    },
    itertools::Itertools,
};

/// Raw support/resistance candidates, before clustering.
/// Each side is ascending with exact duplicates removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateLevels {
    pub resistances: Vec<f64>,
    pub supports: Vec<f64>,
}

pub fn detect(
    window: &PriceSeries,
    pivot_order: PivotOrder,
    num_levels: usize,
    method: DetectionMethod,
) -> CandidateLevels {
    let highs = window.highs();
    let lows = window.lows();

    let mut resistances = Vec::new();
    let mut supports = Vec::new();

    if method.uses_pivots() && window.len() >= pivot_order.min_window() {
        resistances.extend(pivot_indices(highs, pivot_order, |c, n| c > n).map(|i| highs[i]));
        supports.extend(pivot_indices(lows, pivot_order, |c, n| c < n).map(|i| lows[i]));
    }

    if method.uses_extremes() {
        let n = num_levels * LEVELS.extremes_oversample;
        resistances.extend(extreme_values(highs, n, |a, b| b.total_cmp(a)));
        supports.extend(extreme_values(lows, n, |a, b| a.total_cmp(b)));
    }

    let candidates = CandidateLevels {
        resistances: unique_sorted(resistances),
        supports: unique_sorted(supports),
    };

    if DF.log_levels {
        log::info!(
            "detect[{}]: {} bars, order {} -> {} resistance / {} support candidates",
            method,
            window.len(),
            pivot_order,
            candidates.resistances.len(),
            candidates.supports.len()
        );
    }
    candidates
}

/// Positions whose value beats every neighbour within `order` on both sides.
/// The first and last `order` positions can never qualify.
pub fn pivot_indices<'a>(
    values: &'a [f64],
    order: PivotOrder,
    beats: impl Fn(f64, f64) -> bool + 'a,
) -> impl Iterator<Item = usize> + 'a {
    let k = order.value();
    let upper = values.len().saturating_sub(k);
    (k..upper).filter(move |&i| {
        let current = values[i];
        values[i - k..i]
            .iter()
            .chain(&values[i + 1..=i + k])
            .all(|&neighbour| beats(current, neighbour))
    })
}

/// The first `n` values under `order`. Ties keep their original position.
fn extreme_values(
    values: &[f64],
    n: usize,
    order: impl Fn(&f64, &f64) -> std::cmp::Ordering,
) -> impl Iterator<Item = f64> {
    // sorted_by is stable
    values
        .iter()
        .copied()
        .sorted_by(|a, b| order(a, b))
        .take(n)
}

fn unique_sorted(mut levels: Vec<f64>) -> Vec<f64> {
    levels.sort_by(|a, b| a.total_cmp(b));
    levels.dedup();
    levels
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::PriceBar,
        chrono::{Duration, NaiveDate},
    };

    fn series_from_hl(highs: &[f64], lows: &[f64]) -> PriceSeries {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PriceSeries::from_bars(
            highs
                .iter()
                .zip(lows)
                .enumerate()
                .map(|(i, (&h, &l))| {
                    PriceBar::new(t0 + Duration::days(i as i64), (h + l) / 2.0, h, l, (h + l) / 2.0)
                })
                .collect(),
        )
    }

    #[test]
    fn single_peak_gives_one_pivot_resistance() {
        let mut highs: Vec<f64> = (0..21).map(|i| 100.0 + (i % 3) as f64).collect();
        highs[10] = 150.0;
        let lows = vec![90.0; 21];
        let window = series_from_hl(&highs, &lows);

        let found = detect(&window, PivotOrder::new(5), 5, DetectionMethod::Pivots);
        assert_eq!(found.resistances, vec![150.0]);
        // Flat lows are never strictly below their neighbours
        assert!(found.supports.is_empty());
    }

    #[test]
    fn boundary_bars_are_never_pivots() {
        // Strictly decreasing: index 0 is the max but sits on the edge
        let values: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let order = PivotOrder::new(4);
        assert_eq!(pivot_indices(&values, order, |c, n| c > n).count(), 0);

        let zigzag: Vec<f64> = (0..40).map(|i| if i % 7 == 3 { 10.0 } else { 1.0 }).collect();
        for idx in pivot_indices(&zigzag, PivotOrder::new(3), |c, n| c > n) {
            assert!(idx >= 3 && idx < zigzag.len() - 3);
        }
    }

    #[test]
    fn short_window_has_no_pivots() {
        let window = series_from_hl(&[1.0, 5.0, 1.0], &[1.0, 0.5, 1.0]);
        let found = detect(&window, PivotOrder::new(2), 5, DetectionMethod::Pivots);
        assert_eq!(found, CandidateLevels::default());
    }

    #[test]
    fn extremes_take_oversampled_top_values() {
        let highs: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let lows: Vec<f64> = highs.iter().map(|h| h - 0.5).collect();
        let window = series_from_hl(&highs, &lows);

        let found = detect(&window, PivotOrder::new(5), 1, DetectionMethod::Extremes);
        assert_eq!(found.resistances, vec![8.0, 9.0, 10.0]);
        assert_eq!(found.supports, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn combined_is_deduplicated_union() {
        let mut highs: Vec<f64> = vec![100.0; 21];
        highs[10] = 150.0;
        let lows = vec![90.0; 21];
        let window = series_from_hl(&highs, &lows);

        let found = detect(&window, PivotOrder::new(5), 1, DetectionMethod::Combined);
        assert_eq!(found.resistances, vec![100.0, 150.0]);
        assert_eq!(found.supports, vec![90.0]);
    }
}
