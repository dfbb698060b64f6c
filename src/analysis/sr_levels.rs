use {
    super::{level_clusterer::cluster, level_detector::detect},
    crate::{config::{DF, LevelSettings}, domain::LevelSet, models::PriceSeries, trace_time},
};

/// Support/resistance levels over the last `lookback` bars of `filtered`.
pub fn find_levels(filtered: &PriceSeries, settings: &LevelSettings) -> LevelSet {
    if filtered.is_empty() || settings.num_levels == 0 {
        return LevelSet::default();
    }

    trace_time!("find_levels", 2_000, {
        let window = filtered.tail(settings.effective_lookback(filtered.len()));
        let candidates = detect(
            &window,
            settings.pivot_order,
            settings.num_levels,
            settings.method,
        );

        let levels = LevelSet::from_clusters(
            cluster(&candidates.resistances, settings.threshold_pct),
            cluster(&candidates.supports, settings.threshold_pct),
            settings.num_levels,
        );

        if DF.log_levels {
            log::info!(
                "find_levels: window {} bars -> R {:?} / S {:?}",
                window.len(),
                levels.resistances.iter().map(|l| l.price).collect::<Vec<_>>(),
                levels.supports.iter().map(|l| l.price).collect::<Vec<_>>()
            );
        }
        levels
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{config::DetectionMethod, domain::PriceBar},
        chrono::{Duration, NaiveDate},
    };

    fn ramp(n: usize) -> PriceSeries {
        let t0 = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PriceSeries::from_bars(
            (0..n)
                .map(|i| {
                    let p = 100.0 + i as f64;
                    PriceBar::new(t0 + Duration::days(i as i64), p, p + 1.0, p - 1.0, p)
                })
                .collect(),
        )
    }

    #[test]
    fn resistances_descend_supports_ascend() {
        let settings = LevelSettings {
            method: DetectionMethod::Extremes,
            num_levels: 3,
            threshold_pct: 0.1,
            ..LevelSettings::default()
        };
        let levels = find_levels(&ramp(50), &settings);

        let res: Vec<f64> = levels.resistances.iter().map(|l| l.price).collect();
        let sup: Vec<f64> = levels.supports.iter().map(|l| l.price).collect();
        assert_eq!(res, vec![150.0, 149.0, 148.0]);
        assert_eq!(sup, vec![99.0, 100.0, 101.0]);
        assert_eq!(levels.resistances[0].rank, 1);
    }

    #[test]
    fn lookback_limits_window_to_the_tail() {
        let settings = LevelSettings {
            method: DetectionMethod::Extremes,
            lookback: 10,
            num_levels: 1,
            threshold_pct: 0.0,
            ..LevelSettings::default()
        };
        let levels = find_levels(&ramp(50), &settings);
        // Last 10 bars have lows 139..=148
        assert_eq!(levels.supports[0].price, 139.0);
    }

    #[test]
    fn empty_series_has_no_levels() {
        assert!(find_levels(&PriceSeries::empty(), &LevelSettings::default()).is_empty());
    }
}
