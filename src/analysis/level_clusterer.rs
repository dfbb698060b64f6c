/// Greedy single-pass merge of nearby price levels.
///
/// Levels are visited in ascending order. A level joins the open cluster when
/// it sits within `threshold_pct` percent of that cluster's LAST member, so a
/// long run of small steps can drift well past the threshold from the first
/// member. Each cluster is emitted as its mean, ascending.
///
/// Exact duplicates always merge. Otherwise a `threshold_pct <= 0` keeps
/// every level separate.
pub fn cluster(levels: &[f64], threshold_pct: f64) -> Vec<f64> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut out = Vec::new();
    let mut current: Vec<f64> = Vec::new();

    for level in sorted {
        let joins = match current.last() {
            None => true,
            Some(&last) => {
                // last == 0 gives inf/NaN, which never joins
                level == last || (level - last).abs() / last * 100.0 <= threshold_pct
            }
        };
        if !joins {
            out.push(mean(&current));
            current.clear();
        }
        current.push(level);
    }
    if !current.is_empty() {
        out.push(mean(&current));
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn empty_and_singleton() {
        assert!(cluster(&[], 1.0).is_empty());
        assert_eq!(cluster(&[42.0], 1.0), vec![42.0]);
    }

    #[test]
    fn merges_neighbours_within_threshold() {
        assert_close(&cluster(&[105.0, 99.01, 99.0], 1.0), &[99.005, 105.0]);
    }

    #[test]
    fn compares_against_last_member_not_first() {
        // Each step is under 1% but 100 -> 102.4 is well over it
        let out = cluster(&[100.0, 100.8, 101.6, 102.4], 1.0);
        assert_close(&out, &[101.2]);
    }

    #[test]
    fn idempotent_when_well_separated() {
        let levels = [10.0, 20.0, 30.0, 45.0];
        let once = cluster(&levels, 2.0);
        assert_close(&once, &levels);
        assert_close(&cluster(&once, 2.0), &once);
    }

    #[test]
    fn non_positive_threshold_only_merges_duplicates() {
        assert_close(&cluster(&[5.0, 5.0, 5.01], 0.0), &[5.0, 5.01]);
        assert_close(&cluster(&[5.0, 5.0, 5.01], -1.0), &[5.0, 5.01]);
    }

    #[test]
    fn zero_level_starts_its_own_cluster() {
        assert_close(&cluster(&[0.0, 0.0, 0.001], 50.0), &[0.0, 0.001]);
    }
}
