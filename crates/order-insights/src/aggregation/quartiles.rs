//! Box-plot statistics.
//!
//! Quartiles follow the inclusive convention: the `p`-quantile of `n` sorted
//! values sits at position `p * (n - 1)`, interpolated linearly between the
//! neighbouring values.

use serde::{Deserialize, Serialize};

/// Five-number summary plus whisker ends and outliers for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - factor * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + factor * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarise `values`. Non-finite values are ignored; returns `None` when
    /// nothing is left.
    pub fn from_values(values: &[f64], whisker_iqr_factor: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_inclusive(&sorted, 0.25)?;
        let median = quantile_inclusive(&sorted, 0.5)?;
        let q3 = quantile_inclusive(&sorted, 0.75)?;
        let reach = whisker_iqr_factor * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        // Fences bracket q1..q3, so at least one value lies inside them.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(sorted[0]);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(sorted[sorted.len() - 1]);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Inclusive linear-interpolation quantile of an ascending slice.
pub fn quantile_inclusive(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quantile_inclusive_even_count() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile_inclusive(&values, 0.25).unwrap(), 1.75));
        assert!(approx(quantile_inclusive(&values, 0.5).unwrap(), 2.5));
        assert!(approx(quantile_inclusive(&values, 0.75).unwrap(), 3.25));
    }

    #[test]
    fn test_quantile_inclusive_odd_count() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(approx(quantile_inclusive(&values, 0.25).unwrap(), 2.0));
        assert!(approx(quantile_inclusive(&values, 0.5).unwrap(), 3.0));
        assert!(approx(quantile_inclusive(&values, 0.75).unwrap(), 4.0));
    }

    #[test]
    fn test_quantile_edges() {
        assert_eq!(quantile_inclusive(&[], 0.5), None);
        assert_eq!(quantile_inclusive(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile_inclusive(&[1.0, 2.0], 1.5), None);
    }

    #[test]
    fn test_box_stats_single_point() {
        let stats = BoxStats::from_values(&[-2.0], 1.5).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, -2.0);
        assert_eq!(stats.lower_whisker, -2.0);
        assert_eq!(stats.upper_whisker, -2.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_flags_outlier() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let stats = BoxStats::from_values(&values, 1.5).unwrap();

        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.upper_whisker, 9.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.max, 100.0);
        assert!(approx(stats.mean, 14.5));
    }

    #[test]
    fn test_box_stats_unsorted_input_and_nan() {
        let stats = BoxStats::from_values(&[4.0, f64::NAN, 1.0, 3.0, 2.0], 1.5).unwrap();
        assert_eq!(stats.count, 4);
        assert!(approx(stats.q1, 1.75));
        assert!(approx(stats.q3, 3.25));
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values(&[], 1.5).is_none());
        assert!(BoxStats::from_values(&[f64::NAN], 1.5).is_none());
    }
}
