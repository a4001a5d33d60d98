//! Summary statistics over observed or generated latencies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a batch of latency values in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of samples summarized
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// 50th percentile
    pub median: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

impl LatencySummary {
    /// Summarize `samples`. Returns `None` when there is nothing to summarize.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = mean(&sorted);
        Some(Self {
            count: sorted.len(),
            mean,
            std_dev: standard_deviation(&sorted, mean),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
            p99: percentile(&sorted, 99.0),
        })
    }

    /// Positive when the upper tail is the long one
    pub fn skew_direction(&self) -> f64 {
        self.mean - self.median
    }
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.3}s median={:.3}s p90={:.3}s p99={:.3}s min={:.3}s max={:.3}s stddev={:.3}s",
            self.count, self.mean, self.median, self.p90, self.p99, self.min, self.max, self.std_dev
        )
    }
}

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile of already sorted values with linear interpolation
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Sample standard deviation
pub fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Count of values per equal-width bucket over `[low, high]`
pub fn histogram(values: &[f64], low: f64, high: f64, buckets: usize) -> Vec<usize> {
    let mut counts = vec![0usize; buckets];
    if buckets == 0 || high <= low {
        return counts;
    }

    let width = (high - low) / buckets as f64;
    for &value in values {
        if value < low || value > high {
            continue;
        }
        let bucket = (((value - low) / width) as usize).min(buckets - 1);
        counts[bucket] += 1;
    }
    counts
}

#[cfg(test)]
mod comprehensive_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_calculation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        assert_eq!(percentile(&values, 50.0), 5.5);
        assert!((percentile(&values, 90.0) - 9.1).abs() < 1e-12);
        assert_eq!(percentile(&values, 100.0), 10.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_standard_deviation() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert!((standard_deviation(&values, m) - 2.138).abs() < 0.001);
        assert_eq!(standard_deviation(&[3.0], 3.0), 0.0);
    }

    #[test]
    fn test_summary_from_unsorted_samples() {
        let summary = LatencySummary::from_samples(&[0.3, 0.1, 0.2]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.3);
        assert_eq!(summary.median, 0.2);
        assert!((summary.mean - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        assert!(LatencySummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_skew_direction() {
        let right_tailed = LatencySummary::from_samples(&[1.0, 1.0, 1.1, 1.2, 9.0]).unwrap();
        assert!(right_tailed.skew_direction() > 0.0);

        let left_tailed = LatencySummary::from_samples(&[1.0, 8.8, 8.9, 9.0, 9.0]).unwrap();
        assert!(left_tailed.skew_direction() < 0.0);
    }

    #[test]
    fn test_histogram_buckets() {
        let values = vec![0.0, 0.1, 0.5, 0.99, 1.0, 1.5];
        let counts = histogram(&values, 0.0, 1.0, 2);
        assert_eq!(counts, vec![2, 3]);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        assert_eq!(histogram(&[1.0, 2.0], 1.0, 1.0, 3), vec![0, 0, 0]);
        assert!(histogram(&[1.0], 0.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_summary_display() {
        let summary = LatencySummary::from_samples(&[0.5, 1.5]).unwrap();
        let text = summary.to_string();
        assert!(text.contains("n=2"));
        assert!(text.contains("mean=1.000s"));
    }
}
