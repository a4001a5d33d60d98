//! Property-based tests for the summary statistics

use super::*;
use proptest::prelude::*;
use proptest::collection::vec;

/// Property-based test generators
mod generators {
    use super::*;

    /// Generate latency values in seconds
    pub fn latencies() -> impl Strategy<Value = f64> {
        0.0f64..600.0
    }

    /// Generate non-empty batches of latencies
    pub fn latency_vectors() -> impl Strategy<Value = Vec<f64>> {
        vec(latencies(), 1..500)
    }
}

proptest! {
    /// Mean should always be between min and max
    #[test]
    fn mean_between_min_max(samples in generators::latency_vectors()) {
        let summary = LatencySummary::from_samples(&samples).unwrap();
        prop_assert!(summary.mean >= summary.min - 1e-9);
        prop_assert!(summary.mean <= summary.max + 1e-9);
    }

    /// Standard deviation should be non-negative
    #[test]
    fn standard_deviation_non_negative(samples in generators::latency_vectors()) {
        let summary = LatencySummary::from_samples(&samples).unwrap();
        prop_assert!(summary.std_dev >= 0.0);
    }

    /// Percentiles are ordered
    #[test]
    fn percentiles_are_monotonic(samples in generators::latency_vectors()) {
        let summary = LatencySummary::from_samples(&samples).unwrap();
        prop_assert!(summary.min <= summary.median);
        prop_assert!(summary.median <= summary.p90);
        prop_assert!(summary.p90 <= summary.p99);
        prop_assert!(summary.p99 <= summary.max);
    }

    /// Every in-range value lands in exactly one bucket
    #[test]
    fn histogram_counts_every_sample(samples in generators::latency_vectors(), buckets in 1usize..50) {
        let counts = histogram(&samples, 0.0, 600.0, buckets);
        prop_assert_eq!(counts.iter().sum::<usize>(), samples.len());
    }
}
