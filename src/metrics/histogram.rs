//! [Open Metrics Histogram](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#histogram) metric type.

use std::sync::Arc;

pub use crate::raw::bucket::{exponential_buckets, exponential_buckets_range, linear_buckets, DEFAULT_BUCKETS};
use crate::{
    error::Result,
    metrics::histogram_core::{BoundsFilter, HistogramCore},
    raw::{exemplar::Exemplar, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ThresholdExemplarSampler},
    snapshot::{Cell, MetricData},
    util::now_millis,
};

struct Inner {
    core: HistogramCore,
    created_millis: i64,
}

/// A classic histogram: observations are sampled and counted into configurable, cumulative
/// buckets, with running `count` and `sum` accumulators.
///
/// Negative observations are rejected; `NaN` is counted toward the final, `+Inf` bucket without
/// affecting `sum`.
///
/// # Example
///
/// ```rust
/// use expomet::metrics::histogram::{linear_buckets, Histogram};
///
/// let hist = Histogram::new(linear_buckets(1.0, 1.0, 3));
/// hist.observe(0.5).unwrap();
/// hist.observe(1.5).unwrap();
/// hist.observe(10.0).unwrap();
/// assert_eq!(hist.count(), 3);
/// assert_eq!(hist.sum(), 12.0);
/// ```
#[derive(Clone)]
pub struct Histogram {
    inner: Arc<Inner>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl Histogram {
    /// Creates a histogram with the given bucket bounds. Negative bounds are dropped; NaN bounds
    /// are dropped; a `+Inf` bound is appended if missing.
    pub fn new(bounds: impl IntoIterator<Item = f64>) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: HistogramCore::from_bounds(bounds, BoundsFilter::RejectNegative),
                created_millis: now_millis(),
            }),
        }
    }

    /// Records an observation, attempting the default exemplar sampler.
    pub fn observe(&self, value: f64) -> Result<()> {
        self.inner.core.observe(value, &ThresholdExemplarSampler::default())
    }

    /// Records an observation with an explicit sampler.
    pub fn observe_with_sampling(&self, value: f64, sampler: &dyn ExemplarSampler) -> Result<()> {
        self.inner.core.observe(value, sampler)
    }

    /// Records an observation with a caller-supplied exemplar, bypassing the sampler.
    pub fn observe_with_exemplar(&self, value: f64, exemplar: Exemplar) -> Result<()> {
        self.inner.core.observe_with_exemplar(value, exemplar)
    }

    /// Returns the total observation count.
    pub fn count(&self) -> u64 {
        self.inner.core.count()
    }

    /// Returns the accumulated sum of observed values.
    pub fn sum(&self) -> f64 {
        self.inner.core.sum()
    }
}

impl TypedMetric for Histogram {
    const TYPE: MetricType = MetricType::Histogram;
}

impl Cell for Histogram {
    fn collect_data(&self) -> MetricData {
        let buckets = self.inner.core.snapshot();
        MetricData::Histogram {
            buckets,
            sum: Some(self.inner.core.sum()),
            count: Some(self.inner.core.count()),
            created_millis: Some(self.inner.created_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_buckets_include_inf() {
        let hist = Histogram::default();
        match hist.collect_data() {
            MetricData::Histogram { buckets, .. } => {
                assert_eq!(buckets.len(), DEFAULT_BUCKETS.len() + 1);
                assert_eq!(buckets.last().unwrap().upper_bound, f64::INFINITY);
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_observe_accumulates_cumulative_buckets() {
        let hist = Histogram::new([1.0, 2.0, 5.0]);
        hist.observe(1.5).unwrap();
        hist.observe(0.5).unwrap();
        hist.observe(3.0).unwrap();
        hist.observe(6.0).unwrap();

        match hist.collect_data() {
            MetricData::Histogram { buckets, sum, count, .. } => {
                assert_eq!(buckets[0].count, 1);
                assert_eq!(buckets[1].count, 2);
                assert_eq!(buckets[2].count, 3);
                assert_eq!(buckets[3].count, 4);
                assert_eq!(count, Some(4));
                assert_eq!(sum, Some(11.0));
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_rejects_negative_observation() {
        let hist = Histogram::default();
        assert!(hist.observe(-1.0).is_err());
        assert_eq!(hist.count(), 0);
    }

    #[test]
    fn test_nan_counted_in_inf_bucket() {
        let hist = Histogram::default();
        hist.observe(f64::NAN).unwrap();
        assert_eq!(hist.count(), 1);
        assert_eq!(hist.sum(), 0.0);
    }

    #[test]
    fn test_thread_safe() {
        let hist = Histogram::new([1.0, 2.0, 5.0]);
        let clone = hist.clone();
        let handle = std::thread::spawn(move || {
            for i in 1..=100 {
                clone.observe(i as f64).unwrap();
            }
        });
        for i in 1..=100 {
            hist.observe(i as f64).unwrap();
        }
        handle.join().unwrap();
        assert_eq!(hist.count(), 200);
        assert_eq!(hist.sum(), 10100.0);
    }
}
