//! [Open Metrics GaugeHistogram](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#gaugehistogram) metric type.

use std::sync::Arc;

use crate::{
    error::Result,
    metrics::histogram_core::{BoundsFilter, HistogramCore},
    raw::{bucket::DEFAULT_BUCKETS, exemplar::Exemplar, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ThresholdExemplarSampler},
    snapshot::{Cell, MetricData},
    util::now_millis,
};

struct Inner {
    core: HistogramCore,
    created_millis: i64,
}

/// Like [`Histogram`](crate::metrics::histogram::Histogram), but for a quantity that can
/// decrease: buckets track the distribution of a *gauge's* current value rather than a
/// monotonic counter of events, so negative bucket bounds and negative observations are both
/// permitted.
#[derive(Clone)]
pub struct GaugeHistogram {
    inner: Arc<Inner>,
}

impl Default for GaugeHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl GaugeHistogram {
    /// Creates a gauge histogram with the given bucket bounds.
    pub fn new(bounds: impl IntoIterator<Item = f64>) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: HistogramCore::from_bounds(bounds, BoundsFilter::AllowNegative),
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

    /// Returns the total observation count (`gcount`).
    pub fn gcount(&self) -> u64 {
        self.inner.core.count()
    }

    /// Returns the accumulated sum of observed values (`gsum`).
    pub fn gsum(&self) -> f64 {
        self.inner.core.sum()
    }
}

impl TypedMetric for GaugeHistogram {
    const TYPE: MetricType = MetricType::GaugeHistogram;
}

impl Cell for GaugeHistogram {
    fn collect_data(&self) -> MetricData {
        let buckets = self.inner.core.snapshot();
        MetricData::GaugeHistogram {
            buckets,
            gsum: Some(self.inner.core.sum()),
            gcount: Some(self.inner.core.count()),
            created_millis: Some(self.inner.created_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_bounds_and_observations_allowed() {
        let hist = GaugeHistogram::new([-5.0, 0.0, 5.0]);
        hist.observe(-3.0).unwrap();
        hist.observe(2.0).unwrap();

        match hist.collect_data() {
            MetricData::GaugeHistogram { buckets, gsum, gcount, .. } => {
                assert_eq!(buckets[0].count, 0); // <=-5.0: empty, -3 falls in <=0.0 bucket
                assert_eq!(buckets[1].count, 1); // <=0.0: -3.0
                assert_eq!(buckets[2].count, 2); // <=5.0: cumulative, adds 2.0
                assert_eq!(gcount, Some(2));
                assert_eq!(gsum, Some(-1.0));
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_value_bucket_placement() {
        let hist = GaugeHistogram::new([-5.0, 0.0, 5.0]);
        hist.observe(-3.0).unwrap();
        match hist.collect_data() {
            MetricData::GaugeHistogram { buckets, .. } => {
                // -5.0, 0.0, 5.0, +Inf; -3.0 lands in the <=0.0 bucket (index 1).
                assert_eq!(buckets[0].count, 0);
                assert_eq!(buckets[1].count, 1);
                assert_eq!(buckets[2].count, 1);
                assert_eq!(buckets[3].count, 1);
            },
            _ => unreachable!(),
        }
    }
}
