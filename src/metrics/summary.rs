//! [Open Metrics Summary](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#summary) metric type.
//!
//! Quantile estimation is a pluggable strategy ([`QuantileEstimator`]): this module only
//! guarantees deterministic serialization of whatever quantiles a configured estimator reports,
//! not any particular estimation algorithm.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    error::{Error, Result},
    raw::{atomic::DoubleAdder, exemplar::Exemplar, quantile::Quantile, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ExemplarSlot},
    snapshot::{Cell, MetricData},
    util::now_millis,
};

/// A pluggable strategy that ingests observations and reports quantile estimates on demand.
///
/// Implementations own their own state (e.g. a sliding time window of decaying samples) and
/// must be safe to call from a single caller under a mutex — the crate never calls these methods
/// concurrently on the same instance.
pub trait QuantileEstimator: Send + Sync {
    /// Feeds a new observation into the estimator.
    fn observe(&mut self, value: f64);

    /// Reports the estimator's current quantiles, in whatever order it chooses; the writer emits
    /// them in the order returned.
    fn quantiles(&self) -> Vec<Quantile>;
}

/// An estimator that tracks no quantiles: `count` and `sum` are still accumulated by
/// [`Summary`], but no quantile lines are ever produced. The default when no estimator is
/// supplied.
#[derive(Default)]
pub struct NoQuantiles;

impl QuantileEstimator for NoQuantiles {
    fn observe(&mut self, _value: f64) {}

    fn quantiles(&self) -> Vec<Quantile> {
        Vec::new()
    }
}

struct Inner {
    count: std::sync::atomic::AtomicU64,
    sum: DoubleAdder,
    estimator: Mutex<Box<dyn QuantileEstimator>>,
    created_millis: i64,
    exemplar: ExemplarSlot,
}

/// Tracks a count, a sum, and a set of quantile estimates over observed values.
///
/// # Example
///
/// ```rust
/// # use expomet::metrics::summary::Summary;
/// let summary = Summary::new();
/// summary.observe(1.0);
/// summary.observe(2.0);
/// assert_eq!(summary.count(), 2);
/// assert_eq!(summary.sum(), 3.0);
/// ```
#[derive(Clone)]
pub struct Summary {
    inner: Arc<Inner>,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    /// Creates a summary with no quantile estimation (only `count`/`sum` are tracked).
    pub fn new() -> Self {
        Self::with_estimator(NoQuantiles)
    }

    /// Creates a summary backed by a custom quantile estimator.
    pub fn with_estimator(estimator: impl QuantileEstimator + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                count: std::sync::atomic::AtomicU64::new(0),
                sum: DoubleAdder::new(),
                estimator: Mutex::new(Box::new(estimator)),
                created_millis: now_millis(),
                exemplar: ExemplarSlot::new(),
            }),
        }
    }

    /// Records an observation: increments `count`, adds to `sum`, and feeds the estimator.
    pub fn observe(&self, value: f64) {
        self.inner.count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.inner.sum.add(value);
        self.inner.estimator.lock().observe(value);
    }

    /// Records an observation and runs the exemplar sampler's CAS loop.
    pub fn observe_with_sampling(&self, value: f64, sampler: &dyn ExemplarSampler) {
        self.observe(value);
        self.inner.exemplar.try_sample(value, sampler);
    }

    /// Records an observation with a caller-supplied exemplar, bypassing the sampler.
    pub fn observe_with_exemplar(&self, value: f64, exemplar: Exemplar) -> Result<()> {
        self.observe(value);
        self.inner.exemplar.set(exemplar);
        Ok(())
    }

    /// Returns the total observation count.
    pub fn count(&self) -> u64 {
        self.inner.count.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Returns the accumulated sum of observed values.
    pub fn sum(&self) -> f64 {
        self.inner.sum.get()
    }
}

impl TypedMetric for Summary {
    const TYPE: MetricType = MetricType::Summary;
}

impl Cell for Summary {
    fn collect_data(&self) -> MetricData {
        let exemplar = self.inner.exemplar.load();
        let count = self.count();
        let sum = self.sum();
        let quantiles = self.inner.estimator.lock().quantiles();
        if quantiles.iter().any(|q| q.quantile() < 0.0 || q.quantile() > 1.0) {
            // A misbehaving estimator; surface nothing rather than an invalid sample line.
            return MetricData::Summary {
                quantiles: Vec::new(),
                sum: Some(sum),
                count: Some(count),
                created_millis: Some(self.inner.created_millis),
                exemplar: exemplar.map(|e| (*e).clone()),
            };
        }
        MetricData::Summary {
            quantiles,
            sum: Some(sum),
            count: Some(count),
            created_millis: Some(self.inner.created_millis),
            exemplar: exemplar.map(|e| (*e).clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedQuantiles(Vec<Quantile>);

    impl QuantileEstimator for FixedQuantiles {
        fn observe(&mut self, _value: f64) {}

        fn quantiles(&self) -> Vec<Quantile> {
            self.0.clone()
        }
    }

    #[test]
    fn test_count_and_sum_accumulate() {
        let summary = Summary::new();
        summary.observe(1.0);
        summary.observe(2.0);
        summary.observe(3.0);
        assert_eq!(summary.count(), 3);
        assert_eq!(summary.sum(), 6.0);
    }

    #[test]
    fn test_default_estimator_reports_no_quantiles() {
        let summary = Summary::new();
        summary.observe(1.0);
        match summary.collect_data() {
            MetricData::Summary { quantiles, .. } => assert!(quantiles.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_custom_estimator_reports_quantiles() {
        let summary = Summary::with_estimator(FixedQuantiles(vec![
            Quantile::new(0.5, 10.0),
            Quantile::new(0.99, 42.0),
        ]));
        summary.observe(10.0);
        match summary.collect_data() {
            MetricData::Summary { quantiles, .. } => assert_eq!(quantiles.len(), 2),
            _ => unreachable!(),
        }
    }
}
