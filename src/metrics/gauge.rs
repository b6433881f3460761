//! [Open Metrics Gauge](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#gauge) metric type.

use std::sync::Arc;

use crate::{
    error::Result,
    raw::{atomic::AtomicF64, exemplar::Exemplar, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ExemplarSlot},
    snapshot::{Cell, MetricData},
};

struct Inner {
    value: AtomicF64,
    exemplar: ExemplarSlot,
}

/// A value that can go up and down, such as a temperature or an in-flight request count.
///
/// # Example
///
/// ```rust
/// # use expomet::metrics::gauge::Gauge;
/// let gauge = Gauge::new();
/// gauge.inc(1.0);
/// gauge.set(10.0);
/// gauge.dec(2.5);
/// assert_eq!(gauge.get(), 7.5);
/// ```
#[derive(Clone)]
pub struct Gauge {
    inner: Arc<Inner>,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

impl Gauge {
    /// Creates a gauge starting at zero.
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { value: AtomicF64::new(0.0), exemplar: ExemplarSlot::new() }) }
    }

    /// Adds `amount` to the gauge's current value. `amount` may be negative.
    pub fn inc(&self, amount: f64) {
        self.inner.value.add(amount);
    }

    /// Subtracts `amount` from the gauge's current value.
    pub fn dec(&self, amount: f64) {
        self.inner.value.add(-amount);
    }

    /// Sets the gauge to `value`, discarding the previous value.
    pub fn set(&self, value: f64) {
        self.inner.value.set(value);
    }

    /// Adds `amount` to the gauge and runs the exemplar sampler's CAS loop.
    pub fn inc_with_sampling(&self, amount: f64, sampler: &dyn ExemplarSampler) {
        self.inc(amount);
        self.inner.exemplar.try_sample(amount, sampler);
    }

    /// Adds `amount` to the gauge and unconditionally installs `exemplar`, bypassing the
    /// sampler.
    pub fn inc_with_exemplar(&self, amount: f64, exemplar: Exemplar) -> Result<()> {
        self.inc(amount);
        self.inner.exemplar.set(exemplar);
        Ok(())
    }

    /// Returns the gauge's current value.
    pub fn get(&self) -> f64 {
        self.inner.value.get()
    }
}

impl TypedMetric for Gauge {
    const TYPE: MetricType = MetricType::Gauge;
}

impl Cell for Gauge {
    fn collect_data(&self) -> MetricData {
        let exemplar = self.inner.exemplar.load();
        let value = self.get();
        MetricData::Gauge { value, exemplar: exemplar.map(|e| (*e).clone()) }
    }
}
