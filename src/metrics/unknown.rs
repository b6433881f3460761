//! [Open Metrics Unknown](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#unknown) metric type.

use std::sync::Arc;

use crate::{
    raw::{atomic::AtomicF64, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ExemplarSlot},
    snapshot::{Cell, MetricData},
};

struct Inner {
    value: AtomicF64,
    exemplar: ExemplarSlot,
}

/// An untyped value, used only when a metric's type genuinely cannot be determined (e.g. when
/// bridging from a third-party system). **SHOULD NOT** be used otherwise.
#[derive(Clone)]
pub struct Unknown {
    inner: Arc<Inner>,
}

impl Default for Unknown {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Unknown {
    /// Creates an unknown-typed metric with an initial value.
    pub fn new(value: f64) -> Self {
        Self {
            inner: Arc::new(Inner { value: AtomicF64::new(value), exemplar: ExemplarSlot::new() }),
        }
    }

    /// Sets the value, discarding the previous one.
    pub fn set(&self, value: f64) {
        self.inner.value.set(value);
    }

    /// Sets the value and runs the exemplar sampler's CAS loop.
    pub fn set_with_sampling(&self, value: f64, sampler: &dyn ExemplarSampler) {
        self.set(value);
        self.inner.exemplar.try_sample(value, sampler);
    }

    /// Returns the current value.
    pub fn get(&self) -> f64 {
        self.inner.value.get()
    }
}

impl TypedMetric for Unknown {
    const TYPE: MetricType = MetricType::Unknown;
}

impl Cell for Unknown {
    fn collect_data(&self) -> MetricData {
        let exemplar = self.inner.exemplar.load();
        let value = self.get();
        MetricData::Unknown { value, exemplar: exemplar.map(|e| (*e).clone()) }
    }
}
