//! [Open Metrics Counter](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#counter) metric type.

use std::sync::Arc;

use crate::{
    error::{Error, Result},
    raw::{atomic::DoubleAdder, exemplar::Exemplar, MetricType, TypedMetric},
    sampler::{ExemplarSampler, ExemplarSlot},
    snapshot::{Cell, MetricData},
    util::now_millis,
};

struct Inner {
    total: DoubleAdder,
    created_millis: i64,
    exemplar: ExemplarSlot,
}

/// A monotonically non-decreasing counter, used to measure discrete events.
///
/// # Example
///
/// ```rust
/// # use expomet::metrics::counter::Counter;
/// let counter = Counter::new();
/// counter.inc().unwrap();
/// counter.inc_by(5.0).unwrap();
/// assert_eq!(counter.total(), 6.0);
/// ```
#[derive(Clone)]
pub struct Counter {
    inner: Arc<Inner>,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter {
    /// Creates a counter starting at zero, stamped with the current time as its creation time.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                total: DoubleAdder::new(),
                created_millis: now_millis(),
                exemplar: ExemplarSlot::new(),
            }),
        }
    }

    /// Increments the counter by 1.
    pub fn inc(&self) -> Result<()> {
        self.inc_by(1.0)
    }

    /// Increments the counter by `amount`, which must be non-negative and finite.
    pub fn inc_by(&self, amount: f64) -> Result<()> {
        if amount.is_nan() || amount.is_sign_negative() {
            return Err(Error::invalid_amount(format!(
                "counter increment {amount} must not be negative"
            )));
        }
        self.inner.total.add(amount);
        Ok(())
    }

    /// Increments the counter by `amount` and runs the exemplar sampler's CAS loop.
    pub fn inc_with_sampling(&self, amount: f64, sampler: &dyn ExemplarSampler) -> Result<()> {
        self.inc_by(amount)?;
        self.inner.exemplar.try_sample(amount, sampler);
        Ok(())
    }

    /// Increments the counter by `amount` and unconditionally installs `exemplar`, bypassing the
    /// sampler.
    pub fn inc_with_exemplar(&self, amount: f64, exemplar: Exemplar) -> Result<()> {
        self.inc_by(amount)?;
        self.inner.exemplar.set(exemplar);
        Ok(())
    }

    /// Returns the current total.
    pub fn total(&self) -> f64 {
        self.inner.total.get()
    }

    /// Returns the creation time, in milliseconds since the Unix epoch.
    pub fn created_millis(&self) -> i64 {
        self.inner.created_millis
    }
}

impl TypedMetric for Counter {
    const TYPE: MetricType = MetricType::Counter;
}

impl Cell for Counter {
    fn collect_data(&self) -> MetricData {
        // Exemplar first, then the value: never expose an exemplar describing an observation
        // the count doesn't yet reflect.
        let exemplar = self.inner.exemplar.load();
        let value = self.total();
        MetricData::Counter {
            value,
            created_millis: Some(self.inner.created_millis),
            exemplar: exemplar.map(|e| (*e).clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{raw::labels::Labels, snapshot::Metric};

    #[test]
    fn test_inc_and_inc_by() {
        let counter = Counter::new();
        assert_eq!(counter.total(), 0.0);
        counter.inc().unwrap();
        assert_eq!(counter.total(), 1.0);
        counter.inc_by(5.0).unwrap();
        assert_eq!(counter.total(), 6.0);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let counter = Counter::new();
        assert!(counter.inc_by(-1.0).is_err());
        assert_eq!(counter.total(), 0.0);
    }

    #[test]
    fn test_rejects_nan_amount() {
        let counter = Counter::new();
        assert!(counter.inc_by(f64::NAN).is_err());
    }

    #[test]
    fn test_inc_with_exemplar_bypasses_sampler() {
        let counter = Counter::new();
        let labels = Labels::from_pairs([("trace", "abc")]).unwrap();
        let exemplar = Exemplar::new(3.0, labels, None, None, None).unwrap();
        counter.inc_with_exemplar(3.0, exemplar).unwrap();
        match counter.collect_data() {
            MetricData::Counter { exemplar, value, .. } => {
                assert_eq!(value, 3.0);
                assert!(exemplar.is_some());
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_collect_produces_single_unlabeled_record() {
        let counter = Counter::new();
        counter.inc_by(10.0).unwrap();
        let records = Metric::collect(&counter);
        assert_eq!(records.len(), 1);
        assert!(records[0].labels.is_empty());
    }

    #[test]
    fn test_thread_safe() {
        let counter = Counter::new();
        let clone = counter.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..1000 {
                clone.inc().unwrap();
            }
        });
        for _ in 0..1000 {
            counter.inc().unwrap();
        }
        handle.join().unwrap();
        assert_eq!(counter.total(), 2000.0);
    }
}
