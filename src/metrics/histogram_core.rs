//! Shared bucket-accumulation core for [`Histogram`](crate::metrics::histogram::Histogram) and
//! [`GaugeHistogram`](crate::metrics::gauge_histogram::GaugeHistogram).
//!
//! Exists to keep the two metric types' externally visible semantics (cumulative buckets, a
//! `sum` adder, per-bucket exemplars) backed by one accumulation implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    error::{Error, Result},
    raw::{atomic::DoubleAdder, bucket::Bucket},
    sampler::{ExemplarSampler, ExemplarSlot},
    snapshot::BucketValue,
};

/// Controls which bucket bounds and observed values this core accepts.
#[derive(Clone, Copy, Debug)]
pub enum BoundsFilter {
    /// Negative bucket bounds and negative observations are permitted (gauge histograms: the
    /// underlying gauge can decrease).
    AllowNegative,
    /// Negative bucket bounds are silently dropped at construction; negative observations are
    /// rejected with [`Error::invalid_amount`] (classic histograms: observations come from a
    /// non-negative counter-like process).
    RejectNegative,
}

struct BucketCell {
    upper_bound: f64,
    count: AtomicU64,
    exemplar: ExemplarSlot,
}

impl BucketCell {
    fn new(upper_bound: f64) -> Self {
        Self { upper_bound, count: AtomicU64::new(0), exemplar: ExemplarSlot::new() }
    }
}

/// Bucket storage plus `(count, sum)` accumulators shared by the two histogram-like metric
/// kinds.
///
/// Per-bucket counts are stored non-cumulatively (one atomic increment per observation); the
/// cumulative view the formats require is produced on demand by [`HistogramCore::snapshot`].
pub struct HistogramCore {
    buckets: Vec<BucketCell>,
    count: AtomicU64,
    sum: DoubleAdder,
    filter: BoundsFilter,
}

impl HistogramCore {
    /// Builds a core from caller-supplied bucket bounds, filtering and normalizing them per
    /// `filter`: NaN bounds are always dropped, bounds are sorted ascending with duplicates
    /// removed, and a `+Inf` bound is appended if not already present.
    pub fn from_bounds(bounds: impl IntoIterator<Item = f64>, filter: BoundsFilter) -> Self {
        let mut upper_bounds = bounds
            .into_iter()
            .filter(|b| {
                if b.is_nan() {
                    return false;
                }
                match filter {
                    BoundsFilter::AllowNegative => true,
                    BoundsFilter::RejectNegative => b.is_sign_positive() || *b == 0.0,
                }
            })
            .collect::<Vec<_>>();

        upper_bounds.sort_by(|a, b| a.partial_cmp(b).expect("NaN already filtered out"));
        upper_bounds.dedup();

        match upper_bounds.last() {
            Some(last) if last.is_finite() => upper_bounds.push(f64::INFINITY),
            None => upper_bounds.push(f64::INFINITY),
            _ => {},
        }

        let buckets = upper_bounds.into_iter().map(BucketCell::new).collect();
        Self { buckets, count: AtomicU64::new(0), sum: DoubleAdder::new(), filter }
    }

    /// Records an observation: locates the smallest-upper-bound bucket `>= value` (NaN is routed
    /// to the final, `+Inf` bucket), increments its count and the total count, and — unless the
    /// value is NaN, which would poison an accumulated sum — adds it to `sum`.
    ///
    /// Rejects negative values under [`BoundsFilter::RejectNegative`] without any mutation.
    pub fn observe(&self, value: f64, sampler: &dyn ExemplarSampler) -> Result<()> {
        if matches!(self.filter, BoundsFilter::RejectNegative) && value.is_sign_negative() {
            return Err(Error::invalid_amount(format!(
                "histogram observation {value} must not be negative"
            )));
        }

        let idx = self.bucket_index(value);
        self.buckets[idx].count.fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        if !value.is_nan() {
            self.sum.add(value);
        }
        self.buckets[idx].exemplar.try_sample(value, sampler);
        Ok(())
    }

    /// Records an observation with an explicit, caller-supplied exemplar, bypassing the sampler.
    pub fn observe_with_exemplar(
        &self,
        value: f64,
        exemplar: crate::raw::exemplar::Exemplar,
    ) -> Result<()> {
        if matches!(self.filter, BoundsFilter::RejectNegative) && value.is_sign_negative() {
            return Err(Error::invalid_amount(format!(
                "histogram observation {value} must not be negative"
            )));
        }

        let idx = self.bucket_index(value);
        self.buckets[idx].count.fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        if !value.is_nan() {
            self.sum.add(value);
        }
        self.buckets[idx].exemplar.set(exemplar);
        Ok(())
    }

    fn bucket_index(&self, value: f64) -> usize {
        if value.is_nan() {
            return self.buckets.len() - 1;
        }
        self.buckets.partition_point(|bucket| bucket.upper_bound < value)
    }

    /// Returns the total observation count.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns the accumulated sum of observed values.
    pub fn sum(&self) -> f64 {
        self.sum.get()
    }

    /// Takes a cumulative snapshot: exemplars are loaded before counts, per the crate's
    /// read-ordering rule (never expose an exemplar ahead of the count it belongs to).
    pub fn snapshot(&self) -> Vec<BucketValue> {
        let raw: Vec<(f64, u64, Option<crate::raw::exemplar::Exemplar>)> = self
            .buckets
            .iter()
            .map(|b| {
                let exemplar = b.exemplar.load();
                let count = b.count.load(Ordering::Relaxed);
                (b.upper_bound, count, exemplar.map(|e| (*e).clone()))
            })
            .collect();

        let mut running = 0u64;
        raw.into_iter()
            .map(|(upper_bound, count, exemplar)| {
                running += count;
                BucketValue { upper_bound, count: running, exemplar }
            })
            .collect()
    }

    /// Returns the raw bucket bounds, in ascending order (including the trailing `+Inf`).
    pub fn bounds(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.upper_bound).collect()
    }
}

impl From<&BucketValue> for Bucket {
    fn from(value: &BucketValue) -> Self {
        Bucket::new(value.upper_bound, value.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ThresholdExemplarSampler;

    #[test]
    fn test_buckets_are_cumulative_in_snapshot() {
        let core = HistogramCore::from_bounds([1.0, 2.0, 5.0], BoundsFilter::RejectNegative);
        let sampler = ThresholdExemplarSampler::default();
        core.observe(0.5, &sampler).unwrap();
        core.observe(1.5, &sampler).unwrap();
        core.observe(3.0, &sampler).unwrap();
        core.observe(20.0, &sampler).unwrap();

        let snapshot = core.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].count, 1); // <=1.0
        assert_eq!(snapshot[1].count, 2); // <=2.0
        assert_eq!(snapshot[2].count, 3); // <=5.0
        assert_eq!(snapshot[3].count, 4); // +Inf
        assert_eq!(core.count(), 4);
        assert_eq!(core.sum(), 25.0);
    }

    #[test]
    fn test_rejects_negative_when_configured() {
        let core = HistogramCore::from_bounds([1.0], BoundsFilter::RejectNegative);
        let sampler = ThresholdExemplarSampler::default();
        assert!(core.observe(-1.0, &sampler).is_err());
        assert_eq!(core.count(), 0);
    }

    #[test]
    fn test_allows_negative_when_configured() {
        let core = HistogramCore::from_bounds([-5.0, 5.0], BoundsFilter::AllowNegative);
        let sampler = ThresholdExemplarSampler::default();
        assert!(core.observe(-1.0, &sampler).is_ok());
        assert_eq!(core.count(), 1);
    }

    #[test]
    fn test_nan_counted_in_inf_bucket_without_poisoning_sum() {
        let core = HistogramCore::from_bounds([1.0], BoundsFilter::RejectNegative);
        let sampler = ThresholdExemplarSampler::default();
        core.observe(0.5, &sampler).unwrap();
        core.observe(f64::NAN, &sampler).unwrap();

        let snapshot = core.snapshot();
        assert_eq!(snapshot.last().unwrap().count, 2);
        assert_eq!(core.count(), 2);
        assert_eq!(core.sum(), 0.5);
    }

    #[test]
    fn test_value_equal_to_bound_falls_in_that_bucket() {
        let core = HistogramCore::from_bounds([1.0, 2.0], BoundsFilter::RejectNegative);
        let sampler = ThresholdExemplarSampler::default();
        core.observe(1.0, &sampler).unwrap();
        let snapshot = core.snapshot();
        assert_eq!(snapshot[0].count, 1);
        assert_eq!(snapshot[1].count, 1);
    }

    #[test]
    fn test_plus_inf_bound_appended_when_missing() {
        let core = HistogramCore::from_bounds([1.0, 2.0], BoundsFilter::RejectNegative);
        assert_eq!(core.bounds(), vec![1.0, 2.0, f64::INFINITY]);
    }
}
