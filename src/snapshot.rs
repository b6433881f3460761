//! The immutable view produced by a collect pass (component F).
//!
//! A tagged sum over metric kinds, per the crate's design philosophy: each kind carries exactly
//! the fields its serialization clauses need, and a writer dispatches on the tag rather than
//! walking a class hierarchy.

use crate::{
    error::{Error, Result},
    raw::{exemplar::Exemplar, labels::Labels, metadata::Metadata, quantile::Quantile, MetricType},
};

/// One bucket's worth of histogram data, as observed at collection time.
#[derive(Clone, Debug)]
pub struct BucketValue {
    /// The bucket's upper (inclusive) bound; the last bucket is always `+Inf`.
    pub upper_bound: f64,
    /// The cumulative count of observations `<= upper_bound`.
    pub count: u64,
    /// A sampled exemplar for an observation that landed in this bucket, if any.
    pub exemplar: Option<Exemplar>,
}

/// Per-kind accumulated data for a single label combination.
#[derive(Clone, Debug)]
pub enum MetricData {
    /// A counter's total and optional creation time/exemplar.
    Counter { value: f64, created_millis: Option<i64>, exemplar: Option<Exemplar> },
    /// A gauge's current value and optional exemplar.
    Gauge { value: f64, exemplar: Option<Exemplar> },
    /// An untyped value and optional exemplar.
    Unknown { value: f64, exemplar: Option<Exemplar> },
    /// A classic histogram's buckets, sum, count, and creation time.
    Histogram {
        buckets: Vec<BucketValue>,
        sum: Option<f64>,
        count: Option<u64>,
        created_millis: Option<i64>,
    },
    /// A gauge histogram's buckets, gsum, gcount, and creation time.
    GaugeHistogram {
        buckets: Vec<BucketValue>,
        gsum: Option<f64>,
        gcount: Option<u64>,
        created_millis: Option<i64>,
    },
    /// A summary's quantiles, sum, count, creation time, and an optional shared exemplar.
    Summary {
        quantiles: Vec<Quantile>,
        sum: Option<f64>,
        count: Option<u64>,
        created_millis: Option<i64>,
        exemplar: Option<Exemplar>,
    },
    /// An info metric: no numeric payload, always serialized with value `1`.
    Info,
    /// A state set's states, in the order they were added.
    StateSet { states: Vec<(String, bool)> },
}

impl MetricData {
    /// Returns `true` if this data record would produce zero sample lines (e.g. a summary with
    /// no count, no sum, and no quantiles).
    pub fn is_empty(&self) -> bool {
        match self {
            MetricData::Summary { quantiles, sum, count, .. } => {
                quantiles.is_empty() && sum.is_none() && count.is_none()
            },
            MetricData::Histogram { buckets, sum, count, .. } => {
                buckets.is_empty() && sum.is_none() && count.is_none()
            },
            _ => false,
        }
    }
}

/// A single per-label-combination row: the dynamic labels (not including the metric's constant
/// labels, which live on [`Metadata`]), the accumulated data, and an optional scrape timestamp.
#[derive(Clone, Debug)]
pub struct DataRecord {
    /// The dynamic label combination this record was observed under.
    pub labels: Labels,
    /// The accumulated data for this label combination.
    pub data: MetricData,
    /// When this record was scraped, in milliseconds since the Unix epoch. `None` unless a
    /// caller explicitly stamps it.
    pub scrape_timestamp_millis: Option<i64>,
}

impl DataRecord {
    /// Builds a data record with no scrape timestamp.
    pub fn new(labels: Labels, data: MetricData) -> Self {
        Self { labels, data, scrape_timestamp_millis: None }
    }

    /// Attaches a scrape timestamp to this record.
    pub fn with_scrape_timestamp(mut self, millis: i64) -> Self {
        self.scrape_timestamp_millis = Some(millis);
        self
    }
}

/// A metric family's metadata plus every data record collected for it, in caller (insertion)
/// order.
#[derive(Clone, Debug)]
pub struct MetricSnapshot {
    /// The family's metadata: name, help, unit, type, and constant labels.
    pub metadata: Metadata,
    /// Per-label-combination data records, in the order they were produced by the collector.
    /// Writers never reorder this list.
    pub records: Vec<DataRecord>,
}

impl MetricSnapshot {
    /// Builds a snapshot from metadata and records.
    pub fn new(metadata: Metadata, records: Vec<DataRecord>) -> Self {
        Self { metadata, records }
    }

    /// Returns the metric's declared type.
    pub fn metric_type(&self) -> MetricType {
        self.metadata.metric_type()
    }
}

/// An ordered collection of [`MetricSnapshot`]s, indexed by metric name; names are unique within
/// a set.
#[derive(Clone, Debug, Default)]
pub struct MetricSnapshots {
    snapshots: Vec<MetricSnapshot>,
}

impl MetricSnapshots {
    /// Builds a [`MetricSnapshots`] set from an ordered list of snapshots, rejecting duplicate
    /// names.
    pub fn of(snapshots: impl IntoIterator<Item = MetricSnapshot>) -> Result<Self> {
        let snapshots: Vec<_> = snapshots.into_iter().collect();
        for (i, a) in snapshots.iter().enumerate() {
            for b in &snapshots[i + 1..] {
                if a.metadata.name() == b.metadata.name() {
                    return Err(Error::invalid_name(format!(
                        "duplicate metric name {:?} in snapshot set",
                        a.metadata.name()
                    )));
                }
            }
        }
        Ok(Self { snapshots })
    }

    /// Iterates the snapshots in their original (registration) order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricSnapshot> {
        self.snapshots.iter()
    }

    /// Returns `true` if there are no metrics in this set.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the number of metrics in this set.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

/// Implemented by every concrete metric cell type (`Counter`, `Gauge`, `Histogram`, …): produces
/// this cell's [`MetricData`] for a collect pass.
///
/// This is the per-kind half of the tagged-sum design; [`Metric`] (the family/registry-facing
/// trait) is built on top of it.
pub trait Cell: Send + Sync {
    /// Produces this cell's accumulated data.
    fn collect_data(&self) -> MetricData;
}

/// Implemented by anything the registry can hold: a bare metric cell, or a [`Family`] of them.
///
/// [`Family`]: crate::metrics::family::Family
pub trait Metric: Send + Sync {
    /// The metric kind this value reports as.
    fn metric_type(&self) -> MetricType;

    /// Produces every data record this metric currently holds, in caller order.
    fn collect(&self) -> Vec<DataRecord>;
}

impl<C: Cell + crate::raw::TypedMetric> Metric for C {
    fn metric_type(&self) -> MetricType {
        <C as crate::raw::TypedMetric>::TYPE
    }

    fn collect(&self) -> Vec<DataRecord> {
        vec![DataRecord::new(Labels::empty(), self.collect_data())]
    }
}
