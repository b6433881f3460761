//! [Open Metrics Info](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#info) metric type.

use crate::{
    error::Result,
    raw::{
        labels::{reject_reserved_names, Labels},
        MetricType, TypedMetric,
    },
    snapshot::{DataRecord, Metric, MetricData},
    validate::RESERVED_LABEL_NAMES,
};

/// Static key-value information about the target that **SHOULD NOT** change during the
/// process's lifetime (e.g. build version, revision).
///
/// Always serializes with value `1`; the informational content is carried entirely in the
/// labels.
#[derive(Clone, Debug)]
pub struct Info {
    labels: Labels,
}

impl Info {
    /// Creates an info metric carrying the given labels.
    ///
    /// Returns [`Error::invalid_label`](crate::error::Error) if `labels` uses one of the
    /// crate's reserved label names (`le`, `quantile`, `state`).
    pub fn new(labels: Labels) -> Result<Self> {
        reject_reserved_names(&labels, RESERVED_LABEL_NAMES)?;
        Ok(Self { labels })
    }

    /// Returns the labels this info metric carries.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl TypedMetric for Info {
    const TYPE: MetricType = MetricType::Info;
}

impl Metric for Info {
    fn metric_type(&self) -> MetricType {
        MetricType::Info
    }

    fn collect(&self) -> Vec<DataRecord> {
        vec![DataRecord::new(self.labels.clone(), MetricData::Info)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_carries_labels() {
        let labels = Labels::from_pairs([("version", "1.2.3")]).unwrap();
        let info = Info::new(labels.clone()).unwrap();
        let records = Metric::collect(&info);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].labels, labels);
        assert!(matches!(records[0].data, MetricData::Info));
    }

    #[test]
    fn test_rejects_reserved_label() {
        let labels = Labels::from_pairs([("state", "on")]).unwrap();
        assert!(Info::new(labels).is_err());
    }
}
