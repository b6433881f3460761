//! Exemplars: single sampled observations attached to a metric cell for trace correlation.

use crate::{
    error::{Error, Result},
    raw::labels::Labels,
};

/// The combined length limit (in chars) that [OpenMetrics] places on an exemplar's label set.
///
/// [OpenMetrics]: https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#exemplars
pub const MAX_EXEMPLAR_LABELS_LEN: usize = 128;

/// A single observation sampled alongside a metric update, carried for trace correlation.
///
/// Immutable once built; [`Exemplar::new`] enforces the OpenMetrics size bound on the combined
/// label names and values.
#[derive(Clone, Debug, PartialEq)]
pub struct Exemplar {
    value: f64,
    labels: Labels,
    timestamp_millis: Option<i64>,
    trace_id: Option<String>,
    span_id: Option<String>,
}

impl Exemplar {
    /// Builds a new exemplar, validating the combined label length.
    pub fn new(
        value: f64,
        labels: Labels,
        timestamp_millis: Option<i64>,
        trace_id: Option<String>,
        span_id: Option<String>,
    ) -> Result<Self> {
        let mut len = labels.combined_char_len();
        if let Some(trace_id) = &trace_id {
            len += "trace_id".len() + trace_id.chars().count();
        }
        if let Some(span_id) = &span_id {
            len += "span_id".len() + span_id.chars().count();
        }
        if len > MAX_EXEMPLAR_LABELS_LEN {
            return Err(Error::invalid_label(format!(
                "exemplar label set is {len} chars, exceeding the {MAX_EXEMPLAR_LABELS_LEN}-char OpenMetrics bound"
            )));
        }
        Ok(Self { value, labels, timestamp_millis, trace_id, span_id })
    }

    /// The sampled value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The labels attached to the sampled observation.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// The time the observation was sampled, in milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp_millis
    }

    /// The W3C trace id associated with this exemplar, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// The W3C span id associated with this exemplar, if any.
    pub fn span_id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_within_bound() {
        let labels = Labels::from_pairs([("env", "prod")]).unwrap();
        assert!(Exemplar::new(1.0, labels, None, None, None).is_ok());
    }

    #[test]
    fn test_new_rejects_oversized_labels() {
        let value = "x".repeat(200);
        let labels = Labels::from_pairs([("big", value.as_str())]).unwrap();
        assert!(Exemplar::new(1.0, labels, None, None, None).is_err());
    }
}
