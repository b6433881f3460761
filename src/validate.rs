//! Name legality checks performed at registration time (component H).
//!
//! Label-name checks live alongside the [`Labels`](crate::raw::labels::Labels) type itself,
//! since they must also run whenever a new label combination is interned. This module covers
//! the metric-name rule, which is only ever checked once, at metric construction.

use crate::error::{Error, Result};

/// Label names reserved for a metric kind's own synthesized label; user code may never declare
/// them, on any metric.
pub const RESERVED_LABEL_NAMES: &[&str] = &["le", "quantile", "state"];

/// Validates a metric name against `[a-zA-Z_:][a-zA-Z0-9_:]*`.
///
/// Unlike label names, metric names may contain `:` (used by legacy Prometheus recording
/// rules) and are not subject to the `__`-reserved-prefix rule, which applies to labels only.
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {},
        _ => {
            return Err(Error::invalid_name(format!(
                "metric name {name:?} must match [a-zA-Z_:][a-zA-Z0-9_:]*"
            )))
        },
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
        return Err(Error::invalid_name(format!(
            "metric name {name:?} must match [a-zA-Z_:][a-zA-Z0-9_:]*"
        )));
    }
    Ok(())
}

/// Validates that a subsystem/namespace component is `snake_case` ASCII.
pub fn validate_namespace_component(name: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {},
        _ => {
            return Err(Error::invalid_name(format!(
                "namespace component {name:?} must be snake_case"
            )))
        },
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(Error::invalid_name(format!(
            "namespace component {name:?} must be snake_case"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_metric_name_accepts_colon() {
        assert!(validate_metric_name("job:requests:rate5m").is_ok());
    }

    #[test]
    fn test_validate_metric_name_rejects_dot() {
        assert!(validate_metric_name("my.metric").is_err());
    }

    #[test]
    fn test_validate_metric_name_rejects_leading_digit() {
        assert!(validate_metric_name("1metric").is_err());
    }

    #[test]
    fn test_validate_namespace_component() {
        assert!(validate_namespace_component("database").is_ok());
        assert!(validate_namespace_component("Database").is_err());
    }
}
