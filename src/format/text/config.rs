//! Per-profile behavior flags.
//!
//! Table-drives the mapping from (metric kind, format) to suffix/header behavior instead of
//! scattering `if profile == ...` branches through the writer.

use crate::{format::profile::TextProfile, raw::MetricType};

#[derive(Clone, Copy)]
pub(super) struct ProfileConfig {
    pub(super) emit_unit: bool,
    pub(super) emit_eof: bool,
    pub(super) emit_exemplars: bool,
    pub(super) help_before_type: bool,
    pub(super) escape_help_quote: bool,
    pub(super) split_created_as_gauge: bool,
    pub(super) synthesize_histogram_count: bool,
}

impl From<TextProfile> for ProfileConfig {
    fn from(profile: TextProfile) -> Self {
        match profile {
            TextProfile::OpenMetrics1 => ProfileConfig {
                emit_unit: true,
                emit_eof: true,
                emit_exemplars: true,
                help_before_type: false,
                escape_help_quote: true,
                split_created_as_gauge: false,
                synthesize_histogram_count: false,
            },
            TextProfile::Prometheus004 => ProfileConfig {
                emit_unit: false,
                emit_eof: false,
                emit_exemplars: false,
                help_before_type: true,
                escape_help_quote: false,
                split_created_as_gauge: true,
                synthesize_histogram_count: true,
            },
        }
    }
}

/// The `# TYPE` keyword for a given metric kind under a given profile.
///
/// Most kinds use their own [`MetricType::as_str`]; the exceptions are kinds Prometheus has no
/// native representation for (`Unknown` → `untyped`, `Info`/`StateSet` → `gauge`) and
/// `GaugeHistogram`, which both profiles expose under the `histogram`/`gaugehistogram` keyword
/// their respective specifications define.
pub(super) fn type_keyword(ty: MetricType, profile: TextProfile) -> &'static str {
    match (ty, profile) {
        (MetricType::Unknown, TextProfile::Prometheus004) => "untyped",
        (MetricType::Info, TextProfile::Prometheus004) => "gauge",
        (MetricType::StateSet, TextProfile::Prometheus004) => "gauge",
        (MetricType::GaugeHistogram, TextProfile::Prometheus004) => "histogram",
        _ => ty.as_str(),
    }
}

/// The name used in `# TYPE`/`# HELP`/`# UNIT` header lines, as opposed to the (possibly
/// additionally suffixed) name used on sample lines.
pub(super) fn header_name(name: &str, ty: MetricType, profile: TextProfile) -> String {
    match (ty, profile) {
        (MetricType::Counter, TextProfile::Prometheus004) => format!("{name}_total"),
        (MetricType::Info, _) => format!("{name}_info"),
        _ => name.to_string(),
    }
}
