//! Text exposition format.
//!
//! [`encode`] writes a [`MetricSnapshots`] set produced by [`Registry::collect`](crate::registry::Registry::collect)
//! in either the legacy Prometheus text format or the OpenMetrics text format, selected by
//! [`TextProfile`].

mod config;
mod encoder;
mod names;
#[cfg(test)]
mod tests;

use std::fmt;

pub use super::profile::TextProfile;
use crate::{error::Result, snapshot::MetricSnapshots};

/// Encodes a collected snapshot set into `writer`, following `profile`'s exposition rules.
///
/// Metric families are written in the snapshot set's order (the order they were registered in).
/// A family with no non-empty data records is skipped entirely — no header, no samples.
///
/// # Examples
///
/// ```rust
/// use expomet::{
///     format::{text, profile::TextProfile},
///     metrics::counter::Counter,
///     registry::Registry,
/// };
///
/// # fn main() -> expomet::error::Result<()> {
/// let mut registry = Registry::builder().build()?;
/// let requests = Counter::new();
/// registry.register("http_requests", "Total number of HTTP requests", requests.clone())?;
/// requests.inc()?;
///
/// let snapshot = registry.collect()?;
/// let mut output = String::new();
/// text::encode(&mut output, &snapshot, TextProfile::default())?;
/// assert!(output.contains("http_requests_total 1"));
/// # Ok(())
/// # }
/// ```
pub fn encode(
    writer: &mut impl fmt::Write,
    snapshots: &MetricSnapshots,
    profile: TextProfile,
) -> Result<()> {
    for snapshot in snapshots.iter() {
        encoder::write_metric(writer, snapshot, profile)?;
    }
    if config::ProfileConfig::from(profile).emit_eof {
        writer.write_str("# EOF\n").map_err(crate::error::Error::from)?;
    }
    Ok(())
}
