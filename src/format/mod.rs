//! Exposition formats.
//!
//! This module groups all metric exposition backends.
//!
//! ## Text format
//!
//! The [`text`] module exposes `encode(buffer, snapshots, profile)`, writing the two text
//! profiles [`profile::TextProfile`] defines:
//! - `OpenMetrics1` (default): [OpenMetrics text format]
//! - `Prometheus004`: [Prometheus text format]
//!
//! Binary Protobuf exposition is not covered by this crate.
//!
//! [OpenMetrics text format]: https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#text-format
//! [Prometheus text format]: https://prometheus.io/docs/instrumenting/exposition_formats/#text-format-details

pub mod profile;
pub mod text;
