//! # expomet
//!
//! A client-side metrics instrumentation core: concurrent accumulation of counters, gauges,
//! histograms, summaries, state sets, info and unknown metrics, plus deterministic text
//! exposition in both the legacy Prometheus text format and OpenMetrics text format.
//!
//! ## What this crate covers
//!
//! - Lock-free, tearing-free accumulation under concurrent observers ([`metrics`])
//! - A lock-free exemplar sampling slot attached to counters, gauges and histogram buckets
//!   ([`sampler`])
//! - A name/label-interning registry facade with namespaces, subsystems, and constant labels
//!   ([`registry`])
//! - An immutable, ordered snapshot model produced by a collect pass ([`snapshot`])
//! - Byte-exact OpenMetrics and Prometheus text writers ([`format::text`])
//!
//! Out of scope: the HTTP scrape handler, process/runtime default collectors, the pushgateway
//! client, configuration file loading, and binary Protobuf exposition. These are external
//! collaborators that would consume this crate's [`registry::Registry`] and
//! [`format::text::encode`], not part of it.
//!
//! ## Example
//!
//! ```rust
//! use expomet::{
//!     metrics::{counter::Counter, family::Family},
//!     raw::labels::Labels,
//!     registry::Registry,
//!     format::{text, profile::TextProfile},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::builder()
//!     .with_namespace("myapp")
//!     .with_const_labels([("env", "prod")])
//!     .build()?;
//!
//! // Register a simple counter.
//! let requests = Counter::new();
//! registry.register("requests", "Total requests processed", requests.clone())?;
//! requests.inc()?;
//!
//! // Register a counter family keyed by label combination.
//! let http_requests = Family::<Counter>::default();
//! registry.register("http_requests", "Total HTTP requests", http_requests.clone())?;
//! let labels = Labels::from_pairs([("method", "GET"), ("status", "200")])?;
//! http_requests.with_or_new(&labels, |c| c.inc())??;
//!
//! // Export in OpenMetrics text format.
//! let snapshot = registry.collect()?;
//! let mut output = String::new();
//! text::encode(&mut output, &snapshot, TextProfile::OpenMetrics1)?;
//! assert!(output.contains(r#"myapp_http_requests_total{env="prod",method="GET",status="200"} 1"#));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod format;
pub mod metrics;
pub mod raw;
pub mod registry;
pub mod sampler;
pub mod snapshot;
pub mod validate;

mod util;
