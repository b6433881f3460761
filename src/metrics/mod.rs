//! Concrete metric cell types and the family container that groups them by label combination.
//!
//! This module provides the eight metric kinds specified by OpenMetrics:
//!
//! - [Counter]: monotonically increasing values (e.g., request count)
//! - [Gauge]: values that can go up and down (e.g., temperature)
//! - [Histogram]: statistical distribution of non-negative values over fixed buckets
//! - [GaugeHistogram]: like histogram, but over a quantity that can decrease
//! - [Summary]: count/sum plus pluggable quantile estimation
//! - [Info]: static key-value information about the target
//! - [StateSet]: a set of independent boolean states
//! - [Unknown]: an untyped value, used only when a metric's type genuinely cannot be determined
//!
//! [Family] groups any of the above into a collection keyed by label combination.
//!
//! [Counter]: self::counter::Counter
//! [Gauge]: self::gauge::Gauge
//! [Histogram]: self::histogram::Histogram
//! [GaugeHistogram]: self::gauge_histogram::GaugeHistogram
//! [Summary]: self::summary::Summary
//! [Info]: self::info::Info
//! [StateSet]: self::state_set::StateSet
//! [Unknown]: self::unknown::Unknown
//! [Family]: self::family::Family

pub mod counter;
pub mod family;
pub mod gauge;
pub mod gauge_histogram;
pub mod histogram;
pub(crate) mod histogram_core;
pub mod info;
pub mod state_set;
pub mod summary;
pub mod unknown;
