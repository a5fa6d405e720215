//! Process-wide metric registry with label-partitioned families.
//!
//! [`MetricRegistry`] owns every counter, gauge and histogram family, each a
//! `prometheus` vector registered in its own `prometheus::Registry`. Callers
//! never hold a cell; they name one by family and label pairs, and the cell
//! is created on first write:
//!
//! ```rust
//! use huginn::metrics::MetricRegistry;
//!
//! let mut registry = MetricRegistry::new();
//! registry.register_counter("requests_total", "Requests served", &["variant"]);
//!
//! registry.increment_counter("requests_total", &[("variant", "v2")]);
//! assert_eq!(registry.counter_value("requests_total", &[("variant", "v2")]), Some(1));
//!
//! let text = registry.render().unwrap();
//! assert!(text.contains("requests_total{variant=\"v2\"} 1"));
//! ```
//!
//! # Misuse
//!
//! Naming an unregistered family, using the wrong metric kind or passing
//! label names that differ from the registered ones is a programming error
//! and panics.

mod registry;

pub use registry::{HistogramSnapshot, MetricKind, MetricRegistry};

/// Content type of [`MetricRegistry::render`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;
