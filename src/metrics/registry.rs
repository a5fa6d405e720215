//! Metric families over a `prometheus::Registry`, addressed by name.

use std::collections::BTreeMap;

use prometheus::core::Collector;
use prometheus::proto::{Metric, MetricFamily};
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::Result;

/// Kind of a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

enum Family {
    Counter(IntCounterVec),
    Gauge(GaugeVec),
    Histogram(HistogramVec),
}

impl Family {
    fn kind(&self) -> MetricKind {
        match self {
            Family::Counter(_) => MetricKind::Counter,
            Family::Gauge(_) => MetricKind::Gauge,
            Family::Histogram(_) => MetricKind::Histogram,
        }
    }

    fn collect(&self) -> Vec<MetricFamily> {
        match self {
            Family::Counter(vec) => vec.collect(),
            Family::Gauge(vec) => vec.collect(),
            Family::Histogram(vec) => vec.collect(),
        }
    }
}

struct Entry {
    label_names: Vec<&'static str>,
    family: Family,
}

impl Entry {
    /// Check label names against the registered ones and return the values.
    fn values<'a>(&self, name: &str, labels: &[(&str, &'a str)]) -> Vec<&'a str> {
        let matches = labels.len() == self.label_names.len()
            && labels
                .iter()
                .zip(&self.label_names)
                .all(|((given, _), declared)| given == declared);
        if !matches {
            let given: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
            panic!(
                "metric {name}: expected labels {:?}, got {given:?}",
                self.label_names
            );
        }
        labels.iter().map(|(_, v)| *v).collect()
    }

    /// Collected child with exactly these labels, without creating it.
    fn find(&self, labels: &[(&str, &str)]) -> Option<Metric> {
        let families = self.family.collect();
        families
            .iter()
            .flat_map(|mf| mf.get_metric())
            .find(|m| has_labels(m, labels))
            .cloned()
    }
}

fn has_labels(metric: &Metric, labels: &[(&str, &str)]) -> bool {
    let pairs = metric.get_label();
    pairs.len() == labels.len()
        && labels.iter().all(|(name, value)| {
            pairs
                .iter()
                .any(|p| p.get_name() == *name && p.get_value() == *value)
        })
}

/// Process-wide set of named metric families.
///
/// Build it once at startup, register every family, then share it behind an
/// `Arc`. Families are `prometheus` vectors, so a label cell is created on
/// first write and every update is atomic.
pub struct MetricRegistry {
    registry: Registry,
    families: BTreeMap<&'static str, Entry>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            families: BTreeMap::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn register_counter(
        &mut self,
        name: &'static str,
        help: &'static str,
        label_names: &[&'static str],
    ) {
        let vec = IntCounterVec::new(Opts::new(name, help), label_names)
            .unwrap_or_else(|e| panic!("metric {name}: {e}"));
        self.register(name, label_names, Family::Counter(vec));
    }

    pub fn register_gauge(
        &mut self,
        name: &'static str,
        help: &'static str,
        label_names: &[&'static str],
    ) {
        let vec = GaugeVec::new(Opts::new(name, help), label_names)
            .unwrap_or_else(|e| panic!("metric {name}: {e}"));
        self.register(name, label_names, Family::Gauge(vec));
    }

    /// Register a histogram family with the given bucket upper bounds.
    ///
    /// Bounds must be finite and strictly ascending; the `+Inf` bucket is
    /// implicit.
    pub fn register_histogram(
        &mut self,
        name: &'static str,
        help: &'static str,
        label_names: &[&'static str],
        buckets: &[f64],
    ) {
        assert!(
            buckets.iter().all(|b| b.is_finite()) && buckets.windows(2).all(|w| w[0] < w[1]),
            "histogram {name}: buckets must be finite and strictly ascending"
        );
        let vec = HistogramVec::new(
            HistogramOpts::new(name, help).buckets(buckets.to_vec()),
            label_names,
        )
        .unwrap_or_else(|e| panic!("metric {name}: {e}"));
        self.register(name, label_names, Family::Histogram(vec));
    }

    fn register(&mut self, name: &'static str, label_names: &[&'static str], family: Family) {
        assert!(
            !self.families.contains_key(name),
            "metric {name} registered twice"
        );
        let collector: Box<dyn Collector> = match &family {
            Family::Counter(vec) => Box::new(vec.clone()),
            Family::Gauge(vec) => Box::new(vec.clone()),
            Family::Histogram(vec) => Box::new(vec.clone()),
        };
        self.registry
            .register(collector)
            .unwrap_or_else(|e| panic!("metric {name}: {e}"));
        self.families.insert(
            name,
            Entry {
                label_names: label_names.to_vec(),
                family,
            },
        );
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Add 1 to a counter cell.
    pub fn increment_counter(&self, name: &str, labels: &[(&str, &str)]) {
        self.increment_counter_by(name, labels, 1);
    }

    pub fn increment_counter_by(&self, name: &str, labels: &[(&str, &str)], n: u64) {
        let entry = self.entry(name, MetricKind::Counter);
        let values = entry.values(name, labels);
        let Family::Counter(vec) = &entry.family else {
            unreachable!("entry() checked the kind");
        };
        vec.with_label_values(&values).inc_by(n);
    }

    /// Overwrite a gauge cell.
    pub fn set_gauge(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        let entry = self.entry(name, MetricKind::Gauge);
        let values = entry.values(name, labels);
        let Family::Gauge(vec) = &entry.family else {
            unreachable!("entry() checked the kind");
        };
        vec.with_label_values(&values).set(value);
    }

    /// Record one observation into a histogram cell.
    pub fn observe_histogram(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        let entry = self.entry(name, MetricKind::Histogram);
        let values = entry.values(name, labels);
        let Family::Histogram(vec) = &entry.family else {
            unreachable!("entry() checked the kind");
        };
        vec.with_label_values(&values).observe(value);
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current value of a counter cell, `None` if never written.
    pub fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        self.find(name, MetricKind::Counter, labels)
            .map(|m| m.get_counter().get_value() as u64)
    }

    /// Current value of a gauge cell, `None` if never written.
    pub fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.find(name, MetricKind::Gauge, labels)
            .map(|m| m.get_gauge().get_value())
    }

    /// Copy of a histogram cell, `None` if never written.
    pub fn histogram_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        self.find(name, MetricKind::Histogram, labels).map(|m| {
            let h = m.get_histogram();
            HistogramSnapshot {
                bounds: h.get_bucket().iter().map(|b| b.get_upper_bound()).collect(),
                buckets: h
                    .get_bucket()
                    .iter()
                    .map(|b| b.get_cumulative_count())
                    .collect(),
                count: h.get_sample_count(),
                sum: h.get_sample_sum(),
            }
        })
    }

    /// Point-in-time copy of every family that has at least one cell.
    pub fn snapshot(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the current state in the text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.snapshot(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn entry(&self, name: &str, kind: MetricKind) -> &Entry {
        let Some(entry) = self.families.get(name) else {
            panic!("metric {name} is not registered");
        };
        let registered = entry.family.kind();
        assert!(
            registered == kind,
            "metric {name} is a {}, not a {}",
            registered.as_str(),
            kind.as_str()
        );
        entry
    }

    fn find(&self, name: &str, kind: MetricKind, labels: &[(&str, &str)]) -> Option<Metric> {
        let entry = self.entry(name, kind);
        let _ = entry.values(name, labels);
        entry.find(labels)
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of one histogram cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Bucket upper bounds, ascending.
    pub bounds: Vec<f64>,
    /// Cumulative observation count per bound.
    pub buckets: Vec<u64>,
    /// Total observations (the `+Inf` bucket).
    pub count: u64,
    pub sum: f64,
}

impl HistogramSnapshot {
    /// Cumulative count for the bucket with this upper bound.
    pub fn bucket(&self, bound: f64) -> Option<u64> {
        self.bounds
            .iter()
            .position(|b| *b == bound)
            .map(|i| self.buckets[i])
    }
}
