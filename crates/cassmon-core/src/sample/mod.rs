//! Typed metric samples.
//!
//! A [`MetricSet`] is one sample of one event type (`CassandraSample`,
//! `CassandraColumnFamilySample`). Values are written through
//! [`SampleSink::set_typed_value`], which applies the semantics of the value
//! kind:
//!
//! - GAUGE: numeric, text is parsed, booleans become 1/0
//! - ATTRIBUTE: text, booleans become `"true"`/`"false"`
//! - RATE / DELTA: numeric difference against the previous observation kept
//!   in the shared [`MetricStore`]
//!
//! Values keep the position of their first write; a later write of the same
//! name replaces the value in place.

pub mod store;

pub use store::{MetricStore, SharedStore};

use std::fmt;

use chrono::Utc;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::catalog::ValueKind;
use crate::source::RawValue;

/// Error type for typed value writes.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// Numeric kind given a value that is not a number.
    NonNumeric { name: String, value: String },
    /// Attribute kind given a number.
    NonString { name: String, value: f64 },
    /// Counter went backwards; the new value is stored as baseline.
    NegativeDifference {
        name: String,
        previous: f64,
        current: f64,
    },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::NonNumeric { name, value } => {
                write!(f, "metric {}: non-numeric value '{}'", name, value)
            }
            SampleError::NonString { name, value } => {
                write!(f, "attribute {}: expected a string, got {}", name, value)
            }
            SampleError::NegativeDifference {
                name,
                previous,
                current,
            } => write!(
                f,
                "metric {}: counter decreased from {} to {}, baseline reset",
                name, previous, current
            ),
        }
    }
}

impl std::error::Error for SampleError {}

/// Receiver of typed values.
pub trait SampleSink {
    fn set_typed_value(
        &mut self,
        name: &str,
        value: &RawValue,
        kind: ValueKind,
    ) -> Result<(), SampleError>;
}

/// Creates samples for a collection cycle.
pub trait SampleFactory {
    type Sample: SampleSink;

    /// New empty sample. `identity` distinguishes samples of the same event
    /// type when previous observations are looked up.
    fn new_sample(&mut self, event_type: &str, identity: &[(&str, &str)]) -> Self::Sample;
}

/// Value stored in a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Number(n) => serializer.serialize_f64(*n),
            MetricValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One typed sample.
#[derive(Debug, Clone)]
pub struct MetricSet {
    event_type: String,
    attributes: Vec<(String, String)>,
    metrics: Vec<(String, MetricValue)>,
    namespace: String,
    store: SharedStore,
}

impl MetricSet {
    /// New sample carrying fixed `attributes` (port, hostname).
    pub fn new(
        event_type: &str,
        attributes: Vec<(String, String)>,
        identity: &[(&str, &str)],
        store: SharedStore,
    ) -> Self {
        let mut parts: Vec<String> = attributes
            .iter()
            .map(|(k, v)| format!("{}=={}", k, v))
            .chain(identity.iter().map(|(k, v)| format!("{}=={}", k, v)))
            .collect();
        parts.sort();
        let namespace = if parts.is_empty() {
            event_type.to_string()
        } else {
            format!("{}::{}", event_type, parts.join("::"))
        };

        Self {
            event_type: event_type.to_string(),
            attributes,
            metrics: Vec::new(),
            namespace,
            store,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn metrics(&self) -> &[(String, MetricValue)] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Key under which previous observations of `name` are stored.
    pub fn store_key(&self, name: &str) -> String {
        format!("{}::{}", self.namespace, name)
    }

    /// Writes a value observed at unix time `now`.
    pub fn set_typed_value_at(
        &mut self,
        name: &str,
        value: &RawValue,
        kind: ValueKind,
        now: i64,
    ) -> Result<(), SampleError> {
        let stored = match kind {
            ValueKind::Gauge => MetricValue::Number(numeric(name, value)?),
            ValueKind::Attribute => MetricValue::Text(text(name, value)?),
            ValueKind::Rate | ValueKind::Delta => {
                let current = numeric(name, value)?;
                MetricValue::Number(self.difference(name, current, kind, now)?)
            }
        };
        self.put(name, stored);
        Ok(())
    }

    fn difference(
        &self,
        name: &str,
        current: f64,
        kind: ValueKind,
        now: i64,
    ) -> Result<f64, SampleError> {
        let key = self.store_key(name);
        let mut store = store::lock(&self.store);
        let previous = store.get(&key);
        store.set(&key, current, now);

        let Some(previous) = previous else {
            return Ok(0.0);
        };
        let delta = current - previous.value;
        if delta < 0.0 {
            return Err(SampleError::NegativeDifference {
                name: name.to_string(),
                previous: previous.value,
                current,
            });
        }
        if kind == ValueKind::Delta {
            return Ok(delta);
        }

        let elapsed = now - previous.timestamp;
        if elapsed <= 0 {
            return Ok(0.0);
        }
        Ok(delta / elapsed as f64)
    }

    fn put(&mut self, name: &str, value: MetricValue) {
        match self.metrics.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.metrics.push((name.to_string(), value)),
        }
    }
}

impl SampleSink for MetricSet {
    fn set_typed_value(
        &mut self,
        name: &str,
        value: &RawValue,
        kind: ValueKind,
    ) -> Result<(), SampleError> {
        self.set_typed_value_at(name, value, kind, Utc::now().timestamp())
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("event_type", &self.event_type)?;
        for (k, v) in &self.attributes {
            map.serialize_entry(k, v)?;
        }
        for (k, v) in &self.metrics {
            if self.attributes.iter().any(|(a, _)| a == k) || k == "event_type" {
                continue;
            }
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn numeric(name: &str, value: &RawValue) -> Result<f64, SampleError> {
    value.as_f64().ok_or_else(|| SampleError::NonNumeric {
        name: name.to_string(),
        value: describe(value),
    })
}

fn text(name: &str, value: &RawValue) -> Result<String, SampleError> {
    match value {
        RawValue::Text(s) => Ok(s.clone()),
        RawValue::Bool(b) => Ok(b.to_string()),
        RawValue::Number(n) => Err(SampleError::NonString {
            name: name.to_string(),
            value: *n,
        }),
        RawValue::Absent => Err(SampleError::NonNumeric {
            name: name.to_string(),
            value: describe(value),
        }),
    }
}

fn describe(value: &RawValue) -> String {
    match value {
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => s.clone(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Absent => "null".to_string(),
    }
}

/// Builds [`MetricSet`]s sharing one store and one set of fixed attributes.
#[derive(Debug, Clone)]
pub struct MetricSetFactory {
    store: SharedStore,
    attributes: Vec<(String, String)>,
}

impl MetricSetFactory {
    pub fn new(store: SharedStore, attributes: Vec<(String, String)>) -> Self {
        Self { store, attributes }
    }

    /// Fixed attributes: `port`, plus `hostname` for remote entities.
    pub fn node_attributes(hostname: &str, port: u16, remote: bool) -> Vec<(String, String)> {
        let mut attributes = Vec::new();
        if remote {
            attributes.push(("hostname".to_string(), hostname.to_string()));
        }
        attributes.push(("port".to_string(), port.to_string()));
        attributes
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

impl SampleFactory for MetricSetFactory {
    type Sample = MetricSet;

    fn new_sample(&mut self, event_type: &str, identity: &[(&str, &str)]) -> MetricSet {
        MetricSet::new(
            event_type,
            self.attributes.clone(),
            identity,
            self.store.clone(),
        )
    }
}
