//! Attribute source abstraction.
//!
//! The collection pipeline never talks to the monitored JVM directly. It goes
//! through an [`AttributeSource`], which can be a live JMX bridge or a
//! scripted mock for tests.
//!
//! ```text
//!        ┌─────────────────────┐
//!        │   query executor    │
//!        └──────────┬──────────┘
//!                   │
//!          ┌────────▼────────┐
//!          │ AttributeSource │ (trait)
//!          └────────┬────────┘
//!           ┌───────┴────────┐
//!    ┌──────▼──────┐  ┌──────▼──────┐
//!    │JolokiaSource│  │ MockSource  │
//!    │ (HTTP/JSON) │  │ (Testing)   │
//!    └─────────────┘  └─────────────┘
//! ```

pub mod jolokia;
pub mod mock;

pub use jolokia::{JolokiaConfig, JolokiaSource};
pub use mock::{MockCall, MockSource};

/// Scalar value read from a JMX attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Attribute exists but holds no value (JMX `null`).
    Absent,
}

impl RawValue {
    /// Returns the numeric value, parsing text and mapping booleans to 1/0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

/// Per-attribute outcome inside a successful query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStatus {
    Ok,
    Error,
}

/// One attribute value returned by [`AttributeSource::query_attributes`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeResult {
    /// `<object name>,attr=<attribute>`.
    pub name: String,
    pub value: RawValue,
    pub status: AttributeStatus,
    pub status_message: String,
}

impl AttributeResult {
    /// Successful attribute read.
    pub fn ok(object_name: &str, attribute: &str, value: RawValue) -> Self {
        Self {
            name: attribute_key(object_name, attribute),
            value,
            status: AttributeStatus::Ok,
            status_message: String::new(),
        }
    }

    /// Attribute the bridge could not read.
    pub fn error(object_name: &str, attribute: &str, message: impl Into<String>) -> Self {
        Self {
            name: attribute_key(object_name, attribute),
            value: RawValue::Absent,
            status: AttributeStatus::Error,
            status_message: message.into(),
        }
    }
}

/// Builds the fully-qualified attribute name used as raw value key.
pub fn attribute_key(object_name: &str, attribute: &str) -> String {
    format!("{},attr={}", object_name, attribute)
}

/// Error type for attribute sources.
///
/// Only [`SourceError::Target`] is recoverable: the target does not expose
/// the bean or attribute, refused access to it, or did not answer in time.
/// Everything else means the bridge itself is unusable for this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// JMX-level error reported by the target (bean/attribute not found, ...).
    Target(String),
    /// Bridge unreachable or connection dropped.
    Transport(String),
    /// Bridge answered with something that is not a valid response.
    Protocol(String),
}

impl SourceError {
    /// Returns true for errors the collection cycle can skip over.
    pub fn is_target(&self) -> bool {
        matches!(self, SourceError::Target(_))
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Target(msg) => write!(f, "JMX error: {}", msg),
            SourceError::Transport(msg) => write!(f, "JMX bridge unreachable: {}", msg),
            SourceError::Protocol(msg) => write!(f, "JMX bridge protocol error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Access to the attribute model of the monitored process.
///
/// Implementations own the single connection to the target and are used
/// serially; a collection cycle never issues concurrent queries.
pub trait AttributeSource {
    /// Reads `attributes` from the bean (or bean pattern) `resource`.
    ///
    /// For patterns, results are returned for every matching bean, each named
    /// after the concrete object name.
    fn query_attributes(
        &mut self,
        resource: &str,
        attributes: &[String],
    ) -> Result<Vec<AttributeResult>, SourceError>;

    /// Lists concrete object names matching `pattern`.
    ///
    /// Cheaper than reading values, so limits can be applied beforehand.
    fn enumerate_resources(&mut self, pattern: &str) -> Result<Vec<String>, SourceError>;

    /// Returns false once the bridge is known to be gone for good.
    fn is_alive(&mut self) -> bool {
        true
    }
}

impl<S: AttributeSource + ?Sized> AttributeSource for &mut S {
    fn query_attributes(
        &mut self,
        resource: &str,
        attributes: &[String],
    ) -> Result<Vec<AttributeResult>, SourceError> {
        (**self).query_attributes(resource, attributes)
    }

    fn enumerate_resources(&mut self, pattern: &str) -> Result<Vec<String>, SourceError> {
        (**self).enumerate_resources(pattern)
    }

    fn is_alive(&mut self) -> bool {
        (**self).is_alive()
    }
}
