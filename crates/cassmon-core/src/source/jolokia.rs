//! Jolokia JMX-over-HTTP attribute source.
//!
//! Talks to a Jolokia agent attached to the Cassandra JVM using the JSON
//! protocol: `read` requests fetch attribute values, `search` requests
//! expand object name patterns, `version` checks the agent is reachable.
//!
//! Error mapping:
//! - body-level `status != 200` (InstanceNotFound, AttributeNotFound,
//!   security exceptions, ...) → [`SourceError::Target`]
//! - request timeout → [`SourceError::Target`]
//! - connection refused / reset → [`SourceError::Transport`]
//! - non-2xx HTTP status or undecodable body → [`SourceError::Protocol`]

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::object_name::ObjectName;

use super::{AttributeResult, AttributeSource, RawValue, SourceError};

/// Connection settings for a Jolokia agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JolokiaConfig {
    pub hostname: String,
    pub port: u16,
    /// `http` or `https`.
    pub scheme: String,
    /// Agent context path, usually `/jolokia`.
    pub path: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for JolokiaConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 8778,
            scheme: "http".to_string(),
            path: "/jolokia".to_string(),
            username: None,
            password: None,
            timeout: Duration::from_millis(2000),
        }
    }
}

impl JolokiaConfig {
    /// Agent endpoint URL.
    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("{}://{}:{}{}", self.scheme, self.hostname, self.port, path)
    }

    /// Human-readable summary with secrets hidden, for logs.
    pub fn describe(&self) -> String {
        let user = self.username.as_deref().unwrap_or("");
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => "<HIDDEN>",
            _ => "",
        };
        format!(
            "url={}, username={}, password={}, timeout={}ms",
            self.url(),
            user,
            password,
            self.timeout.as_millis()
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JolokiaRequest<'a> {
    Read {
        mbean: &'a str,
        attribute: &'a [String],
    },
    Search {
        mbean: &'a str,
    },
    Version,
}

#[derive(Debug, Deserialize)]
struct JolokiaResponse {
    status: u16,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
}

impl JolokiaResponse {
    fn error_message(&self) -> String {
        match (&self.error_type, &self.error) {
            (_, Some(error)) => error.clone(),
            (Some(error_type), None) => error_type.clone(),
            (None, None) => format!("status {}", self.status),
        }
    }

    fn is_attribute_not_found(&self) -> bool {
        self.error_type
            .as_deref()
            .is_some_and(|t| t.contains("AttributeNotFoundException"))
    }
}

/// Blocking Jolokia client implementing [`AttributeSource`].
pub struct JolokiaSource {
    client: Client,
    config: JolokiaConfig,
    url: String,
}

impl JolokiaSource {
    /// Builds the HTTP client. Does not contact the agent.
    pub fn new(config: JolokiaConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Transport(format!("cannot build HTTP client: {}", e)))?;
        let url = config.url();
        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// Asks the agent for its version, verifying it is reachable.
    pub fn agent_version(&mut self) -> Result<String, SourceError> {
        let response = self.send(&JolokiaRequest::Version)?;
        if response.status != 200 {
            return Err(SourceError::Target(response.error_message()));
        }
        Ok(response
            .value
            .get("agent")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }

    fn send(&self, request: &JolokiaRequest<'_>) -> Result<JolokiaResponse, SourceError> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(user) = &self.config.username {
            builder = builder.basic_auth(user, self.config.password.as_ref());
        }

        let response = builder.send().map_err(classify_http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Protocol(format!(
                "unexpected HTTP status {} from {}",
                status, self.url
            )));
        }

        response
            .json::<JolokiaResponse>()
            .map_err(|e| SourceError::Protocol(format!("invalid response body: {}", e)))
    }

    /// Reads attributes one by one to isolate the ones the bean lacks.
    fn read_individually(
        &self,
        resource: &str,
        attributes: &[String],
    ) -> Result<Vec<AttributeResult>, SourceError> {
        let mut results = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let single = std::slice::from_ref(attribute);
            let response = self.send(&JolokiaRequest::Read {
                mbean: resource,
                attribute: single,
            })?;
            if response.status == 200 {
                results.extend(decode_read(resource, single, &response.value)?);
            } else {
                results.push(AttributeResult::error(
                    resource,
                    attribute,
                    response.error_message(),
                ));
            }
        }
        Ok(results)
    }
}

impl AttributeSource for JolokiaSource {
    fn query_attributes(
        &mut self,
        resource: &str,
        attributes: &[String],
    ) -> Result<Vec<AttributeResult>, SourceError> {
        let response = self.send(&JolokiaRequest::Read {
            mbean: resource,
            attribute: attributes,
        })?;

        if response.status == 200 {
            return decode_read(resource, attributes, &response.value);
        }

        if attributes.len() > 1 && response.is_attribute_not_found() {
            debug!(mbean = resource, "bulk read failed, retrying attributes one by one");
            return self.read_individually(resource, attributes);
        }

        Err(SourceError::Target(response.error_message()))
    }

    fn enumerate_resources(&mut self, pattern: &str) -> Result<Vec<String>, SourceError> {
        let response = self.send(&JolokiaRequest::Search { mbean: pattern })?;
        if response.status != 200 {
            return Err(SourceError::Target(response.error_message()));
        }
        decode_search(&response.value)
    }

    /// Pings the agent. Only a transport failure counts as gone; an agent
    /// that answers with an error is still there.
    fn is_alive(&mut self) -> bool {
        match self.agent_version() {
            Ok(_) => true,
            Err(SourceError::Transport(e)) => {
                warn!(url = %self.url, error = %e, "Jolokia agent unreachable");
                false
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "agent version check failed");
                true
            }
        }
    }
}

fn classify_http_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Target(format!("request timed out: {}", e))
    } else if e.is_decode() {
        SourceError::Protocol(e.to_string())
    } else {
        SourceError::Transport(e.to_string())
    }
}

/// Decodes the `value` of a successful read response.
///
/// Reads on a concrete bean return `{attr: value}`; reads on a pattern
/// return `{object name: {attr: value}}`.
fn decode_read(
    resource: &str,
    attributes: &[String],
    value: &Value,
) -> Result<Vec<AttributeResult>, SourceError> {
    let Some(map) = value.as_object() else {
        return Err(SourceError::Protocol(format!(
            "read response for {} is not an object",
            resource
        )));
    };

    let is_pattern = ObjectName::parse(resource)
        .map(|n| n.is_pattern())
        .unwrap_or(false);

    if !is_pattern {
        return Ok(decode_bean_values(resource, attributes, map));
    }

    let mut results = Vec::new();
    for (object_name, bean_values) in map {
        match bean_values.as_object() {
            Some(values) => results.extend(decode_bean_values(object_name, attributes, values)),
            None => {
                return Err(SourceError::Protocol(format!(
                    "pattern read entry for {} is not an object",
                    object_name
                )));
            }
        }
    }
    Ok(results)
}

fn decode_bean_values(
    object_name: &str,
    attributes: &[String],
    values: &serde_json::Map<String, Value>,
) -> Vec<AttributeResult> {
    attributes
        .iter()
        .map(|attribute| match values.get(attribute) {
            None => AttributeResult::error(object_name, attribute, "attribute missing in response"),
            Some(v) => match to_raw_value(v) {
                Some(raw) => AttributeResult::ok(object_name, attribute, raw),
                None => AttributeResult::error(
                    object_name,
                    attribute,
                    format!("unsupported value type: {}", v),
                ),
            },
        })
        .collect()
}

fn to_raw_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::Null => Some(RawValue::Absent),
        Value::Bool(b) => Some(RawValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(RawValue::Number),
        Value::String(s) => Some(RawValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn decode_search(value: &Value) -> Result<Vec<String>, SourceError> {
    let Some(names) = value.as_array() else {
        return Err(SourceError::Protocol(
            "search response is not an array".to_string(),
        ));
    };
    Ok(names
        .iter()
        .filter_map(|n| n.as_str().map(str::to_string))
        .collect())
}
