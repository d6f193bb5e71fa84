//! Integration payload written to stdout for the host agent.
//!
//! ```json
//! {"name":"com.newrelic.cassandra","protocol_version":"3","integration_version":"0.1.0",
//!  "data":[{"metrics":[...],"inventory":{...},"events":[]}]}
//! ```
//!
//! The local entity carries no `entity` object. A remote entity is
//! identified by the monitored hostname with type `node`.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::inventory::Inventory;
use crate::sample::store::{self, SharedStore, StoreError};
use crate::sample::{MetricSet, MetricSetFactory};

/// Integration name reported to the host agent.
pub const INTEGRATION_NAME: &str = "com.newrelic.cassandra";

/// Entity type of remotely monitored nodes.
pub const REMOTE_ENTITY_TYPE: &str = "node";

const PROTOCOL_VERSION: &str = "3";

/// Error type for publishing.
#[derive(Debug)]
pub enum PublishError {
    Json(serde_json::Error),
    Io(std::io::Error),
    Store(StoreError),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Json(e) => write!(f, "failed to serialize payload: {}", e),
            PublishError::Io(e) => write!(f, "failed to write payload: {}", e),
            PublishError::Store(e) => write!(f, "failed to save metric store: {}", e),
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Json(e) => Some(e),
            PublishError::Io(e) => Some(e),
            PublishError::Store(e) => Some(e),
        }
    }
}

/// Identity of a remote entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityId {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id_attributes: Vec<IdAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdAttribute {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize)]
struct EntityData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<&'a EntityId>,
    metrics: &'a [MetricSet],
    inventory: &'a Inventory,
    events: &'a [serde_json::Value],
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    name: &'a str,
    protocol_version: &'a str,
    integration_version: &'a str,
    data: [EntityData<'a>; 1],
}

/// Collected data of the monitored node, published as one payload.
#[derive(Debug)]
pub struct Integration {
    name: String,
    version: String,
    entity: Option<EntityId>,
    metrics: Vec<MetricSet>,
    inventory: Inventory,
    store: SharedStore,
    hostname: String,
    port: u16,
}

impl Integration {
    /// Integration for the node at `hostname:port`.
    ///
    /// With `remote` the data is attached to a `node` entity named after the
    /// host; otherwise it belongs to the agent's local entity.
    pub fn new(version: &str, hostname: &str, port: u16, remote: bool, store: SharedStore) -> Self {
        let entity = remote.then(|| EntityId {
            name: hostname.to_string(),
            entity_type: REMOTE_ENTITY_TYPE.to_string(),
            id_attributes: Vec::new(),
        });
        Self {
            name: INTEGRATION_NAME.to_string(),
            version: version.to_string(),
            entity,
            metrics: Vec::new(),
            inventory: Inventory::new(),
            store,
            hostname: hostname.to_string(),
            port,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.entity.is_some()
    }

    /// Factory for metric sets of this integration's entity.
    pub fn metric_set_factory(&self) -> MetricSetFactory {
        MetricSetFactory::new(
            self.store.clone(),
            MetricSetFactory::node_attributes(&self.hostname, self.port, self.is_remote()),
        )
    }

    pub fn add_metric_sets(&mut self, sets: impl IntoIterator<Item = MetricSet>) {
        self.metrics.extend(sets);
    }

    pub fn metric_sets(&self) -> &[MetricSet] {
        &self.metrics
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Drops collected data without publishing it. The metric store keeps
    /// its baselines.
    pub fn discard(&mut self) {
        self.metrics.clear();
        self.inventory.clear();
    }

    /// Serializes the payload without publishing it.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        let payload = Payload {
            name: &self.name,
            protocol_version: PROTOCOL_VERSION,
            integration_version: &self.version,
            data: [EntityData {
                entity: self.entity.as_ref(),
                metrics: &self.metrics,
                inventory: &self.inventory,
                events: &[],
            }],
        };
        if pretty {
            serde_json::to_string_pretty(&payload)
        } else {
            serde_json::to_string(&payload)
        }
    }

    /// Writes the payload as one line, then clears the collected data and
    /// saves the metric store.
    pub fn publish<W: Write + ?Sized>(&mut self, out: &mut W, pretty: bool) -> Result<(), PublishError> {
        let json = self.to_json(pretty).map_err(PublishError::Json)?;
        writeln!(out, "{}", json).map_err(PublishError::Io)?;
        out.flush().map_err(PublishError::Io)?;
        debug!(
            metric_sets = self.metrics.len(),
            inventory_items = self.inventory.len(),
            "payload published"
        );

        self.discard();
        store::lock(&self.store).save().map_err(PublishError::Store)
    }
}
