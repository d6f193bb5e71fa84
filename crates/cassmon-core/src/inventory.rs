//! Node inventory from the Cassandra configuration file.
//!
//! `cassandra.yaml` is flattened into `(key, field, value)` items: top-level
//! scalars become `(key, "value", v)`, top-level mappings become one item per
//! sub-key. Lists are not reported. Values of any key or field mentioning a
//! password are replaced.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use tracing::{debug, warn};

/// Replacement for secret values.
pub const OMITTED_VALUE: &str = "(omitted value)";

/// Error type for inventory loading.
#[derive(Debug)]
pub enum InventoryError {
    Io(String, std::io::Error),
    Yaml(String, serde_yaml::Error),
    /// File parsed but holds no top-level keys.
    Empty(String),
    /// Top level is not a mapping.
    NotAMapping(String),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::Io(path, e) => write!(f, "failed to read {}: {}", path, e),
            InventoryError::Yaml(path, e) => write!(f, "failed to parse {}: {}", path, e),
            InventoryError::Empty(path) => write!(
                f,
                "config path not correctly set, cannot fetch inventory data from {}",
                path
            ),
            InventoryError::NotAMapping(path) => {
                write!(f, "{} is not a YAML mapping", path)
            }
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Io(_, e) => Some(e),
            InventoryError::Yaml(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Inventory items of one entity: `key -> field -> value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, BTreeMap<String, JsonValue>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&mut self, key: &str, field: &str, value: JsonValue) {
        self.items
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value);
    }

    pub fn get(&self, key: &str, field: &str) -> Option<&JsonValue> {
        self.items.get(key).and_then(|fields| fields.get(field))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Reads the configuration file as a top-level mapping.
pub fn load_config_file(path: &Path) -> Result<serde_yaml::Mapping, InventoryError> {
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| InventoryError::Io(shown.clone(), e))?;
    if text.trim().is_empty() {
        return Err(InventoryError::Empty(shown));
    }

    let value: YamlValue =
        serde_yaml::from_str(&text).map_err(|e| InventoryError::Yaml(shown.clone(), e))?;
    let mapping = match value {
        YamlValue::Mapping(m) => m,
        YamlValue::Null => return Err(InventoryError::Empty(shown)),
        _ => return Err(InventoryError::NotAMapping(shown)),
    };
    if mapping.is_empty() {
        return Err(InventoryError::Empty(shown));
    }
    debug!(path = %shown, keys = mapping.len(), "inventory source loaded");
    Ok(mapping)
}

/// Flattens `raw` into `inventory`.
pub fn populate_inventory(inventory: &mut Inventory, raw: &serde_yaml::Mapping) {
    for (key, value) in raw {
        let key = yaml_key(key);
        match value {
            YamlValue::Mapping(fields) => {
                for (field, sub_value) in fields {
                    if matches!(sub_value, YamlValue::Sequence(_)) {
                        continue;
                    }
                    set_value(inventory, &key, &yaml_key(field), sub_value);
                }
            }
            YamlValue::Sequence(_) => {}
            _ => set_value(inventory, &key, "value", value),
        }
    }
}

fn set_value(inventory: &mut Inventory, key: &str, field: &str, value: &YamlValue) {
    if mentions_password(key) || mentions_password(field) {
        inventory.set_item(key, field, JsonValue::String(OMITTED_VALUE.to_string()));
        return;
    }
    match serde_json::to_value(value) {
        Ok(json) => inventory.set_item(key, field, json),
        Err(e) => warn!(key, field, error = %e, "failed to convert inventory value"),
    }
}

fn mentions_password(s: &str) -> bool {
    s.to_ascii_lowercase().contains("password")
}

fn yaml_key(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
