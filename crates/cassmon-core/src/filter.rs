//! Include/exclude filtering of the metric catalog.
//!
//! A mapping is dropped when its output name matches the exclude list and
//! does not match the include list, so include always wins. `"*"` matches
//! every name. Groups left without mappings are dropped.
//!
//! Filter documents are YAML:
//!
//! ```yaml
//! exclude:
//!   - "*"
//! include:
//!   - client.connectedNativeClients
//! ```
//!
//! The older shape with each list nested under `metrics:` is accepted too.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::catalog::{Catalog, FieldMapping, QueryGroup};

/// Environment variable the host agent uses to pass an extra config file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Error type for filter loading.
#[derive(Debug)]
pub enum FilterError {
    Io(String, std::io::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(path, e) => write!(f, "failed to read filter config {}: {}", path, e),
            FilterError::Yaml(e) => write!(f, "invalid metrics filter: {}", e),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(_, e) => Some(e),
            FilterError::Yaml(e) => Some(e),
        }
    }
}

/// Include/exclude lists of output names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRule {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Flat(Vec<String>),
    Nested {
        #[serde(default)]
        metrics: Vec<String>,
    },
}

impl NameList {
    fn into_names(self) -> Vec<String> {
        match self {
            NameList::Flat(names) | NameList::Nested { metrics: names } => names,
        }
    }
}

#[derive(Deserialize, Default)]
struct FilterDocument {
    #[serde(default)]
    include: Option<NameList>,
    #[serde(default)]
    exclude: Option<NameList>,
}

fn list_matches(list: &[String], name: &str) -> bool {
    list.iter().any(|n| n == "*" || n == name)
}

impl FilterRule {
    /// Parses a filter document. Empty input is the no-op rule.
    pub fn from_yaml(text: &str) -> Result<Self, FilterError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: Option<FilterDocument> = serde_yaml::from_str(text).map_err(FilterError::Yaml)?;
        let doc = doc.unwrap_or_default();
        Ok(Self {
            include: doc.include.map(NameList::into_names).unwrap_or_default(),
            exclude: doc.exclude.map(NameList::into_names).unwrap_or_default(),
        })
    }

    /// Reads a filter document from disk.
    pub fn from_file(path: &Path) -> Result<Self, FilterError> {
        debug!(path = %path.display(), "loading filter config");
        let text = std::fs::read_to_string(path)
            .map_err(|e| FilterError::Io(path.display().to_string(), e))?;
        Self::from_yaml(&text)
    }

    /// True if neither list names anything.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// True if `output_name` should not be reported.
    pub fn is_filtered(&self, output_name: &str) -> bool {
        list_matches(&self.exclude, output_name) && !list_matches(&self.include, output_name)
    }

    fn apply(&self, groups: &[QueryGroup]) -> Vec<QueryGroup> {
        groups
            .iter()
            .filter_map(|group| {
                let fields: Vec<FieldMapping> = group
                    .fields
                    .iter()
                    .filter(|f| !self.is_filtered(&f.output_name))
                    .cloned()
                    .collect();
                if fields.is_empty() {
                    None
                } else {
                    Some(group.with_fields(fields))
                }
            })
            .collect()
    }
}

impl Catalog {
    /// Returns the catalog pruned by `rule`. The receiver is left untouched.
    pub fn filter(&self, rule: &FilterRule) -> Catalog {
        if rule.is_empty() {
            return self.clone();
        }
        Catalog {
            common: rule.apply(&self.common),
            instance_level: rule.apply(&self.instance_level),
            sub_resource_level: rule.apply(&self.sub_resource_level),
        }
    }
}
