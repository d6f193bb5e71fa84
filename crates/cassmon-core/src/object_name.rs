//! JMX object name parsing.
//!
//! Object names have the fixed shape `domain:key=value[,key=value...]`.
//! Property values may be `*` in patterns. Quoted values are not used by
//! Cassandra's metric beans and are not supported.
//!
//! Per-table beans carry two properties identifying the sub-resource:
//! `keyspace=<name>` and `scope=<table>`. [`ObjectName::split_sub_resource`]
//! extracts them and returns the remaining name, which is what all tables of
//! one metric have in common.

use std::fmt;

/// Property naming the parent resource of a per-table bean.
pub const KEYSPACE_PROPERTY: &str = "keyspace";

/// Property naming the child resource of a per-table bean.
pub const TABLE_PROPERTY: &str = "scope";

/// Error type for object name parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNameError {
    /// No `:` between domain and properties.
    MissingDomain(String),
    /// Property without `=` or with an empty key.
    InvalidProperty(String),
    /// Same property key present twice.
    DuplicateProperty(String),
    /// Expected sub-resource property absent.
    MissingSubResource { name: String, property: &'static str },
}

impl fmt::Display for ObjectNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectNameError::MissingDomain(name) => {
                write!(f, "object name '{}' has no domain separator", name)
            }
            ObjectNameError::InvalidProperty(prop) => {
                write!(f, "invalid object name property '{}'", prop)
            }
            ObjectNameError::DuplicateProperty(key) => {
                write!(f, "duplicate object name property '{}'", key)
            }
            ObjectNameError::MissingSubResource { name, property } => {
                write!(f, "object name '{}' has no '{}' property", name, property)
            }
        }
    }
}

impl std::error::Error for ObjectNameError {}

/// Parsed JMX object name, properties kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
}

/// A per-table bean split into its sub-resource and the shared remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResourceName {
    pub keyspace: String,
    pub table: String,
    /// Canonical name with the keyspace/table properties removed.
    pub remainder: String,
}

impl SubResourceName {
    /// `<keyspace>.<table>`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }
}

impl ObjectName {
    pub fn parse(name: &str) -> Result<Self, ObjectNameError> {
        let Some((domain, props)) = name.split_once(':') else {
            return Err(ObjectNameError::MissingDomain(name.to_string()));
        };

        let mut properties: Vec<(String, String)> = Vec::new();
        for prop in props.split(',') {
            let Some((key, value)) = prop.split_once('=') else {
                return Err(ObjectNameError::InvalidProperty(prop.to_string()));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ObjectNameError::InvalidProperty(prop.to_string()));
            }
            if properties.iter().any(|(k, _)| k == key) {
                return Err(ObjectNameError::DuplicateProperty(key.to_string()));
            }
            properties.push((key.to_string(), value.trim().to_string()));
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True if any property value is a `*` wildcard.
    pub fn is_pattern(&self) -> bool {
        self.properties.iter().any(|(_, v)| v == "*")
    }

    /// Returns true if this (concrete) name matches `pattern`.
    ///
    /// Domains must be equal, both names must have the same property keys,
    /// and every pattern value must be `*` or equal to ours.
    pub fn matches(&self, pattern: &ObjectName) -> bool {
        if self.domain != pattern.domain || self.properties.len() != pattern.properties.len() {
            return false;
        }
        pattern
            .properties
            .iter()
            .all(|(key, expected)| match self.property(key) {
                Some(actual) => expected == "*" || expected == actual,
                None => false,
            })
    }

    /// Domain followed by properties sorted by key.
    pub fn canonical(&self) -> String {
        let mut props: Vec<&(String, String)> = self.properties.iter().collect();
        props.sort_by(|a, b| a.0.cmp(&b.0));
        let joined: Vec<String> = props.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}:{}", self.domain, joined.join(","))
    }

    /// Canonical name without the keyspace/table properties.
    ///
    /// Names without a `keyspace` property are returned canonical but
    /// otherwise unchanged (node-level beans use `scope` for other things).
    pub fn without_sub_resource(&self) -> String {
        if self.property(KEYSPACE_PROPERTY).is_none() {
            return self.canonical();
        }
        self.without(&[KEYSPACE_PROPERTY, TABLE_PROPERTY]).canonical()
    }

    /// Splits a per-table name into `(keyspace, table, remainder)`.
    pub fn split_sub_resource(&self) -> Result<SubResourceName, ObjectNameError> {
        let keyspace = self.property(KEYSPACE_PROPERTY).ok_or_else(|| {
            ObjectNameError::MissingSubResource {
                name: self.to_string(),
                property: KEYSPACE_PROPERTY,
            }
        })?;
        let table =
            self.property(TABLE_PROPERTY)
                .ok_or_else(|| ObjectNameError::MissingSubResource {
                    name: self.to_string(),
                    property: TABLE_PROPERTY,
                })?;

        Ok(SubResourceName {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            remainder: self.without(&[KEYSPACE_PROPERTY, TABLE_PROPERTY]).canonical(),
        })
    }

    fn without(&self, keys: &[&str]) -> ObjectName {
        ObjectName {
            domain: self.domain.clone(),
            properties: self
                .properties
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

/// Normalises a raw value key `<object name>,attr=<attribute>`.
///
/// The object name part is canonicalised and stripped of sub-resource
/// properties, so that values returned for any table of a metric share the
/// key derived from the catalog pattern. Keys that do not parse are returned
/// as they are.
pub fn normalize_attribute_key(key: &str) -> String {
    let Some((object_name, attribute)) = key.rsplit_once(",attr=") else {
        return key.to_string();
    };
    match ObjectName::parse(object_name) {
        Ok(name) => format!("{},attr={}", name.without_sub_resource(), attribute),
        Err(_) => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_BEAN: &str =
        "org.apache.cassandra.metrics:type=Table,keyspace=ks1,scope=users,name=ReadLatency";

    #[test]
    fn parse_keeps_property_order() {
        let name = ObjectName::parse(TABLE_BEAN).unwrap();
        assert_eq!(name.domain(), "org.apache.cassandra.metrics");
        assert_eq!(name.property("keyspace"), Some("ks1"));
        assert_eq!(name.property("name"), Some("ReadLatency"));
        assert_eq!(name.to_string(), TABLE_BEAN);
    }

    #[test]
    fn parse_rejects_malformed_names() {
        assert_eq!(
            ObjectName::parse("no-domain"),
            Err(ObjectNameError::MissingDomain("no-domain".into()))
        );
        assert!(matches!(
            ObjectName::parse("d:type"),
            Err(ObjectNameError::InvalidProperty(_))
        ));
        assert!(matches!(
            ObjectName::parse("d:=x"),
            Err(ObjectNameError::InvalidProperty(_))
        ));
        assert_eq!(
            ObjectName::parse("d:a=1,a=2"),
            Err(ObjectNameError::DuplicateProperty("a".into()))
        );
    }

    #[test]
    fn canonical_sorts_properties() {
        let a = ObjectName::parse("d:type=Table,name=X,keyspace=k").unwrap();
        let b = ObjectName::parse("d:keyspace=k,name=X,type=Table").unwrap();
        assert_eq!(a.canonical(), "d:keyspace=k,name=X,type=Table");
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn split_sub_resource_extracts_keyspace_and_table() {
        let name = ObjectName::parse(TABLE_BEAN).unwrap();
        let sub = name.split_sub_resource().unwrap();
        assert_eq!(sub.keyspace, "ks1");
        assert_eq!(sub.table, "users");
        assert_eq!(sub.key(), "ks1.users");
        assert_eq!(
            sub.remainder,
            "org.apache.cassandra.metrics:name=ReadLatency,type=Table"
        );
    }

    #[test]
    fn split_sub_resource_requires_both_properties() {
        let name = ObjectName::parse("d:type=Table,keyspace=ks1,name=X").unwrap();
        assert_eq!(
            name.split_sub_resource(),
            Err(ObjectNameError::MissingSubResource {
                name: "d:type=Table,keyspace=ks1,name=X".into(),
                property: TABLE_PROPERTY,
            })
        );
    }

    #[test]
    fn without_sub_resource_leaves_node_level_scope_alone() {
        let name = ObjectName::parse(
            "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadStage,name=PendingTasks",
        )
        .unwrap();
        assert_eq!(
            name.without_sub_resource(),
            "org.apache.cassandra.metrics:name=PendingTasks,path=request,scope=ReadStage,type=ThreadPools"
        );
    }

    #[test]
    fn pattern_and_concrete_names_normalize_to_same_key() {
        let from_pattern = normalize_attribute_key(
            "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=ReadLatency,attr=50thPercentile",
        );
        let from_result = normalize_attribute_key(&format!("{},attr=50thPercentile", TABLE_BEAN));
        assert_eq!(from_pattern, from_result);
        assert_eq!(
            from_pattern,
            "org.apache.cassandra.metrics:name=ReadLatency,type=Table,attr=50thPercentile"
        );
    }

    #[test]
    fn normalize_passes_through_unparseable_keys() {
        assert_eq!(normalize_attribute_key("raw_metric_1"), "raw_metric_1");
        assert_eq!(
            normalize_attribute_key("raw_metric_1,attr=Value"),
            "raw_metric_1,attr=Value"
        );
    }

    #[test]
    fn matches_wildcard_values() {
        let pattern = ObjectName::parse("d:type=Table,keyspace=*,scope=*,name=Size").unwrap();
        assert!(pattern.is_pattern());

        let hit = ObjectName::parse("d:keyspace=ks,name=Size,scope=t,type=Table").unwrap();
        let other_metric = ObjectName::parse("d:type=Table,keyspace=ks,scope=t,name=Other").unwrap();
        let extra_prop = ObjectName::parse("d:type=Table,keyspace=ks,scope=t,name=Size,x=y").unwrap();

        assert!(hit.matches(&pattern));
        assert!(!other_metric.matches(&pattern));
        assert!(!extra_prop.matches(&pattern));
    }
}
