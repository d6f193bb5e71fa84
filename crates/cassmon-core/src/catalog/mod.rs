//! Metric catalog: what to query and how to report it.
//!
//! The catalog has three tiers:
//! - `common`: node identity (version, cluster, datacenter, rack), reported
//!   on every sample
//! - `instance_level`: node-wide metrics, one `CassandraSample` per cycle
//! - `sub_resource_level`: per-table metrics, one
//!   `CassandraColumnFamilySample` per discovered `keyspace.table`
//!
//! `Catalog::cassandra()` builds the catalog from compiled-in definitions.
//! Catalog values are never mutated; filtering returns a new catalog.

mod definitions;

use std::fmt;

/// Event type of the node-level sample.
pub const INSTANCE_SAMPLE: &str = "CassandraSample";

/// Event type of per-table samples.
pub const SUB_RESOURCE_SAMPLE: &str = "CassandraColumnFamilySample";

/// How a value is reported to the host agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Point-in-time numeric value.
    Gauge,
    /// Per-second change of a monotonically increasing counter.
    Rate,
    /// Descriptive string value.
    Attribute,
    /// Change of a counter since the previous observation.
    Delta,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Gauge => "gauge",
            ValueKind::Rate => "rate",
            ValueKind::Attribute => "attribute",
            ValueKind::Delta => "delta",
        };
        f.write_str(name)
    }
}

/// Maps one raw JMX attribute to one output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// JMX attribute name, e.g. `99thPercentile`.
    pub raw_field: String,
    /// Reported metric name, e.g. `query.readLatency99thPercentileMilliseconds`.
    pub output_name: String,
    pub kind: ValueKind,
}

impl FieldMapping {
    pub fn new(raw_field: &str, output_name: &str, kind: ValueKind) -> Self {
        Self {
            raw_field: raw_field.to_string(),
            output_name: output_name.to_string(),
            kind,
        }
    }

    /// Percentile values are reported by Cassandra in microseconds.
    pub fn is_percentile(&self) -> bool {
        self.raw_field.ends_with("Percentile")
    }
}

/// One bean (or bean pattern) and the fields read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGroup {
    /// JMX object name, possibly with `*` property values.
    pub resource: String,
    pub fields: Vec<FieldMapping>,
}

impl QueryGroup {
    pub fn new(resource: &str, fields: Vec<FieldMapping>) -> Self {
        Self {
            resource: resource.to_string(),
            fields,
        }
    }

    /// Raw attribute names, in declaration order.
    pub fn raw_fields(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.raw_field.clone()).collect()
    }

    /// Clone of this group bound to a concrete (resolved) object name.
    pub fn with_resource(&self, resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            fields: self.fields.clone(),
        }
    }

    /// Same resource with a different field list.
    pub fn with_fields(&self, fields: Vec<FieldMapping>) -> Self {
        Self {
            resource: self.resource.clone(),
            fields,
        }
    }
}

/// Identifying attribute attached to every per-table sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAttribute {
    /// Key of the seeded entry in the per-table raw value map.
    pub key: &'static str,
    pub output_name: &'static str,
    pub kind: ValueKind,
}

/// Raw map key holding the keyspace name of a table sample.
pub const KEYSPACE_KEY: &str = "keyspace";
/// Raw map key holding the table name of a table sample.
pub const TABLE_KEY: &str = "columnFamily";
/// Raw map key holding `<keyspace>.<table>`.
pub const SUB_RESOURCE_KEY: &str = "keyspaceAndColumnFamily";

/// Attributes that make each `CassandraColumnFamilySample` unique.
pub const SUB_RESOURCE_ATTRIBUTES: &[SampleAttribute] = &[
    SampleAttribute {
        key: KEYSPACE_KEY,
        output_name: "db.keyspace",
        kind: ValueKind::Attribute,
    },
    SampleAttribute {
        key: TABLE_KEY,
        output_name: "db.columnFamily",
        kind: ValueKind::Attribute,
    },
    SampleAttribute {
        key: SUB_RESOURCE_KEY,
        output_name: "db.keyspaceAndColumnFamily",
        kind: ValueKind::Attribute,
    },
];

/// The three tiers of query groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub common: Vec<QueryGroup>,
    pub instance_level: Vec<QueryGroup>,
    pub sub_resource_level: Vec<QueryGroup>,
}

impl Catalog {
    /// Full Cassandra catalog.
    pub fn cassandra() -> Self {
        Self {
            common: build_groups(definitions::COMMON),
            instance_level: build_groups(definitions::INSTANCE_LEVEL),
            sub_resource_level: build_groups(definitions::SUB_RESOURCE_LEVEL),
        }
    }

    /// Total number of field mappings across all tiers.
    pub fn field_count(&self) -> usize {
        [&self.common, &self.instance_level, &self.sub_resource_level]
            .iter()
            .flat_map(|tier| tier.iter())
            .map(|g| g.fields.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.instance_level.is_empty() && self.sub_resource_level.is_empty()
    }
}

// ============================================================
// Static definitions
// ============================================================

struct FieldDef {
    raw_field: &'static str,
    output_name: &'static str,
    kind: ValueKind,
}

impl FieldDef {
    const fn new(raw_field: &'static str, output_name: &'static str, kind: ValueKind) -> Self {
        Self {
            raw_field,
            output_name,
            kind,
        }
    }
}

struct GroupDef {
    resource: &'static str,
    fields: &'static [FieldDef],
}

fn build_groups(defs: &[GroupDef]) -> Vec<QueryGroup> {
    defs.iter()
        .map(|g| {
            QueryGroup::new(
                g.resource,
                g.fields
                    .iter()
                    .map(|f| FieldMapping::new(f.raw_field, f.output_name, f.kind))
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_name::ObjectName;
    use std::collections::HashSet;

    #[test]
    fn cassandra_catalog_is_complete() {
        let catalog = Catalog::cassandra();
        assert_eq!(catalog.common.len(), 2);
        assert_eq!(catalog.field_count(), 186);
        assert!(!catalog.instance_level.is_empty());
        assert!(!catalog.sub_resource_level.is_empty());
    }

    #[test]
    fn every_resource_is_a_valid_object_name() {
        let catalog = Catalog::cassandra();
        for group in catalog
            .common
            .iter()
            .chain(&catalog.instance_level)
            .chain(&catalog.sub_resource_level)
        {
            assert!(
                ObjectName::parse(&group.resource).is_ok(),
                "bad resource {}",
                group.resource
            );
            assert!(!group.fields.is_empty(), "empty group {}", group.resource);
        }
    }

    #[test]
    fn sub_resource_groups_carry_keyspace_and_table_wildcards() {
        for group in Catalog::cassandra().sub_resource_level {
            let name = ObjectName::parse(&group.resource).unwrap();
            let sub = name.split_sub_resource().unwrap();
            assert_eq!(sub.keyspace, "*", "{}", group.resource);
            assert_eq!(sub.table, "*", "{}", group.resource);
        }
    }

    #[test]
    fn output_names_are_unique_per_sample() {
        let catalog = Catalog::cassandra();
        let mut seen = HashSet::new();
        for group in catalog.common.iter().chain(&catalog.instance_level) {
            for field in &group.fields {
                assert!(seen.insert(&field.output_name), "{}", field.output_name);
            }
        }

        let mut seen = HashSet::new();
        for group in catalog.common.iter().chain(&catalog.sub_resource_level) {
            for field in &group.fields {
                assert!(seen.insert(&field.output_name), "{}", field.output_name);
            }
        }
    }

    #[test]
    fn common_tier_is_node_identity() {
        let catalog = Catalog::cassandra();
        let names: Vec<&str> = catalog
            .common
            .iter()
            .flat_map(|g| g.fields.iter())
            .map(|f| f.output_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "software.version",
                "cluster.name",
                "cluster.datacenter",
                "cluster.rack"
            ]
        );
        assert!(
            catalog
                .common
                .iter()
                .flat_map(|g| g.fields.iter())
                .all(|f| f.kind == ValueKind::Attribute)
        );
    }

    #[test]
    fn percentile_detection_uses_raw_field() {
        let p = FieldMapping::new("99thPercentile", "x", ValueKind::Gauge);
        let c = FieldMapping::new("Count", "somethingPercentile", ValueKind::Gauge);
        assert!(p.is_percentile());
        assert!(!c.is_percentile());
    }

    #[test]
    fn with_resource_keeps_fields() {
        let group = QueryGroup::new(
            "d:type=T,keyspace=*,scope=*,name=S",
            vec![FieldMapping::new("Value", "db.size", ValueKind::Gauge)],
        );
        let resolved = group.with_resource("d:type=T,keyspace=a,scope=b,name=S");
        assert_eq!(resolved.resource, "d:type=T,keyspace=a,scope=b,name=S");
        assert_eq!(resolved.fields, group.fields);
        assert_eq!(resolved.raw_fields(), vec!["Value"]);
    }
}
