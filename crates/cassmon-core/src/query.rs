//! Query execution against an [`AttributeSource`].
//!
//! Node-level groups are read straight into one flat [`RawValueMap`].
//! Per-table groups are first resolved: each pattern is expanded into the
//! concrete bean names the node exposes, internal keyspaces are dropped and
//! at most `limit` distinct tables are admitted. The resolved beans are then
//! read into one map per `keyspace.table`.
//!
//! JMX-level errors ([`SourceError::Target`]) only skip the group they hit.
//! Any other source error aborts the whole call.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::catalog::{KEYSPACE_KEY, QueryGroup, SUB_RESOURCE_KEY, TABLE_KEY};
use crate::object_name::{ObjectName, normalize_attribute_key};
use crate::source::{AttributeResult, AttributeSource, AttributeStatus, RawValue, SourceError};

/// Raw values of one cycle keyed by normalised `<object name>,attr=<attribute>`.
pub type RawValueMap = HashMap<String, RawValue>;

/// `<keyspace>.<table>`.
pub type SubResourceKey = String;

/// Raw values grouped per table, ordered by key.
pub type GroupedValues = BTreeMap<SubResourceKey, RawValueMap>;

/// Keyspaces that are never reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    keyspaces: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(keyspaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyspaces: keyspaces.into_iter().map(Into::into).collect(),
        }
    }

    /// Cassandra's own keyspaces plus OpsCenter.
    pub fn internal_keyspaces() -> Self {
        Self::new([
            "OpsCenter",
            "system",
            "system_auth",
            "system_distributed",
            "system_schema",
            "system_traces",
        ])
    }

    pub fn contains(&self, keyspace: &str) -> bool {
        self.keyspaces.contains(keyspace)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::internal_keyspaces()
    }
}

/// Source error annotated with the call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectError {
    Query {
        resource: String,
        attributes: Vec<String>,
        error: SourceError,
    },
    Resolve {
        pattern: String,
        error: SourceError,
    },
}

impl CollectError {
    pub fn source_error(&self) -> &SourceError {
        match self {
            CollectError::Query { error, .. } | CollectError::Resolve { error, .. } => error,
        }
    }
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::Query {
                resource,
                attributes,
                error,
            } => write!(
                f,
                "failed to query {} for attributes [{}]: {}",
                resource,
                attributes.join(", "),
                error
            ),
            CollectError::Resolve { pattern, error } => {
                write!(f, "failed to resolve bean names for {}: {}", pattern, error)
            }
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source_error())
    }
}

/// Reads every group into one map.
pub fn collect_flat<S: AttributeSource + ?Sized>(
    source: &mut S,
    groups: &[QueryGroup],
) -> Result<RawValueMap, CollectError> {
    let mut values = RawValueMap::new();
    for group in groups {
        let attributes = group.raw_fields();
        let Some(results) = run_query(source, &group.resource, &attributes)? else {
            continue;
        };
        for result in results {
            if result.status == AttributeStatus::Error {
                debug!(attribute = %result.name, status = %result.status_message,
                    "failed to read attribute");
                continue;
            }
            values.insert(normalize_attribute_key(&result.name), result.value);
        }
    }
    Ok(values)
}

/// Expands per-table patterns into concrete groups.
///
/// Tables are admitted in resolution order until `limit` distinct tables are
/// known; later tables are skipped for this call. Every admitted bean yields
/// one group.
pub fn resolve_sub_resources<S: AttributeSource + ?Sized>(
    source: &mut S,
    groups: &[QueryGroup],
    limit: usize,
    excluded: &ExclusionSet,
) -> Result<Vec<QueryGroup>, CollectError> {
    let mut resolved = Vec::new();
    let mut admitted: HashSet<SubResourceKey> = HashSet::new();

    for group in groups {
        let names = match source.enumerate_resources(&group.resource) {
            Ok(names) => names,
            Err(e) if e.is_target() => {
                debug!(pattern = %group.resource, error = %e, "failed to resolve bean names");
                continue;
            }
            Err(e) => {
                return Err(CollectError::Resolve {
                    pattern: group.resource.clone(),
                    error: e,
                });
            }
        };

        for name in names {
            let sub = match ObjectName::parse(&name).and_then(|n| n.split_sub_resource()) {
                Ok(sub) => sub,
                Err(e) => {
                    warn!(bean = %name, error = %e, "skipping malformed bean name");
                    continue;
                }
            };

            if excluded.contains(&sub.keyspace) {
                continue;
            }

            let key = sub.key();
            if !admitted.contains(&key) {
                if admitted.len() >= limit {
                    warn!(
                        column_family = %sub.table,
                        limit,
                        "skipping column family due to limit reached"
                    );
                    continue;
                }
                admitted.insert(key);
            }

            resolved.push(group.with_resource(&name));
        }
    }

    Ok(resolved)
}

/// Resolves and reads per-table groups into one map per table.
///
/// Each table map is seeded with its keyspace, table and combined key so
/// the identifying sample attributes can be written from it.
pub fn collect_grouped<S: AttributeSource + ?Sized>(
    source: &mut S,
    groups: &[QueryGroup],
    limit: usize,
    excluded: &ExclusionSet,
) -> Result<GroupedValues, CollectError> {
    let resolved = resolve_sub_resources(source, groups, limit, excluded)?;
    let mut grouped = GroupedValues::new();

    for group in &resolved {
        let attributes = group.raw_fields();
        let Some(results) = run_query(source, &group.resource, &attributes)? else {
            continue;
        };

        for result in results {
            if result.status == AttributeStatus::Error {
                debug!(attribute = %result.name, status = %result.status_message,
                    "failed to read column family attribute");
                continue;
            }

            let Some((object_name, _)) = result.name.rsplit_once(",attr=") else {
                debug!(attribute = %result.name, "result name has no attribute suffix");
                continue;
            };
            let sub = match ObjectName::parse(object_name).and_then(|n| n.split_sub_resource()) {
                Ok(sub) => sub,
                Err(e) => {
                    debug!(attribute = %result.name, error = %e, "result is not a column family bean");
                    continue;
                }
            };

            let key = sub.key();
            let values = grouped.entry(key.clone()).or_insert_with(|| {
                let mut seeded = RawValueMap::new();
                seeded.insert(KEYSPACE_KEY.to_string(), RawValue::Text(sub.keyspace.clone()));
                seeded.insert(TABLE_KEY.to_string(), RawValue::Text(sub.table.clone()));
                seeded.insert(SUB_RESOURCE_KEY.to_string(), RawValue::Text(key));
                seeded
            });
            values.insert(normalize_attribute_key(&result.name), result.value);
        }
    }

    Ok(grouped)
}

/// Runs one query. `Ok(None)` means a JMX-level error skipped the group.
fn run_query<S: AttributeSource + ?Sized>(
    source: &mut S,
    resource: &str,
    attributes: &[String],
) -> Result<Option<Vec<AttributeResult>>, CollectError> {
    match source.query_attributes(resource, attributes) {
        Ok(results) => Ok(Some(results)),
        Err(e) if e.is_target() => {
            debug!(bean = %resource, attributes = ?attributes, error = %e,
                "failed to get attributes");
            Ok(None)
        }
        Err(e) => Err(CollectError::Query {
            resource: resource.to_string(),
            attributes: attributes.to_vec(),
            error: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldMapping, ValueKind};
    use crate::source::{MockCall, MockSource};

    const SIZE: &str = "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=LiveDiskSpaceUsed";
    const LATENCY: &str = "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=ReadLatency";

    fn table_bean(keyspace: &str, table: &str, metric: &str) -> String {
        format!(
            "org.apache.cassandra.metrics:type=Table,keyspace={},scope={},name={}",
            keyspace, table, metric
        )
    }

    fn size_group() -> QueryGroup {
        QueryGroup::new(
            SIZE,
            vec![FieldMapping::new("Count", "db.liveDiskSpaceUsedBytes", ValueKind::Gauge)],
        )
    }

    fn latency_group() -> QueryGroup {
        QueryGroup::new(
            LATENCY,
            vec![
                FieldMapping::new("50thPercentile", "db.readLatency50thPercentileMilliseconds", ValueKind::Gauge),
                FieldMapping::new("Count", "db.readRequestsPerSecond", ValueKind::Rate),
            ],
        )
    }

    #[test]
    fn flat_collects_successful_attributes() {
        let mut src = MockSource::new();
        src.add_bean("d:type=A", [("Value", 1.0)]);
        src.add_bean("d:type=B", [("Count", 5.0)]);
        let groups = vec![
            QueryGroup::new("d:type=A", vec![FieldMapping::new("Value", "a", ValueKind::Gauge)]),
            QueryGroup::new(
                "d:type=B",
                vec![
                    FieldMapping::new("Count", "b", ValueKind::Gauge),
                    FieldMapping::new("Missing", "m", ValueKind::Gauge),
                ],
            ),
        ];

        let values = collect_flat(&mut src, &groups).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["d:type=A,attr=Value"], RawValue::Number(1.0));
        assert_eq!(values["d:type=B,attr=Count"], RawValue::Number(5.0));
    }

    #[test]
    fn flat_skips_target_errors() {
        let mut src = MockSource::new();
        src.add_bean("d:type=B", [("Value", 2.0)]);
        let groups = vec![
            QueryGroup::new("d:type=Gone", vec![FieldMapping::new("Value", "a", ValueKind::Gauge)]),
            QueryGroup::new("d:type=B", vec![FieldMapping::new("Value", "b", ValueKind::Gauge)]),
        ];

        let values = collect_flat(&mut src, &groups).unwrap();
        assert_eq!(values.len(), 1);
        assert!(values.contains_key("d:type=B,attr=Value"));
    }

    #[test]
    fn transport_error_stops_before_later_groups() {
        let mut src = MockSource::new();
        src.add_bean("d:type=A", [("Value", 1.0)]);
        src.add_bean("d:type=C", [("Value", 3.0)]);
        src.fail_query("d:type=B", SourceError::Transport("connection reset".into()));
        let groups: Vec<QueryGroup> = ["d:type=A", "d:type=B", "d:type=C"]
            .iter()
            .map(|r| QueryGroup::new(r, vec![FieldMapping::new("Value", "v", ValueKind::Gauge)]))
            .collect();

        let err = collect_flat(&mut src, &groups).unwrap_err();
        assert_eq!(
            err,
            CollectError::Query {
                resource: "d:type=B".into(),
                attributes: vec!["Value".into()],
                error: SourceError::Transport("connection reset".into()),
            }
        );
        assert_eq!(src.queried_resources(), vec!["d:type=A", "d:type=B"]);
    }

    #[test]
    fn cap_admits_first_seen_tables() {
        let mut src = MockSource::new();
        for table in ["k1", "k2", "k3", "k4"] {
            src.add_bean(&table_bean("ks", table, "LiveDiskSpaceUsed"), [("Count", 1.0)]);
        }
        for table in ["k4", "k3", "k2", "k1"] {
            src.add_bean(
                &table_bean("ks", table, "ReadLatency"),
                [("50thPercentile", 1.0), ("Count", 1.0)],
            );
        }

        let grouped = collect_grouped(
            &mut src,
            &[size_group(), latency_group()],
            2,
            &ExclusionSet::internal_keyspaces(),
        )
        .unwrap();

        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ks.k1", "ks.k2"]);
        for values in grouped.values() {
            // three seeded entries plus Count, 50thPercentile and the latency Count
            assert_eq!(values.len(), 6);
        }
    }

    #[test]
    fn internal_keyspaces_never_count_against_limit() {
        let mut src = MockSource::new();
        src.add_bean(&table_bean("system", "peers", "LiveDiskSpaceUsed"), [("Count", 1.0)]);
        src.add_bean(&table_bean("system_auth", "roles", "LiveDiskSpaceUsed"), [("Count", 1.0)]);
        src.add_bean(&table_bean("app", "users", "LiveDiskSpaceUsed"), [("Count", 1.0)]);

        let grouped =
            collect_grouped(&mut src, &[size_group()], 1, &ExclusionSet::default()).unwrap();
        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["app.users"]);
    }

    #[test]
    fn zero_limit_resolves_nothing() {
        let mut src = MockSource::new();
        src.add_bean(&table_bean("app", "users", "LiveDiskSpaceUsed"), [("Count", 1.0)]);
        let groups =
            resolve_sub_resources(&mut src, &[size_group()], 0, &ExclusionSet::default()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn grouped_maps_are_seeded_and_keyed_by_pattern() {
        let mut src = MockSource::new();
        src.add_bean(&table_bean("ks1", "t1", "ReadLatency"), [("50thPercentile", 12345.0)]);

        let grouped =
            collect_grouped(&mut src, &[latency_group()], 20, &ExclusionSet::default()).unwrap();
        let values = &grouped["ks1.t1"];

        assert_eq!(values[KEYSPACE_KEY], RawValue::Text("ks1".into()));
        assert_eq!(values[TABLE_KEY], RawValue::Text("t1".into()));
        assert_eq!(values[SUB_RESOURCE_KEY], RawValue::Text("ks1.t1".into()));

        let key = normalize_attribute_key(&format!("{},attr=50thPercentile", LATENCY));
        assert_eq!(values[&key], RawValue::Number(12345.0));
    }

    #[test]
    fn malformed_resolved_names_are_skipped() {
        let no_table = "org.apache.cassandra.metrics:type=Table,keyspace=app,name=LiveDiskSpaceUsed";
        let mut src = MockSource::new();
        src.add_bean(no_table, [("Count", 1.0)]);
        src.add_bean(&table_bean("app", "users", "LiveDiskSpaceUsed"), [("Count", 1.0)]);

        let groups = vec![
            QueryGroup::new(
                "org.apache.cassandra.metrics:type=Table,keyspace=*,name=LiveDiskSpaceUsed",
                vec![FieldMapping::new("Count", "x", ValueKind::Gauge)],
            ),
            size_group(),
        ];

        let resolved =
            resolve_sub_resources(&mut src, &groups, 20, &ExclusionSet::default()).unwrap();
        let resources: Vec<&str> = resolved.iter().map(|g| g.resource.as_str()).collect();
        assert_eq!(resources, vec![table_bean("app", "users", "LiveDiskSpaceUsed")]);
    }

    #[test]
    fn resolution_errors_are_classified() {
        let mut src = MockSource::new();
        src.add_bean(&table_bean("app", "users", "ReadLatency"), [("Count", 1.0)]);
        src.fail_enumerate(SIZE, SourceError::Target("not supported".into()));

        let grouped = collect_grouped(
            &mut src,
            &[size_group(), latency_group()],
            20,
            &ExclusionSet::default(),
        )
        .unwrap();
        assert!(grouped.contains_key("app.users"));

        src.fail_enumerate(LATENCY, SourceError::Protocol("garbage".into()));
        let err = collect_grouped(
            &mut src,
            &[size_group(), latency_group()],
            20,
            &ExclusionSet::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CollectError::Resolve {
                pattern: LATENCY.into(),
                error: SourceError::Protocol("garbage".into()),
            }
        );
    }

    #[test]
    fn grouped_fetch_reads_concrete_beans() {
        let mut src = MockSource::new();
        src.add_bean(&table_bean("app", "users", "LiveDiskSpaceUsed"), [("Count", 1.0)]);
        collect_grouped(&mut src, &[size_group()], 20, &ExclusionSet::default()).unwrap();

        assert_eq!(
            src.calls(),
            &[
                MockCall::Enumerate {
                    pattern: SIZE.into()
                },
                MockCall::Query {
                    resource: table_bean("app", "users", "LiveDiskSpaceUsed"),
                    attributes: vec!["Count".into()],
                },
            ]
        );
    }
}
