//! Collection cycle orchestration.
//!
//! One cycle:
//! 1. read `common` and `instance_level` groups into one flat map
//! 2. build the `CassandraSample` from it
//! 3. if the limit allows, resolve and read per-table groups
//! 4. build one `CassandraColumnFamilySample` per table, carrying the common
//!    values, the table's own values and its identifying attributes
//!
//! A source failure in step 1 fails the cycle. A source failure in step 3
//! keeps the node-level sample and reports the error alongside it.

use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::{
    Catalog, INSTANCE_SAMPLE, SUB_RESOURCE_ATTRIBUTES, SUB_RESOURCE_KEY, SUB_RESOURCE_SAMPLE,
};
use crate::filter::FilterRule;
use crate::populate::{populate, populate_identifying_attributes};
use crate::query::{CollectError, ExclusionSet, collect_flat, collect_grouped};
use crate::sample::SampleFactory;
use crate::source::AttributeSource;

/// Default cap on reported tables per cycle.
pub const DEFAULT_COLUMN_FAMILIES_LIMIT: usize = 20;

/// Samples of one cycle.
#[derive(Debug)]
pub struct CycleOutcome<T> {
    /// Node-level sample first, then per-table samples ordered by table key.
    pub samples: Vec<T>,
    /// Per-table collection failure that did not discard the node sample.
    pub partial_error: Option<CollectError>,
}

/// Runs collection cycles over a filtered catalog.
#[derive(Debug, Clone)]
pub struct Collector {
    catalog: Catalog,
    limit: usize,
    excluded: ExclusionSet,
}

impl Collector {
    /// Collector over `catalog` pruned once by `rule`.
    pub fn new(catalog: &Catalog, rule: &FilterRule, limit: usize) -> Self {
        let catalog = catalog.filter(rule);
        info!(
            common = catalog.common.len(),
            instance_level = catalog.instance_level.len(),
            sub_resource_level = catalog.sub_resource_level.len(),
            limit,
            "metric catalog ready"
        );
        Self {
            catalog,
            limit,
            excluded: ExclusionSet::internal_keyspaces(),
        }
    }

    /// Replaces the set of keyspaces that are never reported.
    pub fn with_exclusions(mut self, excluded: ExclusionSet) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one collection cycle.
    pub fn collect<S, F>(
        &self,
        source: &mut S,
        factory: &mut F,
    ) -> Result<CycleOutcome<F::Sample>, CollectError>
    where
        S: AttributeSource + ?Sized,
        F: SampleFactory,
    {
        let started = Instant::now();

        let mut node_groups = self.catalog.common.clone();
        node_groups.extend(self.catalog.instance_level.iter().cloned());
        let node_values = collect_flat(source, &node_groups)?;

        let mut node_sample = factory.new_sample(INSTANCE_SAMPLE, &[]);
        populate(&mut node_sample, &node_values, &self.catalog.common);
        populate(&mut node_sample, &node_values, &self.catalog.instance_level);

        let mut outcome = CycleOutcome {
            samples: vec![node_sample],
            partial_error: None,
        };

        if self.limit > 0 {
            match collect_grouped(
                source,
                &self.catalog.sub_resource_level,
                self.limit,
                &self.excluded,
            ) {
                Ok(grouped) => {
                    for (key, values) in &grouped {
                        let mut sample =
                            factory.new_sample(SUB_RESOURCE_SAMPLE, &[(SUB_RESOURCE_KEY, key.as_str())]);
                        populate(&mut sample, &node_values, &self.catalog.common);
                        populate(&mut sample, values, &self.catalog.sub_resource_level);
                        populate_identifying_attributes(&mut sample, values, SUB_RESOURCE_ATTRIBUTES);
                        outcome.samples.push(sample);
                    }
                }
                Err(e) => outcome.partial_error = Some(e),
            }
        }

        debug!(
            samples = outcome.samples.len(),
            raw_values = node_values.len(),
            partial = outcome.partial_error.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection cycle finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldMapping, QueryGroup, ValueKind};
    use crate::sample::{MetricSet, MetricSetFactory, MetricStore, MetricValue};
    use crate::source::{MockCall, MockSource, SourceError};

    const STORAGE: &str = "org.apache.cassandra.db:type=StorageService";
    const CLIENTS: &str = "org.apache.cassandra.metrics:type=Client,name=connectedNativeClients";
    const LATENCY: &str = "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=ReadLatency";

    fn table_bean(keyspace: &str, table: &str) -> String {
        format!(
            "org.apache.cassandra.metrics:type=Table,keyspace={},scope={},name=ReadLatency",
            keyspace, table
        )
    }

    fn catalog() -> Catalog {
        Catalog {
            common: vec![QueryGroup::new(
                STORAGE,
                vec![FieldMapping::new("ReleaseVersion", "software.version", ValueKind::Attribute)],
            )],
            instance_level: vec![QueryGroup::new(
                CLIENTS,
                vec![FieldMapping::new("Value", "client.connectedNativeClients", ValueKind::Gauge)],
            )],
            sub_resource_level: vec![QueryGroup::new(
                LATENCY,
                vec![FieldMapping::new(
                    "99thPercentile",
                    "db.readLatency99thPercentileMilliseconds",
                    ValueKind::Gauge,
                )],
            )],
        }
    }

    fn source() -> MockSource {
        let mut src = MockSource::new();
        src.add_bean(STORAGE, [("ReleaseVersion", "4.1.3")]);
        src.add_bean(CLIENTS, [("Value", 7.0)]);
        src.add_bean(&table_bean("ks1", "t1"), [("99thPercentile", 2000.0)]);
        src.add_bean(&table_bean("ks1", "t2"), [("99thPercentile", 4000.0)]);
        src
    }

    fn factory() -> MetricSetFactory {
        MetricSetFactory::new(
            MetricStore::in_memory().into_shared(),
            vec![("port".into(), "8778".into())],
        )
    }

    fn text(set: &MetricSet, name: &str) -> Option<String> {
        match set.get(name) {
            Some(MetricValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    #[test]
    fn end_to_end_with_limit_one() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 1);
        let mut src = source();
        let outcome = collector.collect(&mut src, &mut factory()).unwrap();

        assert!(outcome.partial_error.is_none());
        assert_eq!(outcome.samples.len(), 2);

        let node = &outcome.samples[0];
        assert_eq!(node.event_type(), "CassandraSample");
        assert_eq!(text(node, "software.version").as_deref(), Some("4.1.3"));
        assert_eq!(
            node.get("client.connectedNativeClients"),
            Some(&MetricValue::Number(7.0))
        );

        let table = &outcome.samples[1];
        assert_eq!(table.event_type(), "CassandraColumnFamilySample");
        assert_eq!(text(table, "software.version").as_deref(), Some("4.1.3"));
        assert_eq!(text(table, "db.keyspace").as_deref(), Some("ks1"));
        assert_eq!(text(table, "db.columnFamily").as_deref(), Some("t1"));
        assert_eq!(text(table, "db.keyspaceAndColumnFamily").as_deref(), Some("ks1.t1"));
        assert_eq!(
            table.get("db.readLatency99thPercentileMilliseconds"),
            Some(&MetricValue::Number(2.0))
        );
        assert!(table.get("client.connectedNativeClients").is_none());

        let skipped = table_bean("ks1", "t2");
        assert!(!src.queried_resources().contains(&skipped.as_str()));
        assert!(src.queried_resources().contains(&table_bean("ks1", "t1").as_str()));
    }

    #[test]
    fn zero_limit_skips_table_collection() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 0);
        let mut src = source();
        let outcome = collector.collect(&mut src, &mut factory()).unwrap();

        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(src.queried_resources(), vec![STORAGE, CLIENTS]);
        assert!(src.calls().iter().all(|c| !matches!(c, MockCall::Enumerate { .. })));
    }

    #[test]
    fn node_level_transport_error_fails_cycle() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 20);
        let mut src = source();
        src.fail_query(CLIENTS, SourceError::Transport("refused".into()));

        let err = collector.collect(&mut src, &mut factory()).unwrap_err();
        assert_eq!(err.source_error(), &SourceError::Transport("refused".into()));
    }

    #[test]
    fn table_level_transport_error_keeps_node_sample() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 20);
        let mut src = source();
        src.fail_query(&table_bean("ks1", "t2"), SourceError::Transport("reset".into()));

        let outcome = collector.collect(&mut src, &mut factory()).unwrap();
        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(outcome.samples[0].event_type(), "CassandraSample");
        assert!(outcome.partial_error.is_some());
    }

    #[test]
    fn target_errors_never_abort() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 20);
        let mut src = source();
        src.fail_query(STORAGE, SourceError::Target("access denied".into()));

        let outcome = collector.collect(&mut src, &mut factory()).unwrap();
        assert_eq!(outcome.samples.len(), 3);
        assert!(outcome.samples.iter().all(|s| s.get("software.version").is_none()));
    }

    #[test]
    fn filter_is_applied_once_at_construction() {
        let rule = FilterRule::from_yaml("exclude: [\"*\"]\ninclude: [client.connectedNativeClients]").unwrap();
        let collector = Collector::new(&catalog(), &rule, 20);
        assert!(collector.catalog().common.is_empty());
        assert!(collector.catalog().sub_resource_level.is_empty());

        let mut src = source();
        let outcome = collector.collect(&mut src, &mut factory()).unwrap();
        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(outcome.samples[0].len(), 1);
    }

    #[test]
    fn excluded_keyspaces_produce_no_samples() {
        let collector = Collector::new(&catalog(), &FilterRule::default(), 20)
            .with_exclusions(ExclusionSet::new(["ks1"]));
        let mut src = source();
        src.add_bean(&table_bean("app", "users"), [("99thPercentile", 1000.0)]);

        let outcome = collector.collect(&mut src, &mut factory()).unwrap();
        let tables: Vec<Option<String>> = outcome.samples[1..]
            .iter()
            .map(|s| text(s, "db.keyspaceAndColumnFamily"))
            .collect();
        assert_eq!(tables, vec![Some("app.users".to_string())]);
    }
}
