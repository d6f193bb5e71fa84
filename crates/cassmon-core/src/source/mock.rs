//! Scripted in-memory attribute source for tests.
//!
//! `MockSource` holds a set of registered beans with attribute values and
//! answers queries against them the way a JMX bridge would: concrete names
//! are looked up directly, patterns are matched against every registered
//! bean in registration order. Failures can be scripted per resource, and
//! every call is recorded for assertions.

use std::collections::{HashMap, HashSet};

use crate::object_name::ObjectName;

use super::{AttributeResult, AttributeSource, RawValue, SourceError};

/// A call made against the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Query {
        resource: String,
        attributes: Vec<String>,
    },
    Enumerate {
        pattern: String,
    },
}

#[derive(Debug, Clone)]
struct MockBean {
    name: String,
    parsed: Option<ObjectName>,
    attributes: Vec<(String, RawValue)>,
}

/// In-memory [`AttributeSource`].
#[derive(Debug, Clone)]
pub struct MockSource {
    beans: Vec<MockBean>,
    query_failures: HashMap<String, SourceError>,
    enumerate_failures: HashMap<String, SourceError>,
    broken_attributes: HashSet<(String, String)>,
    calls: Vec<MockCall>,
    alive: bool,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            beans: Vec::new(),
            query_failures: HashMap::new(),
            enumerate_failures: HashMap::new(),
            broken_attributes: HashSet::new(),
            calls: Vec::new(),
            alive: true,
        }
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bean (or adds attributes to an already registered one).
    pub fn add_bean<I, K, V>(&mut self, name: &str, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        let attributes: Vec<(String, RawValue)> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if let Some(bean) = self.beans.iter_mut().find(|b| b.name == name) {
            for (key, value) in attributes {
                match bean.attributes.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => bean.attributes.push((key, value)),
                }
            }
            return self;
        }

        self.beans.push(MockBean {
            name: name.to_string(),
            parsed: ObjectName::parse(name).ok(),
            attributes,
        });
        self
    }

    /// Makes every `query_attributes` call for `resource` fail.
    pub fn fail_query(&mut self, resource: &str, error: SourceError) -> &mut Self {
        self.query_failures.insert(resource.to_string(), error);
        self
    }

    /// Makes every `enumerate_resources` call for `pattern` fail.
    pub fn fail_enumerate(&mut self, pattern: &str, error: SourceError) -> &mut Self {
        self.enumerate_failures.insert(pattern.to_string(), error);
        self
    }

    /// Reports `attribute` of bean `name` with an error status.
    pub fn break_attribute(&mut self, name: &str, attribute: &str) -> &mut Self {
        self.broken_attributes
            .insert((name.to_string(), attribute.to_string()));
        self
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Resources passed to `query_attributes`, in call order.
    pub fn queried_resources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Query { resource, .. } => Some(resource.as_str()),
                MockCall::Enumerate { .. } => None,
            })
            .collect()
    }

    fn matching_beans(&self, resource: &str) -> Vec<&MockBean> {
        let Ok(pattern) = ObjectName::parse(resource) else {
            return self.beans.iter().filter(|b| b.name == resource).collect();
        };
        if !pattern.is_pattern() {
            let canonical = pattern.canonical();
            return self
                .beans
                .iter()
                .filter(|b| {
                    b.name == resource
                        || b.parsed.as_ref().is_some_and(|p| p.canonical() == canonical)
                })
                .collect();
        }
        self.beans
            .iter()
            .filter(|b| b.parsed.as_ref().is_some_and(|p| p.matches(&pattern)))
            .collect()
    }
}

impl AttributeSource for MockSource {
    fn query_attributes(
        &mut self,
        resource: &str,
        attributes: &[String],
    ) -> Result<Vec<AttributeResult>, SourceError> {
        self.calls.push(MockCall::Query {
            resource: resource.to_string(),
            attributes: attributes.to_vec(),
        });

        if let Some(err) = self.query_failures.get(resource) {
            return Err(err.clone());
        }

        let beans = self.matching_beans(resource);
        if beans.is_empty() {
            return Err(SourceError::Target(format!(
                "javax.management.InstanceNotFoundException: {}",
                resource
            )));
        }

        let mut results = Vec::new();
        for bean in beans {
            for attribute in attributes {
                let broken = self
                    .broken_attributes
                    .contains(&(bean.name.clone(), attribute.clone()));
                let value = bean.attributes.iter().find(|(k, _)| k == attribute);
                match value {
                    Some((_, v)) if !broken => {
                        results.push(AttributeResult::ok(&bean.name, attribute, v.clone()))
                    }
                    Some(_) => results.push(AttributeResult::error(
                        &bean.name,
                        attribute,
                        "attribute read failed",
                    )),
                    None => results.push(AttributeResult::error(
                        &bean.name,
                        attribute,
                        format!("AttributeNotFoundException: {}", attribute),
                    )),
                }
            }
        }
        Ok(results)
    }

    fn enumerate_resources(&mut self, pattern: &str) -> Result<Vec<String>, SourceError> {
        self.calls.push(MockCall::Enumerate {
            pattern: pattern.to_string(),
        });

        if let Some(err) = self.enumerate_failures.get(pattern) {
            return Err(err.clone());
        }

        Ok(self
            .matching_beans(pattern)
            .into_iter()
            .map(|b| b.name.clone())
            .collect())
    }

    fn is_alive(&mut self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::AttributeStatus;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_concrete_bean() {
        let mut src = MockSource::new();
        src.add_bean("d:type=A", [("Value", 1.0), ("Count", 2.0)]);

        let results = src
            .query_attributes("d:type=A", &attrs(&["Value", "Missing"]))
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "d:type=A,attr=Value");
        assert_eq!(results[0].value, RawValue::Number(1.0));
        assert_eq!(results[1].status, AttributeStatus::Error);
    }

    #[test]
    fn unknown_bean_is_target_error() {
        let mut src = MockSource::new();
        let err = src
            .query_attributes("d:type=Nope", &attrs(&["Value"]))
            .unwrap_err();
        assert!(err.is_target());
    }

    #[test]
    fn enumerate_follows_registration_order() {
        let mut src = MockSource::new();
        src.add_bean("d:type=T,keyspace=b,scope=t2,name=S", [("Value", 1.0)]);
        src.add_bean("d:type=T,keyspace=a,scope=t1,name=S", [("Value", 1.0)]);
        src.add_bean("d:type=T,keyspace=a,scope=t1,name=Other", [("Value", 1.0)]);

        let names = src
            .enumerate_resources("d:type=T,keyspace=*,scope=*,name=S")
            .unwrap();
        assert_eq!(
            names,
            vec![
                "d:type=T,keyspace=b,scope=t2,name=S",
                "d:type=T,keyspace=a,scope=t1,name=S"
            ]
        );
        assert_eq!(
            src.calls(),
            &[MockCall::Enumerate {
                pattern: "d:type=T,keyspace=*,scope=*,name=S".into()
            }]
        );
    }

    #[test]
    fn scripted_failures_and_broken_attributes() {
        let mut src = MockSource::new();
        src.add_bean("d:type=A", [("Value", 1.0)]);
        src.break_attribute("d:type=A", "Value");
        src.fail_query("d:type=B", SourceError::Transport("down".into()));

        let results = src.query_attributes("d:type=A", &attrs(&["Value"])).unwrap();
        assert_eq!(results[0].status, AttributeStatus::Error);

        let err = src.query_attributes("d:type=B", &attrs(&["Value"])).unwrap_err();
        assert_eq!(err, SourceError::Transport("down".into()));
        assert_eq!(src.queried_resources(), vec!["d:type=A", "d:type=B"]);
    }
}
