//! Mapping of raw values into samples.

use tracing::debug;

use crate::catalog::{QueryGroup, SampleAttribute, ValueKind};
use crate::object_name::normalize_attribute_key;
use crate::query::RawValueMap;
use crate::sample::SampleSink;
use crate::source::{RawValue, attribute_key};

/// Writes every mapping of `groups` found in `raw` into `sink`.
///
/// Percentile values are converted from microseconds to milliseconds.
/// Returns the output names that had no value; they are also logged once
/// at debug level. Sink errors are logged and do not stop the walk.
pub fn populate<K: SampleSink + ?Sized>(
    sink: &mut K,
    raw: &RawValueMap,
    groups: &[QueryGroup],
) -> Vec<String> {
    let mut not_found = Vec::new();

    for group in groups {
        for field in &group.fields {
            let key = normalize_attribute_key(&attribute_key(&group.resource, &field.raw_field));
            let value = match raw.get(&key) {
                Some(v) if !v.is_absent() => v,
                _ => {
                    not_found.push(field.output_name.clone());
                    continue;
                }
            };

            let converted;
            let value = match value.as_f64() {
                Some(micros) if field.is_percentile() && field.kind != ValueKind::Attribute => {
                    converted = RawValue::Number(micros / 1000.0);
                    &converted
                }
                _ => value,
            };

            if let Err(e) = sink.set_typed_value(&field.output_name, value, field.kind) {
                debug!(error = %e, "failed to set metric value");
            }
        }
    }

    if !not_found.is_empty() {
        debug!(keys = ?not_found, "can't find raw metrics in results");
    }
    not_found
}

/// Copies the identifying values seeded into a per-table map.
pub fn populate_identifying_attributes<K: SampleSink + ?Sized>(
    sink: &mut K,
    raw: &RawValueMap,
    attributes: &[SampleAttribute],
) {
    for attribute in attributes {
        let Some(value) = raw.get(attribute.key) else {
            debug!(attribute = attribute.key, "can't find raw value for sample attribute");
            continue;
        };
        if let Err(e) = sink.set_typed_value(attribute.output_name, value, attribute.kind) {
            debug!(attribute = attribute.key, error = %e, "failed to set sample attribute");
        }
    }
}
