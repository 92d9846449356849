//! Loopback filter to rule tree reconstruction.

use serde_json::{Map, Value};
use tracing::trace;

use rulefilter_core::{
    error::{RuleFilterError, RuleFilterResult},
    id::IdAssigner,
    rule::{Condition, Rule, RuleGroup, RuleNode},
};

use crate::operators::{DecodedOperator, OperatorTables};


/// Two-key condition shapes, tested in order, with the operator key each
/// one is read as.
const MULTI_KEY_SHAPES: [(&[&str], &str); 3] = [
    (&["gte", "lte"], "between"),
    (&["lt", "gt"], "not_between"),
    (&["regex"], "regex"),
];

/// Infers the Loopback operator key that produced a field's condition.
///
/// Scalars, arrays and `null` are plain equality (`eq`). Arrays are never
/// read as keyed objects, so `{ "tags": [1, 2] }` decodes to `equal` with the
/// whole array as its value rather than failing. An object with a single key
/// is read as that key. Otherwise the object must match one of
/// the range or pattern shapes; `None` means it matches nothing.
pub(crate) fn determine_operator(condition: &Value) -> Option<&str> {
    let Value::Object(map) = condition else {
        return Some("eq");
    };

    if map.len() == 1 {
        return map.keys().next().map(String::as_str);
    }

    MULTI_KEY_SHAPES
        .iter()
        .find(|(keys, _)| keys.iter().all(|key| map.contains_key(*key)))
        .map(|(_, operator)| *operator)
}

fn single_entry(filter: &Value) -> RuleFilterResult<(&String, &Value)> {
    let map: &Map<String, Value> = filter.as_object().ok_or_else(|| {
        RuleFilterError::format(format!("invalid Loopback filter format: expected an object, got {filter}"))
    })?;

    match (map.len(), map.iter().next()) {
        (1, Some(entry)) => Ok(entry),
        (n, _) => Err(RuleFilterError::format(format!(
            "invalid Loopback filter format: expected exactly one key, found {n} in {filter}"
        ))),
    }
}

/// Walks a Loopback `where` filter and rebuilds the rule tree.
pub(crate) struct FilterDecoder<'a> {
    pub(crate) ids: &'a dyn IdAssigner,
    pub(crate) tables: &'a OperatorTables,
}

impl FilterDecoder<'_> {
    pub(crate) fn decode_group(&self, filter: &Value) -> RuleFilterResult<RuleGroup> {
        let (key, children) = single_entry(filter)?;

        let condition = key.parse::<Condition>().map_err(|_| {
            RuleFilterError::format(format!("unable to build rules from Loopback filter with condition \"{key}\""))
        })?;

        let children = children.as_array().ok_or_else(|| {
            RuleFilterError::format(format!("invalid Loopback filter format: \"{key}\" must hold an array"))
        })?;

        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            let (key, value) = single_entry(child)?;

            if key.parse::<Condition>().is_ok() {
                parts.push(RuleNode::Group(self.decode_group(child)?));
            } else {
                parts.push(RuleNode::Rule(self.decode_rule(key, value)?));
            }
        }

        if parts.is_empty() {
            return Ok(RuleGroup::default());
        }

        Ok(RuleGroup::new(condition, parts))
    }

    fn decode_rule(&self, field: &str, condition: &Value) -> RuleFilterResult<Rule> {
        let key = determine_operator(condition).ok_or_else(|| {
            RuleFilterError::format(format!("invalid Loopback filter format for field \"{field}\": {condition}"))
        })?;

        let decode = self.tables.reverse(key).ok_or_else(|| {
            RuleFilterError::unknown_operator(format!("no rule operator for Loopback operator \"{key}\""))
        })?;

        let DecodedOperator { operator, value } = decode(condition)?;
        trace!(field, key, %operator, "decoded rule");

        Ok(Rule {
            id: self.ids.assign_id(field, condition),
            field: field.to_string(),
            operator: operator.as_str().to_string(),
            value,
            value_type: None,
        })
    }
}
