//! Rule tree to Loopback filter translation.

use serde_json::{Map, Value};
use tracing::{trace, warn};

use rulefilter_core::{
    codec::CodecSettings,
    coerce::coerce,
    error::{RuleFilterError, RuleFilterResult},
    operator::{AbstractOperator, OperatorRegistry},
    rule::{Rule, RuleGroup, RuleNode},
};

use crate::operators::OperatorTables;


/// Walks a rule tree and builds the equivalent Loopback `where` filter.
///
/// Groups become `{ "and" | "or": [...] }` with one entry per child, in rule
/// order. Leaf rules become `{ <field>: <condition> }`.
pub(crate) struct FilterEncoder<'a> {
    pub(crate) settings: &'a CodecSettings,
    pub(crate) registry: &'a dyn OperatorRegistry,
    pub(crate) tables: &'a OperatorTables,
}

impl FilterEncoder<'_> {
    pub(crate) fn encode_group(&self, group: &RuleGroup) -> RuleFilterResult<Value> {
        let condition = group
            .resolve_condition(self.settings.default_condition)
            .map_err(|_| RuleFilterError::format(format!(
                "unable to build a Loopback filter with condition \"{}\"",
                group.condition.as_deref().unwrap_or_default(),
            )))?;

        let rules = match &group.rules {
            Some(rules) if !rules.is_empty() => rules,
            _ => return Ok(Value::Object(Map::new())),
        };

        let parts = rules
            .iter()
            .map(|node| match node {
                RuleNode::Group(group) => self.encode_group(group),
                RuleNode::Rule(rule) => self.encode_rule(rule),
            })
            .collect::<RuleFilterResult<Vec<_>>>()?;

        let mut filter = Map::with_capacity(1);
        filter.insert(condition.as_key().to_string(), Value::Array(parts));
        Ok(Value::Object(filter))
    }

    fn encode_rule(&self, rule: &Rule) -> RuleFilterResult<Value> {
        let encode = rule
            .operator
            .parse::<AbstractOperator>()
            .ok()
            .and_then(|operator| self.tables.forward(operator))
            .ok_or_else(|| RuleFilterError::unknown_operator(format!(
                "no Loopback operation for operator \"{}\"",
                rule.operator,
            )))?;

        let arity = self
            .registry
            .arity(&rule.operator)
            .ok_or_else(|| RuleFilterError::unknown_operator(format!(
                "operator \"{}\" is not registered",
                rule.operator,
            )))?;

        let values = if arity == 0 {
            Vec::new()
        } else {
            let raw = match &rule.value {
                Value::Array(items) => items.as_slice(),
                single => std::slice::from_ref(single),
            };

            raw.iter()
                .map(|value| {
                    let coerced = coerce(value, rule.value_type.as_ref(), self.settings.boolean_as_integer);
                    if coerced.is_nan() {
                        warn!(field = %rule.field, %value, "value is not a number");
                    }
                    Value::from(coerced)
                })
                .collect::<Vec<_>>()
        };

        let condition = encode(&values);
        trace!(field = %rule.field, operator = %rule.operator, %condition, "encoded rule");

        let mut part = Map::with_capacity(1);
        part.insert(rule.field.clone(), condition);
        Ok(Value::Object(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulefilter_core::{
        operator::StandardOperators,
        rule::{Condition, ValueType},
    };
    use serde_json::json;

    fn encode_with(settings: &CodecSettings, tables: &OperatorTables, group: &RuleGroup) -> RuleFilterResult<Value> {
        let registry = StandardOperators::default();
        FilterEncoder { settings, registry: &registry, tables }.encode_group(group)
    }

    fn encode(group: &RuleGroup) -> RuleFilterResult<Value> {
        encode_with(&CodecSettings::default(), &OperatorTables::default(), group)
    }

    #[test]
    fn group_wraps_children_in_order() {
        let group = RuleGroup::or([
            Rule::new("b", "equal", 1).into(),
            Rule::new("a", "is_null", Value::Null).into(),
        ]);

        let filter = encode(&group).unwrap();
        assert_eq!(filter, json!({ "or": [{ "b": 1 }, { "a": null }] }));
        assert_eq!(filter["or"][0].as_object().unwrap().keys().next().unwrap(), "b");
    }

    #[test]
    fn nested_groups_recurse() {
        let group = RuleGroup::and([
            Rule::new("age", "greater", "18").with_type(ValueType::Integer).into(),
            RuleGroup::or([
                Rule::new("name", "begins_with", "Al").into(),
                Rule::new("name", "ends_with", "ce").into(),
            ])
            .into(),
        ]);

        assert_eq!(
            encode(&group).unwrap(),
            json!({
                "and": [
                    { "age": { "gt": 18 } },
                    { "or": [{ "name": { "like": "^Al" } }, { "name": { "like": "ce$" } }] }
                ]
            })
        );
    }

    #[test]
    fn empty_children_are_kept() {
        let group = RuleGroup::and([RuleGroup::or(Vec::new()).into(), Rule::new("x", "equal", 1).into()]);
        assert_eq!(encode(&group).unwrap(), json!({ "and": [{}, { "x": 1 }] }));
    }

    #[test]
    fn missing_or_empty_rules_give_empty_filter() {
        assert_eq!(encode(&RuleGroup::default()).unwrap(), json!({}));
        assert_eq!(encode(&RuleGroup::and(Vec::new())).unwrap(), json!({}));
    }

    #[test]
    fn condition_is_case_insensitive_and_defaulted() {
        let group = RuleGroup {
            condition: Some("oR".to_string()),
            rules: Some(vec![Rule::new("x", "equal", 1).into()]),
        };
        assert_eq!(encode(&group).unwrap(), json!({ "or": [{ "x": 1 }] }));

        let settings = CodecSettings { default_condition: Condition::Or, ..Default::default() };
        let group = RuleGroup { condition: None, rules: group.rules };
        assert_eq!(
            encode_with(&settings, &OperatorTables::default(), &group).unwrap(),
            json!({ "or": [{ "x": 1 }] })
        );
    }

    #[test]
    fn invalid_condition_is_a_format_error() {
        let group = RuleGroup { condition: Some("XOR".to_string()), rules: None };
        assert!(matches!(encode(&group), Err(RuleFilterError::Format(msg)) if msg.contains("XOR")));
    }

    #[test]
    fn unknown_operator_is_reported() {
        let group = RuleGroup::and([Rule::new("x", "fuzzy", 1).into()]);
        assert!(matches!(encode(&group), Err(RuleFilterError::UnknownOperator(msg)) if msg.contains("fuzzy")));

        let tables = OperatorTables::default().without_forward(AbstractOperator::Equal);
        let group = RuleGroup::and([Rule::new("x", "equal", 1).into()]);
        assert!(matches!(
            encode_with(&CodecSettings::default(), &tables, &group),
            Err(RuleFilterError::UnknownOperator(msg)) if msg.contains("equal")
        ));
    }

    #[test]
    fn values_are_wrapped_and_coerced() {
        let group = RuleGroup::and([
            Rule::new("n", "between", json!(["1", "10"])).with_type(ValueType::Integer).into(),
            Rule::new("p", "less", "2.5").with_type(ValueType::Double).into(),
            Rule::new("ids", "in", json!(["1", "2"])).with_type(ValueType::Integer).into(),
            Rule::new("ok", "equal", "true").with_type(ValueType::Boolean).into(),
        ]);

        assert_eq!(
            encode(&group).unwrap(),
            json!({
                "and": [
                    { "n": { "between": [1, 10] } },
                    { "p": { "lt": 2.5 } },
                    { "ids": { "inq": [1, 2] } },
                    { "ok": true }
                ]
            })
        );
    }

    #[test]
    fn booleans_as_integers_when_configured() {
        let settings = CodecSettings { boolean_as_integer: true, ..Default::default() };
        let group = RuleGroup::and([Rule::new("ok", "equal", "0").with_type(ValueType::Boolean).into()]);
        assert_eq!(
            encode_with(&settings, &OperatorTables::default(), &group).unwrap(),
            json!({ "and": [{ "ok": 0 }] })
        );
    }

    #[test]
    fn zero_arity_operators_ignore_value() {
        let group = RuleGroup::and([
            Rule::new("a", "is_not_empty", "ignored").into(),
            Rule::new("b", "is_not_null", Value::Null).into(),
            Rule::new("c", "is_empty", Value::Null).into(),
        ]);
        assert_eq!(
            encode(&group).unwrap(),
            json!({ "and": [{ "a": { "neq": "" } }, { "b": { "neq": null } }, { "c": "" }] })
        );
    }

    #[test]
    fn non_numeric_integers_become_null() {
        let group = RuleGroup::and([Rule::new("n", "equal", "abc").with_type(ValueType::Integer).into()]);
        assert_eq!(encode(&group).unwrap(), json!({ "and": [{ "n": null }] }));
    }
}
