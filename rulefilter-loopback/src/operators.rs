//! Operator tables mapping abstract operators to Loopback filter shapes and back.
//!
//! The forward table turns the coerced values of a rule into the condition
//! placed under the rule's field. The reverse table turns a field's condition
//! back into an abstract operator and value, keyed by the Loopback operator
//! key inferred from the condition's shape.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use rulefilter_core::{
    error::{RuleFilterError, RuleFilterResult},
    operator::AbstractOperator,
};

use crate::pattern::{PatternEscaper, classify_like, classify_regex};


/// Builds the Loopback condition for an operator from its coerced values.
pub type EncodeFn = fn(&[Value]) -> Value;

/// Rebuilds the abstract operator and rule value from a Loopback condition.
pub type DecodeFn = fn(&Value) -> RuleFilterResult<DecodedOperator>;

/// Result of a reverse-table lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOperator {
    pub operator: AbstractOperator,
    pub value: Value,
}

impl DecodedOperator {
    pub fn new(operator: AbstractOperator, value: Value) -> Self {
        Self { operator, value }
    }
}

fn nth(values: &[Value], index: usize) -> Value {
    values.get(index).cloned().unwrap_or(Value::Null)
}

fn with_key(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn escaped_first(values: &[Value]) -> String {
    match values.first() {
        Some(Value::String(s)) => PatternEscaper::escape(s),
        Some(Value::Null) | None => String::new(),
        Some(other) => PatternEscaper::escape(&other.to_string()),
    }
}

/// Default forward table, one entry per abstract operator.
pub static FORWARD_OPERATORS: [(AbstractOperator, EncodeFn); 20] = [
    (AbstractOperator::Equal, |v| nth(v, 0)),
    (AbstractOperator::NotEqual, |v| with_key("neq", nth(v, 0))),
    (AbstractOperator::In, |v| with_key("inq", Value::Array(v.to_vec()))),
    (AbstractOperator::NotIn, |v| with_key("nin", Value::Array(v.to_vec()))),
    (AbstractOperator::Less, |v| with_key("lt", nth(v, 0))),
    (AbstractOperator::LessOrEqual, |v| with_key("lte", nth(v, 0))),
    (AbstractOperator::Greater, |v| with_key("gt", nth(v, 0))),
    (AbstractOperator::GreaterOrEqual, |v| with_key("gte", nth(v, 0))),
    (AbstractOperator::Between, |v| with_key("between", json!([nth(v, 0), nth(v, 1)]))),
    (AbstractOperator::NotBetween, |v| json!({ "lt": nth(v, 0), "gt": nth(v, 1) })),
    (AbstractOperator::BeginsWith, |v| with_key("like", Value::String(format!("^{}", escaped_first(v))))),
    (AbstractOperator::NotBeginsWith, |v| with_key("nlike", Value::String(format!("^{}", escaped_first(v))))),
    (AbstractOperator::Contains, |v| with_key("like", Value::String(escaped_first(v)))),
    (AbstractOperator::NotContains, |v| with_key("nlike", Value::String(escaped_first(v)))),
    (AbstractOperator::EndsWith, |v| with_key("like", Value::String(format!("{}$", escaped_first(v))))),
    (AbstractOperator::NotEndsWith, |v| with_key("nlike", Value::String(format!("{}$", escaped_first(v))))),
    (AbstractOperator::IsEmpty, |_| Value::String(String::new())),
    (AbstractOperator::IsNotEmpty, |_| json!({ "neq": "" })),
    (AbstractOperator::IsNull, |_| Value::Null),
    (AbstractOperator::IsNotNull, |_| json!({ "neq": null })),
];

fn member(condition: &Value, key: &str) -> Value {
    condition.get(key).cloned().unwrap_or(Value::Null)
}

fn pattern<'a>(condition: &'a Value, key: &str) -> RuleFilterResult<&'a str> {
    condition
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RuleFilterError::format(format!("\"{key}\" pattern must be a string, got {condition}")))
}

fn decode_eq(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let operator = match condition {
        Value::Null => AbstractOperator::IsNull,
        Value::String(s) if s.is_empty() => AbstractOperator::IsEmpty,
        _ => AbstractOperator::Equal,
    };
    Ok(DecodedOperator::new(operator, condition.clone()))
}

fn decode_neq(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let value = member(condition, "neq");
    let operator = match &value {
        Value::Null => AbstractOperator::IsNotNull,
        Value::String(s) if s.is_empty() => AbstractOperator::IsNotEmpty,
        _ => AbstractOperator::NotEqual,
    };
    Ok(DecodedOperator::new(operator, value))
}

fn decode_regex(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let (operator, literal) = classify_regex(pattern(condition, "regex")?);
    Ok(DecodedOperator::new(operator, Value::String(literal.to_string())))
}

fn decode_like(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let (operator, literal) = classify_like(pattern(condition, "like")?, false);
    Ok(DecodedOperator::new(operator, Value::String(literal)))
}

fn decode_nlike(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let (operator, literal) = classify_like(pattern(condition, "nlike")?, true);
    Ok(DecodedOperator::new(operator, Value::String(literal)))
}

fn decode_between(condition: &Value) -> RuleFilterResult<DecodedOperator> {
    let value = match condition.get("between") {
        Some(range) => range.clone(),
        None => json!([member(condition, "gte"), member(condition, "lte")]),
    };
    Ok(DecodedOperator::new(AbstractOperator::Between, value))
}

/// Default reverse table, keyed by Loopback operator key. `eq`, `between`
/// and `not_between` are inferred from the condition's shape rather than
/// read from a key.
pub static REVERSE_OPERATORS: [(&str, DecodeFn); 14] = [
    ("eq", decode_eq),
    ("neq", decode_neq),
    ("regex", decode_regex),
    ("like", decode_like),
    ("nlike", decode_nlike),
    ("between", decode_between),
    ("not_between", |v| {
        Ok(DecodedOperator::new(AbstractOperator::NotBetween, json!([member(v, "lt"), member(v, "gt")])))
    }),
    ("in", |v| Ok(DecodedOperator::new(AbstractOperator::In, member(v, "in")))),
    ("inq", |v| Ok(DecodedOperator::new(AbstractOperator::In, member(v, "inq")))),
    ("nin", |v| Ok(DecodedOperator::new(AbstractOperator::NotIn, member(v, "nin")))),
    ("lt", |v| Ok(DecodedOperator::new(AbstractOperator::Less, member(v, "lt")))),
    ("lte", |v| Ok(DecodedOperator::new(AbstractOperator::LessOrEqual, member(v, "lte")))),
    ("gt", |v| Ok(DecodedOperator::new(AbstractOperator::Greater, member(v, "gt")))),
    ("gte", |v| Ok(DecodedOperator::new(AbstractOperator::GreaterOrEqual, member(v, "gte")))),
];

/// The forward and reverse tables used by a codec.
///
/// Starts from [`FORWARD_OPERATORS`] and [`REVERSE_OPERATORS`]; entries can
/// be replaced or removed per codec.
///
/// ```ignore
/// let tables = OperatorTables::default()
///     .with_forward(AbstractOperator::Contains, |v| json!({ "regexp": v[0] }))
///     .without_reverse("regex");
/// ```
#[derive(Debug, Clone)]
pub struct OperatorTables {
    forward: HashMap<AbstractOperator, EncodeFn>,
    reverse: HashMap<String, DecodeFn>,
}

impl OperatorTables {
    /// Replaces the forward entry for `operator`.
    pub fn with_forward(mut self, operator: AbstractOperator, encode: EncodeFn) -> Self {
        self.forward.insert(operator, encode);
        self
    }

    /// Removes the forward entry for `operator`; encoding it then fails.
    pub fn without_forward(mut self, operator: AbstractOperator) -> Self {
        self.forward.remove(&operator);
        self
    }

    /// Replaces the reverse entry for a Loopback operator key.
    pub fn with_reverse(mut self, key: impl Into<String>, decode: DecodeFn) -> Self {
        self.reverse.insert(key.into(), decode);
        self
    }

    /// Removes the reverse entry for a Loopback operator key; decoding it then fails.
    pub fn without_reverse(mut self, key: &str) -> Self {
        self.reverse.remove(key);
        self
    }

    pub fn forward(&self, operator: AbstractOperator) -> Option<EncodeFn> {
        self.forward.get(&operator).copied()
    }

    pub fn reverse(&self, key: &str) -> Option<DecodeFn> {
        self.reverse.get(key).copied()
    }
}

impl Default for OperatorTables {
    fn default() -> Self {
        Self {
            forward: FORWARD_OPERATORS.iter().copied().collect(),
            reverse: REVERSE_OPERATORS
                .iter()
                .map(|(key, decode)| (key.to_string(), *decode))
                .collect(),
        }
    }
}
