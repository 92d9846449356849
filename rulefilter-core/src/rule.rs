//! Rule-tree data model.
//!
//! A rule tree is the nested AND/OR structure produced by a visual query
//! builder. Groups hold an ordered list of child nodes; leaves are single
//! `field operator value` rules.
//!
//! The types deserialize straight from the builder's JSON state:
//!
//! ```ignore
//! use rulefilter::rule::RuleGroup;
//!
//! let tree: RuleGroup = serde_json::from_value(serde_json::json!({
//!     "condition": "AND",
//!     "rules": [
//!         { "id": "age", "field": "age", "type": "integer", "operator": "greater", "value": 18 },
//!         { "condition": "OR", "rules": [] }
//!     ]
//! }))?;
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de::Error as DeError};
use serde_json::{Map, Value};

use crate::error::{RuleFilterError, RuleFilterResult};

/// Logical condition combining the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    /// All children must match.
    #[default]
    And,
    /// Any child may match.
    Or,
}

impl Condition {
    /// Upper-case name used in rule trees.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::And => "AND",
            Condition::Or => "OR",
        }
    }

    /// Lower-case name used as a combinator key in dialect filters.
    pub fn as_key(&self) -> &'static str {
        match self {
            Condition::And => "and",
            Condition::Or => "or",
        }
    }
}

impl FromStr for Condition {
    type Err = RuleFilterError;

    /// Parses a condition case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Condition::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Condition::Or)
        } else {
            Err(RuleFilterError::format(format!("unsupported condition \"{s}\"")))
        }
    }
}

impl TryFrom<String> for Condition {
    type Error = RuleFilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.as_str().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a rule's value, used to coerce raw input values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Double,
    Boolean,
    /// Any other declared type (`string`, `date`, ...). Values pass through unchanged.
    #[serde(untagged)]
    Other(String),
}

/// A leaf rule comparing a single field against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier assigned by the rule builder.
    #[serde(default)]
    pub id: String,
    /// The field name the rule applies to.
    pub field: String,
    /// Name of the abstract operator, e.g. `equal` or `begins_with`.
    pub operator: String,
    /// A single value or an array of values. Absent values read as `null`.
    #[serde(default)]
    pub value: Value,
    /// Declared type of the value.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
}

impl Rule {
    /// Creates an untyped rule with an empty id.
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Rule {
            id: String::new(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            value_type: None,
        }
    }

    /// Sets the declared value type.
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Sets the rule id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A group of rules combined under a logical condition.
///
/// `condition` keeps the raw text supplied by the rule builder so that an
/// unsupported value can be reported verbatim. An empty group (no condition,
/// no rules) serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleNode>>,
}

impl RuleGroup {
    /// Creates a group with the given condition and children.
    pub fn new(condition: Condition, rules: impl IntoIterator<Item = RuleNode>) -> Self {
        RuleGroup {
            condition: Some(condition.to_string()),
            rules: Some(rules.into_iter().collect()),
        }
    }

    /// Creates an and-group.
    pub fn and(rules: impl IntoIterator<Item = RuleNode>) -> Self {
        Self::new(Condition::And, rules)
    }

    /// Creates an or-group.
    pub fn or(rules: impl IntoIterator<Item = RuleNode>) -> Self {
        Self::new(Condition::Or, rules)
    }

    /// Resolves the group's condition, falling back to `default` when absent.
    pub fn resolve_condition(&self, default: Condition) -> RuleFilterResult<Condition> {
        match &self.condition {
            Some(condition) => condition.parse(),
            None => Ok(default),
        }
    }

    /// Returns `true` for the degenerate group with neither condition nor rules.
    pub fn is_empty(&self) -> bool {
        self.condition.is_none() && self.rules.as_ref().is_none_or(Vec::is_empty)
    }
}

/// A node of the rule tree: either a nested group or a leaf rule.
///
/// When deserializing, an object carrying a `rules` key is a group and
/// anything else is a leaf rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleNode {
    Group(RuleGroup),
    Rule(Rule),
}

impl<'de> Deserialize<'de> for RuleNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;

        if map.contains_key("rules") {
            serde_json::from_value(Value::Object(map))
                .map(RuleNode::Group)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(Value::Object(map))
                .map(RuleNode::Rule)
                .map_err(D::Error::custom)
        }
    }
}

impl From<Rule> for RuleNode {
    fn from(rule: Rule) -> Self {
        RuleNode::Rule(rule)
    }
}

impl From<RuleGroup> for RuleNode {
    fn from(group: RuleGroup) -> Self {
        RuleNode::Group(group)
    }
}
