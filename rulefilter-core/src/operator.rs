//! Abstract operators and operator metadata.
//!
//! [`AbstractOperator`] is the closed set of comparison operators a rule tree
//! may use. [`OperatorRegistry`] is the seam through which a codec asks how
//! many value inputs an operator takes; [`StandardOperators`] carries the
//! stock definitions of the query builder.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RuleFilterError;

/// Source-agnostic comparison operators used by rule trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractOperator {
    Equal,
    NotEqual,
    In,
    NotIn,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Between,
    NotBetween,
    BeginsWith,
    NotBeginsWith,
    Contains,
    NotContains,
    EndsWith,
    NotEndsWith,
    IsEmpty,
    IsNotEmpty,
    IsNull,
    IsNotNull,
}

impl AbstractOperator {
    /// Every operator, in declaration order.
    pub const ALL: [AbstractOperator; 20] = [
        AbstractOperator::Equal,
        AbstractOperator::NotEqual,
        AbstractOperator::In,
        AbstractOperator::NotIn,
        AbstractOperator::Less,
        AbstractOperator::LessOrEqual,
        AbstractOperator::Greater,
        AbstractOperator::GreaterOrEqual,
        AbstractOperator::Between,
        AbstractOperator::NotBetween,
        AbstractOperator::BeginsWith,
        AbstractOperator::NotBeginsWith,
        AbstractOperator::Contains,
        AbstractOperator::NotContains,
        AbstractOperator::EndsWith,
        AbstractOperator::NotEndsWith,
        AbstractOperator::IsEmpty,
        AbstractOperator::IsNotEmpty,
        AbstractOperator::IsNull,
        AbstractOperator::IsNotNull,
    ];

    /// The operator's name as it appears in rule trees.
    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractOperator::Equal => "equal",
            AbstractOperator::NotEqual => "not_equal",
            AbstractOperator::In => "in",
            AbstractOperator::NotIn => "not_in",
            AbstractOperator::Less => "less",
            AbstractOperator::LessOrEqual => "less_or_equal",
            AbstractOperator::Greater => "greater",
            AbstractOperator::GreaterOrEqual => "greater_or_equal",
            AbstractOperator::Between => "between",
            AbstractOperator::NotBetween => "not_between",
            AbstractOperator::BeginsWith => "begins_with",
            AbstractOperator::NotBeginsWith => "not_begins_with",
            AbstractOperator::Contains => "contains",
            AbstractOperator::NotContains => "not_contains",
            AbstractOperator::EndsWith => "ends_with",
            AbstractOperator::NotEndsWith => "not_ends_with",
            AbstractOperator::IsEmpty => "is_empty",
            AbstractOperator::IsNotEmpty => "is_not_empty",
            AbstractOperator::IsNull => "is_null",
            AbstractOperator::IsNotNull => "is_not_null",
        }
    }
}

impl FromStr for AbstractOperator {
    type Err = RuleFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbstractOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RuleFilterError::unknown_operator(format!("no operator named \"{s}\"")))
    }
}

impl fmt::Display for AbstractOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing how an operator takes its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDefinition {
    /// Number of value inputs. `0` means the operator takes no value.
    pub nb_inputs: usize,
    /// Whether a single input accepts several values (`in`, `not_in`).
    pub multiple: bool,
}

/// Looks up operator metadata by operator name.
pub trait OperatorRegistry: Send + Sync {
    /// Returns the number of value inputs `operator` expects, or `None`
    /// when the operator is not registered.
    fn arity(&self, operator: &str) -> Option<usize>;
}

/// The query builder's stock operator definitions.
///
/// Custom operators can be registered with [`StandardOperators::define`]:
///
/// ```ignore
/// let registry = StandardOperators::default().define("is_weekday", 0, false);
/// ```
#[derive(Debug, Clone)]
pub struct StandardOperators {
    definitions: HashMap<String, OperatorDefinition>,
}

impl StandardOperators {
    /// Adds or replaces an operator definition.
    pub fn define(mut self, name: impl Into<String>, nb_inputs: usize, multiple: bool) -> Self {
        self.definitions.insert(name.into(), OperatorDefinition { nb_inputs, multiple });
        self
    }

    /// Returns the definition registered for `name`.
    pub fn get(&self, name: &str) -> Option<&OperatorDefinition> {
        self.definitions.get(name)
    }
}

impl Default for StandardOperators {
    fn default() -> Self {
        let definitions = AbstractOperator::ALL
            .into_iter()
            .map(|op| {
                let nb_inputs = match op {
                    AbstractOperator::Between | AbstractOperator::NotBetween => 2,
                    AbstractOperator::IsEmpty
                    | AbstractOperator::IsNotEmpty
                    | AbstractOperator::IsNull
                    | AbstractOperator::IsNotNull => 0,
                    _ => 1,
                };
                let multiple = matches!(op, AbstractOperator::In | AbstractOperator::NotIn);

                (op.as_str().to_string(), OperatorDefinition { nb_inputs, multiple })
            })
            .collect();

        StandardOperators { definitions }
    }
}

impl OperatorRegistry for StandardOperators {
    fn arity(&self, operator: &str) -> Option<usize> {
        self.get(operator).map(|def| def.nb_inputs)
    }
}
