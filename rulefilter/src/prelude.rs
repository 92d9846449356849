//! Convenient re-exports of commonly used types from rulefilter.
//!
//! ```ignore
//! use rulefilter::prelude::*;
//! ```
//!
//! This provides access to:
//! - Rule-tree types and conditions
//! - Operators and the operator registry
//! - Codec traits, settings and id assignment
//! - Error types

pub use rulefilter_core::{
    codec::{CodecSettings, JsonRuleCodec, RuleCodec},
    coerce::{Coerced, coerce},
    error::{RuleFilterError, RuleFilterResult},
    id::{FieldIds, IdAssigner},
    operator::{AbstractOperator, OperatorDefinition, OperatorRegistry, StandardOperators},
    rule::{Condition, Rule, RuleGroup, RuleNode, ValueType},
};
