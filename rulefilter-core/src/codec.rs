//! Codec settings and the conversion seam implemented by dialect backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::RuleFilterResult,
    rule::{Condition, RuleGroup},
};

/// Settings shared by every codec.
///
/// ```ignore
/// let settings: CodecSettings = serde_json::from_str(r#"{ "default_condition": "or" }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Condition used for groups that omit one.
    pub default_condition: Condition,
    /// Emit `1`/`0` instead of `true`/`false` when coercing boolean values.
    pub boolean_as_integer: bool,
}

/// Converts rule trees to and from a dialect's filter representation.
///
/// Implementations hold no process-wide state; every call is independent.
pub trait RuleCodec {
    /// The dialect-side filter type.
    type Filter;

    /// Translates a rule tree into a dialect filter.
    fn encode(&self, group: &RuleGroup) -> RuleFilterResult<Self::Filter>;

    /// Rebuilds a rule tree from a dialect filter.
    ///
    /// Returns `Ok(None)` when there is no filter to decode.
    fn decode(&self, filter: &Self::Filter) -> RuleFilterResult<Option<RuleGroup>>;
}

/// JSON entry points for codecs whose filters are JSON values.
pub trait JsonRuleCodec: RuleCodec<Filter = Value> {
    /// Deserializes a rule builder's JSON tree and encodes it.
    fn encode_json(&self, rules: &Value) -> RuleFilterResult<Value> {
        let group = RuleGroup::deserialize(rules)?;
        self.encode(&group)
    }

    /// Decodes a filter and serializes the rebuilt tree; `null` when there is none.
    fn decode_json(&self, filter: &Value) -> RuleFilterResult<Value> {
        match self.decode(filter)? {
            Some(group) => Ok(serde_json::to_value(group)?),
            None => Ok(Value::Null),
        }
    }
}

impl<T> JsonRuleCodec for T where T: RuleCodec<Filter = Value> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_and() {
        let settings = CodecSettings::default();
        assert_eq!(settings.default_condition, Condition::And);
        assert!(!settings.boolean_as_integer);
    }

    #[test]
    fn settings_deserialize_case_insensitively() {
        let settings: CodecSettings =
            serde_json::from_str(r#"{ "default_condition": "or" }"#).unwrap();
        assert_eq!(settings.default_condition, Condition::Or);

        assert!(serde_json::from_str::<CodecSettings>(r#"{ "default_condition": "nand" }"#).is_err());
    }
}
