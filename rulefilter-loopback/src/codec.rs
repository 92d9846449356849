use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use rulefilter_core::{
    codec::{CodecSettings, RuleCodec},
    error::RuleFilterResult,
    id::{FieldIds, IdAssigner},
    operator::{OperatorRegistry, StandardOperators},
    rule::{Condition, RuleGroup},
};

use crate::{decoder::FilterDecoder, encoder::FilterEncoder, operators::OperatorTables};


/// Converts rule trees to Loopback `where` filters and back.
///
/// The codec owns its configuration and holds no shared mutable state, so a
/// single instance can serve concurrent callers.
#[derive(Clone)]
pub struct LoopbackCodec {
    settings: CodecSettings,
    registry: Arc<dyn OperatorRegistry>,
    ids: Arc<dyn IdAssigner>,
    tables: OperatorTables,
}

impl LoopbackCodec {
    pub fn new(
        settings: CodecSettings,
        registry: Arc<dyn OperatorRegistry>,
        ids: Arc<dyn IdAssigner>,
        tables: OperatorTables,
    ) -> Self {
        Self { settings, registry, ids, tables }
    }

    pub fn builder() -> LoopbackCodecBuilder {
        LoopbackCodecBuilder::new()
    }

    pub fn settings(&self) -> &CodecSettings {
        &self.settings
    }

    pub fn tables(&self) -> &OperatorTables {
        &self.tables
    }
}

impl Default for LoopbackCodec {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RuleCodec for LoopbackCodec {
    type Filter = Value;

    fn encode(&self, group: &RuleGroup) -> RuleFilterResult<Value> {
        debug!(condition = ?group.condition, "encoding rule tree to Loopback filter");

        FilterEncoder {
            settings: &self.settings,
            registry: self.registry.as_ref(),
            tables: &self.tables,
        }
        .encode_group(group)
    }

    fn decode(&self, filter: &Value) -> RuleFilterResult<Option<RuleGroup>> {
        if filter.is_null() {
            return Ok(None);
        }

        debug!("decoding Loopback filter to rule tree");

        FilterDecoder {
            ids: self.ids.as_ref(),
            tables: &self.tables,
        }
        .decode_group(filter)
        .map(Some)
    }
}

pub struct LoopbackCodecBuilder {
    settings: CodecSettings,
    registry: Arc<dyn OperatorRegistry>,
    ids: Arc<dyn IdAssigner>,
    tables: OperatorTables,
}

impl LoopbackCodecBuilder {
    pub fn new() -> Self {
        Self {
            settings: CodecSettings::default(),
            registry: Arc::new(StandardOperators::default()),
            ids: Arc::new(FieldIds),
            tables: OperatorTables::default(),
        }
    }

    /// Replaces all settings.
    pub fn settings(mut self, settings: CodecSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the condition used for groups that omit one.
    pub fn default_condition(mut self, condition: Condition) -> Self {
        self.settings.default_condition = condition;
        self
    }

    /// Emit `1`/`0` for boolean values.
    pub fn boolean_as_integer(mut self, enabled: bool) -> Self {
        self.settings.boolean_as_integer = enabled;
        self
    }

    /// Sets the registry consulted for operator arity.
    pub fn operators(mut self, registry: impl OperatorRegistry + 'static) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Sets how rebuilt rules get their ids.
    pub fn ids(mut self, ids: impl IdAssigner + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Replaces the forward and reverse operator tables.
    pub fn tables(mut self, tables: OperatorTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn build(self) -> LoopbackCodec {
        LoopbackCodec::new(self.settings, self.registry, self.ids, self.tables)
    }
}

impl Default for LoopbackCodecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulefilter_core::{
        codec::JsonRuleCodec,
        error::RuleFilterError,
        operator::AbstractOperator,
        rule::{Rule, RuleNode},
    };
    use crate::operators::DecodedOperator;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn codec_is_shareable() {
        assert_send_sync::<LoopbackCodec>();
    }

    #[test]
    fn null_filter_decodes_to_none() {
        assert_eq!(LoopbackCodec::default().decode(&Value::Null).unwrap(), None);
        assert_eq!(LoopbackCodec::default().decode_json(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn builder_applies_default_condition() {
        let codec = LoopbackCodec::builder().default_condition(Condition::Or).build();
        let filter = codec
            .encode_json(&json!({ "rules": [{ "field": "a", "operator": "equal", "value": 1 }] }))
            .unwrap();
        assert_eq!(filter, json!({ "or": [{ "a": 1 }] }));
    }

    #[test]
    fn builder_accepts_custom_registry() {
        let codec = LoopbackCodec::builder()
            .operators(StandardOperators::default().define("equal", 0, false))
            .build();
        let group = RuleGroup::and([Rule::new("a", "equal", 1).into()]);
        assert_eq!(codec.encode(&group).unwrap(), json!({ "and": [{ "a": null }] }));
    }

    #[test]
    fn operators_missing_from_registry_are_unknown() {
        struct Empty;
        impl OperatorRegistry for Empty {
            fn arity(&self, _operator: &str) -> Option<usize> {
                None
            }
        }

        let codec = LoopbackCodec::builder().operators(Empty).build();
        let group = RuleGroup::and([Rule::new("a", "equal", 1).into()]);
        assert!(matches!(codec.encode(&group), Err(RuleFilterError::UnknownOperator(_))));
    }

    #[test]
    fn builder_accepts_custom_tables_and_ids() {
        let codec = LoopbackCodec::builder()
            .tables(OperatorTables::default().with_forward(AbstractOperator::Contains, |v| json!({ "regexp": v[0] })))
            .ids(|field: &str, _: &Value| format!("{field}-1"))
            .build();

        let group = RuleGroup::and([Rule::new("a", "contains", "x").into()]);
        assert_eq!(codec.encode(&group).unwrap(), json!({ "and": [{ "a": { "regexp": "x" } }] }));

        let decoded = codec.decode(&json!({ "and": [{ "a": 1 }] })).unwrap().unwrap();
        match decoded.rules.as_deref() {
            Some([RuleNode::Rule(rule)]) => assert_eq!(rule.id, "a-1"),
            other => panic!("unexpected rules {other:?}"),
        }
    }

    #[test]
    fn decoder_uses_reverse_overrides() {
        let codec = LoopbackCodec::builder()
            .tables(OperatorTables::default().with_reverse("near", |v| {
                Ok(DecodedOperator::new(AbstractOperator::Equal, v["near"].clone()))
            }))
            .build();

        let decoded = codec.decode(&json!({ "and": [{ "f": { "near": 1 } }] })).unwrap().unwrap();
        match decoded.rules.as_deref() {
            Some([RuleNode::Rule(rule)]) => {
                assert_eq!(rule.operator, "equal");
                assert_eq!(rule.value, json!(1));
            }
            other => panic!("unexpected rules {other:?}"),
        }
        assert!(codec.tables().reverse("near").is_some());
    }

    #[test]
    fn removed_reverse_entries_are_unknown_operators() {
        let codec = LoopbackCodec::builder()
            .tables(OperatorTables::default().without_reverse("regex"))
            .build();

        assert!(matches!(
            codec.decode(&json!({ "and": [{ "f": { "regex": "^a" } }] })),
            Err(RuleFilterError::UnknownOperator(msg)) if msg.contains("regex")
        ));
        assert!(codec.tables().reverse("regex").is_none());
    }

    #[test]
    fn builder_settings_are_exposed() {
        let codec = LoopbackCodec::builder()
            .settings(CodecSettings { default_condition: Condition::Or, boolean_as_integer: false })
            .boolean_as_integer(true)
            .build();

        assert_eq!(
            codec.settings(),
            &CodecSettings { default_condition: Condition::Or, boolean_as_integer: true }
        );
    }

    #[test]
    fn json_entry_points() {
        let codec = LoopbackCodec::default();
        let filter = codec
            .encode_json(&json!({
                "condition": "AND",
                "rules": [{ "id": "age", "field": "age", "type": "integer", "operator": "equal", "value": "30" }]
            }))
            .unwrap();
        assert_eq!(filter, json!({ "and": [{ "age": 30 }] }));

        assert_eq!(
            codec.decode_json(&filter).unwrap(),
            json!({
                "condition": "AND",
                "rules": [{ "id": "age", "field": "age", "operator": "equal", "value": 30 }]
            })
        );
    }

    #[test]
    fn malformed_rule_json_is_a_serialization_error() {
        let result = LoopbackCodec::default().encode_json(&json!({ "rules": [{ "value": 1 }] }));
        assert!(matches!(result, Err(RuleFilterError::Serialization(_))));
    }
}
