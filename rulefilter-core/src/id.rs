//! Identifier assignment for reconstructed rules.

use serde_json::Value;

/// Assigns an id to each leaf rule rebuilt from a dialect filter.
///
/// Called once per reconstructed rule with the field name and the raw
/// dialect-side condition value.
pub trait IdAssigner: Send + Sync {
    fn assign_id(&self, field: &str, raw_value: &Value) -> String;
}

/// Uses the field name as the rule id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldIds;

impl IdAssigner for FieldIds {
    fn assign_id(&self, field: &str, _raw_value: &Value) -> String {
        field.to_string()
    }
}

impl<F> IdAssigner for F
where
    F: Fn(&str, &Value) -> String + Send + Sync,
{
    fn assign_id(&self, field: &str, raw_value: &Value) -> String {
        self(field, raw_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_ids_use_the_field_name() {
        assert_eq!(FieldIds.assign_id("age", &json!({ "gt": 3 })), "age");
    }

    #[test]
    fn closures_assign_ids() {
        let prefixed = |field: &str, _: &Value| format!("rule_{field}");
        assert_eq!(prefixed.assign_id("name", &Value::Null), "rule_name");
    }
}
