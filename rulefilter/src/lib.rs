//! Translate visual query-builder rule trees to database filters and back.
//!
//! This crate is the primary entry point of the rulefilter project. It
//! re-exports the core rule-tree types and the available dialect codecs.
//!
//! # Features
//!
//! - **Typed rule trees** - Deserialize a query builder's JSON state into [`rule::RuleGroup`]
//! - **Closed operator set** - Twenty abstract operators, from `equal` to `is_not_null`
//! - **Bidirectional codecs** - Encode rule trees to a dialect filter and rebuild them from one
//! - **Configurable** - Default condition, operator registry, id assignment and operator tables
//!
//! # Quick Start
//!
//! ```ignore
//! use rulefilter::{prelude::*, loopback::LoopbackCodec};
//! use serde_json::json;
//!
//! let codec = LoopbackCodec::default();
//!
//! let tree = RuleGroup::and([
//!     Rule::new("age", "between", json!(["18", "30"])).with_type(ValueType::Integer).into(),
//!     Rule::new("name", "contains", "li").into(),
//! ]);
//!
//! // Encode the rule tree as a Loopback `where` filter
//! let filter = codec.encode(&tree)?;
//! assert_eq!(
//!     filter,
//!     json!({ "and": [{ "age": { "between": [18, 30] } }, { "name": { "like": "li" } }] })
//! );
//!
//! // Rebuild the rule tree from the filter
//! let rebuilt = codec.decode(&filter)?.unwrap();
//! ```
//!
//! # Codecs
//!
//! - [`loopback`] - Loopback `where` filters (requires the `loopback` feature, on by default)

pub mod prelude;

pub use rulefilter_core::{codec, coerce, error, id, operator, rule};

// Re-export serde_json for convenience
pub use serde_json;

/// Loopback filter codec.
///
/// This module is only available when the `loopback` feature is enabled.
#[cfg(feature = "loopback")]
pub mod loopback {
    pub use rulefilter_loopback::{
        DecodeFn, DecodedOperator, EncodeFn, LoopbackCodec, LoopbackCodecBuilder, OperatorTables,
        operators::{FORWARD_OPERATORS, REVERSE_OPERATORS},
    };
}
