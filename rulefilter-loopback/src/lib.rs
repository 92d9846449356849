//! Loopback filter codec for rulefilter.
//!
//! This crate translates query-builder rule trees into Loopback `where`
//! filters and rebuilds rule trees from such filters.
//!
//! To use this codec, include the `loopback` feature in your `Cargo.toml`
//! (enabled by default):
//!
//! ```toml
//! [dependencies]
//! rulefilter = { version = "x.y.z", features = ["loopback"] }
//! ```
//!
//! # Operator mapping
//!
//! | Rule operator | Loopback condition |
//! |---|---|
//! | `equal` | the value itself |
//! | `not_equal` | `{ "neq": v }` |
//! | `in` / `not_in` | `{ "inq": [..] }` / `{ "nin": [..] }` |
//! | `less` ... `greater_or_equal` | `{ "lt" \| "lte" \| "gt" \| "gte": v }` |
//! | `between` / `not_between` | `{ "between": [a, b] }` / `{ "lt": a, "gt": b }` |
//! | `begins_with`, `contains`, `ends_with` | `{ "like": "^v" \| "v" \| "v$" }` |
//! | negated string operators | the same patterns under `nlike` |
//! | `is_empty` / `is_not_empty` | `""` / `{ "neq": "" }` |
//! | `is_null` / `is_not_null` | `null` / `{ "neq": null }` |
//!
//! Decoding also understands `regex` conditions, including the negated
//! lookahead and lookbehind forms, and `{ "gte": a, "lte": b }` ranges.
//!
//! # Example
//!
//! ```ignore
//! use rulefilter::{prelude::*, loopback::LoopbackCodec};
//! use serde_json::json;
//!
//! let codec = LoopbackCodec::builder()
//!     .default_condition(Condition::And)
//!     .build();
//!
//! let filter = codec.encode_json(&json!({
//!     "condition": "OR",
//!     "rules": [{ "field": "name", "operator": "begins_with", "value": "Al" }]
//! }))?;
//! assert_eq!(filter, json!({ "or": [{ "name": { "like": "^Al" } }] }));
//!
//! let rules = codec.decode(&filter)?;
//! ```

pub mod codec;
pub mod operators;

mod decoder;
mod encoder;
mod pattern;

pub use codec::{LoopbackCodec, LoopbackCodecBuilder};
pub use operators::{DecodeFn, DecodedOperator, EncodeFn, OperatorTables};
