//! Core types for translating query-builder rule trees into database filters.
//!
//! This crate is the core of the rulefilter project and provides:
//!
//! - **Rule trees** ([`rule`]) - Groups, leaf rules, conditions and value types
//! - **Operators** ([`operator`]) - The abstract operator set and operator metadata registry
//! - **Value coercion** ([`coerce`]) - Converting raw values to their declared types
//! - **Id assignment** ([`id`]) - Naming rules rebuilt from filters
//! - **Codec seam** ([`codec`]) - Settings and the trait dialect backends implement
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use rulefilter_core::rule::{Rule, RuleGroup, ValueType};
//!
//! let tree = RuleGroup::and([
//!     Rule::new("age", "greater", "18").with_type(ValueType::Integer).into(),
//!     Rule::new("name", "begins_with", "Al").into(),
//! ]);
//! ```

pub mod codec;
pub mod coerce;
pub mod error;
pub mod id;
pub mod operator;
pub mod rule;
