//! Rulecraft Runtime - rule storage, combination and evaluation
//!
//! This crate provides the stateful side of the engine:
//! - [`AttributeCatalog`]: registered attributes and their types
//! - [`RuleStore`]: rules with per-rule node arenas and node-level edits
//! - [`combiner`] and [`optimizer`]: building new rules from existing ones
//! - [`Evaluator`]: short-circuit evaluation against attribute bindings
//! - [`RuleEngine`]: the shared service context tying it all together

pub mod builder;
pub mod catalog;
pub mod combiner;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod modification;
pub mod optimizer;
pub mod store;

// Re-export main types
pub use builder::RuleEngineBuilder;
pub use catalog::{AttributeCatalog, DEFAULT_ATTRIBUTES};
pub use engine::{EngineOptions, RuleEngine};
pub use error::{EngineError, Result};
pub use evaluator::{Bindings, Evaluator};
pub use modification::NodeModification;
pub use store::RuleStore;
