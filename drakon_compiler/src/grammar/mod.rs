//! DrakonScript statement grammars
//!
//! The shared statement lexer plus the two ordered-pattern grammars built on
//! top of it. Both grammars are tables of `(name, rationale, matcher)`
//! entries evaluated in order; the table order is part of the language.

pub mod action;
pub mod context;
pub mod criterion;
pub mod lexer;
pub mod value;

pub use action::{parse_action, ActionError, ACTION_PATTERNS};
pub use context::ContextKey;
pub use criterion::{parse_criterion, CriterionError, ParsedCriterion, CRITERION_PATTERNS};
pub use value::{Number, Scalar};
