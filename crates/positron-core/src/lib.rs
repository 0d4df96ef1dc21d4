//! Core data structures for the Positron supercompiler.
//!
//! Three layers:
//! - **Term model** (`term`): SLL expressions with origin tags and spans
//! - **Program model** (`program`): types, signatures, rules
//! - **Operations** (`matching`, `tags`): three-valued matching,
//!   substitution, and the tag-assignment preprocessor
//!
//! Everything downstream (driver, whistles, residualizer, interpreter) works
//! on these types; nothing here knows about concrete syntax.

mod matching;
mod program;
mod tags;
mod term;

#[cfg(test)]
mod matching_tests;
#[cfg(test)]
mod tags_tests;

pub use matching::{Match, Subst, match_args, match_expr, substitute};
pub use program::{ConstrDef, FunSig, Pattern, Program, Rule, TypeDef, TypeExpr};
pub use tags::{Tag, Tagger};
pub use term::{Expr, ExprKind, Span};

use indexmap::IndexMap;

/// Typing context Γ: free variable name → its type expression.
///
/// Insertion-ordered so that every walk over the context is deterministic.
pub type VarTypes = IndexMap<String, TypeExpr>;
