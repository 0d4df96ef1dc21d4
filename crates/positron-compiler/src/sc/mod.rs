//! The supercompilation engine.
//!
//! One run owns a process tree, a fresh-name counter, and (under the TAG
//! strategy) the tag bags cached on tree nodes; nothing is global. The loop
//! in `supercompile` composes the pieces: folding, whistle, generalization,
//! driving.

mod drive;
mod embed;
mod msg;
mod supercompile;
mod tagbag;
mod tree;

#[cfg(test)]
mod drive_tests;
#[cfg(test)]
mod embed_tests;
#[cfg(test)]
mod supercompile_tests;
#[cfg(test)]
mod tagbag_tests;

pub use drive::{Branch, Driver, NameGen, Step};
pub use embed::embedded;
pub use msg::{Generalization, msg, natural_key};
pub use supercompile::{ScLimits, Strategy, Supercompiler};
pub use tagbag::TagBag;
pub use tree::{Contraction, Node, NodeId, ProcessTree};

use positron_core::Span;

/// Fatal engine failures.
///
/// The first three indicate a program-wide inconsistency that the type
/// checker should have rejected; the engine fails fast instead of recovering
/// per node.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("variable `{var}` has no type in the driving context")]
    UntypedVariable { var: String, span: Span },

    #[error("unknown type `{name}`")]
    UnknownType { name: String, span: Span },

    #[error("constructor `{ctr}` is not declared by type `{ty}`")]
    UnknownConstructor {
        ctr: String,
        ty: String,
        span: Span,
    },

    #[error("supercompilation exceeded the fuel limit of {0} steps")]
    FuelExhausted(u32),
}
