//! Positron compiler: front end and supercompilation engine.
//!
//! The pipeline for one specialization run:
//! - `parser` - lexer and recursive-descent parser for SLL
//! - `analyze` - type checking over the parsed program
//! - `sc` - the engine: driver, whistles, MSG, process tree, loop
//! - `residualize` - finished tree → specialized program
//! - `export` - DOT and JSON renderings of the process tree
//! - `diagnostics` - collected errors with source snippets
//!
//! `pipeline` ties the stages together behind a small staged facade.

pub mod analyze;
pub mod diagnostics;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod residualize;
pub mod sc;

pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsPrinter, Severity};
pub use pipeline::{Checked, Outcome, Parsed, parse};
pub use sc::{EngineError, ScLimits, Strategy};

/// Errors that can end a specialization run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("parsing failed with {} error(s)", .0.error_count())]
    Parse(Diagnostics),

    #[error("type checking failed with {} error(s)", .0.error_count())]
    Check(Diagnostics),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Error {
    /// The diagnostics behind a front-end failure, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::Parse(d) | Error::Check(d) => Some(d),
            Error::Engine(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
