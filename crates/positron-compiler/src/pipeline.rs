//! Staged facade over the compilation pipeline.
//!
//! ```text
//! parse(source)? -> Parsed -> check()? -> Checked -> supercompile(..)? -> Outcome
//! ```
//!
//! Each stage owns its output; diagnostics surface through [`crate::Error`].

use positron_core::{Expr, Program, Tagger, VarTypes};

use crate::analyze;
use crate::parser;
use crate::residualize::residualize;
use crate::sc::{ProcessTree, ScLimits, Strategy, Supercompiler};
use crate::{Error, Result};

/// Parse a source text into a program.
pub fn parse(source: &str) -> Result<Parsed> {
    parser::parse_program(source)
        .map(|program| Parsed { program })
        .map_err(Error::Parse)
}

/// A syntactically valid program, not yet type checked.
pub struct Parsed {
    pub program: Program,
}

impl Parsed {
    pub fn check(self) -> Result<Checked> {
        let diagnostics = analyze::check_program(&self.program);
        if diagnostics.has_errors() {
            return Err(Error::Check(diagnostics));
        }
        Ok(Checked {
            program: self.program,
        })
    }
}

/// A validated program, ready for the engine.
pub struct Checked {
    pub program: Program,
}

impl Checked {
    /// Run one specialization: build the process tree and residualize it.
    ///
    /// Under the TAG strategy the program and the start expression are
    /// tagged first; the engine works on its own tagged copy, leaving
    /// `self.program` untouched.
    pub fn supercompile(
        &self,
        mut start: Expr,
        var_types: VarTypes,
        strategy: Strategy,
        limits: ScLimits,
    ) -> Result<Outcome> {
        let mut program = self.program.clone();
        if strategy == Strategy::TagBag {
            let mut tagger = Tagger::new();
            tagger.tag_program(&mut program);
            tagger.tag_expr(&mut start);
        }

        let tree = Supercompiler::new(&program, strategy)
            .limits(limits)
            .build_tree(start, var_types)?;
        let residual = residualize(&tree);
        Ok(Outcome { tree, residual })
    }
}

/// The result of one specialization run.
#[derive(Debug)]
pub struct Outcome {
    pub tree: ProcessTree,
    pub residual: Program,
}
