//! Concrete syntax front end: lexer and recursive-descent parser.

mod grammar;
mod lexer;


pub use lexer::{Token, lex};

use positron_core::{Expr, Program};

use crate::diagnostics::Diagnostics;
use grammar::Parser;

/// Parse a whole SLL program. Stops at the first structural error.
pub fn parse_program(source: &str) -> Result<Program, Diagnostics> {
    Parser::new(source).program().map_err(|err| {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(err.message, err.span);
        diagnostics
    })
}

/// Parse a single start expression; the whole input must be consumed.
pub fn parse_expr(source: &str) -> Result<Expr, Diagnostics> {
    Parser::new(source).standalone_expr().map_err(|err| {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(err.message, err.span);
        diagnostics
    })
}
