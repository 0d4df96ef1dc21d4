//! Semantic analysis of parsed programs.

mod type_check;


pub use type_check::check_program;
