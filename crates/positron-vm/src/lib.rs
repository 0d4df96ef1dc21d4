//! Reference interpreter for SLL programs.
//!
//! A small-step normalizer used as the semantic oracle for the
//! supercompiler: the residual program must agree with the original on every
//! ground instance of the start configuration.

mod eval;

#[cfg(test)]
mod eval_tests;

pub use eval::{Evaluator, FuelLimits, RuntimeError};
