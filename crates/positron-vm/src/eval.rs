//! Step-based normalization.

use positron_core::{Expr, ExprKind, Match, Program, match_args, substitute};

/// Runtime limits for normalization.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum rewrite steps (default: 1,000,000).
    exec_fuel: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("execution limit exceeded")]
    FuelExhausted,
}

/// Normalizer over a fixed program.
pub struct Evaluator<'p> {
    program: &'p Program,
    limits: FuelLimits,
}

impl<'p> Evaluator<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            limits: FuelLimits::default(),
        }
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// One rewrite step, or `None` if the expression is in normal form.
    ///
    /// Strategy: the leftmost-outermost call whose arguments match a rule
    /// (first rule in source order wins); otherwise the first argument that
    /// can itself step, including under constructors.
    pub fn step(&self, expr: &Expr) -> Option<Expr> {
        match &expr.kind {
            ExprKind::Ctr(name, args) => self.step_args(args).map(|new_args| Expr {
                kind: ExprKind::Ctr(name.clone(), new_args),
                tag: expr.tag,
                span: expr.span,
            }),

            ExprKind::Call(name, args) => {
                for rule in self.program.rules_of(name) {
                    if rule.pattern.params.len() != args.len() {
                        continue;
                    }
                    if let Match::Success(sub) = match_args(&rule.pattern.params, args) {
                        return Some(substitute(&rule.body, &sub));
                    }
                }
                self.step_args(args).map(|new_args| Expr {
                    kind: ExprKind::Call(name.clone(), new_args),
                    tag: expr.tag,
                    span: expr.span,
                })
            }

            ExprKind::Var(_) | ExprKind::Lit(_) | ExprKind::Let { .. } => None,
        }
    }

    fn step_args(&self, args: &[Expr]) -> Option<Vec<Expr>> {
        for (i, arg) in args.iter().enumerate() {
            if let Some(next) = self.step(arg) {
                let mut new_args = args.to_vec();
                new_args[i] = next;
                return Some(new_args);
            }
        }
        None
    }

    /// Iterate steps to a normal form, bounded by the fuel limit.
    pub fn normalize(&self, expr: &Expr) -> Result<Expr, RuntimeError> {
        let mut current = expr.clone();
        for _ in 0..self.limits.exec_fuel {
            match self.step(&current) {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
        Err(RuntimeError::FuelExhausted)
    }
}
