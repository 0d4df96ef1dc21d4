//! The driver: one symbolic evaluation step.

use positron_core::{Expr, ExprKind, Match, Program, Subst, VarTypes, match_args, substitute};

use super::tree::Contraction;
use super::EngineError;

/// Fresh variable names for one supercompilation run.
///
/// Shared by the driver (refinement variables) and the loop (generalization
/// holes), so every synthesized name is distinct within a run.
#[derive(Debug, Default)]
pub struct NameGen {
    counter: u32,
}

impl NameGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> String {
        self.counter += 1;
        format!("v{}", self.counter)
    }
}

/// One driving step.
#[derive(Clone, Debug)]
pub enum Step {
    /// The configuration is passive: a variable, a literal, or a stuck call.
    Stop,
    /// Deterministic rewrite to a single successor.
    Transient(Expr),
    /// A constructor broken into its arguments.
    Decompose(Vec<Expr>),
    /// Case analysis: one successor per refinement of a blocking variable.
    Variant(Vec<Branch>),
}

/// One arm of a [`Step::Variant`].
#[derive(Clone, Debug)]
pub struct Branch {
    pub expr: Expr,
    pub contraction: Contraction,
    pub var_types: VarTypes,
}

/// Rule-based symbolic evaluator over a fixed program.
pub struct Driver<'p> {
    program: &'p Program,
    pub names: NameGen,
}

impl<'p> Driver<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            names: NameGen::new(),
        }
    }

    /// Compute one symbolic step for `(expr, var_types)`.
    pub fn drive(&mut self, expr: &Expr, var_types: &VarTypes) -> Result<Step, EngineError> {
        match &expr.kind {
            ExprKind::Ctr(_, args) => Ok(Step::Decompose(args.clone())),
            ExprKind::Var(_) | ExprKind::Lit(_) => Ok(Step::Stop),
            ExprKind::Call(..) => self.drive_call(expr, var_types),
            // Let configurations are expanded by the supercompiler loop, not
            // driven.
            ExprKind::Let { .. } => Ok(Step::Stop),
        }
    }

    /// Rule-based driving of a call, in source rule order.
    ///
    /// A rule that matches outright before any narrowing was seen rewrites
    /// deterministically. Once an earlier rule has narrowed, later outright
    /// matches must not fire (the earlier rules take priority), so the
    /// accumulated case analysis is returned instead. Several rules may
    /// request the same refinement; only the first produces a branch.
    fn drive_call(&mut self, expr: &Expr, var_types: &VarTypes) -> Result<Step, EngineError> {
        let ExprKind::Call(name, args) = &expr.kind else {
            unreachable!("drive_call expects a call");
        };

        let mut branches: Vec<Branch> = Vec::new();
        let mut refined: Vec<(String, String)> = Vec::new();

        for rule in self.program.rules_of(name) {
            if rule.pattern.params.len() != args.len() {
                continue;
            }
            match match_args(&rule.pattern.params, args) {
                Match::Success(sub) => {
                    if branches.is_empty() {
                        return Ok(Step::Transient(substitute(&rule.body, &sub)));
                    }
                    return Ok(Step::Variant(branches));
                }
                Match::Narrow { var, ctr, tag, .. } => {
                    if refined.iter().any(|(v, c)| *v == var && *c == ctr) {
                        continue;
                    }
                    branches.push(self.refine(expr, &var, &ctr, tag, var_types)?);
                    refined.push((var, ctr));
                }
                Match::Fail => {}
            }
        }

        if !branches.is_empty() {
            return Ok(Step::Variant(branches));
        }
        self.drive_nested(expr, var_types)
    }

    /// Build one case-analysis branch: refine `var` into a fresh
    /// `ctr`-shaped value, substitute through the call, and eagerly reduce.
    ///
    /// The fresh constructor inherits the origin tag of the pattern that
    /// requested the narrowing; it stands for a value allocated at that
    /// pattern's site.
    fn refine(
        &mut self,
        call: &Expr,
        var: &str,
        ctr: &str,
        tag: Option<positron_core::Tag>,
        var_types: &VarTypes,
    ) -> Result<Branch, EngineError> {
        let var_type = var_types.get(var).ok_or_else(|| EngineError::UntypedVariable {
            var: var.to_string(),
            span: call.span,
        })?;
        let type_def =
            self.program
                .type_def(&var_type.name)
                .ok_or_else(|| EngineError::UnknownType {
                    name: var_type.name.clone(),
                    span: var_type.span,
                })?;
        let ctr_def = type_def
            .constructor(ctr)
            .ok_or_else(|| EngineError::UnknownConstructor {
                ctr: ctr.to_string(),
                ty: type_def.name.clone(),
                span: call.span,
            })?;

        // Field types mention the owner's parameters; instantiate them
        // against the concrete type of the refined variable.
        let assignment: Vec<_> = type_def
            .params
            .iter()
            .cloned()
            .zip(var_type.params.iter().cloned())
            .collect();

        let mut fresh = Vec::new();
        let mut branch_types = var_types.clone();
        for field in &ctr_def.arg_types {
            let name = self.names.fresh();
            branch_types.insert(name.clone(), field.instantiate(&assignment));
            fresh.push(name);
        }

        let mut refinement = Expr::ctr(ctr, fresh.iter().map(Expr::var).collect());
        refinement.tag = tag;
        let mut sub = Subst::new();
        sub.insert(var.to_string(), refinement);
        let refined = substitute(call, &sub);

        // Eagerly reduce: the refinement unblocks exactly the rule that
        // requested it (or an earlier one), so the branch can skip one
        // transient step.
        let mut body = refined.clone();
        if let ExprKind::Call(name, args) = &refined.kind {
            for rule in self.program.rules_of(name) {
                if rule.pattern.params.len() != args.len() {
                    continue;
                }
                if let Match::Success(sub) = match_args(&rule.pattern.params, args) {
                    body = substitute(&rule.body, &sub);
                    break;
                }
            }
        }

        Ok(Branch {
            expr: body,
            contraction: Contraction::Case {
                var: var.to_string(),
                ctr: ctr.to_string(),
                params: fresh,
            },
            var_types: branch_types,
        })
    }

    /// No rule made progress: advance the first reducible argument and lift
    /// the result over the outer call.
    fn drive_nested(&mut self, expr: &Expr, var_types: &VarTypes) -> Result<Step, EngineError> {
        let ExprKind::Call(name, args) = &expr.kind else {
            unreachable!("drive_nested expects a call");
        };

        for (i, arg) in args.iter().enumerate() {
            if !arg.is_call() {
                continue;
            }
            match self.drive(arg, var_types)? {
                Step::Transient(inner) => {
                    let mut new_args = args.clone();
                    new_args[i] = inner;
                    return Ok(Step::Transient(Expr {
                        kind: ExprKind::Call(name.clone(), new_args),
                        tag: expr.tag,
                        span: expr.span,
                    }));
                }
                Step::Variant(branches) => {
                    let lifted = branches
                        .into_iter()
                        .map(|branch| {
                            // The contraction refines a variable that may
                            // occur in the other arguments too; the whole
                            // outer configuration must see it.
                            let sub = branch.contraction_subst();
                            let mut new_args: Vec<_> =
                                args.iter().map(|a| substitute(a, &sub)).collect();
                            new_args[i] = branch.expr;
                            Branch {
                                expr: Expr {
                                    kind: ExprKind::Call(name.clone(), new_args),
                                    tag: expr.tag,
                                    span: expr.span,
                                },
                                contraction: branch.contraction,
                                var_types: branch.var_types,
                            }
                        })
                        .collect();
                    return Ok(Step::Variant(lifted));
                }
                Step::Stop | Step::Decompose(_) => {}
            }
        }

        Ok(Step::Stop)
    }
}

impl Branch {
    /// The substitution recorded by this branch's contraction.
    fn contraction_subst(&self) -> Subst {
        let mut sub = Subst::new();
        if let Contraction::Case { var, ctr, params } = &self.contraction {
            sub.insert(
                var.clone(),
                Expr::ctr(ctr.as_str(), params.iter().map(Expr::var).collect()),
            );
        }
        sub
    }
}
