//! Name-level type checking.
//!
//! Establishes the invariants the engine relies on: every constructor belongs
//! to exactly one type, left-hand patterns are linear, every rule body
//! variable is bound by its pattern, and each rule matches a declared
//! signature's arity. Integer literals are compatible with every type.

use indexmap::IndexMap;

use positron_core::{ConstrDef, Expr, ExprKind, FunSig, Program, Rule, TypeDef, TypeExpr, VarTypes};

use crate::diagnostics::Diagnostics;

/// Check a whole program, collecting every problem found.
pub fn check_program(program: &Program) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let tables = Tables::collect(program, &mut diagnostics);

    for sig in &program.signatures {
        if program.rules_of(&sig.name).next().is_none() {
            diagnostics.warning(format!("function `{}` has no rules", sig.name), sig.span);
        }
    }

    for rule in &program.rules {
        tables.check_rule(rule, &mut diagnostics);
    }

    diagnostics
}

struct Tables<'p> {
    types: IndexMap<&'p str, &'p TypeDef>,
    constructors: IndexMap<&'p str, (&'p TypeDef, &'p ConstrDef)>,
    functions: IndexMap<&'p str, &'p FunSig>,
}

impl<'p> Tables<'p> {
    fn collect(program: &'p Program, diagnostics: &mut Diagnostics) -> Self {
        let mut tables = Self {
            types: IndexMap::new(),
            constructors: IndexMap::new(),
            functions: IndexMap::new(),
        };

        for ty in &program.types {
            if tables.types.insert(&ty.name, ty).is_some() {
                diagnostics.error(format!("type `{}` is defined twice", ty.name), ty.span);
            }
            for ctr in &ty.constructors {
                if tables.constructors.insert(&ctr.name, (ty, ctr)).is_some() {
                    diagnostics.error(
                        format!("constructor `{}` is declared twice", ctr.name),
                        ctr.span,
                    );
                }
            }
        }

        for sig in &program.signatures {
            if tables.functions.insert(&sig.name, sig).is_some() {
                diagnostics.error(format!("function `{}` is declared twice", sig.name), sig.span);
            }
        }

        tables
    }

    fn check_rule(&self, rule: &Rule, diagnostics: &mut Diagnostics) {
        let Some(sig) = self.functions.get(rule.pattern.name.as_str()) else {
            diagnostics.error(
                format!("rule for unknown function `{}`", rule.pattern.name),
                rule.pattern.span,
            );
            return;
        };

        if rule.pattern.params.len() != sig.arg_types.len() {
            diagnostics.error(
                format!(
                    "`{}` takes {} argument(s), this rule matches {}",
                    sig.name,
                    sig.arg_types.len(),
                    rule.pattern.params.len()
                ),
                rule.pattern.span,
            );
            return;
        }

        let mut var_types = VarTypes::new();
        for (param, expected) in rule.pattern.params.iter().zip(&sig.arg_types) {
            self.check_pattern(param, expected, &mut var_types, diagnostics);
        }
        self.check_expr(&rule.body, &sig.ret_type, &var_types, diagnostics);
    }

    fn check_pattern(
        &self,
        pattern: &Expr,
        expected: &TypeExpr,
        var_types: &mut VarTypes,
        diagnostics: &mut Diagnostics,
    ) {
        match &pattern.kind {
            ExprKind::Var(name) => {
                if var_types.contains_key(name) {
                    diagnostics.error(
                        format!("variable `{name}` is bound twice in the pattern"),
                        pattern.span,
                    );
                    return;
                }
                var_types.insert(name.clone(), expected.clone());
            }
            ExprKind::Lit(_) => {}
            ExprKind::Ctr(name, args) => {
                let Some((owner, ctr)) = self.constructors.get(name.as_str()) else {
                    diagnostics.error(format!("unknown constructor `{name}`"), pattern.span);
                    return;
                };
                if !expected.is_var() && owner.name != expected.name {
                    diagnostics.error(
                        format!(
                            "constructor `{name}` builds `[{}]`, but `[{}]` is expected here",
                            owner.name, expected.name
                        ),
                        pattern.span,
                    );
                    return;
                }
                if args.len() != ctr.arg_types.len() {
                    diagnostics.error(
                        format!(
                            "constructor `{name}` takes {} field(s), {} given",
                            ctr.arg_types.len(),
                            args.len()
                        ),
                        pattern.span,
                    );
                    return;
                }
                let assignment = instantiation(owner, expected);
                for (arg, field) in args.iter().zip(&ctr.arg_types) {
                    self.check_pattern(arg, &field.instantiate(&assignment), var_types, diagnostics);
                }
            }
            ExprKind::Call(..) | ExprKind::Let { .. } => {
                diagnostics.error("only variables, integers, and constructors may appear in a pattern", pattern.span);
            }
        }
    }

    fn check_expr(
        &self,
        expr: &Expr,
        expected: &TypeExpr,
        var_types: &VarTypes,
        diagnostics: &mut Diagnostics,
    ) {
        match &expr.kind {
            ExprKind::Var(name) => {
                let Some(actual) = var_types.get(name) else {
                    diagnostics.error(
                        format!("variable `{name}` is not bound by the pattern"),
                        expr.span,
                    );
                    return;
                };
                if !expected.is_var() && !actual.is_var() && actual.name != expected.name {
                    diagnostics.error(
                        format!(
                            "variable `{name}` has type `[{}]`, but `[{}]` is expected here",
                            actual.name, expected.name
                        ),
                        expr.span,
                    );
                }
            }
            ExprKind::Lit(_) => {}
            ExprKind::Ctr(name, args) => {
                let Some((owner, ctr)) = self.constructors.get(name.as_str()) else {
                    diagnostics.error(format!("unknown constructor `{name}`"), expr.span);
                    return;
                };
                if !expected.is_var() && owner.name != expected.name {
                    diagnostics.error(
                        format!(
                            "constructor `{name}` builds `[{}]`, but `[{}]` is expected here",
                            owner.name, expected.name
                        ),
                        expr.span,
                    );
                    return;
                }
                if args.len() != ctr.arg_types.len() {
                    diagnostics.error(
                        format!(
                            "constructor `{name}` takes {} field(s), {} given",
                            ctr.arg_types.len(),
                            args.len()
                        ),
                        expr.span,
                    );
                    return;
                }
                let assignment = instantiation(owner, expected);
                for (arg, field) in args.iter().zip(&ctr.arg_types) {
                    self.check_expr(arg, &field.instantiate(&assignment), var_types, diagnostics);
                }
            }
            ExprKind::Call(name, args) => {
                let Some(sig) = self.functions.get(name.as_str()) else {
                    diagnostics.error(format!("call to unknown function `{name}`"), expr.span);
                    return;
                };
                if !expected.is_var() && !sig.ret_type.is_var() && sig.ret_type.name != expected.name
                {
                    diagnostics.error(
                        format!(
                            "`{name}` returns `[{}]`, but `[{}]` is expected here",
                            sig.ret_type.name, expected.name
                        ),
                        expr.span,
                    );
                }
                if args.len() != sig.arg_types.len() {
                    diagnostics.error(
                        format!(
                            "`{name}` takes {} argument(s), {} given",
                            sig.arg_types.len(),
                            args.len()
                        ),
                        expr.span,
                    );
                    return;
                }
                for (arg, ty) in args.iter().zip(&sig.arg_types) {
                    self.check_expr(arg, ty, var_types, diagnostics);
                }
            }
            ExprKind::Let { .. } => {
                diagnostics.error("`let` cannot appear in a rule body", expr.span);
            }
        }
    }
}

/// Type-parameter assignment for a constructor whose owner is used at
/// `expected` (e.g. `a ↦ [Nat]` for `Cons` inside `[List [Nat]]`).
fn instantiation(owner: &TypeDef, expected: &TypeExpr) -> Vec<(String, TypeExpr)> {
    owner
        .params
        .iter()
        .cloned()
        .zip(expected.params.iter().cloned())
        .collect()
}
