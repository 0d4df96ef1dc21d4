//! Command handlers and the helpers they share.

pub mod check;
pub mod eval;
pub mod run;
pub mod tree;

use std::io::IsTerminal;
use std::path::Path;

use clap::ArgMatches;

use positron_compiler::pipeline::{self, Checked};
use positron_core::{Expr, ExprKind, TypeExpr, VarTypes};

/// Resolve the --color flag against the terminal.
pub(crate) fn should_colorize(matches: &ArgMatches) -> bool {
    match matches.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => true,
        Some("never") => false,
        _ => std::io::stderr().is_terminal(),
    }
}

pub(crate) fn load_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            std::process::exit(1);
        }
    }
}

/// Parse and type check, rendering diagnostics and exiting on failure.
pub(crate) fn load_checked(source: &str, path: &Path, color: bool) -> Checked {
    let staged = pipeline::parse(source).and_then(pipeline::Parsed::check);
    match staged {
        Ok(checked) => checked,
        Err(err) => {
            match err.diagnostics() {
                Some(diagnostics) => eprint!(
                    "{}",
                    diagnostics
                        .printer()
                        .source(source)
                        .path(&path.display().to_string())
                        .colored(color)
                        .render()
                ),
                None => eprintln!("error: {err}"),
            }
            std::process::exit(1);
        }
    }
}

/// Parse a start expression argument, exiting on failure.
pub(crate) fn parse_start_expr(text: &str, color: bool) -> Expr {
    match positron_compiler::parser::parse_expr(text) {
        Ok(expr) => expr,
        Err(diagnostics) => {
            eprint!(
                "{}",
                diagnostics
                    .printer()
                    .source(text)
                    .path("<expr>")
                    .colored(color)
                    .render()
            );
            std::process::exit(1);
        }
    }
}

/// Build the start configuration.
///
/// A bare function name synthesizes `(f x1 .. xn)` from the signature,
/// taking argument names from the first rule's variable patterns where
/// possible. For explicit calls, argument variables pick up their types from
/// the signature. `-t var=Type` overrides win in both cases.
pub(crate) fn resolve_start(
    checked: &Checked,
    expr_text: &str,
    overrides: &[String],
    color: bool,
) -> (Expr, VarTypes) {
    let program = &checked.program;
    let mut ctx = VarTypes::new();

    let start = if !expr_text.contains('(') {
        let Some(sig) = program.signature(expr_text) else {
            eprintln!("error: function `{expr_text}` not found in signatures");
            std::process::exit(1);
        };
        let first_rule = program.rules_of(expr_text).next();
        let arg_names: Vec<String> = sig
            .arg_types
            .iter()
            .enumerate()
            .map(|(i, _)| {
                first_rule
                    .and_then(|r| r.pattern.params.get(i))
                    .and_then(|p| p.as_var())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("x{}", i + 1))
            })
            .collect();
        for (name, ty) in arg_names.iter().zip(&sig.arg_types) {
            ctx.insert(name.clone(), ty.clone());
        }
        Expr::call(
            expr_text,
            arg_names.iter().map(Expr::var).collect(),
        )
    } else {
        let expr = parse_start_expr(expr_text, color);
        if let ExprKind::Call(name, args) = &expr.kind {
            if let Some(sig) = program.signature(name) {
                for (arg, ty) in args.iter().zip(&sig.arg_types) {
                    if let Some(var) = arg.as_var() {
                        ctx.entry(var.to_string()).or_insert_with(|| ty.clone());
                    }
                }
            }
        }
        expr
    };

    for entry in overrides {
        let Some((var, ty)) = entry.split_once('=') else {
            eprintln!("error: invalid type override `{entry}`, use var=Type");
            std::process::exit(1);
        };
        ctx.insert(var.to_string(), TypeExpr::new(ty, vec![]));
    }

    (start, ctx)
}

pub(crate) fn type_overrides(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("types")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
