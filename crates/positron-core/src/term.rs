//! SLL expressions.
//!
//! Every node carries an optional *origin tag* (assigned once by the
//! [`Tagger`](crate::Tagger) before supercompilation, preserved by
//! substitution) and a byte span into the source it was parsed from.
//! Synthesized nodes carry no tag and a dummy span.
//!
//! Equality and ordering deliberately ignore tags and spans: two expressions
//! are equal iff they are structurally identical.

use std::fmt;

use serde::Serialize;

use crate::Tag;

/// Byte range into the source text. `0..0` marks a synthesized node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    /// 1-based line number of the span start within `source`.
    pub fn line(&self, source: &str) -> usize {
        let start = (self.start as usize).min(source.len());
        source[..start].bytes().filter(|b| *b == b'\n').count() + 1
    }
}

/// An SLL expression: the shape plus origin metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ExprKind {
    /// Free variable.
    Var(String),
    /// Constructor application `[C e1 .. en]`, n >= 0.
    Ctr(String, Vec<Expr>),
    /// Function call `(f e1 .. en)`.
    Call(String, Vec<Expr>),
    /// Integer literal.
    Lit(i64),
    /// `let var = val in body`. Only produced by generalization and consumed
    /// by residual emission; user programs never contain lets.
    Let {
        var: String,
        val: Box<Expr>,
        body: Box<Expr>,
    },
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            tag: None,
            span,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Var(name.into()), Span::DUMMY)
    }

    pub fn ctr(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Ctr(name.into(), args), Span::DUMMY)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call(name.into(), args), Span::DUMMY)
    }

    pub fn lit(value: i64) -> Self {
        Self::new(ExprKind::Lit(value), Span::DUMMY)
    }

    pub fn let_in(var: impl Into<String>, val: Expr, body: Expr) -> Self {
        Self::new(
            ExprKind::Let {
                var: var.into(),
                val: Box::new(val),
                body: Box::new(body),
            },
            Span::DUMMY,
        )
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, ExprKind::Var(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExprKind::Call(..))
    }

    pub fn is_let(&self) -> bool {
        matches!(self.kind, ExprKind::Let { .. })
    }

    pub fn as_var(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Var(name) => Some(name),
            _ => None,
        }
    }

    /// Free variables in first-occurrence order, deduplicated.
    ///
    /// This order defines residual parameter lists, so it must be stable.
    pub fn free_vars(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut bound = Vec::new();
        self.collect_free(&mut bound, &mut out);
        out
    }

    fn collect_free(&self, bound: &mut Vec<String>, out: &mut Vec<String>) {
        match &self.kind {
            ExprKind::Var(name) => {
                if !bound.iter().any(|b| b == name) && !out.iter().any(|o| o == name) {
                    out.push(name.clone());
                }
            }
            ExprKind::Ctr(_, args) | ExprKind::Call(_, args) => {
                for arg in args {
                    arg.collect_free(bound, out);
                }
            }
            ExprKind::Lit(_) => {}
            ExprKind::Let { var, val, body } => {
                val.collect_free(bound, out);
                bound.push(var.clone());
                body.collect_free(bound, out);
                bound.pop();
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Var(name) => write!(f, "{name}"),
            ExprKind::Ctr(name, args) => {
                write!(f, "[{name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, "]")
            }
            ExprKind::Call(name, args) => {
                write!(f, "({name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            ExprKind::Lit(value) => write!(f, "{value}"),
            ExprKind::Let { var, val, body } => {
                write!(f, "let {var} = {val} in {body}")
            }
        }
    }
}
