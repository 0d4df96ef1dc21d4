//! Typed SLL programs: type definitions, function signatures, rewrite rules.

use std::fmt;

use serde::Serialize;

use crate::term::{Expr, ExprKind, Span};

/// A type expression: either a type variable (`a`) or an applied type
/// constructor (`[List a]`). Type variables have lower-case names and no
/// parameters.
#[derive(Clone, Debug, Serialize)]
pub struct TypeExpr {
    pub name: String,
    pub params: Vec<TypeExpr>,
    #[serde(skip)]
    pub span: Span,
}

impl TypeExpr {
    pub fn new(name: impl Into<String>, params: Vec<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            params,
            span: Span::DUMMY,
        }
    }

    pub fn is_var(&self) -> bool {
        self.params.is_empty() && self.name.starts_with(|c: char| c.is_lowercase())
    }

    /// Replace type variables according to `assignment` (name → type).
    ///
    /// Used when refining a driver variable: the field types declared by a
    /// constructor mention the owning type's parameters, which must be
    /// instantiated against the concrete type of the variable.
    pub fn instantiate(&self, assignment: &[(String, TypeExpr)]) -> TypeExpr {
        if self.is_var() {
            if let Some((_, ty)) = assignment.iter().find(|(name, _)| *name == self.name) {
                return ty.clone();
            }
            return self.clone();
        }
        TypeExpr {
            name: self.name.clone(),
            params: self
                .params
                .iter()
                .map(|p| p.instantiate(assignment))
                .collect(),
            span: self.span,
        }
    }
}

impl PartialEq for TypeExpr {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl Eq for TypeExpr {}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_var() {
            return write!(f, "{}", self.name);
        }
        write!(f, "[{}", self.name)?;
        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, "]")
    }
}

/// One constructor of a type definition: name plus declared field types.
#[derive(Clone, Debug, Serialize)]
pub struct ConstrDef {
    pub name: String,
    pub arg_types: Vec<TypeExpr>,
    #[serde(skip)]
    pub span: Span,
}

impl PartialEq for ConstrDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arg_types == other.arg_types
    }
}

/// `type [T a1 .. ak] : C1 .. | Cm .. .`
#[derive(Clone, Debug, Serialize)]
pub struct TypeDef {
    pub name: String,
    pub params: Vec<String>,
    pub constructors: Vec<ConstrDef>,
    #[serde(skip)]
    pub span: Span,
}

impl TypeDef {
    pub fn constructor(&self, name: &str) -> Option<&ConstrDef> {
        self.constructors.iter().find(|c| c.name == name)
    }
}

impl PartialEq for TypeDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.constructors == other.constructors
    }
}

/// `fun (f t1 .. tn) -> t : .. .`
#[derive(Clone, Debug, Serialize)]
pub struct FunSig {
    pub name: String,
    pub arg_types: Vec<TypeExpr>,
    pub ret_type: TypeExpr,
    #[serde(skip)]
    pub span: Span,
}

impl PartialEq for FunSig {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.arg_types == other.arg_types
            && self.ret_type == other.ret_type
    }
}

/// Left-hand side of a rule: function name plus argument patterns (variables,
/// integers, or explicit constructor patterns).
#[derive(Clone, Debug, Serialize)]
pub struct Pattern {
    pub name: String,
    pub params: Vec<Expr>,
    #[serde(skip)]
    pub span: Span,
}

impl Pattern {
    pub fn new(name: impl Into<String>, params: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            params,
            span: Span::DUMMY,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.name)?;
        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, ")")
    }
}

/// One rewrite rule `(f p1 .. pn) -> body`.
#[derive(Clone, Debug, Serialize)]
pub struct Rule {
    pub pattern: Pattern,
    pub body: Expr,
    #[serde(skip)]
    pub span: Span,
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.body == other.body
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.body)
    }
}

/// A whole program: the triple (types, signatures, rules).
///
/// Residual programs carry rules only; their types and signatures can be
/// recovered from the typing contexts of the process tree on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Program {
    pub types: Vec<TypeDef>,
    pub signatures: Vec<FunSig>,
    pub rules: Vec<Rule>,
}

impl Program {
    pub fn rules_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |r| r.pattern.name == name)
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn signature(&self, name: &str) -> Option<&FunSig> {
        self.signatures.iter().find(|s| s.name == name)
    }

    /// The type definition owning a constructor, with the constructor itself.
    pub fn constructor(&self, ctr: &str) -> Option<(&TypeDef, &ConstrDef)> {
        self.types
            .iter()
            .find_map(|t| t.constructor(ctr).map(|c| (t, c)))
    }

    /// G-functions dispatch on their first argument: at least one rule has a
    /// constructor as its first pattern argument.
    pub fn is_g_function(&self, name: &str) -> bool {
        self.rules_of(name)
            .any(|r| matches!(r.pattern.params.first().map(|p| &p.kind), Some(ExprKind::Ctr(..))))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first_section = true;

        for t in &self.types {
            write!(f, "type [{}", t.name)?;
            for p in &t.params {
                write!(f, " {p}")?;
            }
            write!(f, "] : ")?;
            for (i, c) in t.constructors.iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{}", c.name)?;
                for a in &c.arg_types {
                    write!(f, " {a}")?;
                }
            }
            writeln!(f, " .")?;
            first_section = false;
        }

        // Rules covered by a signature print as full fun blocks; the rest
        // (residual output) print as bare rules.
        for sig in &self.signatures {
            if !first_section {
                writeln!(f)?;
            }
            first_section = false;
            write!(f, "fun ({}", sig.name)?;
            for a in &sig.arg_types {
                write!(f, " {a}")?;
            }
            writeln!(f, ") -> {} :", sig.ret_type)?;
            let rules: Vec<_> = self.rules_of(&sig.name).collect();
            for (i, rule) in rules.iter().enumerate() {
                let sep = if i + 1 == rules.len() { " ." } else { "" };
                let lead = if i == 0 { "    " } else { "  | " };
                writeln!(f, "{lead}{rule}{sep}")?;
            }
        }

        let orphan_rules: Vec<_> = self
            .rules
            .iter()
            .filter(|r| self.signature(&r.pattern.name).is_none())
            .collect();
        if !orphan_rules.is_empty() {
            if !first_section {
                writeln!(f)?;
            }
            for rule in orphan_rules {
                writeln!(f, "{rule};")?;
            }
        }

        Ok(())
    }
}
