//! Recursive-descent parser over the token stream.
//!
//! Grammar:
//! - `type [T a1 .. ak] : C1 τ .. | C2 τ .. .`
//! - `fun (f τ1 .. τn) -> τ : rule1 | .. | rulem .`
//! - rule: `(f p1 .. pn) -> e` with variable / integer / constructor patterns
//! - expressions: variables, integers, `[C e ..]`, `(f e ..)`; a bare
//!   upper-case name is a nullary constructor

use positron_core::{ConstrDef, Expr, ExprKind, FunSig, Pattern, Program, Rule, Span, TypeDef, TypeExpr};

use super::lexer::{Token, lex};

pub(super) struct ParseError {
    pub message: String,
    pub span: Span,
}

type PResult<T> = Result<T, ParseError>;

pub(super) struct Parser<'src> {
    tokens: Vec<(Token<'src>, Span)>,
    pos: usize,
    eof: Span,
}

impl<'src> Parser<'src> {
    pub(super) fn new(source: &'src str) -> Self {
        Self {
            tokens: lex(source),
            pos: 0,
            eof: Span::new(source.len(), source.len()),
        }
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map(|(_, s)| *s).unwrap_or(self.eof)
    }

    fn bump(&mut self) -> Option<(Token<'src>, Span)> {
        let item = self.tokens.get(self.pos).copied();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn error<T>(&self, message: impl Into<String>) -> PResult<T> {
        Err(ParseError {
            message: message.into(),
            span: self.span(),
        })
    }

    fn describe(&self) -> String {
        match self.peek() {
            None => "end of input".to_string(),
            Some(Token::Unexpected(text)) => format!("`{text}`"),
            Some(Token::Int(text) | Token::UpperIdent(text) | Token::LowerIdent(text)) => {
                format!("`{text}`")
            }
            Some(Token::ParenOpen) => "`(`".to_string(),
            Some(Token::ParenClose) => "`)`".to_string(),
            Some(Token::BracketOpen) => "`[`".to_string(),
            Some(Token::BracketClose) => "`]`".to_string(),
            Some(Token::Colon) => "`:`".to_string(),
            Some(Token::Pipe) => "`|`".to_string(),
            Some(Token::Dot) => "`.`".to_string(),
            Some(Token::Arrow) => "`->`".to_string(),
            Some(Token::Equals) => "`=`".to_string(),
        }
    }

    fn eat(&mut self, expected: Token<'src>, what: &str) -> PResult<Span> {
        if self.peek() == Some(expected) {
            Ok(self.bump().expect("peeked").1)
        } else {
            self.error(format!("expected {what}, found {}", self.describe()))
        }
    }

    fn lower_name(&mut self, what: &str) -> PResult<(&'src str, Span)> {
        match self.peek() {
            Some(Token::LowerIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok((name, span))
            }
            _ => self.error(format!("expected {what}, found {}", self.describe())),
        }
    }

    fn upper_name(&mut self, what: &str) -> PResult<(&'src str, Span)> {
        match self.peek() {
            Some(Token::UpperIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok((name, span))
            }
            _ => self.error(format!("expected {what}, found {}", self.describe())),
        }
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::LowerIdent(name)) if name == kw)
    }

    // --- programs ---

    pub(super) fn program(&mut self) -> PResult<Program> {
        let mut program = Program::default();

        while self.peek().is_some() {
            if self.at_keyword("type") {
                program.types.push(self.type_def()?);
            } else if self.at_keyword("fun") {
                self.fun_def(&mut program)?;
            } else {
                return self.error(format!(
                    "expected `type` or `fun`, found {}",
                    self.describe()
                ));
            }
        }

        Ok(program)
    }

    fn type_def(&mut self) -> PResult<TypeDef> {
        let start = self.span();
        self.bump(); // `type`

        self.eat(Token::BracketOpen, "`[`")?;
        let (name, _) = self.upper_name("a type name")?;
        let mut params = Vec::new();
        while let Some(Token::LowerIdent(param)) = self.peek() {
            params.push(param.to_string());
            self.bump();
        }
        self.eat(Token::BracketClose, "`]`")?;
        self.eat(Token::Colon, "`:`")?;

        let mut constructors = Vec::new();
        loop {
            let (ctr_name, ctr_span) = self.upper_name("a constructor name")?;
            let mut arg_types = Vec::new();
            while !matches!(self.peek(), Some(Token::Pipe | Token::Dot) | None) {
                arg_types.push(self.type_expr()?);
            }
            constructors.push(ConstrDef {
                name: ctr_name.to_string(),
                arg_types,
                span: ctr_span,
            });

            if self.peek() == Some(Token::Pipe) {
                self.bump();
                continue;
            }
            break;
        }
        let end = self.eat(Token::Dot, "`|` or `.`")?;

        Ok(TypeDef {
            name: name.to_string(),
            params,
            constructors,
            span: Span::new(start.start as usize, end.end as usize),
        })
    }

    fn type_expr(&mut self) -> PResult<TypeExpr> {
        match self.peek() {
            Some(Token::BracketOpen) => {
                let start = self.span();
                self.bump();
                let (name, _) = self.upper_name("a type name")?;
                let mut params = Vec::new();
                while self.peek() != Some(Token::BracketClose) {
                    if self.peek().is_none() {
                        return self.error("unclosed `[` in type expression");
                    }
                    params.push(self.type_expr()?);
                }
                let end = self.eat(Token::BracketClose, "`]`")?;
                Ok(TypeExpr {
                    name: name.to_string(),
                    params,
                    span: Span::new(start.start as usize, end.end as usize),
                })
            }
            Some(Token::LowerIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok(TypeExpr {
                    name: name.to_string(),
                    params: Vec::new(),
                    span,
                })
            }
            _ => self.error(format!(
                "expected a type expression, found {}",
                self.describe()
            )),
        }
    }

    fn fun_def(&mut self, program: &mut Program) -> PResult<()> {
        let start = self.span();
        self.bump(); // `fun`

        self.eat(Token::ParenOpen, "`(`")?;
        let (fun_name, _) = self.lower_name("a function name")?;
        let mut arg_types = Vec::new();
        while self.peek() != Some(Token::ParenClose) {
            if self.peek().is_none() {
                return self.error("unclosed `(` in function signature");
            }
            arg_types.push(self.type_expr()?);
        }
        self.eat(Token::ParenClose, "`)`")?;
        self.eat(Token::Arrow, "`->`")?;
        let ret_type = self.type_expr()?;
        let sig_end = self.eat(Token::Colon, "`:`")?;

        program.signatures.push(FunSig {
            name: fun_name.to_string(),
            arg_types,
            ret_type,
            span: Span::new(start.start as usize, sig_end.end as usize),
        });

        loop {
            let pattern = self.pattern()?;
            self.eat(Token::Arrow, "`->`")?;
            let body = self.expr()?;
            let span = Span::new(pattern.span.start as usize, body.span.end as usize);
            program.rules.push(Rule {
                pattern,
                body,
                span,
            });

            match self.peek() {
                Some(Token::Pipe) => {
                    self.bump();
                }
                Some(Token::Dot) => {
                    self.bump();
                    return Ok(());
                }
                _ => return self.error(format!("expected `|` or `.`, found {}", self.describe())),
            }
        }
    }

    // --- rules ---

    fn pattern(&mut self) -> PResult<Pattern> {
        let start = self.eat(Token::ParenOpen, "`(`")?;
        let (name, _) = self.lower_name("a function name")?;
        let mut params = Vec::new();
        while self.peek() != Some(Token::ParenClose) {
            if self.peek().is_none() {
                return self.error("unclosed `(` in pattern");
            }
            params.push(self.pat_atom()?);
        }
        let end = self.eat(Token::ParenClose, "`)`")?;
        Ok(Pattern {
            name: name.to_string(),
            params,
            span: Span::new(start.start as usize, end.end as usize),
        })
    }

    fn pat_atom(&mut self) -> PResult<Expr> {
        match self.peek() {
            Some(Token::BracketOpen) => {
                let start = self.span();
                self.bump();
                let (name, _) = self.upper_name("a constructor name")?;
                let mut args = Vec::new();
                while self.peek() != Some(Token::BracketClose) {
                    if self.peek().is_none() {
                        return self.error("unclosed `[` in pattern");
                    }
                    args.push(self.pat_atom()?);
                }
                let end = self.eat(Token::BracketClose, "`]`")?;
                Ok(Expr::new(
                    ExprKind::Ctr(name.to_string(), args),
                    Span::new(start.start as usize, end.end as usize),
                ))
            }
            Some(Token::Int(text)) => self.int_literal(text),
            Some(Token::LowerIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok(Expr::new(ExprKind::Var(name.to_string()), span))
            }
            Some(Token::UpperIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok(Expr::new(ExprKind::Ctr(name.to_string(), Vec::new()), span))
            }
            _ => self.error(format!("expected a pattern, found {}", self.describe())),
        }
    }

    // --- expressions ---

    pub(super) fn standalone_expr(&mut self) -> PResult<Expr> {
        let expr = self.expr()?;
        if self.peek().is_some() {
            return self.error(format!(
                "unexpected input after expression: {}",
                self.describe()
            ));
        }
        Ok(expr)
    }

    fn expr(&mut self) -> PResult<Expr> {
        match self.peek() {
            Some(Token::Int(text)) => self.int_literal(text),
            Some(Token::BracketOpen) => {
                let start = self.span();
                self.bump();
                let (name, _) = self.upper_name("a constructor name")?;
                let mut args = Vec::new();
                while self.peek() != Some(Token::BracketClose) {
                    if self.peek().is_none() {
                        return self.error("unclosed `[` in expression");
                    }
                    args.push(self.expr()?);
                }
                let end = self.eat(Token::BracketClose, "`]`")?;
                Ok(Expr::new(
                    ExprKind::Ctr(name.to_string(), args),
                    Span::new(start.start as usize, end.end as usize),
                ))
            }
            Some(Token::ParenOpen) => {
                let start = self.span();
                self.bump();
                let (name, _) = self.lower_name("a function name")?;
                let mut args = Vec::new();
                while self.peek() != Some(Token::ParenClose) {
                    if self.peek().is_none() {
                        return self.error("unclosed `(` in expression");
                    }
                    args.push(self.expr()?);
                }
                let end = self.eat(Token::ParenClose, "`)`")?;
                Ok(Expr::new(
                    ExprKind::Call(name.to_string(), args),
                    Span::new(start.start as usize, end.end as usize),
                ))
            }
            Some(Token::LowerIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok(Expr::new(ExprKind::Var(name.to_string()), span))
            }
            Some(Token::UpperIdent(name)) => {
                let span = self.span();
                self.bump();
                Ok(Expr::new(ExprKind::Ctr(name.to_string(), Vec::new()), span))
            }
            _ => self.error(format!("expected an expression, found {}", self.describe())),
        }
    }

    fn int_literal(&mut self, text: &str) -> PResult<Expr> {
        let span = self.span();
        let Ok(value) = text.parse::<i64>() else {
            return self.error(format!("integer literal `{text}` is out of range"));
        };
        self.bump();
        Ok(Expr::new(ExprKind::Lit(value), span))
    }
}
