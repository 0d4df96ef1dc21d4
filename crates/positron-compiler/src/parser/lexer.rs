//! Lexer for SLL concrete syntax.
//!
//! Whitespace and `<< .. >>` block comments are skipped at the lexer level.
//! Runs of characters the lexer cannot recognize are coalesced into single
//! [`Token::Unexpected`] fragments instead of one error per character.

use logos::Logos;
use positron_core::Span;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"<<(?:[^>]|>[^>])*>>")]
pub enum Token<'src> {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token(".")]
    Dot,

    #[token("->")]
    Arrow,

    #[token("=")]
    Equals,

    #[regex(r"-?[0-9]+")]
    Int(&'src str),

    #[regex(r"[A-Z][A-Za-z0-9_]*")]
    UpperIdent(&'src str),

    #[regex(r"[a-z][A-Za-z0-9_]*")]
    LowerIdent(&'src str),

    Unexpected(&'src str),
}

/// Tokenize the source into spanned tokens, coalescing consecutive lexer
/// errors into single `Unexpected` fragments.
pub fn lex(source: &str) -> Vec<(Token<'_>, Span)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(token)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(garbage(source, start, lexer.span().start));
                }
                let span = lexer.span();
                tokens.push((token, Span::new(span.start, span.end)));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(garbage(source, start, source.len()));
                }
                break;
            }
        }
    }

    tokens
}

/// A coalesced error run, trimmed of the skipped whitespace that may have
/// been folded into it.
fn garbage(source: &str, start: usize, end: usize) -> (Token<'_>, Span) {
    let fragment = source[start..end].trim_end();
    (
        Token::Unexpected(fragment),
        Span::new(start, start + fragment.len()),
    )
}
