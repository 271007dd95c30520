//! Recursive descent parser for Folio.
//!
//! Produces flat AST using `ExprArena`. Three syntactic modes share one
//! parser:
//!
//! - **Markup** is scanned character by character (`grammar::markup`)
//! - **Code** is lexed into tokens on demand (`lexer`, `grammar::code`)
//! - **Math** is scanned character by character (`grammar::math`)
//!
//! `#` switches from markup or math into code for one embedded expression,
//! `[..]` switches from code into markup, and `$..$` switches into math.
//! The parser never fails: syntax errors are collected on the returned
//! [`Source`] and the tree contains a best-effort recovery.

mod error;
mod grammar;
mod lexer;
mod scanner;

pub use error::{error_code, to_diagnostic};
pub use lexer::{lex, Token, TokenKind};

use folio_ir::{
    ExprArena, ExprId, ExprKind, FileId, Source, Span, SyntaxError, SyntaxErrorKind, SyntaxMode,
};

use crate::scanner::Scanner;

/// Parse a markup document.
#[tracing::instrument(level = "debug", skip_all, fields(file = ?id))]
pub fn parse(text: &str, id: FileId) -> Source {
    parse_with_mode(text, id, SyntaxMode::Markup)
}

/// Parse a code snippet (a sequence of statements, as inside `{..}`).
pub fn parse_code(text: &str, id: FileId) -> Source {
    parse_with_mode(text, id, SyntaxMode::Code)
}

/// Parse math (the content of an equation, without the dollar signs).
pub fn parse_math(text: &str, id: FileId) -> Source {
    parse_with_mode(text, id, SyntaxMode::Math)
}

/// Parse text in the given syntactic mode.
pub fn parse_with_mode(text: &str, id: FileId, mode: SyntaxMode) -> Source {
    let mut parser = Parser::new(text, id);
    let root = match mode {
        SyntaxMode::Markup => parser.markup_root(),
        SyntaxMode::Code => parser.code_root(),
        SyntaxMode::Math => parser.math_root(),
    };
    tracing::debug!(
        nodes = parser.arena.len(),
        errors = parser.errors.len(),
        "parsed source"
    );
    Source::new(id, text, parser.arena, root, parser.errors)
}

/// How a newline in code mode affects the expression being parsed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum NewlineMode {
    /// Code embedded in markup or math: a newline ends the expression and
    /// postfix operators must be directly attached.
    Stop,
    /// A statement in a code block: a newline ends the expression.
    Contextual,
    /// Inside parentheses: newlines are trivia.
    Continue,
}

/// Parser state.
pub(crate) struct Parser<'s> {
    s: Scanner<'s>,
    file: FileId,
    arena: ExprArena,
    errors: Vec<SyntaxError>,
    /// The current code token; only meaningful in code mode.
    token: Token,
    /// End of the last consumed code token.
    prev_end: usize,
    newline_mode: NewlineMode,
}

impl<'s> Parser<'s> {
    fn new(text: &'s str, file: FileId) -> Self {
        Parser {
            s: Scanner::new(text),
            file,
            arena: ExprArena::new(),
            errors: Vec::new(),
            token: lex(text, 0),
            prev_end: 0,
            newline_mode: NewlineMode::Contextual,
        }
    }

    #[inline]
    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.file, to_u32(start), to_u32(end))
    }

    fn alloc(&mut self, kind: ExprKind, start: usize, end: usize) -> ExprId {
        let span = self.span(start, end);
        self.arena.alloc_expr(kind, span)
    }

    #[cold]
    fn error(&mut self, kind: SyntaxErrorKind, message: impl Into<String>, start: usize, end: usize) {
        let span = self.span(start, end);
        self.errors.push(SyntaxError::new(kind, message, span));
    }

    #[cold]
    fn error_with_hint(
        &mut self,
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        hint: impl Into<String>,
        start: usize,
        end: usize,
    ) {
        let span = self.span(start, end);
        self.errors
            .push(SyntaxError::new(kind, message, span).with_hint(hint));
    }

    // Code-mode token navigation.

    /// Start lexing code at the scanner position.
    fn enter_code(&mut self) {
        self.prev_end = self.s.cursor();
        self.token = lex(self.s.text(), self.prev_end);
    }

    /// Hand the position after the last consumed token back to the scanner.
    fn exit_code(&mut self) {
        self.s.jump(self.prev_end);
    }

    /// Re-lex the current token at `pos` (after a markup or math excursion).
    fn resync(&mut self, pos: usize) {
        self.prev_end = pos;
        self.token = lex(self.s.text(), pos);
    }

    #[inline]
    fn kind(&self) -> &TokenKind {
        &self.token.kind
    }

    #[inline]
    fn at(&self, kind: &TokenKind) -> bool {
        self.token.kind == *kind
    }

    /// The token after the current one.
    fn peek_next(&self) -> Token {
        lex(self.s.text(), self.token.end)
    }

    /// Consume the current token.
    fn bump(&mut self) -> Token {
        let next = lex(self.s.text(), self.token.end);
        self.prev_end = self.token.end;
        std::mem::replace(&mut self.token, next)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or record an "expected" error.
    fn expect(&mut self, kind: &TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let expected = kind.describe();
        let found = self.token.kind.describe();
        let (start, end) = (self.token.start, self.token.end);
        self.error(
            SyntaxErrorKind::UnexpectedToken,
            format!("expected {expected}, found {found}"),
            start,
            end,
        );
        false
    }

    /// Whether the current token cannot continue the expression being parsed.
    fn at_expr_end(&self) -> bool {
        if self.at(&TokenKind::End) {
            return true;
        }
        match self.newline_mode {
            NewlineMode::Continue => false,
            NewlineMode::Stop | NewlineMode::Contextual => self.token.newline_before,
        }
    }

    /// Whether a postfix operator at the current token is attached.
    fn postfix_attached(&self) -> bool {
        !self.token.space_before
    }

    /// Run `f` under a different newline mode.
    fn with_mode<T>(&mut self, mode: NewlineMode, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = std::mem::replace(&mut self.newline_mode, mode);
        let out = f(self);
        self.newline_mode = prev;
        out
    }

    // Roots.

    fn markup_root(&mut self) -> ExprId {
        let root = self.markup(grammar::Stops::default(), true);
        self.trailing_garbage("markup");
        root
    }

    fn code_root(&mut self) -> ExprId {
        self.enter_code();
        let root = self.with_mode(NewlineMode::Contextual, |p| {
            let start = p.token.start;
            let exprs = p.code_statements(&TokenKind::End);
            let range = p.arena.alloc_expr_list(exprs);
            let end = p.prev_end;
            p.alloc(ExprKind::CodeBlock(range), start, end)
        });
        self.exit_code();
        root
    }

    fn math_root(&mut self) -> ExprId {
        let root = self.math_sequence(grammar::MathStops::TOP);
        self.trailing_garbage("math");
        root
    }

    fn trailing_garbage(&mut self, mode: &str) {
        if !self.s.done() {
            let start = self.s.cursor();
            let end = self.s.text().len();
            self.error(
                SyntaxErrorKind::UnexpectedToken,
                format!("unexpected text after {mode}"),
                start,
                end,
            );
        }
    }
}

fn to_u32(pos: usize) -> u32 {
    u32::try_from(pos).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap parse results")]
mod tests;
