//! Parsed source files.

use std::fmt;
use std::sync::Arc;

use crate::{ExprArena, ExprId, FileId, SharedArena, Span};

/// The syntactic mode a piece of text is parsed in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SyntaxMode {
    Markup,
    Code,
    Math,
}

/// The category of a syntax error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SyntaxErrorKind {
    /// A token that does not fit the grammar at this point.
    UnexpectedToken,
    /// An expression was required but something else was found.
    ExpectedExpression,
    /// An opening delimiter without its closing counterpart.
    UnclosedDelimiter,
    /// A malformed number, escape sequence or unit.
    InvalidLiteral,
    /// A string, raw block or block comment that runs to the end of input.
    Unterminated,
}

/// A syntax error found while parsing.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub span: Span,
    pub hints: Vec<String>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, message: impl Into<String>, span: Span) -> Self {
        SyntaxError {
            kind,
            message: message.into(),
            span,
            hints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A parsed source file: text, arena, root node and syntax errors.
///
/// Cheap to clone; the text and arena are reference counted.
#[derive(Clone, Debug)]
pub struct Source {
    id: FileId,
    text: Arc<str>,
    arena: SharedArena,
    root: ExprId,
    errors: Arc<[SyntaxError]>,
    lines: Arc<[u32]>,
}

impl Source {
    /// Assemble a source from parser output.
    pub fn new(
        id: FileId,
        text: impl Into<Arc<str>>,
        arena: ExprArena,
        root: ExprId,
        errors: Vec<SyntaxError>,
    ) -> Self {
        let text = text.into();
        let lines = line_starts(&text);
        Source {
            id,
            text,
            arena: SharedArena::new(arena),
            root,
            errors: errors.into(),
            lines: lines.into(),
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    /// The root node: a markup list, or a math list for math sources.
    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// The text covered by a span, if it lies in this file.
    pub fn get(&self, span: Span) -> Option<&str> {
        if span.id() != Some(self.id) {
            return None;
        }
        self.text.get(span.to_range())
    }

    /// Zero-based line index of a byte offset.
    pub fn byte_to_line(&self, offset: u32) -> usize {
        match self.lines.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Zero-based column (in characters) of a byte offset.
    pub fn byte_to_column(&self, offset: u32) -> usize {
        let line = self.byte_to_line(offset);
        let start = self.lines.get(line).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(self.text.len());
        self.text.get(start..end).map_or(0, |s| s.chars().count())
    }

    /// The text of a zero-based line, without its newline.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.lines.get(line)? as usize;
        let end = self
            .lines
            .get(line + 1)
            .map_or(self.text.len(), |&next| next as usize);
        self.text
            .get(start..end)
            .map(|s| s.trim_end_matches(['\n', '\r']))
    }
}

fn line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    for (i, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
        }
    }
    starts
}

#[cfg(test)]
mod tests;
