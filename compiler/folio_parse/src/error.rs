//! Conversion of syntax errors into diagnostics.

use folio_diagnostic::{Diagnostic, ErrorCode};
use folio_ir::{SyntaxError, SyntaxErrorKind};

/// The diagnostic code for a kind of syntax error.
pub fn error_code(kind: SyntaxErrorKind) -> ErrorCode {
    match kind {
        SyntaxErrorKind::UnexpectedToken => ErrorCode::E1001,
        SyntaxErrorKind::ExpectedExpression => ErrorCode::E1002,
        SyntaxErrorKind::UnclosedDelimiter => ErrorCode::E1003,
        SyntaxErrorKind::InvalidLiteral => ErrorCode::E1004,
        SyntaxErrorKind::Unterminated => ErrorCode::E1005,
    }
}

/// Convert a syntax error into a renderable diagnostic.
pub fn to_diagnostic(error: &SyntaxError) -> Diagnostic {
    let label = match error.kind {
        SyntaxErrorKind::UnclosedDelimiter => "unclosed",
        SyntaxErrorKind::Unterminated => "unterminated",
        SyntaxErrorKind::InvalidLiteral => "invalid literal",
        SyntaxErrorKind::UnexpectedToken | SyntaxErrorKind::ExpectedExpression => "here",
    };
    error.hints.iter().fold(
        Diagnostic::error(error_code(error.kind))
            .with_message(error.message.clone())
            .with_label(error.span, label),
        |diag, hint| diag.with_hint(hint.clone()),
    )
}
