//! Error codes for all diagnostics.
//!
//! Each code is a unique identifier (e.g., `E6001`) whose first digit names
//! the phase that raised it. Every code also has a kebab-case slug used in
//! warning output and for suppression lists.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: letter + four digits, where the letter is `E` for errors and `W`
/// for warnings, and the first digit indicates the phase:
/// - E1xxx: Syntax errors
/// - E6xxx: Evaluation errors
/// - W6xxx: Evaluation warnings
/// - E9xxx: Driver errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Syntax Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Invalid literal (number, escape, unit)
    E1004,
    /// Unterminated string, raw block or comment
    E1005,

    // Evaluation Errors (E6xxx)
    /// Operand or argument of the wrong type
    E6001,
    /// Unknown variable
    E6002,
    /// Unknown field or method
    E6003,
    /// Missing argument
    E6004,
    /// Unexpected argument
    E6005,
    /// Value is not callable
    E6006,
    /// Division by zero
    E6007,
    /// Loop that can never terminate
    E6008,
    /// Loop exceeded the iteration cap
    E6009,
    /// `break`, `continue` or `return` in the wrong place
    E6010,
    /// Realization or call depth exceeded
    E6011,
    /// File not found
    E6012,
    /// File could not be read
    E6013,
    /// File could not be parsed
    E6014,
    /// Package not found
    E6015,
    /// Built-in constructor rejected its arguments
    E6016,
    /// Duplicate definition in one scope
    E6017,
    /// Invalid show rule
    E6018,
    /// Assignment to a captured variable
    E6019,
    /// Index out of bounds
    E6020,
    /// Dictionary key not found
    E6021,
    /// Cyclic import
    E6022,
    /// Assertion failed
    E6023,
    /// Explicit panic
    E6024,
    /// Integer overflow
    E6025,
    /// Other evaluation error
    E6099,

    // Evaluation Warnings (W6xxx)
    /// Strong emphasis without content
    W6001,
    /// Emphasis without content
    W6002,
    /// Label that attaches to nothing
    W6003,
    /// Second label on the same element
    W6004,
    /// Style rule that has no effect in content context
    W6005,
    /// Content discarded by an unconditional return
    W6006,

    // Driver Errors (E9xxx)
    /// Too many errors
    E9001,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6008,
        ErrorCode::E6009,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6012,
        ErrorCode::E6013,
        ErrorCode::E6014,
        ErrorCode::E6015,
        ErrorCode::E6016,
        ErrorCode::E6017,
        ErrorCode::E6018,
        ErrorCode::E6019,
        ErrorCode::E6020,
        ErrorCode::E6021,
        ErrorCode::E6022,
        ErrorCode::E6023,
        ErrorCode::E6024,
        ErrorCode::E6025,
        ErrorCode::E6099,
        ErrorCode::W6001,
        ErrorCode::W6002,
        ErrorCode::W6003,
        ErrorCode::W6004,
        ErrorCode::W6005,
        ErrorCode::W6006,
        ErrorCode::E9001,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E6014 => "E6014",
            ErrorCode::E6015 => "E6015",
            ErrorCode::E6016 => "E6016",
            ErrorCode::E6017 => "E6017",
            ErrorCode::E6018 => "E6018",
            ErrorCode::E6019 => "E6019",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6021 => "E6021",
            ErrorCode::E6022 => "E6022",
            ErrorCode::E6023 => "E6023",
            ErrorCode::E6024 => "E6024",
            ErrorCode::E6025 => "E6025",
            ErrorCode::E6099 => "E6099",
            ErrorCode::W6001 => "W6001",
            ErrorCode::W6002 => "W6002",
            ErrorCode::W6003 => "W6003",
            ErrorCode::W6004 => "W6004",
            ErrorCode::W6005 => "W6005",
            ErrorCode::W6006 => "W6006",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// The kebab-case name of this code.
    pub fn slug(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unexpected-token",
            ErrorCode::E1002 => "expected-expression",
            ErrorCode::E1003 => "unclosed-delimiter",
            ErrorCode::E1004 => "invalid-literal",
            ErrorCode::E1005 => "unterminated",
            ErrorCode::E6001 => "type-mismatch",
            ErrorCode::E6002 => "unknown-variable",
            ErrorCode::E6003 => "unknown-field",
            ErrorCode::E6004 => "missing-argument",
            ErrorCode::E6005 => "unexpected-argument",
            ErrorCode::E6006 => "not-callable",
            ErrorCode::E6007 => "division-by-zero",
            ErrorCode::E6008 => "infinite-loop",
            ErrorCode::E6009 => "iteration-cap",
            ErrorCode::E6010 => "forbidden-flow",
            ErrorCode::E6011 => "recursion-limit",
            ErrorCode::E6012 => "file-not-found",
            ErrorCode::E6013 => "file-read-error",
            ErrorCode::E6014 => "file-parse-error",
            ErrorCode::E6015 => "package-not-found",
            ErrorCode::E6016 => "constructor-error",
            ErrorCode::E6017 => "redefinition",
            ErrorCode::E6018 => "show-rule-error",
            ErrorCode::E6019 => "captured-mutation",
            ErrorCode::E6020 => "index-out-of-bounds",
            ErrorCode::E6021 => "key-not-found",
            ErrorCode::E6022 => "cyclic-import",
            ErrorCode::E6023 => "assertion-failed",
            ErrorCode::E6024 => "panic",
            ErrorCode::E6025 => "integer-overflow",
            ErrorCode::E6099 => "eval-error",
            ErrorCode::W6001 => "empty-strong-body",
            ErrorCode::W6002 => "empty-emph-body",
            ErrorCode::W6003 => "dangling-label",
            ErrorCode::W6004 => "double-label",
            ErrorCode::W6005 => "ignored-style-in-content-context",
            ErrorCode::W6006 => "discarded-content-before-return",
            ErrorCode::E9001 => "too-many-errors",
        }
    }

    /// Look up a code by its slug.
    pub fn from_slug(slug: &str) -> Option<ErrorCode> {
        Self::ALL.iter().copied().find(|code| code.slug() == slug)
    }

    /// Check if this is a syntax error code.
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an evaluation error code.
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// Check if this is a warning code.
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
