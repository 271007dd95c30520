//! Evaluation errors.
//!
//! Every runtime failure is an [`EvalError`]: a structured [`EvalErrorKind`],
//! the rendered message, the span it points at, optional hints, and the
//! call-site trace accumulated while the error propagated out of closures,
//! imports and show rules.
//!
//! Errors are created by the `#[cold]` factory functions in this module and
//! get their span attached by the evaluator through [`At::at`], which keeps
//! a span that was already set closer to the fault. Control flow (`break`,
//! `continue`, `return`) is never an error; it travels in the Vm's flow slot.

use std::fmt;

use folio_diagnostic::{Diagnostic, ErrorCode};
use folio_ir::{Span, Spanned};

/// Result type of every fallible evaluator operation.
pub type SourceResult<T> = Result<T, EvalError>;

/// The kind of a non-local control-flow event.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FlowKind {
    Break,
    Continue,
    Return,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowKind::Break => "break",
            FlowKind::Continue => "continue",
            FlowKind::Return => "return",
        })
    }
}

/// An argument told apart by its name or its position among the
/// positional arguments.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArgSlot {
    Named(String),
    Positional(usize),
}

/// Structured error category.
///
/// Each kind maps to exactly one `E6xxx` diagnostic code.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum EvalErrorKind {
    // Types
    TypeMismatch { expected: String, got: String },
    NotCallable { got: String },

    // Names
    UnknownVariable { name: String },
    UnknownField { name: String, ty: String },
    Redefinition { name: String },
    CapturedMutation { name: String },

    // Arguments
    MissingArgument { name: String },
    UnexpectedArgument { slot: ArgSlot },
    ConstructorError { message: String },

    // Arithmetic
    DivisionByZero,
    IntegerOverflow,

    // Access
    IndexOutOfBounds { index: i64, len: usize },
    KeyNotFound { key: String },

    // Control flow and limits
    InfiniteLoop,
    IterationCap { limit: usize },
    ForbiddenFlow { kind: FlowKind },
    RecursionLimit { what: &'static str, limit: usize },

    // Files and packages
    FileNotFound { path: String },
    FileReadError { path: String, message: String },
    FileParseError { format: String, message: String },
    PackageNotFound { spec: String },
    CyclicImport { path: String },

    // Rules
    ShowRuleError { message: String },

    // Raised by user code
    AssertionFailed { message: String },
    Panic { message: String },

    Custom { message: String },
}

impl EvalErrorKind {
    /// The diagnostic code for this kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::TypeMismatch { .. } => ErrorCode::E6001,
            EvalErrorKind::UnknownVariable { .. } => ErrorCode::E6002,
            EvalErrorKind::UnknownField { .. } => ErrorCode::E6003,
            EvalErrorKind::MissingArgument { .. } => ErrorCode::E6004,
            EvalErrorKind::UnexpectedArgument { .. } => ErrorCode::E6005,
            EvalErrorKind::NotCallable { .. } => ErrorCode::E6006,
            EvalErrorKind::DivisionByZero => ErrorCode::E6007,
            EvalErrorKind::InfiniteLoop => ErrorCode::E6008,
            EvalErrorKind::IterationCap { .. } => ErrorCode::E6009,
            EvalErrorKind::ForbiddenFlow { .. } => ErrorCode::E6010,
            EvalErrorKind::RecursionLimit { .. } => ErrorCode::E6011,
            EvalErrorKind::FileNotFound { .. } => ErrorCode::E6012,
            EvalErrorKind::FileReadError { .. } => ErrorCode::E6013,
            EvalErrorKind::FileParseError { .. } => ErrorCode::E6014,
            EvalErrorKind::PackageNotFound { .. } => ErrorCode::E6015,
            EvalErrorKind::ConstructorError { .. } => ErrorCode::E6016,
            EvalErrorKind::Redefinition { .. } => ErrorCode::E6017,
            EvalErrorKind::ShowRuleError { .. } => ErrorCode::E6018,
            EvalErrorKind::CapturedMutation { .. } => ErrorCode::E6019,
            EvalErrorKind::IndexOutOfBounds { .. } => ErrorCode::E6020,
            EvalErrorKind::KeyNotFound { .. } => ErrorCode::E6021,
            EvalErrorKind::CyclicImport { .. } => ErrorCode::E6022,
            EvalErrorKind::AssertionFailed { .. } => ErrorCode::E6023,
            EvalErrorKind::Panic { .. } => ErrorCode::E6024,
            EvalErrorKind::IntegerOverflow => ErrorCode::E6025,
            EvalErrorKind::Custom { .. } => ErrorCode::E6099,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::TypeMismatch { expected, got } => {
                write!(f, "expected {expected}, found {got}")
            }
            EvalErrorKind::NotCallable { got } => write!(f, "expected function, found {got}"),
            EvalErrorKind::UnknownVariable { name } => write!(f, "unknown variable: {name}"),
            EvalErrorKind::UnknownField { name, ty } => {
                write!(f, "{ty} does not have field \"{name}\"")
            }
            EvalErrorKind::Redefinition { name } => {
                write!(f, "`{name}` is already defined in this scope")
            }
            EvalErrorKind::CapturedMutation { name } => write!(
                f,
                "variables from outside the function are read-only and cannot be modified: {name}"
            ),
            EvalErrorKind::MissingArgument { name } => write!(f, "missing argument: {name}"),
            EvalErrorKind::UnexpectedArgument { slot } => match slot {
                ArgSlot::Named(name) => write!(f, "unexpected argument: {name}"),
                ArgSlot::Positional(index) => {
                    write!(f, "unexpected positional argument at index {index}")
                }
            },
            EvalErrorKind::ConstructorError { message }
            | EvalErrorKind::ShowRuleError { message }
            | EvalErrorKind::AssertionFailed { message }
            | EvalErrorKind::Custom { message } => f.write_str(message),
            EvalErrorKind::DivisionByZero => write!(f, "cannot divide by zero"),
            EvalErrorKind::IntegerOverflow => write!(f, "value is too large"),
            EvalErrorKind::IndexOutOfBounds { index, len } => {
                write!(f, "index out of bounds (index: {index}, len: {len})")
            }
            EvalErrorKind::KeyNotFound { key } => {
                write!(f, "dictionary does not contain key \"{key}\"")
            }
            EvalErrorKind::InfiniteLoop => write!(f, "condition is always true"),
            EvalErrorKind::IterationCap { limit } => {
                write!(f, "loop seems to be infinite (exceeded {limit} iterations)")
            }
            EvalErrorKind::ForbiddenFlow { kind } => match kind {
                FlowKind::Break => write!(f, "cannot break outside of loop"),
                FlowKind::Continue => write!(f, "cannot continue outside of loop"),
                FlowKind::Return => write!(f, "cannot return outside of function"),
            },
            EvalErrorKind::RecursionLimit { what, limit } => {
                write!(f, "maximum {what} depth exceeded ({limit})")
            }
            EvalErrorKind::FileNotFound { path } => {
                write!(f, "file not found (searched at {path})")
            }
            EvalErrorKind::FileReadError { path, message } => {
                write!(f, "failed to read {path}: {message}")
            }
            EvalErrorKind::FileParseError { format, message } => {
                write!(f, "failed to parse {format}: {message}")
            }
            EvalErrorKind::PackageNotFound { spec } => write!(f, "package not found: {spec}"),
            EvalErrorKind::CyclicImport { path } => write!(f, "cyclic import of {path}"),
            EvalErrorKind::Panic { message } => write!(f, "panicked with: {message}"),
        }
    }
}

/// A call-site note appended while an error propagates outward.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Tracepoint {
    /// A closure call, with the function name if it has one.
    Call(Option<String>),
    /// A module import or include.
    Import,
    /// A show rule applied to an element of the given kind.
    Show(String),
}

impl fmt::Display for Tracepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracepoint::Call(Some(name)) => {
                write!(f, "error occurred in this call of function `{name}`")
            }
            Tracepoint::Call(None) => write!(f, "error occurred in this function call"),
            Tracepoint::Import => write!(f, "error occurred while importing this module"),
            Tracepoint::Show(name) => {
                write!(f, "error occurred while applying show rule to this {name}")
            }
        }
    }
}

/// Evaluation error.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EvalError {
    /// Structured error category; selects the diagnostic code.
    pub kind: EvalErrorKind,
    /// Human-readable message. Equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Where the error occurred; detached until the evaluator attaches one.
    pub span: Span,
    /// Suggestions for fixing the error.
    pub hints: Vec<String>,
    /// Call sites the error propagated through, innermost first.
    pub trace: Vec<Spanned<Tracepoint>>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the specific factory functions.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: Span::detached(),
            hints: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Attach a source span, replacing any existing one.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Attach `span` only if no span was set yet.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_detached() {
            self.span = span;
        }
        self
    }

    /// Add a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// The diagnostic code of this error.
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.message.clone());
        if !self.span.is_detached() {
            diag = diag.with_label(self.span, "");
        }
        for point in &self.trace {
            diag = diag.with_secondary_label(point.span, point.v.to_string());
        }
        for hint in &self.hints {
            diag = diag.with_hint(hint.clone());
        }
        diag
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

/// Attach a span to the error of a result.
pub trait At<T> {
    /// Set the error span unless one closer to the fault is already set.
    fn at(self, span: Span) -> SourceResult<T>;
}

impl<T> At<T> for Result<T, EvalError> {
    fn at(self, span: Span) -> SourceResult<T> {
        self.map_err(|error| error.or_span(span))
    }
}

impl<T> At<T> for Result<T, String> {
    fn at(self, span: Span) -> SourceResult<T> {
        self.map_err(|message| EvalError::new(message).with_span(span))
    }
}

/// Append a call-site trace point to the error of a result.
pub trait Trace<T> {
    fn trace(self, point: impl FnOnce() -> Tracepoint, span: Span) -> Self;
}

impl<T> Trace<T> for SourceResult<T> {
    fn trace(self, point: impl FnOnce() -> Tracepoint, span: Span) -> Self {
        self.map_err(|mut error| {
            let inside = error.span.id() == span.id()
                && span.start <= error.span.start
                && error.span.end <= span.end;
            if !span.is_detached() && !inside {
                error.trace.push(Spanned::new(point(), span));
            }
            error
        })
    }
}

// Types

/// A value of the wrong type.
#[cold]
pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.into(),
    })
}

/// A binary operator applied to operand types it does not support:
/// `cannot add integer and string`.
#[cold]
pub fn operand_mismatch(verb: &str, lhs: &str, rhs: &str) -> EvalError {
    let mut error = type_mismatch(lhs, rhs);
    error.message = format!("cannot {verb} {lhs} and {rhs}");
    error
}

/// A unary operator applied to an unsupported type.
#[cold]
pub fn unary_mismatch(op: &str, ty: &str) -> EvalError {
    let mut error = type_mismatch(format!("operand of '{op}'"), ty);
    error.message = format!("cannot apply '{op}' to {ty}");
    error
}

/// Calling something that is not a function or type.
#[cold]
pub fn not_callable(got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        got: got.to_string(),
    })
}

// Names

#[cold]
pub fn unknown_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_field(ty: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownField {
        name: name.to_string(),
        ty: ty.to_string(),
    })
}

/// A method call on a type without that method.
#[cold]
pub fn unknown_method(ty: &str, name: &str) -> EvalError {
    let mut error = unknown_field(ty, name);
    error.message = format!("type {ty} has no method `{name}`");
    error
}

#[cold]
pub fn redefinition(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Redefinition {
        name: name.to_string(),
    })
    .with_hint("shadowing is only allowed in a nested block")
}

#[cold]
pub fn captured_mutation(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CapturedMutation {
        name: name.to_string(),
    })
}

/// Assignment to a binding of the standard library.
#[cold]
pub fn constant_mutation(name: &str) -> EvalError {
    EvalError::new(format!("cannot mutate a constant: {name}"))
}

// Arguments

#[cold]
pub fn missing_argument(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingArgument {
        name: name.to_string(),
    })
}

/// `what` names the argument, or is empty for a positional one.
#[cold]
pub fn unexpected_argument(slot: ArgSlot) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnexpectedArgument { slot })
}

#[cold]
pub fn constructor_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstructorError {
        message: message.into(),
    })
}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow)
}

// Access

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

// Control flow and limits

#[cold]
pub fn infinite_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InfiniteLoop)
}

#[cold]
pub fn iteration_cap(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IterationCap { limit })
}

#[cold]
pub fn forbidden_flow(kind: FlowKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ForbiddenFlow { kind })
}

/// `what` is the guarded recursion: `"show rule"` or `"function call"`.
#[cold]
pub fn recursion_limit(what: &'static str, limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { what, limit })
}

// Files and packages

#[cold]
pub fn file_not_found(path: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FileNotFound {
        path: path.to_string(),
    })
}

#[cold]
pub fn file_read_error(path: impl fmt::Display, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FileReadError {
        path: path.to_string(),
        message: message.into(),
    })
}

#[cold]
pub fn file_parse_error(format: &str, message: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FileParseError {
        format: format.to_string(),
        message: message.to_string(),
    })
}

#[cold]
pub fn package_not_found(spec: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PackageNotFound {
        spec: spec.to_string(),
    })
}

#[cold]
pub fn cyclic_import(path: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CyclicImport {
        path: path.to_string(),
    })
}

// Rules

#[cold]
pub fn show_rule_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ShowRuleError {
        message: message.into(),
    })
}

// Raised by user code

#[cold]
pub fn assertion_failed(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed {
        message: message.into(),
    })
}

#[cold]
pub fn panic(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Panic {
        message: message.into(),
    })
}

// Warnings

/// Build a warning diagnostic pointing at `span`.
#[cold]
pub fn warning(code: ErrorCode, span: Span, message: impl Into<String>) -> Diagnostic {
    let diag = Diagnostic::warning(code).with_message(message);
    if span.is_detached() {
        diag
    } else {
        diag.with_label(span, "")
    }
}

#[cfg(test)]
mod tests;
