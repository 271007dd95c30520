//! Diagnostic system for rich error reporting.
//!
//! - Error codes for searchability (`E6002`) and slugs for warnings
//!   (`dangling-label`)
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Secondary labels (call-site trace points)
//! - Hints (how to fix)
//!
//! The parser and the evaluator both produce [`Diagnostic`]s; the driver
//! collects them in a [`queue::DiagnosticQueue`] and renders them with an
//! [`emitter::TerminalEmitter`].

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{
    expected_expression, unclosed_delimiter, unexpected_token, Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
