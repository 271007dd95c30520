//! Evaluator tests.
//!
//! - `code`: operators, bindings, mutation, loops and flow
//! - `closures`: parameters, capture, recursion and returns
//! - `markup`: elements, labels and markup warnings
//! - `modules`: imports, includes and packages
//! - `math`: equations and math lookup

mod closures;
mod modules;

use folio_diagnostic::ErrorCode;

use crate::errors::{EvalErrorKind, SourceResult};
use crate::value::{Array, Value};

fn ints(values: &[i64]) -> Value {
    Value::Array(values.iter().map(|&v| Value::Int(v)).collect::<Array>())
}

fn kind_of<T>(result: SourceResult<T>) -> Option<EvalErrorKind> {
    result.err().map(|error| error.kind)
}

fn codes(warnings: &[folio_diagnostic::Diagnostic]) -> Vec<ErrorCode> {
    warnings.iter().map(|warning| warning.code).collect()
}
