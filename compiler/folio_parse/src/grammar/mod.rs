//! Grammar productions, split by syntactic mode.
//!
//! Each submodule adds methods to [`Parser`](crate::Parser):
//! - `markup`: text, emphasis, headings, lists, raw, links, labels
//! - `code`: expressions, operators and statements
//! - `patterns`: collections, arguments, closure parameters and patterns
//! - `math`: equations, attachments, fractions and math calls

mod code;
mod markup;
mod math;
mod patterns;

pub(crate) use markup::Stops;
pub(crate) use math::MathStops;
