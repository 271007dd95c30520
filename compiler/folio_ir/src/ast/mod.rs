//! Flat AST types using arena allocation.
//!
//! - No `Box<Expr>`, use `ExprId(u32)` indices
//! - Contiguous arrays for cache locality
//! - Every node is `Copy`; text lives in the global name table
//!
//! # Module Structure
//!
//! - `expr`: Core expression types (`Expr`, `ExprKind`, `ExprId`)
//! - `operators`: Unary/binary operators and numeric units
//! - `items`: Arguments, collection items, parameters, patterns, imports
//! - `ranges`: Arena range types for efficient iteration

mod expr;
mod items;
mod operators;
mod ranges;

pub use expr::{Expr, ExprId, ExprKind};
pub use items::{
    Arg, ArrayItem, ClosureDef, ClosureId, DictItem, ImportItem, Imports, LetKind, Param, Pattern,
    PatternId, PatternItem, PatternKind,
};
pub use operators::{Assoc, BinaryOp, UnaryOp, Unit};
pub use ranges::{
    ArgRange, ArrayItemRange, DictItemRange, ExprRange, ImportItemRange, ParamRange,
    PatternItemRange,
};

#[cfg(test)]
mod tests;
