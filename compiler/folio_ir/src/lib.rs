//! Folio IR - syntax data shared by the parser and the evaluator.
//!
//! This crate contains the core data structures of the Folio front end:
//! - Spans for source locations (file + byte range)
//! - File identities, virtual paths and package specifications
//! - Names for interned identifiers, labels and literal text
//! - The arena AST covering markup, code and math
//! - Parsed `Source` files as handed out by a world
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and literal text become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Share Arenas**: closures keep their defining arena alive through `SharedArena`
//!
//! Types that contain floats store them as u64 bits so `ExprKind` stays `Copy + Eq`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod file;
mod name;
mod source;
mod span;
pub mod visitor;

pub use arena::{ExprArena, SharedArena};
pub use ast::{
    Arg, ArgRange, ArrayItem, ArrayItemRange, BinaryOp, ClosureDef, ClosureId, DictItem,
    DictItemRange, Expr, ExprId, ExprKind, ExprRange, ImportItem, ImportItemRange, Imports,
    LetKind, Param, ParamRange, Pattern, PatternId, PatternItem, PatternItemRange, PatternKind,
    UnaryOp, Unit,
};
pub use file::{
    is_id_continue, is_id_start, is_ident, FileId, PackageSpec, PackageVersion, VirtualPath,
};
pub use name::Name;
pub use source::{Source, SyntaxError, SyntaxErrorKind, SyntaxMode};
pub use span::{Span, Spanned};
