//! Stack growth for deeply nested documents.
//!
//! The parser, the evaluator and the realization engine all recurse along
//! the shape of the document: nested content blocks, nested calls, show
//! rules that produce content which is realized again. A user can nest
//! these arbitrarily deep, so every recursive entry point runs its body
//! through [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate moves execution onto a freshly
//! allocated segment once the remaining stack drops below [`RED_ZONE`].
//! On `wasm32` the body runs directly.
//!
//! Stack growth only prevents crashes. Language-level limits (call depth,
//! show-rule depth, loop iterations) are enforced by the evaluator itself.

/// Remaining stack below which a new segment is allocated (128 KiB).
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2 MiB).
pub const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than [`RED_ZONE`] remains.
///
/// ```text
/// fn eval_expr(&mut self, id: ExprId) -> SourceResult<Value> {
///     ensure_sufficient_stack(|| self.eval_expr_inner(id))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

/// Run `f` directly; wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
