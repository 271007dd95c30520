//! Expression arena.
//!
//! One arena holds every node of one parsed file. The evaluator never
//! mutates an arena; closures keep theirs alive through [`SharedArena`] so
//! a function defined in an imported module can still be called after the
//! module's evaluation finished.

use std::ops::Deref;
use std::sync::Arc;

use crate::ast::{
    Arg, ArgRange, ArrayItem, ArrayItemRange, ClosureDef, ClosureId, DictItem, DictItemRange,
    Expr, ExprId, ExprKind, ExprRange, ImportItem, ImportItemRange, Param, ParamRange, Pattern,
    PatternId, PatternItem, PatternItemRange,
};
use crate::Span;

/// Contiguous storage for all AST nodes of one file.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    args: Vec<Arg>,
    array_items: Vec<ArrayItem>,
    dict_items: Vec<DictItem>,
    params: Vec<Param>,
    patterns: Vec<Pattern>,
    pattern_items: Vec<PatternItem>,
    closures: Vec<ClosureDef>,
    import_items: Vec<ImportItem>,
}

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("arena exceeded {} nodes", u32::MAX))
}

/// Append a slice to a side table and return its range.
macro_rules! alloc_list {
    ($self:ident, $field:ident, $items:expr, $range:ident) => {{
        let start = next_index($self.$field.len());
        $self.$field.extend($items);
        let len = next_index($self.$field.len()) - start;
        $range::new(start, len)
    }};
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of expressions in the arena.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Allocate an expression.
    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(Expr::new(kind, span));
        id
    }

    /// Look up an expression.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// The kind of an expression.
    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.index()].kind
    }

    /// The span of an expression.
    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    pub fn alloc_expr_list(&mut self, items: impl IntoIterator<Item = ExprId>) -> ExprRange {
        alloc_list!(self, expr_lists, items, ExprRange)
    }

    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    pub fn alloc_args(&mut self, items: impl IntoIterator<Item = Arg>) -> ArgRange {
        alloc_list!(self, args, items, ArgRange)
    }

    pub fn args(&self, range: ArgRange) -> &[Arg] {
        &self.args[range.to_range()]
    }

    pub fn alloc_array_items(
        &mut self,
        items: impl IntoIterator<Item = ArrayItem>,
    ) -> ArrayItemRange {
        alloc_list!(self, array_items, items, ArrayItemRange)
    }

    pub fn array_items(&self, range: ArrayItemRange) -> &[ArrayItem] {
        &self.array_items[range.to_range()]
    }

    pub fn alloc_dict_items(&mut self, items: impl IntoIterator<Item = DictItem>) -> DictItemRange {
        alloc_list!(self, dict_items, items, DictItemRange)
    }

    pub fn dict_items(&self, range: DictItemRange) -> &[DictItem] {
        &self.dict_items[range.to_range()]
    }

    pub fn alloc_params(&mut self, items: impl IntoIterator<Item = Param>) -> ParamRange {
        alloc_list!(self, params, items, ParamRange)
    }

    pub fn params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.to_range()]
    }

    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = PatternId::new(next_index(self.patterns.len()));
        self.patterns.push(pattern);
        id
    }

    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    pub fn alloc_pattern_items(
        &mut self,
        items: impl IntoIterator<Item = PatternItem>,
    ) -> PatternItemRange {
        alloc_list!(self, pattern_items, items, PatternItemRange)
    }

    pub fn pattern_items(&self, range: PatternItemRange) -> &[PatternItem] {
        &self.pattern_items[range.to_range()]
    }

    pub fn alloc_closure(&mut self, closure: ClosureDef) -> ClosureId {
        let id = ClosureId::new(next_index(self.closures.len()));
        self.closures.push(closure);
        id
    }

    pub fn closure(&self, id: ClosureId) -> &ClosureDef {
        &self.closures[id.index()]
    }

    pub fn alloc_import_items(
        &mut self,
        items: impl IntoIterator<Item = ImportItem>,
    ) -> ImportItemRange {
        alloc_list!(self, import_items, items, ImportItemRange)
    }

    pub fn import_items(&self, range: ImportItemRange) -> &[ImportItem] {
        &self.import_items[range.to_range()]
    }
}

/// Reference-counted, immutable arena shared by a source and its closures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }

    /// Whether two handles point at the same arena.
    pub fn ptr_eq(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &ExprArena {
        &self.0
    }
}
