//! Parenthesized constructs: collections, call arguments, closure
//! parameters and binding patterns.
//!
//! Inside parentheses newlines are trivia, so every production here runs
//! under [`NewlineMode::Continue`].

use folio_ir::{
    Arg, ArgRange, ArrayItem, DictItem, ExprId, ExprKind, Name, Param, ParamRange, Pattern,
    PatternId, PatternItem, PatternKind, SyntaxErrorKind,
};

use crate::lexer::TokenKind;
use crate::{NewlineMode, Parser};

/// One item of a parenthesized collection before it is known whether the
/// collection is an array or a dictionary.
enum CollectionItem {
    Pos(ExprId),
    Named { name: Name, expr: ExprId, start: usize, end: usize },
    Keyed { key: ExprId, expr: ExprId, start: usize, end: usize },
    Spread { expr: ExprId, start: usize, end: usize },
}

impl Parser<'_> {
    /// `()`, `(:)`, `(x)`, `(x,)`, `(a: 1, ..b)`.
    pub(crate) fn collection(&mut self) -> ExprId {
        let start = self.token.start;
        let (items, trailing_comma) = self.with_mode(NewlineMode::Continue, |p| {
            p.bump();
            let mut items = Vec::new();
            let mut trailing_comma = false;

            if p.at(&TokenKind::Colon) && p.peek_next().kind == TokenKind::RParen {
                p.bump();
                p.bump();
                return (None, false);
            }

            while !p.at(&TokenKind::RParen) && !p.at(&TokenKind::End) {
                items.push(p.collection_item());
                trailing_comma = p.eat(&TokenKind::Comma);
                if !trailing_comma {
                    break;
                }
            }
            p.expect_closing(&TokenKind::RParen, start);
            (Some(items), trailing_comma)
        });
        let end = self.prev_end;

        let Some(items) = items else {
            let range = self.arena.alloc_dict_items([]);
            return self.alloc(ExprKind::Dict(range), start, end);
        };

        if let [CollectionItem::Pos(inner)] = items.as_slice() {
            if !trailing_comma {
                return self.alloc(ExprKind::Parenthesized(*inner), start, end);
            }
        }

        let is_dict = items.iter().any(|item| {
            matches!(
                item,
                CollectionItem::Named { .. } | CollectionItem::Keyed { .. }
            )
        });

        if is_dict {
            let mut dict = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    CollectionItem::Named {
                        name,
                        expr,
                        start,
                        end,
                    } => dict.push(DictItem::Named {
                        name,
                        expr,
                        span: self.span(start, end),
                    }),
                    CollectionItem::Keyed {
                        key,
                        expr,
                        start,
                        end,
                    } => dict.push(DictItem::Keyed {
                        key,
                        expr,
                        span: self.span(start, end),
                    }),
                    CollectionItem::Spread { expr, start, end } => dict.push(DictItem::Spread {
                        expr,
                        span: self.span(start, end),
                    }),
                    CollectionItem::Pos(expr) => {
                        let span = self.arena.span(expr);
                        self.error(
                            SyntaxErrorKind::UnexpectedToken,
                            "expected named or keyed pair, found expression",
                            span.start as usize,
                            span.end as usize,
                        );
                    }
                }
            }
            let range = self.arena.alloc_dict_items(dict);
            return self.alloc(ExprKind::Dict(range), start, end);
        }

        let array: Vec<ArrayItem> = items
            .into_iter()
            .filter_map(|item| match item {
                CollectionItem::Pos(expr) => Some(ArrayItem::Pos(expr)),
                CollectionItem::Spread { expr, start, end } => Some(ArrayItem::Spread {
                    expr,
                    span: self.span(start, end),
                }),
                CollectionItem::Named { .. } | CollectionItem::Keyed { .. } => None,
            })
            .collect();
        let range = self.arena.alloc_array_items(array);
        self.alloc(ExprKind::Array(range), start, end)
    }

    fn collection_item(&mut self) -> CollectionItem {
        let start = self.token.start;
        if self.eat(&TokenKind::Dots) {
            let expr = self.spread_operand();
            return CollectionItem::Spread {
                expr,
                start,
                end: self.prev_end,
            };
        }

        if let Some(name) = self.named_item_name() {
            let expr = self.code_expr();
            return CollectionItem::Named {
                name,
                expr,
                start,
                end: self.prev_end,
            };
        }

        let expr = self.code_expr();
        if self.eat(&TokenKind::Colon) {
            let value = self.code_expr();
            return CollectionItem::Keyed {
                key: expr,
                expr: value,
                start,
                end: self.prev_end,
            };
        }
        CollectionItem::Pos(expr)
    }

    /// The operand of `..`; a bare `..` spreads `none`.
    fn spread_operand(&mut self) -> ExprId {
        if matches!(self.kind(), TokenKind::Comma | TokenKind::RParen) {
            let pos = self.prev_end;
            return self.alloc(ExprKind::None, pos, pos);
        }
        self.code_expr()
    }

    /// Consume `name:` if the current tokens spell it.
    fn named_item_name(&mut self) -> Option<Name> {
        let TokenKind::Ident(name) = self.kind().clone() else {
            return None;
        };
        if self.peek_next().kind != TokenKind::Colon {
            return None;
        }
        self.bump();
        self.bump();
        Some(Name::new(&name))
    }

    /// `(args)` followed by any number of attached `[content]` blocks.
    pub(crate) fn call_args(&mut self) -> ArgRange {
        let mut args = Vec::new();

        if self.at(&TokenKind::LParen) {
            let start = self.token.start;
            self.with_mode(NewlineMode::Continue, |p| {
                p.bump();
                while !p.at(&TokenKind::RParen) && !p.at(&TokenKind::End) {
                    args.push(p.arg());
                    if !p.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                p.expect_closing(&TokenKind::RParen, start);
            });
        }

        while self.at(&TokenKind::LBracket) && self.postfix_attached() {
            let block = self.content_block();
            args.push(Arg::Pos(block));
        }

        self.arena.alloc_args(args)
    }

    fn arg(&mut self) -> Arg {
        let start = self.token.start;
        if self.eat(&TokenKind::Dots) {
            let expr = self.code_expr();
            return Arg::Spread {
                expr,
                span: self.span(start, self.prev_end),
            };
        }
        if let Some(name) = self.named_item_name() {
            let expr = self.code_expr();
            return Arg::Named {
                name,
                expr,
                span: self.span(start, self.prev_end),
            };
        }
        Arg::Pos(self.code_expr())
    }

    /// `(x, y: 1, ..rest)` before the `=>` of a closure or the `=` of a
    /// function definition.
    pub(crate) fn params(&mut self) -> ParamRange {
        let start = self.token.start;
        let mut params = Vec::new();
        self.with_mode(NewlineMode::Continue, |p| {
            if !p.expect(&TokenKind::LParen) {
                return;
            }
            while !p.at(&TokenKind::RParen) && !p.at(&TokenKind::End) {
                params.push(p.param());
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect_closing(&TokenKind::RParen, start);
        });
        self.arena.alloc_params(params)
    }

    fn param(&mut self) -> Param {
        let start = self.token.start;
        if self.eat(&TokenKind::Dots) {
            let name = match self.kind().clone() {
                TokenKind::Ident(name) => {
                    self.bump();
                    Some(Name::new(&name))
                }
                _ => None,
            };
            return Param::Sink {
                name,
                span: self.span(start, self.prev_end),
            };
        }
        if let Some(name) = self.named_item_name() {
            let default = self.code_expr();
            return Param::Named {
                name,
                default,
                span: self.span(start, self.prev_end),
            };
        }
        Param::Pos(self.pattern())
    }

    /// A binding pattern: `x`, `_`, `(a, b)`, `(key: x, ..rest)`.
    pub(crate) fn pattern(&mut self) -> PatternId {
        let start = self.token.start;
        match self.kind().clone() {
            TokenKind::Underscore => {
                self.bump();
                self.alloc_pattern(PatternKind::Placeholder, start, self.prev_end)
            }
            TokenKind::Ident(name) => {
                let token = self.bump();
                let ident = self.alloc(ExprKind::Ident(Name::new(&name)), token.start, token.end);
                self.alloc_pattern(PatternKind::Normal(ident), start, self.prev_end)
            }
            TokenKind::LParen => self.destructuring_pattern(),
            other => {
                let end = self.token.end;
                self.error(
                    SyntaxErrorKind::UnexpectedToken,
                    format!("expected pattern, found {}", other.describe()),
                    start,
                    end,
                );
                self.alloc_pattern(PatternKind::Placeholder, start, start)
            }
        }
    }

    fn destructuring_pattern(&mut self) -> PatternId {
        let start = self.token.start;
        let (items, trailing_comma) = self.with_mode(NewlineMode::Continue, |p| {
            p.bump();
            let mut items = Vec::new();
            let mut trailing_comma = false;
            while !p.at(&TokenKind::RParen) && !p.at(&TokenKind::End) {
                items.push(p.pattern_item());
                trailing_comma = p.eat(&TokenKind::Comma);
                if !trailing_comma {
                    break;
                }
            }
            p.expect_closing(&TokenKind::RParen, start);
            (items, trailing_comma)
        });
        let end = self.prev_end;

        if let [PatternItem::Pattern(inner)] = items.as_slice() {
            if !trailing_comma {
                return self.alloc_pattern(PatternKind::Parenthesized(*inner), start, end);
            }
        }
        let range = self.arena.alloc_pattern_items(items);
        self.alloc_pattern(PatternKind::Destructuring(range), start, end)
    }

    fn pattern_item(&mut self) -> PatternItem {
        let start = self.token.start;
        if self.eat(&TokenKind::Dots) {
            let target = match self.kind().clone() {
                TokenKind::Ident(name) => {
                    let token = self.bump();
                    Some(self.alloc(ExprKind::Ident(Name::new(&name)), token.start, token.end))
                }
                _ => None,
            };
            return PatternItem::Spread {
                target,
                span: self.span(start, self.prev_end),
            };
        }
        if let Some(name) = self.named_item_name() {
            let pattern = self.pattern();
            return PatternItem::Named {
                name,
                pattern,
                span: self.span(start, self.prev_end),
            };
        }
        PatternItem::Pattern(self.pattern())
    }

    fn alloc_pattern(&mut self, kind: PatternKind, start: usize, end: usize) -> PatternId {
        let span = self.span(start, end);
        self.arena.alloc_pattern(Pattern { kind, span })
    }

    /// Whether an assignment target must be destructured.
    pub(crate) fn is_destructurable(&self, expr: ExprId) -> bool {
        matches!(
            self.arena.kind(expr),
            ExprKind::Array(_) | ExprKind::Dict(_) | ExprKind::Parenthesized(_)
        )
    }

    /// Reinterpret the left-hand side of `(a, b) = ..` as a pattern.
    pub(crate) fn expr_to_pattern(&mut self, expr: ExprId) -> PatternId {
        let span = self.arena.span(expr);
        let kind = match self.arena.kind(expr) {
            ExprKind::Ident(name) if name.as_str() == "_" => PatternKind::Placeholder,
            ExprKind::Parenthesized(inner) => PatternKind::Parenthesized(self.expr_to_pattern(inner)),
            ExprKind::Array(range) => {
                let items = self.arena.array_items(range).to_vec();
                let items: Vec<PatternItem> = items
                    .into_iter()
                    .map(|item| match item {
                        ArrayItem::Pos(expr) => PatternItem::Pattern(self.expr_to_pattern(expr)),
                        ArrayItem::Spread { expr, span } => PatternItem::Spread {
                            target: self.spread_target(expr),
                            span,
                        },
                    })
                    .collect();
                PatternKind::Destructuring(self.arena.alloc_pattern_items(items))
            }
            ExprKind::Dict(range) => {
                let items = self.arena.dict_items(range).to_vec();
                let mut patterns = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        DictItem::Named { name, expr, span } => {
                            let pattern = self.expr_to_pattern(expr);
                            patterns.push(PatternItem::Named {
                                name,
                                pattern,
                                span,
                            });
                        }
                        DictItem::Spread { expr, span } => patterns.push(PatternItem::Spread {
                            target: self.spread_target(expr),
                            span,
                        }),
                        DictItem::Keyed { span, .. } => self.error(
                            SyntaxErrorKind::UnexpectedToken,
                            "keyed pairs cannot be destructured",
                            span.start as usize,
                            span.end as usize,
                        ),
                    }
                }
                PatternKind::Destructuring(self.arena.alloc_pattern_items(patterns))
            }
            _ => PatternKind::Normal(expr),
        };
        self.arena.alloc_pattern(Pattern { kind, span })
    }

    fn spread_target(&self, expr: ExprId) -> Option<ExprId> {
        (!matches!(self.arena.kind(expr), ExprKind::None)).then_some(expr)
    }
}
