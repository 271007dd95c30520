//! Code expression and statement parsing.
//!
//! Binary operators use precedence climbing over [`BinaryOp::precedence`].
//! Postfix operators (field access, calls and trailing content blocks) must
//! be directly attached to their target so that `#f [text]` in markup is a
//! call to nothing followed by text.
//!
//! Statements (`let`, `set`, `show`, `if`, `for`, ...) are ordinary
//! expressions: they may appear anywhere an expression may.

use folio_ir::{
    ArgRange, BinaryOp, ClosureDef, ExprId, ExprKind, ImportItem, Imports, LetKind, Name,
    ParamRange, SyntaxErrorKind, UnaryOp,
};
use folio_stack::ensure_sufficient_stack;

use crate::lexer::TokenKind;
use crate::{NewlineMode, Parser};

impl Parser<'_> {
    /// Parse a full code expression, including binary operators.
    pub(crate) fn code_expr(&mut self) -> ExprId {
        self.expr_with_precedence(0)
    }

    /// Parse the expression after `#` in markup or math.
    ///
    /// Statements are parsed in full; anything else is restricted to an
    /// atom with attached postfix operators so that `#x + 1` embeds only `x`.
    pub(crate) fn embedded_expr(&mut self) -> ExprId {
        if self.kind().is_statement_keyword() {
            self.code_expr()
        } else {
            self.postfix_expr()
        }
    }

    fn expr_with_precedence(&mut self, min: u8) -> ExprId {
        ensure_sufficient_stack(|| self.expr_with_precedence_inner(min))
    }

    fn expr_with_precedence_inner(&mut self, min: u8) -> ExprId {
        let start = self.token.start;
        let mut lhs = match unary_op(self.kind()) {
            Some(op) => {
                self.bump();
                let expr = self.expr_with_precedence(op.precedence());
                let end = self.prev_end;
                self.alloc(ExprKind::Unary { op, expr }, start, end)
            }
            None => self.postfix_expr(),
        };

        loop {
            if self.at_expr_end() {
                break;
            }
            let Some((op, tokens)) = self.binary_op() else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min {
                break;
            }
            for _ in 0..tokens {
                self.bump();
            }
            let next_min = if op.is_assignment() {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.expr_with_precedence(next_min);
            let end = self.prev_end;
            lhs = if op == BinaryOp::Assign && self.is_destructurable(lhs) {
                let pattern = self.expr_to_pattern(lhs);
                self.alloc(ExprKind::DestructAssign { pattern, value: rhs }, start, end)
            } else {
                self.alloc(ExprKind::Binary { op, lhs, rhs }, start, end)
            };
        }
        lhs
    }

    /// The binary operator at the current token and how many tokens it spans.
    fn binary_op(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::ExclEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::In => BinaryOp::In,
            TokenKind::Not => {
                return (self.peek_next().kind == TokenKind::In).then_some((BinaryOp::NotIn, 2));
            }
            TokenKind::Eq => BinaryOp::Assign,
            TokenKind::PlusEq => BinaryOp::AddAssign,
            TokenKind::HyphEq => BinaryOp::SubAssign,
            TokenKind::StarEq => BinaryOp::MulAssign,
            TokenKind::SlashEq => BinaryOp::DivAssign,
            _ => return None,
        };
        Some((op, 1))
    }

    /// An atom followed by attached field accesses and calls.
    pub(crate) fn postfix_expr(&mut self) -> ExprId {
        let start = self.token.start;
        let mut expr = self.primary_expr();
        loop {
            if self.at(&TokenKind::Dot) && self.dot_continues() {
                self.bump();
                let field = self.bump();
                let field = field_name(&field.kind).unwrap_or_default();
                let end = self.prev_end;
                expr = self.alloc(
                    ExprKind::FieldAccess {
                        target: expr,
                        field: Name::new(&field),
                    },
                    start,
                    end,
                );
            } else if matches!(self.kind(), TokenKind::LParen | TokenKind::LBracket)
                && self.postfix_attached()
            {
                let args = self.call_args();
                let end = self.prev_end;
                expr = self.alloc(ExprKind::FuncCall { callee: expr, args }, start, end);
            } else {
                break;
            }
        }
        expr
    }

    /// Whether a `.` at the current token begins a field access.
    fn dot_continues(&self) -> bool {
        if self.at_expr_end() {
            return false;
        }
        if self.newline_mode == NewlineMode::Stop && !self.postfix_attached() {
            return false;
        }
        let next = self.peek_next();
        !next.space_before && field_name(&next.kind).is_some()
    }

    fn primary_expr(&mut self) -> ExprId {
        let start = self.token.start;
        match self.kind().clone() {
            TokenKind::Ident(name) => {
                if self.arrow_follows() {
                    return self.single_param_closure();
                }
                self.literal(ExprKind::Ident(Name::new(&name)))
            }
            TokenKind::Underscore => {
                if self.arrow_follows() {
                    return self.single_param_closure();
                }
                self.literal(ExprKind::Ident(Name::new("_")))
            }
            TokenKind::None => self.literal(ExprKind::None),
            TokenKind::Auto => self.literal(ExprKind::Auto),
            TokenKind::True => self.literal(ExprKind::Bool(true)),
            TokenKind::False => self.literal(ExprKind::Bool(false)),
            TokenKind::Int(v) => self.literal(ExprKind::Int(v)),
            TokenKind::Float(v) => self.literal(ExprKind::Float(v.to_bits())),
            TokenKind::Numeric(v, unit) => self.literal(ExprKind::Numeric {
                value: v.to_bits(),
                unit,
            }),
            TokenKind::Str(text) => self.literal(ExprKind::Str(Name::new(&text))),
            TokenKind::Label(name) => self.literal(ExprKind::Label(Name::new(&name))),
            TokenKind::LParen => self.paren_expr(),
            TokenKind::LBracket => self.content_block(),
            TokenKind::LBrace => self.code_block(),
            TokenKind::Dollar => {
                self.s.jump(start);
                let equation = self.equation();
                self.resync(self.s.cursor());
                equation
            }
            TokenKind::Let => self.let_binding(),
            TokenKind::Set => self.set_rule(),
            TokenKind::Show => self.show_rule(),
            TokenKind::Context => {
                self.bump();
                let body = self.code_expr();
                let end = self.prev_end;
                self.alloc(ExprKind::Contextual(body), start, end)
            }
            TokenKind::If => self.conditional(),
            TokenKind::While => self.while_loop(),
            TokenKind::For => self.for_loop(),
            TokenKind::Import => self.import(),
            TokenKind::Include => {
                self.bump();
                let source = self.code_expr();
                let end = self.prev_end;
                self.alloc(ExprKind::Include(source), start, end)
            }
            TokenKind::Break => self.literal(ExprKind::Break),
            TokenKind::Continue => self.literal(ExprKind::Continue),
            TokenKind::Return => self.return_expr(),
            TokenKind::Error(message) => {
                let token = self.bump();
                let kind = match message {
                    "unclosed string" => SyntaxErrorKind::Unterminated,
                    "invalid number suffix" | "invalid number" => SyntaxErrorKind::InvalidLiteral,
                    _ => SyntaxErrorKind::UnexpectedToken,
                };
                self.error(kind, message, token.start, token.end);
                self.alloc(ExprKind::None, token.start, token.end)
            }
            other => {
                let (tstart, tend) = (self.token.start, self.token.end);
                self.error(
                    SyntaxErrorKind::ExpectedExpression,
                    format!("expected expression, found {}", other.describe()),
                    tstart,
                    tend,
                );
                let closing = matches!(
                    other,
                    TokenKind::End
                        | TokenKind::RParen
                        | TokenKind::RBracket
                        | TokenKind::RBrace
                        | TokenKind::Semicolon
                        | TokenKind::Comma
                );
                if !closing {
                    self.bump();
                }
                self.alloc(ExprKind::None, tstart, tstart)
            }
        }
    }

    /// Consume one token and allocate `kind` over it.
    fn literal(&mut self, kind: ExprKind) -> ExprId {
        let token = self.bump();
        self.alloc(kind, token.start, token.end)
    }

    /// Whether the token after the current one is `=>` on the same line.
    fn arrow_follows(&self) -> bool {
        let next = self.peek_next();
        next.kind == TokenKind::Arrow
            && (self.newline_mode == NewlineMode::Continue || !next.newline_before)
    }

    /// `x => body` or `_ => body`.
    fn single_param_closure(&mut self) -> ExprId {
        let start = self.token.start;
        let pattern = self.pattern();
        let params = self.arena.alloc_params([folio_ir::Param::Pos(pattern)]);
        self.expect(&TokenKind::Arrow);
        let body = self.code_expr();
        self.closure(None, params, body, start)
    }

    pub(crate) fn closure(
        &mut self,
        name: Option<Name>,
        params: ParamRange,
        body: ExprId,
        start: usize,
    ) -> ExprId {
        let end = self.prev_end;
        let span = self.span(start, end);
        let id = self.arena.alloc_closure(ClosureDef {
            name,
            params,
            body,
            span,
        });
        self.alloc(ExprKind::Closure(id), start, end)
    }

    /// `(..)`: a closure if the parentheses are followed by `=>`, otherwise
    /// a parenthesized expression, array or dictionary.
    fn paren_expr(&mut self) -> ExprId {
        if self.closure_ahead() {
            let start = self.token.start;
            let params = self.params();
            self.expect(&TokenKind::Arrow);
            let body = self.code_expr();
            return self.closure(None, params, body, start);
        }
        self.collection()
    }

    /// Scan to the `)` matching the current `(` and check for `=>`.
    fn closure_ahead(&self) -> bool {
        let text = self.s.text();
        let mut depth = 0usize;
        let mut pos = self.token.start;
        loop {
            let token = crate::lexer::lex(text, pos);
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return crate::lexer::lex(text, token.end).kind == TokenKind::Arrow;
                    }
                }
                TokenKind::End => return false,
                _ => {}
            }
            pos = token.end;
        }
    }

    /// `{ stmt; stmt }`.
    fn code_block(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let exprs = self.with_mode(NewlineMode::Contextual, |p| {
            p.code_statements(&TokenKind::RBrace)
        });
        self.expect_closing(&TokenKind::RBrace, start);
        let end = self.prev_end;
        let range = self.arena.alloc_expr_list(exprs);
        self.alloc(ExprKind::CodeBlock(range), start, end)
    }

    /// Statements separated by semicolons or newlines, up to `end`.
    pub(crate) fn code_statements(&mut self, end: &TokenKind) -> Vec<ExprId> {
        let mut exprs = Vec::new();
        loop {
            if self.at(end) || self.at(&TokenKind::End) {
                break;
            }
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            let before = self.token.start;
            let expr = self.code_expr();
            exprs.push(expr);
            if self.token.start == before {
                self.bump();
                continue;
            }
            let separated = self.at(end)
                || self.at(&TokenKind::End)
                || self.at(&TokenKind::Semicolon)
                || self.token.newline_before;
            if !separated {
                let (tstart, tend) = (self.token.start, self.token.end);
                self.error(
                    SyntaxErrorKind::UnexpectedToken,
                    format!(
                        "expected semicolon or line break, found {}",
                        self.token.kind.describe()
                    ),
                    tstart,
                    tend,
                );
            }
        }
        exprs
    }

    /// Consume a closing delimiter, reporting an unclosed opener at
    /// `open_start` when the input ended first.
    pub(crate) fn expect_closing(&mut self, close: &TokenKind, open_start: usize) {
        if self.eat(close) {
            return;
        }
        if self.at(&TokenKind::End) {
            let open = match close {
                TokenKind::RParen => '(',
                TokenKind::RBracket => '[',
                _ => '{',
            };
            self.error(
                SyntaxErrorKind::UnclosedDelimiter,
                format!("unclosed delimiter `{open}`"),
                open_start,
                open_start + 1,
            );
        } else {
            self.expect(close);
        }
    }

    /// A code or content block, as required after `if`, `while` and `for`.
    fn block(&mut self) -> ExprId {
        match self.kind() {
            TokenKind::LBrace => self.code_block(),
            TokenKind::LBracket => self.content_block(),
            other => {
                let (start, end) = (self.token.start, self.token.end);
                let message = format!("expected block, found {}", other.describe());
                self.error(SyntaxErrorKind::ExpectedExpression, message, start, end);
                self.alloc(ExprKind::None, start, start)
            }
        }
    }

    /// `let x = 1`, `let (a, b) = pair`, `let f(x) = x`.
    fn let_binding(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();

        if let TokenKind::Ident(name) = self.kind().clone() {
            let next = self.peek_next();
            if next.kind == TokenKind::LParen && !next.space_before {
                let name = Name::new(&name);
                let closure_start = self.token.start;
                self.bump();
                let params = self.params();
                self.expect(&TokenKind::Eq);
                let body = self.code_expr();
                let init = self.closure(Some(name), params, body, closure_start);
                let end = self.prev_end;
                return self.alloc(
                    ExprKind::Let {
                        kind: LetKind::Closure(name),
                        init: Some(init),
                    },
                    start,
                    end,
                );
            }
        }

        let pattern = self.pattern();
        let init = if !self.at_expr_end() && self.eat(&TokenKind::Eq) {
            Some(self.code_expr())
        } else {
            None
        };
        let end = self.prev_end;
        self.alloc(
            ExprKind::Let {
                kind: LetKind::Normal(pattern),
                init,
            },
            start,
            end,
        )
    }

    /// `set target(args) [if condition]`.
    fn set_rule(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();

        let target_start = self.token.start;
        let mut target = self.primary_expr();
        while self.at(&TokenKind::Dot) && self.dot_continues() {
            self.bump();
            let field = self.bump();
            let field = Name::new(&field_name(&field.kind).unwrap_or_default());
            let end = self.prev_end;
            target = self.alloc(ExprKind::FieldAccess { target, field }, target_start, end);
        }

        let args = if self.at(&TokenKind::LParen) && self.postfix_attached() {
            self.call_args()
        } else {
            let (tstart, tend) = (self.token.start, self.token.end);
            self.error_with_hint(
                SyntaxErrorKind::UnexpectedToken,
                format!("expected argument list, found {}", self.token.kind.describe()),
                "set rules are written as `set func(arg: value)`",
                tstart,
                tend,
            );
            ArgRange::EMPTY
        };

        let condition = if !self.at_expr_end() && self.eat(&TokenKind::If) {
            Some(self.code_expr())
        } else {
            None
        };

        let end = self.prev_end;
        self.alloc(
            ExprKind::Set {
                target,
                args,
                condition,
            },
            start,
            end,
        )
    }

    /// `show selector: transform` or `show: transform`.
    fn show_rule(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let selector = if self.at(&TokenKind::Colon) {
            None
        } else {
            Some(self.code_expr())
        };
        self.expect(&TokenKind::Colon);
        let transform = self.code_expr();
        let end = self.prev_end;
        self.alloc(
            ExprKind::Show {
                selector,
                transform,
            },
            start,
            end,
        )
    }

    fn conditional(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let condition = self.code_expr();
        let if_body = self.block();
        let else_allowed = self.newline_mode != NewlineMode::Stop || !self.token.newline_before;
        let else_body = if else_allowed && self.eat(&TokenKind::Else) {
            if self.at(&TokenKind::If) {
                Some(self.conditional())
            } else {
                Some(self.block())
            }
        } else {
            None
        };
        let end = self.prev_end;
        self.alloc(
            ExprKind::Conditional {
                condition,
                if_body,
                else_body,
            },
            start,
            end,
        )
    }

    fn while_loop(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let condition = self.code_expr();
        let body = self.block();
        let end = self.prev_end;
        self.alloc(ExprKind::While { condition, body }, start, end)
    }

    fn for_loop(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let pattern = self.pattern();
        self.expect(&TokenKind::In);
        let iterable = self.code_expr();
        let body = self.block();
        let end = self.prev_end;
        self.alloc(
            ExprKind::For {
                pattern,
                iterable,
                body,
            },
            start,
            end,
        )
    }

    /// `import source [as name] [: items | *]`.
    fn import(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let source = self.code_expr();

        let new_name = if self.eat(&TokenKind::As) {
            Some(self.expect_ident())
        } else {
            None
        };

        let imports = if !self.at_expr_end() && self.eat(&TokenKind::Colon) {
            if self.eat(&TokenKind::Star) {
                Imports::Wildcard
            } else {
                let parens_start = self.token.start;
                let parens = self.eat(&TokenKind::LParen);
                let mode = if parens {
                    NewlineMode::Continue
                } else {
                    self.newline_mode
                };
                let items = self.with_mode(mode, |p| {
                    let mut items = Vec::new();
                    loop {
                        if parens && p.at(&TokenKind::RParen) {
                            break;
                        }
                        let item_start = p.token.start;
                        let name = p.expect_ident();
                        let rename = p.eat(&TokenKind::As).then(|| p.expect_ident());
                        let span = p.span(item_start, p.prev_end);
                        items.push(ImportItem { name, rename, span });
                        if !p.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    if parens {
                        p.expect_closing(&TokenKind::RParen, parens_start);
                    }
                    items
                });
                Imports::Items(self.arena.alloc_import_items(items))
            }
        } else {
            Imports::None
        };

        let end = self.prev_end;
        self.alloc(
            ExprKind::Import {
                source,
                new_name,
                imports,
            },
            start,
            end,
        )
    }

    fn return_expr(&mut self) -> ExprId {
        let start = self.token.start;
        self.bump();
        let bare = self.at_expr_end()
            || matches!(
                self.kind(),
                TokenKind::Semicolon
                    | TokenKind::RBrace
                    | TokenKind::RBracket
                    | TokenKind::RParen
                    | TokenKind::Comma
            );
        let value = (!bare).then(|| self.code_expr());
        let end = self.prev_end;
        self.alloc(ExprKind::Return(value), start, end)
    }

    pub(crate) fn expect_ident(&mut self) -> Name {
        if let TokenKind::Ident(name) = self.kind().clone() {
            self.bump();
            return Name::new(&name);
        }
        let (start, end) = (self.token.start, self.token.end);
        let message = format!("expected identifier, found {}", self.token.kind.describe());
        self.error(SyntaxErrorKind::UnexpectedToken, message, start, end);
        Name::EMPTY
    }
}

fn unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Pos),
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Not => Some(UnaryOp::Not),
        _ => None,
    }
}

/// The field name a token spells after `.`: identifiers and word keywords.
fn field_name(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Ident(name) => Some(name.clone()),
        other => other
            .text()
            .filter(|text| text.chars().all(char::is_alphabetic))
            .map(str::to_string),
    }
}
