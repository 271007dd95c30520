//! Math parsing.
//!
//! Whitespace in math only separates tokens and is dropped. Letters form
//! identifiers (a single letter is always a symbol), digits form numbers
//! and every other character is a shorthand for itself or for the symbol
//! in [`MATH_SHORTHANDS`].
//!
//! Binding, from tightest to loosest:
//! 1. primaries: identifiers, calls, groups, roots
//! 2. attachments and primes: `x_1^2`, `f'`
//! 3. fractions: `a/b`

use folio_ir::{Arg, ArrayItem, ExprId, ExprKind, Name, SyntaxErrorKind};
use folio_stack::ensure_sufficient_stack;

use crate::lexer::{lex, TokenKind};
use crate::scanner::is_newline;
use crate::Parser;

/// Multi-character math shorthands, longest first.
const MATH_SHORTHANDS: &[(&str, char)] = &[
    ("<==>", '\u{27fa}'),
    ("|->", '\u{21a6}'),
    ("<->", '\u{2194}'),
    ("==>", '\u{27f9}'),
    ("<==", '\u{27f8}'),
    ("...", '\u{2026}'),
    ("->", '\u{2192}'),
    ("<-", '\u{2190}'),
    ("=>", '\u{21d2}'),
    ("<=", '\u{2264}'),
    (">=", '\u{2265}'),
    ("!=", '\u{2260}'),
    (":=", '\u{2254}'),
    ("<<", '\u{226a}'),
    (">>", '\u{226b}'),
    ("||", '\u{2016}'),
    ("*", '\u{2217}'),
    ("-", '\u{2212}'),
];

/// Where a math sequence must end.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MathStops {
    /// The closing delimiter of the enclosing group.
    close: Option<char>,
    /// At the argument separators of an enclosing math call.
    args: bool,
}

impl MathStops {
    /// An equation body, ending only at `$`.
    pub(crate) const TOP: MathStops = MathStops {
        close: None,
        args: false,
    };

    const ARGS: MathStops = MathStops {
        close: None,
        args: true,
    };

    fn group(close: char) -> MathStops {
        MathStops {
            close: Some(close),
            args: false,
        }
    }

    fn stops_at(self, c: char) -> bool {
        c == '$' || self.close == Some(c) || (self.args && matches!(c, ',' | ';' | ')'))
    }
}

impl Parser<'_> {
    /// `$..$`. The equation is a block if the whitespace after the opening
    /// and before the closing dollar both contain a newline.
    pub(crate) fn equation(&mut self) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let leading = self
            .s
            .after()
            .chars()
            .take_while(|c| c.is_whitespace())
            .any(is_newline);

        let body = self.math_sequence(MathStops::TOP);

        let inner = &self.s.text()[start + 1..self.s.cursor()];
        let trailing = inner
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .any(is_newline);

        if !self.s.eat_if("$") {
            self.error(
                SyntaxErrorKind::UnclosedDelimiter,
                "unclosed equation",
                start,
                start + 1,
            );
        }
        let end = self.s.cursor();
        self.alloc(
            ExprKind::Equation {
                block: leading && trailing,
                body,
            },
            start,
            end,
        )
    }

    /// A sequence of math nodes as a `Math` node.
    pub(crate) fn math_sequence(&mut self, stops: MathStops) -> ExprId {
        let start = self.s.cursor();
        let nodes = self.math_nodes(stops);
        let end = self.s.cursor();
        let range = self.arena.alloc_expr_list(nodes);
        self.alloc(ExprKind::Math(range), start, end)
    }

    fn math_nodes(&mut self, stops: MathStops) -> Vec<ExprId> {
        let mut nodes = Vec::new();
        loop {
            self.math_trivia();
            match self.s.peek() {
                Some(c) if !stops.stops_at(c) => nodes.push(self.math_frac(stops)),
                _ => break,
            }
        }
        nodes
    }

    fn math_trivia(&mut self) {
        loop {
            self.s.eat_while(char::is_whitespace);
            if self.s.at("//") {
                self.s.eat_until(is_newline);
            } else if self.s.at("/*") {
                crate::lexer::skip_block_comment(&mut self.s);
            } else {
                break;
            }
        }
    }

    fn at_math_end(&self, stops: MathStops) -> bool {
        self.s.peek().map_or(true, |c| stops.stops_at(c))
    }

    /// `num/denom`, left-associative.
    fn math_frac(&mut self, stops: MathStops) -> ExprId {
        let start = self.s.cursor();
        let mut num = self.math_attach(stops);
        loop {
            let save = self.s.cursor();
            self.math_trivia();
            if !self.s.at("/") || self.s.at("//") {
                self.s.jump(save);
                break;
            }
            self.s.eat();
            let denom = self.math_operand(stops, "denominator");
            let num_body = self.strip_parens(num);
            let end = self.s.cursor();
            num = self.alloc(
                ExprKind::MathFrac {
                    num: num_body,
                    denom,
                },
                start,
                end,
            );
        }
        num
    }

    /// A primary with attached scripts and primes.
    fn math_attach(&mut self, stops: MathStops) -> ExprId {
        let start = self.s.cursor();
        let base = self.math_primary(stops);

        let primes = self.s.eat_while(|c| c == '\'').chars().count();
        let mut bottom = None;
        let mut top = None;
        loop {
            if bottom.is_none() && self.s.eat_if("_") {
                bottom = Some(self.math_operand(stops, "subscript"));
            } else if top.is_none() && self.s.eat_if("^") {
                top = Some(self.math_operand(stops, "superscript"));
            } else {
                break;
            }
        }

        if primes == 0 && bottom.is_none() && top.is_none() {
            return base;
        }
        let end = self.s.cursor();
        self.alloc(
            ExprKind::MathAttach {
                base,
                bottom,
                top,
                primes: u32::try_from(primes).unwrap_or(u32::MAX),
            },
            start,
            end,
        )
    }

    /// The single primary after `_`, `^`, `/` or a root sign, with one
    /// layer of parentheses removed.
    fn math_operand(&mut self, stops: MathStops, what: &str) -> ExprId {
        self.math_trivia();
        if self.at_math_end(stops) {
            let pos = self.s.cursor();
            self.error(
                SyntaxErrorKind::ExpectedExpression,
                format!("missing {what}"),
                pos,
                pos,
            );
            let range = self.arena.alloc_expr_list([]);
            return self.alloc(ExprKind::Math(range), pos, pos);
        }
        let operand = self.math_primary(stops);
        self.strip_parens(operand)
    }

    /// The body of a `(..)` group, or the node itself.
    fn strip_parens(&self, expr: ExprId) -> ExprId {
        if let ExprKind::MathDelimited { open, body, close } = self.arena.kind(expr) {
            let parens = self.arena.kind(open) == ExprKind::MathShorthand('(')
                && self.arena.kind(close) == ExprKind::MathShorthand(')');
            if parens {
                return body;
            }
        }
        expr
    }

    fn math_primary(&mut self, stops: MathStops) -> ExprId {
        ensure_sufficient_stack(|| self.math_primary_inner(stops))
    }

    fn math_primary_inner(&mut self, stops: MathStops) -> ExprId {
        let start = self.s.cursor();
        let Some(c) = self.s.peek() else {
            let range = self.arena.alloc_expr_list([]);
            return self.alloc(ExprKind::Math(range), start, start);
        };

        if c.is_alphabetic() {
            return self.math_ident();
        }
        if c.is_ascii_digit() {
            self.s.eat_while(|c| c.is_ascii_digit());
            if self.s.at(".") && self.s.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                self.s.eat();
                self.s.eat_while(|c| c.is_ascii_digit());
            }
            let end = self.s.cursor();
            let text = Name::new(self.s.from(start));
            return self.alloc(ExprKind::MathText(text), start, end);
        }

        match c {
            '"' => self.math_string(),
            '#' if self.at_embedded_code() => self.embedded_code(),
            '\\' => self.escape(),
            '&' => {
                self.s.eat();
                let end = self.s.cursor();
                self.alloc(ExprKind::MathAlignPoint, start, end)
            }
            '√' | '∛' | '∜' => {
                self.s.eat();
                let index = match c {
                    '∛' => Some(3),
                    '∜' => Some(4),
                    _ => None,
                };
                let radicand = self.math_operand(stops, "radicand");
                let end = self.s.cursor();
                self.alloc(ExprKind::MathRoot { index, radicand }, start, end)
            }
            '(' | '[' | '{' => {
                let close = match c {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                };
                if self.math_group_closes(c, close) {
                    self.math_delimited(c, close)
                } else {
                    self.math_shorthand()
                }
            }
            _ => self.math_shorthand(),
        }
    }

    /// A letter run, its dotted modifiers and, for names, a call.
    fn math_ident(&mut self) -> ExprId {
        let start = self.s.cursor();
        let name = self.s.eat_while(char::is_alphabetic);
        let is_name = name.chars().nth(1).is_some();
        let end = self.s.cursor();
        let mut expr = self.alloc(ExprKind::MathIdent(Name::new(name)), start, end);

        let mut dotted = false;
        while self.s.at(".") && self.s.peek_nth(1).is_some_and(char::is_alphabetic) {
            self.s.eat();
            let field = Name::new(self.s.eat_while(char::is_alphabetic));
            let end = self.s.cursor();
            expr = self.alloc(ExprKind::FieldAccess { target: expr, field }, start, end);
            dotted = true;
        }

        if (is_name || dotted) && self.s.at("(") {
            return self.math_call(expr, start);
        }
        expr
    }

    /// `name(a, b; c, d, key: value)`. Rows separated by `;` become arrays.
    fn math_call(&mut self, callee: ExprId, start: usize) -> ExprId {
        let open = self.s.cursor();
        self.s.eat();

        let mut args = Vec::new();
        let mut row = Vec::new();
        let mut rows = Vec::new();
        let mut has_rows = false;
        loop {
            self.math_trivia();
            match self.s.peek() {
                Some(')') => {
                    self.s.eat();
                    break;
                }
                None | Some('$') => {
                    self.error(
                        SyntaxErrorKind::UnclosedDelimiter,
                        "unclosed delimiter `(`",
                        open,
                        open + 1,
                    );
                    break;
                }
                _ => {}
            }

            let arg_start = self.s.cursor();
            if let Some(name) = self.math_arg_name() {
                let expr = self.math_arg();
                let span = self.span(arg_start, self.s.cursor());
                args.push(Arg::Named { name, expr, span });
            } else {
                row.push(self.math_arg());
            }

            self.math_trivia();
            if self.s.eat_if(";") {
                has_rows = true;
                rows.push(std::mem::take(&mut row));
            } else {
                self.s.eat_if(",");
            }
        }

        if has_rows {
            if !row.is_empty() {
                rows.push(row);
            }
            for row in rows {
                let (row_start, row_end) = self.list_bounds(&row, open);
                let items = self.arena.alloc_array_items(row.into_iter().map(ArrayItem::Pos));
                let array = self.alloc(ExprKind::Array(items), row_start, row_end);
                args.push(Arg::Pos(array));
            }
        } else {
            args.extend(row.into_iter().map(Arg::Pos));
        }

        let end = self.s.cursor();
        let args = self.arena.alloc_args(args);
        self.alloc(ExprKind::FuncCall { callee, args }, start, end)
    }

    fn list_bounds(&self, items: &[ExprId], fallback: usize) -> (usize, usize) {
        match (items.first(), items.last()) {
            (Some(&first), Some(&last)) => (
                self.arena.span(first).start as usize,
                self.arena.span(last).end as usize,
            ),
            _ => (fallback, fallback),
        }
    }

    /// Consume `name:` at the start of a math argument.
    fn math_arg_name(&mut self) -> Option<Name> {
        let rest = self.s.after();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !c.is_alphabetic())
            .map_or(rest.len(), |(i, _)| i);
        let after = &rest[len..];
        if len < 2 || !after.starts_with(':') || after.starts_with(":=") {
            return None;
        }
        let name = Name::new(&rest[..len]);
        let target = self.s.cursor() + len + 1;
        self.s.jump(target);
        Some(name)
    }

    /// One argument of a math call; a single node stands for itself.
    fn math_arg(&mut self) -> ExprId {
        let start = self.s.cursor();
        let nodes = self.math_nodes(MathStops::ARGS);
        if let [single] = nodes.as_slice() {
            return *single;
        }
        let end = self.s.cursor();
        let range = self.arena.alloc_expr_list(nodes);
        self.alloc(ExprKind::Math(range), start, end)
    }

    /// Whether the group opened at the cursor is closed before the equation
    /// ends.
    fn math_group_closes(&self, open: char, close: char) -> bool {
        let mut depth = 0usize;
        let mut chars = self.s.after().chars();
        while let Some(c) = chars.next() {
            match c {
                '$' => return false,
                '\\' => {
                    chars.next();
                }
                '"' => {
                    for c in chars.by_ref() {
                        if c == '"' {
                            break;
                        }
                    }
                }
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn math_delimited(&mut self, open: char, close: char) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let open_end = self.s.cursor();
        let open_node = self.alloc(ExprKind::MathShorthand(open), start, open_end);

        let body = self.math_sequence(MathStops::group(close));

        let close_start = self.s.cursor();
        if self.s.peek() == Some(close) {
            self.s.eat();
        } else {
            self.error(
                SyntaxErrorKind::UnclosedDelimiter,
                format!("unclosed delimiter `{open}`"),
                start,
                open_end,
            );
        }
        let close_end = self.s.cursor();
        let close_node = self.alloc(ExprKind::MathShorthand(close), close_start, close_end);
        self.alloc(
            ExprKind::MathDelimited {
                open: open_node,
                body,
                close: close_node,
            },
            start,
            close_end,
        )
    }

    fn math_string(&mut self) -> ExprId {
        let start = self.s.cursor();
        let token = lex(self.s.text(), start);
        self.s.jump(token.end);
        match token.kind {
            TokenKind::Str(text) => self.alloc(ExprKind::Str(Name::new(&text)), start, token.end),
            _ => {
                self.error(
                    SyntaxErrorKind::Unterminated,
                    "unclosed string",
                    start,
                    token.end,
                );
                self.alloc(ExprKind::Str(Name::EMPTY), start, token.end)
            }
        }
    }

    fn math_shorthand(&mut self) -> ExprId {
        let start = self.s.cursor();
        let symbol = MATH_SHORTHANDS
            .iter()
            .find(|(pat, _)| self.s.at(pat))
            .copied();
        let c = match symbol {
            Some((pat, c)) => {
                self.s.eat_if(pat);
                c
            }
            None => self.s.eat().unwrap_or(char::REPLACEMENT_CHARACTER),
        };
        let end = self.s.cursor();
        self.alloc(ExprKind::MathShorthand(c), start, end)
    }
}
