//! Markup parsing.
//!
//! Markup is scanned character by character. A run of ordinary words becomes
//! one `Text` node; whitespace becomes `Space` or, when it contains a blank
//! line, `Parbreak`. Constructs that only make sense at the start of a line
//! (headings and list items) are recognized only when `at_start` is set.
//!
//! Nested constructs end at the delimiters recorded in [`Stops`]: a content
//! block at its unbalanced `]`, strong text at `*`, a heading at the end of
//! its line and a list item at the first line that is not indented deeper
//! than its marker.

use folio_ir::{is_id_continue, is_id_start, ExprId, ExprKind, Name, SyntaxErrorKind};
use folio_stack::ensure_sufficient_stack;

use crate::lexer::decode_unicode_escape;
use crate::scanner::{count_newlines, is_label_char, is_newline};
use crate::{NewlineMode, Parser};

/// Where the markup being parsed must end.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct Stops {
    /// At an unbalanced `]`.
    pub bracket: bool,
    /// At `*`.
    pub strong: bool,
    /// At `_`.
    pub emph: bool,
    /// At any newline.
    pub newline: bool,
    /// At `:`.
    pub colon: bool,
    /// At a newline followed by a line indented at most this many columns.
    pub indent: Option<usize>,
    /// Before a label that is the last thing on its line.
    pub line_label: bool,
}

impl Stops {
    /// Stops for a construct nested into this one: only the enclosing
    /// content block carries over.
    fn nested(self) -> Stops {
        Stops {
            bracket: self.bracket,
            ..Stops::default()
        }
    }
}

impl Parser<'_> {
    /// Parse markup up to one of the `stops`.
    pub(crate) fn markup(&mut self, stops: Stops, at_start: bool) -> ExprId {
        ensure_sufficient_stack(|| self.markup_inner(stops, at_start))
    }

    fn markup_inner(&mut self, stops: Stops, mut at_start: bool) -> ExprId {
        let start = self.s.cursor();
        let mut nodes = Vec::new();
        let mut depth = 0usize;

        while let Some(c) = self.s.peek() {
            if at_markup_stop(c, stops, depth) || (stops.line_label && self.at_line_label()) {
                break;
            }

            if c.is_whitespace() || self.s.at("//") || self.s.at("/*") {
                let ws_start = self.s.cursor();
                let (space, newlines) = self.markup_trivia();
                if self.trivia_ends_markup(newlines, stops)
                    || (stops.line_label && newlines == 0 && self.at_line_label())
                {
                    self.s.jump(ws_start);
                    break;
                }
                if space {
                    let kind = if newlines >= 2 {
                        ExprKind::Parbreak
                    } else {
                        ExprKind::Space
                    };
                    let end = self.s.cursor();
                    nodes.push(self.alloc(kind, ws_start, end));
                }
                at_start |= newlines > 0;
                continue;
            }

            let node = self.markup_node(c, stops, at_start, &mut depth);
            nodes.push(node);
            at_start = false;
        }

        let end = self.s.cursor();
        let range = self.arena.alloc_expr_list(nodes);
        self.alloc(ExprKind::Markup(range), start, end)
    }

    /// Skip whitespace and comments. Returns whether any whitespace was seen
    /// and how many newlines it contained.
    fn markup_trivia(&mut self) -> (bool, usize) {
        let mut space = false;
        let mut newlines = 0;
        loop {
            let ws = self.s.eat_while(char::is_whitespace);
            if !ws.is_empty() {
                space = true;
                newlines += count_newlines(ws);
            }
            if self.s.at("//") {
                self.s.eat_until(is_newline);
            } else if self.s.at("/*") {
                let start = self.s.cursor();
                if !crate::lexer::skip_block_comment(&mut self.s) {
                    let end = self.s.cursor();
                    self.error(
                        SyntaxErrorKind::Unterminated,
                        "unclosed block comment",
                        start,
                        end,
                    );
                }
            } else {
                break;
            }
        }
        (space, newlines)
    }

    fn trivia_ends_markup(&self, newlines: usize, stops: Stops) -> bool {
        if newlines == 0 {
            return false;
        }
        if stops.newline {
            return true;
        }
        let nested = stops.strong || stops.emph || stops.colon || stops.indent.is_some();
        if newlines >= 2 && nested {
            return true;
        }
        match stops.indent {
            Some(column) => self.s.done() || self.s.column(self.s.cursor()) <= column,
            None => false,
        }
    }

    fn markup_node(&mut self, c: char, stops: Stops, at_start: bool, depth: &mut usize) -> ExprId {
        let start = self.s.cursor();
        match c {
            '\\' => self.escape(),
            '*' if !self.prev_is_alnum() => self.strong_or_emph(stops, '*'),
            '_' if !self.prev_is_alnum() => self.strong_or_emph(stops, '_'),
            '`' => self.raw(),
            '<' if self.at_label() => self.label(),
            '@' if self.s.peek_nth(1).is_some_and(is_label_char) => self.reference(),
            '#' if self.at_embedded_code() => self.embedded_code(),
            '$' => self.equation(),
            '~' => self.shorthand("~", '\u{a0}'),
            '-' if at_start && self.blank_after(1) => self.list_item(stops),
            '-' if self.s.at("---") => self.shorthand("---", '\u{2014}'),
            '-' if self.s.at("--") => self.shorthand("--", '\u{2013}'),
            '-' if self.s.at("-?") => self.shorthand("-?", '\u{ad}'),
            '+' if at_start && self.blank_after(1) => self.enum_item(stops),
            '0'..='9' if at_start && self.at_enum_number() => self.enum_item(stops),
            '=' if at_start && self.at_heading() => self.heading(stops),
            '/' if at_start && self.blank_after(1) => self.term_item(stops),
            '.' if self.s.at("...") => self.shorthand("...", '\u{2026}'),
            '\'' | '"' => {
                self.s.eat();
                let end = self.s.cursor();
                self.alloc(ExprKind::SmartQuote { double: c == '"' }, start, end)
            }
            '[' | ']' => {
                if c == '[' {
                    *depth += 1;
                } else {
                    *depth = depth.saturating_sub(1);
                }
                self.s.eat();
                let end = self.s.cursor();
                let text = if c == '[' { "[" } else { "]" };
                self.alloc(ExprKind::Text(Name::new(text)), start, end)
            }
            'h' if self.at_link() => self.link(),
            _ => self.text(stops),
        }
    }

    fn prev_is_alnum(&self) -> bool {
        self.s.prev().is_some_and(char::is_alphanumeric)
    }

    /// Whether the `n`-th character ahead is whitespace or the end.
    fn blank_after(&self, n: usize) -> bool {
        self.s.peek_nth(n).map_or(true, char::is_whitespace)
    }

    fn skip_inline_space(&mut self) {
        self.s.eat_while(|c| c == ' ' || c == '\t');
    }

    fn shorthand(&mut self, pat: &str, c: char) -> ExprId {
        let start = self.s.cursor();
        self.s.eat_if(pat);
        let end = self.s.cursor();
        self.alloc(ExprKind::Shorthand(c), start, end)
    }

    /// A run of words separated by single inline spaces.
    fn text(&mut self, stops: Stops) -> ExprId {
        let start = self.s.cursor();
        let mut text = String::new();
        if let Some(c) = self.s.eat() {
            text.push(c);
        }

        while let Some(c) = self.s.peek() {
            if c.is_whitespace() {
                let ws_start = self.s.cursor();
                let ws = self.s.eat_while(|c| c == ' ' || c == '\t');
                let continues = !ws.is_empty()
                    && self.s.at_char(|c| !c.is_whitespace())
                    && !self.text_stops_here(stops);
                if continues {
                    text.push(' ');
                    continue;
                }
                self.s.jump(ws_start);
                break;
            }
            if self.text_stops_here(stops) {
                break;
            }
            text.push(c);
            self.s.eat();
        }

        let end = self.s.cursor();
        self.alloc(ExprKind::Text(Name::new(&text)), start, end)
    }

    fn text_stops_here(&self, stops: Stops) -> bool {
        let Some(c) = self.s.peek() else {
            return true;
        };
        match c {
            '\\' | '`' | '<' | '@' | '#' | '$' | '~' | '\'' | '"' | '[' | ']' => true,
            '*' => stops.strong || !self.prev_is_alnum(),
            '_' => stops.emph || !self.prev_is_alnum(),
            ':' => stops.colon,
            '-' => self.s.at("--") || self.s.at("-?"),
            '.' => self.s.at("..."),
            '/' => self.s.at("//") || self.s.at("/*"),
            'h' => !self.prev_is_alnum() && self.at_link(),
            c => c.is_whitespace(),
        }
    }

    /// `\` followed by whitespace is a line break, otherwise an escape.
    pub(crate) fn escape(&mut self) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let kind = match self.s.peek() {
            None => ExprKind::Linebreak,
            Some(c) if c.is_whitespace() => ExprKind::Linebreak,
            Some('u') if self.s.at("u{") => {
                self.s.eat_if("u{");
                let hex = self.s.eat_while(|c| c.is_ascii_hexdigit());
                let decoded = decode_unicode_escape(hex);
                let closed = self.s.eat_if("}");
                match decoded {
                    Some(c) if closed => ExprKind::Escape(c),
                    _ => {
                        let end = self.s.cursor();
                        self.error(
                            SyntaxErrorKind::InvalidLiteral,
                            "invalid unicode escape sequence",
                            start,
                            end,
                        );
                        ExprKind::Escape(char::REPLACEMENT_CHARACTER)
                    }
                }
            }
            Some(c) => {
                self.s.eat();
                ExprKind::Escape(c)
            }
        };
        let end = self.s.cursor();
        self.alloc(kind, start, end)
    }

    fn strong_or_emph(&mut self, stops: Stops, delim: char) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let inner = if delim == '*' {
            Stops {
                strong: true,
                ..stops
            }
        } else {
            Stops { emph: true, ..stops }
        };
        let body = self.markup(inner, false);
        if self.s.peek() == Some(delim) {
            self.s.eat();
        } else {
            self.error_with_hint(
                SyntaxErrorKind::UnclosedDelimiter,
                format!("unclosed delimiter `{delim}`"),
                format!("escape it as `\\{delim}` to write it literally"),
                start,
                start + 1,
            );
        }
        let end = self.s.cursor();
        let kind = if delim == '*' {
            ExprKind::Strong(body)
        } else {
            ExprKind::Emph(body)
        };
        self.alloc(kind, start, end)
    }

    fn raw(&mut self) -> ExprId {
        let start = self.s.cursor();
        let ticks = self.s.eat_while(|c| c == '`').len();
        if ticks == 2 {
            let end = self.s.cursor();
            return self.alloc(
                ExprKind::Raw {
                    text: Name::EMPTY,
                    lang: None,
                    block: false,
                },
                start,
                end,
            );
        }

        let lang = if ticks >= 3 {
            let lang = self.s.eat_while(is_id_continue);
            (!lang.is_empty()).then(|| Name::new(lang))
        } else {
            None
        };

        let fence = "`".repeat(ticks);
        let body_start = self.s.cursor();
        let body = match self.s.after().find(&fence) {
            Some(offset) => {
                let body = &self.s.text()[body_start..body_start + offset];
                self.s.jump(body_start + offset + ticks);
                body
            }
            None => {
                let body = self.s.after();
                let end = self.s.text().len();
                self.s.jump(end);
                self.error(
                    SyntaxErrorKind::Unterminated,
                    "unclosed raw text",
                    start,
                    body_start,
                );
                body
            }
        };

        let (text, block) = if ticks >= 3 {
            (trim_raw_block(body), body.contains('\n'))
        } else {
            (body.to_string(), false)
        };
        let end = self.s.cursor();
        self.alloc(
            ExprKind::Raw {
                text: Name::new(&text),
                lang,
                block,
            },
            start,
            end,
        )
    }

    fn at_link(&self) -> bool {
        self.s.at("http://") || self.s.at("https://")
    }

    fn link(&mut self) -> ExprId {
        let start = self.s.cursor();
        let mut parens = 0usize;
        let mut brackets = 0usize;
        self.s.eat_while(|c| match c {
            '(' => {
                parens += 1;
                true
            }
            ')' if parens > 0 => {
                parens -= 1;
                true
            }
            '[' => {
                brackets += 1;
                true
            }
            ']' if brackets > 0 => {
                brackets -= 1;
                true
            }
            ')' | ']' | '<' | '>' | '"' | '`' => false,
            c => !c.is_whitespace(),
        });
        while matches!(
            self.s.prev(),
            Some('.' | ',' | ';' | ':' | '!' | '?' | '\'')
        ) {
            let back = self.s.cursor() - 1;
            self.s.jump(back);
        }
        let end = self.s.cursor();
        let url = Name::new(self.s.from(start));
        self.alloc(ExprKind::Link(url), start, end)
    }

    fn at_label(&self) -> bool {
        let rest = &self.s.after()[1..];
        let len = rest.find(|c| !is_label_char(c)).unwrap_or(rest.len());
        len > 0 && rest[len..].starts_with('>')
    }

    /// At a label followed only by inline whitespace up to the line's end.
    fn at_line_label(&self) -> bool {
        if !self.s.at("<") || !self.at_label() {
            return false;
        }
        let rest = &self.s.after()[1..];
        let Some(close) = rest.find('>') else {
            return false;
        };
        rest[close + 1..]
            .chars()
            .take_while(|&c| !is_newline(c))
            .all(char::is_whitespace)
    }

    fn label(&mut self) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let name = Name::new(self.s.eat_while(is_label_char));
        self.s.eat_if(">");
        let end = self.s.cursor();
        self.alloc(ExprKind::Label(name), start, end)
    }

    fn reference(&mut self) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let name_start = self.s.cursor();
        self.s.eat_while(is_label_char);
        while matches!(self.s.prev(), Some('.' | ':')) && self.s.cursor() > name_start + 1 {
            let back = self.s.cursor() - 1;
            self.s.jump(back);
        }
        let target = Name::new(self.s.from(name_start));
        let supplement = self.s.at("[").then(|| self.markup_block());
        let end = self.s.cursor();
        self.alloc(ExprKind::Ref { target, supplement }, start, end)
    }

    fn at_heading(&self) -> bool {
        let rest = self.s.after();
        let level = rest.chars().take_while(|&c| c == '=').count();
        rest[level..].chars().next().map_or(true, char::is_whitespace)
    }

    fn heading(&mut self, stops: Stops) -> ExprId {
        let start = self.s.cursor();
        let level = self.s.eat_while(|c| c == '=').len();
        self.skip_inline_space();
        let body = self.markup(
            Stops {
                newline: true,
                line_label: true,
                ..stops.nested()
            },
            false,
        );
        let end = self.s.cursor();
        let level = u8::try_from(level).unwrap_or(u8::MAX);
        self.alloc(ExprKind::Heading { level, body }, start, end)
    }

    /// The body of a list item: the rest of the line plus every following
    /// line indented deeper than the marker.
    fn item_body(&mut self, stops: Stops, column: usize) -> ExprId {
        self.markup(
            Stops {
                indent: Some(column),
                ..stops.nested()
            },
            true,
        )
    }

    fn list_item(&mut self, stops: Stops) -> ExprId {
        let start = self.s.cursor();
        let column = self.s.column(start);
        self.s.eat();
        self.skip_inline_space();
        let body = self.item_body(stops, column);
        let end = self.s.cursor();
        self.alloc(ExprKind::ListItem(body), start, end)
    }

    fn at_enum_number(&self) -> bool {
        let rest = self.s.after();
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let mut tail = rest[digits..].chars();
        digits > 0 && tail.next() == Some('.') && tail.next().map_or(true, char::is_whitespace)
    }

    fn enum_item(&mut self, stops: Stops) -> ExprId {
        let start = self.s.cursor();
        let column = self.s.column(start);
        let number = if self.s.eat_if("+") {
            None
        } else {
            let digits = self.s.eat_while(|c| c.is_ascii_digit());
            let number = digits.parse::<u64>().ok();
            if number.is_none() {
                let end = self.s.cursor();
                self.error(
                    SyntaxErrorKind::InvalidLiteral,
                    "enum number is too large",
                    start,
                    end,
                );
            }
            self.s.eat_if(".");
            number
        };
        self.skip_inline_space();
        let body = self.item_body(stops, column);
        let end = self.s.cursor();
        self.alloc(ExprKind::EnumItem { number, body }, start, end)
    }

    fn term_item(&mut self, stops: Stops) -> ExprId {
        let start = self.s.cursor();
        let column = self.s.column(start);
        self.s.eat();
        self.skip_inline_space();
        let term = self.markup(
            Stops {
                colon: true,
                newline: true,
                ..stops.nested()
            },
            false,
        );
        if !self.s.eat_if(":") {
            let pos = self.s.cursor();
            self.error(
                SyntaxErrorKind::UnexpectedToken,
                "expected colon after term",
                pos,
                pos,
            );
        }
        self.skip_inline_space();
        let description = self.item_body(stops, column);
        let end = self.s.cursor();
        self.alloc(ExprKind::TermItem { term, description }, start, end)
    }

    /// Whether `#` at the cursor starts an embedded expression.
    pub(crate) fn at_embedded_code(&self) -> bool {
        self.s
            .peek_nth(1)
            .is_some_and(|c| is_id_start(c) || matches!(c, '(' | '[' | '{' | '"'))
    }

    /// Parse `#expr` and resume scanning after the expression.
    pub(crate) fn embedded_code(&mut self) -> ExprId {
        self.s.eat();
        self.enter_code();
        let expr = self.with_mode(NewlineMode::Stop, |p| p.embedded_expr());
        self.exit_code();
        self.s.eat_if(";");
        expr
    }

    /// Parse `[..]` at the scanner position.
    pub(crate) fn markup_block(&mut self) -> ExprId {
        let start = self.s.cursor();
        self.s.eat();
        let body = self.markup(
            Stops {
                bracket: true,
                ..Stops::default()
            },
            true,
        );
        if !self.s.eat_if("]") {
            self.error(
                SyntaxErrorKind::UnclosedDelimiter,
                "unclosed delimiter `[`",
                start,
                start + 1,
            );
        }
        let end = self.s.cursor();
        self.alloc(ExprKind::ContentBlock(body), start, end)
    }

    /// Parse a content block while in code mode; the current token is `[`.
    pub(crate) fn content_block(&mut self) -> ExprId {
        self.s.jump(self.token.start);
        let block = self.markup_block();
        self.resync(self.s.cursor());
        block
    }
}

fn at_markup_stop(c: char, stops: Stops, depth: usize) -> bool {
    match c {
        ']' => stops.bracket && depth == 0,
        '*' => stops.strong,
        '_' => stops.emph,
        ':' => stops.colon,
        _ => false,
    }
}

/// Trim the fences of a raw block: a blank first and last line are dropped
/// and the common indentation is removed.
fn trim_raw_block(body: &str) -> String {
    let mut lines: Vec<&str> = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() == 1 {
        let line = lines[0];
        let line = line.strip_prefix(' ').unwrap_or(line);
        return line.strip_suffix(' ').unwrap_or(line).to_string();
    }

    if lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}
