//! Character cursor over source text.
//!
//! Markup and math are scanned character by character; code is lexed into
//! tokens on demand from the same cursor position. Positions are byte
//! offsets and always lie on character boundaries.

/// A byte-offset cursor over a string.
#[derive(Clone, Debug)]
pub struct Scanner<'s> {
    text: &'s str,
    pos: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(text: &'s str) -> Self {
        Scanner { text, pos: 0 }
    }

    /// The full text being scanned.
    #[inline]
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// The current byte offset.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Move the cursor, clamped to the text and snapped back to a character
    /// boundary.
    pub fn jump(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The text after the cursor.
    #[inline]
    pub fn after(&self) -> &'s str {
        &self.text[self.pos..]
    }

    /// The text before the cursor.
    #[inline]
    pub fn before(&self) -> &'s str {
        &self.text[..self.pos]
    }

    /// The text between `start` and the cursor.
    #[inline]
    pub fn from(&self, start: usize) -> &'s str {
        &self.text[start.min(self.pos)..self.pos]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.after().chars().next()
    }

    /// The `n`-th character after the cursor (0 is [`peek`](Self::peek)).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.after().chars().nth(n)
    }

    /// The character before the cursor.
    pub fn prev(&self) -> Option<char> {
        self.before().chars().next_back()
    }

    #[inline]
    pub fn at(&self, pat: &str) -> bool {
        self.after().starts_with(pat)
    }

    pub fn at_char(&self, f: impl FnOnce(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Consume one character.
    pub fn eat(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `pat` if the text continues with it.
    pub fn eat_if(&mut self, pat: &str) -> bool {
        if self.at(pat) {
            self.pos += pat.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `f` holds and return them.
    pub fn eat_while(&mut self, mut f: impl FnMut(char) -> bool) -> &'s str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    /// Consume characters until `f` holds and return them.
    pub fn eat_until(&mut self, mut f: impl FnMut(char) -> bool) -> &'s str {
        self.eat_while(|c| !f(c))
    }

    /// Column of the cursor in characters, counted from the start of the
    /// current line.
    pub fn column(&self, pos: usize) -> usize {
        let before = &self.text[..pos.min(self.text.len())];
        let line_start = before.rfind(['\n', '\r']).map_or(0, |i| i + 1);
        before[line_start..].chars().count()
    }
}

/// Whether a character is a newline in the sense of line breaking.
#[inline]
pub fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\n' | '\x0B' | '\x0C' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Whether a character can appear in a label or reference name.
#[inline]
pub fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Count the newlines in a piece of whitespace, treating `\r\n` as one.
pub fn count_newlines(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if is_newline(c) {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            count += 1;
        }
    }
    count
}
