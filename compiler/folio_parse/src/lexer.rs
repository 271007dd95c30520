//! Code-mode lexer.
//!
//! Produces one [`Token`] at a time from a byte position. The parser owns the
//! position, so switching back to markup or math after a code expression is
//! a matter of resuming the character scanner at the end of the last token.
//!
//! Trivia (whitespace and comments) is skipped before each token and recorded
//! in the token's `space_before`/`newline_before` flags; whether a newline
//! ends an expression is decided by the parser.

use folio_ir::{is_id_continue, is_id_start, Unit};

use crate::scanner::{is_newline, Scanner};

/// A code token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset after the last character.
    pub end: usize,
    /// Whether trivia preceded the token.
    pub space_before: bool,
    /// Whether the preceding trivia contained a newline.
    pub newline_before: bool,
}

/// Code token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Numeric(f64, Unit),
    Str(String),
    /// A label literal: `<intro>`.
    Label(String),

    // Keywords
    None,
    Auto,
    True,
    False,
    Let,
    Set,
    Show,
    Context,
    If,
    Else,
    For,
    In,
    While,
    Break,
    Continue,
    Return,
    Import,
    Include,
    As,
    Not,
    And,
    Or,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Dots,
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    EqEq,
    ExclEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    PlusEq,
    HyphEq,
    StarEq,
    SlashEq,
    Arrow,
    Dollar,
    Hash,
    Underscore,

    /// A malformed token, with its message.
    Error(&'static str),
    End,
}

impl TokenKind {
    /// A short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Numeric(..) => {
                "number".to_string()
            }
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Label(_) => "label".to_string(),
            TokenKind::Error(message) => (*message).to_string(),
            TokenKind::End => "end of input".to_string(),
            other => match other.text() {
                Some(text) => format!("`{text}`"),
                None => "token".to_string(),
            },
        }
    }

    /// The fixed source text of keywords and punctuation.
    pub fn text(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::None => "none",
            TokenKind::Auto => "auto",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Let => "let",
            TokenKind::Set => "set",
            TokenKind::Show => "show",
            TokenKind::Context => "context",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::While => "while",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Import => "import",
            TokenKind::Include => "include",
            TokenKind::As => "as",
            TokenKind::Not => "not",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Dots => "..",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::ExclEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::PlusEq => "+=",
            TokenKind::HyphEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::Arrow => "=>",
            TokenKind::Dollar => "$",
            TokenKind::Hash => "#",
            TokenKind::Underscore => "_",
            _ => return None,
        })
    }

    /// Whether this token is a keyword that starts a statement.
    pub fn is_statement_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Set
                | TokenKind::Show
                | TokenKind::Context
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Include
        )
    }
}

fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "none" => TokenKind::None,
        "auto" => TokenKind::Auto,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "let" => TokenKind::Let,
        "set" => TokenKind::Set,
        "show" => TokenKind::Show,
        "context" => TokenKind::Context,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "while" => TokenKind::While,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "import" => TokenKind::Import,
        "include" => TokenKind::Include,
        "as" => TokenKind::As,
        "not" => TokenKind::Not,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        _ => return None,
    })
}

/// Skip whitespace and comments; returns `(saw_space, saw_newline)`.
pub fn skip_trivia(s: &mut Scanner<'_>) -> (bool, bool) {
    let start = s.cursor();
    let mut newline = false;
    loop {
        let ws = s.eat_while(char::is_whitespace);
        newline |= ws.chars().any(is_newline);
        if s.at("//") {
            s.eat_until(is_newline);
        } else if s.at("/*") {
            skip_block_comment(s);
        } else {
            break;
        }
    }
    (s.cursor() > start, newline)
}

/// Skip a possibly nested block comment starting at `/*`.
pub fn skip_block_comment(s: &mut Scanner<'_>) -> bool {
    s.eat_if("/*");
    let mut depth = 1;
    while depth > 0 {
        if s.eat_if("*/") {
            depth -= 1;
        } else if s.eat_if("/*") {
            depth += 1;
        } else if s.eat().is_none() {
            return false;
        }
    }
    true
}

/// Lex the next code token at byte offset `pos`.
pub fn lex(text: &str, pos: usize) -> Token {
    let mut s = Scanner::new(text);
    s.jump(pos);
    let (space_before, newline_before) = skip_trivia(&mut s);
    let start = s.cursor();
    let kind = match s.eat() {
        None => TokenKind::End,
        Some(c) => lex_char(&mut s, c, start),
    };
    Token {
        kind,
        start,
        end: s.cursor(),
        space_before,
        newline_before,
    }
}

fn lex_char(s: &mut Scanner<'_>, c: char, start: usize) -> TokenKind {
    match c {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        ':' => TokenKind::Colon,
        '$' => TokenKind::Dollar,
        '#' => TokenKind::Hash,
        '.' if s.eat_if(".") => TokenKind::Dots,
        '.' if s.at_char(|c| c.is_ascii_digit()) => number(s, start),
        '.' => TokenKind::Dot,
        '+' if s.eat_if("=") => TokenKind::PlusEq,
        '+' => TokenKind::Plus,
        '-' if s.eat_if("=") => TokenKind::HyphEq,
        '-' => TokenKind::Minus,
        '*' if s.eat_if("=") => TokenKind::StarEq,
        '*' => TokenKind::Star,
        '/' if s.eat_if("=") => TokenKind::SlashEq,
        '/' => TokenKind::Slash,
        '=' if s.eat_if("=") => TokenKind::EqEq,
        '=' if s.eat_if(">") => TokenKind::Arrow,
        '=' => TokenKind::Eq,
        '!' if s.eat_if("=") => TokenKind::ExclEq,
        '<' if s.eat_if("=") => TokenKind::LtEq,
        '<' => label_or_lt(s),
        '>' if s.eat_if("=") => TokenKind::GtEq,
        '>' => TokenKind::Gt,
        '"' => string(s),
        '_' if !s.at_char(is_id_continue) => TokenKind::Underscore,
        c if c.is_ascii_digit() => number(s, start),
        c if is_id_start(c) => {
            s.eat_while(is_id_continue);
            let ident = s.from(start);
            keyword(ident).unwrap_or_else(|| TokenKind::Ident(ident.to_string()))
        }
        _ => TokenKind::Error("unexpected character"),
    }
}

/// After `<`: a label literal `<name>` or the less-than operator.
fn label_or_lt(s: &mut Scanner<'_>) -> TokenKind {
    let checkpoint = s.cursor();
    let name = s.eat_while(crate::scanner::is_label_char);
    if !name.is_empty() && s.eat_if(">") {
        return TokenKind::Label(name.to_string());
    }
    s.jump(checkpoint);
    TokenKind::Lt
}

fn number(s: &mut Scanner<'_>, start: usize) -> TokenKind {
    let first = s.from(start);
    // Radix prefixes.
    if first == "0" {
        let radix = if s.eat_if("x") {
            16
        } else if s.eat_if("o") {
            8
        } else if s.eat_if("b") {
            2
        } else {
            0
        };
        if radix != 0 {
            let digits = s.eat_while(|c| c.is_ascii_alphanumeric());
            return match i64::from_str_radix(digits, radix) {
                Ok(v) => TokenKind::Int(v),
                Err(_) => TokenKind::Error("invalid number"),
            };
        }
    }

    s.eat_while(|c| c.is_ascii_digit());
    // A fractional part, but not a field access or `..` spread.
    if s.at(".") && s.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
        s.eat();
        s.eat_while(|c| c.is_ascii_digit());
    }
    if (s.at("e") || s.at("E"))
        && (s.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            || (matches!(s.peek_nth(1), Some('+' | '-'))
                && s.peek_nth(2).is_some_and(|c| c.is_ascii_digit())))
    {
        s.eat();
        s.eat_if("+");
        s.eat_if("-");
        s.eat_while(|c| c.is_ascii_digit());
    }
    let number = s.from(start);

    let suffix_start = s.cursor();
    let suffix = if s.eat_if("%") {
        "%"
    } else {
        s.eat_while(|c| c.is_ascii_alphabetic())
    };

    if !suffix.is_empty() {
        let Some(unit) = Unit::from_suffix(suffix) else {
            s.jump(suffix_start);
            s.eat_while(is_id_continue);
            return TokenKind::Error("invalid number suffix");
        };
        return match number.parse::<f64>() {
            Ok(v) => TokenKind::Numeric(v, unit),
            Err(_) => TokenKind::Error("invalid number"),
        };
    }

    if number.contains(['.', 'e', 'E']) {
        match number.parse::<f64>() {
            Ok(v) => TokenKind::Float(v),
            Err(_) => TokenKind::Error("invalid number"),
        }
    } else {
        match number.parse::<i64>() {
            Ok(v) => TokenKind::Int(v),
            // Integers too large for i64 become floats.
            Err(_) => number
                .parse::<f64>()
                .map_or(TokenKind::Error("invalid number"), TokenKind::Float),
        }
    }
}

fn string(s: &mut Scanner<'_>) -> TokenKind {
    let mut out = String::new();
    loop {
        match s.eat() {
            None => return TokenKind::Error("unclosed string"),
            Some('"') => return TokenKind::Str(out),
            Some('\\') => match s.eat() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('u') if s.eat_if("{") => {
                    let hex = s.eat_while(|c| c.is_ascii_hexdigit());
                    let decoded = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
                    match (decoded, s.eat_if("}")) {
                        (Some(c), true) => out.push(c),
                        _ => return TokenKind::Error("invalid unicode escape"),
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return TokenKind::Error("unclosed string"),
            },
            Some(c) => out.push(c),
        }
    }
}

/// Decode a `\u{..}` escape body; shared with markup escapes.
pub fn decode_unicode_escape(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests;
