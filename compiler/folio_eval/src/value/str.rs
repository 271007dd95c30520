//! Strings, labels and regular expressions.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use folio_ir::Name;

/// An immutable, cheaply clonable UTF-8 string.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Str(Arc<str>);

impl Str {
    pub fn new() -> Self {
        Str(Arc::from(""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenate two strings.
    #[must_use]
    pub fn concat(&self, other: &str) -> Str {
        let mut buf = String::with_capacity(self.len() + other.len());
        buf.push_str(self);
        buf.push_str(other);
        Str::from(buf)
    }

    /// Repeat the string `n` times; `None` if the result cannot be
    /// allocated.
    pub fn repeat(&self, n: usize) -> Option<Str> {
        if self.is_empty() {
            return Some(Str::default());
        }
        let mut buf = String::new();
        buf.try_reserve_exact(self.len().checked_mul(n)?).ok()?;
        for _ in 0..n {
            buf.push_str(self);
        }
        Some(Str::from(buf))
    }

    /// The string as a quoted literal with escapes.
    pub fn repr(&self) -> String {
        let mut out = String::with_capacity(self.len() + 2);
        out.push('"');
        for c in self.chars() {
            match c {
                '\0' => out.push_str("\\u{0}"),
                '\'' => out.push('\''),
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

impl Default for Str {
    fn default() -> Self {
        Str::new()
    }
}

impl Deref for Str {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Str {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Str {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str(Arc::from(s))
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Str(Arc::from(s))
    }
}

impl From<char> for Str {
    fn from(c: char) -> Self {
        Str::from(c.to_string())
    }
}

impl From<Name> for Str {
    fn from(name: Name) -> Self {
        Str::from(name.as_str())
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// A label: an interned identifier for cross-referencing.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Label(pub Name);

impl Label {
    pub fn new(name: &str) -> Self {
        Label(Name::new(name))
    }

    pub fn as_str(self) -> &'static str {
        self.0.as_str()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A compiled regular expression.
///
/// Compares and hashes by its pattern.
#[derive(Clone)]
pub struct Regex(Arc<regex::Regex>);

impl Regex {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, String> {
        regex::Regex::new(pattern)
            .map(|re| Regex(Arc::new(re)))
            .map_err(|err| format!("failed to parse regular expression: {err}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Regex {
    type Target = regex::Regex;

    fn deref(&self) -> &regex::Regex {
        &self.0
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Regex {}

impl std::hash::Hash for Regex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regex({})", Str::from(self.as_str()).repr())
    }
}

/// An immutable byte blob.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Bytes(Arc<[u8]>);

impl Bytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate two blobs.
    #[must_use]
    pub fn concat(&self, other: &Bytes) -> Bytes {
        let mut buf = Vec::with_capacity(self.len() + other.len());
        buf.extend_from_slice(self.as_slice());
        buf.extend_from_slice(other.as_slice());
        Bytes::from(buf)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.into())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes({})", self.len())
    }
}
