//! Source location spans.
//!
//! A span names a byte range inside one file. Spans produced by built-ins or
//! synthesized by the evaluator are *detached*: they carry no file and are
//! never shown to the user as a location.

use std::fmt;

use crate::FileId;

/// Source location span.
///
/// Layout: 12 bytes total
/// - file: Option<FileId> - owning file (`None` for detached spans)
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    file: Option<FileId>,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span inside `file`.
    #[inline]
    pub const fn new(file: FileId, start: u32, end: u32) -> Self {
        Span {
            file: Some(file),
            start,
            end,
        }
    }

    /// A span that points nowhere.
    #[inline]
    pub const fn detached() -> Self {
        Span {
            file: None,
            start: 0,
            end: 0,
        }
    }

    /// Create a span without a file (used by tests and parsers of loose text).
    #[inline]
    pub const fn raw(start: u32, end: u32) -> Self {
        Span {
            file: None,
            start,
            end,
        }
    }

    /// Whether the span points nowhere.
    #[inline]
    pub const fn is_detached(&self) -> bool {
        self.file.is_none() && self.start == 0 && self.end == 0
    }

    /// The file this span belongs to.
    #[inline]
    pub const fn id(&self) -> Option<FileId> {
        self.file
    }

    /// Re-home the span into `file`.
    #[inline]
    #[must_use]
    pub const fn with_file(self, file: FileId) -> Span {
        Span {
            file: Some(file),
            start: self.start,
            end: self.end,
        }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if an offset is within this span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Merge two spans to create one covering both.
    ///
    /// A detached side yields the other side unchanged.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        if self.is_detached() {
            return other;
        }
        if other.is_detached() {
            return self;
        }
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return `other` if `self` is detached.
    #[inline]
    #[must_use]
    pub fn or(self, other: Span) -> Span {
        if self.is_detached() {
            other
        } else {
            self
        }
    }

    /// Convert to a `std::ops::Range`.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file {
            Some(file) => write!(f, "{}@{}..{}", file.raw(), self.start, self.end),
            None => write!(f, "{}..{}", self.start, self.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file {
            Some(file) => write!(f, "{}:{}..{}", file.vpath(), self.start, self.end),
            None => write!(f, "{}..{}", self.start, self.end),
        }
    }
}

/// A value paired with the span it came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Spanned<T> {
    pub v: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(v: T, span: Span) -> Self {
        Self { v, span }
    }

    /// Map the inner value, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            v: f(self.v),
            span: self.span,
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 12);
}
