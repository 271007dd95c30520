//! Interned string identifier.
//!
//! Identifiers, labels and literal text of the AST are interned into a single
//! process-wide table so that `Name` is `Copy`, compares in O(1) and resolves
//! back to `&'static str` without threading an interner through every layer.
//!
//! # Thread Safety
//! The table sits behind a `parking_lot::RwLock`; lookups take the read lock,
//! first-time interning upgrades to the write lock and re-checks.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Name(u32);

struct NameTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

fn table() -> &'static RwLock<NameTable> {
    static TABLE: OnceLock<RwLock<NameTable>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = FxHashMap::default();
        map.insert("", 0);
        RwLock::new(NameTable {
            map,
            strings: vec![""],
        })
    })
}

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn new(s: &str) -> Self {
        {
            let guard = table().read();
            if let Some(&id) = guard.map.get(s) {
                return Name(id);
            }
        }

        let mut guard = table().write();
        if let Some(&id) = guard.map.get(s) {
            return Name(id);
        }

        let id = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("name table exceeded {} entries", u32::MAX));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, id);
        Name(id)
    }

    /// Resolve the interned text.
    pub fn as_str(self) -> &'static str {
        table().read().strings[self.0 as usize]
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the empty string.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
