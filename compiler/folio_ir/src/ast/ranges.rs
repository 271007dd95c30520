//! Arena Range Types
//!
//! All range types for arena-allocated data. These are compact representations
//! that store start index and length, enabling efficient iteration over arena data.

/// Macro to define range types for arena-allocated data.
///
/// Each generated type has:
/// - `start: u32` and `len: u32` fields
/// - `EMPTY` constant
/// - `new()`, `is_empty()`, `len()` methods
/// - `Debug` implementation showing the range as `TypeName(start..end)`
macro_rules! define_range {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        #[repr(C)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn to_range(self) -> ::std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + self.len)
            }
        }
    )* };
}

define_range!(
    ExprRange,
    ArgRange,
    ArrayItemRange,
    DictItemRange,
    ParamRange,
    PatternItemRange,
    ImportItemRange,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_empty_constant() {
        assert!(ExprRange::EMPTY.is_empty());
        assert_eq!(ArgRange::EMPTY.len(), 0);
    }

    #[test]
    fn test_range_debug() {
        let r = ParamRange::new(4, 3);
        assert_eq!(format!("{r:?}"), "ParamRange(4..7)");
        assert_eq!(r.to_range(), 4..7);
    }
}
