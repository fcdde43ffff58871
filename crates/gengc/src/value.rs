//! Tagged machine words.
//!
//! Every value the runtime manipulates is a single 64-bit word. The low bits
//! decide what the word means:
//!
//! | bits          | meaning                                   |
//! |---------------|-------------------------------------------|
//! | `0`           | `nil`                                     |
//! | `...1`        | 63-bit signed integer immediate           |
//! | `010` / `110` | `false` / `true`                          |
//! | `...000`      | reference: the address of a heap object   |
//!
//! Because `nil` is the all-zero word, freshly zeroed object slots read back
//! as `nil` without any initialization pass.

use std::fmt;

/// Size of a single value slot in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();

const INT_TAG: u64 = 0b1;
const REF_MASK: u64 = 0b111;
const FALSE_BITS: u64 = 0b010;
const TRUE_BITS: u64 = 0b110;

/// A tagged word: either an immediate or a reference to a heap object.
///
/// References handed out by a [`Heap`](crate::Heap) are only meaningful
/// until the next allocation on that heap. Anything that must survive an
/// allocation has to be kept in a root (see [`Root`](crate::Root)).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Value(u64);

impl Value {
    /// The `nil` value. Zero-initialized slots hold `nil`.
    pub const NIL: Self = Self(0);
    /// The boolean `false` immediate.
    pub const FALSE: Self = Self(FALSE_BITS);
    /// The boolean `true` immediate.
    pub const TRUE: Self = Self(TRUE_BITS);

    /// Smallest integer representable as an immediate.
    pub const INT_MIN: i64 = -(1 << 62);
    /// Largest integer representable as an immediate.
    pub const INT_MAX: i64 = (1 << 62) - 1;

    /// Encode an integer immediate.
    ///
    /// # Panics
    ///
    /// Panics if `n` is outside [`Value::INT_MIN`]..=[`Value::INT_MAX`].
    #[must_use]
    pub const fn int(n: i64) -> Self {
        match Self::try_int(n) {
            Some(v) => v,
            None => panic!("integer does not fit in an immediate"),
        }
    }

    /// Encode an integer immediate, or `None` if it does not fit in 63 bits.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn try_int(n: i64) -> Option<Self> {
        if n < Self::INT_MIN || n > Self::INT_MAX {
            return None;
        }
        Some(Self(((n << 1) as u64) | INT_TAG))
    }

    /// Encode a boolean immediate.
    #[must_use]
    pub const fn bool(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Wrap an object address. The address must be 8-byte aligned and non-null.
    #[inline]
    pub(crate) const fn from_addr(addr: usize) -> Self {
        debug_assert!(addr != 0 && addr as u64 & REF_MASK == 0);
        Self(addr as u64)
    }

    /// Decode an integer immediate.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn as_int(self) -> Option<i64> {
        if self.0 & INT_TAG == INT_TAG {
            Some((self.0 as i64) >> 1)
        } else {
            None
        }
    }

    /// Decode a boolean immediate.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self.0 {
            TRUE_BITS => Some(true),
            FALSE_BITS => Some(false),
            _ => None,
        }
    }

    /// Whether this is `nil`.
    #[inline]
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }

    /// Whether this word refers to a heap object.
    #[inline]
    #[must_use]
    pub const fn is_ref(self) -> bool {
        self.0 != 0 && self.0 & REF_MASK == 0
    }

    /// Whether this word is fully self-contained (`nil`, integer or boolean).
    #[inline]
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        !self.is_ref()
    }

    /// The address of the referenced object, if this is a reference.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn addr(self) -> Option<usize> {
        if self.is_ref() {
            Some(self.0 as usize)
        } else {
            None
        }
    }

    /// The raw word.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::bool(b)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("nil")
        } else if let Some(n) = self.as_int() {
            write!(f, "{n}")
        } else if let Some(b) = self.as_bool() {
            write!(f, "{b}")
        } else if let Some(addr) = self.addr() {
            write!(f, "ref({addr:#x})")
        } else {
            write!(f, "invalid({:#x})", self.0)
        }
    }
}
