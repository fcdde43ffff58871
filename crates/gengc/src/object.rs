//! Heap object layout.
//!
//! An object is a header word followed by `len` value slots:
//!
//! ```text
//! +--------+--------+--------+--------+----------------+
//! | magic  |  kind  | flags  |  ----  |   slot count   |   header (u64)
//! +--------+--------+--------+--------+----------------+
//! | slot 0                                              |
//! | ...                                                 |
//! | slot len - 1                                        |
//! +-----------------------------------------------------+
//! ```
//!
//! During a copying pass the header of an evacuated object is overwritten
//! with a forwarding record: the new address with bit 0 set. Live headers
//! always have bit 0 clear (the magic byte is even), so the two never collide.

use std::ptr;

use crate::value::{Value, WORD_SIZE};

/// Address of the first byte of an object (its header).
pub type Address = usize;

/// Size of the object header in bytes.
pub const HEADER_SIZE: usize = WORD_SIZE;

/// Largest slot count an object can carry.
pub const MAX_SLOTS: usize = u32::MAX as usize;

const HEADER_MAGIC: u64 = 0xA0;
const MAGIC_MASK: u64 = 0xFF;
const KIND_SHIFT: u32 = 8;
const FLAGS_SHIFT: u32 = 16;
const LEN_SHIFT: u32 = 32;
const FORWARDED_BIT: u64 = 1;

/// Header flag: the object is queued in the remembered set.
pub const FLAG_REMEMBERED: u8 = 1 << 0;

/// Shape of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectKind {
    /// Fixed-size tuple of value slots.
    Tuple = 1,
}

impl ObjectKind {
    const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Tuple),
            _ => None,
        }
    }
}

/// The first word of every object.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Header(u64);

impl Header {
    /// Build a fresh header with no flags set.
    #[must_use]
    pub const fn new(kind: ObjectKind, len: u32) -> Self {
        Self(HEADER_MAGIC | ((kind as u64) << KIND_SHIFT) | ((len as u64) << LEN_SHIFT))
    }

    /// A forwarding record pointing at `to`.
    #[must_use]
    pub const fn forwarding(to: Address) -> Self {
        Self(to as u64 | FORWARDED_BIT)
    }

    /// Whether this word is a live object header.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & MAGIC_MASK == HEADER_MAGIC && ObjectKind::from_u8(self.raw_kind()).is_some()
    }

    /// Whether this word is a forwarding record.
    #[must_use]
    pub const fn is_forwarded(self) -> bool {
        self.0 & FORWARDED_BIT == FORWARDED_BIT
    }

    /// The new address of a forwarded object.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn forwarded_to(self) -> Address {
        (self.0 & !FORWARDED_BIT) as Address
    }

    /// Number of value slots.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn len(self) -> usize {
        (self.0 >> LEN_SHIFT) as usize
    }

    /// Object kind, if the header is valid.
    #[must_use]
    pub const fn kind(self) -> Option<ObjectKind> {
        ObjectKind::from_u8(self.raw_kind())
    }

    /// Whether `flag` is set.
    #[must_use]
    pub const fn has_flag(self, flag: u8) -> bool {
        self.flags() & flag != 0
    }

    /// Copy of this header with `flag` set.
    #[must_use]
    pub const fn with_flag(self, flag: u8) -> Self {
        Self(self.0 | ((flag as u64) << FLAGS_SHIFT))
    }

    /// Copy of this header with `flag` cleared.
    #[must_use]
    pub const fn without_flag(self, flag: u8) -> Self {
        Self(self.0 & !((flag as u64) << FLAGS_SHIFT))
    }

    /// Total size in bytes of the object this header describes.
    #[must_use]
    pub const fn object_size(self) -> usize {
        HEADER_SIZE + self.len() * WORD_SIZE
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn raw_kind(self) -> u8 {
        (self.0 >> KIND_SHIFT) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn flags(self) -> u8 {
        (self.0 >> FLAGS_SHIFT) as u8
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_forwarded() {
            return write!(f, "Forwarded({:#x})", self.forwarded_to());
        }
        f.debug_struct("Header")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .field("flags", &self.flags())
            .finish()
    }
}

/// Size in bytes of an object with `len` slots, or `None` if it cannot be
/// represented.
#[must_use]
pub const fn object_size(len: usize) -> Option<usize> {
    if len > MAX_SLOTS {
        return None;
    }
    match len.checked_mul(WORD_SIZE) {
        Some(bytes) => bytes.checked_add(HEADER_SIZE),
        None => None,
    }
}

/// Read the header word at `addr`.
///
/// # Safety
///
/// `addr` must be 8-byte aligned and point into a mapped heap region.
#[inline]
pub unsafe fn read_header(addr: Address) -> Header {
    Header(unsafe { ptr::read(addr as *const u64) })
}

/// Overwrite the header word at `addr`.
///
/// # Safety
///
/// `addr` must be the start of an object in a mapped heap region.
#[inline]
pub unsafe fn write_header(addr: Address, header: Header) {
    unsafe { ptr::write(addr as *mut u64, header.0) };
}

/// Pointer to slot `index` of the object at `addr`.
///
/// # Safety
///
/// `index` must be below the object's slot count.
#[inline]
pub unsafe fn slot_ptr(addr: Address, index: usize) -> *mut Value {
    (addr + HEADER_SIZE + index * WORD_SIZE) as *mut Value
}

/// Write a fresh tuple header at `addr` and fill every slot with `nil`.
///
/// # Safety
///
/// `addr..addr + object_size(len)` must be reserved, writable heap memory.
pub unsafe fn init_tuple(addr: Address, len: usize) {
    #[allow(clippy::cast_possible_truncation)]
    let header = Header::new(ObjectKind::Tuple, len as u32);
    unsafe {
        write_header(addr, header);
        ptr::write_bytes(slot_ptr(addr, 0), 0, len);
    }
}

/// Copy `size` bytes of object data from `from` to `to`.
///
/// # Safety
///
/// Both ranges must be mapped and must not overlap.
#[inline]
pub unsafe fn copy_object(from: Address, to: Address, size: usize) {
    unsafe { ptr::copy_nonoverlapping(from as *const u8, to as *mut u8, size) };
}
