//! Anonymous memory mappings for the `gengc` heap arena.
//!
//! Every generation of the collector is carved out of one or more [`Mmap`]
//! regions. A region is page aligned, zero filled when first mapped, and
//! unmapped when its handle is dropped.

use std::io;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as os;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as os;

pub use os::page_size;

/// Round `len` up to a multiple of the system page size.
///
/// Returns `None` if the rounded length would overflow `usize`.
#[must_use]
pub fn round_to_pages(len: usize) -> Option<usize> {
    let page = page_size();
    len.checked_add(page - 1).map(|l| l & !(page - 1))
}

/// A handle to an anonymous memory mapped region.
///
/// The region is automatically unmapped when this handle is dropped.
pub struct Mmap {
    inner: os::MmapInner,
}

impl Mmap {
    /// Returns a pointer to the start of the memory mapping.
    #[must_use]
    pub fn ptr(&self) -> *mut u8 {
        self.inner.ptr()
    }

    /// Returns the length of the memory mapping in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the mapping is empty. Mappings are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Address of the first byte of the mapping.
    #[must_use]
    pub fn start(&self) -> usize {
        self.ptr() as usize
    }

    /// Address one past the last byte of the mapping.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start() + self.len()
    }

    /// Whether `addr` lies inside the mapping.
    #[must_use]
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start() && addr < self.end()
    }
}

impl std::fmt::Debug for Mmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mmap")
            .field("start", &format_args!("{:#x}", self.start()))
            .field("len", &self.len())
            .finish()
    }
}

/// Configuration for creating a memory mapping.
#[derive(Debug, Clone)]
pub struct MmapOptions {
    len: usize,
    populate: bool,
    no_reserve: bool,
}

impl MmapOptions {
    /// Creates a new `MmapOptions` with default settings (length 0).
    /// You must set a length before mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            len: 0,
            populate: false,
            no_reserve: false,
        }
    }

    /// Sets the length of the mapping in bytes. It is rounded up to whole
    /// pages when mapped.
    #[must_use]
    pub const fn len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Sets whether to pre-populate (prefault) the page tables.
    ///
    /// On Linux, this adds `MAP_POPULATE`.
    #[must_use]
    pub const fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    /// Sets whether to skip reserving swap space (on supported platforms).
    ///
    /// On Linux, this adds `MAP_NORESERVE`.
    #[must_use]
    pub const fn no_reserve(mut self, no_reserve: bool) -> Self {
        self.no_reserve = no_reserve;
        self
    }

    /// Creates an anonymous, zero filled, read-write memory map.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero length or a length that overflows
    /// when rounded to pages, and the OS error if the mapping fails.
    pub fn map_anon(&self) -> io::Result<Mmap> {
        if self.len == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "length must be greater than 0",
            ));
        }
        let len = round_to_pages(self.len).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "length overflows page rounding")
        })?;

        // SAFETY: a fresh anonymous mapping aliases no existing memory.
        let inner = unsafe { os::MmapInner::map_anon(len, self.populate, self.no_reserve)? };

        Ok(Mmap { inner })
    }
}

impl Default for MmapOptions {
    fn default() -> Self {
        Self::new()
    }
}
