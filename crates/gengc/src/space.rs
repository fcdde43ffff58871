//! Heap arena: the memory regions backing both generations.
//!
//! The nursery is a single mapped region with a bump pointer. The old
//! generation is a list of mapped chunks, each with its own bump pointer;
//! only the most recent chunk is allocated from, and a new chunk is mapped
//! whenever a request does not fit in it. Regions are never reused in place:
//! a major collection evacuates into a fresh [`OldSpace`] and drops the
//! previous one, unmapping its chunks.

use std::collections::BTreeMap;
use std::io;

use sys_alloc::{Mmap, MmapOptions};

use crate::object::{self, Address, Header};
use crate::value::WORD_SIZE;

fn map_region(len: usize) -> io::Result<Mmap> {
    MmapOptions::new().len(len).no_reserve(true).map_anon()
}

/// Check that `addr` can start an object inside `[start, top)` and return its
/// header word. Forwarding records are accepted as-is; live headers must
/// describe an object that ends at or before `top`.
fn header_within(addr: Address, start: Address, top: Address) -> Option<Header> {
    if addr < start || addr >= top || addr % WORD_SIZE != 0 {
        return None;
    }
    // SAFETY: `addr` is aligned and inside the allocated part of a mapped region.
    let header = unsafe { object::read_header(addr) };
    if header.is_forwarded() {
        return Some(header);
    }
    if !header.is_valid() {
        return None;
    }
    match addr.checked_add(header.object_size()) {
        Some(end) if end <= top => Some(header),
        _ => None,
    }
}

// ============================================================================
// Nursery
// ============================================================================

/// The young generation.
pub struct Nursery {
    map: Mmap,
    capacity: usize,
    top: Address,
}

impl Nursery {
    /// Map a nursery able to hold `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the region cannot be mapped.
    pub fn new(capacity: usize) -> io::Result<Self> {
        let map = map_region(capacity)?;
        let top = map.start();
        Ok(Self { map, capacity, top })
    }

    /// First byte of the nursery.
    #[inline]
    #[must_use]
    pub fn start(&self) -> Address {
        self.map.start()
    }

    /// One past the last allocatable byte.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Address {
        self.start() + self.capacity
    }

    /// Configured capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out since the last reset.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.top - self.start()
    }

    /// Bytes still available for bump allocation.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.end() - self.top
    }

    /// Whether `addr` lies in the allocated part of the nursery.
    #[inline]
    #[must_use]
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start() && addr < self.top
    }

    /// Bump-allocate `size` bytes, or `None` if they do not fit.
    #[inline]
    pub fn bump(&mut self, size: usize) -> Option<Address> {
        if size > self.available() {
            return None;
        }
        let addr = self.top;
        self.top += size;
        Some(addr)
    }

    /// Discard every object in the nursery.
    pub fn reset(&mut self) {
        self.top = self.start();
    }

    /// Header at `addr` if it plausibly starts a nursery object.
    #[must_use]
    pub fn header_at(&self, addr: Address) -> Option<Header> {
        header_within(addr, self.start(), self.top)
    }
}

impl std::fmt::Debug for Nursery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nursery")
            .field("start", &format_args!("{:#x}", self.start()))
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .finish()
    }
}

// ============================================================================
// Old generation
// ============================================================================

/// One mapped region of the old generation.
struct Chunk {
    map: Mmap,
    top: Address,
}

impl Chunk {
    fn new(len: usize) -> io::Result<Self> {
        let map = map_region(len)?;
        let top = map.start();
        Ok(Self { map, top })
    }

    fn bump(&mut self, size: usize) -> Option<Address> {
        if size > self.map.end() - self.top {
            return None;
        }
        let addr = self.top;
        self.top += size;
        Some(addr)
    }
}

/// The old generation.
pub struct OldSpace {
    chunks: Vec<Chunk>,
    /// Chunk start address to index in `chunks`, for address lookups.
    index: BTreeMap<Address, usize>,
    chunk_size: usize,
    used: usize,
}

impl OldSpace {
    /// An empty old space that maps chunks of at least `chunk_size` bytes.
    #[must_use]
    pub const fn new(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            index: BTreeMap::new(),
            chunk_size,
            used: 0,
        }
    }

    /// Bytes occupied by objects.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }

    /// Bytes currently mapped for this space.
    #[must_use]
    pub fn mapped(&self) -> usize {
        self.chunks.iter().map(|c| c.map.len()).sum()
    }

    #[cfg(test)]
    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Bump-allocate `size` bytes, mapping a new chunk when the current one
    /// is full.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a new chunk cannot be mapped.
    pub fn alloc(&mut self, size: usize) -> io::Result<Address> {
        if let Some(addr) = self.chunks.last_mut().and_then(|c| c.bump(size)) {
            self.used += size;
            return Ok(addr);
        }
        let chunk = self.push_chunk(size)?;
        let addr = chunk.bump(size).ok_or_else(|| {
            io::Error::new(io::ErrorKind::OutOfMemory, "fresh chunk too small")
        })?;
        self.used += size;
        Ok(addr)
    }

    fn push_chunk(&mut self, min_size: usize) -> io::Result<&mut Chunk> {
        let chunk = Chunk::new(min_size.max(self.chunk_size))?;
        self.index.insert(chunk.map.start(), self.chunks.len());
        self.chunks.push(chunk);
        let last = self.chunks.len() - 1;
        Ok(&mut self.chunks[last])
    }

    /// Whether `addr` lies in the allocated part of some chunk.
    #[must_use]
    pub fn contains(&self, addr: Address) -> bool {
        self.chunk_for(addr)
            .is_some_and(|c| addr >= c.map.start() && addr < c.top)
    }

    /// Header at `addr` if it plausibly starts an old object.
    #[must_use]
    pub fn header_at(&self, addr: Address) -> Option<Header> {
        let chunk = self.chunk_for(addr)?;
        header_within(addr, chunk.map.start(), chunk.top)
    }

    fn chunk_for(&self, addr: Address) -> Option<&Chunk> {
        let (_, &idx) = self.index.range(..=addr).next_back()?;
        self.chunks.get(idx)
    }
}

impl std::fmt::Debug for OldSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OldSpace")
            .field("chunks", &self.chunks.len())
            .field("used", &self.used)
            .field("mapped", &self.mapped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::init_tuple;

    #[test]
    fn test_nursery_bump_and_reset() {
        let mut nursery = Nursery::new(4096).unwrap();
        assert_eq!(nursery.capacity(), 4096);
        assert_eq!(nursery.used(), 0);

        let a = nursery.bump(24).unwrap();
        let b = nursery.bump(24).unwrap();
        assert_eq!(b, a + 24);
        assert_eq!(nursery.used(), 48);
        assert!(nursery.contains(a));
        assert!(!nursery.contains(b + 24));

        assert!(nursery.bump(4096).is_none());

        nursery.reset();
        assert_eq!(nursery.used(), 0);
        assert!(!nursery.contains(a));
        assert_eq!(nursery.bump(8), Some(a));
    }

    #[test]
    fn test_nursery_header_lookup_checks_bounds() {
        let mut nursery = Nursery::new(4096).unwrap();
        let addr = nursery.bump(24).unwrap();
        unsafe { init_tuple(addr, 2) };
        assert_eq!(nursery.header_at(addr).map(Header::len), Some(2));
        assert!(nursery.header_at(addr + 4).is_none());
        assert!(nursery.header_at(addr + 8).is_none());
    }

    #[test]
    fn test_old_space_grows_by_chunks() {
        let page = sys_alloc::page_size();
        let mut old = OldSpace::new(page);
        let a = old.alloc(1024).unwrap();
        let b = old.alloc(1024).unwrap();
        assert_eq!(old.chunk_count(), 1);
        assert_eq!(b, a + 1024);

        // Does not fit in the remaining space of the first chunk.
        let big = old.alloc(2 * page).unwrap();
        assert_eq!(old.chunk_count(), 2);
        assert!(old.mapped() >= 3 * page);
        assert_eq!(old.used(), 1024 + 1024 + 2 * page);

        assert!(old.contains(a));
        assert!(old.contains(big));
        // Past the bump pointer of the first chunk but still inside its
        // mapping. Chunk mappings themselves may be adjacent.
        assert!(!old.contains(b + 1024));
        assert!(old.header_at(b + 1024).is_none());
    }

    #[test]
    fn test_old_space_header_lookup() {
        let mut old = OldSpace::new(4096);
        let addr = old.alloc(32).unwrap();
        unsafe { init_tuple(addr, 3) };
        assert_eq!(old.header_at(addr).map(Header::len), Some(3));
        assert!(old.header_at(addr + 32).is_none());
        assert!(old.header_at(0x10).is_none());
    }
}
