//! Copying garbage collection.
//!
//! Both collectors are Cheney-style: roots are evacuated first, then a FIFO
//! worklist of copied-but-unscanned objects is drained until the copied graph
//! is closed. Nothing here recurses, so graph depth only costs worklist
//! entries.
//!
//! - A minor collection evacuates nursery objects into the current old
//!   generation. Old objects stay where they are; the remembered set stands
//!   in for the old-to-young edges.
//! - A major collection evacuates both generations into a fresh old space and
//!   unmaps the previous one.

mod major;
mod minor;

use std::collections::VecDeque;

pub use major::collect_major;
pub use minor::collect_minor;

use crate::error::fatal;
use crate::object::{self, Address, Header, FLAG_REMEMBERED};
use crate::space::{Nursery, OldSpace};
use crate::value::Value;

/// Copies reachable objects out of the from-space and fixes up references.
pub struct Evacuator<'a> {
    nursery: &'a Nursery,
    /// Old generation being evacuated. `None` for minor collections.
    from_old: Option<&'a OldSpace>,
    to: &'a mut OldSpace,
    worklist: VecDeque<Address>,
    bytes_copied: usize,
    objects_copied: usize,
}

impl<'a> Evacuator<'a> {
    /// Evacuate the nursery into `to`.
    pub fn minor(nursery: &'a Nursery, to: &'a mut OldSpace) -> Self {
        Self::new(nursery, None, to)
    }

    /// Evacuate the nursery and `from` into the empty space `to`.
    pub fn major(nursery: &'a Nursery, from: &'a OldSpace, to: &'a mut OldSpace) -> Self {
        Self::new(nursery, Some(from), to)
    }

    fn new(nursery: &'a Nursery, from_old: Option<&'a OldSpace>, to: &'a mut OldSpace) -> Self {
        Self {
            nursery,
            from_old,
            to,
            worklist: VecDeque::new(),
            bytes_copied: 0,
            objects_copied: 0,
        }
    }

    /// Bytes and objects copied so far.
    pub const fn copied(&self) -> (usize, usize) {
        (self.bytes_copied, self.objects_copied)
    }

    /// Header of a from-space object, or `None` if `addr` is not one.
    fn from_space_header(&self, addr: Address) -> Option<Header> {
        if self.nursery.contains(addr) {
            return self.nursery.header_at(addr);
        }
        self.from_old
            .filter(|old| old.contains(addr))
            .and_then(|old| old.header_at(addr))
    }

    /// Return the to-space location of `value`, copying the object on first
    /// visit. Immediates and references outside the from-space come back
    /// unchanged.
    pub fn evacuate(&mut self, value: Value) -> Value {
        let Some(addr) = value.addr() else {
            return value;
        };
        let Some(header) = self.from_space_header(addr) else {
            return value;
        };

        if header.is_forwarded() {
            let to = header.forwarded_to();
            // A slot word that merely looks forwarded is left alone.
            return if self.to.header_at(to).is_some() {
                Value::from_addr(to)
            } else {
                value
            };
        }

        let size = header.object_size();
        let to = match self.to.alloc(size) {
            Ok(to) => to,
            Err(err) => fatal("cannot grow the old generation during a collection", &err),
        };
        // SAFETY: `addr..addr + size` is a validated from-space object and
        // `to..to + size` was just reserved in a different mapping.
        unsafe {
            object::copy_object(addr, to, size);
            object::write_header(to, header.without_flag(FLAG_REMEMBERED));
            object::write_header(addr, Header::forwarding(to));
        }
        self.bytes_copied += size;
        self.objects_copied += 1;
        self.worklist.push_back(to);
        Value::from_addr(to)
    }

    /// Evacuate everything the slots of the object at `addr` refer to.
    ///
    /// # Safety
    ///
    /// `addr` must be a live object in the to-space.
    unsafe fn scan_object(&mut self, addr: Address) {
        let len = unsafe { object::read_header(addr) }.len();
        for index in 0..len {
            // SAFETY: `index < len` of a live object.
            let slot = unsafe { object::slot_ptr(addr, index) };
            let old = unsafe { slot.read() };
            let new = self.evacuate(old);
            if new != old {
                unsafe { slot.write(new) };
            }
        }
    }

    /// Treat the slots of a remembered old object as roots. Returns `false`
    /// if `addr` no longer holds a live object.
    pub fn scan_remembered(&mut self, addr: Address) -> bool {
        if !self.to.header_at(addr).is_some_and(Header::is_valid) {
            return false;
        }
        // SAFETY: validated above; remembered objects live in the space that
        // minor collections copy into.
        unsafe { self.scan_object(addr) };
        true
    }

    /// Scan copied objects until no unscanned copy remains.
    pub fn drain(&mut self) {
        while let Some(addr) = self.worklist.pop_front() {
            // SAFETY: only freshly copied to-space objects are queued.
            unsafe { self.scan_object(addr) };
        }
    }
}
