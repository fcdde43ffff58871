//! Generational write barrier and remembered set.
//!
//! After a reference is stored into an object, the mutator calls
//! [`Heap::write_barrier`](crate::Heap::write_barrier). If that store created
//! an old-to-young edge, the containing object is queued here so that the
//! next minor collection can treat its slots as roots without scanning the
//! whole old generation.
//!
//! Objects still in the nursery are never recorded: if they are reachable at
//! the next minor collection they are traced anyway. Omitting the call after
//! storing into an old object leaves the edge invisible to the collector and
//! the young target is reclaimed while still referenced.

use crate::object::{self, Address, Header, FLAG_REMEMBERED};
use crate::space::{Nursery, OldSpace};
use crate::value::Value;

/// Old objects that may hold references into the nursery.
///
/// Membership is mirrored by the [`FLAG_REMEMBERED`] header bit, which keeps
/// the list free of duplicates.
#[derive(Debug, Default)]
pub struct RememberedSet {
    entries: Vec<Address>,
}

impl RememberedSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of recorded objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record `obj` if `written` makes it hold an old-to-young edge.
    /// Returns whether the set grew.
    pub fn record(&mut self, nursery: &Nursery, old: &OldSpace, obj: Value, written: Value) -> bool {
        let Some(target) = written.addr() else {
            return false;
        };
        if !nursery.contains(target) {
            return false;
        }
        let Some(addr) = obj.addr() else {
            return false;
        };
        match old.header_at(addr) {
            Some(header) if header.is_valid() => self.insert(addr, header),
            _ => false,
        }
    }

    fn insert(&mut self, addr: Address, header: Header) -> bool {
        if header.has_flag(FLAG_REMEMBERED) {
            return false;
        }
        // SAFETY: `addr` was validated as the start of a live old object.
        unsafe { object::write_header(addr, header.with_flag(FLAG_REMEMBERED)) };
        self.entries.push(addr);
        true
    }

    /// Remove every entry, clearing the header flags of the ones that still
    /// look like live objects in `old`, and return the entries.
    pub fn drain(&mut self, old: &OldSpace) -> Vec<Address> {
        let entries = std::mem::take(&mut self.entries);
        for &addr in &entries {
            if let Some(header) = old.header_at(addr).filter(|h| h.is_valid()) {
                // SAFETY: validated by `header_at`.
                unsafe { object::write_header(addr, header.without_flag(FLAG_REMEMBERED)) };
            }
        }
        entries
    }

    /// Forget every entry without touching headers. Used when the objects
    /// themselves have been evacuated and their copies carry no flag.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
