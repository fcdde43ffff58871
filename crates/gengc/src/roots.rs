//! Root tracking using a shadow stack and a global root table.
//!
//! The collector never looks at the native stack. Anything the mutator
//! needs to survive an allocation must live in one of two places:
//!
//! - the **shadow stack**, a LIFO of value slots grouped into frames;
//! - the **global table**, a set of long-lived slots addressed by handle.
//!
//! Both are rewritten in place when the objects they refer to move.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::tracing::log_warning;
use crate::value::Value;

/// Handle to a shadow stack slot.
///
/// Only valid while the slot is on the stack: popping it, or leaving the
/// frame that contains it, invalidates the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root(usize);

impl Root {
    /// Position of the slot on the shadow stack.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Marker returned by [`Heap::enter_frame`](crate::Heap::enter_frame).
///
/// Frames must be left in reverse order of entry.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a frame must be passed back to `leave_frame`"]
pub struct Frame {
    depth: usize,
    mark: usize,
}

/// Handle to a slot of the global root table.
///
/// A handle is only accepted by the heap that issued it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct GlobalRoot {
    table: usize,
    index: usize,
}

// ============================================================================
// ShadowStack
// ============================================================================

/// Precise replacement for conservative stack scanning.
#[derive(Debug, Default)]
pub struct ShadowStack {
    slots: Vec<Value>,
    frames: Vec<usize>,
    /// Slots below `base` are not scanned.
    base: usize,
    anomalies: usize,
}

impl ShadowStack {
    /// Create a new empty shadow stack scanning from `base`.
    #[must_use]
    pub const fn new(base: usize) -> Self {
        Self {
            slots: Vec::new(),
            frames: Vec::new(),
            base,
            anomalies: 0,
        }
    }

    /// Number of slots on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Recorded scan base.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Move the scan base.
    pub fn rebase(&mut self, base: usize) {
        self.base = base;
    }

    /// Scans skipped because the base was above the top of the stack.
    #[must_use]
    pub const fn anomalies(&self) -> usize {
        self.anomalies
    }

    /// Push a slot.
    pub fn push(&mut self, value: Value) -> Root {
        self.slots.push(value);
        Root(self.slots.len() - 1)
    }

    /// Pop the top slot, unless it belongs to an enclosing frame.
    pub fn pop(&mut self) -> Option<Value> {
        let floor = self.frames.last().copied().unwrap_or(0);
        if self.slots.len() <= floor {
            return None;
        }
        self.slots.pop()
    }

    /// Current value of a slot.
    #[must_use]
    pub fn get(&self, root: Root) -> Option<Value> {
        self.slots.get(root.0).copied()
    }

    /// Overwrite a slot. Returns `false` if the handle is stale.
    pub fn set(&mut self, root: Root, value: Value) -> bool {
        match self.slots.get_mut(root.0) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Open a frame at the current top.
    pub fn enter_frame(&mut self) -> Frame {
        let mark = self.slots.len();
        self.frames.push(mark);
        Frame {
            depth: self.frames.len(),
            mark,
        }
    }

    /// Close `frame`, dropping every slot pushed since it was entered.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not the innermost open frame.
    pub fn leave_frame(&mut self, frame: Frame) {
        assert!(
            self.frames.len() == frame.depth && self.frames.last() == Some(&frame.mark),
            "shadow stack frames left out of order (frame depth {}, open frames {})",
            frame.depth,
            self.frames.len()
        );
        self.frames.pop();
        self.slots.truncate(frame.mark);
    }

    /// Visit every scanned slot. Returns the number of slots visited.
    ///
    /// An inverted range (base above the top) is reported once per scan and
    /// scans nothing.
    pub fn scan(&mut self, mut visit: impl FnMut(&mut Value)) -> usize {
        if self.base > self.slots.len() {
            self.anomalies += 1;
            log_warning(
                "shadow stack base is above its top; skipping stack roots",
                &format_args!("base {} > top {}", self.base, self.slots.len()),
            );
            return 0;
        }
        let scanned = &mut self.slots[self.base..];
        for slot in scanned.iter_mut() {
            visit(slot);
        }
        scanned.len()
    }
}

// ============================================================================
// GlobalRoots
// ============================================================================

static NEXT_TABLE_ID: AtomicUsize = AtomicUsize::new(0);

/// Long-lived roots, independent of the shadow stack discipline.
#[derive(Debug)]
pub struct GlobalRoots {
    id: usize,
    slots: Vec<Option<Value>>,
    free: Vec<usize>,
}

impl Default for GlobalRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalRoots {
    /// Create an empty table with a process-unique id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    const fn root(&self, index: usize) -> GlobalRoot {
        GlobalRoot {
            table: self.id,
            index,
        }
    }

    fn slot(&mut self, root: &GlobalRoot) -> Option<&mut Option<Value>> {
        if root.table != self.id {
            return None;
        }
        self.slots.get_mut(root.index)
    }

    /// Number of registered roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Register a new root.
    pub fn add(&mut self, value: Value) -> GlobalRoot {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(value);
            return self.root(idx);
        }
        self.slots.push(Some(value));
        self.root(self.slots.len() - 1)
    }

    /// Current value of a root, or `None` if this table did not issue it.
    #[must_use]
    pub fn get(&self, root: &GlobalRoot) -> Option<Value> {
        if root.table != self.id {
            return None;
        }
        self.slots.get(root.index).copied().flatten()
    }

    /// Overwrite a root. Returns `false` if this table did not issue it.
    pub fn set(&mut self, root: &GlobalRoot, value: Value) -> bool {
        match self.slot(root) {
            Some(slot) if slot.is_some() => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Unregister a root, returning its last value.
    pub fn remove(&mut self, root: GlobalRoot) -> Option<Value> {
        let value = self.slot(&root)?.take()?;
        self.free.push(root.index);
        Some(value)
    }

    /// Visit every registered root. Returns the number visited.
    pub fn scan(&mut self, mut visit: impl FnMut(&mut Value)) -> usize {
        let mut visited = 0;
        for value in self.slots.iter_mut().flatten() {
            visit(value);
            visited += 1;
        }
        visited
    }
}
