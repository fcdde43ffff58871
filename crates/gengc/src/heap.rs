//! The heap: allocation, slot access, roots and collection triggers.

use std::fmt;
use std::marker::PhantomData;

use crate::barrier::RememberedSet;
use crate::config::HeapConfig;
use crate::error::{fatal, Error, Result};
use crate::gc;
use crate::metrics::{Counters, GcHistory, GcMetrics};
use crate::object::{self, Address, Header};
use crate::policy::SizePolicy;
use crate::roots::{Frame, GlobalRoot, GlobalRoots, Root, ShadowStack};
use crate::space::{Nursery, OldSpace};
use crate::tracing::internal::{log_collection, log_nursery_resize, log_threshold};
use crate::tracing::log_warning;
use crate::value::Value;

/// A garbage-collected heap with a nursery and an old generation.
///
/// A `Heap` is an explicit context: every allocation, slot access and root
/// operation goes through it, and several heaps can coexist on one thread.
/// It is neither `Send` nor `Sync`.
///
/// # Rooting
///
/// Any call that allocates may move objects. A [`Value`] held only in a Rust
/// local is not a root and is stale after the next allocation; keep it on
/// the shadow stack ([`push_root`](Self::push_root)) or in a global root
/// ([`add_global`](Self::add_global)) and read it back afterwards.
///
/// # Write barrier
///
/// After storing a reference into an object that was allocated by an
/// earlier call, call [`write_barrier`](Self::write_barrier), or use
/// [`store`](Self::store), which does both. Skipping the barrier lets a
/// minor collection reclaim a young object that an old one still refers to.
///
/// ```
/// use gengc::{Heap, Value};
///
/// let mut heap = Heap::with_default_config().unwrap();
/// let pair = heap.alloc(2);
/// let pair = heap.push_root(pair);
///
/// let child = heap.alloc(1);
/// heap.store(heap.root(pair), 0, child);
/// heap.set(child, 0, Value::int(42));
///
/// heap.collect_minor();
/// let child = heap.get(heap.root(pair), 0);
/// assert_eq!(heap.get(child, 0), Value::int(42));
/// assert!(heap.is_old(child));
/// ```
pub struct Heap {
    pub(crate) config: HeapConfig,
    pub(crate) nursery: Nursery,
    pub(crate) old: OldSpace,
    pub(crate) remembered: RememberedSet,
    pub(crate) stack: ShadowStack,
    pub(crate) globals: GlobalRoots,
    pub(crate) policy: SizePolicy,
    counters: Counters,
    bytes_promoted: u64,
    _not_send: PhantomData<*mut ()>,
}

impl Heap {
    /// Create a heap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate and
    /// [`Error::Os`] if the nursery cannot be mapped.
    pub fn new(config: HeapConfig) -> Result<Self> {
        Self::with_stack_base(config, 0)
    }

    /// Create a heap with [`HeapConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] if the nursery cannot be mapped.
    pub fn with_default_config() -> Result<Self> {
        Self::new(HeapConfig::default())
    }

    /// Create a heap whose shadow stack is scanned from `base` upwards.
    ///
    /// Slots below `base` are never treated as roots. A base above the
    /// current stack depth at collection time is reported as an anomaly
    /// and no stack slot is scanned.
    ///
    /// # Errors
    ///
    /// Same as [`Heap::new`].
    pub fn with_stack_base(config: HeapConfig, base: usize) -> Result<Self> {
        config.validate()?;
        let nursery = Nursery::new(config.nursery_size)?;
        Ok(Self {
            policy: SizePolicy::new(&config),
            old: OldSpace::new(config.old_chunk_size),
            nursery,
            remembered: RememberedSet::new(),
            stack: ShadowStack::new(base),
            globals: GlobalRoots::new(),
            counters: Counters::default(),
            bytes_promoted: 0,
            config,
            _not_send: PhantomData,
        })
    }

    /// The configuration this heap was built with.
    #[must_use]
    pub const fn config(&self) -> &HeapConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Allocate a tuple of `len` slots, all `nil`.
    ///
    /// Objects are bump-allocated in the nursery. When it is full a minor
    /// collection runs and the nursery is tried again; an object that still
    /// does not fit goes straight to the old generation. Either way, every
    /// unrooted reference may be stale afterwards.
    ///
    /// # Errors
    ///
    /// - [`Error::TooLarge`] if `len` exceeds [`MAX_SLOTS`](crate::MAX_SLOTS).
    /// - [`Error::Exhausted`] if the old generation cannot hold the object
    ///   within `max_heap_size`, even after a major collection.
    /// - [`Error::Os`] if mapping memory fails.
    pub fn try_alloc(&mut self, len: usize) -> Result<Value> {
        let size = object::object_size(len).ok_or(Error::TooLarge { slots: len })?;
        let addr = match self.nursery.bump(size) {
            Some(addr) => addr,
            None => {
                self.collect_minor();
                self.check_heap_limit(size)?;
                match self.nursery.bump(size) {
                    Some(addr) => addr,
                    None => self.alloc_old(size)?,
                }
            }
        };
        // SAFETY: `addr..addr + size` was just reserved for this object.
        unsafe { object::init_tuple(addr, len) };
        Ok(Value::from_addr(addr))
    }

    /// Allocate a tuple of `len` slots, all `nil`.
    ///
    /// # Panics
    ///
    /// Panics if [`try_alloc`](Self::try_alloc) fails. Heap exhaustion is
    /// not recoverable through this entry point.
    #[track_caller]
    pub fn alloc(&mut self, len: usize) -> Value {
        match self.try_alloc(len) {
            Ok(value) => value,
            Err(err) => fatal("allocation failed", &err),
        }
    }

    /// Large-object path: place `size` bytes directly in the old generation.
    fn alloc_old(&mut self, size: usize) -> Result<Address> {
        if self.old.used().saturating_add(size) > self.policy.major_threshold() {
            self.collect_major();
        }
        self.check_heap_limit(size)?;
        if self.old.used() + size > self.config.max_heap_size {
            return Err(self.exhausted(size));
        }
        Ok(self.old.alloc(size)?)
    }

    /// Fail if the survivors alone already exceed `max_heap_size`.
    fn check_heap_limit(&self, requested: usize) -> Result<()> {
        if self.old.used() > self.config.max_heap_size {
            return Err(self.exhausted(requested));
        }
        Ok(())
    }

    const fn exhausted(&self, requested: usize) -> Error {
        Error::Exhausted {
            requested,
            heap_size: self.old.used(),
            limit: self.config.max_heap_size,
        }
    }

    // ------------------------------------------------------------------
    // Slot access
    // ------------------------------------------------------------------

    fn object(&self, obj: Value) -> Result<(Address, Header)> {
        let invalid = || Error::InvalidReference {
            bits: obj.to_bits(),
        };
        let addr = obj.addr().ok_or_else(invalid)?;
        let header = self
            .nursery
            .header_at(addr)
            .or_else(|| self.old.header_at(addr))
            .filter(|h| h.is_valid())
            .ok_or_else(invalid)?;
        Ok((addr, header))
    }

    /// Slot count of `obj`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] if `obj` is not a live object of
    /// this heap.
    pub fn try_len(&self, obj: Value) -> Result<usize> {
        self.object(obj).map(|(_, header)| header.len())
    }

    /// Slot count of `obj`.
    ///
    /// # Panics
    ///
    /// Panics if `obj` is not a live object of this heap.
    #[track_caller]
    #[must_use]
    pub fn len(&self, obj: Value) -> usize {
        self.try_len(obj).unwrap_or_else(|err| panic!("gengc: {err}"))
    }

    /// Read slot `index` of `obj`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] or [`Error::IndexOutOfBounds`].
    pub fn try_get(&self, obj: Value, index: usize) -> Result<Value> {
        let (addr, header) = self.object(obj)?;
        check_index(index, header.len())?;
        // SAFETY: `index` is in bounds of a validated object.
        Ok(unsafe { object::slot_ptr(addr, index).read() })
    }

    /// Read slot `index` of `obj`.
    ///
    /// # Panics
    ///
    /// Panics if `obj` is not a live object of this heap or `index` is out
    /// of bounds.
    #[track_caller]
    #[must_use]
    pub fn get(&self, obj: Value, index: usize) -> Value {
        self.try_get(obj, index)
            .unwrap_or_else(|err| panic!("gengc: {err}"))
    }

    /// Write slot `index` of `obj` without a write barrier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] if `obj`, or `value` when it is a
    /// reference, is not a live object of this heap, and
    /// [`Error::IndexOutOfBounds`] for a bad index.
    pub fn try_set(&mut self, obj: Value, index: usize, value: Value) -> Result<()> {
        let (addr, header) = self.object(obj)?;
        check_index(index, header.len())?;
        if value.is_ref() {
            self.object(value)?;
        }
        // SAFETY: `index` is in bounds of a validated object.
        unsafe { object::slot_ptr(addr, index).write(value) };
        Ok(())
    }

    /// Write slot `index` of `obj` without a write barrier.
    ///
    /// # Panics
    ///
    /// Panics on the conditions [`try_set`](Self::try_set) reports.
    #[track_caller]
    pub fn set(&mut self, obj: Value, index: usize, value: Value) {
        if let Err(err) = self.try_set(obj, index, value) {
            panic!("gengc: {err}");
        }
    }

    /// Write slot `index` of `obj`, then run the write barrier.
    ///
    /// # Panics
    ///
    /// Panics on the conditions [`try_set`](Self::try_set) reports.
    #[track_caller]
    pub fn store(&mut self, obj: Value, index: usize, value: Value) {
        self.set(obj, index, value);
        self.write_barrier(obj, value);
    }

    /// Record that a reference to `written` was stored into `obj`.
    ///
    /// Must be called after every store of a reference into an object that
    /// was allocated by an earlier call. Never collects.
    pub fn write_barrier(&mut self, obj: Value, written: Value) {
        self.remembered
            .record(&self.nursery, &self.old, obj, written);
    }

    // ------------------------------------------------------------------
    // Roots
    // ------------------------------------------------------------------

    /// Push `value` onto the shadow stack.
    pub fn push_root(&mut self, value: Value) -> Root {
        self.stack.push(value)
    }

    /// Current value of a shadow stack slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot has been popped.
    #[track_caller]
    #[must_use]
    pub fn root(&self, root: Root) -> Value {
        self.stack
            .get(root)
            .unwrap_or_else(|| panic!("gengc: stale shadow stack root {}", root.index()))
    }

    /// Overwrite a shadow stack slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot has been popped.
    #[track_caller]
    pub fn set_root(&mut self, root: Root, value: Value) {
        assert!(
            self.stack.set(root, value),
            "gengc: stale shadow stack root {}",
            root.index()
        );
    }

    /// Pop the top shadow stack slot.
    ///
    /// # Panics
    ///
    /// Panics if the innermost frame (or the stack) is empty.
    #[track_caller]
    pub fn pop_root(&mut self) -> Value {
        self.stack
            .pop()
            .unwrap_or_else(|| panic!("gengc: shadow stack underflow"))
    }

    /// Number of slots on the shadow stack.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Shadow stack depth from which slots are scanned.
    #[must_use]
    pub const fn stack_base(&self) -> usize {
        self.stack.base()
    }

    /// Move the recorded shadow stack base.
    pub fn rebase_stack(&mut self, base: usize) {
        self.stack.rebase(base);
    }

    /// Open a shadow stack frame.
    pub fn enter_frame(&mut self) -> Frame {
        self.stack.enter_frame()
    }

    /// Close a frame, dropping the slots pushed inside it.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not the innermost open frame.
    #[track_caller]
    pub fn leave_frame(&mut self, frame: Frame) {
        self.stack.leave_frame(frame);
    }

    /// Run `f` inside a fresh shadow stack frame.
    pub fn scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let frame = self.enter_frame();
        let result = f(self);
        self.leave_frame(frame);
        result
    }

    /// Register a root that lives until [`remove_global`](Self::remove_global).
    pub fn add_global(&mut self, value: Value) -> GlobalRoot {
        self.globals.add(value)
    }

    /// Current value of a global root.
    ///
    /// # Panics
    ///
    /// Panics if `root` was created by another heap.
    #[track_caller]
    #[must_use]
    pub fn global(&self, root: &GlobalRoot) -> Value {
        self.globals
            .get(root)
            .unwrap_or_else(|| panic!("gengc: unknown global root"))
    }

    /// Overwrite a global root.
    ///
    /// # Panics
    ///
    /// Panics if `root` was created by another heap.
    #[track_caller]
    pub fn set_global(&mut self, root: &GlobalRoot, value: Value) {
        assert!(self.globals.set(root, value), "gengc: unknown global root");
    }

    /// Unregister a global root and return its last value.
    ///
    /// # Panics
    ///
    /// Panics if `root` was created by another heap.
    #[track_caller]
    pub fn remove_global(&mut self, root: GlobalRoot) -> Value {
        self.globals
            .remove(root)
            .unwrap_or_else(|| panic!("gengc: unknown global root"))
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Promote reachable nursery objects into the old generation.
    ///
    /// Afterwards the nursery may grow, and a major collection runs if the
    /// old generation crossed its threshold. If promoting the whole nursery
    /// could overflow `max_heap_size`, a major collection runs instead.
    /// With an empty nursery the minor collection always runs and only its
    /// counter changes.
    pub fn collect_minor(&mut self) {
        let young = self.nursery.used();
        if young > 0 && self.old.used().saturating_add(young) > self.config.max_heap_size {
            self.collect_major();
            return;
        }

        let mut metrics = gc::collect_minor(self);
        let promoted = metrics.bytes_copied;
        self.bytes_promoted += promoted as u64;
        if let Some(capacity) = self.policy.observe_minor(promoted) {
            self.resize_nursery(capacity);
        }
        metrics.nursery_capacity_after = self.nursery.capacity();
        self.record(metrics);

        if promoted > 0 && self.old.used() > self.policy.major_threshold() {
            self.collect_major();
        }
    }

    /// Copy every reachable object into a fresh old generation.
    ///
    /// Afterwards the threshold follows the live size, and a grown nursery
    /// shrinks back to its configured size if little survived.
    pub fn collect_major(&mut self) {
        let mut metrics = gc::collect_major(self);
        let live = self.old.used();
        if let Some(capacity) = self.policy.observe_major(live) {
            self.resize_nursery(capacity);
        }
        log_threshold(live, self.policy.major_threshold());
        metrics.nursery_capacity_after = self.nursery.capacity();
        self.record(metrics);
    }

    fn resize_nursery(&mut self, capacity: usize) {
        debug_assert_eq!(self.nursery.used(), 0);
        match Nursery::new(capacity) {
            Ok(nursery) => {
                log_nursery_resize(self.nursery.capacity(), capacity);
                self.nursery = nursery;
            }
            Err(err) => {
                log_warning("cannot resize the nursery; keeping its current size", &err);
                self.policy.reject_resize(self.nursery.capacity());
            }
        }
    }

    fn record(&mut self, metrics: GcMetrics) {
        self.counters.record(metrics);
        log_collection(&self.counters.last);
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Whether `value` refers to a live nursery object.
    #[must_use]
    pub fn is_young(&self, value: Value) -> bool {
        value
            .addr()
            .and_then(|addr| self.nursery.header_at(addr))
            .is_some_and(Header::is_valid)
    }

    /// Whether `value` refers to a live old-generation object.
    #[must_use]
    pub fn is_old(&self, value: Value) -> bool {
        value
            .addr()
            .and_then(|addr| self.old.header_at(addr))
            .is_some_and(Header::is_valid)
    }

    /// Whether `value` refers to a live object of this heap.
    #[must_use]
    pub fn contains(&self, value: Value) -> bool {
        self.object(value).is_ok()
    }

    /// Snapshot of counters and sizes.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            minor_collections: self.counters.minor,
            major_collections: self.counters.major,
            initial_nursery_capacity: self.config.nursery_size,
            nursery_capacity: self.nursery.capacity(),
            max_nursery_capacity: self.policy.max_nursery_capacity(),
            major_threshold: self.policy.major_threshold(),
            nursery_used: self.nursery.used(),
            old_used: self.old.used(),
            old_mapped: self.old.mapped(),
            remembered: self.remembered.len(),
            root_anomalies: self.stack.anomalies(),
            bytes_promoted_total: self.bytes_promoted,
        }
    }

    /// Metrics of the most recent collection.
    #[must_use]
    pub const fn last_gc_metrics(&self) -> GcMetrics {
        self.counters.last
    }

    /// Recent collections, newest last.
    #[must_use]
    pub const fn history(&self) -> &GcHistory {
        &self.counters.history
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("nursery", &self.nursery)
            .field("old", &self.old)
            .field("remembered", &self.remembered.len())
            .field("stack_depth", &self.stack.len())
            .field("globals", &self.globals.len())
            .finish_non_exhaustive()
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// Counters and sizes of a [`Heap`].
///
/// `Display` renders the classic GC benchmark summary:
///
/// ```text
/// Total 12 minor and 1 full garbage collections
///    (min.birth.size=256K, max.size=4096K, gc.thresh=768K)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Minor collections run so far.
    pub minor_collections: usize,
    /// Major collections run so far.
    pub major_collections: usize,
    /// Configured birth size of the nursery in bytes.
    pub initial_nursery_capacity: usize,
    /// Current nursery capacity in bytes.
    pub nursery_capacity: usize,
    /// Largest capacity the nursery may grow to.
    pub max_nursery_capacity: usize,
    /// Old-generation occupancy that triggers a major collection.
    pub major_threshold: usize,
    /// Bytes allocated in the nursery since the last collection.
    pub nursery_used: usize,
    /// Bytes occupied in the old generation.
    pub old_used: usize,
    /// Bytes mapped for the old generation.
    pub old_mapped: usize,
    /// Old objects currently in the remembered set.
    pub remembered: usize,
    /// Stack scans skipped because of an inverted range.
    pub root_anomalies: usize,
    /// Bytes promoted by minor collections since the heap was created.
    pub bytes_promoted_total: u64,
}

impl HeapStats {
    /// Total number of collections.
    #[must_use]
    pub const fn collections(&self) -> usize {
        self.minor_collections + self.major_collections
    }
}

impl fmt::Display for HeapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total {} minor and {} full garbage collections",
            self.minor_collections, self.major_collections
        )?;
        write!(
            f,
            "   (min.birth.size={}K, max.size={}K, gc.thresh={}K)",
            self.initial_nursery_capacity / 1024,
            self.max_nursery_capacity / 1024,
            self.major_threshold / 1024
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_heap() -> Heap {
        Heap::new(
            HeapConfig::new()
                .nursery_size(16 * 1024)
                .max_nursery_size(64 * 1024)
                .min_major_threshold(256 * 1024),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_object_is_young_and_nil() {
        let mut heap = small_heap();
        let obj = heap.alloc(3);
        assert!(heap.is_young(obj));
        assert!(!heap.is_old(obj));
        assert_eq!(heap.len(obj), 3);
        for i in 0..3 {
            assert_eq!(heap.get(obj, i), Value::NIL);
        }
    }

    #[test]
    fn test_zero_slot_object() {
        let mut heap = small_heap();
        let obj = heap.alloc(0);
        assert_eq!(heap.len(obj), 0);
        assert!(matches!(
            heap.try_get(obj, 0),
            Err(Error::IndexOutOfBounds { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_accessors_reject_foreign_values() {
        let mut heap = small_heap();
        let obj = heap.alloc(1);
        assert!(matches!(
            heap.try_get(Value::int(3), 0),
            Err(Error::InvalidReference { .. })
        ));

        let mut other = small_heap();
        let foreign = other.alloc(1);
        assert!(!heap.contains(foreign));
        assert!(heap.try_set(obj, 0, foreign).is_err());
        assert_eq!(heap.get(obj, 0), Value::NIL);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_panics_past_end() {
        let mut heap = small_heap();
        let obj = heap.alloc(2);
        let _ = heap.get(obj, 2);
    }

    #[test]
    fn test_too_large() {
        let mut heap = small_heap();
        assert!(matches!(
            heap.try_alloc(usize::MAX),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn test_barrier_skips_young_containers() {
        let mut heap = small_heap();
        let parent = heap.alloc(1);
        let child = heap.alloc(1);
        heap.store(parent, 0, child);
        assert_eq!(heap.stats().remembered, 0);
    }

    #[test]
    fn test_barrier_records_old_container() {
        let mut heap = small_heap();
        let parent = heap.alloc(1);
        let parent = heap.push_root(parent);
        heap.collect_minor();
        assert!(heap.is_old(heap.root(parent)));

        let child = heap.alloc(1);
        heap.store(heap.root(parent), 0, child);
        heap.store(heap.root(parent), 0, child);
        assert_eq!(heap.stats().remembered, 1);

        heap.collect_minor();
        assert_eq!(heap.stats().remembered, 0);
        assert!(heap.is_old(heap.get(heap.root(parent), 0)));
    }

    #[test]
    fn test_large_object_runs_minor_first() {
        let mut heap = small_heap();
        let young = heap.alloc(1);
        let young = heap.push_root(young);
        assert!(heap.is_young(heap.root(young)));

        // Larger than the whole nursery.
        let big = heap.alloc(4096);
        assert!(heap.is_old(big));
        assert_eq!(heap.stats().minor_collections, 1);
        assert!(heap.is_old(heap.root(young)));
        assert_eq!(heap.stats().nursery_used, 0);
    }

    #[test]
    fn test_stats_display_uses_configured_birth_size() {
        let mut heap = small_heap();
        let _tree = crate::trees::make_tree(&mut heap, 12);
        let stats = heap.stats();
        assert!(stats.nursery_capacity > 16 * 1024);
        assert_eq!(stats.initial_nursery_capacity, 16 * 1024);
        assert!(stats.to_string().contains("min.birth.size=16K"));
    }

    #[test]
    fn test_scope_pops_roots() {
        let mut heap = small_heap();
        let depth = heap.scope(|heap| {
            let obj = heap.alloc(1);
            heap.push_root(obj);
            heap.push_root(Value::int(1));
            heap.stack_depth()
        });
        assert_eq!(depth, 2);
        assert_eq!(heap.stack_depth(), 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = HeapStats {
            minor_collections: 12,
            major_collections: 1,
            initial_nursery_capacity: 256 * 1024,
            nursery_capacity: 1024 * 1024,
            max_nursery_capacity: 4096 * 1024,
            major_threshold: 768 * 1024,
            nursery_used: 0,
            old_used: 0,
            old_mapped: 0,
            remembered: 0,
            root_anomalies: 0,
            bytes_promoted_total: 0,
        };
        assert_eq!(
            stats.to_string(),
            "Total 12 minor and 1 full garbage collections\n   \
             (min.birth.size=256K, max.size=4096K, gc.thresh=768K)"
        );
        assert_eq!(stats.collections(), 13);
    }
}
