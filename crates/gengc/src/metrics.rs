//! GC metrics and statistics.
//!
//! Every [`Heap`](crate::Heap) keeps its own counters. There is no process
//! wide state: two heaps on the same thread report independently.

use std::fmt;
use std::time::{Duration, Instant};

/// Statistics from a single garbage collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcMetrics {
    /// Wall-clock duration of the collection.
    pub duration: Duration,
    /// Type of collection (Minor or Major).
    pub collection_type: CollectionType,
    /// Bytes copied into the destination space.
    pub bytes_copied: usize,
    /// Number of objects copied.
    pub objects_copied: usize,
    /// Bytes released by the collection (source occupancy minus survivors).
    pub bytes_reclaimed: usize,
    /// Root slots visited (shadow stack plus globals).
    pub roots_scanned: usize,
    /// Remembered old objects rescanned. Always zero for major collections.
    pub remembered_scanned: usize,
    /// Time spent evacuating direct referents of roots.
    pub root_duration: Duration,
    /// Time spent draining the copy worklist.
    pub trace_duration: Duration,
    /// Time spent resetting or unmapping the source space.
    pub release_duration: Duration,
    /// Nursery capacity once the collection (and any resize) finished.
    pub nursery_capacity_after: usize,
    /// Total collections run by the heap, this one included.
    pub total_collections: usize,
}

impl Default for GcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GcMetrics {
    /// Create a new `GcMetrics` with all fields set to zero/defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            collection_type: CollectionType::None,
            bytes_copied: 0,
            objects_copied: 0,
            bytes_reclaimed: 0,
            roots_scanned: 0,
            remembered_scanned: 0,
            root_duration: Duration::ZERO,
            trace_duration: Duration::ZERO,
            release_duration: Duration::ZERO,
            nursery_capacity_after: 0,
            total_collections: 0,
        }
    }
}

/// Type of GC collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum CollectionType {
    /// No collection has run yet.
    #[default]
    None = 0,
    /// Nursery evacuation into the old generation.
    Minor = 1,
    /// Whole-heap evacuation into a fresh old generation.
    Major = 2,
}

impl CollectionType {
    /// Lower-case name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captures the duration of each collection phase:
/// - Roots: evacuate everything roots and remembered objects point at
/// - Trace: drain the worklist until the copied graph is closed
/// - Release: reset or unmap the evacuated space
///
/// ```
/// use gengc::metrics::PhaseTimer;
///
/// let mut timer = PhaseTimer::new();
/// timer.start();
/// // ... root scan ...
/// timer.end_roots();
/// timer.start();
/// // ... trace ...
/// timer.end_trace();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimer {
    /// Root scan time.
    pub roots: Duration,
    /// Trace time.
    pub trace: Duration,
    /// Release time.
    pub release: Duration,
    current_start: Option<Instant>,
}

impl PhaseTimer {
    /// Create a new `PhaseTimer` with all durations set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roots: Duration::ZERO,
            trace: Duration::ZERO,
            release: Duration::ZERO,
            current_start: None,
        }
    }

    /// Start timing a phase.
    pub fn start(&mut self) {
        self.current_start = Some(Instant::now());
    }

    /// End the root phase and record its duration.
    pub fn end_roots(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.roots = start.elapsed();
        }
    }

    /// End the trace phase and record its duration.
    pub fn end_trace(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.trace = start.elapsed();
        }
    }

    /// End the release phase and record its duration.
    pub fn end_release(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.release = start.elapsed();
        }
    }
}

/// Ring buffer size for GC history.
const HISTORY_SIZE: usize = 64;

/// Fixed-size ring buffer of the most recent collections of one heap.
#[derive(Debug, Clone)]
pub struct GcHistory {
    buffer: [GcMetrics; HISTORY_SIZE],
    recorded: usize,
}

impl Default for GcHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHistory {
    /// Create a new `GcHistory` with an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [GcMetrics::new(); HISTORY_SIZE],
            recorded: 0,
        }
    }

    pub(crate) fn push(&mut self, metrics: GcMetrics) {
        self.buffer[self.recorded % HISTORY_SIZE] = metrics;
        self.recorded += 1;
    }

    /// Total number of collections recorded. May exceed the buffer size.
    #[inline]
    #[must_use]
    pub const fn total_recorded(&self) -> usize {
        self.recorded
    }

    /// The most recent `n` snapshots, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<GcMetrics> {
        let n = n.min(HISTORY_SIZE).min(self.recorded);
        (self.recorded - n..self.recorded)
            .map(|i| self.buffer[i % HISTORY_SIZE])
            .collect()
    }

    /// Average pause of the most recent `n` collections.
    ///
    /// Returns `Duration::ZERO` if no collections have been recorded.
    #[must_use]
    pub fn average_pause_time(&self, n: usize) -> Duration {
        let recent = self.recent(n);
        if recent.is_empty() {
            return Duration::ZERO;
        }
        let total_ns: u128 = recent.iter().map(|m| m.duration.as_nanos()).sum();
        Duration::from_nanos(
            (total_ns / recent.len() as u128)
                .try_into()
                .unwrap_or(u64::MAX),
        )
    }

    /// Longest pause among the most recent `n` collections.
    #[must_use]
    pub fn max_pause_time(&self, n: usize) -> Duration {
        self.recent(n)
            .iter()
            .map(|m| m.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// Running totals kept by a heap.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    pub minor: usize,
    pub major: usize,
    pub last: GcMetrics,
    pub history: GcHistory,
}

impl Counters {
    pub(crate) const fn total(&self) -> usize {
        self.minor + self.major
    }

    /// Fold one finished collection into the totals.
    pub(crate) fn record(&mut self, mut metrics: GcMetrics) {
        match metrics.collection_type {
            CollectionType::Minor => self.minor += 1,
            CollectionType::Major => self.major += 1,
            CollectionType::None => {}
        }
        metrics.total_collections = self.total();
        self.last = metrics;
        self.history.push(metrics);
    }
}
