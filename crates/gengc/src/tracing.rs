//! GC tracing support.
//!
//! When the `tracing` feature is enabled, this module emits structured spans
//! and events for collections. Without it, warnings and fatal errors still
//! reach stderr so that root anomalies and aborts are never silent.

use std::fmt;

#[cfg(feature = "tracing")]
pub mod internal {
    use std::sync::atomic::{AtomicU64, Ordering};
    use tracing::{span, Level};

    use crate::metrics::{CollectionType, GcMetrics};

    /// Phases of a copying collection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum GcPhase {
        /// Evacuate direct referents of roots and remembered objects.
        Roots,
        /// Drain the copy worklist.
        Trace,
        /// Reset or unmap the evacuated space.
        Release,
    }

    /// Stable identifier for a GC run.
    ///
    /// Used to correlate all events within a single collection. The counter
    /// is shared by every heap in the process and starts at 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GcId(pub u64);

    static NEXT_GC_ID: AtomicU64 = AtomicU64::new(1);

    /// Generate the next unique GC ID.
    pub fn next_gc_id() -> GcId {
        GcId(NEXT_GC_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a span for the entire GC collection.
    pub fn trace_gc_collection(collection_type: CollectionType, gc_id: GcId) -> span::EnteredSpan {
        span!(
            Level::DEBUG,
            "gc_collect",
            collection_type = collection_type.as_str(),
            gc_id = gc_id.0
        )
        .entered()
    }

    /// Log the start of a GC phase.
    pub fn log_phase_start(phase: GcPhase, bytes_before: usize) {
        tracing::trace!(phase = ?phase, bytes_before, "phase_start");
    }

    /// Log the end of a GC phase.
    pub fn log_phase_end(phase: GcPhase, bytes: usize) {
        tracing::trace!(phase = ?phase, bytes, "phase_end");
    }

    /// Summary event emitted once a collection has finished.
    pub fn log_collection(metrics: &GcMetrics) {
        tracing::debug!(
            collection_type = metrics.collection_type.as_str(),
            bytes_copied = metrics.bytes_copied,
            objects_copied = metrics.objects_copied,
            bytes_reclaimed = metrics.bytes_reclaimed,
            roots_scanned = metrics.roots_scanned,
            remembered_scanned = metrics.remembered_scanned,
            duration_us = u64::try_from(metrics.duration.as_micros()).unwrap_or(u64::MAX),
            "gc_complete"
        );
    }

    /// The nursery was remapped at a new capacity.
    pub fn log_nursery_resize(from: usize, to: usize) {
        tracing::debug!(from, to, "nursery_resize");
    }

    /// The major collection threshold was recomputed.
    pub fn log_threshold(live: usize, threshold: usize) {
        tracing::debug!(live, threshold, "major_threshold");
    }
}

#[cfg(not(feature = "tracing"))]
pub mod internal {
    use crate::metrics::{CollectionType, GcMetrics};

    /// Stub type when tracing is disabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum GcPhase {
        /// Stub.
        Roots,
        /// Stub.
        Trace,
        /// Stub.
        Release,
    }

    /// Stub type when tracing is disabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GcId(pub u64);

    /// Stub function when tracing is disabled.
    pub const fn next_gc_id() -> GcId {
        GcId(0)
    }

    /// Stub guard when tracing is disabled.
    pub struct NoSpan;

    /// Stub function when tracing is disabled.
    pub const fn trace_gc_collection(_: CollectionType, _: GcId) -> NoSpan {
        NoSpan
    }

    /// Stub function when tracing is disabled.
    pub const fn log_phase_start(_: GcPhase, _: usize) {}

    /// Stub function when tracing is disabled.
    pub const fn log_phase_end(_: GcPhase, _: usize) {}

    /// Stub function when tracing is disabled.
    pub const fn log_collection(_: &GcMetrics) {}

    /// Stub function when tracing is disabled.
    pub const fn log_nursery_resize(_: usize, _: usize) {}

    /// Stub function when tracing is disabled.
    pub const fn log_threshold(_: usize, _: usize) {}
}

/// Report a recoverable anomaly.
pub fn log_warning(message: &str, detail: &dyn fmt::Display) {
    #[cfg(feature = "tracing")]
    tracing::warn!(%detail, "{message}");
    #[cfg(not(feature = "tracing"))]
    eprintln!("gengc: warning: {message}: {detail}");
}

/// Report an error the heap cannot recover from, right before panicking.
pub fn log_fatal(context: &str, err: &dyn fmt::Display) {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "{context}");
    #[cfg(not(feature = "tracing"))]
    eprintln!("gengc: fatal: {context}: {err}");
}
