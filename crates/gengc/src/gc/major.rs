//! Major collection: copy everything reachable into a fresh old generation.

use std::mem;
use std::time::Instant;

use super::Evacuator;
use crate::heap::Heap;
use crate::metrics::{CollectionType, GcMetrics, PhaseTimer};
use crate::space::OldSpace;
use crate::tracing::internal::{
    log_phase_end, log_phase_start, next_gc_id, trace_gc_collection, GcPhase,
};

/// Evacuate the whole heap. Afterwards the nursery is empty, the remembered
/// set is empty and the previous old generation has been unmapped.
///
/// Recomputing the threshold is up to the caller.
pub fn collect_major(heap: &mut Heap) -> GcMetrics {
    let gc_id = next_gc_id();
    let _gc_span = trace_gc_collection(CollectionType::Major, gc_id);
    let start = Instant::now();
    let mut timer = PhaseTimer::new();

    let from = mem::replace(&mut heap.old, OldSpace::new(heap.config.old_chunk_size));
    let before = from.used() + heap.nursery.used();

    // Every remembered object is about to be copied or dropped, and copies
    // carry no remembered flag.
    heap.remembered.clear();

    // 1. Roots
    timer.start();
    log_phase_start(GcPhase::Roots, before);

    let mut evacuator = Evacuator::major(&heap.nursery, &from, &mut heap.old);
    let mut roots_scanned = heap.stack.scan(|slot| *slot = evacuator.evacuate(*slot));
    roots_scanned += heap.globals.scan(|slot| *slot = evacuator.evacuate(*slot));

    timer.end_roots();
    log_phase_end(GcPhase::Roots, roots_scanned);

    // 2. Transitive closure
    timer.start();
    log_phase_start(GcPhase::Trace, before);
    evacuator.drain();
    let (bytes_copied, objects_copied) = evacuator.copied();
    timer.end_trace();
    log_phase_end(GcPhase::Trace, bytes_copied);

    // 3. Release
    timer.start();
    log_phase_start(GcPhase::Release, before);
    heap.nursery.reset();
    drop(from);
    timer.end_release();
    log_phase_end(GcPhase::Release, before.saturating_sub(bytes_copied));

    GcMetrics {
        duration: start.elapsed(),
        collection_type: CollectionType::Major,
        bytes_copied,
        objects_copied,
        bytes_reclaimed: before.saturating_sub(bytes_copied),
        roots_scanned,
        remembered_scanned: 0,
        root_duration: timer.roots,
        trace_duration: timer.trace,
        release_duration: timer.release,
        nursery_capacity_after: heap.nursery.capacity(),
        total_collections: 0,
    }
}
