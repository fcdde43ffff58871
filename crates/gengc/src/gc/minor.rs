//! Minor collection: promote nursery survivors into the old generation.

use std::time::Instant;

use super::Evacuator;
use crate::heap::Heap;
use crate::metrics::{CollectionType, GcMetrics, PhaseTimer};
use crate::tracing::internal::{
    log_phase_end, log_phase_start, next_gc_id, trace_gc_collection, GcPhase,
};

/// Evacuate every nursery object reachable from the roots or the remembered
/// set, then reset the nursery.
///
/// Policy follow-ups (nursery growth, a chained major collection) are up to
/// the caller.
pub fn collect_minor(heap: &mut Heap) -> GcMetrics {
    let gc_id = next_gc_id();
    let _gc_span = trace_gc_collection(CollectionType::Minor, gc_id);
    let start = Instant::now();
    let mut timer = PhaseTimer::new();
    let young_before = heap.nursery.used();

    // 1. Roots and remembered slots
    timer.start();
    log_phase_start(GcPhase::Roots, young_before);

    let remembered = heap.remembered.drain(&heap.old);
    let mut evacuator = Evacuator::minor(&heap.nursery, &mut heap.old);
    let mut roots_scanned = heap.stack.scan(|slot| *slot = evacuator.evacuate(*slot));
    roots_scanned += heap.globals.scan(|slot| *slot = evacuator.evacuate(*slot));

    let mut remembered_scanned = 0;
    for addr in remembered {
        if evacuator.scan_remembered(addr) {
            remembered_scanned += 1;
        }
    }

    timer.end_roots();
    log_phase_end(GcPhase::Roots, roots_scanned);

    // 2. Transitive closure
    timer.start();
    log_phase_start(GcPhase::Trace, young_before);
    evacuator.drain();
    let (bytes_copied, objects_copied) = evacuator.copied();
    timer.end_trace();
    log_phase_end(GcPhase::Trace, bytes_copied);

    // 3. Release
    timer.start();
    log_phase_start(GcPhase::Release, young_before);
    heap.nursery.reset();
    timer.end_release();
    log_phase_end(GcPhase::Release, young_before.saturating_sub(bytes_copied));

    GcMetrics {
        duration: start.elapsed(),
        collection_type: CollectionType::Minor,
        bytes_copied,
        objects_copied,
        bytes_reclaimed: young_before.saturating_sub(bytes_copied),
        roots_scanned,
        remembered_scanned,
        root_duration: timer.roots,
        trace_duration: timer.trace,
        release_duration: timer.release,
        nursery_capacity_after: heap.nursery.capacity(),
        total_collections: 0,
    }
}
