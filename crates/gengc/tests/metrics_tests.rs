//! Collection metrics and history.

use gengc::trees::make_tree;
use gengc::{CollectionType, Heap, HeapConfig};

#[test]
fn test_fresh_heap_has_no_metrics() {
    let heap = Heap::with_default_config().unwrap();
    assert_eq!(heap.last_gc_metrics().collection_type, CollectionType::None);
    assert_eq!(heap.history().total_recorded(), 0);
    assert!(heap.history().recent(10).is_empty());
    assert_eq!(heap.history().average_pause_time(10), std::time::Duration::ZERO);
}

#[test]
fn test_history_matches_counters() {
    let mut heap = Heap::new(
        HeapConfig::new()
            .nursery_size(16 * 1024)
            .min_major_threshold(64 * 1024),
    )
    .unwrap();
    for _ in 0..5 {
        let _tree = make_tree(&mut heap, 10);
        heap.pop_root();
    }
    heap.collect_major();

    let stats = heap.stats();
    let history = heap.history();
    assert!(stats.minor_collections > 0);
    assert_eq!(history.total_recorded(), stats.collections());

    let last = heap.last_gc_metrics();
    assert_eq!(last.collection_type, CollectionType::Major);
    assert_eq!(last.total_collections, stats.collections());
    assert!(history.max_pause_time(64) >= history.average_pause_time(64));

    // Oldest first.
    let recent = history.recent(5);
    assert_eq!(recent.len(), 5.min(stats.collections()));
    assert!(recent
        .windows(2)
        .all(|w| w[0].total_collections < w[1].total_collections));
    assert_eq!(recent.last().copied(), Some(last));
}

#[test]
fn test_minor_metrics_describe_the_collection() {
    let mut heap = Heap::new(HeapConfig::new().nursery_size(64 * 1024)).unwrap();
    let _keep = make_tree(&mut heap, 3);
    let _drop = make_tree(&mut heap, 5);
    heap.pop_root();
    heap.collect_minor();

    let m = heap.last_gc_metrics();
    assert_eq!(m.collection_type, CollectionType::Minor);
    assert_eq!(m.objects_copied, 15);
    assert_eq!(m.bytes_copied, 15 * 24);
    assert_eq!(m.bytes_reclaimed, 63 * 24);
    assert_eq!(m.roots_scanned, 1);
    assert_eq!(m.nursery_capacity_after, 64 * 1024);
    assert!(m.duration >= m.trace_duration);
    assert_eq!(m.collection_type.to_string(), "minor");
}
