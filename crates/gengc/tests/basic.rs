//! Basic allocation and collection tests for gengc.

use gengc::trees::{self, make_tree, tree_size, NODE_SLOTS};
use gengc::{Heap, HeapConfig, Value};

const NODE_BYTES: usize = 8 * (1 + NODE_SLOTS);

fn heap_with_nursery(bytes: usize) -> Heap {
    Heap::new(HeapConfig::new().nursery_size(bytes)).unwrap()
}

#[test]
fn test_basic_allocation() {
    let mut heap = Heap::with_default_config().unwrap();
    let obj = heap.alloc(4);
    assert!(heap.contains(obj));
    assert!(heap.is_young(obj));
    assert_eq!(heap.len(obj), 4);
    assert_eq!(heap.stats().nursery_used, 8 * 5);
}

#[test]
fn test_unreachable_objects_are_not_retained() {
    let mut heap = heap_with_nursery(64 * 1024);
    let keep = make_tree(&mut heap, 4);
    let _garbage = make_tree(&mut heap, 8);
    heap.pop_root();
    assert_eq!(heap.stats().minor_collections, 0);

    heap.collect_minor();
    let stats = heap.stats();
    assert_eq!(stats.nursery_used, 0);
    assert_eq!(stats.old_used, tree_size(4) * NODE_BYTES);

    let metrics = heap.last_gc_metrics();
    assert_eq!(metrics.objects_copied, tree_size(4));
    assert_eq!(metrics.bytes_reclaimed, tree_size(8) * NODE_BYTES);
    assert_eq!(trees::count_nodes(&heap, heap.root(keep)), tree_size(4));

    // Dropping the last root frees the old generation on the next major.
    heap.pop_root();
    heap.collect_major();
    assert_eq!(heap.stats().old_used, 0);
}

#[test]
fn test_empty_minor_collection_only_bumps_counter() {
    let mut heap = heap_with_nursery(64 * 1024);
    let _tree = make_tree(&mut heap, 5);
    heap.collect_minor();

    let before = heap.stats();
    heap.collect_minor();
    let after = heap.stats();

    assert_eq!(after.minor_collections, before.minor_collections + 1);
    assert_eq!(
        gengc::HeapStats {
            minor_collections: before.minor_collections,
            ..after
        },
        before
    );
    assert_eq!(heap.last_gc_metrics().bytes_copied, 0);
    assert_eq!(heap.last_gc_metrics().objects_copied, 0);
}

#[test]
fn test_immediates_survive_every_collection() {
    let values = [
        Value::NIL,
        Value::TRUE,
        Value::FALSE,
        Value::int(0),
        Value::int(-1),
        Value::int(42),
        Value::int(Value::INT_MIN),
        Value::int(Value::INT_MAX),
    ];

    let mut heap = heap_with_nursery(16 * 1024);
    let obj = heap.alloc(values.len());
    for (i, v) in values.iter().enumerate() {
        heap.set(obj, i, *v);
    }
    let root = heap.push_root(obj);

    heap.collect_minor();
    heap.collect_major();
    for _ in 0..1000 {
        heap.alloc(3);
    }
    heap.collect_minor();
    heap.collect_major();

    let obj = heap.root(root);
    for (i, v) in values.iter().enumerate() {
        assert_eq!(heap.get(obj, i), *v);
    }
}

#[test]
fn test_root_order_decides_copy_order() {
    let mut heap = heap_with_nursery(16 * 1024);
    let second = heap.alloc(1);
    let first = heap.alloc(1);
    let r1 = heap.push_root(first);
    let r2 = heap.push_root(second);
    heap.collect_minor();

    let a = heap.root(r1).addr().unwrap();
    let b = heap.root(r2).addr().unwrap();
    assert!(a < b);
}

#[test]
fn test_tree_loop_triggers_minor_collections() {
    let mut heap = Heap::with_default_config().unwrap();
    let per_tree = tree_size(10) * NODE_BYTES;
    let capacity = heap.stats().nursery_capacity;
    let iterations = capacity / per_tree + 4;

    for _ in 0..iterations {
        let tree = make_tree(&mut heap, 10);
        assert_eq!(trees::left_depth(&heap, heap.root(tree)), 10);
        heap.pop_root();
    }

    assert!(heap.stats().minor_collections >= 1);
    assert_eq!(heap.stack_depth(), 0);
}

#[test]
fn test_independent_heaps() {
    let mut a = heap_with_nursery(16 * 1024);
    let mut b = heap_with_nursery(16 * 1024);
    let _ta = make_tree(&mut a, 9);
    assert!(a.stats().minor_collections >= 1);
    assert_eq!(b.stats().minor_collections, 0);

    let x = b.alloc(1);
    assert!(!a.contains(x));
    assert!(b.contains(x));
}
