//! Large objects and heap exhaustion.
//!
//! Objects larger than the nursery are placed directly in the old
//! generation. The heap limit is enforced on old-generation occupancy.

use gengc::{Error, Heap, HeapConfig, Value};

const ARRAY_SLOTS: usize = 2_000_000;

// ============================================================================
// Large objects
// ============================================================================

#[test]
fn test_large_array_is_allocated_old() {
    let mut heap = Heap::with_default_config().unwrap();
    let array = heap.alloc(ARRAY_SLOTS);
    assert!(heap.is_old(array));
    assert_eq!(heap.len(array), ARRAY_SLOTS);
    assert_eq!(heap.get(array, ARRAY_SLOTS - 1), Value::NIL);
    assert_eq!(heap.stats().nursery_used, 0);
}

#[test]
fn test_large_array_contents_survive_collections() {
    let mut heap = Heap::with_default_config().unwrap();
    let array = heap.alloc(ARRAY_SLOTS);
    let array = heap.push_root(array);
    for i in (0..ARRAY_SLOTS).step_by(1000) {
        heap.set(heap.root(array), i, Value::int(i as i64));
    }

    // Young objects stored into the array are kept alive by the barrier.
    for i in 0..10 {
        let young = heap.alloc(1);
        heap.set(young, 0, Value::int(-(i as i64)));
        heap.store(heap.root(array), 2 * i + 1, young);
    }
    assert_eq!(heap.stats().remembered, 1);

    heap.collect_minor();
    heap.collect_major();
    let array = heap.root(array);
    assert!(heap.is_old(array));
    for i in (0..ARRAY_SLOTS).step_by(1000) {
        assert_eq!(heap.get(array, i), Value::int(i as i64));
    }
    for i in 0..10 {
        let young = heap.get(array, 2 * i + 1);
        assert!(heap.is_old(young));
        assert_eq!(heap.get(young, 0), Value::int(-(i as i64)));
    }
}

#[test]
fn test_unreachable_large_array_is_reclaimed() {
    let mut heap = Heap::with_default_config().unwrap();
    let _ = heap.alloc(ARRAY_SLOTS);
    assert!(heap.stats().old_used > ARRAY_SLOTS * 8);
    heap.collect_major();
    assert_eq!(heap.stats().old_used, 0);
}

// ============================================================================
// Exhaustion
// ============================================================================

fn bounded_heap() -> Heap {
    Heap::new(HeapConfig::new().max_heap_size(1024 * 1024)).unwrap()
}

#[test]
fn test_oversized_request_is_exhausted() {
    let mut heap = bounded_heap();
    let err = heap.try_alloc(200_000).unwrap_err();
    match err {
        Error::Exhausted {
            requested, limit, ..
        } => {
            assert_eq!(requested, 8 * 200_001);
            assert_eq!(limit, 1024 * 1024);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err_message(heap.try_alloc(200_000)).contains("heap exhausted"));
}

fn err_message(result: gengc::Result<Value>) -> String {
    result.map_or_else(|e| e.to_string(), |_| String::new())
}

#[test]
fn test_live_data_past_limit_is_exhausted() {
    let mut heap = bounded_heap();
    let frame = heap.enter_frame();

    let mut failure = None;
    for _ in 0..1000 {
        match heap.try_alloc(1000) {
            Ok(array) => {
                heap.push_root(array);
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    assert!(matches!(failure, Some(Error::Exhausted { .. })));

    // Dropping the roots makes the heap usable again.
    heap.leave_frame(frame);
    heap.collect_major();
    assert_eq!(heap.stats().old_used, 0);
    assert!(heap.try_alloc(1000).is_ok());
}

#[test]
fn test_empty_minor_after_exhaustion_only_bumps_counter() {
    let mut heap = bounded_heap();
    loop {
        match heap.try_alloc(1000) {
            Ok(array) => {
                heap.push_root(array);
            }
            Err(Error::Exhausted { .. }) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    let before = heap.stats();
    assert_eq!(before.nursery_used, 0);
    assert!(before.old_used > 1024 * 1024);

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
}

#[test]
#[should_panic(expected = "heap exhausted")]
fn test_alloc_panics_when_exhausted() {
    let mut heap = bounded_heap();
    let _ = heap.alloc(200_000);
}

#[test]
fn test_too_large_is_not_exhaustion() {
    let mut heap = bounded_heap();
    assert!(matches!(
        heap.try_alloc(gengc::MAX_SLOTS + 1),
        Err(Error::TooLarge { .. })
    ));
}
