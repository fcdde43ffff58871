//! Deep structures must not exhaust the native stack during collection.

use gengc::trees::{left_depth, make_tree};
use gengc::{Heap, Value};

#[test]
fn test_depth_20_tree() {
    let mut heap = Heap::with_default_config().unwrap();
    let tree = make_tree(&mut heap, 20);
    assert_eq!(left_depth(&heap, heap.root(tree)), 20);
    heap.collect_major();
    assert_eq!(left_depth(&heap, heap.root(tree)), 20);
}

#[test]
fn test_million_element_list_survives_major() {
    const LEN: i64 = 1_000_000;

    let mut heap = Heap::with_default_config().unwrap();
    let head = heap.push_root(Value::NIL);
    for i in 0..LEN {
        let node = heap.alloc(2);
        heap.set(node, 0, Value::int(i));
        heap.store(node, 1, heap.root(head));
        heap.set_root(head, node);
    }
    heap.collect_major();

    let mut node = heap.root(head);
    let mut expected = LEN - 1;
    let mut count = 0;
    while node.is_ref() {
        assert_eq!(heap.get(node, 0), Value::int(expected));
        node = heap.get(node, 1);
        expected -= 1;
        count += 1;
    }
    assert_eq!(count, LEN);
    assert!(heap.is_old(heap.root(head)));
}
