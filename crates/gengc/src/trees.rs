//! Binary tree workloads.
//!
//! Trees are the classic GC benchmark shape: every node is a two-slot tuple
//! holding its left and right child, and leaves have two `nil` slots. All
//! builders here are iterative and keep intermediate nodes on the shadow
//! stack, so depth is bounded by memory rather than by the native stack.

use crate::heap::Heap;
use crate::roots::Root;
use crate::value::Value;

/// Slots per tree node.
pub const NODE_SLOTS: usize = 2;

/// Number of nodes in a complete tree of the given depth, saturating at
/// `usize::MAX` for depths that cannot be represented.
#[must_use]
pub const fn tree_size(depth: u32) -> usize {
    match 1usize.checked_shl(depth.saturating_add(1)) {
        Some(n) => n - 1,
        None => usize::MAX,
    }
}

enum Task {
    Build(u32),
    Join,
}

/// Build a complete tree of `depth` bottom-up: children first, then their
/// parent. Returns the shadow stack slot holding the root node, pushed on
/// top of whatever was there before.
pub fn make_tree(heap: &mut Heap, depth: u32) -> Root {
    let mut tasks = vec![Task::Build(depth)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Build(0) => {
                let leaf = heap.alloc(NODE_SLOTS);
                heap.push_root(leaf);
            }
            Task::Build(d) => {
                tasks.push(Task::Join);
                tasks.push(Task::Build(d - 1));
                tasks.push(Task::Build(d - 1));
            }
            Task::Join => {
                let node = heap.alloc(NODE_SLOTS);
                let right = heap.pop_root();
                let left = heap.pop_root();
                heap.store(node, 0, left);
                heap.store(node, 1, right);
                heap.push_root(node);
            }
        }
    }
    let tree = heap.pop_root();
    heap.push_root(tree)
}

/// Grow the node held in `node` into a complete tree of `depth`, top-down.
///
/// Parents are allocated before their children, so once a parent has been
/// promoted every child store goes through the write barrier.
pub fn populate_tree(heap: &mut Heap, node: Root, depth: u32) {
    let frame = heap.enter_frame();
    let start = heap.root(node);
    let first = heap.push_root(start);
    // Each entry's slot is the top of the shadow stack when it is popped.
    let mut pending = vec![(first, depth)];

    while let Some((slot, d)) = pending.pop() {
        if d == 0 {
            heap.pop_root();
            continue;
        }
        for index in 0..NODE_SLOTS {
            let child = heap.alloc(NODE_SLOTS);
            let parent = heap.root(slot);
            heap.store(parent, index, child);
        }
        let parent = heap.root(slot);
        let left = heap.get(parent, 0);
        let right = heap.get(parent, 1);

        heap.set_root(slot, right);
        pending.push((slot, d - 1));
        let left = heap.push_root(left);
        pending.push((left, d - 1));
    }

    heap.leave_frame(frame);
}

/// Number of left links from `tree` down to a leaf.
#[must_use]
pub fn left_depth(heap: &Heap, tree: Value) -> usize {
    let mut depth = 0;
    let mut node = heap.get(tree, 0);
    while !node.is_nil() {
        depth += 1;
        node = heap.get(node, 0);
    }
    depth
}

/// Number of nodes reachable from `tree` through child slots.
#[must_use]
pub fn count_nodes(heap: &Heap, tree: Value) -> usize {
    let mut count = 0;
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if !node.is_ref() {
            continue;
        }
        count += 1;
        stack.push(heap.get(node, 0));
        stack.push(heap.get(node, 1));
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeapConfig;

    fn heap() -> Heap {
        Heap::new(HeapConfig::new().nursery_size(32 * 1024)).unwrap()
    }

    #[test]
    fn test_tree_size() {
        assert_eq!(tree_size(0), 1);
        assert_eq!(tree_size(1), 3);
        assert_eq!(tree_size(10), 2047);
    }

    #[test]
    fn test_tree_size_saturates() {
        assert_eq!(tree_size(usize::BITS - 2), usize::MAX >> 1);
        assert_eq!(tree_size(usize::BITS - 1), usize::MAX);
        assert_eq!(tree_size(100), usize::MAX);
        assert_eq!(tree_size(u32::MAX), usize::MAX);
    }

    #[test]
    fn test_make_tree_shape() {
        let mut heap = heap();
        let before = heap.stack_depth();
        let root = make_tree(&mut heap, 6);
        assert_eq!(heap.stack_depth(), before + 1);

        let tree = heap.root(root);
        assert_eq!(left_depth(&heap, tree), 6);
        assert_eq!(count_nodes(&heap, tree), tree_size(6));
    }

    #[test]
    fn test_populate_tree_shape() {
        let mut heap = heap();
        let node = heap.alloc(NODE_SLOTS);
        let root = heap.push_root(node);
        populate_tree(&mut heap, root, 7);
        assert_eq!(heap.stack_depth(), 1);

        let tree = heap.root(root);
        assert_eq!(left_depth(&heap, tree), 7);
        assert_eq!(count_nodes(&heap, tree), tree_size(7));
    }

    #[test]
    fn test_leaf_tree() {
        let mut heap = heap();
        let root = make_tree(&mut heap, 0);
        let tree = heap.root(root);
        assert_eq!(left_depth(&heap, tree), 0);
        assert_eq!(count_nodes(&heap, tree), 1);
    }
}
