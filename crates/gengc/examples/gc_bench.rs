//! The classic binary-tree GC benchmark.
//!
//! Builds a temporary "stretch" tree, keeps a long-lived tree and a large
//! array alive for the whole run, then allocates many short-lived trees of
//! increasing depth, both top-down and bottom-up.
//!
//! Heap sizes can be tuned through `GENGC_NURSERY_SIZE`,
//! `GENGC_MAX_NURSERY_SIZE`, `GENGC_MAJOR_THRESHOLD` and `GENGC_MAX_HEAP_SIZE`.
//!
//! Run with: `cargo run --release --example gc_bench`

use std::process::ExitCode;
use std::time::Instant;

use gengc::trees::{left_depth, make_tree, populate_tree, tree_size, NODE_SLOTS};
use gengc::{Heap, HeapConfig, Value};

const STRETCH_TREE_DEPTH: u32 = 20;
const LONG_LIVED_TREE_DEPTH: u32 = 18;
const ARRAY_SIZE: usize = 2_000_000;
const MIN_TREE_DEPTH: u32 = 4;
const MAX_TREE_DEPTH: u32 = 20;

fn num_iters(depth: u32) -> usize {
    2 * tree_size(STRETCH_TREE_DEPTH) / tree_size(depth)
}

fn time_construction(heap: &mut Heap, depth: u32) {
    let iterations = num_iters(depth);
    println!("Creating {iterations} trees of depth {depth}");

    let start = Instant::now();
    for _ in 0..iterations {
        let node = heap.alloc(NODE_SLOTS);
        let root = heap.push_root(node);
        populate_tree(heap, root, depth);
        heap.pop_root();
    }
    println!("\tTop down construction took {} msec", start.elapsed().as_millis());

    let start = Instant::now();
    for _ in 0..iterations {
        make_tree(heap, depth);
        heap.pop_root();
    }
    println!("\tBottom up construction took {} msec", start.elapsed().as_millis());
}

fn run(config: HeapConfig) -> gengc::Result<()> {
    let mut heap = Heap::new(config)?;
    println!("Garbage Collector Test");
    println!(
        " Stretching memory with a binary tree of depth {STRETCH_TREE_DEPTH}"
    );
    let start = Instant::now();

    // Stretch the memory space quickly.
    make_tree(&mut heap, STRETCH_TREE_DEPTH);
    heap.pop_root();

    // A long-lived tree and array that survive the whole run.
    println!(
        " Creating a long-lived binary tree of depth {LONG_LIVED_TREE_DEPTH}"
    );
    let node = heap.try_alloc(NODE_SLOTS)?;
    let long_lived = heap.add_global(node);
    heap.scope(|heap| {
        let slot = heap.push_root(heap.global(&long_lived));
        populate_tree(heap, slot, LONG_LIVED_TREE_DEPTH);
    });

    println!(" Creating a long-lived array of {ARRAY_SIZE} slots");
    let array = heap.try_alloc(ARRAY_SIZE)?;
    for (i, n) in (0..ARRAY_SIZE / 2).zip(0i64..) {
        heap.try_set(array, i, Value::int(n))?;
    }
    let array = heap.add_global(array);

    for depth in (MIN_TREE_DEPTH..=MAX_TREE_DEPTH).step_by(2) {
        time_construction(&mut heap, depth);
    }

    let tree = heap.global(&long_lived);
    let array = heap.global(&array);
    if left_depth(&heap, tree) != LONG_LIVED_TREE_DEPTH as usize
        || heap.try_get(array, 1000)? != Value::int(1000)
    {
        println!("Failed");
    }

    println!("Completed in {} msec", start.elapsed().as_millis());
    println!("{}", heap.stats());
    Ok(())
}

fn main() -> ExitCode {
    let result = HeapConfig::from_env().and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gc_bench: {err}");
            ExitCode::FAILURE
        }
    }
}
