//! A two-generation copying garbage collector for tagged-word runtimes.
//!
//! `gengc` manages the heap of a dynamically-typed runtime in which every
//! value is a single 64-bit [`Value`]: either an immediate (`nil`, a 63-bit
//! integer or a boolean) or a reference to a tuple of value slots.
//!
//! # Features
//!
//! - **Bump allocation** into a nursery, with a large-object path straight
//!   into the old generation
//! - **Minor collections** that promote nursery survivors without scanning
//!   the old generation, using a write barrier and a remembered set
//! - **Major collections** that copy the whole heap into a fresh old space
//! - **Precise roots** through a shadow stack and a global root table
//! - **Adaptive sizing** of the nursery and the major collection threshold
//!
//! # Quick Start
//!
//! ```
//! use gengc::{trees, Heap, HeapConfig};
//!
//! let mut heap = Heap::new(HeapConfig::new().nursery_size(64 * 1024)).unwrap();
//!
//! // Build and drop trees until the nursery fills up.
//! for _ in 0..20 {
//!     let tree = trees::make_tree(&mut heap, 8);
//!     assert_eq!(trees::left_depth(&heap, heap.root(tree)), 8);
//!     heap.pop_root();
//! }
//!
//! assert!(heap.stats().minor_collections >= 1);
//! println!("{}", heap.stats());
//! ```
//!
//! # Thread Safety
//!
//! A [`Heap`] is `!Send` and `!Sync`. Collections run synchronously inside
//! allocation calls (or explicit [`Heap::collect_minor`] and
//! [`Heap::collect_major`] calls) on the owning thread.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod barrier;
mod config;
mod error;
mod gc;
mod heap;
pub mod metrics;
mod object;
mod policy;
mod roots;
mod space;
mod tracing;
pub mod trees;
mod value;

pub use config::HeapConfig;
pub use error::{Error, Result};
pub use heap::{Heap, HeapStats};
pub use metrics::{CollectionType, GcHistory, GcMetrics};
pub use object::MAX_SLOTS;
pub use roots::{Frame, GlobalRoot, Root};
pub use value::Value;
