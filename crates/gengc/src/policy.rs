//! Nursery sizing and major collection threshold.

use crate::config::HeapConfig;

/// Adaptive sizing state for one heap.
#[derive(Debug, Clone)]
pub struct SizePolicy {
    min_nursery_capacity: usize,
    nursery_capacity: usize,
    max_nursery_capacity: usize,
    growth_trigger: f64,
    min_threshold: usize,
    threshold_factor: f64,
    threshold: usize,
    max_heap_size: usize,
}

impl SizePolicy {
    /// Initial policy for a validated configuration.
    #[must_use]
    pub fn new(config: &HeapConfig) -> Self {
        Self {
            min_nursery_capacity: config.nursery_size,
            nursery_capacity: config.nursery_size,
            max_nursery_capacity: config.max_nursery_size,
            growth_trigger: config.growth_trigger,
            min_threshold: config.min_major_threshold,
            threshold_factor: config.threshold_factor,
            threshold: config.min_major_threshold.min(config.max_heap_size),
            max_heap_size: config.max_heap_size,
        }
    }

    /// Hard cap on nursery capacity.
    #[must_use]
    pub const fn max_nursery_capacity(&self) -> usize {
        self.max_nursery_capacity
    }

    /// Old-generation occupancy above which a major collection runs.
    #[must_use]
    pub const fn major_threshold(&self) -> usize {
        self.threshold
    }

    /// Record the bytes promoted by a minor collection. Returns the new
    /// nursery capacity if it should grow.
    pub fn observe_minor(&mut self, promoted: usize) -> Option<usize> {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let trigger = (self.nursery_capacity as f64 * self.growth_trigger) as usize;
        if promoted <= trigger || self.nursery_capacity >= self.max_nursery_capacity {
            return None;
        }
        let grown = self
            .nursery_capacity
            .saturating_mul(2)
            .min(self.max_nursery_capacity);
        self.nursery_capacity = grown;
        Some(grown)
    }

    /// Revert a resize the heap could not map.
    pub fn reject_resize(&mut self, actual: usize) {
        self.nursery_capacity = actual;
    }

    /// Record the live bytes left by a major collection.
    ///
    /// Recomputes the threshold, and returns the configured birth size if a
    /// grown nursery is now larger than everything that survived.
    pub fn observe_major(&mut self, live: usize) -> Option<usize> {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let scaled = (live as f64 * self.threshold_factor) as usize;
        self.threshold = scaled.max(self.min_threshold).min(self.max_heap_size);

        if self.nursery_capacity <= self.min_nursery_capacity || live >= self.nursery_capacity {
            return None;
        }
        self.nursery_capacity = self.min_nursery_capacity;
        Some(self.nursery_capacity)
    }
}
