//! Heap configuration.

use crate::error::{Error, Result};

/// Default nursery capacity (256 KiB).
pub const DEFAULT_NURSERY_SIZE: usize = 256 * 1024;
/// Default upper bound the nursery may grow to (16x the default).
pub const DEFAULT_MAX_NURSERY_SIZE: usize = 16 * DEFAULT_NURSERY_SIZE;
/// Default floor for the major collection threshold.
pub const DEFAULT_MIN_MAJOR_THRESHOLD: usize = 3 * DEFAULT_NURSERY_SIZE;
/// Default size of a freshly mapped old-generation chunk (1 MiB).
pub const DEFAULT_OLD_CHUNK_SIZE: usize = 1024 * 1024;
/// Default cap on old-generation occupancy.
#[cfg(target_pointer_width = "64")]
pub const DEFAULT_MAX_HEAP_SIZE: usize = 4 * 1024 * 1024 * 1024;
/// Default cap on old-generation occupancy.
#[cfg(not(target_pointer_width = "64"))]
pub const DEFAULT_MAX_HEAP_SIZE: usize = 1024 * 1024 * 1024;

/// Smallest nursery accepted by [`HeapConfig::validate`].
pub const MIN_NURSERY_SIZE: usize = 4096;

/// Tunables for a [`Heap`](crate::Heap).
///
/// ```
/// use gengc::HeapConfig;
///
/// let config = HeapConfig::new()
///     .nursery_size(64 * 1024)
///     .max_nursery_size(1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeapConfig {
    /// Initial nursery capacity in bytes.
    pub nursery_size: usize,
    /// Hard cap on nursery growth.
    pub max_nursery_size: usize,
    /// Lower bound on the old-generation occupancy that triggers a major
    /// collection.
    pub min_major_threshold: usize,
    /// After a major collection the threshold becomes `live * threshold_factor`.
    pub threshold_factor: f64,
    /// Fraction of the nursery capacity that, once promoted by a single minor
    /// collection, makes the nursery double.
    pub growth_trigger: f64,
    /// Minimum size of an old-generation chunk.
    pub old_chunk_size: usize,
    /// Maximum old-generation occupancy. Requests that would exceed it after
    /// a major collection fail with [`Error::Exhausted`].
    pub max_heap_size: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapConfig {
    /// The default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nursery_size: DEFAULT_NURSERY_SIZE,
            max_nursery_size: DEFAULT_MAX_NURSERY_SIZE,
            min_major_threshold: DEFAULT_MIN_MAJOR_THRESHOLD,
            threshold_factor: 2.0,
            growth_trigger: 0.25,
            old_chunk_size: DEFAULT_OLD_CHUNK_SIZE,
            max_heap_size: DEFAULT_MAX_HEAP_SIZE,
        }
    }

    /// Set the initial nursery capacity. The maximum is raised to match if it
    /// would otherwise be smaller.
    #[must_use]
    pub const fn nursery_size(mut self, bytes: usize) -> Self {
        self.nursery_size = bytes;
        if self.max_nursery_size < bytes {
            self.max_nursery_size = bytes;
        }
        self
    }

    /// Set the nursery growth cap.
    #[must_use]
    pub const fn max_nursery_size(mut self, bytes: usize) -> Self {
        self.max_nursery_size = bytes;
        self
    }

    /// Set the floor of the major collection threshold.
    #[must_use]
    pub const fn min_major_threshold(mut self, bytes: usize) -> Self {
        self.min_major_threshold = bytes;
        self
    }

    /// Set the live-size multiplier used to compute the major threshold.
    #[must_use]
    pub const fn threshold_factor(mut self, factor: f64) -> Self {
        self.threshold_factor = factor;
        self
    }

    /// Set the promoted fraction that makes the nursery grow.
    #[must_use]
    pub const fn growth_trigger(mut self, fraction: f64) -> Self {
        self.growth_trigger = fraction;
        self
    }

    /// Set the old-generation chunk size.
    #[must_use]
    pub const fn old_chunk_size(mut self, bytes: usize) -> Self {
        self.old_chunk_size = bytes;
        self
    }

    /// Set the old-generation occupancy cap.
    #[must_use]
    pub const fn max_heap_size(mut self, bytes: usize) -> Self {
        self.max_heap_size = bytes;
        self
    }

    /// Check that the values can drive a heap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.nursery_size < MIN_NURSERY_SIZE {
            return Err(invalid(
                "nursery_size",
                format!("must be at least {MIN_NURSERY_SIZE} bytes"),
            ));
        }
        if self.max_nursery_size < self.nursery_size {
            return Err(invalid(
                "max_nursery_size",
                "must not be smaller than nursery_size".to_string(),
            ));
        }
        if self.min_major_threshold == 0 {
            return Err(invalid("min_major_threshold", "must be non-zero".to_string()));
        }
        if !(self.threshold_factor >= 1.0 && self.threshold_factor.is_finite()) {
            return Err(invalid(
                "threshold_factor",
                format!("must be a finite number >= 1.0, got {}", self.threshold_factor),
            ));
        }
        if !(self.growth_trigger > 0.0 && self.growth_trigger <= 1.0) {
            return Err(invalid(
                "growth_trigger",
                format!("must be in (0, 1], got {}", self.growth_trigger),
            ));
        }
        if self.old_chunk_size == 0 {
            return Err(invalid("old_chunk_size", "must be non-zero".to_string()));
        }
        if self.max_heap_size == 0 {
            return Err(invalid("max_heap_size", "must be non-zero".to_string()));
        }
        Ok(())
    }

    /// The default configuration with overrides from the environment.
    ///
    /// Recognized variables take a byte count with an optional `K`, `M` or
    /// `G` suffix: `GENGC_NURSERY_SIZE`, `GENGC_MAX_NURSERY_SIZE`,
    /// `GENGC_MAJOR_THRESHOLD` and `GENGC_MAX_HEAP_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable cannot be parsed or the
    /// resulting configuration does not validate.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();
        if let Some(bytes) = read_size(&lookup, "GENGC_NURSERY_SIZE")? {
            config = config.nursery_size(bytes);
        }
        if let Some(bytes) = read_size(&lookup, "GENGC_MAX_NURSERY_SIZE")? {
            config = config.max_nursery_size(bytes);
        }
        if let Some(bytes) = read_size(&lookup, "GENGC_MAJOR_THRESHOLD")? {
            config = config.min_major_threshold(bytes);
        }
        if let Some(bytes) = read_size(&lookup, "GENGC_MAX_HEAP_SIZE")? {
            config = config.max_heap_size(bytes);
        }
        config.validate()?;
        Ok(config)
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidConfig { field, reason }
}

fn read_size(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<usize>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    parse_size(&raw)
        .map(Some)
        .ok_or_else(|| invalid(key, format!("cannot parse {raw:?} as a size")))
}

/// Parse `"512"`, `"64K"`, `"4M"` or `"1G"` into a byte count.
fn parse_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let (digits, shift) = match raw.chars().last()? {
        'k' | 'K' => (&raw[..raw.len() - 1], 10),
        'm' | 'M' => (&raw[..raw.len() - 1], 20),
        'g' | 'G' => (&raw[..raw.len() - 1], 30),
        _ => (raw, 0),
    };
    let n: usize = digits.trim().parse().ok()?;
    n.checked_mul(1usize.checked_shl(shift)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = HeapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nursery_size, DEFAULT_NURSERY_SIZE);
        assert!(config.max_nursery_size >= config.nursery_size);
    }

    #[test]
    fn test_nursery_size_raises_maximum() {
        let config = HeapConfig::new().nursery_size(2 * DEFAULT_MAX_NURSERY_SIZE);
        assert_eq!(config.max_nursery_size, 2 * DEFAULT_MAX_NURSERY_SIZE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            (HeapConfig::new().nursery_size(16), "nursery_size"),
            (
                HeapConfig::new().max_nursery_size(MIN_NURSERY_SIZE),
                "max_nursery_size",
            ),
            (HeapConfig::new().threshold_factor(0.5), "threshold_factor"),
            (HeapConfig::new().growth_trigger(0.0), "growth_trigger"),
            (HeapConfig::new().old_chunk_size(0), "old_chunk_size"),
            (HeapConfig::new().max_heap_size(0), "max_heap_size"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("512"), Some(512));
        assert_eq!(parse_size("64K"), Some(64 * 1024));
        assert_eq!(parse_size(" 4m "), Some(4 * 1024 * 1024));
        assert_eq!(parse_size("1G"), Some(1 << 30));
        assert_eq!(parse_size("K"), None);
        assert_eq!(parse_size("ten"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let env: HashMap<&str, &str> = [
            ("GENGC_NURSERY_SIZE", "128K"),
            ("GENGC_MAJOR_THRESHOLD", "2M"),
        ]
        .into_iter()
        .collect();
        let config =
            HeapConfig::from_lookup(|key| env.get(key).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.nursery_size, 128 * 1024);
        assert_eq!(config.min_major_threshold, 2 * 1024 * 1024);
        assert_eq!(config.max_nursery_size, DEFAULT_MAX_NURSERY_SIZE);
    }

    #[test]
    fn test_from_lookup_reports_bad_variable() {
        let result = HeapConfig::from_lookup(|key| {
            (key == "GENGC_MAX_HEAP_SIZE").then(|| "lots".to_string())
        });
        match result {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, "GENGC_MAX_HEAP_SIZE"),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
