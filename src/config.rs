//! Global configuration for chromosome naming behavior.
//!
//! This module provides thread-safe global configuration that affects
//! how chromosome names are compared without adding overhead to hot loops.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::chrom;

/// Global flag for canonical chromosome naming.
///
/// When enabled, chromosome names are canonicalized (`chr1` -> `1`,
/// `chrMT` -> `M`) before scope comparisons and when the `Chr` column is
/// read for filtering.
///
/// This is set once at startup and read during evaluation. The atomic load
/// has negligible overhead compared to the actual filtering work.
static CANONICAL_NAMES: AtomicBool = AtomicBool::new(false);

/// Enable or disable canonical naming mode.
///
/// # Example
///
/// ```
/// use ivkeep::config;
///
/// config::set_canonical_names(true);
/// assert_eq!(config::chrom_key("chrX"), "X");
/// config::set_canonical_names(false);
/// assert_eq!(config::chrom_key("chrX"), "chrX");
/// ```
#[inline]
pub fn set_canonical_names(enabled: bool) {
    CANONICAL_NAMES.store(enabled, Ordering::Release);
}

/// Check if canonical naming mode is enabled.
#[inline]
pub fn is_canonical_names() -> bool {
    CANONICAL_NAMES.load(Ordering::Acquire)
}

/// Chromosome key used for equality checks under the current naming mode.
///
/// Returns the canonical token when canonical naming is enabled and the name
/// is recognized, otherwise the raw name.
#[inline]
pub fn chrom_key(raw: &str) -> &str {
    if is_canonical_names() {
        chrom::canonicalize(raw)
    } else {
        raw
    }
}

/// Compare two chromosome names for equality under the current naming mode.
#[inline]
pub fn same_chrom(a: &str, b: &str) -> bool {
    chrom_key(a) == chrom_key(b)
}
