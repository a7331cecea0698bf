//! ivkeep: genomic interval bookkeeping
//!
//! The logic behind an interval-editing layer in a genome browser, with no
//! UI attached.
//!
//! # Features
//!
//! - **Canonical chromosome order**: `chr1`, `Chr1` and `1` are one
//!   chromosome, sorted `1..22, M, X, Y`, then everything else
//! - **Overlap index**: per-chromosome balanced trees over borrowed intervals
//! - **Snapshot undo**: diff-chain history over a collection the host owns
//! - **Row filters**: scope plus `Key<op>Literal` constraints such as
//!   `Score>=100`, `Width<=10kb`, `Flags&&2`
//!
//! # Example
//!
//! ```rust
//! use ivkeep::prelude::*;
//!
//! let rows = vec![
//!     GenomicInterval::new("chr1", 100, 8_100).with_score("150"),
//!     GenomicInterval::new("chr1", 500, 20_500).with_score("90"),
//! ];
//!
//! let schema = Schema::standard();
//! let mut filter = RowFilter::genome();
//! filter.add_expression("Score>=100", &schema).unwrap();
//! filter.add_expression("Width<=10kb", &schema).unwrap();
//! assert_eq!(filter.select(&rows), vec![0]);
//!
//! let index = IntervalIndex::from_intervals(&rows);
//! assert_eq!(index.find_overlaps(&Interval::new("chr1", 9_000, 9_001)).len(), 1);
//! ```

pub mod chrom;
pub mod config;
pub mod filter;
pub mod index;
pub mod interval;
pub mod schema;
pub mod undo;

// Re-export commonly used types
pub use filter::{FilterError, FilterSpec, Operator, RowFilter, Scope};
pub use index::IntervalIndex;
pub use interval::{GenomicInterval, Interval, Locus, Strand};
pub use schema::Schema;
pub use undo::{EditSession, SnapshotUndo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chrom::{canonicalize, compare_names, sort_by_chrom_order, ChromCategory};
    pub use crate::filter::{FilterSpec, Operator, RowFilter, Scope, ViewSupplier, Viewport};
    pub use crate::index::IntervalIndex;
    pub use crate::interval::{GenomicInterval, Interval, Locus, Strand};
    pub use crate::schema::{ColumnKind, Schema};
    pub use crate::undo::{EditSession, SnapshotUndo};
}
