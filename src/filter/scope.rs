//! Geographic scope of a row filter and the visible-range supplier.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config;
use crate::interval::{ranges_overlap, Interval, Locus};

/// Breadth over which rows are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every row passes.
    #[default]
    Genome,
    /// Rows on the currently visible chromosome.
    Chromosome,
    /// Rows overlapping the currently visible range.
    Visible,
}

impl Scope {
    /// Check `row` against the cached visible range. Without a visible range
    /// only [`Scope::Genome`] passes.
    pub fn admits<L: Locus + ?Sized>(self, row: &L, visible: Option<&Interval>) -> bool {
        match (self, visible) {
            (Scope::Genome, _) => true,
            (_, None) => false,
            (Scope::Chromosome, Some(view)) => config::same_chrom(row.chrom(), &view.chrom),
            (Scope::Visible, Some(view)) => {
                config::same_chrom(row.chrom(), &view.chrom) && ranges_overlap(row, view)
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Genome => write!(f, "genome"),
            Scope::Chromosome => write!(f, "chromosome"),
            Scope::Visible => write!(f, "visible"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genome" => Ok(Scope::Genome),
            "chromosome" | "chrom" => Ok(Scope::Chromosome),
            "visible" | "view" => Ok(Scope::Visible),
            other => Err(format!("Unknown scope '{}'", other)),
        }
    }
}

/// Pull-based source of the currently visible range.
///
/// Filters call this only after being told the view changed, never per row.
pub trait ViewSupplier: Send + Sync {
    fn visible_range(&self) -> Option<Interval>;
}

impl<F> ViewSupplier for F
where
    F: Fn() -> Option<Interval> + Send + Sync,
{
    fn visible_range(&self) -> Option<Interval> {
        self()
    }
}

/// Supplier for hosts with no view at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoView;

impl ViewSupplier for NoView {
    fn visible_range(&self) -> Option<Interval> {
        None
    }
}

/// Shared cell holding the host's visible range.
///
/// Clones share the same cell: the host keeps one clone and calls [`set`],
/// the filter holds another as its [`ViewSupplier`].
///
/// [`set`]: Viewport::set
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    range: Arc<RwLock<Option<Interval>>>,
}

impl Viewport {
    pub fn new(range: Option<Interval>) -> Self {
        Self {
            range: Arc::new(RwLock::new(range)),
        }
    }

    pub fn set(&self, range: Option<Interval>) {
        *self.range.write().unwrap_or_else(PoisonError::into_inner) = range;
    }

    pub fn get(&self) -> Option<Interval> {
        self.range
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ViewSupplier for Viewport {
    fn visible_range(&self) -> Option<Interval> {
        self.get()
    }
}
