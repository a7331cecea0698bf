//! Row filtering: a geographic [`Scope`] plus an ordered list of attribute
//! constraints ([`FilterSpec`]), AND-combined.
//!
//! Errors follow two policies:
//!
//! - Building a filter from user input ([`FilterSpec::parse`],
//!   [`RowFilter::add_expression`]) returns [`FilterError`] to the caller.
//! - Evaluating a row never fails. Any [`EvalError`] is logged and the row
//!   is excluded, so one bad row cannot abort a table refresh.

pub mod scope;
pub mod spec;
pub mod value;
pub mod width;

use log::{debug, trace};
use rayon::prelude::*;
use thiserror::Error;

use crate::interval::{GenomicInterval, Interval};
use crate::schema::Schema;

pub use scope::{NoView, Scope, ViewSupplier, Viewport};
pub use spec::{FilterSpec, Operator};
pub use value::Value;
pub use width::{format_width, parse_width, WidthError};

/// Errors raised while building a filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown attribute '{0}'")]
    UnknownKey(String),

    #[error("No operator in filter '{0}' (expected one of && ^^ <= >= != = < >)")]
    MissingOperator(String),

    #[error("Empty filter expression")]
    EmptyExpression,
}

/// Errors raised while evaluating a row. Never escape a row predicate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid width literal: {0}")]
    Width(#[from] WidthError),

    #[error("Flag test on '{key}' needs an integer, got '{value}'")]
    FlagOperand { key: String, value: String },

    #[error("'{key}' is numeric but literal '{literal}' is not")]
    NonNumericLiteral { key: String, literal: String },

    #[error("Operator {op} is not supported for text attribute '{key}'")]
    Unsupported { key: String, op: Operator },

    #[error("No value for '{0}'")]
    MissingValue(String),
}

/// Scope plus attribute constraints, with a cached visible range.
///
/// The visible range is pulled from the [`ViewSupplier`] only after
/// [`set_view_changed`](RowFilter::set_view_changed), on the next
/// evaluation.
pub struct RowFilter {
    scope: Scope,
    specs: Vec<FilterSpec>,
    view: Box<dyn ViewSupplier>,
    visible: Option<Interval>,
    dirty: bool,
}

impl RowFilter {
    pub fn new(scope: Scope, view: impl ViewSupplier + 'static) -> Self {
        Self {
            scope,
            specs: Vec::new(),
            view: Box::new(view),
            visible: None,
            dirty: true,
        }
    }

    /// Genome-wide filter with no view.
    pub fn genome() -> Self {
        Self::new(Scope::Genome, NoView)
    }

    /// Build a filter from human-entered expressions, failing on the first
    /// invalid one.
    pub fn with_expressions<S: AsRef<str>>(
        scope: Scope,
        view: impl ViewSupplier + 'static,
        exprs: &[S],
        schema: &Schema,
    ) -> Result<Self, FilterError> {
        let mut filter = Self::new(scope, view);
        for expr in exprs {
            filter.add_expression(expr.as_ref(), schema)?;
        }
        Ok(filter)
    }

    /// Append a constraint. Constraints are checked in insertion order.
    pub fn add_spec(&mut self, spec: FilterSpec) {
        self.specs.push(spec);
    }

    /// Parse and append a constraint.
    pub fn add_expression(&mut self, expr: &str, schema: &Schema) -> Result<(), FilterError> {
        let spec = FilterSpec::parse(expr, schema)?;
        self.specs.push(spec);
        Ok(())
    }

    pub fn clear_specs(&mut self) {
        self.specs.clear();
    }

    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    /// Mark the cached visible range stale. Nothing is recomputed until the
    /// next evaluation.
    pub fn set_view_changed(&mut self) {
        self.dirty = true;
    }

    /// Visible range as of the last refresh.
    pub fn cached_view(&self) -> Option<&Interval> {
        self.visible.as_ref()
    }

    /// Refresh the view if stale and borrow a predicate for evaluating rows.
    pub fn predicate(&mut self) -> RowPredicate<'_> {
        if self.dirty {
            self.visible = self.view.visible_range();
            self.dirty = false;
            debug!(
                "Visible range refreshed: {}",
                self.visible
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |v| v.to_string())
            );
        }
        RowPredicate {
            scope: self.scope,
            visible: self.visible.as_ref(),
            specs: &self.specs,
        }
    }

    /// Whether `row` should be shown.
    pub fn matches(&mut self, row: &GenomicInterval) -> bool {
        self.predicate().matches(row)
    }

    /// Indices of the rows that pass, in row order.
    pub fn select(&mut self, rows: &[GenomicInterval]) -> Vec<usize> {
        let predicate = self.predicate();
        rows.iter()
            .enumerate()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// [`select`](RowFilter::select) across the rayon pool.
    pub fn select_parallel(&mut self, rows: &[GenomicInterval]) -> Vec<usize> {
        let predicate = self.predicate();
        rows.par_iter()
            .enumerate()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::genome()
    }
}

/// Snapshot of a filter's state for evaluating many rows.
#[derive(Debug, Clone, Copy)]
pub struct RowPredicate<'f> {
    scope: Scope,
    visible: Option<&'f Interval>,
    specs: &'f [FilterSpec],
}

impl RowPredicate<'_> {
    /// Scope first, then each constraint in order, stopping at the first
    /// failure.
    pub fn matches(&self, row: &GenomicInterval) -> bool {
        if !self.scope.admits(row, self.visible) {
            trace!("{} outside {} scope", row, self.scope);
            return false;
        }
        self.specs.iter().all(|spec| spec.matches(row))
    }
}
