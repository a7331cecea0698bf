//! Core interval types for genomic region representation.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

/// Anything with a chromosome and a half-open `[start, end)` range.
pub trait Locus {
    fn chrom(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;

    /// Width in bp, `|end - start|`.
    #[inline]
    fn width(&self) -> u64 {
        self.end().abs_diff(self.start())
    }

    /// Half-open overlap on the same raw chromosome name.
    /// Touching ranges (`end == other.start`) do not overlap.
    #[inline]
    fn overlaps_locus<L: Locus + ?Sized>(&self, other: &L) -> bool {
        self.chrom() == other.chrom() && ranges_overlap(self, other)
    }
}

/// Half-open overlap of the coordinate ranges only, ignoring chromosome.
#[inline]
pub fn ranges_overlap<A: Locus + ?Sized, B: Locus + ?Sized>(a: &A, b: &B) -> bool {
    spans_overlap(a.start(), a.end(), b.start(), b.end())
}

/// Half-open overlap of `[a_start, a_end)` and `[b_start, b_end)`.
///
/// The intersection must be non-empty, so a zero-length range overlaps
/// nothing, not even a range that contains its position.
#[inline]
pub fn spans_overlap(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Errors that can occur when parsing a `chrom:start-end` locus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocusError {
    #[error("Invalid locus '{0}': expected chrom:start-end")]
    Format(String),

    #[error("Invalid coordinate '{0}'")]
    Coordinate(String),

    #[error("Invalid interval: start {start} > end {end}")]
    Reversed { start: u64, end: u64 },
}

/// A genomic interval with chromosome, start, and end positions.
/// Uses 0-based, half-open coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create a new interval.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Check if this interval overlaps with another.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.chrom == other.chrom && spans_overlap(self.start, self.end, other.start, other.end)
    }
}

impl Locus for Interval {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chrom
    }

    #[inline]
    fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    fn end(&self) -> u64 {
        self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = LocusError;

    /// Parse `chrom:start-end`. Thousands separators are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chrom, range) = s
            .rsplit_once(':')
            .ok_or_else(|| LocusError::Format(s.to_string()))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| LocusError::Format(s.to_string()))?;
        if chrom.is_empty() {
            return Err(LocusError::Format(s.to_string()));
        }

        let start = parse_coordinate(start)?;
        let end = parse_coordinate(end)?;
        if start > end {
            return Err(LocusError::Reversed { start, end });
        }
        Ok(Interval::new(chrom, start, end))
    }
}

fn parse_coordinate(raw: &str) -> Result<u64, LocusError> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    cleaned
        .parse()
        .map_err(|_| LocusError::Coordinate(raw.to_string()))
}

/// An editable interval row as held by a session's interval collection.
///
/// Equality is by value over every field. Undo diffing and row look-up rely
/// on this; two rows with identical content are the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: Option<String>,
    /// Kept as text; coerced only when filtered.
    pub score: Option<String>,
    pub strand: Option<Strand>,
    pub color: Option<String>,
    /// Custom fields defined by the editing layer's schema.
    pub annotations: IndexMap<String, String>,
}

impl GenomicInterval {
    /// Create an interval with no optional fields.
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            name: None,
            score: None,
            strand: None,
            color: None,
            annotations: IndexMap::new(),
        }
    }

    /// Checked constructor enforcing `start <= end`.
    pub fn try_new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self, LocusError> {
        if start > end {
            return Err(LocusError::Reversed { start, end });
        }
        Ok(Self::new(chrom, start, end))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set a custom annotation, keeping first-insertion order.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Look up a custom annotation.
    #[inline]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

impl Locus for GenomicInterval {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chrom
    }

    #[inline]
    fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    fn end(&self) -> u64 {
        self.end
    }
}

impl<L: Locus + ?Sized> Locus for &L {
    #[inline]
    fn chrom(&self) -> &str {
        (**self).chrom()
    }

    #[inline]
    fn start(&self) -> u64 {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> u64 {
        (**self).end()
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)?;
        if let Some(ref name) = self.name {
            write!(f, " {}", name)?;
        }
        Ok(())
    }
}

/// Strand orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    /// Text form used for display and filtering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
            Strand::Unknown => "0",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
