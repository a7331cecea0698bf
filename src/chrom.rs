//! Canonical chromosome naming and ordering.
//!
//! Chromosome names show up in many spellings (`chr1`, `Chr1`, `1`, `chrMT`,
//! `x`). This module maps every known spelling onto one of 25 canonical
//! tokens (`1`..`22`, `M`, `X`, `Y`) and defines a biological sort order over
//! them: autosomes numerically, then `M`, `X`, `Y`. Unrecognized names pass
//! through unchanged and sort after every recognized name.
//!
//! Note that [`compare`] is intentionally inconsistent with string equality:
//! `compare("chr1", "1")` is [`Ordering::Equal`] although the strings differ.
//! For that reason there is no `Ord` impl on a chromosome type; use the free
//! comparator functions with `sort_by`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::interval::Locus;

/// Canonical tokens in rank order with their hg19 reference lengths.
const CANONICAL: [(&str, u64); 25] = [
    ("1", 249_250_621),
    ("2", 243_199_373),
    ("3", 198_022_430),
    ("4", 191_154_276),
    ("5", 180_915_260),
    ("6", 171_115_067),
    ("7", 159_138_663),
    ("8", 146_364_022),
    ("9", 141_213_431),
    ("10", 135_534_747),
    ("11", 135_006_516),
    ("12", 133_851_895),
    ("13", 115_169_878),
    ("14", 107_349_540),
    ("15", 102_531_392),
    ("16", 90_354_753),
    ("17", 81_195_210),
    ("18", 78_077_248),
    ("19", 59_128_983),
    ("20", 63_025_520),
    ("21", 48_129_895),
    ("22", 51_304_566),
    ("M", 16_571),
    ("X", 155_270_560),
    ("Y", 59_373_566),
];

const PREFIXES: [&str; 4] = ["", "chr", "Chr", "CHR"];

/// One of the 25 canonical chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalEntry {
    /// Canonical token (`"1"`, `"X"`, `"M"`, ...)
    pub token: &'static str,
    /// Sort rank, 0-based
    pub index: usize,
    /// hg19 reference length in bp
    pub length: u64,
}

/// Broad chromosome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromCategory {
    Autosome,
    X,
    Y,
    Mt,
    Other,
}

impl fmt::Display for ChromCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChromCategory::Autosome => write!(f, "autosome"),
            ChromCategory::X => write!(f, "X"),
            ChromCategory::Y => write!(f, "Y"),
            ChromCategory::Mt => write!(f, "MT"),
            ChromCategory::Other => write!(f, "other"),
        }
    }
}

/// Alias spelling -> index into `CANONICAL`. Built once on first use.
static ALIASES: LazyLock<FxHashMap<String, usize>> = LazyLock::new(build_aliases);

fn build_aliases() -> FxHashMap<String, usize> {
    let mut aliases = FxHashMap::default();
    for (index, &(token, _)) in CANONICAL.iter().enumerate() {
        let spellings: Vec<&str> = match token {
            "X" => vec!["X", "x"],
            "Y" => vec!["Y", "y"],
            "M" => vec!["M", "m", "MT", "Mt", "mt"],
            numeric => vec![numeric],
        };
        for prefix in PREFIXES {
            for spelling in &spellings {
                aliases.insert(format!("{prefix}{spelling}"), index);
            }
        }
    }
    aliases
}

#[inline]
fn rank(raw: &str) -> Option<usize> {
    ALIASES.get(raw).copied()
}

/// Map a raw chromosome spelling to its canonical token.
///
/// Unrecognized names are returned unchanged.
///
/// ```
/// use ivkeep::chrom::canonicalize;
///
/// assert_eq!(canonicalize("chr1"), "1");
/// assert_eq!(canonicalize("chrMT"), "M");
/// assert_eq!(canonicalize("chrUn_gl000220"), "chrUn_gl000220");
/// ```
pub fn canonicalize(raw: &str) -> &str {
    match rank(raw) {
        Some(index) => CANONICAL[index].0,
        None => raw,
    }
}

/// True iff `name` is itself one of the 25 canonical tokens.
///
/// Aliases such as `chr1` are not canonical even though they resolve to one.
pub fn is_canonical(name: &str) -> bool {
    CANONICAL.iter().any(|(token, _)| *token == name)
}

/// Classify a chromosome name.
pub fn category(raw: &str) -> ChromCategory {
    match rank(raw) {
        Some(index) => match CANONICAL[index].0 {
            "X" => ChromCategory::X,
            "Y" => ChromCategory::Y,
            "M" => ChromCategory::Mt,
            _ => ChromCategory::Autosome,
        },
        None => ChromCategory::Other,
    }
}

/// hg19 reference length of a recognized chromosome.
pub fn reference_length(raw: &str) -> Option<u64> {
    rank(raw).map(|index| CANONICAL[index].1)
}

/// Canonical entry for a raw name, if recognized.
pub fn entry(raw: &str) -> Option<CanonicalEntry> {
    rank(raw).map(|index| CanonicalEntry {
        token: CANONICAL[index].0,
        index,
        length: CANONICAL[index].1,
    })
}

/// All canonical chromosomes in rank order.
pub fn canonical_entries() -> impl Iterator<Item = CanonicalEntry> {
    CANONICAL
        .iter()
        .enumerate()
        .map(|(index, &(token, length))| CanonicalEntry {
            token,
            index,
            length,
        })
}

/// Total order over optional chromosome names.
///
/// - `None` sorts before any name.
/// - Names with the same canonical form compare equal.
/// - Ranked names compare by rank and precede every unranked name.
/// - Unranked names compare lexicographically.
pub fn compare(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_names(a, b),
    }
}

/// [`compare`] for two present names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (rank_a, rank_b) = (rank(a), rank(b));
    let canon_a = rank_a.map_or(a, |i| CANONICAL[i].0);
    let canon_b = rank_b.map_or(b, |i| CANONICAL[i].0);
    if canon_a == canon_b {
        return Ordering::Equal;
    }
    match (rank_a, rank_b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => canon_a.cmp(canon_b),
    }
}

/// Compare two loci by canonical chromosome order, then start, then end.
pub fn compare_loci<L: Locus + ?Sized>(a: &L, b: &L) -> Ordering {
    compare_names(a.chrom(), b.chrom())
        .then(a.start().cmp(&b.start()))
        .then(a.end().cmp(&b.end()))
}

/// Stable sort of loci by canonical chromosome order and coordinates.
///
/// Ties (including different spellings of the same chromosome at the same
/// position) keep their input order.
pub fn sort_by_chrom_order<L: Locus>(items: &mut [L]) {
    items.sort_by(|a, b| compare_loci(a, b));
}
