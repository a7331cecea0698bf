//! Canonical chromosome ordering over mixed naming conventions.

use std::cmp::Ordering;

use ivkeep::chrom::{self, ChromCategory};
use ivkeep::interval::GenomicInterval;

#[test]
fn test_mixed_conventions_sort() {
    let mut names = vec![
        "chrUn_gl000220",
        "chrY",
        "10",
        "chrMT",
        "Chr2",
        "x",
        "chr1",
        "HLA-A*01:01",
    ];
    names.sort_by(|a, b| chrom::compare_names(a, b));
    assert_eq!(
        names,
        vec!["chr1", "Chr2", "10", "chrMT", "x", "chrY", "HLA-A*01:01", "chrUn_gl000220"]
    );
}

#[test]
fn test_order_is_total_with_nulls() {
    let mut names = vec![Some("chr3"), None, Some("scaffold_9"), Some("3"), None];
    names.sort_by(|a, b| chrom::compare(*a, *b));
    assert_eq!(names[0], None);
    assert_eq!(names[1], None);
    // chr3 and 3 tie; stable sort keeps input order
    assert_eq!(names[2], Some("chr3"));
    assert_eq!(names[3], Some("3"));
    assert_eq!(names[4], Some("scaffold_9"));
}

#[test]
fn test_equal_canonical_forms_compare_equal() {
    for (a, b) in [("chr1", "1"), ("chrM", "MT"), ("chrX", "x"), ("CHR22", "Chr22")] {
        assert_eq!(chrom::compare_names(a, b), Ordering::Equal, "{} vs {}", a, b);
        assert_ne!(a, b);
    }
}

#[test]
fn test_categories_cover_every_canonical_token() {
    for entry in chrom::canonical_entries() {
        let expected = match entry.token {
            "X" => ChromCategory::X,
            "Y" => ChromCategory::Y,
            "M" => ChromCategory::Mt,
            _ => ChromCategory::Autosome,
        };
        assert_eq!(chrom::category(entry.token), expected);
        assert_eq!(chrom::category(&format!("chr{}", entry.token)), expected);
        assert_eq!(chrom::reference_length(entry.token), Some(entry.length));
        assert!(chrom::is_canonical(entry.token));
    }
}

#[test]
fn test_sort_rows_by_chrom_then_position() {
    let mut rows = vec![
        GenomicInterval::new("chrX", 5, 10),
        GenomicInterval::new("chr10", 5, 10),
        GenomicInterval::new("2", 100, 200),
        GenomicInterval::new("chr2", 50, 60),
    ];
    chrom::sort_by_chrom_order(&mut rows);

    let order: Vec<(&str, u64)> = rows.iter().map(|r| (r.chrom.as_str(), r.start)).collect();
    assert_eq!(order, vec![("chr2", 50), ("2", 100), ("chr10", 5), ("chrX", 5)]);
}
