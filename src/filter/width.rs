//! Human-unit interval widths: `500`, `500bp`, `10kb`, `1.5Mb`, `2Gb`.

use thiserror::Error;

/// Errors that can occur when parsing a width.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidthError {
    #[error("Empty width")]
    Empty,

    #[error("Invalid width magnitude in '{0}'")]
    Magnitude(String),

    #[error("Unknown width unit '{unit}' in '{input}' (expected bp, kb, Mb or Gb)")]
    Unit { input: String, unit: String },
}

const UNITS: [(&str, u64); 4] = [
    ("gb", 1_000_000_000),
    ("mb", 1_000_000),
    ("kb", 1_000),
    ("bp", 1),
];

/// Parse a width with an optional case-insensitive unit suffix.
///
/// The magnitude may be decimal; the result is floored to whole bp. A bare
/// number is taken as bp.
///
/// ```
/// use ivkeep::filter::width::parse_width;
///
/// assert_eq!(parse_width("10kb"), Ok(10_000));
/// assert_eq!(parse_width("1.5Mb"), Ok(1_500_000));
/// assert_eq!(parse_width("2.9 bp"), Ok(2));
/// ```
pub fn parse_width(input: &str) -> Result<u64, WidthError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WidthError::Empty);
    }

    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (magnitude, unit) = trimmed.split_at(split);
    let unit = unit.trim().to_ascii_lowercase();

    let multiplier = if unit.is_empty() {
        1
    } else {
        UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|&(_, mult)| mult)
            .ok_or_else(|| WidthError::Unit {
                input: input.to_string(),
                unit: unit.clone(),
            })?
    };

    let magnitude: f64 = magnitude
        .trim()
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| WidthError::Magnitude(input.to_string()))?;

    Ok((magnitude * multiplier as f64).floor() as u64)
}

/// Format a width in the largest unit giving a magnitude of at least 1,
/// with at most two decimals.
///
/// ```
/// use ivkeep::filter::width::format_width;
///
/// assert_eq!(format_width(999), "999bp");
/// assert_eq!(format_width(10_000), "10kb");
/// assert_eq!(format_width(1_250_000), "1.25Mb");
/// ```
pub fn format_width(bp: u64) -> String {
    let (label, mult) = match bp {
        n if n >= 1_000_000_000 => ("Gb", 1_000_000_000),
        n if n >= 1_000_000 => ("Mb", 1_000_000),
        n if n >= 1_000 => ("kb", 1_000),
        _ => return format!("{}bp", bp),
    };
    let scaled = format!("{:.2}", bp as f64 / mult as f64);
    let scaled = scaled.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", scaled, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_case_insensitive() {
        assert_eq!(parse_width("10KB"), Ok(10_000));
        assert_eq!(parse_width("10kB"), Ok(10_000));
        assert_eq!(parse_width("3mb"), Ok(3_000_000));
        assert_eq!(parse_width("1GB"), Ok(1_000_000_000));
        assert_eq!(parse_width("42BP"), Ok(42));
        assert_eq!(parse_width("42"), Ok(42));
    }

    #[test]
    fn test_decimal_floored() {
        assert_eq!(parse_width("1.2345kb"), Ok(1_234));
        assert_eq!(parse_width("0.5bp"), Ok(0));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_width(""), Err(WidthError::Empty));
        assert!(matches!(parse_width("kb"), Err(WidthError::Magnitude(_))));
        assert!(matches!(parse_width("-5kb"), Err(WidthError::Magnitude(_))));
        assert!(matches!(parse_width("10tb"), Err(WidthError::Unit { .. })));
        assert!(matches!(parse_width("1.2.3kb"), Err(WidthError::Magnitude(_))));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_width(0), "0bp");
        assert_eq!(format_width(1_500), "1.5kb");
        assert_eq!(format_width(2_000_000_000), "2Gb");
    }
}
