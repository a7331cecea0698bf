//! Typed attribute values.

use std::borrow::Cow;
use std::fmt;

use crate::schema::ColumnKind;

/// A row's attribute value as seen by the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Text(Cow<'a, str>),
}

impl<'a> Value<'a> {
    /// Interpret stored text as `kind`, keeping it as text when it does not
    /// parse. Whole numbers in a float column come back as [`Value::Int`] so
    /// bit tests on them stay meaningful.
    pub fn typed(text: Cow<'a, str>, kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Int => Value::Text(text).coerce_int(),
            ColumnKind::Float => match Number::parse(&text) {
                Some(Number::Int(n)) => Value::Int(n),
                Some(Number::Float(n)) => Value::Float(n),
                None => Value::Text(text),
            },
            ColumnKind::Text => Value::Text(text),
        }
    }

    /// Best-effort integer coercion of a text value. Numbers pass through.
    pub fn coerce_int(self) -> Self {
        match self {
            Value::Text(text) => match text.trim().parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Text(text),
            },
            other => other,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A parsed numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse as an integer if possible, otherwise as a finite float.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(n) => Some(Number::Int(n)),
            Err(_) => parse_finite(text).map(Number::Float),
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

/// Parse a float, rejecting `inf` and `NaN` spellings.
fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
