//! Single attribute constraints: `Score>=100`, `Name=*foo*`, `Flags&&2`.

use std::cmp::Ordering;
use std::fmt;

use log::warn;

use super::value::{Number, Value};
use super::width::parse_width;
use super::{EvalError, FilterError};
use crate::interval::GenomicInterval;
use crate::schema::{Column, Schema};

/// Comparison operator of a [`FilterSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    /// Every bit of the literal is set in the value.
    FlagSet,
    /// At least one bit of the literal is clear in the value.
    FlagUnset,
}

/// Operator tokens, most specific first so `<=` is never split as `<`.
const TOKENS: [(&str, Operator); 8] = [
    ("&&", Operator::FlagSet),
    ("^^", Operator::FlagUnset),
    ("<=", Operator::Lte),
    (">=", Operator::Gte),
    ("!=", Operator::Neq),
    ("=", Operator::Eq),
    ("<", Operator::Lt),
    (">", Operator::Gt),
];

impl Operator {
    pub fn token(self) -> &'static str {
        TOKENS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("?", |&(token, _)| token)
    }

    #[inline]
    pub fn is_flag(self) -> bool {
        matches!(self, Operator::FlagSet | Operator::FlagUnset)
    }

    /// Apply a relational operator to an ordering. Flag operators never
    /// reach here.
    #[inline]
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Operator::Eq => ord == Ordering::Equal,
            Operator::Neq => ord != Ordering::Equal,
            Operator::Gt => ord == Ordering::Greater,
            Operator::Lt => ord == Ordering::Less,
            Operator::Gte => ord != Ordering::Less,
            Operator::Lte => ord != Ordering::Greater,
            Operator::FlagSet | Operator::FlagUnset => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One attribute constraint bound to a schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    column: Column,
    op: Operator,
    literal: String,
    /// Literal parses as a number
    number: Option<Number>,
    /// Literal ends with `*`
    prefix_match: bool,
    /// Literal starts and ends with `*`
    contains_match: bool,
}

impl FilterSpec {
    /// Build a constraint for `key`, which must exist in `schema`.
    pub fn new(
        key: &str,
        op: Operator,
        literal: impl Into<String>,
        schema: &Schema,
    ) -> Result<Self, FilterError> {
        let key = key.trim();
        let column = schema
            .column(key)
            .cloned()
            .ok_or_else(|| FilterError::UnknownKey(key.to_string()))?;
        let literal = literal.into().trim().to_string();

        Ok(Self {
            number: Number::parse(&literal),
            prefix_match: literal.ends_with('*'),
            contains_match: literal.starts_with('*') && literal.ends_with('*'),
            column,
            op,
            literal,
        })
    }

    /// Parse a human-entered constraint such as `Score>=100`.
    ///
    /// ```
    /// use ivkeep::filter::{FilterSpec, Operator};
    /// use ivkeep::schema::Schema;
    ///
    /// let spec = FilterSpec::parse("Score>=100", &Schema::standard()).unwrap();
    /// assert_eq!(spec.key(), "Score");
    /// assert_eq!(spec.operator(), Operator::Gte);
    /// assert_eq!(spec.literal(), "100");
    /// ```
    pub fn parse(expr: &str, schema: &Schema) -> Result<Self, FilterError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(FilterError::EmptyExpression);
        }
        let (pos, token, op) = TOKENS
            .iter()
            .find_map(|&(token, op)| expr.find(token).map(|pos| (pos, token, op)))
            .ok_or_else(|| FilterError::MissingOperator(expr.to_string()))?;

        let key = &expr[..pos];
        let literal = &expr[pos + token.len()..];
        Self::new(key, op, literal, schema)
    }

    pub fn key(&self) -> &str {
        &self.column.key
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_numeric_literal(&self) -> bool {
        self.number.is_some()
    }

    pub fn is_prefix_match(&self) -> bool {
        self.prefix_match
    }

    pub fn is_contains_match(&self) -> bool {
        self.contains_match
    }

    /// Evaluate against `row`, failing closed: any evaluation error is
    /// logged and the row is excluded.
    pub fn matches(&self, row: &GenomicInterval) -> bool {
        match self.evaluate(row) {
            Ok(pass) => pass,
            Err(e) => {
                warn!("Filter '{}' excludes {}: {}", self, row, e);
                false
            }
        }
    }

    /// Evaluate against `row`, surfacing evaluation errors.
    pub fn evaluate(&self, row: &GenomicInterval) -> Result<bool, EvalError> {
        if self.column.is_width() {
            let width = i64::try_from(row.start.abs_diff(row.end)).unwrap_or(i64::MAX);
            let literal = i64::try_from(parse_width(&self.literal)?).unwrap_or(i64::MAX);
            return Ok(int_op(width, literal, self.op));
        }

        let mut value = self
            .column
            .value_of(row)
            .ok_or_else(|| EvalError::MissingValue(self.key().to_string()))?;

        if self.number.is_some() {
            value = value.coerce_int();
        }
        if self.op.is_flag() {
            if let Value::Text(text) = value.clone() {
                value = Value::Int(text.trim().parse().map_err(|_| EvalError::FlagOperand {
                    key: self.key().to_string(),
                    value: text.into_owned(),
                })?);
            }
        }

        match value {
            Value::Int(v) => self.eval_int(v),
            Value::Float(v) => self.eval_float(v),
            Value::Text(text) => self.eval_text(&text),
        }
    }

    fn numeric_literal(&self) -> Result<Number, EvalError> {
        self.number.ok_or_else(|| EvalError::NonNumericLiteral {
            key: self.key().to_string(),
            literal: self.literal.clone(),
        })
    }

    fn eval_int(&self, v: i64) -> Result<bool, EvalError> {
        match (self.numeric_literal()?, self.op) {
            (Number::Int(literal), op) => Ok(int_op(v, literal, op)),
            (Number::Float(_), op) if op.is_flag() => Err(EvalError::FlagOperand {
                key: self.key().to_string(),
                value: self.literal.clone(),
            }),
            (Number::Float(literal), op) => Ok(op.holds((v as f64).total_cmp(&literal))),
        }
    }

    fn eval_float(&self, v: f64) -> Result<bool, EvalError> {
        let literal = self.numeric_literal()?.as_f64();
        match self.op {
            // Bit tests are not defined for floats; such rows pass.
            Operator::FlagSet | Operator::FlagUnset => Ok(true),
            op => Ok(op.holds(v.total_cmp(&literal))),
        }
    }

    fn eval_text(&self, text: &str) -> Result<bool, EvalError> {
        match self.op {
            Operator::Eq => Ok(self.text_matches(text)),
            Operator::Neq => Ok(!self.text_matches(text)),
            Operator::FlagSet | Operator::FlagUnset => Err(EvalError::Unsupported {
                key: self.key().to_string(),
                op: self.op,
            }),
            op => Ok(op.holds(text.cmp(self.literal.as_str()))),
        }
    }

    fn text_matches(&self, text: &str) -> bool {
        if self.contains_match {
            let needle = self
                .literal
                .get(1..self.literal.len() - 1)
                .unwrap_or_default();
            text.contains(needle)
        } else if self.prefix_match {
            text.starts_with(&self.literal[..self.literal.len() - 1])
        } else {
            text == self.literal
        }
    }
}

#[inline]
fn int_op(v: i64, literal: i64, op: Operator) -> bool {
    match op {
        Operator::FlagSet => v & literal == literal,
        Operator::FlagUnset => v & literal != literal,
        op => op.holds(v.cmp(&literal)),
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column.key, self.op, self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnKind;

    fn schema() -> Schema {
        Schema::standard()
            .with_annotation("Flags", ColumnKind::Int)
            .with_annotation("Gene", ColumnKind::Text)
            .with_annotation("Depth", ColumnKind::Float)
    }

    fn row() -> GenomicInterval {
        GenomicInterval::new("chr1", 1_000, 9_000)
    }

    fn spec(expr: &str) -> FilterSpec {
        FilterSpec::parse(expr, &schema()).unwrap()
    }

    #[test]
    fn test_parse_operators() {
        let cases = [
            ("Score>=100", Operator::Gte),
            ("Score<=100", Operator::Lte),
            ("Score!=100", Operator::Neq),
            ("Score=100", Operator::Eq),
            ("Score<100", Operator::Lt),
            ("Score>100", Operator::Gt),
            ("Flags&&2", Operator::FlagSet),
            ("Flags^^2", Operator::FlagUnset),
        ];
        for (expr, op) in cases {
            let parsed = spec(expr);
            assert_eq!(parsed.operator(), op, "{}", expr);
            assert_eq!(parsed.literal(), if expr.starts_with("Flags") { "2" } else { "100" });
        }
    }

    #[test]
    fn test_parse_trims_and_resolves_key() {
        let parsed = spec("  score >=  100 ");
        assert_eq!(parsed.key(), "Score");
        assert_eq!(parsed.literal(), "100");
        assert!(parsed.is_numeric_literal());
        assert_eq!(parsed.to_string(), "Score>=100");
    }

    #[test]
    fn test_parse_errors() {
        let schema = schema();
        assert_eq!(
            FilterSpec::parse("Bogus=1", &schema),
            Err(FilterError::UnknownKey("Bogus".to_string()))
        );
        assert_eq!(
            FilterSpec::parse("Score 100", &schema),
            Err(FilterError::MissingOperator("Score 100".to_string()))
        );
        assert_eq!(FilterSpec::parse("   ", &schema), Err(FilterError::EmptyExpression));
    }

    #[test]
    fn test_derived_flags() {
        let contains = spec("Gene=*foo*");
        assert!(contains.is_contains_match());
        assert!(contains.is_prefix_match());
        assert!(!contains.is_numeric_literal());

        let prefix = spec("Gene=foo*");
        assert!(prefix.is_prefix_match());
        assert!(!prefix.is_contains_match());
    }

    #[test]
    fn test_width_filter() {
        let narrow = GenomicInterval::new("chr1", 0, 8_000);
        let wide = GenomicInterval::new("chr1", 0, 12_000);
        let f = spec("Width<=10kb");
        assert!(f.matches(&narrow));
        assert!(!f.matches(&wide));
    }

    #[test]
    fn test_malformed_width_fails_closed() {
        let f = spec("Width<=10parsecs");
        assert!(matches!(f.evaluate(&row()), Err(EvalError::Width(_))));
        assert!(!f.matches(&row()));
    }

    #[test]
    fn test_flags() {
        let r = row().with_annotation("Flags", "6");
        assert!(spec("Flags&&2").matches(&r));
        assert!(spec("Flags&&4").matches(&r));
        assert!(!spec("Flags&&1").matches(&r));
        assert!(spec("Flags^^1").matches(&r));
        assert!(!spec("Flags^^6").matches(&r));
    }

    #[test]
    fn test_flag_on_unparseable_value_fails_closed() {
        let r = row().with_annotation("Gene", "abc");
        let f = spec("Gene&&1");
        assert!(matches!(f.evaluate(&r), Err(EvalError::FlagOperand { .. })));
        assert!(!f.matches(&r));
    }

    #[test]
    fn test_flag_on_text_column_coerces() {
        let r = row().with_annotation("Gene", "3");
        assert!(spec("Gene&&1").matches(&r));
    }

    #[test]
    fn test_flag_on_float_passes() {
        let r = row().with_annotation("Depth", "2.5");
        assert!(spec("Depth&&1").matches(&r));
        assert!(spec("Depth^^1").matches(&r));
    }

    #[test]
    fn test_int_relational() {
        let r = row();
        assert!(spec("Start>=1000").matches(&r));
        assert!(!spec("Start>1000").matches(&r));
        assert!(spec("End<9001").matches(&r));
        assert!(spec("End!=1").matches(&r));
        assert!(spec("Start<1000.5").matches(&r));
    }

    #[test]
    fn test_int_against_text_literal_fails_closed() {
        let f = spec("Start>abc");
        assert!(matches!(
            f.evaluate(&row()),
            Err(EvalError::NonNumericLiteral { .. })
        ));
    }

    #[test]
    fn test_score_coerced_to_int_only_for_numeric_literal() {
        let r = row().with_score("6");
        assert!(!spec("Score&&1").matches(&r));
        assert!(spec("Score^^1").matches(&r));
        assert!(spec("Score&&6").matches(&r));
        assert!(spec("Score>5").matches(&r));
        // Numeric comparison, not lexicographic ("6" > "10" as text)
        assert!(spec("Score<10").matches(&r));

        let r = row().with_score("150");
        assert!(spec("Score!=abc").matches(&r));
        assert!(!spec("Score=abc").matches(&r));
        assert!(spec("Score=15*").matches(&r));
    }

    #[test]
    fn test_decimal_score_compares_as_text() {
        let r = row().with_score("150.5");
        assert!(spec("Score=150.5").matches(&r));
        assert!(!spec("Score!=150.5").matches(&r));
        // Integer coercion fails, so "150.5" vs "100" is a string comparison
        assert!(spec("Score>100").matches(&r));
        assert!(!spec("Score<100").matches(&r));
        assert!(matches!(
            spec("Score&&1").evaluate(&r),
            Err(EvalError::FlagOperand { .. })
        ));
    }

    #[test]
    fn test_whole_number_in_float_column_is_int() {
        let r = row().with_annotation("Depth", "6");
        assert!(!spec("Depth&&1").matches(&r));
        assert!(spec("Depth^^1").matches(&r));
        assert!(spec("Depth>5.5").matches(&r));
    }

    #[test]
    fn test_text_coerced_when_literal_numeric() {
        let r = row().with_annotation("Gene", "12");
        assert!(spec("Gene>9").matches(&r));
        // Lexicographic "12" < "9" would fail without coercion
        assert!(!spec("Gene<9").matches(&r));
    }

    #[test]
    fn test_text_matching() {
        let r = row().with_annotation("Gene", "xfooy");
        assert!(spec("Gene=*foo*").matches(&r));
        assert!(!spec("Gene!=*foo*").matches(&r));
        assert!(!spec("Gene=foo*").matches(&r));
        assert!(spec("Gene=xfo*").matches(&r));
        assert!(spec("Gene=xfooy").matches(&r));
        assert!(!spec("Gene=xfoo").matches(&r));
        assert!(spec("Gene>abc").matches(&r));
        assert!(spec("Gene=*").matches(&r));
    }

    #[test]
    fn test_missing_value_fails_closed() {
        let f = spec("Name=peak");
        assert!(matches!(f.evaluate(&row()), Err(EvalError::MissingValue(_))));
        assert!(!f.matches(&row()));
        assert!(f.matches(&row().with_name("peak")));
    }
}
