//! Attribute schema: which keys a filter may reference and where their
//! values come from.
//!
//! Every schema starts with the standard interval columns
//! (`Chr, Start, End, Name, Score, Strand, Color, Width`); an editing layer
//! appends its own annotation columns after them.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::config;
use crate::filter::value::Value;
use crate::interval::GenomicInterval;

/// Declared value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

/// Where a column's value is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnSource {
    Chrom,
    Start,
    End,
    Name,
    Score,
    Strand,
    Color,
    /// Derived `|end - start|`, never stored.
    Width,
    /// Custom field in [`GenomicInterval::annotations`].
    Annotation(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub kind: ColumnKind,
    pub source: ColumnSource,
}

impl Column {
    /// True for the derived width column.
    #[inline]
    pub fn is_width(&self) -> bool {
        self.source == ColumnSource::Width
    }

    /// Raw value of this column for `row`, typed by the declared kind.
    /// `Score` is declared [`ColumnKind::Text`] and is only converted when a
    /// filter with a numeric literal evaluates it.
    ///
    /// Stored text that does not parse as the declared kind is returned as
    /// [`Value::Text`]. Missing optional fields yield `None`.
    pub fn value_of<'r>(&self, row: &'r GenomicInterval) -> Option<Value<'r>> {
        let text: Cow<'r, str> = match &self.source {
            ColumnSource::Chrom => Cow::Borrowed(config::chrom_key(&row.chrom)),
            ColumnSource::Start => return Some(Value::Int(row.start as i64)),
            ColumnSource::End => return Some(Value::Int(row.end as i64)),
            ColumnSource::Width => return Some(Value::Int(row.start.abs_diff(row.end) as i64)),
            ColumnSource::Name => Cow::Borrowed(row.name.as_deref()?),
            ColumnSource::Score => Cow::Borrowed(row.score.as_deref()?),
            ColumnSource::Strand => Cow::Borrowed(row.strand?.as_str()),
            ColumnSource::Color => Cow::Borrowed(row.color.as_deref()?),
            ColumnSource::Annotation(key) => Cow::Borrowed(row.annotation(key)?),
        };
        Some(Value::typed(text, self.kind))
    }
}

/// Ordered set of recognized attribute keys with key -> column lookup.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    /// Lowercased key -> column index
    lookup: FxHashMap<String, usize>,
}

impl Schema {
    /// Key of the derived width column.
    pub const WIDTH: &'static str = "Width";

    /// Schema with the standard interval columns only.
    pub fn standard() -> Self {
        let mut schema = Self {
            columns: Vec::new(),
            lookup: FxHashMap::default(),
        };
        let standard = [
            ("Chr", ColumnKind::Text, ColumnSource::Chrom),
            ("Start", ColumnKind::Int, ColumnSource::Start),
            ("End", ColumnKind::Int, ColumnSource::End),
            ("Name", ColumnKind::Text, ColumnSource::Name),
            ("Score", ColumnKind::Text, ColumnSource::Score),
            ("Strand", ColumnKind::Text, ColumnSource::Strand),
            ("Color", ColumnKind::Text, ColumnSource::Color),
            (Self::WIDTH, ColumnKind::Int, ColumnSource::Width),
        ];
        for (key, kind, source) in standard {
            schema.push(Column {
                key: key.to_string(),
                kind,
                source,
            });
        }
        schema
    }

    /// Append a custom annotation column. A key that already exists is
    /// redefined in place.
    pub fn with_annotation(mut self, key: impl Into<String>, kind: ColumnKind) -> Self {
        let key = key.into();
        self.push(Column {
            source: ColumnSource::Annotation(key.clone()),
            key,
            kind,
        });
        self
    }

    fn push(&mut self, column: Column) {
        let lowered = column.key.to_ascii_lowercase();
        match self.lookup.get(&lowered) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.lookup.insert(lowered, self.columns.len());
                self.columns.push(column);
            }
        }
    }

    /// Column index of `key`, ASCII case-insensitive.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.lookup.get(&key.to_ascii_lowercase()).copied()
    }

    /// Column for `key`, ASCII case-insensitive.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.column_index(key).map(|idx| &self.columns[idx])
    }

    /// Recognized keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Strand;

    #[test]
    fn test_standard_keys_in_order() {
        let schema = Schema::standard();
        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(
            keys,
            vec!["Chr", "Start", "End", "Name", "Score", "Strand", "Color", "Width"]
        );
        assert_eq!(schema.column_index("width"), Some(7));
    }

    #[test]
    fn test_annotation_columns() {
        let schema = Schema::standard()
            .with_annotation("Flags", ColumnKind::Int)
            .with_annotation("Gene", ColumnKind::Text);
        assert_eq!(schema.len(), 10);
        assert_eq!(schema.column_index("Flags"), Some(8));
        assert_eq!(schema.column_index("GENE"), Some(9));
        assert!(schema.column("Missing").is_none());

        let redefined = schema.with_annotation("flags", ColumnKind::Text);
        assert_eq!(redefined.len(), 10);
        assert_eq!(redefined.column("Flags").map(|c| c.kind), Some(ColumnKind::Text));
    }

    #[test]
    fn test_value_of_standard_columns() {
        let schema = Schema::standard();
        let row = GenomicInterval::new("chr1", 100, 8100)
            .with_score("12.5")
            .with_strand(Strand::Minus);

        let value = |key: &str| schema.column(key).and_then(|c| c.value_of(&row));
        assert_eq!(value("Start"), Some(Value::Int(100)));
        assert_eq!(value("Width"), Some(Value::Int(8000)));
        // Score stays text until a filter coerces it
        assert_eq!(value("Score"), Some(Value::Text("12.5".into())));
        assert_eq!(value("Strand"), Some(Value::Text("-".into())));
        assert_eq!(value("Name"), None);
    }

    #[test]
    fn test_value_of_falls_back_to_text() {
        let schema = Schema::standard().with_annotation("Flags", ColumnKind::Int);
        let row = GenomicInterval::new("chr1", 0, 1).with_annotation("Flags", "n/a");
        let column = schema.column("Flags").unwrap();
        assert_eq!(column.value_of(&row), Some(Value::Text("n/a".into())));
    }
}
