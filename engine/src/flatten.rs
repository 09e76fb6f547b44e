//! FILENAME: engine/src/flatten.rs
//! PURPOSE: The recursive hierarchical-to-tabular projection.
//! CONTEXT: Walks a homogeneous slice of row values depth-first and
//! left-to-right, emitting one `LeafColumn` per reachable scalar leaf.
//! Recursion is driven by the declared `FieldKind`, never by sampling the
//! rows for a representative element, so a column's shape cannot change
//! with the data. The column index threads sequentially through every
//! call; that threading is the only ordering mechanism.

use crate::eligibility::eligible_columns;
use crate::scalar::Scalar;
use crate::schema::{FieldKind, MetadataProvider};
use crate::title::{auto_title, compose_path};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One fully flattened output column: a title, an optional format tag and
/// one value slot per input row. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafColumn {
    pub title: String,
    pub format_tag: Option<String>,
    pub values: Vec<Option<Scalar>>,
}

/// Flattens row slices into leaf columns using schemas from a
/// [`MetadataProvider`]. Holds no mutable state; calls are independent.
pub struct FlattenEngine<'a> {
    provider: &'a dyn MetadataProvider,
    delimiter: String,
}

impl<'a> FlattenEngine<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, delimiter: impl Into<String>) -> Self {
        FlattenEngine {
            provider,
            delimiter: delimiter.into(),
        }
    }

    /// Flattens `rows` of the declared `kind` under `title_path`, starting
    /// at `start_col`. Returns the next free column index and the emitted
    /// columns, left to right.
    ///
    /// A slice in which every row is absent emits no columns at all.
    pub fn flatten(
        &self,
        rows: &[Value],
        kind: &FieldKind,
        title_path: &str,
        start_col: usize,
        format_tag: Option<&str>,
    ) -> (usize, Vec<LeafColumn>) {
        let mut columns = Vec::new();
        let next_col = self.flatten_into(rows, kind, title_path, start_col, format_tag, &mut columns);
        (next_col, columns)
    }

    fn flatten_into(
        &self,
        rows: &[Value],
        kind: &FieldKind,
        title_path: &str,
        col: usize,
        format_tag: Option<&str>,
        out: &mut Vec<LeafColumn>,
    ) -> usize {
        match kind {
            FieldKind::Scalar(_) => self.flatten_scalar(rows, title_path, col, format_tag, out),
            FieldKind::Seq(element) => {
                self.flatten_seq(rows, element, title_path, col, format_tag, out)
            }
            FieldKind::Record(type_name) => {
                self.flatten_record(rows, type_name, title_path, col, out)
            }
        }
    }

    /// Scalar case: exactly one column, titled with the path built so far.
    fn flatten_scalar(
        &self,
        rows: &[Value],
        title_path: &str,
        col: usize,
        format_tag: Option<&str>,
        out: &mut Vec<LeafColumn>,
    ) -> usize {
        let values: Vec<Option<Scalar>> = rows
            .iter()
            .map(|value| match value {
                Value::Scalar(scalar) => Some(scalar.clone()),
                Value::Absent => None,
                _ => {
                    log::debug!(
                        "non-scalar value under scalar column '{}', treating as absent",
                        title_path
                    );
                    None
                }
            })
            .collect();

        // An all-absent slice contributes nothing to the grid.
        if values.iter().all(Option::is_none) {
            return col;
        }

        out.push(LeafColumn {
            title: title_path.to_string(),
            format_tag: format_tag.map(str::to_string),
            values,
        });
        col + 1
    }

    /// Sequence case: one column group per index position up to the
    /// longest sequence observed, so the layout is fixed-width rather than
    /// ragged. Absent rows count as zero-length.
    fn flatten_seq(
        &self,
        rows: &[Value],
        element: &FieldKind,
        title_path: &str,
        mut col: usize,
        format_tag: Option<&str>,
        out: &mut Vec<LeafColumn>,
    ) -> usize {
        let max_len = rows
            .iter()
            .map(|value| match value {
                Value::Seq(items) => items.len(),
                _ => 0,
            })
            .max()
            .unwrap_or(0);
        log::debug!("'{}' max sequence length is {}", title_path, max_len);

        for index in 0..max_len {
            let child_rows: Vec<Value> = rows
                .iter()
                .map(|value| match value {
                    Value::Seq(items) => items.get(index).cloned().unwrap_or(Value::Absent),
                    _ => Value::Absent,
                })
                .collect();
            let child_title = compose_path(title_path, &self.delimiter, &index.to_string());
            col = self.flatten_into(&child_rows, element, &child_title, col, format_tag, out);
        }
        col
    }

    /// Nested-record case: one recursion per eligible field, extracting the
    /// field from every row. Rows that are absent, or not records at all,
    /// contribute absent field values.
    fn flatten_record(
        &self,
        rows: &[Value],
        type_name: &str,
        title_path: &str,
        mut col: usize,
        out: &mut Vec<LeafColumn>,
    ) -> usize {
        let Some(schema) = self.provider.describe(type_name) else {
            log::warn!(
                "no schema registered for record type '{}', emitting no columns",
                type_name
            );
            return col;
        };

        for descriptor in eligible_columns(schema) {
            let segment = descriptor
                .display_name
                .clone()
                .unwrap_or_else(|| auto_title(&descriptor.identifier, &self.delimiter));
            let child_title = compose_path(title_path, &self.delimiter, &segment);
            let child_rows: Vec<Value> = rows
                .iter()
                .map(|value| match value {
                    Value::Record(record) => record
                        .get(&descriptor.identifier)
                        .cloned()
                        .unwrap_or(Value::Absent),
                    _ => Value::Absent,
                })
                .collect();
            col = self.flatten_into(
                &child_rows,
                &descriptor.kind,
                &child_title,
                col,
                descriptor.format_tag.as_deref(),
                out,
            );
        }
        col
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;
    use crate::schema::{FieldDescriptor, RecordSchema, SchemaRegistry};
    use crate::value::RecordValue;

    fn author_book_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(
            RecordSchema::new("Author")
                .field(FieldDescriptor::scalar("name", ScalarKind::Text))
                .field(FieldDescriptor::seq(
                    "genres",
                    FieldKind::Scalar(ScalarKind::Text),
                )),
        );
        registry.register(
            RecordSchema::new("Book")
                .field(FieldDescriptor::scalar("title", ScalarKind::Text))
                .field(FieldDescriptor::nested("author", "Author"))
                .field(FieldDescriptor::scalar("price", ScalarKind::Float).with_format("currency")),
        );
        registry
    }

    fn book(title: &str, author: &str, genres: Vec<&str>, price: f64) -> Value {
        Value::Record(
            RecordValue::new("Book")
                .set("title", title)
                .set(
                    "author",
                    RecordValue::new("Author")
                        .set("name", author)
                        .set("genres", genres),
                )
                .set("price", price),
        )
    }

    fn titles(columns: &[LeafColumn]) -> Vec<String> {
        columns.iter().map(|column| column.title.clone()).collect()
    }

    #[test]
    fn test_scenario_header_and_padding() {
        let registry = author_book_registry();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![
            book("The Hobbit", "J.R.R. Tolkien", vec!["Fantasy", "Adventure"], 14.99),
            book(
                "Harry Potter and the Sorcerer's Stone",
                "J.K. Rowling",
                vec!["Fantasy", "Drama", "Young Adult"],
                19.99,
            ),
        ];

        let (next_col, columns) =
            engine.flatten(&rows, &FieldKind::Record("Book".to_string()), "", 0, None);

        assert_eq!(next_col, 6);
        assert_eq!(
            titles(&columns),
            vec![
                "Title",
                "Author Name",
                "Author Genres 0",
                "Author Genres 1",
                "Author Genres 2",
                "Price",
            ]
        );
        // Row 0 only has two genres; its third slot is absent.
        let genres_2 = &columns[4];
        assert_eq!(genres_2.values[0], None);
        assert_eq!(
            genres_2.values[1],
            Some(Scalar::Text("Young Adult".to_string()))
        );
        // Every column has one slot per input row.
        assert!(columns.iter().all(|column| column.values.len() == 2));
    }

    #[test]
    fn test_format_tag_attached_to_leaf() {
        let registry = author_book_registry();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![book("A", "B", vec![], 9.5)];

        let (_, columns) =
            engine.flatten(&rows, &FieldKind::Record("Book".to_string()), "", 0, None);

        let price = columns.iter().find(|c| c.title == "Price").unwrap();
        assert_eq!(price.format_tag.as_deref(), Some("currency"));
        let title = columns.iter().find(|c| c.title == "Title").unwrap();
        assert_eq!(title.format_tag, None);
    }

    #[test]
    fn test_format_tag_carries_through_sequence_indices() {
        let mut registry = SchemaRegistry::new();
        registry.register(RecordSchema::new("Invoice").field(
            FieldDescriptor::seq("amounts", FieldKind::Scalar(ScalarKind::Float))
                .with_format("#,##0.00"),
        ));
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![Value::Record(
            RecordValue::new("Invoice").set("amounts", vec![1.5, 2.5]),
        )];

        let (_, columns) =
            engine.flatten(&rows, &FieldKind::Record("Invoice".to_string()), "", 0, None);

        assert_eq!(columns.len(), 2);
        assert!(columns
            .iter()
            .all(|column| column.format_tag.as_deref() == Some("#,##0.00")));
    }

    #[test]
    fn test_all_absent_slice_emits_no_columns() {
        let registry = author_book_registry();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![Value::Absent, Value::Absent];

        let (next_col, columns) =
            engine.flatten(&rows, &FieldKind::Scalar(ScalarKind::Text), "X", 3, None);

        assert_eq!(next_col, 3);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_absent_nested_record_in_every_row_emits_no_columns() {
        let registry = author_book_registry();
        let engine = FlattenEngine::new(&registry, " ");
        // Authors missing in both rows: the whole Author sub-path vanishes.
        let rows = vec![
            Value::Record(RecordValue::new("Book").set("title", "A").set("price", 1.0)),
            Value::Record(RecordValue::new("Book").set("title", "B").set("price", 2.0)),
        ];

        let (next_col, columns) =
            engine.flatten(&rows, &FieldKind::Record("Book".to_string()), "", 0, None);

        assert_eq!(next_col, 2);
        assert_eq!(titles(&columns), vec!["Title", "Price"]);
    }

    #[test]
    fn test_sequence_padding_to_max_observed_length() {
        let registry = SchemaRegistry::new();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![
            Value::Seq(vec!["a".into(), "b".into()]),
            Value::Seq(vec![]),
            Value::Seq(vec![
                "v".into(),
                "w".into(),
                "x".into(),
                "y".into(),
                "z".into(),
            ]),
        ];

        let (next_col, columns) = engine.flatten(
            &rows,
            &FieldKind::seq_of(FieldKind::Scalar(ScalarKind::Text)),
            "Tags",
            0,
            None,
        );

        assert_eq!(next_col, 5);
        assert_eq!(
            titles(&columns),
            vec!["Tags 0", "Tags 1", "Tags 2", "Tags 3", "Tags 4"]
        );
        // Rows 0 and 1 are absent past their own lengths.
        assert_eq!(columns[2].values[0], None);
        assert_eq!(columns[0].values[1], None);
        assert_eq!(columns[4].values[2], Some(Scalar::Text("z".to_string())));
    }

    #[test]
    fn test_absent_rows_count_as_zero_length_sequences() {
        let registry = SchemaRegistry::new();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![Value::Absent, Value::Seq(vec![1i64.into()])];

        let (next_col, columns) = engine.flatten(
            &rows,
            &FieldKind::seq_of(FieldKind::Scalar(ScalarKind::Int)),
            "N",
            0,
            None,
        );

        assert_eq!(next_col, 1);
        assert_eq!(columns[0].values, vec![None, Some(Scalar::Int(1))]);
    }

    #[test]
    fn test_column_order_follows_explicit_order() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            RecordSchema::new("T")
                .field(FieldDescriptor::scalar("a", ScalarKind::Text))
                .field(FieldDescriptor::scalar("b", ScalarKind::Text))
                .field(FieldDescriptor::scalar("c", ScalarKind::Text))
                .order(["b", "a"]),
        );
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![Value::Record(
            RecordValue::new("T").set("a", "1").set("b", "2").set("c", "3"),
        )];

        let (_, columns) = engine.flatten(&rows, &FieldKind::Record("T".to_string()), "", 0, None);

        assert_eq!(titles(&columns), vec!["B", "A"]);
    }

    #[test]
    fn test_unknown_record_type_emits_no_columns() {
        let registry = SchemaRegistry::new();
        let engine = FlattenEngine::new(&registry, " ");
        let rows = vec![Value::Record(RecordValue::new("Ghost").set("x", 1i64))];

        let (next_col, columns) =
            engine.flatten(&rows, &FieldKind::Record("Ghost".to_string()), "", 7, None);

        assert_eq!(next_col, 7);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_shape_mismatch_is_treated_as_absent() {
        let registry = SchemaRegistry::new();
        let engine = FlattenEngine::new(&registry, " ");
        // Declared scalar, but one row holds a sequence.
        let rows = vec![Value::Seq(vec!["oops".into()]), "fine".into()];

        let (_, columns) =
            engine.flatten(&rows, &FieldKind::Scalar(ScalarKind::Text), "V", 0, None);

        assert_eq!(columns.len(), 1);
        assert_eq!(
            columns[0].values,
            vec![None, Some(Scalar::Text("fine".to_string()))]
        );
    }

    #[test]
    fn test_explicit_display_name_used_verbatim() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            RecordSchema::new("Book").field(
                FieldDescriptor::scalar("publicationDate", ScalarKind::Date)
                    .with_name("Date of Publication"),
            ),
        );
        let engine = FlattenEngine::new(&registry, " ");
        let date = chrono::NaiveDate::from_ymd_opt(1937, 9, 21).unwrap();
        let rows = vec![Value::Record(
            RecordValue::new("Book").set("publicationDate", date),
        )];

        let (_, columns) =
            engine.flatten(&rows, &FieldKind::Record("Book".to_string()), "", 0, None);

        assert_eq!(titles(&columns), vec!["Date of Publication"]);
    }

    #[test]
    fn test_nested_title_uses_delimiter_between_segments() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            RecordSchema::new("Author")
                .field(FieldDescriptor::scalar("name", ScalarKind::Text)),
        );
        registry.register(
            RecordSchema::new("Book").field(FieldDescriptor::nested("author", "Author")),
        );
        let engine = FlattenEngine::new(&registry, "_");
        let rows = vec![Value::Record(
            RecordValue::new("Book").set("author", RecordValue::new("Author").set("name", "X")),
        )];

        let (_, columns) =
            engine.flatten(&rows, &FieldKind::Record("Book".to_string()), "", 0, None);

        assert_eq!(titles(&columns), vec!["Author_Name"]);
    }
}
