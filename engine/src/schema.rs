//! FILENAME: engine/src/schema.rs
//! PURPOSE: Declarative per-type metadata replacing runtime reflection.
//! CONTEXT: Every mappable record type is described up front by a
//! `RecordSchema` registered in a `SchemaRegistry`. A field's shape is a
//! `FieldKind` tag decided at declaration time, so flattening never has to
//! guess a column's shape from whichever row happens to be non-absent.

use crate::scalar::ScalarKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default delimiter between title-path segments.
pub const DEFAULT_DELIMITER: &str = " ";

/// The declared shape of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A leaf of one of the supported scalar kinds.
    Scalar(ScalarKind),
    /// A variable-length sequence of elements of the inner kind.
    Seq(Box<FieldKind>),
    /// A nested record of the named type. Declaring this kind is what the
    /// original expressed with an explicit "nested" marker.
    Record(String),
}

impl FieldKind {
    /// Convenience constructor for a sequence kind.
    pub fn seq_of(element: FieldKind) -> Self {
        FieldKind::Seq(Box::new(element))
    }
}

/// Declared metadata for a single field of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The field identifier, usually camelCase, used for value lookup and
    /// automatic titling.
    pub identifier: String,
    pub kind: FieldKind,
    /// Verbatim title segment override. Not split or capitalized.
    pub display_name: Option<String>,
    /// Sheet name override; only meaningful on root sequence fields.
    pub sheet_name: Option<String>,
    /// Opaque number-format tag interpreted by the sink.
    pub format_tag: Option<String>,
}

impl FieldDescriptor {
    pub fn new(identifier: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            identifier: identifier.into(),
            kind,
            display_name: None,
            sheet_name: None,
            format_tag: None,
        }
    }

    pub fn scalar(identifier: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(identifier, FieldKind::Scalar(kind))
    }

    pub fn seq(identifier: impl Into<String>, element: FieldKind) -> Self {
        Self::new(identifier, FieldKind::seq_of(element))
    }

    pub fn nested(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(identifier, FieldKind::Record(type_name.into()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    pub fn with_format(mut self, tag: impl Into<String>) -> Self {
        self.format_tag = Some(tag.into());
        self
    }
}

/// Declared metadata for a record type: its fields in declaration order
/// plus an optional explicit ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Explicit field ordering. Acts as an inclusion filter as well: when
    /// present, fields it does not mention are excluded.
    pub order: Option<Vec<String>>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        RecordSchema {
            name: name.into(),
            fields: Vec::new(),
            order: None,
        }
    }

    /// Appends a field descriptor and returns `self` for chaining.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn order<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(identifiers.into_iter().map(Into::into).collect());
        self
    }

    pub fn descriptor(&self, identifier: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|descriptor| descriptor.identifier == identifier)
    }
}

/// Read-only metadata surface consumed by the flatten engine.
pub trait MetadataProvider {
    /// The schema for a record type, or None if the type is unknown.
    fn describe(&self, type_name: &str) -> Option<&RecordSchema>;

    /// The explicit field ordering for a type, if one was declared.
    fn order_of(&self, type_name: &str) -> Option<&[String]>;

    /// The title-path delimiter configured for a mappable root.
    fn delimiter_of(&self, root_type: &str) -> &str;
}

/// Holds every registered record schema plus the set of types marked as
/// mappable roots. The registry is built once and then read-only.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, RecordSchema>,
    /// Mappable-root marker; the value is the root's title-path delimiter.
    roots: HashMap<String, String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry {
            types: HashMap::new(),
            roots: HashMap::new(),
        }
    }

    /// Registers a record schema, replacing any previous schema of the
    /// same type name.
    pub fn register(&mut self, schema: RecordSchema) {
        self.types.insert(schema.name.clone(), schema);
    }

    /// Marks a type as a mappable root with the default delimiter.
    pub fn register_root(&mut self, type_name: impl Into<String>) {
        self.register_root_with_delimiter(type_name, DEFAULT_DELIMITER);
    }

    /// Marks a type as a mappable root with a custom title-path delimiter.
    pub fn register_root_with_delimiter(
        &mut self,
        type_name: impl Into<String>,
        delimiter: impl Into<String>,
    ) {
        self.roots.insert(type_name.into(), delimiter.into());
    }

    pub fn is_root(&self, type_name: &str) -> bool {
        self.roots.contains_key(type_name)
    }
}

impl MetadataProvider for SchemaRegistry {
    fn describe(&self, type_name: &str) -> Option<&RecordSchema> {
        self.types.get(type_name)
    }

    fn order_of(&self, type_name: &str) -> Option<&[String]> {
        self.types
            .get(type_name)
            .and_then(|schema| schema.order.as_deref())
    }

    fn delimiter_of(&self, root_type: &str) -> &str {
        self.roots
            .get(root_type)
            .map(String::as_str)
            .unwrap_or(DEFAULT_DELIMITER)
    }
}
