//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the record-flattening engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! The engine projects a typed object graph (records, nested records and
//! variable-length sequences) onto flat sheet grids: one header row plus
//! one data row per input element. It performs no I/O; the persistence
//! crate turns the grids into an actual workbook file.

pub mod eligibility;
pub mod error;
pub mod flatten;
pub mod mapper;
pub mod scalar;
pub mod schema;
pub mod title;
pub mod value;

// Re-export commonly used types at the crate root
pub use eligibility::{eligible_columns, eligible_sheets};
pub use error::MapError;
pub use flatten::{FlattenEngine, LeafColumn};
pub use mapper::{map_to_grid, SheetGrid};
pub use scalar::{RichRun, RichText, Scalar, ScalarKind};
pub use schema::{
    FieldDescriptor, FieldKind, MetadataProvider, RecordSchema, SchemaRegistry, DEFAULT_DELIMITER,
};
pub use title::{auto_title, compose_path, safe_sheet_name};
pub use value::{RecordValue, Value};
