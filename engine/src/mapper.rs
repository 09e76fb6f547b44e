//! FILENAME: engine/src/mapper.rs
//! PURPOSE: Top-level mapping from a root record to filled sheet grids.
//! CONTEXT: One sheet per eligible sequence field of the root type. Sheet
//! fields with no rows are skipped entirely: no sheet, no header. The
//! result is a pure in-memory artifact; writing it anywhere is the
//! persistence crate's job.

use crate::eligibility::eligible_sheets;
use crate::error::MapError;
use crate::flatten::{FlattenEngine, LeafColumn};
use crate::schema::{FieldKind, MetadataProvider, SchemaRegistry};
use crate::title::{auto_title, safe_sheet_name};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One sheet's worth of flattened output: a sanitized name, the emitted
/// columns in order, and the number of data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetGrid {
    pub name: String,
    pub columns: Vec<LeafColumn>,
    pub row_count: usize,
}

/// Maps `root` to a list of filled sheet grids using the schemas in
/// `registry`.
///
/// The root must be a record of a type registered as a mappable root;
/// anything else is a caller mistake and fails fast. Per sheet field:
/// the name comes from the declared override or from the auto title, then
/// is sanitized for the workbook format.
pub fn map_to_grid(root: &Value, registry: &SchemaRegistry) -> Result<Vec<SheetGrid>, MapError> {
    log::info!("map start");
    let started = Instant::now();

    let record = match root {
        Value::Absent => return Err(MapError::AbsentRoot),
        Value::Record(record) => record,
        _ => return Err(MapError::RootNotRecord),
    };
    if !registry.is_root(record.type_name()) {
        return Err(MapError::UnregisteredRoot(record.type_name().to_string()));
    }
    let Some(schema) = registry.describe(record.type_name()) else {
        return Err(MapError::UnregisteredRoot(record.type_name().to_string()));
    };

    let delimiter = registry.delimiter_of(record.type_name()).to_string();
    let engine = FlattenEngine::new(registry, delimiter.clone());

    let mut sheets = Vec::new();
    for field in eligible_sheets(schema) {
        let rows = match record.get(&field.identifier) {
            Some(Value::Seq(rows)) if !rows.is_empty() => rows,
            _ => {
                log::warn!(
                    "no rows found for sheet field '{}', skipping sheet creation",
                    field.identifier
                );
                continue;
            }
        };
        let FieldKind::Seq(element) = &field.kind else {
            // eligible_sheets only yields sequence fields
            continue;
        };

        let name = safe_sheet_name(
            &field
                .sheet_name
                .clone()
                .unwrap_or_else(|| auto_title(&field.identifier, &delimiter)),
        );
        log::info!("new sheet created with name {}", name);

        let (_, columns) = engine.flatten(rows, element, "", 0, field.format_tag.as_deref());
        sheets.push(SheetGrid {
            name,
            columns,
            row_count: rows.len(),
        });
    }

    log::info!(
        "map complete, time taken: {} ms",
        started.elapsed().as_millis()
    );
    Ok(sheets)
}
