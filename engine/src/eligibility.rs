//! FILENAME: engine/src/eligibility.rs
//! PURPOSE: Decides which declared fields participate, and in what order.
//! CONTEXT: Because field shapes are declared as `FieldKind` tags, every
//! registered field is representable; eligibility therefore reduces to the
//! per-use-site shape restriction (sheets must be sequences) plus the
//! explicit-order intersection rules.

use crate::schema::{FieldDescriptor, FieldKind, RecordSchema};

/// The fields of `schema` that participate as columns, ordered.
///
/// With an explicit order, the result is the order's identifier list
/// intersected with the declared fields: unknown names are dropped (not
/// errors) and unmentioned fields are excluded. Without one, declaration
/// order is used, which is stable here by construction.
pub fn eligible_columns(schema: &RecordSchema) -> Vec<&FieldDescriptor> {
    apply_order(schema, schema.fields.iter().collect())
}

/// The root fields that produce sheets: only sequence-typed fields
/// qualify, then the same ordering rules apply.
pub fn eligible_sheets(schema: &RecordSchema) -> Vec<&FieldDescriptor> {
    let sequences = schema
        .fields
        .iter()
        .filter(|descriptor| matches!(descriptor.kind, FieldKind::Seq(_)))
        .collect();
    apply_order(schema, sequences)
}

fn apply_order<'a>(
    schema: &'a RecordSchema,
    eligible: Vec<&'a FieldDescriptor>,
) -> Vec<&'a FieldDescriptor> {
    match &schema.order {
        Some(order) => order
            .iter()
            .filter_map(|identifier| {
                let found = eligible
                    .iter()
                    .find(|descriptor| descriptor.identifier == *identifier)
                    .copied();
                if found.is_none() {
                    log::debug!(
                        "order entry '{}' does not name an eligible field of {}, ignoring",
                        identifier,
                        schema.name
                    );
                }
                found
            })
            .collect(),
        None => eligible,
    }
}
