//! FILENAME: persistence/src/xlsx_writer.rs

use crate::{FormatCache, PersistenceError};
use engine::{Scalar, SheetGrid};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Writes the mapped sheet grids to an xlsx file at `path`.
pub fn save_xlsx(sheets: &[SheetGrid], path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = build_workbook(sheets)?;
    xlsx.save(path)?;
    Ok(())
}

/// Writes the mapped sheet grids to an in-memory xlsx buffer.
pub fn write_xlsx(sheets: &[SheetGrid]) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = build_workbook(sheets)?;
    Ok(xlsx.save_to_buffer()?)
}

fn build_workbook(sheets: &[SheetGrid]) -> Result<XlsxWorkbook, PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    // One cache per build: columns sharing a format tag share a Format.
    let mut formats = FormatCache::new();

    for sheet in sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        log::debug!(
            "writing sheet {} ({} columns, {} rows)",
            sheet.name,
            sheet.columns.len(),
            sheet.row_count
        );
        write_sheet(worksheet, sheet, &mut formats)?;
    }

    Ok(xlsx)
}

/// Header cells at row 0, data cells below. The format tag is applied as
/// a column-wide directive, not per cell.
fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetGrid,
    formats: &mut FormatCache,
) -> Result<(), PersistenceError> {
    for (col, column) in sheet.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, &column.title)?;

        if let Some(tag) = &column.format_tag {
            let format = formats.get_or_create(tag).clone();
            worksheet.set_column_format(col, &format)?;
        }

        for (row, value) in column.values.iter().enumerate() {
            if let Some(scalar) = value {
                write_scalar(worksheet, row as u32 + 1, col, scalar)?;
            }
        }
    }
    Ok(())
}

fn write_scalar(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    scalar: &Scalar,
) -> Result<(), PersistenceError> {
    match scalar {
        Scalar::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Scalar::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Scalar::Float(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Scalar::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Scalar::Rich(rich) => {
            write_rich(worksheet, row, col, rich)?;
        }
        Scalar::Timestamp(ts) => {
            let naive = ts.naive_utc();
            worksheet.write_datetime(row, col, &naive)?;
        }
        Scalar::Date(date) => {
            worksheet.write_datetime(row, col, date)?;
        }
        Scalar::DateTime(datetime) => {
            worksheet.write_datetime(row, col, datetime)?;
        }
        Scalar::Zoned(zoned) => {
            let naive = zoned.naive_local();
            worksheet.write_datetime(row, col, &naive)?;
        }
    }
    Ok(())
}

/// Rich strings need at least two segments in the underlying writer, so
/// zero-run values write nothing and one-run values fall back to a plain
/// formatted string.
fn write_rich(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    rich: &engine::RichText,
) -> Result<(), PersistenceError> {
    let runs: Vec<&engine::RichRun> = rich
        .runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .collect();
    match runs.len() {
        0 => {}
        1 => {
            worksheet.write_string_with_format(row, col, &runs[0].text, &run_format(runs[0]))?;
        }
        _ => {
            let formats: Vec<Format> = runs.iter().map(|run| run_format(run)).collect();
            let segments: Vec<(&Format, &str)> = formats
                .iter()
                .zip(runs.iter())
                .map(|(format, run)| (format, run.text.as_str()))
                .collect();
            worksheet.write_rich_string(row, col, &segments)?;
        }
    }
    Ok(())
}

fn run_format(run: &engine::RichRun) -> Format {
    let mut format = Format::new();
    if run.bold {
        format = format.set_bold();
    }
    if run.italic {
        format = format.set_italic();
    }
    format
}
