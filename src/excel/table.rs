//! Striped table formatting
//!
//! Applies the banded-blue table look to a rectangular data sheet: header
//! band, alternating body fills, and status accents on conformity cells.
//! Also the table-shaped export entry points (HTML table and record lists).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use scraper::Html;

use super::metadata::{self, DEFAULT_TABLE_STYLE};
use super::sheet::{Cell, CellValue, RowArray, Sheet, Workbook};
use super::sizing;
use super::styles::{STATUS_NEGATIVE, STATUS_POSITIVE, TABLE_HEADER, TABLE_ROW_DARK, TABLE_ROW_LIGHT};
use super::writer;
use crate::extract;

/// Cell values that read as "conforming" and get the green accent.
const POSITIVE_TOKENS: [&str; 2] = ["OK", "Sim"];

/// Cell values that read as "non-conforming" and get the red accent.
const NEGATIVE_TOKENS: [&str; 3] = ["NC", "NC (Não Conforme)", "Não"];

/// Apply the striped table style to `sheet`.
///
/// Row 0 gets the header band; body rows alternate light/dark fills by row
/// index, with status accents merged on top so the accent wins over the
/// stripe. Column widths are computed only when not already set; the header
/// autofilter and the styled table region are always declared.
pub fn apply_table_style(sheet: &mut Sheet, rows: &RowArray) {
    let Some(range) = sheet.bounding_range() else {
        return;
    };

    for row in 0..sheet.n_rows() {
        for col in 0..sheet.n_cols() {
            let Some(cell) = sheet.cell_mut(row, col) else {
                continue;
            };

            if row == 0 {
                cell.style = Some(TABLE_HEADER.clone());
            } else {
                let stripe = if row % 2 == 0 { &TABLE_ROW_DARK } else { &TABLE_ROW_LIGHT };
                cell.style = Some((*stripe).clone());
                apply_status_style(cell);
            }
        }
    }

    if sheet.col_widths.is_none() {
        sheet.col_widths = Some(sizing::compute_column_widths(sheet));
    }
    metadata::add_autofilter(sheet, Some(range));
    metadata::declare_table(sheet, rows, DEFAULT_TABLE_STYLE);
}

/// Merge the status accent onto a body cell whose value is a conformity
/// token. Non-status cells are left on their stripe style.
fn apply_status_style(cell: &mut Cell) {
    let accent = match &cell.value {
        CellValue::Text(value) if POSITIVE_TOKENS.contains(&value.as_str()) => &STATUS_POSITIVE,
        CellValue::Text(value) if NEGATIVE_TOKENS.contains(&value.as_str()) => &STATUS_NEGATIVE,
        _ => return,
    };
    let base = cell.style.take().unwrap_or_default();
    cell.style = Some(base.merge(accent));
}

/// Export one HTML table as a styled single-sheet workbook.
///
/// Runs the whole pipeline (extraction, worksheet construction, styling,
/// serialization); any failure aborts before a file is produced.
pub fn export_table(
    document: &Html,
    table_selector: &str,
    sheet_name: &str,
    file_prefix: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let rows = extract::extract_table(document, table_selector)
        .with_context(|| format!("failed to extract table '{table_selector}'"))?;

    let mut sheet = Sheet::from_rows(&rows);
    apply_table_style(&mut sheet, &rows);

    let mut workbook = Workbook::new();
    workbook.append_sheet(sheet_name, sheet)?;

    let path = output_dir.join(writer::export_filename_today(file_prefix));
    writer::save_workbook(&workbook, &path)?;
    Ok(path)
}

/// Append one striped table sheet built from uniform key/value records.
///
/// Column order follows the first record's key order. An empty record list
/// logs a warning and leaves the workbook unchanged.
pub fn add_table_sheet_from_records(
    records: &[IndexMap<String, CellValue>],
    workbook: &mut Workbook,
    sheet_name: &str,
) -> Result<()> {
    if records.is_empty() {
        log::warn!("no records to export for sheet: {sheet_name}");
        return Ok(());
    }

    let headers: Vec<&String> = records[0].keys().collect();
    let mut rows: RowArray = Vec::with_capacity(records.len() + 1);
    rows.push(headers.iter().map(|h| CellValue::Text((*h).clone())).collect());
    for record in records {
        rows.push(
            headers
                .iter()
                .map(|h| record.get(*h).cloned().unwrap_or(CellValue::Empty))
                .collect(),
        );
    }

    let mut sheet = Sheet::from_rows(&rows);
    apply_table_style(&mut sheet, &rows);
    workbook.append_sheet(sheet_name, sheet)?;
    Ok(())
}
