//! Label/value ("informational") sheet formatting
//!
//! Two-column sheets describing a single entity: section titles, labels,
//! values and blank separators, classified by position and content. The
//! advanced mode adds title merges, row heights and a content-pattern
//! highlighting pass over the value column.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::metadata;
use super::sheet::{Cell, RowArray, Sheet, Workbook};
use super::sizing::{self, is_section_title};
use super::styles::{
    ACCENT_AVERAGE, ACCENT_DATE_TIME, ACCENT_MISSING, ACCENT_POSITIVE_NUMBER, LABEL, MAIN_TITLE,
    SECTION_TITLE, SEPARATOR, SIMPLE_LABEL, SIMPLE_VALUE, Style, VALUE,
};

/// Label and value column widths for informational sheets.
const INFO_COLUMN_WIDTHS: [f64; 2] = [32.0, 45.0];

/// Value-column tokens that mean "no data recorded".
const MISSING_TOKENS: [&str; 5] = ["Nunca", "Não informado", "Não identificado", "0", "0.0"];

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("valid integer pattern"));
static POSITIVE_INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9]\d*$").expect("valid positive integer pattern"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("valid decimal pattern"));
static DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("valid date prefix pattern"));
static DATE_ANYWHERE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("valid date pattern"));
static TIME_ANYWHERE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}:\d{2}").expect("valid time pattern"));

/// A section-title row has all-caps text in column 0 and nothing in
/// column 1.
fn is_title_row(sheet: &Sheet, row: usize) -> bool {
    let label = sheet.text_at(row, 0);
    is_section_title(&label) && sheet.text_at(row, 1).is_empty()
}

/// Apply the simple informational style: section titles, labels and values
/// classified by position. Cells outside those roles are left unstyled.
pub fn apply_info_style(sheet: &mut Sheet) {
    for row in 0..sheet.n_rows() {
        let title_row = is_title_row(sheet, row);
        for col in 0..sheet.n_cols() {
            let Some(cell) = sheet.cell_mut(row, col) else {
                continue;
            };
            let value = cell.value.as_text();

            if col == 0 && title_row {
                cell.style = Some(SECTION_TITLE.clone());
            } else if col == 0 && !value.is_empty() {
                cell.style = Some(SIMPLE_LABEL.clone());
            } else if col == 1 {
                cell.style = Some(SIMPLE_VALUE.clone());
            }
        }
    }
}

/// Apply the advanced informational style.
///
/// On top of the simple classification: title rows get the banner style and
/// a two-column merge, blank cells become separators, value cells get an
/// inline type accent, row heights are recomputed, and a final
/// content-pattern pass highlights the value column.
pub fn apply_info_style_advanced(sheet: &mut Sheet) {
    for row in 0..sheet.n_rows() {
        let title_row = is_title_row(sheet, row);
        if title_row {
            // Titles span both columns.
            metadata::merge_range(sheet, row as u32, 0, row as u32, 1);
        }
        for col in 0..sheet.n_cols() {
            let Some(cell) = sheet.cell_mut(row, col) else {
                continue;
            };
            let value = cell.value.as_text();

            if col == 0 && title_row {
                cell.style = Some(MAIN_TITLE.clone());
            } else if value.is_empty() || value == " " {
                cell.style = Some(SEPARATOR.clone());
            } else if col == 0 {
                cell.style = Some(LABEL.clone());
            } else if col == 1 {
                cell.style = Some(VALUE.clone());
                apply_value_type_style(cell, &value);
            }
        }
    }

    sheet.row_heights = Some(sizing::compute_row_heights(sheet));

    apply_conditional_highlighting(sheet);
}

/// Inline type accent for a value cell: integers get the positive-number
/// accent, `DD/MM/YYYY`-prefixed text the date accent.
fn apply_value_type_style(cell: &mut Cell, value: &str) {
    let accent = if INTEGER_RE.is_match(value) {
        &ACCENT_POSITIVE_NUMBER
    } else if DATE_PREFIX_RE.is_match(value) {
        &ACCENT_DATE_TIME
    } else {
        return;
    };
    merge_onto(cell, accent);
}

/// Content-pattern highlighting over column 1 of every row. First match
/// wins: missing-value tokens, then positive integers, then decimals, then
/// date/time substrings. The accent is merged onto whatever style the cell
/// already carries.
fn apply_conditional_highlighting(sheet: &mut Sheet) {
    for row in 0..sheet.n_rows() {
        let Some(cell) = sheet.cell_mut(row, 1) else {
            continue;
        };
        let value = cell.value.as_text();
        if value.is_empty() {
            continue;
        }

        if MISSING_TOKENS.contains(&value.as_str()) {
            merge_onto(cell, &ACCENT_MISSING);
        } else if POSITIVE_INTEGER_RE.is_match(&value) {
            merge_onto(cell, &ACCENT_POSITIVE_NUMBER);
        } else if DECIMAL_RE.is_match(&value) && value.parse::<f64>().unwrap_or(0.0) > 0.0 {
            merge_onto(cell, &ACCENT_AVERAGE);
        } else if DATE_ANYWHERE_RE.is_match(&value) || TIME_ANYWHERE_RE.is_match(&value) {
            merge_onto(cell, &ACCENT_DATE_TIME);
        }
    }
}

fn merge_onto(cell: &mut Cell, accent: &Style) {
    let base = cell.style.take().unwrap_or_default();
    cell.style = Some(base.merge(accent));
}

/// Append one informational sheet built from label/value rows.
///
/// Column widths are fixed (32, 45). An empty row-array logs a warning and
/// leaves the workbook unchanged.
pub fn add_info_sheet(
    rows: &RowArray,
    workbook: &mut Workbook,
    sheet_name: &str,
    advanced: bool,
) -> Result<()> {
    if rows.is_empty() {
        log::warn!("no informational rows to export for sheet: {sheet_name}");
        return Ok(());
    }

    let mut sheet = Sheet::from_rows(rows);
    sheet.col_widths = Some(INFO_COLUMN_WIDTHS.to_vec());

    if advanced {
        apply_info_style_advanced(&mut sheet);
    } else {
        apply_info_style(&mut sheet);
    }

    workbook.append_sheet(sheet_name, sheet)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::styles::colors;

    fn rows_of(rows: &[&[&str]]) -> RowArray {
        rows.iter()
            .map(|r| r.iter().map(|&v| v.into()).collect())
            .collect()
    }

    fn fill_of(sheet: &Sheet, row: usize, col: usize) -> Option<u32> {
        sheet
            .cell(row, col)
            .and_then(|c| c.style.as_ref())
            .and_then(|s| s.fill)
            .map(|f| f.color)
    }

    #[test]
    fn test_simple_classification() {
        let rows = rows_of(&[
            &["DADOS GERAIS", ""],
            &["Nome", "Maria"],
            &["Empresa", ""],
        ]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style(&mut sheet);

        assert_eq!(fill_of(&sheet, 0, 0), Some(colors::LIGHT_GRAY));
        assert_eq!(fill_of(&sheet, 1, 0), Some(colors::MEDIUM_GRAY));
        // Value cells get the simple value style, which has no fill.
        let value = sheet.cell(1, 1).unwrap().style.as_ref().unwrap();
        assert_eq!(value.font.as_ref().unwrap().size, Some(11.0));
        assert!(value.fill.is_none());
    }

    #[test]
    fn test_title_needs_empty_second_column() {
        let rows = rows_of(&[&["DADOS GERAIS", "x"]]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style(&mut sheet);

        // With a value beside it, the caps text is a plain label.
        assert_eq!(fill_of(&sheet, 0, 0), Some(colors::MEDIUM_GRAY));
    }

    #[test]
    fn test_advanced_title_banner_and_merge() {
        let rows = rows_of(&[&["DADOS GERAIS", ""], &["Nome", "Maria"]]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style_advanced(&mut sheet);

        assert_eq!(fill_of(&sheet, 0, 0), Some(colors::MEDIUM_BLUE));
        assert_eq!(sheet.merges.len(), 1);
        assert_eq!(sheet.merges[0].to_a1(), "A1:B1");
        assert_eq!(sheet.row_heights.as_ref().unwrap()[0], 24.0);
        assert_eq!(sheet.row_heights.as_ref().unwrap()[1], 18.0);
    }

    #[test]
    fn test_advanced_blank_cells_become_separators() {
        let rows = rows_of(&[&["Nome", "Maria"], &["", ""], &["Empresa", "ACME"]]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style_advanced(&mut sheet);

        assert_eq!(fill_of(&sheet, 1, 0), Some(colors::SEPARATOR_GRAY));
        assert_eq!(fill_of(&sheet, 1, 1), Some(colors::SEPARATOR_GRAY));
        assert_eq!(sheet.row_heights.as_ref().unwrap()[1], 12.0);
    }

    #[test]
    fn test_conditional_missing_token_beats_number_patterns() {
        // "0" is both a missing token and an integer; the token rule runs
        // first.
        let rows = rows_of(&[&["Total", "0"], &["Visitas", "12"]]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style_advanced(&mut sheet);

        assert_eq!(fill_of(&sheet, 0, 1), Some(colors::ALERT_RED_FILL));
        assert_eq!(fill_of(&sheet, 1, 1), Some(colors::ACCENT_GREEN_FILL));
    }

    #[test]
    fn test_conditional_decimal_and_datetime() {
        let rows = rows_of(&[
            &["Média", "3.5"],
            &["Última visita", "05/03/2024 14:30"],
            &["Horário", "às 09:15"],
            &["Nunca visto", "Nunca"],
        ]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style_advanced(&mut sheet);

        assert_eq!(fill_of(&sheet, 0, 1), Some(colors::ACCENT_BLUE_FILL));
        assert_eq!(fill_of(&sheet, 1, 1), Some(colors::ACCENT_PURPLE_FILL));
        assert_eq!(fill_of(&sheet, 2, 1), Some(colors::ACCENT_PURPLE_FILL));
        let missing = sheet.cell(3, 1).unwrap().style.as_ref().unwrap();
        assert_eq!(missing.fill.unwrap().color, colors::ALERT_RED_FILL);
        assert_eq!(missing.font.as_ref().unwrap().italic, Some(true));
    }

    #[test]
    fn test_accent_layers_over_value_style() {
        let rows = rows_of(&[&["Visitas", "12"]]);
        let mut sheet = Sheet::from_rows(&rows);
        apply_info_style_advanced(&mut sheet);

        let cell = sheet.cell(0, 1).unwrap().style.as_ref().unwrap();
        // Accent font color wins; the value style's border and alignment
        // survive the merge.
        assert_eq!(cell.font.as_ref().unwrap().color, Some(colors::ACCENT_GREEN));
        assert_eq!(cell.border, VALUE.border);
        assert_eq!(cell.alignment, VALUE.alignment);
    }

    #[test]
    fn test_add_info_sheet_empty_input_is_a_noop() {
        let mut workbook = Workbook::new();
        add_info_sheet(&Vec::new(), &mut workbook, "Ficha", true).unwrap();
        assert!(workbook.is_empty());
    }

    #[test]
    fn test_add_info_sheet_sets_fixed_widths() {
        let mut workbook = Workbook::new();
        add_info_sheet(&rows_of(&[&["Nome", "Maria"]]), &mut workbook, "Ficha", false).unwrap();
        let (_, sheet) = workbook.sheets().next().unwrap();
        assert_eq!(sheet.col_widths, Some(vec![32.0, 45.0]));
    }
}
