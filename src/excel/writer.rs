//! Workbook serialization
//!
//! Renders the logical workbook model through `rust_xlsxwriter` in one
//! pass: cell values and formats, column widths, row heights, merges, the
//! header autofilter and declared table regions, then saves the file.
//! Nothing above this module touches the backend types.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Table, TableColumn, TableStyle,
    Workbook as XlsxWorkbook, Worksheet,
};

use super::sheet::{Cell, CellValue, Sheet, TableRegion, Workbook};
use super::styles::{BorderLine, Horizontal, Style, Vertical};

/// Serialize `workbook` to `path`.
pub fn save_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let mut xlsx = XlsxWorkbook::new();

    for (name, sheet) in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(name)?;
        render_sheet(worksheet, sheet)?;
    }

    xlsx.save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel file exported to: {}", path.display());
    Ok(())
}

/// Build an export file name: `<prefix>_<DD-MM-YYYY>.xlsx`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}_{:02}-{:02}-{}.xlsx",
        prefix,
        date.day(),
        date.month(),
        date.year()
    )
}

/// Export file name stamped with the local date.
pub fn export_filename_today(prefix: &str) -> String {
    export_filename(prefix, Local::now().date_naive())
}

fn render_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    for (row, cells) in sheet.iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row as u32, col as u16, cell)?;
        }
    }

    if let Some(widths) = &sheet.col_widths {
        for (col, width) in widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
    }
    if let Some(heights) = &sheet.row_heights {
        for (row, height) in heights.iter().enumerate() {
            worksheet.set_row_height(row as u32, *height)?;
        }
    }

    for merge in &sheet.merges {
        let anchor_row = merge.first_row as usize;
        let anchor_col = merge.first_col as usize;
        let text = sheet.text_at(anchor_row, anchor_col);
        let format = sheet
            .cell(anchor_row, anchor_col)
            .and_then(|cell| cell.style.as_ref())
            .map(to_format)
            .unwrap_or_else(Format::new);
        worksheet.merge_range(
            merge.first_row,
            merge.first_col,
            merge.last_row,
            merge.last_col,
            &text,
            &format,
        )?;
    }

    if let Some(filter) = sheet.autofilter {
        worksheet.autofilter(filter.first_row, filter.first_col, filter.last_row, filter.last_col)?;
    }

    for region in &sheet.tables {
        add_table_region(worksheet, sheet, region)?;
    }

    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    let format = cell.style.as_ref().map(to_format);
    match (&cell.value, format) {
        (CellValue::Empty, Some(format)) => {
            worksheet.write_blank(row, col, &format)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, &format)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellValue::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, &format)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

fn add_table_region(worksheet: &mut Worksheet, sheet: &Sheet, region: &TableRegion) -> Result<()> {
    let range = region.range;
    // The backend needs a header plus at least one data row.
    if range.n_rows() < 2 {
        log::debug!("skipping table region {}: no data rows", range.to_a1());
        return Ok(());
    }

    let mut columns = Vec::with_capacity(range.n_cols() as usize);
    for col in range.first_col..=range.last_col {
        let header = sheet.text_at(range.first_row as usize, col as usize);
        let column = if header.is_empty() {
            TableColumn::new()
        } else {
            TableColumn::new().set_header(header)
        };
        columns.push(column);
    }

    let table = Table::new()
        .set_style(table_style(&region.style_name))
        .set_header_row(region.header_row_count > 0)
        .set_banded_rows(region.banded_rows)
        .set_banded_columns(region.banded_columns)
        .set_columns(&columns);

    worksheet.add_table(
        range.first_row,
        range.first_col,
        range.last_row,
        range.last_col,
        &table,
    )?;
    Ok(())
}

fn table_style(name: &str) -> TableStyle {
    match name {
        "TableStyleMedium2" => TableStyle::Medium2,
        other => {
            log::debug!("unknown table style '{other}', using Medium2");
            TableStyle::Medium2
        }
    }
}

fn to_format(style: &Style) -> Format {
    let mut format = Format::new();

    if let Some(font) = &style.font {
        if font.bold == Some(true) {
            format = format.set_bold();
        }
        if font.italic == Some(true) {
            format = format.set_italic();
        }
        if let Some(size) = font.size {
            format = format.set_font_size(size);
        }
        if let Some(color) = font.color {
            format = format.set_font_color(Color::RGB(color));
        }
        if let Some(name) = &font.name {
            format = format.set_font_name(name);
        }
    }

    if let Some(fill) = style.fill {
        format = format.set_background_color(Color::RGB(fill.color));
    }

    if let Some(border) = &style.border {
        if let Some(side) = border.top {
            format = format
                .set_border_top(border_line(side.line))
                .set_border_top_color(Color::RGB(side.color));
        }
        if let Some(side) = border.bottom {
            format = format
                .set_border_bottom(border_line(side.line))
                .set_border_bottom_color(Color::RGB(side.color));
        }
        if let Some(side) = border.left {
            format = format
                .set_border_left(border_line(side.line))
                .set_border_left_color(Color::RGB(side.color));
        }
        if let Some(side) = border.right {
            format = format
                .set_border_right(border_line(side.line))
                .set_border_right_color(Color::RGB(side.color));
        }
    }

    if let Some(alignment) = &style.alignment {
        if let Some(horizontal) = alignment.horizontal {
            format = format.set_align(match horizontal {
                Horizontal::Left => FormatAlign::Left,
                Horizontal::Center => FormatAlign::Center,
                Horizontal::Right => FormatAlign::Right,
            });
        }
        if let Some(vertical) = alignment.vertical {
            format = format.set_align(match vertical {
                Vertical::Top => FormatAlign::Top,
                Vertical::Center => FormatAlign::VerticalCenter,
                Vertical::Bottom => FormatAlign::Bottom,
            });
        }
        if alignment.wrap == Some(true) {
            format = format.set_text_wrap();
        }
    }

    format
}

fn border_line(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::Thin => FormatBorder::Thin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(export_filename("Funcionarios", date), "Funcionarios_05-01-2024.xlsx");
    }

    #[test]
    fn test_export_filename_two_digit_fields() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        assert_eq!(export_filename("Checklist", date), "Checklist_28-11-2025.xlsx");
    }
}
