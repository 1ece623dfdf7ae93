//! Structural worksheet metadata
//!
//! Declared table regions, header autofilters and cell merges. These are
//! side tables on the logical sheet; the writer turns them into the
//! corresponding workbook structures when the file is rendered.

use super::sheet::{CellRange, RowArray, Sheet, TableRegion};

/// The banded-blue visual style the exporters declare by default.
pub const DEFAULT_TABLE_STYLE: &str = "TableStyleMedium2";

/// Declare the full extent of `rows` as a styled Excel table: one header
/// row, banded rows on, banded columns off.
pub fn declare_table(sheet: &mut Sheet, rows: &RowArray, style_name: &str) {
    if rows.is_empty() || rows[0].is_empty() {
        return;
    }

    let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    sheet.tables.push(TableRegion {
        range: CellRange {
            first_row: 0,
            first_col: 0,
            last_row: rows.len() as u32 - 1,
            last_col: n_cols as u16 - 1,
        },
        header_row_count: 1,
        banded_rows: true,
        banded_columns: false,
        style_name: style_name.to_string(),
    });
}

/// Attach an autofilter over row 0. The filter spans the given range's
/// columns, or the sheet's full populated column range when none is given.
pub fn add_autofilter(sheet: &mut Sheet, range: Option<CellRange>) {
    let Some(range) = range.or_else(|| sheet.bounding_range()) else {
        return;
    };
    sheet.autofilter = Some(CellRange {
        first_row: 0,
        first_col: 0,
        last_row: 0,
        last_col: range.last_col,
    });
}

/// Append one merge descriptor. Overlapping merges are not checked; the
/// caller owns that invariant.
pub fn merge_range(sheet: &mut Sheet, first_row: u32, first_col: u16, last_row: u32, last_col: u16) {
    sheet.merges.push(CellRange { first_row, first_col, last_row, last_col });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::sheet::RowArray;

    fn rows_of(rows: &[&[&str]]) -> RowArray {
        rows.iter()
            .map(|r| r.iter().map(|&v| v.into()).collect())
            .collect()
    }

    #[test]
    fn test_declare_table_spans_data_extent() {
        let rows = rows_of(&[&["A", "B", "C"], &["1", "2", "3"], &["4", "5", "6"]]);
        let mut sheet = Sheet::from_rows(&rows);
        declare_table(&mut sheet, &rows, DEFAULT_TABLE_STYLE);

        assert_eq!(sheet.tables.len(), 1);
        let table = &sheet.tables[0];
        assert_eq!(table.range.to_a1(), "A1:C3");
        assert_eq!(table.header_row_count, 1);
        assert!(table.banded_rows);
        assert!(!table.banded_columns);
        assert_eq!(table.style_name, "TableStyleMedium2");
    }

    #[test]
    fn test_declare_table_ignores_empty_input() {
        let mut sheet = Sheet::default();
        declare_table(&mut sheet, &Vec::new(), DEFAULT_TABLE_STYLE);
        assert!(sheet.tables.is_empty());
    }

    #[test]
    fn test_autofilter_covers_header_row() {
        let rows = rows_of(&[&["A", "B", "C", "D"], &["1", "2", "3", "4"]]);
        let mut sheet = Sheet::from_rows(&rows);
        add_autofilter(&mut sheet, None);

        let filter = sheet.autofilter.unwrap();
        assert_eq!(filter.to_a1(), "A1:D1");
    }

    #[test]
    fn test_merges_accumulate_unchecked() {
        let mut sheet = Sheet::default();
        merge_range(&mut sheet, 0, 0, 0, 1);
        merge_range(&mut sheet, 0, 1, 0, 2); // overlap is the caller's problem
        assert_eq!(sheet.merges.len(), 2);
        assert_eq!(sheet.merges[0].to_a1(), "A1:B1");
    }
}
