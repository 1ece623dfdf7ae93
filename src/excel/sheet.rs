//! Logical worksheet model
//!
//! The formatters operate on a plain in-memory grid of cells plus the
//! structural side tables (column widths, row heights, merges, autofilter,
//! declared table regions). The writer renders this model through the
//! spreadsheet backend in one final pass, so formatting never needs to know
//! how the file format represents any of it.

use anyhow::{Result, bail};

use super::styles::Style;

/// A scalar cell value as carried by a row-array.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Display text of the value. Whole numbers render without a decimal
    /// point, matching how they appear in the exported sheet.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => format!("{n}"),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One row of scalar values.
pub type Row = Vec<CellValue>;

/// The transport representation between extraction and worksheet
/// construction: ordered rows of ordered scalar values. Rows may be ragged
/// (hidden-field skipping shortens them); the worksheet's extent is the
/// bounding box over all rows.
pub type RowArray = Vec<Row>;

/// A positioned cell: raw value plus an optional style record.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: Option<Style>,
}

/// An inclusive rectangular cell range, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    pub fn n_rows(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    pub fn n_cols(&self) -> u16 {
        self.last_col - self.first_col + 1
    }

    /// Encode as an `A1:B2` reference.
    pub fn to_a1(&self) -> String {
        format!(
            "{}:{}",
            cell_ref(self.first_row, self.first_col),
            cell_ref(self.last_row, self.last_col)
        )
    }

    /// Decode an `A1:B2` reference (a bare `A1` is a one-cell range).
    pub fn parse(reference: &str) -> Result<CellRange> {
        let (start, end) = match reference.split_once(':') {
            Some((s, e)) => (s, e),
            None => (reference, reference),
        };
        let (first_row, first_col) = parse_cell_ref(start)?;
        let (last_row, last_col) = parse_cell_ref(end)?;
        Ok(CellRange { first_row, first_col, last_row, last_col })
    }
}

/// A declared Excel table region with banded-row styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    pub range: CellRange,
    pub header_row_count: u32,
    pub banded_rows: bool,
    pub banded_columns: bool,
    pub style_name: String,
}

/// One worksheet: a grid of cells plus structural metadata.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
    pub col_widths: Option<Vec<f64>>,
    pub row_heights: Option<Vec<f64>>,
    pub merges: Vec<CellRange>,
    pub autofilter: Option<CellRange>,
    pub tables: Vec<TableRegion>,
}

impl Sheet {
    /// Build a worksheet from a row-array. Values are copied in document
    /// order; no styles are assigned.
    pub fn from_rows(rows: &RowArray) -> Sheet {
        Sheet {
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|value| Cell { value: value.clone(), style: None })
                        .collect()
                })
                .collect(),
            ..Sheet::default()
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the bounding box over all rows.
    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The range covering every populated cell, or `None` for an empty
    /// sheet.
    pub fn bounding_range(&self) -> Option<CellRange> {
        let n_rows = self.n_rows();
        let n_cols = self.n_cols();
        if n_rows == 0 || n_cols == 0 {
            return None;
        }
        Some(CellRange {
            first_row: 0,
            first_col: 0,
            last_row: n_rows as u32 - 1,
            last_col: n_cols as u16 - 1,
        })
    }

    /// The cell at (row, col), if that position is populated. Ragged rows
    /// leave trailing positions absent rather than empty.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Display text at (row, col); empty string for absent cells.
    pub fn text_at(&self, row: usize, col: usize) -> String {
        self.cell(row, col)
            .map(|c| c.value.as_text())
            .unwrap_or_default()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// An ordered, named collection of worksheets.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<(String, Sheet)>,
}

impl Workbook {
    pub fn new() -> Workbook {
        Workbook::default()
    }

    /// Append a named worksheet. Sheet names are unique within a workbook.
    pub fn append_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.iter().any(|(n, _)| n == name) {
            bail!("duplicate sheet name: {name}");
        }
        self.sheets.push((name.to_string(), sheet));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// Encode a zero-based (row, col) position as an `A1`-style reference.
pub fn cell_ref(row: u32, col: u16) -> String {
    let mut letters = String::new();
    let mut remainder = col as u32;
    loop {
        letters.insert(0, (b'A' + (remainder % 26) as u8) as char);
        if remainder < 26 {
            break;
        }
        remainder = remainder / 26 - 1;
    }
    format!("{}{}", letters, row + 1)
}

/// Decode an `A1`-style reference back to a zero-based (row, col) position.
pub fn parse_cell_ref(reference: &str) -> Result<(u32, u16)> {
    let letters: String = reference.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &reference[letters.len()..];
    if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("invalid cell reference: {reference}");
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let row: u32 = digits.parse()?;
    if row == 0 {
        bail!("invalid cell reference: {reference}");
    }
    Ok((row - 1, (col - 1) as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ref_encoding() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(9, 3), "D10");
        assert_eq!(cell_ref(0, 25), "Z1");
        assert_eq!(cell_ref(0, 26), "AA1");
        assert_eq!(cell_ref(4, 27), "AB5");
    }

    #[test]
    fn test_cell_ref_round_trip() {
        for (row, col) in [(0u32, 0u16), (9, 3), (0, 25), (0, 26), (99, 51), (1000, 701)] {
            assert_eq!(parse_cell_ref(&cell_ref(row, col)).unwrap(), (row, col));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_cell_ref("").is_err());
        assert!(parse_cell_ref("A").is_err());
        assert!(parse_cell_ref("11").is_err());
        assert!(parse_cell_ref("A0").is_err());
        assert!(parse_cell_ref("A1B").is_err());
    }

    #[test]
    fn test_range_round_trip() {
        let range = CellRange { first_row: 0, first_col: 0, last_row: 9, last_col: 5 };
        assert_eq!(range.to_a1(), "A1:F10");
        assert_eq!(CellRange::parse("A1:F10").unwrap(), range);
        assert_eq!(range.n_rows(), 10);
        assert_eq!(range.n_cols(), 6);
    }

    #[test]
    fn test_bounding_range_covers_ragged_rows() {
        let rows: RowArray = vec![
            vec!["A".into(), "B".into(), "C".into()],
            vec!["x".into()],
        ];
        let sheet = Sheet::from_rows(&rows);
        let range = sheet.bounding_range().unwrap();
        assert_eq!(range.n_rows(), 2);
        assert_eq!(range.n_cols(), 3);
        // The short row leaves its tail absent, not empty.
        assert!(sheet.cell(1, 0).is_some());
        assert!(sheet.cell(1, 1).is_none());
        assert_eq!(sheet.text_at(1, 1), "");
    }

    #[test]
    fn test_workbook_rejects_duplicate_names() {
        let mut workbook = Workbook::new();
        workbook.append_sheet("Checklist", Sheet::default()).unwrap();
        assert!(workbook.append_sheet("Checklist", Sheet::default()).is_err());
        assert_eq!(workbook.sheets().count(), 1);
    }

    #[test]
    fn test_number_text_rendering() {
        assert_eq!(CellValue::Number(0.0).as_text(), "0");
        assert_eq!(CellValue::Number(12.0).as_text(), "12");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }
}
