//! Content-aware column width and row height heuristics
//!
//! Widths and heights are computed from display text only, so the same data
//! always sizes the same way. Recognized header roles get fixed widths; the
//! rest scale with their longest content, clamped to a readable band.

use once_cell::sync::Lazy;
use regex::Regex;

use super::sheet::Sheet;

const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;
const HEADER_FLOOR: f64 = 12.0;
const DATE_WIDTH: f64 = 14.0;
const MONEY_FLOOR: f64 = 15.0;

const NOTES_WIDTH: f64 = 85.0;
const ROLE_OR_ADDRESS_WIDTH: f64 = 40.0;

const TITLE_ROW_HEIGHT: f64 = 24.0;
const NORMAL_ROW_HEIGHT: f64 = 18.0;
const SEPARATOR_ROW_HEIGHT: f64 = 12.0;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid date pattern"));

/// Uppercase letters (including the accented set used by section headings)
/// and whitespace only.
static SECTION_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZÁÊÔÇÃO\s]+$").expect("valid title pattern"));

/// Whether `text` reads as a section title: all uppercase letters/spaces.
pub fn is_section_title(text: &str) -> bool {
    !text.is_empty() && SECTION_TITLE_RE.is_match(text)
}

/// Compute one display width per column of `sheet`'s bounding range.
///
/// Columns whose header matches a recognized role get a fixed width
/// (notes 85, role/position and address 40). Every other column takes its
/// longest content plus padding, with floors for headers, dates and money
/// values, clamped to `10..=60`.
pub fn compute_column_widths(sheet: &Sheet) -> Vec<f64> {
    let n_cols = sheet.n_cols();
    let n_rows = sheet.n_rows();
    let mut widths = Vec::with_capacity(n_cols);

    for col in 0..n_cols {
        let header = sheet.text_at(0, col).to_lowercase();

        if header.contains("observações") || header.contains("observacoes") {
            widths.push(NOTES_WIDTH);
            continue;
        }
        if header.contains("cargo")
            || header.contains("função")
            || header.contains("endereço")
            || header.contains("endereco")
        {
            widths.push(ROLE_OR_ADDRESS_WIDTH);
            continue;
        }

        let mut max_width = MIN_COLUMN_WIDTH;
        for row in 0..n_rows {
            let content = sheet.text_at(row, col);
            if content.is_empty() {
                continue;
            }

            let mut content_width = content.chars().count() as f64;
            if row == 0 {
                content_width = content_width.max(HEADER_FLOOR);
            }
            if DATE_RE.is_match(&content) {
                content_width = DATE_WIDTH;
            }
            if content.contains("R$") {
                content_width = content_width.max(MONEY_FLOOR);
            }

            max_width = max_width.max(content_width + 3.0);
        }

        widths.push(max_width.min(MAX_COLUMN_WIDTH));
    }

    widths
}

/// Compute one display height per row of `sheet`'s bounding range.
///
/// Only column 0 is inspected: an all-caps title there gets a tall row, an
/// empty cell a short separator row, anything else the normal height. A
/// title confined to column 1 is therefore never detected; this matches the
/// on-screen layout the heights were tuned for.
pub fn compute_row_heights(sheet: &Sheet) -> Vec<f64> {
    (0..sheet.n_rows())
        .map(|row| {
            let text = sheet.text_at(row, 0);
            if is_section_title(&text) {
                TITLE_ROW_HEIGHT
            } else if text.is_empty() {
                SEPARATOR_ROW_HEIGHT
            } else {
                NORMAL_ROW_HEIGHT
            }
        })
        .collect()
}
