//! Excel export pipeline
//!
//! Extraction produces a row-array, [`sheet`] models the worksheet,
//! [`table`] and [`info`] apply the two visual languages using the
//! [`styles`] catalog plus the [`sizing`] and [`metadata`] utilities, and
//! [`writer`] serializes the finished workbook.

pub mod info;
pub mod metadata;
pub mod sheet;
pub mod sizing;
pub mod styles;
pub mod table;
pub mod writer;
