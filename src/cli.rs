//! Command-line interface and export entry points
//!
//! Each subcommand assembles one full export: load the source file, extract
//! rows or records, run the matching formatter and hand the workbook to the
//! writer. Empty inputs warn and skip the sheet; real failures propagate to
//! `main`, which reports once.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use scraper::{Html, Selector};
use serde::Deserialize;

use planilha_cli::excel::sheet::{CellValue, RowArray, Workbook};
use planilha_cli::excel::{info, table, writer};
use planilha_cli::extract;

#[derive(Parser)]
#[command(name = "planilha-cli")]
#[command(about = "Exports checklist and asset-tracking pages to styled Excel workbooks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the checklist table from a saved page
    Checklist {
        /// Saved HTML page containing the checklist form
        page: PathBuf,
        /// Directory the workbook is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Export any HTML table as a styled table sheet
    Tabela {
        /// Saved HTML page
        page: PathBuf,
        /// CSS selector of the table to export
        #[arg(long, default_value = "table")]
        selector: String,
        /// Sheet name inside the workbook
        #[arg(long)]
        sheet: String,
        /// File name prefix
        #[arg(long)]
        prefix: String,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Export employee cards as a table sheet
    Funcionarios {
        /// Saved HTML page containing the employee cards
        page: PathBuf,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Export invoice cards as a table sheet
    Nfs {
        /// Saved HTML page containing the invoice cards
        page: PathBuf,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Export a JSON array of records as a table sheet
    Registros {
        /// JSON file holding an array of uniform objects
        records: PathBuf,
        #[arg(long)]
        sheet: String,
        #[arg(long)]
        prefix: String,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Export label/value pairs as an informational sheet
    Ficha {
        /// JSON file holding an array of [label, value] rows
        pairs: PathBuf,
        #[arg(long, default_value = "Ficha")]
        sheet: String,
        #[arg(long, default_value = "Ficha")]
        prefix: String,
        /// Use the advanced formatting (banners, merges, highlighting)
        #[arg(long)]
        advanced: bool,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Checklist { page, output_dir } => checklist_command(&page, &output_dir),
        Commands::Tabela { page, selector, sheet, prefix, output_dir } => {
            tabela_command(&page, &selector, &sheet, &prefix, &output_dir)
        }
        Commands::Funcionarios { page, output_dir } => funcionarios_command(&page, &output_dir),
        Commands::Nfs { page, output_dir } => nfs_command(&page, &output_dir),
        Commands::Registros { records, sheet, prefix, output_dir } => {
            registros_command(&records, &sheet, &prefix, &output_dir)
        }
        Commands::Ficha { pairs, sheet, prefix, advanced, output_dir } => {
            ficha_command(&pairs, &sheet, &prefix, advanced, &output_dir)
        }
    }
}

fn checklist_command(page: &Path, output_dir: &Path) -> Result<()> {
    let document = load_document(page)?;
    let section = section_title(&document).unwrap_or_else(|| "Checklist".to_string());
    let path = table::export_table(&document, "#form-container table", &section, &section, output_dir)?;
    println!("{} {}", "Exported:".green(), path.display());
    Ok(())
}

fn tabela_command(
    page: &Path,
    selector: &str,
    sheet: &str,
    prefix: &str,
    output_dir: &Path,
) -> Result<()> {
    let document = load_document(page)?;
    let path = table::export_table(&document, selector, sheet, prefix, output_dir)?;
    println!("{} {}", "Exported:".green(), path.display());
    Ok(())
}

fn funcionarios_command(page: &Path, output_dir: &Path) -> Result<()> {
    let document = load_document(page)?;
    let records = extract::collect_employee_records(&document);
    if records.is_empty() {
        log::warn!("no employee cards found in {}", page.display());
        println!("{}", "Não há funcionários para exportar".yellow());
        return Ok(());
    }

    let mut workbook = Workbook::new();
    table::add_table_sheet_from_records(&records, &mut workbook, "Funcionários")?;

    let path = output_dir.join(writer::export_filename_today("Funcionarios"));
    writer::save_workbook(&workbook, &path)?;
    println!(
        "{} {} ({} funcionários)",
        "Exported:".green(),
        path.display(),
        records.len()
    );
    Ok(())
}

fn nfs_command(page: &Path, output_dir: &Path) -> Result<()> {
    let document = load_document(page)?;
    let records = extract::collect_invoice_records(&document);
    if records.is_empty() {
        log::warn!("no invoice cards found in {}", page.display());
        println!("{}", "Não há notas fiscais para exportar".yellow());
        return Ok(());
    }

    let mut workbook = Workbook::new();
    table::add_table_sheet_from_records(&records, &mut workbook, "Notas Fiscais")?;

    let path = output_dir.join(writer::export_filename_today("NotasFiscais"));
    writer::save_workbook(&workbook, &path)?;
    println!(
        "{} {} ({} notas fiscais)",
        "Exported:".green(),
        path.display(),
        records.len()
    );
    Ok(())
}

fn registros_command(records: &Path, sheet: &str, prefix: &str, output_dir: &Path) -> Result<()> {
    let records = load_records(records)?;
    let mut workbook = Workbook::new();
    table::add_table_sheet_from_records(&records, &mut workbook, sheet)?;
    if workbook.is_empty() {
        println!("{}", "Não há registros para exportar".yellow());
        return Ok(());
    }

    let path = output_dir.join(writer::export_filename_today(prefix));
    writer::save_workbook(&workbook, &path)?;
    println!("{} {}", "Exported:".green(), path.display());
    Ok(())
}

fn ficha_command(
    pairs: &Path,
    sheet: &str,
    prefix: &str,
    advanced: bool,
    output_dir: &Path,
) -> Result<()> {
    let rows = load_info_rows(pairs)?;
    let mut workbook = Workbook::new();
    info::add_info_sheet(&rows, &mut workbook, sheet, advanced)?;
    if workbook.is_empty() {
        println!("{}", "Não há dados para exportar".yellow());
        return Ok(());
    }

    let path = output_dir.join(writer::export_filename_today(prefix));
    writer::save_workbook(&workbook, &path)?;
    println!("{} {}", "Exported:".green(), path.display());
    Ok(())
}

/// A scalar as it appears in JSON input files.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonScalar {
    Number(f64),
    Text(String),
    Bool(bool),
}

fn cell_value(scalar: Option<JsonScalar>) -> CellValue {
    match scalar {
        None => CellValue::Empty,
        Some(JsonScalar::Number(n)) => CellValue::Number(n),
        Some(JsonScalar::Text(s)) => CellValue::Text(s),
        Some(JsonScalar::Bool(b)) => CellValue::Text(b.to_string()),
    }
}

fn load_document(page: &Path) -> Result<Html> {
    let html = fs::read_to_string(page)
        .with_context(|| format!("failed to read {}", page.display()))?;
    Ok(Html::parse_document(&html))
}

fn load_info_rows(path: &Path) -> Result<RowArray> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let rows: Vec<Vec<Option<JsonScalar>>> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of rows", path.display()))?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_value).collect())
        .collect())
}

fn load_records(path: &Path) -> Result<Vec<IndexMap<String, CellValue>>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<IndexMap<String, Option<JsonScalar>>> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    Ok(records
        .into_iter()
        .map(|record| record.into_iter().map(|(key, value)| (key, cell_value(value))).collect())
        .collect())
}

fn section_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("#secaoTitle").expect("valid selector");
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
