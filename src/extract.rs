//! HTML data extraction
//!
//! Converts saved form pages into row-arrays and key/value records: table
//! scraping with form-control resolution (date reformatting, select label
//! lookup, hidden-field skipping), single-field lookup, and the employee
//! and invoice card scrapers.

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::excel::sheet::{CellValue, RowArray};

static HEAD_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead tr").expect("valid selector"));
static HEAD_CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid selector"));
static BODY_ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("valid selector"));
static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static INPUTS: Lazy<Selector> = Lazy::new(|| Selector::parse("input").expect("valid selector"));
static FIELDS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input, select, textarea").expect("valid selector"));
static OPTIONS: Lazy<Selector> = Lazy::new(|| Selector::parse("option").expect("valid selector"));
static EMPLOYEE_CARDS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".funcionarios-card").expect("valid selector"));
static INVOICE_CARDS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".nfs-card").expect("valid selector"));

/// Invoice card fields, in export column order. Field inputs are named
/// `row-<n>-<label>`.
const INVOICE_FIELDS: [&str; 10] = [
    "Empresa",
    "Processo do Contrato",
    "Objeto do Contrato",
    "Data término do contrato",
    "N° Memorando",
    "Data Memorando",
    "Valor da NF",
    "Responsável",
    "Data da Última Atualização",
    "Observações",
];

/// Extract the first table matching `table_selector` into a row-array.
///
/// The header row holds each `th`'s trimmed text and is omitted when the
/// table has no `thead` row. Body rows start with the zero-based row index,
/// then one entry per data cell from the second `td` on. Cells holding a
/// hidden input are skipped outright, shortening the row, so downstream
/// consumers must not assume rectangular output.
pub fn extract_table(document: &Html, table_selector: &str) -> Result<RowArray> {
    let selector = Selector::parse(table_selector)
        .map_err(|e| anyhow!("invalid selector '{table_selector}': {e}"))?;
    let table = document
        .select(&selector)
        .next()
        .with_context(|| format!("no table matches '{table_selector}'"))?;

    let mut rows = RowArray::new();

    if let Some(head) = table.select(&HEAD_ROW).next() {
        rows.push(
            head.select(&HEAD_CELLS)
                .map(|th| CellValue::Text(element_text(&th)))
                .collect(),
        );
    }

    for (index, body_row) in table.select(&BODY_ROWS).enumerate() {
        let mut row = vec![CellValue::Number(index as f64)];

        // The first cell holds the on-screen item number; the row index
        // replaces it.
        for cell in body_row.select(&CELLS).skip(1) {
            let has_hidden_input = cell
                .select(&INPUTS)
                .any(|input| input.value().attr("type") == Some("hidden"));
            if has_hidden_input {
                continue;
            }

            let value = match cell.select(&FIELDS).next() {
                Some(field) => resolve_table_field(&field),
                None => element_text(&cell),
            };
            row.push(CellValue::Text(value));
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Resolve one named field inside `container`: selects yield the chosen
/// option's label, everything else its value. Absent fields (and invalid
/// selectors) yield an empty string.
pub fn extract_field_value(container: &ElementRef, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    container
        .select(&selector)
        .next()
        .map(|field| field_value(&field))
        .unwrap_or_default()
}

/// Scrape employee cards into records, one per card, keys in the export
/// column order.
pub fn collect_employee_records(document: &Html) -> Vec<IndexMap<String, CellValue>> {
    document
        .select(&EMPLOYEE_CARDS)
        .map(|card| {
            let mut record = IndexMap::new();
            let id = card.value().attr("data-employee-id").unwrap_or("");
            record.insert("ID".to_string(), CellValue::Text(id.to_string()));
            for (key, selector) in [
                ("Nome Completo", ".funcionarios-input-nome"),
                ("CPF", ".funcionarios-input-cpf"),
                ("Telefone", ".funcionarios-input-telefone"),
                ("Cargo/Função", ".funcionarios-input-cargo"),
                ("Endereço", ".funcionarios-input-endereco"),
                ("Empresa", ".funcionarios-input-empresa"),
                ("Escolaridade", ".funcionarios-input-escolaridade"),
            ] {
                record.insert(
                    key.to_string(),
                    CellValue::Text(extract_field_value(&card, selector)),
                );
            }
            record
        })
        .collect()
}

/// Scrape invoice cards into records. The money field is re-run through the
/// currency mask so the exported column matches the on-screen display.
pub fn collect_invoice_records(document: &Html) -> Vec<IndexMap<String, CellValue>> {
    document
        .select(&INVOICE_CARDS)
        .map(|card| {
            let mut record = IndexMap::new();
            for label in INVOICE_FIELDS {
                let selector = format!("[name$='-{label}']");
                let mut value = extract_field_value(&card, &selector);
                if label == "Valor da NF" {
                    value = format_currency_br(&value);
                }
                record.insert(label.to_string(), CellValue::Text(value));
            }
            record
        })
        .collect()
}

/// Apply the Brazilian currency input mask: keep digits only, treat them as
/// cents, group thousands with dots and use a comma decimal separator.
/// Already-masked input passes through unchanged; no digits yield an empty
/// string.
pub fn format_currency_br(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    let cents: u128 = digits.parse().unwrap_or(0);
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("R$ {grouped},{fraction:02}")
}

/// Full field resolution for table cells: date inputs are reformatted from
/// ISO to `DD/MM/YYYY`, selects resolve to the chosen option's label,
/// everything else to its value.
fn resolve_table_field(field: &ElementRef) -> String {
    if field.value().name() == "input" && field.value().attr("type") == Some("date") {
        let value = field.value().attr("value").unwrap_or("");
        if value.is_empty() {
            return String::new();
        }
        return reformat_iso_date(value);
    }
    field_value(field)
}

fn field_value(field: &ElementRef) -> String {
    match field.value().name() {
        "select" => {
            let chosen = field
                .select(&OPTIONS)
                .find(|option| option.value().attr("selected").is_some())
                .or_else(|| field.select(&OPTIONS).next());
            match chosen {
                Some(option) => element_text(&option),
                None => field.value().attr("value").unwrap_or("").to_string(),
            }
        }
        "textarea" => field.text().collect::<String>(),
        _ => field.value().attr("value").unwrap_or("").to_string(),
    }
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`; anything else passes through untouched.
fn reformat_iso_date(value: &str) -> String {
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => value.to_string(),
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_extract_header_and_date_input() {
        let document = parse(
            r#"<table>
                <thead><tr><th>A</th><th>B</th></tr></thead>
                <tbody><tr>
                    <td>1</td>
                    <td><input type="date" value="2024-03-05"></td>
                </tr></tbody>
            </table>"#,
        );
        let rows = extract_table(&document, "table").unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("A"), CellValue::from("B")],
                vec![CellValue::Number(0.0), CellValue::from("05/03/2024")],
            ]
        );
    }

    #[test]
    fn test_hidden_input_cell_is_dropped_entirely() {
        let document = parse(
            r#"<table><tbody><tr>
                <td>1</td>
                <td><input type="hidden" value="{}"></td>
                <td>visível</td>
            </tr></tbody></table>"#,
        );
        let rows = extract_table(&document, "table").unwrap();
        // The hidden cell is absent, not an empty placeholder.
        assert_eq!(
            rows,
            vec![vec![CellValue::Number(0.0), CellValue::from("visível")]]
        );
    }

    #[test]
    fn test_header_omitted_without_thead() {
        let document = parse("<table><tbody><tr><td>1</td><td>x</td></tr></tbody></table>");
        let rows = extract_table(&document, "table").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], CellValue::Number(0.0));
    }

    #[test]
    fn test_select_resolves_to_option_label() {
        let document = parse(
            r#"<table><tbody><tr>
                <td>1</td>
                <td><select>
                    <option value="ok">Conforme</option>
                    <option value="nc" selected>Não Conforme</option>
                </select></td>
            </tr></tbody></table>"#,
        );
        let rows = extract_table(&document, "table").unwrap();
        assert_eq!(rows[0][1], CellValue::from("Não Conforme"));
    }

    #[test]
    fn test_select_falls_back_to_first_option() {
        let document = parse(
            r#"<table><tbody><tr>
                <td>1</td>
                <td><select>
                    <option value="a">Primeira</option>
                    <option value="b">Segunda</option>
                </select></td>
            </tr></tbody></table>"#,
        );
        let rows = extract_table(&document, "table").unwrap();
        assert_eq!(rows[0][1], CellValue::from("Primeira"));
    }

    #[test]
    fn test_plain_cell_text_is_trimmed() {
        let document = parse(
            "<table><tbody><tr><td>1</td><td>  espaços  </td></tr></tbody></table>",
        );
        let rows = extract_table(&document, "table").unwrap();
        assert_eq!(rows[0][1], CellValue::from("espaços"));
    }

    #[test]
    fn test_no_matching_table_is_an_error() {
        let document = parse("<div>sem tabela</div>");
        assert!(extract_table(&document, "#form-container table").is_err());
    }

    #[test]
    fn test_extract_field_value() {
        let document = parse(
            r#"<div class="card">
                <input class="nome" value="Maria">
                <select class="cargo">
                    <option>Jardineiro</option>
                    <option selected>Engenheiro</option>
                </select>
            </div>"#,
        );
        let selector = Selector::parse(".card").unwrap();
        let card = document.select(&selector).next().unwrap();

        assert_eq!(extract_field_value(&card, ".nome"), "Maria");
        assert_eq!(extract_field_value(&card, ".cargo"), "Engenheiro");
        assert_eq!(extract_field_value(&card, ".inexistente"), "");
    }

    #[test]
    fn test_collect_employee_records() {
        let document = parse(
            r#"<div>
                <div class="funcionarios-card" data-employee-id="7">
                    <input class="funcionarios-input-nome" value="Maria Silva">
                    <input class="funcionarios-input-cpf" value="111.222.333-44">
                    <input class="funcionarios-input-telefone" value="9999-0000">
                    <select class="funcionarios-input-cargo">
                        <option selected>Jardineiro</option>
                    </select>
                    <input class="funcionarios-input-endereco" value="Rua A, 1">
                    <select class="funcionarios-input-empresa">
                        <option selected>Prefeitura</option>
                    </select>
                    <select class="funcionarios-input-escolaridade">
                        <option selected>Médio</option>
                    </select>
                </div>
            </div>"#,
        );
        let records = collect_employee_records(&document);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "ID",
                "Nome Completo",
                "CPF",
                "Telefone",
                "Cargo/Função",
                "Endereço",
                "Empresa",
                "Escolaridade"
            ]
        );
        assert_eq!(record["ID"], CellValue::from("7"));
        assert_eq!(record["Nome Completo"], CellValue::from("Maria Silva"));
        assert_eq!(record["Cargo/Função"], CellValue::from("Jardineiro"));
    }

    #[test]
    fn test_collect_invoice_records_normalizes_money() {
        let document = parse(
            r#"<div class="nfs-card" data-nf-index="0">
                <input name="row-0-Empresa" value="ACME">
                <input name="row-0-Valor da NF" value="R$ 1.234,56">
                <textarea name="row-0-Observações">ok</textarea>
                <input type="hidden" name="row-0-original" value="{}">
            </div>"#,
        );
        let records = collect_invoice_records(&document);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record["Empresa"], CellValue::from("ACME"));
        assert_eq!(record["Valor da NF"], CellValue::from("R$ 1.234,56"));
        assert_eq!(record["Observações"], CellValue::from("ok"));
        // Unfilled fields come through as empty strings.
        assert_eq!(record["Responsável"], CellValue::from(""));
    }

    #[test]
    fn test_format_currency_br() {
        assert_eq!(format_currency_br(""), "");
        assert_eq!(format_currency_br("abc"), "");
        assert_eq!(format_currency_br("1234"), "R$ 12,34");
        assert_eq!(format_currency_br("5"), "R$ 0,05");
        assert_eq!(format_currency_br("123456789"), "R$ 1.234.567,89");
        // Idempotent over already-masked values.
        assert_eq!(format_currency_br("R$ 1.234,56"), "R$ 1.234,56");
    }

    #[test]
    fn test_reformat_iso_date_passthrough() {
        assert_eq!(reformat_iso_date("2024-03-05"), "05/03/2024");
        assert_eq!(reformat_iso_date("05/03/2024"), "05/03/2024");
    }
}
