//! Employee import files

use crate::error::{ClientError, ClientResult};

/// Columns of the import template, in order
pub const TEMPLATE_COLUMNS: [&str; 11] = [
    "nome",
    "sobrenome",
    "bi",
    "sexo",
    "data_nascimento",
    "email",
    "telefone",
    "endereco",
    "data_admissao",
    "departamento_id",
    "cargo_id",
];

const REQUIRED_COLUMNS: [&str; 3] = ["nome", "sobrenome", "bi"];

const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Separators spreadsheet exports use for CSV
const DELIMITERS: [u8; 2] = [b',', b';'];

/// Lowercased header names of a CSV body read with `delimiter`
fn header_columns(body: &[u8], delimiter: u8) -> ClientResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body);
    let headers = reader
        .headers()
        .map_err(|e| ClientError::validation(format!("unreadable import header: {e}")))?;
    Ok(headers.iter().map(str::to_ascii_lowercase).collect())
}

/// Blank CSV template offered for download. Built locally.
pub fn csv_template() -> String {
    let mut out = TEMPLATE_COLUMNS.join(",");
    out.push('\n');
    out
}

/// Reject files the import endpoint would refuse, before uploading them.
///
/// Spreadsheets are only checked by extension; CSV headers must carry the
/// required columns.
pub fn check_import_file(file_name: &str, bytes: &[u8]) -> ClientResult<()> {
    if bytes.is_empty() {
        return Err(ClientError::validation("import file is empty"));
    }
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ClientError::validation(format!(
            "unsupported import file '{file_name}': expected .csv, .xlsx or .xls"
        )));
    }
    if extension != "csv" {
        return Ok(());
    }

    let body = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut missing = Vec::from(REQUIRED_COLUMNS);
    for delimiter in DELIMITERS {
        let columns = header_columns(body, delimiter)?;
        let absent: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !columns.iter().any(|c| c == required))
            .collect();
        if absent.len() < missing.len() {
            missing = absent;
        }
    }
    if !missing.is_empty() {
        return Err(ClientError::validation(format!(
            "import file is missing columns: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
