//! CSV decoding shared by the bulk importers.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppResult};

const UTF8_BOM: &str = "\u{feff}";

/// One decoded data row and the physical line it started on (header = 1).
#[derive(Debug, Clone)]
pub struct CsvRow<T> {
    pub line: u64,
    pub row: T,
}

/// Decode a CSV upload into typed rows.
///
/// Header names are trimmed and lowercased before matching, so row types
/// use lowercase serde names. Any structural problem fails the whole file.
pub fn read_rows<T: DeserializeOwned>(bytes: &[u8], required: &[&str]) -> AppResult<Vec<CsvRow<T>>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AppError::bad_request("El archivo debe estar codificado en UTF-8."))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(invalid_csv)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Faltan columnas requeridas en el CSV: {}.",
            missing.join(", ")
        )));
    }
    reader.set_headers(headers.clone());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(invalid_csv)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = record.deserialize(Some(&headers)).map_err(|e| {
            AppError::bad_request(format!("Fila {line} del CSV no válida: {e}"))
        })?;
        rows.push(CsvRow { line, row });
    }

    if rows.is_empty() {
        return Err(AppError::bad_request(
            "El archivo CSV está vacío o solo contiene cabeceras.",
        ));
    }
    Ok(rows)
}

fn invalid_csv(err: csv::Error) -> AppError {
    tracing::debug!(error = %err, "CSV decoding failed");
    AppError::bad_request("El archivo CSV no es válido.")
}

/// Neutralize spreadsheet formula injection in free-text cells.
pub fn sanitize_cell(value: &str) -> String {
    if value.starts_with(['=', '+', '-', '@']) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

/// Trimmed cell, `None` when blank.
pub fn cell(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
