//! Extension CSV reconciliation. Existing numbers are skipped, not updated.

use serde::Deserialize;

use super::csv_reader::{cell, sanitize_cell};
use crate::errors::{AppError, AppResult};
use crate::infra::TransactionContext;

pub const REQUIRED_COLUMNS: &[&str] = &["number"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionRow {
    pub number: Option<String>,
    pub departamento: Option<String>,
}

impl ExtensionRow {
    pub fn label(&self) -> String {
        cell(&self.number).unwrap_or_else(|| "sin número".to_string())
    }

    pub fn parse(&self) -> AppResult<ParsedExtension> {
        let number = cell(&self.number)
            .ok_or_else(|| AppError::validation("El número de extensión es requerido."))?;

        Ok(ParsedExtension {
            number,
            department: cell(&self.departamento).map(|d| sanitize_cell(&d)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ParsedExtension {
    pub number: String,
    pub department: Option<String>,
}

/// What happened to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Skipped,
}

/// Apply one row. Runs inside the row's savepoint.
pub async fn apply(ctx: &TransactionContext<'_>, row: ParsedExtension) -> AppResult<RowOutcome> {
    if ctx.extensions().find_by_number(&row.number).await?.is_some() {
        return Ok(RowOutcome::Skipped);
    }

    let department_id = match &row.department {
        Some(name) => Some(ctx.departments().find_or_create_by_name(name).await?.id),
        None => None,
    };
    ctx.extensions().create(row.number, department_id).await?;
    Ok(RowOutcome::Created)
}
