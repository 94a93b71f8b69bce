//! Bulk import service - CSV reconciliation of personnel and extensions.
//!
//! A file is decoded completely before anything is written; structural
//! problems reject the whole upload. Rows are then applied in one
//! transaction, each inside its own savepoint, so a bad row is rolled back
//! and reported while the rest of the file commits.

mod csv_reader;
mod extension_import;
mod personnel_import;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{MAX_CSV_BYTES, PERSONNEL_CSV_HEADERS};
use crate::errors::{AppError, AppResult};
use crate::infra::{DirectoryEvent, EventBroadcaster, UnitOfWork};

use csv_reader::{read_rows, CsvRow};
use extension_import::{ExtensionRow, RowOutcome};
use personnel_import::PersonnelRow;

/// Outcome of a bulk upload.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ImportReport {
    #[schema(example = "Carga masiva completada. 2 procesados correctamente, 1 con errores.")]
    pub message: String,
    pub processed: u64,
    pub failed: u64,
    #[schema(example = json!(["Error en fila 3 (Luis): Correo inválido: luis"]))]
    pub errors: Vec<String>,
    /// Rows left alone because the record already existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
}

impl ImportReport {
    fn record_failure(&mut self, line: u64, label: &str, err: &AppError) {
        self.failed += 1;
        self.errors
            .push(format!("Error en fila {line} ({label}): {}", err.row_reason()));
    }

    fn finish(mut self) -> Self {
        self.message = match self.skipped {
            Some(skipped) => format!(
                "Carga masiva completada. {} procesados correctamente, {} con errores, {} omitidos.",
                self.processed, self.failed, skipped
            ),
            None => format!(
                "Carga masiva completada. {} procesados correctamente, {} con errores.",
                self.processed, self.failed
            ),
        };
        self
    }
}

#[async_trait]
pub trait ImportService: Send + Sync {
    /// Reconcile personnel (and their departments, positions and
    /// extensions) from a CSV upload
    async fn import_personnel(&self, bytes: Vec<u8>) -> AppResult<ImportReport>;

    /// Register extensions from a CSV upload, skipping known numbers
    async fn import_extensions(&self, bytes: Vec<u8>) -> AppResult<ImportReport>;

    /// Header row of the personnel template
    fn personnel_template(&self) -> String;
}

pub struct Importer<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> Importer<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }

    fn announce(&self, report: &ImportReport) {
        if report.processed > 0 {
            self.events.publish(DirectoryEvent::StaffUpdate);
        }
    }
}

fn check_size(bytes: &[u8]) -> AppResult<()> {
    if bytes.is_empty() {
        return Err(AppError::bad_request("No se ha subido ningún archivo CSV."));
    }
    if bytes.len() > MAX_CSV_BYTES {
        return Err(AppError::PayloadTooLarge(
            "El archivo CSV supera el tamaño máximo de 1MB.".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> ImportService for Importer<U> {
    async fn import_personnel(&self, bytes: Vec<u8>) -> AppResult<ImportReport> {
        check_size(&bytes)?;
        let rows: Vec<CsvRow<PersonnelRow>> =
            read_rows(&bytes, personnel_import::REQUIRED_COLUMNS)?;
        let total = rows.len();

        let report = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let mut report = ImportReport::default();

                    for CsvRow { line, row } in rows {
                        let label = row.label();
                        let parsed = match row.parse() {
                            Ok(parsed) => parsed,
                            Err(e) => {
                                report.record_failure(line, &label, &e);
                                continue;
                            }
                        };

                        let applied = ctx
                            .savepoint(move |sp| {
                                Box::pin(async move { personnel_import::apply(&sp, parsed).await })
                            })
                            .await;
                        match applied {
                            Ok(()) => report.processed += 1,
                            Err(e) => {
                                tracing::debug!(line, error = %e, "Personnel row rejected");
                                report.record_failure(line, &label, &e);
                            }
                        }
                    }

                    Ok(report.finish())
                })
            })
            .await?;

        tracing::info!(
            rows = total,
            processed = report.processed,
            failed = report.failed,
            "Personnel bulk import finished"
        );
        self.announce(&report);
        Ok(report)
    }

    async fn import_extensions(&self, bytes: Vec<u8>) -> AppResult<ImportReport> {
        check_size(&bytes)?;
        let rows: Vec<CsvRow<ExtensionRow>> =
            read_rows(&bytes, extension_import::REQUIRED_COLUMNS)?;
        let total = rows.len();

        let report = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let mut report = ImportReport::default();
                    let mut skipped = 0;

                    for CsvRow { line, row } in rows {
                        let label = row.label();
                        let parsed = match row.parse() {
                            Ok(parsed) => parsed,
                            Err(e) => {
                                report.record_failure(line, &label, &e);
                                continue;
                            }
                        };

                        let applied = ctx
                            .savepoint(move |sp| {
                                Box::pin(async move { extension_import::apply(&sp, parsed).await })
                            })
                            .await;
                        match applied {
                            Ok(RowOutcome::Created) => report.processed += 1,
                            Ok(RowOutcome::Skipped) => skipped += 1,
                            Err(e) => report.record_failure(line, &label, &e),
                        }
                    }

                    report.skipped = Some(skipped);
                    Ok(report.finish())
                })
            })
            .await?;

        tracing::info!(
            rows = total,
            processed = report.processed,
            skipped = report.skipped.unwrap_or_default(),
            failed = report.failed,
            "Extension bulk import finished"
        );
        self.announce(&report);
        Ok(report)
    }

    fn personnel_template(&self) -> String {
        format!("{}\n", PERSONNEL_CSV_HEADERS.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_message() {
        let mut report = ImportReport {
            processed: 2,
            ..Default::default()
        };
        report.record_failure(3, "Luis", &AppError::validation("Correo inválido: luis"));
        let report = report.finish();

        assert_eq!(report.failed, 1);
        assert_eq!(report.errors, vec!["Error en fila 3 (Luis): Correo inválido: luis"]);
        assert_eq!(
            report.message,
            "Carga masiva completada. 2 procesados correctamente, 1 con errores."
        );
    }

    #[test]
    fn test_report_message_with_skipped() {
        let report = ImportReport {
            processed: 1,
            skipped: Some(4),
            ..Default::default()
        }
        .finish();

        assert!(report.message.ends_with("0 con errores, 4 omitidos."));
    }

    #[test]
    fn test_size_limits() {
        assert!(matches!(check_size(&[]), Err(AppError::BadRequest(_))));
        let too_big = vec![b'a'; MAX_CSV_BYTES + 1];
        assert!(matches!(check_size(&too_big), Err(AppError::PayloadTooLarge(_))));
    }
}
