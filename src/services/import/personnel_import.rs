//! Personnel CSV reconciliation.
//!
//! Each row resolves its department, position and extensions by natural key,
//! creating what is missing, then upserts the person by exact name.

use chrono::NaiveDate;
use serde::Deserialize;

use super::csv_reader::{cell, sanitize_cell};
use crate::domain::personnel::{is_valid_email, is_valid_photo_url, parse_birth_date, parse_flag};
use crate::domain::{
    ensure_assignable_to_personnel, ensure_assignable_to_position, NewPersonnel, PersonnelChanges,
};
use crate::errors::{AppError, AppResult};
use crate::infra::TransactionContext;

pub const REQUIRED_COLUMNS: &[&str] = &["nombre", "correo", "puesto", "departamento"];

/// Raw row; column names are matched after lowercasing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonnelRow {
    pub nombre: Option<String>,
    pub correo: Option<String>,
    pub puesto: Option<String>,
    pub departamento: Option<String>,
    pub extension: Option<String>,
    pub extension_individual: Option<String>,
    pub descripcion: Option<String>,
    #[serde(rename = "fotourl")]
    pub foto_url: Option<String>,
    pub en_carrusel: Option<String>,
    pub fecha_nacimiento: Option<String>,
}

impl PersonnelRow {
    /// Name used in row error messages.
    pub fn label(&self) -> String {
        cell(&self.nombre).unwrap_or_else(|| "sin nombre".to_string())
    }

    /// Check required cells and parse the typed ones.
    pub fn parse(&self) -> AppResult<ParsedPersonnel> {
        let (Some(name), Some(email), Some(position), Some(department)) = (
            cell(&self.nombre),
            cell(&self.correo),
            cell(&self.puesto),
            cell(&self.departamento),
        ) else {
            return Err(AppError::validation(
                "Faltan campos requeridos (nombre, correo, puesto, departamento).",
            ));
        };

        if !is_valid_email(&email) {
            return Err(AppError::validation(format!("Correo inválido: {email}")));
        }

        let photo_url = cell(&self.foto_url);
        if let Some(url) = &photo_url {
            if !is_valid_photo_url(url) {
                return Err(AppError::validation(format!("URL de foto inválida: {url}")));
            }
        }

        let in_carousel = match cell(&self.en_carrusel) {
            Some(raw) => Some(
                parse_flag(&raw)
                    .ok_or_else(|| AppError::validation(format!("Valor de en_carrusel inválido: {raw}")))?,
            ),
            None => None,
        };

        let birth_date = match cell(&self.fecha_nacimiento) {
            Some(raw) => Some(parse_birth_date(&raw).ok_or_else(|| {
                AppError::validation(format!("Fecha de nacimiento inválida: {raw}"))
            })?),
            None => None,
        };

        Ok(ParsedPersonnel {
            name: sanitize_cell(&name),
            email,
            position: sanitize_cell(&position),
            department: sanitize_cell(&department),
            extension: cell(&self.extension),
            individual_extension: cell(&self.extension_individual),
            description: cell(&self.descripcion).map(|d| sanitize_cell(&d)),
            photo_url,
            in_carousel,
            birth_date,
        })
    }
}

/// A row that passed field validation.
#[derive(Debug, Clone)]
pub struct ParsedPersonnel {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub extension: Option<String>,
    pub individual_extension: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub in_carousel: Option<bool>,
    pub birth_date: Option<NaiveDate>,
}

/// Apply one row. Runs inside the row's savepoint.
pub async fn apply(ctx: &TransactionContext<'_>, row: ParsedPersonnel) -> AppResult<()> {
    let department = ctx.departments().find_or_create_by_name(&row.department).await?;
    let position = ctx.positions().find_or_create(&row.position, department.id).await?;

    if let Some(number) = &row.extension {
        let extension = ctx
            .extensions()
            .find_or_create_by_number(number, Some(department.id))
            .await?;
        let links = ctx.extensions().links(extension.id).await?;
        ensure_assignable_to_position(&links, position.id)?;
        ctx.extensions()
            .attach_to_position(position.id, extension.id)
            .await?;
    }

    let individual = match &row.individual_extension {
        Some(number) => Some(ctx.extensions().find_or_create_by_number(number, None).await?),
        None => None,
    };

    let existing = ctx.personnel().find_by_name(&row.name).await?;
    let owner = ctx.personnel().find_by_email(&row.email).await?;
    if owner.is_some_and(|o| Some(o.id) != existing.as_ref().map(|e| e.id)) {
        return Err(AppError::conflict(format!(
            "El correo {} ya pertenece a otra persona.",
            row.email
        )));
    }

    let person = match existing {
        Some(current) => {
            let changes = PersonnelChanges {
                email: Some(row.email),
                position_id: Some(Some(position.id)),
                description: row.description.map(Some),
                photo_url: row.photo_url.map(Some),
                in_carousel: row.in_carousel,
                birth_date: row.birth_date.map(Some),
                ..Default::default()
            };
            ctx.personnel().update(current.id, changes).await?
        }
        None => {
            let new = NewPersonnel {
                name: row.name,
                email: row.email,
                position_id: Some(position.id),
                description: row.description,
                photo_url: row.photo_url,
                in_carousel: row.in_carousel.unwrap_or(false),
                birth_date: row.birth_date,
            };
            ctx.personnel().create(new).await?
        }
    };

    if let Some(extension) = individual {
        let links = ctx.extensions().links(extension.id).await?;
        ensure_assignable_to_personnel(&links)?;
        ctx.extensions()
            .replace_personnel_extensions(person.id, Some(extension.id))
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PersonnelRow {
        PersonnelRow {
            nombre: Some("Ana".into()),
            correo: Some("ana@example.com".into()),
            puesto: Some("Tester".into()),
            departamento: Some("QA".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_row_parses() {
        let parsed = row().parse().unwrap();
        assert_eq!(parsed.name, "Ana");
        assert_eq!(parsed.department, "QA");
        assert_eq!(parsed.in_carousel, None);
        assert_eq!(parsed.extension, None);
    }

    #[test]
    fn test_missing_required_cell() {
        let incomplete = PersonnelRow {
            puesto: Some("  ".into()),
            ..row()
        };
        assert!(matches!(incomplete.parse(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_optional_fields_are_parsed() {
        let full = PersonnelRow {
            en_carrusel: Some("sí".into()),
            fecha_nacimiento: Some("1990-05-17".into()),
            descripcion: Some("=HYPERLINK()".into()),
            extension_individual: Some("205".into()),
            ..row()
        };
        let parsed = full.parse().unwrap();

        assert_eq!(parsed.in_carousel, Some(true));
        assert_eq!(parsed.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(parsed.description.as_deref(), Some("'=HYPERLINK()"));
        assert_eq!(parsed.individual_extension.as_deref(), Some("205"));
    }

    #[test]
    fn test_bad_typed_fields_rejected() {
        let bad_flag = PersonnelRow {
            en_carrusel: Some("maybe".into()),
            ..row()
        };
        assert!(bad_flag.parse().is_err());

        let bad_email = PersonnelRow {
            correo: Some("ana".into()),
            ..row()
        };
        assert!(bad_email.parse().is_err());
    }

    #[test]
    fn test_label_falls_back() {
        assert_eq!(row().label(), "Ana");
        assert_eq!(PersonnelRow::default().label(), "sin nombre");
    }
}
