//! Personnel records and their public directory projection.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use super::search::fold;

static PHOTO_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/uploads/[a-zA-Z0-9\-]+\.[a-zA-Z]{2,4}$").expect("valid regex"));

/// Person row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub in_carousel: bool,
    pub birth_date: Option<NaiveDate>,
    pub position_id: Option<i32>,
}

impl Personnel {
    /// People without a birth date never match.
    pub fn has_birthday_in(&self, month: u32) -> bool {
        self.birth_date.is_some_and(|d| d.month() == month)
    }
}

/// Fields for a new person.
#[derive(Debug, Clone, Default)]
pub struct NewPersonnel {
    pub name: String,
    pub email: String,
    pub position_id: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub in_carousel: bool,
    pub birth_date: Option<NaiveDate>,
}

/// Partial update. Outer `None` leaves the field untouched; for nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PersonnelChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position_id: Option<Option<i32>>,
    pub description: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub in_carousel: Option<bool>,
    pub birth_date: Option<Option<NaiveDate>>,
}

impl PersonnelChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.position_id.is_none()
            && self.description.is_none()
            && self.photo_url.is_none()
            && self.in_carousel.is_none()
            && self.birth_date.is_none()
    }
}

/// One person as shown in the directory, with position, department and
/// effective extension resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DirectoryEntry {
    pub id: i32,
    #[serde(rename = "nombre")]
    #[schema(example = "José Hernández")]
    pub name: String,
    #[serde(rename = "correo")]
    #[schema(example = "jose.hernandez@example.com")]
    pub email: String,
    #[serde(rename = "puesto_id")]
    pub position_id: Option<i32>,
    #[serde(rename = "puesto")]
    #[schema(example = "Desarrollador")]
    pub position: Option<String>,
    #[serde(rename = "departamento")]
    #[schema(example = "Sistemas")]
    pub department: Option<String>,
    #[schema(example = "100")]
    pub extension: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "fotoUrl")]
    #[schema(example = "/uploads/3f1c2a9e-photo.jpg")]
    pub photo_url: Option<String>,
    #[serde(rename = "en_carrusel")]
    pub in_carousel: bool,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
}

impl DirectoryEntry {
    /// Case- and accent-insensitive substring match over the searchable
    /// columns. `folded_query` must already be folded.
    pub fn matches(&self, folded_query: &str) -> bool {
        if folded_query.is_empty() {
            return true;
        }
        [
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            self.position.as_deref(),
            self.department.as_deref(),
            self.extension.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| fold(field).contains(folded_query))
    }

}

/// Birthday list row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BirthdayEntry {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
}

/// Photo references must point into the uploads directory.
pub fn is_valid_photo_url(url: &str) -> bool {
    PHOTO_URL.is_match(url)
}

pub fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}

/// Interpret the loose boolean spellings used by forms and spreadsheets.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match fold(raw.trim()).as_str() {
        "1" | "true" | "si" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Accepts ISO (`1990-05-17`) and day-first (`17/05/1990`) dates.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DirectoryEntry {
        DirectoryEntry {
            id: 1,
            name: "José Hernández".into(),
            email: "jose@example.com".into(),
            position_id: Some(2),
            position: Some("Desarrollador".into()),
            department: Some("Sistemas".into()),
            extension: Some("100".into()),
            description: None,
            photo_url: None,
            in_carousel: false,
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
    }

    #[test]
    fn test_matches_is_accent_insensitive() {
        let e = entry();
        assert!(e.matches(&fold("jose")));
        assert!(e.matches(&fold("JOSÉ")));
        assert!(e.matches(&fold("hernandez")));
    }

    #[test]
    fn test_matches_other_columns() {
        let e = entry();
        assert!(e.matches(&fold("sistemas")));
        assert!(e.matches(&fold("desarroll")));
        assert!(e.matches("100"));
        assert!(!e.matches(&fold("contabilidad")));
    }

    #[test]
    fn test_birthday_month() {
        let mut person = Personnel {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            description: None,
            photo_url: None,
            in_carousel: false,
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17),
            position_id: None,
        };
        assert!(person.has_birthday_in(5));
        assert!(!person.has_birthday_in(6));

        person.birth_date = None;
        assert!(!person.has_birthday_in(5));
    }

    #[test]
    fn test_photo_url_rules() {
        assert!(is_valid_photo_url("/uploads/abc-123.jpeg"));
        assert!(!is_valid_photo_url("/uploads/../etc/passwd"));
        assert!(!is_valid_photo_url("https://example.com/a.png"));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("Sí"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" no "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_parse_birth_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 17);
        assert_eq!(parse_birth_date("1990-05-17"), expected);
        assert_eq!(parse_birth_date("17/05/1990"), expected);
        assert_eq!(parse_birth_date("May 17"), None);
    }
}
