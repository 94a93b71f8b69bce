//! Phone extensions and the rules deciding who may hold them.
//!
//! An extension is owned either by exactly one position or by any number of
//! people, never both. Occupancy is derived from the link tables and never
//! stored on the extension itself.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Extension row as stored. `department_id = None` marks a global extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Extension {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "100")]
    pub number: String,
    pub department_id: Option<i32>,
}

/// Links currently recorded against one extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionLinks {
    pub position_ids: Vec<i32>,
    pub personnel_count: u64,
}

/// Check that `position_id` may take the extension.
///
/// Re-attaching to the position that already holds it is a no-op and
/// therefore allowed.
pub fn ensure_assignable_to_position(links: &ExtensionLinks, position_id: i32) -> AppResult<()> {
    if links.personnel_count > 0 {
        return Err(AppError::conflict("Extension already individually assigned"));
    }
    if links.position_ids.iter().any(|id| *id != position_id) {
        return Err(AppError::conflict("Extension already assigned to another position"));
    }
    Ok(())
}

/// Check that a person may take the extension. Sharing among people is fine.
pub fn ensure_assignable_to_personnel(links: &ExtensionLinks) -> AppResult<()> {
    if !links.position_ids.is_empty() {
        return Err(AppError::conflict("Extension belongs to a position"));
    }
    Ok(())
}

/// Extension shown next to a person: their own numbers first, then the
/// numbers inherited from their position.
pub fn effective_extension(individual: &[String], from_position: &[String]) -> Option<String> {
    let chosen = if individual.is_empty() {
        from_position
    } else {
        individual
    };
    if chosen.is_empty() {
        None
    } else {
        Some(chosen.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OccupantType {
    Position,
    Personnel,
}

/// Who currently holds an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupancy {
    Available,
    Position(String),
    Personnel(Vec<String>),
}

impl Occupancy {
    /// Position links win over personnel links.
    pub fn resolve(position_name: Option<String>, personnel_names: Vec<String>) -> Self {
        match position_name {
            Some(name) => Occupancy::Position(name),
            None if !personnel_names.is_empty() => Occupancy::Personnel(personnel_names),
            None => Occupancy::Available,
        }
    }

    pub fn is_occupied(&self) -> bool {
        !matches!(self, Occupancy::Available)
    }

    pub fn occupant_type(&self) -> Option<OccupantType> {
        match self {
            Occupancy::Available => None,
            Occupancy::Position(_) => Some(OccupantType::Position),
            Occupancy::Personnel(_) => Some(OccupantType::Personnel),
        }
    }

    pub fn occupant(&self) -> Option<String> {
        match self {
            Occupancy::Available => None,
            Occupancy::Position(name) => Some(name.clone()),
            Occupancy::Personnel(names) => Some(names.join(", ")),
        }
    }
}

/// Admin listing row for an extension.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExtensionStatus {
    pub id: i32,
    #[schema(example = "100")]
    pub number: String,
    pub department_id: Option<i32>,
    #[schema(example = "Sistemas")]
    pub department_name: Option<String>,
    pub is_occupied: bool,
    pub occupant_type: Option<OccupantType>,
    #[schema(example = "Ana López, Luis Pérez")]
    pub occupant: Option<String>,
}

impl ExtensionStatus {
    pub fn new(extension: Extension, department_name: Option<String>, occupancy: Occupancy) -> Self {
        Self {
            id: extension.id,
            number: extension.number,
            department_id: extension.department_id,
            department_name,
            is_occupied: occupancy.is_occupied(),
            occupant_type: occupancy.occupant_type(),
            occupant: occupancy.occupant(),
        }
    }
}
