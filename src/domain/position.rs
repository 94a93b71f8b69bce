//! Positions ("puestos"): named roles scoped to one department.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Position row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Position {
    pub id: i32,
    pub name: String,
    pub department_id: i32,
}

/// Position joined with its department and linked extension for listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PositionView {
    #[schema(example = 4)]
    pub id: i32,
    #[schema(example = "Desarrollador")]
    pub name: String,
    pub department_id: i32,
    #[schema(example = "Sistemas")]
    pub department_name: String,
    pub extension_id: Option<i32>,
    #[schema(example = "100")]
    pub extension_number: Option<String>,
    /// Number of people currently holding this position
    pub personnel_count: u64,
}
