//! Announcements ("important info") shown on the public page.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub id: i32,
    #[schema(example = "Mantenimiento eléctrico")]
    pub title: String,
    #[schema(example = "El sábado no habrá servicio de 8 a 12.")]
    pub content: Option<String>,
    /// Free-text contact extension, not tied to the extension registry
    #[schema(example = "305")]
    pub extension: Option<String>,
}
