//! Site-wide appearance theme.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Sunny,
    Rainy,
    Cloudy,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Default,
        Theme::Sunny,
        Theme::Rainy,
        Theme::Cloudy,
        Theme::Light,
        Theme::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Sunny => "sunny",
            Theme::Rainy => "rainy",
            Theme::Cloudy => "cloudy",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::validation("Tema inválido."))
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
