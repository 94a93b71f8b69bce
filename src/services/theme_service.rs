//! Theme service - the persisted site-wide appearance theme.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Theme;
use crate::errors::AppResult;
use crate::infra::{DirectoryEvent, EventBroadcaster, UnitOfWork};

/// Settings key holding the theme name
const THEME_KEY: &str = "theme";

#[async_trait]
pub trait ThemeService: Send + Sync {
    /// Current theme; unset or unknown values read as the default theme
    async fn current(&self) -> AppResult<Theme>;

    /// Persist and announce a new theme
    async fn set(&self, theme: Theme) -> AppResult<Theme>;
}

pub struct ThemeManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> ThemeManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }
}

#[async_trait]
impl<U: UnitOfWork> ThemeService for ThemeManager<U> {
    async fn current(&self) -> AppResult<Theme> {
        let stored = self.uow.reader().settings().get(THEME_KEY).await?;

        Ok(match stored {
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "Unknown stored theme, using default");
                Theme::default()
            }),
            None => Theme::default(),
        })
    }

    async fn set(&self, theme: Theme) -> AppResult<Theme> {
        self.uow
            .reader()
            .settings()
            .set(THEME_KEY, theme.as_str())
            .await?;

        tracing::info!(theme = %theme, "Theme changed");
        self.events.publish(DirectoryEvent::ThemeChange(theme));
        Ok(theme)
    }
}
