//! Announcement service - the "important info" board.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Announcement;
use crate::errors::{AppError, AppResult};
use crate::infra::{DirectoryEvent, EventBroadcaster, UnitOfWork};

#[derive(Debug, Clone)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: Option<String>,
    pub extension: Option<String>,
}

impl AnnouncementInput {
    fn clean(self) -> AppResult<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("El título es requerido."));
        }
        Ok(Self {
            title,
            content: trimmed(self.content),
            extension: trimmed(self.extension),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
pub trait AnnouncementService: Send + Sync {
    /// Newest first
    async fn list(&self) -> AppResult<Vec<Announcement>>;

    async fn create(&self, input: AnnouncementInput) -> AppResult<Announcement>;

    async fn update(&self, id: i32, input: AnnouncementInput) -> AppResult<Announcement>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct AnnouncementManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> AnnouncementManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }
}

#[async_trait]
impl<U: UnitOfWork> AnnouncementService for AnnouncementManager<U> {
    async fn list(&self) -> AppResult<Vec<Announcement>> {
        self.uow.reader().announcements().list().await
    }

    async fn create(&self, input: AnnouncementInput) -> AppResult<Announcement> {
        let input = input.clean()?;
        let announcement = self
            .uow
            .reader()
            .announcements()
            .create(input.title, input.content, input.extension)
            .await?;

        tracing::info!(announcement_id = announcement.id, "Announcement created");
        self.events.publish(DirectoryEvent::ImportantInfoUpdate);
        Ok(announcement)
    }

    async fn update(&self, id: i32, input: AnnouncementInput) -> AppResult<Announcement> {
        let input = input.clean()?;
        let announcement = self
            .uow
            .reader()
            .announcements()
            .update(id, input.title, input.content, input.extension)
            .await?;

        self.events.publish(DirectoryEvent::ImportantInfoUpdate);
        Ok(announcement)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow.reader().announcements().delete(id).await?;

        tracing::info!(announcement_id = id, "Announcement deleted");
        self.events.publish(DirectoryEvent::ImportantInfoUpdate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_requires_title() {
        let input = AnnouncementInput {
            title: "  ".into(),
            content: Some("texto".into()),
            extension: None,
        };
        assert!(matches!(input.clean(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_clean_blanks_become_none() {
        let input = AnnouncementInput {
            title: " Aviso ".into(),
            content: Some("   ".into()),
            extension: Some(" 305 ".into()),
        }
        .clean()
        .unwrap();

        assert_eq!(input.title, "Aviso");
        assert_eq!(input.content, None);
        assert_eq!(input.extension.as_deref(), Some("305"));
    }
}
