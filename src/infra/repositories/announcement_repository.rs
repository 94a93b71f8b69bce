//! Announcement queries.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use super::entities::announcement::{self, ActiveModel, Entity as AnnouncementEntity};
use crate::domain::Announcement;
use crate::errors::{AppError, AppResult};

pub struct AnnouncementRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AnnouncementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Newest first
    pub async fn list(&self) -> AppResult<Vec<Announcement>> {
        let models = AnnouncementEntity::find()
            .order_by_desc(announcement::Column::Id)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Announcement::from).collect())
    }

    pub async fn create(
        &self,
        title: String,
        content: Option<String>,
        extension: Option<String>,
    ) -> AppResult<Announcement> {
        let model = ActiveModel {
            title: Set(title),
            content: Set(content),
            extension: Set(extension),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Announcement::from(model))
    }

    pub async fn update(
        &self,
        id: i32,
        title: String,
        content: Option<String>,
        extension: Option<String>,
    ) -> AppResult<Announcement> {
        let existing = AnnouncementEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(title);
        active.content = Set(content);
        active.extension = Set(extension);

        let model = active.update(self.db).await?;
        Ok(Announcement::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = AnnouncementEntity::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
