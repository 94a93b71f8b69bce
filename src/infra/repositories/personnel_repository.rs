//! Personnel queries.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::personnel::{self, ActiveModel, Entity as PersonnelEntity};
use super::entities::personnel_extension;
use crate::domain::{NewPersonnel, Personnel, PersonnelChanges};
use crate::errors::{AppError, AppResult};

pub struct PersonnelRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PersonnelRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Everyone, in insertion order
    pub async fn list(&self) -> AppResult<Vec<Personnel>> {
        let models = PersonnelEntity::find()
            .order_by_asc(personnel::Column::Id)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Personnel::from).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Personnel>> {
        let result = PersonnelEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Personnel::from))
    }

    /// Names are not unique; the oldest record wins.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Personnel>> {
        let result = PersonnelEntity::find()
            .filter(personnel::Column::Name.eq(name))
            .order_by_asc(personnel::Column::Id)
            .one(self.db)
            .await?;

        Ok(result.map(Personnel::from))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Personnel>> {
        let result = PersonnelEntity::find()
            .filter(personnel::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(result.map(Personnel::from))
    }

    pub async fn create(&self, new: NewPersonnel) -> AppResult<Personnel> {
        let model = ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            description: Set(new.description),
            photo_url: Set(new.photo_url),
            in_carousel: Set(new.in_carousel),
            birth_date: Set(new.birth_date),
            position_id: Set(new.position_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Personnel::from(model))
    }

    /// Apply a partial update; untouched fields keep their stored value.
    pub async fn update(&self, id: i32, changes: PersonnelChanges) -> AppResult<Personnel> {
        let existing = PersonnelEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if changes.is_empty() {
            return Ok(Personnel::from(existing));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(position_id) = changes.position_id {
            active.position_id = Set(position_id);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(photo_url) = changes.photo_url {
            active.photo_url = Set(photo_url);
        }
        if let Some(in_carousel) = changes.in_carousel {
            active.in_carousel = Set(in_carousel);
        }
        if let Some(birth_date) = changes.birth_date {
            active.birth_date = Set(birth_date);
        }

        let model = active.update(self.db).await?;
        Ok(Personnel::from(model))
    }

    /// Remove the person and their individual extension links.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        personnel_extension::Entity::delete_many()
            .filter(personnel_extension::Column::PersonnelId.eq(id))
            .exec(self.db)
            .await?;

        let result = PersonnelEntity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn count_by_position(&self, position_id: i32) -> AppResult<u64> {
        PersonnelEntity::find()
            .filter(personnel::Column::PositionId.eq(position_id))
            .count(self.db)
            .await
            .map_err(AppError::from)
    }
}
