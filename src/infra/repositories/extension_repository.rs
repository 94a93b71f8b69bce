//! Extension queries and the two link tables that record who holds them.

use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::extension::{self, ActiveModel, Entity as ExtensionEntity};
use super::entities::{personnel_extension, position_extension};
use crate::domain::{Extension, ExtensionLinks};
use crate::errors::{AppError, AppResult};

pub struct ExtensionRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ExtensionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    // =========================================================================
    // Extension rows
    // =========================================================================

    /// All extensions ordered by number
    pub async fn list(&self) -> AppResult<Vec<Extension>> {
        let models = ExtensionEntity::find()
            .order_by_asc(extension::Column::Number)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Extension::from).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Extension>> {
        let result = ExtensionEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Extension::from))
    }

    pub async fn find_by_number(&self, number: &str) -> AppResult<Option<Extension>> {
        let result = ExtensionEntity::find()
            .filter(extension::Column::Number.eq(number))
            .one(self.db)
            .await?;

        Ok(result.map(Extension::from))
    }

    pub async fn create(&self, number: String, department_id: Option<i32>) -> AppResult<Extension> {
        let model = ActiveModel {
            number: Set(number),
            department_id: Set(department_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Extension::from(model))
    }

    pub async fn update(
        &self,
        id: i32,
        number: String,
        department_id: Option<i32>,
    ) -> AppResult<Extension> {
        let existing = ExtensionEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.number = Set(number);
        active.department_id = Set(department_id);

        let model = active.update(self.db).await?;
        Ok(Extension::from(model))
    }

    /// Remove the extension together with every link that references it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        position_extension::Entity::delete_many()
            .filter(position_extension::Column::ExtensionId.eq(id))
            .exec(self.db)
            .await?;
        personnel_extension::Entity::delete_many()
            .filter(personnel_extension::Column::ExtensionId.eq(id))
            .exec(self.db)
            .await?;

        let result = ExtensionEntity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Look the extension up by number, creating it under `department_id`
    /// when absent. An existing extension keeps its department.
    pub async fn find_or_create_by_number(
        &self,
        number: &str,
        department_id: Option<i32>,
    ) -> AppResult<Extension> {
        if let Some(existing) = self.find_by_number(number).await? {
            return Ok(existing);
        }

        let row = ActiveModel {
            number: Set(number.to_string()),
            department_id: Set(department_id),
            ..Default::default()
        };
        ExtensionEntity::insert(row)
            .on_conflict(
                OnConflict::column(extension::Column::Number)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        tracing::debug!(extension = %number, ?department_id, "Extension created");

        self.find_by_number(number)
            .await?
            .ok_or_else(|| AppError::internal(format!("extension '{number}' vanished after insert")))
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Current holders of one extension.
    pub async fn links(&self, extension_id: i32) -> AppResult<ExtensionLinks> {
        let position_ids = position_extension::Entity::find()
            .filter(position_extension::Column::ExtensionId.eq(extension_id))
            .order_by_asc(position_extension::Column::PositionId)
            .all(self.db)
            .await?
            .into_iter()
            .map(|link| link.position_id)
            .collect();

        let personnel_count = personnel_extension::Entity::find()
            .filter(personnel_extension::Column::ExtensionId.eq(extension_id))
            .count(self.db)
            .await?;

        Ok(ExtensionLinks {
            position_ids,
            personnel_count,
        })
    }

    /// Make `extension_id` the position's only extension. Re-attaching the
    /// same pair is a no-op.
    pub async fn attach_to_position(&self, position_id: i32, extension_id: i32) -> AppResult<()> {
        position_extension::Entity::delete_many()
            .filter(position_extension::Column::PositionId.eq(position_id))
            .filter(position_extension::Column::ExtensionId.ne(extension_id))
            .exec(self.db)
            .await?;

        let link = position_extension::ActiveModel {
            position_id: Set(position_id),
            extension_id: Set(extension_id),
        };
        position_extension::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    position_extension::Column::PositionId,
                    position_extension::Column::ExtensionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    pub async fn detach_position(&self, position_id: i32) -> AppResult<()> {
        position_extension::Entity::delete_many()
            .filter(position_extension::Column::PositionId.eq(position_id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Replace the person's individual links with `extension_id`, or clear
    /// them when `None`.
    pub async fn replace_personnel_extensions(
        &self,
        personnel_id: i32,
        extension_id: Option<i32>,
    ) -> AppResult<()> {
        personnel_extension::Entity::delete_many()
            .filter(personnel_extension::Column::PersonnelId.eq(personnel_id))
            .exec(self.db)
            .await?;

        if let Some(extension_id) = extension_id {
            let link = personnel_extension::ActiveModel {
                personnel_id: Set(personnel_id),
                extension_id: Set(extension_id),
            };
            personnel_extension::Entity::insert(link)
                .exec_without_returning(self.db)
                .await?;
        }

        Ok(())
    }

    /// Every (position_id, extension_id) pair.
    pub async fn all_position_links(&self) -> AppResult<Vec<(i32, i32)>> {
        let links = position_extension::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|link| (link.position_id, link.extension_id))
            .collect();

        Ok(links)
    }

    /// Every (personnel_id, extension_id) pair.
    pub async fn all_personnel_links(&self) -> AppResult<Vec<(i32, i32)>> {
        let links = personnel_extension::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|link| (link.personnel_id, link.extension_id))
            .collect();

        Ok(links)
    }
}
