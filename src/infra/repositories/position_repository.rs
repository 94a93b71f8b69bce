//! Position queries. Positions are unique per (name, department).

use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::position::{self, ActiveModel, Entity as PositionEntity};
use crate::domain::Position;
use crate::errors::{AppError, AppResult};

pub struct PositionRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PositionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Position>> {
        let models = PositionEntity::find()
            .order_by_asc(position::Column::Name)
            .order_by_asc(position::Column::Id)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Position::from).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Position>> {
        let result = PositionEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Position::from))
    }

    /// Look up by natural key
    pub async fn find(&self, name: &str, department_id: i32) -> AppResult<Option<Position>> {
        let result = PositionEntity::find()
            .filter(position::Column::Name.eq(name))
            .filter(position::Column::DepartmentId.eq(department_id))
            .one(self.db)
            .await?;

        Ok(result.map(Position::from))
    }

    pub async fn create(&self, name: String, department_id: i32) -> AppResult<Position> {
        let model = ActiveModel {
            name: Set(name),
            department_id: Set(department_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Position::from(model))
    }

    pub async fn update(&self, id: i32, name: String, department_id: i32) -> AppResult<Position> {
        let existing = PositionEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        active.department_id = Set(department_id);

        let model = active.update(self.db).await?;
        Ok(Position::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = PositionEntity::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn find_or_create(&self, name: &str, department_id: i32) -> AppResult<Position> {
        if let Some(existing) = self.find(name, department_id).await? {
            return Ok(existing);
        }

        let row = ActiveModel {
            name: Set(name.to_string()),
            department_id: Set(department_id),
            ..Default::default()
        };
        PositionEntity::insert(row)
            .on_conflict(
                OnConflict::columns([position::Column::Name, position::Column::DepartmentId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        tracing::debug!(position = %name, department_id, "Position created");

        self.find(name, department_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("position '{name}' vanished after insert")))
    }

    pub async fn count_by_department(&self, department_id: i32) -> AppResult<u64> {
        PositionEntity::find()
            .filter(position::Column::DepartmentId.eq(department_id))
            .count(self.db)
            .await
            .map_err(AppError::from)
    }
}
