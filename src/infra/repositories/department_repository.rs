//! Department queries, usable on a plain connection or inside a transaction.

use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::department::{self, ActiveModel, Entity as DepartmentEntity};
use crate::domain::Department;
use crate::errors::{AppError, AppResult};

pub struct DepartmentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All departments ordered by name
    pub async fn list(&self) -> AppResult<Vec<Department>> {
        let models = DepartmentEntity::find()
            .order_by_asc(department::Column::Name)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(Department::from).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Department>> {
        let result = DepartmentEntity::find_by_id(id).one(self.db).await?;
        Ok(result.map(Department::from))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let result = DepartmentEntity::find()
            .filter(department::Column::Name.eq(name))
            .one(self.db)
            .await?;

        Ok(result.map(Department::from))
    }

    pub async fn create(&self, name: String) -> AppResult<Department> {
        let model = ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Department::from(model))
    }

    pub async fn rename(&self, id: i32, name: String) -> AppResult<Department> {
        let existing = DepartmentEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);

        let model = active.update(self.db).await?;
        Ok(Department::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = DepartmentEntity::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Look the department up by its unique name, inserting it when absent.
    ///
    /// A concurrent insert of the same name is absorbed by the unique index.
    pub async fn find_or_create_by_name(&self, name: &str) -> AppResult<Department> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let row = ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        DepartmentEntity::insert(row)
            .on_conflict(
                OnConflict::column(department::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        tracing::debug!(department = %name, "Department created");

        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::internal(format!("department '{name}' vanished after insert")))
    }
}
