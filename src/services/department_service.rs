//! Department service - CRUD for departments.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Department;
use crate::errors::{AppError, AppResult};
use crate::infra::{DirectoryEvent, EventBroadcaster, UnitOfWork};

#[async_trait]
pub trait DepartmentService: Send + Sync {
    /// All departments ordered by name
    async fn list(&self) -> AppResult<Vec<Department>>;

    async fn create(&self, name: String) -> AppResult<Department>;

    async fn rename(&self, id: i32, name: String) -> AppResult<Department>;

    /// Delete a department that no position references
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct DepartmentManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> DepartmentManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("El nombre del departamento es requerido."));
    }
    Ok(name.to_string())
}

#[async_trait]
impl<U: UnitOfWork> DepartmentService for DepartmentManager<U> {
    async fn list(&self) -> AppResult<Vec<Department>> {
        self.uow.reader().departments().list().await
    }

    async fn create(&self, name: String) -> AppResult<Department> {
        let name = clean_name(&name)?;

        let department = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.departments().find_by_name(&name).await?.is_some() {
                        return Err(AppError::conflict("El departamento ya existe."));
                    }
                    ctx.departments().create(name).await
                })
            })
            .await?;

        tracing::info!(department_id = department.id, "Department created");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(department)
    }

    async fn rename(&self, id: i32, name: String) -> AppResult<Department> {
        let name = clean_name(&name)?;

        let department = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let existing = ctx.departments().find_by_name(&name).await?;
                    if existing.is_some_and(|other| other.id != id) {
                        return Err(AppError::conflict("El departamento ya existe."));
                    }
                    ctx.departments().rename(id, name).await
                })
            })
            .await?;

        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(department)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.departments().find_by_id(id).await?.is_none() {
                        return Err(AppError::NotFound);
                    }
                    if ctx.positions().count_by_department(id).await? > 0 {
                        return Err(AppError::conflict(
                            "No se puede eliminar el departamento porque tiene puestos asociados.",
                        ));
                    }
                    ctx.departments().delete(id).await
                })
            })
            .await?;

        tracing::info!(department_id = id, "Department deleted");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(())
    }
}
