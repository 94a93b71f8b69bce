//! Position service - CRUD for positions and their extension link.

use async_trait::async_trait;
use std::sync::Arc;

use super::directory::DirectorySnapshot;
use crate::domain::{ensure_assignable_to_position, Position, PositionView};
use crate::errors::{AppError, AppResult};
use crate::infra::{DirectoryEvent, EventBroadcaster, TransactionContext, UnitOfWork};

/// Create/update payload. On update `extension_id = None` removes the link.
#[derive(Debug, Clone)]
pub struct PositionInput {
    pub name: String,
    pub department_id: i32,
    pub extension_id: Option<i32>,
}

#[async_trait]
pub trait PositionService: Send + Sync {
    /// Positions with department, extension and head count
    async fn list(&self) -> AppResult<Vec<PositionView>>;

    async fn create(&self, input: PositionInput) -> AppResult<Position>;

    async fn update(&self, id: i32, input: PositionInput) -> AppResult<Position>;

    /// Delete an unoccupied position
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct PositionManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> PositionManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }
}

fn clean(input: PositionInput) -> AppResult<PositionInput> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("El nombre del puesto es requerido."));
    }
    Ok(PositionInput { name, ..input })
}

/// Checks shared by create and update, run inside the writing transaction.
async fn check_references(
    ctx: &TransactionContext<'_>,
    input: &PositionInput,
    except: Option<i32>,
) -> AppResult<()> {
    if ctx.departments().find_by_id(input.department_id).await?.is_none() {
        return Err(AppError::validation("El departamento indicado no existe."));
    }

    let existing = ctx.positions().find(&input.name, input.department_id).await?;
    if existing.is_some_and(|p| Some(p.id) != except) {
        return Err(AppError::conflict("El puesto ya existe en este departamento."));
    }

    if let Some(extension_id) = input.extension_id {
        if ctx.extensions().find_by_id(extension_id).await?.is_none() {
            return Err(AppError::validation("La extensión indicada no existe."));
        }
    }
    Ok(())
}

async fn link_extension(
    ctx: &TransactionContext<'_>,
    position_id: i32,
    extension_id: Option<i32>,
) -> AppResult<()> {
    match extension_id {
        Some(extension_id) => {
            let links = ctx.extensions().links(extension_id).await?;
            ensure_assignable_to_position(&links, position_id)?;
            ctx.extensions()
                .attach_to_position(position_id, extension_id)
                .await
        }
        None => ctx.extensions().detach_position(position_id).await,
    }
}

#[async_trait]
impl<U: UnitOfWork> PositionService for PositionManager<U> {
    async fn list(&self) -> AppResult<Vec<PositionView>> {
        let snapshot = DirectorySnapshot::load(&self.uow.reader()).await?;
        Ok(snapshot.position_views())
    }

    async fn create(&self, input: PositionInput) -> AppResult<Position> {
        let input = clean(input)?;

        let position = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    check_references(&ctx, &input, None).await?;
                    let position = ctx
                        .positions()
                        .create(input.name, input.department_id)
                        .await?;
                    if input.extension_id.is_some() {
                        link_extension(&ctx, position.id, input.extension_id).await?;
                    }
                    Ok(position)
                })
            })
            .await?;

        tracing::info!(position_id = position.id, "Position created");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(position)
    }

    async fn update(&self, id: i32, input: PositionInput) -> AppResult<Position> {
        let input = clean(input)?;

        let position = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.positions().find_by_id(id).await?.is_none() {
                        return Err(AppError::NotFound);
                    }
                    check_references(&ctx, &input, Some(id)).await?;
                    let position = ctx
                        .positions()
                        .update(id, input.name, input.department_id)
                        .await?;
                    link_extension(&ctx, id, input.extension_id).await?;
                    Ok(position)
                })
            })
            .await?;

        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(position)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.positions().find_by_id(id).await?.is_none() {
                        return Err(AppError::NotFound);
                    }
                    if ctx.personnel().count_by_position(id).await? > 0 {
                        return Err(AppError::conflict(
                            "No se puede eliminar el puesto porque tiene personal asignado.",
                        ));
                    }
                    ctx.extensions().detach_position(id).await?;
                    ctx.positions().delete(id).await
                })
            })
            .await?;

        tracing::info!(position_id = id, "Position deleted");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(())
    }
}
