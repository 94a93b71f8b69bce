//! Extension service - CRUD for the extension registry.

use async_trait::async_trait;
use std::sync::Arc;

use super::directory::DirectorySnapshot;
use crate::domain::{Extension, ExtensionStatus};
use crate::errors::{AppError, AppResult};
use crate::infra::{DirectoryEvent, EventBroadcaster, TransactionContext, UnitOfWork};

#[derive(Debug, Clone)]
pub struct ExtensionInput {
    pub number: String,
    /// `None` registers a global extension
    pub department_id: Option<i32>,
}

#[async_trait]
pub trait ExtensionService: Send + Sync {
    /// Extensions with department and occupancy
    async fn list(&self) -> AppResult<Vec<ExtensionStatus>>;

    async fn create(&self, input: ExtensionInput) -> AppResult<Extension>;

    async fn update(&self, id: i32, input: ExtensionInput) -> AppResult<Extension>;

    /// Delete an extension and every link to it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ExtensionManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
}

impl<U: UnitOfWork> ExtensionManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster) -> Self {
        Self { uow, events }
    }
}

fn clean(input: ExtensionInput) -> AppResult<ExtensionInput> {
    let number = input.number.trim().to_string();
    if number.is_empty() {
        return Err(AppError::validation("El número de extensión es requerido."));
    }
    Ok(ExtensionInput { number, ..input })
}

async fn check_references(
    ctx: &TransactionContext<'_>,
    input: &ExtensionInput,
    except: Option<i32>,
) -> AppResult<()> {
    if let Some(department_id) = input.department_id {
        if ctx.departments().find_by_id(department_id).await?.is_none() {
            return Err(AppError::validation("El departamento indicado no existe."));
        }
    }

    let existing = ctx.extensions().find_by_number(&input.number).await?;
    if existing.is_some_and(|e| Some(e.id) != except) {
        return Err(AppError::conflict("La extensión ya existe."));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> ExtensionService for ExtensionManager<U> {
    async fn list(&self) -> AppResult<Vec<ExtensionStatus>> {
        let snapshot = DirectorySnapshot::load(&self.uow.reader()).await?;
        Ok(snapshot.extension_statuses())
    }

    async fn create(&self, input: ExtensionInput) -> AppResult<Extension> {
        let input = clean(input)?;

        let extension = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    check_references(&ctx, &input, None).await?;
                    ctx.extensions()
                        .create(input.number, input.department_id)
                        .await
                })
            })
            .await?;

        tracing::info!(extension_id = extension.id, number = %extension.number, "Extension created");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(extension)
    }

    async fn update(&self, id: i32, input: ExtensionInput) -> AppResult<Extension> {
        let input = clean(input)?;

        let extension = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    check_references(&ctx, &input, Some(id)).await?;
                    ctx.extensions()
                        .update(id, input.number, input.department_id)
                        .await
                })
            })
            .await?;

        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(extension)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { ctx.extensions().delete(id).await }))
            .await?;

        tracing::info!(extension_id = id, "Extension deleted");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(())
    }
}
