//! Personnel service - staff records, photos, individual extensions and the
//! public directory views.

use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;

use super::directory::DirectorySnapshot;
use crate::domain::personnel::{is_valid_email, is_valid_photo_url, parse_birth_date, parse_flag};
use crate::domain::search::fold;
use crate::domain::{
    ensure_assignable_to_personnel, BirthdayEntry, DirectoryEntry, NewPersonnel, Personnel,
    PersonnelChanges,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{DirectoryEvent, EventBroadcaster, PhotoStorage, TransactionContext, UnitOfWork};
use crate::types::DirectoryQuery;

/// Image received with a personnel form.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Personnel form as submitted. Fields never sent stay `None`; blank
/// nullable fields clear the stored value.
#[derive(Debug, Clone, Default)]
pub struct PersonnelForm {
    pub changes: PersonnelChanges,
    pub photo: Option<PhotoUpload>,
}

impl PersonnelForm {
    /// Apply one text field of the multipart form.
    pub fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        let value = value.trim();
        let changes = &mut self.changes;

        match name {
            "nombre" => changes.name = Some(value.to_string()),
            "correo" => changes.email = Some(value.to_string()),
            "puesto_id" => {
                let position_id = match value {
                    "" | "null" => None,
                    raw => Some(
                        raw.parse::<i32>()
                            .map_err(|_| AppError::validation("Puesto inválido."))?,
                    ),
                };
                changes.position_id = Some(position_id);
            }
            "descripcion" => changes.description = Some(non_blank(value)),
            "fotoUrl" => changes.photo_url = Some(non_blank(value)),
            "en_carrusel" => {
                let flag = parse_flag(value)
                    .ok_or_else(|| AppError::validation("Valor de carrusel inválido."))?;
                changes.in_carousel = Some(flag);
            }
            "fecha_nacimiento" => {
                let date = match value {
                    "" => None,
                    raw => Some(parse_birth_date(raw).ok_or_else(|| {
                        AppError::validation("Fecha de nacimiento inválida.")
                    })?),
                };
                changes.birth_date = Some(date);
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Field checks that do not need the database.
fn validate(changes: &PersonnelChanges) -> AppResult<()> {
    if changes.name.as_deref().is_some_and(str::is_empty) {
        return Err(AppError::validation("El nombre es requerido."));
    }
    if let Some(email) = &changes.email {
        if !is_valid_email(email) {
            return Err(AppError::validation("El correo electrónico no es válido."));
        }
    }
    if let Some(Some(url)) = &changes.photo_url {
        if !is_valid_photo_url(url) {
            return Err(AppError::validation("La URL de la foto no es válida."));
        }
    }
    Ok(())
}

/// Position and email checks, run inside the writing transaction.
async fn check_references(
    ctx: &TransactionContext<'_>,
    changes: &PersonnelChanges,
    except: Option<i32>,
) -> AppResult<()> {
    if let Some(Some(position_id)) = changes.position_id {
        if ctx.positions().find_by_id(position_id).await?.is_none() {
            return Err(AppError::validation("El puesto indicado no existe."));
        }
    }
    if let Some(email) = &changes.email {
        let existing = ctx.personnel().find_by_email(email).await?;
        if existing.is_some_and(|p| Some(p.id) != except) {
            return Err(AppError::conflict("El correo electrónico ya está registrado."));
        }
    }
    Ok(())
}

#[async_trait]
pub trait PersonnelService: Send + Sync {
    /// Everyone with position, department and effective extension resolved
    async fn list(&self) -> AppResult<Vec<DirectoryEntry>>;

    async fn create(&self, form: PersonnelForm) -> AppResult<Personnel>;

    async fn update(&self, id: i32, form: PersonnelForm) -> AppResult<Personnel>;

    /// Delete a person, their extension links and their stored photo
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Replace the person's individual extension; `None` clears it.
    async fn assign_extension(&self, id: i32, extension_id: Option<i32>) -> AppResult<()>;

    /// One page of the public directory, optionally filtered
    async fn page(&self, query: DirectoryQuery) -> AppResult<Vec<DirectoryEntry>>;

    /// Number of entries matching `term` (all when `None`)
    async fn count(&self, term: Option<String>) -> AppResult<u64>;

    /// Entries matching `term`, ordered by name
    async fn search(&self, term: String) -> AppResult<Vec<DirectoryEntry>>;

    /// Entries flagged for the home page carousel
    async fn carousel(&self) -> AppResult<Vec<DirectoryEntry>>;

    /// People born in `month`, ordered by day
    async fn birthdays(&self, month: u32) -> AppResult<Vec<BirthdayEntry>>;
}

pub struct PersonnelManager<U: UnitOfWork> {
    uow: Arc<U>,
    events: EventBroadcaster,
    storage: PhotoStorage,
}

impl<U: UnitOfWork> PersonnelManager<U> {
    pub fn new(uow: Arc<U>, events: EventBroadcaster, storage: PhotoStorage) -> Self {
        Self {
            uow,
            events,
            storage,
        }
    }

    async fn entries(&self) -> AppResult<Vec<DirectoryEntry>> {
        let snapshot = DirectorySnapshot::load(&self.uow.reader()).await?;
        Ok(snapshot.entries())
    }

    async fn matching(&self, term: Option<&str>) -> AppResult<Vec<DirectoryEntry>> {
        let folded = term.map(fold).unwrap_or_default();
        let mut entries = self.entries().await?;
        entries.retain(|entry| entry.matches(&folded));
        Ok(entries)
    }

    /// Store the uploaded photo, if any, and point the changes at it.
    async fn store_photo(&self, form: &mut PersonnelForm) -> AppResult<Option<String>> {
        let Some(photo) = form.photo.take() else {
            return Ok(None);
        };
        let url = self
            .storage
            .save(
                photo.file_name.as_deref(),
                photo.content_type.as_deref(),
                &photo.bytes,
            )
            .await?;
        form.changes.photo_url = Some(Some(url.clone()));
        Ok(Some(url))
    }

    /// Drop a freshly stored photo when the write that needed it failed.
    async fn discard_photo<T>(&self, stored: Option<String>, result: AppResult<T>) -> AppResult<T> {
        if result.is_err() {
            if let Some(url) = stored {
                self.storage.remove(&url).await;
            }
        }
        result
    }
}

#[async_trait]
impl<U: UnitOfWork> PersonnelService for PersonnelManager<U> {
    async fn list(&self) -> AppResult<Vec<DirectoryEntry>> {
        self.entries().await
    }

    async fn create(&self, mut form: PersonnelForm) -> AppResult<Personnel> {
        let (Some(name), Some(email)) = (&form.changes.name, &form.changes.email) else {
            return Err(AppError::validation("El nombre y el correo son requeridos."));
        };
        if name.is_empty() || email.is_empty() {
            return Err(AppError::validation("El nombre y el correo son requeridos."));
        }
        validate(&form.changes)?;

        let stored = self.store_photo(&mut form).await?;
        let changes = form.changes;

        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    check_references(&ctx, &changes, None).await?;
                    let new = NewPersonnel {
                        name: changes.name.unwrap_or_default(),
                        email: changes.email.unwrap_or_default(),
                        position_id: changes.position_id.flatten(),
                        description: changes.description.flatten(),
                        photo_url: changes.photo_url.flatten(),
                        in_carousel: changes.in_carousel.unwrap_or(false),
                        birth_date: changes.birth_date.flatten(),
                    };
                    ctx.personnel().create(new).await
                })
            })
            .await;
        let person = self.discard_photo(stored, result).await?;

        tracing::info!(personnel_id = person.id, "Personnel created");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(person)
    }

    async fn update(&self, id: i32, mut form: PersonnelForm) -> AppResult<Personnel> {
        validate(&form.changes)?;

        let stored = self.store_photo(&mut form).await?;
        let changes = form.changes;

        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let current = ctx.personnel().find_by_id(id).await?.ok_or_not_found()?;
                    check_references(&ctx, &changes, Some(id)).await?;

                    let replaced_photo = match &changes.photo_url {
                        Some(new_url) if *new_url != current.photo_url => current.photo_url,
                        _ => None,
                    };
                    let person = ctx.personnel().update(id, changes).await?;
                    Ok((person, replaced_photo))
                })
            })
            .await;
        let (person, replaced_photo) = self.discard_photo(stored, result).await?;

        if let Some(old) = replaced_photo {
            self.storage.remove(&old).await;
        }

        tracing::info!(personnel_id = id, "Personnel updated");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(person)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let removed = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let person = ctx.personnel().find_by_id(id).await?.ok_or_not_found()?;
                    ctx.personnel().delete(id).await?;
                    Ok(person)
                })
            })
            .await?;

        if let Some(url) = &removed.photo_url {
            self.storage.remove(url).await;
        }

        tracing::info!(personnel_id = id, "Personnel deleted");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(())
    }

    async fn assign_extension(&self, id: i32, extension_id: Option<i32>) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.personnel().find_by_id(id).await?.ok_or_not_found()?;

                    if let Some(extension_id) = extension_id {
                        if ctx.extensions().find_by_id(extension_id).await?.is_none() {
                            return Err(AppError::validation("La extensión indicada no existe."));
                        }
                        let links = ctx.extensions().links(extension_id).await?;
                        ensure_assignable_to_personnel(&links)?;
                    }
                    ctx.extensions()
                        .replace_personnel_extensions(id, extension_id)
                        .await
                })
            })
            .await?;

        tracing::info!(personnel_id = id, ?extension_id, "Individual extension assigned");
        self.events.publish(DirectoryEvent::StaffUpdate);
        Ok(())
    }

    async fn page(&self, query: DirectoryQuery) -> AppResult<Vec<DirectoryEntry>> {
        let entries = self.matching(query.term()).await?;

        Ok(entries
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect())
    }

    async fn count(&self, term: Option<String>) -> AppResult<u64> {
        let term = term.as_deref().map(str::trim).filter(|t| !t.is_empty());
        Ok(self.matching(term).await?.len() as u64)
    }

    async fn search(&self, term: String) -> AppResult<Vec<DirectoryEntry>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::validation("El término de búsqueda (q) es requerido."));
        }

        let mut entries = self.matching(Some(term)).await?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn carousel(&self) -> AppResult<Vec<DirectoryEntry>> {
        let mut entries = self.entries().await?;
        entries.retain(|entry| entry.in_carousel);
        Ok(entries)
    }

    async fn birthdays(&self, month: u32) -> AppResult<Vec<BirthdayEntry>> {
        let mut people: Vec<BirthdayEntry> = self
            .uow
            .reader()
            .personnel()
            .list()
            .await?
            .into_iter()
            .filter(|person| person.has_birthday_in(month))
            .filter_map(|person| {
                let birth_date = person.birth_date?;
                Some(BirthdayEntry {
                    id: person.id,
                    name: person.name,
                    birth_date,
                })
            })
            .collect();

        people.sort_by_key(|entry| (entry.birth_date.day(), entry.id));
        Ok(people)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_form_fields() {
        let mut form = PersonnelForm::default();
        form.set_field("nombre", "  Ana López ").unwrap();
        form.set_field("puesto_id", "4").unwrap();
        form.set_field("descripcion", "").unwrap();
        form.set_field("en_carrusel", "true").unwrap();
        form.set_field("fecha_nacimiento", "17/05/1990").unwrap();

        let changes = form.changes;
        assert_eq!(changes.name.as_deref(), Some("Ana López"));
        assert_eq!(changes.position_id, Some(Some(4)));
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.in_carousel, Some(true));
        assert_eq!(changes.birth_date, Some(NaiveDate::from_ymd_opt(1990, 5, 17)));
        assert_eq!(changes.email, None);
    }

    #[test]
    fn test_form_clears_position() {
        let mut form = PersonnelForm::default();
        form.set_field("puesto_id", "").unwrap();
        assert_eq!(form.changes.position_id, Some(None));
    }

    #[test]
    fn test_form_rejects_bad_values() {
        let mut form = PersonnelForm::default();
        assert!(form.set_field("puesto_id", "abc").is_err());
        assert!(form.set_field("en_carrusel", "quizás").is_err());
        assert!(form.set_field("fecha_nacimiento", "ayer").is_err());
    }

    #[test]
    fn test_validate() {
        let ok = PersonnelChanges {
            name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            photo_url: Some(Some("/uploads/abc.png".into())),
            ..Default::default()
        };
        assert!(validate(&ok).is_ok());

        let bad_email = PersonnelChanges {
            email: Some("ana-at-example".into()),
            ..Default::default()
        };
        assert!(matches!(validate(&bad_email), Err(AppError::Validation(_))));

        let bad_photo = PersonnelChanges {
            photo_url: Some(Some("javascript:alert(1)".into())),
            ..Default::default()
        };
        assert!(validate(&bad_photo).is_err());
    }
}
