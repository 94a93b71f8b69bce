//! Multipart form extractors for photo uploads and CSV imports.

use axum::{
    async_trait,
    extract::{
        multipart::{Field, MultipartError},
        FromRequest, Multipart, Request,
    },
    http::StatusCode,
};

use crate::config::CSV_FIELD_NAME;
use crate::errors::AppError;
use crate::services::{PersonnelForm, PhotoUpload};

/// Multipart field carrying the personnel photo
const PHOTO_FIELD_NAME: &str = "photo";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("El archivo supera el tamaño máximo permitido.".into())
    } else {
        AppError::bad_request(err.body_text())
    }
}

async fn open(req: Request) -> Result<Multipart, AppError> {
    Multipart::from_request(req, &())
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))
}

async fn read_bytes(field: Field<'_>) -> Result<Vec<u8>, AppError> {
    field
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(multipart_error)
}

/// The `csvFile` part of a bulk upload.
pub struct CsvUpload(pub Vec<u8>);

#[async_trait]
impl<S> FromRequest<S> for CsvUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = open(req).await?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() == Some(CSV_FIELD_NAME) {
                return Ok(CsvUpload(read_bytes(field).await?));
            }
        }

        Err(AppError::bad_request("No se ha subido ningún archivo CSV."))
    }
}

/// Personnel create/update form with an optional `photo` file.
pub struct PersonnelMultipart(pub PersonnelForm);

#[async_trait]
impl<S> FromRequest<S> for PersonnelMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = open(req).await?;
        let mut form = PersonnelForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PHOTO_FIELD_NAME {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = read_bytes(field).await?;
                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.photo = Some(PhotoUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.set_field(&name, &value)?;
            }
        }

        Ok(PersonnelMultipart(form))
    }
}
