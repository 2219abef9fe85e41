//! # Template Retrieval Service
//!
//! Read-only endpoints: a single template (`GET /api/templates/{template_id}`),
//! every template (`GET /api/templates`), and the stored base image of a
//! template (`GET /api/templates/{template_id}/image`), which the editor uses
//! as its canvas background.

use crate::error::ServiceError;
use crate::services::AppState;
use crate::storage::StorageError;
use actix_files::NamedFile;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use std::io;

/// `200` with the template as JSON, `404` if the id is unknown.
pub async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    match state.store.fetch_by_id(&template_id) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => ServiceError::from(e).error_response(),
    }
}

pub async fn list(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_all() {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => ServiceError::from(e).error_response(),
    }
}

/// Streams the base image with a content type guessed from the stored file.
pub async fn image(state: web::Data<AppState>, template_id: web::Path<String>) -> Result<NamedFile, ServiceError> {
    let template = state.store.fetch_by_id(&template_id)?;
    NamedFile::open(&template.image_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ServiceError::from(StorageError::NotFound(template.image_path.clone())),
        _ => ServiceError::from(StorageError::Io(e)),
    })
}
