//! # Template Deletion Service
//!
//! `DELETE /api/templates/{template_id}`.
//!
//! The database rows go first, in one transaction. Removing the image file is
//! best effort afterwards: if it fails the file is leaked and a warning is
//! logged, but the template is still reported as deleted.

use crate::error::ServiceError;
use crate::services::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;
use std::path::Path;

pub async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    match delete_template(&state, &template_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.error_response(),
    }
}

pub fn delete_template(state: &AppState, template_id: &str) -> Result<(), ServiceError> {
    let template = state.store.delete(template_id)?;
    let removed = state.storage.remove(Path::new(&template.image_path));
    info!("Deleted template {} (image removed: {})", template_id, removed);
    Ok(())
}
