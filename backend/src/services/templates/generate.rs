//! # Image Generation Service
//!
//! `POST /api/templates/{template_id}/generate` renders the template with the
//! caller's `name`, `birthdate` and `quote` and returns the PNG bytes.
//!
//! ## Workflow
//!
//! 1.  Parameters are taken from the urlencoded form body and the query string
//!     (query wins when both carry the same key). Unknown keys are ignored.
//! 2.  The template is fetched from the store (`404` if unknown) and its base
//!     image read from storage (`404` if the file is gone).
//! 3.  Compositing is CPU-bound, so it runs on `tokio::task::spawn_blocking`.
//! 4.  Decode, style and encode failures come back as `500`; nothing partial
//!     is ever returned.

use crate::compositor::{self, Substitutions};
use crate::error::ServiceError;
use crate::services::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::{error, info};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    form: Option<web::Form<HashMap<String, String>>>,
) -> impl Responder {
    let mut params = form.map(|f| f.into_inner()).unwrap_or_default();
    params.extend(query.into_inner());
    let substitutions: Substitutions = params.into_iter().collect();

    match generate_image(&state, &template_id, substitutions).await {
        Ok(png) => HttpResponse::Ok().content_type("image/png").body(png),
        Err(e) => {
            error!("Generating image for template {} failed: {}", template_id, e);
            e.error_response()
        }
    }
}

/// Fetches the template and its base image, then composes off the async runtime.
pub async fn generate_image(
    state: &AppState,
    template_id: &str,
    substitutions: Substitutions,
) -> Result<Vec<u8>, ServiceError> {
    let template = state.store.fetch_by_id(template_id)?;
    let base = state.storage.read_bytes(Path::new(&template.image_path))?;
    let painter = Arc::clone(&state.painter);
    let elements = template.elements;

    let png = tokio::task::spawn_blocking(move || {
        compositor::compose(painter.as_ref(), &base, &elements, &substitutions)
    })
    .await
    .map_err(|e| ServiceError::internal(format!("render task failed: {}", e)))??;

    info!("Generated {} byte image for template {}", png.len(), template_id);
    Ok(png)
}
