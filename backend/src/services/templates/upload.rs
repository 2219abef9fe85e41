//! # Template Upload Service
//!
//! `POST /api/templates` with a multipart `file` part.
//!
//! The bytes are sniffed by content (not by file name) and must be a PNG or
//! JPEG. They are written to the upload directory, and a template with an
//! empty element list is created for them. If the database insert fails the
//! freshly written file is removed again.

use crate::error::ServiceError;
use crate::services::multipart::read_file_field;
use crate::services::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::template::Template;
use image::ImageFormat;
use log::{error, info};
use uuid::Uuid;

pub async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let upload = match read_file_field(payload, "file", state.config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => return e.error_response(),
    };
    match create_template(&state, upload.filename.as_deref(), &upload.bytes) {
        Ok(template) => HttpResponse::Created().json(template),
        Err(e) => {
            error!("Template upload failed: {}", e);
            e.error_response()
        }
    }
}

/// Stores `bytes` as a new base image and registers a template for it.
pub fn create_template(
    state: &AppState,
    original_filename: Option<&str>,
    bytes: &[u8],
) -> Result<Template, ServiceError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) | Ok(ImageFormat::Jpeg) => {}
        _ => return Err(ServiceError::bad_request("please upload a PNG or JPEG image")),
    }

    let path = state.storage.save(original_filename, bytes)?;
    let template = Template {
        id: Uuid::new_v4().to_string(),
        image_path: path.to_string_lossy().into_owned(),
        original_filename: original_filename.map(str::to_string),
        elements: Vec::new(),
    };

    if let Err(e) = state.store.create(&template) {
        state.storage.remove(&path);
        return Err(e.into());
    }

    info!("Created template {} from {:?}", template.id, original_filename);
    Ok(template)
}
