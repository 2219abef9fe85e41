//! # Template Update Service
//!
//! `PUT /api/templates/{template_id}` replaces the template's text elements
//! with the list in the body. The id, image and original file name are fixed
//! at upload time and are not affected. Element styles are stored as sent;
//! a malformed colour only surfaces when the template is rendered.

use crate::error::ServiceError;
use crate::services::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::UpdateTemplateRequest;
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    payload: web::Json<UpdateTemplateRequest>,
) -> impl Responder {
    match state.store.update_elements(&template_id, &payload.elements) {
        Ok(template) => {
            info!("Updated template {} ({} elements)", template.id, template.elements.len());
            HttpResponse::Ok().json(template)
        }
        Err(e) => ServiceError::from(e).error_response(),
    }
}
