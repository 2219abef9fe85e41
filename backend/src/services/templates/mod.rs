//! # Template Service Module
//!
//! Routes everything under `/api/templates` to its handler.
//!
//! ## Sub-modules:
//! - `upload`: stores a new base image and creates an empty template for it.
//! - `get`: returns one template, the full list, or a template's base image.
//! - `save`: replaces a template's text elements.
//! - `delete`: removes a template and releases its image.
//! - `generate`: renders a personalized PNG from a template.

mod delete;
mod generate;
mod get;
mod save;
mod upload;

pub use delete::delete_template;
pub use generate::generate_image;
pub use upload::create_template;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /`** → `upload::process`: multipart upload, field `file`. `201` with the new template.
/// *   **`GET /`** → `get::list`: every template with its elements.
/// *   **`GET /{template_id}`** → `get::process`: one template, or `404`.
/// *   **`GET /{template_id}/image`** → `get::image`: the stored base image.
/// *   **`PUT /{template_id}`** → `save::process`: JSON `{ "elements": [...] }` replaces the element list.
/// *   **`DELETE /{template_id}`** → `delete::process`: `204`, or `404`.
/// *   **`POST /{template_id}/generate`** → `generate::process`: `name`, `birthdate` and `quote`
///     as query or form parameters; responds with `image/png`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(upload::process))
        .route("", get().to(get::list))
        .route("/", post().to(upload::process))
        .route("/", get().to(get::list))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", put().to(save::process))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/image", get().to(get::image))
        .route("/{template_id}/generate", post().to(generate::process))
}
