//! Batch rendering: one image per CSV row, run as a background job.

mod get_status;
mod start;

pub use start::{merge_blocking, parse_rows, MergeError, MergeUpdate};

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/merge";

/// Configures and returns the Actix `Scope` for all merge-related routes.
///
/// *   **`POST /{template_id}`**: multipart upload, field `file`, a CSV whose
///     header row names the roles (`name`, `birthdate`, `quote`). Responds with
///     `{ "job_id": ... }`.
/// *   **`GET /status/{job_id}`**: current `JobStatus` of a batch job, or `404`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/status/{job_id}", get().to(get_status::process))
        .route("/{template_id}", post().to(start::process))
}
