//! HTTP surface of the service.
//!
//! - `templates`: upload, list, fetch, update, delete and render templates.
//! - `merge`: batch renders driven by an uploaded CSV, tracked as background jobs.

pub mod merge;
pub mod templates;

mod multipart;

use crate::compositor::TextPainter;
use crate::config::AppConfig;
use crate::storage::ImageStorage;
use crate::store::TemplateStore;
use std::sync::Arc;

/// Everything a handler needs, shared across workers as `web::Data<AppState>`.
pub struct AppState {
    pub config: AppConfig,
    pub store: TemplateStore,
    pub storage: ImageStorage,
    pub painter: Arc<dyn TextPainter>,
}

impl AppState {
    pub fn new(config: AppConfig, painter: Arc<dyn TextPainter>) -> Self {
        Self {
            store: TemplateStore::new(&config.database_path),
            storage: ImageStorage::new(&config.upload_dir),
            config,
            painter,
        }
    }
}
