use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use greetcraft::compositor::FontPainter;
use greetcraft::config::AppConfig;
use greetcraft::job_controller::state::{start_job_updater, JobsState};
use greetcraft::services::{merge, templates, AppState};
use log::{info, warn};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let painter = FontPainter::from_dir(&config.font_dir, &config.font_family).map_err(io::Error::other)?;
    if painter.family() != config.font_family {
        warn!(
            "Font family {} not found in {:?}, using {}",
            config.font_family,
            config.font_dir,
            painter.family()
        );
    }

    let state = AppState::new(config, Arc::new(painter));
    state.store.init().map_err(io::Error::other)?;
    let json_limit = state.config.max_upload_bytes;
    let (host, port) = state.config.bind_address();
    let state = web::Data::new(state);

    // Job controller for batch renders.
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState::new(tx);
    tokio::spawn(start_job_updater(jobs_state.clone(), rx));

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(state.clone())
            .app_data(web::Data::new(jobs_state.clone()))
            .service(templates::configure_routes())
            .service(merge::configure_routes())
    })
    .bind((host, port))?
    .run()
    .await
}
