//! # Batch Render Start Service
//!
//! `POST /api/merge/{template_id}` renders the template once per row of an
//! uploaded CSV file, in the background.
//!
//! ## Workflow:
//!
//! 1.  **Parse**: the multipart `file` part is parsed as CSV. The delimiter is
//!     sniffed from the header line (`,`, `;`, tab or `|`). Header cells name
//!     the roles; columns that are not roles are ignored.
//!
//! 2.  **Job Scheduling**: the template and its base image are loaded up front
//!     so that a bad id fails the request itself with `404`. A `job_id` is
//!     registered as `Pending` and returned immediately.
//!
//! 3.  **Background Processing**: a Tokio task runs `merge_blocking` on
//!     `spawn_blocking`. Rows are rendered in parallel on the rayon pool and
//!     written to `{output_dir}/{job_id}/{row_index}.png`.
//!
//! 4.  **Progress Reporting**: each finished row sends a `MergeUpdate` back to
//!     the async side, which turns it into `JobStatus::InProgress(percent)` for
//!     the job controller. The first failing row fails the whole job; success
//!     ends in `JobStatus::Completed` carrying the output directory.

use crate::compositor::{self, ComposeError, Substitutions, TextPainter};
use crate::error::ServiceError;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::multipart::read_file_field;
use crate::services::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::jobs::JobStatus;
use common::model::template::TextElement;
use log::{error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Progress sent from the blocking worker back to the async job task.
#[derive(Debug)]
pub enum MergeUpdate {
    /// `finished` rows out of `total` are rendered and written.
    Task { finished: usize, total: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV has no data rows")]
    NoRows,
    #[error("failed to render row {row}: {source}")]
    Render {
        row: usize,
        #[source]
        source: ComposeError,
    },
    #[error("failed to write image for row {row}: {source}")]
    Write {
        row: usize,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] io::Error),
}

pub(crate) async fn process(
    state: web::Data<AppState>,
    jobs: web::Data<JobsState>,
    template_id: web::Path<String>,
    payload: Multipart,
) -> impl Responder {
    match schedule_merge_job(&state, &jobs, &template_id, payload).await {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })),
        Err(e) => {
            error!("Could not start batch render for template {}: {}", template_id, e);
            e.error_response()
        }
    }
}

async fn schedule_merge_job(
    state: &AppState,
    jobs: &JobsState,
    template_id: &str,
    payload: Multipart,
) -> Result<String, ServiceError> {
    let upload = read_file_field(payload, "file", state.config.max_upload_bytes).await?;
    let rows = parse_rows(&upload.bytes).map_err(|e| ServiceError::bad_request(e.to_string()))?;

    let template = state.store.fetch_by_id(template_id)?;
    let base = state.storage.read_bytes(Path::new(&template.image_path))?;

    let job_id = Uuid::new_v4().to_string();
    jobs.jobs.write().await.insert(job_id.clone(), JobStatus::Pending);
    info!(
        "Scheduled batch render {} for template {} ({} rows)",
        job_id,
        template_id,
        rows.len()
    );

    let tx = jobs.tx.clone();
    let painter = state.painter.clone();
    let out_dir = state.config.output_dir.join(&job_id);
    let elements = template.elements;
    let job_id_for_task = job_id.clone();

    tokio::spawn(async move {
        let (merge_tx, mut merge_rx) = mpsc::channel::<MergeUpdate>(100);

        // Forwards row progress to the job controller until the worker drops its sender.
        let forward_tx = tx.clone();
        let forward_id = job_id_for_task.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(MergeUpdate::Task { finished, total }) = merge_rx.recv().await {
                let percent = (finished * 100 / total.max(1)) as u32;
                let _ = forward_tx
                    .send(JobUpdate {
                        job_id: forward_id.clone(),
                        status: JobStatus::InProgress(percent),
                    })
                    .await;
            }
        });

        let handle = tokio::task::spawn_blocking(move || {
            merge_blocking(&merge_tx, painter.as_ref(), &base, &elements, &rows, &out_dir)
        });
        let result = handle.await;
        // The final status must not be overtaken by a late progress update.
        let _ = forwarder.await;

        let status = match result {
            Ok(Ok(dir)) => {
                info!("Batch render {} finished in {:?}", job_id_for_task, dir);
                JobStatus::Completed(dir.display().to_string())
            }
            Ok(Err(e)) => {
                warn!("Batch render {} failed: {}", job_id_for_task, e);
                JobStatus::Failed(e.to_string())
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_for_task,
                status,
            })
            .await;
    });

    Ok(job_id)
}

/// Parses CSV bytes into one `Substitutions` per data row.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<Substitutions>, MergeError> {
    let header_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let delimiter = detect_delimiter(&String::from_utf8_lossy(header_line));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(headers.iter().zip(record.iter()).collect::<Substitutions>());
    }

    if rows.is_empty() {
        return Err(MergeError::NoRows);
    }
    Ok(rows)
}

/// Picks the candidate delimiter that occurs most often in the header line,
/// preferring `,` when none occurs.
fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = (b',', header_line.matches(',').count());
    for candidate in [';', '\t', '|'] {
        let count = header_line.matches(candidate).count();
        if count > best.1 {
            best = (candidate as u8, count);
        }
    }
    best.0
}

/// Renders every row and writes it to `out_dir/{row_index}.png`.
///
/// Runs on a blocking thread; rows are spread over the rayon pool. Returns
/// the output directory on success.
pub fn merge_blocking(
    tx: &mpsc::Sender<MergeUpdate>,
    painter: &dyn TextPainter,
    base: &[u8],
    elements: &[TextElement],
    rows: &[Substitutions],
    out_dir: &Path,
) -> Result<PathBuf, MergeError> {
    fs::create_dir_all(out_dir)?;
    let total = rows.len();
    let finished = AtomicUsize::new(0);

    rows.par_iter().enumerate().try_for_each(|(index, substitutions)| -> Result<(), MergeError> {
        let png = compositor::compose(painter, base, elements, substitutions).map_err(|source| {
            MergeError::Render {
                row: index + 1,
                source,
            }
        })?;
        fs::write(out_dir.join(format!("{}.png", index)), png).map_err(|source| MergeError::Write {
            row: index + 1,
            source,
        })?;

        let finished = finished.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = tx.blocking_send(MergeUpdate::Task { finished, total });
        Ok(())
    })?;

    Ok(out_dir.to_path_buf())
}
