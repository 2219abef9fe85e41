use serde::{Deserialize, Serialize};

/// Status of a background batch render, as reported by `GET /api/merge/status/{job_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of rows rendered so far.
    InProgress(u32),
    /// Directory holding the rendered images.
    Completed(String),
    Failed(String),
}
