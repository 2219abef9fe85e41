//! Tracks the status of background batch renders.
//!
//! Batch jobs (see `services::merge::start`) run outside the request/response
//! cycle. They never write the shared map themselves; instead they push
//! `JobUpdate` messages into an mpsc channel, and a single long-running
//! `start_job_updater` task applies them. Readers (`GET /api/merge/status/{job_id}`)
//! only take the read lock.

use common::jobs::JobStatus;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Shared job table plus the sender used to report changes to it.
///
/// Created once in `main.rs` and registered as `web::Data`.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to latest known status.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    pub fn new(tx: mpsc::Sender<JobUpdate>) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        }
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

#[derive(Debug)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
}

/// Finished jobs whose status stays queryable; older ones are forgotten.
pub const RETAINED_FINISHED_JOBS: usize = 1000;

/// Applies every `JobUpdate` received on `rx` until all senders are dropped.
pub async fn start_job_updater(state: JobsState, rx: mpsc::Receiver<JobUpdate>) {
    run_job_updater(state, rx, RETAINED_FINISHED_JOBS).await
}

/// Like [`start_job_updater`], but keeps at most `retain` finished jobs.
///
/// Only the status entry is evicted. Rendered files stay in the output
/// directory until removed by the operator.
pub async fn run_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>, retain: usize) {
    let mut finished = VecDeque::new();
    while let Some(update) = rx.recv().await {
        let done = matches!(update.status, JobStatus::Completed(_) | JobStatus::Failed(_));
        let mut jobs = state.jobs.write().await;
        if done {
            finished.push_back(update.job_id.clone());
        }
        jobs.insert(update.job_id, update.status);

        while finished.len() > retain {
            if let Some(expired) = finished.pop_front() {
                debug!("Forgetting finished job {}", expired);
                jobs.remove(&expired);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updater_applies_updates_in_order() {
        let (unused_tx, _unused_rx) = mpsc::channel(1);
        let state = JobsState::new(unused_tx);
        let (tx, rx) = mpsc::channel(8);
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        for status in [JobStatus::Pending, JobStatus::InProgress(50), JobStatus::Completed("out".into())] {
            tx.send(JobUpdate {
                job_id: "job-1".into(),
                status,
            })
            .await
            .unwrap();
        }
        drop(tx);
        updater.await.unwrap();

        assert_eq!(state.status("job-1").await, Some(JobStatus::Completed("out".into())));
        assert_eq!(state.status("job-2").await, None);
    }

    #[tokio::test]
    async fn oldest_finished_jobs_are_evicted() {
        let (unused_tx, _unused_rx) = mpsc::channel(1);
        let state = JobsState::new(unused_tx);
        let (tx, rx) = mpsc::channel(16);
        let updater = tokio::spawn(run_job_updater(state.clone(), rx, 2));

        let updates = [
            ("a", JobStatus::Completed("out/a".into())),
            ("running", JobStatus::InProgress(10)),
            ("b", JobStatus::Failed("bad row".into())),
            ("c", JobStatus::Completed("out/c".into())),
        ];
        for (job_id, status) in updates {
            tx.send(JobUpdate {
                job_id: job_id.into(),
                status,
            })
            .await
            .unwrap();
        }
        drop(tx);
        updater.await.unwrap();

        assert_eq!(state.status("a").await, None);
        assert_eq!(state.status("running").await, Some(JobStatus::InProgress(10)));
        assert_eq!(state.status("b").await, Some(JobStatus::Failed("bad row".into())));
        assert_eq!(state.status("c").await, Some(JobStatus::Completed("out/c".into())));
    }
}
