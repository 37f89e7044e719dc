//! Submission: the enqueue is fatal, every later write is best-effort.

use crate::keys;
use crate::store::{JobStore, JobStoreError};
use chrono::Utc;
use serde::Serialize;
use sim_types::{JobMeta, JobStatus, QueuedPayload, SimulationParams};
use std::sync::Arc;
use uuid::Uuid;

/// What the caller gets back: the fresh id and its starting status.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub job_id: String,
    pub status: JobStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The queue write failed; nothing was persisted and the job does not
    /// exist from the caller's perspective.
    #[error("failed to enqueue job: {0}")]
    Enqueue(#[source] JobStoreError),
}

pub struct SubmissionService {
    store: Arc<JobStore>,
}

impl SubmissionService {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    /// Normalize the request, queue it for the worker and record metadata.
    ///
    /// Only the queue write can fail the submission. Once the payload is
    /// queued a worker may still process it, so the metadata and recency
    /// writes are logged on failure and the submission reports success.
    /// The resulting gap (a queued job invisible to status queries) is an
    /// accepted trade of consistency for availability.
    pub async fn submit(&self, params: SimulationParams) -> Result<SubmitReceipt, SubmitError> {
        let params = params.with_defaults();
        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let payload = QueuedPayload {
            job_id: job_id.clone(),
            created_at: now,
            params: params.clone(),
        };
        self.store
            .enqueue(&payload)
            .await
            .map_err(SubmitError::Enqueue)?;

        let meta = JobMeta {
            job_id: job_id.clone(),
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
            params,
            error: None,
            result_key: Some(keys::result_key(&job_id)),
        };
        if let Err(e) = self.store.put_meta(&meta).await {
            tracing::warn!(job_id = %job_id, error = %e, "failed to write job metadata");
        }
        if let Err(e) = self.store.push_recent(&job_id).await {
            tracing::warn!(job_id = %job_id, error = %e, "failed to update recent jobs list");
        }

        tracing::info!(job_id = %job_id, "job submitted");
        Ok(SubmitReceipt {
            job_id,
            status: JobStatus::Queued,
        })
    }
}
