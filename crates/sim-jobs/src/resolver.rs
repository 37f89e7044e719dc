//! Status resolution: the result blob wins, metadata covers everything else.

use crate::store::{JobStore, JobStoreError};
use serde::Serialize;
use sim_types::{JobMeta, JobStatus};
use std::sync::Arc;

/// How many ids a recency listing returns, regardless of the stored cap.
pub const RECENT_LIST_LIMIT: usize = 50;

/// Answer to a result query: status plus the parsed result when done.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// Read-only view over the job store.
///
/// A present result blob is authoritative for `done`: the worker writes it
/// exactly once on completion. For everything else (queued, running, and
/// error before any result exists) the metadata status is authoritative,
/// because a failing worker only updates metadata.
pub struct StatusResolver {
    store: Arc<JobStore>,
}

impl StatusResolver {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    /// Resolve the result of a job. `Ok(None)` when neither a result nor
    /// metadata exists, covering both "never submitted" and "expired".
    pub async fn result(&self, job_id: &str) -> Result<Option<ResultView>, JobStoreError> {
        if let Some(raw) = self.store.get_result(job_id).await? {
            // Workers normally store JSON; tolerate a plain string blob.
            let result = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));
            return Ok(Some(ResultView {
                job_id: job_id.to_string(),
                status: JobStatus::Done,
                result: Some(result),
            }));
        }
        match self.store.get_meta(job_id).await? {
            Some(meta) => Ok(Some(ResultView {
                job_id: job_id.to_string(),
                status: meta.status,
                result: None,
            })),
            None => Ok(None),
        }
    }

    /// Metadata record verbatim, or `None` when absent or expired.
    pub async fn meta(&self, job_id: &str) -> Result<Option<JobMeta>, JobStoreError> {
        self.store.get_meta(job_id).await
    }

    /// Recently submitted job ids, newest first, capped at
    /// [`RECENT_LIST_LIMIT`].
    pub async fn recent(&self) -> Result<Vec<String>, JobStoreError> {
        self.store.list_recent(RECENT_LIST_LIMIT).await
    }
}
