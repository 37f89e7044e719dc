//! HTTP client for the simulation job API.
//!
//! Polling has no server-side effects: a poll loop can be abandoned and
//! restarted against the same job id at any time.

use serde::Deserialize;
use sim_types::{JobMeta, JobStatus, SimulationParams};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },
    #[error("timed out after {0:?} waiting for job {1}")]
    TimedOut(Duration, String),
}

/// Acknowledgement returned by `POST /simulate`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAck {
    pub job_id: String,
    pub status: JobStatus,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    #[allow(dead_code)]
    job_id: String,
    status: JobStatus,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecentBody {
    recent_job_ids: Vec<String>,
}

pub struct SimClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn health(&self) -> Result<bool, PollError> {
        let res = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(res.status().is_success())
    }

    /// Submit a simulation; the server fills defaults for unset fields.
    pub async fn submit(&self, params: &SimulationParams) -> Result<SubmitAck, PollError> {
        let res = self
            .http
            .post(format!("{}/simulate", self.base_url))
            .json(params)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::unexpected(res).await);
        }
        Ok(res.json().await?)
    }

    /// Metadata for a job, or `None` when the server reports 404.
    pub async fn job(&self, job_id: &str) -> Result<Option<JobMeta>, PollError> {
        let res = self
            .http
            .get(format!("{}/jobs/{}", self.base_url, job_id))
            .send()
            .await?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(Self::unexpected(res).await);
        }
        Ok(Some(res.json().await?))
    }

    /// Recently submitted job ids, newest first.
    pub async fn recent(&self) -> Result<Vec<String>, PollError> {
        let res = self
            .http
            .get(format!("{}/results", self.base_url))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::unexpected(res).await);
        }
        let body: RecentBody = res.json().await?;
        Ok(body.recent_job_ids)
    }

    /// Poll `/results/{id}` every `interval` until the job reaches a
    /// terminal status or `timeout` elapses, whichever comes first.
    ///
    /// A 404 keeps the loop going: the metadata write may have been lost
    /// while the queued payload survived, so a result can still appear.
    /// An `error` status surfaces immediately without further retries.
    pub async fn wait_for_result(
        &self,
        job_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<serde_json::Value, PollError> {
        let deadline = Instant::now() + timeout;
        loop {
            let res = self
                .http
                .get(format!("{}/results/{}", self.base_url, job_id))
                .send()
                .await?;
            match res.status() {
                reqwest::StatusCode::NOT_FOUND => {}
                s if s.is_success() => {
                    let body: ResultBody = res.json().await?;
                    match body.status {
                        JobStatus::Done => {
                            return Ok(body.result.unwrap_or(serde_json::Value::Null))
                        }
                        JobStatus::Error => {
                            return Err(PollError::JobFailed {
                                job_id: job_id.to_string(),
                                message: body
                                    .error
                                    .unwrap_or_else(|| "unknown error".to_string()),
                            })
                        }
                        JobStatus::Queued | JobStatus::Running => {}
                    }
                }
                _ => return Err(Self::unexpected(res).await),
            }
            if Instant::now() >= deadline {
                return Err(PollError::TimedOut(timeout, job_id.to_string()));
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn unexpected(res: reqwest::Response) -> PollError {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        PollError::UnexpectedStatus { status, body }
    }
}
