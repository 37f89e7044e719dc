//! Store key layout, shared with the worker.

/// FIFO list the worker consumes full job payloads from.
pub const QUEUE_KEY: &str = "simulation_jobs";

/// `job_meta:<job_id>` -> JobMeta JSON.
pub const META_PREFIX: &str = "job_meta:";

/// `job_result:<job_id>` -> result JSON written by the worker.
pub const RESULT_PREFIX: &str = "job_result:";

/// Bounded newest-first list of recently submitted job ids.
pub const RECENT_KEY: &str = "recent_simulation_ids";

pub fn meta_key(job_id: &str) -> String {
    format!("{META_PREFIX}{job_id}")
}

pub fn result_key(job_id: &str) -> String {
    format!("{RESULT_PREFIX}{job_id}")
}
