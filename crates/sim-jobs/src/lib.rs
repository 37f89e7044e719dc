//! Job lifecycle core: submission, store adapter and status resolution.
//!
//! Everything here talks to the shared store through the `KvStore` trait;
//! the concrete backend (Redis or in-memory) is injected at construction.

pub mod keys;
mod resolver;
mod store;
mod submit;

pub use resolver::{ResultView, StatusResolver, RECENT_LIST_LIMIT};
pub use store::{JobStore, JobStoreError, DEFAULT_TTL, RECENT_MAX_RETAIN};
pub use submit::{SubmissionService, SubmitError, SubmitReceipt};
