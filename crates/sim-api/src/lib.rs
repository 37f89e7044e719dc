//! HTTP surface for the greenhouse simulation job queue.

pub mod server;
