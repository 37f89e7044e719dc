//! Core types and traits for the greenhouse simulation job API.
//!
//! DTOs use the same JSON field names as the worker, so payloads and
//! metadata written here can be consumed unchanged on the worker side.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
