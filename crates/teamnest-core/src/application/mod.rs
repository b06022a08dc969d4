//! Application layer
//!
//! Concerns shared by the in-process API and the backend client.

pub mod errors;

pub use errors::{ApiErrorDetails, normalize_validation_errors};
