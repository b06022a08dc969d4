//! Mock API Module
//!
//! Async functions that stand in for the TeamNest REST endpoints. Each call
//! waits out a simulated network delay, reads or mutates the in-memory
//! store, and wraps the result in an [`ApiResponse`] envelope. Failures are
//! returned as [`crate::Error`] with the endpoint's static message.
//!
//! Functions take the [`crate::storage::Store`] explicitly; cloning a store
//! shares the same collections.

pub mod catalog;
pub mod projects;
pub mod roles;
pub mod tasks;
pub mod users;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Payload returned by every delete endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted: bool,
    pub id: u64,
}

impl DeleteResult {
    pub fn new(id: u64) -> Self {
        Self { deleted: true, id }
    }
}

/// Deserialize a present field as `Some`, so that `Option<Option<T>>`
/// distinguishes an absent field from an explicit `null`
pub(crate) fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
