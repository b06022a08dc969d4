//! TeamNest Core Library
//!
//! This crate provides the data layer for TeamNest, including:
//! - Domain entities (users, roles, projects, tasks) and read-only catalogs
//! - In-memory store with seeded data and snapshot refresh
//! - Mock API with simulated latency and a uniform response envelope
//! - Derived views (filters, pagination, task board, dashboard)
//! - Auth client for the TeamNest backend
//! - Configuration

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod views;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{ApiResponse, DeleteResult};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::storage::Store;
}
