//! Derived views
//!
//! Pure functions that turn full entity lists into what a screen shows:
//! filtered and paginated lists, the task board and the dashboard.

pub mod board;
pub mod dashboard;
pub mod filter;
pub mod pagination;

pub use board::{BoardColumn, TaskBoard};
pub use dashboard::{DashboardSummary, ProjectProgress};
pub use filter::{Filter, MemberQuery, ProjectQuery, RoleQuery, TaskQuery};
pub use pagination::{Page, Pagination};
