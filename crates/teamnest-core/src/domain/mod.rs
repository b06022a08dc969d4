//! Domain entities
//!
//! Users, roles, projects and tasks as held by the in-memory store, plus the
//! snapshot types embedded into them and the read-only catalogs.

pub mod catalog;
pub mod project;
pub mod role;
pub mod snapshot;
pub mod task;
pub mod user;

pub use catalog::{Permission, Tag};
pub use project::{Project, ProjectStatus};
pub use role::Role;
pub use snapshot::{ProjectSnapshot, RoleSnapshot, Subtask, TagSnapshot, TaskSnapshot, UserSnapshot};
pub use task::{Task, TaskPriority, TaskStatus};
pub use user::{User, UserStatus};

/// Entities addressed by a numeric id
pub trait Identified {
    fn id(&self) -> u64;
}

/// Next id for a collection: one past the current maximum, or 1 when empty
pub fn next_id<T: Identified>(items: &[T]) -> u64 {
    items.iter().map(Identified::id).max().map_or(1, |max| max + 1)
}
