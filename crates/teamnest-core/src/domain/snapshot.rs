//! Embedded snapshots
//!
//! Entities embed copies of related records instead of references: a task
//! carries its project and assignee, a project carries its members, a user
//! carries its role. Snapshots are captured when the owning record is
//! written and are not updated when the source changes afterwards, except
//! where an operation says otherwise (role updates refresh user role
//! snapshots). `Store::refresh_snapshots` rebuilds all of them.

use serde::{Deserialize, Serialize};

use super::catalog::Tag;
use super::project::Project;
use super::role::Role;
use super::user::User;

/// Copy of the user fields shown next to projects and tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub avatar: String,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.full_name(),
            email: user.email.clone(),
            initials: user.initials.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Copy of a role embedded into a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSnapshot {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub is_system: bool,
}

impl From<&Role> for RoleSnapshot {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            color: role.color.clone(),
            is_system: role.is_system,
        }
    }
}

/// Copy of a project embedded into a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub id: u64,
    pub name: String,
    pub color: String,
}

impl From<&Project> for ProjectSnapshot {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            color: project.color.clone(),
        }
    }
}

/// Copy of a catalog tag attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSnapshot {
    pub id: u64,
    pub name: String,
    pub color: String,
}

impl From<&Tag> for TagSnapshot {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.to_string(),
            color: tag.color.to_string(),
        }
    }
}

/// Checklist entry of a project, used for progress display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl TaskSnapshot {
    pub fn new(id: u64, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}

/// Subtask owned by a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(id: u64, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}
