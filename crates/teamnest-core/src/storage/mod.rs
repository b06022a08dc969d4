//! In-memory entity store
//!
//! All entities live in plain vectors behind one `tokio::sync::RwLock`.
//! Reads share the lock; every mutation holds the write lock for its whole
//! read-modify-write, so mutations never interleave. Nothing is persisted.

pub mod seed;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::config::{LatencyConfig, Operation};
use crate::domain::catalog;
use crate::domain::{
    Project, ProjectSnapshot, Role, RoleSnapshot, TagSnapshot, Task, TaskSnapshot, TaskStatus, User,
    UserSnapshot,
};

/// The four entity collections
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

/// Number of records whose embedded data changed during a refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub users: usize,
    pub roles: usize,
    pub projects: usize,
    pub tasks: usize,
}

impl RefreshReport {
    pub fn total(&self) -> usize {
        self.users + self.roles + self.projects + self.tasks
    }
}

impl Collections {
    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn role(&self, id: u64) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Snapshots of the given users, in store order; unknown ids are skipped
    pub fn user_snapshots(&self, ids: &[u64]) -> Vec<UserSnapshot> {
        self.users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(UserSnapshot::from)
            .collect()
    }

    pub fn role_snapshot(&self, id: u64) -> Option<RoleSnapshot> {
        self.role(id).map(RoleSnapshot::from)
    }

    pub fn project_snapshot(&self, id: u64) -> Option<ProjectSnapshot> {
        self.project(id).map(ProjectSnapshot::from)
    }

    pub fn assignee_snapshot(&self, id: Option<u64>) -> Option<UserSnapshot> {
        id.and_then(|id| self.user(id)).map(UserSnapshot::from)
    }

    /// Add `delta` to a role's user counter, flooring at zero
    pub fn adjust_role_count(&mut self, role_id: u64, delta: i64) {
        if let Some(role) = self.roles.iter_mut().find(|r| r.id == role_id) {
            let next = (i64::from(role.users_count) + delta).max(0);
            role.users_count = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Largest subtask id across every task
    pub fn max_subtask_id(&self) -> u64 {
        self.tasks
            .iter()
            .flat_map(|t| t.subtasks.iter().map(|s| s.id))
            .max()
            .unwrap_or(0)
    }

    /// Resolve user roles, task projects and assignees, and recount role
    /// holders. Leaves tags and project checklists/members untouched.
    pub(crate) fn resolve_references(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();

        for i in 0..self.users.len() {
            let role = self.role_snapshot(self.users[i].role_id);
            if self.users[i].role != role {
                self.users[i].role = role;
                report.users += 1;
            }
        }

        for i in 0..self.tasks.len() {
            let project = self.project_snapshot(self.tasks[i].project_id);
            let assignee = self.assignee_snapshot(self.tasks[i].assignee_id);
            let task = &mut self.tasks[i];
            if task.project != project || task.assignee != assignee {
                task.project = project;
                task.assignee = assignee;
                report.tasks += 1;
            }
        }

        for i in 0..self.roles.len() {
            let id = self.roles[i].id;
            let holders = self.users.iter().filter(|u| u.role_id == id).count();
            let holders = u32::try_from(holders).unwrap_or(u32::MAX);
            if self.roles[i].users_count != holders {
                self.roles[i].users_count = holders;
                report.roles += 1;
            }
        }

        report
    }

    /// Rebuild every embedded snapshot from its current source record.
    ///
    /// On top of `resolve_references`: task tags are re-read from the tag
    /// catalog, project member lists drop deleted users and pick up edited
    /// ones, and project checklists are regenerated from the task store.
    pub fn refresh_snapshots(&mut self) -> RefreshReport {
        let mut report = self.resolve_references();
        let mut touched_tasks = vec![false; self.tasks.len()];

        for (i, task) in self.tasks.iter_mut().enumerate() {
            let tags: Vec<TagSnapshot> = task
                .tags
                .iter()
                .filter_map(|t| catalog::tag(t.id))
                .map(TagSnapshot::from)
                .collect();
            if task.tags != tags {
                task.tags = tags;
                touched_tasks[i] = true;
            }
        }
        report.tasks += touched_tasks.iter().filter(|t| **t).count();

        for i in 0..self.projects.len() {
            let project_id = self.projects[i].id;
            let member_ids: Vec<u64> = self.projects[i].users.iter().map(|u| u.id).collect();
            let users = self.user_snapshots(&member_ids);
            let checklist: Vec<TaskSnapshot> = self
                .tasks
                .iter()
                .filter(|t| t.project_id == project_id)
                .map(|t| {
                    TaskSnapshot::new(t.id, t.title.clone(), t.status == TaskStatus::Completed)
                })
                .collect();

            let project = &mut self.projects[i];
            if project.users != users || project.tasks != checklist {
                project.users = users;
                project.tasks = checklist;
                report.projects += 1;
            }
        }

        report
    }
}

/// Shared handle to the in-memory collections plus the latency profile
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
    latency: LatencyConfig,
}

impl Store {
    pub fn new(collections: Collections, latency: LatencyConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collections)),
            latency,
        }
    }

    /// Store preloaded with the seed workspace
    pub fn seeded(latency: LatencyConfig) -> Self {
        let collections = seed::collections();
        info!(
            users = collections.users.len(),
            roles = collections.roles.len(),
            projects = collections.projects.len(),
            tasks = collections.tasks.len(),
            "Seeded in-memory store"
        );
        Self::new(collections, latency)
    }

    /// Store with no records
    pub fn empty(latency: LatencyConfig) -> Self {
        Self::new(Collections::default(), latency)
    }

    /// Wait out the artificial delay for an operation
    pub async fn simulate(&self, op: Operation) {
        let delay = self.latency.delay_for(op);
        if !delay.is_zero() {
            debug!(?op, delay_ms = delay.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(delay).await;
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().await
    }

    /// Rebuild embedded snapshots and role counters from source records
    pub async fn refresh_snapshots(&self) -> RefreshReport {
        let report = self.inner.write().await.refresh_snapshots();
        info!(changed = report.total(), "Refreshed embedded snapshots");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_role_count_floors_at_zero() {
        let mut c = seed::collections();
        let designer = c.role(4).unwrap().users_count;
        assert_eq!(designer, 1);

        c.adjust_role_count(4, -1);
        c.adjust_role_count(4, -1);
        assert_eq!(c.role(4).unwrap().users_count, 0);

        c.adjust_role_count(4, 2);
        assert_eq!(c.role(4).unwrap().users_count, 2);
    }

    #[test]
    fn test_adjust_unknown_role_is_noop() {
        let mut c = seed::collections();
        let before: Vec<u32> = c.roles.iter().map(|r| r.users_count).collect();
        c.adjust_role_count(99, 1);
        let after: Vec<u32> = c.roles.iter().map(|r| r.users_count).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_max_subtask_id() {
        let c = seed::collections();
        assert_eq!(c.max_subtask_id(), 26);
        assert_eq!(Collections::default().max_subtask_id(), 0);
    }

    #[test]
    fn test_refresh_picks_up_renamed_user() {
        let mut c = seed::collections();
        c.users[0].first_name = "Harsh".to_string();

        let report = c.refresh_snapshots();

        assert!(report.tasks > 0);
        let task = c.task(1).unwrap();
        assert_eq!(task.assignee.as_ref().unwrap().name, "Harsh Ganbote");
        let project = c.project(2).unwrap();
        assert_eq!(project.users[0].name, "Harsh Ganbote");
    }

    #[test]
    fn test_refresh_drops_deleted_members_and_rebuilds_checklists() {
        let mut c = seed::collections();
        c.users.retain(|u| u.id != 5);

        c.refresh_snapshots();

        let backend = c.project(3).unwrap();
        assert!(backend.users.iter().all(|u| u.id != 5));
        let task_ids: Vec<u64> = backend.tasks.iter().map(|t| t.id).collect();
        assert_eq!(task_ids, vec![3, 6, 10, 12]);
        assert!(c.task(3).unwrap().assignee.is_none());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut c = seed::collections();
        c.refresh_snapshots();
        assert_eq!(c.refresh_snapshots(), RefreshReport::default());
    }

    #[tokio::test]
    async fn test_cloned_store_shares_collections() {
        let store = Store::seeded(LatencyConfig::disabled());
        let handle = store.clone();
        handle.write().await.projects.clear();
        assert!(store.read().await.projects.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_waits_configured_delay() {
        let store = Store::empty(LatencyConfig::default());
        let started = tokio::time::Instant::now();
        store.simulate(Operation::Create).await;
        assert!(started.elapsed() >= std::time::Duration::from_millis(600));
    }
}
