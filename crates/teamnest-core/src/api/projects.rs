//! Projects API
//!
//! Project CRUD and status counters.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Operation;
use crate::domain::project::{self, DEFAULT_TENANT_ID};
use crate::domain::{Project, ProjectStatus, next_id};
use crate::storage::Store;
use crate::{Error, Result};

use super::{ApiResponse, DeleteResult};

/// Create project request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Members to embed; unknown ids are skipped
    pub user_ids: Option<Vec<u64>>,
}

/// Partial project update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    /// Replaces the member list when present
    pub user_ids: Option<Vec<u64>>,
}

/// Project counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub on_hold: usize,
    pub completed: usize,
    pub archived: usize,
}

impl ProjectStats {
    pub fn compute(projects: &[Project]) -> Self {
        let count = |status| projects.iter().filter(|p| p.status == status).count();
        Self {
            total: projects.len(),
            active: count(ProjectStatus::Active),
            on_hold: count(ProjectStatus::OnHold),
            completed: count(ProjectStatus::Completed),
            archived: count(ProjectStatus::Archived),
        }
    }
}

/// List all projects
pub async fn get_projects(store: &Store) -> Result<ApiResponse<Vec<Project>>> {
    store.simulate(Operation::List).await;
    let projects = store.read().await.projects.clone();
    debug!(count = projects.len(), "Listed projects");
    Ok(ApiResponse::ok(projects))
}

/// Get a project by ID
pub async fn get_project_by_id(store: &Store, id: u64) -> Result<ApiResponse<Project>> {
    store.simulate(Operation::Get).await;
    let collections = store.read().await;
    let project = collections.project(id).cloned().ok_or(Error::ProjectNotFound(id))?;
    Ok(ApiResponse::ok(project))
}

/// Create a new project
pub async fn create_project(
    store: &Store,
    request: CreateProjectRequest,
) -> Result<ApiResponse<Project>> {
    store.simulate(Operation::Create).await;
    let mut collections = store.write().await;

    let id = next_id(&collections.projects);
    let now = Utc::now();
    let users = request
        .user_ids
        .as_deref()
        .map(|ids| collections.user_snapshots(ids))
        .unwrap_or_default();

    let project = Project {
        id,
        tenant_id: DEFAULT_TENANT_ID,
        name: request.name,
        description: request.description,
        status: request.status,
        color: project::color_for(id).to_string(),
        tasks: Vec::new(),
        users,
        created_at: now,
        last_modified_at: now,
    };
    collections.projects.push(project.clone());

    info!(id, name = %project.name, "Created project");
    Ok(ApiResponse::ok(project))
}

/// Update a project
pub async fn update_project(
    store: &Store,
    id: u64,
    request: UpdateProjectRequest,
) -> Result<ApiResponse<Project>> {
    store.simulate(Operation::Update).await;
    let mut collections = store.write().await;

    let users = request.user_ids.as_deref().map(|ids| collections.user_snapshots(ids));
    let project = collections
        .projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(Error::ProjectNotFound(id))?;

    if let Some(name) = request.name {
        project.name = name;
    }
    if let Some(description) = request.description {
        project.description = description;
    }
    if let Some(status) = request.status {
        project.status = status;
    }
    if let Some(color) = request.color {
        project.color = color;
    }
    if let Some(users) = users {
        project.users = users;
    }
    project.last_modified_at = Utc::now();

    info!(id, "Updated project");
    Ok(ApiResponse::ok(project.clone()))
}

/// Delete a project. Tasks pointing at it keep their snapshot.
pub async fn delete_project(store: &Store, id: u64) -> Result<ApiResponse<DeleteResult>> {
    store.simulate(Operation::Delete).await;
    let mut collections = store.write().await;

    if collections.project(id).is_none() {
        return Err(Error::ProjectNotFound(id));
    }
    collections.projects.retain(|p| p.id != id);

    info!(id, "Deleted project");
    Ok(ApiResponse::ok(DeleteResult::new(id)))
}

/// Project counts by status
pub async fn get_project_stats(store: &Store) -> Result<ApiResponse<ProjectStats>> {
    store.simulate(Operation::Stats).await;
    let stats = ProjectStats::compute(&store.read().await.projects);
    Ok(ApiResponse::ok(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;

    fn store() -> Store {
        Store::seeded(LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let store = store();
        let project = create_project(
            &store,
            CreateProjectRequest {
                name: "X".into(),
                description: "Y".into(),
                status: ProjectStatus::Active,
                user_ids: None,
            },
        )
        .await
        .unwrap()
        .data;

        assert_eq!(project.id, 6);
        assert!(project.tasks.is_empty());
        assert!(project.users.is_empty());
        assert_eq!(project.tenant_id, DEFAULT_TENANT_ID);

        delete_project(&store, project.id).await.unwrap();
        let all = get_projects(&store).await.unwrap().data;
        assert!(all.iter().all(|p| p.id != project.id));
    }

    #[tokio::test]
    async fn test_create_skips_unknown_members() {
        let store = store();
        let project = create_project(
            &store,
            CreateProjectRequest {
                name: "Ops".into(),
                user_ids: Some(vec![2, 99, 1]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;

        let ids: Vec<u64> = project.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = store();
        let before = get_project_by_id(&store, 4).await.unwrap().data;

        let after = update_project(
            &store,
            4,
            UpdateProjectRequest {
                status: Some(ProjectStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;

        assert_eq!(after.status, ProjectStatus::Active);
        assert_eq!(after.name, before.name);
        assert_eq!(after.users, before.users);
        assert_ne!(after.last_modified_at, before.last_modified_at);
    }

    #[tokio::test]
    async fn test_update_replaces_members_when_given() {
        let store = store();
        let after = update_project(
            &store,
            2,
            UpdateProjectRequest {
                user_ids: Some(vec![6, 7]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;

        let names: Vec<&str> = after.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Lisa Park", "David Kim"]);
    }

    #[tokio::test]
    async fn test_missing_project_errors() {
        let store = store();
        let err = get_project_by_id(&store, 42).await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");

        let err = delete_project(&store, 42).await.unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(42)));
        assert_eq!(get_projects(&store).await.unwrap().data.len(), 5);
    }

    #[tokio::test]
    async fn test_stats() {
        let stats = get_project_stats(&store()).await.unwrap().data;
        assert_eq!(
            stats,
            ProjectStats {
                total: 5,
                active: 3,
                on_hold: 1,
                completed: 1,
                archived: 0,
            }
        );
    }
}
