//! Tasks API
//!
//! Task CRUD, status moves, subtask checklists and task statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Operation;
use crate::domain::catalog;
use crate::domain::{Project, Subtask, TagSnapshot, Task, TaskPriority, TaskStatus, next_id};
use crate::storage::{Collections, Store};
use crate::{Error, Result};

use super::{ApiResponse, DeleteResult, present};

/// Create task request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: u64,
    pub assignee_id: Option<u64>,
    pub tag_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Defaults to TODO
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<u32>,
}

/// Partial task update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<u64>,
    /// `Some(None)` unassigns the task
    #[serde(default, deserialize_with = "present")]
    pub assignee_id: Option<Option<u64>>,
    pub tag_ids: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub estimated_hours: Option<u32>,
}

impl UpdateTaskRequest {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Task counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Number of tasks pointing at a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTaskCount {
    pub id: u64,
    pub name: String,
    pub count: usize,
}

/// Task counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Open tasks whose due date has passed
    pub overdue: usize,
    pub by_priority: PriorityBreakdown,
    /// One entry per project, including projects without tasks
    pub by_project: Vec<ProjectTaskCount>,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], projects: &[Project], now: DateTime<Utc>) -> Self {
        let by_status = |status| tasks.iter().filter(|t| t.status == status).count();
        let by_priority = |priority| tasks.iter().filter(|t| t.priority == priority).count();

        Self {
            total: tasks.len(),
            todo: by_status(TaskStatus::Todo),
            in_progress: by_status(TaskStatus::InProgress),
            in_review: by_status(TaskStatus::InReview),
            completed: by_status(TaskStatus::Completed),
            cancelled: by_status(TaskStatus::Cancelled),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
            by_priority: PriorityBreakdown {
                urgent: by_priority(TaskPriority::Urgent),
                high: by_priority(TaskPriority::High),
                medium: by_priority(TaskPriority::Medium),
                low: by_priority(TaskPriority::Low),
            },
            by_project: projects
                .iter()
                .map(|p| ProjectTaskCount {
                    id: p.id,
                    name: p.name.clone(),
                    count: tasks.iter().filter(|t| t.project_id == p.id).count(),
                })
                .collect(),
        }
    }
}

fn tag_snapshots(ids: &[u64]) -> Vec<TagSnapshot> {
    catalog::tags_for(ids).into_iter().map(TagSnapshot::from).collect()
}

fn find_task_mut(collections: &mut Collections, id: u64) -> Result<&mut Task> {
    collections
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(Error::TaskNotFound(id))
}

/// List all tasks
pub async fn get_tasks(store: &Store) -> Result<ApiResponse<Vec<Task>>> {
    store.simulate(Operation::List).await;
    let tasks = store.read().await.tasks.clone();
    debug!(count = tasks.len(), "Listed tasks");
    Ok(ApiResponse::ok(tasks))
}

/// Get a task by ID
pub async fn get_task_by_id(store: &Store, id: u64) -> Result<ApiResponse<Task>> {
    store.simulate(Operation::Get).await;
    let task = store.read().await.task(id).cloned().ok_or(Error::TaskNotFound(id))?;
    Ok(ApiResponse::ok(task))
}

/// Create a new task.
///
/// An unknown project id is kept as given with no project snapshot.
pub async fn create_task(store: &Store, request: CreateTaskRequest) -> Result<ApiResponse<Task>> {
    store.simulate(Operation::Create).await;
    let mut collections = store.write().await;

    let now = Utc::now();
    let task = Task {
        id: next_id(&collections.tasks),
        title: request.title,
        description: request.description,
        status: request.status.unwrap_or_default(),
        priority: request.priority,
        project_id: request.project_id,
        project: collections.project_snapshot(request.project_id),
        assignee_id: request.assignee_id,
        assignee: collections.assignee_snapshot(request.assignee_id),
        tags: request.tag_ids.as_deref().map(tag_snapshots).unwrap_or_default(),
        due_date: request.due_date,
        estimated_hours: request.estimated_hours,
        completed_at: None,
        created_at: now,
        last_modified_at: now,
        subtasks: Vec::new(),
        comments: 0,
        attachments: 0,
    };
    collections.tasks.push(task.clone());

    info!(id = task.id, project_id = task.project_id, "Created task");
    Ok(ApiResponse::ok(task))
}

/// Update a task.
///
/// Snapshots are re-resolved only for the references present in the
/// request. `completedAt` is stamped on the first move to COMPLETED and
/// kept afterwards.
pub async fn update_task(
    store: &Store,
    id: u64,
    request: UpdateTaskRequest,
) -> Result<ApiResponse<Task>> {
    store.simulate(Operation::Update).await;
    let mut collections = store.write().await;

    let project = request.project_id.map(|pid| collections.project_snapshot(pid));
    let assignee = request
        .assignee_id
        .map(|aid| collections.assignee_snapshot(aid));
    let task = find_task_mut(&mut collections, id)?;
    let now = Utc::now();

    if let Some(title) = request.title {
        task.title = title;
    }
    if let Some(description) = request.description {
        task.description = description;
    }
    if let Some(status) = request.status {
        if status == TaskStatus::Completed && task.completed_at.is_none() {
            task.completed_at = Some(now);
        }
        task.status = status;
    }
    if let Some(priority) = request.priority {
        task.priority = priority;
    }
    if let (Some(project_id), Some(project)) = (request.project_id, project) {
        task.project_id = project_id;
        task.project = project;
    }
    if let (Some(assignee_id), Some(assignee)) = (request.assignee_id, assignee) {
        task.assignee_id = assignee_id;
        task.assignee = assignee;
    }
    if let Some(tag_ids) = request.tag_ids {
        task.tags = tag_snapshots(&tag_ids);
    }
    if let Some(due_date) = request.due_date {
        task.due_date = due_date;
    }
    if let Some(hours) = request.estimated_hours {
        task.estimated_hours = Some(hours);
    }
    task.last_modified_at = now;

    info!(id, status = task.status.as_str(), "Updated task");
    Ok(ApiResponse::ok(task.clone()))
}

/// Move a task to another status
pub async fn update_task_status(
    store: &Store,
    id: u64,
    status: TaskStatus,
) -> Result<ApiResponse<Task>> {
    update_task(store, id, UpdateTaskRequest::status(status)).await
}

/// Delete a task
pub async fn delete_task(store: &Store, id: u64) -> Result<ApiResponse<DeleteResult>> {
    store.simulate(Operation::Delete).await;
    let mut collections = store.write().await;

    if collections.task(id).is_none() {
        return Err(Error::TaskNotFound(id));
    }
    collections.tasks.retain(|t| t.id != id);

    info!(id, "Deleted task");
    Ok(ApiResponse::ok(DeleteResult::new(id)))
}

/// Flip a subtask between done and not done
pub async fn toggle_subtask(
    store: &Store,
    task_id: u64,
    subtask_id: u64,
) -> Result<ApiResponse<Task>> {
    store.simulate(Operation::ToggleSubtask).await;
    let mut collections = store.write().await;

    let task = find_task_mut(&mut collections, task_id)?;
    let subtask = task
        .subtasks
        .iter_mut()
        .find(|s| s.id == subtask_id)
        .ok_or(Error::SubtaskNotFound {
            task_id,
            subtask_id,
        })?;
    subtask.completed = !subtask.completed;
    let completed = subtask.completed;
    task.last_modified_at = Utc::now();

    debug!(task_id, subtask_id, completed, "Toggled subtask");
    Ok(ApiResponse::ok(task.clone()))
}

/// Append an open subtask. Subtask ids are unique across all tasks.
pub async fn add_subtask(store: &Store, task_id: u64, title: &str) -> Result<ApiResponse<Task>> {
    store.simulate(Operation::AddSubtask).await;
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("subtask title cannot be empty".to_string()));
    }

    let mut collections = store.write().await;
    let subtask_id = collections.max_subtask_id() + 1;
    let task = find_task_mut(&mut collections, task_id)?;
    task.subtasks.push(Subtask::new(subtask_id, title, false));
    task.last_modified_at = Utc::now();

    info!(task_id, subtask_id, "Added subtask");
    Ok(ApiResponse::ok(task.clone()))
}

/// Task counters as of now
pub async fn get_task_stats(store: &Store) -> Result<ApiResponse<TaskStats>> {
    store.simulate(Operation::Stats).await;
    let collections = store.read().await;
    let stats = TaskStats::compute(&collections.tasks, &collections.projects, Utc::now());
    Ok(ApiResponse::ok(stats))
}
