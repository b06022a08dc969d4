//! TeamNest Core Integration Tests

use std::time::Duration;

use teamnest_core::{
    Error,
    api::{
        projects::{self, CreateProjectRequest},
        roles::{self, CreateRoleRequest},
        tasks::{self, CreateTaskRequest, UpdateTaskRequest},
        users::{self, CreateUserRequest, UpdateUserRequest},
    },
    config::LatencyConfig,
    domain::{ProjectStatus, TaskStatus},
    storage::Store,
    views::{Filter, Pagination, ProjectQuery, TaskBoard},
};

fn store() -> Store {
    Store::seeded(LatencyConfig::disabled())
}

#[tokio::test]
async fn test_project_create_delete_scenario() {
    let store = store();
    let before = projects::get_projects(&store).await.unwrap().data;
    let max_id = before.iter().map(|p| p.id).max().unwrap();

    let created = projects::create_project(
        &store,
        CreateProjectRequest {
            name: "X".into(),
            description: "Y".into(),
            status: ProjectStatus::Active,
            user_ids: None,
        },
    )
    .await
    .unwrap();
    assert!(created.success);
    let project = created.data;
    assert_eq!(project.id, max_id + 1);
    assert!(project.tasks.is_empty());
    assert!(project.users.is_empty());

    let deleted = projects::delete_project(&store, project.id).await.unwrap().data;
    assert!(deleted.deleted);
    assert_eq!(deleted.id, project.id);

    let after = projects::get_projects(&store).await.unwrap().data;
    assert!(after.iter().all(|p| p.id != project.id));
    assert_eq!(after.len(), before.len());
}

#[tokio::test]
async fn test_ids_stay_above_existing_after_deletes() {
    let store = store();
    projects::delete_project(&store, 2).await.unwrap();

    let project = projects::create_project(
        &store,
        CreateProjectRequest {
            name: "Later".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .data;
    assert_eq!(project.id, 6);
}

#[tokio::test]
async fn test_not_found_messages() {
    let store = store();
    let cases = [
        projects::delete_project(&store, 404).await.map(|_| ()),
        tasks::delete_task(&store, 404).await.map(|_| ()),
        users::delete_user(&store, 404).await.map(|_| ()),
        roles::delete_role(&store, 404).await.map(|_| ()),
    ];
    let messages: Vec<String> = cases
        .into_iter()
        .map(|r| r.unwrap_err().to_string())
        .collect();
    assert_eq!(
        messages,
        vec!["Project not found", "Task not found", "User not found", "Role not found"]
    );
}

#[tokio::test]
async fn test_role_counts_follow_user_lifecycle() {
    let store = store();
    let role = roles::create_role(
        &store,
        CreateRoleRequest {
            name: "Contractor".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .data;

    let user = users::create_user(
        &store,
        CreateUserRequest {
            first_name: "Omar".into(),
            last_name: "Haddad".into(),
            email: "omar@teamnest.app".into(),
            role_id: role.id,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .data;
    let count = |store: Store, id| async move {
        roles::get_role_by_id(&store, id).await.unwrap().data.users_count
    };
    assert_eq!(count(store.clone(), role.id).await, 1);

    let err = roles::delete_role(&store, role.id).await.unwrap_err();
    assert!(matches!(err, Error::RoleInUse { .. }));

    users::update_user(
        &store,
        user.id,
        UpdateUserRequest {
            role_id: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(count(store.clone(), role.id).await, 0);
    assert_eq!(count(store.clone(), 5).await, 1);

    users::delete_user(&store, user.id).await.unwrap();
    assert_eq!(count(store.clone(), 5).await, 0);

    roles::delete_role(&store, role.id).await.unwrap();
    let remaining = roles::get_roles(&store).await.unwrap().data;
    assert!(remaining.iter().all(|r| r.id != role.id));
}

#[tokio::test]
async fn test_stats_sum_to_collection_length() {
    let store = store();
    let p = projects::get_project_stats(&store).await.unwrap().data;
    assert_eq!(p.active + p.on_hold + p.completed + p.archived, p.total);

    let t = tasks::get_task_stats(&store).await.unwrap().data;
    assert_eq!(t.todo + t.in_progress + t.in_review + t.completed + t.cancelled, t.total);
    let b = t.by_priority;
    assert_eq!(b.urgent + b.high + b.medium + b.low, t.total);

    let u = users::get_user_stats(&store).await.unwrap().data;
    assert_eq!(u.active + u.inactive + u.pending + u.suspended, u.total);

    let r = roles::get_role_stats(&store).await.unwrap().data;
    assert_eq!(r.system + r.custom, r.total);
}

#[tokio::test]
async fn test_snapshots_drift_until_refreshed() {
    let store = store();
    projects::update_project(
        &store,
        1,
        projects::UpdateProjectRequest {
            name: Some("Team Nest Platform".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let task = tasks::get_task_by_id(&store, 1).await.unwrap().data;
    assert_eq!(task.project.unwrap().name, "Team Nest App");

    let report = store.refresh_snapshots().await;
    assert!(report.tasks > 0);

    let task = tasks::get_task_by_id(&store, 1).await.unwrap().data;
    assert_eq!(task.project.unwrap().name, "Team Nest Platform");
}

#[tokio::test]
async fn test_board_and_filters_over_api_results() {
    let store = store();
    let task = tasks::create_task(
        &store,
        CreateTaskRequest {
            title: "Spike: offline mode".into(),
            project_id: 4,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .data;
    tasks::update_task(&store, task.id, UpdateTaskRequest::status(TaskStatus::InReview))
        .await
        .unwrap();

    let all = tasks::get_tasks(&store).await.unwrap().data;
    let board = TaskBoard::build(&all);
    assert_eq!(board.total(), 13);
    assert_eq!(board.column(TaskStatus::InReview).unwrap().tasks.len(), 2);

    let projects = projects::get_projects(&store).await.unwrap().data;
    let active = ProjectQuery {
        status: Some(ProjectStatus::Active),
        ..Default::default()
    };
    let filtered: Vec<_> = active.apply(&projects).into_iter().cloned().collect();
    let page = Pagination::new(2).paginate(&filtered);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test(start_paused = true)]
async fn test_latency_applies_per_operation() {
    let store = Store::seeded(LatencyConfig::default());

    let started = tokio::time::Instant::now();
    projects::get_projects(&store).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(500));

    let started = tokio::time::Instant::now();
    roles::get_roles(&store).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));

    let started = tokio::time::Instant::now();
    tasks::toggle_subtask(&store, 1, 1).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_call_leaves_store_untouched() {
    let store = Store::seeded(LatencyConfig::default());
    let pending = projects::delete_project(&store, 1);
    let outcome = tokio::time::timeout(Duration::from_millis(100), pending).await;
    assert!(outcome.is_err());

    assert!(store.read().await.project(1).is_some());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let store = store();
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                tasks::create_task(
                    &store,
                    CreateTaskRequest {
                        title: format!("Task {i}"),
                        project_id: 1,
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
                .data
                .id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (13..23).collect::<Vec<u64>>());
}
