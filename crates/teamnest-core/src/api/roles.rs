//! Roles API

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::Operation;
use crate::domain::catalog;
use crate::domain::{Role, RoleSnapshot, User, next_id};
use crate::storage::Store;
use crate::{Error, Result};

use super::{ApiResponse, DeleteResult};

/// Create role request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

/// Partial role update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub permissions: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleStats {
    pub total: usize,
    pub system: usize,
    pub custom: usize,
    pub total_users: usize,
}

impl RoleStats {
    pub fn compute(roles: &[Role], users: &[User]) -> Self {
        let system = roles.iter().filter(|r| r.is_system).count();
        Self {
            total: roles.len(),
            system,
            custom: roles.len() - system,
            total_users: users.len(),
        }
    }
}

fn warn_unknown_permissions(permissions: &BTreeSet<String>) {
    for permission in permissions.iter().filter(|p| !catalog::is_known_permission(p)) {
        warn!(%permission, "Permission is not in the catalog");
    }
}

/// List all roles
pub async fn get_roles(store: &Store) -> Result<ApiResponse<Vec<Role>>> {
    store.simulate(Operation::ListRoles).await;
    let roles = store.read().await.roles.clone();
    debug!(count = roles.len(), "Listed roles");
    Ok(ApiResponse::ok(roles))
}

/// Get a role by ID
pub async fn get_role_by_id(store: &Store, id: u64) -> Result<ApiResponse<Role>> {
    store.simulate(Operation::Get).await;
    let role = store.read().await.role(id).cloned().ok_or(Error::RoleNotFound(id))?;
    Ok(ApiResponse::ok(role))
}

/// Create a custom role with no members
pub async fn create_role(store: &Store, request: CreateRoleRequest) -> Result<ApiResponse<Role>> {
    store.simulate(Operation::Create).await;
    warn_unknown_permissions(&request.permissions);
    let mut collections = store.write().await;

    let role = Role {
        id: next_id(&collections.roles),
        name: request.name,
        description: request.description,
        color: request.color,
        permissions: request.permissions,
        users_count: 0,
        created_at: Utc::now(),
        is_system: false,
    };
    collections.roles.push(role.clone());

    info!(id = role.id, name = %role.name, "Created role");
    Ok(ApiResponse::ok(role))
}

/// Update a role and re-embed it into every member holding it
pub async fn update_role(
    store: &Store,
    id: u64,
    request: UpdateRoleRequest,
) -> Result<ApiResponse<Role>> {
    store.simulate(Operation::Update).await;
    if let Some(permissions) = &request.permissions {
        warn_unknown_permissions(permissions);
    }
    let mut collections = store.write().await;

    let role = collections
        .roles
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(Error::RoleNotFound(id))?;

    if let Some(name) = request.name {
        role.name = name;
    }
    if let Some(description) = request.description {
        role.description = description;
    }
    if let Some(color) = request.color {
        role.color = color;
    }
    if let Some(permissions) = request.permissions {
        role.permissions = permissions;
    }
    let role = role.clone();

    let snapshot = RoleSnapshot::from(&role);
    let mut members = 0;
    for user in collections.users.iter_mut().filter(|u| u.role_id == id) {
        user.role = Some(snapshot.clone());
        members += 1;
    }

    info!(id, members, "Updated role");
    Ok(ApiResponse::ok(role))
}

/// Delete a custom role that nobody holds
pub async fn delete_role(store: &Store, id: u64) -> Result<ApiResponse<DeleteResult>> {
    store.simulate(Operation::Delete).await;
    let mut collections = store.write().await;

    let role = collections.role(id).ok_or(Error::RoleNotFound(id))?;
    if !role.is_deletable() {
        return Err(if role.is_system {
            Error::SystemRoleProtected(id)
        } else {
            Error::RoleInUse {
                id,
                users_count: role.users_count,
            }
        });
    }
    collections.roles.retain(|r| r.id != id);

    info!(id, "Deleted role");
    Ok(ApiResponse::ok(DeleteResult::new(id)))
}

/// Role counters
pub async fn get_role_stats(store: &Store) -> Result<ApiResponse<RoleStats>> {
    store.simulate(Operation::Stats).await;
    let collections = store.read().await;
    Ok(ApiResponse::ok(RoleStats::compute(&collections.roles, &collections.users)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;

    fn store() -> Store {
        Store::seeded(LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_create_role_is_custom_and_empty() {
        let store = store();
        let role = create_role(
            &store,
            CreateRoleRequest {
                name: "QA".into(),
                permissions: ["tasks.read".to_string()].into_iter().collect(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;

        assert_eq!(role.id, 6);
        assert_eq!(role.users_count, 0);
        assert!(!role.is_system);
        assert!(role.has_permission("tasks.read"));
    }

    #[tokio::test]
    async fn test_update_role_refreshes_member_snapshots() {
        let store = store();
        update_role(
            &store,
            3,
            UpdateRoleRequest {
                name: Some("Engineer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let c = store.read().await;
        for user in c.users.iter().filter(|u| u.role_id == 3) {
            assert_eq!(user.role.as_ref().unwrap().name, "Engineer");
        }
        assert_eq!(c.user(1).unwrap().role.as_ref().unwrap().name, "Admin");
    }

    #[tokio::test]
    async fn test_delete_system_role_refused() {
        let store = store();
        let before = store.read().await.roles.clone();

        let err = delete_role(&store, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete system role");
        assert_eq!(store.read().await.roles, before);
    }

    #[tokio::test]
    async fn test_delete_unheld_system_role_refused() {
        let store = store();
        assert_eq!(store.read().await.role(5).unwrap().users_count, 0);

        let err = delete_role(&store, 5).await.unwrap_err();
        assert!(matches!(err, Error::SystemRoleProtected(5)));
        assert!(store.read().await.role(5).is_some());
    }

    #[tokio::test]
    async fn test_delete_role_in_use_refused() {
        let store = store();
        let err = delete_role(&store, 3).await.unwrap_err();
        assert!(matches!(err, Error::RoleInUse { id: 3, users_count: 3 }));
        assert_eq!(err.to_string(), "Cannot delete role with assigned users");
        assert!(store.read().await.role(3).is_some());
    }

    #[tokio::test]
    async fn test_delete_empty_custom_role() {
        let store = store();
        let role = create_role(
            &store,
            CreateRoleRequest {
                name: "Temp".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;

        let result = delete_role(&store, role.id).await.unwrap().data;
        assert!(result.deleted);
        assert!(matches!(
            delete_role(&store, role.id).await,
            Err(Error::RoleNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_role_stats() {
        let stats = get_role_stats(&store()).await.unwrap().data;
        assert_eq!(
            stats,
            RoleStats {
                total: 5,
                system: 3,
                custom: 2,
                total_users: 8,
            }
        );
    }
}
