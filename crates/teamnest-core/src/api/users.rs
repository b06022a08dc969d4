//! Users API
//!
//! Team member CRUD. Every write keeps the role counters in step with the
//! member list.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Operation;
use crate::domain::catalog::DEPARTMENTS;
use crate::domain::user::{avatar_for, initials_for};
use crate::domain::{Role, RoleSnapshot, User, UserStatus, next_id};
use crate::storage::Store;
use crate::{Error, Result};

use super::{ApiResponse, DeleteResult};

/// Role given to new members whose role id does not resolve
pub const FALLBACK_ROLE_ID: u64 = 5;

/// Create user request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_title: String,
    pub role_id: u64,
    /// Defaults to PENDING
    pub status: Option<UserStatus>,
}

/// Partial user update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub role_id: Option<u64>,
    pub status: Option<UserStatus>,
}

/// Number of members in a named group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

/// Member counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub pending: usize,
    pub suspended: usize,
    /// Every catalog department, including empty ones
    pub by_department: Vec<GroupCount>,
    /// Every role, counted from the members' role ids
    pub by_role: Vec<GroupCount>,
}

impl UserStats {
    pub fn compute(users: &[User], roles: &[Role]) -> Self {
        let by_status = |status| users.iter().filter(|u| u.status == status).count();
        Self {
            total: users.len(),
            active: by_status(UserStatus::Active),
            inactive: by_status(UserStatus::Inactive),
            pending: by_status(UserStatus::Pending),
            suspended: by_status(UserStatus::Suspended),
            by_department: DEPARTMENTS
                .iter()
                .map(|dept| GroupCount {
                    name: dept.to_string(),
                    count: users.iter().filter(|u| u.department == *dept).count(),
                })
                .collect(),
            by_role: roles
                .iter()
                .map(|role| GroupCount {
                    name: role.name.clone(),
                    count: users.iter().filter(|u| u.role_id == role.id).count(),
                })
                .collect(),
        }
    }
}

/// List all users
pub async fn get_users(store: &Store) -> Result<ApiResponse<Vec<User>>> {
    store.simulate(Operation::List).await;
    let users = store.read().await.users.clone();
    debug!(count = users.len(), "Listed users");
    Ok(ApiResponse::ok(users))
}

/// Get a user by ID
pub async fn get_user_by_id(store: &Store, id: u64) -> Result<ApiResponse<User>> {
    store.simulate(Operation::Get).await;
    let user = store.read().await.user(id).cloned().ok_or(Error::UserNotFound(id))?;
    Ok(ApiResponse::ok(user))
}

/// Create a new user and count them against their role.
///
/// An unknown role id falls back to the Viewer role.
pub async fn create_user(store: &Store, request: CreateUserRequest) -> Result<ApiResponse<User>> {
    store.simulate(Operation::Create).await;
    let mut collections = store.write().await;

    let role_id = if collections.role(request.role_id).is_some() {
        request.role_id
    } else {
        warn!(
            role_id = request.role_id,
            fallback = FALLBACK_ROLE_ID,
            "Unknown role for new user, using fallback"
        );
        FALLBACK_ROLE_ID
    };

    let now = Utc::now();
    let user = User {
        id: next_id(&collections.users),
        initials: initials_for(&request.first_name, &request.last_name),
        avatar: avatar_for(&request.first_name),
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        department: request.department,
        job_title: request.job_title,
        role_id,
        role: collections.role_snapshot(role_id),
        status: request.status.unwrap_or_default(),
        last_active: None,
        created_at: now,
        last_modified_at: now,
    };
    collections.users.push(user.clone());
    collections.adjust_role_count(role_id, 1);

    info!(id = user.id, role_id, "Created user");
    Ok(ApiResponse::ok(user))
}

/// Update a user; moving them to another role shifts one count between
/// the two roles
pub async fn update_user(
    store: &Store,
    id: u64,
    request: UpdateUserRequest,
) -> Result<ApiResponse<User>> {
    store.simulate(Operation::Update).await;
    let mut collections = store.write().await;

    let new_role: Option<RoleSnapshot> = match request.role_id {
        Some(role_id) => Some(
            collections
                .role_snapshot(role_id)
                .ok_or(Error::RoleNotFound(role_id))?,
        ),
        None => None,
    };

    let user = collections
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or(Error::UserNotFound(id))?;
    let old_role_id = user.role_id;

    let renamed = request.first_name.is_some() || request.last_name.is_some();
    if let Some(first_name) = request.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
        user.last_name = last_name;
    }
    if renamed {
        user.initials = initials_for(&user.first_name, &user.last_name);
    }
    if let Some(email) = request.email {
        user.email = email;
    }
    if let Some(phone) = request.phone {
        user.phone = Some(phone);
    }
    if let Some(department) = request.department {
        user.department = department;
    }
    if let Some(job_title) = request.job_title {
        user.job_title = job_title;
    }
    if let Some(status) = request.status {
        user.status = status;
    }
    if let Some(role) = new_role {
        user.role_id = role.id;
        user.role = Some(role);
    }
    user.last_modified_at = Utc::now();

    let user = user.clone();
    if user.role_id != old_role_id {
        collections.adjust_role_count(old_role_id, -1);
        collections.adjust_role_count(user.role_id, 1);
        debug!(id, from = old_role_id, to = user.role_id, "Moved user between roles");
    }

    info!(id, "Updated user");
    Ok(ApiResponse::ok(user))
}

/// Delete a user and release their role count
pub async fn delete_user(store: &Store, id: u64) -> Result<ApiResponse<DeleteResult>> {
    store.simulate(Operation::Delete).await;
    let mut collections = store.write().await;

    let role_id = collections.user(id).map(|u| u.role_id).ok_or(Error::UserNotFound(id))?;
    collections.users.retain(|u| u.id != id);
    collections.adjust_role_count(role_id, -1);

    info!(id, role_id, "Deleted user");
    Ok(ApiResponse::ok(DeleteResult::new(id)))
}

/// Member counters
pub async fn get_user_stats(store: &Store) -> Result<ApiResponse<UserStats>> {
    store.simulate(Operation::Stats).await;
    let collections = store.read().await;
    let stats = UserStats::compute(&collections.users, &collections.roles);
    Ok(ApiResponse::ok(stats))
}
