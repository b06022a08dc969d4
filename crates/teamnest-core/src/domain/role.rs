//! Roles and their permission sets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Identified;

/// A named bundle of permissions assigned to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub color: String,
    pub permissions: BTreeSet<String>,
    /// Number of users holding this role, maintained by the user operations
    pub users_count: u32,
    pub created_at: DateTime<Utc>,
    /// Built-in roles cannot be deleted
    pub is_system: bool,
}

impl Role {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Whether the role may be removed right now
    pub fn is_deletable(&self) -> bool {
        !self.is_system && self.users_count == 0
    }
}

impl Identified for Role {
    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(is_system: bool, users_count: u32) -> Role {
        Role {
            id: 1,
            name: "QA".to_string(),
            description: String::new(),
            color: String::new(),
            permissions: ["tasks.read".to_string()].into_iter().collect(),
            users_count,
            created_at: Utc::now(),
            is_system,
        }
    }

    #[test]
    fn test_deletable() {
        assert!(role(false, 0).is_deletable());
        assert!(!role(true, 0).is_deletable());
        assert!(!role(false, 1).is_deletable());
    }

    #[test]
    fn test_has_permission() {
        let r = role(false, 0);
        assert!(r.has_permission("tasks.read"));
        assert!(!r.has_permission("tasks.manage"));
    }
}
