//! Read-only catalogs: task tags, permissions and departments

use serde::Serialize;

/// Task label from the fixed tag catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: u64,
    pub name: &'static str,
    pub color: &'static str,
}

/// Capability that can be granted to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

pub const TAGS: &[Tag] = &[
    Tag {
        id: 1,
        name: "Bug",
        color: "bg-destructive/10 text-destructive border-destructive/20",
    },
    Tag {
        id: 2,
        name: "Feature",
        color: "bg-info/10 text-info border-info/20",
    },
    Tag {
        id: 3,
        name: "Enhancement",
        color: "bg-primary/10 text-primary border-primary/20",
    },
    Tag {
        id: 4,
        name: "Documentation",
        color: "bg-warning/10 text-warning border-warning/20",
    },
    Tag {
        id: 5,
        name: "Design",
        color: "bg-pink-500/10 text-pink-600 border-pink-500/20",
    },
    Tag {
        id: 6,
        name: "Testing",
        color: "bg-success/10 text-success border-success/20",
    },
    Tag {
        id: 7,
        name: "Refactor",
        color: "bg-pending/10 text-pending border-pending/20",
    },
    Tag {
        id: 8,
        name: "Research",
        color: "bg-cyan-500/10 text-cyan-600 border-cyan-500/20",
    },
];

pub const PERMISSIONS: &[Permission] = &[
    Permission {
        id: "users.create",
        label: "Create Users",
        category: "Users",
    },
    Permission {
        id: "users.read",
        label: "View Users",
        category: "Users",
    },
    Permission {
        id: "users.update",
        label: "Update Users",
        category: "Users",
    },
    Permission {
        id: "users.delete",
        label: "Delete Users",
        category: "Users",
    },
    Permission {
        id: "roles.manage",
        label: "Manage Roles",
        category: "Roles",
    },
    Permission {
        id: "projects.read",
        label: "View Projects",
        category: "Projects",
    },
    Permission {
        id: "projects.manage",
        label: "Manage Projects",
        category: "Projects",
    },
    Permission {
        id: "tasks.read",
        label: "View Tasks",
        category: "Tasks",
    },
    Permission {
        id: "tasks.manage",
        label: "Manage Tasks",
        category: "Tasks",
    },
    Permission {
        id: "tasks.update",
        label: "Update Tasks",
        category: "Tasks",
    },
    Permission {
        id: "settings.manage",
        label: "Manage Settings",
        category: "Settings",
    },
];

pub const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Design",
    "Marketing",
    "Product",
    "Sales",
    "Support",
    "HR",
    "Finance",
];

/// Look up a tag by id
pub fn tag(id: u64) -> Option<&'static Tag> {
    TAGS.iter().find(|t| t.id == id)
}

/// Tags matching the given ids, in catalog order; unknown ids are skipped
pub fn tags_for(ids: &[u64]) -> Vec<&'static Tag> {
    TAGS.iter().filter(|t| ids.contains(&t.id)).collect()
}

/// Whether a permission tag exists in the catalog
pub fn is_known_permission(id: &str) -> bool {
    PERMISSIONS.iter().any(|p| p.id == id)
}

/// Permission categories in catalog order, without duplicates
pub fn permission_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for permission in PERMISSIONS {
        if !categories.contains(&permission.category) {
            categories.push(permission.category);
        }
    }
    categories
}
