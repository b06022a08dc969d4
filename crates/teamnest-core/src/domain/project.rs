//! Projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;
use super::snapshot::{TaskSnapshot, UserSnapshot};

/// Display-only tenant label shared by every seeded and created project
pub const DEFAULT_TENANT_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

/// Card gradients handed out to new projects in rotation
pub const PROJECT_COLORS: &[&str] = &[
    "from-violet-500 to-purple-600",
    "from-blue-500 to-cyan-500",
    "from-emerald-500 to-teal-500",
    "from-amber-500 to-orange-500",
    "from-pink-500 to-rose-500",
];

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Archived => "ARCHIVED",
        }
    }

    /// Parse a status name; accepts `on-hold` as well as `ON_HOLD`
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "ACTIVE" => Some(ProjectStatus::Active),
            "ON_HOLD" => Some(ProjectStatus::OnHold),
            "COMPLETED" => Some(ProjectStatus::Completed),
            "ARCHIVED" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }
}

/// A project with its checklist and members embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub color: String,
    pub tasks: Vec<TaskSnapshot>,
    pub users: Vec<UserSnapshot>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl Project {
    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Share of completed checklist entries, as a rounded percentage
    pub fn progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let ratio = self.completed_tasks() as f64 / self.tasks.len() as f64;
        (ratio * 100.0).round() as u8
    }
}

impl Identified for Project {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Color for a project id, cycling through the palette
pub fn color_for(id: u64) -> &'static str {
    let index = (id.saturating_sub(1) as usize) % PROJECT_COLORS.len();
    PROJECT_COLORS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(tasks: Vec<TaskSnapshot>) -> Project {
        let now = Utc::now();
        Project {
            id: 1,
            tenant_id: DEFAULT_TENANT_ID,
            name: "Alpha".to_string(),
            description: String::new(),
            status: ProjectStatus::Active,
            color: color_for(1).to_string(),
            tasks,
            users: Vec::new(),
            created_at: now,
            last_modified_at: now,
        }
    }

    #[test]
    fn test_progress_empty_is_zero() {
        assert_eq!(project(Vec::new()).progress(), 0);
    }

    #[test]
    fn test_progress_rounds() {
        let p = project(vec![
            TaskSnapshot::new(1, "a", true),
            TaskSnapshot::new(2, "b", true),
            TaskSnapshot::new(3, "c", false),
        ]);
        assert_eq!(p.completed_tasks(), 2);
        assert_eq!(p.progress(), 67);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ProjectStatus::parse("on-hold"), Some(ProjectStatus::OnHold));
        assert_eq!(ProjectStatus::parse("ARCHIVED"), Some(ProjectStatus::Archived));
        assert_eq!(ProjectStatus::parse("paused"), None);
    }

    #[test]
    fn test_tenant_id_literal() {
        assert_eq!(
            DEFAULT_TENANT_ID.to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_color_rotation() {
        assert_eq!(color_for(1), PROJECT_COLORS[0]);
        assert_eq!(color_for(6), PROJECT_COLORS[0]);
        assert_eq!(color_for(0), PROJECT_COLORS[0]);
    }
}
