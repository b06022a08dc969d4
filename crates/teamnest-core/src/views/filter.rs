//! List filters
//!
//! Search is a case-insensitive substring match; every other criterion is
//! an exact match, and `None` means "all".

use crate::domain::{Project, ProjectStatus, Role, Task, TaskPriority, TaskStatus, User, UserStatus};

/// Predicate over a list item
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;

    /// Matching items, in their original order
    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Matches name or description
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl Filter<Project> for ProjectQuery {
    fn matches(&self, project: &Project) -> bool {
        let matches_search = normalized(&self.search).is_none_or(|q| {
            contains(&project.name, &q) || contains(&project.description, &q)
        });
        matches_search && self.status.is_none_or(|s| project.status == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    /// Matches full name or email
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    pub role_id: Option<u64>,
    pub department: Option<String>,
}

impl Filter<User> for MemberQuery {
    fn matches(&self, user: &User) -> bool {
        let matches_search = normalized(&self.search)
            .is_none_or(|q| contains(&user.full_name(), &q) || contains(&user.email, &q));
        matches_search
            && self.status.is_none_or(|s| user.status == s)
            && self.role_id.is_none_or(|r| user.role_id == r)
            && self
                .department
                .as_deref()
                .is_none_or(|d| user.department == d)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    /// Matches name or description
    pub search: Option<String>,
}

impl Filter<Role> for RoleQuery {
    fn matches(&self, role: &Role) -> bool {
        normalized(&self.search)
            .is_none_or(|q| contains(&role.name, &q) || contains(&role.description, &q))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Matches title or description
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<u64>,
    pub assignee_id: Option<u64>,
}

impl Filter<Task> for TaskQuery {
    fn matches(&self, task: &Task) -> bool {
        let matches_search = normalized(&self.search)
            .is_none_or(|q| contains(&task.title, &q) || contains(&task.description, &q));
        matches_search
            && self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.project_id.is_none_or(|p| task.project_id == p)
            && self.assignee_id.is_none_or(|a| task.assignee_id == Some(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed;

    #[test]
    fn test_project_search_is_case_insensitive() {
        let c = seed::collections();
        let query = ProjectQuery {
            search: Some("  SPRING ".into()),
            status: None,
        };
        let names: Vec<&str> = query.apply(&c.projects).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Backend API"]);
    }

    #[test]
    fn test_project_status_filter() {
        let c = seed::collections();
        let query = ProjectQuery {
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        };
        assert_eq!(query.apply(&c.projects).len(), 1);
        assert_eq!(ProjectQuery::default().apply(&c.projects).len(), 5);
    }

    #[test]
    fn test_member_filters_combine() {
        let c = seed::collections();
        let query = MemberQuery {
            role_id: Some(3),
            department: Some("Engineering".into()),
            status: Some(UserStatus::Active),
            ..Default::default()
        };
        let ids: Vec<u64> = query.apply(&c.users).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 5]);
    }

    #[test]
    fn test_member_search_matches_full_name_and_email() {
        let c = seed::collections();
        let by_name = MemberQuery {
            search: Some("sarah chen".into()),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&c.users).len(), 1);

        let by_email = MemberQuery {
            search: Some("@teamnest.app".into()),
            ..Default::default()
        };
        assert_eq!(by_email.apply(&c.users).len(), 8);
    }

    #[test]
    fn test_role_search() {
        let c = seed::collections();
        let query = RoleQuery {
            search: Some("read-only".into()),
        };
        let names: Vec<&str> = query.apply(&c.roles).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Viewer"]);
    }

    #[test]
    fn test_task_filters() {
        let c = seed::collections();
        let query = TaskQuery {
            project_id: Some(3),
            assignee_id: Some(5),
            ..Default::default()
        };
        let ids: Vec<u64> = query.apply(&c.tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 6]);

        let urgent = TaskQuery {
            priority: Some(TaskPriority::Urgent),
            ..Default::default()
        };
        assert_eq!(urgent.apply(&c.tasks).len(), 1);
    }
}
