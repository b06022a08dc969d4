//! Dashboard summary
//!
//! Headline counters, the current user's tasks, per-project progress and a
//! team roster with completed-task counts, derived from full entity lists.

use serde::Serialize;

use crate::domain::{Project, ProjectStatus, Task, TaskStatus, User, UserStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub total_projects: usize,
    pub active_projects: usize,
    /// Tasks that are neither completed nor cancelled
    pub open_tasks: usize,
    pub in_progress_tasks: usize,
    pub team_members: usize,
    pub active_members: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: u64,
    pub name: String,
    pub status: ProjectStatus,
    pub completed: usize,
    pub total: usize,
    pub progress: u8,
    pub member_initials: Vec<String>,
}

impl From<&Project> for ProjectProgress {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            status: project.status,
            completed: project.completed_tasks(),
            total: project.tasks.len(),
            progress: project.progress(),
            member_initials: project.users.iter().map(|u| u.initials.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberCard {
    pub id: u64,
    pub name: String,
    pub initials: String,
    pub job_title: String,
    pub status: UserStatus,
    pub tasks_completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub headline: Headline,
    /// Tasks assigned to the current user, store order
    pub my_tasks: Vec<Task>,
    /// How many of `my_tasks` are not completed
    pub my_pending: usize,
    pub projects: Vec<ProjectProgress>,
    pub team: Vec<TeamMemberCard>,
}

impl DashboardSummary {
    pub fn build(
        projects: &[Project],
        tasks: &[Task],
        users: &[User],
        current_user_id: u64,
    ) -> Self {
        let headline = Headline {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            open_tasks: tasks.iter().filter(|t| t.status.is_open()).count(),
            in_progress_tasks: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            team_members: users.len(),
            active_members: users
                .iter()
                .filter(|u| u.status == UserStatus::Active)
                .count(),
        };

        let my_tasks: Vec<Task> = tasks
            .iter()
            .filter(|t| t.assignee_id == Some(current_user_id))
            .cloned()
            .collect();
        let my_pending = my_tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .count();

        let team = users
            .iter()
            .map(|u| TeamMemberCard {
                id: u.id,
                name: u.full_name(),
                initials: u.initials.clone(),
                job_title: u.job_title.clone(),
                status: u.status,
                tasks_completed: tasks
                    .iter()
                    .filter(|t| t.assignee_id == Some(u.id) && t.status == TaskStatus::Completed)
                    .count(),
            })
            .collect();

        Self {
            headline,
            my_tasks,
            my_pending,
            projects: projects.iter().map(ProjectProgress::from).collect(),
            team,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed;

    #[test]
    fn test_headline() {
        let c = seed::collections();
        let summary = DashboardSummary::build(&c.projects, &c.tasks, &c.users, 1);
        assert_eq!(
            summary.headline,
            Headline {
                total_projects: 5,
                active_projects: 3,
                open_tasks: 7,
                in_progress_tasks: 3,
                team_members: 8,
                active_members: 5,
            }
        );
    }

    #[test]
    fn test_my_tasks_for_current_user() {
        let c = seed::collections();
        let summary = DashboardSummary::build(&c.projects, &c.tasks, &c.users, 1);
        let ids: Vec<u64> = summary.my_tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 10, 11]);
        assert_eq!(summary.my_pending, 2);
    }

    #[test]
    fn test_project_progress_from_checklist() {
        let c = seed::collections();
        let summary = DashboardSummary::build(&c.projects, &c.tasks, &c.users, 1);
        let team_nest = &summary.projects[0];
        assert_eq!((team_nest.completed, team_nest.total), (2, 4));
        assert_eq!(team_nest.progress, 50);
        assert_eq!(team_nest.member_initials, vec!["HG", "SC", "MW"]);
        assert_eq!(summary.projects[4].progress, 100);
    }

    #[test]
    fn test_team_completed_counts() {
        let c = seed::collections();
        let summary = DashboardSummary::build(&c.projects, &c.tasks, &c.users, 1);
        let sarah = summary.team.iter().find(|m| m.id == 2).unwrap();
        assert_eq!(sarah.tasks_completed, 2);
    }
}
