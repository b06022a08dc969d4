//! Seed workspace loaded into a fresh store

use chrono::{DateTime, Utc};

use super::Collections;
use crate::domain::catalog;
use crate::domain::project::{self, DEFAULT_TENANT_ID};
use crate::domain::user::{avatar_for, initials_for};
use crate::domain::{
    Project, ProjectStatus, Role, Subtask, TagSnapshot, Task, TaskPriority, TaskSnapshot,
    TaskStatus, User, UserStatus,
};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Full seed: roles, members, projects and tasks with user roles, task
/// projects and assignees resolved, and role counters derived from the
/// seeded members. Project checklists are kept as seeded.
pub fn collections() -> Collections {
    let mut collections = Collections {
        roles: roles(),
        users: users(),
        projects: projects(),
        tasks: tasks(),
    };
    collections.resolve_references();
    collections
}

fn role(
    id: u64,
    name: &str,
    description: &str,
    color: &str,
    permissions: &[&str],
    created_at: &str,
    is_system: bool,
) -> Role {
    Role {
        id,
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        users_count: 0,
        created_at: ts(created_at),
        is_system,
    }
}

fn roles() -> Vec<Role> {
    vec![
        role(
            1,
            "Admin",
            "Full system access with all permissions",
            "from-red-500 to-rose-600",
            &[
                "users.create",
                "users.read",
                "users.update",
                "users.delete",
                "roles.manage",
                "projects.manage",
                "settings.manage",
            ],
            "2025-01-01T00:00:00Z",
            true,
        ),
        role(
            2,
            "Manager",
            "Can manage team members and projects",
            "from-violet-500 to-purple-600",
            &["users.read", "users.update", "projects.manage", "tasks.manage"],
            "2025-01-01T00:00:00Z",
            true,
        ),
        role(
            3,
            "Developer",
            "Access to projects and tasks",
            "from-blue-500 to-cyan-500",
            &["projects.read", "tasks.manage", "users.read"],
            "2025-01-15T00:00:00Z",
            false,
        ),
        role(
            4,
            "Designer",
            "Access to design projects and assets",
            "from-pink-500 to-rose-500",
            &["projects.read", "tasks.read", "tasks.update", "users.read"],
            "2025-02-01T00:00:00Z",
            false,
        ),
        role(
            5,
            "Viewer",
            "Read-only access to projects",
            "from-gray-500 to-slate-600",
            &["projects.read", "tasks.read", "users.read"],
            "2025-01-10T00:00:00Z",
            true,
        ),
    ]
}

struct MemberSeed {
    id: u64,
    first: &'static str,
    last: &'static str,
    department: &'static str,
    job_title: &'static str,
    role_id: u64,
    status: UserStatus,
    last_active: Option<&'static str>,
    created_at: &'static str,
    last_modified_at: &'static str,
}

const MEMBERS: &[MemberSeed] = &[
    MemberSeed {
        id: 1,
        first: "Harshal",
        last: "Ganbote",
        department: "Engineering",
        job_title: "Senior Developer",
        role_id: 1,
        status: UserStatus::Active,
        last_active: Some("2026-02-13T10:30:00Z"),
        created_at: "2025-01-15T10:30:00Z",
        last_modified_at: "2026-02-10T14:20:00Z",
    },
    MemberSeed {
        id: 2,
        first: "Sarah",
        last: "Chen",
        department: "Design",
        job_title: "Lead Designer",
        role_id: 2,
        status: UserStatus::Active,
        last_active: Some("2026-02-13T09:15:00Z"),
        created_at: "2025-02-01T09:00:00Z",
        last_modified_at: "2026-02-08T11:45:00Z",
    },
    MemberSeed {
        id: 3,
        first: "Mike",
        last: "Wilson",
        department: "Engineering",
        job_title: "Full Stack Developer",
        role_id: 3,
        status: UserStatus::Active,
        last_active: Some("2026-02-12T16:30:00Z"),
        created_at: "2025-03-10T08:00:00Z",
        last_modified_at: "2026-02-09T16:30:00Z",
    },
    MemberSeed {
        id: 4,
        first: "Emma",
        last: "Davis",
        department: "Marketing",
        job_title: "Marketing Manager",
        role_id: 2,
        status: UserStatus::Inactive,
        last_active: Some("2026-02-05T10:00:00Z"),
        created_at: "2025-04-01T14:00:00Z",
        last_modified_at: "2026-02-05T10:00:00Z",
    },
    MemberSeed {
        id: 5,
        first: "James",
        last: "Brown",
        department: "Engineering",
        job_title: "DevOps Engineer",
        role_id: 3,
        status: UserStatus::Active,
        last_active: Some("2026-02-13T08:00:00Z"),
        created_at: "2025-05-15T09:00:00Z",
        last_modified_at: "2026-01-25T17:00:00Z",
    },
    MemberSeed {
        id: 6,
        first: "Lisa",
        last: "Park",
        department: "Product",
        job_title: "Product Manager",
        role_id: 2,
        status: UserStatus::Active,
        last_active: Some("2026-02-13T11:00:00Z"),
        created_at: "2025-06-01T10:00:00Z",
        last_modified_at: "2026-02-12T09:00:00Z",
    },
    MemberSeed {
        id: 7,
        first: "David",
        last: "Kim",
        department: "Design",
        job_title: "UX Researcher",
        role_id: 4,
        status: UserStatus::Pending,
        last_active: None,
        created_at: "2026-02-10T14:00:00Z",
        last_modified_at: "2026-02-10T14:00:00Z",
    },
    MemberSeed {
        id: 8,
        first: "Rachel",
        last: "Green",
        department: "Engineering",
        job_title: "Frontend Developer",
        role_id: 3,
        status: UserStatus::Suspended,
        last_active: Some("2026-01-20T15:00:00Z"),
        created_at: "2025-07-01T11:00:00Z",
        last_modified_at: "2026-02-01T10:00:00Z",
    },
];

fn users() -> Vec<User> {
    MEMBERS
        .iter()
        .map(|m| User {
            id: m.id,
            first_name: m.first.to_string(),
            last_name: m.last.to_string(),
            email: format!("{}@teamnest.app", m.first.to_lowercase()),
            avatar: avatar_for(m.first),
            initials: initials_for(m.first, m.last),
            phone: Some(format!("+1 555-01{:02}", m.id)),
            department: m.department.to_string(),
            job_title: m.job_title.to_string(),
            role_id: m.role_id,
            role: None,
            status: m.status,
            last_active: m.last_active.map(ts),
            created_at: ts(m.created_at),
            last_modified_at: ts(m.last_modified_at),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: u64,
    name: &str,
    description: &str,
    status: ProjectStatus,
    created_at: &str,
    last_modified_at: &str,
    checklist: &[(u64, &str, bool)],
    member_ids: &[u64],
) -> (Project, Vec<u64>) {
    let project = Project {
        id,
        tenant_id: DEFAULT_TENANT_ID,
        name: name.to_string(),
        description: description.to_string(),
        status,
        color: project::color_for(id).to_string(),
        tasks: checklist
            .iter()
            .map(|(task_id, title, completed)| TaskSnapshot::new(*task_id, *title, *completed))
            .collect(),
        users: Vec::new(),
        created_at: ts(created_at),
        last_modified_at: ts(last_modified_at),
    };
    (project, member_ids.to_vec())
}

fn projects() -> Vec<Project> {
    let seeds = vec![
        project(
            1,
            "Team Nest App",
            "Multi-tenant team collaboration platform with project management, task tracking, and real-time updates.",
            ProjectStatus::Active,
            "2026-01-15T10:30:00Z",
            "2026-02-10T14:20:00Z",
            &[
                (1, "Design UI", true),
                (2, "Implement Auth", true),
                (3, "Create Dashboard", false),
                (4, "Add Task Management", false),
            ],
            &[1, 2, 3],
        ),
        project(
            2,
            "Portfolio Website",
            "Personal portfolio website showcasing projects and skills with modern animations.",
            ProjectStatus::Active,
            "2026-01-20T09:15:00Z",
            "2026-02-08T11:45:00Z",
            &[
                (5, "Design Homepage", true),
                (6, "Add Projects Section", true),
                (7, "Implement Dark Mode", true),
            ],
            &[1],
        ),
        project(
            3,
            "Backend API",
            "Spring Boot REST API with JWT authentication, PostgreSQL database, and multi-tenant support.",
            ProjectStatus::Active,
            "2026-01-10T08:00:00Z",
            "2026-02-09T16:30:00Z",
            &[
                (8, "Setup Spring Boot", true),
                (9, "Configure Database", true),
                (10, "Implement Auth", false),
                (11, "Create Project Endpoints", false),
                (12, "Add Task Endpoints", false),
            ],
            &[1, 5],
        ),
        project(
            4,
            "Mobile App",
            "React Native mobile application for team collaboration on the go.",
            ProjectStatus::OnHold,
            "2026-02-01T14:00:00Z",
            "2026-02-05T10:00:00Z",
            &[(13, "Design Mockups", true), (14, "Setup Project", false)],
            &[2, 4],
        ),
        project(
            5,
            "Design System",
            "Comprehensive design system with reusable components, color tokens, and typography.",
            ProjectStatus::Completed,
            "2025-12-01T09:00:00Z",
            "2026-01-25T17:00:00Z",
            &[
                (15, "Define Colors", true),
                (16, "Create Components", true),
                (17, "Document Usage", true),
            ],
            &[1, 2],
        ),
    ];

    let members = users();
    seeds
        .into_iter()
        .map(|(mut project, member_ids)| {
            project.users = members
                .iter()
                .filter(|u| member_ids.contains(&u.id))
                .map(Into::into)
                .collect();
            project
        })
        .collect()
}

struct TaskSeed {
    id: u64,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    project_id: u64,
    assignee_id: u64,
    tag_ids: &'static [u64],
    due_date: &'static str,
    estimated_hours: u32,
    completed_at: Option<&'static str>,
    created_at: &'static str,
    last_modified_at: &'static str,
    subtasks: &'static [(u64, &'static str, bool)],
    comments: u32,
    attachments: u32,
}

const TASKS: &[TaskSeed] = &[
    TaskSeed {
        id: 1,
        title: "Design dashboard UI components",
        description: "Create beautiful and responsive dashboard components including stats cards, charts, and activity feeds. Ensure dark mode support.",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        project_id: 1,
        assignee_id: 1,
        tag_ids: &[5, 2],
        due_date: "2026-02-15T23:59:59Z",
        estimated_hours: 16,
        completed_at: None,
        created_at: "2026-02-01T10:00:00Z",
        last_modified_at: "2026-02-13T09:30:00Z",
        subtasks: &[
            (1, "Design stats cards", true),
            (2, "Create chart components", true),
            (3, "Build activity feed", false),
            (4, "Add animations", false),
        ],
        comments: 5,
        attachments: 2,
    },
    TaskSeed {
        id: 2,
        title: "Implement user authentication flow",
        description: "Set up JWT-based authentication with login, register, and password reset functionality. Include OAuth2 social login options.",
        status: TaskStatus::Todo,
        priority: TaskPriority::Urgent,
        project_id: 1,
        assignee_id: 3,
        tag_ids: &[2, 6],
        due_date: "2026-02-14T23:59:59Z",
        estimated_hours: 24,
        completed_at: None,
        created_at: "2026-02-05T14:00:00Z",
        last_modified_at: "2026-02-12T16:00:00Z",
        subtasks: &[
            (5, "Set up JWT tokens", false),
            (6, "Create login page", false),
            (7, "Add OAuth2 providers", false),
        ],
        comments: 3,
        attachments: 1,
    },
    TaskSeed {
        id: 3,
        title: "Write API documentation",
        description: "Document all REST API endpoints with examples, request/response schemas, and error codes using OpenAPI/Swagger.",
        status: TaskStatus::InReview,
        priority: TaskPriority::Medium,
        project_id: 3,
        assignee_id: 5,
        tag_ids: &[4],
        due_date: "2026-02-18T23:59:59Z",
        estimated_hours: 12,
        completed_at: None,
        created_at: "2026-02-08T09:00:00Z",
        last_modified_at: "2026-02-13T11:00:00Z",
        subtasks: &[
            (8, "Document auth endpoints", true),
            (9, "Document project endpoints", true),
            (10, "Add example requests", true),
        ],
        comments: 8,
        attachments: 4,
    },
    TaskSeed {
        id: 4,
        title: "Fix navigation menu bug on mobile",
        description: "The hamburger menu doesn't close properly after selecting a nav item on mobile devices. Also fix z-index issues with dropdown menus.",
        status: TaskStatus::Completed,
        priority: TaskPriority::High,
        project_id: 1,
        assignee_id: 2,
        tag_ids: &[1],
        due_date: "2026-02-10T23:59:59Z",
        estimated_hours: 4,
        completed_at: Some("2026-02-09T15:30:00Z"),
        created_at: "2026-02-07T11:00:00Z",
        last_modified_at: "2026-02-09T15:30:00Z",
        subtasks: &[(11, "Debug menu state", true), (12, "Fix z-index", true)],
        comments: 2,
        attachments: 0,
    },
    TaskSeed {
        id: 5,
        title: "Create project cards component",
        description: "Build reusable project card components with hover effects, progress bars, and team member avatars.",
        status: TaskStatus::Completed,
        priority: TaskPriority::Medium,
        project_id: 5,
        assignee_id: 2,
        tag_ids: &[5, 3],
        due_date: "2026-02-08T23:59:59Z",
        estimated_hours: 8,
        completed_at: Some("2026-02-07T17:00:00Z"),
        created_at: "2026-02-03T10:00:00Z",
        last_modified_at: "2026-02-07T17:00:00Z",
        subtasks: &[],
        comments: 4,
        attachments: 3,
    },
    TaskSeed {
        id: 6,
        title: "Set up CI/CD pipeline",
        description: "Configure GitHub Actions for automated testing, building, and deployment to staging and production environments.",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        project_id: 3,
        assignee_id: 5,
        tag_ids: &[2, 6],
        due_date: "2026-02-20T23:59:59Z",
        estimated_hours: 20,
        completed_at: None,
        created_at: "2026-02-10T08:00:00Z",
        last_modified_at: "2026-02-13T14:00:00Z",
        subtasks: &[
            (13, "Set up test workflow", true),
            (14, "Configure build steps", true),
            (15, "Add deployment scripts", false),
            (16, "Set up environments", false),
        ],
        comments: 6,
        attachments: 2,
    },
    TaskSeed {
        id: 7,
        title: "Research animation libraries",
        description: "Evaluate Framer Motion, React Spring, and GSAP for UI animations. Compare performance, bundle size, and ease of use.",
        status: TaskStatus::Completed,
        priority: TaskPriority::Low,
        project_id: 5,
        assignee_id: 4,
        tag_ids: &[8],
        due_date: "2026-02-06T23:59:59Z",
        estimated_hours: 6,
        completed_at: Some("2026-02-05T16:00:00Z"),
        created_at: "2026-02-02T09:00:00Z",
        last_modified_at: "2026-02-05T16:00:00Z",
        subtasks: &[],
        comments: 7,
        attachments: 1,
    },
    TaskSeed {
        id: 8,
        title: "Refactor form validation logic",
        description: "Migrate from manual validation to React Hook Form with Zod schema validation for better type safety and DX.",
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        project_id: 1,
        assignee_id: 3,
        tag_ids: &[7, 3],
        due_date: "2026-02-22T23:59:59Z",
        estimated_hours: 10,
        completed_at: None,
        created_at: "2026-02-11T13:00:00Z",
        last_modified_at: "2026-02-11T13:00:00Z",
        subtasks: &[
            (17, "Install dependencies", false),
            (18, "Create Zod schemas", false),
            (19, "Update form components", false),
        ],
        comments: 1,
        attachments: 0,
    },
    TaskSeed {
        id: 9,
        title: "Design mobile app wireframes",
        description: "Create low-fidelity wireframes for all main screens of the mobile app including navigation flow and user interactions.",
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        project_id: 4,
        assignee_id: 2,
        tag_ids: &[5, 8],
        due_date: "2026-02-25T23:59:59Z",
        estimated_hours: 16,
        completed_at: None,
        created_at: "2026-02-12T10:00:00Z",
        last_modified_at: "2026-02-12T10:00:00Z",
        subtasks: &[
            (20, "Home screen", false),
            (21, "Projects list", false),
            (22, "Task details", false),
            (23, "Profile settings", false),
        ],
        comments: 0,
        attachments: 0,
    },
    TaskSeed {
        id: 10,
        title: "Optimize database queries",
        description: "Analyze slow queries using EXPLAIN, add appropriate indexes, and implement pagination for large data sets.",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        project_id: 3,
        assignee_id: 1,
        tag_ids: &[3, 7],
        due_date: "2026-02-17T23:59:59Z",
        estimated_hours: 14,
        completed_at: None,
        created_at: "2026-02-09T11:00:00Z",
        last_modified_at: "2026-02-13T10:00:00Z",
        subtasks: &[
            (24, "Identify slow queries", true),
            (25, "Add indexes", true),
            (26, "Implement pagination", false),
        ],
        comments: 4,
        attachments: 1,
    },
    TaskSeed {
        id: 11,
        title: "Add dark mode toggle to portfolio",
        description: "Implement a smooth dark/light mode toggle with system preference detection and persistent user preference.",
        status: TaskStatus::Completed,
        priority: TaskPriority::Low,
        project_id: 2,
        assignee_id: 1,
        tag_ids: &[2],
        due_date: "2026-02-04T23:59:59Z",
        estimated_hours: 4,
        completed_at: Some("2026-02-03T14:00:00Z"),
        created_at: "2026-02-01T15:00:00Z",
        last_modified_at: "2026-02-03T14:00:00Z",
        subtasks: &[],
        comments: 2,
        attachments: 0,
    },
    TaskSeed {
        id: 12,
        title: "Create unit tests for auth service",
        description: "Write comprehensive unit tests for the authentication service covering login, logout, token refresh, and edge cases.",
        status: TaskStatus::Cancelled,
        priority: TaskPriority::Medium,
        project_id: 3,
        assignee_id: 3,
        tag_ids: &[6],
        due_date: "2026-02-12T23:59:59Z",
        estimated_hours: 8,
        completed_at: None,
        created_at: "2026-02-06T10:00:00Z",
        last_modified_at: "2026-02-11T09:00:00Z",
        subtasks: &[],
        comments: 3,
        attachments: 0,
    },
];

fn tasks() -> Vec<Task> {
    TASKS
        .iter()
        .map(|t| Task {
            id: t.id,
            title: t.title.to_string(),
            description: t.description.to_string(),
            status: t.status,
            priority: t.priority,
            project_id: t.project_id,
            project: None,
            assignee_id: Some(t.assignee_id),
            assignee: None,
            // Seeded tag order is meaningful (primary label first)
            tags: t
                .tag_ids
                .iter()
                .filter_map(|id| catalog::tag(*id))
                .map(TagSnapshot::from)
                .collect(),
            due_date: Some(ts(t.due_date)),
            estimated_hours: Some(t.estimated_hours),
            completed_at: t.completed_at.map(ts),
            created_at: ts(t.created_at),
            last_modified_at: ts(t.last_modified_at),
            subtasks: t
                .subtasks
                .iter()
                .map(|(id, title, completed)| Subtask::new(*id, *title, *completed))
                .collect(),
            comments: t.comments,
            attachments: t.attachments,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        let c = collections();
        assert_eq!(c.roles.len(), 5);
        assert_eq!(c.users.len(), 8);
        assert_eq!(c.projects.len(), 5);
        assert_eq!(c.tasks.len(), 12);
    }

    #[test]
    fn test_role_counts_match_members() {
        let c = collections();
        for role in &c.roles {
            let holders = c.users.iter().filter(|u| u.role_id == role.id).count() as u32;
            assert_eq!(role.users_count, holders, "role {}", role.name);
        }
    }

    #[test]
    fn test_seed_snapshots_resolved() {
        let c = collections();
        assert!(c.users.iter().all(|u| u.role.is_some()));
        assert!(c.tasks.iter().all(|t| t.project.is_some() && t.assignee.is_some()));

        let first = &c.tasks[0];
        assert_eq!(first.project.as_ref().map(|p| p.name.as_str()), Some("Team Nest App"));
        let tag_names: Vec<_> = first.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["Design", "Feature"]);

        assert_eq!(c.projects[0].users.len(), 3);
        assert_eq!(c.projects[0].tasks.len(), 4);
    }

    #[test]
    fn test_seed_member_details() {
        let c = collections();
        let david = c.users.iter().find(|u| u.id == 7).unwrap();
        assert_eq!(david.email, "david@teamnest.app");
        assert_eq!(david.initials, "DK");
        assert_eq!(david.phone.as_deref(), Some("+1 555-0107"));
        assert!(david.last_active.is_none());
    }
}
