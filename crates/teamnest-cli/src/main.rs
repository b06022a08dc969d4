//! TeamNest CLI - browse and edit the mock workspace
//!
//! Every invocation starts from a freshly seeded store, so mutations only
//! live for the duration of one command.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeSet;
use teamnest_core::api::{catalog, projects, roles, tasks, users};
use teamnest_core::auth::AuthClient;
use teamnest_core::config::Config;
use teamnest_core::domain::catalog::{PERMISSIONS, permission_categories};
use teamnest_core::domain::{ProjectStatus, TaskPriority, TaskStatus, UserStatus};
use teamnest_core::storage::Store;
use teamnest_core::views::{
    DashboardSummary, Filter, MemberQuery, Page, Pagination, ProjectQuery, RoleQuery, TaskBoard,
    TaskQuery,
};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "teamnest")]
#[command(author, version, about = "TeamNest mock workspace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage team members
    Members {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Manage roles
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Show the dashboard summary
    Dashboard {
        /// Member whose tasks are shown (defaults to views.current_user_id)
        #[arg(long)]
        user: Option<u64>,
    },

    /// List tags, permissions and departments
    Catalog,

    /// Talk to the TeamNest backend
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check system health
    Doctor,
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List {
        /// Search name and description
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status
        #[arg(long, value_parser = parse_project_status)]
        status: Option<ProjectStatus>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show project details
    Show { id: u64 },
    /// Create a project
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_project_status, default_value = "ACTIVE")]
        status: ProjectStatus,
        /// Member ids
        #[arg(long, value_delimiter = ',')]
        users: Vec<u64>,
    },
    /// Edit a project; omitted flags keep their value
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_project_status)]
        status: Option<ProjectStatus>,
        /// Card gradient classes
        #[arg(long)]
        color: Option<String>,
        /// Replace the member list
        #[arg(long, value_delimiter = ',')]
        users: Option<Vec<u64>>,
    },
    /// Delete a project
    Delete { id: u64 },
    /// Project counts by status
    Stats,
}

#[derive(Subcommand)]
enum TaskAction {
    /// List tasks
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_task_status)]
        status: Option<TaskStatus>,
        #[arg(long, value_parser = parse_task_priority)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        project: Option<u64>,
        #[arg(long)]
        assignee: Option<u64>,
    },
    /// Show task details
    Show { id: u64 },
    /// Show tasks grouped by status
    Board {
        #[arg(long)]
        project: Option<u64>,
    },
    /// Create a task
    Create {
        title: String,
        #[arg(long)]
        project: u64,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long)]
        assignee: Option<u64>,
        #[arg(long, value_parser = parse_task_priority, default_value = "MEDIUM")]
        priority: TaskPriority,
        /// Tag ids
        #[arg(long, value_delimiter = ',')]
        tags: Vec<u64>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
        #[arg(long)]
        hours: Option<u32>,
    },
    /// Edit a task; omitted flags keep their value
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_task_status)]
        status: Option<TaskStatus>,
        #[arg(long, value_parser = parse_task_priority)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        project: Option<u64>,
        #[arg(long, conflicts_with = "unassign")]
        assignee: Option<u64>,
        /// Remove the assignee
        #[arg(long)]
        unassign: bool,
        /// Replace the tags
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<u64>>,
        #[arg(long, value_parser = parse_due_date, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        hours: Option<u32>,
    },
    /// Move a task to another status
    Status {
        id: u64,
        #[arg(value_parser = parse_task_status)]
        status: TaskStatus,
    },
    /// Manage a task's subtasks
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },
    /// Delete a task
    Delete { id: u64 },
    /// Task counters
    Stats,
}

#[derive(Subcommand)]
enum SubtaskAction {
    /// Flip a subtask's completed flag
    Toggle { task_id: u64, subtask_id: u64 },
    /// Append a subtask
    Add { task_id: u64, title: String },
}

#[derive(Subcommand)]
enum MemberAction {
    /// List members
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_user_status)]
        status: Option<UserStatus>,
        #[arg(long)]
        role: Option<u64>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show member details
    Show { id: u64 },
    /// Invite a member
    Create {
        first_name: String,
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Role id; unknown ids fall back to Viewer
        #[arg(long, default_value_t = users::FALLBACK_ROLE_ID)]
        role: u64,
        /// Defaults to PENDING
        #[arg(long, value_parser = parse_user_status)]
        status: Option<UserStatus>,
    },
    /// Edit a member; omitted flags keep their value
    Update {
        id: u64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        role: Option<u64>,
        #[arg(long, value_parser = parse_user_status)]
        status: Option<UserStatus>,
    },
    /// Delete a member
    Delete { id: u64 },
    /// Member counters
    Stats,
}

#[derive(Subcommand)]
enum RoleAction {
    /// List roles
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show role details
    Show { id: u64 },
    /// Create a custom role
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        color: String,
        /// Permission ids
        #[arg(long, value_delimiter = ',')]
        permissions: Vec<String>,
    },
    /// Edit a role; omitted flags keep their value
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Replace the permissions
        #[arg(long, value_delimiter = ',')]
        permissions: Option<Vec<String>>,
    },
    /// Delete a role
    Delete { id: u64 },
    /// Role counters
    Stats,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and print the current user
    Whoami {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TEAMNEST_PASSWORD")]
        password: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Show config file path
    Path,
}

fn unknown(kind: &str, value: &str, expected: &[&str]) -> String {
    format!("unknown {}: {} (expected one of {})", kind, value, expected.join(", "))
}

fn parse_project_status(s: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(s)
        .ok_or_else(|| unknown("project status", s, &ProjectStatus::ALL.map(|v| v.as_str())))
}

fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s)
        .ok_or_else(|| unknown("task status", s, &TaskStatus::ALL.map(|v| v.as_str())))
}

fn parse_task_priority(s: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(s)
        .ok_or_else(|| unknown("priority", s, &TaskPriority::ALL.map(|v| v.as_str())))
}

fn parse_user_status(s: &str) -> Result<UserStatus, String> {
    UserStatus::parse(s)
        .ok_or_else(|| unknown("member status", s, &UserStatus::ALL.map(|v| v.as_str())))
}

/// Accept a calendar date (midnight UTC) or a full RFC 3339 timestamp
fn parse_due_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid date: {} (expected YYYY-MM-DD)", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("teamnest=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    // Commands that never touch the store
    let command = match cli.command {
        Commands::Config { action } => return cmd_config(action, out.quiet),
        Commands::Doctor => return cmd_doctor(out.quiet).await,
        command => command,
    };

    let config = Config::load()?;
    let store = Store::seeded(config.latency.clone());
    debug!(latency = config.latency.enabled, "store ready");

    match command {
        Commands::Projects { action } => cmd_projects(&store, &config, action, out).await,
        Commands::Tasks { action } => cmd_tasks(&store, action, out).await,
        Commands::Members { action } => cmd_members(&store, &config, action, out).await,
        Commands::Roles { action } => cmd_roles(&store, action, out).await,
        Commands::Dashboard { user } => {
            let user_id = user.unwrap_or(config.views.current_user_id);
            cmd_dashboard(&store, user_id, out).await
        }
        Commands::Catalog => cmd_catalog(out).await,
        Commands::Auth { action } => cmd_auth(&config, action, out).await,
        Commands::Config { .. } | Commands::Doctor => Ok(()),
    }
}

/// Print an error, with its code and a hint when it is a TeamNest error
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<teamnest_core::Error>() {
        Some(core) => {
            eprintln!("Error [{}]: {}", core.code(), core);
            if let Some(hint) = core.suggestion() {
                eprintln!("  Try: {}", hint);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `value` as JSON, or fall back to `text` in text mode
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    fn note(&self, message: impl AsRef<str>) {
        if !self.quiet && !self.is_json() {
            println!("{}", message.as_ref());
        }
    }
}

fn print_pager<T>(page: &Page<T>) {
    if page.total_pages > 1 {
        println!(
            "\nPage {} of {} ({} total)",
            page.current_page, page.total_pages, page.total_items
        );
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_projects(
    store: &Store,
    config: &Config,
    action: ProjectAction,
    out: Output,
) -> anyhow::Result<()> {
    match action {
        ProjectAction::List {
            search,
            status,
            page,
        } => {
            let all = projects::get_projects(store).await?.into_data();
            let query = ProjectQuery { search, status };
            let filtered: Vec<_> = query.apply(&all).into_iter().cloned().collect();

            let mut pager = Pagination::new(config.views.project_page_size);
            pager.set_page(page, filtered.len());
            let page = pager.paginate(&filtered);

            out.emit(&page, || {
                if page.items.is_empty() {
                    println!("No projects found.");
                    return;
                }
                if !out.quiet {
                    println!("Projects:");
                }
                for p in &page.items {
                    println!(
                        "  {:>3}  {:<28} {:<10} {:>3}%  {} members",
                        p.id,
                        p.name,
                        p.status.as_str(),
                        p.progress(),
                        p.users.len()
                    );
                }
                print_pager(&page);
            })
        }
        ProjectAction::Show { id } => {
            let project = projects::get_project_by_id(store, id).await?.into_data();
            out.emit(&project, || {
                println!("Project: {}", project.name);
                println!("  ID: {}", project.id);
                println!("  Status: {}", project.status.as_str());
                println!("  Color: {}", project.color);
                if !project.description.is_empty() {
                    println!("  Description: {}", project.description);
                }
                println!(
                    "  Progress: {}% ({}/{})",
                    project.progress(),
                    project.completed_tasks(),
                    project.tasks.len()
                );
                for task in &project.tasks {
                    let mark = if task.completed { "x" } else { " " };
                    println!("    [{}] {}", mark, task.title);
                }
                if !project.users.is_empty() {
                    let names: Vec<&str> = project.users.iter().map(|u| u.name.as_str()).collect();
                    println!("  Members: {}", names.join(", "));
                }
                println!(
                    "  Created: {}",
                    project.created_at.format("%Y-%m-%d %H:%M:%S")
                );
                println!(
                    "  Updated: {}",
                    project.last_modified_at.format("%Y-%m-%d %H:%M:%S")
                );
            })
        }
        ProjectAction::Create {
            name,
            description,
            status,
            users,
        } => {
            let request = projects::CreateProjectRequest {
                name,
                description,
                status,
                user_ids: (!users.is_empty()).then_some(users),
            };
            let project = projects::create_project(store, request).await?.into_data();
            out.emit(&project, || {
                if !out.quiet {
                    println!("Project created successfully!");
                }
                println!("  ID: {}", project.id);
                println!("  Name: {}", project.name);
            })
        }
        ProjectAction::Update {
            id,
            name,
            description,
            status,
            color,
            users,
        } => {
            let request = projects::UpdateProjectRequest {
                name,
                description,
                status,
                color,
                user_ids: users,
            };
            let project = projects::update_project(store, id, request).await?.into_data();
            out.emit(&project, || {
                out.note(format!("Project {} updated.", project.id));
                println!("  Name: {}", project.name);
                println!("  Status: {}", project.status.as_str());
                println!("  Members: {}", project.users.len());
            })
        }
        ProjectAction::Delete { id } => {
            let result = projects::delete_project(store, id).await?.into_data();
            out.emit(&result, || out.note(format!("Project {} deleted.", result.id)))
        }
        ProjectAction::Stats => {
            let stats = projects::get_project_stats(store).await?.into_data();
            out.emit(&stats, || {
                println!("Projects: {}", stats.total);
                println!("  Active:    {}", stats.active);
                println!("  On hold:   {}", stats.on_hold);
                println!("  Completed: {}", stats.completed);
                println!("  Archived:  {}", stats.archived);
            })
        }
    }
}

async fn cmd_tasks(store: &Store, action: TaskAction, out: Output) -> anyhow::Result<()> {
    match action {
        TaskAction::List {
            search,
            status,
            priority,
            project,
            assignee,
        } => {
            let all = tasks::get_tasks(store).await?.into_data();
            let query = TaskQuery {
                search,
                status,
                priority,
                project_id: project,
                assignee_id: assignee,
            };
            let filtered: Vec<_> = query.apply(&all).into_iter().cloned().collect();
            out.emit(&filtered, || {
                if filtered.is_empty() {
                    println!("No tasks found.");
                }
                for t in &filtered {
                    let assignee = t
                        .assignee
                        .as_ref()
                        .map(|a| a.initials.as_str())
                        .unwrap_or("--");
                    println!(
                        "  {:>3}  {:<40} {:<12} {:<7} {}",
                        t.id,
                        t.title,
                        t.status.as_str(),
                        t.priority.as_str(),
                        assignee
                    );
                }
            })
        }
        TaskAction::Show { id } => {
            let task = tasks::get_task_by_id(store, id).await?.into_data();
            out.emit(&task, || {
                println!("Task: {}", task.title);
                println!("  ID: {}", task.id);
                println!("  Status: {}", task.status.label());
                println!("  Priority: {}", task.priority.as_str());
                if let Some(project) = &task.project {
                    println!("  Project: {} ({})", project.name, project.id);
                }
                if let Some(assignee) = &task.assignee {
                    println!("  Assignee: {}", assignee.name);
                }
                if !task.tags.is_empty() {
                    let tags: Vec<&str> = task.tags.iter().map(|t| t.name.as_str()).collect();
                    println!("  Tags: {}", tags.join(", "));
                }
                if let Some(due) = task.due_date {
                    println!("  Due: {}", due.format("%Y-%m-%d"));
                }
                if let Some(done) = task.completed_at {
                    println!("  Completed: {}", done.format("%Y-%m-%d %H:%M:%S"));
                }
                if !task.subtasks.is_empty() {
                    println!(
                        "  Subtasks ({}/{}):",
                        task.completed_subtasks(),
                        task.subtasks.len()
                    );
                    for s in &task.subtasks {
                        let mark = if s.completed { "x" } else { " " };
                        println!("    [{}] {:>3} {}", mark, s.id, s.title);
                    }
                }
            })
        }
        TaskAction::Board { project } => {
            let all = tasks::get_tasks(store).await?.into_data();
            let scoped: Vec<_> = all
                .into_iter()
                .filter(|t| project.is_none_or(|p| t.project_id == p))
                .collect();
            let board = TaskBoard::build(&scoped);
            out.emit(&board, || {
                for column in &board.columns {
                    println!("{} ({})", column.label, column.tasks.len());
                    for t in &column.tasks {
                        println!("  {:>3}  {}", t.id, t.title);
                    }
                }
            })
        }
        TaskAction::Create {
            title,
            project,
            description,
            assignee,
            priority,
            tags,
            due,
            hours,
        } => {
            let request = tasks::CreateTaskRequest {
                title,
                description,
                project_id: project,
                assignee_id: assignee,
                tag_ids: (!tags.is_empty()).then_some(tags),
                priority,
                due_date: due,
                estimated_hours: hours,
                ..Default::default()
            };
            let task = tasks::create_task(store, request).await?.into_data();
            if task.project.is_none() {
                warn!(project_id = task.project_id, "task created for an unknown project");
            }
            out.emit(&task, || {
                if !out.quiet {
                    println!("Task created successfully!");
                }
                println!("  ID: {}", task.id);
                println!("  Title: {}", task.title);
            })
        }
        TaskAction::Update {
            id,
            title,
            description,
            status,
            priority,
            project,
            assignee,
            unassign,
            tags,
            due,
            clear_due,
            hours,
        } => {
            let request = tasks::UpdateTaskRequest {
                title,
                description,
                status,
                priority,
                project_id: project,
                assignee_id: if unassign { Some(None) } else { assignee.map(Some) },
                tag_ids: tags,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                estimated_hours: hours,
            };
            let task = tasks::update_task(store, id, request).await?.into_data();
            out.emit(&task, || {
                out.note(format!("Task {} updated.", task.id));
                println!("  Status: {}", task.status.label());
                let assignee = task.assignee.as_ref().map(|a| a.name.as_str());
                println!("  Assignee: {}", assignee.unwrap_or("unassigned"));
            })
        }
        TaskAction::Status { id, status } => {
            let task = tasks::update_task_status(store, id, status).await?.into_data();
            out.emit(&task, || {
                out.note(format!("Task {} moved to {}.", task.id, task.status.label()))
            })
        }
        TaskAction::Subtask { action } => {
            let task = match action {
                SubtaskAction::Toggle {
                    task_id,
                    subtask_id,
                } => tasks::toggle_subtask(store, task_id, subtask_id).await?,
                SubtaskAction::Add { task_id, title } => {
                    tasks::add_subtask(store, task_id, &title).await?
                }
            }
            .into_data();
            out.emit(&task, || {
                out.note(format!(
                    "Task {}: {}/{} subtasks done.",
                    task.id,
                    task.completed_subtasks(),
                    task.subtasks.len()
                ))
            })
        }
        TaskAction::Delete { id } => {
            let result = tasks::delete_task(store, id).await?.into_data();
            out.emit(&result, || out.note(format!("Task {} deleted.", result.id)))
        }
        TaskAction::Stats => {
            let stats = tasks::get_task_stats(store).await?.into_data();
            out.emit(&stats, || {
                println!("Tasks: {}", stats.total);
                println!("  To do:       {}", stats.todo);
                println!("  In progress: {}", stats.in_progress);
                println!("  In review:   {}", stats.in_review);
                println!("  Completed:   {}", stats.completed);
                println!("  Cancelled:   {}", stats.cancelled);
                println!("  Overdue:     {}", stats.overdue);
            })
        }
    }
}

async fn cmd_members(
    store: &Store,
    config: &Config,
    action: MemberAction,
    out: Output,
) -> anyhow::Result<()> {
    match action {
        MemberAction::List {
            search,
            status,
            role,
            department,
            page,
        } => {
            let all = users::get_users(store).await?.into_data();
            let query = MemberQuery {
                search,
                status,
                role_id: role,
                department,
            };
            let filtered: Vec<_> = query.apply(&all).into_iter().cloned().collect();

            let mut pager = Pagination::new(config.views.member_page_size);
            pager.set_page(page, filtered.len());
            let page = pager.paginate(&filtered);

            out.emit(&page, || {
                if page.items.is_empty() {
                    println!("No members found.");
                    return;
                }
                for u in &page.items {
                    let role = u.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-");
                    println!(
                        "  {:>3}  {:<22} {:<28} {:<12} {:<10} {}",
                        u.id,
                        u.full_name(),
                        u.email,
                        u.department,
                        u.status.as_str(),
                        role
                    );
                }
                print_pager(&page);
            })
        }
        MemberAction::Show { id } => {
            let user = users::get_user_by_id(store, id).await?.into_data();
            out.emit(&user, || {
                println!("Member: {} ({})", user.full_name(), user.initials);
                println!("  ID: {}", user.id);
                println!("  Email: {}", user.email);
                if let Some(phone) = &user.phone {
                    println!("  Phone: {}", phone);
                }
                println!("  Department: {}", user.department);
                println!("  Title: {}", user.job_title);
                if let Some(role) = &user.role {
                    println!("  Role: {}", role.name);
                }
                println!("  Status: {}", user.status.as_str());
            })
        }
        MemberAction::Create {
            first_name,
            last_name,
            email,
            phone,
            department,
            title,
            role,
            status,
        } => {
            let request = users::CreateUserRequest {
                first_name,
                last_name,
                email,
                phone,
                department,
                job_title: title,
                role_id: role,
                status,
            };
            let user = users::create_user(store, request).await?.into_data();
            out.emit(&user, || {
                if !out.quiet {
                    println!("Member created successfully!");
                }
                println!("  ID: {}", user.id);
                println!("  Name: {} ({})", user.full_name(), user.initials);
                if let Some(role) = &user.role {
                    println!("  Role: {}", role.name);
                }
            })
        }
        MemberAction::Update {
            id,
            first_name,
            last_name,
            email,
            phone,
            department,
            title,
            role,
            status,
        } => {
            let previous_role = users::get_user_by_id(store, id).await?.data.role_id;
            let request = users::UpdateUserRequest {
                first_name,
                last_name,
                email,
                phone,
                department,
                job_title: title,
                role_id: role,
                status,
            };
            let user = users::update_user(store, id, request).await?.into_data();

            // Counts after the move, read back from the store
            let moved = if user.role_id != previous_role {
                let from = roles::get_role_by_id(store, previous_role).await?.into_data();
                let to = roles::get_role_by_id(store, user.role_id).await?.into_data();
                Some((from, to))
            } else {
                None
            };

            out.emit(&user, || {
                out.note(format!("Member {} updated.", user.id));
                println!("  Name: {} ({})", user.full_name(), user.initials);
                if let Some((from, to)) = &moved {
                    println!("  Role: {} ({} members)", to.name, to.users_count);
                    println!("  Previous role: {} ({} members)", from.name, from.users_count);
                }
            })
        }
        MemberAction::Delete { id } => {
            let result = users::delete_user(store, id).await?.into_data();
            out.emit(&result, || out.note(format!("Member {} deleted.", result.id)))
        }
        MemberAction::Stats => {
            let stats = users::get_user_stats(store).await?.into_data();
            out.emit(&stats, || {
                println!("Members: {}", stats.total);
                println!("  Active:    {}", stats.active);
                println!("  Inactive:  {}", stats.inactive);
                println!("  Pending:   {}", stats.pending);
                println!("  Suspended: {}", stats.suspended);
                println!("By department:");
                for group in &stats.by_department {
                    println!("  {:<14} {}", group.name, group.count);
                }
                println!("By role:");
                for group in &stats.by_role {
                    println!("  {:<14} {}", group.name, group.count);
                }
            })
        }
    }
}

async fn cmd_roles(store: &Store, action: RoleAction, out: Output) -> anyhow::Result<()> {
    match action {
        RoleAction::List { search } => {
            let all = roles::get_roles(store).await?.into_data();
            let filtered: Vec<_> = RoleQuery { search }
                .apply(&all)
                .into_iter()
                .cloned()
                .collect();
            out.emit(&filtered, || {
                for r in &filtered {
                    let system = if r.is_system { " [system]" } else { "" };
                    println!(
                        "  {:>3}  {:<16} {:>2} members  {} permissions{}",
                        r.id,
                        r.name,
                        r.users_count,
                        r.permissions.len(),
                        system
                    );
                }
            })
        }
        RoleAction::Show { id } => {
            let role = roles::get_role_by_id(store, id).await?.into_data();
            out.emit(&role, || {
                println!("Role: {}", role.name);
                println!("  ID: {}", role.id);
                println!("  Description: {}", role.description);
                println!("  Members: {}", role.users_count);
                println!("  System: {}", role.is_system);
                println!("  Permissions:");
                for p in PERMISSIONS {
                    let mark = if role.has_permission(p.id) { "x" } else { " " };
                    println!("    [{}] {:<18} {}", mark, p.id, p.label);
                }
            })
        }
        RoleAction::Create {
            name,
            description,
            color,
            permissions,
        } => {
            let request = roles::CreateRoleRequest {
                name,
                description,
                color,
                permissions: permissions.into_iter().collect(),
            };
            let role = roles::create_role(store, request).await?.into_data();
            out.emit(&role, || {
                if !out.quiet {
                    println!("Role created successfully!");
                }
                println!("  ID: {}", role.id);
                println!("  Name: {}", role.name);
            })
        }
        RoleAction::Update {
            id,
            name,
            description,
            color,
            permissions,
        } => {
            let request = roles::UpdateRoleRequest {
                name,
                description,
                color,
                permissions: permissions.map(|p| p.into_iter().collect::<BTreeSet<_>>()),
            };
            let role = roles::update_role(store, id, request).await?.into_data();
            out.emit(&role, || {
                out.note(format!("Role {} updated.", role.id));
                println!("  Name: {}", role.name);
                println!("  Permissions: {}", role.permissions.len());
            })
        }
        RoleAction::Delete { id } => {
            let result = roles::delete_role(store, id).await?.into_data();
            out.emit(&result, || out.note(format!("Role {} deleted.", result.id)))
        }
        RoleAction::Stats => {
            let stats = roles::get_role_stats(store).await?.into_data();
            out.emit(&stats, || {
                println!("Roles: {}", stats.total);
                println!("  System: {}", stats.system);
                println!("  Custom: {}", stats.custom);
                println!("  Members assigned: {}", stats.total_users);
            })
        }
    }
}

async fn cmd_dashboard(store: &Store, user_id: u64, out: Output) -> anyhow::Result<()> {
    let (projects, tasks, users) = tokio::try_join!(
        projects::get_projects(store),
        tasks::get_tasks(store),
        users::get_users(store),
    )?;
    let summary = DashboardSummary::build(&projects.data, &tasks.data, &users.data, user_id);

    out.emit(&summary, || {
        let h = &summary.headline;
        println!("TeamNest Dashboard");
        println!("==================");
        println!(
            "Projects: {} ({} active)   Open tasks: {} ({} in progress)   Team: {} ({} active)",
            h.total_projects,
            h.active_projects,
            h.open_tasks,
            h.in_progress_tasks,
            h.team_members,
            h.active_members
        );
        println!();
        println!("My tasks ({} pending):", summary.my_pending);
        for t in &summary.my_tasks {
            println!("  {:>3}  {:<40} {}", t.id, t.title, t.status.label());
        }
        println!();
        println!("Projects:");
        for p in &summary.projects {
            println!(
                "  {:<28} {:>3}%  ({}/{})",
                p.name, p.progress, p.completed, p.total
            );
        }
        println!();
        println!("Team:");
        for m in &summary.team {
            println!(
                "  {:<4} {:<22} {:<24} {} done",
                m.initials, m.name, m.job_title, m.tasks_completed
            );
        }
    })
}

async fn cmd_catalog(out: Output) -> anyhow::Result<()> {
    let tags = catalog::get_task_tags().await?.into_data();
    let permissions = catalog::get_available_permissions().await?.into_data();
    let departments = catalog::get_departments().await?.into_data();

    let value = serde_json::json!({
        "tags": tags,
        "permissions": permissions,
        "departments": departments,
    });
    out.emit(&value, || {
        println!("Tags:");
        for t in &tags {
            println!("  {:>2}  {:<14} {}", t.id, t.name, t.color);
        }
        println!("Permissions:");
        for category in permission_categories() {
            println!("  {}", category);
            for p in permissions.iter().filter(|p| p.category == category) {
                println!("    {:<18} {}", p.id, p.label);
            }
        }
        println!("Departments: {}", departments.join(", "));
    })
}

async fn cmd_auth(config: &Config, action: AuthAction, out: Output) -> anyhow::Result<()> {
    match action {
        AuthAction::Whoami { email, password } => {
            let client = AuthClient::new(&config.auth)?;
            client.login(&email, &password).await?;
            let me = client.me().await?;
            if let Err(e) = client.logout().await {
                warn!("Logout failed: {}", e);
            }
            out.emit(&me, || {
                println!("{} <{}>", me.name, me.email);
                println!("  Tenant: {}", me.tenant_id);
                if !me.roles.is_empty() {
                    println!("  Roles: {}", me.roles.join(", "));
                }
            })
        }
    }
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            // Env overrides must not leak into the saved file
            let mut config = Config::load_file()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("TeamNest Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {:#}", e);
            }
            Config::default()
        }
    };

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: {}", e),
        }

        if config.latency.enabled {
            println!(
                "[OK] Latency: simulated (lists {} ms, writes {} ms)",
                config.latency.list_ms, config.latency.create_ms
            );
        } else {
            println!("[--] Latency: disabled");
        }
    }

    // A second refresh must find nothing left to rebuild
    let store = Store::seeded(config.latency.clone());
    store.refresh_snapshots().await;
    let report = store.refresh_snapshots().await;
    if report.total() == 0 {
        if !quiet {
            println!("[OK] Snapshot refresh: converges");
        }
    } else {
        all_ok = false;
        warn!(?report, "snapshot refresh did not converge");
        if !quiet {
            println!("[!!] Snapshot refresh: {} snapshots still stale", report.total());
        }
    }

    if !quiet {
        println!("[--] Backend: {}", config.auth.base_url);
        println!();
        if all_ok {
            println!("All checks passed.");
        } else {
            println!("Some checks need attention.");
        }
    }

    if !all_ok {
        anyhow::bail!("Health check failed");
    }
    Ok(())
}
