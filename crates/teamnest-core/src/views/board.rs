//! Kanban grouping of tasks by status

use serde::Serialize;

use crate::domain::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<Task>,
}

/// One column per status in workflow order; empty columns are kept
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskBoard {
    pub columns: Vec<BoardColumn>,
}

impl TaskBoard {
    pub fn build(tasks: &[Task]) -> Self {
        let columns = TaskStatus::ALL
            .iter()
            .map(|status| BoardColumn {
                status: *status,
                label: status.label(),
                tasks: tasks.iter().filter(|t| t.status == *status).cloned().collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed;

    #[test]
    fn test_every_task_lands_in_one_column() {
        let c = seed::collections();
        let board = TaskBoard::build(&c.tasks);

        assert_eq!(board.columns.len(), 5);
        assert_eq!(board.total(), c.tasks.len());
        let order: Vec<TaskStatus> = board.columns.iter().map(|c| c.status).collect();
        assert_eq!(order, TaskStatus::ALL.to_vec());
    }

    #[test]
    fn test_column_contents() {
        let c = seed::collections();
        let board = TaskBoard::build(&c.tasks);
        let in_review = board.column(TaskStatus::InReview).unwrap();
        assert_eq!(in_review.label, "In Review");
        assert_eq!(in_review.tasks.len(), 1);
        assert_eq!(in_review.tasks[0].id, 3);
    }

    #[test]
    fn test_empty_board_keeps_columns() {
        let board = TaskBoard::build(&[]);
        assert_eq!(board.columns.len(), 5);
        assert!(board.columns.iter().all(|c| c.tasks.is_empty()));
    }
}
