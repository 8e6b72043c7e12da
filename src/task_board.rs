use crate::task::{seed_tasks, Task};
use tracing::debug;

/// Result of flipping a task's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Completed,
    Reopened,
}

/// Ordered in-memory task list. Insertion order is kept; only deletion removes.
#[derive(Debug, Default)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn seeded() -> Self {
        Self { tasks: seed_tasks() }
    }

    /// Appends a task unless `text` is blank. Returns the new task's id.
    pub fn add_task(
        &mut self,
        text: &str,
        category: &str,
        duration: u32,
        due_date: &str,
    ) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let task = Task::new(
            text.to_string(),
            category.to_string(),
            duration,
            due_date.to_string(),
        );
        let id = task.id.clone();
        debug!(%id, category, duration, "task added");
        self.tasks.push(task);
        Some(id)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            debug!(id, "task deleted");
        }
        removed
    }

    pub fn toggle_complete(&mut self, id: &str) -> Option<Toggle> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        debug!(id, completed = task.completed, "task toggled");
        Some(if task.completed {
            Toggle::Completed
        } else {
            Toggle::Reopened
        })
    }
}

#[cfg(test)]
impl TaskBoard {
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_one_incomplete_task() {
        let mut board = TaskBoard::seeded();
        let id = board.add_task("Call dentist", "Personal", 15, "").unwrap();
        assert_eq!(board.len(), 4);
        let task = board.tasks.last().unwrap();
        assert_eq!(task.id, id);
        assert!(!task.completed);
        assert_eq!(task.due_date, "No deadline");
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut board = TaskBoard::seeded();
        assert!(board.add_task("", "Work", 30, "").is_none());
        assert!(board.add_task("   \t", "Work", 30, "").is_none());
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn delete_removes_exactly_that_task() {
        let mut board = TaskBoard::seeded();
        assert!(board.delete_task("2"));
        assert_eq!(board.len(), 2);
        assert!(board.get("2").is_none());
        let ids: Vec<_> = board.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut board = TaskBoard::seeded();
        assert!(!board.delete_task("nope"));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn toggle_flips_only_completed() {
        let mut board = TaskBoard::seeded();
        let before = board.get("1").cloned().unwrap();

        assert_eq!(board.toggle_complete("1"), Some(Toggle::Completed));
        let after = board.get("1").unwrap();
        assert!(after.completed);
        assert_eq!(
            Task {
                completed: before.completed,
                ..after.clone()
            },
            before
        );

        assert_eq!(board.toggle_complete("1"), Some(Toggle::Reopened));
        assert_eq!(board.get("1"), Some(&before));
    }

    #[test]
    fn toggle_leaves_other_tasks_alone() {
        let mut board = TaskBoard::seeded();
        let others: Vec<_> = board.tasks[1..].to_vec();
        board.toggle_complete("1");
        assert_eq!(&board.tasks[1..], others.as_slice());
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let mut board = TaskBoard::seeded();
        assert_eq!(board.toggle_complete("missing"), None);
        assert_eq!(board.tasks, seed_tasks());
    }
}
