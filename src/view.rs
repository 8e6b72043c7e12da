//! Read-only projections over the task list.
//!
//! Everything here is recomputed from the current tasks on every frame; nothing
//! is cached between renders.

use crate::task::{Task, CATEGORIES};
use std::fmt;

/// Category filter value that matches every task.
pub const ALL: &str = "all";

/// Quick filter buttons, in display order.
pub fn quick_filters() -> impl Iterator<Item = &'static str> {
    std::iter::once(ALL).chain(CATEGORIES)
}

/// Search text plus the selected category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub search: String,
    pub category: String,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
        }
    }
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        task.text
            .to_lowercase()
            .contains(&self.search.to_lowercase())
            && (self.category == ALL || self.category == task.category)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Aggregates over the whole list. Filters never affect these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub upcoming_tasks: usize,
    pub total_time: u64, // minutes
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();
        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            upcoming_tasks: tasks.len() - completed_tasks,
            total_time: tasks.iter().map(|t| u64::from(t.duration)).sum(),
        }
    }

    pub fn total_time_display(&self) -> String {
        format_minutes(self.total_time)
    }
}

/// `195` -> `"3h 15m"`.
pub fn format_minutes(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Sidebar navigation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Upcoming,
    Today,
    Calendar,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Upcoming, Bucket::Today, Bucket::Calendar];

    /// Due dates are compared as ISO strings, so "No deadline" sorts after
    /// every `20xx-..` date and lands in Upcoming.
    pub fn contains(self, task: &Task, today: &str) -> bool {
        match self {
            Bucket::Today => task.due_date.as_str() == today,
            Bucket::Upcoming => task.due_date.as_str() > today,
            Bucket::Calendar => true,
        }
    }

    pub fn count(self, tasks: &[Task], today: &str) -> usize {
        tasks.iter().filter(|t| self.contains(t, today)).count()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Upcoming => "Upcoming",
            Bucket::Today => "Today",
            Bucket::Calendar => "Calendar",
        };
        f.write_str(name)
    }
}

/// Button label for a quick filter: first letter upper-cased.
pub fn filter_label(filter: &str) -> String {
    let mut chars = filter.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
