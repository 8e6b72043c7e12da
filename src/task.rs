use uuid::Uuid;

/// Due date stored when the add form leaves the date field empty.
pub const NO_DEADLINE: &str = "No deadline";

/// Categories offered by the add form and the quick filters.
pub const CATEGORIES: [&str; 4] = ["Work", "Personal", "Errands", "Learning"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub category: String, // open-ended; seed data uses values outside CATEGORIES
    pub duration: u32,    // minutes
    pub due_date: String, // "YYYY-MM-DD" or NO_DEADLINE
}

impl Task {
    pub fn new(text: String, category: String, duration: u32, due_date: String) -> Self {
        let due_date = if due_date.trim().is_empty() {
            NO_DEADLINE.to_string()
        } else {
            due_date
        };
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            category,
            duration: duration.max(1),
            due_date,
        }
    }
}

/// The three example tasks every session starts with.
pub fn seed_tasks() -> Vec<Task> {
    let seed = |id: &str, text: &str, completed, category: &str, duration, due_date: &str| Task {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        category: category.to_string(),
        duration,
        due_date: due_date.to_string(),
    };
    vec![
        seed("1", "Complete project documentation", false, "Work", 120, "2025-01-25"),
        seed("2", "Review team pull requests", true, "Code Review", 45, "2025-01-23"),
        seed("3", "Prepare weekly meeting agenda", false, "Planning", 30, "2025-01-24"),
    ]
}
