use crate::config::Config;
use crate::motivation::{MotivationFetcher, MotivationPanel, Outcome};
use crate::task::{Task, CATEGORIES};
use crate::task_board::{TaskBoard, Toggle};
use crate::view::{quick_filters, Bucket, Filter, Stats};
use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// Today's date as `YYYY-MM-DD` (UTC), the format due dates are stored in.
pub fn today_iso() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Text,
    Category,
    Minutes,
    DueDate,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::List,
        Focus::Search,
        Focus::Text,
        Focus::Category,
        Focus::Minutes,
        Focus::DueDate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn in_form(self) -> bool {
        matches!(
            self,
            Focus::Text | Focus::Category | Focus::Minutes | Focus::DueDate
        )
    }
}

/// Add-task form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub text: String,
    pub category: usize, // index into CATEGORIES
    pub duration: u32,
    pub due_date: String,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: 0,
            duration: 30,
            due_date: String::new(),
        }
    }
}

impl Form {
    pub fn category_name(&self) -> &'static str {
        CATEGORIES[self.category % CATEGORIES.len()]
    }

    /// The due date to submit: empty unless it is a real calendar date.
    fn submitted_due_date(&self) -> &str {
        let date = self.due_date.trim();
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
            date
        } else {
            if !date.is_empty() {
                debug!(date, "ignoring malformed due date");
            }
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub open: bool,
    pub tasks_expanded: bool,
    pub categories_expanded: bool,
    pub bucket: Option<Bucket>,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            open: true,
            tasks_expanded: true,
            categories_expanded: true,
            bucket: None,
        }
    }
}

/// Every state change goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask,
    DeleteTask(String),
    ToggleComplete(String),
    SetSearch(String),
    SetCategoryFilter(String),
    SelectBucket(Bucket),
}

pub struct App {
    pub board: TaskBoard,
    pub filter: Filter,
    pub form: Form,
    pub sidebar: Sidebar,
    pub focus: Focus,
    pub selected: usize, // index into visible_tasks()
    pub motivation: MotivationPanel,
    pub spinner_frame: usize,
    pub should_quit: bool,
    fetcher: MotivationFetcher,
    outcomes: UnboundedReceiver<Outcome>,
}

impl App {
    pub fn new(config: Arc<Config>, runtime: Handle) -> Self {
        let (fetcher, outcomes) = MotivationFetcher::new(config, runtime);
        Self {
            board: TaskBoard::seeded(),
            filter: Filter::default(),
            form: Form::default(),
            sidebar: Sidebar::default(),
            focus: Focus::List,
            selected: 0,
            motivation: MotivationPanel::default(),
            spinner_frame: 0,
            should_quit: false,
            fetcher,
            outcomes,
        }
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.apply(&self.board.tasks)
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.board.tasks)
    }

    pub fn bucket_count(&self, bucket: Bucket) -> usize {
        bucket.count(&self.board.tasks, &today_iso())
    }

    pub fn selected_task_id(&self) -> Option<String> {
        self.visible_tasks()
            .get(self.selected)
            .map(|t| t.id.clone())
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AddTask => {
                let added = self.board.add_task(
                    &self.form.text,
                    self.form.category_name(),
                    self.form.duration,
                    self.form.submitted_due_date(),
                );
                if added.is_some() {
                    self.form.text.clear();
                }
            }
            Command::DeleteTask(id) => {
                self.board.delete_task(&id);
            }
            Command::ToggleComplete(id) => {
                if self.board.toggle_complete(&id) == Some(Toggle::Completed) {
                    self.motivation.start();
                    self.fetcher.spawn();
                }
            }
            Command::SetSearch(search) => {
                self.filter.search = search;
                self.selected = 0;
            }
            Command::SetCategoryFilter(category) => {
                self.filter.category = category;
                self.selected = 0;
            }
            Command::SelectBucket(bucket) => {
                self.sidebar.bucket = Some(bucket);
                if bucket == Bucket::Today {
                    self.filter.search = today_iso();
                    self.selected = 0;
                }
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    /// Applies every quote that has arrived since the last frame.
    pub fn poll_motivation(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            debug!(request = outcome.request, "motivation message updated");
            self.motivation.finish(outcome);
        }
    }

    pub fn on_tick(&mut self) {
        if self.motivation.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Esc => self.focus = Focus::List,
            _ => match self.focus {
                Focus::List => self.handle_list_key(key.code),
                Focus::Search => self.handle_search_key(key.code),
                Focus::Text | Focus::Category | Focus::Minutes | Focus::DueDate => {
                    self.handle_form_key(key.code)
                }
            },
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.focus = Focus::Text,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.visible_tasks().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.apply(Command::ToggleComplete(id));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.apply(Command::DeleteTask(id));
                }
            }
            KeyCode::Char('f') => {
                let filters: Vec<_> = quick_filters().collect();
                let current = filters
                    .iter()
                    .position(|f| *f == self.filter.category)
                    .unwrap_or(0);
                let next = filters[(current + 1) % filters.len()];
                self.apply(Command::SetCategoryFilter(next.to_string()));
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                if let Some(filter) = quick_filters().nth(index) {
                    self.apply(Command::SetCategoryFilter(filter.to_string()));
                }
            }
            KeyCode::Char('s') => self.sidebar.open = !self.sidebar.open,
            KeyCode::Char('t') => self.sidebar.tasks_expanded = !self.sidebar.tasks_expanded,
            KeyCode::Char('c') => {
                self.sidebar.categories_expanded = !self.sidebar.categories_expanded
            }
            KeyCode::Char('u') => self.apply(Command::SelectBucket(Bucket::Upcoming)),
            KeyCode::Char('y') => self.apply(Command::SelectBucket(Bucket::Today)),
            KeyCode::Char('l') => self.apply(Command::SelectBucket(Bucket::Calendar)),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let mut search = self.filter.search.clone();
        match code {
            KeyCode::Enter => {
                self.focus = Focus::List;
                return;
            }
            KeyCode::Char(c) => search.push(c),
            KeyCode::Backspace => {
                search.pop();
            }
            _ => return,
        }
        self.apply(Command::SetSearch(search));
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        debug_assert!(self.focus.in_form());
        if code == KeyCode::Enter {
            self.apply(Command::AddTask);
            return;
        }
        match (self.focus, code) {
            (Focus::Text, KeyCode::Char(c)) => self.form.text.push(c),
            (Focus::Text, KeyCode::Backspace) => {
                self.form.text.pop();
            }
            (Focus::Category, KeyCode::Left) => {
                self.form.category = (self.form.category + CATEGORIES.len() - 1) % CATEGORIES.len()
            }
            (Focus::Category, KeyCode::Right) => {
                self.form.category = (self.form.category + 1) % CATEGORIES.len()
            }
            (Focus::Minutes, KeyCode::Up) => {
                self.form.duration = self.form.duration.saturating_add(1)
            }
            (Focus::Minutes, KeyCode::Down) => {
                self.form.duration = self.form.duration.saturating_sub(1).max(1)
            }
            (Focus::Minutes, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                self.form.duration = self
                    .form
                    .duration
                    .saturating_mul(10)
                    .saturating_add(digit)
                    .clamp(1, 99_999);
            }
            (Focus::Minutes, KeyCode::Backspace) => {
                self.form.duration = (self.form.duration / 10).max(1)
            }
            (Focus::DueDate, KeyCode::Char(c)) if c.is_ascii_digit() || c == '-' => {
                if self.form.due_date.len() < 10 {
                    self.form.due_date.push(c);
                }
            }
            (Focus::DueDate, KeyCode::Backspace) => {
                self.form.due_date.pop();
            }
            _ => {}
        }
    }

    /// Waits for the next quote and applies it.
    #[cfg(test)]
    pub async fn next_motivation(&mut self) -> Option<Outcome> {
        let outcome = self.outcomes.recv().await?;
        self.motivation.finish(outcome.clone());
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motivation::FALLBACK_MESSAGE;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> App {
        let config = Config {
            api_url: format!("{}/v1/chat/completions", server.uri()),
            api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        App::new(Arc::new(config), Handle::current())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn completing_a_task_fetches_once_and_falls_back_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.apply(Command::ToggleComplete("1".to_string()));
        assert!(app.motivation.loading);
        assert!(app.board.get("1").unwrap().completed);

        app.next_motivation().await.unwrap();
        assert!(!app.motivation.loading);
        assert_eq!(app.motivation.text(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn completing_a_task_shows_the_quote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "Small steps add up." } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        press(&mut app, KeyCode::Char(' '));
        app.next_motivation().await.unwrap();
        assert_eq!(app.motivation.text(), "Small steps add up.");
    }

    #[tokio::test]
    async fn reopening_a_task_does_not_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.apply(Command::ToggleComplete("2".to_string()));
        assert!(!app.board.get("2").unwrap().completed);
        assert!(!app.motivation.loading);

        let waited = tokio::time::timeout(Duration::from_millis(200), app.next_motivation()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn unknown_id_changes_nothing() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.apply(Command::ToggleComplete("404".to_string()));
        app.apply(Command::DeleteTask("404".to_string()));
        assert_eq!(app.board.len(), 3);
        assert!(!app.motivation.loading);
    }

    #[tokio::test]
    async fn poll_applies_arrived_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.apply(Command::ToggleComplete("3".to_string()));
        for _ in 0..50 {
            app.poll_motivation();
            if !app.motivation.loading {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!app.motivation.loading);
        assert_eq!(app.motivation.text(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn add_form_submits_and_clears_text() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::Text);
        type_str(&mut app, "Read a chapter");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-05-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.board.len(), 4);
        let task = app.board.tasks.last().unwrap();
        assert_eq!(task.text, "Read a chapter");
        assert_eq!(task.category, "Learning");
        assert_eq!(task.duration, 29);
        assert_eq!(task.due_date, "2025-05-01");
        assert!(!task.completed);
        assert!(app.form.text.is_empty());
        assert_eq!(app.form.due_date, "2025-05-01");
    }

    #[tokio::test]
    async fn blank_submission_keeps_form_and_list() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.form.text = "   ".to_string();
        app.apply(Command::AddTask);
        assert_eq!(app.board.len(), 3);
        assert_eq!(app.form.text, "   ");
    }

    #[tokio::test]
    async fn malformed_due_date_means_no_deadline() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.form.text = "Pay rent".to_string();
        app.form.due_date = "2025-13".to_string();
        app.apply(Command::AddTask);
        assert_eq!(app.board.tasks.last().unwrap().due_date, "No deadline");
    }

    #[tokio::test]
    async fn minutes_never_drop_below_one() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.focus = Focus::Minutes;
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.form.duration, 1);
        type_str(&mut app, "5");
        assert_eq!(app.form.duration, 15);
    }

    #[tokio::test]
    async fn search_and_quick_filters_narrow_the_list() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.filter.category, "Work");
        assert_eq!(app.visible_tasks().len(), 1);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.filter.category, "all");

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "WEEKLY");
        press(&mut app, KeyCode::Enter);
        let visible: Vec<_> = app.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(visible, vec!["3"]);
        assert_eq!(app.stats().total_tasks, 3);
    }

    #[tokio::test]
    async fn delete_key_removes_selected_task() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.board.get("3").is_none());
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn today_bucket_searches_for_todays_date() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.sidebar.bucket, Some(Bucket::Today));
        assert_eq!(app.filter.search, today_iso());

        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.sidebar.bucket, Some(Bucket::Upcoming));
        assert_eq!(app.filter.search, today_iso());
        assert_eq!(app.bucket_count(Bucket::Calendar), 3);
    }

    #[tokio::test]
    async fn sidebar_sections_collapse() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.sidebar.tasks_expanded);
        assert!(!app.sidebar.categories_expanded);
        assert!(!app.sidebar.open);
    }

    #[tokio::test]
    async fn focus_cycles_both_ways() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::DueDate);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::List);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
