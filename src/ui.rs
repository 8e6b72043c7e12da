use crate::app::{App, Focus};
use crate::task::CATEGORIES;
use crate::view::{filter_label, quick_filters, Bucket};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick: Duration) -> io::Result<()> {
    loop {
        app.poll_motivation();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        } else {
            app.on_tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let sidebar_width = if app.sidebar.open { 28 } else { 6 };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(f.area());

    draw_sidebar(f, app, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    draw_search(f, app, rows[0]);
    draw_form(f, app, rows[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    draw_tasks(f, app, content[0]);
    draw_side_panel(f, app, content[1]);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let open = app.sidebar.open;
    let mut lines = Vec::new();

    let arrow = |expanded: bool| if expanded { "▾" } else { "▸" };
    let header = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);

    if open {
        lines.push(Line::from(vec![
            Span::styled("TASKS ", header),
            Span::raw(arrow(app.sidebar.tasks_expanded)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(arrow(app.sidebar.tasks_expanded), header)));
    }
    if app.sidebar.tasks_expanded {
        for bucket in Bucket::ALL {
            let style = if app.sidebar.bucket == Some(bucket) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let line = if open {
                Line::from(vec![
                    Span::styled(format!(" ⚡ {:<10}", bucket.to_string()), style),
                    Span::raw(format!("{:>4}", app.bucket_count(bucket))),
                ])
            } else {
                Line::from(Span::styled(" ⚡", style))
            };
            lines.push(line);
        }
    }

    lines.push(Line::raw(""));
    if open {
        lines.push(Line::from(vec![
            Span::styled("Categories ", header),
            Span::raw(arrow(app.sidebar.categories_expanded)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(arrow(app.sidebar.categories_expanded), header)));
    }
    if app.sidebar.categories_expanded {
        for category in CATEGORIES {
            let style = if app.filter.category == category {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let label = if open { format!(" • {category}") } else { " •".to_string() };
            lines.push(Line::from(Span::styled(label, style)));
        }
    }

    let title = if open { "⚡ ToDoApp" } else { "⚡" };
    let sidebar = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(sidebar, area);
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.filter.search.is_empty() && app.focus != Focus::Search {
        Span::styled("Search tasks...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.filter.search.as_str())
    };
    let search = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border(app.focus == Focus::Search)),
    );
    f.render_widget(search, area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(14),
        ])
        .split(area);

    let due_date = if app.form.due_date.is_empty() {
        "YYYY-MM-DD".to_string()
    } else {
        app.form.due_date.clone()
    };
    let entries = [
        ("+ Add Task", app.form.text.clone(), Focus::Text),
        ("Category", format!("‹ {} ›", app.form.category_name()), Focus::Category),
        ("Minutes", app.form.duration.to_string(), Focus::Minutes),
        ("Due", due_date, Focus::DueDate),
    ];

    for ((title, value, focus), area) in entries.into_iter().zip(fields.iter()) {
        let field = Paragraph::new(value).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border(app.focus == focus)),
        );
        f.render_widget(field, *area);
    }
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .visible_tasks()
        .iter()
        .map(|t| {
            let (check, text_style) = if t.completed {
                (
                    "[x] ",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", Style::default().fg(Color::White))
            };
            ListItem::new(vec![
                Line::from(vec![Span::raw(check), Span::styled(t.text.as_str(), text_style)]),
                Line::from(vec![
                    Span::styled(
                        format!("    {} ", t.category),
                        Style::default().fg(Color::Blue),
                    ),
                    Span::raw(format!(" ⏳ {} mins  📅 {}", t.duration, t.due_date)),
                ]),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Tasks")
                .borders(Borders::ALL)
                .border_style(border(app.focus == Focus::List)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let stats = app.stats();
    let row = |label: &'static str, value: String| {
        Line::from(vec![Span::raw(format!("{label:<14}")), Span::raw(value)])
    };
    let stats_panel = Paragraph::new(vec![
        row("Total Tasks", stats.total_tasks.to_string()),
        row("Completed", stats.completed_tasks.to_string()),
        row("Upcoming", stats.upcoming_tasks.to_string()),
        row("Total Time", stats.total_time_display()),
    ])
    .block(Block::default().title("Productivity Stats").borders(Borders::ALL));
    f.render_widget(stats_panel, sections[0]);

    let buttons: Vec<Span> = quick_filters()
        .flat_map(|filter| {
            let style = if app.filter.category == filter {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!(" {} ", filter_label(filter)), style),
                Span::raw(" "),
            ]
        })
        .collect();
    let filters = Paragraph::new(Line::from(buttons))
        .block(Block::default().title("Quick Filters").borders(Borders::ALL));
    f.render_widget(filters, sections[1]);

    let tip = if app.motivation.loading {
        Line::from(Span::styled(
            format!(
                "{} Generating motivation...",
                SPINNER[app.spinner_frame % SPINNER.len()]
            ),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!("\"{}\"", app.motivation.text()),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
    };
    let tip_panel = Paragraph::new(tip)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Productivity Tip").borders(Borders::ALL));
    f.render_widget(tip_panel, sections[2]);
}
