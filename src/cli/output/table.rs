//! Table output for tasks and dependencies using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;
use crate::domain::models::{PriorityLevel, TaskDependency, TaskItem, TaskStatus};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self { use_colors, max_width }
    }

    pub fn format_tasks(&self, tasks: &[TaskItem]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Title", "Due", "Priority", "Status"]));

        for task in tasks {
            let (priority, status) = if self.use_colors {
                (
                    Cell::new(task.priority).fg(priority_color(task.priority)),
                    Cell::new(task.status).fg(status_color(task.status)),
                )
            } else {
                (Cell::new(task.priority), Cell::new(task.status))
            };

            table.add_row(vec![
                Cell::new(task.id),
                Cell::new(truncate(&task.title, 40)),
                Cell::new(task.due_date.format("%Y-%m-%d")),
                priority,
                status,
            ]);
        }

        table.to_string()
    }

    pub fn format_dependencies(&self, dependencies: &[TaskDependency]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Task", "Depends on"]));

        for dep in dependencies {
            table.add_row(vec![
                Cell::new(dep.id),
                Cell::new(dep.task_id),
                Cell::new(dep.dependent_task_id),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::NotStarted => Color::White,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Completed => Color::Green,
    }
}

fn priority_color(priority: PriorityLevel) -> Color {
    match priority {
        PriorityLevel::Low => Color::DarkGrey,
        PriorityLevel::Medium => Color::Yellow,
        PriorityLevel::High => Color::Red,
    }
}
