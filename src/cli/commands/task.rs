//! Implementation of the `tasktrack task` commands.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, PriorityLevel, TaskDraft, TaskItem, TaskStatus};
use crate::infrastructure::AppContext;

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List one page of tasks, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, short)]
        page: Option<usize>,
        /// Tasks per page
        #[arg(long, short = 's')]
        size: Option<usize>,
    },
    /// Show a task
    Show {
        id: i64,
    },
    /// Create a task
    Create {
        /// Task title
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long, value_parser = parse_due_date)]
        due: DateTime<Utc>,
        /// low, medium or high
        #[arg(long, short, value_parser = parse_priority, default_value = "low")]
        priority: PriorityLevel,
        /// not_started, in_progress or completed
        #[arg(long, value_parser = parse_status, default_value = "not_started")]
        status: TaskStatus,
    },
    /// Replace fields of a task; omitted fields keep their value
    Update {
        id: i64,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
        #[arg(long, short, value_parser = parse_priority)]
        priority: Option<PriorityLevel>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        id: i64,
    },
}

/// Accept an RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_due_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid date '{s}': expected RFC 3339 or YYYY-MM-DD"))
}

fn parse_priority(s: &str) -> Result<PriorityLevel, String> {
    PriorityLevel::from_str(s).ok_or_else(|| format!("invalid priority '{s}': expected low, medium or high"))
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::from_str(s)
        .ok_or_else(|| format!("invalid status '{s}': expected not_started, in_progress or completed"))
}

#[derive(Debug, serde::Serialize)]
pub struct TaskListOutput {
    pub tasks: Vec<TaskItem>,
    pub page_index: usize,
    pub page_size: usize,
}

impl CommandOutput for TaskListOutput {
    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return format!("No tasks on page {}.", self.page_index);
        }
        format!(
            "{}\n\nPage {} ({} of up to {})",
            TableFormatter::new().format_tasks(&self.tasks),
            self.page_index,
            self.tasks.len(),
            self.page_size
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.tasks).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TaskOutput {
    pub task: TaskItem,
}

impl CommandOutput for TaskOutput {
    fn to_human(&self) -> String {
        let task = &self.task;
        let mut lines = vec![
            format!("Task #{}", task.id),
            format!("  Title:       {}", task.title),
            format!("  Status:      {}", task.status),
            format!("  Priority:    {}", task.priority),
            format!("  Due:         {}", task.due_date.format("%Y-%m-%d %H:%M UTC")),
        ];
        if !task.description.is_empty() {
            lines.push(format!("  Description: {}", task.description));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.task).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TaskActionOutput {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

impl CommandOutput for TaskActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: TaskArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let tasks = &ctx.tasks;

    match args.command {
        TaskCommands::List { page, size } => {
            let (page_index, page_size) = tasks.page_policy().resolve(page, size)?;
            let items = tasks
                .list_tasks(Some(page_index), Some(page_size))
                .await
                .context("Failed to list tasks")?;
            output(
                &TaskListOutput {
                    tasks: items,
                    page_index,
                    page_size,
                },
                json_mode,
            );
        }
        TaskCommands::Show { id } => {
            let task = tasks
                .get_task(id)
                .await
                .map_err(|e| anyhow!("{e}. Use 'tasktrack task list' to see available tasks."))?;
            output(&TaskOutput { task }, json_mode);
        }
        TaskCommands::Create {
            title,
            description,
            due,
            priority,
            status,
        } => {
            let draft = TaskDraft::new(title, description, due)
                .with_priority(priority)
                .with_status(status);
            let task = tasks.create_task(draft).await.context("Failed to create task")?;
            output(&TaskOutput { task }, json_mode);
        }
        TaskCommands::Update {
            id,
            title,
            description,
            due,
            priority,
            status,
        } => {
            let current = tasks.get_task(id).await?;
            let draft = TaskDraft::new(
                title.unwrap_or(current.title),
                description.unwrap_or(current.description),
                due.unwrap_or(current.due_date),
            )
            .with_priority(priority.unwrap_or(current.priority))
            .with_status(status.unwrap_or(current.status));
            let task = tasks.update_task(id, draft).await.context("Failed to update task")?;
            output(&TaskOutput { task }, json_mode);
        }
        TaskCommands::Delete { id } => {
            tasks.delete_task(id).await?;
            output(
                &TaskActionOutput {
                    success: true,
                    message: format!("Task #{id} deleted."),
                    id,
                },
                json_mode,
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_due_date_formats() {
        let rfc = parse_due_date("2030-05-01T12:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 10);

        let bare = parse_due_date("2030-05-01").unwrap();
        assert_eq!((bare.year(), bare.month(), bare.day(), bare.hour()), (2030, 5, 1, 0));

        assert!(parse_due_date("tomorrow").is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(parse_priority("HIGH"), Ok(PriorityLevel::High));
        assert!(parse_priority("urgent").is_err());
        assert_eq!(parse_status("done"), Ok(TaskStatus::Completed));
    }

    #[test]
    fn test_empty_list_output() {
        let out = TaskListOutput {
            tasks: vec![],
            page_index: 3,
            page_size: 20,
        };
        assert_eq!(out.to_human(), "No tasks on page 3.");
        assert_eq!(out.to_json(), serde_json::json!([]));
    }
}
