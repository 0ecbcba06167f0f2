//! Implementation of the `tasktrack dep` commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, DependencyDraft, TaskDependency};
use crate::infrastructure::AppContext;

#[derive(Args, Debug)]
pub struct DependencyArgs {
    #[command(subcommand)]
    pub command: DependencyCommands,
}

#[derive(Subcommand, Debug)]
pub enum DependencyCommands {
    /// List one page of dependencies, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, short)]
        page: Option<usize>,
        /// Dependencies per page
        #[arg(long, short = 's')]
        size: Option<usize>,
        /// Only edges starting at this task (not paged)
        #[arg(long, conflicts_with_all = ["page", "size"])]
        task: Option<i64>,
    },
    /// Show a dependency
    Show {
        id: i64,
    },
    /// Add the edge TASK_ID -> DEPENDENT_TASK_ID
    Add {
        task_id: i64,
        dependent_task_id: i64,
    },
    /// Replace both endpoints of a dependency
    Update {
        id: i64,
        task_id: i64,
        dependent_task_id: i64,
    },
    /// Remove a dependency
    Remove {
        id: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct DependencyListOutput {
    pub dependencies: Vec<TaskDependency>,
    #[serde(skip)]
    pub heading: String,
}

impl CommandOutput for DependencyListOutput {
    fn to_human(&self) -> String {
        if self.dependencies.is_empty() {
            return format!("{}: none.", self.heading);
        }
        format!(
            "{}\n{}",
            self.heading,
            TableFormatter::new().format_dependencies(&self.dependencies)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.dependencies).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct DependencyOutput {
    pub dependency: TaskDependency,
    #[serde(skip)]
    pub message: Option<String>,
}

impl CommandOutput for DependencyOutput {
    fn to_human(&self) -> String {
        let d = &self.dependency;
        let line = format!("Dependency #{}: task {} -> task {}", d.id, d.task_id, d.dependent_task_id);
        match &self.message {
            Some(message) => format!("{message}\n  {line}"),
            None => line,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.dependency).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct DependencyRemovedOutput {
    pub success: bool,
    pub id: i64,
}

impl CommandOutput for DependencyRemovedOutput {
    fn to_human(&self) -> String {
        format!("Dependency #{} removed.", self.id)
    }
}

pub async fn execute(args: DependencyArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let deps = &ctx.dependencies;

    match args.command {
        DependencyCommands::List { page, size, task } => {
            let out = match task {
                Some(task_id) => DependencyListOutput {
                    dependencies: deps.dependencies_of(task_id).await?,
                    heading: format!("Dependencies of task {task_id}"),
                },
                None => DependencyListOutput {
                    dependencies: deps
                        .list_dependencies(page, size)
                        .await
                        .context("Failed to list dependencies")?,
                    heading: format!("Dependencies, page {}", page.unwrap_or(1)),
                },
            };
            output(&out, json_mode);
        }
        DependencyCommands::Show { id } => {
            let dependency = deps.get_dependency(id).await?;
            output(
                &DependencyOutput {
                    dependency,
                    message: None,
                },
                json_mode,
            );
        }
        DependencyCommands::Add {
            task_id,
            dependent_task_id,
        } => {
            let dependency = deps
                .create_dependency(DependencyDraft::new(task_id, dependent_task_id))
                .await?;
            output(
                &DependencyOutput {
                    dependency,
                    message: Some("Dependency added.".to_string()),
                },
                json_mode,
            );
        }
        DependencyCommands::Update {
            id,
            task_id,
            dependent_task_id,
        } => {
            let dependency = deps
                .update_dependency(id, DependencyDraft::new(task_id, dependent_task_id))
                .await?;
            output(
                &DependencyOutput {
                    dependency,
                    message: Some("Dependency updated.".to_string()),
                },
                json_mode,
            );
        }
        DependencyCommands::Remove { id } => {
            deps.delete_dependency(id).await?;
            output(&DependencyRemovedOutput { success: true, id }, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_output_formats() {
        let out = DependencyOutput {
            dependency: TaskDependency::new(4, 1, 2),
            message: Some("Dependency added.".to_string()),
        };
        assert!(out.to_human().contains("task 1 -> task 2"));
        assert_eq!(out.to_json()["dependent_task_id"], 2);
    }

    #[test]
    fn test_empty_list_uses_heading() {
        let out = DependencyListOutput {
            dependencies: vec![],
            heading: "Dependencies of task 7".to_string(),
        };
        assert_eq!(out.to_human(), "Dependencies of task 7: none.");
    }
}
