//! Implementation of the `tasktrack init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::initialize_project;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with the defaults
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub config_written: bool,
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("  Config:   {} (written)", self.config_path.display()));
        } else {
            lines.push(format!("  Config:   {} (kept existing)", self.config_path.display()));
        }
        lines.push(format!("  Database: {}", self.database_path.display()));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let report = initialize_project(&target_path, args.force).await?;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        config_path: report.config_path,
        config_written: report.config_written,
        database_path: report.database_path,
    };

    output(&output_data, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_in_directory() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };
        execute(args, true).await.unwrap();

        assert!(dir.path().join(".tasktrack/config.yaml").exists());
        assert!(dir.path().join(".tasktrack/tasktrack.db").exists());
    }

    #[test]
    fn test_human_output_mentions_paths() {
        let out = InitOutput {
            success: true,
            message: "Project initialized successfully.".to_string(),
            config_path: PathBuf::from("/p/.tasktrack/config.yaml"),
            config_written: false,
            database_path: PathBuf::from("/p/.tasktrack/tasktrack.db"),
        };
        let text = out.to_human();
        assert!(text.contains("kept existing"));
        assert!(text.contains("tasktrack.db"));
    }
}
