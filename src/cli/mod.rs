//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::cache::CacheArgs;
use commands::dependency::DependencyArgs;
use commands::init::InitArgs;
use commands::serve::ServeArgs;
use commands::task::TaskArgs;

#[derive(Parser, Debug)]
#[command(name = "tasktrack", version, about = "Task tracker with a paged read cache")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log at the configured level instead of warnings only
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .tasktrack/ with a default config and an empty database
    Init(InitArgs),
    /// Run the REST server
    Serve(ServeArgs),
    /// Task management commands
    Task(TaskArgs),
    /// Dependency management commands
    #[command(name = "dep")]
    Dependency(DependencyArgs),
    /// Read cache maintenance
    Cache(CacheArgs),
}

impl Commands {
    /// Whether the command runs long enough to want full logging.
    pub fn is_long_running(&self) -> bool {
        matches!(self, Self::Serve(_))
    }
}

/// Print an error (and its causes) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::parse_from(["tasktrack", "--json", "dep", "add", "1", "2"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Dependency(_)));

        let cli = Cli::parse_from(["tasktrack", "serve", "--port", "9000"]);
        assert!(cli.command.is_long_running());
    }
}
