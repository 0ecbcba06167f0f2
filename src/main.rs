//! tasktrack CLI entry point.

use anyhow::Result;
use clap::Parser;

use tasktrack::cli::commands::{cache, dependency, init, serve, task};
use tasktrack::cli::{handle_error, Cli, Commands};
use tasktrack::domain::models::Config;
use tasktrack::infrastructure::config::ConfigLoader;
use tasktrack::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // init runs before a config exists
    let config = match cli.command {
        Commands::Init(_) => Config::default(),
        _ => ConfigLoader::load()?,
    };

    let mut log_config = LogConfig::from(&config.logging);
    if !cli.verbose && !cli.command.is_long_running() {
        log_config.level = "warn".to_string();
    }
    let _logger = LoggerImpl::init(&log_config)?;

    match cli.command {
        Commands::Init(args) => init::execute(args, cli.json).await,
        Commands::Serve(args) => serve::execute(args, config).await,
        Commands::Task(args) => task::execute(args, config, cli.json).await,
        Commands::Dependency(args) => dependency::execute(args, config, cli.json).await,
        Commands::Cache(args) => cache::execute(args, config, cli.json).await,
    }
}
