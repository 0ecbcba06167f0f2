//! Implementation of the `tasktrack cache` commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::warn;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::domain::ports::CacheStore;
use crate::infrastructure::AppContext;

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Backfill every default-size page of tasks and dependencies into the
    /// shared (redis) cache
    Warm,
}

#[derive(Debug, serde::Serialize)]
pub struct WarmOutput {
    pub provider: String,
    pub task_pages: usize,
    pub dependency_pages: usize,
}

impl CommandOutput for WarmOutput {
    fn to_human(&self) -> String {
        format!(
            "Warmed {} task page(s) and {} dependency page(s) in the {} cache.",
            self.task_pages, self.dependency_pages, self.provider
        )
    }
}

pub async fn execute(args: CacheArgs, config: Config, json_mode: bool) -> Result<()> {
    match args.command {
        CacheCommands::Warm => {
            let ctx = AppContext::open(config).await?;
            if !ctx.cache.is_enabled() {
                warn!("cache backend is disabled, nothing will be kept");
            } else if !ctx.cache.is_shared() {
                warn!(
                    provider = ctx.cache.provider_name(),
                    "cache lives in this process only and is dropped on exit; use the redis backend or 'serve --warm'"
                );
            }
            let (task_pages, dependency_pages) = ctx.warm_caches().await?;
            output(
                &WarmOutput {
                    provider: ctx.cache.provider_name().to_string(),
                    task_pages,
                    dependency_pages,
                },
                json_mode,
            );
        }
    }
    Ok(())
}
