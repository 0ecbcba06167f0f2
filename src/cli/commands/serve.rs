//! Implementation of the `tasktrack serve` command.

use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{info, warn};

use crate::adapters::http::{HttpConfig, HttpServer};
use crate::domain::models::Config;
use crate::infrastructure::AppContext;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Backfill every cache page before accepting requests
    #[arg(long)]
    pub warm: bool,
}

impl ServeArgs {
    fn http_config(&self, config: &Config) -> HttpConfig {
        let mut http = HttpConfig::from(&config.server);
        if let Some(host) = &self.host {
            http.host = host.clone();
        }
        if let Some(port) = self.port {
            http.port = port;
        }
        http
    }
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let http = args.http_config(&config);
    let warm = args.warm || config.cache.warm_on_start;

    let context = AppContext::open(config).await?;
    if warm {
        context.warm_caches().await?;
    }

    info!(host = %http.host, port = http.port, "starting REST server");
    HttpServer::new(context, http)
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Server error: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_config() {
        let config = Config::default();
        let args = ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: None,
            warm: false,
        };
        let http = args.http_config(&config);
        assert_eq!(http.host, "0.0.0.0");
        assert_eq!(http.port, config.server.port);
    }
}
