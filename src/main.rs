use std::sync::Arc;

use clap::Parser;
use searchd::config::{Cli, Config};
use searchd::router::Router;
use searchd::search::QueryProcessor;
use searchd::server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load(Cli::parse())?;

    tracing::info!(indices = cfg.indices.len(), "building search indices");
    let engine = QueryProcessor::load(&cfg.indices)?;
    let router = Router::new(cfg.static_dir.clone(), Arc::new(engine));

    let server = Server::bind(cfg, router)?;

    server
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
