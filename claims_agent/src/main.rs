use anyhow::{Context, Result};
use claims_agent::{
    api::{create_router, AppState, IndexerClient},
    chain::EvmReader,
    claims::{CachedClaimSource, HttpClaimSource, SummaryAggregator},
    config::AgentConfig,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Claims Agent Arguments
#[derive(Parser)]
#[clap(name = "claims_agent")]
#[clap(about = "Tool API for merkle token claims, vesting and delegation")]
struct Args {
    /// Configuration file layered over the built-in defaults (TOML or YAML)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides `server.port`
    #[clap(long)]
    port: Option<u16>,

    /// Address to bind, overrides `server.host`
    #[clap(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AgentConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let registry = Arc::new(config.registry());
    info!("Supported chains: {:?}", registry.chain_ids());

    let source = HttpClaimSource::new(&config.claims.merkle_url, config.claims.request_timeout())?;
    info!(
        "Claim document at {} (cache ttl {:?})",
        source.url(),
        config.claims.cache_ttl()
    );
    let source = Arc::new(CachedClaimSource::new(source, config.claims.cache_ttl()));

    let reader = Arc::new(EvmReader::connect(registry.clone())?);
    let indexer = IndexerClient::new(&config.indexer.graphql_url, config.claims.request_timeout())?;

    let state = AppState {
        registry,
        aggregator: SummaryAggregator::new(source, reader.clone()),
        chain: reader,
        indexer: Arc::new(indexer),
        server: Arc::new(config.server.clone()),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting claims agent API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
