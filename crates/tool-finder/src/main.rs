mod config;
mod directory;
mod error;
mod server;
mod session;
mod web;

use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use directory::Directory;
use server::ToolFinderServer;
use tool_finder_core::handoff::HandoffStore;
use tool_finder_core::redis::RedisCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting tool-finder");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        catalog = ?config.catalog_path,
        redis = config.redis_url.is_some(),
        handoff_ttl_secs = config.handoff_ttl_secs,
        "configuration loaded"
    );

    // 2. Load the catalog
    let catalog = config.load_catalog()?;
    info!(
        tools = catalog.len(),
        fingerprint = %catalog.fingerprint(),
        "catalog loaded"
    );

    // 3. Connect to Redis (optional, handoffs fall back to memory)
    let redis = RedisCache::new(config.redis_url.as_deref());
    if redis.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, keeping handoffs in memory");
    }
    let handoff = HandoffStore::new(redis, config.handoff_ttl_secs);

    let directory = Directory::new(catalog, handoff, config.submit_delay);
    let server = ToolFinderServer::new(directory.clone());

    // 4. Serve
    if let Some(addr) = &config.http_listen_addr {
        let mcp = StreamableHttpService::new(
            move || Ok::<_, std::io::Error>(server.fork()),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig::default(),
        );
        let app = web::router(directory).nest_service("/mcp", mcp);
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "serving JSON API and MCP over HTTP");
        axum::serve(listener, app).await?;
    } else if let Some(addr) = &config.mcp_tcp_listen_addr {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.fork();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
