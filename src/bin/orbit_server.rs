use anyhow::{Context, Result};
use clap::Parser;
use orbit::adapters::{DockerLauncher, InMemoryServiceStore, JsonFileServiceStore, TokioCommandRunner};
use orbit::core::ServiceStore;
use orbit::utils::{logger, validation::Validate};
use orbit::{api, ProvisioningService, ServerConfig};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "orbit-server")]
#[command(about = "Serves the orbit service provisioning API")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "ORBIT_SERVER_CONFIG")]
    config: Option<String>,

    /// Override the listen address from the config
    #[arg(long)]
    listen: Option<String>,

    /// Override the service record file from the config
    #[arg(long)]
    store: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => ServerConfig::default(),
    };

    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    if let Some(store) = args.store {
        config.server.store_path = Some(store);
    }
    config.server.json_logs |= args.json_logs;

    logger::init_server_logger(args.verbose, config.server.json_logs);
    config.validate().context("invalid server configuration")?;

    tracing::info!(
        listen_addr = %config.server.listen_addr,
        store_path = ?config.server.store_path,
        docker = %config.docker.binary,
        "orbit-server starting"
    );

    match config.server.store_path.clone() {
        Some(path) => {
            let store = JsonFileServiceStore::open(&path)
                .await
                .with_context(|| format!("failed to open service store {}", path))?;
            serve(&config, store).await
        }
        None => {
            tracing::warn!("no store_path configured, service records are kept in memory");
            serve(&config, InMemoryServiceStore::new()).await
        }
    }
}

async fn serve<S: ServiceStore + 'static>(config: &ServerConfig, store: S) -> Result<()> {
    let launcher = DockerLauncher::new(
        TokioCommandRunner::new(),
        config.docker.binary.as_str(),
        config.docker.keep_alive.as_str(),
    );
    let service = Arc::new(ProvisioningService::new(launcher, store));
    let router = api::router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .context("failed to bind TCP listener")?;
    tracing::info!("orbit API ready on http://{}/api", config.server.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("orbit-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
