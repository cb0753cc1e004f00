use clap::Parser;
use orbit::adapters::{ChangeWatcher, GitCli, HttpProjectApi, TokioCommandRunner};
use orbit::config::cli::{Command, DaemonArgs};
use orbit::utils::{logger, validation::Validate};
use orbit::{Cli, OrbitConfig, OrbitError, ProjectProvisioner, Result, SyncDaemon, SyncPipeline};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(e);
    }

    let result = match &cli.command {
        Command::Daemon(args) => run_daemon(&cli, args).await,
        Command::CreateProject { name } => match cli.orbit_config() {
            Ok(config) => create_project(&cli, &config, name).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (kind: {}, severity: {:?})",
            e,
            e.kind(),
            e.severity()
        );
        exit_with(e);
    }
}

fn exit_with(e: OrbitError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn run_daemon(cli: &Cli, args: &DaemonArgs) -> Result<()> {
    let root = std::env::current_dir()?;

    let mut watcher = ChangeWatcher::new(&root);
    let signals = watcher.start()?;

    let git = GitCli::new(TokioCommandRunner::new(), cli.git_bin.as_str(), &root);
    let policy = args.sync_policy();
    if policy.max_retries > 0 {
        tracing::info!(
            retries = policy.max_retries,
            backoff_ms = policy.backoff.as_millis() as u64,
            "sync steps will be retried before giving up"
        );
    }
    let daemon = SyncDaemon::new(SyncPipeline::new(git, policy));

    let outcome = daemon.run(signals, shutdown_signal()).await;
    watcher.stop();

    let report = outcome?;
    tracing::info!(
        events = report.events,
        cycles = report.cycles,
        delivery_errors = report.delivery_errors,
        "daemon stopped"
    );
    Ok(())
}

async fn create_project(cli: &Cli, config: &OrbitConfig, name: &str) -> Result<()> {
    let api = HttpProjectApi::new(config)?;
    let git = GitCli::new(TokioCommandRunner::new(), cli.git_bin.as_str(), ".");
    let provisioner = ProjectProvisioner::new(config, api, git);

    let path = provisioner.create_project(name).await?;
    tracing::debug!(path = %path.display(), "project cloned");

    println!("{} created successfully", name);
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the daemon simply
/// runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
