use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use trade_bot::config::ConfigFormat;
use trade_bot::{Config, IntervalPacer, Workflow};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "trade-bot")]
#[command(about = "Sends every account's items to the partner and confirms the offers")]
struct Args {
    /// Project config
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Project config type (toml or json)
    #[arg(long = "config-type", default_value = "toml")]
    config_type: ConfigFormat,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = Config::load(&args.config, args.config_type)?;
    common::setup_env(&config.log.level, config.log.destination.as_deref())?;

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let always_exit_zero = config.run.always_exit_zero;
    let pacer = IntervalPacer::new(config.pacing.clone());
    let workflow = Workflow::new(config, steam::Client::new(), pacer);

    let report = workflow.run(&shutdown).await;
    Ok(ExitCode::from(report.exit_status(always_exit_zero)))
}

async fn watch_signals(shutdown: CancellationToken) {
    if let Err(e) = wait_for_signal().await {
        log::error!("Failed to listen for shutdown signals: {e}");
        return;
    }
    log::info!("Shutdown signal received");
    sleep(SHUTDOWN_GRACE).await;
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
