use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use clap::Parser;
use sitewatch::{
    api::{ApiState, spawn_api_server},
    config::{Config, StorageConfig, read_config_file},
    notify::{EmailNotifier, Notifier},
    probe::HttpProber,
    scheduler::{CheckEvent, SchedulerHandle},
    storage::{JobRegistry, MemoryStore, SqliteStore, TargetStore},
};
use tokio::sync::broadcast;
use tracing::{info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (defaults apply when omitted)
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_target("sitewatch", LevelFilter::TRACE);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let (store, registry): (Arc<dyn TargetStore>, Arc<dyn JobRegistry>) =
        match config.storage.clone().unwrap_or_default() {
            StorageConfig::Sqlite { path } => {
                info!("using sqlite storage at {}", path.display());
                let store = Arc::new(
                    SqliteStore::new(&path)
                        .await
                        .context("failed to open sqlite store")?,
                );
                (store.clone(), store)
            }
            StorageConfig::None => {
                warn!("no persistent storage configured, targets live in memory only");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
        };

    let monitor_config = config.monitor.clone().unwrap_or_default();
    let prober = Arc::new(HttpProber::new(monitor_config.probe_timeout()));

    let notifier = config
        .mail
        .as_ref()
        .and_then(EmailNotifier::from_config)
        .map(|n| Arc::new(n) as Arc<dyn Notifier>);
    if notifier.is_none() {
        warn!("no mail provider configured, downtime alerts are disabled");
    }

    let (event_tx, event_rx) = broadcast::channel(64);
    spawn_transition_logger(event_rx);

    let scheduler = SchedulerHandle::spawn(
        store.clone(),
        registry,
        prober.clone(),
        notifier,
        event_tx,
        monitor_config.check_interval(),
    );

    // Replay the job registry before accepting requests. A registry that
    // cannot be read is fatal.
    let recovered = scheduler.recover().await?;
    info!("recovered {recovered} monitoring jobs");

    let api_config = config.api.clone().unwrap_or_default();
    let state = ApiState::new(scheduler.clone(), store.clone(), prober);
    let addr = spawn_api_server(api_config, state).await?;
    info!("ready to accept requests on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    scheduler.shutdown().await;
    store.close().await?;

    Ok(())
}

/// Log every status change observed on the event bus.
fn spawn_transition_logger(mut event_rx: broadcast::Receiver<CheckEvent>) {
    tokio::spawn(async move {
        let mut last_seen: HashMap<String, u16> = HashMap::new();
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let code = event.sample.status_code;
                    match last_seen.insert(event.target_id.clone(), code) {
                        Some(previous) if previous == code => {}
                        _ => info!("{} now reports status {code}", event.url),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("transition logger lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
