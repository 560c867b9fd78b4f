//! Headless monitor: listens for telemetry and logs a one-line race summary.
//!
//! Usage: `trackside-monitor [config.yaml]`. Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::time::Duration;

use anyhow::Context;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trackside::{IngestConfig, RaceSnapshot, Trackside, UpdateRate};

const TICK_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => IngestConfig::load(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?,
        None => IngestConfig::default(),
    }
    .with_env_overrides()
    .context("applying environment overrides")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: IngestConfig) -> anyhow::Result<()> {
    let mut connection = Trackside::listen_with(&config)?;
    info!(addr = %connection.local_addr(), "Monitoring telemetry, press Ctrl-C to stop");

    let mut updates = connection.subscribe(UpdateRate::Max(1));
    let reporter = tokio::spawn(async move {
        while let Some(snapshot) = updates.next().await {
            info!("{}", summary(&snapshot));
        }
    });

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
        on_signal.cancel();
    });

    let stats = connection.run(TICK_INTERVAL, cancel).await;
    drop(connection);
    reporter.await.context("reporter task")?;

    info!(
        datagrams = stats.datagrams,
        decoded = stats.decoded,
        failed = stats.failed,
        unknown_format = stats.unknown_format,
        "Stopped"
    );
    Ok(())
}

fn summary(snapshot: &RaceSnapshot) -> String {
    let mut parts = vec![format!("rev {}", snapshot.revision())];

    if let Some(session) = snapshot.session() {
        parts.push(format!(
            "{:?} {:?} track {}C air {}C",
            session.session_type,
            session.weather,
            session.track_temperature,
            session.air_temperature
        ));
    }
    if let Some(lap) = snapshot.player_lap() {
        parts.push(format!("P{} lap {}", lap.car_position, lap.current_lap_num));
    }
    if let Some(car) = snapshot.player_telemetry() {
        parts.push(format!("{} km/h gear {} {} rpm", car.speed, car.gear, car.engine_rpm));
    }
    if let Some(event) = snapshot.last_event() {
        parts.push(format!("last event {}", event.code()));
    }
    if let Some(drivers) = snapshot.participants_packet() {
        parts.push(format!("{} cars", drivers.active().len()));
    }

    parts.join(" | ")
}
