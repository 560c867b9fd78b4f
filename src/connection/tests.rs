//! Tests for the live connection over loopback UDP

use super::*;
use crate::config::IngestConfig;
use crate::packets::{EventCode, PacketType};
use crate::test_utils::{event_packet, sized_packet};
use crate::types::UpdateRate;
use futures::StreamExt;
use std::net::UdpSocket;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

fn loopback() -> IngestConfig {
    IngestConfig { poll_interval_ms: 20, ..IngestConfig::loopback() }
}

/// Tick until `count` datagrams have been drained or five seconds pass.
fn tick_until_drained(connection: &mut LiveConnection, count: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        connection.tick();
        if connection.stats().datagrams >= count {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn ticks_apply_received_packets() -> anyhow::Result<()> {
    let mut connection = LiveConnection::open(&loopback())?;
    let client = UdpSocket::bind("127.0.0.1:0")?;

    client.send_to(&sized_packet(2020, PacketType::Participants), connection.local_addr())?;
    client.send_to(&event_packet(2020, b"CHQF", &[]), connection.local_addr())?;

    anyhow::ensure!(tick_until_drained(&mut connection, 2), "datagrams never arrived");
    let snapshot = connection.snapshot();
    assert_eq!(snapshot.participants().map(<[_]>::len), Some(22));
    assert_eq!(snapshot.last_event().map(|e| e.code()), Some(EventCode::ChequeredFlag));
    assert_eq!(connection.stats().failed, 0);
    Ok(())
}

#[test]
fn nothing_is_decoded_without_a_tick() -> anyhow::Result<()> {
    let connection = LiveConnection::open(&loopback())?;
    let client = UdpSocket::bind("127.0.0.1:0")?;
    client.send_to(&sized_packet(2020, PacketType::Motion), connection.local_addr())?;

    std::thread::sleep(Duration::from_millis(50));
    assert!(connection.snapshot().motion().is_none());
    assert_eq!(connection.stats().ticks, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_publishes_to_subscribers_until_cancelled() -> anyhow::Result<()> {
    let mut connection = LiveConnection::open(&loopback())?;
    let addr = connection.local_addr();
    let mut updates = connection.subscribe(UpdateRate::Native);

    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    let driver = tokio::spawn(async move {
        let stats = connection.run(Duration::from_millis(5), stop).await;
        info!(?stats, "Drain loop finished");
        stats
    });

    let client = UdpSocket::bind("127.0.0.1:0")?;
    client.send_to(&sized_packet(2020, PacketType::CarStatus), addr)?;

    let snapshot = tokio::time::timeout(Duration::from_secs(5), updates.next())
        .await?
        .ok_or_else(|| anyhow::anyhow!("update stream ended"))?;
    assert!(snapshot.car_status().is_some());

    cancel.cancel();
    let stats = driver.await?;
    assert!(stats.decoded >= 1);
    assert!(stats.ticks >= 1);
    Ok(())
}

#[tokio::test]
async fn zero_interval_runs_at_the_minimum_period() -> anyhow::Result<()> {
    let mut connection = LiveConnection::open(&loopback())?;

    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop.cancel();
    });

    let stats = tokio::time::timeout(
        Duration::from_secs(5),
        connection.run(Duration::ZERO, cancel),
    )
    .await?;
    assert!(stats.ticks >= 2);

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let stats = connection.run(Duration::ZERO, cancelled).await;
    assert!(stats.ticks >= 3);
    Ok(())
}
