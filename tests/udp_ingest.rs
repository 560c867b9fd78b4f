//! End-to-end ingestion over a real loopback socket
//!
//! Sends hand-built datagrams to a listening connection and checks what the
//! snapshot exposes after draining.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use trackside::packets::{Event, EventCode, PacketFormat, PacketType, ResultStatus};
use trackside::{FormatPolicy, IngestConfig, LiveConnection, Trackside};

const CAR_COUNT: usize = 22;

fn header(format: u16, packet_type: PacketType, frame: u32, player: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(24);
    bytes.extend_from_slice(&format.to_le_bytes());
    bytes.extend_from_slice(&[1, 18, 1, packet_type.id()]);
    bytes.extend_from_slice(&0xABCD_u64.to_le_bytes());
    bytes.extend_from_slice(&12.5f32.to_le_bytes());
    bytes.extend_from_slice(&frame.to_le_bytes());
    bytes.extend_from_slice(&[player, 255]);
    bytes
}

fn zeroed(format: u16, packet_type: PacketType, frame: u32) -> Vec<u8> {
    let mut bytes = header(format, packet_type, frame, 0);
    bytes.resize(packet_type.packet_size(), 0);
    bytes
}

fn lap_data(frame: u32, player: u8, position: u8) -> Vec<u8> {
    let mut bytes = header(2020, PacketType::LapData, frame, player);
    bytes.resize(PacketType::LapData.packet_size(), 0);
    let car = 24 + usize::from(player) * 53;
    bytes[car + 44] = position;
    bytes[car + 45] = 7;
    bytes[car + 52] = 2;
    bytes
}

fn retirement(vehicle: u8) -> Vec<u8> {
    let mut bytes = header(2020, PacketType::Event, 1, 0);
    bytes.extend_from_slice(b"RTMT");
    bytes.push(vehicle);
    bytes.resize(PacketType::Event.packet_size(), 0);
    bytes
}

fn open() -> Result<(LiveConnection, UdpSocket, SocketAddr)> {
    let config = IngestConfig { poll_interval_ms: 20, ..IngestConfig::loopback() };
    let connection = Trackside::listen_with(&config)?;
    let client = UdpSocket::bind("127.0.0.1:0")?;
    let addr = connection.local_addr();
    Ok((connection, client, addr))
}

fn drain(connection: &mut LiveConnection, expected: u64) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while connection.stats().datagrams < expected {
        ensure!(Instant::now() < deadline, "only {} datagrams arrived", connection.stats().datagrams);
        connection.tick();
        std::thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}

#[test]
fn snapshot_reflects_received_packets() -> Result<()> {
    let (mut connection, client, addr) = open()?;

    client.send_to(&lap_data(100, 4, 2), addr)?;
    client.send_to(&zeroed(2020, PacketType::CarTelemetry, 100), addr)?;
    client.send_to(&retirement(11), addr)?;
    drain(&mut connection, 3)?;

    let snapshot = connection.snapshot();
    let laps = snapshot.lap_data().context("lap data slot")?;
    ensure!(laps.len() == CAR_COUNT, "expected {CAR_COUNT} cars");

    let player = snapshot.player_lap().context("player lap")?;
    ensure!(player.car_position == 2, "player position");
    ensure!(player.current_lap_num == 7, "player lap number");
    ensure!(player.result_status == ResultStatus::Active, "result status");

    let event = snapshot.last_event().context("event slot")?;
    ensure!(event.code() == EventCode::Retirement, "event code");
    ensure!(event.event.vehicle_idx() == Some(11), "retired vehicle");
    ensure!(matches!(event.event, Event::Retirement(_)), "event payload");

    ensure!(snapshot.car_telemetry().is_some(), "telemetry slot");
    ensure!(snapshot.motion().is_none(), "motion never sent");
    Ok(())
}

#[test]
fn malformed_datagrams_are_dropped_individually() -> Result<()> {
    let (mut connection, client, addr) = open()?;

    let mut unknown_type = zeroed(2020, PacketType::Motion, 1);
    unknown_type[5] = 77;
    let mut unknown_event = retirement(3);
    unknown_event[24..28].copy_from_slice(b"XXXX");

    client.send_to(&zeroed(2020, PacketType::Motion, 1), addr)?;
    client.send_to(&unknown_type, addr)?;
    client.send_to(&unknown_event, addr)?;
    client.send_to(&[1, 2, 3], addr)?;
    client.send_to(&zeroed(2020, PacketType::Session, 2), addr)?;
    drain(&mut connection, 5)?;

    let stats = connection.stats();
    ensure!(stats.decoded == 2, "decoded {}", stats.decoded);
    ensure!(stats.failed == 3, "failed {}", stats.failed);

    let snapshot = connection.snapshot();
    ensure!(snapshot.motion().is_some(), "motion applied");
    ensure!(snapshot.session().is_some(), "session applied");
    ensure!(snapshot.last_event().is_none(), "bad event not applied");
    Ok(())
}

#[test]
fn unknown_format_year_is_tolerated_by_default() -> Result<()> {
    let (mut connection, client, addr) = open()?;

    client.send_to(&zeroed(2077, PacketType::CarStatus, 9), addr)?;
    drain(&mut connection, 1)?;

    let stats = connection.stats();
    ensure!(stats.decoded == 1 && stats.unknown_format == 1, "stats {stats:?}");
    ensure!(connection.snapshot().car_status().is_some(), "status applied");
    ensure!(PacketFormat::from_raw(2077) == PacketFormat::Unknown(2077), "format model");
    Ok(())
}

#[test]
fn reject_policy_applies_end_to_end() -> Result<()> {
    let config = IngestConfig {
        poll_interval_ms: 20,
        format_policy: FormatPolicy::RejectUnsupported,
        ..IngestConfig::loopback()
    };
    let mut connection = Trackside::listen_with(&config)?;
    let client = UdpSocket::bind("127.0.0.1:0")?;

    client.send_to(&zeroed(2077, PacketType::CarStatus, 9), connection.local_addr())?;
    client.send_to(&zeroed(2021, PacketType::CarTelemetry, 9), connection.local_addr())?;
    client.send_to(&zeroed(2020, PacketType::CarStatus, 10), connection.local_addr())?;
    drain(&mut connection, 3)?;

    let packet = connection.snapshot().car_status().map(<[_]>::len);
    ensure!(packet == Some(CAR_COUNT), "2020 format applied");
    ensure!(connection.snapshot().car_telemetry().is_none(), "2021 telemetry rejected");
    ensure!(connection.stats().failed == 2, "unsupported formats rejected");
    Ok(())
}
