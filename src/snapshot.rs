//! Latest-value race state assembled from decoded packets.
//!
//! Each category is an independent slot that the newest packet overwrites.
//! Slots are not reconciled with each other: a snapshot can hold motion from
//! one frame and lap data from another.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::packets::{
    CarMotion, CarSetup, CarSetupsPacket, CarStatus, CarStatusPacket, CarTelemetry,
    CarTelemetryPacket, EventPacket, FinalClassificationPacket, LapData, LapDataPacket,
    LobbyInfoPacket, MotionPacket, Packet, Participant, ParticipantsPacket, SessionPacket,
};

/// Point-in-time view of the race. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct RaceSnapshot {
    revision: u64,
    participants: Option<Arc<ParticipantsPacket>>,
    motion: Option<Arc<MotionPacket>>,
    lap_data: Option<Arc<LapDataPacket>>,
    car_telemetry: Option<Arc<CarTelemetryPacket>>,
    car_status: Option<Arc<CarStatusPacket>>,
    car_setups: Option<Arc<CarSetupsPacket>>,
    session: Option<Arc<SessionPacket>>,
    last_event: Option<Arc<EventPacket>>,
    final_classification: Option<Arc<FinalClassificationPacket>>,
    lobby: Option<Arc<LobbyInfoPacket>>,
}

impl RaceSnapshot {
    /// Number of updates applied since the aggregator was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn participants(&self) -> Option<&[Participant]> {
        self.participants.as_deref().map(|p| p.participants.as_slice())
    }

    pub fn motion(&self) -> Option<&[CarMotion]> {
        self.motion.as_deref().map(|p| p.cars.as_slice())
    }

    pub fn lap_data(&self) -> Option<&[LapData]> {
        self.lap_data.as_deref().map(|p| p.cars.as_slice())
    }

    pub fn car_telemetry(&self) -> Option<&[CarTelemetry]> {
        self.car_telemetry.as_deref().map(|p| p.cars.as_slice())
    }

    pub fn car_status(&self) -> Option<&[CarStatus]> {
        self.car_status.as_deref().map(|p| p.cars.as_slice())
    }

    pub fn car_setups(&self) -> Option<&[CarSetup]> {
        self.car_setups.as_deref().map(|p| p.cars.as_slice())
    }

    pub fn session(&self) -> Option<&SessionPacket> {
        self.session.as_deref()
    }

    /// Most recent event of any kind.
    pub fn last_event(&self) -> Option<&EventPacket> {
        self.last_event.as_deref()
    }

    pub fn final_classification(&self) -> Option<&FinalClassificationPacket> {
        self.final_classification.as_deref()
    }

    pub fn lobby(&self) -> Option<&LobbyInfoPacket> {
        self.lobby.as_deref()
    }

    /// Full packets, including headers, for callers that need more than the
    /// per-car arrays.
    pub fn participants_packet(&self) -> Option<&ParticipantsPacket> {
        self.participants.as_deref()
    }

    pub fn motion_packet(&self) -> Option<&MotionPacket> {
        self.motion.as_deref()
    }

    pub fn lap_data_packet(&self) -> Option<&LapDataPacket> {
        self.lap_data.as_deref()
    }

    pub fn car_telemetry_packet(&self) -> Option<&CarTelemetryPacket> {
        self.car_telemetry.as_deref()
    }

    pub fn car_status_packet(&self) -> Option<&CarStatusPacket> {
        self.car_status.as_deref()
    }

    pub fn car_setups_packet(&self) -> Option<&CarSetupsPacket> {
        self.car_setups.as_deref()
    }

    /// Entries for the player's car, taken from the latest headers.
    pub fn player_lap(&self) -> Option<&LapData> {
        let packet = self.lap_data_packet()?;
        packet.cars.get(usize::from(packet.header.player_car_index))
    }

    pub fn player_telemetry(&self) -> Option<&CarTelemetry> {
        let packet = self.car_telemetry_packet()?;
        packet.cars.get(usize::from(packet.header.player_car_index))
    }
}

/// Owns the current [`RaceSnapshot`] and publishes copies to subscribers.
#[derive(Debug)]
pub struct SnapshotAggregator {
    current: RaceSnapshot,
    published: watch::Sender<Arc<RaceSnapshot>>,
}

impl Default for SnapshotAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotAggregator {
    pub fn new() -> Self {
        let (published, _) = watch::channel(Arc::new(RaceSnapshot::default()));
        Self { current: RaceSnapshot::default(), published }
    }

    pub fn snapshot(&self) -> &RaceSnapshot {
        &self.current
    }

    pub fn revision(&self) -> u64 {
        self.current.revision
    }

    pub fn update_participants(&mut self, packet: ParticipantsPacket) {
        self.current.participants = Some(Arc::new(packet));
        self.bump("participants");
    }

    pub fn update_motion(&mut self, packet: MotionPacket) {
        self.current.motion = Some(Arc::new(packet));
        self.bump("motion");
    }

    pub fn update_lap_data(&mut self, packet: LapDataPacket) {
        self.current.lap_data = Some(Arc::new(packet));
        self.bump("lap data");
    }

    pub fn update_car_telemetry(&mut self, packet: CarTelemetryPacket) {
        self.current.car_telemetry = Some(Arc::new(packet));
        self.bump("car telemetry");
    }

    pub fn update_car_status(&mut self, packet: CarStatusPacket) {
        self.current.car_status = Some(Arc::new(packet));
        self.bump("car status");
    }

    pub fn update_car_setups(&mut self, packet: CarSetupsPacket) {
        self.current.car_setups = Some(Arc::new(packet));
        self.bump("car setups");
    }

    pub fn update_session(&mut self, packet: SessionPacket) {
        self.current.session = Some(Arc::new(packet));
        self.bump("session");
    }

    pub fn update_event(&mut self, packet: EventPacket) {
        self.current.last_event = Some(Arc::new(packet));
        self.bump("event");
    }

    pub fn update_final_classification(&mut self, packet: FinalClassificationPacket) {
        self.current.final_classification = Some(Arc::new(packet));
        self.bump("final classification");
    }

    pub fn update_lobby(&mut self, packet: LobbyInfoPacket) {
        self.current.lobby = Some(Arc::new(packet));
        self.bump("lobby");
    }

    /// Route a decoded packet to its slot.
    pub fn apply(&mut self, packet: Packet) {
        match packet {
            Packet::Motion(p) => self.update_motion(p),
            Packet::Session(p) => self.update_session(p),
            Packet::LapData(p) => self.update_lap_data(p),
            Packet::Event(p) => self.update_event(p),
            Packet::Participants(p) => self.update_participants(p),
            Packet::CarSetups(p) => self.update_car_setups(p),
            Packet::CarTelemetry(p) => self.update_car_telemetry(p),
            Packet::CarStatus(p) => self.update_car_status(p),
            Packet::FinalClassification(p) => self.update_final_classification(p),
            Packet::LobbyInfo(p) => self.update_lobby(p),
        }
    }

    /// Send the current state to subscribers. Returns the published copy.
    pub fn publish(&self) -> Arc<RaceSnapshot> {
        let snapshot = Arc::new(self.current.clone());
        self.published.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    /// Receiver that always holds the most recently published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RaceSnapshot>> {
        self.published.subscribe()
    }

    fn bump(&mut self, slot: &'static str) {
        self.current.revision += 1;
        trace!(slot, revision = self.current.revision, "Snapshot slot updated");
    }
}
