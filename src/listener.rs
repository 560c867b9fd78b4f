//! Blocking UDP receive loop on a dedicated OS thread.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::IngestConfig;
use crate::datagram::RawDatagram;
use crate::queue::DatagramSender;
use crate::{Result, TelemetryError};

const THREAD_NAME: &str = "trackside-udp";

/// Owns the listener thread. Dropping it stops the thread and closes the socket.
#[derive(Debug)]
pub struct UdpListener {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl UdpListener {
    /// Bind the configured address and start receiving into `sender`.
    pub fn bind(config: &IngestConfig, sender: DatagramSender) -> Result<Self> {
        config.validate()?;

        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr).map_err(|e| TelemetryError::socket("bind", e))?;
        socket
            .set_read_timeout(Some(config.poll_interval()))
            .map_err(|e| TelemetryError::socket("set_read_timeout", e))?;
        let local_addr = socket.local_addr().map_err(|e| TelemetryError::socket("local_addr", e))?;

        let cancel = CancellationToken::new();
        let receiver = ReceiveLoop {
            socket,
            sender,
            cancel: cancel.clone(),
            buffer: vec![0u8; config.recv_buffer_bytes],
        };
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || receiver.run())
            .map_err(|source| TelemetryError::ThreadSpawn { source })?;

        info!(%local_addr, "UDP listener started");
        Ok(Self { local_addr, cancel, handle: Some(handle) })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the receive thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("UDP listener thread panicked");
            }
            info!(local_addr = %self.local_addr, "UDP listener stopped");
        }
    }
}

impl Drop for UdpListener {
    fn drop(&mut self) {
        debug!("Dropping UDP listener");
        self.shutdown();
    }
}

struct ReceiveLoop {
    socket: UdpSocket,
    sender: DatagramSender,
    cancel: CancellationToken,
    buffer: Vec<u8>,
}

impl ReceiveLoop {
    fn run(mut self) {
        let mut received = 0u64;
        while !self.cancel.is_cancelled() {
            match self.socket.recv_from(&mut self.buffer) {
                Ok((len, source)) => {
                    received += 1;
                    trace!(len, %source, "Received datagram");
                    if !self.sender.push(RawDatagram::new(&self.buffer[..len], source)) {
                        debug!("Datagram receiver dropped, stopping listener");
                        break;
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if self.sender.is_closed() {
                        debug!("Datagram receiver dropped, stopping listener");
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "UDP receive failed"),
            }
        }
        debug!(received, "UDP receive loop exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::MAX_PACKET_SIZE;
    use crate::queue::handoff;
    use std::time::{Duration, Instant};

    fn test_config() -> IngestConfig {
        IngestConfig { poll_interval_ms: 20, ..IngestConfig::loopback() }
    }

    fn wait_for(mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn receives_exact_datagram_bytes() -> anyhow::Result<()> {
        let (sender, receiver) = handoff();
        let listener = UdpListener::bind(&test_config(), sender)?;
        let client = UdpSocket::bind("127.0.0.1:0")?;

        client.send_to(&[1, 2, 3], listener.local_addr())?;
        client.send_to(&[4, 5], listener.local_addr())?;

        let mut collected = Vec::new();
        let arrived = wait_for(|| {
            collected.extend(receiver.drain());
            collected.len() == 2
        });
        anyhow::ensure!(arrived, "datagrams did not arrive");
        assert_eq!(collected[0].bytes(), &[1, 2, 3]);
        assert_eq!(collected[1].bytes(), &[4, 5]);
        assert_eq!(collected[0].source(), client.local_addr()?);
        Ok(())
    }

    #[test]
    fn drop_stops_the_thread_and_frees_the_port() -> anyhow::Result<()> {
        let (sender, _receiver) = handoff();
        let listener = UdpListener::bind(&test_config(), sender)?;
        let addr = listener.local_addr();
        drop(listener);

        let rebound = UdpSocket::bind(addr)?;
        assert_eq!(rebound.local_addr()?, addr);
        Ok(())
    }

    #[test]
    fn exits_when_the_receiver_is_dropped() -> anyhow::Result<()> {
        let (sender, receiver) = handoff();
        let listener = UdpListener::bind(&test_config(), sender)?;
        drop(receiver);
        anyhow::ensure!(wait_for(|| listener.is_finished()), "listener kept running");
        Ok(())
    }

    #[test]
    fn bind_conflict_is_a_socket_error() -> anyhow::Result<()> {
        let taken = UdpSocket::bind("127.0.0.1:0")?;
        let config = IngestConfig { port: taken.local_addr()?.port(), ..test_config() };
        let (sender, _receiver) = handoff();

        let err = UdpListener::bind(&config, sender).expect_err("port is in use");
        assert!(matches!(err, TelemetryError::Socket { ref operation, .. } if operation == "bind"));
        Ok(())
    }

    #[test]
    fn largest_packet_arrives_whole() -> anyhow::Result<()> {
        let (sender, receiver) = handoff();
        let listener = UdpListener::bind(&test_config(), sender)?;
        let client = UdpSocket::bind("127.0.0.1:0")?;

        let motion: Vec<u8> = (0..MAX_PACKET_SIZE).map(|i| (i % 251) as u8).collect();
        client.send_to(&motion, listener.local_addr())?;

        let mut collected = Vec::new();
        anyhow::ensure!(
            wait_for(|| {
                collected.extend(receiver.drain());
                !collected.is_empty()
            }),
            "datagram did not arrive"
        );
        assert_eq!(collected[0].len(), MAX_PACKET_SIZE);
        assert_eq!(collected[0].bytes(), motion.as_slice());
        Ok(())
    }

    #[test]
    fn undersized_receive_buffer_is_refused() {
        let config = IngestConfig { recv_buffer_bytes: 100, ..test_config() };
        let (sender, _receiver) = handoff();

        let err = UdpListener::bind(&config, sender).expect_err("buffer cannot hold motion");
        assert!(matches!(err, TelemetryError::Config { .. }));
    }
}
