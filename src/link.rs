//! UDP link to the DAW
//!
//! Binds the inbound port, sends to the DAW's port, and encodes/decodes with
//! rosc. Sending is a non-blocking `try_send_to`: fire-and-forget, no retry.

use parking_lot::RwLock;
use rosc::{OscMessage, OscPacket, OscType};
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{info, trace};

use crate::config::OscConfig;
use crate::error::{Result, SurfaceError};
use crate::osc::OscSender;

/// Largest datagram accepted from the DAW
const MAX_DATAGRAM: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Open,
    Closed,
}

pub struct UdpLink {
    socket: UdpSocket,
    target: SocketAddr,
    status: RwLock<LinkStatus>,
}

impl UdpLink {
    /// Bind `0.0.0.0:listen_port` and target `host:send_port`
    pub async fn open(config: &OscConfig) -> Result<Self> {
        let local = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
        let target = resolve(&config.host, config.send_port).await?;
        Self::bind(local, target).await
    }

    /// Bind an ephemeral port, for one-shot commands next to a running session
    pub async fn ephemeral(config: &OscConfig) -> Result<Self> {
        let target = resolve(&config.host, config.send_port).await?;
        Self::bind(SocketAddr::from(([0, 0, 0, 0], 0)), target).await
    }

    pub async fn bind(local: SocketAddr, target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(local).await?;
        info!(
            "✅ OSC link open on {} → {}",
            socket.local_addr()?,
            target
        );
        Ok(Self {
            socket,
            target,
            status: RwLock::new(LinkStatus::Open),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn status(&self) -> LinkStatus {
        *self.status.read()
    }

    pub fn is_open(&self) -> bool {
        self.status() == LinkStatus::Open
    }

    /// Wait for the next datagram and decode it
    pub async fn recv(&self) -> Result<OscPacket> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (len, from) = self.socket.recv_from(&mut buf).await?;
        trace!("Received {} bytes from {}", len, from);

        let (_, packet) = rosc::decoder::decode_udp(&buf[..len])
            .map_err(|e| SurfaceError::Decode(format!("{:?}", e)))?;
        Ok(packet)
    }

    /// Stop sending. The socket itself is released on drop.
    pub fn close(&self) {
        *self.status.write() = LinkStatus::Closed;
        info!("❌ OSC link closed");
    }
}

impl OscSender for UdpLink {
    fn name(&self) -> &str {
        "udp"
    }

    fn send(&self, address: &str, value: OscType) -> Result<()> {
        if !self.is_open() {
            return Err(SurfaceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "OSC link is closed",
            )));
        }

        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args: vec![value],
        });
        let buf = rosc::encoder::encode(&packet)
            .map_err(|e| SurfaceError::Encode(format!("{:?}", e)))?;
        self.socket.try_send_to(&buf, self.target)?;
        Ok(())
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    lookup_host((host, port)).await?.next().ok_or_else(|| {
        SurfaceError::Io(std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("could not resolve {}:{}", host, port),
        ))
    })
}
