//! Surface module - mirrored mixer and transport state
//!
//! The `Surface` owns one dispatcher, one bank of tracks and one transport,
//! all sharing the same outbound sender. Inbound packets are handed to
//! `handle_packet`, which is the boundary where malformed messages are
//! logged and skipped instead of tearing down the session.

mod bank;
mod track;
mod transport;


pub use bank::Bank;
pub use track::{
    Monitor, Track, TrackState, DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME, PAN_CENTER, PAN_LEFT,
    PAN_RIGHT, UNITY_VOLUME,
};
pub use transport::{Transport, TransportState};

use rosc::{OscMessage, OscPacket, OscType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SurfaceConfig;
use crate::error::{Result, SurfaceError};
use crate::osc::{DawAddress, Dispatcher, OscSender};

/// Whether outbound commands also write the local mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorPolicy {
    /// Local state changes only when the DAW echoes a change back
    #[default]
    Confirmed,
    /// Commands update the field they target immediately
    Optimistic,
}

/// Resolve `address`, send `value` and log it under its signal name
pub(crate) fn send_signal(
    sender: &dyn OscSender,
    address: DawAddress,
    id: Option<u32>,
    value: OscType,
) -> Result<()> {
    let path = address.resolve(id)?;
    sender.send(&path, value.clone())?;
    debug!(
        signal = %address.signal(id),
        path = %path,
        value = ?value,
        via = sender.name(),
        "➡️ Sent signal to DAW"
    );
    Ok(())
}

/// Point-in-time copy of everything the surface mirrors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub active_bank: i32,
    pub tracks: Vec<TrackState>,
    pub transport: TransportState,
}

/// Mirrored DAW session: bank of tracks plus transport
pub struct Surface {
    dispatcher: Arc<Dispatcher>,
    bank: Bank,
    transport: Transport,
}

impl Surface {
    pub fn new(config: &SurfaceConfig, policy: MirrorPolicy, sender: Arc<dyn OscSender>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let bank = Bank::new(
            config.tracks_count,
            config.default_bank,
            policy,
            Arc::clone(&sender),
            Arc::clone(&dispatcher),
        );
        let transport = Transport::new(policy, sender, Arc::clone(&dispatcher));

        Self {
            dispatcher,
            bank,
            transport,
        }
    }

    /// Register all inbound handlers and announce the surface to the DAW
    pub fn listen(&self) -> Result<()> {
        self.transport.listen();
        self.bank.listen()?;
        info!("✅ Surface listening for events from DAW");
        Ok(())
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Route one message to its handlers
    pub fn handle_message(&self, msg: &OscMessage) -> Result<usize> {
        self.dispatcher.dispatch(msg)
    }

    /// Route a decoded datagram, skipping anything malformed.
    ///
    /// Returns how many handlers ran.
    pub fn handle_packet(&self, packet: &OscPacket) -> usize {
        match packet {
            OscPacket::Message(msg) => match self.handle_message(msg) {
                Ok(fired) => fired,
                Err(e @ SurfaceError::TypeMismatch { .. }) => {
                    warn!("⚠️  Skipping malformed message: {}", e);
                    0
                }
                Err(e) => {
                    warn!(address = %msg.addr, "⚠️  Failed to handle message: {}", e);
                    0
                }
            },
            OscPacket::Bundle(bundle) => {
                debug!(
                    "Ignoring OSC bundle with {} element(s)",
                    bundle.content.len()
                );
                0
            }
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            active_bank: self.bank.active_bank(),
            tracks: self.bank.tracks().iter().map(Track::snapshot).collect(),
            transport: self.transport.snapshot(),
        }
    }

    /// Drop every inbound registration
    pub fn shutdown(&self) {
        self.dispatcher.clear();
        info!("Surface registrations dropped");
    }
}
