//! Transport - playback, record, metronome and repeat latches
//!
//! Six independent flags, each set only from its own address. Nothing keeps
//! playing/paused/stopped mutually exclusive; the DAW reports each one.

use parking_lot::RwLock;
use rosc::OscType;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::{send_signal, MirrorPolicy};
use crate::error::Result;
use crate::osc::{bool_to_arg, DawAddress, Dispatcher, OscSender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportState {
    pub recording: bool,
    pub playing: bool,
    pub paused: bool,
    pub stopped: bool,
    pub metronome: bool,
    pub repeat: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            recording: false,
            playing: false,
            paused: false,
            stopped: true,
            metronome: false,
            repeat: false,
        }
    }
}

pub struct Transport {
    policy: MirrorPolicy,
    sender: Arc<dyn OscSender>,
    dispatcher: Arc<Dispatcher>,
    state: Arc<RwLock<TransportState>>,
}

impl Transport {
    pub fn new(policy: MirrorPolicy, sender: Arc<dyn OscSender>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            policy,
            sender,
            dispatcher,
            state: Arc::new(RwLock::new(TransportState::default())),
        }
    }

    /// Register one boolean handler per flag
    pub fn listen(&self) {
        self.latch(DawAddress::Record, "⏺️  Transport recording", |s, v| s.recording = v);
        self.latch(DawAddress::Play, "▶️  Transport playing", |s, v| s.playing = v);
        self.latch(DawAddress::Stop, "⏹️  Transport stopped", |s, v| s.stopped = v);
        self.latch(DawAddress::Pause, "⏸️  Transport paused", |s, v| s.paused = v);
        self.latch(DawAddress::Metronome, "🎵 Metronome", |s, v| s.metronome = v);
        self.latch(DawAddress::Repeat, "🔁 Repeat", |s, v| s.repeat = v);

        info!("✅ Transport listening for events from DAW");
    }

    fn latch(
        &self,
        address: DawAddress,
        label: &'static str,
        apply: fn(&mut TransportState, bool),
    ) {
        let state = Arc::clone(&self.state);
        // Transport addresses carry no placeholder
        self.dispatcher.on_bool(address.pattern(), move |value| {
            info!("{} {}", label, value);
            apply(&mut *state.write(), value);
        });
    }

    // Pulse commands always carry 1

    pub fn set_daw_playing(&self) -> Result<()> {
        self.pulse(DawAddress::Play, |s| s.playing = true)
    }

    pub fn set_daw_stopped(&self) -> Result<()> {
        self.pulse(DawAddress::Stop, |s| s.stopped = true)
    }

    pub fn set_daw_recording(&self) -> Result<()> {
        self.pulse(DawAddress::Record, |s| s.recording = true)
    }

    pub fn set_daw_paused(&self) -> Result<()> {
        self.pulse(DawAddress::Pause, |s| s.paused = true)
    }

    pub fn set_daw_metronome(&self, on: bool) -> Result<()> {
        send_signal(self.sender.as_ref(), DawAddress::Metronome, None, bool_to_arg(on))?;
        self.mirror(|s| s.metronome = on);
        Ok(())
    }

    pub fn set_daw_repeat(&self, on: bool) -> Result<()> {
        send_signal(self.sender.as_ref(), DawAddress::Repeat, None, bool_to_arg(on))?;
        self.mirror(|s| s.repeat = on);
        Ok(())
    }

    fn pulse(&self, address: DawAddress, apply: impl FnOnce(&mut TransportState)) -> Result<()> {
        send_signal(self.sender.as_ref(), address, None, OscType::Int(1))?;
        self.mirror(apply);
        Ok(())
    }

    fn mirror(&self, apply: impl FnOnce(&mut TransportState)) {
        if self.policy == MirrorPolicy::Optimistic {
            apply(&mut *self.state.write());
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state.read().recording
    }

    pub fn is_playing(&self) -> bool {
        self.state.read().playing
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state.read().stopped
    }

    pub fn is_metronome_on(&self) -> bool {
        self.state.read().metronome
    }

    pub fn is_repeat_on(&self) -> bool {
        self.state.read().repeat
    }

    pub fn snapshot(&self) -> TransportState {
        self.state.read().clone()
    }
}
