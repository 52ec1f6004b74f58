//! Track - one mixer channel's mirrored state
//!
//! Inbound handlers overwrite a single field each, with no clamping: values
//! outside the nominal [0, 1] domain are stored as received. Outbound commands
//! resolve the address for this track and send; whether they also touch the
//! mirror depends on the `MirrorPolicy`.

use parking_lot::RwLock;
use rosc::OscType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace};

use super::{send_signal, MirrorPolicy};
use crate::error::Result;
use crate::osc::{bool_to_arg, DawAddress, Dispatcher, OscSender};

/// Fader floor (-inf dB)
pub const MIN_VOLUME: f64 = 0.0025138729251921177;
/// Fader ceiling (+6 dB)
pub const MAX_VOLUME: f64 = 1.0;
/// Exact fader position the DAW reports for 0 dB
pub const UNITY_VOLUME: f64 = 0.7160000205039978;
pub const DEFAULT_VOLUME: f64 = 0.71;

pub const PAN_LEFT: f64 = 0.0;
pub const PAN_CENTER: f64 = 0.5;
pub const PAN_RIGHT: f64 = 1.0;

/// Input monitoring mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Monitor {
    #[default]
    Off,
    On,
    Auto,
}

impl Monitor {
    /// 1 → On, 2 → Auto, anything else → Off
    pub fn from_value(value: f64) -> Self {
        if value == 1.0 {
            Monitor::On
        } else if value == 2.0 {
            Monitor::Auto
        } else {
            Monitor::Off
        }
    }

    pub fn as_value(&self) -> i32 {
        match self {
            Monitor::Off => 0,
            Monitor::On => 1,
            Monitor::Auto => 2,
        }
    }
}

impl std::str::FromStr for Monitor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(Monitor::Off),
            "on" | "1" => Ok(Monitor::On),
            "auto" | "2" => Ok(Monitor::Auto),
            other => Err(format!("unknown monitor mode '{}'", other)),
        }
    }
}

/// Mirrored attributes of a track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackState {
    pub id: u32,
    pub name: String,
    pub volume: f64,
    pub pan: f64,
    pub vu_meter: f64,
    pub muted: bool,
    pub soloed: bool,
    pub rec_armed: bool,
    pub monitor: Monitor,
}

impl TrackState {
    fn new(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            volume: DEFAULT_VOLUME,
            pan: PAN_CENTER,
            vu_meter: 0.0,
            muted: false,
            soloed: false,
            rec_armed: false,
            monitor: Monitor::Off,
        }
    }
}

pub struct Track {
    id: u32,
    policy: MirrorPolicy,
    sender: Arc<dyn OscSender>,
    dispatcher: Arc<Dispatcher>,
    state: Arc<RwLock<TrackState>>,
}

impl Track {
    pub fn new(
        id: u32,
        policy: MirrorPolicy,
        sender: Arc<dyn OscSender>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        trace!("Track {} created", id);
        Self {
            id,
            policy,
            sender,
            dispatcher,
            state: Arc::new(RwLock::new(TrackState::new(id))),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Register every inbound handler for this track.
    ///
    /// Calling this twice registers everything twice.
    pub fn listen(&self) -> Result<()> {
        let id = self.id;
        let addr = |a: DawAddress| a.resolve(Some(id));

        let state = Arc::clone(&self.state);
        self.dispatcher.on_number(addr(DawAddress::TrackVolume)?, move |v| {
            debug!(track = id, "Volume: {}", v);
            if v <= MIN_VOLUME {
                debug!(track = id, "Volume at min");
            } else if v == MAX_VOLUME {
                debug!(track = id, "Volume at max");
            } else if v == UNITY_VOLUME {
                debug!(track = id, "Volume back to unity");
            }
            state.write().volume = v;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_number(addr(DawAddress::TrackPan)?, move |v| {
            debug!(track = id, "Pan: {}", v);
            state.write().pan = v;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_number(addr(DawAddress::TrackVuMeter)?, move |v| {
            trace!(track = id, "VU: {}", v);
            state.write().vu_meter = v;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_text(addr(DawAddress::TrackName)?, move |name| {
            debug!(track = id, "Name: {}", name);
            state.write().name = name;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_bool(addr(DawAddress::TrackMute)?, move |b| {
            debug!(track = id, "Muted: {}", b);
            state.write().muted = b;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_bool(addr(DawAddress::TrackSolo)?, move |b| {
            debug!(track = id, "Soloed: {}", b);
            state.write().soloed = b;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_bool(addr(DawAddress::TrackRecArm)?, move |b| {
            debug!(track = id, "Rec armed: {}", b);
            state.write().rec_armed = b;
        });

        let state = Arc::clone(&self.state);
        self.dispatcher.on_number(addr(DawAddress::TrackMonitor)?, move |v| {
            let monitor = Monitor::from_value(v);
            debug!(track = id, "Monitor: {:?}", monitor);
            state.write().monitor = monitor;
        });

        info!("✅ Track {} listening for events from DAW", id);
        Ok(())
    }

    // Outbound commands

    pub fn set_volume(&self, level: f64) -> Result<()> {
        self.send(DawAddress::TrackVolume, OscType::Float(level as f32))?;
        self.mirror(|s| s.volume = level);
        Ok(())
    }

    pub fn set_pan(&self, pan: f64) -> Result<()> {
        self.send(DawAddress::TrackPan, OscType::Float(pan as f32))?;
        self.mirror(|s| s.pan = pan);
        Ok(())
    }

    pub fn set_mute(&self, muted: bool) -> Result<()> {
        self.send(DawAddress::TrackMute, bool_to_arg(muted))?;
        self.mirror(|s| s.muted = muted);
        Ok(())
    }

    pub fn set_solo(&self, soloed: bool) -> Result<()> {
        self.send(DawAddress::TrackSolo, bool_to_arg(soloed))?;
        self.mirror(|s| s.soloed = soloed);
        Ok(())
    }

    pub fn set_rec_arm(&self, armed: bool) -> Result<()> {
        self.send(DawAddress::TrackRecArm, bool_to_arg(armed))?;
        self.mirror(|s| s.rec_armed = armed);
        Ok(())
    }

    pub fn set_monitor(&self, monitor: Monitor) -> Result<()> {
        self.send(DawAddress::TrackMonitor, OscType::Int(monitor.as_value()))?;
        self.mirror(|s| s.monitor = monitor);
        Ok(())
    }

    fn send(&self, address: DawAddress, value: OscType) -> Result<()> {
        send_signal(self.sender.as_ref(), address, Some(self.id), value)
    }

    fn mirror(&self, apply: impl FnOnce(&mut TrackState)) {
        if self.policy == MirrorPolicy::Optimistic {
            apply(&mut *self.state.write());
        }
    }

    // Mirrored state accessors

    pub fn volume(&self) -> f64 {
        self.state.read().volume
    }

    pub fn pan(&self) -> f64 {
        self.state.read().pan
    }

    pub fn vu_meter(&self) -> f64 {
        self.state.read().vu_meter
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.state.read().muted
    }

    pub fn is_soloed(&self) -> bool {
        self.state.read().soloed
    }

    pub fn is_rec_armed(&self) -> bool {
        self.state.read().rec_armed
    }

    pub fn monitor(&self) -> Monitor {
        self.state.read().monitor
    }

    pub fn snapshot(&self) -> TrackState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osc::MemorySender;
    use rosc::OscMessage;

    fn make_track(id: u32, policy: MirrorPolicy) -> (Track, Arc<MemorySender>, Arc<Dispatcher>) {
        let sender = Arc::new(MemorySender::new());
        let dispatcher = Arc::new(Dispatcher::new());
        let track = Track::new(id, policy, sender.clone(), Arc::clone(&dispatcher));
        (track, sender, dispatcher)
    }

    fn inbound(dispatcher: &Dispatcher, addr: &str, arg: OscType) {
        dispatcher
            .dispatch(&OscMessage {
                addr: addr.to_string(),
                args: vec![arg],
            })
            .unwrap();
    }

    #[test]
    fn test_defaults() {
        let (track, _, _) = make_track(1, MirrorPolicy::Confirmed);
        assert_eq!(track.volume(), DEFAULT_VOLUME);
        assert_eq!(track.pan(), PAN_CENTER);
        assert_eq!(track.vu_meter(), 0.0);
        assert_eq!(track.name(), "");
        assert!(!track.is_muted() && !track.is_soloed() && !track.is_rec_armed());
        assert_eq!(track.monitor(), Monitor::Off);
    }

    #[test]
    fn test_monitor_decode() {
        assert_eq!(Monitor::from_value(0.0), Monitor::Off);
        assert_eq!(Monitor::from_value(1.0), Monitor::On);
        assert_eq!(Monitor::from_value(2.0), Monitor::Auto);
        assert_eq!(Monitor::from_value(99.0), Monitor::Off);
        assert_eq!("AUTO".parse::<Monitor>(), Ok(Monitor::Auto));
        assert!("loud".parse::<Monitor>().is_err());
    }

    #[test]
    fn test_inbound_updates_fields() {
        let (track, _, dispatcher) = make_track(3, MirrorPolicy::Confirmed);
        track.listen().unwrap();

        inbound(&dispatcher, "/track/3/pan", OscType::Float(0.0));
        inbound(&dispatcher, "/track/3/vu", OscType::Float(0.25));
        inbound(&dispatcher, "/track/3/name", OscType::String("Kick".into()));
        inbound(&dispatcher, "/track/3/solo", OscType::Int(1));
        inbound(&dispatcher, "/track/3/recarm", OscType::Int(1));
        inbound(&dispatcher, "/track/3/monitor", OscType::Int(2));

        let state = track.snapshot();
        assert_eq!(state.pan, PAN_LEFT);
        assert_eq!(state.vu_meter, 0.25);
        assert_eq!(state.name, "Kick");
        assert!(state.soloed);
        assert!(state.rec_armed);
        assert_eq!(state.monitor, Monitor::Auto);
    }

    #[test]
    fn test_out_of_range_values_are_stored() {
        let (track, _, dispatcher) = make_track(1, MirrorPolicy::Confirmed);
        track.listen().unwrap();

        inbound(&dispatcher, "/track/1/volume", OscType::Double(1.5));
        inbound(&dispatcher, "/track/1/pan", OscType::Double(-0.25));

        assert_eq!(track.volume(), 1.5);
        assert_eq!(track.pan(), -0.25);
    }

    #[test]
    fn test_commands_send_without_mutating() {
        let (track, sender, _) = make_track(2, MirrorPolicy::Confirmed);

        track.set_volume(0.5).unwrap();
        track.set_pan(1.0).unwrap();
        track.set_mute(true).unwrap();
        track.set_solo(false).unwrap();
        track.set_rec_arm(true).unwrap();
        track.set_monitor(Monitor::Auto).unwrap();

        assert_eq!(
            sender.sent(),
            vec![
                ("/track/2/volume".to_string(), OscType::Float(0.5)),
                ("/track/2/pan".to_string(), OscType::Float(1.0)),
                ("/track/2/mute".to_string(), OscType::Int(1)),
                ("/track/2/solo".to_string(), OscType::Int(0)),
                ("/track/2/recarm".to_string(), OscType::Int(1)),
                ("/track/2/monitor".to_string(), OscType::Int(2)),
            ]
        );

        assert_eq!(track.snapshot(), TrackState::new(2));
    }

    #[test]
    fn test_optimistic_commands_mutate() {
        let (track, _, _) = make_track(1, MirrorPolicy::Optimistic);

        track.set_volume(0.25).unwrap();
        track.set_mute(true).unwrap();
        track.set_monitor(Monitor::On).unwrap();

        assert_eq!(track.volume(), 0.25);
        assert!(track.is_muted());
        assert_eq!(track.monitor(), Monitor::On);
    }

    #[test]
    fn test_zero_id_cannot_listen_or_send() {
        let (track, sender, _) = make_track(0, MirrorPolicy::Confirmed);
        assert!(track.listen().is_err());
        assert!(track.set_volume(0.5).is_err());
        assert!(sender.sent().is_empty());
    }
}
