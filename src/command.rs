//! Operator commands
//!
//! One grammar for both the one-shot command line and the interactive shell:
//!
//! ```text
//! record | play | pause | stop
//! metronome on|off          repeat on|off
//! bank next|prev|<n>        count
//! track <id> volume|pan <0..1>
//! track <id> mute|solo|recarm on|off
//! track <id> monitor off|on|auto
//! status
//! ```

use std::str::FromStr;

use crate::error::{Result, SurfaceError};
use crate::surface::{Monitor, Surface, SurfaceSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Record,
    Play,
    Pause,
    Stop,
    Metronome(bool),
    Repeat(bool),
    BankNext,
    BankPrev,
    BankSelect(i32),
    TrackCount,
    Track { id: u32, action: TrackAction },
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackAction {
    Volume(f64),
    Pan(f64),
    Mute(bool),
    Solo(bool),
    RecArm(bool),
    Monitor(Monitor),
}

/// What a command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Sent,
    Snapshot(SurfaceSnapshot),
}

impl SurfaceCommand {
    pub fn execute(&self, surface: &Surface) -> Result<CommandOutput> {
        let transport = surface.transport();
        let bank = surface.bank();

        match self {
            SurfaceCommand::Record => transport.set_daw_recording()?,
            SurfaceCommand::Play => transport.set_daw_playing()?,
            SurfaceCommand::Pause => transport.set_daw_paused()?,
            SurfaceCommand::Stop => transport.set_daw_stopped()?,
            SurfaceCommand::Metronome(on) => transport.set_daw_metronome(*on)?,
            SurfaceCommand::Repeat(on) => transport.set_daw_repeat(*on)?,
            SurfaceCommand::BankNext => bank.next()?,
            SurfaceCommand::BankPrev => bank.prev()?,
            SurfaceCommand::BankSelect(n) => bank.select(*n)?,
            SurfaceCommand::TrackCount => bank.send_track_count()?,
            SurfaceCommand::Track { id, action } => {
                let track = bank.track(*id).ok_or(SurfaceError::UnknownTrack {
                    id: *id,
                    tracks_count: bank.tracks_count(),
                })?;
                match action {
                    TrackAction::Volume(v) => track.set_volume(*v)?,
                    TrackAction::Pan(v) => track.set_pan(*v)?,
                    TrackAction::Mute(b) => track.set_mute(*b)?,
                    TrackAction::Solo(b) => track.set_solo(*b)?,
                    TrackAction::RecArm(b) => track.set_rec_arm(*b)?,
                    TrackAction::Monitor(m) => track.set_monitor(*m)?,
                }
            }
            SurfaceCommand::Status => return Ok(CommandOutput::Snapshot(surface.snapshot())),
        }

        Ok(CommandOutput::Sent)
    }
}

/// Parse an on/off style argument
pub fn parse_switch(s: &str) -> std::result::Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{}'", other)),
    }
}

fn parse_number<T: FromStr>(s: &str, what: &str) -> std::result::Result<T, String> {
    s.parse()
        .map_err(|_| format!("invalid {} '{}'", what, s))
}

impl TrackAction {
    /// Parse `<attribute> <value>`
    pub fn parse(words: &[&str]) -> std::result::Result<Self, String> {
        let (attr, value) = match words {
            [attr, value] => (attr.to_ascii_lowercase(), *value),
            _ => return Err("usage: track <id> <attribute> <value>".to_string()),
        };

        match attr.as_str() {
            "volume" => Ok(TrackAction::Volume(parse_number(value, "volume")?)),
            "pan" => Ok(TrackAction::Pan(parse_number(value, "pan")?)),
            "mute" => Ok(TrackAction::Mute(parse_switch(value)?)),
            "solo" => Ok(TrackAction::Solo(parse_switch(value)?)),
            "recarm" => Ok(TrackAction::RecArm(parse_switch(value)?)),
            "monitor" => Ok(TrackAction::Monitor(value.parse()?)),
            other => Err(format!("unknown track attribute '{}'", other)),
        }
    }
}

impl FromStr for SurfaceCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((head, rest)) = words.split_first() else {
            return Err("empty command".to_string());
        };

        match (head.to_ascii_lowercase().as_str(), rest) {
            ("record", []) => Ok(SurfaceCommand::Record),
            ("play", []) => Ok(SurfaceCommand::Play),
            ("pause", []) => Ok(SurfaceCommand::Pause),
            ("stop", []) => Ok(SurfaceCommand::Stop),
            ("metronome" | "click", [v]) => Ok(SurfaceCommand::Metronome(parse_switch(v)?)),
            ("repeat", [v]) => Ok(SurfaceCommand::Repeat(parse_switch(v)?)),
            ("bank", [arg]) => match arg.to_ascii_lowercase().as_str() {
                "next" | "+" => Ok(SurfaceCommand::BankNext),
                "prev" | "-" => Ok(SurfaceCommand::BankPrev),
                n => Ok(SurfaceCommand::BankSelect(parse_number(n, "bank")?)),
            },
            ("count", []) => Ok(SurfaceCommand::TrackCount),
            ("status", []) => Ok(SurfaceCommand::Status),
            ("track", [id, action @ ..]) => Ok(SurfaceCommand::Track {
                id: parse_number(id, "track id")?,
                action: TrackAction::parse(action)?,
            }),
            (other, _) => Err(format!("unknown or malformed command '{}'", other)),
        }
    }
}
