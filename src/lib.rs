//! DAW OSC GW
//!
//! Mirrors a DAW's mixer (a bank of tracks) and transport over OSC, and sends
//! operator commands back. The DAW stays authoritative: local state follows
//! the values it echoes.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod link;
pub mod osc;
pub mod paths;
pub mod surface;

pub use command::{CommandOutput, SurfaceCommand, TrackAction};
pub use config::AppConfig;
pub use error::{Result, SurfaceError};
pub use link::UdpLink;
pub use surface::{MirrorPolicy, Surface, SurfaceSnapshot};
