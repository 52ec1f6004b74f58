//! Error types for the surface core
//!
//! `MissingIdentifier` is a wiring bug and aborts startup. `TypeMismatch` is a
//! protocol anomaly from the remote peer and is logged and skipped at the
//! packet boundary (see `Surface::handle_packet`).

use thiserror::Error;

use crate::osc::ValueKind;

#[derive(Error, Debug)]
pub enum SurfaceError {
    /// An address template with a `:id` placeholder was resolved without an id
    #[error("address template '{template}' requires a track id")]
    MissingIdentifier { template: String },

    /// Inbound value did not match the type registered for its address
    #[error("error in event {address}: expected {expected} but got {actual}")]
    TypeMismatch {
        address: String,
        expected: ValueKind,
        actual: &'static str,
    },

    #[error("no track {id} on this surface (tracks 1..={tracks_count})")]
    UnknownTrack { id: u32, tracks_count: u32 },

    #[error("OSC encode failed: {0}")]
    Encode(String),

    #[error("OSC decode failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
