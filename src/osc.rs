//! OSC-facing core: address templates, typed decoding and dispatch
//!
//! Inbound messages arrive as `rosc::OscMessage`; the dispatcher narrows the
//! first argument to the kind registered for the address before any entity
//! sees it. Outbound messages go through the `OscSender` capability.

pub mod address;
pub mod dispatcher;
pub mod sender;
pub mod value;

pub use address::{expand, DawAddress, ID_PLACEHOLDER};
pub use dispatcher::{Dispatcher, Handler};
pub use sender::{ConsoleSender, MemorySender, OscSender};
pub use value::{bool_to_arg, DecodedValue, ValueKind};
