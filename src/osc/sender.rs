//! Outbound capability - hands `(address, value)` pairs to whatever carries them
//!
//! `UdpLink` is the real implementation. `ConsoleSender` logs instead of sending
//! (dry-run mode) and `MemorySender` records everything for assertions.

use parking_lot::Mutex;
use rosc::OscType;
use tracing::info;

use crate::error::Result;

/// Fire-and-forget sender of single-argument OSC messages
pub trait OscSender: Send + Sync {
    /// Sender name used in logs (e.g., "udp", "console")
    fn name(&self) -> &str;

    /// Send one message. No retry, no delivery confirmation.
    fn send(&self, address: &str, value: OscType) -> Result<()>;
}

/// Logs outbound messages instead of sending them
pub struct ConsoleSender {
    name: String,
}

impl ConsoleSender {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl OscSender for ConsoleSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, address: &str, value: OscType) -> Result<()> {
        info!(
            "🎮 [{}] {} → {} {:?}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            address,
            value
        );
        Ok(())
    }
}

/// Records outbound messages in memory
#[derive(Default)]
pub struct MemorySender {
    sent: Mutex<Vec<(String, OscType)>>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first
    pub fn sent(&self) -> Vec<(String, OscType)> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Option<(String, OscType)> {
        self.sent.lock().last().cloned()
    }

    /// Drain the record
    pub fn take(&self) -> Vec<(String, OscType)> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl OscSender for MemorySender {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&self, address: &str, value: OscType) -> Result<()> {
        self.sent.lock().push((address.to_string(), value));
        Ok(())
    }
}
