//! Channel layer: socket addressing, wire format and the reconnecting socket.

pub mod address;
pub mod reconnecting;
pub mod wire;

/// Returns the channel module name for smoke checks.
pub fn module_name() -> &'static str {
    "channel"
}
