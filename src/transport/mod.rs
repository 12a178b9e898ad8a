//! Transport layer: inbound command parsing, console I/O and dispatch.

pub mod commands;
pub mod console;
pub mod dispatch;

/// Returns the transport module name for smoke checks.
pub fn module_name() -> &'static str {
    "transport"
}
