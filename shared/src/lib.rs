//! HexForge Shared Protocol Types
//!
//! This crate provides the I/O-free core of the HID executor: the line
//! protocol and its codec, the arm/disarm state machine, per-action bounds
//! and the rate limiter.

pub mod bounds;
pub mod codec;
pub mod messages;
pub mod rate_limit;
pub mod state_machine;

// Re-export commonly used types at crate root
pub use messages::{
    Action, ActionType, CommandRequest, DeviceStatus, ErrorKind, Event, Inbound, Mode, MouseButton,
    Outbound, Reply,
};

/// Contract limits for the executor
pub mod limits {
    /// Minimum spacing between two dispatched actions in milliseconds
    pub const MIN_ACTION_DELAY_MS: u64 = 100;

    /// Maximum characters in a TYPE_TEXT payload
    pub const MAX_TEXT_LENGTH: usize = 1024;

    /// Heartbeat (device_status) period in milliseconds
    pub const HEARTBEAT_INTERVAL_MS: u64 = 1000;

    /// Longest inbound line accepted by the decoder, in bytes
    pub const MAX_LINE_LENGTH: usize = 8192;

    /// Minimum and maximum number of names in a KEY_COMBO
    pub const MIN_COMBO_KEYS: usize = 1;
    pub const MAX_COMBO_KEYS: usize = 5;

    /// Inclusive range for MOUSE_MOVE deltas on both axes
    pub const MOUSE_MIN: i64 = -1000;
    pub const MOUSE_MAX: i64 = 5000;

    /// Maximum primary keys held in one keyboard report
    pub const MAX_REPORT_KEYS: usize = 6;
}

#[cfg(test)]
mod tests {
    use super::limits;

    #[test]
    fn test_contract_constants() {
        assert_eq!(limits::MIN_ACTION_DELAY_MS, 100);
        assert_eq!(limits::MAX_TEXT_LENGTH, 1024);
        assert_eq!(limits::HEARTBEAT_INTERVAL_MS, 1000);
        assert!(limits::MAX_LINE_LENGTH > limits::MAX_TEXT_LENGTH);
    }
}
