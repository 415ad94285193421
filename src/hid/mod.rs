//! HID output
//!
//! This module handles:
//! - Keyboard and mouse report layouts
//! - The [`HidSink`] capability the dispatcher writes reports into
//! - Key name and US-layout character translation

mod gadget;
pub mod keymap;

pub use gadget::GadgetSink;

use async_trait::async_trait;
use hexforge_shared::limits::MAX_REPORT_KEYS;
use tracing::debug;

pub const MODIFIER_LEFT_CTRL: u8 = 0x01;
pub const MODIFIER_LEFT_SHIFT: u8 = 0x02;
pub const MODIFIER_LEFT_ALT: u8 = 0x04;
pub const MODIFIER_LEFT_GUI: u8 = 0x08;

pub const MOUSE_BUTTON_LEFT: u8 = 0x01;
pub const MOUSE_BUTTON_RIGHT: u8 = 0x02;
pub const MOUSE_BUTTON_MIDDLE: u8 = 0x04;

/// Boot-protocol style keyboard report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; MAX_REPORT_KEYS],
}

impl KeyboardReport {
    /// A report with a single key held
    pub fn single(modifiers: u8, usage: u8) -> Self {
        let mut keys = [0u8; MAX_REPORT_KEYS];
        keys[0] = usage;
        Self { modifiers, keys }
    }

    /// The all-keys-up report
    pub fn release() -> Self {
        Self::default()
    }

    /// Primary keys currently held
    pub fn pressed_keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.keys.iter().copied().filter(|&k| k != 0)
    }

    /// `[modifiers, reserved, k0..k5]`
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0] = self.modifiers;
        out[2..].copy_from_slice(&self.keys);
        out
    }
}

/// Relative mouse report with 16-bit axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i16,
    pub y: i16,
    pub wheel: i8,
}

impl MouseReport {
    pub fn moved(x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn pressed(buttons: u8) -> Self {
        Self {
            buttons,
            ..Self::default()
        }
    }

    /// `[buttons, x_lo, x_hi, y_lo, y_hi, wheel]`
    pub fn to_bytes(&self) -> [u8; 6] {
        let x = self.x.to_le_bytes();
        let y = self.y.to_le_bytes();
        [self.buttons, x[0], x[1], y[0], y[1], self.wheel as u8]
    }
}

/// A single output event sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
}

/// Report transmission primitive.
///
/// Sending never reports failure to the caller; implementations log their
/// own write errors.
#[async_trait]
pub trait HidSink: Send {
    async fn send(&mut self, report: HidReport);

    /// Human-readable name for this sink
    fn name(&self) -> &'static str;
}

/// Sink that only logs reports, for running without a USB gadget
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl HidSink for LogSink {
    async fn send(&mut self, report: HidReport) {
        debug!("[HID] {:?}", report);
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every report; clones share the same log
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        reports: Arc<Mutex<Vec<HidReport>>>,
    }

    impl RecordingSink {
        pub fn reports(&self) -> Vec<HidReport> {
            self.reports.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.reports.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl HidSink for RecordingSink {
        async fn send(&mut self, report: HidReport) {
            self.reports.lock().unwrap().push(report);
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_report_bytes() {
        let report = KeyboardReport::single(MODIFIER_LEFT_SHIFT, 0x04);
        assert_eq!(report.to_bytes(), [0x02, 0, 0x04, 0, 0, 0, 0, 0]);
        assert_eq!(KeyboardReport::release().to_bytes(), [0u8; 8]);
        assert_eq!(report.pressed_keys().collect::<Vec<_>>(), vec![0x04]);
    }

    #[test]
    fn test_mouse_report_bytes() {
        let report = MouseReport::moved(-1000, 5000);
        assert_eq!(report.to_bytes(), [0, 0x18, 0xfc, 0x88, 0x13, 0]);

        let click = MouseReport::pressed(MOUSE_BUTTON_MIDDLE);
        assert_eq!(click.to_bytes(), [0x04, 0, 0, 0, 0, 0]);
    }
}
