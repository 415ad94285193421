//! KEY_COMBO handler

use super::HandlerContext;
use crate::hid::{keymap, HidReport, KeyboardReport};
use hexforge_shared::limits::MAX_REPORT_KEYS;
use tokio::time::sleep;
use tracing::debug;

/// Fold key names into one report.
///
/// Modifier names OR into the modifier mask; primary key names fill the key
/// slots in order, extras past the sixth are dropped. Names that are
/// neither are ignored.
pub fn build_combo_report(keys: &[String]) -> KeyboardReport {
    let mut report = KeyboardReport::default();
    let mut slot = 0;

    for name in keys {
        if let Some(modifier) = keymap::modifier_from_name(name) {
            report.modifiers |= modifier;
            continue;
        }
        match keymap::keycode_from_name(name) {
            Some(code) if slot < MAX_REPORT_KEYS => {
                report.keys[slot] = code;
                slot += 1;
            }
            Some(_) => debug!("  [KEY_COMBO] Dropping {}: report full", name),
            None => debug!("  [KEY_COMBO] Ignoring unknown key {}", name),
        }
    }

    report
}

/// Press the whole combo, hold, release
pub async fn handle_key_combo(ctx: &mut HandlerContext<'_>, keys: &[String]) {
    let report = build_combo_report(keys);
    ctx.sink.send(HidReport::Keyboard(report)).await;
    sleep(ctx.timing.press_hold).await;
    ctx.sink.send(HidReport::Keyboard(KeyboardReport::release())).await;
}
