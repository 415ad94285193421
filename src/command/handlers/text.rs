//! TYPE_TEXT handler

use super::HandlerContext;
use crate::hid::{keymap, HidReport, KeyboardReport};
use tokio::time::sleep;
use tracing::debug;

/// Type `text` one character at a time.
///
/// Each character is a press report followed by a release report, with the
/// settle delay after each. Characters with no US-layout mapping still get
/// their (empty) press/release pair.
pub async fn handle_type_text(ctx: &mut HandlerContext<'_>, text: &str) {
    for c in text.chars() {
        let press = match keymap::char_to_key(c) {
            Some((modifiers, usage)) => KeyboardReport::single(modifiers, usage),
            None => {
                debug!("  [TYPE_TEXT] No key for {:?}", c);
                KeyboardReport::release()
            }
        };

        ctx.sink.send(HidReport::Keyboard(press)).await;
        sleep(ctx.timing.key_settle).await;
        ctx.sink.send(HidReport::Keyboard(KeyboardReport::release())).await;
        sleep(ctx.timing.key_settle).await;
    }
}
