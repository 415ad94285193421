//! MOUSE_MOVE and MOUSE_CLICK handlers

use super::HandlerContext;
use crate::hid::{
    HidReport, MouseReport, MOUSE_BUTTON_LEFT, MOUSE_BUTTON_MIDDLE, MOUSE_BUTTON_RIGHT,
};
use hexforge_shared::MouseButton;
use tokio::time::sleep;

fn button_mask(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => MOUSE_BUTTON_LEFT,
        MouseButton::Right => MOUSE_BUTTON_RIGHT,
        MouseButton::Middle => MOUSE_BUTTON_MIDDLE,
    }
}

/// One relative move report, no wheel
pub async fn handle_mouse_move(ctx: &mut HandlerContext<'_>, x: i16, y: i16) {
    ctx.sink.send(HidReport::Mouse(MouseReport::moved(x, y))).await;
}

/// Press, hold, release
pub async fn handle_mouse_click(ctx: &mut HandlerContext<'_>, button: MouseButton) {
    ctx.sink
        .send(HidReport::Mouse(MouseReport::pressed(button_mask(button))))
        .await;
    sleep(ctx.timing.press_hold).await;
    ctx.sink.send(HidReport::Mouse(MouseReport::default())).await;
}
