//! Action handlers, one per action type
//!
//! Every handler runs to completion once started. Report delivery is
//! assumed; sink failures never reach the handler.

mod combo;
mod mouse;
mod text;

pub use combo::{build_combo_report, handle_key_combo};
pub use mouse::{handle_mouse_click, handle_mouse_move};
pub use text::handle_type_text;

use crate::hid::HidSink;
use hexforge_shared::Action;
use std::time::Duration;

/// Fixed delays between reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTiming {
    /// Between press and release, and between characters, while typing
    pub key_settle: Duration,
    /// How long a combo or mouse button is held
    pub press_hold: Duration,
}

impl Default for DispatchTiming {
    fn default() -> Self {
        Self {
            key_settle: Duration::from_millis(5),
            press_hold: Duration::from_millis(10),
        }
    }
}

/// Context passed to action handlers
pub struct HandlerContext<'a> {
    pub sink: &'a mut dyn HidSink,
    pub timing: DispatchTiming,
}

/// Run the report sequence for `action`
pub async fn dispatch(ctx: &mut HandlerContext<'_>, action: &Action) {
    match action {
        Action::TypeText { text } => handle_type_text(ctx, text).await,
        Action::KeyCombo { keys } => handle_key_combo(ctx, keys).await,
        Action::MouseMove { x, y } => handle_mouse_move(ctx, *x, *y).await,
        Action::MouseClick { button } => handle_mouse_click(ctx, *button).await,
    }
}
