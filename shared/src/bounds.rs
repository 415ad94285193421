//! Per-action bounds enforcement
//!
//! Fail-closed: an unknown action type, a missing field, a field of the
//! wrong JSON type or an out-of-range value all reject. The limits are hard
//! contract limits from [`crate::limits`].

use serde_json::Value;

use crate::limits::{MAX_COMBO_KEYS, MAX_TEXT_LENGTH, MIN_COMBO_KEYS, MOUSE_MAX, MOUSE_MIN};
use crate::messages::{Action, ActionType, MouseButton};

/// Returns true when `payload` satisfies the bounds of `action_type`
pub fn check(action_type: &str, payload: &Value) -> bool {
    validate(action_type, payload).is_some()
}

/// Validate a payload and convert it into a typed [`Action`]
pub fn validate(action_type: &str, payload: &Value) -> Option<Action> {
    match ActionType::from_tag(action_type)? {
        ActionType::TypeText => validate_text(payload),
        ActionType::KeyCombo => validate_combo(payload),
        ActionType::MouseMove => validate_move(payload),
        ActionType::MouseClick => validate_click(payload),
    }
}

fn validate_text(payload: &Value) -> Option<Action> {
    let text = payload.get("text")?.as_str()?;
    if text.chars().count() > MAX_TEXT_LENGTH {
        return None;
    }
    Some(Action::TypeText { text: text.to_owned() })
}

fn validate_combo(payload: &Value) -> Option<Action> {
    let keys = payload.get("keys")?.as_array()?;
    if !(MIN_COMBO_KEYS..=MAX_COMBO_KEYS).contains(&keys.len()) {
        return None;
    }
    let keys = keys
        .iter()
        .map(|k| k.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()?;
    Some(Action::KeyCombo { keys })
}

fn validate_move(payload: &Value) -> Option<Action> {
    let x = axis(payload.get("x")?)?;
    let y = axis(payload.get("y")?)?;
    Some(Action::MouseMove { x, y })
}

/// Integer in the mouse range. Floats and out-of-range values reject.
fn axis(value: &Value) -> Option<i16> {
    let v = value.as_i64()?;
    if !(MOUSE_MIN..=MOUSE_MAX).contains(&v) {
        return None;
    }
    i16::try_from(v).ok()
}

fn validate_click(payload: &Value) -> Option<Action> {
    let button = MouseButton::from_name(payload.get("button")?.as_str()?)?;
    Some(Action::MouseClick { button })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_length_boundary() {
        let at_limit = "a".repeat(MAX_TEXT_LENGTH);
        let over = "a".repeat(MAX_TEXT_LENGTH + 1);
        assert!(check("TYPE_TEXT", &json!({ "text": at_limit })));
        assert!(!check("TYPE_TEXT", &json!({ "text": over })));
        assert!(check("TYPE_TEXT", &json!({ "text": "" })));
    }

    #[test]
    fn test_text_length_counts_characters() {
        let wide = "é".repeat(MAX_TEXT_LENGTH);
        assert!(check("TYPE_TEXT", &json!({ "text": wide })));
    }

    #[test]
    fn test_text_shape() {
        assert!(!check("TYPE_TEXT", &json!({})));
        assert!(!check("TYPE_TEXT", &json!({ "text": 5 })));
        assert!(!check("TYPE_TEXT", &json!({ "text": null })));
        assert!(!check("TYPE_TEXT", &json!("hello")));
    }

    #[test]
    fn test_combo_count_boundary() {
        assert!(!check("KEY_COMBO", &json!({ "keys": [] })));
        assert!(check("KEY_COMBO", &json!({ "keys": ["ENTER"] })));
        assert!(check("KEY_COMBO", &json!({ "keys": ["CTRL", "ALT", "SHIFT", "UP", "DOWN"] })));
        assert!(!check(
            "KEY_COMBO",
            &json!({ "keys": ["CTRL", "ALT", "SHIFT", "UP", "DOWN", "LEFT"] })
        ));
    }

    #[test]
    fn test_combo_shape() {
        assert!(!check("KEY_COMBO", &json!({ "keys": "CTRL" })));
        assert!(!check("KEY_COMBO", &json!({ "keys": ["CTRL", 7] })));
        assert!(!check("KEY_COMBO", &json!({})));
        // Unrecognised names are a dispatch concern, not a bounds failure
        assert!(check("KEY_COMBO", &json!({ "keys": ["NOPE"] })));
    }

    #[test]
    fn test_move_range_boundary() {
        assert!(check("MOUSE_MOVE", &json!({ "x": -1000, "y": 5000 })));
        assert!(check("MOUSE_MOVE", &json!({ "x": 5000, "y": -1000 })));
        assert!(!check("MOUSE_MOVE", &json!({ "x": -1001, "y": 0 })));
        assert!(!check("MOUSE_MOVE", &json!({ "x": 0, "y": 5001 })));
        assert!(!check("MOUSE_MOVE", &json!({ "x": i64::MAX, "y": 0 })));
    }

    #[test]
    fn test_move_shape() {
        assert!(!check("MOUSE_MOVE", &json!({ "x": 1 })));
        assert!(!check("MOUSE_MOVE", &json!({ "x": 1.5, "y": 0 })));
        assert!(!check("MOUSE_MOVE", &json!({ "x": "1", "y": 0 })));
        assert_eq!(
            validate("MOUSE_MOVE", &json!({ "x": -3, "y": 40 })),
            Some(Action::MouseMove { x: -3, y: 40 })
        );
    }

    #[test]
    fn test_click_buttons() {
        for button in ["left", "right", "middle"] {
            assert!(check("MOUSE_CLICK", &json!({ "button": button })));
        }
        assert!(!check("MOUSE_CLICK", &json!({ "button": "LEFT" })));
        assert!(!check("MOUSE_CLICK", &json!({ "button": "back" })));
        assert!(!check("MOUSE_CLICK", &json!({})));
    }

    #[test]
    fn test_unknown_type_rejected_regardless_of_payload() {
        assert!(!check("SCROLL", &json!({ "text": "hi" })));
        assert!(!check("", &json!({})));
        assert!(!check("type_text", &json!({ "text": "hi" })));
    }
}
