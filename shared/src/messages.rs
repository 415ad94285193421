//! Wire messages exchanged with the host over the line protocol
//!
//! Inbound lines are either an arm request or a command request. Outbound
//! lines are a per-message [`Reply`] (ack or err) or an [`Event`] such as
//! the periodic device status.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Closed taxonomy of rejections reported back to the host.
///
/// None of these is fatal: the executor always returns to awaiting the
/// next line after emitting one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("invalid_json")]
    InvalidJson,
    #[error("physical_arm_off")]
    PhysicalArmOff,
    #[error("not_armed")]
    NotArmed,
    #[error("rate_limited")]
    RateLimited,
    #[error("mode_not_execute")]
    ModeNotExecute,
    #[error("invalid_message")]
    InvalidMessage,
    #[error("bounds_rejected")]
    BoundsRejected,
}

impl ErrorKind {
    /// The exact string carried in the `message` field of an `err` reply
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::PhysicalArmOff => "physical_arm_off",
            ErrorKind::NotArmed => "not_armed",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ModeNotExecute => "mode_not_execute",
            ErrorKind::InvalidMessage => "invalid_message",
            ErrorKind::BoundsRejected => "bounds_rejected",
        }
    }
}

/// Execution mode advertised in status events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Execute,
    Suggest,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Execute => "EXECUTE",
            Mode::Suggest => "SUGGEST",
        }
    }
}

/// Tags accepted in the `action_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    TypeText,
    KeyCombo,
    MouseMove,
    MouseClick,
}

impl ActionType {
    /// Parse a wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TYPE_TEXT" => Some(ActionType::TypeText),
            "KEY_COMBO" => Some(ActionType::KeyCombo),
            "MOUSE_MOVE" => Some(ActionType::MouseMove),
            "MOUSE_CLICK" => Some(ActionType::MouseClick),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::TypeText => "TYPE_TEXT",
            ActionType::KeyCombo => "KEY_COMBO",
            ActionType::MouseMove => "MOUSE_MOVE",
            ActionType::MouseClick => "MOUSE_CLICK",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mouse buttons a MOUSE_CLICK may name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// An action whose payload already passed its bounds check.
///
/// Only [`crate::bounds::validate`] produces these, so holding one is
/// proof that the payload is within contract limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    TypeText { text: String },
    KeyCombo { keys: Vec<String> },
    MouseMove { x: i16, y: i16 },
    MouseClick { button: MouseButton },
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::TypeText { .. } => ActionType::TypeText,
            Action::KeyCombo { .. } => ActionType::KeyCombo,
            Action::MouseMove { .. } => ActionType::MouseMove,
            Action::MouseClick { .. } => ActionType::MouseClick,
        }
    }
}

/// Command request as received, before any semantic validation.
///
/// Fields stay as raw JSON values; JSON `null` reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommandRequest {
    pub mode: Option<Value>,
    pub action_type: Option<Value>,
    pub payload: Option<Value>,
    pub execution_id: Option<Value>,
}

/// A decoded inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// `{"type":"arm","enabled":<bool>}`
    Arm { enabled: bool },
    /// Any other message carrying a `type` field
    Command(CommandRequest),
}

/// Per-message response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reply {
    Ack { execution_id: String, ok: bool },
    Err { message: ErrorKind },
}

impl Reply {
    /// Acknowledge a dispatched command
    pub fn ack(execution_id: impl Into<String>) -> Self {
        Reply::Ack {
            execution_id: execution_id.into(),
            ok: true,
        }
    }

    pub fn err(kind: ErrorKind) -> Self {
        Reply::Err { message: kind }
    }
}

/// Snapshot of the executor, recomputed every time it is emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub device_id: String,
    pub mode: Mode,
    pub led_state: bool,
    pub kill_switch_state: bool,
    pub ts: u64,
}

/// Unsolicited events
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    DeviceStatus(DeviceStatus),
}

/// Anything written back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Reply(Reply),
    Event(Event),
}

impl From<Reply> for Outbound {
    fn from(reply: Reply) -> Self {
        Outbound::Reply(reply)
    }
}

impl From<Event> for Outbound {
    fn from(event: Event) -> Self {
        Outbound::Event(event)
    }
}

impl From<DeviceStatus> for Outbound {
    fn from(status: DeviceStatus) -> Self {
        Outbound::Event(Event::DeviceStatus(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_shape() {
        let value = serde_json::to_value(Outbound::from(Reply::ack("exec_1"))).unwrap();
        assert_eq!(value, json!({"type": "ack", "execution_id": "exec_1", "ok": true}));
    }

    #[test]
    fn test_err_shape() {
        let value = serde_json::to_value(Outbound::from(Reply::err(ErrorKind::NotArmed))).unwrap();
        assert_eq!(value, json!({"type": "err", "message": "not_armed"}));
    }

    #[test]
    fn test_status_shape() {
        let status = DeviceStatus {
            device_id: "esp32-hid".into(),
            mode: Mode::Execute,
            led_state: true,
            kill_switch_state: true,
            ts: 12,
        };
        let value = serde_json::to_value(Outbound::from(status)).unwrap();
        assert_eq!(
            value,
            json!({
                "event_type": "device_status",
                "device_id": "esp32-hid",
                "mode": "EXECUTE",
                "led_state": true,
                "kill_switch_state": true,
                "ts": 12
            })
        );
    }

    #[test]
    fn test_error_kind_strings_match_serde() {
        let kinds = [
            ErrorKind::InvalidJson,
            ErrorKind::PhysicalArmOff,
            ErrorKind::NotArmed,
            ErrorKind::RateLimited,
            ErrorKind::ModeNotExecute,
            ErrorKind::InvalidMessage,
            ErrorKind::BoundsRejected,
        ];
        for kind in kinds {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_action_type_tags() {
        assert_eq!(ActionType::from_tag("TYPE_TEXT"), Some(ActionType::TypeText));
        assert_eq!(ActionType::from_tag("MOUSE_CLICK"), Some(ActionType::MouseClick));
        assert_eq!(ActionType::from_tag("type_text"), None);
        assert_eq!(ActionType::from_tag("SCROLL"), None);
    }

    #[test]
    fn test_command_request_null_is_absent() {
        let req: CommandRequest =
            serde_json::from_value(json!({"mode": "EXECUTE", "payload": null})).unwrap();
        assert_eq!(req.mode, Some(json!("EXECUTE")));
        assert!(req.payload.is_none());
        assert!(req.execution_id.is_none());
    }
}
