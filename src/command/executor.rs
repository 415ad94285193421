//! Command executor - sequences safety checks and dispatches actions

use super::handlers::{self, DispatchTiming, HandlerContext};
use crate::config::ExecutorConfig;
use crate::hid::HidSink;
use crate::safety::Interlock;
use hexforge_shared::{
    bounds,
    codec::{self, Line},
    rate_limit::RateLimiter,
    state_machine::{ArmState, SafetyEvent, SafetyGate, TransitionResult},
    Action, CommandRequest, DeviceStatus, ErrorKind, Inbound, Outbound, Reply,
};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Owns all executor state and processes one message at a time.
///
/// Per command the checks run in a fixed order and stop at the first
/// failure: arm state, rate limit, mode, required fields, bounds. Only then
/// is the action dispatched and acknowledged.
pub struct CommandExecutor {
    device_id: String,
    gate: SafetyGate,
    rate_limiter: RateLimiter,
    interlock: Box<dyn Interlock>,
    sink: Box<dyn HidSink>,
    timing: DispatchTiming,
    started_at: Instant,
}

impl CommandExecutor {
    /// Create a new command executor in the Disarmed state
    pub fn new(
        config: &ExecutorConfig,
        interlock: Box<dyn Interlock>,
        sink: Box<dyn HidSink>,
    ) -> Self {
        Self {
            device_id: config.device_id.clone(),
            gate: SafetyGate::new(),
            rate_limiter: RateLimiter::new(config.min_action_delay.as_millis() as u64),
            interlock,
            sink,
            timing: DispatchTiming::default(),
            started_at: Instant::now(),
        }
    }

    /// Get the current arm state
    pub fn arm_state(&self) -> ArmState {
        self.gate.state()
    }

    /// Handle one framed line and produce its single response
    pub async fn handle_line(&mut self, line: &Line) -> Outbound {
        match line {
            Line::Complete(bytes) => match codec::decode_bytes(bytes) {
                Ok(message) => self.handle_message(message).await,
                Err(e) => {
                    warn!("Rejecting line: {}", e);
                    Reply::err(e.kind()).into()
                }
            },
            Line::Oversized(len) => {
                warn!("Rejecting oversized line ({} bytes)", len);
                Reply::err(ErrorKind::InvalidJson).into()
            }
        }
    }

    /// Handle a decoded message
    pub async fn handle_message(&mut self, message: Inbound) -> Outbound {
        match message {
            Inbound::Arm { enabled } => self.handle_arm(enabled),
            Inbound::Command(request) => self.handle_command(&request).await.into(),
        }
    }

    fn handle_arm(&mut self, enabled: bool) -> Outbound {
        // Sampled once, here; never re-checked while armed
        let interlock_engaged = self.interlock.is_engaged();
        let from = self.gate.state();

        match self
            .gate
            .process_event(SafetyEvent::from_arm(enabled, interlock_engaged))
        {
            TransitionResult::Success(to) => {
                info!(
                    "[SAFETY] Arm request enabled={} interlock={}: {:?} -> {:?}",
                    enabled, interlock_engaged, from, to
                );
                self.status().into()
            }
            TransitionResult::Refused { reason } => {
                warn!("[SAFETY] Arm refused, interlock not engaged ({:?} -> Disarmed)", from);
                Reply::err(reason).into()
            }
        }
    }

    async fn handle_command(&mut self, request: &CommandRequest) -> Reply {
        let (execution_id, action) = match self.admit(request) {
            Ok(admitted) => admitted,
            Err(kind) => {
                info!(
                    "Command rejected: {} (execution_id={})",
                    kind,
                    display_id(request.execution_id.as_ref())
                );
                return Reply::err(kind);
            }
        };

        info!(
            "Executing command: id={} type={}",
            execution_id,
            action.action_type()
        );

        let mut ctx = HandlerContext {
            sink: self.sink.as_mut(),
            timing: self.timing,
        };
        handlers::dispatch(&mut ctx, &action).await;

        // Delivery is not confirmed by the sink; the ack only means dispatched
        debug!("  Command {} dispatched via {}", execution_id, self.sink.name());
        Reply::ack(execution_id)
    }

    /// Run the ordered checks, returning the execution id and typed action
    fn admit(&mut self, request: &CommandRequest) -> Result<(String, Action), ErrorKind> {
        self.gate.authorize_command()?;

        let now_ms = self.now_ms();
        if !self.rate_limiter.try_acquire(now_ms) {
            return Err(ErrorKind::RateLimited);
        }

        if request.mode.as_ref().and_then(Value::as_str) != Some("EXECUTE") {
            return Err(ErrorKind::ModeNotExecute);
        }

        let (Some(action_type), Some(payload)) = (&request.action_type, &request.payload) else {
            return Err(ErrorKind::InvalidMessage);
        };
        let execution_id = match request.execution_id.as_ref().and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => return Err(ErrorKind::InvalidMessage),
        };

        let action = action_type
            .as_str()
            .and_then(|tag| bounds::validate(tag, payload))
            .ok_or(ErrorKind::BoundsRejected)?;

        Ok((execution_id, action))
    }

    /// Current status snapshot, with a live interlock reading
    pub fn status(&self) -> DeviceStatus {
        let state = self.gate.state();
        DeviceStatus {
            device_id: self.device_id.clone(),
            mode: state.mode(),
            led_state: state == ArmState::Armed,
            kill_switch_state: self.interlock.is_engaged(),
            ts: self.started_at.elapsed().as_secs(),
        }
    }

    /// Message emitted on every heartbeat tick
    pub fn heartbeat(&self) -> Outbound {
        self.status().into()
    }

    fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

fn display_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".into(),
    }
}
