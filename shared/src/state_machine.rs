//! Arm/Disarm State Machine
//!
//! Combines the physical interlock reading with the host's logical enable
//! request. The interlock is sampled only when an arm request is processed;
//! once armed, commands are gated on the logical state alone.

use crate::messages::{ErrorKind, Mode};

/// Logical execution permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmState {
    #[default]
    Disarmed,
    Armed,
}

impl ArmState {
    /// Mode advertised in status events for this state
    pub fn mode(self) -> Mode {
        match self {
            ArmState::Armed => Mode::Execute,
            ArmState::Disarmed => Mode::Suggest,
        }
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyEvent {
    /// Host asked to arm; carries the interlock reading taken at this moment
    ArmRequested { interlock_engaged: bool },
    /// Host asked to disarm
    DisarmRequested,
}

impl SafetyEvent {
    /// Build the event for an `arm` message
    pub fn from_arm(enabled: bool, interlock_engaged: bool) -> Self {
        if enabled {
            SafetyEvent::ArmRequested { interlock_engaged }
        } else {
            SafetyEvent::DisarmRequested
        }
    }
}

/// Result of a state transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition applied; respond with a status event
    Success(ArmState),
    /// Arm refused; state is now `Disarmed`
    Refused { reason: ErrorKind },
}

/// The safety gate for HID execution
#[derive(Debug, Default)]
pub struct SafetyGate {
    current_state: ArmState,
}

impl SafetyGate {
    /// Create a new gate in the Disarmed state
    pub fn new() -> Self {
        Self {
            current_state: ArmState::Disarmed,
        }
    }

    /// Get current state
    pub fn state(&self) -> ArmState {
        self.current_state
    }

    pub fn is_armed(&self) -> bool {
        self.current_state == ArmState::Armed
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: SafetyEvent) -> TransitionResult {
        match event {
            SafetyEvent::DisarmRequested => {
                self.current_state = ArmState::Disarmed;
                TransitionResult::Success(ArmState::Disarmed)
            }
            SafetyEvent::ArmRequested {
                interlock_engaged: true,
            } => {
                self.current_state = ArmState::Armed;
                TransitionResult::Success(ArmState::Armed)
            }
            SafetyEvent::ArmRequested {
                interlock_engaged: false,
            } => {
                // A refused arm also drops an existing arm
                self.current_state = ArmState::Disarmed;
                TransitionResult::Refused {
                    reason: ErrorKind::PhysicalArmOff,
                }
            }
        }
    }

    /// Gate a command on the logical state
    pub fn authorize_command(&self) -> Result<(), ErrorKind> {
        match self.current_state {
            ArmState::Armed => Ok(()),
            ArmState::Disarmed => Err(ErrorKind::NotArmed),
        }
    }
}
