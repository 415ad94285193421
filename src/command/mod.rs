//! Command execution for the HID executor
//!
//! This module handles:
//! - Sequencing arm requests and commands through the safety checks
//! - Dispatching validated actions to HID report sequences
//! - Generating ack/err replies and status events

mod executor;
pub mod handlers;

pub use executor::CommandExecutor;
