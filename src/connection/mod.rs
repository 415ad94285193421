//! Connection management for the host byte stream
//!
//! This module handles:
//! - Opening the transport with automatic reconnection
//! - Line framing of inbound bytes
//! - Writing replies and periodic status events

mod manager;

pub use manager::{connection_loop, handle_session, SessionConfig};
