//! Safety Module
//!
//! Physical interlock (kill switch) readings. The arm/disarm state machine
//! itself lives in `hexforge_shared::state_machine`.

mod interlock;

pub use interlock::{Interlock, SimulatedInterlock, SysfsInterlock};
