//! Rover module: player state, input intent and shield mechanics.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `Rover`, `UpgradeLevels`, `RoverState`, `CrashCause` |
//! | [`control`] | Logical input actions, held-direction intent, movement + canvas clamp |
//! | [`shield`] | Shield activation, per-tick expiry, impact breaks |
//!
//! Everything is re-exported here so callers can use flat `crate::rover::*`
//! imports.

pub mod control;
pub mod shield;
pub mod state;

pub use control::{move_rover, InputAction, KeyEvent, RoverIntent};
pub use shield::{activate_shield, break_shield, tick_shield};
pub use state::{CrashCause, Rover, RoverState, UpgradeKind, UpgradeLevels};
