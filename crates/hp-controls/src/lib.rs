//! Phase-oscillator control for the hopping leg.
//!
//! This crate holds the controller side of the coupled system. The plant
//! (body and spring) lives in `hp-sim`; the only plant quantities the
//! controller reads are the ground reaction force and the contact flag.
//!
//! # Architecture
//!
//! - [`ActuatorGate`] fires a constant thrust inside a phase window
//! - [`TegotaeFeedback`] turns the reaction force into a phase-rate correction
//! - [`PhaseOscillator`] integrates the intrinsic rhythm plus feedback
//! - [`TegotaeController`] composes the three into [`ControlChannels`]
//!
//! Channel values are recomputed from the current state on every call and
//! are never stored between calls.

pub mod channels;
pub mod controller;
pub mod error;
pub mod gate;
pub mod oscillator;
pub mod tegotae;

pub use channels::{ContactSample, ControlChannels};
pub use controller::TegotaeController;
pub use error::{ControlError, ControlResult};
pub use gate::ActuatorGate;
pub use oscillator::PhaseOscillator;
pub use tegotae::TegotaeFeedback;
