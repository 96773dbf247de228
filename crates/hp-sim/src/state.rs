//! Hopper state vector.

use serde::{Deserialize, Serialize};

/// `(x, y, phi, dphi)` state of the leg and its oscillator.
///
/// - `x`: spring deflection coordinate, used as body height
/// - `y`: vertical velocity
/// - `phi`: oscillator phase, unbounded (wrapped only when compared)
/// - `dphi`: derived phase rate `omega + Fo`; kept so the vector has a
///   uniform width, never integrated on its own
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HopperState {
    pub x: f64,
    pub y: f64,
    pub phi: f64,
    pub dphi: f64,
}

/// Time derivative of a [`HopperState`]: `(dx, dy, dphi, 0)`.
///
/// The last slot is always zero because `dphi` is re-derived, not integrated.
pub type StateDerivative = HopperState;

impl HopperState {
    pub const fn new(x: f64, y: f64, phi: f64, dphi: f64) -> Self {
        Self { x, y, phi, dphi }
    }

    /// Resting on the uncompressed spring with zero phase.
    pub const fn standing(l: f64) -> Self {
        Self::new(l, 0.0, 0.0, 0.0)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.phi, self.dphi]
    }

    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.phi + other.phi,
            self.dphi + other.dphi,
        )
    }

    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.phi * s, self.dphi * s)
    }
}
