//! Vertical body dynamics.

use crate::params::SimulationParameters;
use crate::state::HopperState;

/// Point mass on the leg spring under gravity and viscous damping.
///
/// ```text
/// dx/dt = y
/// dy/dt = (1/m) * (-c*y + N(x) - m*g + Fa)
/// ```
///
/// where `N(x)` is the spring reaction force and `Fa` the actuator force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDynamics {
    /// Mass [kg], must be positive.
    pub m: f64,
    /// Damping [N·s/m].
    pub c: f64,
    /// Gravity [m/s²].
    pub g: f64,
}

impl BodyDynamics {
    /// `(dx/dt, dy/dt)` given the spring reaction and actuator force.
    pub fn derivatives(&self, y: f64, spring_force: f64, fa: f64) -> (f64, f64) {
        let dx = y;
        let dy = (1.0 / self.m) * (-self.c * y + spring_force - self.m * self.g + fa);
        (dx, dy)
    }
}

/// Kinetic + gravitational + spring potential energy [J].
///
/// With no actuation and no feedback this is non-increasing whenever
/// `c >= 0`: `dE/dt = -c y²`.
pub fn mechanical_energy(state: &HopperState, params: &SimulationParameters) -> f64 {
    let kinetic = 0.5 * params.m * state.y * state.y;
    let gravity = params.m * params.g * state.x;
    kinetic + gravity + params.spring().potential(state.x)
}
