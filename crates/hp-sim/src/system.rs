//! Coupled leg + oscillator right-hand side.
//!
//! Per evaluation, in order:
//! 1. contact condition `x <= l`
//! 2. feedback `Fo` from the spring reaction and current `phi`
//! 3. actuator `Fa` from the phase window and contact condition
//! 4. body and oscillator derivatives from those channel values
//!
//! The channel values are returned alongside the derivative and are
//! otherwise dropped; nothing is written back into the parameters.

use hp_controls::{ControlChannels, TegotaeController};

use crate::body::BodyDynamics;
use crate::contact::SpringContact;
use crate::error::SimResult;
use crate::model::TransientModel;
use crate::params::SimulationParameters;
use crate::state::{HopperState, StateDerivative};

/// Derivative plus the channel values it was computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhsEvaluation {
    pub derivative: StateDerivative,
    pub channels: ControlChannels,
}

/// Validated, read-only composition of plant and controller.
#[derive(Debug, Clone)]
pub struct CoupledSystem {
    params: SimulationParameters,
    spring: SpringContact,
    body: BodyDynamics,
    controller: TegotaeController,
}

impl CoupledSystem {
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        params.validate()?;
        let controller = params.controller();
        Ok(Self {
            spring: params.spring(),
            body: params.body(),
            controller,
            params,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Channel values at `state`; a pure function of state and parameters.
    pub fn channels(&self, state: &HopperState) -> ControlChannels {
        self.controller
            .channels(state.phi, self.spring.sample(state.x))
    }

    pub fn evaluate(&self, state: &HopperState) -> RhsEvaluation {
        let contact = self.spring.sample(state.x);
        let channels = self.controller.channels(state.phi, contact);

        let (dx, dy) = self
            .body
            .derivatives(state.y, contact.normal_force, channels.fa);
        let (dphi, ddphi) = self.controller.phase_derivatives(channels);

        RhsEvaluation {
            derivative: HopperState::new(dx, dy, dphi, ddphi),
            channels,
        }
    }

    /// Phase rate `omega + Fo` at `state`.
    pub fn phase_rate(&self, state: &HopperState) -> f64 {
        self.controller
            .oscillator
            .phase_rate(self.channels(state).fo)
    }

    /// Copy of `state` with the derived `dphi` slot filled in.
    pub fn with_derived_rate(&self, state: HopperState) -> HopperState {
        HopperState {
            dphi: self.phase_rate(&state),
            ..state
        }
    }
}

impl TransientModel for CoupledSystem {
    type State = HopperState;

    fn rhs(&self, _t: f64, x: &HopperState) -> SimResult<HopperState> {
        Ok(self.evaluate(x).derivative)
    }

    fn add(&self, a: &HopperState, b: &HopperState) -> HopperState {
        a.add(b)
    }

    fn scale(&self, a: &HopperState, scale: f64) -> HopperState {
        a.scale(scale)
    }

    fn project(&self, x: HopperState) -> HopperState {
        self.with_derived_rate(x)
    }
}

/// One-shot right-hand side: validates `params`, then evaluates at `state`.
///
/// The system is autonomous, so `t` does not enter the result.
pub fn evaluate_rhs(
    state: &HopperState,
    _t: f64,
    params: &SimulationParameters,
) -> SimResult<StateDerivative> {
    let system = CoupledSystem::new(params.clone())?;
    Ok(system.evaluate(state).derivative)
}
