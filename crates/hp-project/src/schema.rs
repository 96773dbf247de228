//! Scenario schema definitions.

use hp_sim::{HopperState, IntegratorType, SimOptions, SimulationParameters};
use serde::{Deserialize, Serialize};

/// One simulation scenario: parameters, start state and run options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub parameters: ParameterDef,
    #[serde(default)]
    pub initial_state: InitialStateDef,
    #[serde(default)]
    pub run: RunDef,
}

impl Scenario {
    /// Default parameters, standing start, default run options.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            parameters: ParameterDef::default(),
            initial_state: InitialStateDef::default(),
            run: RunDef::default(),
        }
    }
}

/// Parameter overrides. Unset fields fall back to the defaults; an unset
/// `dur` follows `omega` (`0.02·omega·π`).
///
/// `positional` accepts the 12-slot interchange layout instead of named
/// fields; the two forms cannot be mixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ParameterDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positional: Option<Vec<f64>>,
}

impl ParameterDef {
    /// Fully specified overrides for every named field.
    pub fn from_params(p: &SimulationParameters) -> Self {
        Self {
            m: Some(p.m),
            c: Some(p.c),
            k: Some(p.k),
            l: Some(p.l),
            g: Some(p.g),
            omega: Some(p.omega),
            amp: Some(p.amp),
            dur: Some(p.dur),
            sigma: Some(p.sigma),
            phase: Some(p.phase),
            positional: None,
        }
    }

    pub fn has_named(&self) -> bool {
        [
            self.m, self.c, self.k, self.l, self.g, self.omega, self.amp, self.dur, self.sigma,
            self.phase,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Apply named overrides on top of the defaults. Not validated, and
    /// `positional` is ignored; see [`crate::validate::resolve_parameters`].
    pub fn apply_named(&self) -> SimulationParameters {
        let d = SimulationParameters::default();
        let omega = self.omega.unwrap_or(d.omega);
        SimulationParameters {
            m: self.m.unwrap_or(d.m),
            c: self.c.unwrap_or(d.c),
            k: self.k.unwrap_or(d.k),
            l: self.l.unwrap_or(d.l),
            g: self.g.unwrap_or(d.g),
            omega,
            amp: self.amp.unwrap_or(d.amp),
            dur: self
                .dur
                .unwrap_or_else(|| hp_sim::params::default_duration(omega)),
            sigma: self.sigma.unwrap_or(d.sigma),
            phase: self.phase.unwrap_or(d.phase),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    #[serde(default = "default_x")]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub phi: f64,
    #[serde(default)]
    pub dphi: f64,
}

fn default_x() -> f64 {
    1.0
}

impl Default for InitialStateDef {
    fn default() -> Self {
        Self {
            x: default_x(),
            y: 0.0,
            phi: 0.0,
            dphi: 0.0,
        }
    }
}

impl From<InitialStateDef> for HopperState {
    fn from(s: InitialStateDef) -> Self {
        HopperState::new(s.x, s.y, s.phi, s.dphi)
    }
}

/// Run options; defaults: 15 s at 1e-4 s, stride 100, RK4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_max_t")]
    pub max_t: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_stride")]
    pub stride: usize,
    /// Upper bound on dense samples; longer runs are rejected up front.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub integrator: IntegratorType,
}

fn default_max_t() -> f64 {
    SimOptions::default().max_t
}

fn default_dt() -> f64 {
    SimOptions::default().dt
}

fn default_stride() -> usize {
    SimOptions::default().stride
}

fn default_max_steps() -> usize {
    SimOptions::default().max_steps
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            max_t: default_max_t(),
            dt: default_dt(),
            stride: default_stride(),
            max_steps: default_max_steps(),
            integrator: IntegratorType::default(),
        }
    }
}

impl From<&RunDef> for SimOptions {
    fn from(r: &RunDef) -> Self {
        SimOptions {
            dt: r.dt,
            max_t: r.max_t,
            stride: r.stride,
            max_steps: r.max_steps,
            integrator: r.integrator,
        }
    }
}
