//! Simulation parameters for the hopping leg.
//!
//! One construction point with named fields and validated ranges. The
//! positional layout used by existing collaborators is available through
//! [`SimulationParameters::to_positional`] / [`SimulationParameters::from_positional`]:
//!
//! ```text
//! idx  field   default       unit
//!  0   m       0.10          kg
//!  1   c       0.20          N·s/m
//!  2   k       5.00          N/m
//!  3   l       1.00          m
//!  4   g       9.81          m/s²
//!  5   Fa      0.0 (derived) N
//!  6   omega   5.00          rad/s
//!  7   Fo      0.0 (derived) rad/s
//!  8   Amp     4.00          N
//!  9   Dur     0.02·omega·π  rad
//! 10   Sigma   2.753         rad/(N·s)
//! 11   Phase   1.6π          rad
//! ```

use core::f64::consts::{PI, TAU};
use core::fmt;
use core::str::FromStr;

use hp_controls::{ActuatorGate, PhaseOscillator, TegotaeController, TegotaeFeedback};
use hp_core::units::constants::{self, G_MPS2};
use hp_core::units::{Accel, AngularVelocity, Force, Length, Mass};
use serde::{Deserialize, Serialize};

use crate::body::BodyDynamics;
use crate::contact::SpringContact;
use crate::error::{SimError, SimResult};

/// Number of slots in the positional layout.
pub const POSITIONAL_LEN: usize = 12;

/// Slots of the positional layout that hold derived channel values.
pub const DERIVED_SLOTS: [usize; 2] = [5, 7];

/// Immutable physical and control constants for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Body mass [kg], > 0.
    pub m: f64,
    /// Damping [N·s/m], >= 0.
    pub c: f64,
    /// Spring stiffness [N/m], > 0.
    pub k: f64,
    /// Spring natural length [m], > 0.
    pub l: f64,
    /// Gravity [m/s²].
    pub g: f64,
    /// Oscillator intrinsic angular frequency [rad/s].
    pub omega: f64,
    /// Actuator thrust [N].
    pub amp: f64,
    /// Actuator window width [rad], `0 <= dur < 2π`.
    pub dur: f64,
    /// Feedback gain [rad/(N·s)].
    pub sigma: f64,
    /// Actuator window start [rad], compared against `phi mod 2π`.
    pub phase: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        let omega = 5.0;
        Self {
            m: 0.10,
            c: 0.20,
            k: 5.00,
            l: 1.00,
            g: G_MPS2,
            omega,
            amp: 4.00,
            dur: default_duration(omega),
            sigma: 2.753,
            phase: 1.6 * PI,
        }
    }
}

/// Default actuator window for a given frequency: `0.02·omega·π`.
pub fn default_duration(omega: f64) -> f64 {
    0.02 * omega * PI
}

impl SimulationParameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    /// Check every range constraint; the first violation is returned.
    pub fn validate(&self) -> SimResult<()> {
        let fields = [
            ("m", self.m),
            ("c", self.c),
            ("k", self.k),
            ("l", self.l),
            ("g", self.g),
            ("omega", self.omega),
            ("amp", self.amp),
            ("dur", self.dur),
            ("sigma", self.sigma),
            ("phase", self.phase),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SimError::config(field, "must be finite"));
            }
        }

        if self.m <= 0.0 {
            return Err(SimError::config("m", "mass must be positive"));
        }
        if self.c < 0.0 {
            return Err(SimError::config("c", "damping cannot be negative"));
        }
        if self.k <= 0.0 {
            return Err(SimError::config("k", "stiffness must be positive"));
        }
        if self.l <= 0.0 {
            return Err(SimError::config("l", "natural length must be positive"));
        }
        if self.dur < 0.0 {
            return Err(SimError::config("dur", "duration cannot be negative"));
        }
        if self.dur >= TAU {
            return Err(SimError::config("dur", "duration must be less than 2π"));
        }
        Ok(())
    }

    pub fn spring(&self) -> SpringContact {
        SpringContact {
            k: self.k,
            l: self.l,
        }
    }

    pub fn body(&self) -> BodyDynamics {
        BodyDynamics {
            m: self.m,
            c: self.c,
            g: self.g,
        }
    }

    /// Controller built from the control fields. Assumes [`Self::validate`]
    /// has passed.
    pub fn controller(&self) -> TegotaeController {
        TegotaeController::new(
            ActuatorGate {
                amplitude: self.amp,
                duration: self.dur,
                phase: self.phase,
            },
            TegotaeFeedback { sigma: self.sigma },
            PhaseOscillator { omega: self.omega },
        )
    }

    /// Positional layout with the derived slots zeroed.
    pub fn to_positional(&self) -> [f64; POSITIONAL_LEN] {
        [
            self.m, self.c, self.k, self.l, self.g, 0.0, self.omega, 0.0, self.amp, self.dur,
            self.sigma, self.phase,
        ]
    }

    /// Read the positional layout. Derived slots 5 and 7 are ignored.
    pub fn from_positional(values: &[f64]) -> SimResult<Self> {
        if values.len() != POSITIONAL_LEN {
            return Err(SimError::config(
                "positional",
                "expected exactly 12 parameter slots",
            ));
        }
        let params = Self {
            m: values[0],
            c: values[1],
            k: values[2],
            l: values[3],
            g: values[4],
            omega: values[6],
            amp: values[8],
            dur: values[9],
            sigma: values[10],
            phase: values[11],
        };
        params.validate()?;
        Ok(params)
    }

    pub fn get(&self, field: ParameterField) -> f64 {
        match field {
            ParameterField::M => self.m,
            ParameterField::C => self.c,
            ParameterField::K => self.k,
            ParameterField::L => self.l,
            ParameterField::G => self.g,
            ParameterField::Omega => self.omega,
            ParameterField::Amp => self.amp,
            ParameterField::Dur => self.dur,
            ParameterField::Sigma => self.sigma,
            ParameterField::Phase => self.phase,
        }
    }

    /// Copy with one field replaced. Not validated.
    pub fn with(&self, field: ParameterField, value: f64) -> Self {
        let mut out = self.clone();
        let slot = match field {
            ParameterField::M => &mut out.m,
            ParameterField::C => &mut out.c,
            ParameterField::K => &mut out.k,
            ParameterField::L => &mut out.l,
            ParameterField::G => &mut out.g,
            ParameterField::Omega => &mut out.omega,
            ParameterField::Amp => &mut out.amp,
            ParameterField::Dur => &mut out.dur,
            ParameterField::Sigma => &mut out.sigma,
            ParameterField::Phase => &mut out.phase,
        };
        *slot = value;
        out
    }
}

/// Named, non-derived parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterField {
    M,
    C,
    K,
    L,
    G,
    Omega,
    Amp,
    Dur,
    Sigma,
    Phase,
}

impl ParameterField {
    pub const ALL: [ParameterField; 10] = [
        ParameterField::M,
        ParameterField::C,
        ParameterField::K,
        ParameterField::L,
        ParameterField::G,
        ParameterField::Omega,
        ParameterField::Amp,
        ParameterField::Dur,
        ParameterField::Sigma,
        ParameterField::Phase,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParameterField::M => "m",
            ParameterField::C => "c",
            ParameterField::K => "k",
            ParameterField::L => "l",
            ParameterField::G => "g",
            ParameterField::Omega => "omega",
            ParameterField::Amp => "amp",
            ParameterField::Dur => "dur",
            ParameterField::Sigma => "sigma",
            ParameterField::Phase => "phase",
        }
    }

    /// Slot in the positional layout.
    pub fn index(self) -> usize {
        match self {
            ParameterField::M => 0,
            ParameterField::C => 1,
            ParameterField::K => 2,
            ParameterField::L => 3,
            ParameterField::G => 4,
            ParameterField::Omega => 6,
            ParameterField::Amp => 8,
            ParameterField::Dur => 9,
            ParameterField::Sigma => 10,
            ParameterField::Phase => 11,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ParameterField::M => "kg",
            ParameterField::C => "N·s/m",
            ParameterField::K => "N/m",
            ParameterField::L => "m",
            ParameterField::G => "m/s²",
            ParameterField::Omega => "rad/s",
            ParameterField::Amp => "N",
            ParameterField::Dur => "rad",
            ParameterField::Sigma => "rad/(N·s)",
            ParameterField::Phase => "rad",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterField {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ParameterField::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or(SimError::config("field", "unknown parameter name"))
    }
}

/// Builder taking SI quantities for the physical fields.
///
/// Unset fields keep their defaults. A duration left unset follows the
/// chosen frequency (`0.02·omega·π`).
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    mass: Option<Mass>,
    damping: Option<f64>,
    stiffness: Option<f64>,
    natural_length: Option<Length>,
    gravity: Option<Accel>,
    omega: Option<AngularVelocity>,
    amplitude: Option<Force>,
    duration: Option<f64>,
    sigma: Option<f64>,
    phase: Option<f64>,
}

impl ParametersBuilder {
    pub fn mass(mut self, mass: Mass) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Damping coefficient [N·s/m].
    pub fn damping(mut self, c: f64) -> Self {
        self.damping = Some(c);
        self
    }

    /// Spring stiffness [N/m].
    pub fn stiffness(mut self, k: f64) -> Self {
        self.stiffness = Some(k);
        self
    }

    pub fn natural_length(mut self, l: Length) -> Self {
        self.natural_length = Some(l);
        self
    }

    pub fn gravity(mut self, g: Accel) -> Self {
        self.gravity = Some(g);
        self
    }

    pub fn omega(mut self, omega: AngularVelocity) -> Self {
        self.omega = Some(omega);
        self
    }

    pub fn amplitude(mut self, amp: Force) -> Self {
        self.amplitude = Some(amp);
        self
    }

    /// Actuator window width [rad].
    pub fn duration(mut self, dur: f64) -> Self {
        self.duration = Some(dur);
        self
    }

    /// Feedback gain [rad/(N·s)].
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Actuator window start [rad].
    pub fn phase(mut self, phase: f64) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn build(self) -> SimResult<SimulationParameters> {
        use uom::si::{acceleration, angular_velocity, force, length, mass};

        let defaults = SimulationParameters::default();
        let omega = self
            .omega
            .map(|w| w.get::<angular_velocity::radian_per_second>())
            .unwrap_or(defaults.omega);
        let params = SimulationParameters {
            m: self
                .mass
                .map(|v| v.get::<mass::kilogram>())
                .unwrap_or(defaults.m),
            c: self.damping.unwrap_or(defaults.c),
            k: self.stiffness.unwrap_or(defaults.k),
            l: self
                .natural_length
                .map(|v| v.get::<length::meter>())
                .unwrap_or(defaults.l),
            g: self
                .gravity
                .unwrap_or_else(constants::g)
                .get::<acceleration::meter_per_second_squared>(),
            omega,
            amp: self
                .amplitude
                .map(|v| v.get::<force::newton>())
                .unwrap_or(defaults.amp),
            dur: self.duration.unwrap_or_else(|| default_duration(omega)),
            sigma: self.sigma.unwrap_or(defaults.sigma),
            phase: self.phase.unwrap_or(defaults.phase),
        };
        params.validate()?;
        Ok(params)
    }
}
