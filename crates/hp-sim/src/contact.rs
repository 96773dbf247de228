//! Unilateral leg spring.

use hp_controls::ContactSample;

/// Spring force `k (l - x)` for `x <= l`, zero above the natural length.
///
/// Total over the real line and continuous at `x = l`; the spring can only
/// push.
#[inline]
pub fn spring_force(x: f64, k: f64, l: f64) -> f64 {
    if x <= l { k * (l - x) } else { 0.0 }
}

/// Leg spring with stiffness `k` [N/m] and natural length `l` [m].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringContact {
    pub k: f64,
    pub l: f64,
}

impl SpringContact {
    /// Contact condition `x <= l`.
    #[inline]
    pub fn in_contact(&self, x: f64) -> bool {
        x <= self.l
    }

    #[inline]
    pub fn force(&self, x: f64) -> f64 {
        spring_force(x, self.k, self.l)
    }

    /// Spring potential energy, zero in flight.
    pub fn potential(&self, x: f64) -> f64 {
        if self.in_contact(x) {
            let d = self.l - x;
            0.5 * self.k * d * d
        } else {
            0.0
        }
    }

    /// What the controller senses at height `x`.
    pub fn sample(&self, x: f64) -> ContactSample {
        ContactSample {
            normal_force: self.force(x),
            in_contact: self.in_contact(x),
        }
    }
}
