//! Time-indexed state sequences.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::state::HopperState;

/// Uniformly sampled trajectory starting at `t0`.
///
/// Sample `i` is at `t0 + i * dt`. Produced once per run and owned by the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    t0: f64,
    dt: f64,
    samples: Vec<HopperState>,
}

impl Trajectory {
    pub fn new(t0: f64, dt: f64, samples: Vec<HopperState>) -> Self {
        Self { t0, dt, samples }
    }

    /// Empty trajectory with room for `capacity` samples, or a
    /// configuration error if that buffer cannot be reserved.
    pub(crate) fn try_with_capacity(t0: f64, dt: f64, capacity: usize) -> SimResult<Self> {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(capacity)
            .map_err(|_| SimError::Configuration {
                field: "max_t",
                reason: "trajectory buffer cannot be allocated",
            })?;
        Ok(Self::new(t0, dt, samples))
    }

    pub(crate) fn push(&mut self, state: HopperState) {
        self.samples.push(state);
    }

    /// Sample spacing [s].
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[HopperState] {
        &self.samples
    }

    pub fn get(&self, i: usize) -> Option<&HopperState> {
        self.samples.get(i)
    }

    pub fn last(&self) -> Option<&HopperState> {
        self.samples.last()
    }

    pub fn time_at(&self, i: usize) -> f64 {
        self.t0 + i as f64 * self.dt
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.time_at(i)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &HopperState)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (self.time_at(i), s))
    }

    pub fn heights(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    pub fn phases(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.phi).collect()
    }

    pub fn into_samples(self) -> Vec<HopperState> {
        self.samples
    }

    /// Every `stride`-th sample; see [`decimate`].
    pub fn decimate(&self, stride: usize) -> SimResult<Trajectory> {
        decimate(self, stride)
    }
}

/// Keep every `stride`-th sample starting at index 0. Never interpolates.
///
/// The result keeps `t0` and has spacing `dt * stride`, which is the
/// playback step consumed by display sinks.
pub fn decimate(trajectory: &Trajectory, stride: usize) -> SimResult<Trajectory> {
    if stride == 0 {
        return Err(SimError::Configuration {
            field: "stride",
            reason: "stride must be at least 1",
        });
    }
    let samples = trajectory
        .samples
        .iter()
        .step_by(stride)
        .copied()
        .collect();
    Ok(Trajectory::new(
        trajectory.t0,
        trajectory.dt * stride as f64,
        samples,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Trajectory {
        let samples = (0..n)
            .map(|i| HopperState::new(i as f64, 0.0, 0.0, 0.0))
            .collect();
        Trajectory::new(0.0, 0.5, samples)
    }

    #[test]
    fn decimate_picks_exact_samples() {
        let t = ramp(10);
        let d = decimate(&t, 3).unwrap();
        assert_eq!(d.heights(), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(d.dt(), 1.5);
        assert_eq!(d.times(), vec![0.0, 1.5, 3.0, 4.5]);
    }

    #[test]
    fn stride_one_is_identity() {
        let t = ramp(7);
        assert_eq!(decimate(&t, 1).unwrap(), t);
    }

    #[test]
    fn stride_zero_rejected() {
        let err = decimate(&ramp(3), 0).unwrap_err();
        assert!(matches!(err, SimError::Configuration { field: "stride", .. }));
    }

    #[test]
    fn oversized_buffer_is_an_error() {
        assert!(matches!(
            Trajectory::try_with_capacity(0.0, 1e-4, usize::MAX),
            Err(SimError::Configuration { field: "max_t", .. })
        ));
        let t = Trajectory::try_with_capacity(0.0, 1e-4, 16).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn empty_stays_empty() {
        assert!(decimate(&ramp(0), 4).unwrap().is_empty());
    }

    #[test]
    fn playback_columns_line_up() {
        let samples = (0..4)
            .map(|i| HopperState::new(1.0 + i as f64, -(i as f64), 0.1 * i as f64, 5.0))
            .collect();
        let t = Trajectory::new(2.0, 0.25, samples);
        let times: Vec<f64> = t.iter().map(|(time, _)| time).collect();
        assert_eq!(times, t.times());
        assert_eq!(times, vec![2.0, 2.25, 2.5, 2.75]);
        assert_eq!(t.velocities(), vec![0.0, -1.0, -2.0, -3.0]);
        assert_eq!(t.phases()[2], 0.2);
        assert_eq!(t.last().map(|s| s.x), Some(4.0));
        assert_eq!(t.t0(), 2.0);
        assert_eq!(t.into_samples().len(), 4);
    }
}
