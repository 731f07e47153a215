//! Time series produced by one orbit run.
//!
//! - `PhaseSeries`   phase angle phi_i on the uniform grid t_i = i h
//! - `DerivedSeries` radius, rates, positions and reconstructed invariants
//!
//! Both are transient: built once per run and held only in memory.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone)]
pub struct PhaseSeries {
    pub h: f64, // step size
    pub t: Vec<f64>, // time grid, t[i] = i h
    pub phi: Vec<f64>, // phase angle, phi[0] = 0 at periapsis
}

impl PhaseSeries {
    /// Number of samples (steps + 1)
    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    /// Number of integration steps taken
    pub fn steps(&self) -> usize {
        self.phi.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub r: Vec<f64>, // radius r_l / (1 + e cos phi)
    pub r_dot: Vec<f64>, // dr/dt, finite differences
    pub phi_dot: Vec<f64>, // dphi/dt, finite differences
    pub positions: Vec<NVec2>, // orbit-plane position r (cos phi, sin phi)
    pub energy: Vec<f64>, // reconstructed total energy
    pub momentum: Vec<f64>, // reconstructed angular momentum
    pub energy_error: Vec<f64>, // |energy - E| / |E|
    pub momentum_error: Vec<f64>, // |momentum - L| / |L|
    pub time_error: Vec<f64>, // |t_kepler(phi) - t| / T
}
