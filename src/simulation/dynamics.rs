//! Right-hand sides for the phase equation phi' = F(phi)
//!
//! The integrator only sees the [`PhaseRate`] trait, so any closed-form
//! rate (or a plain closure) can be stepped with it.

use super::params::OrbitalParameters;

/// Trait for autonomous scalar rates F(y)
pub trait PhaseRate {
    fn rate(&self, y: f64) -> f64;
}

impl<F> PhaseRate for F
where
    F: Fn(f64) -> f64,
{
    fn rate(&self, y: f64) -> f64 {
        self(y)
    }
}

/// Angular rate along a Keplerian conic:
/// phi' = L (1 + e cos phi)^2 / (mu r_l^2)
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct KeplerPhaseRate {
    pub L: f64, // angular momentum
    pub ecc: f64, // eccentricity
    pub mu: f64, // reduced mass
    pub r_l: f64, // semi-latus rectum
}

impl KeplerPhaseRate {
    pub fn from_params(p: &OrbitalParameters) -> Self {
        Self {
            L: p.L,
            ecc: p.ecc,
            mu: p.mu,
            r_l: p.r_l,
        }
    }
}

impl PhaseRate for KeplerPhaseRate {
    fn rate(&self, phi: f64) -> f64 {
        let q = 1.0 + self.ecc * phi.cos();
        self.L * q * q / (self.mu * self.r_l * self.r_l)
    }
}
