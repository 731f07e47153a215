//! Derived orbital constants for a bound two-body system
//!
//! `OrbitalParameters` is built once from an `OrbitConfig` and then only read:
//! - masses and their combinations (`mu`, `M`),
//! - eccentricity and angular momentum (`ecc`, `L`),
//! - conic geometry (`r_l`, `a`),
//! - the conserved energy `E` and the Kepler period `T`.
//!
//! No validation is done: callers supply 0 <= e < 1, L > 0 and positive masses.

use std::f64::consts::PI;

use crate::configuration::config::OrbitConfig;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParameters {
    pub m1: f64, // primary mass
    pub m2: f64, // secondary mass
    pub mu: f64, // reduced mass m1 m2 / (m1 + m2)
    pub M: f64, // total mass m1 + m2
    pub ecc: f64, // eccentricity
    pub L: f64, // angular momentum magnitude
    pub G: f64, // gravitational constant
    pub r_l: f64, // semi-latus rectum L^2 / (G M mu^2)
    pub E: f64, // total energy (mu^3 / 2) (G M / L)^2 (e^2 - 1)
    pub a: f64, // semi-major axis r_l / (1 - e^2)
    pub T: f64, // orbital period 2 pi sqrt(a^3 / (G M))
}

impl OrbitalParameters {
    #[allow(non_snake_case)]
    pub fn new(m1: f64, m2: f64, ecc: f64, L: f64, G: f64) -> Self {
        let M = m1 + m2;
        let mu = m1 * m2 / M;
        let gm = G * M;

        let r_l = L * L / (gm * mu * mu);
        let E = 0.5 * mu.powi(3) * (gm / L).powi(2) * (ecc * ecc - 1.0);

        // Kepler's third law
        let a = r_l / (1.0 - ecc * ecc);
        let T = 2.0 * PI * (a.powi(3) / gm).sqrt();

        Self { m1, m2, mu, M, ecc, L, G, r_l, E, a, T }
    }

    pub fn from_config(cfg: &OrbitConfig) -> Self {
        Self::new(cfg.m1, cfg.m2, cfg.ecc, cfg.L, cfg.G)
    }

    /// Mean motion n = 2 pi / T
    pub fn mean_motion(&self) -> f64 {
        2.0 * PI / self.T
    }

    /// Periapsis distance r_l / (1 + e)
    pub fn periapsis(&self) -> f64 {
        self.r_l / (1.0 + self.ecc)
    }

    /// Apoapsis distance r_l / (1 - e)
    pub fn apoapsis(&self) -> f64 {
        self.r_l / (1.0 - self.ecc)
    }
}
