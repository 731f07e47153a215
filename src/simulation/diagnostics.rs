//! Conservation diagnostics for an integrated phase series
//!
//! Rebuilds the radius, the time derivatives and the two invariants
//! (energy, angular momentum) from the phase samples and compares them with
//! the closed-form values held in `OrbitalParameters`. Nothing here enforces
//! a threshold: the error series are reported for inspection and the
//! caller decides what is acceptable.

use std::f64::consts::TAU;

use super::params::OrbitalParameters;
use super::states::{DerivedSeries, NVec2, PhaseSeries};

/// Derivative of uniformly sampled `values` with spacing `h`.
///
/// Central differences (f[i+1] - f[i-1]) / 2h in the interior, one-sided
/// first-order differences at both ends. Series shorter than two samples
/// have a zero derivative.
pub fn gradient(values: &[f64], h: f64) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / h);
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / (2.0 * h));
    }
    out.push((values[n - 1] - values[n - 2]) / h);
    out
}

/// |measured - expected| / |expected|
pub fn relative_error(measured: f64, expected: f64) -> f64 {
    (measured - expected).abs() / expected.abs()
}

/// Orbit equation r = r_l / (1 + e cos phi)
pub fn radius_at(params: &OrbitalParameters, phi: f64) -> f64 {
    params.r_l / (1.0 + params.ecc * phi.cos())
}

/// Invert the orbit equation for the phase.
///
/// `outbound` selects the branch moving away from periapsis (phi in [0, pi]);
/// otherwise the inbound branch 2 pi - phi is returned. Requires e > 0.
pub fn phase_from_radius(params: &OrbitalParameters, r: f64, outbound: bool) -> f64 {
    let cos_phi = ((params.r_l / r - 1.0) / params.ecc).clamp(-1.0, 1.0);
    let phi = cos_phi.acos();
    if outbound {
        phi
    } else {
        TAU - phi
    }
}

/// Time since periapsis at which the body reaches phase `phi`, from
/// Kepler's equation. Whole revolutions are unwrapped so the result keeps
/// growing with `phi`.
pub fn kepler_time(params: &OrbitalParameters, phi: f64) -> f64 {
    let e = params.ecc;
    let turns = (phi / TAU).floor();
    let reduced = phi - turns * TAU;

    // eccentric anomaly in [0, 2 pi) for reduced in [0, 2 pi)
    let half = 0.5 * reduced;
    let ecc_anomaly = 2.0 * ((1.0 - e).sqrt() * half.sin()).atan2((1.0 + e).sqrt() * half.cos());

    let mean_anomaly = ecc_anomaly - e * ecc_anomaly.sin() + turns * TAU;
    mean_anomaly / params.mean_motion()
}

/// Rebuild radius, rates and invariants from a phase series
pub fn derive_series(params: &OrbitalParameters, phase: &PhaseSeries) -> DerivedSeries {
    let h = phase.h;
    let mu = params.mu;
    let gm = params.G * params.M;

    let r: Vec<f64> = phase.phi.iter().map(|&phi| radius_at(params, phi)).collect();

    let positions: Vec<NVec2> = r
        .iter()
        .zip(phase.phi.iter())
        .map(|(&ri, &phi)| NVec2::new(ri * phi.cos(), ri * phi.sin()))
        .collect();

    let r_dot = gradient(&r, h);
    let phi_dot = gradient(&phase.phi, h);

    // E = 1/2 mu r'^2 - G M mu / r + L^2 / (2 mu r^2)
    let energy: Vec<f64> = r
        .iter()
        .zip(r_dot.iter())
        .map(|(&ri, &vr)| {
            0.5 * mu * vr * vr - gm * mu / ri + params.L * params.L / (2.0 * mu * ri * ri)
        })
        .collect();

    // L = mu r^2 phi'
    let momentum: Vec<f64> = r
        .iter()
        .zip(phi_dot.iter())
        .map(|(&ri, &w)| mu * ri * ri * w)
        .collect();

    let energy_error = energy.iter().map(|&en| relative_error(en, params.E)).collect();
    let momentum_error = momentum.iter().map(|&l| relative_error(l, params.L)).collect();

    let time_error = phase
        .phi
        .iter()
        .zip(phase.t.iter())
        .map(|(&phi, &t)| (kepler_time(params, phi) - t).abs() / params.T)
        .collect();

    DerivedSeries {
        r,
        r_dot,
        phi_dot,
        positions,
        energy,
        momentum,
        energy_error,
        momentum_error,
        time_error,
    }
}

/// Worst-case errors of a run, split into interior samples and the two
/// endpoints (where the finite differences drop to first order)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationSummary {
    pub max_energy_error: f64, // interior max of energy_error
    pub max_momentum_error: f64, // interior max of momentum_error
    pub max_time_error: f64, // interior max of time_error
    pub endpoint_energy_error: f64, // max at i = 0 and i = N
    pub endpoint_momentum_error: f64, // max at i = 0 and i = N
    pub final_time_error: f64, // time_error at i = N
}

impl ConservationSummary {
    pub fn from_series(derived: &DerivedSeries) -> Self {
        Self {
            max_energy_error: interior_max(&derived.energy_error),
            max_momentum_error: interior_max(&derived.momentum_error),
            max_time_error: interior_max(&derived.time_error),
            endpoint_energy_error: endpoint_max(&derived.energy_error),
            endpoint_momentum_error: endpoint_max(&derived.momentum_error),
            final_time_error: derived.time_error.last().copied().unwrap_or(0.0),
        }
    }
}

fn interior_max(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    values[1..values.len() - 1].iter().fold(0.0_f64, |acc, &v| acc.max(v))
}

fn endpoint_max(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&a), Some(&b)) => a.max(b),
        _ => 0.0,
    }
}
