//! Fixed-step RK4 integration of the phase equation
//!
//! `rk4_step` advances a scalar state by one step against any [`PhaseRate`];
//! `integrate_phase` repeats it over one orbital period on a uniform grid.
//! There is no adaptive control and no early exit: the loop always covers the
//! full grid.

use tracing::debug;

use super::dynamics::{KeplerPhaseRate, PhaseRate};
use super::params::OrbitalParameters;
use super::states::PhaseSeries;

/// Advance `y` by one classical Runge-Kutta step of size `h`
pub fn rk4_step<R>(y: f64, h: f64, f: &R) -> f64
where
    R: PhaseRate + ?Sized,
{
    // Stage slopes, each already scaled by h
    let k1 = h * f.rate(y);
    let k2 = h * f.rate(y + 0.5 * k1);
    let k3 = h * f.rate(y + 0.5 * k2);
    let k4 = h * f.rate(y + k3);

    // Weighted average: y_n+1 = y_n + (k1 + 2 k2 + 2 k3 + k4) / 6
    y + (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
}

/// Number of steps needed to cover `span` with step `h`, i.e. ceil(span / h).
/// Ratios within 1e-9 of an integer are taken as that integer so that
/// h = T / n gives exactly n steps.
pub fn step_count(span: f64, h: f64) -> usize {
    let ratio = span / h;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

/// Integrate `y' = f(y)` from `y0` for `n` steps of size `h`
pub fn integrate<R>(y0: f64, h: f64, n: usize, f: &R) -> PhaseSeries
where
    R: PhaseRate + ?Sized,
{
    let mut t = Vec::with_capacity(n + 1);
    let mut phi = Vec::with_capacity(n + 1);

    t.push(0.0);
    phi.push(y0);

    let mut y = y0;
    for i in 1..=n {
        y = rk4_step(y, h, f);
        t.push(i as f64 * h);
        phi.push(y);
    }

    PhaseSeries { h, t, phi }
}

/// Integrate the Keplerian phase over one period with step `h`, starting
/// at periapsis (phi_0 = 0). Produces ceil(T / h) + 1 samples.
pub fn integrate_phase(params: &OrbitalParameters, h: f64) -> PhaseSeries {
    let n = step_count(params.T, h);
    debug!(steps = n, h, period = params.T, "integrating phase");

    let rate = KeplerPhaseRate::from_params(params);
    integrate(0.0, h, n, &rate)
}
