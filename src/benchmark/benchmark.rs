//! Step-halving study of the RK4 phase integrator
//!
//! Runs the same orbit at steps = base, 2 base, 4 base, ... and records the
//! interior errors and wall time of each run. The phase-time error is set by
//! the integrator alone and should shrink ~16x per halving; the energy and
//! momentum errors also carry the second-order finite-difference gradient
//! and shrink ~4x.

use std::time::Instant;

use anyhow::Result;

use crate::simulation::params::OrbitalParameters;
use crate::simulation::scenario::OrbitScenario;

#[derive(Debug, Clone, Copy)]
pub struct ConvergenceRow {
    pub steps: usize, // steps per period
    pub h: f64, // step size
    pub time_error: f64, // interior max |t_kepler - t| / T
    pub energy_error: f64, // interior max energy relative error
    pub momentum_error: f64, // interior max angular momentum relative error
    pub elapsed_ms: f64, // wall time of integration + diagnostics
}

/// Convergence order between two successive halvings, log2(coarse / fine)
pub fn observed_order(coarse: f64, fine: f64) -> f64 {
    (coarse / fine).log2()
}

/// Run `levels` orbits, doubling the step count each time
pub fn bench_rk4_convergence(
    params: &OrbitalParameters,
    base_steps: usize,
    levels: usize,
) -> Result<Vec<ConvergenceRow>> {
    let mut rows = Vec::with_capacity(levels);

    for level in 0..levels {
        let steps = base_steps << level;
        let scenario = OrbitScenario::with_steps(*params, steps)?;

        let t0 = Instant::now();
        let run = scenario.run();
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

        rows.push(ConvergenceRow {
            steps: scenario.steps,
            h: scenario.h,
            time_error: run.summary.max_time_error,
            energy_error: run.summary.max_energy_error,
            momentum_error: run.summary.max_momentum_error,
            elapsed_ms,
        });
    }

    Ok(rows)
}

/// Print the study as CSV, with observed orders against the previous row
pub fn print_convergence(rows: &[ConvergenceRow]) {
    println!("steps,h,time_err,time_order,energy_err,energy_order,momentum_err,momentum_order,ms");

    for (i, row) in rows.iter().enumerate() {
        let (time_order, energy_order, momentum_order) = match i.checked_sub(1).map(|j| &rows[j]) {
            Some(prev) => (
                observed_order(prev.time_error, row.time_error),
                observed_order(prev.energy_error, row.energy_error),
                observed_order(prev.momentum_error, row.momentum_error),
            ),
            None => (f64::NAN, f64::NAN, f64::NAN),
        };

        println!(
            "{},{:.6e},{:.6e},{:.3},{:.6e},{:.3},{:.6e},{:.3},{:.3}",
            row.steps,
            row.h,
            row.time_error,
            time_order,
            row.energy_error,
            energy_order,
            row.momentum_error,
            momentum_order,
            row.elapsed_ms
        );
    }
}
