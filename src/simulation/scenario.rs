//! Build orbit runs from configuration
//!
//! Takes an `OrbitConfig` (YAML-facing) and produces an [`OrbitScenario`]
//! holding:
//! - the derived constants (`OrbitalParameters`)
//! - the fixed step size `h` and the number of steps covering one period
//!
//! [`OrbitScenario::run`] integrates the phase and rebuilds the diagnostics
//! into an [`OrbitRun`].

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::configuration::config::OrbitConfig;
use crate::simulation::diagnostics::{derive_series, ConservationSummary};
use crate::simulation::integrator::{integrate_phase, step_count};
use crate::simulation::params::OrbitalParameters;
use crate::simulation::states::{DerivedSeries, PhaseSeries};

#[derive(Debug, Clone)]
pub struct OrbitScenario {
    pub parameters: OrbitalParameters,
    pub h: f64, // step size
    pub steps: usize, // number of RK4 steps, ceil(T / h)
}

/// Everything one orbit run produces
#[derive(Debug, Clone)]
pub struct OrbitRun {
    pub parameters: OrbitalParameters,
    pub phase: PhaseSeries,
    pub derived: DerivedSeries,
    pub summary: ConservationSummary,
}

impl OrbitScenario {
    pub fn build_scenario(cfg: &OrbitConfig) -> Result<Self> {
        let parameters = OrbitalParameters::from_config(cfg);

        if !(0.0..1.0).contains(&cfg.ecc) {
            warn!(ecc = cfg.ecc, "eccentricity outside [0, 1); orbit is not bound");
        }

        // Step size: explicit h, or one period split into `steps`
        let h = match cfg.step_size {
            Some(h) => h,
            None => {
                if cfg.steps == 0 {
                    bail!("steps per period must be at least 1");
                }
                parameters.T / cfg.steps as f64
            }
        };

        Self::with_step(parameters, h)
    }

    /// Scenario over one period of `parameters` with a given step size
    pub fn with_step(parameters: OrbitalParameters, h: f64) -> Result<Self> {
        if !h.is_finite() || h <= 0.0 {
            bail!("step size must be positive and finite, got {h}");
        }
        if !parameters.T.is_finite() || parameters.T <= 0.0 {
            bail!("orbital period is not positive and finite ({}); check e < 1 and L, masses > 0", parameters.T);
        }

        let steps = step_count(parameters.T, h);
        Ok(Self { parameters, h, steps })
    }

    /// Scenario over one period split into `steps` equal steps
    pub fn with_steps(parameters: OrbitalParameters, steps: usize) -> Result<Self> {
        if steps == 0 {
            bail!("steps per period must be at least 1");
        }
        Self::with_step(parameters, parameters.T / steps as f64)
    }

    pub fn run(&self) -> OrbitRun {
        info!(
            period = self.parameters.T,
            h = self.h,
            steps = self.steps,
            "running orbit integration"
        );

        let phase = integrate_phase(&self.parameters, self.h);
        let derived = derive_series(&self.parameters, &phase);
        let summary = ConservationSummary::from_series(&derived);

        info!(
            energy_error = summary.max_energy_error,
            momentum_error = summary.max_momentum_error,
            time_error = summary.max_time_error,
            "conservation check (interior max)"
        );

        OrbitRun {
            parameters: self.parameters,
            phase,
            derived,
            summary,
        }
    }
}
