pub mod simulation;
pub mod catalogue;
pub mod configuration;
pub mod benchmark;
pub mod logging;

pub use simulation::params::OrbitalParameters;
pub use simulation::states::{PhaseSeries, DerivedSeries, NVec2};
pub use simulation::dynamics::{PhaseRate, KeplerPhaseRate};
pub use simulation::integrator::{rk4_step, integrate, integrate_phase, step_count};
pub use simulation::diagnostics::{
    gradient, relative_error, radius_at, phase_from_radius, kepler_time, derive_series, ConservationSummary,
};
pub use simulation::scenario::{OrbitScenario, OrbitRun};

pub use catalogue::error::{CatalogueError, CatalogueResult};
pub use catalogue::table::{parse_table, CatalogueQuery, CatalogueTable, Column, ColumnSpec};
pub use catalogue::reader::CatalogueReader;
pub use catalogue::sources::CatalogueSource;

pub use configuration::config::{
    load_scenario, scenario_path, CatalogueConfig, CataloguePreset, CatalogueSourceConfig, ColumnConfig, OrbitConfig,
    ScenarioConfig,
};

pub use benchmark::benchmark::{bench_rk4_convergence, observed_order, print_convergence, ConvergenceRow};

pub use logging::init_logging;
