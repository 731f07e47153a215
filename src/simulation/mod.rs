pub mod states;
pub mod params;
pub mod dynamics;
pub mod integrator;
pub mod diagnostics;
pub mod scenario;
