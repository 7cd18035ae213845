//! Stochastic, duration-structured compartmental epidemic model.
//!
//! Disease stages (Vaccinated, Exposed, Quarantined, Infected, Severe) are
//! expanded into chains of one-step cohorts so that residence times follow
//! the configured durations. A discrete-time stochastic solver moves integer
//! counts along the edges of the resulting graph once per time step.
pub mod error;
pub mod models;
pub mod params;
pub mod prelude;
pub mod sim;
pub mod trackers;
pub mod utils;

#[cfg(test)]
mod testing;

pub use crate::error::{ConfigError, Error, Result};
pub use crate::models::{Category, CategoryIndex, StateSchema, TransitionSchema};
pub use crate::params::{InitialConditions, ModelParams};
pub use crate::sim::{Simulation, StochasticSolver};
pub use crate::trackers::ResultsTable;

/// Basic representation of time. This crate measures time in days.
pub type Time = f64;

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;
pub(crate) const INF: Real = Real::INFINITY;
pub(crate) const NAN: Real = Real::NAN;
