//! Time stepping: the stochastic solver, the simulation driver and its
//! reporters, and parallel ensembles of independent runs.
mod ensemble;
mod reporter;
mod sampling;
mod simulation;
mod solver;

pub use ensemble::*;
pub use reporter::*;
pub use sampling::*;
pub use simulation::*;
pub use solver::*;
