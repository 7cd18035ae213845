//! Storage for simulation outputs.
mod results_table;

pub use results_table::*;
