//! This module declares parameters for the seiqr crate.
//!
//! The model is driven by roughly thirty scalar rates, probabilities and
//! durations plus the initial head count of each stage. They are plain data,
//! serializable to and from TOML, and validated once by
//! [`ModelParams::check_init`] before any state is built.
#[macro_use]
mod macros;
mod constants;
mod initial;
mod model_params;

pub use constants::*;
pub use initial::*;
pub use model_params::*;
