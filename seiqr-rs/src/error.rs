use crate::Real;
use std::io;

/// Crate-level result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of the initialization check and of loading a configuration.
///
/// A run must not build any state or transition after one of those.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("both beta_exp and beta_inf cannot be zero")]
    BothTransmissionZero,
    #[error("both beta_exp and beta_inf cannot be non-zero")]
    BothTransmissionNonZero,
    #[error("invalid value {value} for {name}: {reason}")]
    InvalidParam {
        name: &'static str,
        value: Real,
        reason: &'static str,
    },
    #[error("could not read configuration: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, value: Real, reason: &'static str) -> Self {
        ConfigError::InvalidParam {
            name,
            value,
            reason,
        }
    }
}

/// Errors surfaced by construction and stepping of a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("living population is {total} at step {step}, force of infection is undefined")]
    ExtinctPopulation { step: usize, total: Real },
    #[error("could not write results: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not write results: {0}")]
    Io(#[from] io::Error),
}
