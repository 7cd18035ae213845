use super::{constants as cte, InitialConditions};
use crate::{error::ConfigError, Real};
use getset::{CopyGetters, Getters, MutGetters, Setters};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// All rate constants, durations, initial populations and toggles of a run.
///
/// Rates are daily, durations are in days and probabilities are applied once
/// per individual reaching the end of a chain. Missing keys in a serialized
/// document take the default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, CopyGetters, Getters, MutGetters, Setters)]
#[serde(default)]
#[getset(set = "pub")]
pub struct ModelParams {
    /// Daily birth rate.
    #[getset(get_copy = "pub")]
    pub(crate) birth_rate: Real,
    /// Daily mortality rate not related to the disease.
    #[getset(get_copy = "pub")]
    pub(crate) mortality_rate: Real,
    /// Daily ratio of the susceptible population getting vaccinated. Zero
    /// disables vaccination edges.
    #[getset(get_copy = "pub")]
    pub(crate) vaccination_rate: Real,
    /// Ratio of vaccinated individuals that end up immunized.
    #[getset(get_copy = "pub")]
    pub(crate) vaccine_efficacy: Real,
    /// Ratio of births that are maternally immunized.
    #[getset(get_copy = "pub")]
    pub(crate) maternal_immunity: Real,
    /// Susceptible to Exposed transmission coefficient.
    #[getset(get_copy = "pub")]
    pub(crate) beta_exp: Real,
    /// Susceptible to Infected transmission coefficient.
    #[getset(get_copy = "pub")]
    pub(crate) beta_inf: Real,
    /// Daily ratio of exposed individuals getting quarantined.
    #[getset(get_copy = "pub")]
    pub(crate) quarantine_rate: Real,
    /// Daily ratio of infected individuals progressing to severe disease.
    #[getset(get_copy = "pub")]
    pub(crate) severe_rate: Real,
    #[getset(get_copy = "pub")]
    pub(crate) eps_exp: Real,
    #[getset(get_copy = "pub")]
    pub(crate) eps_qua: Real,
    #[getset(get_copy = "pub")]
    pub(crate) eps_sev: Real,
    /// Number of severe patients hospitals can accommodate.
    #[getset(get_copy = "pub")]
    pub(crate) hospital_capacity: Real,
    /// Death probability at the end of the Infected chain.
    #[getset(get_copy = "pub")]
    pub(crate) gamma_mor: Real,
    /// Death probability at the end of the Severe chain while under capacity.
    #[getset(get_copy = "pub")]
    pub(crate) gamma_mor_hosp: Real,
    /// Death probability at the end of the Severe chain at or over capacity.
    #[getset(get_copy = "pub")]
    pub(crate) gamma_mor_overflow: Real,
    /// Recovery immunization probability at the end of infection.
    #[getset(get_copy = "pub")]
    pub(crate) gamma_im: Real,
    /// Time step in days.
    #[getset(get_copy = "pub")]
    pub(crate) dt: Real,
    /// Length of the simulation in days.
    #[getset(get_copy = "pub")]
    pub(crate) sim_len: Real,
    /// Incubation period.
    #[getset(get_copy = "pub")]
    pub(crate) t_exp: Real,
    /// Infection period.
    #[getset(get_copy = "pub")]
    pub(crate) t_inf: Real,
    /// Delay between vaccination and immunization.
    #[getset(get_copy = "pub")]
    pub(crate) t_vac: Real,
    /// Emit a progress line every `report_interval` steps. Zero disables it.
    #[getset(get_copy = "pub")]
    pub(crate) report_interval: usize,
    #[getset(get_copy = "pub")]
    pub(crate) seed: u64,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) initial: InitialConditions,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            birth_rate: cte::BIRTH_RATE,
            mortality_rate: cte::MORTALITY_RATE,
            vaccination_rate: cte::VACCINATION_RATE,
            vaccine_efficacy: cte::VACCINE_EFFICACY,
            maternal_immunity: cte::MATERNAL_IMMUNITY,
            beta_exp: cte::BETA_EXP,
            beta_inf: cte::BETA_INF,
            quarantine_rate: cte::QUARANTINE_RATE,
            severe_rate: cte::SEVERE_RATE,
            eps_exp: cte::EPS_EXP,
            eps_qua: cte::EPS_QUA,
            eps_sev: cte::EPS_SEV,
            hospital_capacity: cte::HOSPITAL_CAPACITY,
            gamma_mor: cte::GAMMA_MOR,
            gamma_mor_hosp: cte::GAMMA_MOR_HOSP,
            gamma_mor_overflow: cte::GAMMA_MOR_OVERFLOW,
            gamma_im: cte::GAMMA_IM,
            dt: cte::DT,
            sim_len: cte::SIM_LEN,
            t_exp: cte::INCUBATION_PERIOD,
            t_inf: cte::INFECTIOUS_PERIOD,
            t_vac: cte::VACCINATION_PERIOD,
            report_interval: cte::REPORT_INTERVAL,
            seed: cte::SEED,
            initial: InitialConditions::default(),
        }
    }
}

impl ModelParams {
    /// Parse parameters from a TOML document.
    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(data)?)
    }

    /// Read parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Check that parameters describe a runnable model.
    ///
    /// Exactly one of `beta_exp` and `beta_inf` must be non-zero. This is
    /// checked first, before any other constraint.
    pub fn check_init(&self) -> Result<(), ConfigError> {
        match (self.beta_exp != 0.0, self.beta_inf != 0.0) {
            (false, false) => return Err(ConfigError::BothTransmissionZero),
            (true, true) => return Err(ConfigError::BothTransmissionNonZero),
            _ => (),
        }

        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::invalid(
                "dt",
                self.dt,
                "time step must be positive and finite",
            ));
        }
        check_non_negative!(self: {
            birth_rate,
            mortality_rate,
            vaccination_rate,
            beta_exp,
            beta_inf,
            quarantine_rate,
            severe_rate,
            eps_exp,
            eps_qua,
            eps_sev,
            hospital_capacity,
            sim_len,
            t_exp,
            t_inf,
            t_vac,
        });
        check_probability!(self: {
            vaccine_efficacy,
            maternal_immunity,
            gamma_mor,
            gamma_mor_hosp,
            gamma_mor_overflow,
            gamma_im,
        });

        let spans = [
            ("t_vac", self.t_vac),
            ("t_exp", self.t_exp),
            ("t_inf", self.t_inf),
            ("sim_len", self.sim_len),
        ];
        for &(name, duration) in spans.iter() {
            if (duration / self.dt).round() > cte::MAX_COHORTS {
                return Err(ConfigError::invalid(
                    name,
                    duration,
                    "spans too many time steps",
                ));
            }
        }

        if self.n_inf() == 0 {
            return Err(ConfigError::invalid(
                "t_inf",
                self.t_inf,
                "infection period must span at least one time step",
            ));
        }
        if self.vaccination_rate != 0.0 && self.n_vac() == 0 {
            return Err(ConfigError::invalid(
                "t_vac",
                self.t_vac,
                "vaccination requires at least one vaccinated cohort",
            ));
        }
        if self.beta_exp != 0.0 && self.n_exp() == 0 {
            return Err(ConfigError::invalid(
                "t_exp",
                self.t_exp,
                "transmission through exposure requires at least one exposed cohort",
            ));
        }

        let outcomes = [
            ("gamma_mor", self.gamma_mor),
            ("gamma_mor_hosp", self.gamma_mor_hosp),
            ("gamma_mor_overflow", self.gamma_mor_overflow),
        ];
        for &(name, gamma) in outcomes.iter() {
            if gamma + self.gamma_im > 1.0 {
                warn!(
                    "{} + gamma_im exceeds 1, relapse flows will be clamped to zero",
                    name
                );
            }
        }

        info!("Initialization was done properly!");
        Ok(())
    }

    /// Number of cohorts spanning the given duration.
    pub fn cohorts(&self, duration: Real) -> usize {
        (duration / self.dt).round() as usize
    }

    /// Number of Vaccinated cohorts.
    pub fn n_vac(&self) -> usize {
        self.cohorts(self.t_vac)
    }

    /// Number of Exposed (and Quarantined) cohorts.
    pub fn n_exp(&self) -> usize {
        self.cohorts(self.t_exp)
    }

    /// Number of Infected (and Severe) cohorts.
    pub fn n_inf(&self) -> usize {
        self.cohorts(self.t_inf)
    }

    /// Number of rows recorded by a full run.
    pub fn n_steps(&self) -> usize {
        self.cohorts(self.sim_len) + 1
    }

    /// Death probability at the end of the Severe chain given the current
    /// number of severe patients.
    pub fn severe_mortality(&self, severe: Real) -> Real {
        if severe < self.hospital_capacity {
            self.gamma_mor_hosp
        } else {
            self.gamma_mor_overflow
        }
    }
}
