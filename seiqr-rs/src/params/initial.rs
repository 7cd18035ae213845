use super::constants as cte;
use crate::Real;
use getset::{CopyGetters, Setters};
use serde::{Deserialize, Serialize};

/// Initial head counts. Each stage seeds only its first cohort.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, CopyGetters, Setters)]
#[serde(default)]
#[getset(get_copy = "pub", set = "pub")]
pub struct InitialConditions {
    pub(crate) susceptible: Real,
    pub(crate) vaccinated: Real,
    pub(crate) exposed: Real,
    pub(crate) quarantined: Real,
    pub(crate) infected: Real,
    pub(crate) severe: Real,
    pub(crate) vaccination_immunized: Real,
    pub(crate) maternally_immunized: Real,
    pub(crate) recovery_immunized: Real,
}

impl InitialConditions {
    /// Total number of individuals described by the initial conditions.
    pub fn total(&self) -> Real {
        self.susceptible
            + self.vaccinated
            + self.exposed
            + self.quarantined
            + self.infected
            + self.severe
            + self.vaccination_immunized
            + self.maternally_immunized
            + self.recovery_immunized
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            susceptible: cte::INIT_SUSCEPTIBLE,
            vaccinated: 0.0,
            exposed: cte::INIT_EXPOSED,
            quarantined: 0.0,
            infected: 0.0,
            severe: 0.0,
            vaccination_immunized: 0.0,
            maternally_immunized: 0.0,
            recovery_immunized: 0.0,
        }
    }
}
