use crate::Real;

///////////////////////////////////////////////////////////////////////////////
// Default rates
///////////////////////////////////////////////////////////////////////////////

pub const BIRTH_RATE: Real = 0.0;
pub const MORTALITY_RATE: Real = 0.0;
pub const VACCINATION_RATE: Real = 0.0;
pub const VACCINE_EFFICACY: Real = 0.9;
pub const MATERNAL_IMMUNITY: Real = 0.0;
pub const BETA_EXP: Real = 0.1;
pub const BETA_INF: Real = 0.0;
pub const QUARANTINE_RATE: Real = 0.02;
pub const SEVERE_RATE: Real = 0.01;

// Infectiousness relative to the Infected chain
pub const EPS_EXP: Real = 0.7;
pub const EPS_QUA: Real = 0.3;
pub const EPS_SEV: Real = 0.3;

///////////////////////////////////////////////////////////////////////////////
// Outcomes and healthcare
///////////////////////////////////////////////////////////////////////////////

pub const HOSPITAL_CAPACITY: Real = 3000.0;
pub const GAMMA_MOR: Real = 0.0;
pub const GAMMA_MOR_HOSP: Real = 0.03;
pub const GAMMA_MOR_OVERFLOW: Real = 0.1;
pub const GAMMA_IM: Real = 0.9;

///////////////////////////////////////////////////////////////////////////////
// Time discretization (days)
///////////////////////////////////////////////////////////////////////////////

pub const DT: Real = 1.0 / 24.0;
pub const SIM_LEN: Real = 365.0;
pub const INCUBATION_PERIOD: Real = 5.0;
pub const INFECTIOUS_PERIOD: Real = 14.0;
pub const VACCINATION_PERIOD: Real = 3.0;
pub const REPORT_INTERVAL: usize = 100;
/// Upper bound on the number of time steps spanned by any duration.
pub const MAX_COHORTS: Real = 1.0e7;
pub const SEED: u64 = 1;

// Initial conditions
pub const INIT_SUSCEPTIBLE: Real = 1_000_000.0;
pub const INIT_EXPOSED: Real = 10.0;
