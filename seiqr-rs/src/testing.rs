//! Shared fixtures for unit tests.
use crate::params::ModelParams;

/// Daily steps and short durations, so schemas are easy to enumerate by hand.
pub(crate) fn small_params() -> ModelParams {
    let mut params = ModelParams::default();
    params
        .set_dt(1.0)
        .set_t_vac(2.0)
        .set_t_exp(3.0)
        .set_t_inf(2.0)
        .set_vaccination_rate(0.02);
    params
}

/// Direct infection path (no incubation seeding), small town, hourly steps.
pub(crate) fn town_params() -> ModelParams {
    let mut params = ModelParams::default();
    params
        .set_beta_exp(0.0)
        .set_beta_inf(0.3)
        .set_sim_len(100.0)
        .set_report_interval(0);
    params
        .initial_mut()
        .set_susceptible(9990.0)
        .set_exposed(0.0)
        .set_infected(10.0);
    params
}
