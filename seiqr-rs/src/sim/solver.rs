use super::sampling::stochastic_round;
use crate::{
    error::{Error, Result},
    models::{Category, CategoryIndex, EdgeKind, StateSchema, TransitionSchema, Ward},
    params::ModelParams,
    Real,
};
use getset::Getters;
use log::trace;
use ndarray::Array1;
use rand::Rng;

/// Aggregates of the start-of-step population that every expected flow of
/// a step depends on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StepState {
    /// Everybody alive: all sub-states but Birth and Dead.
    pub total_pop: Real,
    /// Infectious pressure exerted on the susceptible pool.
    pub pressure: Real,
    /// Aggregate Severe population.
    pub severe: Real,
    /// Death probability at the end of the Severe chain for this step.
    pub severe_mortality: Real,
}

/// Discrete-time stochastic solver.
///
/// Each step computes the expected flow of every edge from the start-of-step
/// vector, samples an integer flow for each and then applies the draws edge
/// by edge in schema order.
#[derive(Debug, Clone, Getters)]
pub struct StochasticSolver {
    #[getset(get = "pub")]
    params: ModelParams,
    #[getset(get = "pub")]
    schema: StateSchema,
    #[getset(get = "pub")]
    transitions: TransitionSchema,
    #[getset(get = "pub")]
    index: CategoryIndex,
    flows: Vec<Real>,
    draws: Vec<Real>,
    birth: usize,
    susceptible: usize,
}

impl StochasticSolver {
    /// Validate parameters and build the state and transition schemas.
    pub fn new(params: ModelParams) -> Result<Self> {
        let schema = StateSchema::build(&params)?;
        let transitions = TransitionSchema::build(&schema, &params);
        let index = CategoryIndex::new(&schema);
        let n = transitions.len();
        let birth = schema.chain(Category::Birth).start;
        let susceptible = schema.chain(Category::Susceptible).start;
        Ok(StochasticSolver {
            params,
            schema,
            transitions,
            index,
            flows: vec![0.0; n],
            draws: vec![0.0; n],
            birth,
            susceptible,
        })
    }

    /// Initial population vector.
    pub fn initial_population(&self) -> Array1<Real> {
        self.schema.initial_population()
    }

    /// Compute the aggregates of the given vector. Fails if nobody is alive,
    /// since the force of infection divides by the total population.
    pub fn step_state(&self, x: &Array1<Real>, n: usize) -> Result<StepState> {
        let p = &self.params;
        let total_pop = self.index.living_total(x);
        if !(total_pop > 0.0) {
            return Err(Error::ExtinctPopulation {
                step: n,
                total: total_pop,
            });
        }
        let totals = self.index.totals(x);
        let total = |cat: Category| totals[cat.ordinal()];
        let severe = total(Category::Severe);
        let pressure = total(Category::Infected)
            + p.eps_exp() * total(Category::Exposed)
            + p.eps_sev() * severe
            + p.eps_qua() * total(Category::Quarantined);

        Ok(StepState {
            total_pop,
            pressure,
            severe,
            severe_mortality: p.severe_mortality(severe),
        })
    }

    /// Expected flow of each edge, in edge order. Negative weights are
    /// clamped to zero.
    pub fn expected_flows(&self, x: &Array1<Real>, n: usize) -> Result<Vec<Real>> {
        let mut out = vec![0.0; self.transitions.len()];
        self.fill_expected_flows(x, n, &mut out)?;
        Ok(out)
    }

    fn fill_expected_flows(&self, x: &Array1<Real>, n: usize, out: &mut [Real]) -> Result<()> {
        let st = self.step_state(x, n)?;
        let p = &self.params;
        let dt = p.dt();
        let survive = 1.0 - p.mortality_rate() * dt;
        let births = st.total_pop * p.birth_rate() * dt;
        let infection = x[self.susceptible] * st.pressure * dt / st.total_pop;
        let gamma_mor = |ward: Ward| match ward {
            Ward::Infected => p.gamma_mor(),
            Ward::Severe => st.severe_mortality,
        };

        for (o, edge) in out.iter_mut().zip(self.transitions.iter()) {
            let src = x[edge.source];
            let e = match edge.kind {
                EdgeKind::Birth => births * (1.0 - p.maternal_immunity()),
                EdgeKind::MaternalBirth => births * p.maternal_immunity(),
                EdgeKind::Mortality => src * p.mortality_rate() * dt,
                EdgeKind::Vaccination => src * p.vaccination_rate() * dt,
                EdgeKind::VaccinatedAdvance => src * survive,
                EdgeKind::VaccineImmunization => src * p.vaccine_efficacy(),
                EdgeKind::VaccineFailure => src * (survive - p.vaccine_efficacy()),
                EdgeKind::Exposure => infection * p.beta_exp(),
                EdgeKind::Infection => infection * p.beta_inf(),
                EdgeKind::ExposedAdvance => src * (survive - p.quarantine_rate() * dt),
                EdgeKind::Quarantine => src * p.quarantine_rate() * dt,
                EdgeKind::IncubationEnd
                | EdgeKind::QuarantinedAdvance
                | EdgeKind::QuarantineEnd
                | EdgeKind::SevereAdvance => src * survive,
                EdgeKind::InfectedAdvance => src * (survive - p.severe_rate() * dt),
                EdgeKind::Progression => src * p.severe_rate() * dt,
                EdgeKind::Recovery(_) => src * p.gamma_im(),
                EdgeKind::Relapse(ward) => src * (1.0 - gamma_mor(ward) - p.gamma_im()),
                EdgeKind::DiseaseDeath(ward) => src * gamma_mor(ward),
            };
            *o = e.max(0.0);
        }
        Ok(())
    }

    /// Apply integer draws to the population vector, edge by edge.
    ///
    /// Births add newborns to their destination and leave the Birth entry
    /// untouched. Draws out of Susceptible are moved as sampled, even past
    /// zero. For any other source, a draw that would leave it empty or
    /// negative moves everything left in the source instead.
    pub fn apply(&self, x: &mut Array1<Real>, draws: &[Real]) {
        for (edge, &dx) in self.transitions.iter().zip(draws) {
            let (s, d) = (edge.source, edge.dest);
            if s == self.birth {
                x[d] += dx;
            } else if s == self.susceptible {
                x[s] -= dx;
                x[d] += dx;
            } else if x[s] - dx <= 0.0 {
                x[d] += x[s];
                x[s] = 0.0;
            } else {
                x[s] -= dx;
                x[d] += dx;
            }
        }
    }

    /// Advance the population vector by one time step.
    ///
    /// All flows are computed from the vector as it is when the step starts.
    /// `n` is the step number, used for diagnostics only.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        x: &mut Array1<Real>,
        n: usize,
        rng: &mut R,
    ) -> Result<()> {
        let mut flows = std::mem::take(&mut self.flows);
        let res = self.fill_expected_flows(x, n, &mut flows);
        if let Err(e) = res {
            self.flows = flows;
            return Err(e);
        }
        for (dx, &e) in self.draws.iter_mut().zip(&flows) {
            *dx = stochastic_round(e, rng);
        }
        self.flows = flows;
        trace!("step {}: {} births", n, self.draws[0]);
        self.apply(x, &self.draws);
        Ok(())
    }
}
