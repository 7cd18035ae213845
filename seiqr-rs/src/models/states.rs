use super::{Category, SubState};
use crate::{error::ConfigError, params::ModelParams, Real};
use log::{debug, info, warn};
use ndarray::Array1;
use std::{collections::HashMap, ops::Range};

/// The ordered list of sub-states of a run and its initial population vector.
///
/// Built once from [`ModelParams`]; the position of each sub-state is its
/// index in every population vector and results row of the run.
#[derive(Clone, Debug)]
pub struct StateSchema {
    states: Vec<SubState>,
    lookup: HashMap<SubState, usize>,
    chains: HashMap<Category, Range<usize>>,
    initial: Array1<Real>,
}

impl StateSchema {
    /// Expand the model stages into sub-states.
    ///
    /// The initialization check runs first; nothing is built if it fails.
    pub fn build(params: &ModelParams) -> Result<Self, ConfigError> {
        params.check_init()?;

        let init = params.initial();
        let n_vac = params.n_vac();
        let n_exp = params.n_exp();
        let n_inf = params.n_inf();
        let mut builder = SchemaBuilder::with_capacity(6 + n_vac + 2 * n_exp + 2 * n_inf);

        builder.single(Category::Birth, 0.0);
        builder.single(Category::Susceptible, init.susceptible());
        builder.chain(Category::Vaccinated, n_vac, init.vaccinated());
        builder.chain(Category::Exposed, n_exp, init.exposed());
        builder.chain(Category::Quarantined, n_exp, init.quarantined());
        builder.chain(Category::Infected, n_inf, init.infected());
        builder.chain(Category::Severe, n_inf, init.severe());
        builder.single(Category::VaccinationImmunized, init.vaccination_immunized());
        builder.single(Category::MaternallyImmunized, init.maternally_immunized());
        builder.single(Category::RecoveryImmunized, init.recovery_immunized());
        builder.single(Category::Dead, 0.0);

        let schema = builder.finish();
        debug!(
            "Cohorts: {} vaccinated, {} exposed, {} infected",
            n_vac, n_exp, n_inf
        );
        info!("States were created ({} sub-states)", schema.len());
        Ok(schema)
    }

    /// Number of sub-states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Sub-states in vector order.
    pub fn states(&self) -> &[SubState] {
        &self.states
    }

    /// Sub-state at the given position.
    pub fn get(&self, i: usize) -> Option<SubState> {
        self.states.get(i).copied()
    }

    /// Position of the given sub-state, if it exists in this schema.
    pub fn index_of(&self, state: SubState) -> Option<usize> {
        self.lookup.get(&state).copied()
    }

    /// Position of the given sub-state.
    ///
    /// Panics if the sub-state does not exist. Builders only ask for states
    /// they created, so a miss is a logic error.
    pub fn index(&self, state: SubState) -> usize {
        match self.index_of(state) {
            Some(i) => i,
            None => panic!("sub-state {} is not part of the schema", state),
        }
    }

    /// Positions of all cohorts of a chain category (or of the single state of
    /// any other category). The range is empty for chains without cohorts.
    pub fn chain(&self, category: Category) -> Range<usize> {
        self.chains.get(&category).cloned().unwrap_or(0..0)
    }

    /// Number of cohorts in a chain category.
    pub fn cohorts(&self, category: Category) -> usize {
        self.chain(category).len()
    }

    /// Display names in vector order.
    pub fn names(&self) -> Vec<String> {
        self.states.iter().map(|st| st.to_string()).collect()
    }

    /// The initial population vector.
    pub fn initial_population(&self) -> Array1<Real> {
        self.initial.clone()
    }
}

/// Accumulates sub-states before they are frozen into a [`StateSchema`].
struct SchemaBuilder {
    states: Vec<SubState>,
    initial: Vec<Real>,
    chains: HashMap<Category, Range<usize>>,
}

impl SchemaBuilder {
    fn with_capacity(n: usize) -> Self {
        SchemaBuilder {
            states: Vec::with_capacity(n),
            initial: Vec::with_capacity(n),
            chains: HashMap::new(),
        }
    }

    fn single(&mut self, category: Category, value: Real) {
        let i = self.states.len();
        self.states.push(SubState::single(category));
        self.initial.push(value);
        self.chains.insert(category, i..i + 1);
    }

    /// Push n cohorts. Only the first one receives the initial value.
    fn chain(&mut self, category: Category, n: usize, head_value: Real) {
        let start = self.states.len();
        if n == 0 && head_value != 0.0 {
            warn!(
                "{} has no cohorts, ignoring initial value {}",
                category, head_value
            );
        }
        for k in 1..=n {
            self.states.push(SubState::cohort(category, k));
            self.initial.push(if k == 1 { head_value } else { 0.0 });
        }
        self.chains.insert(category, start..start + n);
    }

    fn finish(self) -> StateSchema {
        let lookup = self
            .states
            .iter()
            .enumerate()
            .map(|(i, st)| (*st, i))
            .collect();
        StateSchema {
            states: self.states,
            lookup,
            chains: self.chains,
            initial: Array1::from(self.initial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::small_params;

    #[test]
    fn build_order() {
        let schema = StateSchema::build(&small_params()).unwrap();
        assert_eq!(
            schema.names(),
            vec![
                "Birth",
                "Susceptible",
                "Vaccinated_1",
                "Vaccinated_2",
                "Exposed_1",
                "Exposed_2",
                "Exposed_3",
                "Quarantined_1",
                "Quarantined_2",
                "Quarantined_3",
                "Infected_1",
                "Infected_2",
                "Severe_Infected_1",
                "Severe_Infected_2",
                "Vaccination_Immunized",
                "Maternally_Immunized",
                "Recovery_Immunized",
                "Dead",
            ]
        );
        assert_eq!(schema.chain(Category::Exposed), 4..7);
        assert_eq!(schema.chain(Category::Dead), 17..18);
        assert_eq!(schema.index(SubState::cohort(Category::Infected, 2)), 11);
    }

    #[test]
    fn only_first_cohorts_are_seeded() {
        let mut params = small_params();
        params
            .initial_mut()
            .set_exposed(10.0)
            .set_infected(3.0)
            .set_severe(2.0)
            .set_recovery_immunized(7.0);
        let schema = StateSchema::build(&params).unwrap();
        let x = schema.initial_population();

        assert_eq!(x[schema.index(SubState::cohort(Category::Exposed, 1))], 10.0);
        assert_eq!(x[schema.index(SubState::cohort(Category::Exposed, 2))], 0.0);
        assert_eq!(x[schema.index(SubState::cohort(Category::Infected, 1))], 3.0);
        assert_eq!(x[schema.index(SubState::cohort(Category::Severe, 1))], 2.0);
        assert_eq!(x[schema.index(SubState::single(Category::RecoveryImmunized))], 7.0);
        assert_eq!(x[0], 0.0);
        assert_eq!(x[schema.len() - 1], 0.0);
        assert_eq!(x.sum(), params.initial().total());
    }

    #[test]
    fn cohort_count_law() {
        let params = ModelParams::default();
        let schema = StateSchema::build(&params).unwrap();
        assert_eq!(schema.cohorts(Category::Exposed), 120);
        assert_eq!(schema.cohorts(Category::Quarantined), 120);
        assert_eq!(schema.cohorts(Category::Infected), 336);
        assert_eq!(schema.cohorts(Category::Severe), 336);
        assert_eq!(schema.len(), 6 + 72 + 2 * 120 + 2 * 336);
    }

    #[test]
    fn deterministic_build() {
        let params = ModelParams::default();
        let a = StateSchema::build(&params).unwrap();
        let b = StateSchema::build(&params).unwrap();
        assert_eq!(a.states(), b.states());
        assert_eq!(a.initial_population(), b.initial_population());
    }

    #[test]
    fn failed_check_builds_nothing() {
        let mut params = ModelParams::default();
        params.set_beta_inf(0.5);
        assert!(matches!(
            StateSchema::build(&params),
            Err(ConfigError::BothTransmissionNonZero)
        ));
    }

    #[test]
    #[should_panic(expected = "not part of the schema")]
    fn missing_sub_state_is_fatal() {
        let schema = StateSchema::build(&small_params()).unwrap();
        schema.index(SubState::cohort(Category::Exposed, 4));
    }
}
