use super::{Category, StateSchema, SubState};
use crate::params::ModelParams;
use log::info;

/// Which infection chain a terminal branch leaves from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Ward {
    Infected,
    Severe,
}

impl Ward {
    pub fn category(self) -> Category {
        match self {
            Ward::Infected => Category::Infected,
            Ward::Severe => Category::Severe,
        }
    }
}

/// The dynamics an edge stands for. Selects the expected-flow formula used by
/// the solver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EdgeKind {
    /// Birth -> Susceptible.
    Birth,
    /// Birth -> Maternally immunized.
    MaternalBirth,
    /// Any living sub-state -> Dead, unrelated to the disease.
    Mortality,
    /// Susceptible -> Vaccinated[1].
    Vaccination,
    /// Vaccinated[i] -> Vaccinated[i+1].
    VaccinatedAdvance,
    /// Vaccinated[n] -> Vaccination immunized.
    VaccineImmunization,
    /// Vaccinated[n] -> Susceptible.
    VaccineFailure,
    /// Susceptible -> Exposed[1].
    Exposure,
    /// Susceptible -> Infected[1], skipping incubation.
    Infection,
    /// Exposed[i] -> Exposed[i+1].
    ExposedAdvance,
    /// Exposed[n] -> Infected[1].
    IncubationEnd,
    /// Exposed[i] -> Quarantined[i+1].
    Quarantine,
    /// Quarantined[i] -> Quarantined[i+1].
    QuarantinedAdvance,
    /// Quarantined[n] -> Infected[1].
    QuarantineEnd,
    /// Infected[i] -> Infected[i+1].
    InfectedAdvance,
    /// Severe[i] -> Severe[i+1].
    SevereAdvance,
    /// Infected[i] -> Severe[i+1].
    Progression,
    /// Last cohort -> Recovery immunized.
    Recovery(Ward),
    /// Last cohort -> Susceptible.
    Relapse(Ward),
    /// Last cohort -> Dead.
    DiseaseDeath(Ward),
}

/// A directed edge between two positions of the population vector.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub source: usize,
    pub dest: usize,
}

/// The ordered list of edges permitted by the dynamics.
///
/// The order is observable: the solver applies draws edge by edge, so
/// sources with several outgoing edges are depleted first-come-first-served.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSchema {
    edges: Vec<Edge>,
}

impl TransitionSchema {
    /// Enumerate every edge of the model.
    ///
    /// Edges that only make sense with vaccination (or incubation) are left
    /// out when the vaccination rate (or the number of exposed cohorts) is
    /// zero.
    pub fn build(schema: &StateSchema, params: &ModelParams) -> Self {
        use Category::*;

        let n_vac = schema.cohorts(Vaccinated);
        let n_exp = schema.cohorts(Exposed);
        let n_inf = schema.cohorts(Infected);
        let vaccination = params.vaccination_rate() != 0.0;

        let single = SubState::single;
        let cohort = SubState::cohort;
        let mut builder = EdgeBuilder {
            schema,
            edges: Vec::with_capacity(2 * schema.len() + 2 * n_exp + n_inf),
        };

        builder.link(EdgeKind::Birth, single(Birth), single(Susceptible));
        builder.link(EdgeKind::MaternalBirth, single(Birth), single(MaternallyImmunized));

        for &st in schema.states() {
            if st.category != Birth && st.category != Dead {
                builder.link(EdgeKind::Mortality, st, single(Dead));
            }
        }

        if vaccination {
            builder.link(EdgeKind::Vaccination, single(Susceptible), cohort(Vaccinated, 1));
        }
        builder.advance(EdgeKind::VaccinatedAdvance, Vaccinated, n_vac);
        if vaccination {
            builder.link(
                EdgeKind::VaccineImmunization,
                cohort(Vaccinated, n_vac),
                single(VaccinationImmunized),
            );
            builder.link(EdgeKind::VaccineFailure, cohort(Vaccinated, n_vac), single(Susceptible));
        }

        if n_exp != 0 {
            builder.link(EdgeKind::Exposure, single(Susceptible), cohort(Exposed, 1));
        }
        builder.link(EdgeKind::Infection, single(Susceptible), cohort(Infected, 1));

        builder.advance(EdgeKind::ExposedAdvance, Exposed, n_exp);
        if n_exp != 0 {
            builder.link(EdgeKind::IncubationEnd, cohort(Exposed, n_exp), cohort(Infected, 1));
        }
        for k in 1..n_exp {
            builder.link(EdgeKind::Quarantine, cohort(Exposed, k), cohort(Quarantined, k + 1));
        }
        builder.advance(EdgeKind::QuarantinedAdvance, Quarantined, n_exp);
        if n_exp != 0 {
            builder.link(EdgeKind::QuarantineEnd, cohort(Quarantined, n_exp), cohort(Infected, 1));
        }

        builder.advance(EdgeKind::InfectedAdvance, Infected, n_inf);
        builder.advance(EdgeKind::SevereAdvance, Severe, n_inf);
        for k in 1..n_inf {
            builder.link(EdgeKind::Progression, cohort(Infected, k), cohort(Severe, k + 1));
        }

        let tails = [
            (Ward::Infected, cohort(Infected, n_inf)),
            (Ward::Severe, cohort(Severe, n_inf)),
        ];
        for &(ward, tail) in tails.iter() {
            builder.link(EdgeKind::Recovery(ward), tail, single(RecoveryImmunized));
        }
        for &(ward, tail) in tails.iter() {
            builder.link(EdgeKind::Relapse(ward), tail, single(Susceptible));
        }
        for &(ward, tail) in tails.iter() {
            builder.link(EdgeKind::DiseaseDeath(ward), tail, single(Dead));
        }

        let edges = builder.edges;
        info!("State transitions were created ({} edges)", edges.len());
        TransitionSchema { edges }
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in application order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Edges as (source name, destination name) pairs.
    pub fn describe(&self, schema: &StateSchema) -> Vec<(String, String)> {
        self.edges
            .iter()
            .map(|e| (schema.states()[e.source].to_string(), schema.states()[e.dest].to_string()))
            .collect()
    }
}

struct EdgeBuilder<'a> {
    schema: &'a StateSchema,
    edges: Vec<Edge>,
}

impl<'a> EdgeBuilder<'a> {
    fn link(&mut self, kind: EdgeKind, source: SubState, dest: SubState) {
        self.edges.push(Edge {
            kind,
            source: self.schema.index(source),
            dest: self.schema.index(dest),
        });
    }

    /// Chain k -> k+1 for every cohort but the last.
    fn advance(&mut self, kind: EdgeKind, category: Category, n: usize) {
        for k in 1..n {
            self.link(
                kind,
                SubState::cohort(category, k),
                SubState::cohort(category, k + 1),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::small_params;

    fn build(params: &ModelParams) -> (StateSchema, TransitionSchema) {
        let schema = StateSchema::build(params).unwrap();
        let transitions = TransitionSchema::build(&schema, params);
        (schema, transitions)
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn full_edge_list() {
        let (schema, transitions) = build(&small_params());
        let mut expected = vec![
            pair("Birth", "Susceptible"),
            pair("Birth", "Maternally_Immunized"),
        ];
        for name in &schema.names()[1..schema.len() - 1] {
            expected.push(pair(name, "Dead"));
        }
        expected.extend(vec![
            pair("Susceptible", "Vaccinated_1"),
            pair("Vaccinated_1", "Vaccinated_2"),
            pair("Vaccinated_2", "Vaccination_Immunized"),
            pair("Vaccinated_2", "Susceptible"),
            pair("Susceptible", "Exposed_1"),
            pair("Susceptible", "Infected_1"),
            pair("Exposed_1", "Exposed_2"),
            pair("Exposed_2", "Exposed_3"),
            pair("Exposed_3", "Infected_1"),
            pair("Exposed_1", "Quarantined_2"),
            pair("Exposed_2", "Quarantined_3"),
            pair("Quarantined_1", "Quarantined_2"),
            pair("Quarantined_2", "Quarantined_3"),
            pair("Quarantined_3", "Infected_1"),
            pair("Infected_1", "Infected_2"),
            pair("Severe_Infected_1", "Severe_Infected_2"),
            pair("Infected_1", "Severe_Infected_2"),
            pair("Infected_2", "Recovery_Immunized"),
            pair("Severe_Infected_2", "Recovery_Immunized"),
            pair("Infected_2", "Susceptible"),
            pair("Severe_Infected_2", "Susceptible"),
            pair("Infected_2", "Dead"),
            pair("Severe_Infected_2", "Dead"),
        ]);
        assert_eq!(transitions.describe(&schema), expected);
        assert_eq!(transitions.len(), 41);
    }

    #[test]
    fn vaccination_edges_need_a_rate() {
        let mut params = small_params();
        params.set_vaccination_rate(0.0);
        let (schema, transitions) = build(&params);
        let kinds: Vec<EdgeKind> = transitions.iter().map(|e| e.kind).collect();
        assert!(!kinds.contains(&EdgeKind::Vaccination));
        assert!(!kinds.contains(&EdgeKind::VaccineImmunization));
        assert!(!kinds.contains(&EdgeKind::VaccineFailure));
        // The chain itself only depends on the number of cohorts
        assert!(kinds.contains(&EdgeKind::VaccinatedAdvance));
        assert_eq!(transitions.len(), 38);
        assert_eq!(schema.len(), 18);
    }

    #[test]
    fn direct_infection_without_incubation() {
        let mut params = small_params();
        params.set_beta_exp(0.0).set_beta_inf(0.2).set_t_exp(0.0);
        let (schema, transitions) = build(&params);
        assert_eq!(schema.cohorts(Category::Exposed), 0);
        let kinds: Vec<EdgeKind> = transitions.iter().map(|e| e.kind).collect();
        assert!(!kinds.contains(&EdgeKind::Exposure));
        assert!(!kinds.contains(&EdgeKind::Quarantine));
        assert!(!kinds.contains(&EdgeKind::IncubationEnd));
        assert!(!kinds.contains(&EdgeKind::QuarantineEnd));
        assert!(kinds.contains(&EdgeKind::Infection));
    }

    #[test]
    fn every_non_terminal_state_has_an_exit() {
        let (schema, transitions) = build(&small_params());
        for (i, st) in schema.states().iter().enumerate() {
            let exits = transitions.iter().filter(|e| e.source == i).count();
            if st.category == Category::Dead {
                assert_eq!(exits, 0);
            } else {
                assert!(exits > 0, "{} has no outgoing edge", st);
            }
        }
    }

    #[test]
    fn deterministic_build() {
        let params = ModelParams::default();
        let (schema, a) = build(&params);
        let b = TransitionSchema::build(&schema, &params);
        assert_eq!(a, b);
    }
}
