use super::Simulation;
use crate::{
    error::Result,
    models::{Category, CategoryIndex, StateSchema},
    params::ModelParams,
    trackers::ResultsTable,
    utils::{PointStats, PointStatsAcc, Stats},
    Real,
};
use getset::Getters;
use log::info;
use ndarray::Array1;
use rayon::prelude::*;

/// Run one independent simulation per seed, in parallel.
///
/// Every member owns its own solver and population vector. Progress lines
/// are disabled for members. Results are returned in seed order.
pub fn run_ensemble(params: &ModelParams, seeds: &[u64]) -> Result<Vec<ResultsTable>> {
    info!("Running ensemble of {} simulations", seeds.len());
    seeds
        .par_iter()
        .map(|&seed| -> Result<ResultsTable> {
            let mut member = params.clone();
            member.set_seed(seed).set_report_interval(0);
            let mut sim = Simulation::new(member)?;
            sim.run()?;
            Ok(sim.into_results())
        })
        .collect()
}

/// Per-step statistics of an aggregate over the members of an ensemble.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct EnsembleSummary {
    #[getset(get = "pub")]
    steps: Vec<PointStats>,
}

impl EnsembleSummary {
    /// Summarize the dot product of each row with `indicator`. Members may
    /// have different lengths; each step only counts the members that reached
    /// it.
    pub fn new(results: &[ResultsTable], indicator: &Array1<Real>) -> Self {
        let curves: Vec<Vec<Real>> = results.par_iter().map(|r| r.aggregate(indicator)).collect();
        let n = curves.iter().map(|c| c.len()).max().unwrap_or(0);
        let steps = (0..n)
            .map(|i| {
                let mut acc = PointStatsAcc::new();
                acc.add_many(curves.iter().filter_map(|c| c.get(i).copied()));
                acc.stats()
            })
            .collect();
        EnsembleSummary { steps }
    }

    /// Summarize one category of runs sharing the given schema.
    pub fn of_category(results: &[ResultsTable], schema: &StateSchema, category: Category) -> Self {
        let index = CategoryIndex::new(schema);
        Self::new(results, index.indicator(category))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn mean(&self) -> Vec<Real> {
        self.steps.iter().map(|s| s.mean()).collect()
    }

    pub fn min(&self) -> Vec<Real> {
        self.steps.iter().map(|s| s.min()).collect()
    }

    pub fn max(&self) -> Vec<Real> {
        self.steps.iter().map(|s| s.max()).collect()
    }

    pub fn std(&self) -> Vec<Real> {
        self.steps.iter().map(|s| s.std()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::small_params;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn members_match_sequential_runs() {
        let params = small_params();
        let results = run_ensemble(&params, &[1, 2, 1]).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], results[2]);

        let mut sim = Simulation::new(params).unwrap();
        sim.seed(2);
        sim.run().unwrap();
        assert_eq!(&results[1], sim.results());
    }

    #[test]
    fn invalid_params_fail_the_ensemble() {
        let mut params = small_params();
        params.set_beta_inf(0.3);
        assert!(run_ensemble(&params, &[1, 2]).is_err());
    }

    #[test]
    fn summary_statistics() {
        let mut a = ResultsTable::new(2);
        a.push_row(&[1.0, 0.0]);
        a.push_row(&[2.0, 1.0]);
        let mut b = ResultsTable::new(2);
        b.push_row(&[3.0, 0.0]);

        let summary = EnsembleSummary::new(&[a, b], &Array1::from(vec![1.0, 1.0]));
        assert_eq!(summary.len(), 2);
        assert_approx_eq!(summary.mean()[0], 2.0);
        assert_approx_eq!(summary.std()[0], 1.0);
        assert_approx_eq!(summary.mean()[1], 3.0);
        assert_eq!(summary.min(), vec![1.0, 3.0]);
        assert_eq!(summary.max(), vec![3.0, 3.0]);
    }

    #[test]
    fn dead_are_summarized() {
        let mut params = small_params();
        params.set_mortality_rate(0.01).set_sim_len(30.0);
        let results = run_ensemble(&params, &[4, 5, 6]).unwrap();
        let schema = StateSchema::build(&params).unwrap();
        let summary = EnsembleSummary::of_category(&results, &schema, Category::Dead);
        assert_eq!(summary.len(), 31);
        assert_eq!(summary.mean()[0], 0.0);
        assert!(summary.mean()[30] > 0.0);
        assert!(summary.min().iter().zip(summary.max()).all(|(lo, hi)| *lo <= hi));
    }
}
