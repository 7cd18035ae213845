use super::{ProgressReporter, Reporter, StochasticSolver};
use crate::{
    error::Result,
    models::{Category, CategoryIndex, StateSchema},
    params::ModelParams,
    trackers::ResultsTable,
    Real, Time,
};
use getset::{CopyGetters, Getters};
use log::{debug, info};
use ndarray::Array1;
use rand::{rngs::SmallRng, SeedableRng};

/// Simulation owns the population vector and the solver that evolves it, and
/// records the vector once per time step.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Simulation {
    #[getset(get = "pub")]
    solver: StochasticSolver,
    #[getset(get = "pub")]
    population: Array1<Real>,
    #[getset(get = "pub")]
    results: ResultsTable,
    #[getset(get_copy = "pub")]
    n_iter: usize,
    rng: SmallRng,
}

impl Simulation {
    /// Validate parameters, build the model and seed the random number
    /// generator from `params.seed`.
    pub fn new(params: ModelParams) -> Result<Self> {
        let seed = params.seed();
        let solver = StochasticSolver::new(params)?;
        let population = solver.initial_population();
        let results = ResultsTable::with_capacity(population.len(), solver.params().n_steps());
        Ok(Simulation {
            solver,
            population,
            results,
            n_iter: 0,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Set seed for random number generator.
    pub fn seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn params(&self) -> &ModelParams {
        self.solver.params()
    }

    pub fn schema(&self) -> &StateSchema {
        self.solver.schema()
    }

    pub fn index(&self) -> &CategoryIndex {
        self.solver.index()
    }

    /// Simulated time of the current population vector, in days.
    pub fn time(&self) -> Time {
        self.n_iter as Time * self.params().dt()
    }

    /// Record the current vector and advance it by one step.
    pub fn step(&mut self) -> Result<()> {
        match self.population.as_slice() {
            Some(row) => self.results.push_row(row),
            None => self.results.push_row(&self.population.to_vec()),
        }
        self.solver
            .step(&mut self.population, self.n_iter, &mut self.rng)?;
        self.n_iter += 1;
        Ok(())
    }

    /// Run the full horizon, logging progress every `report_interval` steps.
    pub fn run(&mut self) -> Result<&ResultsTable> {
        let reporter = ProgressReporter::new(self.params().report_interval(), self.params().n_steps());
        self.run_with(reporter)
    }

    /// Run the full horizon, calling the reporter after each step.
    ///
    /// The results table receives one row per step, holding the vector as it
    /// was before the step, so the first row is the initial population.
    pub fn run_with<R: Reporter>(&mut self, mut reporter: R) -> Result<&ResultsTable> {
        let n_steps = self.params().n_steps();
        info!("Running {} steps of {} days", n_steps, self.params().dt());
        for n in 0..n_steps {
            self.step()?;
            reporter.process(n, self.solver.params(), &self.population);
        }
        debug!(
            "Finished with {} dead and {} alive",
            self.index().dead_total(&self.population),
            self.index().living_total(&self.population)
        );
        Ok(&self.results)
    }

    /// Time of each recorded row, in days.
    pub fn times(&self) -> Vec<Time> {
        let dt = self.params().dt();
        (0..self.results.nrows()).map(|i| i as Time * dt).collect()
    }

    /// Aggregate time series of one category.
    pub fn curve(&self, category: Category) -> Vec<Real> {
        self.results.aggregate(self.index().indicator(category))
    }

    /// Aggregate time series of all immunized categories.
    pub fn immunized_curve(&self) -> Vec<Real> {
        let ind = self.index().indicator_of(&[
            Category::VaccinationImmunized,
            Category::MaternallyImmunized,
            Category::RecoveryImmunized,
        ]);
        self.results.aggregate(&ind)
    }

    /// Category aggregates per row with a leading time column and a trailing
    /// hospital capacity column.
    pub fn epicurves(&self) -> ResultsTable {
        let mut columns = vec![self.times()];
        for &cat in EPICURVE_CATEGORIES.iter() {
            columns.push(match cat {
                Some(cat) => self.curve(cat),
                None => self.immunized_curve(),
            });
        }
        columns.push(vec![self.params().hospital_capacity(); self.results.nrows()]);
        ResultsTable::from_columns(&columns)
    }

    /// Header matching [`Simulation::epicurves`].
    pub fn epicurves_header() -> Vec<&'static str> {
        let mut header = vec!["time"];
        header.extend(EPICURVE_CATEGORIES.iter().map(|c| match c {
            Some(cat) => cat.abbrev(),
            None => "Imm",
        }));
        header.push("capacity");
        header
    }

    /// Consume the simulation and return the raw results table.
    pub fn into_results(self) -> ResultsTable {
        self.results
    }
}

/// Columns of the epicurve table. `None` stands for the sum of all immunized
/// categories.
const EPICURVE_CATEGORIES: [Option<Category>; 8] = [
    Some(Category::Susceptible),
    Some(Category::Vaccinated),
    Some(Category::Exposed),
    Some(Category::Quarantined),
    Some(Category::Infected),
    Some(Category::Severe),
    None,
    Some(Category::Dead),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{small_params, town_params};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn end_to_end_run() {
        let mut sim = Simulation::new(town_params()).unwrap();
        let initial = sim.population().to_vec();
        let results = sim.run().unwrap();

        assert_eq!(results.nrows(), 100 * 24 + 1);
        assert_eq!(results.row(0).unwrap(), &initial[..]);

        let dead = results.col(results.ncols() - 1).unwrap();
        assert!(dead.windows(2).all(|w| w[0] <= w[1]));
        for i in 0..results.nrows() {
            let row = results.row(i).unwrap();
            assert_approx_eq!(row.iter().sum::<Real>(), 10_000.0, 1e-6);
        }
    }

    #[test]
    fn infection_spreads() {
        let mut sim = Simulation::new(town_params()).unwrap();
        sim.run().unwrap();
        let recovered = sim.curve(Category::RecoveryImmunized);
        assert_eq!(recovered[0], 0.0);
        assert!(*recovered.last().unwrap() > 0.0);
        assert_eq!(sim.n_iter(), 2401);
        assert_approx_eq!(sim.time(), 2401.0 / 24.0);
    }

    #[test]
    fn same_seed_same_results() {
        let run = |seed| {
            let mut sim = Simulation::new(small_params()).unwrap();
            sim.seed(seed);
            sim.run().unwrap();
            sim.into_results()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn reporter_sees_every_step() {
        let mut sim = Simulation::new(small_params()).unwrap();
        let mut steps = 0;
        sim.run_with(|_: usize, _: &ModelParams, x: &Array1<Real>| {
            assert!(x.iter().skip(1).all(|&v| v >= 0.0));
            steps += 1;
        })
        .unwrap();
        assert_eq!(steps, sim.params().n_steps());
    }

    #[test]
    fn epicurve_table() {
        let mut sim = Simulation::new(small_params()).unwrap();
        sim.run().unwrap();
        let table = sim.epicurves();
        let header = Simulation::epicurves_header();
        assert_eq!(header, vec!["time", "S", "V", "E", "Q", "I", "H", "Imm", "D", "capacity"]);
        assert_eq!(table.ncols(), header.len());
        assert_eq!(table.nrows(), sim.results().nrows());
        assert_eq!(table.get(0, 3), Some(10.0));
        assert_eq!(table.get(2, 0), Some(2.0));
        assert_eq!(table.get(1, 9), Some(sim.params().hospital_capacity()));
    }
}
