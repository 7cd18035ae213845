use crate::{params::ModelParams, Real};
use log::info;
use ndarray::Array1;
use std::time::Instant;

pub type ReporterList = Vec<(usize, Box<dyn Reporter>)>;

/// Trait that implements a method that temporarily scans the population
/// vector and performs some action like collecting statistics, emitting
/// signals, logging, etc.
///
/// Closures taking `(step, params, population)` are reporters.
pub trait Reporter {
    /// Called once after the n-th step was applied.
    fn process(&mut self, n: usize, params: &ModelParams, population: &Array1<Real>);
}

/// A GrowableReporter can include arbitrary functions that execute during the
/// reporting phase.
pub trait GrowableReporter: Reporter {
    /// Register a reporter function to be called every n_steps.
    fn register_reporter(&mut self, n_steps: usize, reporter: Box<dyn Reporter>);
}

/////////////////////////////////////////////////////////////////////////////
// Reporter instances
/////////////////////////////////////////////////////////////////////////////

impl<F> Reporter for F
where
    F: FnMut(usize, &ModelParams, &Array1<Real>),
{
    fn process(&mut self, n: usize, params: &ModelParams, population: &Array1<Real>) {
        self(n, params, population)
    }
}

impl Reporter for () {
    fn process(&mut self, _n: usize, _params: &ModelParams, _population: &Array1<Real>) {}
}

impl<R1, R2> Reporter for (R1, R2)
where
    R1: Reporter,
    R2: Reporter,
{
    fn process(&mut self, n: usize, params: &ModelParams, population: &Array1<Real>) {
        self.0.process(n, params, population);
        self.1.process(n, params, population);
    }
}

impl Reporter for ReporterList {
    fn process(&mut self, n: usize, params: &ModelParams, population: &Array1<Real>) {
        for (i, r) in self.iter_mut() {
            if *i != 0 && n % (*i) == 0 {
                r.process(n, params, population);
            }
        }
    }
}

impl GrowableReporter for ReporterList {
    fn register_reporter(&mut self, n_steps: usize, reporter: Box<dyn Reporter>) {
        self.push((n_steps, reporter));
    }
}

/// Logs elapsed wall time and step number every `interval` steps.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    interval: usize,
    n_steps: usize,
    start: Instant,
}

impl ProgressReporter {
    /// An interval of zero disables progress lines.
    pub fn new(interval: usize, n_steps: usize) -> Self {
        ProgressReporter {
            interval,
            n_steps,
            start: Instant::now(),
        }
    }

    pub fn is_due(&self, n: usize) -> bool {
        self.interval != 0 && n % self.interval == 0
    }
}

impl Reporter for ProgressReporter {
    fn process(&mut self, n: usize, _params: &ModelParams, _population: &Array1<Real>) {
        if self.is_due(n) {
            info!(
                "Sim.time: {:.4} sec, Iteration: {}/{}",
                self.start.elapsed().as_secs_f64(),
                n + 1,
                self.n_steps
            );
        }
    }
}
