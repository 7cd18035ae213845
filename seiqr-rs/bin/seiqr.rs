use std::{env, fs, path::Path, process};

use log::{error, info, warn};
use seiqr::{prelude::*, Result};
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    verbose: bool,
    /// Category aggregates, one row per step.
    output: String,
    /// Optional dump of every sub-state, one row per step.
    raw_output: Option<String>,
    /// Number of runs with consecutive seeds starting at `params.seed`.
    /// Values below 2 run a single simulation.
    ensemble: usize,
    ensemble_output: String,
    params: ModelParams,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbose: true,
            output: "epicurve.csv".into(),
            raw_output: None,
            ensemble: 0,
            ensemble_output: "ensemble.csv".into(),
            params: ModelParams::default(),
        }
    }
}

impl Config {
    /// Read configuration from a TOML file. A missing file means defaults.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        if !path.exists() {
            warn!("{} not found, using default parameters", path.display());
            return Ok(Config::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }
}

pub fn main() {
    SimpleLogger::new().init().unwrap();

    let path = env::args().nth(1).unwrap_or_else(|| "seiqr.toml".into());
    let cfg = match Config::load(Path::new(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    if cfg.verbose {
        println!("{:#?}", cfg);
    }

    let res = if cfg.ensemble > 1 {
        ensemble_simulation(&cfg)
    } else {
        simple_simulation(&cfg)
    };
    if let Err(e) = res {
        error!("{}", e);
        process::exit(1);
    }
}

pub fn simple_simulation(cfg: &Config) -> Result<()> {
    let mut sim = Simulation::new(cfg.params.clone())?;
    sim.run()?;

    let header = Simulation::epicurves_header();
    sim.epicurves().write_csv(&cfg.output, &header[..])?;
    info!("Epicurves written to {}", cfg.output);

    if let Some(raw) = &cfg.raw_output {
        let names = sim.schema().names();
        sim.results().write_csv(raw, &names[..])?;
        info!("Raw results written to {}", raw);
    }

    if cfg.verbose {
        let capacity = sim.params().hospital_capacity();
        println!("Severe infected (capacity = {}):", capacity);
        plot_vbars(&sim.curve(Category::Severe), 100, 20, Some(capacity));
        println!("Dead:");
        plot_vbars(&sim.curve(Category::Dead), 100, 10, None);
    }
    Ok(())
}

pub fn ensemble_simulation(cfg: &Config) -> Result<()> {
    let params = &cfg.params;
    let seeds: Vec<u64> = (0..cfg.ensemble as u64).map(|i| params.seed() + i).collect();
    let results = run_ensemble(params, &seeds)?;
    let schema = StateSchema::build(params)?;

    let n = results.iter().map(|r| r.nrows()).max().unwrap_or(0);
    let dt = params.dt();
    let mut columns = vec![(0..n).map(|i| i as Real * dt).collect::<Vec<_>>()];
    for &cat in [Category::Severe, Category::Dead].iter() {
        let summary = EnsembleSummary::of_category(&results, &schema, cat);
        columns.push(summary.mean());
        columns.push(summary.min());
        columns.push(summary.max());
    }
    let table = ResultsTable::from_columns(&columns);

    let header = ["time", "H_mean", "H_min", "H_max", "D_mean", "D_min", "D_max"];
    table.write_csv(&cfg.ensemble_output, &header[..])?;
    info!(
        "Summary of {} runs written to {}",
        seeds.len(),
        cfg.ensemble_output
    );
    Ok(())
}
