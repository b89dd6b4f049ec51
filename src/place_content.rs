//! Optimizes content placement and transfer rates for one time slot.
//! Run `place-content --help` for more information.

#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::cast_precision_loss
)]

use edge_placement::{
    solve, Dimensions, EvolutionarySearch, ParamsFile, PlacementModel, StaticAssumptions,
};

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::ProgressBar;
use ndarray::Array3;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::Serialize;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    /// JSON file with the instance parameters; the built-in reference
    /// instance is used when absent.
    #[structopt(long)]
    params: Option<PathBuf>,

    /// Seed for the randomized guess and search; entropy-seeded when absent.
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Number of search generations.
    #[structopt(long, default_value = "500")]
    iterations: usize,

    /// Search population size.
    #[structopt(long, default_value = "200")]
    population: usize,

    /// Suppress the progress bar.
    #[structopt(short, long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct PlacementReport {
    converged: bool,
    message: String,
    iterations: usize,
    objective: f64,
    quality: f64,
    x: Vec<Vec<Vec<f64>>>,
    y: Vec<Vec<Vec<f64>>>,
}

fn nested(tensor: &Array3<f64>) -> Vec<Vec<Vec<f64>>> {
    tensor
        .outer_iter()
        .map(|plane| {
            plane
                .outer_iter()
                .map(|row| row.iter().copied().collect())
                .collect()
        })
        .collect()
}

fn load_params(path: &Path) -> Result<(Dimensions, StaticAssumptions)> {
    let file = File::open(path)?;
    let params: ParamsFile = serde_json::from_reader(file)?;
    Ok(StaticAssumptions::from_params(&params)?)
}

fn place(opt: &Opt) -> Result<()> {
    let (dims, assumptions) = match &opt.params {
        Some(path) => load_params(path)?,
        None => StaticAssumptions::reference(),
    };
    let model = PlacementModel::new(dims, assumptions);

    let seed = opt.seed.unwrap_or_else(rand::random);
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let mut search = EvolutionarySearch::new(ChaChaRng::seed_from_u64(seed.wrapping_add(1)));
    search
        .population(opt.population)
        .generations(opt.iterations);
    if !opt.quiet {
        search.progress_bar(ProgressBar::new(opt.iterations as u64));
    }

    let solution = solve(&model, &mut search, &mut rng)?;
    let report = PlacementReport {
        converged: solution.report.converged,
        message: solution.report.message.clone(),
        iterations: solution.report.iterations,
        objective: solution.report.objective,
        quality: -solution.report.objective,
        x: nested(&solution.x),
        y: nested(&solution.y),
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn main() {
    if let Err(err) = place(&Opt::from_args()) {
        eprintln!("{}", err);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_params() -> Result<()> {
        let tmp = TempDir::new()?;
        let params_file = tmp.path().join("params.json");
        fs::write(
            &params_file,
            r#"{
                "users": 2, "objects": 2, "servers": 2, "links": 3,
                "object_weights": [0.0, 1.0],
                "storage_costs": [[0.0, 0.0], [0.0, 1.0]],
                "server_capacities": [1e12, 4.0],
                "link_capacities": [0.0, 10.0, 10.0],
                "link_costs": [0.0, 0.1, 0.1],
                "min_rates": [[0.1, 0.1], [0.1, 0.1]],
                "max_rates": [[2.0, 2.0], [2.0, 2.0]],
                "routes": [[1, 1], [2, 2]]
            }"#,
        )?;
        let (dims, _assumptions) = load_params(&params_file)?;
        assert_eq!(dims.tensor_shape(), (2, 2, 2));
        assert_eq!(dims.links, 3);

        fs::write(&params_file, r#"{}"#)?;
        assert!(load_params(&params_file).is_err());

        fs::write(
            &params_file,
            r#"{
                "users": 2, "objects": 2, "servers": 2, "links": 3,
                "object_weights": [0.0],
                "storage_costs": [[0.0, 0.0], [0.0, 1.0]],
                "server_capacities": [1e12, 4.0],
                "link_capacities": [0.0, 10.0, 10.0],
                "link_costs": [0.0, 0.1, 0.1],
                "min_rates": [[0.1, 0.1], [0.1, 0.1]],
                "max_rates": [[2.0, 2.0], [2.0, 2.0]],
                "routes": [[1, 1], [2, 2]]
            }"#,
        )?;
        assert!(load_params(&params_file).is_err());
        Ok(())
    }

    #[test]
    fn test_nested_preserves_layout() {
        let tensor =
            Array3::from_shape_vec((1, 2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            nested(&tensor),
            vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]
        );
    }
}
