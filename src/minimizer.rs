//! The constrained-minimizer seam and a population-based implementation.
//!
//! The model only requires a collaborator that minimizes a scalar objective
//! of a flat vector under inequality constraints (feasible iff the
//! constraint value is non-negative) and reports its result; how that
//! collaborator searches is its own business. The search shipped here is
//! derivative-free: no gradients, no line search, no KKT machinery.

use indicatif::ProgressBar;
use ndarray::{Array1, ArrayView1};
use ordered_float::OrderedFloat;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

/// A scalar evaluation of a flat candidate vector.
///
/// `Sync` so that a solver may fan evaluations out across threads; the model
/// side guarantees every evaluation is a pure function of its input.
pub type EvalFn<'a> = dyn Fn(ArrayView1<'_, f64>) -> f64 + Sync + 'a;

/// A wired optimization problem, borrowed for the duration of one solve.
pub struct Problem<'a> {
    /// The minimization objective.
    pub objective: &'a EvalFn<'a>,
    /// Inequality constraints; a candidate is feasible iff every constraint
    /// evaluates to a non-negative value on it.
    pub constraints: &'a [&'a EvalFn<'a>],
    /// The starting vector; every candidate a minimizer produces must have
    /// this vector's length.
    pub initial: ArrayView1<'a, f64>,
}

/// Outcome of one minimizer run.
///
/// Non-convergence is not an error: the report carries the best vector seen
/// together with a flag and a diagnostic message.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The best candidate vector found.
    pub vector: Array1<f64>,
    /// Objective value of [`vector`](#structfield.vector).
    pub objective: f64,
    /// Number of constraints [`vector`](#structfield.vector) violates.
    pub violations: usize,
    /// Number of search iterations performed.
    pub iterations: usize,
    /// Whether the search ended on a feasible candidate.
    pub converged: bool,
    /// Human-readable status.
    pub message: String,
}

/// A generic nonlinear solver for inequality-constrained problems.
pub trait ConstrainedMinimizer {
    /// Runs the search and reports the best candidate found.
    fn minimize(&mut self, problem: &Problem<'_>) -> SolveReport;
}

/// Candidate rank: number of violated constraints first, objective second,
/// so that feasibility always dominates optimality.
type Fitness = (usize, OrderedFloat<f64>);

fn fitness(problem: &Problem<'_>, vector: &Array1<f64>) -> Fitness {
    let violations = problem
        .constraints
        .iter()
        .filter(|constraint| constraint(vector.view()) < 0.0)
        .count();
    (violations, OrderedFloat((problem.objective)(vector.view())))
}

/// Population-based random search over flat vectors.
///
/// Each generation keeps the better half of the population, ranked
/// feasibility-first, and refills it with Gaussian-mutated copies of the
/// survivors. The unmodified starting vector is always part of the initial
/// population and the best candidate ever seen is retained, so a feasible
/// start can never degrade into an infeasible report.
pub struct EvolutionarySearch<R: Rng> {
    rng: R,
    population: usize,
    generations: usize,
    mutation_rate: f64,
    mutation_scale: f64,
    progress: Option<ProgressBar>,
}

impl<R: Rng> EvolutionarySearch<R> {
    /// Creates a search using `rng` for all random choices.
    ///
    /// # Defaults
    ///
    /// 200 candidates evolved for 500 generations; each entry of a mutated
    /// candidate is perturbed with probability 0.2 by Gaussian noise of
    /// standard deviation 0.25.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            population: 200,
            generations: 500,
            mutation_rate: 0.2,
            mutation_scale: 0.25,
            progress: None,
        }
    }

    /// Sets the population size (at least 1).
    pub fn population(&mut self, population: usize) -> &mut Self {
        self.population = population.max(1);
        self
    }

    /// Sets the number of generations.
    pub fn generations(&mut self, generations: usize) -> &mut Self {
        self.generations = generations;
        self
    }

    /// Sets the per-entry mutation probability and noise scale. The scale
    /// must be positive and finite.
    pub fn mutation(&mut self, rate: f64, scale: f64) -> &mut Self {
        self.mutation_rate = rate;
        self.mutation_scale = scale;
        self
    }

    /// Attaches a progress bar advanced once per generation.
    pub fn progress_bar(&mut self, progress: ProgressBar) -> &mut Self {
        self.progress = Some(progress);
        self
    }

    fn mutant(&mut self, parent: &Array1<f64>, noise: &Normal<f64>) -> Array1<f64> {
        let mut child = parent.clone();
        for value in child.iter_mut() {
            if self.rng.gen::<f64>() < self.mutation_rate {
                *value += noise.sample(&mut self.rng);
            }
        }
        child
    }

    /// Scores a batch of candidates in parallel; every evaluation is pure.
    fn evaluate(
        problem: &Problem<'_>,
        batch: Vec<Array1<f64>>,
    ) -> Vec<(Array1<f64>, Fitness)> {
        batch
            .into_par_iter()
            .map(|vector| {
                let fitness = fitness(problem, &vector);
                (vector, fitness)
            })
            .collect()
    }
}

impl<R: Rng> ConstrainedMinimizer for EvolutionarySearch<R> {
    fn minimize(&mut self, problem: &Problem<'_>) -> SolveReport {
        let noise =
            Normal::new(0.0, self.mutation_scale).expect("mutation scale is positive and finite");

        let seed = problem.initial.to_owned();
        let mut batch = Vec::with_capacity(self.population);
        batch.push(seed.clone());
        while batch.len() < self.population {
            let jittered = self.mutant(&seed, &noise);
            batch.push(jittered);
        }
        let mut scored = Self::evaluate(problem, batch);
        scored.sort_by_key(|(_, fitness)| *fitness);
        let mut best = scored[0].clone();

        for generation in 0..self.generations {
            scored.truncate((self.population / 2).max(1));
            let offspring: Vec<_> = {
                let parents: Vec<_> = scored.iter().map(|(v, _)| v.clone()).collect();
                parents
                    .iter()
                    .map(|parent| self.mutant(parent, &noise))
                    .collect()
            };
            scored.extend(Self::evaluate(problem, offspring));
            scored.sort_by_key(|(_, fitness)| *fitness);
            if scored[0].1 < best.1 {
                best = scored[0].clone();
                log::debug!(
                    "generation {}: violations {}, objective {}",
                    generation,
                    (best.1).0,
                    ((best.1).1).0,
                );
            }
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }
        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let (vector, (violations, objective)) = best;
        let converged = violations == 0;
        let message = if converged {
            format!("feasible optimum after {} generations", self.generations)
        } else {
            format!(
                "best candidate still violates {} of {} constraints",
                violations,
                problem.constraints.len()
            )
        };
        SolveReport {
            vector,
            objective: objective.0,
            violations,
            iterations: self.generations,
            converged,
            message,
        }
    }
}
