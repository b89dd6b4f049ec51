//! One-call orchestration: guess, wire, minimize, decode.

use crate::{
    initial_candidate, Assumptions, Candidate, ConstrainedMinimizer, Constraint, EvalFn,
    PlacementModel, Problem, Result, SolveReport,
};
use ndarray::{Array3, ArrayView1};
use rand::Rng;

/// The decoded outcome of a solve, together with the minimizer's report.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Final placement tensor.
    pub x: Array3<f64>,
    /// Final transfer-rate tensor.
    pub y: Array3<f64>,
    /// The minimizer's own account of the run.
    pub report: SolveReport,
}

/// Runs one full optimization: builds an initial candidate, hands the
/// objective and the eight constraints to the minimizer, and decodes the
/// vector it returns.
///
/// Each wired evaluation decodes the full flat vector on its own, so the
/// minimizer may call them in any order and any number of times. The
/// minimizer is trusted to keep the vector length fixed; a vector of any
/// other length aborts the run, since it can only mean mismatched
/// configuration.
///
/// # Errors
///
/// Returns an error when no initial candidate can be constructed; a
/// non-converged minimizer run is not an error and is reported through
/// [`SolveReport`](struct.SolveReport.html).
pub fn solve<A, M, R>(
    model: &PlacementModel<A>,
    minimizer: &mut M,
    rng: &mut R,
) -> Result<Solution>
where
    A: Assumptions + Sync,
    M: ConstrainedMinimizer,
    R: Rng,
{
    let guess = initial_candidate(model.dims(), model.assumptions(), rng)?;
    let initial = model.encode(&guess);

    let objective = move |vector: ArrayView1<'_, f64>| {
        model
            .objective_value(vector)
            .expect("minimizer must preserve the vector length")
    };
    let constraint_fns: Vec<Box<EvalFn<'_>>> = Constraint::ALL
        .iter()
        .map(|&kind| {
            let eval = move |vector: ArrayView1<'_, f64>| {
                let candidate = model
                    .decode(vector)
                    .expect("minimizer must preserve the vector length");
                model.constraint(kind, &candidate)
            };
            Box::new(eval) as Box<EvalFn<'_>>
        })
        .collect();
    let constraints: Vec<&EvalFn<'_>> = constraint_fns.iter().map(AsRef::as_ref).collect();

    let report = minimizer.minimize(&Problem {
        objective: &objective,
        constraints: &constraints,
        initial: initial.view(),
    });
    log::info!("solver finished: {}", report.message);

    let Candidate { x, y } = model.decode(report.vector.view())?;
    Ok(Solution { x, y, report })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{EvolutionarySearch, StaticAssumptions};
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn reference_solution(seed: u64) -> (PlacementModel<StaticAssumptions>, Solution) {
        let (dims, assumptions) = StaticAssumptions::reference();
        let model = PlacementModel::new(dims, assumptions);
        let mut search = EvolutionarySearch::new(ChaChaRng::seed_from_u64(seed));
        search.population(120).generations(150);
        let mut rng = ChaChaRng::seed_from_u64(seed.wrapping_add(1));
        let solution = solve(&model, &mut search, &mut rng).unwrap();
        (model, solution)
    }

    #[test]
    fn test_end_to_end_reference_instance() {
        let (model, solution) = reference_solution(2020);
        let dims = model.dims();
        let report = &solution.report;
        assert!(report.converged, "report: {}", report.message);

        // Exactly one server per real (user, object) pair, in the model's
        // own integrality notion (truncation toward zero).
        for m in dims.real_users() {
            for n in dims.real_objects() {
                let assigned = dims
                    .real_servers()
                    .filter(|&s| solution.x[[m, n, s]].trunc() == 1.0)
                    .count();
                assert_eq!(assigned, 1, "user {} object {}", m, n);
            }
        }

        // Every rate within its placement-scaled bracket.
        let assumptions = model.assumptions();
        for m in dims.all_users() {
            for n in dims.real_objects() {
                for s in dims.real_servers() {
                    let x = solution.x[[m, n, s]];
                    let y = solution.y[[m, n, s]];
                    assert!(y >= x * assumptions.min_rate(m, n));
                    assert!(y <= x * assumptions.max_rate(m, n));
                }
            }
        }
    }

    #[test]
    fn test_solution_not_worse_than_guess() {
        let (dims, assumptions) = StaticAssumptions::reference();
        let model = PlacementModel::new(dims, assumptions);
        let mut rng = ChaChaRng::seed_from_u64(11);
        let guess = initial_candidate(dims, model.assumptions(), &mut rng).unwrap();
        let guess_objective = -model.quality(&guess);

        let (_, solution) = reference_solution(10);
        assert!(solution.report.objective <= guess_objective + 1e-9);
        assert_eq!(solution.report.violations, 0);
    }

    #[test]
    fn test_solution_decodes_report_vector() {
        let (model, solution) = reference_solution(5);
        let reencoded = model.encode(&Candidate {
            x: solution.x.clone(),
            y: solution.y.clone(),
        });
        assert_eq!(reencoded, solution.report.vector);
    }
}
