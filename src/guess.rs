//! Starting-point construction for the constrained search.
//!
//! A constrained nonlinear search is sensitive to its starting point, so the
//! guess is built to satisfy the structural constraints outright: one master
//! per real object on a server with room for it, every real user assigned to
//! a master holder, and every assigned flow started at its minimum rate.
//! Placement is greedy and randomized, so a failure to place all masters
//! does not prove the instance infeasible.

use crate::{Assumptions, Candidate, Dimensions, Error, Result};
use ndarray::Array3;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds a feasible-leaning `(x0, y0)` candidate for the given instance.
///
/// # Errors
///
/// Returns [`Error::PossiblyInfeasible`](enum.Error.html) when the greedy
/// pass cannot fit some master copy into any real server's remaining
/// capacity.
pub fn initial_candidate<A, R>(dims: Dimensions, assumptions: &A, rng: &mut R) -> Result<Candidate>
where
    A: Assumptions,
    R: Rng,
{
    let mut x = Array3::<f64>::zeros(dims.tensor_shape());
    let mut y = Array3::<f64>::zeros(dims.tensor_shape());

    let mut remaining: Vec<f64> = (0..dims.servers)
        .map(|s| assumptions.server_capacity(s))
        .collect();

    // Place masters in random object order; checking servers in a shuffled
    // order keeps the placement fair across runs.
    let mut objects: Vec<_> = dims.real_objects().collect();
    objects.shuffle(rng);
    for n in objects {
        let weight = assumptions.object_weight(n);
        let mut servers: Vec<_> = dims.real_servers().collect();
        servers.shuffle(rng);
        let host = servers
            .into_iter()
            .find(|&s| weight <= remaining[s])
            .ok_or(Error::PossiblyInfeasible)?;
        x[[0, n, host]] = 1.0;
        remaining[host] -= weight;
    }

    // Every real user picks one holder of the master copy.
    for n in dims.real_objects() {
        let holders: Vec<_> = dims
            .real_servers()
            .filter(|&s| x[[0, n, s]] == 1.0)
            .collect();
        for m in dims.real_users() {
            let s = *holders.choose(rng).ok_or(Error::PossiblyInfeasible)?;
            x[[m, n, s]] = 1.0;
        }
    }

    // Assigned flows start at their minimum admissible rate; everything else
    // stays silent so the rate brackets hold with x == 0.
    for m in dims.all_users() {
        for n in dims.real_objects() {
            for s in dims.real_servers() {
                y[[m, n, s]] = x[[m, n, s]] * assumptions.min_rate(m, n);
            }
        }
    }

    Ok(Candidate { x, y })
}
