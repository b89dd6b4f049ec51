//! Joint content placement and transfer-rate allocation for a small edge
//! network, modeled as a constrained nonlinear optimization problem.
//!
//! The model decides, for a single time slot, which edge server stores each
//! content object and at what rate each user is served, subject to server
//! storage and network link capacities. The decision variables are two
//! `(users, objects, servers)` tensors: a placement tensor `x` and a
//! transfer-rate tensor `y`. Both are carried as one flat vector so that a
//! generic constrained minimizer can drive the search.

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
#![deny(unsafe_code)]

#[macro_use]
mod array;
mod assumptions;
mod codec;
mod constraints;
mod guess;
mod minimizer;
mod model;
mod solve;
mod space;

pub use assumptions::{Assumptions, ParamsFile, StaticAssumptions};
pub use codec::Codec;
pub use constraints::Constraint;
pub use guess::initial_candidate;
pub use minimizer::{
    ConstrainedMinimizer, EvalFn, EvolutionarySearch, Problem, SolveReport,
};
pub use model::{Candidate, PlacementModel};
pub use solve::{solve, Solution};
pub use space::{Dimensions, ORIGIN};

/// Error type encompassing all placement model errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A flat vector does not have the length implied by the dimensions.
    #[error("flat vector has length {actual} but the model requires {expected}")]
    VectorLength {
        /// Length implied by the configured dimensions (`2 * M * N * S`).
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },
    /// A parameter table does not match the configured dimensions.
    #[error("parameter table `{table}` has {actual} entries but the dimensions require {expected}")]
    ShapeMismatch {
        /// Name of the offending table.
        table: &'static str,
        /// Number of entries implied by the dimensions.
        expected: usize,
        /// Number of entries found.
        actual: usize,
    },
    /// An axis of the index space is empty.
    #[error("axis `{0}` must have at least the origin index")]
    EmptyAxis(&'static str),
    /// A route table entry points at a link index that does not exist.
    #[error("route table points at link {link} but there are only {links} link slots")]
    BadRoute {
        /// The offending link index.
        link: usize,
        /// Number of configured link slots.
        links: usize,
    },
    /// Greedy guess generation could not place all masters; the instance may
    /// be infeasible, although the greedy method is not a proof of that.
    #[error("could not construct an initial guess, instance could be infeasible")]
    PossiblyInfeasible,
}

/// Result alias using [`Error`](enum.Error.html).
pub type Result<T> = std::result::Result<T, Error>;

array_wrapper!(ObjectWeights, "Per-object size/popularity weights (`b_n`).");
array_wrapper!(ServerCapacities, "Per-server storage capacities (`B_s`).");
array_wrapper!(LinkCapacities, "Per-link throughput capacities (`C_l`).");
array_wrapper!(LinkCosts, "Per-link unit transfer costs (`k_l`).");
