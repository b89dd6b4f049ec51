//! The placement model: decision-variable snapshots and the objective
//! function `Q = U - G - H`.

use crate::{Assumptions, Codec, Dimensions, Result, ORIGIN};
use ndarray::{Array1, Array3, ArrayView1};

/// One decoded solution candidate: an immutable snapshot of both decision
/// tensors.
///
/// `x[(m, n, s)] == 1` means user `m`'s copy of object `n` is served from
/// server `s`; row `x[(0, n, s)]` marks where the master copy of `n` is
/// stored. `y[(m, n, s)]` is the transfer rate of that flow. During the
/// search the entries are unconstrained reals; feasibility is judged by the
/// constraint set.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Placement tensor `x`.
    pub x: Array3<f64>,
    /// Transfer-rate tensor `y`.
    pub y: Array3<f64>,
}

/// The optimization model: dimensions, assumption parameters, and the codec
/// tying candidates to the flat vectors the minimizer works on.
pub struct PlacementModel<A> {
    dims: Dimensions,
    assumptions: A,
    codec: Codec,
}

impl<A: Assumptions> PlacementModel<A> {
    /// Builds a model over the given index spaces and parameters.
    pub fn new(dims: Dimensions, assumptions: A) -> Self {
        Self {
            dims,
            assumptions,
            codec: Codec::new(dims),
        }
    }

    /// The model's index spaces.
    #[must_use]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// The assumption parameters.
    pub fn assumptions(&self) -> &A {
        &self.assumptions
    }

    /// The codec for this model's tensor shapes.
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Decodes a flat solver vector into a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VectorLength`](../enum.Error.html) for vectors of the
    /// wrong length; this is a configuration error, not a solver state.
    pub fn decode(&self, vector: ArrayView1<'_, f64>) -> Result<Candidate> {
        let (x, y) = self.codec.decode(vector)?;
        Ok(Candidate { x, y })
    }

    /// Encodes a candidate into the flat vector form.
    #[must_use]
    pub fn encode(&self, candidate: &Candidate) -> Array1<f64> {
        self.codec.encode(candidate.x.view(), candidate.y.view())
    }

    /// Object-weighted rate delivered to user `m` for object `n` across all
    /// real servers.
    pub(crate) fn weighted_rate(&self, candidate: &Candidate, m: usize, n: usize) -> f64 {
        let total: f64 = self
            .dims
            .real_servers()
            .map(|s| candidate.y[[m, n, s]])
            .sum();
        total * self.assumptions.object_weight(n)
    }

    /// Utility term `U(y)`: object-weighted served rate, counting both the
    /// origin row's flows to the edge servers and every real user's flows.
    pub fn utility(&self, candidate: &Candidate) -> f64 {
        self.dims
            .real_objects()
            .map(|n| {
                let origin: f64 = self
                    .dims
                    .real_servers()
                    .map(|s| candidate.y[[ORIGIN, n, s]] * self.assumptions.object_weight(n))
                    .sum();
                let users: f64 = self
                    .dims
                    .real_users()
                    .map(|m| self.weighted_rate(candidate, m, n))
                    .sum();
                origin + users
            })
            .sum()
    }

    /// Network cost term `G(x, y)`: per-link unit cost times the routed,
    /// placement-weighted rates of every flow.
    pub fn network_cost(&self, candidate: &Candidate) -> f64 {
        let x = candidate.x.view();
        let mut cost = 0.0;
        for n in self.dims.real_objects() {
            for s in self.dims.real_servers() {
                for l in self.dims.real_links() {
                    let origin = self.assumptions.route_indicator(x, ORIGIN, n, s, l)
                        * candidate.x[[ORIGIN, n, s]]
                        * candidate.y[[ORIGIN, n, s]];
                    let users: f64 = self
                        .dims
                        .real_users()
                        .map(|m| {
                            self.assumptions.route_indicator(x, m, n, s, l)
                                * candidate.x[[m, n, s]]
                                * self.weighted_rate(candidate, m, n)
                        })
                        .sum();
                    cost += self.assumptions.link_cost(l) * (origin + users);
                }
            }
        }
        cost
    }

    /// Storage cost term `H(x[0])`: placement-weighted master storage cost.
    pub fn storage_cost(&self, candidate: &Candidate) -> f64 {
        let mut cost = 0.0;
        for n in self.dims.real_objects() {
            for s in self.dims.real_servers() {
                cost += self.assumptions.storage_cost(n, s) * candidate.x[[ORIGIN, n, s]];
            }
        }
        cost
    }

    /// The utility net of costs, `Q = U - G - H`, at full precision.
    pub fn quality(&self, candidate: &Candidate) -> f64 {
        self.utility(candidate) - self.network_cost(candidate) - self.storage_cost(candidate)
    }

    /// The minimization objective handed to the solver: `-Q` of the decoded
    /// vector, so that minimizing it maximizes utility net of costs.
    ///
    /// # Errors
    ///
    /// Returns an error only for vectors of the wrong length; evaluation
    /// itself is total over all real-valued inputs.
    pub fn objective_value(&self, vector: ArrayView1<'_, f64>) -> Result<f64> {
        let candidate = self.decode(vector)?;
        Ok(-self.quality(&candidate))
    }
}
