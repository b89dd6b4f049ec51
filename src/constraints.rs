//! The feasibility constraint set.
//!
//! Every constraint is an inequality in the external minimizer's convention:
//! the returned value is non-negative exactly when the candidate satisfies
//! the constraint. A feasible candidate scores 0.0 and a violated constraint
//! scores -1.0; there is no gradation, matching the all-or-nothing predicates
//! of the model. All evaluations are total over arbitrary real-valued
//! candidates, since the minimizer explores infeasible points freely.

use crate::{Assumptions, Candidate, PlacementModel, ORIGIN};
use itertools::iproduct;

/// Feasibility signal of a satisfied constraint.
const FEASIBLE: f64 = 0.0;
/// Feasibility signal of a violated constraint.
const VIOLATED: f64 = -1.0;

/// The eight feasibility predicates of the placement model.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Every placement entry truncates to 0 or 1.
    BinaryPlacement,
    /// Every transfer rate is non-negative.
    NonNegativeRate,
    /// Every real (user, object) pair is served from exactly one server.
    SingleLocation,
    /// A user is only assigned to a server holding the master copy.
    CopyExists,
    /// Master copies stored at a server fit its storage capacity.
    ServerCapacity,
    /// Aggregate utilization of every link fits its capacity.
    LinkCapacity,
    /// Rates of assigned flows reach the per-flow minimum.
    MinRate,
    /// Rates of assigned flows stay within the per-flow maximum.
    MaxRate,
}

impl Constraint {
    /// All constraints, in the order they are handed to the minimizer.
    pub const ALL: [Constraint; 8] = [
        Constraint::BinaryPlacement,
        Constraint::NonNegativeRate,
        Constraint::SingleLocation,
        Constraint::CopyExists,
        Constraint::ServerCapacity,
        Constraint::LinkCapacity,
        Constraint::MinRate,
        Constraint::MaxRate,
    ];
}

/// Truncation toward zero, the integrality notion the model uses for the
/// relaxed binary variables: a value counts as the bit `b` iff it truncates
/// to `b`.
fn trunc(value: f64) -> f64 {
    value.trunc()
}

impl<A: Assumptions> PlacementModel<A> {
    /// Evaluates one constraint on a decoded candidate.
    ///
    /// Returns a non-negative value iff the candidate satisfies the
    /// constraint.
    pub fn constraint(&self, kind: Constraint, candidate: &Candidate) -> f64 {
        let feasible = match kind {
            Constraint::BinaryPlacement => self.binary_placement(candidate),
            Constraint::NonNegativeRate => self.non_negative_rate(candidate),
            Constraint::SingleLocation => self.single_location(candidate),
            Constraint::CopyExists => self.copy_exists(candidate),
            Constraint::ServerCapacity => self.server_capacity(candidate),
            Constraint::LinkCapacity => self.link_capacity(candidate),
            Constraint::MinRate => self.min_rate(candidate),
            Constraint::MaxRate => self.max_rate(candidate),
        };
        if feasible {
            FEASIBLE
        } else {
            VIOLATED
        }
    }

    /// Evaluates every constraint and counts the violated ones.
    pub fn violations(&self, candidate: &Candidate) -> usize {
        Constraint::ALL
            .iter()
            .filter(|&&kind| self.constraint(kind, candidate) < 0.0)
            .count()
    }

    fn binary_placement(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.all_users(), dims.real_objects(), dims.real_servers()).all(|(m, n, s)| {
            let bit = trunc(candidate.x[[m, n, s]]);
            bit == 0.0 || bit == 1.0
        })
    }

    fn non_negative_rate(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.all_users(), dims.real_objects(), dims.real_servers())
            .all(|(m, n, s)| candidate.y[[m, n, s]] >= 0.0)
    }

    fn single_location(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.real_users(), dims.real_objects()).all(|(m, n)| {
            let assigned: f64 = dims.real_servers().map(|s| candidate.x[[m, n, s]]).sum();
            trunc(assigned) == 1.0
        })
    }

    fn copy_exists(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.real_users(), dims.real_objects(), dims.real_servers())
            .all(|(m, n, s)| candidate.x[[m, n, s]] <= candidate.x[[ORIGIN, n, s]])
    }

    fn server_capacity(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        dims.real_servers().all(|s| {
            let stored: f64 = dims
                .real_objects()
                .map(|n| candidate.x[[ORIGIN, n, s]] * self.assumptions().object_weight(n))
                .sum();
            stored <= self.assumptions().server_capacity(s)
        })
    }

    fn link_capacity(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        let x = candidate.x.view();
        dims.real_links().all(|l| {
            let utilization: f64 =
                iproduct!(dims.all_users(), dims.real_objects(), dims.real_servers())
                    .map(|(m, n, s)| {
                        self.assumptions().route_indicator(x, m, n, s, l)
                            * candidate.x[[m, n, s]]
                            * candidate.y[[m, n, s]]
                    })
                    .sum();
            utilization <= self.assumptions().link_capacity(l)
        })
    }

    fn min_rate(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.all_users(), dims.real_objects(), dims.real_servers()).all(|(m, n, s)| {
            candidate.y[[m, n, s]] >= candidate.x[[m, n, s]] * self.assumptions().min_rate(m, n)
        })
    }

    fn max_rate(&self, candidate: &Candidate) -> bool {
        let dims = self.dims();
        iproduct!(dims.all_users(), dims.real_objects(), dims.real_servers()).all(|(m, n, s)| {
            candidate.y[[m, n, s]] <= candidate.x[[m, n, s]] * self.assumptions().max_rate(m, n)
        })
    }
}
