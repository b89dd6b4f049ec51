//! Static per-entity cost, capacity, and rate parameters.
//!
//! The optimization model never owns these numbers; it asks an
//! [`Assumptions`](trait.Assumptions.html) collaborator for them. Every
//! method must be total over the valid index combinations of the configured
//! [`Dimensions`](struct.Dimensions.html).

use crate::{
    Dimensions, Error, LinkCapacities, LinkCosts, ObjectWeights, Result, ServerCapacities,
};
use ndarray::{Array2, ArrayView3};
use serde::{Deserialize, Serialize};

/// Externally supplied problem parameters.
///
/// `x` is passed to [`route_indicator`](#tymethod.route_indicator) because
/// routing may in general depend on the current placement; the table-driven
/// implementation in this crate ignores it.
pub trait Assumptions {
    /// Size/popularity weight of object `n` (`b_n`).
    fn object_weight(&self, n: usize) -> f64;

    /// Cost of storing a master copy of object `n` at server `s` (`d_ns`).
    fn storage_cost(&self, n: usize, s: usize) -> f64;

    /// Storage capacity of server `s` (`B_s`).
    fn server_capacity(&self, s: usize) -> f64;

    /// Throughput capacity of link `l` (`C_l`).
    fn link_capacity(&self, l: usize) -> f64;

    /// Unit transfer cost over link `l` (`k_l`).
    fn link_cost(&self, l: usize) -> f64;

    /// Whether link `l` carries the flow of object `n` from server `s` to
    /// user `m` (`a_mnsl`); returns 1.0 or 0.0.
    fn route_indicator(&self, x: ArrayView3<'_, f64>, m: usize, n: usize, s: usize, l: usize)
        -> f64;

    /// Minimum admissible transfer rate for user `m` and object `n`.
    fn min_rate(&self, m: usize, n: usize) -> f64;

    /// Maximum admissible transfer rate for user `m` and object `n`.
    fn max_rate(&self, m: usize, n: usize) -> f64;
}

/// Table-driven [`Assumptions`](trait.Assumptions.html).
///
/// Routing is a fixed table: `routes[(m, s)]` names the single link carrying
/// any flow from server `s` to user `m`, regardless of the object and of the
/// current placement.
#[derive(Debug, Clone)]
pub struct StaticAssumptions {
    object_weights: ObjectWeights,
    storage_costs: Array2<f64>,
    server_capacities: ServerCapacities,
    link_capacities: LinkCapacities,
    link_costs: LinkCosts,
    min_rates: Array2<f64>,
    max_rates: Array2<f64>,
    routes: Array2<usize>,
}

/// On-disk form of [`StaticAssumptions`](struct.StaticAssumptions.html),
/// including the dimensions the tables are validated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsFile {
    /// Number of user slots, origin included.
    pub users: usize,
    /// Number of object slots, sentinel included.
    pub objects: usize,
    /// Number of server slots, origin included.
    pub servers: usize,
    /// Number of link slots, sentinel included.
    pub links: usize,
    /// `b_n`, one entry per object slot.
    pub object_weights: Vec<f64>,
    /// `d_ns`, one row per object slot, one column per server slot.
    pub storage_costs: Vec<Vec<f64>>,
    /// `B_s`, one entry per server slot.
    pub server_capacities: Vec<f64>,
    /// `C_l`, one entry per link slot.
    pub link_capacities: Vec<f64>,
    /// `k_l`, one entry per link slot.
    pub link_costs: Vec<f64>,
    /// `y_mn_min`, one row per user slot, one column per object slot.
    pub min_rates: Vec<Vec<f64>>,
    /// `y_mn_max`, same shape as `min_rates`.
    pub max_rates: Vec<Vec<f64>>,
    /// Link carrying the `(user, server)` flow, one row per user slot.
    pub routes: Vec<Vec<usize>>,
}

fn table(table: &'static str, rows: &[Vec<f64>], nrows: usize, ncols: usize) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    if rows.len() != nrows || flat.len() != nrows * ncols {
        return Err(Error::ShapeMismatch {
            table,
            expected: nrows * ncols,
            actual: flat.len(),
        });
    }
    Ok(Array2::from_shape_vec((nrows, ncols), flat).expect("shape checked above"))
}

fn vector(table: &'static str, values: &[f64], expected: usize) -> Result<Vec<f64>> {
    if values.len() != expected {
        return Err(Error::ShapeMismatch {
            table,
            expected,
            actual: values.len(),
        });
    }
    Ok(values.to_vec())
}

impl StaticAssumptions {
    /// Validates the tables in `params` against its declared dimensions and
    /// builds the assumption set.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeMismatch`](../enum.Error.html) error naming the first
    /// table whose size disagrees with the dimensions, or
    /// [`BadRoute`](../enum.Error.html) if a route entry points past the last
    /// link slot.
    pub fn from_params(params: &ParamsFile) -> Result<(Dimensions, Self)> {
        let dims = Dimensions::new(params.users, params.objects, params.servers, params.links)?;
        let object_weights =
            ObjectWeights::from(vector("object_weights", &params.object_weights, dims.objects)?);
        let server_capacities = ServerCapacities::from(vector(
            "server_capacities",
            &params.server_capacities,
            dims.servers,
        )?);
        let link_capacities =
            LinkCapacities::from(vector("link_capacities", &params.link_capacities, dims.links)?);
        let link_costs = LinkCosts::from(vector("link_costs", &params.link_costs, dims.links)?);
        let storage_costs = table("storage_costs", &params.storage_costs, dims.objects, dims.servers)?;
        let min_rates = table("min_rates", &params.min_rates, dims.users, dims.objects)?;
        let max_rates = table("max_rates", &params.max_rates, dims.users, dims.objects)?;

        let route_entries: Vec<usize> = params.routes.iter().flatten().copied().collect();
        if params.routes.len() != dims.users || route_entries.len() != dims.users * dims.servers {
            return Err(Error::ShapeMismatch {
                table: "routes",
                expected: dims.users * dims.servers,
                actual: route_entries.len(),
            });
        }
        if let Some(&link) = route_entries.iter().find(|&&l| l >= dims.links) {
            return Err(Error::BadRoute {
                link,
                links: dims.links,
            });
        }
        let routes = Array2::from_shape_vec((dims.users, dims.servers), route_entries)
            .expect("shape checked above");

        Ok((
            dims,
            Self {
                object_weights,
                storage_costs,
                server_capacities,
                link_capacities,
                link_costs,
                min_rates,
                max_rates,
                routes,
            },
        ))
    }

    /// The built-in reference instance matching
    /// [`Dimensions::reference`](struct.Dimensions.html#method.reference).
    ///
    /// Each user reaches each server over a dedicated link
    /// (`route = m * (S + 1) + s + 1`), link costs are small relative to the
    /// object weights so that serving content pays off, and the single edge
    /// server has enough storage for both real objects.
    #[must_use]
    pub fn reference() -> (Dimensions, Self) {
        let dims = Dimensions::reference();
        let params = ParamsFile::reference(dims);
        Self::from_params(&params).expect("reference tables match reference dimensions")
    }
}

impl ParamsFile {
    /// The parameter tables of the built-in reference instance, in their
    /// serializable form. Useful as a template for hand-written instances.
    #[must_use]
    pub fn reference(dims: Dimensions) -> Self {
        let uniform = |value: f64, len: usize| vec![value; len];
        Self {
            users: dims.users,
            objects: dims.objects,
            servers: dims.servers,
            links: dims.links,
            object_weights: vec![1.0, 1.0, 2.0],
            storage_costs: vec![
                uniform(0.0, dims.servers),
                vec![0.0, 1.0],
                vec![0.0, 2.0],
            ],
            server_capacities: vec![f64::MAX, 10.0],
            link_capacities: uniform(100.0, dims.links),
            link_costs: uniform(0.01, dims.links),
            min_rates: vec![uniform(0.5, dims.objects); dims.users],
            max_rates: vec![uniform(5.0, dims.objects); dims.users],
            routes: (0..dims.users)
                .map(|m| (0..dims.servers).map(|s| m * (dims.servers + 1) + s + 1).collect())
                .collect(),
        }
    }
}

impl Assumptions for StaticAssumptions {
    fn object_weight(&self, n: usize) -> f64 {
        self.object_weights[n]
    }

    fn storage_cost(&self, n: usize, s: usize) -> f64 {
        self.storage_costs[(n, s)]
    }

    fn server_capacity(&self, s: usize) -> f64 {
        self.server_capacities[s]
    }

    fn link_capacity(&self, l: usize) -> f64 {
        self.link_capacities[l]
    }

    fn link_cost(&self, l: usize) -> f64 {
        self.link_costs[l]
    }

    fn route_indicator(
        &self,
        _x: ArrayView3<'_, f64>,
        m: usize,
        _n: usize,
        s: usize,
        l: usize,
    ) -> f64 {
        if self.routes[(m, s)] == l {
            1.0
        } else {
            0.0
        }
    }

    fn min_rate(&self, m: usize, n: usize) -> f64 {
        self.min_rates[(m, n)]
    }

    fn max_rate(&self, m: usize, n: usize) -> f64 {
        self.max_rates[(m, n)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_reference_tables_are_total() {
        let (dims, assumptions) = StaticAssumptions::reference();
        let x = Array3::<f64>::zeros(dims.tensor_shape());
        for n in 0..dims.objects {
            let _ = assumptions.object_weight(n);
            for s in 0..dims.servers {
                let _ = assumptions.storage_cost(n, s);
            }
        }
        for s in 0..dims.servers {
            assert!(assumptions.server_capacity(s) > 0.0);
        }
        for l in 0..dims.links {
            assert!(assumptions.link_capacity(l) > 0.0);
            assert!(assumptions.link_cost(l) >= 0.0);
        }
        for m in 0..dims.users {
            for n in 0..dims.objects {
                assert!(assumptions.min_rate(m, n) <= assumptions.max_rate(m, n));
            }
            for s in 0..dims.servers {
                let carried: f64 = (0..dims.links)
                    .map(|l| assumptions.route_indicator(x.view(), m, 0, s, l))
                    .sum();
                assert_eq!(carried, 1.0, "each (user, server) flow uses one link");
            }
        }
    }

    #[test]
    fn test_routes_are_real_links() {
        let (dims, assumptions) = StaticAssumptions::reference();
        let x = Array3::<f64>::zeros(dims.tensor_shape());
        // The sentinel link must never carry traffic.
        for m in 0..dims.users {
            for s in 0..dims.servers {
                assert_eq!(assumptions.route_indicator(x.view(), m, 1, s, 0), 0.0);
            }
        }
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let dims = Dimensions::reference();
        let mut params = ParamsFile::reference(dims);
        params.object_weights.pop();
        match StaticAssumptions::from_params(&params) {
            Err(Error::ShapeMismatch { table, .. }) => assert_eq!(table, "object_weights"),
            other => panic!("expected shape mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bad_route_is_reported() {
        let dims = Dimensions::reference();
        let mut params = ParamsFile::reference(dims);
        params.routes[0][0] = dims.links;
        assert!(matches!(
            StaticAssumptions::from_params(&params),
            Err(Error::BadRoute { .. })
        ));
    }
}
