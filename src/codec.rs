//! Flat-vector encoding of the decision tensors.
//!
//! The external minimizer only understands 1-D vectors, so the placement
//! tensor `x` and the rate tensor `y` travel as one row-major concatenation.
//! Decoding never clamps or validates values; range and integrality are the
//! business of the constraint set, not the codec.

use crate::{Dimensions, Error, Result};
use ndarray::{Array1, Array3, ArrayView1, ArrayView3};

/// Bidirectional mapping between `(users, objects, servers)` tensors and
/// flat vectors of a fixed length.
#[derive(Debug, Copy, Clone)]
pub struct Codec {
    dims: Dimensions,
}

impl Codec {
    /// Creates a codec for tensors of the given dimensions.
    #[must_use]
    pub fn new(dims: Dimensions) -> Self {
        Self { dims }
    }

    /// The dimensions this codec encodes for.
    #[must_use]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Flattens a tensor into a row-major vector.
    #[must_use]
    pub fn flatten(&self, tensor: ArrayView3<'_, f64>) -> Array1<f64> {
        tensor.iter().copied().collect()
    }

    /// Reshapes a row-major vector back into a tensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VectorLength`](../enum.Error.html) if the vector does
    /// not hold exactly `users * objects * servers` entries.
    pub fn unflatten(&self, vector: ArrayView1<'_, f64>) -> Result<Array3<f64>> {
        if vector.len() != self.dims.tensor_len() {
            return Err(Error::VectorLength {
                expected: self.dims.tensor_len(),
                actual: vector.len(),
            });
        }
        Ok(
            Array3::from_shape_vec(self.dims.tensor_shape(), vector.iter().copied().collect())
                .expect("length checked above"),
        )
    }

    /// Concatenates the flattenings of `x` and `y` into one vector.
    #[must_use]
    pub fn encode(&self, x: ArrayView3<'_, f64>, y: ArrayView3<'_, f64>) -> Array1<f64> {
        x.iter().chain(y.iter()).copied().collect()
    }

    /// Splits a flat vector at its midpoint and reshapes both halves.
    ///
    /// Exact left inverse of [`encode`](#method.encode). Any vector of the
    /// expected total length decodes, whatever its values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VectorLength`](../enum.Error.html) if the vector does
    /// not hold exactly `2 * users * objects * servers` entries.
    pub fn decode(&self, vector: ArrayView1<'_, f64>) -> Result<(Array3<f64>, Array3<f64>)> {
        if vector.len() != self.dims.vector_len() {
            return Err(Error::VectorLength {
                expected: self.dims.vector_len(),
                actual: vector.len(),
            });
        }
        let half = self.dims.tensor_len();
        let x = self.unflatten(vector.slice(ndarray::s![..half]))?;
        let y = self.unflatten(vector.slice(ndarray::s![half..]))?;
        Ok((x, y))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array;
    use proptest::prelude::*;

    fn dims_and_tensor() -> impl Strategy<Value = (Dimensions, Array3<f64>)> {
        ((1..5_usize), (1..5_usize), (1..4_usize)).prop_flat_map(|(users, objects, servers)| {
            prop::collection::vec(-10.0..10.0_f64, users * objects * servers).prop_map(
                move |vec| {
                    let dims = Dimensions::new(users, objects, servers, 1).unwrap();
                    let tensor =
                        Array::from_shape_vec((users, objects, servers), vec).unwrap();
                    (dims, tensor)
                },
            )
        })
    }

    #[test]
    fn test_flatten_is_row_major() {
        let dims = Dimensions::new(2, 2, 2, 1).unwrap();
        let codec = Codec::new(dims);
        let tensor = Array::from_shape_vec(
            (2, 2, 2),
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
        )
        .unwrap();
        let flat = codec.flatten(tensor.view());
        assert_eq!(flat.to_vec(), (0..8).map(f64::from).collect::<Vec<_>>());
        // The last axis (servers) varies fastest.
        assert_eq!(tensor[[1, 0, 1]], flat[5]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let codec = Codec::new(Dimensions::reference());
        let short = Array1::zeros(codec.dims().vector_len() - 1);
        match codec.decode(short.view()) {
            Err(Error::VectorLength { expected, actual }) => {
                assert_eq!(expected, 36);
                assert_eq!(actual, 35);
            }
            other => panic!("expected length error, got {:?}", other.map(|_| ())),
        }
        assert!(codec
            .unflatten(Array1::zeros(codec.dims().tensor_len() + 1).view())
            .is_err());
    }

    #[test]
    fn test_decode_does_not_clamp() {
        let codec = Codec::new(Dimensions::new(1, 1, 1, 1).unwrap());
        let vector = Array1::from(vec![-7.5, 1e9]);
        let (x, y) = codec.decode(vector.view()).unwrap();
        assert_eq!(x[[0, 0, 0]], -7.5);
        assert_eq!(y[[0, 0, 0]], 1e9);
    }

    proptest! {
        #[test]
        fn test_unflatten_inverts_flatten((dims, tensor) in dims_and_tensor()) {
            let codec = Codec::new(dims);
            let restored = codec.unflatten(codec.flatten(tensor.view()).view()).unwrap();
            prop_assert_eq!(restored, tensor);
        }

        #[test]
        fn test_decode_inverts_encode(
            (dims, x) in dims_and_tensor(),
            scale in 0.1..10.0_f64,
        ) {
            let codec = Codec::new(dims);
            let y = x.mapv(|v| v * scale);
            let encoded = codec.encode(x.view(), y.view());
            prop_assert_eq!(encoded.len(), dims.vector_len());
            let (dx, dy) = codec.decode(encoded.view()).unwrap();
            prop_assert_eq!(dx, x);
            prop_assert_eq!(dy, y);
        }
    }
}
