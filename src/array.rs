/// Defines a strongly typed wrapper around a 1-D parameter vector.
///
/// The wrappers keep the assumption tables from being mixed up at call sites:
/// a `ServerCapacities` cannot be passed where `LinkCosts` is expected, even
/// though both are `f64` vectors underneath.
#[macro_export]
macro_rules! array_wrapper {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(::ndarray::Array1<f64>);

        impl From<::ndarray::Array1<f64>> for $name {
            fn from(array: ::ndarray::Array1<f64>) -> Self {
                Self(array)
            }
        }

        impl From<Vec<f64>> for $name {
            fn from(vec: Vec<f64>) -> Self {
                Self(::ndarray::Array1::from(vec))
            }
        }

        impl ::std::iter::FromIterator<f64> for $name {
            fn from_iter<T>(iter: T) -> Self
            where
                T: IntoIterator<Item = f64>,
            {
                Self(iter.into_iter().collect())
            }
        }

        impl ::std::ops::Index<usize> for $name {
            type Output = f64;
            fn index(&self, index: usize) -> &f64 {
                &self.0[index]
            }
        }

        impl $name {
            /// Vector length.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Whether the vector is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Iterates the vector.
            pub fn iter(&self) -> impl Iterator<Item = &f64> {
                self.0.iter()
            }

            /// Returns the underlying vector.
            #[must_use]
            pub fn vec(&self) -> &::ndarray::Array1<f64> {
                &self.0
            }
        }
    };
}

#[cfg(test)]
mod test {
    array_wrapper!(Weights, "Test weights.");

    #[test]
    fn test_wrapper_construction() {
        let from_vec = Weights::from(vec![1.0, 2.0, 3.0]);
        let collected: Weights = vec![1.0, 2.0, 3.0].into_iter().collect();
        assert_eq!(from_vec, collected);
        assert_eq!(from_vec.len(), 3);
        assert!(!from_vec.is_empty());
        assert_eq!(from_vec[1], 2.0);
        assert_eq!(from_vec.iter().sum::<f64>(), 6.0);
    }
}
