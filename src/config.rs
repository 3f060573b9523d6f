//! Construction settings.

use num_traits::float::Float;

/// Tolerances and safety bounds used during construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config<T> {
    /// tolerance relative to the domain: areas are compared against
    /// `epsilon * width * height` and distances against `epsilon * diagonal`
    pub epsilon: T,
    /// flips allowed while legalizing a single insertion
    pub max_flips_per_insertion: usize,
}

impl<T: Float> Default for Config<T> {
    fn default() -> Self {
        Self {
            epsilon: T::from(1e-9).unwrap_or_else(T::epsilon),
            max_flips_per_insertion: 10_000,
        }
    }
}

impl<T: Float> Config<T> {
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_flips(mut self, max_flips: usize) -> Self {
        self.max_flips_per_insertion = max_flips;
        self
    }
}
