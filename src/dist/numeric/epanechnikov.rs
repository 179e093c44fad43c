#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use super::Density;

/// The Epanechnikov kernel, f(x) = 3/4 (1 - x²) on [-1, 1]
///
/// # Example
///
/// ```
/// use probsim::dist::numeric::{Density, Epanechnikov};
///
/// assert_eq!(Epanechnikov.density(0.0), 0.75);
/// assert_eq!(Epanechnikov.density(1.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Epanechnikov;

impl Density for Epanechnikov {
    fn density(&self, x: f64) -> f64 {
        if (-1.0..=1.0).contains(&x) {
            0.75 * x.mul_add(-x, 1.0)
        } else {
            0.0
        }
    }

    fn bounds(&self) -> (f64, f64) {
        (-1.0, 1.0)
    }
}
