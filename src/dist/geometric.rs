//! Geometric distribution over x in {0, 1, 2, 3, ... }
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::traits::*;
use rand::Rng;
use std::fmt;

/// [Geometric distribution](https://en.wikipedia.org/wiki/Geometric_distribution)
/// over x in {0, 1, 2, 3, ... }: the number of failures before the first
/// success.
///
/// # Example
///
/// ```
/// use probsim::prelude::*;
///
/// // Create Geometric(p=0.5)
/// let geom = Geometric::new(0.5).unwrap();
///
/// // No failures happens half of the time
/// assert!((geom.pmf(&0_u32) - 0.5).abs() < 1E-12);
///
/// // Draw Samples
/// let mut rng = rand::thread_rng();
/// let xs: Vec<u32> = geom.sample(100, &mut rng);
/// assert_eq!(xs.len(), 100)
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Geometric {
    p: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum GeometricError {
    /// The p parameter is infinite or NaN
    PNotFinite { p: f64 },
    /// The p parameter is less than or equal to zero
    PTooLow { p: f64 },
    /// The p parameter is greater than one
    PGreaterThanOne { p: f64 },
}

impl Geometric {
    /// Create a new geometric distribution
    ///
    /// # Arguments
    /// - p: The success probability, in (0, 1]
    pub fn new(p: f64) -> Result<Self, GeometricError> {
        if !p.is_finite() {
            Err(GeometricError::PNotFinite { p })
        } else if p > 1.0 {
            Err(GeometricError::PGreaterThanOne { p })
        } else if p <= 0.0 {
            Err(GeometricError::PTooLow { p })
        } else {
            Ok(Geometric { p })
        }
    }

    /// Creates a new Geometric without checking whether the parameter is
    /// valid.
    #[inline]
    pub fn new_unchecked(p: f64) -> Self {
        Geometric { p }
    }

    /// Get the p parameter
    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl From<&Geometric> for String {
    fn from(geom: &Geometric) -> String {
        format!("Geometric(p: {})", geom.p)
    }
}

impl_display!(Geometric);

macro_rules! impl_traits {
    ($kind:ty) => {
        impl HasDensity<$kind> for Geometric {
            fn ln_f(&self, k: &$kind) -> f64 {
                let kf = *k as f64;
                if kf == 0.0 {
                    self.p.ln()
                } else {
                    kf.mul_add((1.0 - self.p).ln(), self.p.ln())
                }
            }
        }

        impl Sampleable<$kind> for Geometric {
            fn draw<R: Rng>(&self, rng: &mut R) -> $kind {
                if self.p == 1.0 {
                    return 0;
                }
                // inverse transform sampling on the open unit interval
                let u: f64 = rng.sample(rand_distr::Open01);
                (u.ln() / (1.0 - self.p).ln()).floor() as $kind
            }
        }

        impl Support<$kind> for Geometric {
            #[allow(unused_comparisons)]
            fn supports(&self, k: &$kind) -> bool {
                *k >= 0
            }
        }

        impl DiscreteDistr<$kind> for Geometric {}

        impl Cdf<$kind> for Geometric {
            fn cdf(&self, k: &$kind) -> f64 {
                let kf = *k as f64;
                1.0 - (1.0 - self.p).powf(kf + 1.0)
            }
        }

        impl Mode<$kind> for Geometric {
            fn mode(&self) -> Option<$kind> {
                Some(0)
            }
        }
    };
}

impl Mean<f64> for Geometric {
    fn mean(&self) -> Option<f64> {
        Some((1.0 - self.p) / self.p)
    }
}

impl Variance<f64> for Geometric {
    fn variance(&self) -> Option<f64> {
        Some((1.0 - self.p) / (self.p * self.p))
    }
}

impl Skewness for Geometric {
    fn skewness(&self) -> Option<f64> {
        Some((2.0 - self.p) / (1.0 - self.p).sqrt())
    }
}

impl Kurtosis for Geometric {
    fn kurtosis(&self) -> Option<f64> {
        Some(6.0 + (self.p * self.p) / (1.0 - self.p))
    }
}

impl_traits!(u8);
impl_traits!(u16);
impl_traits!(u32);
impl_traits!(usize);

impl std::error::Error for GeometricError {}

impl fmt::Display for GeometricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PNotFinite { p } => write!(f, "non-finite p: {}", p),
            Self::PTooLow { p } => {
                write!(f, "p ({}) must be greater than zero", p)
            }
            Self::PGreaterThanOne { p } => {
                write!(f, "p ({}) must not be greater than one", p)
            }
        }
    }
}
