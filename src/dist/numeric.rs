//! Continuous distributions defined by nothing but a density on a finite
//! interval.
//!
//! Every other quantity is derived numerically: the CDF by adaptive
//! quadrature, quantiles by root finding on the CDF, moments by quadrature
//! and the mode by golden-section search.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::misc::quad_eps;
use crate::misc::root_finding::{bisection, golden_max, newton_bisection};
use crate::traits::*;
use rand::Rng;
use std::fmt;

mod epanechnikov;

pub use epanechnikov::Epanechnikov;

/// Integration tolerance for CDF and moment evaluation
const QUAD_TOL: f64 = 1E-10;
/// Allowed deviation of the density's integral from one
const NORM_TOL: f64 = 1E-6;
/// Convergence tolerance of quantile and mode searches
const SEARCH_TOL: f64 = 1E-12;
const MAX_ITER: usize = 200;

/// A probability density with finite support [a, b]
pub trait Density {
    /// The density at `x`. Only called for `x` within `bounds()`.
    fn density(&self, x: f64) -> f64;

    /// The support, `(a, b)`
    fn bounds(&self) -> (f64, f64);
}

/// A density built from a closure
///
/// # Example
///
/// ```
/// use probsim::dist::numeric::{FnDensity, NumericContinuous};
/// use probsim::traits::*;
///
/// // triangular density on [0, 2]
/// let tri = FnDensity::new(|x: f64| 1.0 - (x - 1.0).abs(), 0.0, 2.0);
/// let dist = NumericContinuous::new(tri).unwrap();
///
/// assert!((dist.cdf(&1.0) - 0.5).abs() < 1E-8);
/// ```
#[derive(Clone)]
pub struct FnDensity<F> {
    f: F,
    a: f64,
    b: f64,
}

impl<F> FnDensity<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(f: F, a: f64, b: f64) -> Self {
        FnDensity { f, a, b }
    }
}

impl<F> fmt::Debug for FnDensity<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDensity")
            .field("a", &self.a)
            .field("b", &self.b)
            .finish()
    }
}

impl<F> Density for FnDensity<F>
where
    F: Fn(f64) -> f64,
{
    fn density(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum NumericError {
    /// One of the bounds is infinite or NaN
    BoundsNotFinite { a: f64, b: f64 },
    /// The lower bound is not below the upper bound
    BoundsNotOrdered { a: f64, b: f64 },
    /// The density does not integrate to one over its bounds
    NotNormalized { integral: f64 },
    /// No point in the support has the requested cumulative probability
    QuantileNotFound { p: f64 },
}

/// Continuous distribution derived from a [`Density`]
///
/// # Example
///
/// ```
/// use probsim::dist::numeric::{Epanechnikov, NumericContinuous};
/// use probsim::traits::*;
///
/// let dist = NumericContinuous::new(Epanechnikov).unwrap();
///
/// assert!((dist.probability(-0.5, 0.5) - 0.6875).abs() < 1E-10);
/// assert!((dist.variance().unwrap() - 0.2).abs() < 1E-8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct NumericContinuous<D> {
    density: D,
    a: f64,
    b: f64,
    /// ∫ f over [a, b], as computed at construction
    integral: f64,
}

impl<D: Density> NumericContinuous<D> {
    /// Wrap `density`, checking its bounds and that it integrates to one
    pub fn new(density: D) -> Result<Self, NumericError> {
        let (a, b) = density.bounds();
        if !(a.is_finite() && b.is_finite()) {
            return Err(NumericError::BoundsNotFinite { a, b });
        } else if a >= b {
            return Err(NumericError::BoundsNotOrdered { a, b });
        }

        let integral = quad_eps(|x| density.density(x), a, b, Some(QUAD_TOL));
        if (integral - 1.0).abs() > NORM_TOL {
            Err(NumericError::NotNormalized { integral })
        } else {
            Ok(NumericContinuous {
                density,
                a,
                b,
                integral,
            })
        }
    }

    /// Wrap `density` without validating it
    pub fn new_unchecked(density: D) -> Self {
        let (a, b) = density.bounds();
        NumericContinuous {
            density,
            a,
            b,
            integral: 1.0,
        }
    }

    /// The wrapped density
    pub fn density(&self) -> &D {
        &self.density
    }

    /// The support, `(a, b)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// The integral of the density over its support
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// P(lo < X < hi)
    pub fn probability(&self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            0.0
        } else {
            self.cdf(&hi) - self.cdf(&lo)
        }
    }

    /// The x with `cdf(x) = p`, found by Newton steps kept inside the
    /// support with a bisection fallback
    pub fn try_invcdf(&self, p: f64) -> Result<f64, NumericError> {
        if p.is_nan() {
            return Err(NumericError::QuantileNotFound { p });
        } else if p <= 0.0 {
            return Ok(self.a);
        } else if p >= 1.0 {
            return Ok(self.b);
        }

        let x0 = self.a + (self.b - self.a) * p;
        let (a, b) = (self.a, self.b);
        let x = newton_bisection(a, b, x0, SEARCH_TOL, MAX_ITER, |x| {
            (self.cdf(&x) - p, self.density.density(x))
        })
        .or_else(|_| {
            bisection(a, b, SEARCH_TOL, MAX_ITER, |x| self.cdf(&x) - p)
        })
        .map_err(|_| NumericError::QuantileNotFound { p })?;

        // a density that evaluates to NaN leaves the search nothing to
        // converge on
        if self.cdf(&x).is_finite() {
            Ok(x)
        } else {
            Err(NumericError::QuantileNotFound { p })
        }
    }

    /// E[g(X)]
    pub fn expectation<G>(&self, g: G) -> f64
    where
        G: Fn(f64) -> f64,
    {
        quad_eps(
            |x| g(x) * self.density.density(x),
            self.a,
            self.b,
            Some(QUAD_TOL),
        )
    }

    fn central_moment(&self, k: i32) -> f64 {
        let m = self.expectation(|x| x);
        self.expectation(|x| (x - m).powi(k))
    }
}

impl<D> fmt::Display for NumericContinuous<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NumericContinuous(a: {}, b: {})", self.a, self.b)
    }
}

impl<D: Density> HasDensity<f64> for NumericContinuous<D> {
    fn f(&self, x: &f64) -> f64 {
        if self.supports(x) {
            self.density.density(*x)
        } else {
            0.0
        }
    }

    fn ln_f(&self, x: &f64) -> f64 {
        if self.supports(x) {
            self.density.density(*x).ln()
        } else {
            f64::NEG_INFINITY
        }
    }
}

impl<D: Density> Sampleable<f64> for NumericContinuous<D> {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        self.invcdf(u)
    }
}

impl<D: Density> Support<f64> for NumericContinuous<D> {
    fn supports(&self, x: &f64) -> bool {
        self.a <= *x && *x <= self.b
    }
}

impl<D: Density> ContinuousDistr<f64> for NumericContinuous<D> {}

impl<D: Density> Cdf<f64> for NumericContinuous<D> {
    fn cdf(&self, x: &f64) -> f64 {
        if *x <= self.a {
            0.0
        } else if *x >= self.b {
            1.0
        } else {
            quad_eps(|t| self.density.density(t), self.a, *x, Some(QUAD_TOL))
                .clamp(0.0, 1.0)
        }
    }
}

impl<D: Density> InverseCdf<f64> for NumericContinuous<D> {
    /// NaN when the search fails; see [`NumericContinuous::try_invcdf`]
    fn invcdf(&self, p: f64) -> f64 {
        self.try_invcdf(p).unwrap_or_else(|err| {
            tracing::warn!(p, %err, "quantile search failed");
            f64::NAN
        })
    }
}

impl<D: Density> Mean<f64> for NumericContinuous<D> {
    fn mean(&self) -> Option<f64> {
        Some(self.expectation(|x| x))
    }
}

impl<D: Density> Median<f64> for NumericContinuous<D> {
    fn median(&self) -> Option<f64> {
        Some(self.invcdf(0.5))
    }
}

impl<D: Density> Mode<f64> for NumericContinuous<D> {
    fn mode(&self) -> Option<f64> {
        Some(golden_max(self.a, self.b, 1E-9, |x| self.density.density(x)))
    }
}

impl<D: Density> Variance<f64> for NumericContinuous<D> {
    fn variance(&self) -> Option<f64> {
        Some(self.central_moment(2))
    }
}

impl<D: Density> Skewness for NumericContinuous<D> {
    fn skewness(&self) -> Option<f64> {
        let var = self.central_moment(2);
        if var <= 0.0 {
            None
        } else {
            Some(self.central_moment(3) / var.powf(1.5))
        }
    }
}

impl<D: Density> Kurtosis for NumericContinuous<D> {
    fn kurtosis(&self) -> Option<f64> {
        let var = self.central_moment(2);
        if var <= 0.0 {
            None
        } else {
            Some(self.central_moment(4) / (var * var) - 3.0)
        }
    }
}

impl std::error::Error for NumericError {}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundsNotFinite { a, b } => {
                write!(f, "non-finite bounds: [{}, {}]", a, b)
            }
            Self::BoundsNotOrdered { a, b } => {
                write!(f, "lower bound ({}) must be below upper bound ({})", a, b)
            }
            Self::NotNormalized { integral } => write!(
                f,
                "density integrates to {} over its bounds, not 1",
                integral
            ),
            Self::QuantileNotFound { p } => {
                write!(f, "no quantile found for p = {}", p)
            }
        }
    }
}
