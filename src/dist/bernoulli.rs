//! Bernoulli distribution of x in {0, 1}
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::data::BernoulliSuffStat;
use crate::impl_display;
use crate::traits::*;
use rand::Rng;
use std::f64;
use std::fmt;

/// [Bernoulli distribution](https://en.wikipedia.org/wiki/Bernoulli_distribution)
/// with success probability *p*
///
/// # Example
///
/// Toss a fair coin
///
/// ```
/// use probsim::prelude::*;
///
/// let coin = Bernoulli::uniform();
/// assert_eq!(coin.pmf(&true), 0.5);
///
/// let mut rng = rand::thread_rng();
/// let tosses: Vec<bool> = coin.sample(100, &mut rng);
/// assert_eq!(tosses.len(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Bernoulli {
    /// Probability of a success (x=1)
    p: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum BernoulliError {
    /// Bernoulli p is less than zero
    PLessThanZero { p: f64 },
    /// Bernoulli p is greater than one
    PGreaterThanOne { p: f64 },
    /// Bernoulli p is infinite or NaN
    PNotFinite { p: f64 },
}

impl Bernoulli {
    /// Create a new Bernoulli distribution.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use probsim::dist::Bernoulli;
    /// assert!(Bernoulli::new(0.5).is_ok());
    /// assert!(Bernoulli::new(0.0).is_ok());
    /// assert!(Bernoulli::new(-0.1).is_err());
    /// assert!(Bernoulli::new(1.1).is_err());
    /// ```
    pub fn new(p: f64) -> Result<Self, BernoulliError> {
        if !p.is_finite() {
            Err(BernoulliError::PNotFinite { p })
        } else if p > 1.0 {
            Err(BernoulliError::PGreaterThanOne { p })
        } else if p < 0.0 {
            Err(BernoulliError::PLessThanZero { p })
        } else {
            Ok(Bernoulli { p })
        }
    }

    /// Creates a new Bernoulli without checking whether parameter value is
    /// valid.
    #[inline]
    pub fn new_unchecked(p: f64) -> Self {
        Bernoulli { p }
    }

    /// A Bernoulli distribution with a 50% chance of success: a fair coin
    #[inline]
    pub fn uniform() -> Self {
        Bernoulli::new_unchecked(0.5)
    }

    /// Get p
    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// The complement of `p`, i.e. `(1 - p)`.
    #[inline]
    pub fn q(&self) -> f64 {
        1.0 - self.p
    }

    /// Toss `n` times and tally the outcomes
    pub fn tally<R: Rng>(&self, n: usize, rng: &mut R) -> BernoulliSuffStat {
        let mut stat = BernoulliSuffStat::new();
        for _ in 0..n {
            let x: bool = self.draw(rng);
            stat.observe(&x);
        }
        stat
    }
}

impl Default for Bernoulli {
    fn default() -> Self {
        Bernoulli::uniform()
    }
}

impl From<&Bernoulli> for String {
    fn from(b: &Bernoulli) -> String {
        format!("Bernoulli(p: {})", b.p)
    }
}

impl_display!(Bernoulli);

impl HasDensity<bool> for Bernoulli {
    fn f(&self, x: &bool) -> f64 {
        if *x {
            self.p
        } else {
            self.q()
        }
    }

    fn ln_f(&self, x: &bool) -> f64 {
        self.f(x).ln()
    }
}

impl Sampleable<bool> for Bernoulli {
    fn draw<R: Rng>(&self, rng: &mut R) -> bool {
        let u: f64 = rng.gen();
        u < self.p
    }
}

impl Support<bool> for Bernoulli {
    fn supports(&self, _x: &bool) -> bool {
        true
    }
}

impl DiscreteDistr<bool> for Bernoulli {
    fn pmf(&self, x: &bool) -> f64 {
        self.f(x)
    }
}

impl Cdf<bool> for Bernoulli {
    fn cdf(&self, x: &bool) -> f64 {
        if *x {
            1.0
        } else {
            self.q()
        }
    }
}

impl Mean<f64> for Bernoulli {
    fn mean(&self) -> Option<f64> {
        Some(self.p)
    }
}

impl Mode<bool> for Bernoulli {
    fn mode(&self) -> Option<bool> {
        let q = self.q();
        if self.p < q {
            Some(false)
        } else if (self.p - q).abs() < f64::EPSILON {
            None
        } else {
            Some(true)
        }
    }
}

impl Variance<f64> for Bernoulli {
    fn variance(&self) -> Option<f64> {
        Some(self.p * (1.0 - self.p))
    }
}

impl Skewness for Bernoulli {
    fn skewness(&self) -> Option<f64> {
        Some((1.0 - 2.0 * self.p) / (self.p * self.q()).sqrt())
    }
}

impl Kurtosis for Bernoulli {
    fn kurtosis(&self) -> Option<f64> {
        let q = self.q();
        Some(1.0 / (self.p * q) - 6.0)
    }
}

impl std::error::Error for BernoulliError {}

impl fmt::Display for BernoulliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PLessThanZero { p } => {
                write!(f, "p ({}) was less than zero", p)
            }
            Self::PGreaterThanOne { p } => {
                write!(f, "p ({}) was greater than one", p)
            }
            Self::PNotFinite { p } => write!(f, "p ({}) was non-finite", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_basic_impls;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    test_basic_impls!(Bernoulli::uniform());

    #[test]
    fn new() {
        let b: Bernoulli = Bernoulli::new(0.1).unwrap();
        assert::close(b.p, 0.1, TOL);
    }

    #[test]
    fn q_should_be_the_compliment_of_p() {
        let b: Bernoulli = Bernoulli::new(0.1).unwrap();
        assert::close(b.q(), 0.9, TOL);
    }

    #[test]
    fn pmf_of_true_should_be_p() {
        let b = Bernoulli::new(0.1).unwrap();
        assert::close(b.pmf(&true), 0.1, TOL);
        assert::close(b.pmf(&false), 0.9, TOL);
    }

    #[test]
    fn cdf_of_false_is_q() {
        let b = Bernoulli::new(0.1).unwrap();
        assert::close(b.cdf(&false), 0.9, TOL);
        assert::close(b.cdf(&true), 1.0, TOL);
    }

    #[test]
    fn mode_for_even_p_is_none() {
        assert!(Bernoulli::uniform().mode().is_none());
        assert_eq!(Bernoulli::new(0.8).unwrap().mode(), Some(true));
        assert_eq!(Bernoulli::new(0.2).unwrap().mode(), Some(false));
    }

    #[test]
    fn variance_for_uniform() {
        assert::close(Bernoulli::uniform().variance().unwrap(), 0.25, TOL);
    }

    #[test]
    fn uniform_skewness_should_be_zero() {
        assert::close(Bernoulli::uniform().skewness().unwrap(), 0.0, TOL);
    }

    #[test]
    fn uniform_kurtosis() {
        assert::close(Bernoulli::uniform().kurtosis().unwrap(), -2.0, TOL);
    }

    #[test]
    fn tally_counts_every_toss() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let stat = Bernoulli::uniform().tally(2000, &mut rng);
        assert_eq!(stat.n(), 2000);
        assert_eq!(stat.k() + stat.failures(), 2000);
        // 5 sigma is ~0.056
        assert!((stat.frequency().unwrap() - 0.5).abs() < 0.056);
    }

    #[test]
    fn certain_coin_always_succeeds() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let stat = Bernoulli::new(1.0).unwrap().tally(100, &mut rng);
        assert_eq!(stat.k(), 100);
    }
}
