//! Hypergeometric distribution
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::misc::ln_binom;
use crate::traits::*;
use rand::Rng;
use std::fmt;

/// [Hypergeometric distribution](https://en.wikipedia.org/wiki/Hypergeometric_distribution):
/// the number of successes in `draws` draws, without replacement, from a
/// population of `population` items of which `successes` are successes.
///
/// # Example
///
/// Five cards from a deck of twelve that holds four aces.
///
/// ```
/// use probsim::prelude::*;
///
/// let hg = Hypergeometric::new(12, 4, 5).unwrap();
///
/// // C(8, 5) / C(12, 5) = 56 / 792
/// assert!((hg.pmf(&0_u32) - 56.0 / 792.0).abs() < 1E-12);
/// assert_eq!(hg.support_bounds(), (0, 4));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Hypergeometric {
    /// Population size, N
    population: u64,
    /// Number of successes in the population, K
    successes: u64,
    /// Number of draws, n
    draws: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum HypergeometricError {
    /// The population is empty
    PopulationIsZero,
    /// More successes than items in the population
    SuccessesExceedPopulation { successes: u64, population: u64 },
    /// More draws than items in the population
    DrawsExceedPopulation { draws: u64, population: u64 },
}

impl Hypergeometric {
    /// Create a new Hypergeometric distribution
    ///
    /// # Arguments
    /// - population: population size, N
    /// - successes: number of success states in the population, K
    /// - draws: number of draws, n
    pub fn new(
        population: u64,
        successes: u64,
        draws: u64,
    ) -> Result<Self, HypergeometricError> {
        if population == 0 {
            Err(HypergeometricError::PopulationIsZero)
        } else if successes > population {
            Err(HypergeometricError::SuccessesExceedPopulation {
                successes,
                population,
            })
        } else if draws > population {
            Err(HypergeometricError::DrawsExceedPopulation {
                draws,
                population,
            })
        } else {
            Ok(Hypergeometric::new_unchecked(population, successes, draws))
        }
    }

    /// Creates a new Hypergeometric without checking whether the parameters
    /// are valid.
    #[inline]
    pub fn new_unchecked(population: u64, successes: u64, draws: u64) -> Self {
        Hypergeometric {
            population,
            successes,
            draws,
        }
    }

    /// Population size, N
    #[inline]
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Number of successes in the population, K
    #[inline]
    pub fn successes(&self) -> u64 {
        self.successes
    }

    /// Number of draws, n
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Smallest and largest value with non-zero mass,
    /// max(0, n + K - N) and min(K, n)
    pub fn support_bounds(&self) -> (u64, u64) {
        let lower = (self.draws + self.successes).saturating_sub(self.population);
        let upper = self.successes.min(self.draws);
        (lower, upper)
    }

    fn nkf(&self) -> (f64, f64, f64) {
        (
            self.population as f64,
            self.successes as f64,
            self.draws as f64,
        )
    }
}

impl From<&Hypergeometric> for String {
    fn from(hg: &Hypergeometric) -> String {
        format!(
            "Hypergeometric(N: {}, K: {}, n: {})",
            hg.population, hg.successes, hg.draws
        )
    }
}

impl_display!(Hypergeometric);

macro_rules! impl_traits {
    ($kind:ty) => {
        impl HasDensity<$kind> for Hypergeometric {
            fn ln_f(&self, k: &$kind) -> f64 {
                let (nn, kk, n) = self.nkf();
                let kf = *k as f64;
                ln_binom(kk, kf) + ln_binom(nn - kk, n - kf) - ln_binom(nn, n)
            }
        }

        impl Sampleable<$kind> for Hypergeometric {
            fn draw<R: Rng>(&self, rng: &mut R) -> $kind {
                let hg = rand_distr::Hypergeometric::new(
                    self.population,
                    self.successes,
                    self.draws,
                )
                .unwrap();
                rng.sample(hg) as $kind
            }
        }

        impl Support<$kind> for Hypergeometric {
            fn supports(&self, k: &$kind) -> bool {
                let (lower, upper) = self.support_bounds();
                let k = *k as u64;
                lower <= k && k <= upper
            }
        }

        impl DiscreteDistr<$kind> for Hypergeometric {}

        impl Cdf<$kind> for Hypergeometric {
            fn cdf(&self, k: &$kind) -> f64 {
                let (lower, upper) = self.support_bounds();
                let k = *k as u64;
                if k < lower {
                    0.0
                } else if k >= upper {
                    1.0
                } else {
                    (lower..=k).fold(0.0, |acc, x| acc + self.pmf(&(x as $kind)))
                }
            }
        }

        impl Mode<$kind> for Hypergeometric {
            fn mode(&self) -> Option<$kind> {
                let (nn, kk, n) = self.nkf();
                Some(((n + 1.0) * (kk + 1.0) / (nn + 2.0)).floor() as $kind)
            }
        }
    };
}

impl Mean<f64> for Hypergeometric {
    fn mean(&self) -> Option<f64> {
        let (nn, kk, n) = self.nkf();
        Some(n * kk / nn)
    }
}

impl Variance<f64> for Hypergeometric {
    fn variance(&self) -> Option<f64> {
        let (nn, kk, n) = self.nkf();
        if self.population == 1 {
            Some(0.0)
        } else {
            Some(n * (kk / nn) * ((nn - kk) / nn) * ((nn - n) / (nn - 1.0)))
        }
    }
}

impl Skewness for Hypergeometric {
    fn skewness(&self) -> Option<f64> {
        let (nn, kk, n) = self.nkf();
        let denom = (n * kk * (nn - kk) * (nn - n)).sqrt() * (nn - 2.0);
        if denom == 0.0 {
            None
        } else {
            Some(
                (nn - 2.0 * kk) * (nn - 1.0).sqrt() * (nn - 2.0 * n) / denom,
            )
        }
    }
}

impl Kurtosis for Hypergeometric {
    fn kurtosis(&self) -> Option<f64> {
        let (nn, kk, n) = self.nkf();
        let denom = n * kk * (nn - kk) * (nn - n) * (nn - 2.0) * (nn - 3.0);
        if denom == 0.0 {
            None
        } else {
            let a = (nn - 1.0)
                * nn
                * nn
                * (nn * (nn + 1.0)
                    - 6.0 * kk * (nn - kk)
                    - 6.0 * n * (nn - n));
            let b = 6.0 * n * kk * (nn - kk) * (nn - n) * 5.0_f64.mul_add(nn, -6.0);
            Some((a + b) / denom)
        }
    }
}

impl_traits!(u8);
impl_traits!(u16);
impl_traits!(u32);
impl_traits!(u64);
impl_traits!(usize);

impl std::error::Error for HypergeometricError {}

impl fmt::Display for HypergeometricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationIsZero => write!(f, "population was zero"),
            Self::SuccessesExceedPopulation {
                successes,
                population,
            } => write!(
                f,
                "successes ({}) exceed the population ({})",
                successes, population
            ),
            Self::DrawsExceedPopulation { draws, population } => write!(
                f,
                "draws ({}) exceed the population ({})",
                draws, population
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::misc::x2_test;
    use crate::test_basic_impls;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;
    const N_TRIES: usize = 5;
    const X2_PVAL: f64 = 0.2;

    test_basic_impls!(Hypergeometric::new(12, 4, 5).unwrap());

    #[test]
    fn new_rejects_invalid_parameters() {
        assert_eq!(
            Hypergeometric::new(0, 0, 0),
            Err(HypergeometricError::PopulationIsZero)
        );
        assert!(Hypergeometric::new(10, 11, 2).is_err());
        assert!(Hypergeometric::new(10, 2, 11).is_err());
    }

    #[test]
    fn pmf_of_card_draws() {
        let hg = Hypergeometric::new(12, 4, 5).unwrap();
        let expected = [56.0, 280.0, 336.0, 112.0, 8.0];
        for (k, e) in expected.iter().enumerate() {
            assert::close(hg.pmf(&(k as u32)), e / 792.0, TOL);
        }
        assert_eq!(hg.pmf(&5_u32), 0.0);
    }

    #[test]
    fn pmf_sums_to_one() {
        let hg = Hypergeometric::new(20, 7, 12).unwrap();
        let (lower, upper) = hg.support_bounds();
        assert_eq!((lower, upper), (0, 7));
        let total: f64 = (lower..=upper).map(|k| hg.pmf(&k)).sum();
        assert::close(total, 1.0, TOL);
    }

    #[test]
    fn support_lower_bound_is_forced() {
        // drawing 9 of 10 items with 5 successes guarantees at least 4
        let hg = Hypergeometric::new(10, 5, 9).unwrap();
        assert_eq!(hg.support_bounds(), (4, 5));
        assert!(!hg.supports(&3_u32));
        assert_eq!(hg.cdf(&3_u32), 0.0);
    }

    #[test]
    fn cdf() {
        let hg = Hypergeometric::new(12, 4, 5).unwrap();
        assert::close(hg.cdf(&1_u32), 336.0 / 792.0, TOL);
        assert::close(hg.cdf(&4_u32), 1.0, TOL);
    }

    #[test]
    fn moments() {
        let hg = Hypergeometric::new(12, 4, 5).unwrap();
        assert::close(hg.mean().unwrap(), 5.0 / 3.0, TOL);
        assert::close(hg.variance().unwrap(), 70.0 / 99.0, TOL);
        let mode: u32 = hg.mode().unwrap();
        assert_eq!(mode, 2);
    }

    #[test]
    fn skewness_and_kurtosis_match_enumeration() {
        let hg = Hypergeometric::new(12, 4, 5).unwrap();
        let mean = hg.mean().unwrap();
        let var = hg.variance().unwrap();
        let central = |p: i32| -> f64 {
            (0..=4_u32)
                .map(|k| hg.pmf(&k) * (f64::from(k) - mean).powi(p))
                .sum()
        };
        assert::close(
            hg.skewness().unwrap(),
            central(3) / var.powf(1.5),
            1E-10,
        );
        assert::close(
            hg.kurtosis().unwrap(),
            central(4) / (var * var) - 3.0,
            1E-10,
        );
    }

    #[test]
    fn draw_test() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0x4E6);
        let hg = Hypergeometric::new(12, 4, 5).unwrap();
        let ps: Vec<f64> = (0..=4_u32).map(|k| hg.pmf(&k)).collect();

        let passes = (0..N_TRIES).fold(0, |acc, _| {
            let mut f_obs: Vec<u32> = vec![0; 5];
            let xs: Vec<usize> = hg.sample(1000, &mut rng);
            xs.iter().for_each(|&x| f_obs[x] += 1);
            let (_, p) = x2_test(&f_obs, &ps);
            if p > X2_PVAL {
                acc + 1
            } else {
                acc
            }
        });
        assert!(passes > 0);
    }
}
