#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::traits::SuffStat;

/// Running moments of real-valued observations.
///
/// Holds the number of observations, their mean, and the sum of squared
/// deviations from the mean (Welford's algorithm), which is enough to recover
/// both the population and the sample variance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct GaussianSuffStat {
    /// Number of observations
    n: usize,
    /// Mean of `x`
    mean: f64,
    /// Intermediate quantity for computing sample and population variance
    sx: f64,
}

impl GaussianSuffStat {
    #[inline]
    pub fn new() -> Self {
        GaussianSuffStat {
            n: 0,
            mean: 0.0,
            sx: 0.0,
        }
    }

    /// Create a sufficient statistic from components without checking whether
    /// they are valid.
    #[inline]
    pub fn from_parts_unchecked(n: usize, mean: f64, sx: f64) -> Self {
        GaussianSuffStat { n, mean, sx }
    }

    /// Get the number of observations
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Get the sample mean
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of `x`
    #[inline]
    pub fn sum_x(&self) -> f64 {
        self.mean * self.n as f64
    }

    /// Sum of `x^2`
    #[inline]
    pub fn sum_x_sq(&self) -> f64 {
        let nf = self.n as f64;
        self.mean().powi(2).mul_add(nf, self.sx)
    }

    /// Population variance, Σ(x - x̄)² / n. `None` without observations.
    ///
    /// # Example
    ///
    /// ```
    /// # use probsim::data::GaussianSuffStat;
    /// # use probsim::traits::SuffStat;
    /// let mut stat = GaussianSuffStat::new();
    /// stat.observe_many(&[1.0, 2.0, 3.0, 4.0]);
    /// assert!((stat.population_variance().unwrap() - 1.25).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn population_variance(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.sx / self.n as f64)
        }
    }

    /// Unbiased sample variance, Σ(x - x̄)² / (n - 1). `None` with fewer than
    /// two observations.
    #[inline]
    pub fn sample_variance(&self) -> Option<f64> {
        if self.n < 2 {
            None
        } else {
            Some(self.sx / (self.n - 1) as f64)
        }
    }
}

impl Default for GaussianSuffStat {
    fn default() -> Self {
        GaussianSuffStat::new()
    }
}

impl From<&[f64]> for GaussianSuffStat {
    fn from(xs: &[f64]) -> Self {
        let mut stat = GaussianSuffStat::new();
        stat.observe_many(xs);
        stat
    }
}

impl SuffStat<f64> for GaussianSuffStat {
    fn n(&self) -> usize {
        self.n
    }

    fn observe(&mut self, x: &f64) {
        let xf = *x;

        self.n += 1;

        let mean_xn =
            (xf - self.mean).mul_add((self.n as f64).recip(), self.mean);
        self.sx = (xf - self.mean).mul_add(xf - mean_xn, self.sx);
        self.mean = mean_xn;
    }

    fn forget(&mut self, x: &f64) {
        if self.n > 1 {
            let xf = *x;

            let n = self.n as f64;
            let nm1 = (self.n - 1) as f64;

            let old_mean = (n / nm1).mul_add(self.mean, -xf / nm1);

            self.sx -= (xf - old_mean) * (xf - self.mean);
            self.mean = old_mean;
            self.n -= 1;
        } else {
            self.n = 0;
            self.mean = 0.0;
            self.sx = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_unchecked() {
        let stat = GaussianSuffStat::from_parts_unchecked(10, 0.5, 1.2);
        assert_eq!(stat.n(), 10);
        assert_eq!(stat.mean(), 0.5);
        assert_eq!(stat.sx, 1.2);
    }

    #[test]
    fn suffstat_increments_correctly() {
        let xs: Vec<f64> = vec![0.0, 1.2, 2.3, 4.6];
        let mut suffstat = GaussianSuffStat::new();

        for x in xs {
            suffstat.observe(&x);
        }

        assert_eq!(suffstat.n(), 4);
        assert::close(suffstat.mean(), 2.025, 1e-14);
        assert::close(suffstat.sum_x(), 8.1, 1e-14);
        assert::close(suffstat.sum_x_sq(), 27.889_999_999_999_993, 1e-13);
    }

    #[test]
    fn suffstat_decrements_correctly() {
        let xs: Vec<f64> = vec![0.0, 1.2, 2.3, 4.6];
        let mut suffstat = GaussianSuffStat::new();

        for x in xs {
            suffstat.observe(&x);
        }

        suffstat.observe(&5.0);
        suffstat.forget(&5.0);

        assert_eq!(suffstat.n(), 4);
        assert::close(suffstat.mean(), 2.025, 1e-14);
        assert::close(suffstat.sum_x(), 8.1, 1e-14);
        assert::close(suffstat.sum_x_sq(), 27.889_999_999_999_993, 1e-13);
    }

    #[test]
    fn variances() {
        let xs: Vec<f64> = vec![0.0, 1.2, 2.3, 4.6];
        let stat = GaussianSuffStat::from(xs.as_slice());
        // Σ(x - 2.025)^2 = 11.4875
        assert::close(stat.population_variance().unwrap(), 2.871_875, 1e-12);
        assert::close(
            stat.sample_variance().unwrap(),
            3.829_166_666_666_667,
            1e-12,
        );
    }

    #[test]
    fn variance_of_empty_is_none() {
        let stat = GaussianSuffStat::new();
        assert!(stat.population_variance().is_none());
        assert!(stat.sample_variance().is_none());
    }
}
