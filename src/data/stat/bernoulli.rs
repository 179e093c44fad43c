#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::traits::SuffStat;

/// Sufficient statistic for Bernoulli trials.
///
/// Contains the number of trials and the number of successes.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct BernoulliSuffStat {
    n: usize,
    k: usize,
}

impl BernoulliSuffStat {
    /// Create a new Bernoulli sufficient statistic
    #[inline]
    pub fn new() -> Self {
        BernoulliSuffStat { n: 0, k: 0 }
    }

    /// Create a sufficient statistic from components without checking whether
    /// they are valid.
    #[inline]
    pub fn from_parts_unchecked(n: usize, k: usize) -> Self {
        BernoulliSuffStat { n, k }
    }

    /// Get the total number of trials, n.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Get the number of successful trials, k.
    ///
    /// # Example
    ///
    /// ```
    /// # use probsim::data::BernoulliSuffStat;
    /// # use probsim::traits::SuffStat;
    /// let mut stat = BernoulliSuffStat::new();
    ///
    /// stat.observe(&true);
    /// stat.observe(&false);
    ///
    /// assert_eq!(stat.k(), 1);
    /// ```
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of failed trials, n - k
    #[inline]
    pub fn failures(&self) -> usize {
        self.n - self.k
    }

    /// Observed success frequency k / n. `None` before the first trial.
    ///
    /// # Example
    ///
    /// ```
    /// # use probsim::data::BernoulliSuffStat;
    /// # use probsim::traits::SuffStat;
    /// let mut stat = BernoulliSuffStat::new();
    /// assert_eq!(stat.frequency(), None);
    ///
    /// stat.observe_many(&[true, true, false, true]);
    /// assert_eq!(stat.frequency(), Some(0.75));
    /// ```
    #[inline]
    pub fn frequency(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.k as f64 / self.n as f64)
        }
    }
}

impl Default for BernoulliSuffStat {
    fn default() -> Self {
        BernoulliSuffStat::new()
    }
}

impl SuffStat<bool> for BernoulliSuffStat {
    fn n(&self) -> usize {
        self.n
    }

    fn observe(&mut self, x: &bool) {
        self.n += 1;
        if *x {
            self.k += 1
        }
    }

    fn forget(&mut self, x: &bool) {
        self.n -= 1;
        if *x {
            self.k -= 1
        }
    }
}
