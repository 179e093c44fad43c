//! Trait definitions
use rand::Rng;

/// Has a (possibly un-normalized) density or mass function
pub trait HasDensity<X> {
    /// Probability function
    ///
    /// # Example
    ///
    /// ```
    /// use probsim::dist::Uniform;
    /// use probsim::traits::*;
    ///
    /// let u = Uniform::new(0.0, 2.0).unwrap();
    /// assert_eq!(u.f(&1.0_f64), 0.5);
    /// ```
    fn f(&self, x: &X) -> f64 {
        self.ln_f(x).exp()
    }

    /// Log of the probability function
    fn ln_f(&self, x: &X) -> f64;
}

/// Can be sampled from
pub trait Sampleable<X> {
    /// Single draw from the distribution
    fn draw<R: Rng>(&self, rng: &mut R) -> X;

    /// Multiple draws
    ///
    /// # Example
    ///
    /// ```
    /// use probsim::dist::Bernoulli;
    /// use probsim::traits::*;
    ///
    /// let coin = Bernoulli::uniform();
    /// let mut rng = rand::thread_rng();
    /// let flips: Vec<bool> = coin.sample(20, &mut rng);
    /// assert_eq!(flips.len(), 20);
    /// ```
    fn sample<R: Rng>(&self, n: usize, mut rng: &mut R) -> Vec<X> {
        (0..n).map(|_| self.draw(&mut rng)).collect()
    }

    /// An infinite iterator of draws
    fn sample_stream<'r, R: Rng>(
        &'r self,
        mut rng: &'r mut R,
    ) -> Box<dyn Iterator<Item = X> + 'r>
    where
        X: 'r,
    {
        Box::new(std::iter::repeat_with(move || self.draw(&mut rng)))
    }
}

/// Random variable: a density that can also be sampled
pub trait Rv<X>: HasDensity<X> + Sampleable<X> {}

impl<X, T> Rv<X> for T where T: HasDensity<X> + Sampleable<X> {}

/// Identifies the support of the distribution
pub trait Support<X> {
    /// Returns `true` if `x` is in the support of the distribution
    fn supports(&self, x: &X) -> bool;
}

/// Continuous probability distribution
pub trait ContinuousDistr<X>: HasDensity<X> + Support<X> {
    /// The value of the Probability Density Function (PDF) at `x`.
    /// Zero outside of the support.
    fn pdf(&self, x: &X) -> f64 {
        self.ln_pdf(x).exp()
    }

    /// The log of the PDF at `x`
    fn ln_pdf(&self, x: &X) -> f64 {
        if self.supports(x) {
            self.ln_f(x)
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Discrete probability distribution
pub trait DiscreteDistr<X>: HasDensity<X> + Support<X> {
    /// Probability Mass Function (PMF) at `x`. Zero outside of the support.
    ///
    /// # Example
    ///
    /// ```
    /// use probsim::dist::Binomial;
    /// use probsim::traits::*;
    ///
    /// let binom = Binomial::new(2, 0.5).unwrap();
    /// assert!((binom.pmf(&1_u32) - 0.5).abs() < 1e-12);
    /// assert_eq!(binom.pmf(&3_u32), 0.0);
    /// ```
    fn pmf(&self, x: &X) -> f64 {
        self.ln_pmf(x).exp()
    }

    /// The log of the PMF at `x`
    fn ln_pmf(&self, x: &X) -> f64 {
        if self.supports(x) {
            self.ln_f(x)
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Has a cumulative distribution function (CDF)
pub trait Cdf<X>: HasDensity<X> {
    /// The value of the Cumulative Density Function at `x`
    fn cdf(&self, x: &X) -> f64;

    /// Survival function, `1 - CDF(x)`
    fn sf(&self, x: &X) -> f64 {
        1.0 - self.cdf(x)
    }
}

/// Has an inverse-CDF / quantile function
pub trait InverseCdf<X>: HasDensity<X> {
    /// The value of the `x` at the given probability in the CDF
    fn invcdf(&self, p: f64) -> X;

    /// Alias for `invcdf`
    fn quantile(&self, p: f64) -> X {
        self.invcdf(p)
    }

    /// Interval containing `p` proportion of the mass, centered at the median
    fn interval(&self, p: f64) -> (X, X) {
        let pt = (1.0 - p) / 2.0;
        (self.quantile(pt), self.quantile(p + pt))
    }
}

/// Defines the distribution mean
pub trait Mean<X> {
    /// Returns `None` if the mean is undefined
    fn mean(&self) -> Option<X>;
}

/// Defines the distribution median
pub trait Median<X> {
    /// Returns `None` if the median is undefined
    fn median(&self) -> Option<X>;
}

/// Defines the distribution mode
pub trait Mode<X> {
    /// Returns `None` if the mode is undefined or is not a single value
    fn mode(&self) -> Option<X>;
}

/// Defines the distribution variance
pub trait Variance<X> {
    /// Returns `None` if the variance is undefined
    fn variance(&self) -> Option<X>;
}

/// Defines the distribution skewness
pub trait Skewness {
    fn skewness(&self) -> Option<f64>;
}

/// Defines the distribution excess kurtosis
pub trait Kurtosis {
    fn kurtosis(&self) -> Option<f64>;
}

/// Is a [sufficient statistic](https://en.wikipedia.org/wiki/Sufficient_statistic)
/// for a distribution.
///
/// # Example
///
/// ```
/// use probsim::data::BernoulliSuffStat;
/// use probsim::traits::SuffStat;
///
/// let mut stat = BernoulliSuffStat::new();
///
/// stat.observe(&true);
/// stat.observe(&false);
/// assert!(stat.n() == 2 && stat.k() == 1);
///
/// stat.forget_many(&[false, true]);
/// assert!(stat.n() == 0 && stat.k() == 0);
/// ```
pub trait SuffStat<X> {
    /// Returns the number of observations
    fn n(&self) -> usize;

    /// Assimilate the datum `x` into the statistic
    fn observe(&mut self, x: &X);

    /// Remove the datum `x` from the statistic
    fn forget(&mut self, x: &X);

    /// Assimilate several observations
    fn observe_many(&mut self, xs: &[X]) {
        xs.iter().for_each(|x| self.observe(x));
    }

    /// Forget several observations
    fn forget_many(&mut self, xs: &[X]) {
        xs.iter().for_each(|x| self.forget(x));
    }
}
