//! How the log-normal distribution responds to its shape parameter σ
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::data::GaussianSuffStat;
use crate::dist::{LogNormal, LogNormalError};
use crate::traits::*;
use rand::Rng;
use std::fmt;

pub const SIGMAS: [f64; 3] = [0.25, 0.5, 1.0];
pub const MU: f64 = 0.0;
pub const GRID_MAX: f64 = 5.0;
pub const GRID_POINTS: usize = 500;
pub const CHECK_SIGMA: f64 = 0.5;
pub const CHECK_SAMPLES: usize = 10_000;

/// The log-normal density for one σ, evaluated on a grid
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct DensityCurve {
    pub sigma: f64,
    pub xs: Vec<f64>,
    pub pdf: Vec<f64>,
}

impl DensityCurve {
    /// The grid point with the highest density
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.xs
            .iter()
            .copied()
            .zip(self.pdf.iter().copied())
            .fold(None, |best, (x, f)| match best {
                Some((_, top)) if top >= f => best,
                _ => Some((x, f)),
            })
    }
}

/// PDF of LogNormal(`mu`, σ) over `xs` for every σ in `sigmas`
///
/// The density is zero at and below zero.
///
/// # Example
///
/// ```
/// use probsim::misc::linspace;
/// use probsim::sensitivity::density_curves;
///
/// let xs = linspace(0.0, 5.0, 500);
/// let curves = density_curves(0.0, &[0.25, 0.5, 1.0], &xs).unwrap();
///
/// // a smaller σ gives a taller, narrower peak
/// let peaks: Vec<f64> = curves.iter().map(|c| c.peak().unwrap().1).collect();
/// assert!(peaks[0] > peaks[1] && peaks[1] > peaks[2]);
/// ```
pub fn density_curves(
    mu: f64,
    sigmas: &[f64],
    xs: &[f64],
) -> Result<Vec<DensityCurve>, LogNormalError> {
    sigmas
        .iter()
        .map(|&sigma| {
            let lognormal = LogNormal::new(mu, sigma)?;
            let pdf = xs.iter().map(|x| lognormal.pdf(x)).collect();
            Ok(DensityCurve {
                sigma,
                xs: xs.to_vec(),
                pdf,
            })
        })
        .collect()
}

/// Closed-form moments next to the moments of a sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct MomentCheck {
    pub mu: f64,
    pub sigma: f64,
    pub n: usize,
    /// exp(μ + σ²/2)
    pub theoretical_mean: f64,
    /// (exp(σ²) - 1) exp(2μ + σ²)
    pub theoretical_variance: f64,
    pub empirical_mean: f64,
    /// Population variance of the sample
    pub empirical_variance: f64,
    /// The draws, kept for histograms
    pub samples: Vec<f64>,
}

impl MomentCheck {
    pub fn mean_diff(&self) -> f64 {
        (self.theoretical_mean - self.empirical_mean).abs()
    }

    pub fn variance_diff(&self) -> f64 {
        (self.theoretical_variance - self.empirical_variance).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum MomentCheckError {
    /// Invalid μ or σ
    LogNormal(LogNormalError),
    /// No samples to compare against
    NoSamples,
    /// The closed-form mean or variance overflows
    MomentUndefined { mu: f64, sigma: f64 },
}

/// Draw `n` values from LogNormal(`mu`, `sigma`) and compare their mean
/// and variance with the closed forms
///
/// # Example
///
/// ```
/// use probsim::sensitivity::moment_check;
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let check = moment_check(0.0, 0.5, 10_000, &mut rng).unwrap();
///
/// assert!((check.theoretical_mean - 0.125_f64.exp()).abs() < 1E-12);
/// assert!(check.mean_diff() < 0.03);
/// ```
pub fn moment_check<R: Rng>(
    mu: f64,
    sigma: f64,
    n: usize,
    rng: &mut R,
) -> Result<MomentCheck, MomentCheckError> {
    let lognormal =
        LogNormal::new(mu, sigma).map_err(MomentCheckError::LogNormal)?;
    if n == 0 {
        return Err(MomentCheckError::NoSamples);
    }

    let theoretical_mean: f64 = lognormal.mean().unwrap_or(f64::NAN);
    let theoretical_variance = lognormal.variance().unwrap_or(f64::NAN);
    if !(theoretical_mean.is_finite() && theoretical_variance.is_finite()) {
        return Err(MomentCheckError::MomentUndefined { mu, sigma });
    }

    let samples: Vec<f64> = lognormal.sample(n, rng);
    let mut stat = GaussianSuffStat::new();
    stat.observe_many(&samples);
    let empirical_variance = stat
        .population_variance()
        .ok_or(MomentCheckError::NoSamples)?;
    tracing::debug!(
        mu,
        sigma,
        n,
        mean = stat.mean(),
        variance = empirical_variance,
        "log-normal moment check"
    );

    Ok(MomentCheck {
        mu,
        sigma,
        n,
        theoretical_mean,
        theoretical_variance,
        empirical_mean: stat.mean(),
        empirical_variance,
        samples,
    })
}

impl fmt::Display for MomentCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "parameters: sigma = {}, mu = {}", self.sigma, self.mu)?;
        writeln!(f, "mean (theory):    {:.4}", self.theoretical_mean)?;
        writeln!(f, "mean (sample):    {:.4}", self.empirical_mean)?;
        writeln!(f, "difference:       {:.4}", self.mean_diff())?;
        writeln!(f, "variance (theory): {:.4}", self.theoretical_variance)?;
        writeln!(f, "variance (sample): {:.4}", self.empirical_variance)?;
        write!(f, "difference:        {:.4}", self.variance_diff())
    }
}

impl From<LogNormalError> for MomentCheckError {
    fn from(err: LogNormalError) -> Self {
        MomentCheckError::LogNormal(err)
    }
}

impl std::error::Error for MomentCheckError {}

impl fmt::Display for MomentCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogNormal(err) => write!(f, "{}", err),
            Self::NoSamples => write!(f, "at least one sample is required"),
            Self::MomentUndefined { mu, sigma } => write!(
                f,
                "LogNormal(μ: {}, σ: {}) has no finite mean and variance",
                mu, sigma
            ),
        }
    }
}
