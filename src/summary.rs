//! Side by side summaries of discrete distributions
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::dist::{Binomial, Geometric, Hypergeometric, Poisson};
use crate::misc::cumsum;
use crate::traits::*;
use std::fmt;

// relative slack when looking for the largest mass
const MODE_RTOL: f64 = 1E-9;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum SummaryError {
    /// The distribution has no mean or no variance
    MomentUndefined { name: String },
}

/// PMF over 0..=`support_max` with the mean, variance and mode
///
/// # Example
///
/// ```
/// use probsim::dist::Poisson;
/// use probsim::summary::DiscreteSummary;
///
/// let pois = Poisson::new(4.0).unwrap();
/// let summary = DiscreteSummary::new("poisson", &pois, 14).unwrap();
///
/// assert_eq!(summary.pmf.len(), 15);
/// // 3 and 4 are both modes; the first one wins
/// assert_eq!(summary.mode, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct DiscreteSummary {
    pub name: String,
    pub mean: f64,
    pub variance: f64,
    /// First value with the largest mass in the range
    pub mode: u32,
    pub support_max: u32,
    /// P(X = k) for k in 0..=support_max
    pub pmf: Vec<f64>,
}

impl DiscreteSummary {
    pub fn new<S, D>(
        name: S,
        dist: &D,
        support_max: u32,
    ) -> Result<Self, SummaryError>
    where
        S: Into<String>,
        D: DiscreteDistr<u32> + Mean<f64> + Variance<f64>,
    {
        let name = name.into();
        let (mean, variance) = match (dist.mean(), dist.variance()) {
            (Some(mean), Some(variance)) => (mean, variance),
            _ => return Err(SummaryError::MomentUndefined { name }),
        };

        let pmf: Vec<f64> = (0..=support_max).map(|k| dist.pmf(&k)).collect();
        let top = pmf.iter().copied().fold(0.0, f64::max);
        let mode = pmf
            .iter()
            .position(|&p| p >= top * (1.0 - MODE_RTOL))
            .unwrap_or(0) as u32;

        Ok(DiscreteSummary {
            name,
            mean,
            variance,
            mode,
            support_max,
            pmf,
        })
    }

    /// P(X <= k) for k in 0..=support_max
    pub fn cdf(&self) -> Vec<f64> {
        cumsum(&self.pmf)
    }

    /// The mass the range covers
    pub fn coverage(&self) -> f64 {
        self.pmf.iter().sum()
    }
}

/// Summaries of several distributions, printed as one table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SummaryTable(pub Vec<DiscreteSummary>);

impl SummaryTable {
    /// Binomial(10, 0.3) on 0..=10, Poisson(4) on 0..=14, Geometric(0.4)
    /// on 0..=9 and Hypergeometric(12, 4, 5) on 0..=4
    pub fn lesson() -> Result<Self, SummaryError> {
        let binomial = Binomial::new_unchecked(10, 0.3);
        let poisson = Poisson::new_unchecked(4.0);
        let geometric = Geometric::new_unchecked(0.4);
        let hypergeometric = Hypergeometric::new_unchecked(12, 4, 5);

        Ok(SummaryTable(vec![
            DiscreteSummary::new("binomial", &binomial, 10)?,
            DiscreteSummary::new("poisson", &poisson, 14)?,
            DiscreteSummary::new("geometric", &geometric, 9)?,
            DiscreteSummary::new("hypergeometric", &hypergeometric, 4)?,
        ]))
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15} | {:>7} | {:>7} | {:>5} | {:>6}",
            "distribution", "E[X]", "D[X]", "Mo[X]", "range"
        )?;
        write!(f, "{}", "-".repeat(53))?;
        for row in &self.0 {
            write!(
                f,
                "\n{:<15} | {:>7.3} | {:>7.3} | {:>5} | {:>6}",
                row.name,
                row.mean,
                row.variance,
                row.mode,
                format!("0-{}", row.support_max)
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SummaryError {}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MomentUndefined { name } => {
                write!(f, "{} has no defined mean or variance", name)
            }
        }
    }
}
