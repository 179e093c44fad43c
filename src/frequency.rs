//! Classical versus frequentist probability.
//!
//! The classical probability of an event is the share of equally likely
//! outcomes that make it happen. The frequentist estimate is the share of
//! repeated trials in which it happened. These experiments show the second
//! settling on the first as the number of trials grows.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::data::BernoulliSuffStat;
use crate::dist::Bernoulli;
use crate::misc::cumsum;
use crate::traits::{Sampleable, SuffStat};
use rand::seq::index;
use rand::Rng;
use std::fmt;

pub const COIN_TRIALS: usize = 2_000;
pub const URN_RED: u32 = 3;
pub const URN_BLUE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum FrequencyError {
    /// An experiment needs at least one trial
    ZeroTrials,
    /// Drawing two balls needs at least two balls
    TooFewBalls { red: u32, blue: u32 },
    /// The sweep of trial counts is empty
    EmptySweep,
}

/// Repeated tosses of a coin
///
/// # Example
///
/// ```
/// use probsim::frequency::CoinExperiment;
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let outcome = CoinExperiment::fair(2_000).unwrap().run(&mut rng);
///
/// assert_eq!(outcome.heads() + outcome.tails(), 2_000);
/// assert!(outcome.abs_diff() < 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CoinExperiment {
    coin: Bernoulli,
    trials: usize,
}

impl CoinExperiment {
    /// Toss `coin` `trials` times
    pub fn new(coin: Bernoulli, trials: usize) -> Result<Self, FrequencyError> {
        if trials == 0 {
            Err(FrequencyError::ZeroTrials)
        } else {
            Ok(CoinExperiment { coin, trials })
        }
    }

    /// Toss a fair coin `trials` times
    pub fn fair(trials: usize) -> Result<Self, FrequencyError> {
        Self::new(Bernoulli::uniform(), trials)
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn coin(&self) -> &Bernoulli {
        &self.coin
    }

    pub fn run<R: Rng>(&self, rng: &mut R) -> CoinOutcome {
        let tosses: Vec<u32> = self
            .coin
            .sample_stream(rng)
            .take(self.trials)
            .map(u32::from)
            .collect();

        let running_frequency: Vec<f64> = cumsum(&tosses)
            .iter()
            .zip(1..)
            .map(|(&heads, n): (&u32, u32)| f64::from(heads) / f64::from(n))
            .collect();

        let mut stat = BernoulliSuffStat::new();
        tosses.iter().for_each(|&x| stat.observe(&(x == 1)));
        tracing::debug!(
            trials = self.trials,
            heads = stat.k(),
            "tossed coin"
        );

        CoinOutcome {
            classical: self.coin.p(),
            heads: stat.k(),
            tails: stat.failures(),
            running_frequency,
        }
    }
}

/// Tally of a coin experiment
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CoinOutcome {
    classical: f64,
    heads: usize,
    tails: usize,
    running_frequency: Vec<f64>,
}

impl CoinOutcome {
    pub fn heads(&self) -> usize {
        self.heads
    }

    pub fn tails(&self) -> usize {
        self.tails
    }

    /// Share of heads after each toss
    pub fn running_frequency(&self) -> &[f64] {
        &self.running_frequency
    }

    /// Share of heads over all tosses, P*
    pub fn frequency(&self) -> f64 {
        self.heads as f64 / (self.heads + self.tails) as f64
    }

    /// The probability of heads, P
    pub fn classical(&self) -> f64 {
        self.classical
    }

    /// |P* - P|
    pub fn abs_diff(&self) -> f64 {
        (self.frequency() - self.classical).abs()
    }
}

impl fmt::Display for CoinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trials N = {}", self.heads + self.tails)?;
        writeln!(f, "heads k = {}", self.heads)?;
        writeln!(f, "tails = {}", self.tails)?;
        writeln!(f, "frequency P* = k/N = {:.4}", self.frequency())?;
        writeln!(f, "classical P = {:.4}", self.classical)?;
        write!(f, "|P* - P| = {:.4}", self.abs_diff())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Colour {
    Red,
    Blue,
}

/// An urn of red and blue balls
///
/// # Example
///
/// ```
/// use probsim::frequency::Urn;
///
/// let urn = Urn::new(3, 2).unwrap();
/// // (C(3, 2) + C(2, 2)) / C(5, 2) = 4 / 10
/// assert!((urn.classical_same_colour() - 0.4).abs() < 1E-12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Urn {
    red: u32,
    blue: u32,
}

impl Urn {
    pub fn new(red: u32, blue: u32) -> Result<Self, FrequencyError> {
        if u64::from(red) + u64::from(blue) < 2 {
            Err(FrequencyError::TooFewBalls { red, blue })
        } else {
            Ok(Urn { red, blue })
        }
    }

    pub fn red(&self) -> u32 {
        self.red
    }

    pub fn blue(&self) -> u32 {
        self.blue
    }

    /// Probability that two balls drawn without replacement share a colour
    pub fn classical_same_colour(&self) -> f64 {
        // C(n, 2) = n (n - 1) / 2; the halves cancel
        let pairs = |n: f64| n * (n - 1.0);
        let (red, blue) = (f64::from(self.red), f64::from(self.blue));
        (pairs(red) + pairs(blue)) / pairs(red + blue)
    }

    /// Draw two balls without replacement
    pub fn draw_two<R: Rng>(&self, rng: &mut R) -> (Colour, Colour) {
        let total = self.red as usize + self.blue as usize;
        let picked = index::sample(rng, total, 2);
        // balls 0..red are red
        let colour = |ix: usize| {
            if ix < self.red as usize {
                Colour::Red
            } else {
                Colour::Blue
            }
        };
        (colour(picked.index(0)), colour(picked.index(1)))
    }

    /// Draw two balls and report whether they share a colour
    pub fn same_colour<R: Rng>(&self, rng: &mut R) -> bool {
        let (a, b) = self.draw_two(rng);
        a == b
    }

    /// Share of `n` experiments in which both balls shared a colour
    pub fn frequency<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<f64, FrequencyError> {
        if n == 0 {
            return Err(FrequencyError::ZeroTrials);
        }
        let mut stat = BernoulliSuffStat::new();
        for _ in 0..n {
            stat.observe(&self.same_colour(rng));
        }
        stat.frequency().ok_or(FrequencyError::ZeroTrials)
    }
}

impl Default for Urn {
    fn default() -> Self {
        Urn {
            red: URN_RED,
            blue: URN_BLUE,
        }
    }
}

/// The empirical frequency after `n` experiments
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ConvergencePoint {
    pub n: usize,
    pub frequency: f64,
}

/// The trial counts 10, 60, 110, ..., 9960
pub fn default_sweep() -> Vec<usize> {
    (10..=10_000).step_by(50).collect()
}

/// For every count in `ns`, run that many independent urn experiments and
/// record the share with matching colours
///
/// # Example
///
/// ```
/// use probsim::frequency::{convergence, Urn};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(7);
/// let sweep = convergence(&Urn::default(), &[10, 1_000, 10_000], &mut rng)
///     .unwrap();
///
/// assert_eq!(sweep.len(), 3);
/// assert!((sweep[2].frequency - 0.4).abs() < 0.025);
/// ```
pub fn convergence<R: Rng>(
    urn: &Urn,
    ns: &[usize],
    rng: &mut R,
) -> Result<Vec<ConvergencePoint>, FrequencyError> {
    if ns.is_empty() {
        return Err(FrequencyError::EmptySweep);
    }
    tracing::debug!(
        steps = ns.len(),
        largest = ns.iter().max().copied().unwrap_or(0),
        "urn convergence sweep"
    );

    ns.iter()
        .map(|&n| {
            urn.frequency(n, rng)
                .map(|frequency| ConvergencePoint { n, frequency })
        })
        .collect()
}

impl std::error::Error for FrequencyError {}

impl fmt::Display for FrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTrials => write!(f, "at least one trial is required"),
            Self::TooFewBalls { red, blue } => write!(
                f,
                "an urn with {} red and {} blue balls cannot give two draws",
                red, blue
            ),
            Self::EmptySweep => write!(f, "the sweep of trial counts is empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    #[test]
    fn coin_rejects_zero_trials() {
        assert_eq!(CoinExperiment::fair(0), Err(FrequencyError::ZeroTrials));
    }

    #[test]
    fn running_frequency_tracks_heads() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let outcome = CoinExperiment::fair(COIN_TRIALS).unwrap().run(&mut rng);
        let running = outcome.running_frequency();

        assert_eq!(running.len(), COIN_TRIALS);
        assert!(running[0] == 0.0 || running[0] == 1.0);
        assert::close(*running.last().unwrap(), outcome.frequency(), TOL);
        assert_eq!(outcome.heads() + outcome.tails(), COIN_TRIALS);
        assert!(running.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn biased_coin_converges_to_its_p() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let coin = Bernoulli::new(0.8).unwrap();
        let outcome = CoinExperiment::new(coin, 10_000).unwrap().run(&mut rng);
        assert::close(outcome.classical(), 0.8, TOL);
        assert!(outcome.abs_diff() < 0.02);
    }

    #[test]
    fn urn_needs_two_balls() {
        assert_eq!(
            Urn::new(1, 0),
            Err(FrequencyError::TooFewBalls { red: 1, blue: 0 })
        );
        assert!(Urn::new(2, 0).is_ok());
    }

    #[test]
    fn urn_with_huge_counts() {
        let urn = Urn::new(u32::MAX, 1).unwrap();
        assert::close(urn.classical_same_colour(), 1.0, 1E-9);
        assert!(Urn::new(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn classical_same_colour() {
        assert::close(Urn::default().classical_same_colour(), 0.4, TOL);
        assert::close(Urn::new(2, 0).unwrap().classical_same_colour(), 1.0, TOL);
        assert::close(Urn::new(1, 1).unwrap().classical_same_colour(), 0.0, TOL);
    }

    #[test]
    fn draw_two_never_repeats_a_single_ball() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let urn = Urn::new(1, 1).unwrap();
        for _ in 0..100 {
            assert!(!urn.same_colour(&mut rng));
        }
    }

    #[test]
    fn urn_frequency_rejects_zero_trials() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        assert_eq!(
            Urn::default().frequency(0, &mut rng),
            Err(FrequencyError::ZeroTrials)
        );
    }

    #[test]
    fn default_sweep_bounds() {
        let sweep = default_sweep();
        assert_eq!(sweep.first(), Some(&10));
        assert_eq!(sweep.last(), Some(&9_960));
        assert_eq!(sweep.len(), 200);
    }

    #[test]
    fn convergence_rejects_empty_sweep() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        assert_eq!(
            convergence(&Urn::default(), &[], &mut rng),
            Err(FrequencyError::EmptySweep)
        );
    }

    #[test]
    fn convergence_approaches_classical() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0x0121);
        let urn = Urn::default();
        let sweep = convergence(&urn, &[50_000], &mut rng).unwrap();
        // 5 sigma at n = 50 000 is ~0.011
        assert!((sweep[0].frequency - urn.classical_same_colour()).abs() < 0.011);
    }
}
