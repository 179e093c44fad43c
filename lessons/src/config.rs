//! Lesson parameters. Defaults reproduce the classroom runs; a JSON file
//! may override any subset of them.
use anyhow::{Context, Result};
use probsim::conditional::{default_cohorts, Cohort};
use probsim::frequency::{COIN_TRIALS, URN_BLUE, URN_RED};
use probsim::geometry::presets::{
    INSCRIBED_SAMPLES, INSCRIBED_SIDE, TARGET_RADII, TARGET_SAMPLES,
    TARGET_SIDE,
};
use probsim::sensitivity::{
    CHECK_SAMPLES, CHECK_SIGMA, GRID_MAX, GRID_POINTS, MU, SIGMAS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest number of points drawn in a scatter chart
const SCATTER_POINTS: usize = 5_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonsConfig {
    pub target: TargetConfig,
    pub inscribed: InscribedConfig,
    pub coin: CoinConfig,
    pub urn: UrnConfig,
    pub simpson: SimpsonConfig,
    pub discrete: DiscreteConfig,
    pub custom: CustomConfig,
    pub lognormal: LognormalConfig,
}

impl LessonsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub side: f64,
    /// Ring radii, innermost first
    pub radii: Vec<f64>,
    pub samples: usize,
    pub scatter_points: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            side: TARGET_SIDE,
            radii: TARGET_RADII.to_vec(),
            samples: TARGET_SAMPLES,
            scatter_points: SCATTER_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InscribedConfig {
    pub side: f64,
    pub samples: usize,
    pub scatter_points: usize,
}

impl Default for InscribedConfig {
    fn default() -> Self {
        InscribedConfig {
            side: INSCRIBED_SIDE,
            samples: INSCRIBED_SAMPLES,
            scatter_points: SCATTER_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub trials: usize,
    /// Probability of heads
    pub p: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        CoinConfig {
            trials: COIN_TRIALS,
            p: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrnConfig {
    pub red: u32,
    pub blue: u32,
    pub sweep_start: usize,
    /// Inclusive
    pub sweep_end: usize,
    pub sweep_step: usize,
}

impl UrnConfig {
    pub fn sweep(&self) -> Vec<usize> {
        (self.sweep_start..=self.sweep_end)
            .step_by(self.sweep_step.max(1))
            .collect()
    }
}

impl Default for UrnConfig {
    fn default() -> Self {
        UrnConfig {
            red: URN_RED,
            blue: URN_BLUE,
            sweep_start: 10,
            sweep_end: 10_000,
            sweep_step: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortConfig {
    pub group: String,
    pub treatment: String,
    pub successes: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpsonConfig {
    pub cohorts: Vec<CohortConfig>,
}

impl SimpsonConfig {
    pub fn cohorts(&self) -> Result<Vec<Cohort>> {
        self.cohorts
            .iter()
            .map(|c| {
                Cohort::new(
                    c.group.as_str(),
                    c.treatment.as_str(),
                    c.successes,
                    c.total,
                )
                .map_err(anyhow::Error::from)
            })
            .collect()
    }
}

impl Default for SimpsonConfig {
    fn default() -> Self {
        let cohorts = default_cohorts()
            .iter()
            .map(|c| CohortConfig {
                group: c.group().to_owned(),
                treatment: c.treatment().to_owned(),
                successes: c.successes(),
                total: c.total(),
            })
            .collect();
        SimpsonConfig { cohorts }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscreteConfig {
    pub binomial_n: u64,
    pub binomial_p: f64,
    pub binomial_max: u32,
    pub poisson_rate: f64,
    pub poisson_max: u32,
    pub geometric_p: f64,
    pub geometric_max: u32,
    pub population: u64,
    pub successes: u64,
    pub draws: u64,
    pub hypergeometric_max: u32,
}

impl Default for DiscreteConfig {
    fn default() -> Self {
        DiscreteConfig {
            binomial_n: 10,
            binomial_p: 0.3,
            binomial_max: 10,
            poisson_rate: 4.0,
            poisson_max: 14,
            geometric_p: 0.4,
            geometric_max: 9,
            population: 12,
            successes: 4,
            draws: 5,
            hypergeometric_max: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    pub samples: usize,
    pub bins: usize,
    /// Plot range, a little wider than the support
    pub plot_min: f64,
    pub plot_max: f64,
    pub grid_points: usize,
    /// Probability of the interval (interval_lo, interval_hi)
    pub interval_lo: f64,
    pub interval_hi: f64,
}

impl Default for CustomConfig {
    fn default() -> Self {
        CustomConfig {
            samples: 2_000,
            bins: 50,
            plot_min: -1.3,
            plot_max: 1.3,
            grid_points: 500,
            interval_lo: -0.5,
            interval_hi: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LognormalConfig {
    pub mu: f64,
    pub sigmas: Vec<f64>,
    pub grid_max: f64,
    pub grid_points: usize,
    /// σ of the moment check
    pub check_sigma: f64,
    pub samples: usize,
    pub bins: usize,
}

impl Default for LognormalConfig {
    fn default() -> Self {
        LognormalConfig {
            mu: MU,
            sigmas: SIGMAS.to_vec(),
            grid_max: GRID_MAX,
            grid_points: GRID_POINTS,
            check_sigma: CHECK_SIGMA,
            samples: CHECK_SAMPLES,
            bins: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config: LessonsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LessonsConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = indoc! {r#"
            {
                "target": { "samples": 1000 },
                "urn": { "red": 5 }
            }
        "#};
        let config: LessonsConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.target.samples, 1000);
        assert_eq!(config.target.radii, vec![0.3, 0.7, 1.0]);
        assert_eq!(config.urn.red, 5);
        assert_eq!(config.urn.blue, 2);
        assert_eq!(config.coin, CoinConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "coin": {{ "trials": 10, "p": 0.25 }} }}"#).unwrap();

        let config = LessonsConfig::load(file.path()).unwrap();
        assert_eq!(config.coin.trials, 10);
        assert_eq!(config.coin.p, 0.25);
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = LessonsConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("parsing config"));
    }

    #[test]
    fn default_sweep_matches_library() {
        assert_eq!(
            UrnConfig::default().sweep(),
            probsim::frequency::default_sweep()
        );
    }

    #[test]
    fn default_cohorts_are_valid() {
        let cohorts = SimpsonConfig::default().cohorts().unwrap();
        assert_eq!(cohorts.len(), 4);
    }
}
