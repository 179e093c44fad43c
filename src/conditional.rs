//! Conditional probabilities and Simpson's paradox.
//!
//! A treatment can have the higher success rate inside every subgroup and
//! still the lower rate once the subgroups are pooled, when the subgroups
//! are weighted differently for each treatment.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum ConditionalError {
    /// A cohort with no members
    EmptyCohort { group: String, treatment: String },
    /// A cohort with more successes than members
    SuccessesExceedTotal {
        group: String,
        treatment: String,
        successes: u32,
        total: u32,
    },
    /// The same group and treatment appear twice
    DuplicateCohort { group: String, treatment: String },
    /// No cohorts were given
    EmptyTable,
}

/// Outcomes of one treatment within one group
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Cohort {
    group: String,
    treatment: String,
    successes: u32,
    total: u32,
}

impl Cohort {
    pub fn new<G, T>(
        group: G,
        treatment: T,
        successes: u32,
        total: u32,
    ) -> Result<Self, ConditionalError>
    where
        G: Into<String>,
        T: Into<String>,
    {
        let group = group.into();
        let treatment = treatment.into();
        if total == 0 {
            Err(ConditionalError::EmptyCohort { group, treatment })
        } else if successes > total {
            Err(ConditionalError::SuccessesExceedTotal {
                group,
                treatment,
                successes,
                total,
            })
        } else {
            Ok(Cohort {
                group,
                treatment,
                successes,
                total,
            })
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn treatment(&self) -> &str {
        &self.treatment
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// P(success | group, treatment)
    pub fn rate(&self) -> f64 {
        f64::from(self.successes) / f64::from(self.total)
    }
}

/// Pooled outcome of one treatment over every group
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct AggregateRate {
    pub treatment: String,
    pub successes: u32,
    pub total: u32,
    pub rate: f64,
}

/// The lesson's trial: young A 80/100, B 70/100; old A 160/400, B 120/400
pub fn default_cohorts() -> Vec<Cohort> {
    [
        ("young", "A", 80, 100),
        ("young", "B", 70, 100),
        ("old", "A", 160, 400),
        ("old", "B", 120, 400),
    ]
    .into_iter()
    .map(|(g, t, s, n)| Cohort {
        group: g.into(),
        treatment: t.into(),
        successes: s,
        total: n,
    })
    .collect()
}

/// Success counts per group and treatment
///
/// # Example
///
/// The kidney stone study: A wins within small and within large stones but
/// B wins overall.
///
/// ```
/// use probsim::conditional::{Cohort, SimpsonTable};
///
/// let table = SimpsonTable::new(vec![
///     Cohort::new("small", "A", 81, 87).unwrap(),
///     Cohort::new("small", "B", 234, 270).unwrap(),
///     Cohort::new("large", "A", 192, 263).unwrap(),
///     Cohort::new("large", "B", 55, 80).unwrap(),
/// ])
/// .unwrap();
///
/// assert_eq!(table.subgroup_winner("small"), Some("A"));
/// assert_eq!(table.subgroup_winner("large"), Some("A"));
/// assert_eq!(table.overall_winner(), Some("B"));
/// assert_eq!(table.reversal(), Some("A"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SimpsonTable {
    cohorts: Vec<Cohort>,
}

impl SimpsonTable {
    pub fn new(cohorts: Vec<Cohort>) -> Result<Self, ConditionalError> {
        if cohorts.is_empty() {
            return Err(ConditionalError::EmptyTable);
        }
        if let Some(dup) = cohorts
            .iter()
            .duplicates_by(|c| (c.group.clone(), c.treatment.clone()))
            .next()
        {
            return Err(ConditionalError::DuplicateCohort {
                group: dup.group.clone(),
                treatment: dup.treatment.clone(),
            });
        }
        Ok(SimpsonTable { cohorts })
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    /// Groups in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        self.cohorts.iter().map(Cohort::group).unique().collect()
    }

    /// Treatments in order of first appearance
    pub fn treatments(&self) -> Vec<&str> {
        self.cohorts.iter().map(Cohort::treatment).unique().collect()
    }

    /// Success rate of `treatment` within `group`
    pub fn rate(&self, group: &str, treatment: &str) -> Option<f64> {
        self.cohorts
            .iter()
            .find(|c| c.group == group && c.treatment == treatment)
            .map(Cohort::rate)
    }

    /// Success rate of each treatment with the groups pooled
    pub fn aggregate(&self) -> Vec<AggregateRate> {
        self.treatments()
            .into_iter()
            .map(|treatment| {
                let (successes, total) = self
                    .cohorts
                    .iter()
                    .filter(|c| c.treatment == treatment)
                    .fold((0, 0), |(s, n), c| (s + c.successes, n + c.total));
                AggregateRate {
                    treatment: treatment.to_owned(),
                    successes,
                    total,
                    rate: f64::from(successes) / f64::from(total),
                }
            })
            .collect()
    }

    /// The treatment with the highest rate in `group`; `None` for an unknown
    /// group or a tie
    pub fn subgroup_winner(&self, group: &str) -> Option<&str> {
        let rates = self
            .cohorts
            .iter()
            .filter(|c| c.group == group)
            .map(|c| (c.treatment.as_str(), c.rate()));
        unique_max(rates)
    }

    /// The treatment with the highest pooled rate; `None` on a tie
    pub fn overall_winner(&self) -> Option<&str> {
        let aggregate = self.aggregate();
        let winner = unique_max(
            aggregate.iter().map(|a| (a.treatment.as_str(), a.rate)),
        )?;
        self.treatments().into_iter().find(|&t| t == winner)
    }

    /// The treatment that wins every group but not the pooled comparison
    pub fn reversal(&self) -> Option<&str> {
        let groups = self.groups();
        let first = self.subgroup_winner(groups.first()?)?;
        let wins_all = groups
            .iter()
            .all(|group| self.subgroup_winner(group) == Some(first));
        if wins_all && self.overall_winner() != Some(first) {
            Some(first)
        } else {
            None
        }
    }
}

impl Default for SimpsonTable {
    fn default() -> Self {
        SimpsonTable {
            cohorts: default_cohorts(),
        }
    }
}

// label with the strictly largest value
fn unique_max<'a, I>(items: I) -> Option<&'a str>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut best: Option<(&str, f64)> = None;
    let mut tied = false;
    for (label, value) in items {
        match best {
            Some((_, top)) if value == top => tied = true,
            Some((_, top)) if value < top => (),
            _ => {
                best = Some((label, value));
                tied = false;
            }
        }
    }
    if tied {
        None
    } else {
        best.map(|(label, _)| label)
    }
}

impl fmt::Display for SimpsonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rates by group:")?;
        writeln!(f, "{:<10} | {:<10} | {:>8}", "group", "treatment", "rate")?;
        for c in &self.cohorts {
            writeln!(
                f,
                "{:<10} | {:<10} | {:>8.4}",
                c.group,
                c.treatment,
                c.rate()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "pooled rates:")?;
        for a in self.aggregate() {
            writeln!(
                f,
                "{:<10} | {:>5}/{:<5} | {:>8.4}",
                a.treatment, a.successes, a.total, a.rate
            )?;
        }
        match self.reversal() {
            Some(t) => write!(
                f,
                "reversal: {} wins every group but loses the pooled comparison",
                t
            ),
            None => write!(f, "no reversal"),
        }
    }
}

impl std::error::Error for ConditionalError {}

impl fmt::Display for ConditionalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCohort { group, treatment } => write!(
                f,
                "cohort ({}, {}) has no members",
                group, treatment
            ),
            Self::SuccessesExceedTotal {
                group,
                treatment,
                successes,
                total,
            } => write!(
                f,
                "cohort ({}, {}) has {} successes out of {}",
                group, treatment, successes, total
            ),
            Self::DuplicateCohort { group, treatment } => write!(
                f,
                "cohort ({}, {}) appears more than once",
                group, treatment
            ),
            Self::EmptyTable => write!(f, "at least one cohort is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-12;

    #[test]
    fn cohort_validation() {
        assert!(matches!(
            Cohort::new("g", "A", 0, 0),
            Err(ConditionalError::EmptyCohort { .. })
        ));
        assert!(matches!(
            Cohort::new("g", "A", 5, 4),
            Err(ConditionalError::SuccessesExceedTotal { .. })
        ));
        assert::close(Cohort::new("g", "A", 1, 4).unwrap().rate(), 0.25, TOL);
    }

    #[test]
    fn table_validation() {
        assert_eq!(SimpsonTable::new(vec![]), Err(ConditionalError::EmptyTable));
        let res = SimpsonTable::new(vec![
            Cohort::new("g", "A", 1, 2).unwrap(),
            Cohort::new("g", "A", 1, 3).unwrap(),
        ]);
        assert_eq!(
            res,
            Err(ConditionalError::DuplicateCohort {
                group: "g".into(),
                treatment: "A".into()
            })
        );
    }

    #[test]
    fn default_rates() {
        let table = SimpsonTable::default();
        assert_eq!(table.groups(), vec!["young", "old"]);
        assert_eq!(table.treatments(), vec!["A", "B"]);
        assert::close(table.rate("young", "A").unwrap(), 0.8, TOL);
        assert::close(table.rate("old", "B").unwrap(), 0.3, TOL);
        assert!(table.rate("middle", "A").is_none());
    }

    #[test]
    fn default_aggregate_has_no_reversal() {
        let table = SimpsonTable::default();
        let agg = table.aggregate();
        assert_eq!(agg[0].successes, 240);
        assert_eq!(agg[0].total, 500);
        assert::close(agg[0].rate, 0.48, TOL);
        assert::close(agg[1].rate, 0.38, TOL);

        assert_eq!(table.subgroup_winner("young"), Some("A"));
        assert_eq!(table.subgroup_winner("old"), Some("A"));
        assert_eq!(table.overall_winner(), Some("A"));
        assert_eq!(table.reversal(), None);
    }

    #[test]
    fn skewed_weights_reverse_the_comparison() {
        let table = SimpsonTable::new(vec![
            Cohort::new("young", "A", 80, 100).unwrap(),
            Cohort::new("young", "B", 630, 900).unwrap(),
            Cohort::new("old", "A", 360, 900).unwrap(),
            Cohort::new("old", "B", 30, 100).unwrap(),
        ])
        .unwrap();
        // A: 440 / 1000, B: 660 / 1000
        assert_eq!(table.overall_winner(), Some("B"));
        assert_eq!(table.reversal(), Some("A"));
    }

    #[test]
    fn tie_has_no_winner() {
        let table = SimpsonTable::new(vec![
            Cohort::new("g", "A", 1, 2).unwrap(),
            Cohort::new("g", "B", 2, 4).unwrap(),
        ])
        .unwrap();
        assert_eq!(table.subgroup_winner("g"), None);
        assert_eq!(table.subgroup_winner("h"), None);
        assert_eq!(table.reversal(), None);
    }

    #[test]
    fn report_mentions_pooled_rates() {
        let report = SimpsonTable::default().to_string();
        assert!(report.contains("0.4800"));
        assert!(report.contains("0.3800"));
        assert!(report.ends_with("no reversal"));
    }
}
