#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use super::shape::{Point, Shape, Square};
use itertools::Itertools;
use rand::Rng;
use std::fmt;

/// A labelled region boundary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Region {
    pub label: String,
    pub shape: Shape,
}

impl Region {
    pub fn new<S: Into<String>>(label: S, shape: impl Into<Shape>) -> Self {
        Region {
            label: label.into(),
            shape: shape.into(),
        }
    }
}

/// A bounding square partitioned by nested shapes.
///
/// Region `i` is the part of shape `i` outside shape `i - 1`; the last
/// region, the remainder, is the part of the square outside every shape.
/// Shapes are ordered innermost first and classification checks them in that
/// order, so a point on a shared boundary goes to the innermost region.
///
/// # Example
///
/// ```
/// use probsim::geometry::{Disk, NestedRegions, Point, Region, Square};
///
/// let square = Square::new(Point::new(0.0, 0.0), 2.0).unwrap();
/// let regions = NestedRegions::new(
///     square,
///     vec![
///         Region::new("inner", Disk::new(Point::new(1.0, 1.0), 0.5).unwrap()),
///         Region::new("outer", Disk::new(Point::new(1.0, 1.0), 1.0).unwrap()),
///     ],
///     "corners",
/// )
/// .unwrap();
///
/// assert_eq!(regions.classify(&Point::new(1.0, 1.0)), 0);
/// assert_eq!(regions.classify(&Point::new(1.0, 1.8)), 1);
/// assert_eq!(regions.classify(&Point::new(0.0, 0.0)), 2);
/// assert_eq!(regions.labels(), vec!["inner", "outer", "corners"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct NestedRegions {
    square: Square,
    regions: Vec<Region>,
    remainder: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum RegionError {
    /// No shapes were given
    NoRegions,
    /// A shape reaches outside the bounding square
    OutsideSquare { label: String },
    /// A shape does not enclose the shape before it
    NotNested { inner: String, outer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum SamplerError {
    /// Asked for zero samples
    NoSamples,
}

impl NestedRegions {
    /// Partition `square` by `regions`, given innermost first
    pub fn new<S: Into<String>>(
        square: Square,
        regions: Vec<Region>,
        remainder: S,
    ) -> Result<Self, RegionError> {
        if regions.is_empty() {
            return Err(RegionError::NoRegions);
        }

        if let Some(region) =
            regions.iter().find(|region| !square.encloses(&region.shape))
        {
            return Err(RegionError::OutsideSquare {
                label: region.label.clone(),
            });
        }

        if let Some((inner, outer)) = regions
            .iter()
            .tuple_windows()
            .find(|(inner, outer)| !outer.shape.encloses(&inner.shape))
        {
            return Err(RegionError::NotNested {
                inner: inner.label.clone(),
                outer: outer.label.clone(),
            });
        }

        Ok(NestedRegions {
            square,
            regions,
            remainder: remainder.into(),
        })
    }

    pub fn square(&self) -> &Square {
        &self.square
    }

    /// The shapes, innermost first
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions including the remainder
    pub fn len(&self) -> usize {
        self.regions.len() + 1
    }

    /// Always `false`; there is at least one shape and the remainder
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Region labels in classification order, remainder last
    pub fn labels(&self) -> Vec<&str> {
        self.regions
            .iter()
            .map(|region| region.label.as_str())
            .chain(std::iter::once(self.remainder.as_str()))
            .collect()
    }

    /// Probability that a uniform point lands in each region: the area
    /// between consecutive shapes over the area of the square
    ///
    /// # Example
    ///
    /// ```
    /// # use probsim::geometry::presets;
    /// let regions = presets::target(2.0, &[0.3, 0.7, 1.0]).unwrap();
    /// let ps = regions.theoretical();
    ///
    /// assert_eq!(ps.len(), 4);
    /// assert!((ps.iter().sum::<f64>() - 1.0).abs() < 1E-9);
    /// ```
    pub fn theoretical(&self) -> Vec<f64> {
        let total = self.square.area();
        let mut inner_area = 0.0;
        let mut ps: Vec<f64> = self
            .regions
            .iter()
            .map(|region| {
                let area = region.shape.area();
                let p = (area - inner_area) / total;
                inner_area = area;
                p
            })
            .collect();
        ps.push(1.0 - inner_area / total);
        ps
    }

    /// Index of the innermost region containing `p`, or the remainder index
    pub fn classify(&self, p: &Point) -> usize {
        self.regions
            .iter()
            .position(|region| region.shape.contains(p))
            .unwrap_or(self.regions.len())
    }

    /// Region index of every point
    pub fn classify_all(&self, points: &[Point]) -> Vec<usize> {
        points.iter().map(|p| self.classify(p)).collect()
    }

    /// Draw `n` uniform points over the square and tally the region of each
    pub fn run<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Experiment, SamplerError> {
        if n == 0 {
            return Err(SamplerError::NoSamples);
        }
        tracing::debug!(n, regions = self.len(), "sampling nested regions");

        let mut hits = vec![0_usize; self.len()];
        for _ in 0..n {
            let p = self.square.draw_point(rng);
            hits[self.classify(&p)] += 1;
        }
        Ok(self.summarize(hits, n))
    }

    /// Tally the region of each of the given points
    pub fn observe(&self, points: &[Point]) -> Result<Experiment, SamplerError> {
        if points.is_empty() {
            return Err(SamplerError::NoSamples);
        }

        let mut hits = vec![0_usize; self.len()];
        points.iter().for_each(|p| hits[self.classify(p)] += 1);
        Ok(self.summarize(hits, points.len()))
    }

    fn summarize(&self, hits: Vec<usize>, n: usize) -> Experiment {
        let nf = n as f64;
        let regions: Vec<RegionSummary> = self
            .labels()
            .into_iter()
            .zip(self.theoretical())
            .zip(hits)
            .map(|((label, theoretical), hits)| RegionSummary {
                label: label.to_owned(),
                hits,
                theoretical,
                empirical: hits as f64 / nf,
            })
            .collect();

        regions.iter().for_each(|region| {
            tracing::trace!(
                label = region.label.as_str(),
                hits = region.hits,
                empirical = region.empirical,
                theoretical = region.theoretical,
                "region tally"
            );
        });

        Experiment { n, regions }
    }
}

/// Theoretical and empirical probability of one region
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct RegionSummary {
    pub label: String,
    pub hits: usize,
    pub theoretical: f64,
    pub empirical: f64,
}

impl RegionSummary {
    /// |empirical - theoretical|
    pub fn abs_diff(&self) -> f64 {
        (self.empirical - self.theoretical).abs()
    }
}

/// The outcome of classifying a batch of points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Experiment {
    n: usize,
    regions: Vec<RegionSummary>,
}

impl Experiment {
    /// Number of points classified
    pub fn n(&self) -> usize {
        self.n
    }

    /// Per region summaries, in classification order
    pub fn regions(&self) -> &[RegionSummary] {
        &self.regions
    }

    /// The largest |empirical - theoretical| over all regions
    pub fn max_abs_diff(&self) -> f64 {
        self.regions
            .iter()
            .map(RegionSummary::abs_diff)
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .regions
            .iter()
            .map(|region| region.label.chars().count())
            .max()
            .unwrap_or(0)
            .max("region".len());
        writeln!(
            f,
            "{:<width$} | {:>8} | {:>8} | {:>8} | {:>8}",
            "region", "hits", "theory", "model", "|diff|"
        )?;
        writeln!(f, "{}", "-".repeat(width + 44))?;
        for region in &self.regions {
            writeln!(
                f,
                "{:<width$} | {:>8} | {:>8.4} | {:>8.4} | {:>8.6}",
                region.label,
                region.hits,
                region.theoretical,
                region.empirical,
                region.abs_diff()
            )?;
        }
        write!(f, "N = {}", self.n)
    }
}

impl std::error::Error for RegionError {}
impl std::error::Error for SamplerError {}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRegions => write!(f, "at least one region is required"),
            Self::OutsideSquare { label } => {
                write!(f, "region '{}' reaches outside the square", label)
            }
            Self::NotNested { inner, outer } => write!(
                f,
                "region '{}' does not enclose region '{}'",
                outer, inner
            ),
        }
    }
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSamples => {
                write!(f, "the number of samples must be positive")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shape::{Disk, Triangle};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;
    use std::f64::consts::PI;

    fn unit_target() -> NestedRegions {
        let square = Square::new(Point::new(0.0, 0.0), 2.0).unwrap();
        let c = square.center();
        NestedRegions::new(
            square,
            vec![
                Region::new("a", Disk::new(c, 0.3).unwrap()),
                Region::new("b", Disk::new(c, 0.7).unwrap()),
                Region::new("c", Disk::new(c, 1.0).unwrap()),
            ],
            "d",
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_region_list() {
        let square = Square::new(Point::new(0.0, 0.0), 1.0).unwrap();
        let res = NestedRegions::new(square, vec![], "rest");
        assert_eq!(res, Err(RegionError::NoRegions));
    }

    #[test]
    fn rejects_region_outside_square() {
        let square = Square::new(Point::new(0.0, 0.0), 1.0).unwrap();
        let disk = Disk::new(Point::new(0.5, 0.5), 0.6).unwrap();
        let res =
            NestedRegions::new(square, vec![Region::new("big", disk)], "rest");
        assert_eq!(
            res,
            Err(RegionError::OutsideSquare {
                label: String::from("big")
            })
        );
    }

    #[test]
    fn rejects_regions_out_of_order() {
        let square = Square::new(Point::new(0.0, 0.0), 2.0).unwrap();
        let c = square.center();
        let res = NestedRegions::new(
            square,
            vec![
                Region::new("outer", Disk::new(c, 1.0).unwrap()),
                Region::new("inner", Disk::new(c, 0.5).unwrap()),
            ],
            "rest",
        );
        assert_eq!(
            res,
            Err(RegionError::NotNested {
                inner: String::from("outer"),
                outer: String::from("inner"),
            })
        );
    }

    #[test]
    fn theoretical_probabilities_of_target() {
        let ps = unit_target().theoretical();
        let expected = [
            PI * 0.09 / 4.0,
            PI * (0.49 - 0.09) / 4.0,
            PI * (1.0 - 0.49) / 4.0,
            1.0 - PI / 4.0,
        ];
        ps.iter()
            .zip(expected.iter())
            .for_each(|(p, e)| assert::close(*p, *e, 1E-12));
        assert::close(ps.iter().sum::<f64>(), 1.0, 1E-9);
    }

    #[test]
    fn classify_prefers_innermost_on_shared_boundary() {
        let square = Square::new(Point::new(0.0, 0.0), 4.0).unwrap();
        let tri = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 4.0),
        )
        .unwrap();
        let small = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        )
        .unwrap();
        let regions = NestedRegions::new(
            square,
            vec![Region::new("small", small), Region::new("big", tri)],
            "rest",
        )
        .unwrap();

        // (1, 1) is on the hypotenuse of the small triangle
        assert_eq!(regions.classify(&Point::new(1.0, 1.0)), 0);
        assert_eq!(regions.classify(&Point::new(2.0, 2.0)), 1);
        assert_eq!(regions.classify(&Point::new(3.0, 3.0)), 2);
    }

    #[test]
    fn run_rejects_zero_samples() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        assert_eq!(
            unit_target().run(0, &mut rng),
            Err(SamplerError::NoSamples)
        );
        assert_eq!(unit_target().observe(&[]), Err(SamplerError::NoSamples));
    }

    #[test]
    fn hits_sum_to_n() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0xABCD);
        let experiment = unit_target().run(12_345, &mut rng).unwrap();
        let total: usize = experiment.regions().iter().map(|r| r.hits).sum();
        assert_eq!(total, 12_345);
        assert_eq!(experiment.n(), 12_345);
        let p_total: f64 =
            experiment.regions().iter().map(|r| r.empirical).sum();
        assert::close(p_total, 1.0, 1E-12);
    }

    #[test]
    fn empirical_converges_to_theoretical() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0x1234);
        let experiment = unit_target().run(100_000, &mut rng).unwrap();
        assert!(experiment.max_abs_diff() < 0.01);
    }

    #[test]
    fn observe_matches_classify_all() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let regions = unit_target();
        let points = regions.square().sample_points(500, &mut rng);
        let idx = regions.classify_all(&points);
        let experiment = regions.observe(&points).unwrap();
        for (k, summary) in experiment.regions().iter().enumerate() {
            let count = idx.iter().filter(|&&i| i == k).count();
            assert_eq!(summary.hits, count);
        }
    }

    #[test]
    fn report_lists_every_region() {
        let mut rng = Xoshiro256Plus::seed_from_u64(8);
        let report = unit_target().run(100, &mut rng).unwrap().to_string();
        for label in ["a", "b", "c", "d"] {
            assert!(report.lines().any(|line| line.starts_with(label)));
        }
        assert!(report.ends_with("N = 100"));
    }
}
