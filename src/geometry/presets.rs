//! The region layouts used in the lessons
use super::sampler::{NestedRegions, Region, RegionError};
use super::shape::{Disk, DiskError, Point, Square, SquareError, Triangle};
use std::fmt;

/// Side of the square holding the target
pub const TARGET_SIDE: f64 = 2.0;
/// Radii of the target's rings, innermost first
pub const TARGET_RADII: [f64; 3] = [0.3, 0.7, 1.0];
pub const TARGET_SAMPLES: usize = 50_000;

/// Side of the square holding the circle, triangle and incircle
pub const INSCRIBED_SIDE: f64 = 10.0;
pub const INSCRIBED_SAMPLES: usize = 2_000;

#[derive(Debug, Clone, PartialEq)]
pub enum PresetError {
    Square(SquareError),
    Disk(DiskError),
    Region(RegionError),
}

/// Concentric disks centred in a square of side `side`, radii innermost
/// first
///
/// # Example
///
/// ```
/// use probsim::geometry::presets;
///
/// let regions = presets::target(2.0, &[0.3, 0.7, 1.0]).unwrap();
/// assert_eq!(
///     regions.labels(),
///     vec!["r <= 0.3", "0.3 < r <= 0.7", "0.7 < r <= 1", "r > 1"]
/// );
/// ```
pub fn target(side: f64, radii: &[f64]) -> Result<NestedRegions, PresetError> {
    let square = Square::new(Point::new(0.0, 0.0), side)?;
    let center = square.center();

    let regions = radii
        .iter()
        .enumerate()
        .map(|(ix, &r)| -> Result<Region, PresetError> {
            let label = if ix == 0 {
                format!("r <= {}", r)
            } else {
                format!("{} < r <= {}", radii[ix - 1], r)
            };
            Ok(Region::new(label, Disk::new(center, r)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let remainder = radii
        .last()
        .map_or_else(|| String::from("square"), |r| format!("r > {}", r));

    Ok(NestedRegions::new(square, regions, remainder)?)
}

/// A circle inscribed in a square of side `side`, an equilateral triangle
/// inscribed in the circle and the triangle's incircle
///
/// # Example
///
/// ```
/// use probsim::geometry::presets;
///
/// let regions = presets::inscribed(10.0).unwrap();
/// let ps = regions.theoretical();
///
/// // incircle radius is a√3/6 = 2.5 for a circle of radius 5
/// let incircle = std::f64::consts::PI * 2.5 * 2.5 / 100.0;
/// assert!((ps[0] - incircle).abs() < 1E-10);
/// ```
pub fn inscribed(side: f64) -> Result<NestedRegions, PresetError> {
    let square = Square::new(Point::new(0.0, 0.0), side)?;
    let circle = Disk::new(square.center(), side / 2.0)?;
    let triangle = Triangle::inscribed_in(&circle);
    let incircle = triangle.incircle();

    let regions = vec![
        Region::new("inner circle", incircle),
        Region::new("triangle", triangle),
        Region::new("outer ring", circle),
    ];
    Ok(NestedRegions::new(square, regions, "square")?)
}

impl From<SquareError> for PresetError {
    fn from(err: SquareError) -> Self {
        PresetError::Square(err)
    }
}

impl From<DiskError> for PresetError {
    fn from(err: DiskError) -> Self {
        PresetError::Disk(err)
    }
}

impl From<RegionError> for PresetError {
    fn from(err: RegionError) -> Self {
        PresetError::Region(err)
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Square(err) => Some(err),
            Self::Disk(err) => Some(err),
            Self::Region(err) => Some(err),
        }
    }
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square(err) => write!(f, "invalid square: {}", err),
            Self::Disk(err) => write!(f, "invalid disk: {}", err),
            Self::Region(err) => write!(f, "invalid regions: {}", err),
        }
    }
}
