//! Planar shapes with containment, area and nesting tests
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::dist::Uniform;
use crate::impl_display;
use crate::traits::Sampleable;
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

/// Slack allowed when checking that one shape encloses another
pub const ENCLOSE_TOL: f64 = 1E-9;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Axis aligned square, the space points are sampled from
///
/// # Example
///
/// ```
/// use probsim::geometry::{Point, Square};
///
/// let square = Square::new(Point::new(0.0, 0.0), 2.0).unwrap();
/// assert_eq!(square.center(), Point::new(1.0, 1.0));
/// assert_eq!(square.area(), 4.0);
/// assert!(square.contains(&Point::new(2.0, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Square {
    /// Lower left corner
    origin: Point,
    side: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum SquareError {
    /// The origin has an infinite or NaN coordinate
    OriginNotFinite { origin: Point },
    /// The side length is zero, negative, infinite or NaN
    InvalidSide { side: f64 },
}

impl Square {
    pub fn new(origin: Point, side: f64) -> Result<Self, SquareError> {
        if !origin.is_finite() {
            Err(SquareError::OriginNotFinite { origin })
        } else if !(side.is_finite() && side > 0.0) {
            Err(SquareError::InvalidSide { side })
        } else {
            Ok(Square { origin, side })
        }
    }

    #[inline]
    pub fn new_unchecked(origin: Point, side: f64) -> Self {
        Square { origin, side }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn side(&self) -> f64 {
        self.side
    }

    pub fn center(&self) -> Point {
        let h = self.side / 2.0;
        Point::new(self.origin.x + h, self.origin.y + h)
    }

    pub fn area(&self) -> f64 {
        self.side * self.side
    }

    /// Boundary inclusive
    pub fn contains(&self, p: &Point) -> bool {
        self.origin.x <= p.x
            && p.x <= self.origin.x + self.side
            && self.origin.y <= p.y
            && p.y <= self.origin.y + self.side
    }

    /// `true` if `shape` lies inside the square, up to [`ENCLOSE_TOL`]
    pub fn encloses(&self, shape: &Shape) -> bool {
        let lo = Point::new(
            self.origin.x - ENCLOSE_TOL,
            self.origin.y - ENCLOSE_TOL,
        );
        let hi = Point::new(
            self.origin.x + self.side + ENCLOSE_TOL,
            self.origin.y + self.side + ENCLOSE_TOL,
        );
        let inside =
            |p: &Point| lo.x <= p.x && p.x <= hi.x && lo.y <= p.y && p.y <= hi.y;
        match shape {
            Shape::Disk(disk) => {
                let c = disk.center;
                let r = disk.radius;
                inside(&Point::new(c.x - r, c.y - r))
                    && inside(&Point::new(c.x + r, c.y + r))
            }
            Shape::Triangle(tri) => tri.vertices().iter().all(inside),
        }
    }

    // uniform distributions over the x and y extents
    fn axes(&self) -> (Uniform, Uniform) {
        (
            Uniform::new_unchecked(self.origin.x, self.origin.x + self.side),
            Uniform::new_unchecked(self.origin.y, self.origin.y + self.side),
        )
    }

    /// A point drawn uniformly over the square
    pub fn draw_point<R: Rng>(&self, rng: &mut R) -> Point {
        let (ux, uy) = self.axes();
        let x: f64 = ux.draw(rng);
        let y: f64 = uy.draw(rng);
        Point::new(x, y)
    }

    /// `n` points drawn uniformly over the square
    pub fn sample_points<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<Point> {
        let (ux, uy) = self.axes();
        (0..n)
            .map(|_| {
                let x: f64 = ux.draw(rng);
                let y: f64 = uy.draw(rng);
                Point::new(x, y)
            })
            .collect()
    }
}

impl From<&Square> for String {
    fn from(sq: &Square) -> String {
        format!(
            "Square(origin: ({}, {}), side: {})",
            sq.origin.x, sq.origin.y, sq.side
        )
    }
}

impl_display!(Square);

/// A closed disk
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Disk {
    center: Point,
    radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum DiskError {
    /// The center has an infinite or NaN coordinate
    CenterNotFinite { center: Point },
    /// The radius is zero, negative, infinite or NaN
    InvalidRadius { radius: f64 },
}

impl Disk {
    pub fn new(center: Point, radius: f64) -> Result<Self, DiskError> {
        if !center.is_finite() {
            Err(DiskError::CenterNotFinite { center })
        } else if !(radius.is_finite() && radius > 0.0) {
            Err(DiskError::InvalidRadius { radius })
        } else {
            Ok(Disk { center, radius })
        }
    }

    #[inline]
    pub fn new_unchecked(center: Point, radius: f64) -> Self {
        Disk { center, radius }
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Boundary inclusive
    pub fn contains(&self, p: &Point) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        dx.mul_add(dx, dy * dy) <= self.radius * self.radius
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

impl From<&Disk> for String {
    fn from(disk: &Disk) -> String {
        format!(
            "Disk(center: ({}, {}), r: {})",
            disk.center.x, disk.center.y, disk.radius
        )
    }
}

impl_display!(Disk);

/// A non-degenerate triangle
///
/// # Example
///
/// ```
/// use probsim::geometry::{Point, Triangle};
///
/// let tri = Triangle::new(
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(0.0, 4.0),
/// ).unwrap();
///
/// assert!(tri.contains(&Point::new(1.0, 1.0)));
/// assert!(!tri.contains(&Point::new(3.0, 3.0)));
/// // on the hypotenuse
/// assert!(tri.contains(&Point::new(2.0, 2.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Triangle {
    a: Point,
    b: Point,
    c: Point,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum TriangleError {
    /// A vertex has an infinite or NaN coordinate
    VertexNotFinite { vertex: Point },
    /// The vertices are collinear, so the triangle has no area
    Degenerate { a: Point, b: Point, c: Point },
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self, TriangleError> {
        if let Some(vertex) = [a, b, c].into_iter().find(|v| !v.is_finite()) {
            return Err(TriangleError::VertexNotFinite { vertex });
        }
        let tri = Triangle { a, b, c };
        let scale = a.distance(&b) * a.distance(&c);
        if tri.cross().abs() <= f64::EPSILON * scale {
            Err(TriangleError::Degenerate { a, b, c })
        } else {
            Ok(tri)
        }
    }

    #[inline]
    pub fn new_unchecked(a: Point, b: Point, c: Point) -> Self {
        Triangle { a, b, c }
    }

    /// Equilateral triangle with its vertices on `circle`, the first vertex
    /// at the bottom
    pub fn inscribed_in(circle: &Disk) -> Self {
        let [a, b, c] = [0.0, 1.0, 2.0].map(|i: f64| {
            let angle = 2.0 * PI * i / 3.0 - PI / 2.0;
            Point::new(
                circle.radius.mul_add(angle.cos(), circle.center.x),
                circle.radius.mul_add(angle.sin(), circle.center.y),
            )
        });
        Triangle { a, b, c }
    }

    #[inline]
    pub fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    pub fn centroid(&self) -> Point {
        Point::new(
            (self.a.x + self.b.x + self.c.x) / 3.0,
            (self.a.y + self.b.y + self.c.y) / 3.0,
        )
    }

    /// The largest disk inside the triangle
    pub fn incircle(&self) -> Disk {
        let la = self.b.distance(&self.c);
        let lb = self.a.distance(&self.c);
        let lc = self.a.distance(&self.b);
        let p = la + lb + lc;
        let center = Point::new(
            (la * self.a.x + lb * self.b.x + lc * self.c.x) / p,
            (la * self.a.y + lb * self.b.y + lc * self.c.y) / p,
        );
        Disk::new_unchecked(center, 2.0 * self.area() / p)
    }

    // twice the signed area
    fn cross(&self) -> f64 {
        (self.b.x - self.a.x) * (self.c.y - self.a.y)
            - (self.c.x - self.a.x) * (self.b.y - self.a.y)
    }

    pub fn area(&self) -> f64 {
        self.cross().abs() / 2.0
    }

    /// Barycentric coordinates (u, v) of `p` along the edges a→c and a→b
    pub fn barycentric(&self, p: &Point) -> (f64, f64) {
        let v0 = (self.c.x - self.a.x, self.c.y - self.a.y);
        let v1 = (self.b.x - self.a.x, self.b.y - self.a.y);
        let v2 = (p.x - self.a.x, p.y - self.a.y);

        let dot = |s: (f64, f64), t: (f64, f64)| s.0.mul_add(t.0, s.1 * t.1);
        let dot00 = dot(v0, v0);
        let dot01 = dot(v0, v1);
        let dot02 = dot(v0, v2);
        let dot11 = dot(v1, v1);
        let dot12 = dot(v1, v2);

        let inv_denom = (dot00 * dot11 - dot01 * dot01).recip();
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;
        (u, v)
    }

    /// Boundary inclusive
    pub fn contains(&self, p: &Point) -> bool {
        let (u, v) = self.barycentric(p);
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    // distance from `p` to the line through each edge
    fn edge_distances(&self, p: &Point) -> [f64; 3] {
        let line = |s: &Point, t: &Point| {
            let cross = (t.x - s.x) * (p.y - s.y) - (p.x - s.x) * (t.y - s.y);
            cross.abs() / s.distance(t)
        };
        [
            line(&self.a, &self.b),
            line(&self.b, &self.c),
            line(&self.c, &self.a),
        ]
    }

    // distance from `p` to the nearest point on the boundary
    fn boundary_distance(&self, p: &Point) -> f64 {
        let segment = |s: &Point, t: &Point| {
            let (dx, dy) = (t.x - s.x, t.y - s.y);
            let len_sq = dx.mul_add(dx, dy * dy);
            let w = (p.x - s.x).mul_add(dx, (p.y - s.y) * dy) / len_sq;
            let w = w.clamp(0.0, 1.0);
            p.distance(&Point::new(w.mul_add(dx, s.x), w.mul_add(dy, s.y)))
        };
        segment(&self.a, &self.b)
            .min(segment(&self.b, &self.c))
            .min(segment(&self.c, &self.a))
    }

    fn contains_within(&self, p: &Point, tol: f64) -> bool {
        self.contains(p) || self.boundary_distance(p) <= tol
    }
}

impl From<&Triangle> for String {
    fn from(tri: &Triangle) -> String {
        format!(
            "Triangle(({}, {}), ({}, {}), ({}, {}))",
            tri.a.x, tri.a.y, tri.b.x, tri.b.y, tri.c.x, tri.c.y
        )
    }
}

impl_display!(Triangle);

/// A region boundary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Shape {
    Disk(Disk),
    Triangle(Triangle),
}

impl Shape {
    /// Boundary inclusive
    pub fn contains(&self, p: &Point) -> bool {
        match self {
            Shape::Disk(disk) => disk.contains(p),
            Shape::Triangle(tri) => tri.contains(p),
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Shape::Disk(disk) => disk.area(),
            Shape::Triangle(tri) => tri.area(),
        }
    }

    /// `true` if `other` lies inside `self`, up to [`ENCLOSE_TOL`]
    ///
    /// # Example
    ///
    /// ```
    /// use probsim::geometry::{Disk, Point, Shape, Triangle};
    ///
    /// let circle = Disk::new(Point::new(5.0, 5.0), 5.0).unwrap();
    /// let tri = Triangle::inscribed_in(&circle);
    /// let incircle = tri.incircle();
    ///
    /// let circle = Shape::Disk(circle);
    /// let tri = Shape::Triangle(tri);
    ///
    /// assert!(circle.encloses(&tri));
    /// assert!(tri.encloses(&Shape::Disk(incircle)));
    /// assert!(!tri.encloses(&circle));
    /// ```
    pub fn encloses(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Disk(outer), Shape::Disk(inner)) => {
                outer.center.distance(&inner.center) + inner.radius
                    <= outer.radius + ENCLOSE_TOL
            }
            (Shape::Disk(outer), Shape::Triangle(inner)) => {
                inner.vertices().iter().all(|v| {
                    outer.center.distance(v) <= outer.radius + ENCLOSE_TOL
                })
            }
            (Shape::Triangle(outer), Shape::Disk(inner)) => {
                outer.contains(&inner.center)
                    && outer
                        .edge_distances(&inner.center)
                        .iter()
                        .all(|&d| d + ENCLOSE_TOL >= inner.radius)
            }
            (Shape::Triangle(outer), Shape::Triangle(inner)) => inner
                .vertices()
                .iter()
                .all(|v| outer.contains_within(v, ENCLOSE_TOL)),
        }
    }
}

impl From<Disk> for Shape {
    fn from(disk: Disk) -> Self {
        Shape::Disk(disk)
    }
}

impl From<Triangle> for Shape {
    fn from(tri: Triangle) -> Self {
        Shape::Triangle(tri)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Disk(disk) => disk.fmt(f),
            Shape::Triangle(tri) => tri.fmt(f),
        }
    }
}

impl std::error::Error for SquareError {}
impl std::error::Error for DiskError {}
impl std::error::Error for TriangleError {}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginNotFinite { origin } => write!(
                f,
                "non-finite square origin: ({}, {})",
                origin.x, origin.y
            ),
            Self::InvalidSide { side } => {
                write!(f, "side ({}) must be finite and positive", side)
            }
        }
    }
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CenterNotFinite { center } => write!(
                f,
                "non-finite disk center: ({}, {})",
                center.x, center.y
            ),
            Self::InvalidRadius { radius } => {
                write!(f, "radius ({}) must be finite and positive", radius)
            }
        }
    }
}

impl fmt::Display for TriangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexNotFinite { vertex } => write!(
                f,
                "non-finite triangle vertex: ({}, {})",
                vertex.x, vertex.y
            ),
            Self::Degenerate { a, b, c } => write!(
                f,
                "degenerate triangle: ({}, {}), ({}, {}), ({}, {}) are collinear",
                a.x, a.y, b.x, b.y, c.x, c.y
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 4.0),
        )
        .unwrap()
    }

    #[test]
    fn triangle_contains_interior_point() {
        assert!(right_triangle().contains(&Point::new(1.0, 1.0)));
    }

    #[test]
    fn triangle_excludes_exterior_point() {
        assert!(!right_triangle().contains(&Point::new(3.0, 3.0)));
        assert!(!right_triangle().contains(&Point::new(-0.1, 1.0)));
    }

    #[test]
    fn triangle_boundary_is_inclusive() {
        let tri = right_triangle();
        let (u, v) = tri.barycentric(&Point::new(2.0, 2.0));
        assert::close(u + v, 1.0, TOL);
        assert!(tri.contains(&Point::new(2.0, 2.0)));
        assert!(tri.contains(&Point::new(0.0, 0.0)));
        assert!(tri.contains(&Point::new(2.0, 0.0)));
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let res = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        );
        assert!(matches!(res, Err(TriangleError::Degenerate { .. })));

        let res = Triangle::new(
            Point::new(0.0, f64::NAN),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        );
        assert!(matches!(res, Err(TriangleError::VertexNotFinite { .. })));
    }

    #[test]
    fn triangle_area() {
        assert::close(right_triangle().area(), 8.0, TOL);
    }

    #[test]
    fn inscribed_triangle_is_equilateral() {
        let circle = Disk::new(Point::new(5.0, 5.0), 5.0).unwrap();
        let tri = Triangle::inscribed_in(&circle);
        let [a, b, c] = tri.vertices();
        let side = 5.0 * 3.0_f64.sqrt();
        assert::close(a.distance(&b), side, 1E-10);
        assert::close(b.distance(&c), side, 1E-10);
        assert::close(c.distance(&a), side, 1E-10);
        // first vertex at the bottom of the circle
        assert::close(a.x, 5.0, 1E-10);
        assert::close(a.y, 0.0, 1E-10);
    }

    #[test]
    fn incircle_of_equilateral_triangle() {
        let circle = Disk::new(Point::new(5.0, 5.0), 5.0).unwrap();
        let tri = Triangle::inscribed_in(&circle);
        let side = 5.0 * 3.0_f64.sqrt();
        let incircle = tri.incircle();
        assert::close(incircle.radius(), side * 3.0_f64.sqrt() / 6.0, 1E-10);
        assert::close(incircle.center().x, 5.0, 1E-10);
        assert::close(incircle.center().y, 5.0, 1E-10);
    }

    #[test]
    fn disk_contains_boundary() {
        let disk = Disk::new(Point::new(0.0, 0.0), 1.0).unwrap();
        assert!(disk.contains(&Point::new(1.0, 0.0)));
        assert!(!disk.contains(&Point::new(1.0, 0.1)));
        assert::close(disk.area(), PI, TOL);
    }

    #[test]
    fn disk_rejects_bad_radius() {
        assert!(Disk::new(Point::new(0.0, 0.0), 0.0).is_err());
        assert!(Disk::new(Point::new(0.0, 0.0), f64::NAN).is_err());
    }

    #[test]
    fn concentric_disks_nest() {
        let inner: Shape = Disk::new(Point::new(1.0, 1.0), 0.3).unwrap().into();
        let outer: Shape = Disk::new(Point::new(1.0, 1.0), 0.7).unwrap().into();
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(outer.encloses(&outer));
    }

    #[test]
    fn triangle_encloses_smaller_triangle() {
        let outer: Shape = right_triangle().into();
        let inner: Shape = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        )
        .unwrap()
        .into();
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
    }

    #[test]
    fn square_encloses_inscribed_disk() {
        let square = Square::new(Point::new(0.0, 0.0), 10.0).unwrap();
        let disk: Shape = Disk::new(square.center(), 5.0).unwrap().into();
        assert!(square.encloses(&disk));
        let big: Shape = Disk::new(square.center(), 5.1).unwrap().into();
        assert!(!square.encloses(&big));
    }

    #[test]
    fn square_rejects_bad_side() {
        assert!(Square::new(Point::new(0.0, 0.0), -1.0).is_err());
        assert!(Square::new(Point::new(f64::INFINITY, 0.0), 1.0).is_err());
    }

    #[test]
    fn sampled_points_lie_in_square() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0x5A);
        let square = Square::new(Point::new(-1.0, 2.0), 3.0).unwrap();
        let pts = square.sample_points(1_000, &mut rng);
        assert_eq!(pts.len(), 1_000);
        assert!(pts.iter().all(|p| square.contains(p)));
        assert!(square.contains(&square.draw_point(&mut rng)));
    }
}
