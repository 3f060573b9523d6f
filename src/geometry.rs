//! Geometric value types and predicates.

use core::cmp::Ordering;
use core::fmt::Debug;
use num_traits::float::Float;
use robust::Coord;

use crate::error::{Error, Result};

/// Coordinate type accepted by the triangulation.
///
/// Exact predicates are evaluated in `f64`, so the scalar must widen losslessly.
pub trait Scalar: Float + Into<f64> + Debug {}

impl<T: Float + Into<f64> + Debug> Scalar for T {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Scalar> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> T {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// lexicographic order by (x, y); this is the canonical vertex order
    pub fn lex_cmp(&self, other: &Self) -> Ordering {
        self.x
            .partial_cmp(&other.x)
            .unwrap_or(Ordering::Equal)
            .then(self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }

    pub fn to_f64(self) -> [f64; 2] {
        [self.x.into(), self.y.into()]
    }

    pub(crate) fn coord(self) -> Coord<f64> {
        Coord {
            x: self.x.into(),
            y: self.y.into(),
        }
    }
}

impl<T: Scalar> From<[T; 2]> for Point<T> {
    fn from([x, y]: [T; 2]) -> Self {
        Self { x, y }
    }
}

impl<T: Scalar> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Self { x, y }
    }
}

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
#[inline]
fn cross<T: Scalar>(a: &Point<T>, b: &Point<T>, c: &Point<T>) -> T {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Unsigned area of the triangle spanned by the segment (a, b) and p.
#[inline]
fn offset_area<T: Scalar>(a: &Point<T>, b: &Point<T>, p: &Point<T>) -> T {
    cross(a, b, p).abs() / (T::one() + T::one())
}

/// Largest offset area of a point within `distance` of a segment of `length`.
#[inline]
fn segment_tolerance<T: Scalar>(length: T, distance: T) -> T {
    distance * length / (T::one() + T::one())
}

/// Whether an angle is far enough from 0 and π for the angle-based formulas.
#[inline]
fn well_conditioned<T: Scalar>(angle: T) -> bool {
    let pi = T::from(core::f64::consts::PI).unwrap_or_else(T::zero);
    let guard = T::from(1e-3).unwrap_or_else(T::epsilon);
    angle > guard && angle < pi - guard
}

/// An undirected segment with its endpoints in canonical order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<T> {
    a: Point<T>,
    b: Point<T>,
}

impl<T: Scalar> Edge<T> {
    pub fn new(p: Point<T>, q: Point<T>) -> Result<Self> {
        match p.lex_cmp(&q) {
            Ordering::Less => Ok(Self { a: p, b: q }),
            Ordering::Greater => Ok(Self { a: q, b: p }),
            Ordering::Equal => Err(Error::DegenerateEdge {
                vertices: [p.to_f64(), q.to_f64()],
            }),
        }
    }

    /// endpoints must already be in canonical order
    pub(crate) fn from_sorted(a: Point<T>, b: Point<T>) -> Self {
        debug_assert!(a.lex_cmp(&b) == Ordering::Less);
        Self { a, b }
    }

    pub fn a(&self) -> Point<T> {
        self.a
    }

    pub fn b(&self) -> Point<T> {
        self.b
    }

    pub fn length(&self) -> T {
        self.a.distance(&self.b)
    }

    /// Whether `p` lies on this segment, within `distance`.
    ///
    /// The point must satisfy the line equation through the endpoints (measured as
    /// the area it spans with them) and fall inside the segment's bounding box.
    pub fn contains(&self, p: &Point<T>, distance: T) -> bool {
        let (x0, x1) = (self.a.x.min(self.b.x), self.a.x.max(self.b.x));
        let (y0, y1) = (self.a.y.min(self.b.y), self.a.y.max(self.b.y));
        if p.x < x0 - distance
            || p.x > x1 + distance
            || p.y < y0 - distance
            || p.y > y1 + distance
        {
            return false;
        }
        offset_area(&self.a, &self.b, p) <= segment_tolerance(self.length(), distance)
    }
}

/// Where a point falls relative to a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    Inside,
    OnBoundary,
    Outside,
}

/// A non-degenerate triangle with its vertices in canonical order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<T> {
    a: Point<T>,
    b: Point<T>,
    c: Point<T>,
}

impl<T: Scalar> Triangle<T> {
    /// Builds a triangle, rejecting it when its area does not exceed `min_area`.
    pub fn new(p: Point<T>, q: Point<T>, r: Point<T>, min_area: T) -> Result<Self> {
        let mut v = [p, q, r];
        v.sort_unstable_by(|a, b| a.lex_cmp(b));
        let [a, b, c] = v;
        let t = Self { a, b, c };
        let area = t.area();
        // also rejects NaN
        if !(area > min_area) {
            return Err(Error::DegenerateTriangle {
                vertices: [a.to_f64(), b.to_f64(), c.to_f64()],
                area: area.into(),
            });
        }
        Ok(t)
    }

    /// vertices must already be in canonical order and admissible
    pub(crate) fn from_sorted(a: Point<T>, b: Point<T>, c: Point<T>) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point<T>; 3] {
        [self.a, self.b, self.c]
    }

    /// The edges AB, BC and AC; each is already canonical.
    pub fn edges(&self) -> [Edge<T>; 3] {
        [
            Edge { a: self.a, b: self.b },
            Edge { a: self.b, b: self.c },
            Edge { a: self.a, b: self.c },
        ]
    }

    pub fn has_vertex(&self, p: &Point<T>) -> bool {
        self.a == *p || self.b == *p || self.c == *p
    }

    pub fn signed_area(&self) -> T {
        cross(&self.a, &self.b, &self.c) / (T::one() + T::one())
    }

    pub fn area(&self) -> T {
        self.signed_area().abs()
    }

    pub fn centroid(&self) -> Point<T> {
        let three = T::from(3.0).unwrap_or_else(|| T::one() + T::one() + T::one());
        Point::new(
            (self.a.x + self.b.x + self.c.x) / three,
            (self.a.y + self.b.y + self.c.y) / three,
        )
    }

    /// Interior angles at A, B and C by the law of cosines.
    pub fn angles(&self) -> [T; 3] {
        let two = T::one() + T::one();
        let ab = self.a.distance(&self.b);
        let bc = self.b.distance(&self.c);
        let ca = self.c.distance(&self.a);
        let angle = |adj1: T, adj2: T, opp: T| {
            let cos = (adj1 * adj1 + adj2 * adj2 - opp * opp) / (two * adj1 * adj2);
            cos.max(-T::one()).min(T::one()).acos()
        };
        [angle(ab, ca, bc), angle(bc, ab, ca), angle(ca, bc, ab)]
    }

    pub fn min_angle(&self) -> T {
        let [a, b, c] = self.angles();
        a.min(b).min(c)
    }

    /// lBC / (2 sin A); infinite when sin A vanishes
    pub fn circumradius(&self) -> T {
        let [angle_a, _, _] = self.angles();
        let sin_a = angle_a.sin();
        if sin_a <= T::epsilon() {
            return T::infinity();
        }
        if !well_conditioned(angle_a) {
            // acos is ill-conditioned here, use abc / 4K instead
            let four = T::from(4.0).unwrap_or_else(T::one);
            let ab = self.a.distance(&self.b);
            let bc = self.b.distance(&self.c);
            let ca = self.c.distance(&self.a);
            return ab * bc * ca / (four * self.area());
        }
        self.b.distance(&self.c) / ((T::one() + T::one()) * sin_a)
    }

    /// Circumcenter from the sin(2θ)-weighted vertex formula.
    ///
    /// Angles close to 0 or π make the weights vanish; those triangles fall back to
    /// the determinant form, and a zero determinant yields an infinite center.
    pub fn circumcenter(&self) -> Point<T> {
        let two = T::one() + T::one();
        let angles = self.angles();

        if angles.iter().all(|&t| well_conditioned(t)) {
            let [wa, wb, wc] = angles.map(|t| (two * t).sin());
            let sum = wa + wb + wc;
            if sum.abs() > T::epsilon() {
                return Point::new(
                    (self.a.x * wa + self.b.x * wb + self.c.x * wc) / sum,
                    (self.a.y * wa + self.b.y * wb + self.c.y * wc) / sum,
                );
            }
        }

        let (a, b, c) = (&self.a, &self.b, &self.c);
        let d = two * cross(a, b, c);
        if d == T::zero() {
            return Point::new(T::infinity(), T::infinity());
        }
        let (bx, by) = (b.x - a.x, b.y - a.y);
        let (cx, cy) = (c.x - a.x, c.y - a.y);
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        Point::new(
            a.x + (cy * b2 - by * c2) / d,
            a.y + (bx * c2 - cx * b2) / d,
        )
    }

    /// Whether `p` lies inside the circumcircle by more than `margin`.
    pub fn circumcircle_contains(&self, p: &Point<T>, margin: T) -> bool {
        self.circumcenter().distance(p) < self.circumradius() - margin
    }

    /// Classifies `p` against this triangle.
    ///
    /// The three sub-triangles p forms with each edge must sum to this triangle's
    /// area within tolerance, and p must be no farther from the centroid than the
    /// farthest vertex. A point within `distance` of an edge is on that edge.
    pub fn classify(&self, p: &Point<T>, distance: T) -> Containment {
        let edges = self.edges();
        let sub = edges.map(|e| offset_area(&e.a, &e.b, p));
        let tolerance = edges.map(|e| segment_tolerance(e.length(), distance));
        // at most twice the tightest on-boundary tolerance
        let slack = tolerance[0].min(tolerance[1]).min(tolerance[2]) * (T::one() + T::one());
        if (sub[0] + sub[1] + sub[2] - self.area()).abs() > slack {
            return Containment::Outside;
        }

        let centroid = self.centroid();
        let reach = self
            .vertices()
            .iter()
            .map(|v| v.distance(&centroid))
            .fold(T::zero(), |m, d| m.max(d));
        if p.distance(&centroid) > reach + distance {
            return Containment::Outside;
        }

        let on_edge = sub.iter().zip(tolerance).any(|(&s, tol)| s <= tol);
        if on_edge {
            Containment::OnBoundary
        } else {
            Containment::Inside
        }
    }
}

/// Axis-aligned rectangle enclosing the input domain.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl<T: Scalar> Rect<T> {
    pub fn new(min: Point<T>, max: Point<T>) -> Self {
        Self { min, max }
    }

    /// Bounding box of `points`, or `None` when there are none.
    pub fn bounding<'a>(points: impl IntoIterator<Item = &'a Point<T>>) -> Option<Self>
    where
        T: 'a,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |r, p| {
            Self::new(
                Point::new(r.min.x.min(p.x), r.min.y.min(p.y)),
                Point::new(r.max.x.max(p.x), r.max.y.max(p.y)),
            )
        }))
    }

    /// Corners in the order (min, min), (min, max), (max, max), (max, min).
    pub fn corners(&self) -> [Point<T>; 4] {
        [
            self.min,
            Point::new(self.min.x, self.max.y),
            self.max,
            Point::new(self.max.x, self.min.y),
        ]
    }

    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    /// Whether `p` lies in the closed rectangle; always false for NaN coordinates.
    pub fn contains(&self, p: &Point<T>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Absolute tolerances the mesh applies to its geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance<T> {
    /// triangles must have a strictly larger area
    pub area: T,
    /// points this close to an edge or vertex are on it
    pub distance: T,
}

impl<T: Scalar> Tolerance<T> {
    /// The same `epsilon` for areas and distances, independent of scale.
    pub fn uniform(epsilon: T) -> Self {
        Self {
            area: epsilon,
            distance: epsilon,
        }
    }

    /// A relative `epsilon` scaled to `bounds`: areas by width times height,
    /// distances by the diagonal.
    pub fn scaled(epsilon: T, bounds: &Rect<T>) -> Self {
        let (w, h) = (bounds.width().abs(), bounds.height().abs());
        Self {
            area: epsilon * w * h,
            distance: epsilon * w.hypot(h),
        }
    }
}

/// Convex hull in counter-clockwise order, without collinear boundary points.
pub fn convex_hull<T: Scalar>(points: &[Point<T>]) -> Vec<Point<T>> {
    let mut sorted: Vec<Point<T>> = points.to_vec();
    sorted.sort_unstable_by(|a, b| a.lex_cmp(b));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let turns_left = |o: &Point<T>, a: &Point<T>, b: &Point<T>| {
        robust::orient2d(o.coord(), a.coord(), b.coord()) > 0.0
    };

    let mut hull: Vec<Point<T>> = Vec::with_capacity(sorted.len() + 1);
    let chain = |hull: &mut Vec<Point<T>>, start: usize, p: &Point<T>| {
        while hull.len() >= start + 2 {
            let n = hull.len();
            if turns_left(&hull[n - 2], &hull[n - 1], p) {
                break;
            }
            hull.pop();
        }
        hull.push(*p);
    };
    for p in &sorted {
        chain(&mut hull, 0, p);
    }
    // the last point of each chain starts the other one
    hull.pop();
    let start = hull.len();
    for p in sorted.iter().rev() {
        chain(&mut hull, start, p);
    }
    hull.pop();
    hull
}

/// Unsigned area of a simple polygon.
pub fn polygon_area<T: Scalar>(ring: &[Point<T>]) -> T {
    let Some(last) = ring.last() else {
        return T::zero();
    };
    let mut prev = *last;
    let mut sum = T::zero();
    for p in ring {
        sum = sum + (prev.x * p.y - p.x * prev.y);
        prev = *p;
    }
    (sum / (T::one() + T::one())).abs()
}
