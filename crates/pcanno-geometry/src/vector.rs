use pcanno_base::Tolerance;
use serde::{Deserialize, Serialize};

/// Screen-space coordinate. `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point2) -> f64 {
        (self - other).length()
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl std::ops::Add<Vec2> for Point2 {
    type Output = Point2;

    fn add(self, rhs: Vec2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Vec2> for Point2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point2> for Point2 {
    type Output = Vec2;

    fn sub(self, rhs: Point2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Two points describing either a finite segment or the infinite line
/// through them, depending on the operation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point2,
    pub p2: Point2,
}

impl Segment {
    pub const fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    pub fn direction(&self) -> Vec2 {
        self.p2 - self.p1
    }
}

pub fn distance(a: Point2, b: Point2) -> f64 {
    a.distance(b)
}

pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.cross(b)
}

pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.dot(b)
}

/// Intersection of the infinite lines through `a` and `b`.
///
/// Returns `None` for parallel or coincident lines and for zero-length
/// inputs, so callers never see non-finite coordinates.
pub fn line_intersection(a: Segment, b: Segment) -> Option<Point2> {
    line_intersection_with(a, b, &Tolerance::default())
}

pub fn line_intersection_with(a: Segment, b: Segment, tol: &Tolerance) -> Option<Point2> {
    let d1 = a.direction();
    let d2 = b.direction();
    let denom = d1.cross(d2);
    if tol.is_zero(denom) {
        return None;
    }
    let t = (b.p1 - a.p1).cross(d2) / denom;
    let hit = a.p1 + d1 * t;
    hit.is_finite().then_some(hit)
}

pub fn distance_to_segment(point: Point2, segment: Segment) -> f64 {
    let dir = segment.direction();
    let len_sq = dir.dot(dir);
    if len_sq <= f64::EPSILON {
        return point.distance(segment.p1);
    }
    let t = ((point - segment.p1).dot(dir) / len_sq).clamp(0.0, 1.0);
    point.distance(segment.p1 + dir * t)
}
