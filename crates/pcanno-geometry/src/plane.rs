use serde::{Deserialize, Serialize};

use crate::vector::{Point2, Segment, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Orientation of the edge joining two adjacent corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Horizontal edge; only vertical movement is meaningful.
    Row,
    /// Vertical edge; only horizontal movement is meaningful.
    Column,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn diagonal(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// Kind of edge formed with `other`, or `None` when the two corners are
    /// equal or diagonal.
    pub fn line_with(self, other: Corner) -> Option<LineKind> {
        if self == other || self.diagonal() == other {
            return None;
        }
        if self.is_top() == other.is_top() {
            Some(LineKind::Row)
        } else {
            Some(LineKind::Column)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneInfo {
    pub width: f64,
    pub height: f64,
    pub center: Point2,
}

/// A face of a cuboid. Regular planes are axis aligned in screen space:
/// `tl.y == tr.y`, `bl.y == br.y`, `tl.x == bl.x`, `tr.x == br.x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub tl: Point2,
    pub tr: Point2,
    pub bl: Point2,
    pub br: Point2,
}

impl Plane {
    pub fn from_diagonal(p1: Point2, p2: Point2) -> Self {
        let (min_x, max_x) = (p1.x.min(p2.x), p1.x.max(p2.x));
        let (min_y, max_y) = (p1.y.min(p2.y), p1.y.max(p2.y));
        Self::from_extents(min_x, min_y, max_x, max_y)
    }

    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            tl: Point2::new(min_x, min_y),
            tr: Point2::new(max_x, min_y),
            bl: Point2::new(min_x, max_y),
            br: Point2::new(max_x, max_y),
        }
    }

    /// Axis-aligned quadrilateral spanning the min/max of `points`.
    pub fn bounding_quad(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in iter {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Some(Self::from_extents(min_x, min_y, max_x, max_y))
    }

    /// Regular plane spanning the current corners, used after individual
    /// corners were moved.
    pub fn squared(&self) -> Self {
        Self::bounding_quad(self.outline()).unwrap_or(*self)
    }

    /// Same-size copy of `reference` whose bottom-left corner sits at `anchor`.
    pub fn by_bottom_left(anchor: Point2, reference: &Plane) -> Self {
        let PlaneInfo { width, height, .. } = reference.info();
        Self {
            tl: Point2::new(anchor.x, anchor.y - height),
            tr: Point2::new(anchor.x + width, anchor.y - height),
            bl: anchor,
            br: Point2::new(anchor.x + width, anchor.y),
        }
    }

    /// Same-size copy of `reference` whose bottom-right corner sits at `anchor`.
    pub fn by_bottom_right(anchor: Point2, reference: &Plane) -> Self {
        let PlaneInfo { width, height, .. } = reference.info();
        Self {
            tl: Point2::new(anchor.x - width, anchor.y - height),
            tr: Point2::new(anchor.x, anchor.y - height),
            bl: Point2::new(anchor.x - width, anchor.y),
            br: anchor,
        }
    }

    pub fn info(&self) -> PlaneInfo {
        PlaneInfo {
            width: (self.tr.x - self.tl.x).abs(),
            height: (self.br.y - self.tr.y).abs(),
            center: self.tl.midpoint(self.br),
        }
    }

    pub fn width(&self) -> f64 {
        self.info().width
    }

    pub fn height(&self) -> f64 {
        self.info().height
    }

    pub fn center(&self) -> Point2 {
        self.info().center
    }

    pub fn area(&self) -> f64 {
        let info = self.info();
        info.width * info.height
    }

    pub fn corner(&self, corner: Corner) -> Point2 {
        match corner {
            Corner::TopLeft => self.tl,
            Corner::TopRight => self.tr,
            Corner::BottomLeft => self.bl,
            Corner::BottomRight => self.br,
        }
    }

    pub fn corner_mut(&mut self, corner: Corner) -> &mut Point2 {
        match corner {
            Corner::TopLeft => &mut self.tl,
            Corner::TopRight => &mut self.tr,
            Corner::BottomLeft => &mut self.bl,
            Corner::BottomRight => &mut self.br,
        }
    }

    /// Corners in outline order: tl, tr, br, bl.
    pub fn outline(&self) -> [Point2; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    pub fn edge(&self, a: Corner, b: Corner) -> Segment {
        Segment::new(self.corner(a), self.corner(b))
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            tl: self.tl + offset,
            tr: self.tr + offset,
            bl: self.bl + offset,
            br: self.br + offset,
        }
    }

    pub fn is_regular(&self, eps: f64) -> bool {
        (self.tl.y - self.tr.y).abs() <= eps
            && (self.bl.y - self.br.y).abs() <= eps
            && (self.tl.x - self.bl.x).abs() <= eps
            && (self.tr.x - self.br.x).abs() <= eps
    }
}
