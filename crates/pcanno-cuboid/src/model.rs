use pcanno_base::Guid;
use pcanno_geometry::{Corner, Plane, Point2, Segment, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneKind {
    Front,
    Back,
}

/// Face shown for secondary attribute display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Front,
    Back,
    Left,
    Right,
    Top,
}

/// A named corner on one of the two planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerRef {
    pub plane: PlaneKind,
    pub corner: Corner,
}

impl CornerRef {
    pub const fn new(plane: PlaneKind, corner: Corner) -> Self {
        Self { plane, corner }
    }

    pub const fn front(corner: Corner) -> Self {
        Self::new(PlaneKind::Front, corner)
    }

    pub const fn back(corner: Corner) -> Self {
        Self::new(PlaneKind::Back, corner)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuboidInfo {
    pub front_center: Point2,
    pub back_center: Point2,
    pub front_width: f64,
    pub front_height: f64,
    pub back_width: f64,
    pub back_height: f64,
    /// The back plane sits left of the front plane, so the left side face
    /// is the visible one.
    pub is_left_side: bool,
}

pub fn cuboid_info(front: &Plane, back: &Plane) -> CuboidInfo {
    let front_info = front.info();
    let back_info = back.info();
    CuboidInfo {
        front_center: front_info.center,
        back_center: back_info.center,
        front_width: front_info.width,
        front_height: front_info.height,
        back_width: back_info.width,
        back_height: back_info.height,
        is_left_side: back_info.center.x < front_info.center.x,
    }
}

/// Corners of the column whose side face is visible: left column when the
/// back plane sits to the left, right column otherwise. Top corner first.
pub fn facing_column(is_left_side: bool) -> (Corner, Corner) {
    if is_left_side {
        (Corner::TopLeft, Corner::BottomLeft)
    } else {
        (Corner::TopRight, Corner::BottomRight)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideLine {
    pub corner: Corner,
    pub segment: Segment,
}

/// Front-to-back corner segments, one per corner name.
pub fn side_lines(front: &Plane, back: &Plane) -> [SideLine; 4] {
    Corner::ALL.map(|corner| SideLine {
        corner,
        segment: Segment::new(front.corner(corner), back.corner(corner)),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowingSideLine {
    pub top: Segment,
    pub bottom: Segment,
}

/// The pair of side lines forming the visible connecting edge.
pub fn showing_side_line(front: &Plane, back: &Plane) -> ShowingSideLine {
    let (top, bottom) = facing_column(cuboid_info(front, back).is_left_side);
    ShowingSideLine {
        top: Segment::new(front.corner(top), back.corner(top)),
        bottom: Segment::new(front.corner(bottom), back.corner(bottom)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightEdge {
    pub plane: PlaneKind,
    pub corners: (Corner, Corner),
    pub segment: Segment,
}

impl HighlightEdge {
    pub fn positions(&self) -> [CornerRef; 2] {
        [
            CornerRef::new(self.plane, self.corners.0),
            CornerRef::new(self.plane, self.corners.1),
        ]
    }
}

/// Edges a user may grab: the four front edges plus the facing back column.
pub fn highlight_edges(front: &Plane, back: &Plane) -> Vec<HighlightEdge> {
    const FRONT_EDGES: [(Corner, Corner); 4] = [
        (Corner::TopLeft, Corner::TopRight),
        (Corner::TopRight, Corner::BottomRight),
        (Corner::BottomRight, Corner::BottomLeft),
        (Corner::BottomLeft, Corner::TopLeft),
    ];

    let mut edges: Vec<HighlightEdge> = FRONT_EDGES
        .iter()
        .map(|&(a, b)| HighlightEdge {
            plane: PlaneKind::Front,
            corners: (a, b),
            segment: front.edge(a, b),
        })
        .collect();

    let (top, bottom) = facing_column(cuboid_info(front, back).is_left_side);
    edges.push(HighlightEdge {
        plane: PlaneKind::Back,
        corners: (top, bottom),
        segment: back.edge(top, bottom),
    });
    edges
}

/// Vertices a user may grab: all front corners plus the facing back column.
pub fn highlight_vertices(front: &Plane, back: &Plane) -> Vec<(CornerRef, Point2)> {
    let mut vertices: Vec<(CornerRef, Point2)> = Corner::ALL
        .iter()
        .map(|&corner| (CornerRef::front(corner), front.corner(corner)))
        .collect();

    let (top, bottom) = facing_column(cuboid_info(front, back).is_left_side);
    vertices.push((CornerRef::back(top), back.corner(top)));
    vertices.push((CornerRef::back(bottom), back.corner(bottom)));
    vertices
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub id: Guid,
    pub source_id: Option<String>,
    pub valid: bool,
    pub attribute: String,
    pub order: u32,
    pub direction: Direction,
    pub front: Plane,
    pub back: Plane,
}

impl Cuboid {
    pub fn new(front: Plane, back: Plane) -> Self {
        Self {
            id: Guid::new(),
            source_id: None,
            valid: true,
            attribute: String::new(),
            order: 0,
            direction: Direction::default(),
            front,
            back,
        }
    }

    pub fn info(&self) -> CuboidInfo {
        cuboid_info(&self.front, &self.back)
    }

    pub fn is_left_side(&self) -> bool {
        self.info().is_left_side
    }

    pub fn plane(&self, kind: PlaneKind) -> &Plane {
        match kind {
            PlaneKind::Front => &self.front,
            PlaneKind::Back => &self.back,
        }
    }

    pub fn corner(&self, position: CornerRef) -> Point2 {
        self.plane(position.plane).corner(position.corner)
    }

    pub fn side_lines(&self) -> [SideLine; 4] {
        side_lines(&self.front, &self.back)
    }

    pub fn showing_side_line(&self) -> ShowingSideLine {
        showing_side_line(&self.front, &self.back)
    }

    pub fn highlight_edges(&self) -> Vec<HighlightEdge> {
        highlight_edges(&self.front, &self.back)
    }

    pub fn highlight_vertices(&self) -> Vec<(CornerRef, Point2)> {
        highlight_vertices(&self.front, &self.back)
    }

    /// Quadrilateral of the face selected by `direction`, in outline order.
    pub fn face_points(&self, direction: Direction) -> [Point2; 4] {
        let (f, b) = (&self.front, &self.back);
        match direction {
            Direction::Front => f.outline(),
            Direction::Back => b.outline(),
            Direction::Left => [b.tl, f.tl, f.bl, b.bl],
            Direction::Right => [f.tr, b.tr, b.br, f.br],
            Direction::Top => [b.tl, b.tr, f.tr, f.tl],
        }
    }

    pub fn active_face(&self) -> [Point2; 4] {
        self.face_points(self.direction)
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            front: self.front.translated(offset),
            back: self.back.translated(offset),
            ..self.clone()
        }
    }
}
