use pcanno_geometry::Corner;
use thiserror::Error;

pub mod drawing;
pub mod envelope;
pub mod model;
pub mod pick;
pub mod solver;

pub use drawing::DrawingCuboid;
pub use envelope::hover_envelope;
pub use model::{
    CornerRef, Cuboid, CuboidInfo, Direction, HighlightEdge, PlaneKind, ShowingSideLine, SideLine,
    cuboid_info, facing_column, highlight_edges, highlight_vertices, showing_side_line, side_lines,
};
pub use pick::{DEFAULT_PICK_RADIUS, Pick, pick};
pub use solver::{
    DragTarget, apply_offset, back_from_front, drag_move, front_from_back, intersection_adjust,
    try_drag_move,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("drag expects {expected} corner position(s), got {actual}")]
    PositionCount { expected: usize, actual: usize },
    #[error("corners {0:?} and {1:?} do not form an edge")]
    NotALine(Corner, Corner),
    #[error("edited corners belong to different planes")]
    MixedPlanes,
    #[error("{corner:?} corner of the {plane:?} plane is not adjustable")]
    CornerNotEditable { plane: PlaneKind, corner: Corner },
    #[error("cuboid drawing is incomplete")]
    Incomplete,
    #[error("front plane has zero area")]
    Degenerate,
}

pub type Result<T> = std::result::Result<T, Error>;
