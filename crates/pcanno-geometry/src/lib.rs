pub mod plane;
pub mod polygon;
pub mod vector;

pub use pcanno_base::Tolerance;
pub use plane::{Corner, LineKind, Plane, PlaneInfo};
pub use polygon::{point_in_polygon, polygon_area};
pub use vector::{
    Point2, Segment, Vec2, cross, distance, distance_to_segment, dot, line_intersection,
    line_intersection_with,
};
