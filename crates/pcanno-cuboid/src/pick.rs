use pcanno_geometry::{Point2, distance_to_segment};
use serde::{Deserialize, Serialize};

use crate::model::{CornerRef, Cuboid};
use crate::solver::DragTarget;

/// Screen-space grab distance for vertices and edges, in pixels.
pub const DEFAULT_PICK_RADIUS: f64 = 6.0;

/// A resolved drag target ready to be passed to `drag_move`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub target: DragTarget,
    pub positions: Vec<CornerRef>,
}

/// Resolve what the pointer would grab on `cuboid`: the nearest adjustable
/// vertex, then the nearest adjustable edge, then the whole volume.
pub fn pick(cuboid: &Cuboid, pointer: Point2, radius: f64) -> Option<Pick> {
    let vertex = cuboid
        .highlight_vertices()
        .into_iter()
        .map(|(position, point)| (position, point.distance(pointer)))
        .filter(|(_, dist)| *dist <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((position, _)) = vertex {
        return Some(Pick {
            target: DragTarget::Point,
            positions: vec![position],
        });
    }

    let edge = cuboid
        .highlight_edges()
        .into_iter()
        .map(|edge| (edge, distance_to_segment(pointer, edge.segment)))
        .filter(|(_, dist)| *dist <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((edge, _)) = edge {
        return Some(Pick {
            target: DragTarget::Line,
            positions: edge.positions().to_vec(),
        });
    }

    cuboid.contains(pointer).then(|| Pick {
        target: DragTarget::Cuboid,
        positions: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcanno_geometry::{Corner, Plane};

    fn cuboid() -> Cuboid {
        Cuboid::new(
            Plane::from_diagonal(Point2::new(0.0, 20.0), Point2::new(40.0, 60.0)),
            Plane::from_diagonal(Point2::new(20.0, 10.0), Point2::new(50.0, 40.0)),
        )
    }

    #[test]
    fn vertices_win_over_edges() {
        let picked = pick(&cuboid(), Point2::new(41.0, 21.0), DEFAULT_PICK_RADIUS);
        assert_eq!(
            picked,
            Some(Pick {
                target: DragTarget::Point,
                positions: vec![CornerRef::front(Corner::TopRight)],
            })
        );
    }

    #[test]
    fn edges_resolve_to_corner_pairs() {
        let picked = pick(&cuboid(), Point2::new(20.0, 61.0), DEFAULT_PICK_RADIUS);
        assert_eq!(
            picked,
            Some(Pick {
                target: DragTarget::Line,
                positions: vec![
                    CornerRef::front(Corner::BottomRight),
                    CornerRef::front(Corner::BottomLeft),
                ],
            })
        );
    }

    #[test]
    fn hidden_back_corner_falls_through_to_volume() {
        let cuboid = cuboid();
        let picked = pick(&cuboid, Point2::new(20.0, 15.0), 2.0);
        assert_eq!(picked.map(|p| p.target), Some(DragTarget::Cuboid));
        assert_eq!(pick(&cuboid, Point2::new(100.0, 100.0), 2.0), None);
    }
}
