//! Keeps the front and back planes a consistent perspective pair while one
//! of them is edited.
//!
//! Every function here is a pure transformation: it takes the current
//! planes and returns new ones, leaving the inputs untouched.

use pcanno_geometry::{Corner, LineKind, Plane, Point2, Segment, Vec2, line_intersection};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::model::{CornerRef, Cuboid, PlaneKind, cuboid_info, facing_column, showing_side_line};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    /// Whole-volume translation.
    Cuboid,
    Line,
    Point,
}

/// Re-derive the back plane after the front plane changed.
///
/// The back plane is re-anchored at its facing bottom corner with the front
/// plane's size. When the front is taller than the back, the vanishing point
/// of the visible side lines decides the back plane's far column instead.
pub fn back_from_front(front: &Plane, back: &Plane) -> Plane {
    let info = cuboid_info(front, back);
    if info.front_height > info.back_height {
        return intersection_adjust(front, back);
    }
    if info.is_left_side {
        Plane::by_bottom_left(back.bl, front)
    } else {
        Plane::by_bottom_right(back.br, front)
    }
}

/// Move the back plane's far column so that its side lines pass through the
/// vanishing point of the visible side lines.
///
/// The back plane's height and facing column are kept. Parallel side lines
/// have no vanishing point and leave `back` unchanged.
pub fn intersection_adjust(front: &Plane, back: &Plane) -> Plane {
    let info = cuboid_info(front, back);
    let showing = showing_side_line(front, back);
    let Some(vanishing) = line_intersection(showing.bottom, showing.top) else {
        trace!("side lines are parallel; back plane kept");
        return *back;
    };

    let (far_top, far_bottom) = facing_column(!info.is_left_side);
    let bottom_edge = back.edge(Corner::BottomLeft, Corner::BottomRight);
    let toward_vanishing = Segment::new(front.corner(far_bottom), vanishing);
    let Some(hit) = line_intersection(bottom_edge, toward_vanishing) else {
        trace!("far side line misses the back bottom edge; back plane kept");
        return *back;
    };

    let mut adjusted = *back;
    *adjusted.corner_mut(far_bottom) = Point2::new(hit.x, back.bl.y);
    *adjusted.corner_mut(far_top) = Point2::new(hit.x, back.tl.y);
    adjusted
}

/// Re-derive the front plane after the back plane changed.
///
/// Returns the new `(front, back)` pair: the back plane only changes when
/// the front is taller and the vanishing point has to be re-applied. Width
/// edits on the back never widen the front.
pub fn front_from_back(front: &Plane, back: &Plane) -> (Plane, Plane) {
    let info = cuboid_info(front, back);
    let mut new_front = if info.is_left_side {
        Plane::by_bottom_left(front.bl, back)
    } else {
        Plane::by_bottom_right(front.br, back)
    };
    let mut new_back = *back;

    if info.front_height > info.back_height {
        new_front = *front;
        new_back = intersection_adjust(front, back);
    }

    if info.front_width >= info.back_width {
        for corner in Corner::ALL {
            new_front.corner_mut(corner).x = front.corner(corner).x;
        }
    }
    (new_front, new_back)
}

/// Move the edge made of `edited` by `offset` and re-solve the other plane.
///
/// Rows only move vertically and columns only horizontally; the forbidden
/// axis of `offset` is dropped.
pub fn apply_offset(
    offset: Vec2,
    front: &Plane,
    back: &Plane,
    edited: [CornerRef; 2],
) -> Result<(Plane, Plane)> {
    let [a, b] = edited;
    if a.plane != b.plane {
        return Err(Error::MixedPlanes);
    }
    let kind = a
        .corner
        .line_with(b.corner)
        .ok_or(Error::NotALine(a.corner, b.corner))?;
    let offset = match kind {
        LineKind::Row => Vec2::new(0.0, offset.y),
        LineKind::Column => Vec2::new(offset.x, 0.0),
    };

    match a.plane {
        PlaneKind::Front => {
            let mut moved = *front;
            *moved.corner_mut(a.corner) += offset;
            *moved.corner_mut(b.corner) += offset;
            let new_front = moved.squared();
            Ok((new_front, back_from_front(&new_front, back)))
        }
        PlaneKind::Back => {
            ensure_back_editable(front, back, a.corner)?;
            ensure_back_editable(front, back, b.corner)?;
            let mut moved = *back;
            *moved.corner_mut(a.corner) += offset;
            *moved.corner_mut(b.corner) += offset;
            Ok(front_from_back(front, &moved.squared()))
        }
    }
}

/// Interactive drag entry point. Contract violations are logged and the
/// cuboid is returned unchanged so the edit session keeps running.
pub fn drag_move(
    offset: Vec2,
    cuboid: &Cuboid,
    target: DragTarget,
    positions: &[CornerRef],
) -> Cuboid {
    match try_drag_move(offset, cuboid, target, positions) {
        Ok(moved) => moved,
        Err(err) => {
            warn!(cuboid = %cuboid.id, ?target, "drag ignored: {err}");
            cuboid.clone()
        }
    }
}

pub fn try_drag_move(
    offset: Vec2,
    cuboid: &Cuboid,
    target: DragTarget,
    positions: &[CornerRef],
) -> Result<Cuboid> {
    let (front, back) = match target {
        DragTarget::Cuboid => return Ok(cuboid.translated(offset)),
        DragTarget::Line => {
            let &[a, b] = positions else {
                return Err(Error::PositionCount {
                    expected: 2,
                    actual: positions.len(),
                });
            };
            apply_offset(offset, &cuboid.front, &cuboid.back, [a, b])?
        }
        DragTarget::Point => {
            let &[position] = positions else {
                return Err(Error::PositionCount {
                    expected: 1,
                    actual: positions.len(),
                });
            };
            move_point(offset, &cuboid.front, &cuboid.back, position)?
        }
    };

    Ok(Cuboid {
        front,
        back,
        ..cuboid.clone()
    })
}

fn move_point(
    offset: Vec2,
    front: &Plane,
    back: &Plane,
    position: CornerRef,
) -> Result<(Plane, Plane)> {
    let CornerRef { plane, corner } = position;
    match plane {
        PlaneKind::Front => {
            let moved = front.corner(corner) + offset;
            let new_front = Plane::from_diagonal(moved, front.corner(corner.diagonal()));
            Ok((new_front, back_from_front(&new_front, back)))
        }
        PlaneKind::Back => {
            ensure_back_editable(front, back, corner)?;
            let moved = back.corner(corner) + offset;
            let new_back = Plane::from_diagonal(moved, back.corner(corner.diagonal()));
            Ok(front_from_back(front, &new_back))
        }
    }
}

fn ensure_back_editable(front: &Plane, back: &Plane, corner: Corner) -> Result<()> {
    let (top, bottom) = facing_column(cuboid_info(front, back).is_left_side);
    if corner == top || corner == bottom {
        Ok(())
    } else {
        Err(Error::CornerNotEditable {
            plane: PlaneKind::Back,
            corner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(x1: f64, y1: f64, x2: f64, y2: f64) -> Plane {
        Plane::from_diagonal(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1.0e-9
    }

    #[test]
    fn equal_height_back_is_resized_to_front() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(6.0, 0.0, 14.0, 12.0);
        let new_back = back_from_front(&front, &back);
        assert_eq!(new_back.br, back.br);
        assert_eq!(new_back.width(), 10.0);
        assert_eq!(new_back.height(), 10.0);
    }

    #[test]
    fn left_side_back_is_anchored_bottom_left() {
        let front = plane(10.0, 0.0, 20.0, 10.0);
        let back = plane(4.0, 0.0, 12.0, 12.0);
        let new_back = back_from_front(&front, &back);
        assert_eq!(new_back.bl, back.bl);
        assert_eq!(new_back.br, Point2::new(14.0, 12.0));
    }

    #[test]
    fn taller_front_moves_far_column_to_vanishing_line() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(8.0, 2.0, 12.0, 9.0);
        let new_back = back_from_front(&front, &back);
        assert_eq!(new_back.tr, back.tr);
        assert_eq!(new_back.br, back.br);
        assert!(close(new_back.bl.x, 5.0));
        assert!(close(new_back.tl.x, 5.0));
        assert_eq!(new_back.bl.y, 9.0);
        assert_eq!(new_back.tl.y, 2.0);
        assert!(new_back.is_regular(1.0e-9));
    }

    #[test]
    fn parallel_side_lines_are_a_no_op() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(4.0, -2.0, 14.0, 8.0);
        let adjusted = intersection_adjust(&front, &back);
        assert_eq!(adjusted, back);
    }

    #[test]
    fn back_width_edit_does_not_widen_front() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(3.0, -3.0, 11.0, 7.0);
        let (new_front, new_back) = front_from_back(&front, &back);
        assert_eq!(new_front.tl.x, 0.0);
        assert_eq!(new_front.tr.x, 10.0);
        assert_eq!(new_back, back);
    }

    #[test]
    fn row_drag_ignores_horizontal_offset() -> Result<()> {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(3.0, -3.0, 13.0, 7.0);
        let (new_front, _) = apply_offset(
            Vec2::new(5.0, -2.0),
            &front,
            &back,
            [
                CornerRef::front(Corner::TopLeft),
                CornerRef::front(Corner::TopRight),
            ],
        )?;
        assert_eq!(new_front.tl, Point2::new(0.0, -2.0));
        assert_eq!(new_front.br, Point2::new(10.0, 10.0));
        Ok(())
    }

    #[test]
    fn column_drag_ignores_vertical_offset() -> Result<()> {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(3.0, -3.0, 13.0, 7.0);
        let (new_front, new_back) = apply_offset(
            Vec2::new(4.0, 7.0),
            &front,
            &back,
            [
                CornerRef::front(Corner::TopRight),
                CornerRef::front(Corner::BottomRight),
            ],
        )?;
        assert_eq!(new_front.tr, Point2::new(14.0, 0.0));
        assert_eq!(new_front.bl, Point2::new(0.0, 10.0));
        assert_eq!(new_back.width(), 14.0);
        assert_eq!(new_back.br, back.br);
        Ok(())
    }

    #[test]
    fn invalid_lines_are_rejected() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(3.0, -3.0, 13.0, 7.0);
        let diagonal = apply_offset(
            Vec2::new(1.0, 1.0),
            &front,
            &back,
            [
                CornerRef::front(Corner::TopLeft),
                CornerRef::front(Corner::BottomRight),
            ],
        );
        assert_eq!(
            diagonal,
            Err(Error::NotALine(Corner::TopLeft, Corner::BottomRight))
        );

        let mixed = apply_offset(
            Vec2::new(1.0, 1.0),
            &front,
            &back,
            [
                CornerRef::front(Corner::TopLeft),
                CornerRef::back(Corner::TopRight),
            ],
        );
        assert_eq!(mixed, Err(Error::MixedPlanes));

        let hidden = apply_offset(
            Vec2::new(1.0, 0.0),
            &front,
            &back,
            [
                CornerRef::back(Corner::TopLeft),
                CornerRef::back(Corner::BottomLeft),
            ],
        );
        assert!(matches!(hidden, Err(Error::CornerNotEditable { .. })));
    }

    #[test]
    fn drag_move_keeps_cuboid_on_contract_violation() {
        let cuboid = Cuboid::new(plane(0.0, 0.0, 10.0, 10.0), plane(3.0, -3.0, 13.0, 7.0));
        let unchanged = drag_move(Vec2::new(3.0, 3.0), &cuboid, DragTarget::Point, &[]);
        assert_eq!(unchanged, cuboid);
        assert_eq!(
            try_drag_move(Vec2::new(3.0, 3.0), &cuboid, DragTarget::Line, &[]),
            Err(Error::PositionCount {
                expected: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn point_drag_rebuilds_from_diagonal() -> Result<()> {
        let cuboid = Cuboid::new(plane(0.0, 0.0, 10.0, 10.0), plane(3.0, -3.0, 13.0, 7.0));
        let moved = try_drag_move(
            Vec2::new(-2.0, -1.0),
            &cuboid,
            DragTarget::Point,
            &[CornerRef::front(Corner::TopLeft)],
        )?;
        assert_eq!(moved.front.tl, Point2::new(-2.0, -1.0));
        assert_eq!(moved.front.br, cuboid.front.br);
        assert_eq!(moved.id, cuboid.id);
        Ok(())
    }
}
