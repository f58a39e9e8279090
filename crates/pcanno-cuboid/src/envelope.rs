use pcanno_geometry::{Plane, Point2, point_in_polygon};

use crate::model::{Cuboid, cuboid_info};

/// Screen-space silhouette of the cuboid used for hover hit testing.
///
/// Returns 4 points when one face is nested inside the other and 6 points
/// when the back face pokes out vertically, horizontally or diagonally.
/// The polygon traces the hull of both faces instead of their bounding box.
///
/// A face counts as nested on an axis when the centre offset is within half
/// the size difference, so a face touching the other's edge still nests.
/// Fully nested faces return the larger face's outline, which covers both.
pub fn hover_envelope(front: &Plane, back: &Plane) -> Vec<Point2> {
    let info = cuboid_info(front, back);
    let half_width_diff = ((info.front_width - info.back_width) * 0.5).abs();
    let half_height_diff = ((info.front_height - info.back_height) * 0.5).abs();
    let offset_x = (info.back_center.x - info.front_center.x).abs();
    let offset_y = (info.back_center.y - info.front_center.y).abs();
    let over_x = offset_x > half_width_diff;
    let over_y = offset_y > half_height_diff;
    let back_above = info.back_center.y < info.front_center.y;
    let (f, b) = (front, back);

    match (over_x, over_y) {
        (false, false) => {
            if b.area() > f.area() {
                b.outline().to_vec()
            } else {
                f.outline().to_vec()
            }
        }
        (false, true) => {
            if back_above {
                vec![f.tl, b.tl, b.tr, f.tr, f.br, f.bl]
            } else {
                vec![f.tl, f.tr, f.br, b.br, b.bl, f.bl]
            }
        }
        (true, false) => {
            if info.is_left_side {
                vec![b.tl, f.tl, f.tr, f.br, f.bl, b.bl]
            } else {
                vec![f.tl, f.tr, b.tr, b.br, f.br, f.bl]
            }
        }
        (true, true) => match (info.is_left_side, back_above) {
            (true, true) => vec![b.tl, b.tr, f.tr, f.br, f.bl, b.bl],
            (false, true) => vec![f.tl, b.tl, b.tr, b.br, f.br, f.bl],
            (true, false) => vec![b.tl, f.tl, f.tr, f.br, b.br, b.bl],
            (false, false) => vec![f.tl, f.tr, b.tr, b.br, b.bl, f.bl],
        },
    }
}

impl Cuboid {
    pub fn hover_envelope(&self) -> Vec<Point2> {
        hover_envelope(&self.front, &self.back)
    }

    /// Whether `point` falls inside the hover envelope.
    pub fn contains(&self, point: Point2) -> bool {
        point_in_polygon(point, &self.hover_envelope())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcanno_geometry::polygon_area;

    fn plane(x1: f64, y1: f64, x2: f64, y2: f64) -> Plane {
        Plane::from_diagonal(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn nested_back_face_uses_front_outline() {
        let front = plane(0.0, 0.0, 10.0, 10.0);
        let back = plane(2.0, 2.0, 8.0, 8.0);
        assert_eq!(hover_envelope(&front, &back), front.outline().to_vec());
    }

    #[test]
    fn vertical_offset_adds_back_top_corners() {
        let front = plane(0.0, 10.0, 10.0, 20.0);
        let back = plane(2.0, 0.0, 8.0, 6.0);
        let envelope = hover_envelope(&front, &back);
        assert_eq!(envelope, vec![front.tl, back.tl, back.tr, front.tr, front.br, front.bl]);
    }

    #[test]
    fn horizontal_offset_depends_on_facing_side() {
        let front = plane(10.0, 0.0, 20.0, 10.0);
        let right = plane(22.0, 2.0, 28.0, 8.0);
        let envelope = hover_envelope(&front, &right);
        assert_eq!(envelope, vec![front.tl, front.tr, right.tr, right.br, front.br, front.bl]);

        let left = plane(2.0, 2.0, 8.0, 8.0);
        let envelope = hover_envelope(&front, &left);
        assert_eq!(envelope, vec![left.tl, front.tl, front.tr, front.br, front.bl, left.bl]);
    }

    #[test]
    fn diagonal_offset_covers_both_faces() {
        let front = plane(0.0, 10.0, 10.0, 20.0);
        let back = plane(8.0, 4.0, 16.0, 12.0);
        let envelope = hover_envelope(&front, &back);
        assert_eq!(envelope.len(), 6);
        let area = polygon_area(&envelope);
        assert!(area >= front.area());
        assert!(area >= back.area());
    }

    #[test]
    fn contains_uses_envelope() {
        let cuboid = Cuboid::new(plane(0.0, 10.0, 10.0, 20.0), plane(2.0, 0.0, 8.0, 6.0));
        assert!(cuboid.contains(Point2::new(5.0, 3.0)));
        assert!(cuboid.contains(Point2::new(5.0, 15.0)));
        assert!(!cuboid.contains(Point2::new(0.5, 1.0)));
    }
}
