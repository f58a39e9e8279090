use crate::vector::Point2;

/// Even-odd ray-casting test.
///
/// The polygon is implicitly closed. An edge counts as a crossing when the
/// test x lies in `(min_x, max_x]`, the test y is at most the edge's max y,
/// and the test y is at or above the edge's y value at that x (screen
/// coordinates), or the edge is horizontal. Vertical edges never count.
/// Points on the right or bottom boundary therefore classify as inside.
pub fn point_in_polygon(point: Point2, polygon: &[Point2]) -> bool {
    let Some(&first) = polygon.first() else {
        return false;
    };

    let count = polygon.len();
    let mut crossings = 0usize;
    let mut p1 = first;
    for i in 1..=count {
        let p2 = polygon[i % count];
        if point.x > p1.x.min(p2.x)
            && point.x <= p1.x.max(p2.x)
            && point.y <= p1.y.max(p2.y)
            && p1.x != p2.x
        {
            let intercept = (point.x - p1.x) * (p2.y - p1.y) / (p2.x - p1.x) + p1.y;
            if p1.y == p2.y || point.y <= intercept {
                crossings += 1;
            }
        }
        p1 = p2;
    }
    crossings % 2 == 1
}

/// Unsigned shoelace area of a polygon given without its closing point.
pub fn polygon_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn square_classification() {
        let square = square();
        assert!(point_in_polygon(Point2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point2::new(15.0, 5.0), &square));
        assert!(point_in_polygon(Point2::new(10.0, 5.0), &square));
        assert!(!point_in_polygon(Point2::new(0.0, 5.0), &square));
    }

    #[test]
    fn winding_order_does_not_matter() {
        let mut reversed = square();
        reversed.reverse();
        assert!(point_in_polygon(Point2::new(5.0, 5.0), &reversed));
        assert!(!point_in_polygon(Point2::new(15.0, 5.0), &reversed));
        assert!(point_in_polygon(Point2::new(10.0, 5.0), &reversed));
    }

    #[test]
    fn closing_point_is_optional() {
        let mut closed = square();
        closed.push(Point2::new(0.0, 0.0));
        assert!(point_in_polygon(Point2::new(5.0, 5.0), &closed));
        assert!(!point_in_polygon(Point2::new(-1.0, 5.0), &closed));
    }

    #[test]
    fn concave_notch_is_outside() {
        let notched = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(5.0, 4.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(!point_in_polygon(Point2::new(5.0, 8.0), &notched));
        assert!(point_in_polygon(Point2::new(5.0, 2.0), &notched));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!point_in_polygon(Point2::new(0.0, 0.0), &[]));
    }

    #[test]
    fn square_area() {
        assert_eq!(polygon_area(&square()), 100.0);
        assert_eq!(polygon_area(&square()[..2]), 0.0);
    }
}
