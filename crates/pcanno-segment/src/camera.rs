use cgmath::{Deg, Matrix4, Point3, Vector3, Vector4, perspective};
use pcanno_geometry::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Projection service consumed by the spatial filter.
pub trait Camera {
    /// World-space point to normalized device coordinates.
    fn project(&self, point: Point3<f32>) -> Point3<f32>;
    fn viewport(&self) -> Viewport;
}

/// NDC to pixel coordinates, rounded half up like the browser's
/// `Math.round`.
pub fn to_screen(ndc: Point3<f32>, viewport: Viewport) -> Point2 {
    let half_w = viewport.width * 0.5;
    let half_h = viewport.height * 0.5;
    let x = f64::from(ndc.x) * half_w + half_w;
    let y = -f64::from(ndc.y) * half_h + half_h;
    Point2::new(round_half_up(x), round_half_up(y))
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    view_proj: Matrix4<f32>,
    viewport: Viewport,
}

impl PerspectiveCamera {
    pub fn look_at(
        eye: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fovy: Deg<f32>,
        viewport: Viewport,
    ) -> Self {
        let proj = perspective(fovy, viewport.aspect() as f32, 0.1, 1000.0);
        let view = Matrix4::look_at_rh(eye, target, up);
        Self {
            view_proj: proj * view,
            viewport,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn project(&self, point: Point3<f32>) -> Point3<f32> {
        let clip = self.view_proj * Vector4::new(point.x, point.y, point.z, 1.0);
        Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_map_to_viewport_edges() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(to_screen(Point3::new(0.0, 0.0, 0.0), viewport), Point2::new(400.0, 300.0));
        assert_eq!(to_screen(Point3::new(-1.0, 1.0, 0.0), viewport), Point2::new(0.0, 0.0));
        assert_eq!(to_screen(Point3::new(1.0, -1.0, 0.0), viewport), Point2::new(800.0, 600.0));
    }

    #[test]
    fn rounding_is_half_up() {
        let viewport = Viewport::new(2.0, 2.0);
        let screen = to_screen(Point3::new(-1.5, 0.5, 0.0), viewport);
        assert_eq!(screen, Point2::new(0.0, 1.0));
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let viewport = Viewport::new(640.0, 480.0);
        let camera = PerspectiveCamera::look_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
            Deg(60.0),
            viewport,
        );
        let center = to_screen(camera.project(Point3::new(0.0, 0.0, 0.0)), viewport);
        assert_eq!(center, Point2::new(320.0, 240.0));
        let right = to_screen(camera.project(Point3::new(1.0, 0.0, 0.0)), viewport);
        assert!(right.x > 320.0);
        let up = to_screen(camera.project(Point3::new(0.0, 1.0, 0.0)), viewport);
        assert!(up.y < 240.0);
    }
}
