//! Carves the points whose screen projection falls inside a selection
//! polygon out of a stride-3 point buffer.

use cgmath::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, to_screen};
use crate::config::DEFAULT_CHUNK_POINTS;
use crate::{Error, Result};
use pcanno_geometry::Point2;

pub use pcanno_geometry::point_in_polygon;

/// Flat xyz positions with optional rgb colors in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointBuffer {
    /// `colors` is either empty or one rgb triplet per position.
    pub fn new(positions: Vec<f32>, colors: Vec<f32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::PositionStride(positions.len()));
        }
        if !colors.is_empty() && colors.len() != positions.len() {
            return Err(Error::ColorLength {
                colors: colors.len(),
                positions: positions.len(),
            });
        }
        Ok(Self { positions, colors })
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append the points of `other`. Colors are kept only when both buffers
    /// carry them.
    pub fn extend(&mut self, other: &PointBuffer) {
        let keep_colors = (self.is_empty() || self.has_colors()) && other.has_colors();
        if !keep_colors {
            self.colors.clear();
        }
        self.positions.extend_from_slice(&other.positions);
        if keep_colors {
            self.colors.extend_from_slice(&other.colors);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOutput {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub count: usize,
}

impl FilterOutput {
    pub fn into_buffer(self) -> PointBuffer {
        PointBuffer {
            positions: self.positions,
            colors: self.colors,
        }
    }
}

/// Indices of the points inside `polygon`, in buffer order.
///
/// The scan runs in parallel chunks of `chunk_points`; `cancelled` is
/// checked before each chunk and a `true` aborts the whole scan.
pub(crate) fn select_indices<C, F>(
    polygon: &[Point2],
    points: &PointBuffer,
    camera: &C,
    chunk_points: usize,
    cancelled: &F,
) -> Option<Vec<usize>>
where
    C: Camera + Sync,
    F: Fn() -> bool + Sync,
{
    if polygon.len() < 3 {
        return Some(Vec::new());
    }
    let viewport = camera.viewport();
    let chunk_points = chunk_points.max(1);
    let chunks: Option<Vec<Vec<usize>>> = points
        .positions
        .par_chunks(chunk_points * 3)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            if cancelled() {
                return None;
            }
            let base = chunk_index * chunk_points;
            let hits = chunk
                .chunks_exact(3)
                .enumerate()
                .filter(|(_, xyz)| {
                    let ndc = camera.project(Point3::new(xyz[0], xyz[1], xyz[2]));
                    point_in_polygon(to_screen(ndc, viewport), polygon)
                })
                .map(|(offset, _)| base + offset)
                .collect();
            Some(hits)
        })
        .collect();
    chunks.map(|chunks| chunks.into_iter().flatten().collect())
}

pub(crate) fn gather(points: &PointBuffer, indices: &[usize]) -> FilterOutput {
    let mut positions = Vec::with_capacity(indices.len() * 3);
    let mut colors = Vec::with_capacity(if points.has_colors() { indices.len() * 3 } else { 0 });
    for &index in indices {
        let range = index * 3..index * 3 + 3;
        positions.extend_from_slice(&points.positions[range.clone()]);
        if points.has_colors() {
            colors.extend_from_slice(&points.colors[range]);
        }
    }
    FilterOutput {
        positions,
        colors,
        count: indices.len(),
    }
}

pub(crate) fn recolor(points: &PointBuffer, indices: &[usize], highlight: [f32; 3]) -> Vec<f32> {
    let mut colors: Vec<f32> = if points.has_colors() {
        points.colors.clone()
    } else {
        points
            .positions
            .chunks_exact(3)
            .flat_map(|xyz| height_color(xyz[2]))
            .collect()
    };
    for &index in indices {
        colors[index * 3..index * 3 + 3].copy_from_slice(&highlight);
    }
    colors
}

/// Points of `points` whose projection lies inside `polygon`, with their
/// colors, in original order.
pub fn filter_points_in_polygon<C>(polygon: &[Point2], points: &PointBuffer, camera: &C) -> FilterOutput
where
    C: Camera + Sync,
{
    let indices = select_indices(polygon, points, camera, DEFAULT_CHUNK_POINTS, &|| false)
        .unwrap_or_default();
    gather(points, &indices)
}

/// Fresh color buffer with the points inside `polygon` set to `highlight`.
/// Points outside keep their color, or get the height ramp when the buffer
/// has no colors.
pub fn highlight_points_in_polygon<C>(
    polygon: &[Point2],
    points: &PointBuffer,
    camera: &C,
    highlight: [f32; 3],
) -> Vec<f32>
where
    C: Camera + Sync,
{
    let indices = select_indices(polygon, points, camera, DEFAULT_CHUNK_POINTS, &|| false)
        .unwrap_or_default();
    recolor(points, &indices, highlight)
}

/// Fallback color by height: gray at or below zero, then red, green, blue
/// in 5-unit bands.
pub fn height_color(z: f32) -> [f32; 3] {
    const GRAY: f32 = 128.0 / 255.0;
    if z <= 0.0 {
        [GRAY, GRAY, GRAY]
    } else if z < 5.0 {
        [1.0, 0.0, 0.0]
    } else if z < 10.0 {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;

    /// Maps world x/y straight onto pixels.
    struct PixelCamera;

    impl Camera for PixelCamera {
        fn project(&self, point: Point3<f32>) -> Point3<f32> {
            Point3::new(point.x / 50.0 - 1.0, 1.0 - point.y / 50.0, 0.0)
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(100.0, 100.0)
        }
    }

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(10.0, 10.0),
            Point2::new(40.0, 10.0),
            Point2::new(40.0, 40.0),
            Point2::new(10.0, 40.0),
        ]
    }

    #[test]
    fn buffer_validates_lengths() {
        assert_eq!(
            PointBuffer::new(vec![0.0; 4], Vec::new()),
            Err(Error::PositionStride(4))
        );
        assert!(PointBuffer::new(vec![0.0; 6], vec![0.0; 3]).is_err());
        assert!(PointBuffer::new(vec![0.0; 6], Vec::new()).is_ok());
    }

    #[test]
    fn filter_keeps_order_and_colors() -> Result<()> {
        let points = PointBuffer::new(
            vec![20.0, 20.0, 1.0, 80.0, 80.0, 2.0, 30.0, 30.0, 3.0],
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
        )?;
        let output = filter_points_in_polygon(&square(), &points, &PixelCamera);
        assert_eq!(output.count, 2);
        assert_eq!(output.positions, vec![20.0, 20.0, 1.0, 30.0, 30.0, 3.0]);
        assert_eq!(output.colors, vec![0.1, 0.2, 0.3, 0.7, 0.8, 0.9]);
        Ok(())
    }

    #[test]
    fn small_chunks_give_the_same_indices() -> Result<()> {
        let positions: Vec<f32> = (0..50)
            .flat_map(|i| [i as f32, i as f32, 0.0])
            .collect();
        let points = PointBuffer::new(positions, Vec::new())?;
        let whole = select_indices(&square(), &points, &PixelCamera, 1000, &|| false);
        let chunked = select_indices(&square(), &points, &PixelCamera, 7, &|| false);
        assert_eq!(whole, chunked);
        assert_eq!(whole.map(|indices| indices.len()), Some(30));
        Ok(())
    }

    #[test]
    fn cancelled_scan_returns_nothing() -> Result<()> {
        let points = PointBuffer::new(vec![20.0, 20.0, 0.0], Vec::new())?;
        assert_eq!(select_indices(&square(), &points, &PixelCamera, 1, &|| true), None);
        Ok(())
    }

    #[test]
    fn highlight_falls_back_to_height_ramp() -> Result<()> {
        let points = PointBuffer::new(
            vec![20.0, 20.0, 1.0, 80.0, 80.0, -1.0, 90.0, 90.0, 7.0, 95.0, 95.0, 12.0],
            Vec::new(),
        )?;
        let colors = highlight_points_in_polygon(&square(), &points, &PixelCamera, [1.0, 1.0, 0.0]);
        assert_eq!(colors.len(), 12);
        assert_eq!(&colors[0..3], &[1.0, 1.0, 0.0]);
        assert_eq!(&colors[3..6], &height_color(-1.0));
        assert_eq!(&colors[6..9], &[0.0, 1.0, 0.0]);
        assert_eq!(&colors[9..12], &[0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn height_ramp_bands() {
        assert_eq!(height_color(0.0), [128.0 / 255.0; 3]);
        assert_eq!(height_color(4.9), [1.0, 0.0, 0.0]);
        assert_eq!(height_color(5.0), [0.0, 1.0, 0.0]);
        assert_eq!(height_color(10.0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn extend_drops_colors_when_one_side_lacks_them() -> Result<()> {
        let mut colored = PointBuffer::new(vec![0.0; 3], vec![1.0; 3])?;
        colored.extend(&PointBuffer::new(vec![1.0; 3], vec![0.5; 3])?);
        assert_eq!(colored.len(), 2);
        assert_eq!(colored.colors().len(), 6);
        colored.extend(&PointBuffer::new(vec![2.0; 3], Vec::new())?);
        assert_eq!(colored.len(), 3);
        assert!(!colored.has_colors());
        Ok(())
    }
}
