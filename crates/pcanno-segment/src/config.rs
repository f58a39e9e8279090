use serde::{Deserialize, Serialize};

pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;
pub const DEFAULT_CHUNK_POINTS: usize = 25_000;

/// Settings for a segmentation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Scene object holding the source point cloud.
    pub point_cloud_name: String,
    /// Scene object the latest selection is materialised as.
    pub selection_name: String,
    pub circle_segments: usize,
    pub highlight_color: [f32; 3],
    /// Points scanned per parallel chunk; superseded jobs stop between chunks.
    pub chunk_points: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            point_cloud_name: "pointcloud".to_string(),
            selection_name: "segment-selection".to_string(),
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            highlight_color: [1.0, 1.0, 0.0],
            chunk_points: DEFAULT_CHUNK_POINTS,
        }
    }
}
