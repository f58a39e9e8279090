use thiserror::Error;

pub mod camera;
pub mod config;
pub mod filter;
pub mod scene;
pub mod selector;
pub mod status;
pub mod store;
pub mod worker;

pub use camera::{Camera, PerspectiveCamera, Viewport, to_screen};
pub use config::{DEFAULT_CIRCLE_SEGMENTS, SegmentConfig};
pub use filter::{
    FilterOutput, PointBuffer, filter_points_in_polygon, height_color,
    highlight_points_in_polygon, point_in_polygon,
};
pub use scene::{MemoryScene, RenderTrigger, SceneRegistry};
pub use selector::{
    Buttons, CircleSelector, LassoSelector, PointerSample, RectSelector, Selector, SelectorKind,
    circle_points,
};
pub use status::{SegmentStateMachine, SegmentStatus};
pub use store::{Segment, SegmentStore};
pub use worker::{FilterJob, FilterMode, FilterOutcome, FilterResult, FilterWorker};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("position buffer length {0} is not a multiple of 3")]
    PositionStride(usize),
    #[error("color buffer holds {colors} values for {positions} position values")]
    ColorLength { colors: usize, positions: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
