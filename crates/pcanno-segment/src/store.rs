use std::time::Duration;

use pcanno_base::Guid;
use pcanno_geometry::Point2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::camera::Camera;
use crate::config::SegmentConfig;
use crate::filter::PointBuffer;
use crate::scene::{RenderTrigger, SceneRegistry};
use crate::selector::{PointerSample, Selector, SelectorKind};
use crate::status::{SegmentStateMachine, SegmentStatus};
use crate::worker::{FilterJob, FilterMode, FilterOutcome, FilterResult, FilterWorker};

/// A confirmed point subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: Guid,
    pub name: String,
    pub points: PointBuffer,
}

impl Segment {
    pub fn new(name: impl Into<String>, points: PointBuffer) -> Self {
        Self {
            id: Guid::new(),
            name: name.into(),
            points,
        }
    }
}

/// One segmentation session: routes pointer samples through the status
/// machine to the active selector, ships finished polygons to the filter
/// worker and swaps results into the scene.
pub struct SegmentStore {
    config: SegmentConfig,
    machine: SegmentStateMachine,
    selector: Box<dyn Selector + Send>,
    worker: FilterWorker,
    pending: Option<PointBuffer>,
    segments: Vec<Segment>,
    hover: Option<Point2>,
    editing: Option<usize>,
    /// Source cloud as it was before the first applied highlight.
    unhighlighted: Option<PointBuffer>,
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new(SegmentConfig::default())
    }
}

impl SegmentStore {
    pub fn new(config: SegmentConfig) -> Self {
        let selector = SelectorKind::default().build(config.circle_segments);
        let worker = FilterWorker::new(config.chunk_points);
        Self {
            config,
            machine: SegmentStateMachine::new(),
            selector,
            worker,
            pending: None,
            segments: Vec::new(),
            hover: None,
            editing: None,
            unhighlighted: None,
        }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    pub fn status(&self) -> SegmentStatus {
        self.machine.status()
    }

    pub fn advance(&mut self) -> SegmentStatus {
        let next = self.status().next();
        self.force(next);
        next
    }

    /// Any status change abandons the gesture in progress.
    pub fn force(&mut self, status: SegmentStatus) {
        if self.status() != status {
            self.selector.clear();
        }
        self.machine.force(status);
        if status != SegmentStatus::Edit {
            self.editing = None;
        }
    }

    pub fn set_selector(&mut self, kind: SelectorKind) {
        if self.selector.kind() != kind {
            self.selector = kind.build(self.config.circle_segments);
        }
    }

    pub fn selector_kind(&self) -> SelectorKind {
        self.selector.kind()
    }

    /// Polygon of the gesture in progress.
    pub fn polygon(&self) -> &[Point2] {
        self.selector.polygon()
    }

    /// Last pointer position seen in any status.
    pub fn hover_position(&self) -> Option<Point2> {
        self.hover
    }

    pub fn pending(&self) -> Option<&PointBuffer> {
        self.pending.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn editing(&self) -> Option<&Segment> {
        self.editing.and_then(|index| self.segments.get(index))
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        self.hover = Some(sample.position);
        if self.status().allows_selection() {
            self.selector.on_down(sample);
        }
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        self.hover = Some(sample.position);
        if self.status().allows_selection() {
            self.selector.on_move(sample);
        }
    }

    /// Finish the gesture and, when it produced a polygon, submit it.
    /// Returns the generation of the submitted job.
    pub fn pointer_up<S, C>(&mut self, sample: PointerSample, scene: &S, camera: &C) -> Option<u64>
    where
        S: SceneRegistry,
        C: Camera + Clone + Send + Sync + 'static,
    {
        self.hover = Some(sample.position);
        if !self.status().allows_selection() {
            return None;
        }
        let polygon = self.selector.on_up(sample)?;
        self.submit(polygon, scene, camera)
    }

    pub fn submit<S, C>(&mut self, polygon: Vec<Point2>, scene: &S, camera: &C) -> Option<u64>
    where
        S: SceneRegistry,
        C: Camera + Clone + Send + Sync + 'static,
    {
        self.dispatch(polygon, scene, camera, FilterMode::Select)
    }

    /// Recolor the source cloud with the polygon's points highlighted.
    pub fn highlight<S, C>(&mut self, polygon: Vec<Point2>, scene: &S, camera: &C) -> Option<u64>
    where
        S: SceneRegistry,
        C: Camera + Clone + Send + Sync + 'static,
    {
        let mode = FilterMode::Highlight(self.config.highlight_color);
        self.dispatch(polygon, scene, camera, mode)
    }

    fn dispatch<S, C>(
        &mut self,
        polygon: Vec<Point2>,
        scene: &S,
        camera: &C,
        mode: FilterMode,
    ) -> Option<u64>
    where
        S: SceneRegistry,
        C: Camera + Clone + Send + Sync + 'static,
    {
        let Some(points) = scene.find_object(&self.config.point_cloud_name) else {
            debug!(name = %self.config.point_cloud_name, "no point cloud in scene; selection ignored");
            return None;
        };
        let points = self.unhighlighted.as_ref().unwrap_or(points).clone();
        let job = FilterJob {
            polygon,
            points,
            camera: camera.clone(),
            mode,
        };
        Some(self.worker.submit(job))
    }

    /// Apply the newest finished job, if any.
    pub fn poll<S, R>(&mut self, scene: &mut S, render: &mut R) -> bool
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        match self.worker.poll() {
            Some(result) => self.apply(result, scene, render),
            None => false,
        }
    }

    pub fn wait<S, R>(&mut self, timeout: Duration, scene: &mut S, render: &mut R) -> bool
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        match self.worker.wait(timeout) {
            Some(result) => self.apply(result, scene, render),
            None => false,
        }
    }

    fn apply<S, R>(&mut self, result: FilterResult, scene: &mut S, render: &mut R) -> bool
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        match result.outcome {
            FilterOutcome::Selected(output) => {
                debug!(generation = result.generation, count = output.count, "selection applied");
                let points = output.into_buffer();
                scene.add_object(&self.config.selection_name, points.clone());
                self.pending = Some(points);
            }
            FilterOutcome::Highlighted(colors) => {
                let name = &self.config.point_cloud_name;
                let Some(cloud) = scene.find_object(name) else {
                    return false;
                };
                let recolored = match PointBuffer::new(cloud.positions().to_vec(), colors) {
                    Ok(recolored) => recolored,
                    Err(err) => {
                        warn!(%err, "point cloud changed under a highlight job");
                        return false;
                    }
                };
                if self.unhighlighted.is_none() {
                    self.unhighlighted = Some(cloud.clone());
                }
                scene.add_object(name, recolored);
            }
        }
        render.request_redraw();
        true
    }

    /// Keep the pending selection. In `Edit` it is merged into the segment
    /// being edited, otherwise it becomes a new segment.
    pub fn confirm<S, R>(&mut self, scene: &mut S, render: &mut R) -> Option<Guid>
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        let points = self.pending.take()?;
        scene.remove_object(&self.config.selection_name);
        self.restore_colors(scene);
        let index = match self.editing.filter(|&index| index < self.segments.len()) {
            Some(index) => {
                self.segments[index].points.extend(&points);
                index
            }
            None => {
                let name = format!("segment-{}", self.segments.len() + 1);
                self.segments.push(Segment::new(name, points));
                self.segments.len() - 1
            }
        };
        let segment = &self.segments[index];
        scene.add_object(&segment.name, segment.points.clone());
        debug!(id = %segment.id, points = segment.points.len(), "segment confirmed");
        render.request_redraw();
        Some(segment.id)
    }

    /// Start editing a confirmed segment; later selections merge into it.
    pub fn edit_segment(&mut self, index: usize) -> bool {
        if index >= self.segments.len() {
            return false;
        }
        self.force(SegmentStatus::Edit);
        self.editing = Some(index);
        true
    }

    /// Drop the gesture and any pending selection and return to `Ready`.
    pub fn cancel<S, R>(&mut self, scene: &mut S, render: &mut R)
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        self.worker.cancel();
        self.selector.clear();
        self.force(SegmentStatus::Ready);
        self.pending = None;
        scene.remove_object(&self.config.selection_name);
        self.restore_colors(scene);
        render.request_redraw();
    }

    /// Put the source cloud's own colors back after a highlight.
    pub fn clear_highlight<S, R>(&mut self, scene: &mut S, render: &mut R) -> bool
    where
        S: SceneRegistry,
        R: RenderTrigger,
    {
        let restored = self.restore_colors(scene);
        if restored {
            render.request_redraw();
        }
        restored
    }

    pub fn is_highlighted(&self) -> bool {
        self.unhighlighted.is_some()
    }

    fn restore_colors<S: SceneRegistry>(&mut self, scene: &mut S) -> bool {
        let Some(original) = self.unhighlighted.take() else {
            return false;
        };
        scene.add_object(&self.config.point_cloud_name, original);
        true
    }
}
