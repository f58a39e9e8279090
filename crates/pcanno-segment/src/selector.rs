use pcanno_geometry::Point2;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CIRCLE_SEGMENTS;

/// Pressed pointer buttons, using the DOM `buttons` bit layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn secondary(self) -> bool {
        self.contains(Self::SECONDARY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: Point2,
    pub buttons: Buttons,
}

impl PointerSample {
    pub const fn new(position: Point2, buttons: Buttons) -> Self {
        Self { position, buttons }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorKind {
    #[default]
    Lasso,
    Circle,
    Rect,
}

impl SelectorKind {
    pub fn build(self, circle_segments: usize) -> Box<dyn Selector + Send> {
        match self {
            SelectorKind::Lasso => Box::new(LassoSelector::default()),
            SelectorKind::Circle => Box::new(CircleSelector::new(circle_segments)),
            SelectorKind::Rect => Box::new(RectSelector::default()),
        }
    }
}

/// A 2D gesture that grows a selection polygon.
///
/// Gestures only start on a secondary-button press; the primary button
/// belongs to camera orbit. `on_up` hands back the finished polygon and
/// leaves the selector empty. Polygons with fewer than three points enclose
/// nothing and are dropped.
pub trait Selector {
    fn kind(&self) -> SelectorKind;
    fn on_down(&mut self, sample: PointerSample);
    fn on_move(&mut self, sample: PointerSample);
    fn on_up(&mut self, sample: PointerSample) -> Option<Vec<Point2>>;
    fn polygon(&self) -> &[Point2];
    fn clear(&mut self);
}

fn finish(polygon: &mut Vec<Point2>) -> Option<Vec<Point2>> {
    let polygon = std::mem::take(polygon);
    (polygon.len() >= 3).then_some(polygon)
}

#[derive(Clone, Debug, Default)]
pub struct LassoSelector {
    polygon: Vec<Point2>,
    active: bool,
}

impl Selector for LassoSelector {
    fn kind(&self) -> SelectorKind {
        SelectorKind::Lasso
    }

    fn on_down(&mut self, sample: PointerSample) {
        if !sample.buttons.secondary() {
            return;
        }
        if !self.active {
            self.polygon.clear();
        }
        self.active = true;
        self.polygon.push(sample.position);
    }

    fn on_move(&mut self, sample: PointerSample) {
        if self.active && sample.buttons.secondary() {
            self.polygon.push(sample.position);
        }
    }

    fn on_up(&mut self, _sample: PointerSample) -> Option<Vec<Point2>> {
        if !std::mem::take(&mut self.active) {
            return None;
        }
        finish(&mut self.polygon)
    }

    fn polygon(&self) -> &[Point2] {
        &self.polygon
    }

    fn clear(&mut self) {
        self.polygon.clear();
        self.active = false;
    }
}

#[derive(Clone, Debug)]
pub struct CircleSelector {
    polygon: Vec<Point2>,
    anchor: Option<Point2>,
    segments: usize,
}

impl Default for CircleSelector {
    fn default() -> Self {
        Self::new(DEFAULT_CIRCLE_SEGMENTS)
    }
}

impl CircleSelector {
    pub fn new(segments: usize) -> Self {
        Self {
            polygon: Vec::new(),
            anchor: None,
            segments: segments.max(3),
        }
    }
}

/// `segments` points evenly spaced on the circle, starting at angle zero.
pub fn circle_points(center: Point2, radius: f64, segments: usize) -> Vec<Point2> {
    (0..segments)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / segments as f64;
            Point2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

impl Selector for CircleSelector {
    fn kind(&self) -> SelectorKind {
        SelectorKind::Circle
    }

    fn on_down(&mut self, sample: PointerSample) {
        if !sample.buttons.secondary() {
            return;
        }
        self.anchor = Some(sample.position);
        self.polygon.clear();
        self.polygon.push(sample.position);
    }

    fn on_move(&mut self, sample: PointerSample) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if !sample.buttons.secondary() {
            return;
        }
        let radius = anchor.distance(sample.position);
        self.polygon = circle_points(anchor, radius, self.segments);
    }

    fn on_up(&mut self, _sample: PointerSample) -> Option<Vec<Point2>> {
        self.anchor.take()?;
        finish(&mut self.polygon)
    }

    fn polygon(&self) -> &[Point2] {
        &self.polygon
    }

    fn clear(&mut self) {
        self.polygon.clear();
        self.anchor = None;
    }
}

#[derive(Clone, Debug, Default)]
pub struct RectSelector {
    polygon: Vec<Point2>,
    anchor: Option<Point2>,
}

impl Selector for RectSelector {
    fn kind(&self) -> SelectorKind {
        SelectorKind::Rect
    }

    fn on_down(&mut self, sample: PointerSample) {
        if !sample.buttons.secondary() {
            return;
        }
        self.anchor = Some(sample.position);
        self.polygon.clear();
    }

    fn on_move(&mut self, sample: PointerSample) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if !sample.buttons.secondary() {
            return;
        }
        let current = sample.position;
        self.polygon = vec![
            anchor,
            Point2::new(current.x, anchor.y),
            current,
            Point2::new(anchor.x, current.y),
            anchor,
        ];
    }

    fn on_up(&mut self, _sample: PointerSample) -> Option<Vec<Point2>> {
        self.anchor.take()?;
        finish(&mut self.polygon)
    }

    fn polygon(&self) -> &[Point2] {
        &self.polygon
    }

    fn clear(&mut self) {
        self.polygon.clear();
        self.anchor = None;
    }
}
