use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use pcanno_geometry::Point2;
use tracing::debug;

use crate::camera::Camera;
use crate::config::DEFAULT_CHUNK_POINTS;
use crate::filter::{FilterOutput, PointBuffer, gather, recolor, select_indices};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterMode {
    /// Carve the enclosed points into a new buffer.
    Select,
    /// Recolor the whole cloud, enclosed points in the given color.
    Highlight([f32; 3]),
}

/// Everything a background filter pass needs, owned so it can move to the
/// worker thread.
#[derive(Clone, Debug)]
pub struct FilterJob<C> {
    pub polygon: Vec<Point2>,
    pub points: PointBuffer,
    pub camera: C,
    pub mode: FilterMode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterOutcome {
    Selected(FilterOutput),
    Highlighted(Vec<f32>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterResult {
    pub generation: u64,
    pub outcome: FilterOutcome,
}

/// Runs filter jobs off the calling thread. Each submission bumps a
/// generation counter; only the newest generation is ever handed back, and
/// older jobs stop at their next chunk boundary.
#[derive(Debug)]
pub struct FilterWorker {
    latest: Arc<AtomicU64>,
    tx: mpsc::Sender<FilterResult>,
    rx: mpsc::Receiver<FilterResult>,
    chunk_points: usize,
}

impl Default for FilterWorker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_POINTS)
    }
}

impl FilterWorker {
    pub fn new(chunk_points: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            chunk_points: chunk_points.max(1),
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn submit<C>(&mut self, job: FilterJob<C>) -> u64
    where
        C: Camera + Send + Sync + 'static,
    {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let chunk_points = self.chunk_points;
        debug!(generation, points = job.points.len(), "filter job submitted");
        thread::spawn(move || {
            let superseded = || latest.load(Ordering::Acquire) != generation;
            let Some(indices) =
                select_indices(&job.polygon, &job.points, &job.camera, chunk_points, &superseded)
            else {
                debug!(generation, "filter job superseded mid-scan");
                return;
            };
            let outcome = match job.mode {
                FilterMode::Select => FilterOutcome::Selected(gather(&job.points, &indices)),
                FilterMode::Highlight(color) => {
                    FilterOutcome::Highlighted(recolor(&job.points, &indices, color))
                }
            };
            let _ = tx.send(FilterResult {
                generation,
                outcome,
            });
        });
        generation
    }

    /// Invalidate every job in flight.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Newest finished result, if any. Stale results are drained and dropped.
    pub fn poll(&mut self) -> Option<FilterResult> {
        let mut newest = None;
        while let Ok(result) = self.rx.try_recv() {
            if let Some(result) = self.current(result) {
                newest = Some(result);
            }
        }
        newest
    }

    /// Block until the newest generation finishes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<FilterResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let result = self.rx.recv_timeout(remaining).ok()?;
            if let Some(result) = self.current(result) {
                return Some(result);
            }
        }
    }

    fn current(&self, result: FilterResult) -> Option<FilterResult> {
        let latest = self.latest_generation();
        if result.generation == latest {
            Some(result)
        } else {
            debug!(generation = result.generation, latest, "dropping stale filter result");
            None
        }
    }
}
