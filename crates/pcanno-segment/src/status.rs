use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentStatus {
    /// Idle; secondary-button drags build a selection polygon.
    #[default]
    Ready,
    /// Viewing confirmed segments; the pointer is only tracked.
    Check,
    /// Editing an existing segment.
    Edit,
}

impl SegmentStatus {
    pub fn next(self) -> Self {
        match self {
            SegmentStatus::Ready => SegmentStatus::Check,
            SegmentStatus::Check => SegmentStatus::Edit,
            SegmentStatus::Edit => SegmentStatus::Ready,
        }
    }

    pub fn allows_selection(self) -> bool {
        matches!(self, SegmentStatus::Ready | SegmentStatus::Edit)
    }
}

impl std::fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SegmentStatus::Ready => "ready",
            SegmentStatus::Check => "check",
            SegmentStatus::Edit => "edit",
        };
        f.write_str(name)
    }
}

/// Owns the single status value of a segmentation session. It only changes
/// through `advance` and `force`.
#[derive(Clone, Debug, Default)]
pub struct SegmentStateMachine {
    status: SegmentStatus,
}

impl SegmentStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SegmentStatus {
        self.status
    }

    /// Ready -> Check -> Edit -> Ready.
    pub fn advance(&mut self) -> SegmentStatus {
        self.force(self.status.next());
        self.status
    }

    pub fn force(&mut self, status: SegmentStatus) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "segment status changed");
        }
        self.status = status;
    }

    pub fn reset(&mut self) {
        self.force(SegmentStatus::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_cycles_through_all_states() {
        let mut machine = SegmentStateMachine::new();
        assert_eq!(machine.status(), SegmentStatus::Ready);
        assert_eq!(machine.advance(), SegmentStatus::Check);
        assert_eq!(machine.advance(), SegmentStatus::Edit);
        assert_eq!(machine.advance(), SegmentStatus::Ready);
    }

    #[test]
    fn force_jumps_directly() {
        let mut machine = SegmentStateMachine::new();
        machine.force(SegmentStatus::Edit);
        assert_eq!(machine.status(), SegmentStatus::Edit);
        machine.reset();
        assert_eq!(machine.status(), SegmentStatus::Ready);
    }

    #[test]
    fn check_blocks_polygon_building() {
        assert!(SegmentStatus::Ready.allows_selection());
        assert!(!SegmentStatus::Check.allows_selection());
        assert!(SegmentStatus::Edit.allows_selection());
    }
}
