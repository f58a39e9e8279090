use pcanno_geometry::{Plane, Point2};
use tracing::debug;

use crate::model::Cuboid;
use crate::solver::back_from_front;
use crate::{Error, Result};

/// A cuboid under construction from the two-click gesture: the first phase
/// drags out the front plane from its diagonal, the second places the back
/// plane.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingCuboid {
    anchor: Point2,
    front: Plane,
    back: Option<Plane>,
    front_locked: bool,
}

impl DrawingCuboid {
    pub fn start(anchor: Point2) -> Self {
        Self {
            anchor,
            front: Plane::from_diagonal(anchor, anchor),
            back: None,
            front_locked: false,
        }
    }

    pub fn front(&self) -> &Plane {
        &self.front
    }

    pub fn back(&self) -> Option<&Plane> {
        self.back.as_ref()
    }

    pub fn is_front_locked(&self) -> bool {
        self.front_locked
    }

    /// Follow the pointer: resizes the front plane until it is locked, then
    /// moves the back plane.
    pub fn update(&mut self, pointer: Point2) {
        if self.front_locked {
            self.back = Some(back_at(&self.front, pointer));
        } else {
            self.front = Plane::from_diagonal(self.anchor, pointer);
        }
    }

    /// Second click: freeze the front plane and start placing the back one.
    pub fn lock_front(&mut self) -> Result<()> {
        if self.front.area() <= 0.0 {
            return Err(Error::Degenerate);
        }
        self.front_locked = true;
        debug!(width = self.front.width(), height = self.front.height(), "front plane locked");
        Ok(())
    }

    pub fn finish(self) -> Result<Cuboid> {
        let back = self.back.ok_or(Error::Incomplete)?;
        Ok(Cuboid::new(self.front, back))
    }
}

/// Front-sized back plane whose facing top corner sits at `pointer`.
fn back_at(front: &Plane, pointer: Point2) -> Plane {
    let (width, height) = (front.width(), front.height());
    let candidate = if pointer.x < front.center().x {
        Plane::from_extents(pointer.x, pointer.y, pointer.x + width, pointer.y + height)
    } else {
        Plane::from_extents(pointer.x - width, pointer.y, pointer.x, pointer.y + height)
    };
    back_from_front(front, &candidate)
}
