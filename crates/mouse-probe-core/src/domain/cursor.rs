//! Virtual cursor driven by relative-motion deltas.

use std::fmt;

/// A 2-D integer position accumulated from `REL_X`/`REL_Y` deltas.
///
/// There is no screen behind it, so there are no bounds.  Accumulation
/// saturates at the `i32` range instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
}

impl Cursor {
    pub const ORIGIN: Cursor = Cursor { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn move_x(&mut self, delta: i32) {
        self.x = self.x.saturating_add(delta);
    }

    pub fn move_y(&mut self, delta: i32) {
        self.y = self.y.saturating_add(delta);
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
