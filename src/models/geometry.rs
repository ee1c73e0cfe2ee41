//! Desktop coordinates and extents.

use serde::{Deserialize, Serialize};

/// Position on the desktop in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: i32,
    /// Vertical offset from the top edge
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounds the point to the nearest multiple of `grid` on both axes.
    ///
    /// A grid of 0 or 1 leaves the point unchanged.
    #[must_use]
    pub fn snapped(self, grid: u32) -> Self {
        if grid <= 1 {
            return self;
        }
        let grid = i64::from(grid);
        let snap = |v: i32| {
            let v = i64::from(v);
            let rounded = (v + grid / 2).div_euclid(grid) * grid;
            i32::try_from(rounded).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
        };
        Self::new(snap(self.x), snap(self.y))
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
