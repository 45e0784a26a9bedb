//! Occupancy grid
//!
//! One cell per canvas pixel, holding the whole-degree heading of the last
//! crack that passed through it, or [`UNCLAIMED`]. Cracks use it to detect
//! collisions, new cracks use it to branch off perpendicular to old ones, and
//! the sand probe uses it to find the opposite edge of a band.

use glam::Vec2;

/// Sentinel for a cell no crack has touched since the last restart
pub const UNCLAIMED: u16 = 361;

/// Flat row-major grid of claimed angles
#[derive(Debug, Clone)]
pub struct CrackGrid {
    width: usize,
    height: usize,
    cells: Vec<u16>,
}

impl CrackGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![UNCLAIMED; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the grid has no cells to draw into
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Pixel containing `pos`, or None when it lies off the grid
    pub fn cell_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        if !pos.is_finite() {
            return None;
        }
        let x = pos.x.floor() as i32;
        let y = pos.y.floor() as i32;
        self.in_bounds(x, y).then_some((x as usize, y as usize))
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "grid access ({x}, {y}) out of bounds");
        y * self.width + x
    }

    /// Raw cell value. Callers bounds-check first; out-of-range access panics.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.cells[self.index(x, y)]
    }

    /// Claimed angle in whole degrees, if any crack has been here
    #[inline]
    pub fn claimed(&self, x: usize, y: usize) -> Option<u16> {
        let v = self.get(x, y);
        (v != UNCLAIMED).then_some(v)
    }

    #[inline]
    pub fn is_claimed(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != UNCLAIMED
    }

    /// Record `angle` (whole degrees, 0-360) as the claim on a cell
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, angle: u16) {
        debug_assert!(angle <= 360, "claim angle {angle} out of range");
        let i = self.index(x, y);
        self.cells[i] = angle;
    }

    /// Unclaim every cell
    pub fn reset(&mut self) {
        self.cells.fill(UNCLAIMED);
    }

    /// Number of claimed cells
    pub fn claimed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != UNCLAIMED).count()
    }

    pub fn cells(&self) -> &[u16] {
        &self.cells
    }
}
