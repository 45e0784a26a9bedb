//! Sand bands painted beside each crack
//!
//! A probe walks away from the crack at a right angle until it leaves the
//! canvas or reaches another crack. Grains are scattered between the crack
//! and that point with a `sin(sin(t))` falloff, so they bunch up at the crack
//! and thin out across the band. The gain sets how far across they reach.

use glam::Vec2;
use rand::Rng;

use super::crack::Crack;
use super::grid::CrackGrid;
use crate::canvas::Canvas;
use crate::consts::{GAIN_DRIFT, SAND_HEAD_START, SAND_PROBE_STEP};

/// Where the perpendicular probe from `pos` stops
pub fn probe_end(grid: &CrackGrid, pos: Vec2, heading: f32) -> Vec2 {
    let across = Vec2::new(heading.sin(), -heading.cos());
    let mut probe = pos + across * SAND_HEAD_START;
    loop {
        probe += across * SAND_PROBE_STEP;
        match grid.cell_at(probe) {
            Some((x, y)) if !grid.is_claimed(x, y) => {}
            _ => return probe,
        }
    }
}

/// One step of the gain's bounded random walk
pub fn drift_gain<R: Rng + ?Sized>(gain: f32, rng: &mut R) -> f32 {
    (gain + (rng.random::<f32>() - 0.5) * GAIN_DRIFT).clamp(0.0, 1.0)
}

/// Interpolation weights along the band, one per grain.
/// Fewer than two grains yield nothing.
pub fn grain_weights(gain: f32, grains: u32) -> impl Iterator<Item = f32> {
    let (count, w) = if grains > 1 {
        (grains, gain / (grains - 1) as f32)
    } else {
        (0, 0.0)
    };
    (0..count).map(move |i| (i as f32 * w).sin().sin())
}

/// Probe, drift the gain, and paint up to `grains` grains for `crack`.
/// Returns the number of grains painted.
pub fn paint_sand<C, R>(
    canvas: &mut C,
    grid: &CrackGrid,
    crack: &mut Crack,
    grains: u32,
    rng: &mut R,
) -> u32
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    let end = probe_end(grid, crack.pos, crack.heading);
    crack.gain = drift_gain(crack.gain, rng);

    let span = end - crack.pos;
    let mut painted = 0;
    for t in grain_weights(crack.gain, grains) {
        let g = crack.pos + span * t;
        // Truncate toward zero: grains just past the top or left edge land on row/column 0
        canvas.fill_rect(g.x as i32, g.y as i32, 1, 1, crack.color);
        painted += 1;
    }
    painted
}
