//! A single growing crack
//!
//! Straight cracks move [`STEP`] along their heading every tick. Arc cracks
//! move along a chord of a circle and turn by a fixed increment, stopping
//! once they have turned all the way round.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::grid::CrackGrid;
use crate::consts::*;
use crate::palette::{self, Rgba};
use crate::settings::GainSeed;
use crate::{degrees_apart, direction, whole_degrees, wrap_heading};

/// Nudge along the new heading when branching, so the first step clears the
/// parent crack's pixel
pub const BRANCH_OFFSET: f32 = 0.61;

/// Why a crack stopped growing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stepped off the canvas
    OutOfBounds,
    /// Ran into a crack heading a different way
    Collision { claimed: u16 },
    /// Arc completed a full circle
    FullTurn,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "left the canvas"),
            Self::Collision { claimed } => write!(f, "hit a crack heading {claimed}°"),
            Self::FullTurn => write!(f, "turned a full circle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crack {
    pub pos: Vec2,
    /// Heading (radians, wrapped to [0, 2π))
    pub heading: f32,
    /// Heading change per step (radians, 0 = straight)
    pub angle_inc: f32,
    /// Signed arc radius, 0 for straight cracks
    pub radius: f32,
    /// Arc displacement per step: x across toward `heading - 90°`, y along `heading`
    pub arc_step: Vec2,
    /// Steps taken so far along the arc
    pub arc_steps: u32,
    pub color: Rgba,
    /// Sand band gain in [0, 1]
    pub gain: f32,
}

impl Crack {
    pub fn straight(pos: Vec2, heading: f32, color: Rgba, gain: f32) -> Self {
        Self {
            pos,
            heading: wrap_heading(heading),
            angle_inc: 0.0,
            radius: 0.0,
            arc_step: Vec2::ZERO,
            arc_steps: 0,
            color,
            gain,
        }
    }

    /// Arc of signed `radius`; negative radii curl the other way
    pub fn arc(pos: Vec2, heading: f32, radius: f32, color: Rgba, gain: f32) -> Self {
        debug_assert!(radius != 0.0, "arc radius must be nonzero");
        let angle_inc = STEP / radius;
        Self {
            angle_inc,
            radius,
            arc_step: Vec2::new(radius * (1.0 - angle_inc.cos()), radius * angle_inc.sin()),
            ..Self::straight(pos, heading, color, gain)
        }
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        self.angle_inc != 0.0
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading.to_degrees()
    }

    pub fn angle_inc_degrees(&self) -> f32 {
        self.angle_inc.to_degrees()
    }

    /// Heading in whole degrees, the value written into the grid
    #[inline]
    pub fn claim_angle(&self) -> u16 {
        whole_degrees(self.heading)
    }

    /// Total angle turned so far (radians)
    pub fn turned(&self) -> f32 {
        self.arc_steps as f32 * self.angle_inc.abs()
    }

    /// Move one step. Returns the position before the move.
    pub fn advance(&mut self) -> Vec2 {
        let from = self.pos;
        if self.is_arc() {
            self.pos += direction(self.heading) * self.arc_step.y;
            self.pos += direction(self.heading - FRAC_PI_2) * self.arc_step.x;
            self.heading = wrap_heading(self.heading + self.angle_inc);
            self.arc_steps += 1;
        } else {
            self.pos += direction(self.heading) * STEP;
        }
        from
    }

    /// Grid cell the crack may claim at its current position, or why it has
    /// to stop
    pub fn landing_cell(&self, grid: &CrackGrid) -> Result<(usize, usize), Termination> {
        let (x, y) = grid.cell_at(self.pos).ok_or(Termination::OutOfBounds)?;

        if let Some(claimed) = grid.claimed(x, y) {
            if degrees_apart(claimed as f32, self.heading_degrees()) > COLLISION_TOLERANCE_DEG {
                return Err(Termination::Collision { claimed });
            }
        }

        if self.turned() > MAX_TURN {
            return Err(Termination::FullTurn);
        }

        Ok((x, y))
    }
}

/// Initial gain for a new crack
pub fn initial_gain<R: Rng + ?Sized>(rng: &mut R, seed: GainSeed) -> f32 {
    match seed {
        // Integer division on purpose
        GainSeed::Truncated => (rng.random_range(0..=RAND_MAX) / RAND_MAX) as f32,
        GainSeed::Uniform => rng.random::<f32>(),
    }
}

/// Create a crack somewhere on `grid`.
///
/// Samples random pixels looking for one an existing crack has claimed and
/// branches off it at a right angle. With nothing found inside the sample
/// budget, starts at the last sampled pixel with a random heading. The grid
/// must not be empty.
pub fn spawn<R: Rng + ?Sized>(
    grid: &CrackGrid,
    rng: &mut R,
    circle_percent: u32,
    gain_seed: GainSeed,
) -> Crack {
    debug_assert!(!grid.is_empty(), "spawn on an empty grid");
    let (w, h) = (grid.width(), grid.height());

    let mut x = 0;
    let mut y = 0;
    let mut parent = None;
    for _ in 0..SPAWN_ATTEMPTS {
        x = rng.random_range(0..w);
        y = rng.random_range(0..h);
        if let Some(angle) = grid.claimed(x, y) {
            parent = Some(angle);
            break;
        }
    }

    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let (pos, heading) = match parent {
        Some(angle) => {
            let turn = if rng.random_bool(0.5) { 90.0 } else { -90.0 };
            let heading = (angle as f32 + turn).to_radians();
            (center + direction(heading) * BRANCH_OFFSET, heading)
        }
        None => (center, (rng.random_range(0..360u32) as f32).to_radians()),
    };

    let color = palette::random_color(rng);
    let gain = initial_gain(rng, gain_seed);

    if rng.random_range(0..100) < circle_percent {
        let span = ((w + h) / 2).max(1) as u32;
        let mut radius = (MIN_ARC_RADIUS + rng.random_range(0..span)) as f32;
        if rng.random_bool(0.5) {
            radius = -radius;
        }
        Crack::arc(pos, heading, radius, color, gain)
    } else {
        Crack::straight(pos, heading, color, gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::CRACK_COLOR;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_straight_step() {
        let mut crack = Crack::straight(Vec2::new(10.0, 10.0), 0.0, CRACK_COLOR, 0.0);
        let from = crack.advance();
        assert_eq!(from, Vec2::new(10.0, 10.0));
        assert!((crack.pos - Vec2::new(10.0 + STEP, 10.0)).length() < 1e-6);
        assert_eq!(crack.heading, 0.0);
        assert_eq!(crack.turned(), 0.0);
    }

    #[test]
    fn test_arc_increment_matches_radius() {
        for radius in [10.0_f32, 57.0, -120.0, 400.0] {
            let crack = Crack::arc(Vec2::ZERO, 1.0, radius, CRACK_COLOR, 0.0);
            assert!(crack.is_arc());
            let expected = (STEP / radius).to_degrees();
            assert!((crack.angle_inc_degrees() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_arc_closes_into_a_circle() {
        let start = Vec2::new(500.0, 500.0);
        let mut crack = Crack::arc(start, 0.3, 40.0, CRACK_COLOR, 0.0);
        let steps = (MAX_TURN / crack.angle_inc.abs()).round() as u32;
        for _ in 0..steps {
            crack.advance();
        }
        assert!((crack.pos - start).length() < 1.0, "ended at {:?}", crack.pos);
    }

    #[test]
    fn test_arc_stops_after_full_turn() {
        // Large empty grid so only the turn limit can end the arc
        let grid = CrackGrid::new(2000, 2000);
        for radius in [10.0_f32, 37.0, -80.0, 137.0] {
            let mut crack = Crack::arc(Vec2::new(1000.0, 1000.0), 0.0, radius, CRACK_COLOR, 0.0);
            let bound = (360.0 / crack.angle_inc_degrees().abs()).ceil() as u32;
            let mut steps = 0;
            let reason = loop {
                crack.advance();
                steps += 1;
                if let Err(reason) = crack.landing_cell(&grid) {
                    break reason;
                }
                assert!(steps <= bound, "radius {radius} still turning after {steps} steps");
            };
            assert_eq!(reason, Termination::FullTurn);
            assert!(steps <= bound);
        }
    }

    #[test]
    fn test_landing_out_of_bounds() {
        let grid = CrackGrid::new(10, 10);
        let mut crack = Crack::straight(Vec2::new(9.8, 5.0), 0.0, CRACK_COLOR, 0.0);
        crack.advance();
        assert_eq!(crack.landing_cell(&grid), Err(Termination::OutOfBounds));
    }

    #[test]
    fn test_landing_collision_tolerance() {
        let mut grid = CrackGrid::new(10, 10);
        grid.set(5, 5, 93);
        let near = Crack::straight(Vec2::new(5.5, 5.5), 90f32.to_radians(), CRACK_COLOR, 0.0);
        assert_eq!(near.landing_cell(&grid), Ok((5, 5)));

        let across = Crack::straight(Vec2::new(5.5, 5.5), 0.0, CRACK_COLOR, 0.0);
        assert_eq!(across.landing_cell(&grid), Err(Termination::Collision { claimed: 93 }));

        // 358° and 2° are 4° apart
        grid.set(5, 5, 358);
        let wrap = Crack::straight(Vec2::new(5.5, 5.5), 2f32.to_radians(), CRACK_COLOR, 0.0);
        assert_eq!(wrap.landing_cell(&grid), Ok((5, 5)));
    }

    #[test]
    fn test_spawn_on_empty_grid_picks_random_heading() {
        let grid = CrackGrid::new(40, 30);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            let crack = spawn(&grid, &mut rng, 0, GainSeed::Truncated);
            assert!(!crack.is_arc());
            assert!(grid.cell_at(crack.pos).is_some());
            let deg = crack.heading_degrees();
            assert!((deg - deg.round()).abs() < 1e-3, "heading {deg} not whole degrees");
            assert_eq!(crack.gain, 0.0);
        }
    }

    #[test]
    fn test_spawn_branches_perpendicular() {
        let mut grid = CrackGrid::new(30, 30);
        for y in 0..30 {
            for x in 0..30 {
                grid.set(x, y, 30);
            }
        }
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..50 {
            let crack = spawn(&grid, &mut rng, 0, GainSeed::Truncated);
            let claim = crack.claim_angle();
            assert!(claim == 120 || claim == 300, "branched at {claim}");
        }
    }

    #[test]
    fn test_branch_starts_offset_from_pixel_center() {
        let mut grid = CrackGrid::new(30, 30);
        for y in 0..30 {
            for x in 0..30 {
                grid.set(x, y, 0);
            }
        }
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let crack = spawn(&grid, &mut rng, 0, GainSeed::Truncated);
            // Branching off a 0° crack heads straight up or down from a
            // pixel center, ending 0.61 into the neighboring row
            let frac = crack.pos - crack.pos.floor();
            assert!((frac.x - 0.5).abs() < 1e-4, "x {}", crack.pos.x);
            let down = 0.5 + BRANCH_OFFSET - 1.0;
            let up = 0.5 - BRANCH_OFFSET + 1.0;
            assert!(
                (frac.y - down).abs() < 1e-4 || (frac.y - up).abs() < 1e-4,
                "y {}",
                crack.pos.y
            );
        }
    }

    #[test]
    fn test_spawn_always_arcs_at_full_percent() {
        let grid = CrackGrid::new(120, 80);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let crack = spawn(&grid, &mut rng, 100, GainSeed::Truncated);
            assert!(crack.is_arc());
            let r = crack.radius.abs();
            assert!((10.0..(10 + 100) as f32).contains(&r), "radius {r}");
            let expected = (STEP / crack.radius).to_degrees();
            assert!((crack.angle_inc_degrees() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_uniform_gain_seed() {
        let grid = CrackGrid::new(20, 20);
        let mut rng = Pcg32::seed_from_u64(4);
        let gains: Vec<f32> = (0..50)
            .map(|_| spawn(&grid, &mut rng, 0, GainSeed::Uniform).gain)
            .collect();
        assert!(gains.iter().all(|g| (0.0..1.0).contains(g)));
        assert!(gains.iter().any(|&g| g > 0.0));
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Collision { claimed: 45 }.to_string(), "hit a crack heading 45°");
        assert_eq!(Termination::FullTurn.to_string(), "turned a full circle");
    }
}
