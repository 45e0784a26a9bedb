//! Simulation state
//!
//! Everything a run needs lives in [`Substrate`]: the settings in effect, the
//! RNG, the occupancy grid and the crack population. Hosts own one of these
//! and feed it ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::crack::Crack;
use super::grid::CrackGrid;
use crate::settings::{CIRCLE_PERCENT_RANGE, CRACK_COUNT_RANGE, GRAIN_COUNT_RANGE, Settings};

/// Driver phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Needs a restart before the next step (fresh, resized, or reconfigured)
    Uninitialized,
    Running,
}

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub restarted: bool,
    /// Cracks that grew this tick
    pub grown: u32,
    /// Cracks that ended and were replaced
    pub respawned: u32,
    /// Sand grains painted
    pub grains: u32,
}

#[derive(Debug, Clone)]
pub struct Substrate {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) settings: Settings,
    pub(crate) rng: Pcg32,
    pub(crate) grid: CrackGrid,
    pub(crate) cracks: Vec<Crack>,
    pub(crate) phase: Phase,
    /// Next frame index used by `tick`
    pub(crate) frame: u64,
    pub(crate) restarts: u64,
}

/// Clamp what the core can't cope with. Stricter slider ranges are the
/// host's business (see [`Settings::clamped`]).
fn sanitize(settings: &Settings) -> Settings {
    let clean = Settings {
        crack_count: settings.crack_count.min(*CRACK_COUNT_RANGE.end()),
        duration_ticks: settings.duration_ticks.max(1),
        grain_count: settings.grain_count.min(*GRAIN_COUNT_RANGE.end()),
        circle_percent: settings.circle_percent.min(*CIRCLE_PERCENT_RANGE.end()),
        ..settings.clone()
    };
    if clean != *settings {
        log::warn!("Settings out of range, clamped: {:?} -> {:?}", settings, clean);
    }
    clean
}

impl Substrate {
    /// New simulation with no canvas yet. Call [`Substrate::resize`] or tick
    /// with a sized canvas to get going.
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            seed,
            settings: sanitize(&settings),
            rng: Pcg32::seed_from_u64(seed),
            grid: CrackGrid::new(0, 0),
            cracks: Vec::new(),
            phase: Phase::Uninitialized,
            frame: 0,
            restarts: 0,
        }
    }

    pub fn with_size(settings: Settings, seed: u64, width: usize, height: usize) -> Self {
        let mut sim = Self::new(settings, seed);
        sim.resize(width, height);
        sim
    }

    /// Apply new settings. A different crack count takes effect through a
    /// restart on the next tick; everything else applies immediately.
    pub fn configure(&mut self, settings: Settings) {
        let settings = sanitize(&settings);
        if settings.crack_count != self.settings.crack_count {
            self.phase = Phase::Uninitialized;
        }
        log::info!(
            "Configured: {} cracks, restart every {} ticks, {} grains, {}% arcs",
            settings.crack_count,
            settings.duration_ticks,
            settings.grain_count,
            settings.circle_percent
        );
        self.settings = settings;
    }

    /// Reallocate the grid for a new canvas size. The next tick restarts.
    pub fn resize(&mut self, width: usize, height: usize) {
        log::info!("Resize to {}x{}", width, height);
        self.grid = CrackGrid::new(width, height);
        self.cracks.clear();
        self.phase = Phase::Uninitialized;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &CrackGrid {
        &self.grid
    }

    /// Live cracks in draw order
    pub fn cracks(&self) -> &[Crack] {
        &self.cracks
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Frame index the next `tick` will use
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Restarts performed so far
    pub fn restarts(&self) -> u64 {
        self.restarts
    }
}
