//! Substrate - crack-growth generative art
//!
//! Lines grow across the canvas, branch off perpendicular to each other,
//! occasionally curl into arcs, and leave bands of translucent sand beside
//! themselves. Every `duration` ticks the canvas is wiped and it starts over.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (occupancy grid, cracks, sand, driver)
//! - `canvas`: Drawing primitives consumed by the simulation
//! - `palette`: Crack colors
//! - `settings`: The user-tunable parameters

pub mod canvas;
pub mod error;
pub mod palette;
pub mod settings;
pub mod sim;

pub use canvas::{Canvas, RasterCanvas};
pub use error::SettingsError;
pub use palette::Rgba;
pub use settings::{GainSeed, Settings};
pub use sim::{Substrate, TickReport};

use glam::Vec2;
use std::f32::consts::TAU;

/// Simulation constants
pub mod consts {
    /// Distance a crack travels per tick
    pub const STEP: f32 = 0.42;

    /// Sample budget when looking for an existing crack to branch from
    pub const SPAWN_ATTEMPTS: u32 = 10_000;
    /// Smallest arc radius (pixels)
    pub const MIN_ARC_RADIUS: u32 = 10;

    /// A crack may cross a cell claimed within this many degrees of its heading
    pub const COLLISION_TOLERANCE_DEG: f32 = 5.0;
    /// Arcs stop after turning a full circle (radians)
    pub const MAX_TURN: f32 = std::f32::consts::TAU;

    /// Probe offset before the sand scan starts, so a crack never hits itself
    pub const SAND_HEAD_START: f32 = 4.0;
    /// Sand probe advance per scan step
    pub const SAND_PROBE_STEP: f32 = 0.81;
    /// Maximum change of a crack's gain per tick
    pub const GAIN_DRIFT: f32 = 0.2;

    /// Crack line pen width (pixels)
    pub const CRACK_LINE_WIDTH: f32 = 2.0;

    /// `RAND_MAX` of the C library the pattern was tuned against
    pub const RAND_MAX: u32 = i32::MAX as u32;
}

/// Wrap a heading into [0, 2π)
#[inline]
pub fn wrap_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Whole degrees of a heading in [0, 360), as stored in the occupancy grid
#[inline]
pub fn whole_degrees(angle: f32) -> u16 {
    // Nudge past radian round-trip noise so 180° doesn't truncate to 179
    ((wrap_heading(angle).to_degrees() + 1e-3) as u16) % 360
}

/// Unsigned distance between two angles in degrees, taking the short way round
#[inline]
pub fn degrees_apart(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
