//! Deterministic simulation module
//!
//! Everything that decides what ends up on the canvas lives here:
//! - Seeded RNG only
//! - Stable iteration order (population slot order)
//! - Drawing goes through the `Canvas` trait, nothing platform specific

pub mod crack;
pub mod grid;
pub mod sand;
pub mod state;
pub mod tick;

pub use crack::{Crack, Termination, spawn};
pub use grid::{CrackGrid, UNCLAIMED};
pub use sand::{drift_gain, grain_weights, paint_sand, probe_end};
pub use state::{Phase, Substrate, TickReport};
