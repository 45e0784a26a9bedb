//! Simulation parameters
//!
//! Four integers plus two flags. Persisted as JSON: in LocalStorage on the
//! web, in a plain file for the native runner.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Number of simultaneously growing cracks
pub const CRACK_COUNT_RANGE: RangeInclusive<u32> = 1..=20;
/// Ticks between restarts
pub const DURATION_RANGE: RangeInclusive<u32> = 3000..=10_000;
/// Sand grains painted per crack per tick
pub const GRAIN_COUNT_RANGE: RangeInclusive<u32> = 0..=50;
/// Chance (percent) that a new crack is an arc
pub const CIRCLE_PERCENT_RANGE: RangeInclusive<u32> = 0..=100;

/// How a new crack's initial gain is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GainSeed {
    /// Integer `random / RAND_MAX`: almost always 0, so fresh cracks start
    /// with tight sand bands that loosen as the gain drifts
    #[default]
    Truncated,
    /// Uniform in [0, 1)
    Uniform,
}

impl GainSeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            GainSeed::Truncated => "truncated",
            GainSeed::Uniform => "uniform",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "truncated" | "classic" => Some(GainSeed::Truncated),
            "uniform" => Some(GainSeed::Uniform),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub crack_count: u32,
    /// Ticks between full restarts
    pub duration_ticks: u32,
    pub grain_count: u32,
    /// Percent chance of a new crack being an arc
    pub circle_percent: u32,
    /// Small preview window: tick slower
    pub preview: bool,
    pub gain_seed: GainSeed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crack_count: 5,
            duration_ticks: 3000,
            grain_count: 50,
            circle_percent: 30,
            preview: false,
            gain_seed: GainSeed::Truncated,
        }
    }
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl Settings {
    /// Copy with every parameter forced into its slider range
    pub fn clamped(&self) -> Self {
        Self {
            crack_count: clamp_to(self.crack_count, &CRACK_COUNT_RANGE),
            duration_ticks: clamp_to(self.duration_ticks, &DURATION_RANGE),
            grain_count: clamp_to(self.grain_count, &GRAIN_COUNT_RANGE),
            circle_percent: clamp_to(self.circle_percent, &CIRCLE_PERCENT_RANGE),
            ..self.clone()
        }
    }

    pub fn is_in_range(&self) -> bool {
        *self == self.clamped()
    }

    /// Time between ticks the host should aim for
    pub fn tick_interval(&self) -> Duration {
        if self.preview {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(10)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Settings from a stored JSON value. A missing or unreadable value
    /// gives the defaults.
    pub fn from_stored(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "substrate_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();
        Self::from_stored(stored.as_deref())
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
