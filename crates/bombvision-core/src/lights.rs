use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Illumination regime of the scene a frame was captured in.
///
/// Colour thresholds are calibrated separately for both regimes; the room
/// lights going out darkens every material, so value floors drop under `Off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightsState {
    #[default]
    On,
    Off,
}

impl LightsState {
    /// Pick the calibration value matching this regime.
    pub fn select<T>(self, lit: T, unlit: T) -> T {
        match self {
            LightsState::On => lit,
            LightsState::Off => unlit,
        }
    }
}

impl fmt::Display for LightsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightsState::On => write!(f, "on"),
            LightsState::Off => write!(f, "off"),
        }
    }
}

impl FromStr for LightsState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "lit" => Ok(LightsState::On),
            "off" | "unlit" => Ok(LightsState::Off),
            other => bail!("Unknown lights state: '{}' (expected on/off)", other),
        }
    }
}
