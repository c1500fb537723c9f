//! Physics tuning file. Every field is optional; anything left out keeps its default.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use sky_core::units::DEFAULT_TILE_PIXELS;

use crate::collision::CollisionConfig;
use crate::controller::ControllerConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsTuning {
    pub controller: ControllerConfig,
    pub collision: CollisionConfig,
    /// Presentation scale handed to the renderer; not used by the simulation.
    pub tile_pixels: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            collision: CollisionConfig::default(),
            tile_pixels: DEFAULT_TILE_PIXELS,
        }
    }
}

pub fn load_tuning_from_path(path: &Path) -> Result<PhysicsTuning, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let tuning: PhysicsTuning = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse tuning JSON {}: {e}", path.display()))?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

/// Missing file means defaults. A file that exists but is broken is still an error.
pub fn load_tuning_or_default(path: &Path) -> Result<PhysicsTuning, String> {
    if !path.exists() {
        log::warn!(
            "Tuning file '{}' not found. Using built-in defaults.",
            path.display()
        );
        return Ok(PhysicsTuning::default());
    }
    load_tuning_from_path(path)
}

fn validate_tuning(tuning: &PhysicsTuning) -> Result<(), String> {
    tuning.controller.validate()?;
    if tuning.tile_pixels <= 0.0 {
        return Err("Tuning validation failed: tile_pixels must be > 0".to_string());
    }
    Ok(())
}
