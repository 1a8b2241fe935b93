//! Presentation preferences
//!
//! Settings shape what the core hands to the renderer (shake offset, flash
//! strength, ambient particle requests). They never alter gameplay state, so
//! two runs with different settings stay in lockstep.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SHAKE_OFFSET;

/// Feel/accessibility preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Peak shake offset in pixels at full trauma
    pub max_shake_offset: f32,
    /// Full-screen color flashes
    pub flashes: bool,
    /// Ambient drifting particles
    pub ambient_particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            max_shake_offset: MAX_SHAKE_OFFSET,
            flashes: true,
            ambient_particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective flashes (respects reduced_motion)
    pub fn effective_flashes(&self) -> bool {
        self.flashes && !self.reduced_motion
    }

    /// Parse settings; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if !settings.max_shake_offset.is_finite() || settings.max_shake_offset < 0.0 {
            log::warn!(
                "Ignoring invalid max_shake_offset {}",
                settings.max_shake_offset
            );
            settings.max_shake_offset = MAX_SHAKE_OFFSET;
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        // Plain struct of bools and floats; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
