//! Screen feedback: camera trauma, flashes, hit-stop and slow motion
//!
//! Gameplay code only ever pushes these values up; [`FeedbackState::decay`]
//! relaxes them back toward rest once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::tick_noise;

/// Flash colors (0xRRGGBB)
pub mod colors {
    pub const WHITE: u32 = 0xffffff;
    pub const HAZARD: u32 = 0xff5500;
    pub const FALL: u32 = 0xff0000;
    pub const ENEMY_CONTACT: u32 = 0xff3333;
    pub const BOSS_PROJECTILE: u32 = 0x9933ff;
    pub const BOSS_CONTACT: u32 = 0xcc0044;
    pub const PHASE_CHANGE: u32 = 0xff00ff;
    pub const HEAL: u32 = 0x55ff55;
    pub const MAGIC: u32 = 0x5555ff;
    pub const SPEED: u32 = 0xffff55;
    pub const JUMP: u32 = 0xffaa00;

    // Particle tints
    pub const FOOTSTEP_DUST: u32 = 0x8a7a6a;
    pub const JUMP_DUST: u32 = 0x9a8a7a;
    pub const LANDING_DUST: u32 = 0xaa9a8a;
    pub const DASH_BURST: u32 = 0x9a7aff;
    pub const DASH_TRAIL: u32 = 0x7a5aff;
    pub const WEAPON_TRAIL: u32 = 0xffaa00;
    pub const WEAPON_TRAIL_CHARGED: u32 = 0xff5500;
    pub const BOSS_HIT_SPARK: u32 = 0xff4444;

    /// Ambient particle tint per zone (last entry is the boss arena)
    pub const AMBIENT: [u32; 5] = [0x6a8a5a, 0xffffff, 0xff6600, 0x8a6aaa, 0xff3333];

    /// Score popup tint by combo count
    pub fn score_popup(combo: u32) -> u32 {
        if combo > 3 {
            0xffff00
        } else if combo > 1 {
            0xffaa00
        } else {
            WHITE
        }
    }
}

/// Global feel state shared by every subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackState {
    /// Camera shake driver (0-1)
    pub trauma: f32,
    /// Full-screen flash strength (0-1)
    pub flash_intensity: f32,
    /// Flash color (0xRRGGBB)
    pub flash_color: u32,
    /// Remaining freeze-frame ticks
    pub hit_stop_frames: u32,
    /// Time scale (1 = normal, lower = slower)
    pub slow_motion: f32,
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self {
            trauma: 0.0,
            flash_intensity: 0.0,
            flash_color: colors::WHITE,
            hit_stop_frames: 0,
            slow_motion: 1.0,
        }
    }
}

impl FeedbackState {
    /// Add camera trauma, saturating at 1
    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).clamp(0.0, 1.0);
    }

    /// Start a flash, replacing any flash in progress
    pub fn flash(&mut self, intensity: f32, color: u32) {
        self.flash_intensity = intensity.clamp(0.0, 1.0);
        self.flash_color = color;
    }

    /// Request a freeze-frame; the longest request wins
    pub fn request_hit_stop(&mut self, frames: u32) {
        self.hit_stop_frames = self.hit_stop_frames.max(frames);
    }

    /// Drop the time scale; never raises it
    pub fn engage_slow_motion(&mut self, factor: f32) {
        self.slow_motion = self.slow_motion.min(factor.clamp(0.0, 1.0));
    }

    /// True while gameplay must stay frozen
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.hit_stop_frames > 0
    }

    /// Consume one hit-stop frame
    pub fn tick_hit_stop(&mut self) {
        self.hit_stop_frames = self.hit_stop_frames.saturating_sub(1);
    }

    /// Relax trauma, flash and slow motion toward rest
    pub fn decay(&mut self) {
        self.trauma = (self.trauma - TRAUMA_DECAY).max(0.0);
        self.flash_intensity = (self.flash_intensity - FLASH_DECAY).max(0.0);
        if self.slow_motion < 1.0 {
            self.slow_motion = (self.slow_motion + SLOW_MOTION_RECOVERY).min(1.0);
        }
    }

    /// Shake magnitude; squared so low trauma barely moves the camera
    #[inline]
    pub fn shake(&self) -> f32 {
        self.trauma * self.trauma
    }

    /// Camera offset for this frame
    pub fn shake_offset(&self, settings: &Settings, frame: u64) -> Vec2 {
        if !settings.effective_screen_shake() {
            return Vec2::ZERO;
        }
        let magnitude = settings.max_shake_offset * self.shake();
        Vec2::new(tick_noise(frame, 1), tick_noise(frame, 2)) * magnitude
    }

    /// Flash strength after accessibility preferences
    pub fn effective_flash(&self, settings: &Settings) -> f32 {
        if settings.effective_flashes() {
            self.flash_intensity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trauma_saturates_and_decays_to_zero() {
        let mut fx = FeedbackState::default();
        fx.add_trauma(0.7);
        fx.add_trauma(0.7);
        assert_eq!(fx.trauma, 1.0);
        for _ in 0..40 {
            fx.decay();
        }
        assert_eq!(fx.trauma, 0.0);
    }

    #[test]
    fn test_hit_stop_longest_wins() {
        let mut fx = FeedbackState::default();
        fx.request_hit_stop(6);
        fx.request_hit_stop(2);
        assert_eq!(fx.hit_stop_frames, 6);
        fx.tick_hit_stop();
        assert_eq!(fx.hit_stop_frames, 5);
    }

    #[test]
    fn test_slow_motion_recovers_linearly() {
        let mut fx = FeedbackState::default();
        fx.engage_slow_motion(PHASE_SLOW_MOTION);
        assert!((fx.slow_motion - 0.3).abs() < 1e-6);
        fx.decay();
        assert!((fx.slow_motion - 0.32).abs() < 1e-5);
        for _ in 0..100 {
            fx.decay();
        }
        assert_eq!(fx.slow_motion, 1.0);
    }

    #[test]
    fn test_shake_is_squared() {
        let fx = FeedbackState {
            trauma: 0.5,
            ..Default::default()
        };
        assert!((fx.shake() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_shake_disabled_by_reduced_motion() {
        let fx = FeedbackState {
            trauma: 1.0,
            ..Default::default()
        };
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(fx.shake_offset(&settings, 7), Vec2::ZERO);

        let offset = fx.shake_offset(&Settings::default(), 7);
        assert!(offset.x.abs() <= MAX_SHAKE_OFFSET && offset.y.abs() <= MAX_SHAKE_OFFSET);
    }
}
