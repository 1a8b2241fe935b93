//! Phantom Throne - simulation core of a side-scrolling boomerang platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, weapon, enemies, boss, feedback)
//! - `settings`: Presentation preferences that never touch gameplay state
//!
//! Rendering, audio and raw input capture live in the host. The core reads a
//! [`sim::TickInput`] each tick and hands back [`sim::FrameEvents`].

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// All speeds and timers are in normalized 60 fps units ("ticks").
pub mod consts {
    /// Reference frame duration in milliseconds that maps to delta = 1.0
    pub const REFERENCE_FRAME_MS: f32 = 16.67;
    /// Frame deltas above this are clamped before normalizing (tab-switch spikes)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Viewport dimensions
    pub const GAME_WIDTH: f32 = 1200.0;
    pub const GAME_HEIGHT: f32 = 675.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_JUMP_FORCE: f32 = 15.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_MAGIC: f32 = 100.0;
    pub const PLAYER_START_MAGIC: f32 = 50.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 400.0;
    /// Respawn height after falling out of the world
    pub const PLAYER_RESPAWN_Y: f32 = 100.0;

    /// Vertical motion
    pub const GRAVITY: f32 = 0.6;
    pub const MAX_FALL_SPEED: f32 = 12.0;

    /// Horizontal feel
    pub const ACCEL_STEP: f32 = 0.1;
    pub const DECEL_STEP: f32 = 0.125;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;

    /// Jump grace windows (ticks)
    pub const COYOTE_TICKS: u32 = 6;
    pub const JUMP_BUFFER_TICKS: u32 = 8;
    pub const JUMP_ANTICIPATION_TICKS: u32 = 4;
    /// Releasing jump before this many held ticks cuts the ascent
    pub const JUMP_HOLD_THRESHOLD: u32 = 10;
    pub const JUMP_CUT_FACTOR: f32 = 0.5;
    pub const GROUND_JUMP_BOOST: f32 = 1.05;
    pub const AIR_JUMP_FACTOR: f32 = 0.85;
    pub const MAX_JUMP_LEVEL: u32 = 4;

    /// Dash
    pub const DASH_SPEED: f32 = 20.0;
    pub const DASH_DURATION: u32 = 8;
    pub const DASH_COOLDOWN: u32 = 30;

    /// Walls
    pub const WALL_SLIDE_SPEED: f32 = 2.0;
    pub const WALL_JUMP_FORCE_X: f32 = 10.0;
    pub const WALL_JUMP_FORCE_Y: f32 = 14.0;
    /// Horizontal band (px) next to a wall face that counts as touching it
    pub const WALL_CONTACT_BAND: f32 = 5.0;
    /// Tolerance below a platform top that still counts as landing on it
    pub const LANDING_TOLERANCE: f32 = 10.0;

    /// Damage handling
    pub const INVINCIBILITY_FRAMES: u32 = 60;
    pub const HAZARD_DAMAGE: f32 = 20.0;
    pub const HAZARD_KNOCKBACK: f32 = -10.0;
    pub const CONTACT_KNOCKBACK: f32 = -8.0;
    pub const FALL_DAMAGE: f32 = 50.0;
    pub const BOSS_CONTACT_DAMAGE: f32 = 20.0;
    /// Speed boost ticks lost on enemy contact
    pub const CONTACT_SPEED_BOOST_LOSS: u32 = 60;

    /// Returning weapon
    pub const WEAPON_SPEED: f32 = 12.0;
    pub const WEAPON_CHARGED_SPEED: f32 = 18.0;
    pub const WEAPON_RETURN_SPEED: f32 = 15.0;
    pub const WEAPON_MAX_DISTANCE: f32 = 400.0;
    pub const WEAPON_SIZE: f32 = 20.0;
    pub const WEAPON_RADIUS: f32 = WEAPON_SIZE / 2.0;
    pub const WEAPON_DAMAGE: f32 = 20.0;
    pub const WEAPON_CHARGED_DAMAGE: f32 = 40.0;
    pub const WEAPON_CHARGE_TICKS: f32 = 45.0;
    pub const WEAPON_CHARGED_THRESHOLD: f32 = 0.8;
    pub const WEAPON_CATCH_RADIUS: f32 = 30.0;
    /// Degrees of spin per active tick
    pub const WEAPON_SPIN: f32 = 25.0;

    /// World layout
    pub const ZONE_WIDTH: f32 = 2200.0;
    pub const TOTAL_ZONES: u32 = 4;
    pub const BOSS_ZONE: u32 = 4;
    pub const ZONE_NAMES: [&str; 4] = [
        "Whispering Woods",
        "Frozen Crypts",
        "Infernal Halls",
        "Haunted Castle",
    ];
    pub const BOSS_ZONE_NAME: &str = "THE DARK THRONE";
    pub const ZONE_BANNER_FADE: f32 = 0.02;

    /// Enemies
    pub const ENEMY_AGGRO_RANGE: f32 = 300.0;
    pub const ENEMY_GRAVITY: f32 = 0.5;
    pub const ENEMY_LANDING_TOLERANCE: f32 = 20.0;
    pub const ENEMY_HIT_FLASH: u32 = 10;

    /// Boss
    pub const BOSS_WIDTH: f32 = 80.0;
    pub const BOSS_HEIGHT: f32 = 120.0;
    pub const BOSS_MAX_HEALTH: f32 = 1000.0;
    pub const BOSS_SPAWN_Y: f32 = 200.0;
    pub const BOSS_CHARGE_TICKS: u32 = 30;
    pub const BOSS_APPROACH_DISTANCE: f32 = 100.0;
    pub const BOSS_HIT_FLASH: u32 = 10;
    /// Ticks between the killing blow and the victory transition
    pub const BOSS_FANFARE_TICKS: u32 = 60;
    /// Player x that wakes the boss
    pub const BOSS_TRIGGER_X: f32 = TOTAL_ZONES as f32 * ZONE_WIDTH - 100.0;

    /// Combo scoring
    pub const COMBO_TIMEOUT: u32 = 120;
    pub const COMBO_MULTIPLIERS: [f32; 7] = [1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];

    /// Powerups
    pub const POWERUP_DROP_RATE: f64 = 0.12;
    pub const POWERUP_LIFETIME: u32 = 600;
    pub const POWERUP_PICKUP_RADIUS: f32 = 30.0;
    pub const POWERUP_HEAL: f32 = 25.0;
    pub const POWERUP_MAGIC: f32 = 25.0;
    pub const POWERUP_SPEED_TICKS: u32 = 300;

    /// Feedback decay per tick
    pub const TRAUMA_DECAY: f32 = 0.05;
    pub const FLASH_DECAY: f32 = 0.1;
    pub const SLOW_MOTION_RECOVERY: f32 = 0.02;
    pub const PHASE_SLOW_MOTION: f32 = 0.3;

    /// Camera
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const MAX_SHAKE_OFFSET: f32 = 12.0;

    /// Bookkeeping cadence (frames)
    pub const FRAMES_PER_SECOND: u64 = 60;
    pub const AMBIENT_PARTICLE_INTERVAL: u64 = 20;
    pub const FOOTSTEP_INTERVAL: u32 = 10;
}

/// Unit vector toward (dx, dy); a zero-length input yields zero, never NaN
#[inline]
pub fn normalize(dx: f32, dy: f32) -> Vec2 {
    Vec2::new(dx, dy).normalize_or_zero()
}

/// Linear interpolation from `start` to `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Cheap deterministic noise in [-1, 1] for cosmetic jitter
///
/// Same multiplicative hash the particle code has always used; it must never
/// drive gameplay decisions.
#[inline]
pub fn tick_noise(tick: u64, salt: u32) -> f32 {
    let hash = (tick as u32)
        .wrapping_mul(2654435761)
        .wrapping_add(salt.wrapping_mul(7919));
    (hash % 2001) as f32 / 1000.0 - 1.0
}
