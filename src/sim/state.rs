//! Run state and core simulation types
//!
//! Everything the orchestrator owns for one run lives here. A restart throws
//! the whole value away and rebuilds it from the seed and layout.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::collision::Rect;
use super::enemy::Enemy;
use super::events::{FrameEvents, MusicCue};
use super::feedback::FeedbackState;
use super::layout::Layout;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the host to start
    Title,
    /// Active gameplay
    Playing,
    /// Player health reached zero
    GameOver,
    /// Boss defeated
    Victory,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    pub magic: f32,
    pub facing_right: bool,

    pub grounded: bool,
    pub was_grounded: bool,
    pub jumping: bool,
    pub dashing: bool,
    pub wall_sliding: bool,
    /// -1 wall on the left, +1 wall on the right, 0 none
    pub wall_direction: i8,

    /// Multi-jump level (1-4)
    pub jump_level: u32,
    pub jumps_remaining: u32,

    // === Timers (ticks) ===
    pub dash_timer: u32,
    pub dash_cooldown: u32,
    pub invincible: u32,
    pub coyote_timer: u32,
    pub jump_buffer_timer: u32,
    pub jump_anticipation: u32,
    pub jump_hold_time: u32,
    /// Early-release cut already applied to the current ascent
    pub jump_cut_applied: bool,
    pub speed_boost: u32,

    // === Motion feel (renderer only) ===
    pub accel_progress: f32,
    pub decel_progress: f32,
    pub landing_squash: f32,
    pub body_tilt: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub cape_offset: f32,
    pub cape_velocity: f32,

    pub animation_frame: u32,
    pub footstep_counter: u32,

    /// Previous tick's held state, for edge detection
    pub jump_was_held: bool,
    pub dash_was_held: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            vel: Vec2::ZERO,
            health: PLAYER_MAX_HEALTH,
            magic: PLAYER_START_MAGIC,
            facing_right: true,
            grounded: false,
            was_grounded: false,
            jumping: false,
            dashing: false,
            wall_sliding: false,
            wall_direction: 0,
            jump_level: 1,
            jumps_remaining: 1,
            dash_timer: 0,
            dash_cooldown: 0,
            invincible: 0,
            coyote_timer: 0,
            jump_buffer_timer: 0,
            jump_anticipation: 0,
            jump_hold_time: 0,
            jump_cut_applied: false,
            speed_boost: 0,
            accel_progress: 0.0,
            decel_progress: 0.0,
            landing_squash: 0.0,
            body_tilt: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            cape_offset: 0.0,
            cape_velocity: 0.0,
            animation_frame: 0,
            footstep_counter: 0,
            jump_was_held: false,
            dash_was_held: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    /// Bottom-center, where feet touch the ground
    #[inline]
    pub fn feet(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Something the weapon can strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetId {
    Enemy(u32),
    Boss,
}

/// The returning weapon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponState {
    /// Center of the projectile
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub charging: bool,
    pub returning: bool,
    pub charged: bool,
    /// 0-1
    pub charge_level: f32,
    /// Where the current throw left the player's hand. Presentation only;
    /// the return check uses `distance_traveled`.
    pub origin: Vec2,
    pub distance_traveled: f32,
    /// Degrees
    pub rotation: f32,
    /// Targets overlapped on the previous tick; a hit needs a fresh overlap
    pub contacts: Vec<TargetId>,
}

/// Powerup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Magic,
    Speed,
    MultiJump,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [Self::Health, Self::Magic, Self::Speed, Self::MultiJump];
}

/// A dropped powerup waiting to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub lifetime: u32,
}

/// Zone-name banner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneTransition {
    pub active: bool,
    pub name: String,
    pub opacity: f32,
}

impl ZoneTransition {
    pub fn show(&mut self, name: &str) {
        self.active = true;
        self.name = name.to_string();
        self.opacity = 1.0;
    }

    /// Fade one tick; deactivates at zero
    pub fn fade(&mut self) {
        if !self.active {
            return;
        }
        self.opacity -= ZONE_BANNER_FADE;
        if self.opacity <= 0.0 {
            self.opacity = 0.0;
            self.active = false;
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seeds every gameplay random decision
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { seed: 0x5eed }
    }
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub seed: u64,
    /// Static for the run
    pub layout: Layout,
    pub phase: GamePhase,
    /// Gameplay RNG
    pub rng: Pcg32,

    pub player: PlayerState,
    pub weapon: WeaponState,
    /// Live enemies, in layout order
    pub enemies: Vec<Enemy>,
    pub boss: Boss,
    pub feedback: FeedbackState,
    pub powerups: Vec<Powerup>,

    pub score: u64,
    pub combo: u32,
    pub combo_timer: u32,

    pub camera_x: f32,
    pub current_zone: u32,
    pub zone_transition: ZoneTransition,

    /// Elapsed seconds of play
    pub game_time: u64,
    pub frame_count: u64,
    next_id: u32,
}

impl RunState {
    /// Build a run waiting on the title screen
    pub fn new(config: RunConfig, layout: Layout) -> Self {
        Self::fresh(config.seed, layout, GamePhase::Title)
    }

    fn fresh(seed: u64, layout: Layout, phase: GamePhase) -> Self {
        let mut state = Self {
            seed,
            layout,
            phase,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerState::new(),
            weapon: WeaponState::default(),
            enemies: Vec::new(),
            boss: Boss::new(),
            feedback: FeedbackState::default(),
            powerups: Vec::new(),
            score: 0,
            combo: 0,
            combo_timer: 0,
            camera_x: 0.0,
            current_zone: 0,
            zone_transition: ZoneTransition::default(),
            game_time: 0,
            frame_count: 0,
            next_id: 1,
        };
        state.spawn_enemies();
        state
    }

    fn spawn_enemies(&mut self) {
        let spawns = self.layout.enemies.clone();
        let mut enemies = Vec::with_capacity(spawns.len());
        for spawn in &spawns {
            let id = self.next_entity_id();
            let facing_right = self.rng.random_bool(0.5);
            enemies.push(Enemy::spawn(id, spawn, facing_right));
        }
        self.enemies = enemies;
    }

    /// Leave the title screen
    pub fn start(&mut self) -> FrameEvents {
        let mut events = FrameEvents::new();
        if self.phase == GamePhase::Title {
            self.phase = GamePhase::Playing;
            events.music(MusicCue::Zone(0));
            log::info!(
                "Run started (seed {:#x}, {} enemies)",
                self.seed,
                self.enemies.len()
            );
        }
        events
    }

    /// Replace the whole run with a fresh one from the same seed and layout
    pub fn restart(&mut self) -> FrameEvents {
        let layout = std::mem::take(&mut self.layout);
        *self = Self::fresh(self.seed, layout, GamePhase::Playing);
        log::info!("Run restarted (seed {:#x})", self.seed);

        let mut events = FrameEvents::new();
        events.music(MusicCue::Zone(0));
        events
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True once the run has reached a terminal phase
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Victory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_on_title() {
        let state = RunState::new(RunConfig::default(), Layout::standard());
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.enemies.len(), state.layout.enemies.len());
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.player.jumps_remaining, state.player.jump_level);
    }

    #[test]
    fn test_start_only_from_title() {
        let mut state = RunState::new(RunConfig::default(), Layout::standard());
        let events = state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(events.music, vec![MusicCue::Zone(0)]);

        state.phase = GamePhase::GameOver;
        assert!(state.start().is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let config = RunConfig { seed: 42 };
        let mut state = RunState::new(config, Layout::standard());
        state.start();
        state.player.invincible = 30;
        state.score = 1234;
        state.phase = GamePhase::GameOver;

        state.restart();
        let first = serde_json::to_string(&state).unwrap();
        state.restart();
        let second = serde_json::to_string(&state).unwrap();
        assert_eq!(first, second);
        assert_eq!(state.player.invincible, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_enemy_facing_is_seeded() {
        let a = RunState::new(RunConfig { seed: 7 }, Layout::standard());
        let b = RunState::new(RunConfig { seed: 7 }, Layout::standard());
        let dirs_a: Vec<f32> = a.enemies.iter().map(|e| e.direction).collect();
        let dirs_b: Vec<f32> = b.enemies.iter().map(|e| e.direction).collect();
        assert_eq!(dirs_a, dirs_b);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = RunState::new(RunConfig::default(), Layout::standard());
        let mut ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        ids.push(state.next_entity_id());
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_zone_banner_fades_out() {
        let mut banner = ZoneTransition::default();
        banner.show("Frozen Crypts");
        for _ in 0..60 {
            banner.fade();
        }
        assert!(!banner.active);
        assert_eq!(banner.opacity, 0.0);
    }
}
