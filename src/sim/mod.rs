//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Normalized 60 fps ticks only
//! - Seeded RNG only (owned by `RunState`)
//! - Stable iteration order (layout order, then entity ID)
//! - No rendering or audio dependencies; effects leave as `FrameEvents`

pub mod boss;
pub mod collision;
pub mod combat;
pub mod enemy;
pub mod events;
pub mod feedback;
pub mod layout;
pub mod player;
pub mod state;
pub mod tick;
pub mod weapon;

pub use boss::{AttackPattern, AttackState, Boss, Projectile, ProjectileKind, phase_for};
pub use collision::{Circle, Rect, circle_rect_intersect, rects_intersect};
pub use combat::{DamageSource, apply_damage};
pub use enemy::{Behavior, Enemy, EnemyKind, EnemyMode};
pub use events::{EventSink, FrameEvents, MusicCue, ParticleKind, ParticleSpawn, SoundEffect};
pub use feedback::FeedbackState;
pub use layout::{
    EnemyRecord, EnemySpawn, Layout, LayoutDocument, LayoutError, Platform, PlatformKind,
    PlatformRecord,
};
pub use state::{
    GamePhase, PlayerState, Powerup, PowerupKind, RunConfig, RunState, TargetId, WeaponState,
    ZoneTransition,
};
pub use tick::{TickInput, frame_delta, tick};
