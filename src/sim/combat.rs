//! Combat resolution: damage, kills, combo scoring and powerups
//!
//! Every damage source funnels through [`apply_damage`] so invincibility,
//! knockback and feedback behave the same no matter what hurt the player.

use glam::Vec2;
use rand::Rng;

use super::enemy::Enemy;
use super::events::{FrameEvents, ParticleKind, SoundEffect};
use super::feedback::{FeedbackState, colors};
use super::state::{PlayerState, Powerup, PowerupKind, RunState};
use crate::consts::*;

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageSource {
    Hazard,
    /// Fell below the world
    Fall,
    EnemyContact { damage: f32 },
    BossProjectile { damage: f32 },
    BossContact,
}

impl DamageSource {
    pub fn damage(&self) -> f32 {
        match self {
            Self::Hazard => HAZARD_DAMAGE,
            Self::Fall => FALL_DAMAGE,
            Self::EnemyContact { damage } | Self::BossProjectile { damage } => *damage,
            Self::BossContact => BOSS_CONTACT_DAMAGE,
        }
    }

    /// Vertical velocity applied on hit
    pub fn knockback(&self) -> f32 {
        match self {
            Self::Hazard => HAZARD_KNOCKBACK,
            // Respawn already zeroed the fall
            Self::Fall => 0.0,
            Self::EnemyContact { .. } | Self::BossProjectile { .. } | Self::BossContact => {
                CONTACT_KNOCKBACK
            }
        }
    }

    pub fn trauma(&self) -> f32 {
        match self {
            Self::Hazard => 0.4,
            Self::Fall => 0.6,
            Self::EnemyContact { .. } => 0.35,
            Self::BossProjectile { .. } => 0.5,
            Self::BossContact => 0.45,
        }
    }

    /// (intensity, color)
    pub fn flash(&self) -> (f32, u32) {
        match self {
            Self::Hazard => (0.5, colors::HAZARD),
            Self::Fall => (0.7, colors::FALL),
            Self::EnemyContact { .. } => (0.4, colors::ENEMY_CONTACT),
            Self::BossProjectile { .. } => (0.6, colors::BOSS_PROJECTILE),
            Self::BossContact => (0.5, colors::BOSS_CONTACT),
        }
    }
}

/// Damage the player unless invincible; returns whether it landed
pub fn apply_damage(
    player: &mut PlayerState,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
    source: DamageSource,
) -> bool {
    if player.invincible > 0 {
        return false;
    }

    player.health = (player.health - source.damage()).clamp(0.0, PLAYER_MAX_HEALTH);
    player.invincible = INVINCIBILITY_FRAMES;
    player.vel.y = source.knockback();

    // Getting touched costs powerup progress
    if let DamageSource::EnemyContact { .. } = source {
        if player.jump_level > 1 {
            player.jump_level -= 1;
            player.jumps_remaining = player.jumps_remaining.min(player.jump_level);
        }
        player.speed_boost = player.speed_boost.saturating_sub(CONTACT_SPEED_BOOST_LOSS);
    }

    events.sound(SoundEffect::PlayerHit);
    feedback.add_trauma(source.trauma());
    let (intensity, color) = source.flash();
    feedback.flash(intensity, color);

    log::debug!("Player hit by {:?}, health {}", source, player.health);
    true
}

/// Weapon damage for a charged or plain throw
#[inline]
pub fn weapon_damage(charged: bool) -> f32 {
    if charged {
        WEAPON_CHARGED_DAMAGE
    } else {
        WEAPON_DAMAGE
    }
}

/// A lethal blow waiting to be scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub base_score: u64,
    pub center: Vec2,
    /// Top edge, where the score popup appears
    pub top: f32,
}

/// Resolve a weapon strike on an enemy
pub fn strike_enemy(
    enemy: &mut Enemy,
    charged: bool,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) -> Option<Kill> {
    let lethal = enemy.take_damage(weapon_damage(charged));
    let center = enemy.center();
    let color = enemy.kind.color();

    events.particle(ParticleKind::Hit, center, color, 1.0);
    events.sound(SoundEffect::Hit);

    if lethal {
        enemy.dead = true;
        feedback.request_hit_stop(if charged { 6 } else { 4 });
        feedback.add_trauma(0.25);
        events.particle(ParticleKind::Death, center, color, 1.0);
        events.sound(SoundEffect::EnemyDeath);
        log::debug!("{:?} #{} killed", enemy.kind, enemy.id);
        Some(Kill {
            base_score: enemy.score,
            center,
            top: enemy.pos.y,
        })
    } else {
        feedback.request_hit_stop(if charged { 3 } else { 2 });
        feedback.add_trauma(0.1);
        None
    }
}

/// Combo multiplier for the current combo count
#[inline]
pub fn combo_multiplier(combo: u32) -> f32 {
    let idx = (combo as usize).min(COMBO_MULTIPLIERS.len() - 1);
    COMBO_MULTIPLIERS[idx]
}

impl RunState {
    /// Score a kill at the current combo and extend the combo
    pub fn award_kill(&mut self, kill: &Kill, events: &mut FrameEvents) -> u64 {
        let earned = (kill.base_score as f32 * combo_multiplier(self.combo)).floor() as u64;
        events.particle(
            ParticleKind::ScorePopup {
                score: earned,
                combo: self.combo,
            },
            Vec2::new(kill.center.x, kill.top),
            colors::score_popup(self.combo),
            1.0,
        );
        self.score += earned;
        self.combo += 1;
        self.combo_timer = COMBO_TIMEOUT;
        earned
    }

    /// Maybe leave a powerup where an enemy died
    pub fn roll_powerup_drop(&mut self, at: Vec2) -> Option<PowerupKind> {
        if !self.rng.random_bool(POWERUP_DROP_RATE) {
            return None;
        }
        let kind = PowerupKind::ALL[self.rng.random_range(0..PowerupKind::ALL.len())];
        let id = self.next_entity_id();
        self.powerups.push(Powerup {
            id,
            kind,
            pos: at,
            lifetime: POWERUP_LIFETIME,
        });
        log::debug!("Dropped {:?} powerup", kind);
        Some(kind)
    }

    /// Count down the combo window; an expired window resets the combo
    pub fn tick_combo(&mut self) {
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
        } else if self.combo > 0 {
            self.combo = 0;
        }
    }
}

/// Age powerups and collect any within reach of the player
pub fn update_powerups(
    powerups: &mut Vec<Powerup>,
    player: &mut PlayerState,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) {
    let center = player.center();
    for powerup in powerups.iter_mut() {
        powerup.lifetime = powerup.lifetime.saturating_sub(1);
        if powerup.pos.distance(center) < POWERUP_PICKUP_RADIUS {
            apply_powerup(player, feedback, powerup.kind);
            events.sound(SoundEffect::Powerup);
            powerup.lifetime = 0;
        }
    }
    powerups.retain(|p| p.lifetime > 0);
}

/// Apply a powerup's effect to the player
pub fn apply_powerup(player: &mut PlayerState, feedback: &mut FeedbackState, kind: PowerupKind) {
    match kind {
        PowerupKind::Health => {
            player.health = (player.health + POWERUP_HEAL).min(PLAYER_MAX_HEALTH);
            feedback.flash(0.3, colors::HEAL);
        }
        PowerupKind::Magic => {
            player.magic = (player.magic + POWERUP_MAGIC).min(PLAYER_MAX_MAGIC);
            feedback.flash(0.3, colors::MAGIC);
        }
        PowerupKind::Speed => {
            player.speed_boost = POWERUP_SPEED_TICKS;
            feedback.flash(0.3, colors::SPEED);
        }
        PowerupKind::MultiJump => {
            if player.jump_level < MAX_JUMP_LEVEL {
                player.jump_level += 1;
                player.jumps_remaining = player.jump_level;
                feedback.flash(0.3, colors::JUMP);
            }
        }
    }
}
