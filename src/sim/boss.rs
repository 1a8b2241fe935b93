//! The throne boss: four escalating phases and a timed attack cycle
//!
//! The phase is recomputed from the health fraction at the top of every tick,
//! so movement and attack timing always use the row for the current health.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::combat::{DamageSource, apply_damage};
use super::events::{FrameEvents, MusicCue, ParticleKind, SoundEffect};
use super::feedback::{FeedbackState, colors};
use super::state::{PlayerState, TargetId, WeaponState};
use crate::consts::*;

/// Movement speed and attack interval for one phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    pub speed: f32,
    /// Idle ticks before winding up an attack
    pub attack_interval: u32,
}

pub const PHASES: [PhaseParams; 4] = [
    PhaseParams {
        speed: 2.0,
        attack_interval: 90,
    },
    PhaseParams {
        speed: 3.0,
        attack_interval: 70,
    },
    PhaseParams {
        speed: 4.0,
        attack_interval: 50,
    },
    PhaseParams {
        speed: 5.0,
        attack_interval: 35,
    },
];

/// Health fractions at or below which phases 2, 3 and 4 begin
pub const PHASE_THRESHOLDS: [f32; 3] = [0.7, 0.4, 0.2];

/// Phase (1-4) for a health fraction
pub fn phase_for(fraction: f32) -> u32 {
    1 + PHASE_THRESHOLDS.iter().filter(|&&t| fraction <= t).count() as u32
}

/// Parameters for a phase number; out-of-range values clamp
pub fn phase_params(phase: u32) -> PhaseParams {
    let idx = (phase.max(1) as usize - 1).min(PHASES.len() - 1);
    PHASES[idx]
}

// Attack pattern tuning
const HOMING_SPEED: f32 = 5.0;
const HOMING_DAMAGE: f32 = 15.0;
const HOMING_LIFE: u32 = 180;
const SPREAD_COUNT: usize = 5;
const SPREAD_STEP: f32 = 0.4;
const SPREAD_SPEED: f32 = 8.0;
const SPREAD_DAMAGE: f32 = 12.0;
const SPREAD_LIFE: u32 = 120;
const SWEEP_Y: f32 = 560.0;
const SWEEP_SPEED: f32 = 6.0;
const SWEEP_SIZE: Vec2 = Vec2::new(60.0, 40.0);
const SWEEP_DAMAGE: f32 = 20.0;
const SWEEP_LIFE: u32 = 150;
const RING_COUNT: usize = 8;
const RING_SPEED: f32 = 6.0;
const RING_DAMAGE: f32 = 10.0;
const RING_LIFE: u32 = 120;
const PROJECTILE_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    Homing,
    Spread,
    Sweep,
    Ring,
}

impl AttackPattern {
    pub const ALL: [AttackPattern; 4] = [Self::Homing, Self::Spread, Self::Sweep, Self::Ring];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackState {
    Idle,
    /// Winding up `current_attack`
    Charging,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Re-aims at the player every tick
    Homing { speed: f32 },
    Bolt { vel: Vec2 },
    /// Wide ground wave
    Sweep { vel: Vec2, size: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub kind: ProjectileKind,
    pub damage: f32,
    pub life: u32,
}

impl Projectile {
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            ProjectileKind::Sweep { size, .. } => Rect::centered(self.pos, size.x, size.y),
            _ => Rect::centered(self.pos, PROJECTILE_SIZE, PROJECTILE_SIZE),
        }
    }

    fn advance(&mut self, target: Vec2, delta: f32) {
        match self.kind {
            ProjectileKind::Homing { speed } => {
                self.pos += (target - self.pos).normalize_or_zero() * speed * delta;
            }
            ProjectileKind::Bolt { vel } | ProjectileKind::Sweep { vel, .. } => {
                self.pos += vel * delta;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    /// Top-left corner
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub active: bool,
    /// 1-4
    pub phase: u32,
    pub attack_state: AttackState,
    pub current_attack: Option<AttackPattern>,
    pub attack_timer: u32,
    /// 1 facing right, -1 facing left
    pub direction: f32,
    pub hit_flash: u32,
    pub projectiles: Vec<Projectile>,
    pub defeated: bool,
    /// Ticks left before a defeat turns into victory
    pub fanfare_timer: u32,
    next_projectile_id: u32,
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    /// Dormant boss at the far end of the arena
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(TOTAL_ZONES as f32 * ZONE_WIDTH + 500.0, BOSS_SPAWN_Y),
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            active: false,
            phase: 1,
            attack_state: AttackState::Idle,
            current_attack: None,
            attack_timer: 0,
            direction: -1.0,
            hit_flash: 0,
            projectiles: Vec::new(),
            defeated: false,
            fanfare_timer: 0,
            next_projectile_id: 1,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BOSS_WIDTH, BOSS_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(BOSS_WIDTH, BOSS_HEIGHT) / 2.0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    /// True while the boss still needs ticking
    pub fn is_running(&self) -> bool {
        self.active && (!self.defeated || self.fanfare_timer > 0)
    }

    fn spawn(&mut self, pos: Vec2, kind: ProjectileKind, damage: f32, life: u32) {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile {
            id,
            pos,
            kind,
            damage,
            life,
        });
    }

    fn fire(&mut self, pattern: AttackPattern) {
        let center = self.center();
        match pattern {
            AttackPattern::Homing => {
                for i in 0..2 {
                    let pos = Vec2::new(center.x, center.y + i as f32 * 30.0 - 15.0);
                    self.spawn(
                        pos,
                        ProjectileKind::Homing {
                            speed: HOMING_SPEED,
                        },
                        HOMING_DAMAGE,
                        HOMING_LIFE,
                    );
                }
            }
            AttackPattern::Spread => {
                let base = if self.direction > 0.0 { 0.0 } else { PI };
                for i in 0..SPREAD_COUNT {
                    let angle = (i as f32 - 2.0) / 2.0 * SPREAD_STEP + base;
                    let vel = Vec2::from_angle(angle) * SPREAD_SPEED;
                    self.spawn(center, ProjectileKind::Bolt { vel }, SPREAD_DAMAGE, SPREAD_LIFE);
                }
            }
            AttackPattern::Sweep => {
                let vel = Vec2::new(self.direction * SWEEP_SPEED, 0.0);
                self.spawn(
                    Vec2::new(center.x, SWEEP_Y),
                    ProjectileKind::Sweep {
                        vel,
                        size: SWEEP_SIZE,
                    },
                    SWEEP_DAMAGE,
                    SWEEP_LIFE,
                );
            }
            AttackPattern::Ring => {
                for i in 0..RING_COUNT {
                    let angle = i as f32 / RING_COUNT as f32 * TAU;
                    let vel = Vec2::from_angle(angle) * RING_SPEED;
                    self.spawn(center, ProjectileKind::Bolt { vel }, RING_DAMAGE, RING_LIFE);
                }
            }
        }
    }
}

/// Advance the boss one tick; returns true on the tick the run is won
pub fn update_boss(
    boss: &mut Boss,
    player: &mut PlayerState,
    weapon: &mut WeaponState,
    rng: &mut Pcg32,
    delta: f32,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) -> bool {
    if !boss.active {
        return false;
    }

    if boss.defeated {
        if boss.fanfare_timer == 0 {
            return false;
        }
        boss.fanfare_timer -= 1;
        if boss.fanfare_timer > 0 {
            return false;
        }
        events.sound(SoundEffect::Victory);
        events.music(MusicCue::Stop);
        return true;
    }

    // Phase first, so this tick moves and attacks with the right row
    let phase = phase_for(boss.health_fraction());
    if phase > boss.phase {
        feedback.engage_slow_motion(PHASE_SLOW_MOTION);
        feedback.add_trauma(0.5);
        feedback.flash(0.8, colors::PHASE_CHANGE);
        log::info!("Boss enters phase {} at {} health", phase, boss.health);
        boss.phase = phase;
    }
    let params = phase_params(boss.phase);

    boss.hit_flash = boss.hit_flash.saturating_sub(1);
    boss.attack_timer += 1;

    let target = player.center();
    let dx = target.x - boss.center().x;
    if dx.abs() > BOSS_APPROACH_DISTANCE {
        boss.pos.x += dx.signum() * params.speed * delta;
    }
    boss.direction = if target.x > boss.center().x { 1.0 } else { -1.0 };

    match boss.attack_state {
        AttackState::Idle if boss.attack_timer >= params.attack_interval => {
            let pattern = AttackPattern::ALL[rng.random_range(0..AttackPattern::ALL.len())];
            boss.current_attack = Some(pattern);
            boss.attack_state = AttackState::Charging;
            boss.attack_timer = 0;
        }
        AttackState::Charging if boss.attack_timer >= BOSS_CHARGE_TICKS => {
            if let Some(pattern) = boss.current_attack.take() {
                boss.fire(pattern);
            }
            boss.attack_state = AttackState::Idle;
            boss.attack_timer = 0;
        }
        _ => {}
    }

    update_projectiles(boss, player, delta, feedback, events);

    if player.rect().intersects(&boss.rect()) {
        apply_damage(player, feedback, events, DamageSource::BossContact);
    }

    if weapon.strike(TargetId::Boss, &boss.rect()) {
        boss.health = (boss.health - weapon.damage()).max(0.0);
        boss.hit_flash = BOSS_HIT_FLASH;
        weapon.returning = true;
        events.particle(ParticleKind::Hit, weapon.pos, colors::BOSS_HIT_SPARK, 1.0);
        events.sound(SoundEffect::BossHit);
        feedback.request_hit_stop(if weapon.charged { 8 } else { 5 });
        feedback.add_trauma(0.3);

        if boss.health <= 0.0 {
            boss.defeated = true;
            boss.fanfare_timer = BOSS_FANFARE_TICKS;
            boss.projectiles.clear();
            boss.attack_state = AttackState::Idle;
            boss.current_attack = None;
            events.particle(ParticleKind::Death, boss.center(), colors::BOSS_CONTACT, 2.0);
            events.sound(SoundEffect::BossDeath);
            feedback.add_trauma(0.6);
            log::info!("Boss defeated");
        }
    }

    false
}

fn update_projectiles(
    boss: &mut Boss,
    player: &mut PlayerState,
    delta: f32,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) {
    let target = player.center();
    for projectile in boss.projectiles.iter_mut() {
        projectile.life = projectile.life.saturating_sub(1);
        projectile.advance(target, delta);

        if player.invincible == 0 && projectile.hitbox().intersects(&player.rect()) {
            apply_damage(
                player,
                feedback,
                events,
                DamageSource::BossProjectile {
                    damage: projectile.damage,
                },
            );
            projectile.life = 0;
        }
    }
    boss.projectiles.retain(|p| p.life > 0);
}
