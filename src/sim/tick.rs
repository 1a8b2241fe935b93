//! Frame orchestrator
//!
//! Advances the whole run once per rendered frame. Subsystems run in a fixed
//! order (player, weapon, enemies, boss, combat bookkeeping, feedback decay,
//! camera and zones) and each one reads the state the previous ones just wrote.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::update_boss;
use super::combat::{DamageSource, apply_damage, strike_enemy, update_powerups};
use super::events::{FrameEvents, MusicCue, ParticleKind};
use super::feedback::colors;
use super::player::update_player;
use super::state::{GamePhase, RunState, TargetId};
use super::weapon::update_weapon;
use crate::consts::*;
use crate::settings::Settings;
use crate::{lerp, tick_noise};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key held
    pub jump: bool,
    /// Dash key held
    pub dash: bool,
    /// Weapon trigger held
    pub trigger: bool,
    /// Aim point in world space
    pub aim: Vec2,
}

impl TickInput {
    /// Horizontal intent: -1, 0 or 1
    pub fn move_axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Normalize a frame duration to 60 fps ticks
pub fn frame_delta(frame_ms: f32) -> f32 {
    if !frame_ms.is_finite() {
        return 0.0;
    }
    frame_ms.clamp(0.0, MAX_FRAME_MS) / REFERENCE_FRAME_MS
}

/// Advance the run by one frame and return what the host should present
pub fn tick(
    state: &mut RunState,
    input: &TickInput,
    frame_ms: f32,
    settings: &Settings,
) -> FrameEvents {
    let mut events = FrameEvents::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.frame_count += 1;
    if state.frame_count % FRAMES_PER_SECOND == 0 {
        state.game_time += 1;
    }

    // Freeze-frame: only the feedback layer moves
    if state.feedback.is_frozen() {
        state.feedback.tick_hit_stop();
        state.feedback.decay();
        return events;
    }

    let delta = frame_delta(frame_ms) * state.feedback.slow_motion;

    update_player(
        &mut state.player,
        input,
        &state.layout.platforms,
        delta,
        &mut state.feedback,
        &mut events,
    );
    update_weapon(
        &mut state.weapon,
        input.trigger,
        input.aim,
        &state.player,
        &state.layout.platforms,
        delta,
        &mut events,
    );
    update_enemies(state, delta, &mut events);

    if state.boss.is_running() {
        let won = update_boss(
            &mut state.boss,
            &mut state.player,
            &mut state.weapon,
            &mut state.rng,
            delta,
            &mut state.feedback,
            &mut events,
        );
        if won {
            state.phase = GamePhase::Victory;
            log::info!(
                "Victory! score {}, {}s played",
                state.score,
                state.game_time
            );
        }
    }

    state.tick_combo();
    update_powerups(
        &mut state.powerups,
        &mut state.player,
        &mut state.feedback,
        &mut events,
    );

    if settings.ambient_particles && state.frame_count % AMBIENT_PARTICLE_INTERVAL == 0 {
        spawn_ambient(state, &mut events);
    }

    state.feedback.decay();
    update_camera(state);
    update_zone(state, &mut events);

    // A slain boss has already decided the run
    if state.phase == GamePhase::Playing && !state.boss.defeated && state.player.health <= 0.0 {
        state.phase = GamePhase::GameOver;
        events.music(MusicCue::Stop);
        log::info!(
            "Game over in zone {} (score {}, frame {})",
            state.current_zone,
            state.score,
            state.frame_count
        );
    }

    events
}

fn update_enemies(state: &mut RunState, delta: f32, events: &mut FrameEvents) {
    let player_pos = state.player.pos;
    let mut kills = Vec::new();

    for enemy in state.enemies.iter_mut() {
        enemy.update(player_pos, &state.layout.platforms, delta);

        if state.weapon.strike(TargetId::Enemy(enemy.id), &enemy.rect()) {
            state.weapon.returning = true;
            if let Some(kill) =
                strike_enemy(enemy, state.weapon.charged, &mut state.feedback, events)
            {
                kills.push(kill);
            }
        }

        if !enemy.dead && enemy.rect().intersects(&state.player.rect()) {
            apply_damage(
                &mut state.player,
                &mut state.feedback,
                events,
                DamageSource::EnemyContact {
                    damage: enemy.damage,
                },
            );
        }
    }

    state.enemies.retain(|e| !e.dead);

    for kill in &kills {
        state.award_kill(kill, events);
        state.roll_powerup_drop(kill.center);
    }
}

fn spawn_ambient(state: &RunState, events: &mut FrameEvents) {
    let frame = state.frame_count;
    let x = state.camera_x + (tick_noise(frame, 11) * 0.5 + 0.5) * GAME_WIDTH;
    let y = (tick_noise(frame, 12) * 0.5 + 0.5) * GAME_HEIGHT;
    let zone = state.current_zone.min(BOSS_ZONE);
    events.particle(
        ParticleKind::Ambient { zone },
        Vec2::new(x, y),
        colors::AMBIENT[zone as usize],
        1.0,
    );
}

fn update_camera(state: &mut RunState) {
    let target = state.player.pos.x - GAME_WIDTH / 3.0;
    state.camera_x = lerp(state.camera_x, target, CAMERA_SMOOTHING).max(0.0);
}

fn update_zone(state: &mut RunState, events: &mut FrameEvents) {
    // The boss arena owns the zone once it wakes
    if !state.boss.active {
        let zone = (state.player.pos.x / ZONE_WIDTH).floor().max(0.0) as u32;
        if zone != state.current_zone && zone < TOTAL_ZONES {
            state.current_zone = zone;
            state.zone_transition.show(ZONE_NAMES[zone as usize]);
            events.music(MusicCue::Zone(zone));
            log::info!("Entered zone {}: {}", zone, ZONE_NAMES[zone as usize]);
        }
    }

    state.zone_transition.fade();

    if !state.boss.active && state.player.pos.x >= BOSS_TRIGGER_X {
        state.boss.active = true;
        state.current_zone = BOSS_ZONE;
        state.zone_transition.show(BOSS_ZONE_NAME);
        events.music(MusicCue::Zone(BOSS_ZONE));
        log::info!("The throne wakes at x = {}", state.player.pos.x);
    }
}
