//! Player kinematic controller
//!
//! One call advances the player a single tick: horizontal easing, the jump
//! state machine (buffer, coyote, anticipation, air and wall jumps, early
//! release cut), dash, wall slide, gravity, platform resolution and the
//! cosmetic squash/stretch and cape spring the renderer reads.

use glam::Vec2;

use super::combat::{DamageSource, apply_damage};
use super::events::{FrameEvents, ParticleKind, SoundEffect};
use super::feedback::{FeedbackState, colors};
use super::layout::{Platform, PlatformKind};
use super::state::PlayerState;
use super::tick::TickInput;
use crate::consts::*;
use crate::ease_out_cubic;

/// Advance the player by one tick
pub fn update_player(
    player: &mut PlayerState,
    input: &TickInput,
    platforms: &[Platform],
    delta: f32,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) {
    player.animation_frame = player.animation_frame.wrapping_add(1);
    let move_axis = input.move_axis();

    if !player.dashing {
        update_horizontal(player, move_axis);
    }
    player.speed_boost = player.speed_boost.saturating_sub(1);

    update_footsteps(player, events);
    update_dash(player, input.dash, events);

    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);
    player.invincible = player.invincible.saturating_sub(1);

    update_jump(player, input.jump, events);

    // Gravity (dash suspends it)
    if !player.dashing {
        player.vel.y = (player.vel.y + GRAVITY * delta).min(MAX_FALL_SPEED);
    }

    update_wall_slide(player, move_axis, platforms, events);

    player.pos += player.vel * delta;

    let impact_vy = player.vel.y;
    resolve_platforms(player, platforms, feedback, events);
    keep_in_world(player, feedback, events);
    detect_landing(player, impact_vy, feedback, events);

    update_squash_stretch(player);
    update_cape(player);
}

fn update_horizontal(player: &mut PlayerState, move_axis: f32) {
    let multiplier = if player.speed_boost > 0 {
        SPEED_BOOST_MULTIPLIER
    } else {
        1.0
    };
    let target_speed = move_axis * PLAYER_SPEED * multiplier;

    let speed_factor = if move_axis != 0.0 {
        player.accel_progress = (player.accel_progress + ACCEL_STEP).min(1.0);
        player.decel_progress = 0.0;
        player.facing_right = move_axis > 0.0;
        ease_out_cubic(player.accel_progress)
    } else {
        player.decel_progress = (player.decel_progress + DECEL_STEP).min(1.0);
        player.accel_progress = (player.accel_progress - ACCEL_STEP).max(0.0);
        1.0 - ease_out_cubic(player.decel_progress)
    };

    player.vel.x = target_speed * speed_factor;
    // Lean into movement
    player.body_tilt = player.vel.x / PLAYER_SPEED * 5.0;
}

fn update_footsteps(player: &mut PlayerState, events: &mut FrameEvents) {
    if player.grounded && player.vel.x.abs() > 2.0 && !player.dashing {
        player.footstep_counter += 1;
        if player.footstep_counter >= FOOTSTEP_INTERVAL {
            player.footstep_counter = 0;
            events.particle(
                ParticleKind::Footstep {
                    facing_right: player.facing_right,
                },
                player.feet(),
                colors::FOOTSTEP_DUST,
                1.0,
            );
        }
    } else {
        player.footstep_counter = 0;
    }
}

fn update_dash(player: &mut PlayerState, dash_held: bool, events: &mut FrameEvents) {
    let dash_pressed = dash_held && !player.dash_was_held;
    player.dash_was_held = dash_held;

    if dash_pressed && player.dash_cooldown == 0 && !player.dashing {
        player.dashing = true;
        player.dash_timer = DASH_DURATION;
        player.vel.x = if player.facing_right { DASH_SPEED } else { -DASH_SPEED };
        player.invincible = player.invincible.max(DASH_DURATION);
        events.sound(SoundEffect::Dash);
        events.particle(
            ParticleKind::DashBurst {
                facing_right: player.facing_right,
            },
            player.center(),
            colors::DASH_BURST,
            1.0,
        );
    }

    if player.dashing {
        player.dash_timer = player.dash_timer.saturating_sub(1);
        if player.dash_timer % 2 == 0 {
            events.particle(
                ParticleKind::DashTrail,
                player.center(),
                colors::DASH_TRAIL,
                1.0,
            );
        }
        if player.dash_timer == 0 {
            player.dashing = false;
            player.dash_cooldown = DASH_COOLDOWN;
        }
    }
}

fn update_jump(player: &mut PlayerState, jump_held: bool, events: &mut FrameEvents) {
    if player.grounded {
        player.coyote_timer = COYOTE_TICKS;
    } else {
        player.coyote_timer = player.coyote_timer.saturating_sub(1);
    }
    player.jump_buffer_timer = player.jump_buffer_timer.saturating_sub(1);

    if jump_held && !player.jump_was_held {
        player.jump_buffer_timer = JUMP_BUFFER_TICKS;
    }

    // A crouch in progress owns the jump until it fires
    if player.jump_buffer_timer > 0 && player.jump_anticipation == 0 {
        if player.grounded || player.coyote_timer > 0 {
            player.jump_anticipation = JUMP_ANTICIPATION_TICKS;
            player.jump_buffer_timer = 0;
        } else if player.wall_sliding {
            player.vel.y = -WALL_JUMP_FORCE_Y;
            player.vel.x = -f32::from(player.wall_direction) * WALL_JUMP_FORCE_X;
            player.facing_right = player.wall_direction < 0;
            player.wall_sliding = false;
            player.jumps_remaining = player.jump_level;
            begin_ascent(player, events);
        } else if player.jumps_remaining > 0 {
            player.vel.y = -PLAYER_JUMP_FORCE * AIR_JUMP_FACTOR;
            player.jumps_remaining -= 1;
            begin_ascent(player, events);
        }
    }

    if player.jump_anticipation > 0 {
        player.jump_anticipation -= 1;
        if player.jump_anticipation == 0 {
            player.vel.y = -PLAYER_JUMP_FORCE * GROUND_JUMP_BOOST;
            player.grounded = false;
            player.jumps_remaining = player.jump_level.saturating_sub(1);
            player.coyote_timer = 0;
            begin_ascent(player, events);
        }
    }

    // Variable height: an early release halves the ascent once
    if jump_held && player.jumping && player.vel.y < 0.0 {
        player.jump_hold_time += 1;
    } else if !jump_held
        && player.jumping
        && player.vel.y < 0.0
        && player.jump_hold_time < JUMP_HOLD_THRESHOLD
        && !player.jump_cut_applied
    {
        player.vel.y *= JUMP_CUT_FACTOR;
        player.jump_cut_applied = true;
    }

    player.jump_was_held = jump_held;
}

/// Shared bookkeeping for every jump impulse
fn begin_ascent(player: &mut PlayerState, events: &mut FrameEvents) {
    player.jumping = true;
    player.jump_buffer_timer = 0;
    player.jump_hold_time = 0;
    player.jump_cut_applied = false;
    events.sound(SoundEffect::Jump);
    events.particle(
        ParticleKind::Jump {
            facing_right: player.facing_right,
        },
        player.feet(),
        colors::JUMP_DUST,
        1.0,
    );
}

fn update_wall_slide(
    player: &mut PlayerState,
    move_axis: f32,
    platforms: &[Platform],
    events: &mut FrameEvents,
) {
    player.wall_sliding = false;
    if player.grounded || player.vel.y <= 0.0 {
        return;
    }

    let left = player.pos.x;
    let right = player.pos.x + PLAYER_WIDTH;
    for wall in platforms.iter().filter(|p| p.kind == PlatformKind::Wall) {
        let r = &wall.rect;
        let beside = player.pos.y + PLAYER_HEIGHT > r.y && player.pos.y < r.bottom();
        if !beside {
            continue;
        }
        // Wall face on our left
        if left <= r.right() && left >= r.right() - WALL_CONTACT_BAND && move_axis < 0.0 {
            player.wall_sliding = true;
            player.wall_direction = -1;
        }
        // Wall face on our right
        if right >= r.x && right <= r.x + WALL_CONTACT_BAND && move_axis > 0.0 {
            player.wall_sliding = true;
            player.wall_direction = 1;
        }
    }

    if player.wall_sliding {
        player.vel.y = player.vel.y.min(WALL_SLIDE_SPEED);
        player.jumps_remaining = player.jump_level;

        if player.animation_frame % 3 == 0 {
            let wall_x = if player.wall_direction == 1 { right } else { left };
            events.particle(
                ParticleKind::WallSlide {
                    facing_right: player.wall_direction == 1,
                },
                Vec2::new(wall_x, player.pos.y + PLAYER_HEIGHT / 2.0),
                colors::FOOTSTEP_DUST,
                1.0,
            );
        }
    }
}

fn resolve_platforms(
    player: &mut PlayerState,
    platforms: &[Platform],
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) {
    player.grounded = false;

    for platform in platforms {
        let r = &platform.rect;
        match platform.kind {
            PlatformKind::Hazard => {
                if player.rect().intersects(r) {
                    apply_damage(player, feedback, events, DamageSource::Hazard);
                }
            }
            PlatformKind::Wall => {
                if player.rect().intersects(r) {
                    if player.vel.x > 0.0 {
                        player.pos.x = r.x - PLAYER_WIDTH;
                    } else if player.vel.x < 0.0 {
                        player.pos.x = r.right();
                    }
                    player.vel.x = 0.0;
                }
            }
            _ => {
                let foot = player.pos.y + PLAYER_HEIGHT;
                if player.vel.y >= 0.0
                    && player.pos.x + PLAYER_WIDTH > r.x
                    && player.pos.x < r.right()
                    && foot >= r.y
                    && foot <= r.bottom() + LANDING_TOLERANCE
                {
                    player.pos.y = r.y - PLAYER_HEIGHT;
                    player.vel.y = 0.0;
                    player.grounded = true;
                    player.jumping = false;
                    player.jumps_remaining = player.jump_level;
                }
            }
        }
    }
}

/// Clamp to the left edge; falling out of the world respawns at the top
fn keep_in_world(player: &mut PlayerState, feedback: &mut FeedbackState, events: &mut FrameEvents) {
    player.pos.x = player.pos.x.max(0.0);

    if player.pos.y > GAME_HEIGHT {
        player.pos.y = PLAYER_RESPAWN_Y;
        player.vel.y = 0.0;
        apply_damage(player, feedback, events, DamageSource::Fall);
        log::debug!("Player fell out of the world, health {}", player.health);
    }
}

fn detect_landing(
    player: &mut PlayerState,
    impact_vy: f32,
    feedback: &mut FeedbackState,
    events: &mut FrameEvents,
) {
    if player.grounded && !player.was_grounded {
        player.landing_squash = 1.0;
        let intensity = (impact_vy.abs() / PLAYER_JUMP_FORCE).min(2.0);
        events.particle(
            ParticleKind::Landing,
            player.feet(),
            colors::LANDING_DUST,
            intensity,
        );
        if intensity > 0.5 {
            feedback.add_trauma(intensity * 0.15);
        }
    }
    player.was_grounded = player.grounded;
    player.landing_squash = (player.landing_squash - 0.08).max(0.0);
}

fn update_squash_stretch(player: &mut PlayerState) {
    let (scale_x, scale_y) = if player.jump_anticipation > 0 {
        // Crouch, deepest at the start
        let squash = player.jump_anticipation as f32 / JUMP_ANTICIPATION_TICKS as f32 * 0.25;
        (1.0 + squash * 0.5, 1.0 - squash)
    } else if player.landing_squash > 0.0 {
        let squash = player.landing_squash * 0.2;
        (1.0 + squash * 0.6, 1.0 - squash)
    } else if player.dashing {
        (1.25, 0.85)
    } else if player.vel.y > 8.0 {
        let stretch = ((player.vel.y - 8.0) / 12.0).min(0.15);
        (1.0 - stretch * 0.3, 1.0 + stretch)
    } else {
        (1.0, 1.0)
    };
    player.scale_x = scale_x;
    player.scale_y = scale_y;
}

/// Damped spring trailing opposite to movement
fn update_cape(player: &mut PlayerState) {
    let target = -player.vel.x * 2.0;
    player.cape_velocity += (target - player.cape_offset) * 0.15;
    player.cape_velocity *= 0.85;
    player.cape_offset += player.cape_velocity;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<Platform> {
        vec![Platform::new(0.0, 600.0, 2000.0, 75.0, PlatformKind::Ground)]
    }

    fn step(player: &mut PlayerState, input: &TickInput, platforms: &[Platform]) -> FrameEvents {
        let mut feedback = FeedbackState::default();
        let mut events = FrameEvents::new();
        update_player(player, input, platforms, 1.0, &mut feedback, &mut events);
        events
    }

    /// Player standing on the floor after settling
    fn grounded_player(platforms: &[Platform]) -> PlayerState {
        let mut player = PlayerState::new();
        player.pos = Vec2::new(200.0, 600.0 - PLAYER_HEIGHT);
        step(&mut player, &TickInput::default(), platforms);
        assert!(player.grounded);
        player
    }

    fn hold_jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ground_jump_waits_for_anticipation() {
        let platforms = floor();
        let mut player = grounded_player(&platforms);

        for _ in 0..3 {
            let events = step(&mut player, &hold_jump(), &platforms);
            assert!(!events.has_sound(SoundEffect::Jump));
            assert!(player.grounded);
            assert!(player.scale_y < 1.0);
        }
        let events = step(&mut player, &hold_jump(), &platforms);
        assert!(events.has_sound(SoundEffect::Jump));
        assert!(player.jumping);
        // Impulse plus one tick of gravity
        assert!((player.vel.y - (-PLAYER_JUMP_FORCE * GROUND_JUMP_BOOST + GRAVITY)).abs() < 1e-4);
        assert_eq!(player.jumps_remaining, 0);
    }

    #[test]
    fn test_jump_buffer_fires_on_landing() {
        let platforms = floor();
        let mut player = PlayerState::new();
        // Falling just above the floor with no air jumps left
        player.pos = Vec2::new(200.0, 600.0 - PLAYER_HEIGHT - 20.0);
        player.vel.y = 10.0;
        player.jumps_remaining = 0;
        player.coyote_timer = 0;

        // Press one tick before touching down
        step(&mut player, &hold_jump(), &platforms);
        assert!(!player.grounded);
        assert!(player.jump_buffer_timer > 0);

        step(&mut player, &hold_jump(), &platforms);
        assert!(player.grounded);

        // Buffer converts into a crouch on the first grounded tick
        step(&mut player, &hold_jump(), &platforms);
        assert_eq!(player.jump_buffer_timer, 0);
        assert!(player.jump_anticipation > 0);

        let mut jumped = false;
        for _ in 0..JUMP_ANTICIPATION_TICKS {
            let events = step(&mut player, &hold_jump(), &platforms);
            jumped |= events.has_sound(SoundEffect::Jump);
        }
        assert!(jumped);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_coyote_jump_matches_ground_jump() {
        // Ledge ends at x = 300
        let platforms = vec![Platform::new(0.0, 600.0, 300.0, 75.0, PlatformKind::Stone)];
        let mut player = PlayerState::new();
        player.pos = Vec2::new(262.0, 600.0 - PLAYER_HEIGHT);
        player.jumps_remaining = 0;
        step(&mut player, &TickInput::default(), &platforms);
        assert!(player.grounded);

        // Walk off the edge
        let walk = TickInput {
            right: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while player.grounded {
            step(&mut player, &walk, &platforms);
            ticks += 1;
            assert!(ticks < 60);
        }
        assert!(player.coyote_timer > 0);
        player.jumps_remaining = 0;

        let jump = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        let mut impulse = None;
        for _ in 0..(JUMP_ANTICIPATION_TICKS + 1) {
            let events = step(&mut player, &jump, &platforms);
            if events.has_sound(SoundEffect::Jump) {
                // Undo this tick's gravity to recover the raw impulse
                impulse = Some(player.vel.y - GRAVITY);
            }
        }
        let impulse = impulse.expect("coyote jump should fire");
        assert!((impulse - (-PLAYER_JUMP_FORCE * GROUND_JUMP_BOOST)).abs() < 1e-4);
    }

    /// Fire a ground jump and return the player mid-ascent
    fn launched_player(platforms: &[Platform]) -> PlayerState {
        let mut player = grounded_player(platforms);
        while !player.jumping {
            step(&mut player, &hold_jump(), platforms);
        }
        player
    }

    #[test]
    fn test_early_release_halves_ascent_once() {
        let platforms = floor();
        let mut player = launched_player(&platforms);
        while player.jump_hold_time < 3 {
            step(&mut player, &hold_jump(), &platforms);
        }
        let vy_at_release = player.vel.y;
        assert!(vy_at_release < 0.0);

        step(&mut player, &TickInput::default(), &platforms);
        assert!(-player.vel.y <= 0.5 * -vy_at_release);
        assert!(player.jump_cut_applied);

        // No further halving on later ticks
        let vy = player.vel.y;
        step(&mut player, &TickInput::default(), &platforms);
        if player.vel.y < 0.0 {
            assert!((player.vel.y - (vy + GRAVITY)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_late_release_keeps_velocity() {
        let platforms = floor();
        let mut player = launched_player(&platforms);
        while player.jump_hold_time < 15 {
            step(&mut player, &hold_jump(), &platforms);
        }
        let vy = player.vel.y;
        assert!(vy < 0.0);

        step(&mut player, &TickInput::default(), &platforms);
        assert!((player.vel.y - (vy + GRAVITY)).abs() < 1e-4);
        assert!(!player.jump_cut_applied);
    }

    #[test]
    fn test_dash_is_edge_triggered() {
        let platforms = floor();
        let mut player = grounded_player(&platforms);
        let dash = TickInput {
            dash: true,
            ..Default::default()
        };

        let events = step(&mut player, &dash, &platforms);
        assert!(events.has_sound(SoundEffect::Dash));
        assert!(player.dashing);
        assert!(player.invincible > 0);
        assert_eq!(player.vel.x, DASH_SPEED);

        // Holding through the dash and the cooldown never re-triggers
        for _ in 0..60 {
            let events = step(&mut player, &dash, &platforms);
            assert!(!events.has_sound(SoundEffect::Dash));
        }
        assert!(!player.dashing);
        assert_eq!(player.dash_cooldown, 0);
    }

    #[test]
    fn test_wall_slide_clamps_fall_and_refreshes_jumps() {
        let platforms = vec![
            floor()[0],
            Platform::new(300.0, 100.0, 40.0, 500.0, PlatformKind::Wall),
        ];
        let mut player = PlayerState::new();
        player.pos = Vec2::new(300.0 - PLAYER_WIDTH + 2.0, 200.0);
        player.vel.y = 8.0;
        player.jumps_remaining = 0;

        let hug = TickInput {
            right: true,
            ..Default::default()
        };
        step(&mut player, &hug, &platforms);
        assert!(player.wall_sliding);
        assert_eq!(player.wall_direction, 1);
        assert!(player.vel.y <= WALL_SLIDE_SPEED);
        assert_eq!(player.jumps_remaining, player.jump_level);

        // Wall jump kicks away from the wall
        let jump = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        let events = step(&mut player, &jump, &platforms);
        assert!(events.has_sound(SoundEffect::Jump));
        assert!(!player.facing_right);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_hazard_damage_and_knockback() {
        let platforms = vec![Platform::new(0.0, 500.0, 400.0, 20.0, PlatformKind::Hazard)];
        let mut player = PlayerState::new();
        player.pos = Vec2::new(100.0, 460.0);
        step(&mut player, &TickInput::default(), &platforms);
        assert_eq!(player.health, 80.0);
        assert_eq!(player.invincible, INVINCIBILITY_FRAMES);
        assert_eq!(player.vel.y, HAZARD_KNOCKBACK);
    }

    #[test]
    fn test_fall_respawns_at_top() {
        let mut player = PlayerState::new();
        player.pos = Vec2::new(100.0, GAME_HEIGHT - 1.0);
        player.vel.y = 10.0;
        step(&mut player, &TickInput::default(), &[]);
        assert_eq!(player.pos.y, PLAYER_RESPAWN_Y);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - FALL_DAMAGE);

        // Invincible players still respawn but take no damage
        player.pos.y = GAME_HEIGHT - 1.0;
        player.vel.y = 10.0;
        step(&mut player, &TickInput::default(), &[]);
        assert_eq!(player.pos.y, PLAYER_RESPAWN_Y);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - FALL_DAMAGE);
    }

    #[test]
    fn test_hard_landing_adds_trauma() {
        let platforms = floor();
        let mut player = PlayerState::new();
        player.pos = Vec2::new(200.0, 600.0 - PLAYER_HEIGHT - 5.0);
        player.vel.y = MAX_FALL_SPEED;

        let mut feedback = FeedbackState::default();
        let mut events = FrameEvents::new();
        update_player(
            &mut player,
            &TickInput::default(),
            &platforms,
            1.0,
            &mut feedback,
            &mut events,
        );
        assert!(player.grounded);
        assert!(feedback.trauma > 0.0);
        assert!(
            events
                .particles
                .iter()
                .any(|p| p.kind == ParticleKind::Landing && p.intensity > 0.5)
        );
    }

    #[test]
    fn test_acceleration_eases_in() {
        let platforms = floor();
        let mut player = grounded_player(&platforms);
        let run = TickInput {
            right: true,
            ..Default::default()
        };
        step(&mut player, &run, &platforms);
        let first = player.vel.x;
        for _ in 0..10 {
            step(&mut player, &run, &platforms);
        }
        assert!(first > 0.0 && first < PLAYER_SPEED);
        assert!((player.vel.x - PLAYER_SPEED).abs() < 1e-4);
        assert!(player.facing_right);
    }

    #[test]
    fn test_air_jumps_are_instant_and_counted() {
        let platforms = floor();
        let mut player = PlayerState::new();
        player.pos = Vec2::new(200.0, 200.0);
        player.jump_level = 3;
        player.jumps_remaining = 2;

        let events = step(&mut player, &hold_jump(), &platforms);
        assert!(events.has_sound(SoundEffect::Jump));
        assert_eq!(player.jump_anticipation, 0);
        assert!((player.vel.y - (-PLAYER_JUMP_FORCE * AIR_JUMP_FACTOR + GRAVITY)).abs() < 1e-4);
        assert_eq!(player.jumps_remaining, 1);

        step(&mut player, &TickInput::default(), &platforms);
        let events = step(&mut player, &hold_jump(), &platforms);
        assert!(events.has_sound(SoundEffect::Jump));
        assert_eq!(player.jumps_remaining, 0);

        // Out of air jumps: a fresh press does nothing
        step(&mut player, &TickInput::default(), &platforms);
        let events = step(&mut player, &hold_jump(), &platforms);
        assert!(!events.has_sound(SoundEffect::Jump));
        assert_eq!(player.jumps_remaining, 0);
    }

    #[test]
    fn test_speed_boost_raises_top_speed() {
        let platforms = floor();
        let mut player = grounded_player(&platforms);
        player.speed_boost = 100;
        let run = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..11 {
            step(&mut player, &run, &platforms);
        }
        assert!((player.vel.x - PLAYER_SPEED * SPEED_BOOST_MULTIPLIER).abs() < 1e-4);

        player.speed_boost = 0;
        step(&mut player, &run, &platforms);
        assert!((player.vel.x - PLAYER_SPEED).abs() < 1e-4);
    }
}
