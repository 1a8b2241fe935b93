//! Returning weapon: charge, throw, flight and catch

use glam::Vec2;

use super::collision::{Circle, Rect, circle_rect_intersect};
use super::combat::weapon_damage;
use super::events::{FrameEvents, ParticleKind, SoundEffect};
use super::feedback::colors;
use super::layout::Platform;
use super::state::{PlayerState, TargetId, WeaponState};
use crate::consts::*;

impl WeaponState {
    /// Damage dealt by the current throw
    #[inline]
    pub fn damage(&self) -> f32 {
        weapon_damage(self.charged)
    }

    pub fn hitbox(&self) -> Circle {
        Circle::new(self.pos, WEAPON_RADIUS)
    }

    /// Check the weapon against a target
    ///
    /// Returns true only on the first tick of an overlap. The target stays in
    /// `contacts` until the overlap ends, so a slow pass through a large body
    /// lands a single hit.
    pub fn strike(&mut self, target: TargetId, rect: &Rect) -> bool {
        let overlapping = self.active && circle_rect_intersect(&self.hitbox(), rect);
        let known = self.contacts.contains(&target);
        match (overlapping, known) {
            (true, false) => {
                self.contacts.push(target);
                true
            }
            (false, true) => {
                self.contacts.retain(|t| *t != target);
                false
            }
            _ => false,
        }
    }

    fn throw(&mut self, aim: Vec2, from: Vec2, facing_right: bool, events: &mut FrameEvents) {
        let mut dir = (aim - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            // Aiming at the player's own center throws straight ahead
            dir = Vec2::new(if facing_right { 1.0 } else { -1.0 }, 0.0);
        }

        self.charged = self.charge_level >= WEAPON_CHARGED_THRESHOLD;
        let speed = if self.charged {
            WEAPON_CHARGED_SPEED
        } else {
            WEAPON_SPEED
        };

        self.active = true;
        self.charging = false;
        self.returning = false;
        self.pos = from;
        self.origin = from;
        self.vel = dir * speed;
        self.distance_traveled = 0.0;
        self.rotation = 0.0;
        self.contacts.clear();
        events.sound(SoundEffect::Throw);
        log::debug!(
            "Weapon thrown at charge {:.2} (charged: {})",
            self.charge_level,
            self.charged
        );
    }

    fn catch(&mut self, events: &mut FrameEvents) {
        self.active = false;
        self.returning = false;
        self.vel = Vec2::ZERO;
        self.contacts.clear();
        events.sound(SoundEffect::Catch);
    }
}

/// Advance the weapon one tick
///
/// Reads the player after this tick's movement.
pub fn update_weapon(
    weapon: &mut WeaponState,
    trigger_held: bool,
    aim: Vec2,
    player: &PlayerState,
    platforms: &[Platform],
    delta: f32,
    events: &mut FrameEvents,
) {
    let player_center = player.center();
    if trigger_held && !weapon.active {
        if weapon.charging {
            weapon.charge_level = (weapon.charge_level + 1.0 / WEAPON_CHARGE_TICKS).min(1.0);
        } else {
            weapon.charging = true;
            weapon.charge_level = 0.0;
        }
    }

    if !trigger_held && weapon.charging {
        weapon.throw(aim, player_center, player.facing_right, events);
    }

    if !weapon.active {
        return;
    }

    weapon.rotation = (weapon.rotation + WEAPON_SPIN) % 360.0;

    if weapon.returning {
        let to_player = player_center - weapon.pos;
        if to_player.length() < WEAPON_CATCH_RADIUS {
            weapon.catch(events);
            return;
        }
        weapon.vel = to_player.normalize_or_zero() * WEAPON_RETURN_SPEED;
    }

    let step = weapon.vel * delta;
    weapon.pos += step;

    if !weapon.returning {
        weapon.distance_traveled += step.length();
        let hitbox = weapon.hitbox();
        if weapon.distance_traveled >= WEAPON_MAX_DISTANCE
            || platforms
                .iter()
                .any(|p| p.kind.blocks_weapon() && circle_rect_intersect(&hitbox, &p.rect))
        {
            weapon.returning = true;
        }
    }

    let trail = if weapon.charged {
        colors::WEAPON_TRAIL_CHARGED
    } else {
        colors::WEAPON_TRAIL
    };
    events.particle(ParticleKind::WeaponTrail, weapon.pos, trail, 1.0);
}
