//! Enemy archetypes and their per-tick behavior
//!
//! Each enemy advances itself from the player's position and the platform
//! list. Nothing here kills an enemy: `dead` is only ever set by combat.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::layout::{EnemySpawn, Platform};
use crate::consts::*;
use crate::normalize;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Skeleton,
    Bat,
    Zombie,
    Ghost,
    Demon,
    Hellhound,
    Wraith,
    Knight,
    Gargoyle,
}

/// Movement model shared by one or more archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Walks back and forth under gravity
    Ground,
    /// Sine-wave flier, ignores platforms
    Flier,
    /// Fades in and out, only drifts toward the player while visible
    Phasing,
    /// Seeks the player inside aggro range
    Chaser,
    /// Horizontal charge inside aggro range, under gravity
    Charger,
    /// Patrol, swoop, rise cycle
    Swooper,
}

impl EnemyKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "SKELETON" => Some(Self::Skeleton),
            "BAT" => Some(Self::Bat),
            "ZOMBIE" => Some(Self::Zombie),
            "GHOST" => Some(Self::Ghost),
            "DEMON" => Some(Self::Demon),
            "HELLHOUND" => Some(Self::Hellhound),
            "WRAITH" => Some(Self::Wraith),
            "KNIGHT" => Some(Self::Knight),
            "GARGOYLE" => Some(Self::Gargoyle),
            _ => None,
        }
    }

    pub fn behavior(&self) -> Behavior {
        match self {
            Self::Skeleton | Self::Zombie | Self::Knight => Behavior::Ground,
            Self::Bat => Behavior::Flier,
            Self::Ghost | Self::Wraith => Behavior::Phasing,
            Self::Demon => Behavior::Chaser,
            Self::Hellhound => Behavior::Charger,
            Self::Gargoyle => Behavior::Swooper,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            Self::Skeleton => Vec2::new(35.0, 50.0),
            Self::Bat => Vec2::new(30.0, 20.0),
            Self::Zombie => Vec2::new(40.0, 55.0),
            Self::Ghost => Vec2::new(35.0, 45.0),
            Self::Demon => Vec2::new(40.0, 40.0),
            Self::Hellhound => Vec2::new(50.0, 35.0),
            Self::Wraith => Vec2::new(35.0, 50.0),
            Self::Knight => Vec2::new(45.0, 60.0),
            Self::Gargoyle => Vec2::new(45.0, 45.0),
        }
    }

    pub fn max_health(&self) -> f32 {
        match self {
            Self::Skeleton => 40.0,
            Self::Bat => 20.0,
            Self::Zombie => 80.0,
            Self::Ghost => 30.0,
            Self::Demon => 60.0,
            Self::Hellhound => 50.0,
            Self::Wraith => 45.0,
            Self::Knight => 120.0,
            Self::Gargoyle => 70.0,
        }
    }

    /// Contact damage
    pub fn damage(&self) -> f32 {
        match self {
            Self::Skeleton => 10.0,
            Self::Bat => 5.0,
            Self::Zombie => 15.0,
            Self::Ghost => 12.0,
            Self::Demon => 18.0,
            Self::Hellhound => 20.0,
            Self::Wraith => 15.0,
            Self::Knight => 25.0,
            Self::Gargoyle => 20.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Self::Skeleton => 1.5,
            Self::Bat => 3.0,
            Self::Zombie => 1.0,
            Self::Ghost => 2.0,
            Self::Demon => 4.0,
            Self::Hellhound => 6.0,
            Self::Wraith => 2.5,
            Self::Knight => 1.2,
            Self::Gargoyle => 3.5,
        }
    }

    /// Base kill score before combo multiplier
    pub fn score(&self) -> u64 {
        match self {
            Self::Skeleton => 100,
            Self::Bat => 75,
            Self::Zombie => 150,
            Self::Ghost => 125,
            Self::Demon => 200,
            Self::Hellhound => 175,
            Self::Wraith => 200,
            Self::Knight => 250,
            Self::Gargoyle => 225,
        }
    }

    /// Body color (0xRRGGBB), also used for death particles
    pub fn color(&self) -> u32 {
        match self {
            Self::Skeleton => 0xd4c4a8,
            Self::Bat => 0x4a3728,
            Self::Zombie => 0x3d5c4a,
            Self::Ghost => 0x8fa4b8,
            Self::Demon => 0x8b2500,
            Self::Hellhound => 0x5c1a1a,
            Self::Wraith => 0x2d1b4e,
            Self::Knight => 0x4a4a5e,
            Self::Gargoyle => 0x5a5a6e,
        }
    }
}

/// Elite ("mini-boss") multipliers
pub const ELITE_HEALTH_MULTIPLIER: f32 = 3.0;
pub const ELITE_SIZE_MULTIPLIER: f32 = 1.5;
pub const ELITE_DAMAGE_MULTIPLIER: f32 = 1.5;
pub const ELITE_SCORE_MULTIPLIER: u64 = 5;

/// Archetype-specific behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMode {
    Patrol,
    Swoop,
    Rise,
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub score: u64,
    pub elite: bool,
    pub vel_y: f32,
    /// +1 right, -1 left
    pub direction: f32,
    pub mode: EnemyMode,
    pub state_timer: u32,
    pub animation_frame: f32,
    pub opacity: f32,
    pub phase_timer: f32,
    pub hit_flash: u32,
    pub dead: bool,
}

impl Enemy {
    pub fn spawn(id: u32, spawn: &EnemySpawn, facing_right: bool) -> Self {
        let kind = spawn.kind;
        let (size_mul, health_mul, damage_mul, score_mul) = if spawn.elite {
            (
                ELITE_SIZE_MULTIPLIER,
                ELITE_HEALTH_MULTIPLIER,
                ELITE_DAMAGE_MULTIPLIER,
                ELITE_SCORE_MULTIPLIER,
            )
        } else {
            (1.0, 1.0, 1.0, 1)
        };
        let health = kind.max_health() * health_mul;

        Self {
            id,
            kind,
            pos: Vec2::new(spawn.x, spawn.y),
            size: kind.size() * size_mul,
            health,
            max_health: health,
            damage: kind.damage() * damage_mul,
            speed: kind.speed(),
            score: kind.score() * score_mul,
            elite: spawn.elite,
            vel_y: 0.0,
            direction: if facing_right { 1.0 } else { -1.0 },
            mode: EnemyMode::Patrol,
            state_timer: 0,
            animation_frame: 0.0,
            opacity: 1.0,
            phase_timer: 0.0,
            hit_flash: 0,
            dead: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Subtract damage; returns true if this blow was lethal
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.hit_flash = ENEMY_HIT_FLASH;
        self.health <= 0.0
    }

    /// Advance one tick. `player_pos` is the player's top-left corner.
    pub fn update(&mut self, player_pos: Vec2, platforms: &[Platform], delta: f32) {
        self.state_timer += 1;
        self.animation_frame = (self.animation_frame + 0.1 * delta) % 4.0;
        self.hit_flash = self.hit_flash.saturating_sub(1);

        match self.kind.behavior() {
            Behavior::Ground => self.update_ground(platforms, delta),
            Behavior::Flier => self.update_flier(delta),
            Behavior::Phasing => self.update_phasing(player_pos, delta),
            Behavior::Chaser => self.update_chaser(player_pos, delta),
            Behavior::Charger => self.update_charger(player_pos, platforms, delta),
            Behavior::Swooper => self.update_swooper(player_pos, delta),
        }
    }

    fn reverse_after(&mut self, ticks: u32) {
        if self.state_timer > ticks {
            self.direction = -self.direction;
            self.state_timer = 0;
        }
    }

    fn update_ground(&mut self, platforms: &[Platform], delta: f32) {
        self.pos.x += self.speed * self.direction * delta;
        self.reverse_after(120);
        self.fall(platforms, delta);
    }

    fn update_flier(&mut self, delta: f32) {
        self.pos.x += self.speed * self.direction * delta;
        self.pos.y += (self.state_timer as f32 * 0.05).sin() * 2.0 * delta;
        self.reverse_after(180);
    }

    fn update_phasing(&mut self, player_pos: Vec2, delta: f32) {
        self.phase_timer += delta;
        self.opacity = (0.3 + (self.phase_timer * 0.03).sin() * 0.7).clamp(0.3, 1.0);

        if self.opacity > 0.5 {
            let to_player = player_pos - self.pos;
            let dist = to_player.length();
            if dist > 0.0 && dist < ENEMY_AGGRO_RANGE {
                let dir = normalize(to_player.x, to_player.y);
                self.pos.x += dir.x * self.speed * delta;
                self.pos.y += dir.y * self.speed * 0.5 * delta;
            }
        }

        // Bob regardless of visibility
        self.pos.y += (self.state_timer as f32 * 0.03).sin() * 0.8 * delta;
    }

    fn update_chaser(&mut self, player_pos: Vec2, delta: f32) {
        let to_player = player_pos - self.pos;
        let dist = to_player.length();

        if dist > 0.0 && dist < ENEMY_AGGRO_RANGE {
            self.pos += normalize(to_player.x, to_player.y) * self.speed * delta;
            self.direction = if to_player.x > 0.0 { 1.0 } else { -1.0 };
        } else {
            self.pos.x += self.speed * 0.5 * self.direction * delta;
            self.pos.y += (self.state_timer as f32 * 0.04).sin() * delta;
            self.reverse_after(120);
        }
    }

    fn update_charger(&mut self, player_pos: Vec2, platforms: &[Platform], delta: f32) {
        let dx = player_pos.x - self.pos.x;

        if dx.abs() < ENEMY_AGGRO_RANGE {
            self.direction = if dx > 0.0 { 1.0 } else { -1.0 };
            self.pos.x += self.speed * self.direction * delta;
        } else {
            self.pos.x += self.speed * 0.3 * self.direction * delta;
            self.reverse_after(100);
        }

        self.fall(platforms, delta);
    }

    fn update_swooper(&mut self, player_pos: Vec2, delta: f32) {
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        let t = self.state_timer as f32;

        match self.mode {
            EnemyMode::Patrol => {
                // Lazy circle
                self.pos.x += (t * 0.02).cos() * self.speed * delta;
                self.pos.y += (t * 0.02).sin() * self.speed * 0.5 * delta;

                if dist < ENEMY_AGGRO_RANGE && to_player.y > 50.0 {
                    self.mode = EnemyMode::Swoop;
                    self.state_timer = 0;
                }
            }
            EnemyMode::Swoop => {
                if dist > 0.0 {
                    let dir = normalize(to_player.x, to_player.y);
                    self.pos.x += dir.x * self.speed * 1.5 * delta;
                    self.pos.y += dir.y * self.speed * 2.0 * delta;
                }
                if self.state_timer > 60 || self.pos.y > 550.0 {
                    self.mode = EnemyMode::Rise;
                    self.state_timer = 0;
                }
            }
            EnemyMode::Rise => {
                self.pos.y -= self.speed * delta;
                if self.pos.y < 250.0 || self.state_timer > 90 {
                    self.mode = EnemyMode::Patrol;
                    self.state_timer = 0;
                }
            }
        }

        self.direction = if to_player.x > 0.0 { 1.0 } else { -1.0 };
    }

    /// Gravity plus landing on any standable platform
    fn fall(&mut self, platforms: &[Platform], delta: f32) {
        self.vel_y += ENEMY_GRAVITY * delta;
        self.pos.y += self.vel_y * delta;

        for platform in platforms.iter().filter(|p| p.kind.supports()) {
            let r = &platform.rect;
            let bottom = self.pos.y + self.size.y;
            if self.pos.x + self.size.x > r.x
                && self.pos.x < r.right()
                && bottom > r.y
                && bottom < r.bottom() + ENEMY_LANDING_TOLERANCE
            {
                self.pos.y = r.y - self.size.y;
                self.vel_y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::PlatformKind;

    fn spawn(kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::spawn(
            1,
            &EnemySpawn {
                kind,
                x,
                y,
                elite: false,
            },
            true,
        )
    }

    fn floor() -> Vec<Platform> {
        vec![Platform::new(0.0, 600.0, 2000.0, 75.0, PlatformKind::Ground)]
    }

    #[test]
    fn test_elite_multipliers() {
        let elite = Enemy::spawn(
            7,
            &EnemySpawn {
                kind: EnemyKind::Knight,
                x: 0.0,
                y: 0.0,
                elite: true,
            },
            false,
        );
        assert_eq!(elite.max_health, 360.0);
        assert_eq!(elite.size, Vec2::new(67.5, 90.0));
        assert_eq!(elite.damage, 37.5);
        assert_eq!(elite.score, 1250);
        assert_eq!(elite.direction, -1.0);
    }

    #[test]
    fn test_ground_enemy_lands_and_reverses() {
        let platforms = floor();
        let mut skeleton = spawn(EnemyKind::Skeleton, 500.0, 540.0);
        for _ in 0..121 {
            skeleton.update(Vec2::new(5000.0, 0.0), &platforms, 1.0);
        }
        assert_eq!(skeleton.pos.y, 600.0 - skeleton.size.y);
        assert_eq!(skeleton.direction, -1.0);
        assert_eq!(skeleton.state_timer, 0);
    }

    #[test]
    fn test_ground_enemy_ignores_hazards_and_walls() {
        let platforms = vec![
            Platform::new(0.0, 600.0, 2000.0, 20.0, PlatformKind::Hazard),
            Platform::new(0.0, 600.0, 2000.0, 20.0, PlatformKind::Wall),
        ];
        let mut zombie = spawn(EnemyKind::Zombie, 100.0, 540.0);
        for _ in 0..60 {
            zombie.update(Vec2::ZERO, &platforms, 1.0);
        }
        assert!(zombie.pos.y > 600.0);
    }

    #[test]
    fn test_bat_ignores_gravity() {
        let mut bat = spawn(EnemyKind::Bat, 100.0, 300.0);
        for _ in 0..100 {
            bat.update(Vec2::ZERO, &[], 1.0);
        }
        // Sine drift stays bounded
        assert!((bat.pos.y - 300.0).abs() < 100.0);
        assert_eq!(bat.vel_y, 0.0);
    }

    #[test]
    fn test_phasing_opacity_stays_in_range() {
        let mut ghost = spawn(EnemyKind::Ghost, 100.0, 300.0);
        for _ in 0..600 {
            ghost.update(Vec2::new(2000.0, 300.0), &[], 1.0);
            assert!((0.3..=1.0).contains(&ghost.opacity));
        }
    }

    #[test]
    fn test_chaser_seeks_inside_aggro() {
        let mut demon = spawn(EnemyKind::Demon, 100.0, 100.0);
        demon.update(Vec2::new(300.0, 100.0), &[], 1.0);
        assert_eq!(demon.pos, Vec2::new(104.0, 100.0));
        assert_eq!(demon.direction, 1.0);

        let mut far = spawn(EnemyKind::Demon, 100.0, 100.0);
        far.direction = -1.0;
        far.update(Vec2::new(900.0, 100.0), &[], 1.0);
        assert_eq!(far.pos.x, 98.0);
    }

    #[test]
    fn test_hellhound_charges_toward_player() {
        let platforms = floor();
        let mut hound = spawn(EnemyKind::Hellhound, 500.0, 565.0);
        hound.update(Vec2::new(300.0, 540.0), &platforms, 1.0);
        assert_eq!(hound.direction, -1.0);
        assert_eq!(hound.pos.x, 494.0);
    }

    #[test]
    fn test_gargoyle_swoop_cycle() {
        let mut gargoyle = spawn(EnemyKind::Gargoyle, 400.0, 300.0);
        let player = Vec2::new(450.0, 500.0);
        gargoyle.update(player, &[], 1.0);
        assert_eq!(gargoyle.mode, EnemyMode::Swoop);

        // Dive until near the ground or out of time
        for _ in 0..70 {
            gargoyle.update(player, &[], 1.0);
            if gargoyle.mode == EnemyMode::Rise {
                break;
            }
        }
        assert_eq!(gargoyle.mode, EnemyMode::Rise);
    }

    #[test]
    fn test_update_never_kills() {
        let mut knight = spawn(EnemyKind::Knight, 0.0, 0.0);
        for _ in 0..200 {
            knight.update(Vec2::ZERO, &[], 1.0);
        }
        assert!(!knight.dead);
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut bat = spawn(EnemyKind::Bat, 0.0, 0.0);
        assert!(!bat.take_damage(5.0));
        assert_eq!(bat.hit_flash, ENEMY_HIT_FLASH);
        assert!(bat.take_damage(100.0));
        assert_eq!(bat.health, 0.0);
    }
}
