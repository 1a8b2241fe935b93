//! Fire-and-forget requests for the audio and particle collaborators
//!
//! The core never plays a sound or owns a particle. Each tick it fills a
//! [`FrameEvents`] buffer and the host drains it after the tick completes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ground, wall or air jump
    Jump,
    /// Weapon released
    Throw,
    /// Weapon caught on return
    Catch,
    /// Weapon struck an enemy
    Hit,
    /// Enemy killed
    EnemyDeath,
    /// Player took damage
    PlayerHit,
    /// Dash started
    Dash,
    /// Powerup collected
    Powerup,
    /// Weapon struck the boss
    BossHit,
    /// Boss health reached zero
    BossDeath,
    /// Boss fanfare finished
    Victory,
}

/// Music cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCue {
    /// Switch to the theme of the given zone (4 = boss arena)
    Zone(u32),
    /// Stop all music
    Stop,
}

/// Particle request types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    Footstep { facing_right: bool },
    WallSlide { facing_right: bool },
    Jump { facing_right: bool },
    Landing,
    DashBurst { facing_right: bool },
    DashTrail,
    WeaponTrail,
    Hit,
    Death,
    ScorePopup { score: u64, combo: u32 },
    Ambient { zone: u32 },
}

/// One particle spawn request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpawn {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// Relative strength (1.0 = normal)
    pub intensity: f32,
}

/// Receiver for emitted events
///
/// Methods return nothing: a collaborator that fails to play or spawn must
/// swallow the failure itself.
pub trait EventSink {
    fn play_sound(&mut self, effect: SoundEffect);
    fn spawn_particles(&mut self, spawn: ParticleSpawn);
    fn music(&mut self, _cue: MusicCue) {}
}

/// Events collected during a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameEvents {
    pub sounds: Vec<SoundEffect>,
    pub particles: Vec<ParticleSpawn>,
    pub music: Vec<MusicCue>,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }

    pub fn particle(&mut self, kind: ParticleKind, pos: Vec2, color: u32, intensity: f32) {
        self.particles.push(ParticleSpawn {
            kind,
            pos,
            color,
            intensity,
        });
    }

    pub fn music(&mut self, cue: MusicCue) {
        self.music.push(cue);
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty() && self.particles.is_empty() && self.music.is_empty()
    }

    /// Whether a given sound was requested this tick
    pub fn has_sound(&self, effect: SoundEffect) -> bool {
        self.sounds.contains(&effect)
    }

    /// Hand every event to a collaborator, in emission order per channel
    pub fn dispatch<S: EventSink + ?Sized>(self, sink: &mut S) {
        for cue in self.music {
            sink.music(cue);
        }
        for effect in self.sounds {
            sink.play_sound(effect);
        }
        for spawn in self.particles {
            sink.spawn_particles(spawn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundEffect>,
        particles: usize,
    }

    impl EventSink for Recorder {
        fn play_sound(&mut self, effect: SoundEffect) {
            self.sounds.push(effect);
        }

        fn spawn_particles(&mut self, _spawn: ParticleSpawn) {
            self.particles += 1;
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let mut events = FrameEvents::new();
        events.sound(SoundEffect::Throw);
        events.sound(SoundEffect::Hit);
        events.particle(ParticleKind::Hit, Vec2::ZERO, 0xffffff, 1.0);
        events.music(MusicCue::Stop);

        let mut sink = Recorder::default();
        events.dispatch(&mut sink);
        assert_eq!(sink.sounds, vec![SoundEffect::Throw, SoundEffect::Hit]);
        assert_eq!(sink.particles, 1);
    }
}
