//! Phantom Throne headless runner
//!
//! Drives the simulation the way a host loop would: a scripted pilot supplies
//! input, events drain into a recording sink, and a summary is logged at the
//! end. Usage: `phantom-throne [seed] [layout.json]`.

#[cfg(not(target_arch = "wasm32"))]
mod soak {
    use std::cmp::Ordering;
    use std::process::ExitCode;

    use glam::Vec2;
    use phantom_throne::Settings;
    use phantom_throne::consts::*;
    use phantom_throne::sim::{
        EventSink, GamePhase, Layout, MusicCue, ParticleSpawn, RunConfig, RunState, SoundEffect,
        TickInput, tick,
    };

    /// Give up after ten minutes of game time
    const MAX_TICKS: u64 = 36_000;

    /// Tallies what a real host would have played and drawn
    #[derive(Default)]
    struct Recorder {
        sounds: usize,
        kills: usize,
        player_hits: usize,
        particles: usize,
    }

    impl EventSink for Recorder {
        fn play_sound(&mut self, effect: SoundEffect) {
            self.sounds += 1;
            match effect {
                SoundEffect::EnemyDeath => self.kills += 1,
                SoundEffect::PlayerHit => self.player_hits += 1,
                _ => {}
            }
        }

        fn spawn_particles(&mut self, _spawn: ParticleSpawn) {
            self.particles += 1;
        }

        fn music(&mut self, cue: MusicCue) {
            log::info!("Music: {:?}", cue);
        }
    }

    /// Run right, hop on a rhythm and throw at whatever is close
    fn pilot(state: &RunState) -> TickInput {
        let frame = state.frame_count;
        let me = state.player.center();

        let target = if state.boss.active {
            Some(state.boss.center())
        } else {
            state
                .enemies
                .iter()
                .map(|e| e.center())
                .filter(|c| (c.x - me.x).abs() < WEAPON_MAX_DISTANCE)
                .min_by(|a, b| {
                    a.distance(me)
                        .partial_cmp(&b.distance(me))
                        .unwrap_or(Ordering::Equal)
                })
        };

        TickInput {
            left: false,
            right: true,
            jump: frame % 50 < 14 || state.player.wall_sliding,
            dash: frame % 120 == 0,
            trigger: target.is_some() && frame % 60 < 40,
            aim: target.unwrap_or(me + Vec2::new(200.0, 0.0)),
        }
    }

    fn load_layout(path: Option<String>) -> Result<Layout, String> {
        let Some(path) = path else {
            return Ok(Layout::standard());
        };
        let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
        Layout::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = match args.next().map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => seed,
            Some(Err(e)) => {
                log::error!("Invalid seed: {}", e);
                return ExitCode::FAILURE;
            }
            None => RunConfig::default().seed,
        };
        let layout = match load_layout(args.next()) {
            Ok(layout) => layout,
            Err(e) => {
                log::error!("Layout rejected: {}", e);
                return ExitCode::FAILURE;
            }
        };

        log::info!(
            "Phantom Throne (headless) starting: seed {}, {} platforms, {} enemies",
            seed,
            layout.platforms.len(),
            layout.enemies.len()
        );

        let settings = Settings::default();
        let mut state = RunState::new(RunConfig { seed }, layout);
        let mut recorder = Recorder::default();
        state.start().dispatch(&mut recorder);

        while state.phase == GamePhase::Playing && state.frame_count < MAX_TICKS {
            let input = pilot(&state);
            tick(&mut state, &input, REFERENCE_FRAME_MS, &settings).dispatch(&mut recorder);
        }

        log::info!(
            "Finished in {:?} after {} frames: score {}, zone {}, x {:.0}, health {:.0}",
            state.phase,
            state.frame_count,
            state.score,
            state.current_zone,
            state.player.pos.x,
            state.player.health
        );
        log::info!(
            "{} kills, {} hits taken, {} sounds, {} particles, boss at {:.0} hp",
            recorder.kills,
            recorder.player_hits,
            recorder.sounds,
            recorder.particles,
            state.boss.health
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    soak::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
