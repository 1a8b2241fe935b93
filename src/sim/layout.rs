//! Level layout: platforms and initial enemy placements
//!
//! Layout is loaded once per run and never regenerated mid-run. Hosts can use
//! the built-in tables ([`Layout::standard`]) or hand in their own records,
//! which are validated up front so a bad tag rejects the run instead of
//! silently doing nothing at play time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Rect;
use super::enemy::EnemyKind;
use crate::consts::*;

/// Platform surface types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Ground,
    Log,
    Stone,
    Rock,
    Castle,
    /// Blocks horizontal movement; wall-slide surface
    Wall,
    /// Damages on touch, never supports
    Hazard,
    Arena,
}

impl PlatformKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "ground" => Some(Self::Ground),
            "log" => Some(Self::Log),
            "stone" => Some(Self::Stone),
            "rock" => Some(Self::Rock),
            "castle" => Some(Self::Castle),
            "wall" => Some(Self::Wall),
            "hazard" | "lava" => Some(Self::Hazard),
            "arena" => Some(Self::Arena),
            _ => None,
        }
    }

    /// Can be stood on
    pub fn supports(&self) -> bool {
        !matches!(self, Self::Wall | Self::Hazard)
    }

    /// Stops a thrown weapon
    pub fn blocks_weapon(&self) -> bool {
        matches!(self, Self::Wall | Self::Ground | Self::Arena)
    }
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind,
        }
    }
}

/// Initial placement of one enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    /// Mini-boss variant (bigger, tougher, worth more)
    pub elite: bool,
}

/// Untyped platform record as supplied by a layout collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(alias = "type")]
    pub kind: String,
}

/// Untyped enemy record as supplied by a layout collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyRecord {
    #[serde(alias = "type")]
    pub archetype: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, alias = "isBoss")]
    pub elite: bool,
}

/// Serialized layout document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub platforms: Vec<PlatformRecord>,
    #[serde(default)]
    pub enemies: Vec<EnemyRecord>,
}

/// Reasons a layout is rejected
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("platform {index}: unknown platform kind {tag:?}")]
    UnknownPlatformKind { index: usize, tag: String },
    #[error("enemy {index}: unknown archetype {tag:?}")]
    UnknownArchetype { index: usize, tag: String },
    #[error("platform {index}: invalid size {width}x{height}")]
    InvalidPlatformSize { index: usize, width: f32, height: f32 },
    #[error("{what} {index}: position is not finite")]
    NonFinitePosition { what: &'static str, index: usize },
    #[error("layout document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validated layout, ordered as supplied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<EnemySpawn>,
}

impl Layout {
    /// Validate untyped records
    pub fn from_records(
        platforms: &[PlatformRecord],
        enemies: &[EnemyRecord],
    ) -> Result<Self, LayoutError> {
        let mut typed_platforms = Vec::with_capacity(platforms.len());
        for (index, record) in platforms.iter().enumerate() {
            let kind = PlatformKind::from_tag(&record.kind).ok_or_else(|| {
                LayoutError::UnknownPlatformKind {
                    index,
                    tag: record.kind.clone(),
                }
            })?;
            if !(record.x.is_finite() && record.y.is_finite()) {
                return Err(LayoutError::NonFinitePosition {
                    what: "platform",
                    index,
                });
            }
            if !(record.width > 0.0 && record.height > 0.0)
                || !(record.width.is_finite() && record.height.is_finite())
            {
                return Err(LayoutError::InvalidPlatformSize {
                    index,
                    width: record.width,
                    height: record.height,
                });
            }
            typed_platforms.push(Platform::new(
                record.x,
                record.y,
                record.width,
                record.height,
                kind,
            ));
        }

        let mut typed_enemies = Vec::with_capacity(enemies.len());
        for (index, record) in enemies.iter().enumerate() {
            let kind = EnemyKind::from_tag(&record.archetype).ok_or_else(|| {
                LayoutError::UnknownArchetype {
                    index,
                    tag: record.archetype.clone(),
                }
            })?;
            if !(record.x.is_finite() && record.y.is_finite()) {
                return Err(LayoutError::NonFinitePosition {
                    what: "enemy",
                    index,
                });
            }
            typed_enemies.push(EnemySpawn {
                kind,
                x: record.x,
                y: record.y,
                elite: record.elite,
            });
        }

        if !typed_platforms.iter().any(|p| p.kind.supports()) {
            log::warn!("Layout has no standable platform; the player will fall forever");
        }

        Ok(Self {
            platforms: typed_platforms,
            enemies: typed_enemies,
        })
    }

    /// Parse and validate a JSON layout document
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let doc: LayoutDocument = serde_json::from_str(json)?;
        Self::from_records(&doc.platforms, &doc.enemies)
    }

    /// The built-in four zones plus the boss arena
    pub fn standard() -> Self {
        let mut platforms = Vec::new();
        let mut enemies = Vec::new();
        for zone in 0..TOTAL_ZONES {
            zone_platforms(zone, &mut platforms);
            zone_enemies(zone, &mut enemies);
        }
        boss_arena_platforms(&mut platforms);
        Self { platforms, enemies }
    }
}

type PlatformRow = (f32, f32, f32, f32);

const WOODS_LOGS: [PlatformRow; 8] = [
    (150.0, 480.0, 180.0, 25.0),
    (400.0, 400.0, 150.0, 20.0),
    (650.0, 350.0, 200.0, 25.0),
    (950.0, 450.0, 160.0, 22.0),
    (1200.0, 380.0, 180.0, 25.0),
    (1500.0, 320.0, 140.0, 20.0),
    (1750.0, 420.0, 200.0, 25.0),
    (2000.0, 500.0, 150.0, 22.0),
];
const WOODS_WALLS: [PlatformRow; 3] = [
    (300.0, 400.0, 40.0, 200.0),
    (1100.0, 350.0, 45.0, 250.0),
    (1900.0, 380.0, 40.0, 220.0),
];

const CRYPT_STONES: [PlatformRow; 8] = [
    (100.0, 500.0, 200.0, 30.0),
    (350.0, 420.0, 180.0, 25.0),
    (600.0, 350.0, 220.0, 30.0),
    (900.0, 280.0, 160.0, 25.0),
    (1150.0, 380.0, 200.0, 30.0),
    (1400.0, 450.0, 180.0, 25.0),
    (1700.0, 350.0, 200.0, 30.0),
    (1950.0, 420.0, 180.0, 25.0),
];
const CRYPT_WALLS: [PlatformRow; 3] = [
    (500.0, 350.0, 35.0, 250.0),
    (850.0, 280.0, 35.0, 320.0),
    (1600.0, 320.0, 40.0, 280.0),
];

const INFERNAL_ROCKS: [PlatformRow; 8] = [
    (120.0, 480.0, 180.0, 30.0),
    (400.0, 400.0, 150.0, 25.0),
    (700.0, 320.0, 200.0, 30.0),
    (1000.0, 400.0, 180.0, 28.0),
    (1300.0, 350.0, 160.0, 25.0),
    (1550.0, 280.0, 200.0, 30.0),
    (1850.0, 380.0, 180.0, 28.0),
    (2050.0, 450.0, 140.0, 25.0),
];
const INFERNAL_LAVA: [PlatformRow; 6] = [
    (320.0, 580.0, 80.0, 20.0),
    (580.0, 580.0, 100.0, 20.0),
    (920.0, 580.0, 80.0, 20.0),
    (1200.0, 580.0, 90.0, 20.0),
    (1480.0, 580.0, 70.0, 20.0),
    (1780.0, 580.0, 80.0, 20.0),
];
const INFERNAL_WALLS: [PlatformRow; 2] = [
    (250.0, 380.0, 40.0, 220.0),
    (1150.0, 350.0, 45.0, 250.0),
];

const CASTLE_LEDGES: [PlatformRow; 8] = [
    (100.0, 500.0, 220.0, 35.0),
    (380.0, 400.0, 200.0, 30.0),
    (650.0, 320.0, 180.0, 30.0),
    (900.0, 420.0, 200.0, 35.0),
    (1180.0, 350.0, 180.0, 30.0),
    (1450.0, 280.0, 220.0, 35.0),
    (1750.0, 400.0, 200.0, 30.0),
    (2000.0, 320.0, 180.0, 30.0),
];
const CASTLE_WALLS: [PlatformRow; 4] = [
    (200.0, 350.0, 50.0, 250.0),
    (800.0, 320.0, 50.0, 280.0),
    (1350.0, 280.0, 50.0, 320.0),
    (1900.0, 320.0, 50.0, 280.0),
];

fn push_rows(out: &mut Vec<Platform>, zone_start: f32, rows: &[PlatformRow], kind: PlatformKind) {
    out.extend(
        rows.iter()
            .map(|&(x, y, w, h)| Platform::new(zone_start + x, y, w, h, kind)),
    );
}

fn zone_platforms(zone: u32, out: &mut Vec<Platform>) {
    let zone_start = zone as f32 * ZONE_WIDTH;

    // Ground strip under every zone
    out.push(Platform::new(
        zone_start,
        600.0,
        ZONE_WIDTH,
        75.0,
        PlatformKind::Ground,
    ));

    match zone {
        0 => {
            push_rows(out, zone_start, &WOODS_LOGS, PlatformKind::Log);
            push_rows(out, zone_start, &WOODS_WALLS, PlatformKind::Wall);
        }
        1 => {
            push_rows(out, zone_start, &CRYPT_STONES, PlatformKind::Stone);
            push_rows(out, zone_start, &CRYPT_WALLS, PlatformKind::Wall);
        }
        2 => {
            push_rows(out, zone_start, &INFERNAL_ROCKS, PlatformKind::Rock);
            push_rows(out, zone_start, &INFERNAL_LAVA, PlatformKind::Hazard);
            push_rows(out, zone_start, &INFERNAL_WALLS, PlatformKind::Wall);
        }
        3 => {
            push_rows(out, zone_start, &CASTLE_LEDGES, PlatformKind::Castle);
            push_rows(out, zone_start, &CASTLE_WALLS, PlatformKind::Wall);
        }
        _ => {}
    }
}

fn boss_arena_platforms(out: &mut Vec<Platform>) {
    let arena_start = TOTAL_ZONES as f32 * ZONE_WIDTH;
    out.push(Platform::new(arena_start, 600.0, 1000.0, 75.0, PlatformKind::Arena));
    // Floating platforms for dodging
    out.push(Platform::new(arena_start + 150.0, 450.0, 150.0, 25.0, PlatformKind::Arena));
    out.push(Platform::new(arena_start + 700.0, 450.0, 150.0, 25.0, PlatformKind::Arena));
    out.push(Platform::new(arena_start + 425.0, 320.0, 150.0, 25.0, PlatformKind::Arena));
    // Side walls
    out.push(Platform::new(arena_start - 50.0, 0.0, 50.0, GAME_HEIGHT, PlatformKind::Wall));
    out.push(Platform::new(arena_start + 1000.0, 0.0, 50.0, GAME_HEIGHT, PlatformKind::Wall));
}

fn push_ground(out: &mut Vec<EnemySpawn>, zone_start: f32, kind: EnemyKind, xs: &[f32], y: f32) {
    out.extend(xs.iter().map(|&x| EnemySpawn {
        kind,
        x: zone_start + x,
        y,
        elite: false,
    }));
}

fn push_air(out: &mut Vec<EnemySpawn>, zone_start: f32, kind: EnemyKind, points: &[(f32, f32)]) {
    out.extend(points.iter().map(|&(x, y)| EnemySpawn {
        kind,
        x: zone_start + x,
        y,
        elite: false,
    }));
}

fn zone_enemies(zone: u32, out: &mut Vec<EnemySpawn>) {
    let zone_start = zone as f32 * ZONE_WIDTH;
    match zone {
        0 => {
            push_ground(
                out,
                zone_start,
                EnemyKind::Skeleton,
                &[200.0, 500.0, 800.0, 1100.0, 1500.0, 1800.0, 2000.0],
                550.0,
            );
            push_air(
                out,
                zone_start,
                EnemyKind::Bat,
                &[
                    (350.0, 300.0),
                    (600.0, 250.0),
                    (900.0, 320.0),
                    (1300.0, 280.0),
                    (1650.0, 300.0),
                    (1950.0, 260.0),
                ],
            );
        }
        1 => {
            push_ground(
                out,
                zone_start,
                EnemyKind::Zombie,
                &[250.0, 600.0, 1000.0, 1400.0, 1800.0],
                545.0,
            );
            push_ground(
                out,
                zone_start,
                EnemyKind::Skeleton,
                &[400.0, 800.0, 1200.0, 1600.0, 2000.0],
                550.0,
            );
            push_air(
                out,
                zone_start,
                EnemyKind::Ghost,
                &[
                    (450.0, 350.0),
                    (750.0, 280.0),
                    (1100.0, 320.0),
                    (1500.0, 280.0),
                    (1900.0, 340.0),
                ],
            );
            // Frost Knight guarding the exit
            out.push(EnemySpawn {
                kind: EnemyKind::Knight,
                x: zone_start + 2050.0,
                y: 540.0,
                elite: true,
            });
        }
        2 => {
            push_air(
                out,
                zone_start,
                EnemyKind::Demon,
                &[
                    (300.0, 300.0),
                    (650.0, 250.0),
                    (1000.0, 280.0),
                    (1350.0, 220.0),
                    (1700.0, 300.0),
                ],
            );
            push_ground(
                out,
                zone_start,
                EnemyKind::Hellhound,
                &[200.0, 550.0, 900.0, 1250.0, 1600.0, 1950.0],
                565.0,
            );
            push_air(
                out,
                zone_start,
                EnemyKind::Wraith,
                &[(400.0, 350.0), (800.0, 300.0), (1200.0, 280.0), (1550.0, 320.0)],
            );
            out.push(EnemySpawn {
                kind: EnemyKind::Gargoyle,
                x: zone_start + 2000.0,
                y: 300.0,
                elite: true,
            });
        }
        3 => {
            push_ground(
                out,
                zone_start,
                EnemyKind::Knight,
                &[300.0, 700.0, 1100.0, 1500.0, 1900.0],
                540.0,
            );
            push_air(
                out,
                zone_start,
                EnemyKind::Gargoyle,
                &[(450.0, 280.0), (850.0, 250.0), (1250.0, 300.0), (1650.0, 260.0)],
            );
            push_air(
                out,
                zone_start,
                EnemyKind::Wraith,
                &[(550.0, 320.0), (950.0, 280.0), (1400.0, 300.0), (1800.0, 280.0)],
            );
            out.push(EnemySpawn {
                kind: EnemyKind::Gargoyle,
                x: zone_start + 2050.0,
                y: 280.0,
                elite: true,
            });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_shape() {
        let layout = Layout::standard();
        // 4 ground strips + 11 + 11 + 16 + 12 zone pieces + 6 arena pieces
        assert_eq!(layout.platforms.len(), 4 + 11 + 11 + 16 + 12 + 6);
        // 13 + 16 + 16 + 14 enemies
        assert_eq!(layout.enemies.len(), 59);
        assert_eq!(layout.enemies.iter().filter(|e| e.elite).count(), 3);
        assert_eq!(
            layout
                .platforms
                .iter()
                .filter(|p| p.kind == PlatformKind::Hazard)
                .count(),
            6
        );
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let json = r#"{
            "platforms": [{ "x": 0, "y": 600, "width": 500, "height": 75, "type": "ground" }],
            "enemies": [{ "type": "DRAGON", "x": 100, "y": 300 }]
        }"#;
        let err = Layout::from_json(json).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownArchetype { index: 0, .. }));
    }

    #[test]
    fn test_unknown_platform_kind_rejected() {
        let platforms = vec![PlatformRecord {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            kind: "cloud".into(),
        }];
        let err = Layout::from_records(&platforms, &[]).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownPlatformKind { .. }));
    }

    #[test]
    fn test_zero_size_platform_rejected() {
        let platforms = vec![PlatformRecord {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 10.0,
            kind: "stone".into(),
        }];
        let err = Layout::from_records(&platforms, &[]).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPlatformSize { .. }));
    }

    #[test]
    fn test_json_layout_accepts_loose_tags() {
        let json = r#"{
            "platforms": [
                { "x": 0, "y": 600, "width": 500, "height": 75, "type": "ground" },
                { "x": 300, "y": 580, "width": 80, "height": 20, "type": "hazard" }
            ],
            "enemies": [
                { "type": "SKELETON", "x": 200, "y": 550 },
                { "type": "KNIGHT", "x": 400, "y": 540, "isBoss": true }
            ]
        }"#;
        let layout = Layout::from_json(json).unwrap();
        assert_eq!(layout.platforms[1].kind, PlatformKind::Hazard);
        assert_eq!(layout.enemies[0].kind, EnemyKind::Skeleton);
        assert!(layout.enemies[1].elite);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Layout::from_json("[1, 2"),
            Err(LayoutError::Json(_))
        ));
    }
}
