/// Gameplay constants and the per-level configuration surface.
///
/// Constants are fixed tuning values; `LevelConfig` is the part a player (or a
/// `galaxy_wars.toml` file) may change before a run starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

// ── Screen ────────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 1920.0;
pub const SCREEN_HEIGHT: f32 = 1080.0;

// ── Pool capacities ───────────────────────────────────────────────────────────

pub const MAX_PLAYER_BULLETS: usize = 20;
pub const MAX_ENEMY_BULLETS: usize = 50;
pub const MAX_METEORS: usize = 20;
pub const MAX_POWER_UPS: usize = 10;
pub const MAX_ENEMIES: usize = 10;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: (f32, f32) = (99.0, 75.0);
pub const PLAYER_LIVES: u32 = 3;
/// Distance kept between the ship centre and every screen edge.
pub const PLAYER_EDGE_MARGIN: f32 = 40.0;
/// The ship respawns this far above the bottom edge.
pub const PLAYER_SPAWN_LIFT: f32 = 250.0;
pub const TILT_SPEED: f32 = 250.0;
pub const MAX_TILT: f32 = 25.0;
pub const TILT_DECAY: f32 = 0.9;
pub const DOUBLE_FIRE_SIDE_OFFSET: f32 = 15.0;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const BULLET_SIZE: (f32, f32) = (9.0, 54.0);
pub const BULLET_SPEED: f32 = 800.0;
pub const BULLET_MARGIN: f32 = 50.0;
pub const ENEMY_BULLET_SPEED: f32 = 300.0;
pub const ENEMY_BULLET_MARGIN: f32 = 50.0;

// ── Meteors ───────────────────────────────────────────────────────────────────

pub const METEOR_BIG_SIZE: (f32, f32) = (101.0, 84.0);
pub const METEOR_SMALL_SIZE: (f32, f32) = (28.0, 28.0);
pub const METEOR_SPAWN_Y: f32 = -100.0;
pub const METEOR_MARGIN: f32 = 100.0;
pub const METEOR_ROTATION_SPEED: f32 = 30.0;
pub const METEOR_EXPLOSION_TIME: f32 = 0.2;
pub const METEOR_BIG_POINTS: u32 = 20;
pub const METEOR_SMALL_POINTS: u32 = 10;

// ── Power-ups ─────────────────────────────────────────────────────────────────

pub const POWER_UP_SIZE: (f32, f32) = (34.0, 33.0);
pub const POWER_UP_SPEED: f32 = 200.0;
pub const POWER_UP_SPAWN_Y: f32 = -50.0;
pub const POWER_UP_MARGIN: f32 = 50.0;
pub const POWER_UP_SPAWN_INTERVAL: f32 = 8.0;
pub const BUFF_DURATION: f32 = 10.0;
pub const SCORE_BOOST_POINTS: u32 = 50;
pub const PICKUP_FLASH_TIME: f32 = 0.3;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: (f32, f32) = (74.0, 67.0);
pub const ENEMY_SPAWN_Y: f32 = -50.0;
pub const ENEMY_SHOOT_INTERVAL: f32 = 3.0;
pub const ENEMY_MUZZLE_OFFSET: f32 = 20.0;
pub const ENEMY_POINTS: u32 = 10;
pub const WEAVE_SPEED: f32 = 150.0;
pub const WEAVE_FREQUENCY: f32 = 2.0;
pub const ZIGZAG_SPEED: f32 = 200.0;
pub const ZIGZAG_SEGMENT: f32 = 1.0;

pub const BOSS_SIZE: (f32, f32) = (135.0, 118.0);
pub const BOSS_HEALTH: i32 = 50;
pub const BOSS_SPEED: f32 = 50.0;
pub const BOSS_SPAWN_Y: f32 = 100.0;
pub const BOSS_PATROL_MARGIN: f32 = 100.0;
pub const BOSS_SHOOT_INTERVAL: f32 = 1.0;
pub const BOSS_SPREAD: f32 = 40.0;
pub const BOSS_MUZZLE_OFFSET: f32 = 50.0;

// ── Waves ─────────────────────────────────────────────────────────────────────

pub const WAVE_DELAY: f32 = 5.0;
pub const WAVE_ANNOUNCEMENT_TIME: f32 = 2.5;
pub const FORMATION_SPACING: f32 = 80.0;
pub const FORMATION_START_Y: f32 = -100.0;
pub const MAX_FORMATION_SLOTS: usize = 20;

// ── Level configuration ───────────────────────────────────────────────────────

/// Colour of the enemy squadron.  Doubles as the difficulty track: the Green
/// track brings formations, weaving enemies and the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTrack {
    Red,
    Blue,
    Green,
}

/// Tuning for one level.  A level table in the config file must give every
/// field; leaving a table out keeps that level's built-in tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Seconds between meteor spawn attempts.
    pub meteor_spawn_interval: f32,
    /// Seconds between enemy spawn attempts within a wave.
    pub enemy_spawn_interval: f32,
    pub player_speed: f32,
    pub enemy_track: EnemyTrack,
    pub waves: u32,
}

impl LevelConfig {
    pub fn new(
        meteor_spawn_interval: f32,
        enemy_spawn_interval: f32,
        player_speed: f32,
        enemy_track: EnemyTrack,
        waves: u32,
    ) -> Self {
        Self {
            meteor_spawn_interval,
            enemy_spawn_interval,
            player_speed,
            enemy_track,
            waves,
        }
    }

    pub fn level_one() -> Self {
        Self::new(1.5, 1.5, 450.0, EnemyTrack::Red, 2)
    }

    pub fn level_two() -> Self {
        Self::new(0.8, 0.8, 540.0, EnemyTrack::Blue, 3)
    }

    pub fn level_three() -> Self {
        Self::new(0.6, 0.8, 600.0, EnemyTrack::Green, 3)
    }

    /// Score that completes the level.  Zero for unknown wave counts.
    pub fn target_score(&self) -> u32 {
        match (self.waves, self.enemy_track) {
            (2, _) => 260,
            (3, EnemyTrack::Green) => 650,
            (3, _) => 480,
            _ => 0,
        }
    }

    /// True for the hardest track, whose final wave is a boss.
    pub fn has_boss(&self) -> bool {
        self.waves == 3 && self.enemy_track == EnemyTrack::Green
    }

    pub fn enemy_speed(&self) -> f32 {
        if self.waves == 3 {
            120.0
        } else {
            80.0
        }
    }
}

// ── Game configuration ────────────────────────────────────────────────────────

pub const DEFAULT_CONFIG_PATH: &str = "galaxy_wars.toml";
pub const DEFAULT_HIGH_SCORE_PATH: &str = "highscores.txt";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub high_score_path: PathBuf,
    pub level1: LevelConfig,
    pub level2: LevelConfig,
    pub level3: LevelConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            high_score_path: PathBuf::from(DEFAULT_HIGH_SCORE_PATH),
            level1: LevelConfig::level_one(),
            level2: LevelConfig::level_two(),
            level3: LevelConfig::level_three(),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::resource_load(path, e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path`, falling back to the built-in tuning when the file is
    /// missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => {
                log::info!("loaded config from {}", path.as_ref().display());
                config
            }
            Err(e) => {
                log::warn!("[{}] {e}; using default configuration", e.kind());
                Self::default()
            }
        }
    }
}
