//! Tunable game parameters, loadable from a RON file.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs the
//! fields it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub spawn: SpawnConfig,
    pub weapons: WeaponConfig,
    pub pickups: PickupConfig,
    /// Length of the encounter the player has to survive
    pub encounter_secs: f32,
    pub terrain: Vec<TerrainConfig>,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u8,
    pub move_speed: f32,
    pub invulnerable_secs: f32,
    pub knockback_speed: f32,
    pub knockback_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub hit_points: u8,
    pub detection_radius: f32,
    pub move_speed: f32,
    pub wander_speed_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval_secs: f32,
    pub batch_size: u32,
    pub batch_growth: u32,
    pub wave_secs: f32,
    pub min_player_distance: f32,
    pub edge_margin: f32,
    pub max_enemies: usize,
    /// Enemies placed when the scene starts
    pub initial: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub sword_swing_secs: f32,
    pub sword_reach: f32,
    pub sword_damage: u8,
    pub gun_cooldown_secs: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime_secs: f32,
    pub projectile_damage: u8,
    pub magazine_size: u8,
    pub reload_secs: f32,
    pub slash_secs: f32,
    pub slash_cooldown_secs: f32,
    pub slash_radius: f32,
    pub slash_arc_degrees: f32,
    pub slash_damage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub interval_secs: f32,
    pub spawn_chance: f64,
    pub health_share: f64,
    pub drop_chance: f64,
    pub lifetime_secs: f32,
    pub heal_amount: u8,
}

/// A solid rectangle given by its centre and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub asset_dir: PathBuf,
    pub music_volume: f32,
    pub effects_volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            spawn: SpawnConfig::default(),
            weapons: WeaponConfig::default(),
            pickups: PickupConfig::default(),
            encounter_secs: 180.0,
            terrain: vec![
                TerrainConfig::new(10.0, 30.0, 4.0, 40.0),
                TerrainConfig::new(80.0, 50.0, 4.0, 40.0),
                TerrainConfig::new(150.0, 80.0, 4.0, 40.0),
                TerrainConfig::new(200.0, 40.0, 4.0, 40.0),
                TerrainConfig::new(40.0, 120.0, 4.0, 40.0),
                TerrainConfig::new(120.0, 150.0, 4.0, 40.0),
            ],
            audio: AudioConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 180.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 10,
            move_speed: 20.0,
            invulnerable_secs: 1.2,
            knockback_speed: 20.0,
            knockback_secs: 0.15,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            hit_points: 3,
            detection_radius: 20.0,
            move_speed: 10.0,
            wander_speed_factor: 0.4,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3.0,
            batch_size: 5,
            batch_growth: 1,
            wave_secs: 30.0,
            min_player_distance: 30.0,
            edge_margin: 5.0,
            max_enemies: 60,
            initial: vec![
                [20.0, 20.0],
                [120.0, 80.0],
                [200.0, 100.0],
                [60.0, 150.0],
                [180.0, 40.0],
            ],
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            sword_swing_secs: 0.38,
            sword_reach: 6.0,
            sword_damage: 1,
            gun_cooldown_secs: 0.5,
            projectile_speed: 30.0,
            projectile_lifetime_secs: 0.5,
            projectile_damage: 1,
            magazine_size: 6,
            reload_secs: 1.2,
            slash_secs: 0.25,
            slash_cooldown_secs: 2.0,
            slash_radius: 8.0,
            slash_arc_degrees: 150.0,
            slash_damage: 2,
        }
    }
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10.0,
            spawn_chance: 0.6,
            health_share: 0.7,
            drop_chance: 0.15,
            lifetime_secs: 15.0,
            heal_amount: 1,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_dir: PathBuf::from("assets"),
            music_volume: 0.3,
            effects_volume: 0.2,
        }
    }
}

impl TerrainConfig {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl GameConfig {
    /// Reads a RON file and validates the result
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("player.move_speed", self.player.move_speed),
            ("enemy.move_speed", self.enemy.move_speed),
            ("spawn.interval_secs", self.spawn.interval_secs),
            ("spawn.wave_secs", self.spawn.wave_secs),
            ("weapons.sword_swing_secs", self.weapons.sword_swing_secs),
            ("weapons.projectile_speed", self.weapons.projectile_speed),
            ("weapons.slash_secs", self.weapons.slash_secs),
            ("pickups.interval_secs", self.pickups.interval_secs),
            ("pickups.lifetime_secs", self.pickups.lifetime_secs),
            ("encounter_secs", self.encounter_secs),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.player.max_health == 0 {
            return Err(ConfigError::Invalid("player.max_health must be at least 1".into()));
        }
        if self.enemy.hit_points == 0 {
            return Err(ConfigError::Invalid("enemy.hit_points must be at least 1".into()));
        }
        if self.weapons.magazine_size == 0 {
            return Err(ConfigError::Invalid(
                "weapons.magazine_size must be at least 1".into(),
            ));
        }

        let probabilities = [
            ("pickups.spawn_chance", self.pickups.spawn_chance),
            ("pickups.health_share", self.pickups.health_share),
            ("pickups.drop_chance", self.pickups.drop_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.enemy.wander_speed_factor) {
            return Err(ConfigError::Invalid(
                "enemy.wander_speed_factor must be within 0..=1".into(),
            ));
        }

        if self.spawn.edge_margin * 2.0 >= self.world.width.min(self.world.height) {
            return Err(ConfigError::Invalid(
                "spawn.edge_margin leaves no room to spawn".into(),
            ));
        }

        Ok(())
    }
}
