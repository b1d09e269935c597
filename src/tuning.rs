//! Data-driven game balance
//!
//! Every gameplay number lives here so a settings file can override it.
//! Defaults reproduce the shipped game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Spawn position (top-left)
    pub start: Vec2,
    /// Pixels per tick on each axis
    pub speed: f32,
    pub fire_cooldown_ticks: u32,
    pub muzzle: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start: Vec2::new(5.0, 300.0),
            speed: 8.0,
            fire_cooldown_ticks: 5,
            muzzle: Vec2::new(110.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerShotTuning {
    pub speed: f32,
}

impl Default for PlayerShotTuning {
    fn default() -> Self {
        Self { speed: 15.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Leftward pixels per tick
    pub speed: f32,
    pub health: u32,
    /// Probability of firing on any given tick
    pub fire_chance: f64,
    pub muzzle: Vec2,
    /// No firing while the player is vertically closer than this
    pub safety_distance: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            speed: 6.0,
            health: 1,
            fire_chance: 0.01,
            muzzle: Vec2::new(-100.0, 50.0),
            safety_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    /// Hull fraction at or below which the shield may come up
    pub activation_threshold: f32,
    /// Per-tick activation probability once eligible
    pub activation_chance: f64,
    pub active_ticks: u32,
    pub cooldown_ticks: u32,
    /// Shield pool size
    pub pool: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            activation_threshold: 0.75,
            activation_chance: 0.2,
            active_ticks: 400,
            cooldown_ticks: 300,
            pool: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub health: u32,
    pub fire_chance: f64,
    pub muzzle: Vec2,
    pub vertical_speed: f32,
    /// How many copies of `{+v, -v, 0}` the move ring holds
    pub move_repeats: u32,
    /// Picks before the ring is reshuffled
    pub max_streak: u32,
    /// Allowed range for the boss's top edge
    pub band_min: f32,
    pub band_max: f32,
    /// Horizontal center as a fraction of screen width
    pub x_fraction: f32,
    pub shield: ShieldTuning,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            health: 100,
            fire_chance: 0.0083,
            muzzle: Vec2::new(-50.0, 75.0),
            vertical_speed: 8.0,
            move_repeats: 5,
            max_streak: 10,
            band_min: -100.0,
            band_max: 475.0,
            x_fraction: 0.9,
            shield: ShieldTuning::default(),
        }
    }
}

/// Steering parameters shared by every homing shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingTuning {
    pub speed: f32,
    /// Beyond this distance the shot stops homing
    pub range: f32,
    pub max_age: u32,
}

// Enemy and boss shots get their own types so a partial override falls back
// to the right defaults field by field.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyShotTuning {
    pub speed: f32,
    pub range: f32,
    pub max_age: u32,
}

impl Default for EnemyShotTuning {
    fn default() -> Self {
        Self {
            speed: 7.0,
            range: 300.0,
            max_age: 300,
        }
    }
}

impl EnemyShotTuning {
    pub fn homing(&self) -> HomingTuning {
        HomingTuning {
            speed: self.speed,
            range: self.range,
            max_age: self.max_age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossShotTuning {
    pub speed: f32,
    pub range: f32,
    pub max_age: u32,
}

impl Default for BossShotTuning {
    fn default() -> Self {
        Self {
            speed: 15.0,
            range: 500.0,
            max_age: 300,
        }
    }
}

impl BossShotTuning {
    pub fn homing(&self) -> HomingTuning {
        HomingTuning {
            speed: self.speed,
            range: self.range,
            max_age: self.max_age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// A new enemy must not sit within this box of an existing one
    pub separation: Vec2,
    /// Spawn rows are `[0, screen_height - ceiling_margin]`
    pub ceiling_margin: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            separation: Vec2::new(100.0, 50.0),
            ceiling_margin: 150.0,
        }
    }
}

/// All balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub player_shot: PlayerShotTuning,
    pub enemy: EnemyTuning,
    pub enemy_shot: EnemyShotTuning,
    pub boss: BossTuning,
    pub boss_shot: BossShotTuning,
    pub spawn: SpawnTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            player_shot: PlayerShotTuning::default(),
            enemy: EnemyTuning::default(),
            enemy_shot: EnemyShotTuning::default(),
            boss: BossTuning::default(),
            boss_shot: BossShotTuning::default(),
            spawn: SpawnTuning::default(),
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("enemy.fire_chance", self.enemy.fire_chance)?;
        check_probability("boss.fire_chance", self.boss.fire_chance)?;
        check_probability(
            "boss.shield.activation_chance",
            self.boss.shield.activation_chance,
        )?;
        if self.boss.shield.pool == 0 {
            return Err(ConfigError::Invalid(
                "boss.shield.pool must be at least 1".into(),
            ));
        }
        if self.boss.move_repeats == 0 {
            return Err(ConfigError::Invalid(
                "boss.move_repeats must be at least 1".into(),
            ));
        }
        if self.boss.band_min > self.boss.band_max {
            return Err(ConfigError::Invalid(format!(
                "boss band is empty ({} > {})",
                self.boss.band_min, self.boss.band_max
            )));
        }
        if self.enemy.health == 0 || self.boss.health == 0 {
            return Err(ConfigError::Invalid(
                "enemy and boss health must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
