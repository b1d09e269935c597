//! Levels and the level factory
//!
//! A [`Level`] owns everything one play-through of a stage needs: the entity
//! registry, the score, the player handle and a private RNG stream. Levels are
//! built from a [`LevelBlueprint`] looked up by identifier in a fixed table;
//! nothing is carried over from one level instance to the next.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::entity::{ActorKind, Entity, EntityId, Rect, Screen, Sprite};
use super::progression::{Countdown, LevelPhase};
use super::registry::{Category, Registry};
use super::spawner::SpawnPlan;
use crate::consts::COUNTDOWN_STEP_TICKS;
use crate::tuning::Tuning;
use crate::ui::{BossHud, Hud, Ui};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("unknown level identifier `{id}`")]
    UnknownLevel { id: String },
}

/// What ends a level in victory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Objective {
    /// Shoot down this many visible enemies
    Kills(u32),
    /// Destroy the boss
    DefeatBoss,
}

/// Static description of a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBlueprint {
    pub id: String,
    /// Shown as the last countdown step
    pub title: String,
    pub plan: SpawnPlan,
    pub objective: Objective,
    pub player_health: u32,
    /// Level entered on victory; `None` means the game is won
    pub next: Option<String>,
}

fn level_one() -> LevelBlueprint {
    LevelBlueprint {
        id: "level-one".into(),
        title: "Level One".into(),
        plan: SpawnPlan::Squadron {
            max_enemies: 5,
            spawn_probability: 0.20,
        },
        objective: Objective::Kills(10),
        player_health: 5,
        next: Some("level-two".into()),
    }
}

fn level_two() -> LevelBlueprint {
    LevelBlueprint {
        id: "level-two".into(),
        title: "Level Two".into(),
        plan: SpawnPlan::Squadron {
            max_enemies: 8,
            spawn_probability: 0.30,
        },
        objective: Objective::Kills(20),
        player_health: 5,
        next: Some("level-three".into()),
    }
}

fn level_three() -> LevelBlueprint {
    LevelBlueprint {
        id: "level-three".into(),
        title: "Level Three".into(),
        plan: SpawnPlan::Boss,
        objective: Objective::DefeatBoss,
        player_health: 8,
        next: None,
    }
}

/// Identifier to blueprint constructor, in play order
const LEVELS: &[(&str, fn() -> LevelBlueprint)] = &[
    ("level-one", level_one),
    ("level-two", level_two),
    ("level-three", level_three),
];

/// Identifier of the first level
pub const FIRST_LEVEL: &str = "level-one";

/// Builds [`Level`] instances by identifier
#[derive(Debug, Clone)]
pub struct LevelFactory {
    tuning: Tuning,
    countdown_step_ticks: u32,
    /// Hands each new level its own seed
    seeds: Pcg32,
}

impl LevelFactory {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            countdown_step_ticks: COUNTDOWN_STEP_TICKS,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    /// Ticks per countdown label; 0 starts levels straight in `Active`
    pub fn with_countdown_step(mut self, ticks: u32) -> Self {
        self.countdown_step_ticks = ticks;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Known level identifiers in play order
    pub fn level_ids() -> impl Iterator<Item = &'static str> {
        LEVELS.iter().map(|(id, _)| *id)
    }

    pub fn blueprint(id: &str) -> Result<LevelBlueprint, LevelError> {
        LEVELS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, build)| build())
            .ok_or_else(|| LevelError::UnknownLevel { id: id.to_string() })
    }

    /// Build a fresh level with an explicit starting health
    pub fn create(
        &mut self,
        id: &str,
        screen_width: f32,
        screen_height: f32,
        player_initial_health: u32,
        ui: &mut dyn Ui,
    ) -> Result<Level, LevelError> {
        let blueprint = Self::blueprint(id)?;
        let seed = self.seeds.random::<u64>();
        let level = Level::new(
            blueprint,
            Screen::new(screen_width, screen_height),
            player_initial_health,
            self.tuning.clone(),
            seed,
            ui,
        )
        .with_countdown_step(self.countdown_step_ticks);
        Ok(level)
    }

    /// Build a fresh level with the blueprint's own starting health
    pub fn create_default(
        &mut self,
        id: &str,
        screen: Screen,
        ui: &mut dyn Ui,
    ) -> Result<Level, LevelError> {
        let health = Self::blueprint(id)?.player_health;
        self.create(id, screen.width, screen.height, health, ui)
    }
}

/// One live entity as a renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteFrame {
    pub id: EntityId,
    pub sprite: Sprite,
    pub bounds: Rect,
}

/// A running level instance
#[derive(Debug)]
pub struct Level {
    pub(crate) blueprint: LevelBlueprint,
    pub(crate) screen: Screen,
    pub(crate) tuning: Tuning,
    pub(crate) registry: Registry,
    pub(crate) rng: Pcg32,
    pub(crate) player: EntityId,
    /// Set by the sweep once the player entity is removed
    pub(crate) player_down: bool,
    pub(crate) boss: Option<EntityId>,
    pub(crate) boss_defeated: bool,
    pub(crate) kills: u32,
    pub(crate) phase: LevelPhase,
    /// Completed simulation ticks
    pub(crate) ticks: u64,
}

impl Level {
    pub fn new(
        blueprint: LevelBlueprint,
        screen: Screen,
        player_initial_health: u32,
        tuning: Tuning,
        seed: u64,
        ui: &mut dyn Ui,
    ) -> Self {
        let mut registry = Registry::new();
        let player = registry.spawn(
            Entity::player(&tuning, tuning.player.start, player_initial_health),
            Category::Friendly,
            ui,
        );
        log::info!(
            "{} ready ({}x{}, player health {player_initial_health})",
            blueprint.id,
            screen.width,
            screen.height
        );
        let phase = LevelPhase::Countdown(Countdown::new(&blueprint.title, COUNTDOWN_STEP_TICKS));
        Self {
            blueprint,
            screen,
            tuning,
            registry,
            rng: Pcg32::seed_from_u64(seed),
            player,
            player_down: false,
            boss: None,
            boss_defeated: false,
            kills: 0,
            phase,
            ticks: 0,
        }
    }

    /// Replace the countdown pacing; 0 skips the countdown
    pub fn with_countdown_step(mut self, ticks: u32) -> Self {
        if matches!(self.phase, LevelPhase::Countdown(_)) {
            self.phase = if ticks == 0 {
                LevelPhase::Active
            } else {
                LevelPhase::Countdown(Countdown::new(&self.blueprint.title, ticks))
            };
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.blueprint.id
    }

    pub fn blueprint(&self) -> &LevelBlueprint {
        &self.blueprint
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn phase(&self) -> &LevelPhase {
        &self.phase
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    /// The player entity, `None` once it has been swept
    pub fn player(&self) -> Option<&Entity> {
        self.registry.get(self.player)
    }

    pub fn is_player_down(&self) -> bool {
        self.player_down
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.boss.and_then(|id| self.registry.get(id))
    }

    pub fn is_boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    /// Player bounds while the player is alive
    pub(crate) fn target(&self) -> Option<Rect> {
        self.player()
            .filter(|p| !p.is_destroyed())
            .map(Entity::bounds)
    }

    /// Player top-left while alive
    pub(crate) fn player_position(&self) -> Option<Vec2> {
        self.target().map(|t| t.min)
    }

    pub fn hud(&self) -> Hud {
        let kill_target = match self.blueprint.objective {
            Objective::Kills(n) => Some(n),
            Objective::DefeatBoss => None,
        };
        let boss = self.boss().map(|boss| {
            let shield = boss.shield.as_ref();
            BossHud {
                health: boss.health.current(),
                max_health: boss.health.max(),
                shield_active: boss.is_shielded(),
                shield_health: shield.map_or(0, |s| s.pool()),
                shield_max: shield.map_or(0, |s| s.pool_max()),
            }
        });
        Hud {
            player_health: self.player().map_or(0, |p| p.health.current()),
            kills: self.kills,
            kill_target,
            boss,
        }
    }

    /// Every live entity with its current bounds
    pub fn snapshot(&self) -> Vec<SpriteFrame> {
        self.registry
            .iter()
            .map(|e| SpriteFrame {
                id: e.id,
                sprite: e.kind.sprite(),
                bounds: e.bounds(),
            })
            .collect()
    }

    /// Place the boss if this is a boss level and it has not appeared yet
    pub(crate) fn spawn_boss(&mut self, ui: &mut dyn Ui) -> Option<EntityId> {
        if self.boss.is_some() || !self.registry.enemies().is_empty() {
            return None;
        }
        let origin = super::spawner::boss_origin(self.screen, &self.tuning);
        let seed = self.rng.random::<u64>();
        let id = self.registry.spawn(
            Entity::boss(&self.tuning, origin, seed),
            Category::Enemy,
            ui,
        );
        log::info!("boss {id:?} enters at ({:.0}, {:.0})", origin.x, origin.y);
        self.boss = Some(id);
        Some(id)
    }

    pub(crate) fn count_enemy_planes(&self) -> usize {
        self.registry.count_kind(ActorKind::Enemy)
    }
}
