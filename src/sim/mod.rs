//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only (one stream per level)
//! - Stable iteration order (insertion order within each entity set)
//! - No rendering or platform dependencies; output goes through [`crate::ui::Ui`]

pub mod boss;
pub mod collision;
pub mod entity;
pub mod input;
pub mod level;
pub mod progression;
pub mod registry;
pub mod spawner;
pub mod steering;
pub mod tick;

pub use boss::{BossShield, MovePattern, ShieldEvent, ShieldHit, ShieldState};
pub use collision::{WeaponHits, intersects, resolve_body_collisions, resolve_weapon_hits};
pub use entity::{
    ActorKind, Damage, Entity, EntityId, Health, Motion, Rect, Screen, Sprite, Surroundings,
    Trigger, Weapon,
};
pub use input::{FireOutcome, Intent, IntentOutcome};
pub use level::{
    FIRST_LEVEL, Level, LevelBlueprint, LevelError, LevelFactory, Objective, SpriteFrame,
};
pub use progression::{Countdown, CountdownStep, LevelPhase, Transition};
pub use registry::{Category, Registry, Swept};
pub use spawner::{SpawnBatch, SpawnPlan, boss_origin, spawn_squadron};
pub use steering::Homing;
pub use tick::{TickReport, tick};
