//! Enemy spawning
//!
//! Each tick the spawner tops the enemy set up toward its target: one Bernoulli
//! draw per missing enemy, a random row at the right edge, and a separation
//! check against every enemy already present (including ones placed earlier in
//! the same tick).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Screen};
use crate::tuning::Tuning;

/// How a level fills its enemy set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnPlan {
    /// Keep up to `max_enemies` regular planes in play
    Squadron {
        max_enemies: usize,
        spawn_probability: f64,
    },
    /// A single boss, placed once the sky is clear
    Boss,
}

/// Random row on the trailing edge
fn draw_position(rng: &mut impl Rng, screen: Screen, max_y: f32) -> Vec2 {
    Vec2::new(screen.width, rng.random::<f32>() * max_y)
}

fn too_close(candidate: Vec2, existing: &[Entity], separation: Vec2) -> bool {
    existing.iter().any(|enemy| {
        let d = (enemy.position() - candidate).abs();
        d.x < separation.x && d.y < separation.y
    })
}

/// Enemies placed during one tick
#[derive(Debug, Default)]
pub struct SpawnBatch {
    pub enemies: Vec<Entity>,
    /// Count of placements rejected twice and skipped
    pub skipped: u32,
}

/// Roll the squadron draws for one tick.
///
/// `existing` is the current enemy set. Placements are returned rather than
/// registered so the caller owns registration and UI notification.
pub fn spawn_squadron(
    existing: &[Entity],
    max_enemies: usize,
    spawn_probability: f64,
    screen: Screen,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> SpawnBatch {
    let mut batch = SpawnBatch::default();
    let missing = max_enemies.saturating_sub(existing.len());
    let max_y = (screen.height - tuning.spawn.ceiling_margin).max(0.0);
    let separation = tuning.spawn.separation;

    for _ in 0..missing {
        if rng.random::<f64>() >= spawn_probability {
            continue;
        }

        // One retry per rejected draw
        let mut placed = None;
        for _ in 0..2 {
            let candidate = draw_position(rng, screen, max_y);
            if !too_close(candidate, existing, separation)
                && !too_close(candidate, &batch.enemies, separation)
            {
                placed = Some(candidate);
                break;
            }
        }

        match placed {
            Some(origin) => batch.enemies.push(Entity::enemy(tuning, origin)),
            None => {
                log::debug!("enemy spawn skipped: no clear row");
                batch.skipped += 1;
            }
        }
    }

    batch
}

/// Boss origin: centred on `x_fraction` of the width and vertically centred
pub fn boss_origin(screen: Screen, tuning: &Tuning) -> Vec2 {
    let size = super::entity::Sprite::BossPlane.size();
    Vec2::new(
        screen.width * tuning.boss.x_fraction - size.x * 0.5,
        screen.height * 0.5 - size.y * 0.5,
    )
}
