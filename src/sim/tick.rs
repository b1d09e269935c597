//! Fixed timestep simulation tick
//!
//! One call advances a level by exactly one logical interval. Step order is
//! part of the contract:
//!
//! 1. spawn enemies
//! 2. advance every entity (movement, steering, shield machine)
//! 3. enemy and boss fire
//! 4. recount enemies
//! 5. penetration (enemies past the left edge despawn, no damage)
//! 6. weapon hits (stops early if the player goes down)
//! 7. body collisions
//! 8. sweep destroyed entities
//! 9. kill reconcile
//! 10. HUD push
//! 11. end condition
//!
//! Every step is infallible. Nothing is rolled back, and nothing can fail
//! half way; a spawn that finds no clear row is skipped.

use super::collision::{WeaponHits, resolve_body_collisions, resolve_weapon_hits};
use super::entity::{ActorKind, Entity, Surroundings};
use super::level::Level;
use super::progression::Transition;
use super::registry::{Category, Swept};
use super::spawner::{SpawnPlan, spawn_squadron};
use crate::ui::Ui;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: u32,
    pub shots_fired: u32,
    /// Enemy planes alive after spawning and firing
    pub enemy_count: usize,
    pub penetrated: u32,
    pub hits: WeaponHits,
    pub body_contacts: u32,
    pub removed: usize,
    pub new_kills: u32,
    pub transition: Option<Transition>,
}

/// Advance the level by one fixed tick
pub fn tick(level: &mut Level, ui: &mut dyn Ui) -> TickReport {
    let mut report = TickReport::default();

    // 1. Spawn
    report.spawned = spawn_step(level, ui);

    // 2. Movement and behaviour
    update_entities(level);

    // 3. Fire
    report.shots_fired = fire_step(level, ui);

    // 4. Enemy count
    report.enemy_count = level.count_enemy_planes();

    // 5. Penetration
    report.penetrated = penetration_step(level);

    // 6-7. Combat; the player going down skips body collisions
    let screen = level.screen;
    let registry = &mut level.registry;
    report.hits = resolve_weapon_hits(
        &mut registry.enemies,
        &mut registry.player_shots,
        &mut registry.friendly,
        &mut registry.enemy_shots,
        screen,
    );
    if !report.hits.player_down {
        report.body_contacts =
            resolve_body_collisions(&mut registry.friendly, &mut registry.enemies);
    }

    // 8. Sweep
    let swept = level.registry.sweep(ui);
    report.removed = swept.len();

    // 9. Kills
    report.new_kills = reconcile(level, &swept);

    // 10. HUD
    ui.hud(&level.hud());

    level.ticks += 1;

    // 11. End condition
    report.transition = level.evaluate_end_condition(ui);
    report
}

fn spawn_step(level: &mut Level, ui: &mut dyn Ui) -> u32 {
    match level.blueprint.plan {
        SpawnPlan::Squadron {
            max_enemies,
            spawn_probability,
        } => {
            let batch = spawn_squadron(
                level.registry.enemies(),
                max_enemies,
                spawn_probability,
                level.screen,
                &level.tuning,
                &mut level.rng,
            );
            let spawned = batch.enemies.len() as u32;
            for enemy in batch.enemies {
                let id = level.registry.spawn(enemy, Category::Enemy, ui);
                log::debug!("enemy {id:?} spawned");
            }
            if batch.skipped > 0 {
                log::warn!("{} enemy spawn(s) skipped, edge crowded", batch.skipped);
            }
            spawned
        }
        SpawnPlan::Boss => u32::from(level.spawn_boss(ui).is_some()),
    }
}

fn update_entities(level: &mut Level) {
    let world = Surroundings {
        screen: level.screen,
        target: level.target(),
    };
    let registry = &mut level.registry;
    let entities = registry
        .friendly
        .iter_mut()
        .chain(registry.enemies.iter_mut())
        .chain(registry.player_shots.iter_mut())
        .chain(registry.enemy_shots.iter_mut());
    for entity in entities {
        if let Some(event) = entity.advance(&world, &level.tuning, &mut level.rng) {
            log::debug!("{:?} {:?}: {event:?}", entity.kind, entity.id);
        }
    }
}

/// Roll every armed enemy's trigger and register the shots
fn fire_step(level: &mut Level, ui: &mut dyn Ui) -> u32 {
    let player = level.player_position();
    let safety = level.tuning.enemy.safety_distance;
    let mut shots = Vec::new();

    for enemy in level.registry.enemies.iter().filter(|e| !e.is_destroyed()) {
        let (Some(weapon), Some(muzzle)) = (enemy.weapon.as_ref(), enemy.muzzle()) else {
            continue;
        };
        let holding = match enemy.kind {
            ActorKind::Enemy => {
                enemy.passed_target
                    || player.is_some_and(|p| (p.y - enemy.position().y).abs() < safety)
            }
            _ => false,
        };
        if holding || !weapon.roll(&mut level.rng) {
            continue;
        }
        let shot = match enemy.kind {
            ActorKind::Boss => Entity::boss_shot(&level.tuning, muzzle),
            _ => Entity::enemy_shot(&level.tuning, muzzle),
        };
        shots.push(shot);
    }

    let fired = shots.len() as u32;
    for shot in shots {
        level.registry.spawn(shot, Category::EnemyShot, ui);
    }
    fired
}

/// Despawn enemies whose visual rectangle has fully left through the left edge
fn penetration_step(level: &mut Level) -> u32 {
    let mut penetrated = 0;
    for enemy in level.registry.enemies.iter_mut() {
        if enemy.bounds().max().x <= 0.0 && enemy.destroy() {
            penetrated += 1;
        }
    }
    if penetrated > 0 {
        log::debug!("{penetrated} enemy plane(s) slipped past");
    }
    penetrated
}

/// Credit kills and latch player/boss outcomes from the swept entities
fn reconcile(level: &mut Level, swept: &[Swept]) -> u32 {
    let mut kills = 0;
    for Swept { category, entity } in swept {
        match category {
            Category::Enemy => {
                if entity.bounds().is_on_screen(level.screen) {
                    kills += 1;
                }
                if Some(entity.id) == level.boss {
                    level.boss_defeated = true;
                    log::info!("boss {:?} destroyed", entity.id);
                }
            }
            Category::Friendly if entity.id == level.player => {
                level.player_down = true;
            }
            _ => {}
        }
    }
    level.kills += kills;
    kills
}
