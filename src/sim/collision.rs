//! Collision detection and combat resolution
//!
//! Tests run on the shrunk collision boxes, never the visual bounds. Resolution
//! only flags damage and destruction; nothing is removed here, so an entity hit
//! earlier in the tick still takes part in every later check of that tick.

use super::boss::ShieldHit;
use super::entity::{ActorKind, Damage, Entity, Screen};

/// Overlap of the two adjusted collision shapes; symmetric in its arguments
pub fn intersects(a: &Entity, b: &Entity) -> bool {
    a.collision_bounds().intersects(&b.collision_bounds())
}

/// Tally of one weapon-resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaponHits {
    /// Player shots that connected with an enemy or the boss hull
    pub hull_hits: u32,
    /// Player shots absorbed by the boss shield
    pub shield_hits: u32,
    /// Enemy or boss shots that hit the player
    pub player_hits: u32,
    /// The player went down; the rest of the tick's collisions were skipped
    pub player_down: bool,
}

/// Player shots against on-screen enemies, then enemy shots against friendly units.
///
/// Stops as soon as the player is destroyed.
pub fn resolve_weapon_hits(
    enemies: &mut [Entity],
    player_shots: &mut [Entity],
    friendly: &mut [Entity],
    enemy_shots: &mut [Entity],
    screen: Screen,
) -> WeaponHits {
    let mut hits = WeaponHits::default();

    for enemy in enemies.iter_mut() {
        // No scoring on planes the player cannot see
        if !enemy.bounds().is_on_screen(screen) {
            continue;
        }
        for shot in player_shots.iter_mut() {
            if !intersects(enemy, shot) {
                continue;
            }
            shot.take_damage();
            match enemy.take_damage() {
                Damage::Shield(hit) => {
                    hits.shield_hits += 1;
                    if hit == ShieldHit::Broken {
                        log::debug!("boss {:?} lost its shield", enemy.id);
                    }
                }
                Damage::Hull { destroyed, .. } => {
                    hits.hull_hits += 1;
                    if destroyed {
                        log::debug!("{:?} {:?} shot down", enemy.kind, enemy.id);
                    }
                }
            }
        }
    }

    for unit in friendly.iter_mut() {
        for shot in enemy_shots.iter_mut() {
            if !intersects(unit, shot) {
                continue;
            }
            shot.take_damage();
            unit.take_damage();
            hits.player_hits += 1;
            if unit.kind == ActorKind::Player && unit.is_destroyed() {
                log::info!("player destroyed by {:?}", shot.kind);
                hits.player_down = true;
                return hits;
            }
        }
    }

    hits
}

/// Plane-against-plane contact: both sides take one point of damage.
///
/// Returns the number of contacts.
pub fn resolve_body_collisions(friendly: &mut [Entity], enemies: &mut [Entity]) -> u32 {
    let mut contacts = 0;
    for unit in friendly.iter_mut() {
        for enemy in enemies.iter_mut() {
            if intersects(unit, enemy) {
                unit.take_damage();
                enemy.take_damage();
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Rect;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn screen() -> Screen {
        Screen::new(1300.0, 750.0)
    }

    /// A player shot whose collision box is centered on `target`'s
    fn shot_on(tuning: &Tuning, target: &Entity) -> Entity {
        let size = crate::sim::Sprite::PlayerShot.size();
        Entity::player_shot(tuning, target.center() - size * 0.5)
    }

    #[test]
    fn test_visual_overlap_is_not_enough() {
        let tuning = Tuning::default();
        let a = Entity::enemy(&tuning, Vec2::new(100.0, 100.0));
        // Visual rectangles overlap by 40px vertically, collision boxes do not
        let b = Entity::enemy(&tuning, Vec2::new(100.0, 210.0));
        assert!(a.bounds().intersects(&b.bounds()));
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn test_shot_destroys_visible_enemy() {
        let tuning = Tuning::default();
        let mut enemies = vec![Entity::enemy(&tuning, Vec2::new(600.0, 200.0))];
        let mut shots = vec![shot_on(&tuning, &enemies[0])];
        let hits = resolve_weapon_hits(&mut enemies, &mut shots, &mut [], &mut [], screen());
        assert_eq!(hits.hull_hits, 1);
        assert!(enemies[0].is_destroyed());
        assert!(shots[0].is_destroyed());
    }

    #[test]
    fn test_off_screen_enemy_is_ignored() {
        let tuning = Tuning::default();
        let mut enemies = vec![Entity::enemy(&tuning, Vec2::new(1300.0, 200.0))];
        let mut shots = vec![shot_on(&tuning, &enemies[0])];
        let hits = resolve_weapon_hits(&mut enemies, &mut shots, &mut [], &mut [], screen());
        assert_eq!(hits, WeaponHits::default());
        assert!(!enemies[0].is_destroyed());
        assert!(!shots[0].is_destroyed());
    }

    #[test]
    fn test_simultaneous_hits_both_register() {
        let tuning = Tuning::default();
        let mut player = vec![Entity::player(&tuning, Vec2::new(100.0, 300.0), 5)];
        let size = crate::sim::Sprite::EnemyShot.size();
        let at = player[0].center() - size * 0.5;
        let mut shots = vec![
            Entity::enemy_shot(&tuning, at),
            Entity::enemy_shot(&tuning, at + Vec2::new(4.0, 0.0)),
        ];
        let hits = resolve_weapon_hits(&mut [], &mut [], &mut player, &mut shots, screen());
        assert_eq!(hits.player_hits, 2);
        assert_eq!(player[0].health.current(), 3);
        assert!(shots.iter().all(Entity::is_destroyed));
    }

    #[test]
    fn test_player_death_stops_resolution() {
        let tuning = Tuning::default();
        let mut player = vec![Entity::player(&tuning, Vec2::new(100.0, 300.0), 1)];
        let size = crate::sim::Sprite::EnemyShot.size();
        let at = player[0].center() - size * 0.5;
        let mut shots = vec![
            Entity::enemy_shot(&tuning, at),
            Entity::enemy_shot(&tuning, at),
        ];
        let hits = resolve_weapon_hits(&mut [], &mut [], &mut player, &mut shots, screen());
        assert!(hits.player_down);
        assert_eq!(hits.player_hits, 1);
        assert!(shots[0].is_destroyed());
        assert!(!shots[1].is_destroyed());
    }

    #[test]
    fn test_body_collision_damages_both() {
        let tuning = Tuning::default();
        let mut player = vec![Entity::player(&tuning, Vec2::new(100.0, 300.0), 5)];
        let mut enemies = vec![Entity::enemy(&tuning, Vec2::new(120.0, 300.0))];
        assert_eq!(resolve_body_collisions(&mut player, &mut enemies), 1);
        assert_eq!(player[0].health.current(), 4);
        assert!(enemies[0].is_destroyed());
    }

    #[test]
    fn test_shielded_boss_absorbs_hits() {
        let mut tuning = Tuning::default();
        tuning.boss.shield.activation_chance = 1.0;
        tuning.boss.health = 4;
        let mut boss = Entity::boss(&tuning, Vec2::new(900.0, 200.0), 1);
        boss.take_damage();
        let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(5);
        let health = boss.health.clone();
        boss.shield.as_mut().unwrap().update(&health, &mut rng);
        assert!(boss.is_shielded());

        let mut enemies = vec![boss];
        let mut shots = vec![shot_on(&tuning, &enemies[0])];
        let hits = resolve_weapon_hits(&mut enemies, &mut shots, &mut [], &mut [], screen());
        assert_eq!(hits.shield_hits, 1);
        assert_eq!(hits.hull_hits, 0);
        assert_eq!(enemies[0].health.current(), 3);
        assert_eq!(enemies[0].shield.as_ref().unwrap().pool(), 49);
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..1500.0, -500.0f32..1000.0, 1.0f32..400.0, 1.0f32..400.0)
            .prop_map(|(x, y, w, h)| Rect::new(Vec2::new(x, y), Vec2::new(w, h)))
    }

    fn kind_strategy() -> impl Strategy<Value = ActorKind> {
        prop_oneof![
            Just(ActorKind::Player),
            Just(ActorKind::Enemy),
            Just(ActorKind::Boss),
            Just(ActorKind::PlayerShot),
            Just(ActorKind::EnemyShot),
            Just(ActorKind::BossShot),
        ]
    }

    fn entity_of(kind: ActorKind, at: Vec2) -> Entity {
        let tuning = Tuning::default();
        match kind {
            ActorKind::Player => Entity::player(&tuning, at, 5),
            ActorKind::Enemy => Entity::enemy(&tuning, at),
            ActorKind::Boss => Entity::boss(&tuning, at, 0),
            ActorKind::PlayerShot => Entity::player_shot(&tuning, at),
            ActorKind::EnemyShot => Entity::enemy_shot(&tuning, at),
            ActorKind::BossShot => Entity::boss_shot(&tuning, at),
        }
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(
            ka in kind_strategy(),
            kb in kind_strategy(),
            ax in -300.0f32..1500.0, ay in -300.0f32..900.0,
            bx in -300.0f32..1500.0, by in -300.0f32..900.0,
        ) {
            let a = entity_of(ka, Vec2::new(ax, ay));
            let b = entity_of(kb, Vec2::new(bx, by));
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_collision_box_is_shrunk_and_contained(
            kind in kind_strategy(),
            x in -300.0f32..1500.0, y in -300.0f32..900.0,
            dx in -50.0f32..50.0, dy in -50.0f32..50.0,
        ) {
            let mut entity = entity_of(kind, Vec2::new(x, y));
            entity.offset = Vec2::new(dx, dy);
            let visual = entity.bounds();
            let hit = entity.collision_bounds();
            prop_assert!((hit.size.x - 0.8 * visual.size.x).abs() < 1e-3);
            prop_assert!((hit.size.y - 0.4 * visual.size.y).abs() < 1e-3);
            prop_assert!((hit.center() - visual.center()).length() < 1e-2);
            prop_assert!(hit.min.x >= visual.min.x - 1e-3);
            prop_assert!(hit.min.y >= visual.min.y - 1e-3);
            prop_assert!(hit.max().x <= visual.max().x + 1e-3);
            prop_assert!(hit.max().y <= visual.max().y + 1e-3);
        }

        #[test]
        fn prop_rect_intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
