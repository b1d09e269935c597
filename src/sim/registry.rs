//! Entity registry
//!
//! Four disjoint sets owned by a level. Entities are only ever flagged
//! destroyed during a tick; [`Registry::sweep`] is the single place that
//! physically removes them.

use super::entity::{ActorKind, Entity, EntityId};
use crate::ui::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Friendly,
    Enemy,
    PlayerShot,
    EnemyShot,
}

/// An entity removed by a sweep, with the set it came from
#[derive(Debug, Clone)]
pub struct Swept {
    pub category: Category,
    pub entity: Entity,
}

#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) friendly: Vec<Entity>,
    pub(crate) enemies: Vec<Entity>,
    pub(crate) player_shots: Vec<Entity>,
    pub(crate) enemy_shots: Vec<Entity>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to one set; a fresh id keeps the sets disjoint
    pub fn spawn(&mut self, mut entity: Entity, category: Category, ui: &mut dyn Ui) -> EntityId {
        let id = self.next_entity_id();
        entity.id = id;
        ui.entity_added(id, entity.bounds(), entity.kind.sprite());
        self.set_mut(category).push(entity);
        id
    }

    /// Remove every destroyed entity and tell the UI to drop it.
    ///
    /// Running it twice in a row removes nothing the second time.
    pub fn sweep(&mut self, ui: &mut dyn Ui) -> Vec<Swept> {
        let mut swept = Vec::new();
        for category in [
            Category::Friendly,
            Category::Enemy,
            Category::PlayerShot,
            Category::EnemyShot,
        ] {
            let set = self.set_mut(category);
            let (gone, kept): (Vec<Entity>, Vec<Entity>) =
                std::mem::take(set).into_iter().partition(Entity::is_destroyed);
            *set = kept;
            for entity in gone {
                ui.entity_removed(entity.id);
                swept.push(Swept { category, entity });
            }
        }
        swept
    }

    pub fn set(&self, category: Category) -> &[Entity] {
        match category {
            Category::Friendly => &self.friendly,
            Category::Enemy => &self.enemies,
            Category::PlayerShot => &self.player_shots,
            Category::EnemyShot => &self.enemy_shots,
        }
    }

    fn set_mut(&mut self, category: Category) -> &mut Vec<Entity> {
        match category {
            Category::Friendly => &mut self.friendly,
            Category::Enemy => &mut self.enemies,
            Category::PlayerShot => &mut self.player_shots,
            Category::EnemyShot => &mut self.enemy_shots,
        }
    }

    pub fn friendly(&self) -> &[Entity] {
        &self.friendly
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn player_shots(&self) -> &[Entity] {
        &self.player_shots
    }

    pub fn enemy_shots(&self) -> &[Entity] {
        &self.enemy_shots
    }

    pub fn len(&self, category: Category) -> usize {
        self.set(category).len()
    }

    pub fn total(&self) -> usize {
        self.friendly.len() + self.enemies.len() + self.player_shots.len() + self.enemy_shots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.friendly
            .iter()
            .chain(&self.enemies)
            .chain(&self.player_shots)
            .chain(&self.enemy_shots)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.friendly
            .iter_mut()
            .chain(&mut self.enemies)
            .chain(&mut self.player_shots)
            .chain(&mut self.enemy_shots)
            .find(|e| e.id == id)
    }

    /// Which set holds `id`
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        [
            Category::Friendly,
            Category::Enemy,
            Category::PlayerShot,
            Category::EnemyShot,
        ]
        .into_iter()
        .find(|&c| self.set(c).iter().any(|e| e.id == id))
    }

    pub fn count_kind(&self, kind: ActorKind) -> usize {
        self.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use crate::ui::{RecordingUi, UiEvent};
    use glam::Vec2;

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let tuning = Tuning::default();
        let mut registry = Registry::new();
        let mut ui = RecordingUi::default();
        let a = registry.spawn(Entity::enemy(&tuning, Vec2::ZERO), Category::Enemy, &mut ui);
        let b = registry.spawn(
            Entity::player_shot(&tuning, Vec2::ZERO),
            Category::PlayerShot,
            &mut ui,
        );
        assert_ne!(a, b);
        assert_eq!(registry.category_of(a), Some(Category::Enemy));
        assert_eq!(registry.category_of(b), Some(Category::PlayerShot));
        assert_eq!(ui.events.len(), 2);
    }

    #[test]
    fn test_sweep_removes_only_destroyed_and_is_idempotent() {
        let tuning = Tuning::default();
        let mut registry = Registry::new();
        let mut ui = RecordingUi::default();
        let doomed = registry.spawn(Entity::enemy(&tuning, Vec2::ZERO), Category::Enemy, &mut ui);
        let alive = registry.spawn(
            Entity::enemy(&tuning, Vec2::new(500.0, 0.0)),
            Category::Enemy,
            &mut ui,
        );
        registry.get_mut(doomed).unwrap().take_damage();

        // Destroyed entities stay visible until the sweep
        assert_eq!(registry.len(Category::Enemy), 2);

        ui.clear();
        let swept = registry.sweep(&mut ui);
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].entity.id, doomed);
        assert_eq!(swept[0].category, Category::Enemy);
        assert_eq!(ui.events, vec![UiEvent::Removed(doomed)]);
        assert!(registry.get(alive).is_some());

        assert!(registry.sweep(&mut ui).is_empty());
        assert_eq!(ui.removed(), 1);
        assert_eq!(registry.total(), 1);
    }
}
