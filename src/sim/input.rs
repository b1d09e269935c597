//! Player intents
//!
//! The input layer turns device events into these discrete intents; the level
//! applies them between ticks.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::level::Level;
use super::registry::Category;
use crate::ui::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    StopVertical,
    StopHorizontal,
    Fire,
    TogglePause,
}

/// Result of a fire intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired(EntityId),
    /// Still cooling down; nothing was created
    CoolingDown,
    /// No live player to fire from
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Steered,
    Fire(FireOutcome),
    Paused,
    Resumed,
    /// Not applicable in the current phase
    Ignored,
}

impl Level {
    pub fn handle_intent(&mut self, intent: Intent, ui: &mut dyn Ui) -> IntentOutcome {
        match intent {
            Intent::TogglePause => {
                if !self.toggle_pause(ui) {
                    IntentOutcome::Ignored
                } else if self.is_paused() {
                    IntentOutcome::Paused
                } else {
                    IntentOutcome::Resumed
                }
            }
            _ if !self.is_active() => IntentOutcome::Ignored,
            Intent::Fire => IntentOutcome::Fire(self.fire(ui)),
            Intent::MoveUp => self.steer(|p| p.steer_vertical(-1.0)),
            Intent::MoveDown => self.steer(|p| p.steer_vertical(1.0)),
            Intent::StopVertical => self.steer(|p| p.steer_vertical(0.0)),
            Intent::MoveLeft => self.steer(|p| p.steer_horizontal(-1.0)),
            Intent::MoveRight => self.steer(|p| p.steer_horizontal(1.0)),
            Intent::StopHorizontal => self.steer(|p| p.steer_horizontal(0.0)),
        }
    }

    fn steer(&mut self, apply: impl FnOnce(&mut Entity)) -> IntentOutcome {
        match self.registry.get_mut(self.player) {
            Some(player) if !player.is_destroyed() => {
                apply(player);
                IntentOutcome::Steered
            }
            _ => IntentOutcome::Ignored,
        }
    }

    /// Spawn a player shot unless the weapon is cooling down
    pub fn fire(&mut self, ui: &mut dyn Ui) -> FireOutcome {
        let Some(player) = self
            .registry
            .get_mut(self.player)
            .filter(|p| !p.is_destroyed())
        else {
            return FireOutcome::Unavailable;
        };
        let Some(muzzle) = player.muzzle() else {
            return FireOutcome::Unavailable;
        };
        let pulled = player.weapon.as_mut().is_some_and(|w| w.pull());
        if !pulled {
            return FireOutcome::CoolingDown;
        }
        let shot = Entity::player_shot(&self.tuning, muzzle);
        let id = self.registry.spawn(shot, Category::PlayerShot, ui);
        log::debug!("player fired {id:?}");
        FireOutcome::Fired(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Screen;
    use crate::sim::level::LevelFactory;
    use crate::tuning::Tuning;
    use crate::ui::RecordingUi;
    use glam::Vec2;

    fn active_level(ui: &mut RecordingUi) -> Level {
        LevelFactory::new(Tuning::default(), 3)
            .with_countdown_step(0)
            .create_default("level-one", Screen::new(1300.0, 750.0), ui)
            .unwrap()
    }

    #[test]
    fn test_fire_spawns_at_muzzle_then_cools_down() {
        let mut ui = RecordingUi::default();
        let mut level = active_level(&mut ui);
        let outcome = level.handle_intent(Intent::Fire, &mut ui);
        let IntentOutcome::Fire(FireOutcome::Fired(id)) = outcome else {
            panic!("expected a shot, got {outcome:?}");
        };
        let shot = level.registry().get(id).unwrap();
        assert_eq!(shot.position(), Vec2::new(115.0, 320.0));
        assert_eq!(
            level.handle_intent(Intent::Fire, &mut ui),
            IntentOutcome::Fire(FireOutcome::CoolingDown)
        );
        assert_eq!(level.registry().player_shots().len(), 1);
    }

    #[test]
    fn test_fire_ready_again_after_cooldown() {
        let mut ui = RecordingUi::default();
        let mut level = active_level(&mut ui);
        assert!(matches!(level.fire(&mut ui), FireOutcome::Fired(_)));
        for _ in 0..5 {
            level.update(&mut ui);
        }
        assert!(matches!(level.fire(&mut ui), FireOutcome::Fired(_)));
    }

    #[test]
    fn test_steering_moves_player_next_tick() {
        let mut ui = RecordingUi::default();
        let mut level = active_level(&mut ui);
        assert_eq!(
            level.handle_intent(Intent::MoveDown, &mut ui),
            IntentOutcome::Steered
        );
        level.update(&mut ui);
        assert_eq!(level.player().unwrap().position(), Vec2::new(5.0, 308.0));
        level.handle_intent(Intent::StopVertical, &mut ui);
        level.update(&mut ui);
        assert_eq!(level.player().unwrap().position(), Vec2::new(5.0, 308.0));
    }

    #[test]
    fn test_intents_ignored_while_paused() {
        let mut ui = RecordingUi::default();
        let mut level = active_level(&mut ui);
        assert_eq!(
            level.handle_intent(Intent::TogglePause, &mut ui),
            IntentOutcome::Paused
        );
        assert_eq!(
            level.handle_intent(Intent::Fire, &mut ui),
            IntentOutcome::Ignored
        );
        assert_eq!(
            level.handle_intent(Intent::TogglePause, &mut ui),
            IntentOutcome::Resumed
        );
    }
}
