//! Outer game controller
//!
//! Owns the current [`Level`] and the UI, forwards intents and timer ticks,
//! and consumes the [`Transition`] values a level produces. Level handoff is a
//! plain function call: the old level is dropped and a fresh one is built by
//! the factory.

use rand::random;

use crate::settings::Settings;
use crate::sim::{
    Intent, IntentOutcome, Level, LevelError, LevelFactory, Screen, Transition,
};
use crate::ui::{Menu, Ui};

/// Buttons on the pause, game over and win menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Main menu: start from the configured first level
    Start,
    /// Pause menu: continue
    Resume,
    /// Pause / game over: replay the current level
    Restart,
    /// Win screen: replay from the first level
    PlayAgain,
    MainMenu,
}

pub struct Controller<U: Ui> {
    factory: LevelFactory,
    screen: Screen,
    start_level: String,
    level: Option<Level>,
    ui: U,
}

impl<U: Ui> Controller<U> {
    pub fn new(settings: &Settings, ui: U) -> Self {
        let seed = settings.seed.unwrap_or_else(random);
        log::info!("Simulation seed {seed}");
        let factory = LevelFactory::new(settings.tuning.clone(), seed)
            .with_countdown_step(settings.countdown_step_ticks());
        Self {
            factory,
            screen: settings.screen(),
            start_level: settings.start_level.clone(),
            level: None,
            ui,
        }
    }

    /// Replace the factory, e.g. to change countdown pacing
    pub fn with_factory(mut self, factory: LevelFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Load the configured first level
    pub fn start(&mut self) -> Result<(), LevelError> {
        let id = self.start_level.clone();
        self.load(&id)
    }

    /// Drop the current level and build `id` from scratch.
    ///
    /// An unknown identifier is reported to the UI and leaves no level loaded.
    pub fn load(&mut self, id: &str) -> Result<(), LevelError> {
        self.level = None;
        self.ui.hide_menu();
        match self.factory.create_default(id, self.screen, &mut self.ui) {
            Ok(level) => {
                self.level = Some(level);
                Ok(())
            }
            Err(err) => {
                log::error!("{err}");
                self.ui.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// One timer callback
    pub fn tick(&mut self) -> Result<Option<Transition>, LevelError> {
        let Some(level) = self.level.as_mut() else {
            return Ok(None);
        };
        match level.update(&mut self.ui) {
            Some(transition) => {
                self.apply(transition.clone())?;
                Ok(Some(transition))
            }
            None => Ok(None),
        }
    }

    pub fn intent(&mut self, intent: Intent) -> IntentOutcome {
        match self.level.as_mut() {
            Some(level) => level.handle_intent(intent, &mut self.ui),
            None => IntentOutcome::Ignored,
        }
    }

    /// Act on a menu button
    pub fn choose(&mut self, choice: MenuChoice) -> Result<Option<Transition>, LevelError> {
        let transition = match choice {
            MenuChoice::Resume => {
                if let Some(level) = self.level.as_mut().filter(|l| l.is_paused()) {
                    level.toggle_pause(&mut self.ui);
                }
                return Ok(None);
            }
            MenuChoice::Start | MenuChoice::PlayAgain => {
                Transition::Restart(self.start_level.clone())
            }
            MenuChoice::Restart => match self.level.as_ref() {
                Some(level) => Transition::Restart(level.id().to_string()),
                None => return Ok(None),
            },
            MenuChoice::MainMenu => Transition::ToMenu,
        };
        self.apply(transition.clone())?;
        Ok(Some(transition))
    }

    /// Carry out a transition
    pub fn apply(&mut self, transition: Transition) -> Result<(), LevelError> {
        match transition {
            Transition::Advance(id) => {
                log::info!("Advancing to {id}");
                self.load(&id)
            }
            Transition::Restart(id) => {
                log::info!("Restarting {id}");
                self.load(&id)
            }
            // The level already asked for its end-of-game menu
            Transition::Lose | Transition::Win => Ok(()),
            Transition::ToMenu => {
                self.level = None;
                self.ui.show_menu(Menu::Main);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use crate::ui::{RecordingUi, UiEvent};

    fn controller(start_level: &str) -> Controller<RecordingUi> {
        let settings = Settings {
            seed: Some(8),
            start_level: start_level.to_string(),
            ..Settings::default()
        };
        Controller::new(&settings, RecordingUi::default())
            .with_factory(LevelFactory::new(Tuning::default(), 8).with_countdown_step(0))
    }

    #[test]
    fn test_start_loads_first_level() {
        let mut controller = controller("level-one");
        controller.start().unwrap();
        assert_eq!(controller.level().unwrap().id(), "level-one");
    }

    #[test]
    fn test_unknown_level_is_surfaced() {
        let mut controller = controller("level-zero");
        let err = controller.start().unwrap_err();
        assert!(matches!(err, LevelError::UnknownLevel { .. }));
        assert!(controller.level().is_none());
        assert!(controller
            .ui()
            .events
            .iter()
            .any(|e| matches!(e, UiEvent::Error(msg) if msg.contains("level-zero"))));
        assert_eq!(controller.tick().unwrap(), None);
    }

    #[test]
    fn test_advance_resets_score_and_health() {
        let mut controller = controller("level-one");
        controller.start().unwrap();
        controller
            .apply(Transition::Advance("level-three".into()))
            .unwrap();
        let level = controller.level().unwrap();
        assert_eq!(level.id(), "level-three");
        assert_eq!(level.kills(), 0);
        assert_eq!(level.player().unwrap().health.current(), 8);
    }

    #[test]
    fn test_menu_choices() {
        let mut controller = controller("level-two");
        controller.start().unwrap();
        for _ in 0..10 {
            controller.tick().unwrap();
        }

        assert_eq!(controller.intent(Intent::TogglePause), IntentOutcome::Paused);
        assert_eq!(controller.choose(MenuChoice::Resume).unwrap(), None);
        assert!(controller.level().unwrap().is_active());

        assert_eq!(
            controller.choose(MenuChoice::Restart).unwrap(),
            Some(Transition::Restart("level-two".into()))
        );
        assert_eq!(controller.level().unwrap().ticks(), 0);

        assert_eq!(
            controller.choose(MenuChoice::MainMenu).unwrap(),
            Some(Transition::ToMenu)
        );
        assert!(controller.level().is_none());
        assert_eq!(controller.ui().menus().last(), Some(&Menu::Main));
        assert_eq!(controller.intent(Intent::Fire), IntentOutcome::Ignored);

        controller.choose(MenuChoice::PlayAgain).unwrap();
        assert_eq!(controller.level().unwrap().id(), "level-two");
    }
}
