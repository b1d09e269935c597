//! Renderer/UI collaborator contract
//!
//! The simulation only ever pushes into the UI; nothing flows back. Input is
//! delivered separately as [`crate::sim::Intent`] values.

use serde::Serialize;

use crate::sim::{EntityId, Rect, Sprite};

/// Boss status bar contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BossHud {
    pub health: u32,
    pub max_health: u32,
    pub shield_active: bool,
    pub shield_health: u32,
    pub shield_max: u32,
}

/// Per-tick status pushed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub player_health: u32,
    pub kills: u32,
    /// `None` on boss levels
    pub kill_target: Option<u32>,
    pub boss: Option<BossHud>,
}

/// Menus the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Menu {
    Main,
    Pause,
    GameOver,
    Win,
}

pub trait Ui {
    fn entity_added(&mut self, id: EntityId, bounds: Rect, sprite: Sprite);

    fn entity_removed(&mut self, id: EntityId);

    fn hud(&mut self, hud: &Hud);

    /// Countdown step ("3", "2", "1", "Level One")
    fn countdown(&mut self, _label: &str) {}

    fn show_menu(&mut self, _menu: Menu) {}

    fn hide_menu(&mut self) {}

    /// User-visible error (e.g. unknown level)
    fn show_error(&mut self, _message: &str) {}
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullUi;

impl Ui for NullUi {
    fn entity_added(&mut self, _id: EntityId, _bounds: Rect, _sprite: Sprite) {}

    fn entity_removed(&mut self, _id: EntityId) {}

    fn hud(&mut self, _hud: &Hud) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Added(EntityId, Sprite),
    Removed(EntityId),
    Countdown(String),
    ShowMenu(Menu),
    HideMenu,
    Error(String),
}

/// Keeps a log of notifications, used by tests and the headless driver
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub events: Vec<UiEvent>,
    pub last_hud: Option<Hud>,
}

impl RecordingUi {
    pub fn menus(&self) -> Vec<Menu> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::ShowMenu(menu) => Some(*menu),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, UiEvent::Removed(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Ui for RecordingUi {
    fn entity_added(&mut self, id: EntityId, _bounds: Rect, sprite: Sprite) {
        self.events.push(UiEvent::Added(id, sprite));
    }

    fn entity_removed(&mut self, id: EntityId) {
        self.events.push(UiEvent::Removed(id));
    }

    fn hud(&mut self, hud: &Hud) {
        self.last_hud = Some(hud.clone());
    }

    fn countdown(&mut self, label: &str) {
        self.events.push(UiEvent::Countdown(label.to_string()));
    }

    fn show_menu(&mut self, menu: Menu) {
        self.events.push(UiEvent::ShowMenu(menu));
    }

    fn hide_menu(&mut self) {
        self.events.push(UiEvent::HideMenu);
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(UiEvent::Error(message.to_string()));
    }
}
