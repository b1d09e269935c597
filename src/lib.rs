//! Sky Raid - side-scrolling air combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, level progression)
//! - `ui`: Renderer/UI collaborator contract
//! - `controller`: Level handoff driven by `Transition` values
//! - `autopilot`: Intent generator for idle/demo play
//! - `settings`: Runtime configuration loaded from JSON
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod controller;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use controller::{Controller, MenuChoice};
pub use settings::{ConfigError, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation interval in milliseconds (20 Hz)
    pub const TICK_MS: u64 = 50;

    /// Collision box = visual bounds scaled by these, centered
    pub const COLLISION_WIDTH_FACTOR: f32 = 0.8;
    pub const COLLISION_HEIGHT_FACTOR: f32 = 0.4;

    /// Default playfield
    pub const SCREEN_WIDTH: f32 = 1300.0;
    pub const SCREEN_HEIGHT: f32 = 750.0;

    /// "3", "2", "1" and the level title
    pub const COUNTDOWN_LABELS: usize = 4;
    pub const COUNTDOWN_STEP_MS: u64 = 1000;
    /// One countdown label at the default tick rate
    pub const COUNTDOWN_STEP_TICKS: u32 = (COUNTDOWN_STEP_MS / TICK_MS) as u32;
}
