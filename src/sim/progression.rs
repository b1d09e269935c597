//! Level progression state machine
//!
//! `Countdown -> Active <-> Paused -> Finished(transition)`. A level reports
//! its outcome exactly once, as a [`Transition`] value for the controller to
//! act on; once `Finished` the level never ticks again.

use serde::Serialize;

use super::level::{Level, Objective};
use super::tick::tick;
use crate::consts::COUNTDOWN_LABELS;
use crate::ui::{Menu, Ui};

/// Outcome handed to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// The player was destroyed
    Lose,
    /// The final level was cleared
    Win,
    /// Load the named level
    Advance(String),
    /// Reload the named level from scratch
    Restart(String),
    /// Back to the main menu
    ToMenu,
}

/// Countdown progress for one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownStep {
    /// A new label should be shown
    Announce(String),
    Holding,
    Done,
}

/// "3", "2", "1", then the level title, each held for `step_ticks`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    labels: Vec<String>,
    step_ticks: u32,
    elapsed: u32,
}

impl Countdown {
    pub fn new(title: &str, step_ticks: u32) -> Self {
        let mut labels: Vec<String> = (1..COUNTDOWN_LABELS)
            .rev()
            .map(|n| n.to_string())
            .collect();
        labels.push(title.to_string());
        Self {
            labels,
            step_ticks: step_ticks.max(1),
            elapsed: 0,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn advance(&mut self) -> CountdownStep {
        let total = self.step_ticks * self.labels.len() as u32;
        if self.elapsed >= total {
            return CountdownStep::Done;
        }
        let at = self.elapsed;
        self.elapsed += 1;
        if at % self.step_ticks == 0 {
            let index = (at / self.step_ticks) as usize;
            CountdownStep::Announce(self.labels[index].clone())
        } else {
            CountdownStep::Holding
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LevelPhase {
    /// Simulation frozen while the level is announced
    Countdown(Countdown),
    Active,
    /// Toggled by the pause intent; nothing advances
    Paused,
    /// Terminal for this level instance
    Finished(Transition),
}

impl Level {
    /// Drive the level by one timer callback.
    ///
    /// Runs the countdown, then one simulation tick per call while active.
    /// Returns the transition on the call that ends the level.
    pub fn update(&mut self, ui: &mut dyn Ui) -> Option<Transition> {
        match &mut self.phase {
            LevelPhase::Countdown(countdown) => match countdown.advance() {
                CountdownStep::Announce(label) => {
                    ui.countdown(&label);
                    None
                }
                CountdownStep::Holding => None,
                CountdownStep::Done => {
                    log::info!("{} started", self.blueprint.id);
                    self.phase = LevelPhase::Active;
                    tick(self, ui).transition
                }
            },
            LevelPhase::Active => tick(self, ui).transition,
            LevelPhase::Paused | LevelPhase::Finished(_) => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == LevelPhase::Active
    }

    pub fn is_paused(&self) -> bool {
        self.phase == LevelPhase::Paused
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, LevelPhase::Finished(_))
    }

    /// Swap between `Active` and `Paused`; ignored in any other phase.
    ///
    /// Returns true if the phase changed.
    pub fn toggle_pause(&mut self, ui: &mut dyn Ui) -> bool {
        match self.phase {
            LevelPhase::Active => {
                self.phase = LevelPhase::Paused;
                ui.show_menu(Menu::Pause);
                log::info!("{} paused at tick {}", self.blueprint.id, self.ticks);
                true
            }
            LevelPhase::Paused => {
                self.phase = LevelPhase::Active;
                ui.hide_menu();
                log::info!("{} resumed", self.blueprint.id);
                true
            }
            _ => false,
        }
    }

    /// Check lose, then win. Fires at most once per level instance.
    pub(crate) fn evaluate_end_condition(&mut self, ui: &mut dyn Ui) -> Option<Transition> {
        if self.phase != LevelPhase::Active {
            return None;
        }

        let transition = if self.player_down {
            Transition::Lose
        } else {
            let cleared = match self.blueprint.objective {
                Objective::Kills(target) => self.kills >= target,
                Objective::DefeatBoss => self.boss_defeated,
            };
            if !cleared {
                return None;
            }
            match &self.blueprint.next {
                Some(next) => Transition::Advance(next.clone()),
                None => Transition::Win,
            }
        };

        match &transition {
            Transition::Lose => ui.show_menu(Menu::GameOver),
            Transition::Win => ui.show_menu(Menu::Win),
            _ => {}
        }
        log::info!(
            "{} finished after {} ticks with {} kills: {transition:?}",
            self.blueprint.id,
            self.ticks,
            self.kills
        );
        self.phase = LevelPhase::Finished(transition.clone());
        Some(transition)
    }
}
