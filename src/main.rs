//! Sky Raid headless driver
//!
//! Runs the simulation on a fixed timer with the autopilot at the controls and
//! logs what happens. Useful for soak runs and balance checks.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::thread;
    use std::time::Instant;

    use clap::Parser;

    use sky_raid::sim::{EntityId, Rect, Sprite, Transition};
    use sky_raid::ui::{Hud, Menu, Ui};
    use sky_raid::{Controller, Settings, autopilot, logging};

    /// Side-scrolling air combat simulation
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// JSON settings file
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// RNG seed (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,
        /// Level to start on
        #[arg(short, long)]
        level: Option<String>,
        /// Stop after this many timer callbacks
        #[arg(short, long, default_value_t = 12_000)]
        ticks: u64,
        /// Pace callbacks at the configured tick interval instead of flat out
        #[arg(long)]
        realtime: bool,
        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    /// Logs UI traffic instead of drawing it
    #[derive(Default)]
    struct HeadlessUi {
        live: usize,
        last_hud: Option<Hud>,
    }

    impl Ui for HeadlessUi {
        fn entity_added(&mut self, id: EntityId, bounds: Rect, sprite: Sprite) {
            self.live += 1;
            log::trace!("+ {id:?} {sprite:?} at ({:.0}, {:.0})", bounds.min.x, bounds.min.y);
        }

        fn entity_removed(&mut self, id: EntityId) {
            self.live = self.live.saturating_sub(1);
            log::trace!("- {id:?}");
        }

        fn hud(&mut self, hud: &Hud) {
            if self.last_hud.as_ref() != Some(hud) {
                log::debug!("hud {hud:?}");
                self.last_hud = Some(hud.clone());
            }
        }

        fn countdown(&mut self, label: &str) {
            log::info!("{label}");
        }

        fn show_menu(&mut self, menu: Menu) {
            log::info!("menu: {menu:?}");
        }

        fn show_error(&mut self, message: &str) {
            log::error!("{message}");
        }
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();
        logging::init(args.verbose);

        let mut settings = match &args.settings {
            Some(path) => match Settings::load(path) {
                Ok(settings) => settings,
                Err(err) => {
                    log::error!("{err}");
                    return ExitCode::FAILURE;
                }
            },
            None => Settings::default(),
        };
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        if let Some(level) = args.level {
            settings.start_level = level;
        }

        let mut controller = Controller::new(&settings, HeadlessUi::default());
        if controller.start().is_err() {
            return ExitCode::FAILURE;
        }

        let interval = settings.tick_interval();
        let mut deadline = Instant::now();
        let mut outcome = None;

        for _ in 0..args.ticks {
            if args.realtime {
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                    deadline += interval;
                } else {
                    // Behind schedule: drop the missed callbacks rather than queue them
                    deadline = now + interval;
                }
            }

            let intents = controller.level().map(autopilot::plan).unwrap_or_default();
            for intent in intents {
                controller.intent(intent);
            }

            match controller.tick() {
                Ok(Some(transition @ (Transition::Lose | Transition::Win))) => {
                    outcome = Some(transition);
                    break;
                }
                Ok(_) => {}
                Err(_) => return ExitCode::FAILURE,
            }
        }

        let ui = controller.ui();
        match (&outcome, controller.level()) {
            (Some(transition), Some(level)) => log::info!(
                "{transition:?} on {} after {} ticks, {} kills",
                level.id(),
                level.ticks(),
                level.kills()
            ),
            _ => log::info!("Stopped after {} callbacks, {} entities live", args.ticks, ui.live),
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedding hosts drive `sky_raid::Controller` directly
}
