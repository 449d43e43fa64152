//! Tilt Arcade desktop demo
//!
//! Runs one game against simulated device services: a sensor that sways
//! back and forth, a renderer and tone player that log what they are asked
//! to do, and an auto-player that restarts after each game over and exits
//! after a few rounds.
//!
//! Usage: `tilt-arcade [pong|dodger] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use tilt_arcade::audio::{AudioSink, Chirp};
    use tilt_arcade::games::{Dodger, Pong};
    use tilt_arcade::input::{Button, ButtonEvent, Event};
    use tilt_arcade::platform::{ImuSample, Navigator, PowerPolicy, Renderer, Screen, Sensor};
    use tilt_arcade::sim::{Frame, Game, GamePhase};
    use tilt_arcade::{Collaborators, HostError, SessionHost, Settings};

    const ROUNDS: u32 = 3;
    const TIME_LIMIT: Duration = Duration::from_secs(60);
    const UI_PERIOD: Duration = Duration::from_millis(5);

    /// Slow sinusoidal sway on both tilt axes
    struct SwayingSensor {
        epoch: Instant,
    }

    impl Sensor for SwayingSensor {
        fn sample(&self) -> Option<ImuSample> {
            let t = self.epoch.elapsed().as_secs_f32();
            Some(ImuSample {
                accel_x: 0.25 * (t * 0.9).sin(),
                accel_y: 0.25 * (t * 1.3).sin(),
                accel_z: 1.0,
            })
        }
    }

    struct LogTones;

    impl AudioSink for LogTones {
        fn play(&self, chirp: Chirp) {
            log::info!("tone {} Hz for {} ms", chirp.start_freq, chirp.duration_ms);
        }

        fn play_sequence(&self, chirps: &[Chirp]) {
            log::info!("tone sequence {:?}", chirps);
        }
    }

    struct LogPower;

    impl PowerPolicy for LogPower {
        fn set_auto_sleep(&self, enabled: bool) {
            log::info!("auto sleep {}", if enabled { "on" } else { "off" });
        }
    }

    #[derive(Default)]
    struct LogRenderer {
        last_phase: Option<GamePhase>,
    }

    impl Renderer for LogRenderer {
        fn present(&mut self, frame: &Frame) {
            if self.last_phase != Some(frame.phase) {
                log::info!("{}", frame.label().replace('\n', " / "));
                self.last_phase = Some(frame.phase);
            }
            if frame.tick % 60 == 0 {
                match serde_json::to_string(frame) {
                    Ok(json) => log::debug!("frame {}", json),
                    Err(err) => log::warn!("could not encode frame: {}", err),
                }
            }
        }
    }

    struct ExitFlag(Arc<AtomicBool>);

    impl Navigator for ExitFlag {
        fn request_exit(&mut self) {
            self.0.store(true, Ordering::Release);
        }
    }

    fn load_settings(path: Option<&str>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        let loaded = std::fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|err| err.to_string()));
        match loaded {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings, could not load {}: {}", path, err);
                Settings::default()
            }
        }
    }

    fn play<G: Game>(settings: &Settings) -> Result<(), HostError> {
        let exit = Arc::new(AtomicBool::new(false));
        let mut host: SessionHost<G> = SessionHost::new(
            settings,
            Collaborators {
                sensor: Arc::new(SwayingSensor {
                    epoch: Instant::now(),
                }),
                audio: Arc::new(LogTones),
                power: Arc::new(LogPower),
                renderer: Box::new(LogRenderer::default()),
                navigator: Box::new(ExitFlag(Arc::clone(&exit))),
            },
        );
        let buttons = host.event_sender();

        host.on_start()?;
        let started = Instant::now();
        let mut rounds = 0;
        let mut was_over = false;

        while !exit.load(Ordering::Acquire) {
            host.run_loop();

            let over = host.phase().is_over();
            if over && !was_over {
                rounds += 1;
                let button = if rounds >= ROUNDS { Button::Alt } else { Button::Select };
                buttons.post(Event::Input(ButtonEvent::press(button)));
            }
            was_over = over;

            if started.elapsed() > TIME_LIMIT {
                log::info!("Time limit reached");
                break;
            }
            std::thread::sleep(UI_PERIOD);
        }

        host.on_stop()?;
        log::info!("{}: {} rounds played", G::NAME, rounds);
        Ok(())
    }

    pub fn run() -> Result<(), HostError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let settings = load_settings(args.get(1).map(String::as_str));
        match args.first().map(String::as_str).unwrap_or("pong") {
            "dodger" => play::<Dodger>(&settings),
            "pong" => play::<Pong>(&settings),
            other => {
                log::error!("Unknown game '{}', expected pong or dodger", other);
                Ok(())
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tilt Arcade (native) starting...");
    if let Err(err) = demo::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
