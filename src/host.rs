//! Screen adapter for a game session
//!
//! `SessionHost` binds one `Session` to the device collaborators and splits
//! the work across two contexts:
//!
//! - the tick thread (`GameClock`) owns the session while the screen is
//!   active: it samples the sensor, ticks, fires sound cues and publishes an
//!   immutable `Frame` per tick;
//! - the UI context (`Screen::run_loop`) applies the latest frame to the
//!   renderer and routes button presses.
//!
//! Only two flags cross between them: `game_over` (written by the tick
//! thread) and `restart_requested` (set by the UI, cleared by the tick
//! thread). The clock's own `running` flag covers start/stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::clock::GameClock;
use crate::input::{self, ButtonEvent, Event, EventQueue, EventSender};
use crate::platform::{Navigator, PowerPolicy, Renderer, Screen, Sensor};
use crate::settings::Settings;
use crate::sim::{ButtonCommand, Frame, Game, GameEvent, GamePhase, Session};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("session is already running")]
    AlreadyRunning,
    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("tick thread panicked; session was reset")]
    ClockPanicked,
}

/// Device services injected into a host
pub struct Collaborators {
    pub sensor: Arc<dyn Sensor>,
    pub audio: Arc<dyn AudioSink>,
    pub power: Arc<dyn PowerPolicy>,
    pub renderer: Box<dyn Renderer>,
    pub navigator: Box<dyn Navigator>,
}

/// The only session state shared between the two contexts
#[derive(Debug, Default)]
pub struct SessionFlags {
    game_over: AtomicBool,
    restart_requested: AtomicBool,
}

impl SessionFlags {
    pub fn phase(&self) -> GamePhase {
        if self.game_over.load(Ordering::Acquire) {
            GamePhase::GameOver
        } else {
            GamePhase::Playing
        }
    }

    fn publish_phase(&self, phase: GamePhase) {
        self.game_over.store(phase.is_over(), Ordering::Release);
    }

    fn request_restart(&self) {
        self.restart_requested.store(true, Ordering::Release);
    }

    fn take_restart(&self) -> bool {
        self.restart_requested.swap(false, Ordering::AcqRel)
    }
}

/// Single-slot mailbox: the tick thread overwrites, the UI context takes
#[derive(Debug, Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Frame>>,
}

impl FrameSlot {
    pub fn publish(&self, frame: Frame) {
        *self.latest.lock() = Some(frame);
    }

    /// Take the newest unconsumed frame, if any
    pub fn take(&self) -> Option<Frame> {
        self.latest.lock().take()
    }
}

/// Everything the tick thread owns while the screen is active
struct TickWorker<G: Game> {
    session: Session<G>,
    sensor: Arc<dyn Sensor>,
    audio: AudioManager,
    flags: Arc<SessionFlags>,
    frames: Arc<FrameSlot>,
}

impl<G: Game> TickWorker<G> {
    fn run_tick(&mut self) {
        if self.flags.take_restart() && self.session.phase().is_over() {
            self.session.restart();
        }

        let sample = self.sensor.sample();
        for event in self.session.tick(sample) {
            match event {
                GameEvent::PaddleHit | GameEvent::WallBounce => self.audio.play(SoundEffect::Hit),
                GameEvent::Missed | GameEvent::Crashed => self.audio.play(SoundEffect::Miss),
                GameEvent::ObstaclePassed | GameEvent::DifficultyRaised => {}
            }
        }

        // Phase first, so a frame showing GameOver never precedes the flag
        self.flags.publish_phase(self.session.phase());
        self.frames.publish(self.session.frame());
    }
}

/// One game screen
pub struct SessionHost<G: Game> {
    /// Session parked here while the screen is inactive
    idle: Option<TickWorker<G>>,
    clock: Option<GameClock<TickWorker<G>>>,
    flags: Arc<SessionFlags>,
    frames: Arc<FrameSlot>,
    queue: EventQueue,
    sender: EventSender,
    sensor: Arc<dyn Sensor>,
    audio: AudioManager,
    power: Arc<dyn PowerPolicy>,
    renderer: Box<dyn Renderer>,
    navigator: Box<dyn Navigator>,
    period: Duration,
}

impl<G: Game> SessionHost<G> {
    pub fn new(settings: &Settings, collaborators: Collaborators) -> Self {
        let Collaborators {
            sensor,
            audio,
            power,
            renderer,
            navigator,
        } = collaborators;

        let mut audio = AudioManager::new(audio);
        audio.set_muted(!settings.sound_enabled);

        let (sender, queue) = input::channel();
        let mut host = Self {
            idle: None,
            clock: None,
            flags: Arc::new(SessionFlags::default()),
            frames: Arc::new(FrameSlot::default()),
            queue,
            sender,
            sensor,
            audio,
            power,
            renderer,
            navigator,
            period: settings.frame_time(),
        };
        host.idle = Some(host.worker(Session::new(settings.session_seed())));
        host
    }

    fn worker(&self, session: Session<G>) -> TickWorker<G> {
        TickWorker {
            session,
            sensor: Arc::clone(&self.sensor),
            audio: self.audio.clone(),
            flags: Arc::clone(&self.flags),
            frames: Arc::clone(&self.frames),
        }
    }

    /// Handle for the input subsystem to post events to this screen
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Phase as last published by the tick thread
    pub fn phase(&self) -> GamePhase {
        match &self.idle {
            Some(worker) => worker.session.phase(),
            None => self.flags.phase(),
        }
    }

    /// The session, while the screen is inactive
    pub fn session(&self) -> Option<&Session<G>> {
        self.idle.as_ref().map(|w| &w.session)
    }

    pub fn session_mut(&mut self) -> Option<&mut Session<G>> {
        self.idle.as_mut().map(|w| &mut w.session)
    }

    fn route_button(&mut self, event: ButtonEvent) {
        // Inactive screen: the session is not shared, act on it directly
        if let Some(worker) = self.idle.as_mut() {
            if worker.session.handle_button(event) == ButtonCommand::Exit {
                self.navigator.request_exit();
            }
            return;
        }

        match ButtonCommand::route(event, self.flags.phase()) {
            ButtonCommand::Exit => {
                log::info!("{}: exit requested", G::NAME);
                self.navigator.request_exit();
            }
            ButtonCommand::Restart => self.flags.request_restart(),
            ButtonCommand::Ignored => {}
        }
    }
}

impl<G: Game> Screen for SessionHost<G> {
    fn on_start(&mut self) -> Result<(), HostError> {
        if self.clock.is_some() {
            return Err(HostError::AlreadyRunning);
        }
        let mut worker = match self.idle.take() {
            Some(worker) => worker,
            None => self.worker(Session::new(rand::random())),
        };

        self.power.set_auto_sleep(false);
        self.queue.drain();

        match self.sensor.sample() {
            Some(sample) => worker.session.prime(&sample),
            None => log::info!("{}: no sensor reading yet, priming on first sample", G::NAME),
        }
        self.flags.publish_phase(worker.session.phase());
        self.frames.publish(worker.session.frame());

        match GameClock::start(G::NAME, self.period, worker, TickWorker::run_tick) {
            Ok(clock) => {
                log::info!("{}: started, {:?} per tick", G::NAME, clock.period());
                self.clock = Some(clock);
                Ok(())
            }
            Err(err) => {
                log::error!("{}: could not start tick thread: {}", G::NAME, err);
                self.idle = Some(self.worker(Session::new(rand::random())));
                self.power.set_auto_sleep(true);
                Err(err.into())
            }
        }
    }

    fn on_stop(&mut self) -> Result<(), HostError> {
        let Some(clock) = self.clock.take() else {
            return Ok(());
        };

        let result = match clock.stop() {
            Some(worker) => {
                self.idle = Some(worker);
                Ok(())
            }
            None => {
                self.idle = Some(self.worker(Session::new(rand::random())));
                Err(HostError::ClockPanicked)
            }
        };

        self.queue.drain();
        self.power.set_auto_sleep(true);
        log::info!("{}: stopped", G::NAME);
        result
    }

    fn run_loop(&mut self) {
        if let Some(frame) = self.frames.take() {
            self.renderer.present(&frame);
        }
        if let Some(Event::Input(button)) = self.queue.poll() {
            self.route_button(button);
        }
    }
}

impl<G: Game> Drop for SessionHost<G> {
    fn drop(&mut self) {
        if self.clock.is_some() {
            let _ = self.on_stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Chirp;
    use crate::audio::notes::NOTE_C5;
    use crate::games::{Dodger, Pong};
    use crate::input::Button;
    use crate::platform::ImuSample;
    use crate::sim::Ball;
    use glam::Vec2;
    use std::time::Instant;

    #[derive(Default)]
    struct FixedSensor {
        sample: Option<ImuSample>,
    }

    impl Sensor for FixedSensor {
        fn sample(&self) -> Option<ImuSample> {
            self.sample
        }
    }

    #[derive(Default)]
    struct AudioLog {
        cues: Mutex<Vec<Vec<Chirp>>>,
    }

    impl AudioSink for AudioLog {
        fn play(&self, chirp: Chirp) {
            self.cues.lock().push(vec![chirp]);
        }

        fn play_sequence(&self, chirps: &[Chirp]) {
            self.cues.lock().push(chirps.to_vec());
        }
    }

    #[derive(Default)]
    struct PowerLog {
        calls: Mutex<Vec<bool>>,
    }

    impl PowerPolicy for PowerLog {
        fn set_auto_sleep(&self, enabled: bool) {
            self.calls.lock().push(enabled);
        }
    }

    #[derive(Clone, Default)]
    struct FrameLog {
        frames: Arc<Mutex<Vec<Frame>>>,
    }

    impl Renderer for FrameLog {
        fn present(&mut self, frame: &Frame) {
            self.frames.lock().push(frame.clone());
        }
    }

    #[derive(Clone, Default)]
    struct ExitLog {
        exits: Arc<Mutex<u32>>,
    }

    impl Navigator for ExitLog {
        fn request_exit(&mut self) {
            *self.exits.lock() += 1;
        }
    }

    struct Rig {
        audio: Arc<AudioLog>,
        power: Arc<PowerLog>,
        frames: FrameLog,
        exits: ExitLog,
    }

    fn host<G: Game>(sample: Option<ImuSample>) -> (SessionHost<G>, Rig) {
        let rig = Rig {
            audio: Arc::new(AudioLog::default()),
            power: Arc::new(PowerLog::default()),
            frames: FrameLog::default(),
            exits: ExitLog::default(),
        };
        let settings = Settings {
            frame_time_ms: 1,
            seed: Some(1234),
            ..Default::default()
        };
        let host = SessionHost::new(
            &settings,
            Collaborators {
                sensor: Arc::new(FixedSensor { sample }),
                audio: rig.audio.clone(),
                power: rig.power.clone(),
                renderer: Box::new(rig.frames.clone()),
                navigator: Box::new(rig.exits.clone()),
            },
        );
        (host, rig)
    }

    /// Run the UI loop until the newest presented frame satisfies `pred`
    fn pump_until<G: Game>(
        host: &mut SessionHost<G>,
        rig: &Rig,
        pred: impl Fn(&Frame) -> bool,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            host.run_loop();
            if rig.frames.frames.lock().last().is_some_and(&pred) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_auto_sleep_toggled_around_session() {
        let (mut host, rig) = host::<Dodger>(Some(ImuSample::default()));
        host.on_start().unwrap();
        assert!(host.is_running());
        assert_eq!(*rig.power.calls.lock(), vec![false]);
        host.on_stop().unwrap();
        assert!(!host.is_running());
        assert_eq!(*rig.power.calls.lock(), vec![false, true]);
    }

    #[test]
    fn test_double_start_rejected() {
        let (mut host, _rig) = host::<Dodger>(None);
        host.on_start().unwrap();
        assert!(matches!(host.on_start(), Err(HostError::AlreadyRunning)));
        host.on_stop().unwrap();
        // Stopping twice is harmless
        host.on_stop().unwrap();
    }

    #[test]
    fn test_frames_reach_renderer() {
        let (mut host, rig) = host::<Dodger>(Some(ImuSample::default()));
        host.on_start().unwrap();
        assert!(pump_until(&mut host, &rig, |f| f.tick >= 3));
        host.on_stop().unwrap();

        let frames = rig.frames.frames.lock();
        assert!(frames.windows(2).all(|w| w[0].tick <= w[1].tick));
        assert!(host.session().unwrap().ticks() >= 3);
    }

    #[test]
    fn test_filter_primed_at_start_when_sample_available() {
        let tilt = ImuSample {
            accel_y: 0.2,
            ..Default::default()
        };
        let (mut host, _rig) = host::<Pong>(Some(tilt));
        host.on_start().unwrap();
        host.on_stop().unwrap();
        let session = host.session().unwrap();
        assert!(session.filter().is_primed());
        assert!((session.filter().current() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_no_sample_leaves_filter_unprimed() {
        let (mut host, rig) = host::<Pong>(None);
        host.on_start().unwrap();
        assert!(pump_until(&mut host, &rig, |f| f.tick >= 2));
        host.on_stop().unwrap();
        let session = host.session().unwrap();
        assert!(!session.filter().is_primed());
        assert_eq!(session.actor().axis_pos, 0.5);
    }

    #[test]
    fn test_exit_button_requests_transition() {
        let (mut host, rig) = host::<Pong>(None);
        let sender = host.event_sender();
        host.on_start().unwrap();
        assert!(sender.post(Event::Input(ButtonEvent::press(Button::Alt))));
        host.run_loop();
        assert_eq!(*rig.exits.exits.lock(), 1);
        host.on_stop().unwrap();
    }

    #[test]
    fn test_miss_then_restart_through_ui_context() {
        let (mut host, rig) = host::<Pong>(None);
        {
            let session = host.session_mut().unwrap();
            session.actor_mut().axis_pos = 0.0;
            session.world_mut().ball = Ball {
                pos: Vec2::new(3.0, 100.0),
                vel: Vec2::new(-1.5, 0.0),
            };
        }
        let sender = host.event_sender();
        host.on_start().unwrap();

        assert!(pump_until(&mut host, &rig, |f| f.phase == GamePhase::GameOver));
        assert_eq!(host.phase(), GamePhase::GameOver);
        let last = rig.frames.frames.lock().last().cloned().unwrap();
        assert_eq!(last.label(), "Score: 0\nGame Over!");
        assert!(rig.audio.cues.lock().iter().any(|c| c.len() == 3));

        sender.post(Event::Input(ButtonEvent::press(Button::Select)));
        assert!(pump_until(&mut host, &rig, |f| f.phase == GamePhase::Playing));
        host.on_stop().unwrap();
        assert_eq!(*rig.exits.exits.lock(), 0);
    }

    #[test]
    fn test_select_while_playing_does_not_restart() {
        let (mut host, rig) = host::<Dodger>(Some(ImuSample::default()));
        let sender = host.event_sender();
        host.on_start().unwrap();
        assert!(pump_until(&mut host, &rig, |f| f.tick >= 2));
        sender.post(Event::Input(ButtonEvent::press(Button::Select)));
        host.run_loop();
        assert!(pump_until(&mut host, &rig, |f| f.tick >= 5));
        host.on_stop().unwrap();
        // The tick counter only resets on restart
        assert!(host.session().unwrap().ticks() >= 5);
    }

    #[test]
    fn test_wall_and_paddle_play_hit_cue() {
        let (mut host, rig) = host::<Pong>(None);
        assert!(!host.audio.is_muted());
        {
            let session = host.session_mut().unwrap();
            session.world_mut().ball = Ball {
                pos: Vec2::new(120.0, 60.0),
                vel: Vec2::new(1.5, 0.0),
            };
        }
        // Drive the tick thread's work in place, one tick at a time
        let mut worker = host.idle.take().unwrap();
        let hit = vec![Chirp::tone(NOTE_C5, 50)];

        for _ in 0..3 {
            worker.run_tick();
        }
        assert_eq!(*rig.audio.cues.lock(), vec![hit.clone()]);
        assert_eq!(worker.session.score(), 0);

        let mut ticks = 0;
        while worker.session.score() == 0 && ticks < 200 {
            worker.run_tick();
            ticks += 1;
        }
        assert_eq!(worker.session.score(), 1);
        assert_eq!(*rig.audio.cues.lock(), vec![hit.clone(), hit.clone()]);

        while rig.audio.cues.lock().len() < 3 && ticks < 400 {
            worker.run_tick();
            ticks += 1;
        }
        assert_eq!(*rig.audio.cues.lock(), vec![hit.clone(), hit.clone(), hit]);
        assert_eq!(worker.session.score(), 1);
        assert_eq!(worker.flags.phase(), GamePhase::Playing);
        assert!(worker.frames.take().is_some_and(|f| f.score == 1));
    }

    #[test]
    fn test_muted_settings_silence_cues() {
        let audio = Arc::new(AudioLog::default());
        let settings = Settings {
            sound_enabled: false,
            frame_time_ms: 1,
            seed: Some(5),
        };
        let mut host: SessionHost<Pong> = SessionHost::new(
            &settings,
            Collaborators {
                sensor: Arc::new(FixedSensor::default()),
                audio: audio.clone(),
                power: Arc::new(PowerLog::default()),
                renderer: Box::new(FrameLog::default()),
                navigator: Box::new(ExitLog::default()),
            },
        );
        assert!(host.audio.is_muted());
        {
            let session = host.session_mut().unwrap();
            session.actor_mut().axis_pos = 0.0;
            session.world_mut().ball = Ball {
                pos: Vec2::new(1.0, 100.0),
                vel: Vec2::new(-1.5, 0.0),
            };
        }
        host.on_start().unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while host.phase() != GamePhase::GameOver && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        host.on_stop().unwrap();
        assert_eq!(host.phase(), GamePhase::GameOver);
        assert!(audio.cues.lock().is_empty());
    }

    #[test]
    fn test_buttons_while_inactive_act_directly() {
        let (mut host, rig) = host::<Pong>(None);
        {
            let session = host.session_mut().unwrap();
            session.actor_mut().axis_pos = 1.0;
            session.world_mut().ball = Ball {
                pos: Vec2::new(1.0, 10.0),
                vel: Vec2::new(-1.5, 0.0),
            };
            session.tick(None);
            assert_eq!(session.phase(), GamePhase::GameOver);
        }
        host.event_sender()
            .post(Event::Input(ButtonEvent::press(Button::Select)));
        host.run_loop();
        assert_eq!(host.phase(), GamePhase::Playing);
        assert_eq!(*rig.exits.exits.lock(), 0);
    }
}
