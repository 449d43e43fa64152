//! Game session state machine
//!
//! A `Session` owns everything one game screen simulates: the game world, the
//! tilt filter, the player actor, score/difficulty progression and the RNG.
//! Each call to `tick` runs one full update pass:
//!
//! 1. sensor sample → filter → actor position
//! 2. world step (physics, collisions, pool maintenance)
//! 3. scoring and difficulty
//! 4. terminal events → `GameOver`
//!
//! Nothing moves while the phase is `GameOver`; only a restart gets out.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::filter::{AxisMapping, FilteredAxis, PlayerActor};
use super::progression::{Progression, ProgressionRule};
use super::state::{Frame, GameEvent, GamePhase, Sprite};
use crate::input::{Button, ButtonEvent};
use crate::platform::{ImuSample, TiltAxis};

/// Per-tick view of the session handed to the game world
pub struct StepContext<'a> {
    /// Actor position after this tick's input stage
    pub actor: PlayerActor,
    /// Current difficulty scalar
    pub difficulty: f32,
    /// Tick number within the session (first tick is 1)
    pub tick: u64,
    pub rng: &'a mut Pcg32,
    events: &'a mut Vec<GameEvent>,
}

impl StepContext<'_> {
    /// Record something that happened this tick
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// A concrete mini-game driven by the generic session
pub trait Game: Send + 'static {
    /// Display name (also used as the tick thread name)
    const NAME: &'static str;
    /// Accelerometer component that steers the actor
    const AXIS: TiltAxis;
    /// Sensor smoothing coefficient
    const FILTER_STRENGTH: f32 = 0.15;
    /// Fraction of the remaining distance the actor covers each tick
    const ACTOR_RATE: f32;
    /// Score/difficulty rule
    const PROGRESSION: ProgressionRule;

    /// Build the world in its construction-time state
    fn new(rng: &mut Pcg32) -> Self;

    /// Put the world back in its construction-time state
    fn restart(&mut self, rng: &mut Pcg32);

    /// Advance physics, resolve collisions and maintain pools for one tick
    fn step(&mut self, ctx: &mut StepContext<'_>);

    /// Project the world into display sprites
    fn sprites(&self, actor: &PlayerActor, out: &mut Vec<Sprite>);
}

/// What a button press asks the hosting layer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonCommand {
    /// Leave the game for the previous screen
    Exit,
    /// Start a new round
    Restart,
    /// Nothing to do
    Ignored,
}

impl ButtonCommand {
    /// Map a button event to a command given the current phase
    pub fn route(event: ButtonEvent, phase: GamePhase) -> Self {
        if !event.is_press() {
            return ButtonCommand::Ignored;
        }
        match event.button {
            Button::Alt => ButtonCommand::Exit,
            Button::Select if phase.is_over() => ButtonCommand::Restart,
            _ => ButtonCommand::Ignored,
        }
    }
}

/// One running game
pub struct Session<G: Game> {
    world: G,
    filter: FilteredAxis,
    mapping: AxisMapping,
    actor: PlayerActor,
    progression: Progression,
    phase: GamePhase,
    rng: Pcg32,
    ticks: u64,
    /// Events raised by the last tick
    events: Vec<GameEvent>,
}

impl<G: Game> Session<G> {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = G::new(&mut rng);
        Self {
            world,
            filter: FilteredAxis::new(G::FILTER_STRENGTH),
            mapping: AxisMapping::default(),
            actor: PlayerActor::default(),
            progression: Progression::new(G::PROGRESSION),
            phase: GamePhase::Playing,
            rng,
            ticks: 0,
            events: Vec::with_capacity(8),
        }
    }

    /// Seed the tilt filter from a live reading
    pub fn prime(&mut self, sample: &ImuSample) {
        self.filter.reset(G::AXIS.read(sample));
    }

    /// Run one update pass. Returns the events it raised.
    pub fn tick(&mut self, sample: Option<ImuSample>) -> &[GameEvent] {
        self.events.clear();
        if self.phase.is_over() {
            return &self.events;
        }
        self.ticks += 1;

        // Input. Without a reading the actor holds its position.
        if let Some(sample) = sample {
            let filtered = self.filter.feed(G::AXIS.read(&sample));
            let target = self.mapping.target(filtered);
            self.actor.approach(target, G::ACTOR_RATE);
        }

        let mut ctx = StepContext {
            actor: self.actor,
            difficulty: self.progression.difficulty(),
            tick: self.ticks,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.world.step(&mut ctx);

        let mut terminal = false;
        for event in &self.events {
            self.progression.add_points(event.points());
            terminal |= event.is_terminal();
        }

        if self.progression.step() {
            log::debug!(
                "{}: difficulty {:.1} at score {}",
                G::NAME,
                self.progression.difficulty(),
                self.progression.score()
            );
            self.events.push(GameEvent::DifficultyRaised);
        }

        if terminal {
            self.phase = GamePhase::GameOver;
            log::info!(
                "{}: game over at tick {} with score {}",
                G::NAME,
                self.ticks,
                self.progression.score()
            );
        }

        &self.events
    }

    /// Handle a button event, restarting in place when asked to
    pub fn handle_button(&mut self, event: ButtonEvent) -> ButtonCommand {
        let command = ButtonCommand::route(event, self.phase);
        if command == ButtonCommand::Restart {
            self.restart();
        }
        command
    }

    /// Reset score, difficulty, world and actor and resume play
    pub fn restart(&mut self) {
        self.progression.reset();
        self.world.restart(&mut self.rng);
        self.actor = PlayerActor::default();
        self.filter.unprime();
        self.ticks = 0;
        self.events.clear();
        self.phase = GamePhase::Playing;
        log::info!("{}: restarted", G::NAME);
    }

    /// Immutable projection of the current state
    pub fn frame(&self) -> Frame {
        let mut sprites = Vec::with_capacity(8);
        self.world.sprites(&self.actor, &mut sprites);
        Frame {
            tick: self.ticks,
            score: self.progression.score(),
            phase: self.phase,
            sprites,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.progression.score()
    }

    #[inline]
    pub fn difficulty(&self) -> f32 {
        self.progression.difficulty()
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn actor(&self) -> &PlayerActor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut PlayerActor {
        &mut self.actor
    }

    pub fn filter(&self) -> &FilteredAxis {
        &self.filter
    }

    pub fn world(&self) -> &G {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut G {
        &mut self.world
    }
}
