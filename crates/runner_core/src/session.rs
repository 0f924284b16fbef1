//! The per-run simulation and its frame-driven loop.

use tracing::{debug, info, trace};

use crate::collision;
use crate::config::{ConfigError, RunnerConfig};
use crate::entity::{Character, Fruit, GameState, Obstacle, Scenery, World};
use crate::events::{GameEvent, InputEvent};
use crate::physics;
use crate::render::{self, DrawCommand};
use crate::scheduler::FrameScheduler;
use crate::spawner::{self, Spawner};

/// What a call to [`GameSession::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing moved.
    Idle,
    Continue,
    /// An obstacle was hit this tick.
    GameOver,
}

/// All state of one game, owned explicitly instead of living in globals.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: RunnerConfig,
    world: World,
    pub(crate) character: Character,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) fruits: Vec<Fruit>,
    scenery: Scenery,
    spawner: Spawner,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: RunnerConfig, spawner: Spawner) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            world: World::new(&config),
            character: Character::new(&config),
            obstacles: Vec::new(),
            fruits: Vec::new(),
            scenery: Scenery::default(),
            spawner,
            events: Vec::new(),
            config,
        })
    }

    pub fn with_seed(config: RunnerConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, Spawner::with_seed(seed))
    }

    pub fn from_entropy(config: RunnerConfig) -> Result<Self, ConfigError> {
        Self::new(config, Spawner::from_entropy())
    }

    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub const fn world(&self) -> &World {
        &self.world
    }

    pub const fn state(&self) -> GameState {
        self.world.state
    }

    pub const fn display_score(&self) -> u32 {
        self.world.display_score()
    }

    pub const fn character(&self) -> &Character {
        &self.character
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn fruits(&self) -> &[Fruit] {
        &self.fruits
    }

    pub const fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    /// Hands the pending notifications to the presentation layer.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Start => self.start(),
            InputEvent::Jump => self.jump(),
            InputEvent::SetRunning(running) => self.set_running(running),
            InputEvent::Pause => self.pause(),
            InputEvent::Resume => self.resume(),
        }
    }

    /// Begins a fresh run from any state but `Playing`.
    pub fn start(&mut self) {
        if self.world.state == GameState::Playing {
            return;
        }

        self.world = World::new(&self.config);
        self.world.state = GameState::Playing;
        self.character = Character::new(&self.config);
        self.obstacles.clear();
        self.fruits.clear();
        self.scenery = Scenery::default();

        info!(variant = %self.config.variant, "run started");
        self.events
            .push(GameEvent::StateChanged(GameState::Playing));
        self.events.push(GameEvent::ScoreChanged(0));
    }

    pub fn pause(&mut self) {
        if self.world.state != GameState::Playing {
            return;
        }
        self.transition(GameState::Paused);
    }

    pub fn resume(&mut self) {
        if self.world.state != GameState::Paused {
            return;
        }
        self.transition(GameState::Playing);
    }

    /// Ends a running or paused run on behalf of the host, scoring it like a crash.
    pub fn finish(&mut self) {
        if !matches!(self.world.state, GameState::Playing | GameState::Paused) {
            return;
        }

        let final_score = self.world.display_score();
        info!(score = final_score, "run finished by host");
        self.transition(GameState::GameOver);
        self.events.push(GameEvent::GameOver { final_score });
    }

    pub fn jump(&mut self) {
        if self.world.state != GameState::Playing {
            return;
        }
        if let Some(jump) = physics::jump(&mut self.character, &self.config) {
            self.events.push(GameEvent::Jumped(jump));
        }
    }

    /// Level-triggered run intent. Kept while paused so a release during the
    /// pause still counts; ignored before a run, after it and in variants
    /// without running.
    pub fn set_running(&mut self, running: bool) {
        if !matches!(self.world.state, GameState::Playing | GameState::Paused)
            || self.config.running.is_none()
        {
            return;
        }
        self.character.running = running;
    }

    /// One simulation step: move, spawn, score, collide.
    pub fn tick(&mut self) -> TickOutcome {
        if self.world.state != GameState::Playing {
            return TickOutcome::Idle;
        }

        let shown_before = self.world.display_score();

        self.world.speed =
            physics::step_character(&mut self.character, &self.config, self.world.speed_scale);
        let speed = self.world.speed;

        self.spawner
            .spawn_obstacle_if_due(&mut self.obstacles, &self.config);
        spawner::prune_offscreen(&mut self.obstacles);
        spawner::advance(&mut self.obstacles, speed);

        self.spawner
            .spawn_fruit_if_due(&mut self.fruits, &self.obstacles, &self.config);
        spawner::prune_offscreen(&mut self.fruits);
        spawner::advance(&mut self.fruits, speed);

        self.world.raw_score = self.world.raw_score.saturating_add(1);
        self.world.speed_scale *= self.config.speed_multiplier;

        for pickup in collision::collect_fruits(&self.character, &mut self.fruits) {
            debug!(kind = %pickup.kind, value = pickup.value, "fruit collected");
            self.world.raw_score = self.world.raw_score.saturating_add(pickup.value);
            self.events.push(GameEvent::FruitCollected(pickup));
        }

        let shown = self.world.display_score();
        if shown != shown_before {
            self.events.push(GameEvent::ScoreChanged(shown));
        }

        let hit = collision::first_hit(&self.character, &self.obstacles).map(|obstacle| obstacle.kind);
        if let Some(kind) = hit {
            info!(%kind, score = shown, "run ended");
            self.transition(GameState::GameOver);
            self.events.push(GameEvent::GameOver { final_score: shown });
            return TickOutcome::GameOver;
        }

        physics::step_animation(&mut self.character);
        self.scenery.cloud_offset -= speed * self.config.cloud_parallax;
        if self.scenery.cloud_offset <= -self.config.viewport_width {
            self.scenery.cloud_offset = 0.0;
        }

        trace!(
            speed,
            raw_score = self.world.raw_score,
            obstacles = self.obstacles.len(),
            fruits = self.fruits.len(),
            "tick"
        );
        TickOutcome::Continue
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        render::render(self)
    }

    fn transition(&mut self, state: GameState) {
        info!(from = %self.world.state, to = %state, "state changed");
        self.world.state = state;
        self.events.push(GameEvent::StateChanged(state));
    }
}

/// Drives a [`GameSession`] from a host's frame callback.
///
/// A tick only runs when one was scheduled. Pausing and game over cancel the
/// pending tick, so no number of frames can move a suspended run.
#[derive(Debug)]
pub struct GameLoop<S> {
    session: GameSession,
    scheduler: S,
    frame: Vec<DrawCommand>,
}

impl<S: FrameScheduler> GameLoop<S> {
    pub fn new(session: GameSession, scheduler: S) -> Self {
        let frame = session.render();
        Self {
            session,
            scheduler,
            frame,
        }
    }

    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The last rendered frame. Stays on screen while paused or after game over.
    pub fn frame(&self) -> &[DrawCommand] {
        &self.frame
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let before = self.session.state();
        self.session.handle_input(event);
        let after = self.session.state();

        if after == GameState::Playing {
            if before != GameState::Playing {
                self.frame = self.session.render();
            }
            if !self.scheduler.is_scheduled() {
                self.scheduler.schedule_next_tick();
            }
        } else {
            self.scheduler.cancel_scheduled_tick();
        }
    }

    pub fn finish(&mut self) {
        self.session.finish();
        self.scheduler.cancel_scheduled_tick();
    }

    /// Called once per display refresh.
    pub fn on_frame(&mut self) -> TickOutcome {
        if !self.scheduler.take_due() {
            return TickOutcome::Idle;
        }

        let outcome = self.session.tick();
        if outcome == TickOutcome::Continue {
            self.frame = self.session.render();
            self.scheduler.schedule_next_tick();
        }
        outcome
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.session.drain_events()
    }
}
