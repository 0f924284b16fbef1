use bevy::prelude::*;
use runner_core::{
    ConfigError, GameEvent, GameLoop, GameSession, GameState, InputEvent, ManualScheduler,
    RunnerConfig, TickOutcome, Variant,
};

/// Which overlay is up. Mirrors the simulation's [`GameState`].
#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    Welcome,
    Playing,
    Paused,
    GameOver,
}

impl From<GameState> for Screen {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Start => Self::Welcome,
            GameState::Playing => Self::Playing,
            GameState::Paused => Self::Paused,
            GameState::GameOver => Self::GameOver,
        }
    }
}

/// The running game, ticked from `FixedUpdate`.
#[derive(Resource, Deref, DerefMut)]
pub struct Runner(GameLoop<ManualScheduler>);

impl Runner {
    pub fn new(variant: Variant) -> Result<Self, ConfigError> {
        let session = GameSession::from_entropy(RunnerConfig::for_variant(variant))?;
        Ok(Self(GameLoop::new(session, ManualScheduler::new())))
    }
}

/// Something the simulation reported, re-sent as a Bevy event.
#[derive(Event, Debug, Clone, Deref)]
pub struct RunnerEvent(pub GameEvent);

/// Player intent, already translated from raw input.
#[derive(Event, Debug, Clone, Copy)]
pub struct RunnerInput(pub InputEvent);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunnerSet {
    /// Writes [`RunnerInput`].
    Input,
    Apply,
    /// Writes [`RunnerEvent`].
    Publish,
}

pub struct SessionPlugin {
    pub variant: Variant,
}

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Screen>()
            .add_event::<RunnerInput>()
            .add_event::<RunnerEvent>()
            .configure_sets(
                Update,
                (RunnerSet::Input, RunnerSet::Apply, RunnerSet::Publish)
                    .chain()
                    .run_if(resource_exists::<Runner>),
            )
            .configure_sets(FixedUpdate, RunnerSet::Apply.run_if(resource_exists::<Runner>))
            .add_systems(Update, apply_input.in_set(RunnerSet::Apply))
            .add_systems(Update, publish_events.in_set(RunnerSet::Publish))
            .add_systems(FixedUpdate, tick.in_set(RunnerSet::Apply));

        match Runner::new(self.variant) {
            Ok(runner) => {
                info!("{} runner ready", self.variant);
                app.insert_resource(runner);
            }
            Err(err) => error!("Refusing to start the {} runner: {err}", self.variant),
        }
    }
}

fn apply_input(mut runner: ResMut<Runner>, mut inputs: EventReader<RunnerInput>) {
    for RunnerInput(input) in inputs.read() {
        runner.handle_input(*input);
    }
}

fn tick(mut runner: ResMut<Runner>) {
    if runner.on_frame() == TickOutcome::GameOver {
        info!("Game over at {}", runner.session().display_score());
    }
}

fn publish_events(
    mut runner: ResMut<Runner>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut events: EventWriter<RunnerEvent>,
) {
    for event in runner.drain_events() {
        if let GameEvent::StateChanged(state) = event {
            next_screen.set(state.into());
        }
        events.send(RunnerEvent(event));
    }
}
