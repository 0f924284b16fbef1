use crate::collision::Pickup;
use crate::entity::GameState;
use crate::physics::Jump;

/// Requests coming from the input layer.
///
/// Everything except `SetRunning` is edge triggered; `SetRunning` carries the
/// current level of the run button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Start,
    Jump,
    SetRunning(bool),
    Pause,
    Resume,
}

/// Notifications for the presentation layer, drained after each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The displayed score changed.
    ScoreChanged(u32),
    StateChanged(GameState),
    GameOver { final_score: u32 },
    FruitCollected(Pickup),
    Jumped(Jump),
}
