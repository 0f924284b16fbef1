//! Engine-free simulation of a side-scrolling endless runner.
//!
//! A [`GameSession`] owns one run: the character, scrolling obstacles and
//! fruit, score and speed. Hosts feed it [`InputEvent`]s, pump
//! [`GameLoop::on_frame`] once per display refresh and draw the
//! [`DrawCommand`] list it produces.

pub mod collision;
pub mod config;
pub mod entity;
pub mod events;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod spawner;

pub use config::{ConfigError, RunnerConfig, Variant};
pub use entity::{GameState, Rgb};
pub use events::{GameEvent, InputEvent};
pub use render::DrawCommand;
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use session::{GameLoop, GameSession, TickOutcome};
