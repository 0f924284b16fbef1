use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use runner_core::InputEvent;

use crate::session::{Runner, RunnerInput, RunnerSet, Screen};

/// Upward drag, in logical pixels, that counts as a jump.
const SWIPE_JUMP_THRESHOLD: f32 = 15.0;
/// Furthest the virtual stick moves from where the touch started.
const SWIPE_MAX_DISTANCE: f32 = 30.0;

#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum Action {
    /// Jumps while playing, starts a run otherwise.
    Jump,
    Run,
    Pause,
}

pub fn create_input_map() -> InputMap<Action> {
    let mut input_map = InputMap::default();

    input_map.insert(Action::Jump, KeyCode::Space);
    input_map.insert(Action::Jump, MouseButton::Left);
    input_map.insert(Action::Jump, GamepadButton::South);
    input_map.insert(Action::Run, KeyCode::ShiftLeft);
    input_map.insert(Action::Run, GamepadButton::East);
    input_map.insert(Action::Pause, KeyCode::Escape);
    input_map.insert(Action::Pause, KeyCode::KeyP);
    input_map.insert(Action::Pause, GamepadButton::Start);

    input_map
}

/// Vertical virtual stick for touch screens.
///
/// A drag reaching [`SWIPE_JUMP_THRESHOLD`] upward fires one jump and ends the
/// drag; the finger has to be lifted before the next swipe counts.
#[derive(Resource, Debug, Default)]
pub struct SwipeJoystick {
    start_y: Option<f32>,
    offset: f32,
}

impl SwipeJoystick {
    pub const fn press(&mut self, y: f32) {
        self.start_y = Some(y);
        self.offset = 0.0;
    }

    /// Feeds the current touch position. Returns `true` when it triggers a jump.
    pub fn drag(&mut self, y: f32) -> bool {
        let Some(start_y) = self.start_y else {
            return false;
        };

        // screen y grows downward, so an upward drag is positive
        self.offset = (start_y - y).clamp(-SWIPE_MAX_DISTANCE, SWIPE_MAX_DISTANCE);
        if self.offset >= SWIPE_JUMP_THRESHOLD {
            self.release();
            return true;
        }
        false
    }

    pub const fn release(&mut self) {
        self.start_y = None;
        self.offset = 0.0;
    }

    /// How far the stick is pushed, positive upward.
    pub const fn offset(&self) -> f32 {
        self.offset
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<Action>::default())
            .init_resource::<SwipeJoystick>()
            .add_systems(Startup, spawn_controller)
            .add_systems(
                Update,
                (read_actions, read_touches)
                    .in_set(RunnerSet::Input)
                    .run_if(resource_exists::<Runner>),
            );
    }
}

fn spawn_controller(mut commands: Commands) {
    commands.spawn((
        Name::new("Controller"),
        InputManagerBundle::<Action> {
            input_map: create_input_map(),
            ..default()
        },
    ));
}

const fn can_start(screen: Screen) -> bool {
    matches!(screen, Screen::Welcome | Screen::GameOver)
}

/// What the controller reported this frame.
#[derive(Debug, Clone, Copy, Default)]
struct ActionFrame {
    jump: bool,
    run_held: bool,
    pause: bool,
}

/// Turns one frame of actions into runner inputs.
///
/// `running` is the character's current run intent, `None` when the variant
/// cannot run. The run button is compared against it every frame, so a
/// release that happened while the run ignored input is still delivered.
fn action_inputs(screen: Screen, frame: ActionFrame, running: Option<bool>) -> Vec<InputEvent> {
    let mut inputs = Vec::new();

    if frame.jump {
        inputs.push(if can_start(screen) {
            InputEvent::Start
        } else {
            InputEvent::Jump
        });
    }

    if matches!(screen, Screen::Playing | Screen::Paused)
        && running.is_some_and(|running| running != frame.run_held)
    {
        inputs.push(InputEvent::SetRunning(frame.run_held));
    }

    if frame.pause {
        match screen {
            Screen::Playing => inputs.push(InputEvent::Pause),
            Screen::Paused => inputs.push(InputEvent::Resume),
            Screen::Welcome | Screen::GameOver => {}
        }
    }

    inputs
}

fn read_actions(
    query: Query<&ActionState<Action>>,
    screen: Res<State<Screen>>,
    runner: Res<Runner>,
    mut inputs: EventWriter<RunnerInput>,
) {
    let Ok(action_state) = query.get_single() else {
        error!("Input controller not found");
        return;
    };

    let frame = ActionFrame {
        jump: action_state.just_pressed(&Action::Jump),
        run_held: action_state.pressed(&Action::Run),
        pause: action_state.just_pressed(&Action::Pause),
    };
    let session = runner.session();
    let running = session
        .config()
        .running
        .map(|_| session.character().running);

    for input in action_inputs(*screen.get(), frame, running) {
        inputs.send(RunnerInput(input));
    }
}

/// Side of the square in the top right corner that pauses on touch.
pub const PAUSE_AREA: f32 = 60.0;

/// What a new touch means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchStart {
    Send(InputEvent),
    /// Begins a swipe on the virtual stick.
    Swipe,
}

fn touch_start(screen: Screen, position: Vec2, window_width: f32) -> TouchStart {
    match screen {
        Screen::Welcome | Screen::GameOver => TouchStart::Send(InputEvent::Start),
        Screen::Paused => TouchStart::Send(InputEvent::Resume),
        Screen::Playing if position.x >= window_width - PAUSE_AREA && position.y <= PAUSE_AREA => {
            TouchStart::Send(InputEvent::Pause)
        }
        Screen::Playing => TouchStart::Swipe,
    }
}

// Leafwing Input Manager doesn't support touch input, so touches are read here
fn read_touches(
    touches: Res<Touches>,
    screen: Res<State<Screen>>,
    windows: Query<&Window>,
    mut joystick: ResMut<SwipeJoystick>,
    mut inputs: EventWriter<RunnerInput>,
) {
    let screen = *screen.get();
    let window_width = windows.get_single().map_or(f32::INFINITY, Window::width);

    for touch in touches.iter_just_pressed() {
        match touch_start(screen, touch.position(), window_width) {
            TouchStart::Send(input) => {
                inputs.send(RunnerInput(input));
            }
            TouchStart::Swipe => joystick.press(touch.position().y),
        }
    }

    if screen == Screen::Playing {
        for touch in touches.iter() {
            if joystick.drag(touch.position().y) {
                inputs.send(RunnerInput(InputEvent::Jump));
            }
        }
    }

    if touches.any_just_released() || touches.any_just_canceled() {
        joystick.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drag_does_not_jump() {
        let mut joystick = SwipeJoystick::default();
        joystick.press(300.0);
        assert!(!joystick.drag(290.0), "10px is under the threshold");
        assert!((joystick.offset() - 10.0).abs() < f32::EPSILON, "stick follows");
    }

    #[test]
    fn upward_swipe_jumps_once() {
        let mut joystick = SwipeJoystick::default();
        joystick.press(300.0);
        assert!(joystick.drag(285.0), "15px up jumps");
        assert!(!joystick.drag(200.0), "the same drag never jumps twice");
        assert!(joystick.offset().abs() < f32::EPSILON, "stick recentred");

        joystick.press(200.0);
        assert!(joystick.drag(100.0), "a new touch can jump again");
    }

    #[test]
    fn downward_drag_is_clamped() {
        let mut joystick = SwipeJoystick::default();
        joystick.press(100.0);
        assert!(!joystick.drag(400.0), "downward never jumps");
        assert!(
            (joystick.offset() + SWIPE_MAX_DISTANCE).abs() < f32::EPSILON,
            "clamped at the maximum distance"
        );
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut joystick = SwipeJoystick::default();
        assert!(!joystick.drag(0.0), "no touch in progress");
    }

    #[test]
    fn only_welcome_and_game_over_start_runs() {
        assert!(can_start(Screen::Welcome), "welcome starts");
        assert!(can_start(Screen::GameOver), "game over restarts");
        assert!(!can_start(Screen::Playing), "playing jumps instead");
        assert!(!can_start(Screen::Paused), "paused waits for resume");
    }

    #[test]
    fn jump_starts_on_the_welcome_screen_and_jumps_while_playing() {
        let jump = ActionFrame {
            jump: true,
            ..ActionFrame::default()
        };
        assert_eq!(
            action_inputs(Screen::Welcome, jump, Some(false)),
            vec![InputEvent::Start],
            "space on the welcome screen starts"
        );
        assert_eq!(
            action_inputs(Screen::GameOver, jump, None),
            vec![InputEvent::Start],
            "space after a crash restarts"
        );
        assert_eq!(
            action_inputs(Screen::Playing, jump, Some(false)),
            vec![InputEvent::Jump],
            "space while playing jumps"
        );
    }

    #[test]
    fn pause_toggles() {
        let pause = ActionFrame {
            pause: true,
            ..ActionFrame::default()
        };
        assert_eq!(
            action_inputs(Screen::Playing, pause, None),
            vec![InputEvent::Pause],
            "esc pauses"
        );
        assert_eq!(
            action_inputs(Screen::Paused, pause, None),
            vec![InputEvent::Resume],
            "esc resumes"
        );
        assert!(
            action_inputs(Screen::Welcome, pause, None).is_empty(),
            "nothing to pause before a run"
        );
    }

    #[test]
    fn run_button_level_is_synced() {
        let held = ActionFrame {
            run_held: true,
            ..ActionFrame::default()
        };
        let released = ActionFrame::default();

        assert_eq!(
            action_inputs(Screen::Playing, held, Some(false)),
            vec![InputEvent::SetRunning(true)],
            "holding shift starts running"
        );
        assert!(
            action_inputs(Screen::Playing, held, Some(true)).is_empty(),
            "no repeat while the level matches"
        );
        assert_eq!(
            action_inputs(Screen::Paused, released, Some(true)),
            vec![InputEvent::SetRunning(false)],
            "a release while paused is delivered"
        );
        assert!(
            action_inputs(Screen::Playing, held, None).is_empty(),
            "variants without running get nothing"
        );
    }

    #[test]
    fn top_right_tap_pauses() {
        assert_eq!(
            touch_start(Screen::Playing, Vec2::new(780.0, 20.0), 800.0),
            TouchStart::Send(InputEvent::Pause),
            "pause corner"
        );
        assert_eq!(
            touch_start(Screen::Playing, Vec2::new(400.0, 300.0), 800.0),
            TouchStart::Swipe,
            "elsewhere starts a swipe"
        );
        assert_eq!(
            touch_start(Screen::Paused, Vec2::new(400.0, 300.0), 800.0),
            TouchStart::Send(InputEvent::Resume),
            "any tap resumes"
        );
        assert_eq!(
            touch_start(Screen::Welcome, Vec2::new(780.0, 20.0), 800.0),
            TouchStart::Send(InputEvent::Start),
            "the corner starts a run on the welcome screen"
        );
    }
}
