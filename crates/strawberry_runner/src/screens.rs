use core::time::Duration;

use bevy::color::palettes::css::GOLD;
use bevy::prelude::*;
use runner_core::{GameEvent, Variant};

use crate::session::{Runner, RunnerEvent, RunnerSet, Screen};

pub struct ScreensPlugin;

impl Plugin for ScreensPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FinalScore>()
            .add_systems(Startup, (spawn_camera, spawn_score_text))
            .add_systems(OnEnter(Screen::Welcome), spawn_welcome_screen)
            .add_systems(OnExit(Screen::Welcome), despawn_screen::<WelcomeScreen>)
            .add_systems(OnEnter(Screen::Paused), spawn_pause_screen)
            .add_systems(OnExit(Screen::Paused), despawn_screen::<PauseScreen>)
            .add_systems(OnEnter(Screen::GameOver), spawn_game_over_screen)
            .add_systems(OnExit(Screen::GameOver), despawn_screen::<GameOverScreen>)
            .add_systems(
                Update,
                (
                    react_to_runner.after(RunnerSet::Publish),
                    animate_floating_scores,
                ),
            );
    }
}

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct WelcomeScreen;

#[derive(Component)]
struct PauseScreen;

#[derive(Component)]
struct GameOverScreen;

/// Score of the last finished run, shown on the game over screen.
#[derive(Resource, Default)]
struct FinalScore(u32);

#[derive(Component)]
struct FloatingScore {
    timer: Timer,
    top: f32,
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn spawn_score_text(mut commands: Commands) {
    commands.spawn((
        Text::new("Score: 0"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ScoreText,
    ));
}

fn overlay_text(text: impl Into<String>, font_size: f32, top: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(top),
            width: Val::Percent(100.0),
            ..default()
        },
    )
}

fn backdrop() -> impl Bundle {
    (
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
    )
}

pub const fn title(variant: Variant) -> &'static str {
    match variant {
        Variant::Strawberry => "Strawberry Runner",
        Variant::Dino => "Dino Runner",
    }
}

fn spawn_welcome_screen(mut commands: Commands, runner: Option<Res<Runner>>) {
    let variant = runner.map_or_else(Variant::default, |runner| {
        runner.session().config().variant
    });
    let controls = if variant == Variant::Strawberry {
        "Space or swipe up to jump, twice for a double jump\nHold Shift to run, Esc or the top right corner to pause"
    } else {
        "Space or swipe up to jump\nEsc or the top right corner to pause"
    };

    commands.spawn((backdrop(), WelcomeScreen));
    commands.spawn((overlay_text(title(variant), 48.0, 20.0), WelcomeScreen));
    commands.spawn((overlay_text(controls, 22.0, 45.0), WelcomeScreen));
    commands.spawn((overlay_text("Tap or press Space to start", 28.0, 75.0), WelcomeScreen));
}

fn spawn_pause_screen(mut commands: Commands) {
    commands.spawn((backdrop(), PauseScreen));
    commands.spawn((overlay_text("Paused", 48.0, 30.0), PauseScreen));
    commands.spawn((overlay_text("Press Esc or tap to resume", 28.0, 60.0), PauseScreen));
}

fn spawn_game_over_screen(mut commands: Commands, final_score: Res<FinalScore>) {
    commands.spawn((backdrop(), GameOverScreen));
    commands.spawn((overlay_text("Game Over!", 48.0, 20.0), GameOverScreen));
    commands.spawn((
        overlay_text(format!("Final score: {}", final_score.0), 32.0, 45.0),
        GameOverScreen,
    ));
    commands.spawn((overlay_text("Tap or press Space to play again", 28.0, 75.0), GameOverScreen));
}

fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn react_to_runner(
    mut commands: Commands,
    mut events: EventReader<RunnerEvent>,
    mut score_query: Query<&mut Text, With<ScoreText>>,
    mut final_score: ResMut<FinalScore>,
    windows: Query<&Window>,
    runner: Option<Res<Runner>>,
) {
    for event in events.read() {
        match **event {
            GameEvent::ScoreChanged(score) => {
                for mut text in &mut score_query {
                    text.0 = format!("Score: {score}");
                }
            }
            GameEvent::GameOver { final_score: score } => final_score.0 = score,
            GameEvent::FruitCollected(pickup) => {
                let Some(runner) = runner.as_ref() else {
                    continue;
                };
                let Ok(window) = windows.get_single() else {
                    error!("No window to place the pickup score on");
                    continue;
                };
                let config = runner.session().config();
                let ratio = Vec2::new(
                    window.width() / config.viewport_width,
                    window.height() / config.viewport_height,
                );
                let position = Vec2::new(pickup.x, pickup.y) * ratio;
                spawn_floating_score(&mut commands, position, pickup.value);
            }
            GameEvent::StateChanged(_) | GameEvent::Jumped(_) => {}
        }
    }
}

fn spawn_floating_score(commands: &mut Commands, position: Vec2, value: u32) {
    commands.spawn((
        Text::new(format!("+{value}")),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::Srgba(GOLD)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(position.x),
            top: Val::Px(position.y),
            ..default()
        },
        FloatingScore {
            timer: Timer::new(Duration::from_secs(1), TimerMode::Once),
            top: position.y,
        },
    ));
}

fn animate_floating_scores(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Node, &mut TextColor, &mut FloatingScore)>,
) {
    for (entity, mut node, mut color, mut floating) in &mut query {
        floating.timer.tick(time.delta());
        let progress = floating.timer.fraction();

        // drift up and fade out
        node.top = Val::Px((-50.0f32).mul_add(progress, floating.top));
        color.0 = Color::Srgba(GOLD.with_alpha(1.0 - progress));

        if floating.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}
