use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};
use runner_core::{RunnerConfig, Variant};

/// Simulation rate. Every physics constant is expressed per tick at this rate.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Bevy app with the window sized to the runner's viewport.
pub fn get_default_app(variant: Variant) -> App {
    let config = RunnerConfig::for_variant(variant);
    let mut app = App::new();

    let asset_plugin = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: format!("{variant} runner"),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution: WindowResolution::new(config.viewport_width, config.viewport_height),
            canvas: Some("#bit".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // keep browser shortcuts like F5 working
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..default()
        }),
        ..default()
    };

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin)
            .set(window_plugin)
            .set(render_plugin),
    );

    // Saves battery on mobile.
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND));

    app
}
