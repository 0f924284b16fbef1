mod app;
mod draw;
mod input;
mod ribbit;
mod screens;
mod session;

use runner_core::Variant;

pub fn run(variant: Variant) {
    app::get_default_app(variant)
        .add_plugins(session::SessionPlugin { variant })
        .add_plugins(input::InputPlugin)
        .add_plugins(draw::DrawPlugin)
        .add_plugins(screens::ScreensPlugin)
        .add_plugins(ribbit::RibbitPlugin)
        .run();
}
