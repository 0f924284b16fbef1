//! Replays the simulation's draw list with gizmos.
//!
//! The list uses canvas pixels (origin top left, y down). Bevy's 2D camera
//! puts the origin at the window center with y up, so every point goes
//! through the canvas transform stack and then [`Canvas::to_world`].

use core::f32::consts::TAU;

use bevy::math::Affine2;
use bevy::prelude::*;
use runner_core::render::SKY;
use runner_core::{DrawCommand, Rgb};

use crate::input::{PAUSE_AREA, SwipeJoystick};
use crate::session::{Runner, Screen};

const CURVE_SEGMENTS: u16 = 24;

pub struct DrawPlugin;

impl Plugin for DrawPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(color(SKY))).add_systems(
            Update,
            (
                draw_frame,
                draw_joystick,
                draw_pause_button.run_if(in_state(Screen::Playing)),
            )
                .run_if(resource_exists::<Runner>),
        );
    }
}

pub fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::srgb_u8(r, g, b)
}

/// Canvas coordinate system with a transform stack.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: Vec2,
    stack: Vec<Affine2>,
}

impl Canvas {
    pub const fn new(size: Vec2) -> Self {
        Self {
            size,
            stack: Vec::new(),
        }
    }

    fn current(&self) -> Affine2 {
        self.stack.last().copied().unwrap_or(Affine2::IDENTITY)
    }

    /// Translates, then rotates, then mirrors x, relative to the current transform.
    pub fn push(&mut self, translate: (f32, f32), rotate: f32, scale_x: f32) {
        let local = Affine2::from_translation(Vec2::from(translate))
            * Affine2::from_angle(rotate)
            * Affine2::from_scale(Vec2::new(scale_x, 1.0));
        self.stack.push(self.current() * local);
    }

    /// Unbalanced pops are ignored.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Maps a point in the current canvas frame to Bevy world space.
    pub fn to_world(&self, point: Vec2) -> Vec2 {
        let canvas = self.current().transform_point2(point);
        Vec2::new(canvas.x - self.size.x / 2.0, self.size.y / 2.0 - canvas.y)
    }

    /// Length scale of the current transform, for radii.
    pub fn scale(&self) -> f32 {
        self.current().matrix2.x_axis.length()
    }

    fn closed(&self, points: impl IntoIterator<Item = Vec2>) -> Vec<Vec2> {
        let mut world: Vec<Vec2> = points.into_iter().map(|point| self.to_world(point)).collect();
        if let Some(&first) = world.first() {
            world.push(first);
        }
        world
    }

    pub fn rect(&self, x: f32, y: f32, width: f32, height: f32) -> Vec<Vec2> {
        self.closed([
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ])
    }

    pub fn ellipse(&self, center: Vec2, radii: Vec2, rotation: f32) -> Vec<Vec2> {
        let rotation = Rot2::radians(rotation);
        self.closed((0..CURVE_SEGMENTS).map(|i| {
            let t = f32::from(i) / f32::from(CURVE_SEGMENTS) * TAU;
            center + rotation * Vec2::new(radii.x * t.cos(), radii.y * t.sin())
        }))
    }

    pub fn arc(&self, center: Vec2, radius: f32, start: f32, end: f32) -> Vec<Vec2> {
        (0..=CURVE_SEGMENTS)
            .map(|i| {
                let t = (end - start).mul_add(f32::from(i) / f32::from(CURVE_SEGMENTS), start);
                self.to_world(center + radius * Vec2::new(t.cos(), t.sin()))
            })
            .collect()
    }
}

fn draw_frame(runner: Res<Runner>, mut gizmos: Gizmos) {
    let config = runner.session().config();
    let mut canvas = Canvas::new(Vec2::new(config.viewport_width, config.viewport_height));

    for command in runner.frame() {
        match command {
            // the camera clears every frame already
            DrawCommand::Clear => {}
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color: rgb,
            } => {
                gizmos.linestrip_2d(canvas.rect(*x, *y, *width, *height), color(*rgb));
            }
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color: rgb,
            } => {
                let center = canvas.to_world(Vec2::new(*x, *y));
                gizmos.circle_2d(center, radius * canvas.scale(), color(*rgb));
            }
            DrawCommand::FillEllipse {
                x,
                y,
                radius_x,
                radius_y,
                rotation,
                color: rgb,
            } => {
                let outline = canvas.ellipse(
                    Vec2::new(*x, *y),
                    Vec2::new(*radius_x, *radius_y),
                    *rotation,
                );
                gizmos.linestrip_2d(outline, color(*rgb));
            }
            DrawCommand::StrokeArc {
                x,
                y,
                radius,
                start,
                end,
                color: rgb,
                ..
            } => {
                let outline = canvas.arc(Vec2::new(*x, *y), *radius, *start, *end);
                gizmos.linestrip_2d(outline, color(*rgb));
            }
            DrawCommand::StrokeLine {
                from,
                to,
                color: rgb,
                ..
            } => {
                gizmos.line_2d(
                    canvas.to_world(Vec2::from(*from)),
                    canvas.to_world(Vec2::from(*to)),
                    color(*rgb),
                );
            }
            DrawCommand::FillPolygon { points, color: rgb } => {
                let outline = canvas.closed(points.iter().map(|&point| Vec2::from(point)));
                gizmos.linestrip_2d(outline, color(*rgb));
            }
            DrawCommand::PushTransform {
                translate,
                rotate,
                scale_x,
            } => canvas.push(*translate, *rotate, *scale_x),
            DrawCommand::PopTransform => canvas.pop(),
        }
    }
}

/// Touch stick in the bottom right corner, only while a swipe is in progress.
fn draw_joystick(runner: Res<Runner>, joystick: Res<SwipeJoystick>, mut gizmos: Gizmos) {
    if joystick.offset().abs() < f32::EPSILON {
        return;
    }

    let config = runner.session().config();
    let canvas = Canvas::new(Vec2::new(config.viewport_width, config.viewport_height));
    let base = Vec2::new(config.viewport_width - 60.0, config.viewport_height - 60.0);

    gizmos.circle_2d(canvas.to_world(base), 40.0, Color::WHITE);
    gizmos.circle_2d(
        canvas.to_world(base - Vec2::new(0.0, joystick.offset())),
        15.0,
        Color::WHITE,
    );
}

/// Two bars marking the tap area that pauses the run.
fn draw_pause_button(runner: Res<Runner>, mut gizmos: Gizmos) {
    let config = runner.session().config();
    let canvas = Canvas::new(Vec2::new(config.viewport_width, config.viewport_height));
    let left = config.viewport_width - PAUSE_AREA / 2.0 - 10.0;
    let top = PAUSE_AREA / 4.0;

    for x in [left, left + 12.0] {
        gizmos.linestrip_2d(canvas.rect(x, top, 8.0, PAUSE_AREA / 2.0), Color::BLACK);
    }
}
