//! Vertical jump dynamics, the running ramp and the world scroll speed.

use crate::config::{RunConfig, RunnerConfig};
use crate::entity::Character;

/// Ticks spent on each frame of the running wobble.
const TICKS_PER_RUN_FRAME: u8 = 5;
const RUN_FRAMES: u8 = 4;

/// Which impulse a [`jump`] call applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    FromGround,
    Double,
}

/// Starts a jump from the ground, or a second one in mid-air when allowed.
/// Returns `None` once the airborne impulses are used up.
pub fn jump(character: &mut Character, config: &RunnerConfig) -> Option<Jump> {
    if !character.jumping {
        character.jumping = true;
        character.double_jumped = false;
        character.velocity_y = -config.jump_force;
        Some(Jump::FromGround)
    } else if config.double_jump && !character.double_jumped {
        character.double_jumped = true;
        character.velocity_y = -config.jump_force;
        Some(Jump::Double)
    } else {
        None
    }
}

/// Integrates gravity while airborne and lands the character on the ground line.
pub fn step_vertical(character: &mut Character, gravity: f32, ground_y: f32) {
    if !character.jumping {
        return;
    }

    character.velocity_y += gravity;
    character.y += character.velocity_y;

    if character.y >= ground_y {
        character.y = ground_y;
        character.jumping = false;
        character.double_jumped = false;
        character.velocity_y = 0.0;
    }
}

/// Ramps the run velocity towards `max_speed` while running and back to zero otherwise.
pub fn step_running(character: &mut Character, run: RunConfig) {
    character.velocity_x = if character.running {
        (character.velocity_x + run.acceleration).min(run.max_speed)
    } else {
        (character.velocity_x - run.acceleration).max(0.0)
    };
}

/// Advances the running wobble. Only moves while the run intent is held.
pub const fn step_animation(character: &mut Character) {
    if !character.running {
        return;
    }

    character.frame_counter += 1;
    if character.frame_counter >= TICKS_PER_RUN_FRAME {
        character.frame = (character.frame + 1) % RUN_FRAMES;
        character.frame_counter = 0;
    }
}

/// Running adds directly to the base scroll speed; growth scales the sum.
pub fn scroll_speed(config: &RunnerConfig, character: &Character, speed_scale: f32) -> f32 {
    (config.base_speed + character.velocity_x) * speed_scale
}

/// One tick of character movement. Returns the resulting world scroll speed.
pub fn step_character(character: &mut Character, config: &RunnerConfig, speed_scale: f32) -> f32 {
    step_vertical(character, config.gravity, config.ground_y());

    if let Some(run) = config.running {
        step_running(character, run);
    }

    scroll_speed(config, character, speed_scale)
}
