//! Movement domain: horizontal and vertical speed resolution and velocity
//! application. Runs after every other controller, in that order.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::is_slope;
use crate::movement::math::{approach, approach_vec};
use crate::movement::state::KinematicState;

/// Below this a ground normal is treated as a wall rather than a slope.
const MIN_SLOPE_NORMAL_Y: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalIntent {
    pub input_x: f32,
    /// The active collider is blocked in the input direction.
    pub pushing_wall: bool,
    pub leaving_wall: bool,
    pub sticky_feet: bool,
    /// Wall-jump input influence in [0, 1].
    pub influence: f32,
    /// Crouch slowdown multiplier on max speed.
    pub crouch_multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalIntent {
    pub input_y: f32,
    pub ended_jump_early: bool,
    pub leaving_wall: bool,
}

pub fn resolve_horizontal(
    state: &mut KinematicState,
    intent: &HorizontalIntent,
    tuning: &MovementTuning,
    dt: f32,
) {
    if state.dashing || state.climbing_ledge || !state.has_control {
        return;
    }

    let x = intent.input_x;
    if x.abs() <= tuning.horizontal_deadzone {
        let deceleration = if state.grounded {
            let sticky = if intent.sticky_feet {
                tuning.sticky_feet_multiplier
            } else {
                1.0
            };
            tuning.ground_deceleration * sticky
        } else {
            tuning.air_deceleration
        };
        state.speed.x = approach(state.speed.x, 0.0, deceleration * dt);
    } else if state.crouching && state.grounded {
        let diminished = tuning.max_speed * intent.crouch_multiplier;
        state.speed.x = approach(state.speed.x, x * diminished, tuning.ground_deceleration * dt);
    } else {
        if intent.pushing_wall
            && state.velocity.x.abs() < tuning.wall_push_velocity_epsilon
            && !intent.leaving_wall
        {
            state.speed.x = 0.0;
        }
        let shimmy = if state.climbing_ladder {
            tuning.ladder_shimmy_speed_multiplier
        } else {
            1.0
        };
        state.speed.x = approach(
            state.speed.x,
            x * shimmy * tuning.max_speed,
            intent.influence * tuning.acceleration * dt,
        );
    }
}

/// `probe_ground` is only run when grounded and not rising, and yields the
/// ground normal under the feet if there is one.
pub fn resolve_vertical(
    state: &mut KinematicState,
    intent: &VerticalIntent,
    tuning: &MovementTuning,
    dt: f32,
    probe_ground: impl FnOnce() -> Option<Vec2>,
) {
    if state.dashing {
        return;
    }
    // The climb itself is animated; hold still until it hands back control
    if state.climbing_ledge {
        state.speed = Vec2::ZERO;
        return;
    }

    let y = intent.input_y;
    if state.climbing_ladder && state.has_control {
        let rate = if y > 0.0 {
            tuning.ladder_climb_speed
        } else {
            tuning.ladder_slide_speed
        };
        state.speed.y = y * rate;
    } else if state.grounded && state.speed.y <= 0.0 && state.has_control {
        state.speed.y = tuning.grounding_force;
        if let Some(normal) = probe_ground() {
            state.ground_normal = normal;
            if is_slope(normal) && normal.y.abs() > MIN_SLOPE_NORMAL_Y {
                state.speed.y = state.speed.x * -normal.x / normal.y;
                if state.speed.x != 0.0 {
                    state.speed.y += tuning.grounding_force;
                }
            }
        }
    } else if state.on_wall && !intent.leaving_wall && state.has_control {
        if y > 0.0 {
            state.speed.y = tuning.wall_climb_speed;
        } else if y < 0.0 {
            state.speed.y = -tuning.max_wall_fall_speed;
        } else if state.grabbing_ledge {
            state.speed.y = approach(state.speed.y, 0.0, tuning.ledge_grab_deceleration * dt);
        } else {
            state.speed.y = approach(
                state.speed.y.min(0.0),
                -tuning.max_wall_fall_speed,
                tuning.wall_fall_acceleration * dt,
            );
        }
    } else {
        let mut gravity = tuning.fall_acceleration;
        if intent.ended_jump_early && state.speed.y > 0.0 {
            gravity *= tuning.jump_end_early_gravity_modifier;
        }
        state.speed.y = approach(state.speed.y, -tuning.max_fall_speed, gravity * dt);
    }
}

/// Combine speed and external velocity, decay the external part and advance
/// the position. Returns the velocity handed to the body.
pub fn apply_velocity(state: &mut KinematicState, tuning: &MovementTuning, dt: f32) -> Vec2 {
    let velocity = state.speed + state.external_velocity;
    state.external_velocity = approach_vec(
        state.external_velocity,
        Vec2::ZERO,
        tuning.external_velocity_decay * dt,
    );
    state.velocity = velocity;
    state.position += velocity * dt;
    velocity
}
