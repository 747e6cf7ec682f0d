//! Movement domain: tuning and latched input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::input::FrameInput;

/// Collider volume relative to the body pivot (the feet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderShape {
    pub offset: Vec2,
    pub size: Vec2,
}

impl ColliderShape {
    pub const fn new(offset: Vec2, size: Vec2) -> Self {
        Self { offset, size }
    }

    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }
}

/// Every tunable of the character controller. Loaded once at startup and
/// never mutated afterwards. Speeds are world units per second, `*_frames`
/// fields count fixed ticks.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    // Input
    pub snap_input: bool,
    pub horizontal_deadzone: f32,
    pub vertical_deadzone: f32,

    // Volumes and detection
    pub standing_collider: ColliderShape,
    pub crouching_collider: ColliderShape,
    pub grounder_distance: f32,
    pub wall_detector_size: Vec2,
    pub interactable_detector_size: f32,
    pub skin_width: f32,

    // Horizontal
    pub max_speed: f32,
    pub acceleration: f32,
    pub ground_deceleration: f32,
    pub air_deceleration: f32,
    pub sticky_feet_multiplier: f32,
    /// Measured horizontal speed below which pushing into a wall zeroes speed.
    pub wall_push_velocity_epsilon: f32,

    // Vertical
    pub grounding_force: f32,
    pub jump_power: f32,
    pub max_fall_speed: f32,
    pub fall_acceleration: f32,
    pub jump_end_early_gravity_modifier: f32,
    pub coyote_frames: u32,
    pub jump_buffer_frames: u32,
    /// 0 = no double jump, 1 = double jump, 2 = triple, etc.
    pub max_air_jumps: u8,

    // Crouching
    pub allow_crouching: bool,
    pub crouch_speed_penalty: f32,
    pub crouch_slowdown_frames: u32,
    pub crouch_buffer_check: f32,

    // Dashing
    pub allow_dash: bool,
    pub dash_velocity: f32,
    pub dash_duration_frames: u32,
    pub dash_cooldown_frames: u32,
    pub dash_end_horizontal_multiplier: f32,

    // Walls
    pub allow_walls: bool,
    pub require_input_push: bool,
    pub wall_climb_speed: f32,
    pub wall_fall_acceleration: f32,
    pub max_wall_fall_speed: f32,
    pub wall_jump_power: Vec2,
    pub wall_jump_input_loss_frames: u32,
    pub wall_jump_coyote_frames: u32,

    // Ledges
    pub allow_ledges: bool,
    pub ledge_grab_point: Vec2,
    pub ledge_raycast_spacing: f32,
    pub ledge_probe_distance: f32,
    pub stand_up_offset: Vec2,
    pub ledge_grab_deceleration: f32,
    pub ledge_climb_teleport_frames: u32,
    pub ledge_climb_finish_frames: u32,

    // Ladders
    pub allow_ladders: bool,
    pub auto_attach_to_ladders: bool,
    pub snap_to_ladders: bool,
    pub ladder_snap_time: f32,
    pub ladder_climb_speed: f32,
    pub ladder_slide_speed: f32,
    pub ladder_shimmy_speed_multiplier: f32,
    pub ladder_pop_force: f32,
    pub ladder_cooldown_frames: u32,

    // Attacking
    pub allow_attacks: bool,
    pub attack_frame_cooldown: u32,

    // External forces and control
    pub external_velocity_decay: f32,
    /// 0 disables the warning.
    pub control_withdrawal_warn_frames: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            snap_input: true,
            horizontal_deadzone: 0.1,
            vertical_deadzone: 0.3,

            standing_collider: ColliderShape::new(Vec2::new(0.0, 0.9), Vec2::new(0.7, 1.8)),
            crouching_collider: ColliderShape::new(Vec2::new(0.0, 0.5), Vec2::new(0.7, 1.0)),
            grounder_distance: 0.05,
            wall_detector_size: Vec2::new(0.75, 1.25),
            interactable_detector_size: 1.0,
            skin_width: 0.02,

            max_speed: 14.0,
            acceleration: 120.0,
            ground_deceleration: 60.0,
            air_deceleration: 30.0,
            sticky_feet_multiplier: 2.0,
            wall_push_velocity_epsilon: 0.01,

            grounding_force: -1.5,
            jump_power: 36.0,
            max_fall_speed: 40.0,
            fall_acceleration: 110.0,
            jump_end_early_gravity_modifier: 3.0,
            coyote_frames: 7,
            jump_buffer_frames: 7,
            max_air_jumps: 1,

            allow_crouching: true,
            crouch_speed_penalty: 0.5,
            crouch_slowdown_frames: 50,
            crouch_buffer_check: 0.1,

            allow_dash: true,
            dash_velocity: 50.0,
            dash_duration_frames: 5,
            dash_cooldown_frames: 25,
            dash_end_horizontal_multiplier: 0.5,

            allow_walls: true,
            require_input_push: false,
            wall_climb_speed: 5.0,
            wall_fall_acceleration: 20.0,
            max_wall_fall_speed: 5.5,
            wall_jump_power: Vec2::new(30.0, 25.0),
            wall_jump_input_loss_frames: 18,
            wall_jump_coyote_frames: 5,

            allow_ledges: true,
            ledge_grab_point: Vec2::new(0.3, 1.5),
            ledge_raycast_spacing: 0.2,
            ledge_probe_distance: 0.5,
            stand_up_offset: Vec2::new(0.2, 0.0),
            ledge_grab_deceleration: 4.0,
            ledge_climb_teleport_frames: 12,
            ledge_climb_finish_frames: 20,

            allow_ladders: true,
            auto_attach_to_ladders: true,
            snap_to_ladders: true,
            ladder_snap_time: 0.05,
            ladder_climb_speed: 8.0,
            ladder_slide_speed: 12.0,
            ladder_shimmy_speed_multiplier: 0.5,
            ladder_pop_force: 10.0,
            ladder_cooldown_frames: 8,

            allow_attacks: true,
            attack_frame_cooldown: 15,

            external_velocity_decay: 100.0,
            control_withdrawal_warn_frames: 300,
        }
    }
}

/// A tuning value that had to be corrected on load.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningWarning {
    pub field: &'static str,
    pub value: f32,
}

impl std::fmt::Display for TuningWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tuning field '{}' is negative ({}), clamped to 0 (feature disabled)",
            self.field, self.value
        )
    }
}

impl MovementTuning {
    /// Peak height of a single ground jump: h = v² / (2g).
    pub fn single_jump_height(&self) -> f32 {
        if self.fall_acceleration <= 0.0 {
            return f32::INFINITY;
        }
        self.jump_power * self.jump_power / (2.0 * self.fall_acceleration)
    }

    /// Peak height with every air jump taken at the apex of the previous one.
    pub fn max_reachable_height(&self) -> f32 {
        self.single_jump_height() * (1.0 + self.max_air_jumps as f32)
    }

    /// Clamp every distance, speed and rate that must not be negative.
    /// `grounding_force` is signed and left alone.
    pub fn sanitized(self) -> (Self, Vec<TuningWarning>) {
        let mut tuning = self;
        let mut warnings = Vec::new();

        macro_rules! non_negative {
            ($($field:ident),* $(,)?) => {
                $(
                    if tuning.$field < 0.0 {
                        warnings.push(TuningWarning {
                            field: stringify!($field),
                            value: tuning.$field,
                        });
                        tuning.$field = 0.0;
                    }
                )*
            };
        }

        non_negative!(
            horizontal_deadzone,
            vertical_deadzone,
            grounder_distance,
            interactable_detector_size,
            skin_width,
            max_speed,
            acceleration,
            ground_deceleration,
            air_deceleration,
            sticky_feet_multiplier,
            wall_push_velocity_epsilon,
            jump_power,
            max_fall_speed,
            fall_acceleration,
            jump_end_early_gravity_modifier,
            crouch_speed_penalty,
            crouch_buffer_check,
            dash_velocity,
            dash_end_horizontal_multiplier,
            wall_climb_speed,
            wall_fall_acceleration,
            max_wall_fall_speed,
            ledge_raycast_spacing,
            ledge_probe_distance,
            ledge_grab_deceleration,
            ladder_snap_time,
            ladder_climb_speed,
            ladder_slide_speed,
            ladder_shimmy_speed_multiplier,
            ladder_pop_force,
            external_velocity_decay,
        );

        for (field, size) in [
            ("wall_detector_size", &mut tuning.wall_detector_size),
            ("standing_collider.size", &mut tuning.standing_collider.size),
            ("crouching_collider.size", &mut tuning.crouching_collider.size),
        ] {
            if size.x < 0.0 || size.y < 0.0 {
                warnings.push(TuningWarning {
                    field,
                    value: size.x.min(size.y),
                });
                *size = size.max(Vec2::ZERO);
            }
        }

        (tuning, warnings)
    }
}

/// Input gathered at frame rate and handed to the next fixed tick.
///
/// Axes and held buttons follow the latest frame; edge-triggered presses
/// accumulate until a tick takes them so a press between two ticks is
/// never lost.
#[derive(Resource, Debug, Default, Clone)]
pub struct LatchedInput {
    pending: FrameInput,
}

impl LatchedInput {
    pub fn latch(&mut self, fresh: FrameInput) {
        let pending = &mut self.pending;
        pending.move_axis = fresh.move_axis;
        pending.jump_held = fresh.jump_held;
        pending.jump_pressed |= fresh.jump_pressed;
        pending.dash_pressed |= fresh.dash_pressed;
        pending.attack_pressed |= fresh.attack_pressed;
        pending.interact_pressed |= fresh.interact_pressed;
    }

    pub fn take(&mut self) -> FrameInput {
        let snapshot = self.pending;
        self.pending.clear_edges();
        snapshot
    }
}
