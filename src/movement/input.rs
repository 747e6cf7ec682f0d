//! Movement domain: device-independent per-tick input snapshot.

use bevy::prelude::*;

use crate::movement::MovementTuning;

/// Raw device state for one rendered frame, before any normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Analog stick, when a device provides one. Overrides the digital axes.
    pub stick: Option<Vec2>,
    pub jump_just_pressed: bool,
    pub jump_held: bool,
    pub dash_just_pressed: bool,
    pub attack_just_pressed: bool,
    pub interact_just_pressed: bool,
}

/// Normalized input consumed by exactly one fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// In [-1, 1] x [-1, 1].
    pub move_axis: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub dash_pressed: bool,
    pub attack_pressed: bool,
    pub interact_pressed: bool,
}

impl FrameInput {
    pub fn from_raw(raw: &RawInput) -> Self {
        let digital = |negative: bool, positive: bool| -> f32 {
            (positive as i8 - negative as i8) as f32
        };

        let axis = raw.stick.unwrap_or(Vec2::new(
            digital(raw.left, raw.right),
            digital(raw.down, raw.up),
        ));

        Self {
            move_axis: axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            jump_pressed: raw.jump_just_pressed,
            jump_held: raw.jump_held,
            dash_pressed: raw.dash_just_pressed,
            attack_pressed: raw.attack_just_pressed,
            interact_pressed: raw.interact_just_pressed,
        }
    }

    /// Axis-only input with no buttons, handy for scripted movement.
    pub fn moving(axis: Vec2) -> Self {
        Self {
            move_axis: axis,
            ..default()
        }
    }

    /// Snap each axis to -1, 0 or 1 around its deadzone when the tuning
    /// asks for digital-feeling movement.
    pub fn snapped(mut self, tuning: &MovementTuning) -> Self {
        if tuning.snap_input {
            self.move_axis.x = snap_axis(self.move_axis.x, tuning.horizontal_deadzone);
            self.move_axis.y = snap_axis(self.move_axis.y, tuning.vertical_deadzone);
        }
        self
    }

    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.dash_pressed = false;
        self.attack_pressed = false;
        self.interact_pressed = false;
    }
}

fn snap_axis(value: f32, deadzone: f32) -> f32 {
    // f32::signum(0.0) is 1.0, so zero must be caught even with no deadzone.
    if value == 0.0 || value.abs() < deadzone {
        0.0
    } else {
        value.signum()
    }
}
