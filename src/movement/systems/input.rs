//! Movement domain: input sampling for locomotion.

use bevy::prelude::*;

use crate::movement::{FrameInput, LatchedInput, RawInput};

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut latched: ResMut<LatchedInput>) {
    let held = |keys: [KeyCode; 2]| keys.iter().any(|key| keyboard.pressed(*key));
    let just = |keys: [KeyCode; 2]| keys.iter().any(|key| keyboard.just_pressed(*key));

    let raw = RawInput {
        left: held([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: held([KeyCode::KeyD, KeyCode::ArrowRight]),
        up: held([KeyCode::KeyW, KeyCode::ArrowUp]),
        down: held([KeyCode::KeyS, KeyCode::ArrowDown]),
        stick: None,
        jump_just_pressed: just([KeyCode::Space, KeyCode::KeyK]),
        jump_held: held([KeyCode::Space, KeyCode::KeyK]),
        dash_just_pressed: just([KeyCode::ShiftLeft, KeyCode::KeyJ]),
        attack_just_pressed: just([KeyCode::KeyZ, KeyCode::KeyU]),
        interact_just_pressed: keyboard.just_pressed(KeyCode::KeyE),
    };

    // Several frames may render between two fixed ticks
    latched.latch(FrameInput::from_raw(&raw));
}
