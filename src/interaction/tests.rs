//! Interaction domain: unit tests for readable signs.

use bevy::prelude::*;

use super::{Interactable, Readable};
use crate::movement::{CharacterController, FrameInput, MovementTuning};

fn withdrawn_controller() -> CharacterController {
    let mut controller = CharacterController::new(Vec2::ZERO, &MovementTuning::default());
    controller.take_away_control(true);
    controller
}

fn press() -> FrameInput {
    FrameInput {
        interact_pressed: true,
        ..default()
    }
}

#[test]
fn test_readable_pages_through_lines() {
    let mut controller = withdrawn_controller();
    let mut sign = Readable::new(vec!["one".to_string(), "two".to_string()]);

    sign.interact(&mut controller);
    assert!(sign.is_active());
    assert_eq!(sign.lines_shown(), 1);

    // Nothing happens without a press
    assert!(!sign.update(&FrameInput::default(), &mut controller));
    assert_eq!(sign.lines_shown(), 1);

    assert!(!sign.update(&press(), &mut controller));
    assert_eq!(sign.lines_shown(), 2);
    assert!(!controller.has_control());

    assert!(sign.update(&press(), &mut controller));
    assert!(!sign.is_active());
    assert!(controller.has_control());
}

#[test]
fn test_empty_readable_returns_control_at_once() {
    let mut controller = withdrawn_controller();
    let mut sign = Readable::new(Vec::new());

    sign.interact(&mut controller);
    assert!(!sign.is_active());
    assert!(controller.has_control());
}

#[test]
fn test_readable_restarts_from_first_line() {
    let mut controller = withdrawn_controller();
    let mut sign = Readable::new(vec!["only".to_string()]);

    sign.interact(&mut controller);
    assert!(sign.update(&press(), &mut controller));

    controller.take_away_control(true);
    sign.interact(&mut controller);
    assert!(sign.is_active());
    assert_eq!(sign.lines_shown(), 1);
}
