//! Movement domain: debug-only detector overlay, toggled with F1.

use bevy::prelude::*;

use crate::movement::{CharacterController, MovementTuning, Player};

#[derive(Resource, Debug, Default)]
pub(crate) struct DetectorOverlay {
    pub visible: bool,
}

pub(crate) fn toggle_detector_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut overlay: ResMut<DetectorOverlay>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        overlay.visible = !overlay.visible;
        info!("Detector overlay: {}", overlay.visible);
    }
}

pub(crate) fn draw_detectors(
    overlay: Res<DetectorOverlay>,
    tuning: Res<MovementTuning>,
    players: Query<&CharacterController, With<Player>>,
    mut gizmos: Gizmos,
) {
    if !overlay.visible {
        return;
    }

    for controller in &players {
        let feet = controller.position();
        let body = controller.active_collider(&tuning);
        let standing_center = tuning.standing_collider.center(feet);

        let body_color = if controller.grounded() {
            Color::srgb(0.2, 0.9, 0.2)
        } else {
            Color::srgb(0.9, 0.9, 0.2)
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(body.center(feet)),
            body.size,
            body_color,
        );

        let wall_color = if controller.wall_direction() != 0 {
            Color::srgb(0.9, 0.3, 0.3)
        } else {
            Color::srgb(0.5, 0.5, 0.5)
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(standing_center),
            tuning.wall_detector_size,
            wall_color,
        );
        gizmos.rect_2d(
            Isometry2d::from_translation(standing_center),
            Vec2::splat(tuning.interactable_detector_size * 2.0),
            Color::srgb(0.3, 0.5, 0.9),
        );

        gizmos.line_2d(
            feet,
            feet - Vec2::new(0.0, tuning.grounder_distance * 2.0),
            Color::WHITE,
        );
        gizmos.line_2d(feet, feet + controller.ground_normal(), Color::srgb(0.2, 0.8, 0.8));

        if controller.grabbing_ledge() || controller.climbing_ledge() {
            gizmos.circle_2d(
                Isometry2d::from_translation(controller.ledge_corner()),
                0.1,
                Color::srgb(1.0, 0.5, 0.0),
            );
        }
    }
}
