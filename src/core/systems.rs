//! Core domain: camera setup and follow.

use bevy::prelude::*;

use crate::movement::math::smooth_damp;
use crate::movement::{CharacterController, Player};

/// World units are sized for a character about two units tall.
const PIXELS_PER_UNIT: f32 = 48.0;

/// Smoothly trails the player, leading in the direction of travel.
#[derive(Component, Debug, Clone)]
pub struct CameraFollow {
    pub smooth_time: f32,
    /// Sign of `offset.x` follows the last horizontal input.
    pub offset: Vec2,
    pub look_ahead_distance: f32,
    pub min_y: f32,
    velocity: Vec2,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            smooth_time: 0.1,
            offset: Vec2::new(0.75, 2.0),
            look_ahead_distance: 2.0,
            min_y: 1.37,
            velocity: Vec2::ZERO,
        }
    }
}

impl CameraFollow {
    /// Where the camera wants to be for a target at `target` moving with
    /// `velocity` under horizontal input `input_x`.
    pub fn goal(&mut self, target: Vec2, velocity: Vec2, input_x: f32) -> Vec2 {
        if input_x > 0.1 {
            self.offset.x = self.offset.x.abs();
        } else if input_x < -0.1 {
            self.offset.x = -self.offset.x.abs();
        }
        let look_ahead = velocity.normalize_or_zero() * self.look_ahead_distance;
        let mut goal = target + self.offset + look_ahead;
        goal.y = goal.y.max(self.min_y);
        goal
    }

    pub fn step(&mut self, current: Vec2, goal: Vec2, dt: f32) -> Vec2 {
        Vec2::new(
            smooth_damp(current.x, goal.x, &mut self.velocity.x, self.smooth_time, dt),
            smooth_damp(current.y, goal.y, &mut self.velocity.y, self.smooth_time, dt),
        )
    }
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / PIXELS_PER_UNIT,
            ..OrthographicProjection::default_2d()
        }),
        CameraFollow::default(),
    ));
}

pub(crate) fn follow_player(
    time: Res<Time>,
    players: Query<(&Transform, &CharacterController), (With<Player>, Without<CameraFollow>)>,
    mut cameras: Query<(&mut Transform, &mut CameraFollow)>,
) {
    let Some((target, controller)) = players.iter().next() else {
        return;
    };
    let dt = time.delta_secs();

    for (mut transform, mut follow) in &mut cameras {
        let goal = follow.goal(
            target.translation.truncate(),
            controller.velocity(),
            controller.input().move_axis.x,
        );
        let position = follow.step(transform.translation.truncate(), goal, dt);
        transform.translation = position.extend(transform.translation.z);
    }
}
