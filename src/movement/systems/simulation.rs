//! Movement domain: the fixed-tick controller step for every player body.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::systems::spatial::{AvianShapeQuery, ColliderPose};
use crate::movement::{
    CharacterController, LatchedInput, MovementEventMessage, MovementTuning, Player,
};

pub(crate) fn simulate_controllers(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    spatial: SpatialQuery,
    colliders: Query<ColliderPose>,
    mut latched: ResMut<LatchedInput>,
    mut bodies: Query<
        (
            Entity,
            &mut CharacterController,
            &mut Transform,
            &mut LinearVelocity,
            Option<&Children>,
        ),
        With<Player>,
    >,
    mut messages: MessageWriter<MovementEventMessage>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let input = latched.take();

    for (entity, mut controller, mut transform, mut velocity, children) in &mut bodies {
        let mut excluded = vec![entity];
        if let Some(children) = children {
            excluded.extend(children.iter());
        }
        let query = AvianShapeQuery::new(&spatial, &colliders, excluded);

        controller.sync_body(transform.translation.truncate(), velocity.0);
        let output = controller.tick(input, &query, &tuning, dt);

        velocity.0 = output.velocity;
        if output.repositioned {
            transform.translation = output.position.extend(transform.translation.z);
        }

        for event in output.events {
            messages.write(MovementEventMessage { entity, event });
        }
    }
}
