//! Movement domain: body pose and event logging for the presentation layer.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::movement::systems::spatial::capsule;
use crate::movement::{
    BodyCollider, CharacterController, Facing, MovementEvent, MovementEventMessage,
    MovementTuning,
};

/// Swap the body collider between its standing and crouching shapes and
/// face the sprite along the controller's facing.
pub(crate) fn sync_body_pose(
    tuning: Res<MovementTuning>,
    controllers: Query<(&CharacterController, &Children)>,
    mut bodies: Query<(&mut BodyCollider, &mut Collider, &mut Transform, &mut Sprite)>,
) {
    for (controller, children) in &controllers {
        for child in children.iter() {
            let Ok((mut body, mut collider, mut transform, mut sprite)) = bodies.get_mut(child)
            else {
                continue;
            };

            sprite.flip_x = controller.facing() == Facing::Left;

            if body.crouching == controller.crouching() {
                continue;
            }
            body.crouching = controller.crouching();
            let shape = controller.active_collider(&tuning);
            *collider = capsule(shape.size);
            transform.translation = shape.offset.extend(transform.translation.z);
            sprite.custom_size = Some(shape.size);
        }
    }
}

pub(crate) fn log_movement_events(mut messages: MessageReader<MovementEventMessage>) {
    for message in messages.read() {
        match message.event {
            MovementEvent::GroundedChanged {
                landed: true,
                impact_speed,
            } => debug!("{:?} landed at {:.1} u/s", message.entity, impact_speed),
            MovementEvent::Interacted { target } => {
                info!("{:?} interacts with {:?}", message.entity, target)
            }
            event => debug!("{:?}: {:?}", message.entity, event),
        }
    }
}
