//! Interaction domain: starting and driving interactions.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::interaction::components::{ActiveInteraction, InteractionTarget};
use crate::movement::{CharacterController, MovementEvent, MovementEventMessage, collider_entity};

pub(crate) fn drive_interactions(
    mut commands: Commands,
    mut players: Query<(Entity, &mut CharacterController, &ActiveInteraction)>,
    mut targets: Query<&mut InteractionTarget>,
) {
    for (entity, mut controller, active) in &mut players {
        let input = *controller.input();
        let finished = match targets.get_mut(active.target) {
            Ok(mut target) => target.0.update(&input, &mut controller),
            Err(_) => {
                warn!("interaction target {:?} is gone, returning control", active.target);
                controller.return_control();
                true
            }
        };
        if finished {
            commands.entity(entity).remove::<ActiveInteraction>();
        }
    }
}

pub(crate) fn start_interactions(
    mut commands: Commands,
    mut messages: MessageReader<MovementEventMessage>,
    mut players: Query<&mut CharacterController>,
    mut targets: Query<&mut InteractionTarget>,
) {
    for message in messages.read() {
        let MovementEvent::Interacted { target } = message.event else {
            continue;
        };
        let Ok(mut controller) = players.get_mut(message.entity) else {
            continue;
        };
        let target = collider_entity(target);

        match targets.get_mut(target) {
            Ok(mut interactable) => {
                interactable.0.interact(&mut controller);
                if !controller.has_control() {
                    commands
                        .entity(message.entity)
                        .insert(ActiveInteraction { target });
                }
            }
            Err(_) => {
                warn!("{:?} is on the interactable layer but has nothing to do", target);
                controller.return_control();
            }
        }
    }
}
