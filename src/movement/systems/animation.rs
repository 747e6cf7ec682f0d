//! Movement domain: ledge climb timing.
//!
//! There is no animation graph yet, so the climb clip is stood in for by a
//! tick counter that fires the same two callbacks the clip would.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::movement::{
    CharacterController, LedgeClimbTimeline, MovementEvent, MovementEventMessage, MovementTuning,
};

pub(crate) fn begin_ledge_climbs(
    mut commands: Commands,
    mut messages: MessageReader<MovementEventMessage>,
) {
    for message in messages.read() {
        if let MovementEvent::LedgeClimbChanged { .. } = message.event {
            commands
                .entity(message.entity)
                .insert(LedgeClimbTimeline::default());
        }
    }
}

pub(crate) fn advance_ledge_climbs(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    mut query: Query<(
        Entity,
        &mut LedgeClimbTimeline,
        &mut CharacterController,
        &mut Transform,
    )>,
) {
    for (entity, mut timeline, mut controller, mut transform) in &mut query {
        timeline.ticks += 1;

        if !timeline.teleported && timeline.ticks >= tuning.ledge_climb_teleport_frames {
            timeline.teleported = true;
            if let Some(position) = controller.teleport_mid_ledge_climb(&tuning) {
                transform.translation = position.extend(transform.translation.z);
            }
        }

        if timeline.ticks >= tuning.ledge_climb_finish_frames {
            controller.finish_ledge_climb();
            commands.entity(entity).remove::<LedgeClimbTimeline>();
        }
    }
}
